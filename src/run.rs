mod cli;
mod tui;

use std::sync::Arc;

use crate::api::Gateway;
use crate::config::Config;
use crate::store::LocalStore;

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

/// Everything both front ends need: settings, the local store holding the
/// identity and handoff, and the remote gateway.
pub(crate) struct Context {
    pub(crate) config: Config,
    pub(crate) store: LocalStore,
    pub(crate) gateway: Arc<dyn Gateway>,
}
