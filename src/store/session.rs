use crate::error::{Error, Result};

use super::LocalStore;

const USER_ID_KEY: &str = "userId";
const TOKEN_KEY: &str = "accessToken";

/// Stored identity plus optional access token, read at the start of
/// every fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) user_id: String,
    pub(crate) token: Option<String>,
}

impl Session {
    pub(crate) fn new(user_id: impl Into<String>, token: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token,
        }
    }

    /// Fails with [`Error::MissingIdentity`] when no user id is stored.
    pub(crate) fn load(store: &LocalStore) -> Result<Self> {
        let user_id: Option<String> = store.get(USER_ID_KEY)?;
        let user_id = user_id
            .filter(|u| !u.trim().is_empty())
            .ok_or(Error::MissingIdentity)?;
        let token: Option<String> = store.get(TOKEN_KEY)?;
        Ok(Self { user_id, token })
    }

    pub(crate) fn save(&self, store: &LocalStore) -> Result<()> {
        store.set(USER_ID_KEY, &self.user_id)?;
        match &self.token {
            Some(token) => store.set(TOKEN_KEY, token),
            None => store.remove(TOKEN_KEY),
        }
    }

    pub(crate) fn clear(store: &LocalStore) -> Result<()> {
        store.remove(USER_ID_KEY)?;
        store.remove(TOKEN_KEY)
    }
}
