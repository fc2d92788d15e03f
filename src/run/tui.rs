use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::Context;
use crate::models::SplitChoice;
use crate::pipeline;
use crate::store::{store_category_handoff, take_category_handoff, Session};
use crate::ui::app::{Action, App, Effect, InputMode, Screen};
use crate::ui::commands;

const TICK: Duration = Duration::from_millis(100);

pub(crate) fn as_tui(ctx: &Context) -> Result<()> {
    let user_id = match Session::load(&ctx.store) {
        Ok(session) => Some(session.user_id),
        Err(e) => {
            debug!(error = %e, "no stored session");
            None
        }
    };
    let mut app = App::new(ctx.config.review.clone(), user_id);
    let (tx, rx) = mpsc::channel();
    info!(base_url = %ctx.config.api.base_url, "starting tui");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let startup = app.start();
    run_effects(startup, ctx, &tx, &mut app);
    let result = run_app(&mut terminal, &mut app, ctx, &tx, &rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ctx: &Context,
    tx: &Sender<Action>,
    rx: &Receiver<Action>,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| crate::ui::render::render(f, app))?;

        while let Ok(action) = rx.try_recv() {
            let effects = app.apply(action);
            run_effects(effects, ctx, tx, app);
        }

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            let effects = match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app),
                InputMode::Command => handle_command_input(key, app),
                InputMode::Login => handle_login_input(key, app),
                InputMode::Confirm => handle_confirm_input(key, app),
            };
            run_effects(effects, ctx, tx, app);
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App) -> Vec<Effect> {
    let action = match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
            return Vec::new();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Action::Quit
        }
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('j') | KeyCode::Down => Action::CursorDown,
        KeyCode::Char('k') | KeyCode::Up => Action::CursorUp,
        KeyCode::Char('g') => Action::CursorTop,
        KeyCode::Char('G') => Action::CursorBottom,
        KeyCode::Char('1') => Action::SwitchScreen(Screen::Review),
        KeyCode::Char('2') => Action::SwitchScreen(Screen::Dashboard),
        KeyCode::Char('3') => Action::SwitchScreen(Screen::Detail),
        KeyCode::Tab => Action::CycleScreen(1),
        KeyCode::BackTab => Action::CycleScreen(-1),
        KeyCode::Char('f') => Action::Refresh,
        KeyCode::Char('s') => Action::ResortActive,
        KeyCode::Char('[') if app.screen == Screen::Review => Action::PrevPage,
        KeyCode::Char(']') if app.screen == Screen::Review => Action::NextPage,
        KeyCode::Char('{') if app.screen == Screen::Review => Action::FirstPage,
        KeyCode::Char('}') if app.screen == Screen::Review => Action::LastPage,
        KeyCode::Char('y') if app.screen == Screen::Review => Action::SetSplit(SplitChoice::Yes),
        KeyCode::Char('n') if app.screen == Screen::Review => Action::SetSplit(SplitChoice::No),
        KeyCode::Char(' ') if app.screen == Screen::Review => Action::CycleSplit,
        KeyCode::Char('c') if app.screen == Screen::Review => Action::CycleCategory(1),
        KeyCode::Char('C') if app.screen == Screen::Review => Action::CycleCategory(-1),
        KeyCode::Char('w') if app.screen == Screen::Review => Action::RequestSubmit,
        KeyCode::Enter if app.screen == Screen::Dashboard => Action::OpenSelectedCategory,
        KeyCode::Esc if app.screen == Screen::Detail => Action::SwitchScreen(Screen::Dashboard),
        KeyCode::Esc => {
            app.status_message.clear();
            return Vec::new();
        }
        _ => return Vec::new(),
    };
    app.apply(action)
}

fn handle_command_input(key: KeyEvent, app: &mut App) -> Vec<Effect> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            return commands::handle_command(&input, app);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Vec::new()
}

fn handle_login_input(key: KeyEvent, app: &mut App) -> Vec<Effect> {
    match key.code {
        KeyCode::Enter => match commands::parse_login(&app.command_input) {
            Ok(session) => {
                app.command_input.clear();
                return app.apply(Action::Login(session));
            }
            Err(e) => app.set_status(format!("{e:#}")),
        },
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            app.set_status("Not signed in. Use :login <userid> [token]");
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            return app.apply(Action::Quit);
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Vec::new()
}

fn handle_confirm_input(key: KeyEvent, app: &mut App) -> Vec<Effect> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.apply(Action::Confirm(true)),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.apply(Action::Confirm(false))
        }
        _ => Vec::new(),
    }
}

// ── Effects ──────────────────────────────────────────────────

/// Store effects run inline and feed their result straight back into the
/// app. Network effects run on a worker thread and report over `tx`.
fn run_effects(effects: Vec<Effect>, ctx: &Context, tx: &Sender<Action>, app: &mut App) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        debug!(?effect, "running effect");
        let follow_up = match effect {
            Effect::FetchTransactions { seq, filter } => {
                spawn_with_session(ctx, tx, move |gateway, session| Action::TransactionsLoaded {
                    seq,
                    result: session.and_then(|s| gateway.list_transactions(&s, &filter)),
                });
                None
            }
            Effect::FetchReport { seq, filter } => {
                spawn_with_session(ctx, tx, move |gateway, session| Action::ReportLoaded {
                    seq,
                    result: session.and_then(|s| gateway.list_transactions(&s, &filter)),
                });
                None
            }
            Effect::FetchCategories => {
                spawn_with_session(ctx, tx, |gateway, session| {
                    Action::CategoriesLoaded(session.and_then(|s| gateway.list_categories(&s)))
                });
                None
            }
            Effect::Submit(batch) => {
                spawn_with_session(ctx, tx, move |gateway, session| {
                    Action::Submitted(session.and_then(|s| {
                        pipeline::submit(gateway, &s, &batch).map(|()| batch.len())
                    }))
                });
                None
            }
            Effect::SaveSession(session) => session
                .save(&ctx.store)
                .err()
                .map(Action::StoreFailed),
            Effect::ClearSession => Session::clear(&ctx.store).err().map(Action::StoreFailed),
            Effect::StoreHandoff(handoff) => store_category_handoff(&ctx.store, &handoff)
                .err()
                .map(Action::StoreFailed),
            Effect::TakeHandoff => Some(Action::DetailLoaded(take_category_handoff(&ctx.store))),
        };
        if let Some(action) = follow_up {
            queue.extend(app.apply(action));
        }
    }
}

/// Load the stored identity and run `job` against the gateway on a worker
/// thread. The identity is read fresh for every request.
fn spawn_with_session<F>(ctx: &Context, tx: &Sender<Action>, job: F)
where
    F: FnOnce(&dyn crate::api::Gateway, crate::error::Result<Session>) -> Action + Send + 'static,
{
    let gateway = ctx.gateway.clone();
    let store = ctx.store.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let session = Session::load(&store);
        let action = job(gateway.as_ref(), session);
        if tx.send(action).is_err() {
            warn!("ui closed before a response arrived");
        }
    });
}
