use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::{bail, Context};
use chrono::NaiveDate;

use super::app::{Action, App, DateBound, Effect, Screen};
use crate::models::{parse_date, SplitChoice};
use crate::pipeline::{PageSize, SortColumn};
use crate::store::Session;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str) -> anyhow::Result<Action>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit SplitTUI", cmd_quit, r);
    register_command!("quit", "Quit SplitTUI", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("r", "Go to Review", cmd_review, r);
    register_command!("review", "Go to Review", cmd_review, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!(
        "detail",
        "Open category detail (e.g. :detail Groceries)",
        cmd_detail,
        r
    );
    register_command!("fetch", "Re-fetch the current screen", cmd_fetch, r);
    register_command!("f", "Re-fetch the current screen", cmd_fetch, r);
    register_command!("submit", "Submit pending edits as reviewed", cmd_submit, r);
    register_command!("w", "Submit pending edits as reviewed", cmd_submit, r);
    register_command!("page", "Go to page (e.g. :page 3)", cmd_page, r);
    register_command!(
        "per-page",
        "Set page size (e.g. :per-page 25, :per-page all)",
        cmd_per_page,
        r
    );
    register_command!(
        "sort",
        "Sort by column: date, description, category, amount, split",
        cmd_sort,
        r
    );
    register_command!("split", "Set split on selected row (:split yes|no)", cmd_split, r);
    register_command!(
        "cat",
        "Set category on selected row (e.g. :cat Groceries)",
        cmd_category,
        r
    );
    register_command!(
        "status",
        "Filter by status (e.g. :status pending, :status to clear)",
        cmd_status,
        r
    );
    register_command!(
        "from",
        "Transactions on or after date (e.g. :from 2024-01-01)",
        cmd_from,
        r
    );
    register_command!("to", "Transactions on or before date", cmd_to, r);
    register_command!(
        "csv-from",
        "Added on or after date (e.g. :csv-from 2024-01-01)",
        cmd_csv_from,
        r
    );
    register_command!("csv-to", "Added on or before date", cmd_csv_to, r);
    register_command!(
        "login",
        "Sign in (e.g. :login <userid> [token])",
        cmd_login,
        r
    );
    register_command!("logout", "Sign out and clear stored identity", cmd_logout, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App) -> Vec<Effect> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    let Some(cmd) = COMMANDS.get(cmd_name) else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
        return Vec::new();
    };

    match (cmd.run)(args) {
        Ok(action) => app.apply(action),
        Err(e) => {
            app.set_status(format!("{e:#}"));
            Vec::new()
        }
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Parse an optional date argument. An empty argument clears the bound.
fn date_arg(args: &str) -> anyhow::Result<Option<NaiveDate>> {
    if args.is_empty() {
        return Ok(None);
    }
    match parse_date(args) {
        Some(date) => Ok(Some(date)),
        None => bail!("Invalid date: {args}. Use YYYY-MM-DD"),
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str) -> anyhow::Result<Action> {
    Ok(Action::Quit)
}

fn cmd_help(_args: &str) -> anyhow::Result<Action> {
    Ok(Action::ToggleHelp)
}

fn cmd_review(_args: &str) -> anyhow::Result<Action> {
    Ok(Action::SwitchScreen(Screen::Review))
}

fn cmd_dashboard(_args: &str) -> anyhow::Result<Action> {
    Ok(Action::SwitchScreen(Screen::Dashboard))
}

fn cmd_detail(args: &str) -> anyhow::Result<Action> {
    if args.is_empty() {
        return Ok(Action::ReloadDetail);
    }
    Ok(Action::OpenCategory(args.to_string()))
}

fn cmd_fetch(_args: &str) -> anyhow::Result<Action> {
    Ok(Action::Refresh)
}

fn cmd_submit(_args: &str) -> anyhow::Result<Action> {
    Ok(Action::RequestSubmit)
}

fn cmd_page(args: &str) -> anyhow::Result<Action> {
    match args {
        "" => bail!("Usage: :page <number|first|last|next|prev>"),
        "first" => Ok(Action::FirstPage),
        "last" => Ok(Action::LastPage),
        "next" => Ok(Action::NextPage),
        "prev" => Ok(Action::PrevPage),
        n => {
            let page = n
                .parse::<usize>()
                .with_context(|| format!("Invalid page: {n}"))?;
            Ok(Action::GotoPage(page))
        }
    }
}

fn cmd_per_page(args: &str) -> anyhow::Result<Action> {
    if args.is_empty() {
        bail!("Usage: :per-page <10|25|50|n|all>");
    }
    let size = PageSize::parse(args)?;
    Ok(Action::SetPageSize(size))
}

fn cmd_sort(args: &str) -> anyhow::Result<Action> {
    match SortColumn::parse(args) {
        Some(column) => Ok(Action::Sort(column)),
        None => {
            let names: Vec<&str> = SortColumn::all().iter().map(|c| c.as_str()).collect();
            bail!("Usage: :sort <column>. Columns: {}", names.join(", "))
        }
    }
}

fn cmd_split(args: &str) -> anyhow::Result<Action> {
    match SplitChoice::parse(args) {
        Some(choice) => Ok(Action::SetSplit(choice)),
        None => bail!("Usage: :split yes|no"),
    }
}

fn cmd_category(args: &str) -> anyhow::Result<Action> {
    if args.is_empty() {
        bail!("Usage: :cat <category_name>");
    }
    Ok(Action::SetCategory(args.to_string()))
}

fn cmd_status(args: &str) -> anyhow::Result<Action> {
    let status = (!args.is_empty()).then(|| args.to_string());
    Ok(Action::SetStatusFilter(status))
}

fn cmd_from(args: &str) -> anyhow::Result<Action> {
    Ok(Action::SetDate(DateBound::Start, date_arg(args)?))
}

fn cmd_to(args: &str) -> anyhow::Result<Action> {
    Ok(Action::SetDate(DateBound::End, date_arg(args)?))
}

fn cmd_csv_from(args: &str) -> anyhow::Result<Action> {
    Ok(Action::SetDate(DateBound::CsvStart, date_arg(args)?))
}

fn cmd_csv_to(args: &str) -> anyhow::Result<Action> {
    Ok(Action::SetDate(DateBound::CsvEnd, date_arg(args)?))
}

fn cmd_login(args: &str) -> anyhow::Result<Action> {
    Ok(Action::Login(parse_login(args)?))
}

fn cmd_logout(_args: &str) -> anyhow::Result<Action> {
    Ok(Action::RequestLogout)
}

/// `<userid> [token]`, as typed at the login prompt or after `:login`.
pub(crate) fn parse_login(input: &str) -> anyhow::Result<Session> {
    let mut parts = input.split_whitespace();
    let Some(user_id) = parts.next() else {
        bail!("Usage: login <userid> [token]");
    };
    let token = parts.next().map(String::from);
    Ok(Session::new(user_id, token))
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
