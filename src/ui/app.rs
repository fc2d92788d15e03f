use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::table::{project_rows, DisplayRow};
use super::util::plural;
use crate::api::TransactionFilter;
use crate::charts::{category_totals, filter_by_category, VendorRules};
use crate::config::ReviewConfig;
use crate::error::{Error, Result};
use crate::models::{Category, SplitChoice, Transaction, UpdateRequest};
use crate::pipeline::{
    build_batch, group_by_mapping_config, page_count, paginate, ChangeTracker, FieldChange,
    PageSize, SortColumn, SortState, TransactionCache,
};
use crate::store::{CategoryHandoff, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Review,
    Dashboard,
    Detail,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Review, Self::Dashboard, Self::Detail]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Review => write!(f, "Review"),
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Detail => write!(f, "Category Detail"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Login,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Login => write!(f, "LOGIN"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    Submit(Vec<UpdateRequest>),
    Logout,
}

/// Which date bound a filter command sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateBound {
    Start,
    End,
    CsvStart,
    CsvEnd,
}

/// Everything that can happen to the app: user intents from keys and
/// commands, and completions coming back from the runner.
#[derive(Debug)]
pub(crate) enum Action {
    Quit,
    ToggleHelp,
    SwitchScreen(Screen),
    CycleScreen(i32),
    CursorDown,
    CursorUp,
    CursorTop,
    CursorBottom,

    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    GotoPage(usize),
    SetPageSize(PageSize),

    SetSplit(SplitChoice),
    CycleSplit,
    SetCategory(String),
    CycleCategory(i32),
    Sort(SortColumn),
    ResortActive,

    Refresh,
    SetStatusFilter(Option<String>),
    SetDate(DateBound, Option<NaiveDate>),
    RequestSubmit,
    Confirm(bool),
    OpenSelectedCategory,
    OpenCategory(String),
    ReloadDetail,
    Login(Session),
    RequestLogout,

    TransactionsLoaded { seq: u64, result: Result<Vec<Transaction>> },
    CategoriesLoaded(Result<Vec<Category>>),
    ReportLoaded { seq: u64, result: Result<Vec<Transaction>> },
    Submitted(Result<usize>),
    DetailLoaded(Result<Option<CategoryHandoff>>),
    StoreFailed(Error),
}

/// Work the runner performs on behalf of the app. Network effects run off
/// the UI thread and report back with an [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    FetchTransactions { seq: u64, filter: TransactionFilter },
    FetchCategories,
    FetchReport { seq: u64, filter: TransactionFilter },
    Submit(Vec<UpdateRequest>),
    SaveSession(Session),
    ClearSession,
    StoreHandoff(CategoryHandoff),
    TakeHandoff,
}

/// One mapping-config group on the current review page.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReviewSection {
    pub(crate) key: String,
    pub(crate) total: usize,
    pub(crate) rows: Vec<DisplayRow>,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) config: ReviewConfig,
    pub(crate) user_id: Option<String>,

    // Review
    pub(crate) cache: TransactionCache,
    pub(crate) categories: Vec<Category>,
    pub(crate) tracker: ChangeTracker,
    pub(crate) filter: TransactionFilter,
    pub(crate) page: usize,
    pub(crate) page_size: PageSize,
    pub(crate) sort: SortState,
    pub(crate) cursor: usize,
    pub(crate) loading_review: bool,
    pub(crate) submitting: bool,
    fetch_seq: u64,

    // Dashboard
    pub(crate) report: Vec<Transaction>,
    pub(crate) report_filter: TransactionFilter,
    pub(crate) category_index: usize,
    pub(crate) vendor_rules: VendorRules,
    pub(crate) loading_report: bool,
    report_seq: u64,

    // Detail
    pub(crate) detail: Option<CategoryHandoff>,
    pub(crate) detail_sort: SortState,
    pub(crate) detail_cursor: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,
}

impl App {
    pub(crate) fn new(config: ReviewConfig, user_id: Option<String>) -> Self {
        let filter = TransactionFilter::with_status(config.default_status.clone());
        let report_filter = TransactionFilter::with_status(config.report_status.clone())
            .with_date_params(config.report_date_params.clone());
        Self {
            running: true,
            screen: Screen::Review,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            page_size: config.page_size,
            config,
            user_id,

            cache: TransactionCache::new(),
            categories: Vec::new(),
            tracker: ChangeTracker::new(),
            filter,
            page: 1,
            sort: SortState::default(),
            cursor: 0,
            loading_review: false,
            submitting: false,
            fetch_seq: 0,

            report: Vec::new(),
            report_filter,
            category_index: 0,
            vendor_rules: VendorRules::default(),
            loading_report: false,
            report_seq: 0,

            detail: None,
            detail_sort: SortState::default(),
            detail_cursor: 0,

            pending_action: None,
            confirm_message: String::new(),
        }
    }

    /// Effects to run once at startup.
    pub(crate) fn start(&mut self) -> Vec<Effect> {
        let mut effects = self.fetch_review();
        effects.push(Effect::TakeHandoff);
        effects
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Whether either fetch is still outstanding.
    pub(crate) fn loading(&self) -> bool {
        self.loading_review || self.loading_report
    }

    pub(crate) fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Quit => {
                self.running = false;
                Vec::new()
            }
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                Vec::new()
            }
            Action::SwitchScreen(screen) => self.switch_screen(screen),
            Action::CycleScreen(delta) => {
                let screens = Screen::all();
                let idx = screens.iter().position(|s| *s == self.screen).unwrap_or(0);
                let next = (idx as i32 + delta).rem_euclid(screens.len() as i32) as usize;
                self.switch_screen(screens[next])
            }
            Action::CursorDown => {
                self.move_cursor(1);
                Vec::new()
            }
            Action::CursorUp => {
                self.move_cursor(-1);
                Vec::new()
            }
            Action::CursorTop => {
                *self.cursor_mut() = 0;
                Vec::new()
            }
            Action::CursorBottom => {
                let len = self.cursor_len();
                *self.cursor_mut() = len.saturating_sub(1);
                Vec::new()
            }

            Action::FirstPage => self.goto_page(1),
            Action::PrevPage => self.goto_page(self.page.saturating_sub(1)),
            Action::NextPage => self.goto_page(self.page + 1),
            Action::LastPage => self.goto_page(self.total_pages()),
            Action::GotoPage(page) => {
                if page == 0 || page > self.total_pages() {
                    self.set_status(format!(
                        "Page {page} is out of range (1-{})",
                        self.total_pages().max(1)
                    ));
                    return Vec::new();
                }
                self.goto_page(page)
            }
            Action::SetPageSize(size) => {
                self.page_size = size;
                self.page = 1;
                self.cursor = 0;
                self.set_status(format!("Showing {size} per page"));
                Vec::new()
            }

            Action::SetSplit(choice) => {
                self.edit_split(choice);
                Vec::new()
            }
            Action::CycleSplit => {
                if let Some(row) = self.selected_row() {
                    self.edit_split(row.split.cycled());
                }
                Vec::new()
            }
            Action::SetCategory(name) => {
                match Category::find_by_name(&self.categories, &name).cloned() {
                    Some(category) => self.edit_category(&category),
                    None => self.set_status(format!("Category '{name}' not found")),
                }
                Vec::new()
            }
            Action::CycleCategory(delta) => {
                self.cycle_category(delta);
                Vec::new()
            }
            Action::Sort(column) => {
                self.toggle_sort(column);
                Vec::new()
            }
            Action::ResortActive => {
                let active = match self.screen {
                    Screen::Detail => self.detail_sort.active(),
                    _ => self.sort.active(),
                };
                match active {
                    Some((column, _)) => self.toggle_sort(column),
                    None => self.toggle_sort(SortColumn::Date),
                }
                Vec::new()
            }

            Action::Refresh => self.refresh_current(),
            Action::SetStatusFilter(status) => {
                self.active_filter_mut().status = status;
                self.refresh_current()
            }
            Action::SetDate(bound, date) => {
                let filter = self.active_filter_mut();
                match bound {
                    DateBound::Start => filter.start_date = date,
                    DateBound::End => filter.end_date = date,
                    DateBound::CsvStart => filter.csv_start_date = date,
                    DateBound::CsvEnd => filter.csv_end_date = date,
                }
                self.refresh_current()
            }
            Action::RequestSubmit => {
                self.request_submit();
                Vec::new()
            }
            Action::Confirm(yes) => self.confirm(yes),
            Action::OpenSelectedCategory => {
                let totals = category_totals(&self.report);
                match totals.get(self.category_index) {
                    Some((name, _)) => self.open_category(name),
                    None => {
                        self.set_status("No category selected");
                        Vec::new()
                    }
                }
            }
            Action::OpenCategory(name) => self.open_category(&name),
            Action::ReloadDetail => vec![Effect::TakeHandoff],
            Action::Login(session) => {
                self.input_mode = InputMode::Normal;
                self.set_status(format!("Signed in as {}", session.user_id));
                self.user_id = Some(session.user_id.clone());
                let mut effects = vec![Effect::SaveSession(session)];
                effects.extend(self.refresh_current());
                effects
            }
            Action::RequestLogout => {
                self.confirm_message = "Sign out and discard unsaved edits?".into();
                self.pending_action = Some(PendingAction::Logout);
                self.input_mode = InputMode::Confirm;
                Vec::new()
            }

            Action::TransactionsLoaded { seq, result } => {
                self.transactions_loaded(seq, result);
                Vec::new()
            }
            Action::CategoriesLoaded(result) => {
                match result {
                    Ok(categories) => {
                        debug!(count = categories.len(), "categories loaded");
                        self.categories = categories;
                        self.force_never_split();
                    }
                    Err(e) => self.fail(e),
                }
                Vec::new()
            }
            Action::ReportLoaded { seq, result } => {
                self.report_loaded(seq, result);
                Vec::new()
            }
            Action::Submitted(result) => self.submitted(result),
            Action::DetailLoaded(result) => {
                match result {
                    Ok(Some(mut handoff)) => {
                        self.detail_sort.apply(&mut handoff.records);
                        self.set_status(format!(
                            "{}: {} transactions",
                            handoff.category,
                            handoff.records.len()
                        ));
                        self.detail = Some(handoff);
                        self.detail_cursor = 0;
                        self.screen = Screen::Detail;
                    }
                    Ok(None) => {
                        if self.screen == Screen::Detail {
                            self.set_status("No category handed off. Pick one on the dashboard");
                        }
                    }
                    Err(e) => self.fail(e),
                }
                Vec::new()
            }
            Action::StoreFailed(e) => {
                self.fail(e);
                Vec::new()
            }
        }
    }

    // ── Review page ──────────────────────────────────────────

    /// Pages needed for the largest group; smaller groups run out early.
    pub(crate) fn total_pages(&self) -> usize {
        group_by_mapping_config(self.cache.all())
            .iter()
            .map(|g| page_count(g.records.len(), self.page_size))
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn review_sections(&self) -> Vec<ReviewSection> {
        group_by_mapping_config(self.cache.all())
            .into_iter()
            .map(|group| {
                let total = group.records.len();
                let page = paginate(&group.records, self.page_size, self.page);
                let rows = project_rows(
                    page,
                    self.page,
                    self.page_size.resolve(total),
                    &self.tracker,
                    &self.categories,
                    self.config.id_display_len,
                );
                ReviewSection {
                    key: group.key,
                    total,
                    rows,
                }
            })
            .collect()
    }

    /// "{from}-{to} of {total} items" for the current page, measured on
    /// the largest group.
    pub(crate) fn range_label(&self) -> String {
        let largest = group_by_mapping_config(self.cache.all())
            .iter()
            .map(|g| g.records.len())
            .max()
            .unwrap_or(0);
        if largest == 0 {
            return "0 items".into();
        }
        let size = self.page_size.resolve(largest);
        let from = (self.page - 1) * size + 1;
        let to = (self.page * size).min(largest);
        if from > largest {
            return format!("0 of {largest} items");
        }
        format!("{from}-{to} of {largest} items")
    }

    pub(crate) fn selected_row(&self) -> Option<DisplayRow> {
        self.review_sections()
            .into_iter()
            .flat_map(|s| s.rows)
            .nth(self.cursor)
    }

    fn visible_row_count(&self) -> usize {
        self.review_sections().iter().map(|s| s.rows.len()).sum()
    }

    fn goto_page(&mut self, page: usize) -> Vec<Effect> {
        let total = self.total_pages();
        if total == 0 {
            return Vec::new();
        }
        self.page = page.clamp(1, total);
        self.cursor = 0;
        Vec::new()
    }

    /// Split and category edits wait until the batch in flight settles.
    fn edits_blocked(&mut self) -> bool {
        if self.submitting {
            self.set_status("A submission is in progress; edits are paused");
        }
        self.submitting
    }

    fn edit_split(&mut self, choice: SplitChoice) {
        if self.edits_blocked() {
            return;
        }
        let Some(row) = self.selected_row() else {
            self.set_status("No transaction selected");
            return;
        };
        if row.split.locked {
            self.set_status("Split is locked by a never-split category");
            return;
        }
        self.tracker
            .record_change(&row.hash, FieldChange::Split(choice));
        self.set_status(format!("Split set to {choice} ({} pending)", self.tracker.len()));
    }

    fn edit_category(&mut self, category: &Category) {
        if self.edits_blocked() {
            return;
        }
        let Some(row) = self.selected_row() else {
            self.set_status("No transaction selected");
            return;
        };
        self.tracker.choose_category(&row.hash, category);
        if category.is_never_split() {
            self.set_status(format!("Category set to {category}; split forced to No"));
        } else {
            self.set_status(format!("Category set to {category}"));
        }
    }

    fn cycle_category(&mut self, delta: i32) {
        if self.categories.is_empty() {
            self.set_status("No categories loaded");
            return;
        }
        let Some(row) = self.selected_row() else {
            self.set_status("No transaction selected");
            return;
        };
        let len = self.categories.len() as i32;
        let next = match row.category.and_then(|c| c.selected) {
            Some(i) => (i as i32 + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        if let Some(category) = self.categories.get(next as usize).cloned() {
            self.edit_category(&category);
        }
    }

    fn toggle_sort(&mut self, column: SortColumn) {
        match self.screen {
            Screen::Detail => {
                let direction = self.detail_sort.toggle(column);
                if let Some(detail) = self.detail.as_mut() {
                    self.detail_sort.apply(&mut detail.records);
                }
                self.detail_cursor = 0;
                self.set_status(format!("Sorted by {} {}", column.as_str(), direction.arrow()));
            }
            _ => {
                let direction = self.sort.toggle(column);
                self.cache.sort(&self.sort);
                self.cursor = 0;
                self.set_status(format!("Sorted by {} {}", column.as_str(), direction.arrow()));
            }
        }
    }

    fn request_submit(&mut self) {
        if self.submitting {
            self.set_status("A submission is already in progress");
            return;
        }
        let Some(user_id) = self.user_id.clone() else {
            self.fail(Error::MissingIdentity);
            return;
        };
        match build_batch(&self.tracker, &self.cache, &user_id) {
            Ok(batch) => {
                self.confirm_message = format!("Submit {} as reviewed?", plural(batch.len(), "change"));
                self.pending_action = Some(PendingAction::Submit(batch));
                self.input_mode = InputMode::Confirm;
            }
            Err(e) => self.fail(e),
        }
    }

    fn confirm(&mut self, yes: bool) -> Vec<Effect> {
        let action = self.pending_action.take();
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        if !yes {
            self.set_status("Cancelled");
            return Vec::new();
        }
        match action {
            Some(PendingAction::Submit(batch)) => {
                self.submitting = true;
                self.set_status(format!("Submitting {}...", plural(batch.len(), "change")));
                vec![Effect::Submit(batch)]
            }
            Some(PendingAction::Logout) => {
                // Anything still in flight belongs to the old identity.
                self.fetch_seq += 1;
                self.report_seq += 1;
                self.loading_review = false;
                self.loading_report = false;
                self.cache.load(Vec::new());
                self.report.clear();
                self.tracker.clear();
                self.detail = None;
                self.categories.clear();
                self.user_id = None;
                self.input_mode = InputMode::Login;
                self.command_input.clear();
                self.set_status("Signed out");
                vec![Effect::ClearSession]
            }
            None => Vec::new(),
        }
    }

    fn submitted(&mut self, result: Result<usize>) -> Vec<Effect> {
        self.submitting = false;
        match result {
            Ok(count) => {
                let cleared = self.tracker.drain().len();
                info!(count, cleared, "submission accepted, refreshing");
                self.set_status(format!("Submitted {}", plural(count, "change")));
                self.fetch_review()
            }
            Err(e) => {
                warn!(error = %e, pending = self.tracker.len(), "submission failed; edits kept");
                self.fail(e);
                Vec::new()
            }
        }
    }

    // ── Fetching ─────────────────────────────────────────────

    fn refresh_current(&mut self) -> Vec<Effect> {
        match self.screen {
            Screen::Dashboard => self.fetch_report(),
            Screen::Review | Screen::Detail => self.fetch_review(),
        }
    }

    fn fetch_review(&mut self) -> Vec<Effect> {
        self.fetch_seq += 1;
        self.loading_review = true;
        vec![
            Effect::FetchTransactions {
                seq: self.fetch_seq,
                filter: self.filter.clone(),
            },
            Effect::FetchCategories,
        ]
    }

    fn fetch_report(&mut self) -> Vec<Effect> {
        self.report_seq += 1;
        self.loading_report = true;
        vec![Effect::FetchReport {
            seq: self.report_seq,
            filter: self.report_filter.clone(),
        }]
    }

    fn transactions_loaded(&mut self, seq: u64, result: Result<Vec<Transaction>>) {
        if seq < self.fetch_seq {
            debug!(seq, latest = self.fetch_seq, "dropping stale transaction response");
            return;
        }
        self.loading_review = false;
        match result {
            Ok(records) => {
                let count = records.len();
                self.cache.load(records);
                self.cache.sort(&self.sort);
                self.page = 1;
                self.cursor = 0;
                if !self.config.keep_edits_on_refresh {
                    self.tracker.clear();
                }
                self.force_never_split();
                self.set_status(format!("Loaded {count} transactions ({})", self.filter.describe()));
            }
            Err(e) => self.fail(e),
        }
    }

    fn report_loaded(&mut self, seq: u64, result: Result<Vec<Transaction>>) {
        if seq < self.report_seq {
            debug!(seq, latest = self.report_seq, "dropping stale report response");
            return;
        }
        self.loading_report = false;
        match result {
            Ok(records) => {
                self.set_status(format!(
                    "Report: {} transactions ({})",
                    records.len(),
                    self.report_filter.describe()
                ));
                self.report = records;
                self.category_index = 0;
            }
            Err(e) => self.fail(e),
        }
    }

    /// Rows whose existing category is never split carry a forced "no".
    fn force_never_split(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        let forced = self
            .tracker
            .force_never_split(self.cache.all(), &self.categories);
        if forced > 0 {
            debug!(forced, "split forced to no for never-split categories");
        }
    }

    fn open_category(&mut self, name: &str) -> Vec<Effect> {
        let records = filter_by_category(&self.report, name);
        if records.is_empty() {
            self.set_status(format!("No reviewed transactions in '{name}'"));
            return Vec::new();
        }
        vec![
            Effect::StoreHandoff(CategoryHandoff {
                category: name.to_string(),
                records,
            }),
            Effect::TakeHandoff,
        ]
    }

    /// Errors end the triggering action. A missing identity sends the user
    /// to the login prompt instead of showing an error.
    fn fail(&mut self, error: Error) {
        if matches!(error, Error::MissingIdentity) {
            self.input_mode = InputMode::Login;
            self.command_input.clear();
            self.set_status("Sign in: enter your user id (and optional token)");
            return;
        }
        self.set_status(format!("Error: {error}"));
    }

    // ── Screens and cursor ───────────────────────────────────

    fn switch_screen(&mut self, screen: Screen) -> Vec<Effect> {
        self.screen = screen;
        self.set_status(format!("{screen}"));
        match screen {
            Screen::Dashboard if self.report.is_empty() => self.fetch_report(),
            Screen::Detail if self.detail.is_none() => vec![Effect::TakeHandoff],
            _ => Vec::new(),
        }
    }

    fn active_filter_mut(&mut self) -> &mut TransactionFilter {
        match self.screen {
            Screen::Dashboard => &mut self.report_filter,
            Screen::Review | Screen::Detail => &mut self.filter,
        }
    }

    fn cursor_len(&self) -> usize {
        match self.screen {
            Screen::Review => self.visible_row_count(),
            Screen::Dashboard => category_totals(&self.report).len(),
            Screen::Detail => self.detail.as_ref().map_or(0, |d| d.records.len()),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.screen {
            Screen::Review => &mut self.cursor,
            Screen::Dashboard => &mut self.category_index,
            Screen::Detail => &mut self.detail_cursor,
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = self.cursor_len();
        let cursor = self.cursor_mut();
        if len == 0 {
            *cursor = 0;
        } else if delta > 0 {
            *cursor = (*cursor + 1).min(len - 1);
        } else {
            *cursor = cursor.saturating_sub(1);
        }
    }

    /// Total absolute spend on the dashboard, for pie percentages.
    pub(crate) fn report_total(&self) -> Decimal {
        self.report.iter().map(Transaction::abs_amount).sum()
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
