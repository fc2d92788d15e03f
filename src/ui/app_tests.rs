#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::api::DateParams;
use crate::config::Config;

fn review_config() -> ReviewConfig {
    Config::default_config().unwrap().review
}

fn app() -> App {
    App::new(review_config(), Some("U".into()))
}

fn txn(hash: &str, mapping: &str, amount: Decimal) -> Transaction {
    let mut t = Transaction::new(hash, format!("desc {hash}"), amount);
    t.mapping_config_name = Some(mapping.into());
    t
}

/// App with the latest fetch answered by `records`.
fn loaded(records: Vec<Transaction>) -> App {
    let mut app = app();
    let effects = app.start();
    let seq = match &effects[0] {
        Effect::FetchTransactions { seq, .. } => *seq,
        other => panic!("unexpected effect {other:?}"),
    };
    app.apply(Action::TransactionsLoaded {
        seq,
        result: Ok(records),
    });
    app
}

fn many(n: usize, mapping: &str) -> Vec<Transaction> {
    (0..n)
        .map(|i| txn(&format!("{mapping}-{i}"), mapping, dec!(-1)))
        .collect()
}

// ── Fetching ──────────────────────────────────────────────────

#[test]
fn test_start_fetches_review_categories_and_handoff() {
    let mut app = app();
    let effects = app.start();
    assert_eq!(
        effects,
        vec![
            Effect::FetchTransactions {
                seq: 1,
                filter: TransactionFilter::with_status("pending"),
            },
            Effect::FetchCategories,
            Effect::TakeHandoff,
        ]
    );
    assert!(app.loading_review);
    assert!(!app.loading_report);
}

#[test]
fn test_stale_response_is_dropped() {
    let mut app = app();
    app.apply(Action::Refresh);
    app.apply(Action::Refresh);

    app.apply(Action::TransactionsLoaded {
        seq: 2,
        result: Ok(vec![txn("new", "m", dec!(-1))]),
    });
    app.apply(Action::TransactionsLoaded {
        seq: 1,
        result: Ok(vec![txn("old", "m", dec!(-1))]),
    });

    assert!(app.cache.find_by_identity("new").is_some());
    assert!(app.cache.find_by_identity("old").is_none());
}

#[test]
fn test_load_resets_to_first_page() {
    let mut app = loaded(many(25, "m"));
    app.apply(Action::NextPage);
    assert_eq!(app.page, 2);

    app.apply(Action::Refresh);
    app.apply(Action::TransactionsLoaded {
        seq: 2,
        result: Ok(many(25, "m")),
    });
    assert_eq!(app.page, 1);
}

#[test]
fn test_missing_identity_redirects_to_login() {
    let mut app = app();
    app.apply(Action::TransactionsLoaded {
        seq: 0,
        result: Err(Error::MissingIdentity),
    });
    assert_eq!(app.input_mode, InputMode::Login);
    assert!(!app.status_message.starts_with("Error"));
}

#[test]
fn test_network_error_surfaces_in_status() {
    let mut app = app();
    app.apply(Action::TransactionsLoaded {
        seq: 0,
        result: Err(Error::Network {
            status: Some(502),
            message: "bad gateway".into(),
        }),
    });
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.status_message.contains("502"));
    assert!(!app.loading_review);
}

#[test]
fn test_review_and_report_loading_tracked_separately() {
    let mut app = app();
    app.start();
    app.apply(Action::SwitchScreen(Screen::Dashboard));
    assert!(app.loading_review && app.loading_report);

    app.apply(Action::ReportLoaded {
        seq: 1,
        result: Ok(Vec::new()),
    });
    assert!(!app.loading_report);
    assert!(app.loading_review);
    assert!(app.loading());

    app.apply(Action::TransactionsLoaded {
        seq: 1,
        result: Ok(Vec::new()),
    });
    assert!(!app.loading());
}

#[test]
fn test_refresh_keeps_edits_by_default() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::SetSplit(SplitChoice::Yes));
    app.apply(Action::Refresh);
    app.apply(Action::TransactionsLoaded {
        seq: 2,
        result: Ok(vec![txn("a", "m", dec!(-1))]),
    });
    assert_eq!(app.tracker.len(), 1);
}

#[test]
fn test_refresh_clears_edits_when_configured() {
    let mut config = review_config();
    config.keep_edits_on_refresh = false;
    let mut app = App::new(config, Some("U".into()));
    app.apply(Action::TransactionsLoaded {
        seq: 0,
        result: Ok(vec![txn("a", "m", dec!(-1))]),
    });
    app.apply(Action::SetSplit(SplitChoice::Yes));
    app.apply(Action::TransactionsLoaded {
        seq: 0,
        result: Ok(vec![txn("a", "m", dec!(-1))]),
    });
    assert!(app.tracker.is_empty());
}

// ── Pagination ────────────────────────────────────────────────

#[test]
fn test_page_count_is_largest_group() {
    let mut records = many(25, "chase");
    records.extend(many(3, "amex"));
    let mut app = loaded(records);
    assert_eq!(app.total_pages(), 3);

    app.apply(Action::LastPage);
    let sections = app.review_sections();
    assert_eq!(sections[0].rows.len(), 5);
    assert_eq!(sections[0].rows[0].seq, 21);
    assert!(sections[1].rows.is_empty());
    assert_eq!(sections[1].total, 3);
}

#[test]
fn test_page_navigation_clamps() {
    let mut app = loaded(many(25, "m"));
    app.apply(Action::PrevPage);
    assert_eq!(app.page, 1);
    app.apply(Action::NextPage);
    app.apply(Action::NextPage);
    app.apply(Action::NextPage);
    assert_eq!(app.page, 3);
    app.apply(Action::FirstPage);
    assert_eq!(app.page, 1);
}

#[test]
fn test_goto_out_of_range_is_ignored() {
    let mut app = loaded(many(25, "m"));
    app.apply(Action::GotoPage(2));
    assert_eq!(app.page, 2);
    app.apply(Action::GotoPage(9));
    assert_eq!(app.page, 2);
    app.apply(Action::GotoPage(0));
    assert_eq!(app.page, 2);
}

#[test]
fn test_page_size_change_resets_page() {
    let mut app = loaded(many(25, "m"));
    app.apply(Action::GotoPage(3));
    app.apply(Action::SetPageSize(PageSize::fixed(25).unwrap()));
    assert_eq!(app.page, 1);
    assert_eq!(app.total_pages(), 1);

    app.apply(Action::SetPageSize(PageSize::All));
    assert_eq!(app.review_sections()[0].rows.len(), 25);
}

#[test]
fn test_range_label() {
    let mut app = loaded(many(25, "m"));
    assert_eq!(app.range_label(), "1-10 of 25 items");
    app.apply(Action::LastPage);
    assert_eq!(app.range_label(), "21-25 of 25 items");
    assert_eq!(loaded(Vec::new()).range_label(), "0 items");
}

// ── Editing ───────────────────────────────────────────────────

#[test]
fn test_split_edit_targets_cursor_row() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1)), txn("b", "m", dec!(-2))]);
    app.apply(Action::CursorDown);
    app.apply(Action::SetSplit(SplitChoice::No));

    assert!(app.tracker.get("a").is_none());
    assert_eq!(app.tracker.get("b").unwrap().split, Some(SplitChoice::No));
}

#[test]
fn test_cycle_split_from_unset() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::CycleSplit);
    assert_eq!(app.tracker.get("a").unwrap().split, Some(SplitChoice::Yes));
    app.apply(Action::CycleSplit);
    assert_eq!(app.tracker.get("a").unwrap().split, Some(SplitChoice::No));
}

#[test]
fn test_never_split_category_forces_and_locks() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::CategoriesLoaded(Ok(vec![
        Category::new("Groceries", dec!(50)),
        Category::new("Rent", dec!(0)),
    ])));

    app.apply(Action::SetSplit(SplitChoice::Yes));
    app.apply(Action::SetCategory("rent".into()));
    let edit = app.tracker.get("a").unwrap();
    assert_eq!(edit.split, Some(SplitChoice::No));
    assert_eq!(edit.category.as_deref(), Some("Rent"));

    app.apply(Action::SetSplit(SplitChoice::Yes));
    assert_eq!(app.tracker.get("a").unwrap().split, Some(SplitChoice::No));
    assert!(app.selected_row().unwrap().split.locked);

    app.apply(Action::SetCategory("Groceries".into()));
    app.apply(Action::SetSplit(SplitChoice::Yes));
    assert_eq!(app.tracker.get("a").unwrap().split, Some(SplitChoice::Yes));
}

#[test]
fn test_fetched_never_split_category_is_forced_no_and_submittable() {
    let mut rent = txn("a", "m", dec!(-1500));
    rent.category = Some("Rent".into());
    let mut app = loaded(vec![rent]);
    app.apply(Action::CategoriesLoaded(Ok(vec![Category::new("Rent", dec!(0))])));

    let row = app.selected_row().unwrap();
    assert_eq!(row.split.value, Some(SplitChoice::No));
    assert!(row.split.locked);
    assert_eq!(app.tracker.get("a").unwrap().split, Some(SplitChoice::No));

    app.apply(Action::SetSplit(SplitChoice::Yes));
    assert_eq!(app.tracker.get("a").unwrap().split, Some(SplitChoice::No));

    app.apply(Action::RequestSubmit);
    assert_eq!(app.input_mode, InputMode::Confirm);
    let effects = app.apply(Action::Confirm(true));
    let Effect::Submit(batch) = &effects[0] else {
        panic!("expected submit, got {effects:?}");
    };
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].split, Some(SplitChoice::No));
}

#[test]
fn test_categories_before_transactions_still_force_no() {
    let mut app = app();
    app.start();
    app.apply(Action::CategoriesLoaded(Ok(vec![Category::new("Rent", dec!(0))])));
    let mut rent = txn("a", "m", dec!(-1500));
    rent.category = Some("Rent".into());
    app.apply(Action::TransactionsLoaded {
        seq: 1,
        result: Ok(vec![rent]),
    });
    assert_eq!(app.tracker.get("a").unwrap().split, Some(SplitChoice::No));
}

#[test]
fn test_cycle_category_wraps() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::CategoriesLoaded(Ok(vec![
        Category::new("Food", dec!(50)),
        Category::new("Fun", dec!(50)),
    ])));
    app.apply(Action::CycleCategory(-1));
    assert_eq!(app.tracker.get("a").unwrap().category.as_deref(), Some("Fun"));
    app.apply(Action::CycleCategory(1));
    assert_eq!(app.tracker.get("a").unwrap().category.as_deref(), Some("Food"));
}

#[test]
fn test_unknown_category_is_reported() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::SetCategory("Nope".into()));
    assert!(app.tracker.is_empty());
    assert!(app.status_message.contains("not found"));
}

// ── Submission ────────────────────────────────────────────────

#[test]
fn test_submit_without_edits_makes_no_effect() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    let effects = app.apply(Action::RequestSubmit);
    assert!(effects.is_empty());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message, "Error: No changes to submit");
}

#[test]
fn test_submit_confirm_sends_batch() {
    let mut app = loaded(vec![txn("a", "m", dec!(-42.50))]);
    app.apply(Action::SetSplit(SplitChoice::No));
    app.apply(Action::RequestSubmit);
    assert_eq!(app.input_mode, InputMode::Confirm);

    let effects = app.apply(Action::Confirm(true));
    let Effect::Submit(batch) = &effects[0] else {
        panic!("expected submit, got {effects:?}");
    };
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].userid, "U");
    assert_eq!(batch[0].amount, dec!(-42.50));
    assert!(app.submitting);
}

#[test]
fn test_submit_cancel_keeps_edits() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::SetSplit(SplitChoice::No));
    app.apply(Action::RequestSubmit);
    let effects = app.apply(Action::Confirm(false));
    assert!(effects.is_empty());
    assert_eq!(app.tracker.len(), 1);
}

#[test]
fn test_submit_success_clears_and_refetches() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::SetSplit(SplitChoice::Yes));
    let effects = app.apply(Action::Submitted(Ok(1)));
    assert!(app.tracker.is_empty());
    assert!(matches!(effects[0], Effect::FetchTransactions { .. }));
}

#[test]
fn test_submit_failure_keeps_edits() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::SetSplit(SplitChoice::Yes));
    let effects = app.apply(Action::Submitted(Err(Error::Network {
        status: Some(500),
        message: "boom".into(),
    })));
    assert!(effects.is_empty());
    assert_eq!(app.tracker.len(), 1);
    assert!(!app.submitting);
    assert!(app.status_message.contains("boom"));
}

#[test]
fn test_edits_paused_while_submitting() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1)), txn("b", "m", dec!(-2))]);
    app.apply(Action::CategoriesLoaded(Ok(vec![Category::new("Food", dec!(50))])));
    app.apply(Action::SetSplit(SplitChoice::Yes));
    app.apply(Action::RequestSubmit);
    app.apply(Action::Confirm(true));
    assert!(app.submitting);

    app.apply(Action::CursorDown);
    app.apply(Action::SetSplit(SplitChoice::No));
    app.apply(Action::CycleSplit);
    app.apply(Action::SetCategory("Food".into()));
    app.apply(Action::CycleCategory(1));
    assert!(app.tracker.get("b").is_none());
    assert!(app.status_message.contains("in progress"));

    app.apply(Action::Submitted(Ok(1)));
    assert!(app.tracker.is_empty());
    app.apply(Action::SetSplit(SplitChoice::No));
    assert_eq!(app.tracker.get("b").unwrap().split, Some(SplitChoice::No));
}

#[test]
fn test_submit_without_identity_prompts_login() {
    let mut app = App::new(review_config(), None);
    app.apply(Action::TransactionsLoaded {
        seq: 0,
        result: Ok(vec![txn("a", "m", dec!(-1))]),
    });
    app.apply(Action::SetSplit(SplitChoice::Yes));
    app.apply(Action::RequestSubmit);
    assert_eq!(app.input_mode, InputMode::Login);
}

// ── Sorting ───────────────────────────────────────────────────

#[test]
fn test_sort_toggle_first_click_descends() {
    let mut app = loaded(vec![
        txn("small", "m", dec!(-1)),
        txn("large", "m", dec!(-100)),
        txn("mid", "m", dec!(-10)),
    ]);
    app.apply(Action::Sort(SortColumn::Amount));
    let order: Vec<String> = app.review_sections()[0]
        .rows
        .iter()
        .map(|r| r.hash.clone())
        .collect();
    assert_eq!(order, vec!["small", "mid", "large"]);

    app.apply(Action::Sort(SortColumn::Amount));
    assert_eq!(app.review_sections()[0].rows[0].hash, "large");
}

// ── Dashboard and detail ──────────────────────────────────────

#[test]
fn test_dashboard_fetches_report_once() {
    let mut app = app();
    let effects = app.apply(Action::SwitchScreen(Screen::Dashboard));
    assert_eq!(
        effects,
        vec![Effect::FetchReport {
            seq: 1,
            filter: TransactionFilter::with_status("reviewed"),
        }]
    );
    app.apply(Action::ReportLoaded {
        seq: 1,
        result: Ok(vec![txn("a", "m", dec!(-1))]),
    });
    app.apply(Action::SwitchScreen(Screen::Review));
    assert!(app.apply(Action::SwitchScreen(Screen::Dashboard)).is_empty());
}

#[test]
fn test_report_uses_configured_date_param_names() {
    let mut config = review_config();
    config.report_date_params = DateParams {
        start: "transactionStartDate".into(),
        end: "transactionEndDate".into(),
    };
    let mut app = App::new(config, Some("U".into()));
    let effects = app.apply(Action::SwitchScreen(Screen::Dashboard));
    let Effect::FetchReport { filter, .. } = &effects[0] else {
        panic!("expected report fetch, got {effects:?}");
    };
    assert_eq!(filter.date_params.start, "transactionStartDate");
    assert_eq!(app.filter.date_params, DateParams::default());
}

#[test]
fn test_date_filter_targets_active_screen() {
    let mut app = app();
    app.apply(Action::SwitchScreen(Screen::Dashboard));
    let date = NaiveDate::from_ymd_opt(2024, 1, 1);
    let effects = app.apply(Action::SetDate(DateBound::CsvStart, date));
    assert_eq!(app.report_filter.csv_start_date, date);
    assert_eq!(app.filter.csv_start_date, None);
    assert!(matches!(effects[0], Effect::FetchReport { seq: 2, .. }));
}

#[test]
fn test_open_category_hands_off_filtered_records() {
    let mut app = app();
    app.apply(Action::SwitchScreen(Screen::Dashboard));
    let mut food = txn("a", "m", dec!(-5));
    food.category = Some("Food".into());
    let mut rent = txn("b", "m", dec!(-500));
    rent.category = Some("Rent".into());
    app.apply(Action::ReportLoaded {
        seq: 1,
        result: Ok(vec![food, rent]),
    });

    app.apply(Action::CursorDown);
    let effects = app.apply(Action::OpenSelectedCategory);
    let Effect::StoreHandoff(handoff) = &effects[0] else {
        panic!("expected handoff, got {effects:?}");
    };
    assert_eq!(handoff.category, "Rent");
    assert_eq!(handoff.records.len(), 1);
    assert_eq!(effects[1], Effect::TakeHandoff);

    let handoff = handoff.clone();
    app.apply(Action::DetailLoaded(Ok(Some(handoff))));
    assert_eq!(app.screen, Screen::Detail);
    assert_eq!(app.detail.as_ref().unwrap().category, "Rent");
}

#[test]
fn test_detail_sort_reorders_records() {
    let mut app = app();
    let records = vec![txn("a", "m", dec!(-5)), txn("b", "m", dec!(-50))];
    app.apply(Action::DetailLoaded(Ok(Some(CategoryHandoff {
        category: "Food".into(),
        records,
    }))));
    app.apply(Action::Sort(SortColumn::Amount));
    let detail = app.detail.as_ref().unwrap();
    assert_eq!(detail.records[0].hash, "a");
    assert!(app.sort.active().is_none());
}

// ── Session ───────────────────────────────────────────────────

#[test]
fn test_login_saves_and_refetches() {
    let mut app = App::new(review_config(), None);
    app.input_mode = InputMode::Login;
    let session = Session::new("U2", None);
    let effects = app.apply(Action::Login(session.clone()));
    assert_eq!(effects[0], Effect::SaveSession(session));
    assert!(matches!(effects[1], Effect::FetchTransactions { .. }));
    assert_eq!(app.user_id.as_deref(), Some("U2"));
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_logout_requires_confirmation() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::SetSplit(SplitChoice::Yes));
    assert!(app.apply(Action::RequestLogout).is_empty());
    let effects = app.apply(Action::Confirm(true));
    assert_eq!(effects, vec![Effect::ClearSession]);
    assert!(app.cache.is_empty());
    assert!(app.tracker.is_empty());
    assert_eq!(app.input_mode, InputMode::Login);
}

#[test]
fn test_logout_drops_responses_in_flight() {
    let mut app = loaded(vec![txn("a", "m", dec!(-1))]);
    app.apply(Action::SwitchScreen(Screen::Dashboard));
    app.apply(Action::SwitchScreen(Screen::Review));
    let effects = app.apply(Action::Refresh);
    let seq = match &effects[0] {
        Effect::FetchTransactions { seq, .. } => *seq,
        other => panic!("unexpected effect {other:?}"),
    };

    app.apply(Action::RequestLogout);
    app.apply(Action::Confirm(true));
    assert!(!app.loading());

    app.apply(Action::TransactionsLoaded {
        seq,
        result: Ok(vec![txn("b", "m", dec!(-1))]),
    });
    app.apply(Action::ReportLoaded {
        seq: 1,
        result: Ok(vec![txn("c", "m", dec!(-1))]),
    });
    assert!(app.cache.is_empty());
    assert!(app.report.is_empty());
    assert_eq!(app.input_mode, InputMode::Login);
}
