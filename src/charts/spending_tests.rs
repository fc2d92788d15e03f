#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn txn(hash: &str, category: Option<&str>, amount: Decimal) -> Transaction {
    let mut t = Transaction::new(hash, format!("desc {hash}"), amount);
    t.category = category.map(String::from);
    t
}

// ── category totals ───────────────────────────────────────────

#[test]
fn test_category_totals_default_misc() {
    let records = vec![
        txn("a", Some("Groceries"), dec!(-20)),
        txn("b", None, dec!(-5)),
        txn("c", Some("Groceries"), dec!(-30)),
        txn("d", Some(""), dec!(-1)),
    ];
    let totals = category_totals(&records);
    assert_eq!(
        totals,
        vec![
            ("Groceries".to_string(), dec!(50)),
            ("Misc".to_string(), dec!(6)),
        ]
    );
}

#[test]
fn test_category_totals_empty() {
    assert!(category_totals(&[]).is_empty());
}

// ── needs vs wants ────────────────────────────────────────────

#[test]
fn test_needs_wants_split() {
    let mut rent = txn("a", Some("Rent"), dec!(-1500));
    rent.need = Some(true);
    let mut games = txn("b", Some("Fun"), dec!(-60));
    games.need = Some(false);
    let unflagged = txn("c", None, dec!(-15));

    let nw = needs_wants(&[rent, games, unflagged]);
    assert_eq!(nw.needs, dec!(1500));
    assert_eq!(nw.wants, dec!(75));
}

// ── split summary ─────────────────────────────────────────────

#[test]
fn test_split_summary() {
    let mut shared = txn("a", None, dec!(-100));
    shared.split = Some(true);
    shared.after_split_amount = Some(dec!(-50));
    shared.partner_after_split_amount = Some(dec!(-50));

    let mut solo = txn("b", None, dec!(-30));
    solo.split = Some(false);
    solo.after_split_amount = Some(dec!(-30));
    solo.partner_after_split_amount = Some(dec!(0));

    let mut pending = txn("c", None, dec!(-10));
    pending.split = Some(true);

    let summary = split_summary(&[shared, solo, pending]);
    assert_eq!(summary.partner_owes, dec!(50));
    assert_eq!(summary.you_owe, dec!(80));
}

// ── filter ────────────────────────────────────────────────────

#[test]
fn test_filter_by_category() {
    let records = vec![
        txn("a", Some("Food"), dec!(-1)),
        txn("b", Some("Rent"), dec!(-2)),
        txn("c", Some("Food"), dec!(-3)),
    ];
    let food = filter_by_category(&records, "Food");
    assert_eq!(food.len(), 2);
    assert_eq!(food[0].hash, "a");
    assert_eq!(food[1].hash, "c");
    assert!(filter_by_category(&records, "Travel").is_empty());
}

#[test]
fn test_filter_misc_includes_uncategorized() {
    let records = vec![txn("a", None, dec!(-1)), txn("b", Some("Misc"), dec!(-2))];
    assert_eq!(filter_by_category(&records, "Misc").len(), 2);
}
