#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn txn(hash: &str, date: &str, desc: &str, amount: Decimal) -> Transaction {
    let mut t = Transaction::new(hash, desc, amount);
    t.transaction_date = date.into();
    t
}

fn order(records: &[Transaction]) -> Vec<&str> {
    records.iter().map(|t| t.hash.as_str()).collect()
}

#[test]
fn test_sort_by_date_compares_calendar_dates() {
    let mut records = vec![
        txn("a", "2024-10-02", "x", dec!(1)),
        txn("b", "09/30/2024", "x", dec!(1)),
        txn("c", "2024-01-15", "x", dec!(1)),
    ];
    sort_records(&mut records, SortColumn::Date, SortDirection::Asc);
    assert_eq!(order(&records), vec!["c", "b", "a"]);
    sort_records(&mut records, SortColumn::Date, SortDirection::Desc);
    assert_eq!(order(&records), vec!["a", "b", "c"]);
}

#[test]
fn test_sort_by_amount_is_numeric() {
    let mut records = vec![
        txn("a", "", "x", dec!(-100)),
        txn("b", "", "x", dec!(9.5)),
        txn("c", "", "x", dec!(-2)),
        txn("d", "", "x", dec!(10)),
    ];
    sort_records(&mut records, SortColumn::Amount, SortDirection::Asc);
    assert_eq!(order(&records), vec!["a", "c", "b", "d"]);
}

#[test]
fn test_sort_text_case_insensitive() {
    let mut records = vec![
        txn("a", "", "walmart", dec!(1)),
        txn("b", "", "Amazon", dec!(1)),
        txn("c", "", "TARGET", dec!(1)),
    ];
    sort_records(&mut records, SortColumn::Description, SortDirection::Asc);
    assert_eq!(order(&records), vec!["b", "c", "a"]);
}

#[test]
fn test_sort_category_missing_sorts_first() {
    let mut records = vec![
        txn("a", "", "x", dec!(1)),
        txn("b", "", "x", dec!(1)),
        txn("c", "", "x", dec!(1)),
    ];
    records[0].category = Some("rent".into());
    records[2].category = Some("Dining".into());
    sort_records(&mut records, SortColumn::Category, SortDirection::Asc);
    assert_eq!(order(&records), vec!["b", "c", "a"]);
}

#[test]
fn test_sort_ties_keep_original_order_both_directions() {
    let mut records = vec![
        txn("a", "", "x", dec!(5)),
        txn("b", "", "x", dec!(1)),
        txn("c", "", "x", dec!(5)),
        txn("d", "", "x", dec!(5)),
    ];
    sort_records(&mut records, SortColumn::Amount, SortDirection::Desc);
    assert_eq!(order(&records), vec!["a", "c", "d", "b"]);
    sort_records(&mut records, SortColumn::Amount, SortDirection::Asc);
    assert_eq!(order(&records), vec!["b", "a", "c", "d"]);
}

#[test]
fn test_sort_split_yes_after_no() {
    let mut records = vec![
        txn("a", "", "x", dec!(1)),
        txn("b", "", "x", dec!(1)),
        txn("c", "", "x", dec!(1)),
    ];
    records[0].split = Some(true);
    records[1].split = Some(false);
    sort_records(&mut records, SortColumn::Split, SortDirection::Asc);
    assert_eq!(order(&records), vec!["b", "c", "a"]);
}

// ── SortState ─────────────────────────────────────────────────

#[test]
fn test_toggle_remembers_direction_per_column() {
    let mut state = SortState::default();
    assert!(state.active().is_none());

    assert_eq!(state.toggle(SortColumn::Amount), SortDirection::Desc);
    assert_eq!(state.toggle(SortColumn::Date), SortDirection::Desc);
    assert_eq!(state.toggle(SortColumn::Amount), SortDirection::Asc);
    assert_eq!(
        state.active(),
        Some((SortColumn::Amount, SortDirection::Asc))
    );
}

#[test]
fn test_state_apply() {
    let mut records = vec![
        txn("a", "", "x", dec!(1)),
        txn("b", "", "x", dec!(3)),
        txn("c", "", "x", dec!(2)),
    ];
    let mut state = SortState::default();
    state.apply(&mut records);
    assert_eq!(order(&records), vec!["a", "b", "c"]);

    state.toggle(SortColumn::Amount);
    state.apply(&mut records);
    assert_eq!(order(&records), vec!["b", "c", "a"]);
}

#[test]
fn test_column_parse() {
    assert_eq!(SortColumn::parse("transaction_date"), Some(SortColumn::Date));
    assert_eq!(SortColumn::parse("Amount"), Some(SortColumn::Amount));
    assert_eq!(SortColumn::parse("bogus"), None);
    for col in SortColumn::all() {
        assert_eq!(SortColumn::parse(col.as_str()), Some(*col));
    }
}
