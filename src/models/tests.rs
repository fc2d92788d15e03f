#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use super::*;

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_deserialize_full_record() {
    let txn: Transaction = serde_json::from_value(json!({
        "hash": "abc123",
        "userid": "u1",
        "description": "STARBUCKS #42",
        "amount": -12.5,
        "transaction_date": "2024-09-14",
        "category": "Coffee",
        "split": true,
        "after_split_amount": -6.25,
        "partner_after_split_amount": -6.25,
        "mapping_config_name": "chase_credit",
        "date_csv_added": "2024-09-20T10:00:00",
        "need": false,
        "status": "pending"
    }))
    .unwrap();

    assert_eq!(txn.hash, "abc123");
    assert_eq!(txn.amount, dec!(-12.5));
    assert_eq!(txn.split, Some(true));
    assert_eq!(txn.after_split_amount, Some(dec!(-6.25)));
    assert_eq!(txn.mapping_config(), "chase_credit");
    assert_eq!(txn.date(), NaiveDate::from_ymd_opt(2024, 9, 14));
    assert_eq!(txn.date_csv_added.as_deref(), Some("2024-09-20T10:00:00"));
}

#[test]
fn test_deserialize_sparse_record() {
    let txn: Transaction = serde_json::from_value(json!({
        "hash": "a",
        "amount": -42.50,
        "split": null
    }))
    .unwrap();

    assert_eq!(txn.split, None);
    assert_eq!(txn.category, None);
    assert_eq!(txn.after_split_amount, None);
    assert_eq!(txn.mapping_config(), UNKNOWN_MAPPING);
    assert_eq!(txn.date(), None);
}

#[test]
fn test_split_accepts_yes_no_strings() {
    let yes: Transaction =
        serde_json::from_value(json!({"hash": "a", "amount": 1, "split": "yes"})).unwrap();
    let no: Transaction =
        serde_json::from_value(json!({"hash": "b", "amount": 1, "split": "No"})).unwrap();
    let junk: Transaction =
        serde_json::from_value(json!({"hash": "c", "amount": 1, "split": "maybe"})).unwrap();
    assert_eq!(yes.split, Some(true));
    assert_eq!(no.split, Some(false));
    assert_eq!(junk.split, None);
}

#[test]
fn test_amount_accepts_string_and_integer() {
    let s: Transaction =
        serde_json::from_value(json!({"hash": "a", "amount": "-3.10"})).unwrap();
    let i: Transaction = serde_json::from_value(json!({"hash": "b", "amount": 20})).unwrap();
    assert_eq!(s.amount, dec!(-3.10));
    assert_eq!(i.amount, dec!(20));
}

#[test]
fn test_empty_mapping_config_is_unknown() {
    let mut txn = Transaction::new("a", "x", Decimal::ONE);
    txn.mapping_config_name = Some(String::new());
    assert_eq!(txn.mapping_config(), "Unknown");
}

#[test]
fn test_abs_amount() {
    assert_eq!(Transaction::new("a", "x", dec!(-42.99)).abs_amount(), dec!(42.99));
    assert_eq!(Transaction::new("a", "x", dec!(42.99)).abs_amount(), dec!(42.99));
}

#[test]
fn test_parse_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
    assert_eq!(parse_date("2024-01-15"), expected);
    assert_eq!(parse_date("01/15/2024"), expected);
    assert_eq!(parse_date("2024-01-15T08:30:00"), expected);
    assert_eq!(parse_date("not a date"), None);
    assert_eq!(parse_date(""), None);
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_deserialize() {
    let cats: Vec<Category> = serde_json::from_value(json!([
        {"category": "Rent", "split_percent": 0},
        {"category": "Groceries", "split_percent": 50, "need": true},
        {"category": "Gifts"}
    ]))
    .unwrap();

    assert_eq!(cats[0].name, "Rent");
    assert!(cats[0].is_never_split());
    assert!(!cats[1].is_never_split());
    assert_eq!(cats[1].need, Some(true));
    assert!(!cats[2].is_never_split());
}

#[test]
fn test_category_find_by_name() {
    let cats = vec![Category::new("Rent", dec!(0)), Category::new("Dining", dec!(50))];
    assert_eq!(Category::find_by_name(&cats, "dining").unwrap().name, "Dining");
    assert!(Category::find_by_name(&cats, "Travel").is_none());
    assert_eq!(Category::position(&cats, "Dining"), Some(1));
}

// ── SplitChoice / UpdateRequest ───────────────────────────────

#[test]
fn test_split_choice_parse() {
    assert_eq!(SplitChoice::parse("yes"), Some(SplitChoice::Yes));
    assert_eq!(SplitChoice::parse("Y"), Some(SplitChoice::Yes));
    assert_eq!(SplitChoice::parse("no"), Some(SplitChoice::No));
    assert_eq!(SplitChoice::parse(""), None);
    assert_eq!(SplitChoice::from_flag(Some(false)), Some(SplitChoice::No));
    assert_eq!(SplitChoice::from_flag(None), None);
}

#[test]
fn test_update_request_body_omits_unchanged_fields() {
    let req = UpdateRequest {
        hash: "a".into(),
        userid: "U".into(),
        status: REVIEWED_STATUS.into(),
        amount: dec!(-42.50),
        split: Some(SplitChoice::No),
        category: None,
    };
    let body = serde_json::to_value(vec![req]).unwrap();
    assert_eq!(
        body,
        json!([{"hash": "a", "userid": "U", "status": "reviewed", "amount": -42.5, "split": "no"}])
    );
}

#[test]
fn test_update_request_with_category_only() {
    let req = UpdateRequest {
        hash: "b".into(),
        userid: "U".into(),
        status: REVIEWED_STATUS.into(),
        amount: dec!(10),
        split: None,
        category: Some("Rent".into()),
    };
    let body = serde_json::to_value(&req).unwrap();
    assert_eq!(body["category"], "Rent");
    assert!(body.get("split").is_none());
}
