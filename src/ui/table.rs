//! Projection of a page of transactions into display rows. Pure data;
//! the review screen turns these into ratatui rows.

use rust_decimal::Decimal;

use super::util::{format_amount, truncate};
use crate::models::{Category, SplitChoice, Transaction};
use crate::pipeline::ChangeTracker;

/// Three-state split control. `value == None` is the unset state, which is
/// shown but can never be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SplitControl {
    pub(crate) value: Option<SplitChoice>,
    pub(crate) locked: bool,
}

impl SplitControl {
    pub(crate) fn label(&self) -> &'static str {
        match self.value {
            None => "-",
            Some(SplitChoice::Yes) => "Yes",
            Some(SplitChoice::No) => "No",
        }
    }

    /// Next value when cycling from the keyboard. Unset is never returned.
    pub(crate) fn cycled(&self) -> SplitChoice {
        match self.value {
            None | Some(SplitChoice::No) => SplitChoice::Yes,
            Some(SplitChoice::Yes) => SplitChoice::No,
        }
    }
}

/// Category selector, present only when categories have been loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryControl {
    pub(crate) selected: Option<usize>,
    pub(crate) label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DisplayRow {
    pub(crate) seq: usize,
    pub(crate) hash: String,
    pub(crate) id: String,
    pub(crate) date: String,
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) negative: bool,
    pub(crate) after_split: String,
    pub(crate) partner_after_split: String,
    pub(crate) split: SplitControl,
    pub(crate) category: Option<CategoryControl>,
    pub(crate) edited: bool,
}

/// Currency with a two-decimal fixed format, blank when absent.
pub(crate) fn currency(amount: Option<Decimal>) -> String {
    amount.map(format_amount).unwrap_or_default()
}

pub(crate) fn project_rows(
    page: &[&Transaction],
    page_number: usize,
    page_size: usize,
    tracker: &ChangeTracker,
    categories: &[Category],
    id_len: usize,
) -> Vec<DisplayRow> {
    let offset = page_number.saturating_sub(1).saturating_mul(page_size);
    page.iter()
        .enumerate()
        .map(|(i, record)| project_row(record, offset + i + 1, tracker, categories, id_len))
        .collect()
}

fn project_row(
    record: &Transaction,
    seq: usize,
    tracker: &ChangeTracker,
    categories: &[Category],
    id_len: usize,
) -> DisplayRow {
    let category = (!categories.is_empty()).then(|| {
        let current = tracker.effective_category(record);
        let selected = current.and_then(|name| Category::position(categories, name));
        CategoryControl {
            selected,
            label: current.unwrap_or("-").to_string(),
        }
    });

    DisplayRow {
        seq,
        hash: record.hash.clone(),
        id: if id_len == 0 {
            record.hash.clone()
        } else {
            truncate(&record.hash, id_len)
        },
        date: record
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| record.transaction_date.clone()),
        description: record.description.clone(),
        amount: currency(Some(record.amount)),
        negative: record.amount.is_sign_negative(),
        after_split: currency(record.after_split_amount),
        partner_after_split: currency(record.partner_after_split_amount),
        split: SplitControl {
            value: tracker.displayed_split(record, categories),
            locked: tracker.split_locked(record, categories),
        },
        category,
        edited: tracker.get(&record.hash).is_some(),
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
