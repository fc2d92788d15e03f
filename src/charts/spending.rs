use rust_decimal::Decimal;
use tracing::debug;

use crate::models::Transaction;

/// Category label for records that have none.
pub(crate) const DEFAULT_CATEGORY: &str = "Misc";

fn category_key(record: &Transaction) -> &str {
    match record.category.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => DEFAULT_CATEGORY,
    }
}

/// Absolute spend per category in first-seen order (pie slices).
pub(crate) fn category_totals(records: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for record in records {
        let key = category_key(record);
        match totals.iter_mut().find(|(name, _)| name == key) {
            Some((_, sum)) => *sum += record.abs_amount(),
            None => totals.push((key.to_string(), record.abs_amount())),
        }
    }
    totals
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct NeedsWants {
    pub(crate) needs: Decimal,
    pub(crate) wants: Decimal,
}

/// Records without a need flag count as wants.
pub(crate) fn needs_wants(records: &[Transaction]) -> NeedsWants {
    records.iter().fold(NeedsWants::default(), |mut acc, r| {
        if r.need == Some(true) {
            acc.needs += r.abs_amount();
        } else {
            acc.wants += r.abs_amount();
        }
        acc
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SplitSummary {
    pub(crate) partner_owes: Decimal,
    pub(crate) you_owe: Decimal,
}

/// Who owes what across resolved splits. After-split amounts that have
/// not been computed yet are skipped.
pub(crate) fn split_summary(records: &[Transaction]) -> SplitSummary {
    let mut summary = SplitSummary::default();
    for record in records {
        if record.split == Some(true) {
            match record.partner_after_split_amount {
                Some(amount) => summary.partner_owes += amount.abs(),
                None => debug!(hash = %record.hash, "split without partner amount"),
            }
        }
        if let Some(amount) = record.after_split_amount {
            summary.you_owe += amount.abs();
        }
    }
    summary
}

/// Records whose displayed category is `category`. Uncategorized records
/// show as "Misc" in the pie, so they are included under that name.
pub(crate) fn filter_by_category(records: &[Transaction], category: &str) -> Vec<Transaction> {
    records
        .iter()
        .filter(|r| category_key(r) == category)
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "spending_tests.rs"]
mod tests;
