use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SortColumn {
    Date,
    Description,
    Category,
    Amount,
    Split,
}

impl SortColumn {
    pub(crate) fn all() -> &'static [SortColumn] {
        &[
            Self::Date,
            Self::Description,
            Self::Category,
            Self::Amount,
            Self::Split,
        ]
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" | "transaction_date" => Some(Self::Date),
            "description" | "desc" => Some(Self::Description),
            "category" | "cat" => Some(Self::Category),
            "amount" | "amt" => Some(Self::Amount),
            "split" => Some(Self::Split),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Category => "category",
            Self::Amount => "amount",
            Self::Split => "split",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::Date => a.date().cmp(&b.date()),
            Self::Description => a
                .description
                .to_lowercase()
                .cmp(&b.description.to_lowercase()),
            Self::Category => {
                let ca = a.category.as_deref().unwrap_or("").to_lowercase();
                let cb = b.category.as_deref().unwrap_or("").to_lowercase();
                ca.cmp(&cb)
            }
            Self::Amount => a.amount.cmp(&b.amount),
            Self::Split => split_label(a).cmp(split_label(b)),
        }
    }
}

fn split_label(t: &Transaction) -> &'static str {
    if t.split == Some(true) {
        "yes"
    } else {
        "no"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub(crate) fn arrow(&self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

/// Per-column sort directions, remembered across re-renders. Each column
/// starts ascending, so the first toggle sorts descending.
#[derive(Debug, Clone, Default)]
pub(crate) struct SortState {
    directions: HashMap<SortColumn, SortDirection>,
    active: Option<SortColumn>,
}

impl SortState {
    pub(crate) fn toggle(&mut self, column: SortColumn) -> SortDirection {
        let dir = self.directions.entry(column).or_default();
        *dir = dir.toggled();
        self.active = Some(column);
        *dir
    }

    pub(crate) fn active(&self) -> Option<(SortColumn, SortDirection)> {
        self.active
            .map(|c| (c, self.directions.get(&c).copied().unwrap_or_default()))
    }

    /// Sort `records` by the active column, if any.
    pub(crate) fn apply(&self, records: &mut [Transaction]) {
        if let Some((column, direction)) = self.active() {
            sort_records(records, column, direction);
        }
    }
}

/// Stable sort: records with equal keys keep their current relative order
/// in both directions.
pub(crate) fn sort_records(records: &mut [Transaction], column: SortColumn, direction: SortDirection) {
    records.sort_by(|a, b| match direction {
        SortDirection::Asc => column.compare(a, b),
        SortDirection::Desc => column.compare(b, a),
    });
}

#[cfg(test)]
#[path = "sort_tests.rs"]
mod tests;
