use std::collections::HashMap;
use std::num::NonZeroUsize;

use crate::error::{Error, Result};
use crate::models::Transaction;

const DEFAULT_PAGE_SIZE: usize = 10;

/// Rows per page. `All` resolves to the size of whatever is being paged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageSize {
    Fixed(NonZeroUsize),
    All,
}

impl PageSize {
    pub(crate) fn fixed(n: usize) -> Result<Self> {
        NonZeroUsize::new(n)
            .map(Self::Fixed)
            .ok_or_else(|| Error::InvalidPageSize(n.to_string()))
    }

    /// Accepts `all` or a positive integer. Zero, negatives and anything
    /// else are rejected before any page math happens.
    pub(crate) fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<usize>()
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self::Fixed)
            .ok_or_else(|| Error::InvalidPageSize(s.to_string()))
    }

    pub(crate) fn resolve(self, total: usize) -> usize {
        match self {
            Self::Fixed(n) => n.get(),
            Self::All => total,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        NonZeroUsize::new(DEFAULT_PAGE_SIZE).map_or(Self::All, Self::Fixed)
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::All => write!(f, "all"),
        }
    }
}

/// One partition produced by [`group_by`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Group<'a, T> {
    pub(crate) key: String,
    pub(crate) records: Vec<&'a T>,
}

/// Partition `records` by `key_fn`. Groups appear in order of first
/// occurrence and records keep their input order within a group.
pub(crate) fn group_by<'a, T, F>(records: &'a [T], key_fn: F) -> Vec<Group<'a, T>>
where
    F: Fn(&T) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<'a, T>> = Vec::new();

    for record in records {
        let key = key_fn(record);
        match index.get(&key) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    records: vec![record],
                });
            }
        }
    }

    groups
}

pub(crate) fn group_by_mapping_config(records: &[Transaction]) -> Vec<Group<'_, Transaction>> {
    group_by(records, |t| t.mapping_config().to_string())
}

/// The slice `[(page-1)*size, page*size)`, clamped to the input. Out of
/// range pages (including page 0) yield an empty slice.
pub(crate) fn paginate<T>(records: &[T], size: PageSize, page: usize) -> &[T] {
    let size = size.resolve(records.len());
    if page == 0 || size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(size).min(records.len());
    let end = page.saturating_mul(size).min(records.len());
    &records[start..end]
}

/// `ceil(total / size)`. An empty input has zero pages.
pub(crate) fn page_count(total: usize, size: PageSize) -> usize {
    let size = size.resolve(total);
    if total == 0 || size == 0 {
        return 0;
    }
    total.div_ceil(size)
}

#[cfg(test)]
#[path = "paging_tests.rs"]
mod tests;
