//! The client-side review pipeline: cache, grouping and pagination,
//! sorting, edit tracking and batch submission. Nothing here touches the
//! terminal, so every stage is testable on plain data.

mod cache;
mod paging;
mod sort;
mod submit;
mod tracker;

pub(crate) use cache::TransactionCache;
pub(crate) use paging::{group_by_mapping_config, page_count, paginate, PageSize};
pub(crate) use sort::{SortColumn, SortState};
pub(crate) use submit::{build_batch, submit, submit_and_refresh};
pub(crate) use tracker::{ChangeTracker, FieldChange};
