mod category;
mod transaction;
mod update;

pub(crate) use category::Category;
pub(crate) use transaction::{parse_date, Transaction, UNKNOWN_MAPPING};
pub(crate) use update::{SplitChoice, UpdateRequest, REVIEWED_STATUS};

#[cfg(test)]
mod tests;
