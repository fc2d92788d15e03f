pub(crate) mod dashboard;
pub(crate) mod detail;
pub(crate) mod review;
