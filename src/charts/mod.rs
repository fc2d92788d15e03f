//! Aggregations behind the chart views. Each one runs over the full
//! transaction list, never the paginated view.

mod spending;
mod vendor;

pub(crate) use spending::{category_totals, filter_by_category, needs_wants, split_summary};
pub(crate) use vendor::{axis_max, vendor_label, vendor_totals, VendorRules};
