use regex::Regex;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{Transaction, UNKNOWN_MAPPING};

const AXIS_STEP: u32 = 50;
const LABEL_MAX: usize = 15;
const LABEL_KEEP: usize = 12;

const DEFAULT_RULES: &[(&str, &str)] = &[
    (r"(?i)target", "Target"),
    (r"(?i)walmart", "Walmart"),
    (r"(?i)starbucks", "Starbucks"),
    (r"(?i)amazon|amzn", "Amazon"),
];

/// Ordered vendor-name rules matched against the description text. The
/// first matching rule names the vendor.
pub(crate) struct VendorRules {
    rules: Vec<VendorRule>,
}

struct VendorRule {
    regex: Regex,
    vendor: String,
}

impl VendorRules {
    /// Invalid patterns are skipped with a warning rather than failing
    /// the whole chart.
    pub(crate) fn new(rules: &[(&str, &str)]) -> Self {
        let compiled = rules
            .iter()
            .filter_map(|(pattern, vendor)| match Regex::new(pattern) {
                Ok(regex) => Some(VendorRule {
                    regex,
                    vendor: (*vendor).to_string(),
                }),
                Err(e) => {
                    warn!(pattern, error = %e, "ignoring invalid vendor rule");
                    None
                }
            })
            .collect();
        Self { rules: compiled }
    }

    /// Rule name on a match, otherwise the trimmed description.
    pub(crate) fn normalize(&self, description: &str) -> String {
        if let Some(rule) = self.rules.iter().find(|r| r.regex.is_match(description)) {
            return rule.vendor.clone();
        }
        let trimmed = description.trim();
        if trimmed.is_empty() {
            UNKNOWN_MAPPING.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for VendorRules {
    fn default() -> Self {
        Self::new(DEFAULT_RULES)
    }
}

/// Absolute spend per vendor, largest first. Equal totals keep the order
/// in which the vendor was first seen.
pub(crate) fn vendor_totals(records: &[Transaction], rules: &VendorRules) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for record in records {
        let vendor = rules.normalize(&record.description);
        match totals.iter_mut().find(|(name, _)| *name == vendor) {
            Some((_, sum)) => *sum += record.abs_amount(),
            None => totals.push((vendor, record.abs_amount())),
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

/// Bar chart axis maximum: the largest total rounded up to the next
/// multiple of 50. Zero when there is nothing to chart.
pub(crate) fn axis_max(totals: &[(String, Decimal)]) -> Decimal {
    let step = Decimal::from(AXIS_STEP);
    totals
        .iter()
        .map(|(_, amount)| *amount)
        .max()
        .filter(|max| max.is_sign_positive() && !max.is_zero())
        .map(|max| (max / step).ceil() * step)
        .unwrap_or(Decimal::ZERO)
}

pub(crate) fn vendor_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX {
        let kept: String = name.chars().take(LABEL_KEEP).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
#[path = "vendor_tests.rs"]
mod tests;
