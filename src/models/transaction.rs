use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Grouping label used when a record carries no mapping config.
pub(crate) const UNKNOWN_MAPPING: &str = "Unknown";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// A transaction as returned by the remote list endpoint. `hash` is the
/// identity; every other field may change on the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Transaction {
    pub(crate) hash: String,
    #[serde(default)]
    pub(crate) userid: Option<String>,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    #[serde(default)]
    pub(crate) transaction_date: String,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_split")]
    pub(crate) split: Option<bool>,
    #[serde(default)]
    pub(crate) after_split_amount: Option<Decimal>,
    #[serde(default)]
    pub(crate) partner_after_split_amount: Option<Decimal>,
    #[serde(default)]
    pub(crate) mapping_config_name: Option<String>,
    #[serde(default)]
    pub(crate) date_csv_added: Option<String>,
    #[serde(default)]
    pub(crate) need: Option<bool>,
    #[serde(default)]
    pub(crate) status: Option<String>,
}

impl Transaction {
    #[cfg(test)]
    pub(crate) fn new(hash: impl Into<String>, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            hash: hash.into(),
            userid: None,
            description: description.into(),
            amount,
            transaction_date: String::new(),
            category: None,
            split: None,
            after_split_amount: None,
            partner_after_split_amount: None,
            mapping_config_name: None,
            date_csv_added: None,
            need: None,
            status: None,
        }
    }

    pub(crate) fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    /// The grouping key. Missing or empty values group under "Unknown".
    pub(crate) fn mapping_config(&self) -> &str {
        match self.mapping_config_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_MAPPING,
        }
    }

    pub(crate) fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.transaction_date)
    }
}

/// Parse a calendar date, ignoring any time component after the date.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.get(..10).unwrap_or(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// The update endpoint stores "yes"/"no" while imports store booleans, so
/// both shapes show up in list responses.
fn deserialize_split<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSplit {
        Bool(bool),
        Text(String),
    }

    let raw: Option<RawSplit> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawSplit::Bool(b)) => Some(b),
        Some(RawSplit::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Some(true),
            "no" | "false" => Some(false),
            _ => None,
        },
        None => None,
    })
}
