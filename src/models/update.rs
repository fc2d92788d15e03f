use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Status stamped on every submitted update.
pub(crate) const REVIEWED_STATUS: &str = "reviewed";

/// A resolved split decision. The unset state of the split control is
/// `Option::None` and can never be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SplitChoice {
    Yes,
    No,
}

impl SplitChoice {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Some(Self::Yes),
            "no" | "n" | "false" => Some(Self::No),
            _ => None,
        }
    }

    pub(crate) fn from_flag(flag: Option<bool>) -> Option<Self> {
        flag.map(|b| if b { Self::Yes } else { Self::No })
    }
}

impl std::fmt::Display for SplitChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "Yes"),
            Self::No => write!(f, "No"),
        }
    }
}

impl Serialize for SplitChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One element of the batch update body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct UpdateRequest {
    pub(crate) hash: String,
    pub(crate) userid: String,
    pub(crate) status: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub(crate) amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) split: Option<SplitChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<String>,
}
