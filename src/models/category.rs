use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Category {
    #[serde(rename = "category")]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) split_percent: Option<Decimal>,
    #[serde(default)]
    pub(crate) need: Option<bool>,
}

impl Category {
    #[cfg(test)]
    pub(crate) fn new(name: impl Into<String>, split_percent: Decimal) -> Self {
        Self {
            name: name.into(),
            split_percent: Some(split_percent),
            need: None,
        }
    }

    /// A split percent of zero means transactions in this category are never shared.
    pub(crate) fn is_never_split(&self) -> bool {
        self.split_percent.is_some_and(|p| p.is_zero())
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub(crate) fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    pub(crate) fn position(categories: &[Category], name: &str) -> Option<usize> {
        categories.iter().position(|c| c.name == name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
