//! Schema entry types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Free text
    Text,
    /// Date/time; values are parsed at load time
    Date,
    /// Floating point number
    Number,
    /// Whole number
    Integer,
    /// Text restricted to a controlled vocabulary
    Categorical,
}

impl SemanticType {
    /// Name used in the backend instruction
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Categorical => "categorical",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How user-supplied comparison values are normalized for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasingRule {
    /// Compare upper-cased; stored values are upper case
    UppercaseInput,
}

/// A single registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub semantic_type: SemanticType,
    /// Only legal values; authoritative for categorical columns only
    pub allowed_values: Option<Vec<String>>,
    pub casing_rule: Option<CasingRule>,
    /// Column that must be used instead of this one
    pub redirect: Option<String>,
    pub description: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            allowed_values: None,
            casing_rule: None,
            redirect: None,
            description: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, SemanticType::Text)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, SemanticType::Date)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, SemanticType::Number)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, SemanticType::Integer)
    }

    pub fn categorical(name: impl Into<String>, values: &[&str]) -> Self {
        let mut spec = Self::new(name, SemanticType::Categorical);
        spec.allowed_values = Some(values.iter().map(|v| v.to_string()).collect());
        spec
    }

    pub fn with_casing(mut self, rule: CasingRule) -> Self {
        self.casing_rule = Some(rule);
        self
    }

    pub fn redirected_to(mut self, column: impl Into<String>) -> Self {
        self.redirect = Some(column.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn uppercases_input(&self) -> bool {
        self.casing_rule == Some(CasingRule::UppercaseInput)
    }

    /// Find the vocabulary entry matching `value`, ignoring case.
    ///
    /// Returns `None` when the column has no vocabulary or the value is not in it.
    pub fn canonical_value(&self, value: &str) -> Option<&str> {
        let vocabulary = self.allowed_values.as_ref()?;
        vocabulary
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(value.trim()))
            .map(String::as_str)
    }
}
