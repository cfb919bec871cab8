//! Sandbox fault taxonomy

use std::fmt;

/// Why a generated predicate could not be turned into a row subset.
///
/// Faults are reported per request and never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateFault {
    /// Not parseable in the predicate language
    Syntax { message: String, position: usize },
    /// Unknown column, identifier or method, or a redirected column
    Reference { name: String, hint: Option<String> },
    /// Operation incompatible with a column's semantic type
    Type { message: String },
    /// Evaluated, but the value is not a row subset
    Shape { found: String },
    /// Anything else raised during evaluation
    Unknown { message: String },
}

impl PredicateFault {
    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    pub fn reference(name: impl Into<String>, hint: Option<String>) -> Self {
        Self::Reference {
            name: name.into(),
            hint,
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::Type {
            message: message.into(),
        }
    }

    pub fn shape(found: impl Into<String>) -> Self {
        Self::Shape {
            found: found.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Short name of the fault class, as shown to the user
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "SyntaxFault",
            Self::Reference { .. } => "ReferenceFault",
            Self::Type { .. } => "TypeFault",
            Self::Shape { .. } => "ShapeFault",
            Self::Unknown { .. } => "UnknownFault",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "TABLON_SYNTAX_FAULT",
            Self::Reference { .. } => "TABLON_REFERENCE_FAULT",
            Self::Type { .. } => "TABLON_TYPE_FAULT",
            Self::Shape { .. } => "TABLON_SHAPE_FAULT",
            Self::Unknown { .. } => "TABLON_UNKNOWN_FAULT",
        }
    }

    /// The raw payload of the fault without formatting
    pub fn detail(&self) -> &str {
        match self {
            Self::Syntax { message, .. } => message,
            Self::Reference { name, .. } => name,
            Self::Type { message } => message,
            Self::Shape { found } => found,
            Self::Unknown { message } => message,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Syntax { message, position } => {
                format!("{} at offset {}", message, position)
            }
            Self::Reference { name, hint: Some(hint) } => {
                format!("unknown or disallowed name '{}'; {}", name, hint)
            }
            Self::Reference { name, hint: None } => {
                format!("unknown or disallowed name '{}'", name)
            }
            Self::Type { message } => message.clone(),
            Self::Shape { found } => {
                format!("expression produced {} instead of a filtered table", found)
            }
            Self::Unknown { message } => message.clone(),
        }
    }
}

impl fmt::Display for PredicateFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for PredicateFault {}
