//! Typed predicate tree, the output of compilation

use super::ast::CompareOp;
use chrono::{Datelike, NaiveDateTime};
use regex::Regex;

/// Field extracted through the `.dt` accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
    Quarter,
    /// Monday is 0
    DayOfWeek,
}

impl DatePart {
    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "year" => Some(Self::Year),
            "month" => Some(Self::Month),
            "day" => Some(Self::Day),
            "quarter" => Some(Self::Quarter),
            "dayofweek" | "day_of_week" | "weekday" => Some(Self::DayOfWeek),
            _ => None,
        }
    }

    pub fn extract(self, value: &NaiveDateTime) -> f64 {
        let part = match self {
            Self::Year => value.year(),
            Self::Month => value.month() as i32,
            Self::Day => value.day() as i32,
            Self::Quarter => (value.month0() / 3 + 1) as i32,
            Self::DayOfWeek => value.weekday().num_days_from_monday() as i32,
        };
        f64::from(part)
    }
}

/// Derivation applied to a column before it is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    DatePart(DatePart),
    Upper,
    Lower,
}

/// Kind of value an operand yields per row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
    Date,
}

impl ValueKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "numbers",
            Self::Date => "dates",
        }
    }
}

/// A dataset column, optionally derived
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    /// Position of the column in the dataset
    pub column: usize,
    pub name: String,
    pub kind: ValueKind,
    pub transform: Option<Transform>,
}

impl Operand {
    pub fn with_transform(&self, transform: Transform, kind: ValueKind) -> Self {
        Self {
            column: self.column,
            name: self.name.clone(),
            kind,
            transform: Some(transform),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Rhs {
    Constant(Constant),
    Column(Operand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Operand,
    pub op: CompareOp,
    pub right: Rhs,
    /// Compare text upper-cased on both sides
    pub fold_case: bool,
}

#[derive(Debug, Clone)]
pub enum TextPattern {
    Regex(Regex),
    Prefix { values: Vec<String>, fold_case: bool },
    Suffix { values: Vec<String>, fold_case: bool },
}

#[derive(Debug, Clone)]
pub struct TextMatch {
    pub operand: Operand,
    pub pattern: TextPattern,
    /// Result for missing cells
    pub na: bool,
}

/// Compiled filter. Every variant evaluates to a row mask.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Every row (the unfiltered `df`)
    All,
    Comparison(Comparison),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    Membership {
        operand: Operand,
        values: Vec<Constant>,
        fold_case: bool,
    },
    TextMatch(TextMatch),
    IsMissing(Operand),
}

impl Predicate {
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::All, other) | (other, Predicate::All) => other,
            (left, right) => Predicate::And(Box::new(left), Box::new(right)),
        }
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_date_parts() {
        // 2023-05-14 was a Sunday
        let value = NaiveDate::from_ymd_opt(2023, 5, 14)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(DatePart::Year.extract(&value), 2023.0);
        assert_eq!(DatePart::Month.extract(&value), 5.0);
        assert_eq!(DatePart::Day.extract(&value), 14.0);
        assert_eq!(DatePart::Quarter.extract(&value), 2.0);
        assert_eq!(DatePart::DayOfWeek.extract(&value), 6.0);
    }

    #[test]
    fn test_and_with_all_collapses() {
        let missing = Predicate::IsMissing(Operand {
            column: 0,
            name: "FECHA".into(),
            kind: ValueKind::Date,
            transform: None,
        });
        assert!(matches!(Predicate::All.and(missing.clone()), Predicate::IsMissing(_)));
        assert!(matches!(missing.and(Predicate::All), Predicate::IsMissing(_)));
    }
}
