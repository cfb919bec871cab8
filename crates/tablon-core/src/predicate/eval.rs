//! Row-mask evaluation of a compiled predicate
//!
//! Each variant has its own function. None of them allocate anything but the
//! mask, and none of them can observe state outside the dataset.

use super::ast::CompareOp;
use super::fault::PredicateFault;
use super::tree::{Comparison, Constant, Operand, Predicate, Rhs, TextMatch, TextPattern, Transform};
use crate::dataset::{Cell, Column, Dataset};
use chrono::NaiveDateTime;
use std::borrow::Cow;
use std::cmp::Ordering;

pub type Mask = Vec<bool>;

/// Evaluate `predicate` into one flag per dataset row.
pub fn evaluate(predicate: &Predicate, dataset: &Dataset) -> Result<Mask, PredicateFault> {
    match predicate {
        Predicate::All => Ok(vec![true; dataset.row_count()]),
        Predicate::Comparison(comparison) => eval_comparison(comparison, dataset),
        Predicate::And(left, right) => {
            let left = evaluate(left, dataset)?;
            let right = evaluate(right, dataset)?;
            Ok(combine(left, right, |a, b| a && b))
        }
        Predicate::Or(left, right) => {
            let left = evaluate(left, dataset)?;
            let right = evaluate(right, dataset)?;
            Ok(combine(left, right, |a, b| a || b))
        }
        Predicate::Not(inner) => Ok(evaluate(inner, dataset)?.into_iter().map(|flag| !flag).collect()),
        Predicate::Membership {
            operand,
            values,
            fold_case,
        } => eval_membership(operand, values, *fold_case, dataset),
        Predicate::TextMatch(text_match) => eval_text_match(text_match, dataset),
        Predicate::IsMissing(operand) => eval_missing(operand, dataset),
    }
}

/// Per-row value of an operand after its transform
#[derive(Debug, Clone, PartialEq)]
enum Derived<'a> {
    Missing,
    Text(Cow<'a, str>),
    Number(f64),
    Date(NaiveDateTime),
}

fn derive(cell: &Cell, transform: Option<Transform>) -> Derived<'_> {
    match (cell, transform) {
        (Cell::Missing, _) => Derived::Missing,
        (Cell::Text(text), None) => Derived::Text(Cow::Borrowed(text)),
        (Cell::Text(text), Some(Transform::Upper)) => Derived::Text(Cow::Owned(text.to_uppercase())),
        (Cell::Text(text), Some(Transform::Lower)) => Derived::Text(Cow::Owned(text.to_lowercase())),
        (Cell::Number(number), None) => Derived::Number(*number),
        (Cell::Integer(number), None) => Derived::Number(*number as f64),
        (Cell::Date(date), None) => Derived::Date(*date),
        (Cell::Date(date), Some(Transform::DatePart(part))) => Derived::Number(part.extract(date)),
        // .str on a non-string cell and .dt on a non-date cell both give NaN
        _ => Derived::Missing,
    }
}

fn constant(value: &Constant) -> Derived<'_> {
    match value {
        Constant::Text(text) => Derived::Text(Cow::Borrowed(text)),
        Constant::Number(number) => Derived::Number(*number),
        Constant::Date(date) => Derived::Date(*date),
    }
}

fn column<'d>(operand: &Operand, dataset: &'d Dataset) -> Result<&'d Column, PredicateFault> {
    dataset.columns().get(operand.column).ok_or_else(|| {
        PredicateFault::unknown(format!("column '{}' is no longer in the table", operand.name))
    })
}

/// Missing operands satisfy only `!=`.
fn compare(left: &Derived<'_>, op: CompareOp, right: &Derived<'_>, fold_case: bool) -> bool {
    let ordering = match (left, right) {
        (Derived::Text(a), Derived::Text(b)) if fold_case => {
            Some(a.to_uppercase().cmp(&b.to_uppercase()))
        }
        (Derived::Text(a), Derived::Text(b)) => Some(a.cmp(b)),
        (Derived::Number(a), Derived::Number(b)) => a.partial_cmp(b),
        (Derived::Date(a), Derived::Date(b)) => Some(a.cmp(b)),
        _ => None,
    };

    match ordering {
        None => op == CompareOp::Ne,
        Some(ordering) => match op {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        },
    }
}

fn eval_comparison(comparison: &Comparison, dataset: &Dataset) -> Result<Mask, PredicateFault> {
    let left = column(&comparison.left, dataset)?;
    let transform = comparison.left.transform;

    match &comparison.right {
        Rhs::Constant(value) => {
            let right = constant(value);
            Ok(left
                .cells()
                .iter()
                .map(|cell| compare(&derive(cell, transform), comparison.op, &right, comparison.fold_case))
                .collect())
        }
        Rhs::Column(operand) => {
            let right = column(operand, dataset)?;
            Ok(left
                .cells()
                .iter()
                .zip(right.cells())
                .map(|(a, b)| {
                    compare(
                        &derive(a, transform),
                        comparison.op,
                        &derive(b, operand.transform),
                        comparison.fold_case,
                    )
                })
                .collect())
        }
    }
}

fn eval_membership(
    operand: &Operand,
    values: &[Constant],
    fold_case: bool,
    dataset: &Dataset,
) -> Result<Mask, PredicateFault> {
    let cells = column(operand, dataset)?.cells();
    let values: Vec<Derived<'_>> = values.iter().map(constant).collect();
    Ok(cells
        .iter()
        .map(|cell| {
            let value = derive(cell, operand.transform);
            !matches!(value, Derived::Missing)
                && values
                    .iter()
                    .any(|candidate| compare(&value, CompareOp::Eq, candidate, fold_case))
        })
        .collect())
}

fn eval_text_match(text_match: &TextMatch, dataset: &Dataset) -> Result<Mask, PredicateFault> {
    let cells = column(&text_match.operand, dataset)?.cells();
    Ok(cells
        .iter()
        .map(|cell| match derive(cell, text_match.operand.transform) {
            Derived::Text(text) => matches_pattern(&text, &text_match.pattern),
            _ => text_match.na,
        })
        .collect())
}

fn matches_pattern(text: &str, pattern: &TextPattern) -> bool {
    match pattern {
        TextPattern::Regex(regex) => regex.is_match(text),
        TextPattern::Prefix { values, fold_case } => {
            let (text, values) = folded(text, values, *fold_case);
            values.iter().any(|value| text.starts_with(&**value))
        }
        TextPattern::Suffix { values, fold_case } => {
            let (text, values) = folded(text, values, *fold_case);
            values.iter().any(|value| text.ends_with(&**value))
        }
    }
}

fn folded<'a>(text: &'a str, values: &'a [String], fold_case: bool) -> (Cow<'a, str>, Vec<Cow<'a, str>>) {
    if fold_case {
        (
            Cow::Owned(text.to_uppercase()),
            values.iter().map(|v| Cow::Owned(v.to_uppercase())).collect(),
        )
    } else {
        (
            Cow::Borrowed(text),
            values.iter().map(|v| Cow::Borrowed(v.as_str())).collect(),
        )
    }
}

fn eval_missing(operand: &Operand, dataset: &Dataset) -> Result<Mask, PredicateFault> {
    let cells = column(operand, dataset)?.cells();
    Ok(cells
        .iter()
        .map(|cell| matches!(derive(cell, operand.transform), Derived::Missing))
        .collect())
}

fn combine(left: Mask, right: Mask, op: impl Fn(bool, bool) -> bool) -> Mask {
    left.into_iter().zip(right).map(|(a, b)| op(a, b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::tree::{DatePart, ValueKind};
    use crate::schema::SemanticType;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "MARCA",
                SemanticType::Text,
                vec![
                    Cell::Text("TOYOTA".into()),
                    Cell::Missing,
                    Cell::Text("NISSAN".into()),
                ],
            ),
            Column::new(
                "FECHA",
                SemanticType::Date,
                vec![Cell::Date(date(2023, 1, 5)), Cell::Date(date(2024, 3, 1)), Cell::Missing],
            ),
        ])
        .unwrap()
    }

    fn marca() -> Operand {
        Operand {
            column: 0,
            name: "MARCA".into(),
            kind: ValueKind::Text,
            transform: None,
        }
    }

    fn year() -> Operand {
        Operand {
            column: 1,
            name: "FECHA".into(),
            kind: ValueKind::Number,
            transform: Some(Transform::DatePart(DatePart::Year)),
        }
    }

    fn compare_marca(op: CompareOp, value: &str, fold_case: bool) -> Predicate {
        Predicate::Comparison(Comparison {
            left: marca(),
            op,
            right: Rhs::Constant(Constant::Text(value.into())),
            fold_case,
        })
    }

    #[test]
    fn test_missing_cells_only_satisfy_not_equal() {
        let data = dataset();
        assert_eq!(
            evaluate(&compare_marca(CompareOp::Eq, "TOYOTA", false), &data).unwrap(),
            vec![true, false, false]
        );
        assert_eq!(
            evaluate(&compare_marca(CompareOp::Ne, "TOYOTA", false), &data).unwrap(),
            vec![false, true, true]
        );
        assert_eq!(
            evaluate(&compare_marca(CompareOp::Gt, "A", false), &data).unwrap(),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_fold_case() {
        let data = dataset();
        assert_eq!(
            evaluate(&compare_marca(CompareOp::Eq, "toyota", false), &data).unwrap(),
            vec![false, false, false]
        );
        assert_eq!(
            evaluate(&compare_marca(CompareOp::Eq, "toyota", true), &data).unwrap(),
            vec![true, false, false]
        );
    }

    #[test]
    fn test_date_part_comparison() {
        let predicate = Predicate::Comparison(Comparison {
            left: year(),
            op: CompareOp::Ge,
            right: Rhs::Constant(Constant::Number(2024.0)),
            fold_case: false,
        });
        assert_eq!(evaluate(&predicate, &dataset()).unwrap(), vec![false, true, false]);
    }

    #[test]
    fn test_membership_and_negation() {
        let membership = Predicate::Membership {
            operand: marca(),
            values: vec![Constant::Text("nissan".into()), Constant::Text("KIA".into())],
            fold_case: true,
        };
        let data = dataset();
        assert_eq!(evaluate(&membership, &data).unwrap(), vec![false, false, true]);
        assert_eq!(evaluate(&membership.not(), &data).unwrap(), vec![true, true, false]);
    }

    #[test]
    fn test_text_match_na() {
        let prefix = |na| {
            Predicate::TextMatch(TextMatch {
                operand: marca(),
                pattern: TextPattern::Prefix {
                    values: vec!["TOY".into()],
                    fold_case: false,
                },
                na,
            })
        };
        let data = dataset();
        assert_eq!(evaluate(&prefix(false), &data).unwrap(), vec![true, false, false]);
        assert_eq!(evaluate(&prefix(true), &data).unwrap(), vec![true, true, false]);
    }

    #[test]
    fn test_missing_and_conjunction() {
        let data = dataset();
        let fecha_missing = Predicate::IsMissing(Operand {
            column: 1,
            name: "FECHA".into(),
            kind: ValueKind::Date,
            transform: None,
        });
        assert_eq!(evaluate(&fecha_missing, &data).unwrap(), vec![false, false, true]);

        let both = fecha_missing.not().and(compare_marca(CompareOp::Eq, "TOYOTA", false));
        assert_eq!(evaluate(&both, &data).unwrap(), vec![true, false, false]);
        assert_eq!(evaluate(&Predicate::All, &data).unwrap(), vec![true; 3]);
    }

    #[test]
    fn test_out_of_range_column_is_unknown_fault() {
        let predicate = Predicate::IsMissing(Operand {
            column: 9,
            name: "GONE".into(),
            kind: ValueKind::Text,
            transform: None,
        });
        assert!(matches!(
            evaluate(&predicate, &dataset()),
            Err(PredicateFault::Unknown { .. })
        ));
    }
}
