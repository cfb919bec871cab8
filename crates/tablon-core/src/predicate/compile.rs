//! Name resolution and type checking of a parsed expression
//!
//! The syntax tree is walked once. Every node becomes a [`Value`]; the root
//! must end up as a filtered `df` or a bare condition, anything else is a
//! shape fault.

use super::ast::{Arg, CompareOp, Expr, Literal};
use super::fault::PredicateFault;
use super::tree::{
    Comparison, Constant, DatePart, Operand, Predicate, Rhs, TextMatch, TextPattern, Transform,
    ValueKind,
};
use crate::dataset::{parse_datetime, Dataset};
use crate::schema::{SchemaRegistry, SemanticType};
use chrono::{NaiveDate, NaiveDateTime};
use regex::RegexBuilder;

type CompileResult<T> = Result<T, PredicateFault>;

/// Module names that resolve to the pandas namespace
const PANDAS_NAMES: &[&str] = &["pd", "pandas"];

#[derive(Debug, Clone)]
enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
    None,
    Date(NaiveDateTime),
}

#[derive(Debug, Clone)]
enum MethodTarget {
    Series(Operand),
    Str(Operand),
    Pandas,
}

#[derive(Debug)]
enum Value {
    /// `df`, possibly already filtered
    Frame(Predicate),
    /// `df.loc`, waiting for a subscript
    Loc(Predicate),
    Series(Operand),
    StrAccessor(Operand),
    DtAccessor(Operand),
    Method { target: MethodTarget, name: String },
    Mask(Predicate),
    Scalar(Scalar),
    List(Vec<Value>),
    Pandas,
    /// Evaluates, but is not a row subset (projection, column of a subset, ...)
    Opaque(String),
}

impl Value {
    fn describe(&self) -> String {
        match self {
            Value::Frame(_) => "the table".to_string(),
            Value::Loc(_) => "the '.loc' indexer".to_string(),
            Value::Series(operand) => format!("column '{}'", operand.name),
            Value::StrAccessor(operand) | Value::DtAccessor(operand) => {
                format!("an accessor of column '{}'", operand.name)
            }
            Value::Method { name, .. } => format!("method '{}' without a call", name),
            Value::Mask(_) => "a condition".to_string(),
            Value::Scalar(_) => "a literal".to_string(),
            Value::List(_) => "a list".to_string(),
            Value::Pandas => "the pandas module".to_string(),
            Value::Opaque(found) => found.clone(),
        }
    }
}

/// Compiles expressions against one dataset and the registry.
pub struct Compiler<'a> {
    dataset: &'a Dataset,
    registry: &'a SchemaRegistry,
}

impl<'a> Compiler<'a> {
    pub fn new(dataset: &'a Dataset, registry: &'a SchemaRegistry) -> Self {
        Self { dataset, registry }
    }

    /// Compile a whole program into a row filter.
    pub fn compile(&self, expr: &Expr) -> CompileResult<Predicate> {
        match self.value(expr)? {
            Value::Frame(predicate) | Value::Mask(predicate) => Ok(predicate),
            other => Err(PredicateFault::shape(other.describe())),
        }
    }

    fn value(&self, expr: &Expr) -> CompileResult<Value> {
        match expr {
            Expr::Frame => Ok(Value::Frame(Predicate::All)),
            Expr::Name(name) if PANDAS_NAMES.contains(&name.as_str()) => Ok(Value::Pandas),
            Expr::Name(name) => Err(PredicateFault::reference(
                name.clone(),
                Some("the only table in scope is 'df'".to_string()),
            )),
            Expr::Literal(literal) => Ok(Value::Scalar(scalar(literal))),
            Expr::List(items) => items
                .iter()
                .map(|item| self.value(item))
                .collect::<CompileResult<Vec<_>>>()
                .map(Value::List),
            Expr::Attribute { target, name } => {
                let target = self.value(target)?;
                self.attribute(target, name)
            }
            Expr::Index { target, index } => {
                let target = self.value(target)?;
                let index = self.value(index)?;
                self.subscript(target, index)
            }
            Expr::Call { target, args } => {
                let target = self.value(target)?;
                self.call(target, args)
            }
            Expr::Compare { left, op, right } => {
                let left = self.value(left)?;
                let right = self.value(right)?;
                self.compare(left, *op, right)
            }
            Expr::And(left, right) => {
                let left = self.condition(left, "&")?;
                let right = self.condition(right, "&")?;
                Ok(Value::Mask(Predicate::And(Box::new(left), Box::new(right))))
            }
            Expr::Or(left, right) => {
                let left = self.condition(left, "|")?;
                let right = self.condition(right, "|")?;
                Ok(Value::Mask(left.or(right)))
            }
            Expr::Not(inner) => Ok(Value::Mask(self.condition(inner, "~")?.not())),
        }
    }

    /// Compile `expr` and require a boolean condition.
    fn condition(&self, expr: &Expr, operator: &str) -> CompileResult<Predicate> {
        match self.value(expr)? {
            Value::Mask(predicate) => Ok(predicate),
            Value::Opaque(found) => Err(PredicateFault::shape(found)),
            other => Err(PredicateFault::type_mismatch(format!(
                "'{}' needs boolean conditions, found {}",
                operator,
                other.describe()
            ))),
        }
    }

    fn column(&self, name: &str) -> CompileResult<Operand> {
        if let Some(target) = self.registry.redirect_for(name) {
            return Err(PredicateFault::reference(
                name,
                Some(format!("use '{}' instead", target)),
            ));
        }

        let Some(position) = self.dataset.column_index(name) else {
            let hint = self
                .dataset
                .column_names()
                .into_iter()
                .find(|candidate| {
                    candidate.to_uppercase() == name.trim().to_uppercase()
                        && self.registry.redirect_for(candidate).is_none()
                })
                .map(|candidate| format!("did you mean '{}'?", candidate));
            return Err(PredicateFault::reference(name, hint));
        };

        let kind = match self.dataset.columns()[position].semantic_type() {
            SemanticType::Date => ValueKind::Date,
            SemanticType::Number | SemanticType::Integer => ValueKind::Number,
            SemanticType::Text | SemanticType::Categorical => ValueKind::Text,
        };
        Ok(Operand {
            column: position,
            name: name.to_string(),
            kind,
            transform: None,
        })
    }

    fn attribute(&self, target: Value, name: &str) -> CompileResult<Value> {
        match target {
            Value::Frame(predicate) => {
                if name == "loc" {
                    return Ok(Value::Loc(predicate));
                }
                let operand = self.column(name)?;
                Ok(series_of(predicate, operand))
            }
            Value::Series(operand) => match name {
                "str" if operand.kind == ValueKind::Text => Ok(Value::StrAccessor(operand)),
                "str" => Err(PredicateFault::type_mismatch(format!(
                    "'.str' needs a text column, but '{}' holds {}",
                    operand.name,
                    operand.kind.label()
                ))),
                "dt" if operand.kind == ValueKind::Date && operand.transform.is_none() => {
                    Ok(Value::DtAccessor(operand))
                }
                "dt" => Err(PredicateFault::type_mismatch(format!(
                    "'.dt' needs a date column, but '{}' holds {}",
                    operand.name,
                    operand.kind.label()
                ))),
                "isin" | "between" | "isna" | "isnull" | "notna" | "notnull" => Ok(Value::Method {
                    target: MethodTarget::Series(operand),
                    name: name.to_string(),
                }),
                _ => Err(unsupported(name, "column")),
            },
            Value::StrAccessor(operand) => match name {
                "upper" | "lower" | "contains" | "startswith" | "endswith" => Ok(Value::Method {
                    target: MethodTarget::Str(operand),
                    name: name.to_string(),
                }),
                _ => Err(unsupported(name, "'.str'")),
            },
            Value::DtAccessor(operand) => match DatePart::from_attribute(name) {
                Some(part) => Ok(Value::Series(
                    operand.with_transform(Transform::DatePart(part), ValueKind::Number),
                )),
                None => Err(unsupported(name, "'.dt'")),
            },
            Value::Pandas => match name {
                "to_datetime" | "Timestamp" => Ok(Value::Method {
                    target: MethodTarget::Pandas,
                    name: name.to_string(),
                }),
                _ => Err(PredicateFault::reference(format!("pd.{}", name), None)),
            },
            Value::Opaque(found) => Ok(Value::Opaque(found)),
            other => Err(PredicateFault::reference(
                name,
                Some(format!("{} has no attributes", other.describe())),
            )),
        }
    }

    fn subscript(&self, target: Value, index: Value) -> CompileResult<Value> {
        match (target, index) {
            (Value::Frame(predicate), Value::Scalar(Scalar::Text(name))) => {
                let operand = self.column(&name)?;
                Ok(series_of(predicate, operand))
            }
            (Value::Frame(predicate) | Value::Loc(predicate), Value::Mask(mask)) => {
                Ok(Value::Frame(predicate.and(mask)))
            }
            (Value::Frame(_), Value::List(items)) => {
                for item in &items {
                    if let Value::Scalar(Scalar::Text(name)) = item {
                        self.column(name)?;
                    }
                }
                Ok(Value::Opaque("a column projection".to_string()))
            }
            (Value::Loc(_), Value::List(items)) if items.len() == 2 => {
                Ok(Value::Opaque("a column projection".to_string()))
            }
            (Value::Frame(_) | Value::Loc(_), Value::Opaque(found)) => {
                Err(PredicateFault::shape(found))
            }
            (Value::Frame(_) | Value::Loc(_), other) => Err(PredicateFault::type_mismatch(
                format!("rows can only be selected with a condition, found {}", other.describe()),
            )),
            (Value::Opaque(found), _) => Ok(Value::Opaque(found)),
            (Value::Series(operand), _) => {
                Ok(Value::Opaque(format!("a subset of column '{}'", operand.name)))
            }
            (other, _) => Err(PredicateFault::type_mismatch(format!(
                "{} cannot be subscripted",
                other.describe()
            ))),
        }
    }

    fn call(&self, target: Value, args: &[Arg]) -> CompileResult<Value> {
        let (target, name) = match target {
            Value::Method { target, name } => (target, name),
            Value::Opaque(found) => return Ok(Value::Opaque(found)),
            other => {
                return Err(PredicateFault::type_mismatch(format!(
                    "{} is not callable",
                    other.describe()
                )));
            }
        };

        let mut positional = Vec::new();
        let mut keywords = Vec::new();
        for arg in args {
            let value = self.value(&arg.value)?;
            match &arg.name {
                Some(keyword) => keywords.push((keyword.clone(), value)),
                None => positional.push(value),
            }
        }
        let call = CallArgs {
            method: name.clone(),
            positional,
            keywords,
        };

        match (target, name.as_str()) {
            (MethodTarget::Series(operand), "isin") => {
                let [values] = call.bind(["values"])?;
                self.membership(operand, required(values, "isin", "values")?)
            }
            (MethodTarget::Series(operand), "between") => {
                let [left, right, inclusive] = call.bind(["left", "right", "inclusive"])?;
                self.between(
                    operand,
                    required(left, "between", "left")?,
                    required(right, "between", "right")?,
                    inclusive,
                )
            }
            (MethodTarget::Series(operand), "isna" | "isnull") => {
                call.bind::<0>([])?;
                Ok(Value::Mask(Predicate::IsMissing(operand)))
            }
            (MethodTarget::Series(operand), "notna" | "notnull") => {
                call.bind::<0>([])?;
                Ok(Value::Mask(Predicate::IsMissing(operand).not()))
            }
            (MethodTarget::Str(operand), "upper") => {
                call.bind::<0>([])?;
                Ok(Value::Series(operand.with_transform(Transform::Upper, ValueKind::Text)))
            }
            (MethodTarget::Str(operand), "lower") => {
                call.bind::<0>([])?;
                Ok(Value::Series(operand.with_transform(Transform::Lower, ValueKind::Text)))
            }
            (MethodTarget::Str(operand), "contains") => {
                let [pat, case, flags, na, regex] =
                    call.bind(["pat", "case", "flags", "na", "regex"])?;
                self.contains(operand, required(pat, "contains", "pat")?, case, flags, na, regex)
            }
            (MethodTarget::Str(operand), "startswith" | "endswith") => {
                let [pat, na] = call.bind(["pat", "na"])?;
                self.affix(operand, &name, required(pat, &name, "pat")?, na)
            }
            (MethodTarget::Pandas, "to_datetime") => {
                let [arg, _format, _errors, _dayfirst] =
                    call.bind(["arg", "format", "errors", "dayfirst"])?;
                to_datetime(required(arg, "to_datetime", "arg")?)
            }
            (MethodTarget::Pandas, "Timestamp") => {
                let [first, month, day] = call.bind(["ts_input", "month", "day"])?;
                timestamp(required(first, "Timestamp", "ts_input")?, month, day)
            }
            (_, other) => Err(PredicateFault::reference(other, None)),
        }
    }

    fn compare(&self, left: Value, op: CompareOp, right: Value) -> CompileResult<Value> {
        match (left, right) {
            (Value::Opaque(found), _) | (_, Value::Opaque(found)) => Err(PredicateFault::shape(found)),
            (Value::Series(left), Value::Series(right)) => {
                if left.kind != right.kind {
                    return Err(PredicateFault::type_mismatch(format!(
                        "cannot compare '{}' ({}) with '{}' ({})",
                        left.name,
                        left.kind.label(),
                        right.name,
                        right.kind.label()
                    )));
                }
                let fold_case = self.folds_case(&left) || self.folds_case(&right);
                Ok(Value::Mask(Predicate::Comparison(Comparison {
                    left,
                    op,
                    right: Rhs::Column(right),
                    fold_case,
                })))
            }
            (Value::Series(operand), Value::Scalar(value)) => self.compare_constant(operand, op, value),
            (Value::Scalar(value), Value::Series(operand)) => {
                self.compare_constant(operand, op.flipped(), value)
            }
            (Value::Mask(mask), Value::Scalar(Scalar::Bool(flag)))
            | (Value::Scalar(Scalar::Bool(flag)), Value::Mask(mask))
                if !op.is_ordering() =>
            {
                let keep = flag == (op == CompareOp::Eq);
                Ok(Value::Mask(if keep { mask } else { mask.not() }))
            }
            (Value::Scalar(_), Value::Scalar(_)) => Ok(Value::Opaque("a literal".to_string())),
            (left, right) => Err(PredicateFault::type_mismatch(format!(
                "cannot compare {} with {} using '{}'",
                left.describe(),
                right.describe(),
                op.symbol()
            ))),
        }
    }

    fn compare_constant(&self, operand: Operand, op: CompareOp, value: Scalar) -> CompileResult<Value> {
        if let Scalar::None = value {
            return match op {
                CompareOp::Eq => Ok(Value::Mask(Predicate::IsMissing(operand))),
                CompareOp::Ne => Ok(Value::Mask(Predicate::IsMissing(operand).not())),
                _ => Err(PredicateFault::type_mismatch(format!(
                    "'{}' cannot be used with None",
                    op.symbol()
                ))),
            };
        }
        let constant = self.constant(&operand, value)?;
        let fold_case = self.folds_case(&operand);
        Ok(Value::Mask(Predicate::Comparison(Comparison {
            left: operand,
            op,
            right: Rhs::Constant(constant),
            fold_case,
        })))
    }

    /// Check a literal against the operand's kind and vocabulary.
    fn constant(&self, operand: &Operand, value: Scalar) -> CompileResult<Constant> {
        let mismatch = |found: &str| {
            PredicateFault::type_mismatch(format!(
                "column '{}' holds {}, but was compared with {}",
                operand.name,
                operand.kind.label(),
                found
            ))
        };

        match (operand.kind, value) {
            (ValueKind::Date, Scalar::Date(date)) => Ok(Constant::Date(date)),
            (ValueKind::Date, Scalar::Text(text)) => parse_datetime(&text)
                .map(Constant::Date)
                .ok_or_else(|| invalid_date(&text)),
            (ValueKind::Number, Scalar::Number(number)) => Ok(Constant::Number(number)),
            (ValueKind::Text, Scalar::Text(text)) => {
                if operand.transform.is_some() {
                    return Ok(Constant::Text(text));
                }
                let Some(spec) = self.registry.column_exact(&operand.name) else {
                    return Ok(Constant::Text(text));
                };
                match &spec.allowed_values {
                    Some(allowed) => spec
                        .canonical_value(&text)
                        .map(|canonical| Constant::Text(canonical.to_string()))
                        .ok_or_else(|| {
                            PredicateFault::type_mismatch(format!(
                                "'{}' is not a valid value for '{}'; allowed values: {}",
                                text,
                                operand.name,
                                allowed.join(", ")
                            ))
                        }),
                    None => Ok(Constant::Text(text)),
                }
            }
            (_, Scalar::Text(text)) => Err(mismatch(&format!("text '{}'", text))),
            (_, Scalar::Number(number)) => Err(mismatch(&format!("number {}", number))),
            (_, Scalar::Date(_)) => Err(mismatch("a date")),
            (_, Scalar::Bool(flag)) => Err(mismatch(if flag { "True" } else { "False" })),
            (_, Scalar::None) => Err(mismatch("None")),
        }
    }

    fn folds_case(&self, operand: &Operand) -> bool {
        operand.transform.is_none()
            && self
                .registry
                .column_exact(&operand.name)
                .is_some_and(|spec| spec.uppercases_input())
    }

    fn membership(&self, operand: Operand, values: Value) -> CompileResult<Value> {
        let items = match values {
            Value::List(items) => items,
            other => {
                return Err(PredicateFault::type_mismatch(format!(
                    "'isin' needs a list of values, found {}",
                    other.describe()
                )));
            }
        };

        let mut constants = Vec::with_capacity(items.len());
        let mut includes_missing = false;
        for item in items {
            match item {
                Value::Scalar(Scalar::None) => includes_missing = true,
                Value::Scalar(value) => constants.push(self.constant(&operand, value)?),
                other => {
                    return Err(PredicateFault::type_mismatch(format!(
                        "'isin' values must be literals, found {}",
                        other.describe()
                    )));
                }
            }
        }

        let fold_case = self.folds_case(&operand);
        let membership = Predicate::Membership {
            operand: operand.clone(),
            values: constants,
            fold_case,
        };
        Ok(Value::Mask(if includes_missing {
            membership.or(Predicate::IsMissing(operand))
        } else {
            membership
        }))
    }

    fn between(
        &self,
        operand: Operand,
        left: Value,
        right: Value,
        inclusive: Option<Value>,
    ) -> CompileResult<Value> {
        let (low_closed, high_closed) = match inclusive {
            None => (true, true),
            Some(Value::Scalar(Scalar::Bool(flag))) => (flag, flag),
            Some(Value::Scalar(Scalar::Text(mode))) => match mode.as_str() {
                "both" => (true, true),
                "neither" => (false, false),
                "left" => (true, false),
                "right" => (false, true),
                _ => {
                    return Err(PredicateFault::type_mismatch(format!(
                        "inclusive must be one of 'both', 'neither', 'left', 'right', found '{}'",
                        mode
                    )));
                }
            },
            Some(other) => {
                return Err(PredicateFault::type_mismatch(format!(
                    "inclusive must be a string, found {}",
                    other.describe()
                )));
            }
        };

        let bound = |value: Value, name: &str| match value {
            Value::Scalar(scalar) if !matches!(scalar, Scalar::None) => Ok(scalar),
            other => Err(PredicateFault::type_mismatch(format!(
                "'between' {} bound must be a literal, found {}",
                name,
                other.describe()
            ))),
        };
        let low = bound(left, "lower")?;
        let high = bound(right, "upper")?;

        let low_op = if low_closed { CompareOp::Ge } else { CompareOp::Gt };
        let high_op = if high_closed { CompareOp::Le } else { CompareOp::Lt };
        let Value::Mask(lower) = self.compare_constant(operand.clone(), low_op, low)? else {
            return Err(PredicateFault::unknown("'between' lower bound did not compile"));
        };
        let Value::Mask(upper) = self.compare_constant(operand, high_op, high)? else {
            return Err(PredicateFault::unknown("'between' upper bound did not compile"));
        };
        Ok(Value::Mask(Predicate::And(Box::new(lower), Box::new(upper))))
    }

    fn contains(
        &self,
        operand: Operand,
        pat: Value,
        case: Option<Value>,
        flags: Option<Value>,
        na: Option<Value>,
        regex: Option<Value>,
    ) -> CompileResult<Value> {
        let pattern = text_argument(pat, "contains", "pat")?;
        let case_sensitive = flag_argument(case, "case", true)?;
        let is_regex = flag_argument(regex, "regex", true)?;
        let na = na_argument(na)?;
        match flags {
            None => {}
            Some(Value::Scalar(Scalar::Number(flags))) if flags == 0.0 => {}
            Some(other) => {
                return Err(PredicateFault::type_mismatch(format!(
                    "'flags' is not supported, found {}",
                    other.describe()
                )));
            }
        }

        let source = if is_regex {
            pattern
        } else {
            regex::escape(&pattern)
        };
        let compiled = RegexBuilder::new(&source)
            .case_insensitive(!case_sensitive || self.folds_case(&operand))
            .build()
            .map_err(|e| PredicateFault::unknown(format!("invalid pattern '{}': {}", source, e)))?;

        Ok(Value::Mask(Predicate::TextMatch(TextMatch {
            operand,
            pattern: TextPattern::Regex(compiled),
            na,
        })))
    }

    fn affix(&self, operand: Operand, method: &str, pat: Value, na: Option<Value>) -> CompileResult<Value> {
        let values = match pat {
            Value::List(items) => items
                .into_iter()
                .map(|item| text_argument(item, method, "pat"))
                .collect::<CompileResult<Vec<_>>>()?,
            single => vec![text_argument(single, method, "pat")?],
        };
        let fold_case = self.folds_case(&operand);
        let pattern = if method == "startswith" {
            TextPattern::Prefix { values, fold_case }
        } else {
            TextPattern::Suffix { values, fold_case }
        };
        Ok(Value::Mask(Predicate::TextMatch(TextMatch {
            operand,
            pattern,
            na: na_argument(na)?,
        })))
    }
}

/// Column reached through `df`; columns of a filtered frame are not conditions.
fn series_of(frame: Predicate, operand: Operand) -> Value {
    match frame {
        Predicate::All => Value::Series(operand),
        _ => Value::Opaque(format!("column '{}' of a filtered table", operand.name)),
    }
}

fn scalar(literal: &Literal) -> Scalar {
    match literal {
        Literal::Str(text) => Scalar::Text(text.clone()),
        Literal::Number(number) => Scalar::Number(*number),
        Literal::Bool(flag) => Scalar::Bool(*flag),
        Literal::None => Scalar::None,
    }
}

fn unsupported(name: &str, owner: &str) -> PredicateFault {
    PredicateFault::reference(name, Some(format!("not a supported {} method", owner)))
}

fn invalid_date(text: &str) -> PredicateFault {
    PredicateFault::type_mismatch(format!("'{}' is not a valid date", text))
}

fn required(value: Option<Value>, method: &str, param: &str) -> CompileResult<Value> {
    value.ok_or_else(|| {
        PredicateFault::type_mismatch(format!("'{}' is missing argument '{}'", method, param))
    })
}

fn text_argument(value: Value, method: &str, param: &str) -> CompileResult<String> {
    match value {
        Value::Scalar(Scalar::Text(text)) => Ok(text),
        other => Err(PredicateFault::type_mismatch(format!(
            "'{}' argument '{}' must be a string, found {}",
            method,
            param,
            other.describe()
        ))),
    }
}

fn flag_argument(value: Option<Value>, param: &str, default: bool) -> CompileResult<bool> {
    match value {
        None => Ok(default),
        Some(Value::Scalar(Scalar::Bool(flag))) => Ok(flag),
        Some(other) => Err(PredicateFault::type_mismatch(format!(
            "'{}' must be True or False, found {}",
            param,
            other.describe()
        ))),
    }
}

/// `na=` value; missing cells never match unless it is `True`.
fn na_argument(value: Option<Value>) -> CompileResult<bool> {
    match value {
        None | Some(Value::Scalar(Scalar::None)) => Ok(false),
        other => flag_argument(other, "na", false),
    }
}

fn to_datetime(arg: Value) -> CompileResult<Value> {
    match arg {
        Value::Scalar(Scalar::Text(text)) => parse_datetime(&text)
            .map(|date| Value::Scalar(Scalar::Date(date)))
            .ok_or_else(|| invalid_date(&text)),
        Value::Scalar(Scalar::Date(date)) => Ok(Value::Scalar(Scalar::Date(date))),
        Value::Series(operand) if operand.kind == ValueKind::Date && operand.transform.is_none() => {
            Ok(Value::Series(operand))
        }
        other => Err(PredicateFault::type_mismatch(format!(
            "'to_datetime' needs a date string or the date column, found {}",
            other.describe()
        ))),
    }
}

fn timestamp(first: Value, month: Option<Value>, day: Option<Value>) -> CompileResult<Value> {
    match (first, month, day) {
        (text @ Value::Scalar(Scalar::Text(_)), None, None) => to_datetime(text),
        (
            Value::Scalar(Scalar::Number(year)),
            Some(Value::Scalar(Scalar::Number(month))),
            Some(Value::Scalar(Scalar::Number(day))),
        ) => NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|date| Value::Scalar(Scalar::Date(date)))
            .ok_or_else(|| invalid_date(&format!("{}-{}-{}", year, month, day))),
        _ => Err(PredicateFault::type_mismatch(
            "'Timestamp' needs a date string or year, month and day numbers",
        )),
    }
}

/// Positional and keyword arguments of one call
struct CallArgs {
    method: String,
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl CallArgs {
    /// Map the arguments onto `params` the way Python binds them.
    fn bind<const N: usize>(self, params: [&str; N]) -> CompileResult<[Option<Value>; N]> {
        if self.positional.len() > N {
            return Err(PredicateFault::type_mismatch(format!(
                "'{}' takes at most {} arguments, got {}",
                self.method,
                N,
                self.positional.len()
            )));
        }

        let mut bound: [Option<Value>; N] = std::array::from_fn(|_| None);
        for (slot, value) in self.positional.into_iter().enumerate() {
            bound[slot] = Some(value);
        }
        for (keyword, value) in self.keywords {
            let Some(slot) = params.iter().position(|param| *param == keyword) else {
                return Err(PredicateFault::type_mismatch(format!(
                    "'{}' got an unexpected argument '{}'",
                    self.method, keyword
                )));
            };
            if bound[slot].is_some() {
                return Err(PredicateFault::type_mismatch(format!(
                    "'{}' got multiple values for argument '{}'",
                    self.method, keyword
                )));
            }
            bound[slot] = Some(value);
        }
        Ok(bound)
    }
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;
