//! Per-kind conversion, suggestion and description rules.

use std::fmt::Display;
use std::str::FromStr;

use super::{ParserKind, Value};
use crate::error::ParseError;
use crate::principal::Principal;
use crate::text::eq_ignore_case;

pub(super) fn parse_input(kind: &ParserKind, input: &str) -> Result<Value, ParseError> {
    match kind {
        ParserKind::Integer { min, max } => {
            parse_bounded(input, *min, *max, "integer").map(Value::Int)
        }
        ParserKind::Long { min, max } => parse_bounded(input, *min, *max, "long").map(Value::Long),
        ParserKind::Float { min, max } => {
            parse_bounded(input, *min, *max, "float").map(Value::Float)
        }
        ParserKind::Double { min, max } => {
            parse_bounded(input, *min, *max, "double").map(Value::Double)
        }
        ParserKind::Bool => {
            if eq_ignore_case(input, "true") {
                Ok(Value::Bool(true))
            } else if eq_ignore_case(input, "false") {
                Ok(Value::Bool(false))
            } else {
                Err(ParseError::invalid(input, "boolean"))
            }
        }
        ParserKind::String | ParserKind::Message => Ok(Value::Str(input.to_string())),
        ParserKind::Choice(options) => options
            .iter()
            .find(|option| eq_ignore_case(option, input))
            .map(|option| Value::Str(option.clone()))
            .ok_or_else(|| ParseError::invalid(input, format!("one of {}", options.join(", ")))),
        ParserKind::Custom(custom) => custom.parse(input),
    }
}

/// Parse a number and check it against inclusive bounds. NaN is out of range.
fn parse_bounded<T>(input: &str, min: T, max: T, expected: &str) -> Result<T, ParseError>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let value: T = input
        .parse()
        .map_err(|_| ParseError::invalid(input, expected))?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ParseError::out_of_range(input, min, max))
    }
}

pub(super) fn base_suggestions(
    kind: &ParserKind,
    principal: &dyn Principal,
    partial: &str,
) -> Vec<String> {
    match kind {
        ParserKind::Bool => vec!["true".to_string(), "false".to_string()],
        ParserKind::Choice(options) => options.clone(),
        ParserKind::Custom(custom) => custom.suggestions(principal, partial),
        _ => Vec::new(),
    }
}

pub(super) fn describe(kind: &ParserKind) -> (String, String) {
    let (name, help) = match kind {
        ParserKind::Integer { min, max } => (
            "integer",
            bounded_help("an integer", *min, *max, i32::MIN, i32::MAX),
        ),
        ParserKind::Long { min, max } => (
            "long",
            bounded_help("an integer", *min, *max, i64::MIN, i64::MAX),
        ),
        ParserKind::Float { min, max } => (
            "float",
            bounded_help("a decimal", *min, *max, f32::MIN, f32::MAX),
        ),
        ParserKind::Double { min, max } => (
            "double",
            bounded_help("a decimal", *min, *max, f64::MIN, f64::MAX),
        ),
        ParserKind::Bool => (
            "boolean",
            "This parameter can only contain true or false".to_string(),
        ),
        ParserKind::String => (
            "string",
            "This parameter can only contain a single word".to_string(),
        ),
        ParserKind::Message => (
            "message",
            "This parameter can only contain a string value with spaces".to_string(),
        ),
        ParserKind::Choice(options) => (
            "choice",
            format!("This parameter can only be one of: {}", options.join(", ")),
        ),
        ParserKind::Custom(custom) => {
            return (
                custom.type_name().to_string(),
                format!("This parameter must be a valid {}", custom.type_name()),
            );
        }
    };
    (name.to_string(), help)
}

fn bounded_help<T>(what: &str, min: T, max: T, lowest: T, highest: T) -> String
where
    T: PartialEq + Display,
{
    match (min == lowest, max == highest) {
        (true, true) => format!("This parameter can only contain {what} value"),
        (false, true) => format!("This parameter can only contain {what} value of at least {min}"),
        (true, false) => format!("This parameter can only contain {what} value of at most {max}"),
        (false, false) => {
            format!("This parameter can only contain {what} value between {min} and {max}")
        }
    }
}
