//! Parsing of animated style attribute values.
//!
//! An attribute description is either a plain quantity (`0.5`, `15px`, `80%`)
//! or, for transform-like properties, a single-argument transform function
//! wrapping a quantity (`scale(1.5)`, `translateY(15px)`).
//!
//! The parsed [`AttributeValue`] keeps the unit and wrapper apart from the
//! number so the number can be interpolated and the text rebuilt afterwards:
//!
//! ```
//! use spring_animation::attribute::AttributeValue;
//!
//! let start = AttributeValue::parse("translateY(15px)", true).unwrap();
//! assert_eq!(start.value, 15.0);
//! assert_eq!(start.with_value(30.0).to_string(), "translateY(30px)");
//! ```

use std::fmt;

use nom::branch::alt;
use nom::bytes::complete::take_while;
use nom::character::complete::{alpha1, char, digit0, digit1, multispace0, one_of};
use nom::combinator::{all_consuming, map_opt, opt, recognize};
use nom::error::{context, VerboseError, VerboseErrorKind};
use nom::sequence::{delimited, pair, tuple};
use nom::{Finish, IResult};

use crate::animation::TransformFunction;
use crate::error::{AnimationError, Result};

type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Which grammar applies to the values of a style property
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// `<number><unit>`
    Plain,
    /// `<function>(<number><unit>)`
    Transform,
}

impl PropertyKind {
    pub fn of(css_property: &str) -> Self {
        if css_property.trim() == "transform" {
            PropertyKind::Transform
        } else {
            PropertyKind::Plain
        }
    }

    pub fn is_transform_like(&self) -> bool {
        matches!(self, PropertyKind::Transform)
    }
}

/// A numeric attribute value with its unit suffix and optional wrapping
/// transform function.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeValue {
    pub value: f64,
    /// Letters or `%` directly after the number; empty when unitless
    pub unit: String,
    pub wrapper: Option<TransformFunction>,
}

impl AttributeValue {
    pub fn new(value: f64, unit: impl Into<String>, wrapper: Option<TransformFunction>) -> Self {
        Self {
            value,
            unit: unit.into(),
            wrapper,
        }
    }

    /// Parse an attribute description.
    ///
    /// With `transform_like` set, `scale(...)` is tried first, then the
    /// `translateX/Y/Z(...)` family. Otherwise the whole text must be a plain
    /// quantity. Text without a numeric literal is an error, never zero.
    pub fn parse(text: &str, transform_like: bool) -> Result<Self> {
        let parsed = if transform_like {
            context(
                "unexpected text after transform function",
                all_consuming(transform_call),
            )(text)
            .finish()
        } else {
            context(
                "unexpected text after unit",
                all_consuming(delimited(multispace0, quantity, multispace0)),
            )(text)
            .finish()
            .map(|(rest, (literal, unit))| (rest, (None, literal, unit)))
        };

        let (_, (wrapper, literal, unit)) =
            parsed.map_err(|err| AnimationError::invalid_attribute(text, error_reason(&err)))?;
        let value: f64 = literal
            .parse()
            .map_err(|_| AnimationError::invalid_attribute(text, "malformed number"))?;
        if !value.is_finite() {
            return Err(AnimationError::invalid_attribute(text, "number out of range"));
        }

        Ok(Self::new(value, unit, wrapper))
    }

    /// Same unit and wrapper, different number
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            unit: self.unit.clone(),
            wrapper: self.wrapper,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wrapper {
            Some(wrapper) => write!(f, "{}({}{})", wrapper, self.value, self.unit),
            None => write!(f, "{}{}", self.value, self.unit),
        }
    }
}

/// `<function>(<number><unit>)`, surrounding whitespace allowed
fn transform_call(input: &str) -> ParseResult<'_, (Option<TransformFunction>, &str, &str)> {
    let (input, _) = multispace0(input)?;
    let (input, wrapper) = context(
        "unsupported transform function",
        map_opt(alpha1, TransformFunction::from_name),
    )(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = context(
        "expected a transform function such as translateY(...)",
        char('('),
    )(input)?;
    let (input, (literal, unit)) = delimited(multispace0, quantity, multispace0)(input)?;
    let (input, _) = context("missing closing parenthesis", char(')'))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, (Some(wrapper), literal, unit)))
}

/// `<number><unit>`, returning the numeric literal and the unit text
fn quantity(input: &str) -> ParseResult<'_, (&str, &str)> {
    pair(
        context("no numeric value", number),
        take_while(|c: char| c.is_ascii_alphabetic() || c == '%'),
    )(input)
}

/// `[+-]? (digits [. digits] | . digits) ([eE] [+-]? digits)?`
///
/// An exponent only counts when digits follow; `1em` is one em.
fn number(input: &str) -> ParseResult<'_, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

/// Innermost context attached to a parse failure
fn error_reason(err: &VerboseError<&str>) -> &'static str {
    err.errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(ctx) => Some(*ctx),
            _ => None,
        })
        .unwrap_or("malformed value")
}
