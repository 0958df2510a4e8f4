// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property values.

use catalyst_dom::NodeId;

/// The value of a component property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// Text.
    String(String),
    /// A number, with JavaScript-like text conversion.
    Number(f64),
    /// A flag.
    Boolean(bool),
    /// A single element lookup result.
    Element(Option<NodeId>),
    /// A multi-element lookup result.
    Elements(Vec<NodeId>),
}

impl PropValue {
    /// Text as an attribute would store it.
    ///
    /// Booleans render as `"true"`/`"false"`, element lookups as empty text.
    pub fn to_attribute_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Boolean(b) => if *b { "true" } else { "false" }.to_owned(),
            Self::Element(_) | Self::Elements(_) => String::new(),
        }
    }

    /// Truthiness in the JavaScript sense.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::String(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Boolean(b) => *b,
            Self::Element(e) => e.is_some(),
            Self::Elements(_) => true,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The flag, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Render a number the way `String(n)` does for the common cases.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else if n == 0.0 {
        "0".to_owned()
    } else if (1e-6..1e21).contains(&n.abs()) {
        format!("{n}")
    } else {
        // Exponent form outside the plain decimal range, with a signed exponent.
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        }
    }
}

/// Parse text the way `Number(text)` does: blank is zero, garbage is NaN.
pub(crate) fn parse_number(text: &str) -> f64 {
    let t = text.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Matches the precision of JavaScript numbers."
        )]
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    let numeric = t
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if numeric {
        t.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}
