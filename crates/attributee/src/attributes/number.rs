//! Bounded numeric attributes.
//!
//! [`Number`] applies a conversion to the raw value and then checks the result
//! against optional inclusive bounds. Conversions never wrap or truncate: an
//! integer that does not fit the target type, or a float with a fractional
//! part headed for an integer slot, is a conversion error.

use std::fmt;

use super::Attribute;
use crate::context::Context;
use crate::error::{AttributeError, Result};
use crate::value::{kind_of, Value};

/// A numeric type an attribute can coerce into.
pub trait Numeric: Copy + PartialOrd + fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// Default conversion from a wire value.
    fn convert(raw: &Value) -> Result<Self>;

    /// Wire form of the value. Fails for values the wire cannot carry.
    fn into_value(self) -> Result<Value>;
}

fn finite_value(value: f64) -> Result<Value> {
    if value.is_finite() {
        Ok(Value::from(value))
    } else {
        Err(conversion_error(format_args!("{} cannot be dumped", value)))
    }
}

fn conversion_error(detail: impl fmt::Display) -> AttributeError {
    AttributeError::Conversion(detail.to_string())
}

fn integer_from_value(raw: &Value) -> Result<i128> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i as i128)
            } else if let Some(u) = n.as_u64() {
                Ok(u as i128)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.is_finite() && f.fract() == 0.0 {
                    Ok(f as i128)
                } else {
                    Err(conversion_error(format_args!(
                        "{} is not an integral value",
                        n
                    )))
                }
            }
        }
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::String(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|e| conversion_error(format_args!("'{}' is not an integer ({})", s, e))),
        other => Err(conversion_error(format_args!(
            "cannot convert {} to an integer",
            kind_of(other)
        ))),
    }
}

fn float_from_value(raw: &Value) -> Result<f64> {
    let f = match raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| conversion_error(format_args!("{} is not a float", n)))?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| conversion_error(format_args!("'{}' is not a float ({})", s, e)))?,
        other => {
            return Err(conversion_error(format_args!(
                "cannot convert {} to a float",
                kind_of(other)
            )))
        }
    };
    if f.is_finite() {
        Ok(f)
    } else {
        Err(conversion_error(format_args!("{} is not a finite float", f)))
    }
}

macro_rules! integer_numeric {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn convert(raw: &Value) -> Result<Self> {
                    let wide = integer_from_value(raw)?;
                    <$t>::try_from(wide).map_err(|_| {
                        conversion_error(format_args!(
                            "{} does not fit in {}",
                            wide,
                            stringify!($t)
                        ))
                    })
                }

                fn into_value(self) -> Result<Value> {
                    Ok(Value::from(self))
                }
            }
        )*
    };
}

integer_numeric!(i8, i16, i32, i64, u8, u16, u32, u64);

impl Numeric for f64 {
    fn convert(raw: &Value) -> Result<Self> {
        float_from_value(raw)
    }

    fn into_value(self) -> Result<Value> {
        finite_value(self)
    }
}

impl Numeric for f32 {
    fn convert(raw: &Value) -> Result<Self> {
        let narrowed = float_from_value(raw)? as f32;
        if narrowed.is_finite() {
            Ok(narrowed)
        } else {
            Err(conversion_error("value does not fit in f32"))
        }
    }

    fn into_value(self) -> Result<Value> {
        finite_value(f64::from(self))
    }
}

/// Inclusive bounds, validated when declared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<N> {
    min: Option<N>,
    max: Option<N>,
}

impl<N: Numeric> Bounds<N> {
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Fails when `min > max`.
    pub fn new(min: Option<N>, max: Option<N>) -> Result<Self> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(AttributeError::InvalidDeclaration(format!(
                    "minimum {} is greater than maximum {}",
                    lo, hi
                )));
            }
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Option<N> {
        self.min
    }

    pub fn max(&self) -> Option<N> {
        self.max
    }

    pub fn check(&self, value: N) -> Result<N> {
        if let Some(max) = self.max {
            if value > max {
                return Err(AttributeError::AboveMaximum {
                    value: value.to_string(),
                    max: max.to_string(),
                });
            }
        }
        if let Some(min) = self.min {
            if value < min {
                return Err(AttributeError::BelowMinimum {
                    value: value.to_string(),
                    min: min.to_string(),
                });
            }
        }
        Ok(value)
    }
}

impl<N: Numeric> Default for Bounds<N> {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Numeric attribute: conversion followed by a bounds check.
#[derive(Debug, Clone, Copy)]
pub struct Number<N: Numeric> {
    bounds: Bounds<N>,
    conversion: fn(&Value) -> Result<N>,
}

pub type Integer = Number<i64>;
pub type Float = Number<f64>;

impl<N: Numeric> Number<N> {
    pub fn new() -> Self {
        Self {
            bounds: Bounds::unbounded(),
            conversion: N::convert,
        }
    }

    /// Accept values in `min..=max`.
    pub fn bounded(min: N, max: N) -> Result<Self> {
        Ok(Self::new().with_bounds(Bounds::new(Some(min), Some(max))?))
    }

    pub fn at_least(min: N) -> Self {
        Self::new().with_bounds(Bounds {
            min: Some(min),
            max: None,
        })
    }

    pub fn at_most(max: N) -> Self {
        Self::new().with_bounds(Bounds {
            min: None,
            max: Some(max),
        })
    }

    pub fn with_bounds(mut self, bounds: Bounds<N>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Replace the default conversion.
    pub fn with_conversion(mut self, conversion: fn(&Value) -> Result<N>) -> Self {
        self.conversion = conversion;
        self
    }

    pub fn bounds(&self) -> &Bounds<N> {
        &self.bounds
    }
}

impl<N: Numeric> Default for Number<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Numeric> Attribute for Number<N> {
    type Output = N;

    fn coerce(&self, raw: Value, _ctx: Context<'_>) -> Result<N> {
        let value = (self.conversion)(&raw)?;
        self.bounds.check(value)
    }

    fn dump(&self, value: &N) -> Result<Value> {
        value.into_value()
    }
}
