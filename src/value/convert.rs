//! Generic scalar coercion between [`Value`]s.
//!
//! The rules follow the usual runtime conversion semantics for dynamically typed property
//! values: every scalar has a textual form, strings parse into numbers and booleans,
//! integers narrow with overflow checks, floats round half to even before narrowing, and
//! object values never convert into anything but their own type.

use thiserror::Error;

use crate::value::{ScalarKind, TypeInfo, Value, ValueKind};

/// Reasons a value could not be converted to, or assigned into, a declared type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// There is no conversion between the two kinds at all
    #[error("Invalid cast from '{from}' to '{to}'")]
    InvalidCast {
        /// Runtime type of the value
        from: String,
        /// Requested target type
        to: String,
    },

    /// A string could not be parsed into the target type
    #[error("The input string '{input}' was not in a correct format for '{to}'")]
    InvalidFormat {
        /// The text that failed to parse
        input: String,
        /// Requested target type
        to: String,
    },

    /// The value does not fit into the target type
    #[error("Value {value} was either too large or too small for '{to}'")]
    Overflow {
        /// Textual form of the value
        value: String,
        /// Requested target type
        to: String,
    },

    /// `Null` offered to a property that cannot hold it
    #[error("Null cannot be assigned to a property of type '{to}'")]
    NullNotAllowed {
        /// Declared type of the property
        to: String,
    },

    /// A value that is not assignment-compatible was offered to a setter
    #[error("A value of type '{from}' cannot be assigned to a property of type '{to}'")]
    NotAssignable {
        /// Runtime type of the value
        from: String,
        /// Declared type of the property
        to: String,
    },
}

impl ConversionError {
    /// Error for a setter refusing `value` for a property of type `target`
    #[must_use]
    pub fn rejected(value: &Value, target: TypeInfo) -> Self {
        if value.is_null() {
            ConversionError::NullNotAllowed {
                to: target.to_string(),
            }
        } else {
            ConversionError::NotAssignable {
                from: value.type_name(),
                to: target.to_string(),
            }
        }
    }

    fn invalid_cast(value: &Value, to: ScalarKind) -> Self {
        ConversionError::InvalidCast {
            from: value.type_name(),
            to: to.name().to_string(),
        }
    }

    fn invalid_format(input: &str, to: ScalarKind) -> Self {
        ConversionError::InvalidFormat {
            input: input.to_string(),
            to: to.name().to_string(),
        }
    }

    fn overflow(value: impl ToString, to: ScalarKind) -> Self {
        ConversionError::Overflow {
            value: value.to_string(),
            to: to.name().to_string(),
        }
    }
}

/// Narrows an `i128` into the integer variant matching `$kind`
macro_rules! narrow_integer {
    ($wide:expr, $kind:expr, $( $variant:ident => $ty:ty ),* $(,)?) => {
        match $kind {
            $(
                ScalarKind::$variant => <$ty>::try_from($wide)
                    .map(Value::$variant)
                    .map_err(|_| ConversionError::overflow($wide, $kind)),
            )*
            other => Err(ConversionError::overflow($wide, other)),
        }
    };
}

impl Value {
    /// Converts the value to the declared type `target`
    ///
    /// `Null` passes through unchanged (nullability is enforced by the setter, not here),
    /// and a value whose kind already matches the target is returned as is.
    ///
    /// # Errors
    /// Returns [`ConversionError::InvalidCast`] if no conversion exists between the kinds,
    /// [`ConversionError::InvalidFormat`] if a string does not parse, and
    /// [`ConversionError::Overflow`] if a number does not fit the target.
    pub fn convert_to(&self, target: &TypeInfo) -> Result<Value, ConversionError> {
        let Some(kind) = self.kind() else {
            return Ok(Value::Null);
        };
        if kind == target.kind {
            return Ok(self.clone());
        }

        match target.kind {
            ValueKind::Object(object) => Err(ConversionError::InvalidCast {
                from: self.type_name(),
                to: object.name.to_string(),
            }),
            ValueKind::Scalar(scalar) => self.convert_scalar(scalar),
        }
    }

    fn convert_scalar(&self, target: ScalarKind) -> Result<Value, ConversionError> {
        if let Value::Object(_) = self {
            return Err(ConversionError::invalid_cast(self, target));
        }

        match target {
            ScalarKind::String => self
                .as_string()
                .map(Value::String)
                .ok_or_else(|| ConversionError::invalid_cast(self, target)),
            ScalarKind::Bool => self.to_bool(),
            ScalarKind::Char => self.to_char(),
            ScalarKind::F32 | ScalarKind::F64 => self.to_float(target),
            _ => {
                let wide = self.to_wide_integer(target)?;
                narrow_integer!(wide, target,
                    I8 => i8,
                    I16 => i16,
                    I32 => i32,
                    I64 => i64,
                    U8 => u8,
                    U16 => u16,
                    U32 => u32,
                    U64 => u64,
                )
            }
        }
    }

    fn to_bool(&self) -> Result<Value, ConversionError> {
        match self {
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(ConversionError::invalid_format(text, ScalarKind::Bool))
                }
            }
            Value::F32(value) => Ok(Value::Bool(*value != 0.0)),
            Value::F64(value) => Ok(Value::Bool(*value != 0.0)),
            _ => self
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| ConversionError::invalid_cast(self, ScalarKind::Bool)),
        }
    }

    fn to_char(&self) -> Result<Value, ConversionError> {
        match self {
            Value::String(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(single), None) => Ok(Value::Char(single)),
                    _ => Err(ConversionError::invalid_format(text, ScalarKind::Char)),
                }
            }
            Value::Bool(_) | Value::F32(_) | Value::F64(_) => {
                Err(ConversionError::invalid_cast(self, ScalarKind::Char))
            }
            _ => {
                let wide = self
                    .as_i128()
                    .ok_or_else(|| ConversionError::invalid_cast(self, ScalarKind::Char))?;
                u32::try_from(wide)
                    .ok()
                    .and_then(char::from_u32)
                    .map(Value::Char)
                    .ok_or_else(|| ConversionError::overflow(wide, ScalarKind::Char))
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn to_float(&self, target: ScalarKind) -> Result<Value, ConversionError> {
        let wide = match self {
            Value::Char(_) => return Err(ConversionError::invalid_cast(self, target)),
            Value::String(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| ConversionError::invalid_format(text, target))?,
            _ => self
                .as_f64()
                .ok_or_else(|| ConversionError::invalid_cast(self, target))?,
        };

        Ok(match target {
            ScalarKind::F32 => Value::F32(wide as f32),
            _ => Value::F64(wide),
        })
    }

    fn to_wide_integer(&self, target: ScalarKind) -> Result<i128, ConversionError> {
        match self {
            Value::Char(value) => Ok(i128::from(u32::from(*value))),
            Value::F32(value) => float_to_wide(f64::from(*value), target),
            Value::F64(value) => float_to_wide(*value, target),
            Value::String(text) => {
                let trimmed = text.trim();
                let (negative, digits) = match trimmed.as_bytes().first() {
                    Some(b'-') => (true, &trimmed[1..]),
                    Some(b'+') => (false, &trimmed[1..]),
                    _ => (false, trimmed),
                };
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ConversionError::invalid_format(text, target));
                }
                // Only digits remain, so a parse failure means the text exceeds i128.
                let magnitude = digits
                    .parse::<i128>()
                    .map_err(|_| ConversionError::overflow(trimmed, target))?;
                Ok(if negative { -magnitude } else { magnitude })
            }
            _ => self
                .as_i128()
                .ok_or_else(|| ConversionError::invalid_cast(self, target)),
        }
    }
}

/// Rounds half to even and widens, rejecting NaN, infinities and out-of-range values
#[allow(clippy::cast_possible_truncation)]
fn float_to_wide(value: f64, target: ScalarKind) -> Result<i128, ConversionError> {
    // Every fixed-width target fits in +/- 2^64, so anything beyond that overflows.
    const LIMIT: f64 = 18_446_744_073_709_551_616.0;

    let rounded = value.round_ties_even();
    if !rounded.is_finite() || rounded.abs() >= LIMIT {
        return Err(ConversionError::overflow(value, target));
    }
    Ok(rounded as i128)
}
