//! Runtime value model for property access.
//!
//! Property getters and setters exchange [`Value`]s instead of concrete field types, which
//! lets a single mapping pipeline move data between arbitrary structs. The declared type
//! of a property is described by a [`TypeInfo`], and the [`PropertyValue`] trait bridges
//! concrete Rust field types to and from the dynamic representation.
//!
//! # Key Components
//!
//! - [`Value`] - A dynamically typed property value
//! - [`ScalarKind`] - The built-in scalar types understood by the converter
//! - [`ValueKind`] / [`TypeInfo`] - The declared type of a property
//! - [`ObjectValue`] - Shared opaque payload for nested objects
//! - [`PropertyValue`] - Bridge between field types and [`Value`]
//! - [`ConversionError`] - Why a value could not be converted or assigned
//!
//! # Examples
//!
//! ```rust
//! use propmapper::value::{PropertyValue, ScalarKind, TypeInfo, Value};
//!
//! let value = 42i32.to_value();
//! assert_eq!(value, Value::I32(42));
//!
//! let converted = Value::from("17").convert_to(&TypeInfo::scalar(ScalarKind::I64))?;
//! assert_eq!(converted, Value::I64(17));
//! # Ok::<(), propmapper::value::ConversionError>(())
//! ```

mod convert;

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

use strum::{EnumCount, EnumIter, IntoStaticStr};

pub use convert::ConversionError;

/// The built-in scalar types understood by the generic converter
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, IntoStaticStr)]
pub enum ScalarKind {
    /// `bool`
    #[strum(serialize = "bool")]
    Bool,
    /// `char`
    #[strum(serialize = "char")]
    Char,
    /// `i8`
    #[strum(serialize = "i8")]
    I8,
    /// `i16`
    #[strum(serialize = "i16")]
    I16,
    /// `i32`
    #[strum(serialize = "i32")]
    I32,
    /// `i64`
    #[strum(serialize = "i64")]
    I64,
    /// `u8`
    #[strum(serialize = "u8")]
    U8,
    /// `u16`
    #[strum(serialize = "u16")]
    U16,
    /// `u32`
    #[strum(serialize = "u32")]
    U32,
    /// `u64`
    #[strum(serialize = "u64")]
    U64,
    /// `f32`
    #[strum(serialize = "f32")]
    F32,
    /// `f64`
    #[strum(serialize = "f64")]
    F64,
    /// `String`
    #[strum(serialize = "String")]
    String,
}

impl ScalarKind {
    /// Rust name of the scalar type
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// True for the fixed-width integer kinds
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ScalarKind::I8
                | ScalarKind::I16
                | ScalarKind::I32
                | ScalarKind::I64
                | ScalarKind::U8
                | ScalarKind::U16
                | ScalarKind::U32
                | ScalarKind::U64
        )
    }

    /// True for `f32` and `f64`
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a non-scalar property type
#[derive(Clone, Copy, Debug)]
pub struct ObjectType {
    /// Runtime identity
    pub id: TypeId,
    /// Display name
    pub name: &'static str,
}

impl ObjectType {
    /// Object type descriptor for `T`
    #[must_use]
    pub fn of<T: Any>() -> Self {
        ObjectType {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
        }
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectType {}

/// Kind of a value or of a declared property type
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ValueKind {
    /// One of the built-in scalars
    Scalar(ScalarKind),
    /// Any other type, carried as an [`ObjectValue`]
    Object(ObjectType),
}

impl ValueKind {
    /// Display name of the kind
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Scalar(kind) => kind.name(),
            ValueKind::Object(object) => object.name,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a property
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TypeInfo {
    /// The underlying kind
    pub kind: ValueKind,
    /// Whether the property accepts [`Value::Null`] (an `Option<T>` field)
    pub nullable: bool,
}

impl TypeInfo {
    /// Non-nullable scalar type
    #[must_use]
    pub const fn scalar(kind: ScalarKind) -> Self {
        TypeInfo {
            kind: ValueKind::Scalar(kind),
            nullable: false,
        }
    }

    /// Non-nullable object type
    #[must_use]
    pub const fn object(object: ObjectType) -> Self {
        TypeInfo {
            kind: ValueKind::Object(object),
            nullable: false,
        }
    }

    /// The same type, accepting [`Value::Null`]
    #[must_use]
    pub const fn into_nullable(self) -> Self {
        TypeInfo {
            kind: self.kind,
            nullable: true,
        }
    }

    /// Checks whether `value` can be stored without conversion
    ///
    /// `Null` is only assignable to nullable types; any other value must have exactly the
    /// declared kind.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match value.kind() {
            None => self.nullable,
            Some(kind) => kind == self.kind,
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Shared, type-tagged payload of a non-scalar value
///
/// Cloning shares the allocation; equality is identity of that allocation.
#[derive(Clone)]
pub struct ObjectValue {
    object_type: ObjectType,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    /// Wraps `value`
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        ObjectValue {
            object_type: ObjectType::of::<T>(),
            inner: Arc::new(value),
        }
    }

    /// The wrapped type
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Borrows the payload as `T`, if that is its type
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectValue<{}>", self.object_type.name)
    }
}

/// A dynamically typed property value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value (`None` of an `Option<T>` property)
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Character value
    Char(char),
    /// 8-bit signed integer
    I8(i8),
    /// 16-bit signed integer
    I16(i16),
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 8-bit unsigned integer
    U8(u8),
    /// 16-bit unsigned integer
    U16(u16),
    /// 32-bit unsigned integer
    U32(u32),
    /// 64-bit unsigned integer
    U64(u64),
    /// 32-bit floating point
    F32(f32),
    /// 64-bit floating point
    F64(f64),
    /// String value
    String(String),
    /// Nested object
    Object(ObjectValue),
}

impl Value {
    /// Kind of the value, `None` for [`Value::Null`]
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        let scalar = match self {
            Value::Null => return None,
            Value::Object(object) => return Some(ValueKind::Object(object.object_type())),
            Value::Bool(_) => ScalarKind::Bool,
            Value::Char(_) => ScalarKind::Char,
            Value::I8(_) => ScalarKind::I8,
            Value::I16(_) => ScalarKind::I16,
            Value::I32(_) => ScalarKind::I32,
            Value::I64(_) => ScalarKind::I64,
            Value::U8(_) => ScalarKind::U8,
            Value::U16(_) => ScalarKind::U16,
            Value::U32(_) => ScalarKind::U32,
            Value::U64(_) => ScalarKind::U64,
            Value::F32(_) => ScalarKind::F32,
            Value::F64(_) => ScalarKind::F64,
            Value::String(_) => ScalarKind::String,
        };
        Some(ValueKind::Scalar(scalar))
    }

    /// Runtime type name of the value, `null` for [`Value::Null`]
    #[must_use]
    pub fn type_name(&self) -> String {
        match self.kind() {
            Some(kind) => kind.name().to_string(),
            None => "null".to_string(),
        }
    }

    /// True for [`Value::Null`]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to convert to a boolean value
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => self.as_i128().map(|value| value != 0),
        }
    }

    /// Try to convert to a 64-bit integer value
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|value| i64::try_from(value).ok())
    }

    /// Try to convert to a floating point value
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(value) => Some(f64::from(*value)),
            Value::F64(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            _ => self.as_i128().map(|value| value as f64),
        }
    }

    /// Textual form of a scalar value, `None` for `Null` and objects
    #[must_use]
    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::Null | Value::Object(_) => None,
            Value::String(value) => Some(value.clone()),
            Value::Bool(value) => Some(value.to_string()),
            Value::Char(value) => Some(value.to_string()),
            Value::I8(value) => Some(value.to_string()),
            Value::I16(value) => Some(value.to_string()),
            Value::I32(value) => Some(value.to_string()),
            Value::I64(value) => Some(value.to_string()),
            Value::U8(value) => Some(value.to_string()),
            Value::U16(value) => Some(value.to_string()),
            Value::U32(value) => Some(value.to_string()),
            Value::U64(value) => Some(value.to_string()),
            Value::F32(value) => Some(value.to_string()),
            Value::F64(value) => Some(value.to_string()),
        }
    }

    /// Borrows a nested object as `T`
    #[must_use]
    pub fn as_object<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Integer payload widened to `i128`, booleans as 0/1
    fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Bool(value) => Some(i128::from(*value)),
            Value::I8(value) => Some(i128::from(*value)),
            Value::I16(value) => Some(i128::from(*value)),
            Value::I32(value) => Some(i128::from(*value)),
            Value::I64(value) => Some(i128::from(*value)),
            Value::U8(value) => Some(i128::from(*value)),
            Value::U16(value) => Some(i128::from(*value)),
            Value::U32(value) => Some(i128::from(*value)),
            Value::U64(value) => Some(i128::from(*value)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Char(value) => write!(f, "'{}'", value),
            Value::String(value) => write!(f, "\"{}\"", value),
            Value::Object(object) => write!(f, "<{}>", object.object_type().name),
            _ => match self.as_string() {
                Some(text) => f.write_str(&text),
                None => Ok(()),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Bridge between a concrete field type and [`Value`]
///
/// `from_value` is strict: it only accepts a value that is already assignment-compatible
/// with [`PropertyValue::type_info`]. Coercion between types is the job of
/// [`Value::convert_to`], which the mapping pipeline runs before a setter sees the value.
pub trait PropertyValue: Sized {
    /// Declared type of a property holding `Self`
    fn type_info() -> TypeInfo;

    /// Reads `self` into a [`Value`]
    fn to_value(&self) -> Value;

    /// Recovers `Self` from an assignment-compatible [`Value`]
    ///
    /// # Errors
    /// Returns [`ConversionError::NullNotAllowed`] for `Null` on a non-nullable type and
    /// [`ConversionError::NotAssignable`] for a value of any other kind.
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

macro_rules! scalar_property {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::scalar(ScalarKind::$variant)
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(ConversionError::rejected(&other, Self::type_info())),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

scalar_property! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    fn type_info() -> TypeInfo {
        T::type_info().into_nullable()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Last path segment of `std::any::type_name::<T>()`, generics included
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(position) => &full[position + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[derive(Clone, Debug, PartialEq)]
    struct Address {
        street: String,
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(Value::Null.kind(), None);
        assert_eq!(
            Value::I32(7).kind(),
            Some(ValueKind::Scalar(ScalarKind::I32))
        );
        assert_eq!(
            Value::from("x").kind(),
            Some(ValueKind::Scalar(ScalarKind::String))
        );

        let object = Value::Object(ObjectValue::new(Address {
            street: "Main".to_string(),
        }));
        assert_eq!(
            object.kind(),
            Some(ValueKind::Object(ObjectType::of::<Address>()))
        );
        assert_eq!(object.type_name(), "Address");
        assert_eq!(Value::Null.type_name(), "null");
    }

    #[test]
    fn test_scalar_kind_names() {
        let names: Vec<&str> = ScalarKind::iter().map(ScalarKind::name).collect();
        assert_eq!(names.len(), ScalarKind::COUNT);
        assert!(names.contains(&"i32"));
        assert!(names.contains(&"String"));
        assert!(ScalarKind::U16.is_integer());
        assert!(!ScalarKind::F32.is_integer());
        assert!(ScalarKind::F64.is_float());
    }

    #[test]
    fn test_type_info_accepts() {
        let int = TypeInfo::scalar(ScalarKind::I32);
        assert!(int.accepts(&Value::I32(1)));
        assert!(!int.accepts(&Value::I64(1)));
        assert!(!int.accepts(&Value::Null));

        let nullable = int.into_nullable();
        assert!(nullable.accepts(&Value::Null));
        assert!(nullable.accepts(&Value::I32(1)));

        assert_eq!(int.to_string(), "i32");
        assert_eq!(nullable.to_string(), "Option<i32>");
    }

    #[test]
    fn test_property_value_roundtrip() {
        assert_eq!(42i32.to_value(), Value::I32(42));
        assert_eq!(i32::from_value(Value::I32(42)).unwrap(), 42);
        assert_eq!(
            "hi".to_string().to_value(),
            Value::String("hi".to_string())
        );

        let none: Option<String> = None;
        assert_eq!(none.to_value(), Value::Null);
        assert_eq!(Option::<String>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<u8>::from_value(Value::U8(3)).unwrap(),
            Some(3)
        );
        assert!(Option::<u8>::type_info().nullable);
    }

    #[test]
    fn test_property_value_is_strict() {
        assert!(matches!(
            i32::from_value(Value::I64(1)),
            Err(ConversionError::NotAssignable { .. })
        ));
        assert!(matches!(
            i32::from_value(Value::Null),
            Err(ConversionError::NullNotAllowed { .. })
        ));
        assert!(matches!(
            Option::<i32>::from_value(Value::from("1")),
            Err(ConversionError::NotAssignable { .. })
        ));
    }

    #[test]
    fn test_object_value_identity() {
        let first = ObjectValue::new(Address {
            street: "Main".to_string(),
        });
        let shared = first.clone();
        let other = ObjectValue::new(Address {
            street: "Main".to_string(),
        });

        assert_eq!(first, shared);
        assert_ne!(first, other);
        assert_eq!(
            first.downcast_ref::<Address>().map(|a| a.street.as_str()),
            Some("Main")
        );
        assert!(first.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::I32(-3).as_i64(), Some(-3));
        assert_eq!(Value::U64(u64::MAX).as_i64(), None);
        assert_eq!(Value::Bool(true).as_i64(), Some(1));
        assert_eq!(Value::U8(0).as_bool(), Some(false));
        assert_eq!(Value::F32(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::I16(9).as_string(), Some("9".to_string()));
        assert_eq!(Value::Null.as_string(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::I32(42).to_string(), "42");
        assert_eq!(Value::from("Hello").to_string(), "\"Hello\"");
        assert_eq!(Value::Char('A').to_string(), "'A'");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Address>(), "Address");
        assert_eq!(short_type_name::<String>(), "String");
    }
}
