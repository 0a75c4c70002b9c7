use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

use crate::value::{PropertyValue, Value};

/// Type-erased transform applied to one source property value
pub type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Per-source-property overrides for one [`crate::TypeMapper`]
///
/// All keys are source property names. Inserting a key twice keeps the last value.
///
/// ```rust
/// use propmapper::MappingOptions;
///
/// let mut options = MappingOptions::new();
/// options
///     .rename("email", "email_address")
///     .ignore("password")
///     .transform("pages", |pages: i32| format!("{} pages", pages));
///
/// assert_eq!(options.destination_name("email"), "email_address");
/// assert!(options.is_ignored("password"));
/// assert!(options.transform_for("pages").is_some());
/// ```
#[derive(Default, Clone)]
pub struct MappingOptions {
    renames: HashMap<String, String>,
    ignored: HashSet<String>,
    transforms: HashMap<String, Transform>,
}

impl MappingOptions {
    /// Empty options: every property maps by name, unchanged
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map source property `source` onto destination property `destination`
    pub fn rename(&mut self, source: impl Into<String>, destination: impl Into<String>) -> &mut Self {
        self.renames.insert(source.into(), destination.into());
        self
    }

    /// Never copy source property `source`
    pub fn ignore(&mut self, source: impl Into<String>) -> &mut Self {
        self.ignored.insert(source.into());
        self
    }

    /// Replace the value of source property `source` with `func(value)`
    ///
    /// The output is written to the destination as is, without the generic conversion
    /// step. If the source value is not an `A` at mapping time, `func` is not called and
    /// `Null` is written instead.
    pub fn transform<A, B, F>(&mut self, source: impl Into<String>, func: F) -> &mut Self
    where
        A: PropertyValue,
        B: PropertyValue,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.transform_value(source, move |value| match A::from_value(value) {
            Ok(input) => func(input).to_value(),
            Err(_) => Value::Null,
        })
    }

    /// Replace the value of source property `source` with `func(value)`, on raw values
    pub fn transform_value<F>(&mut self, source: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transforms.insert(source.into(), Arc::new(func));
        self
    }

    /// Destination name for source property `source`
    #[must_use]
    pub fn destination_name<'a>(&'a self, source: &'a str) -> &'a str {
        self.renames.get(source).map_or(source, String::as_str)
    }

    /// True if `source` is excluded from mapping
    #[must_use]
    pub fn is_ignored(&self, source: &str) -> bool {
        self.ignored.contains(source)
    }

    /// The transform registered for `source`, if any
    #[must_use]
    pub fn transform_for(&self, source: &str) -> Option<&Transform> {
        self.transforms.get(source)
    }

    /// True if no override is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty() && self.ignored.is_empty() && self.transforms.is_empty()
    }
}

impl fmt::Debug for MappingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut transforms: Vec<&String> = self.transforms.keys().collect();
        transforms.sort();

        f.debug_struct("MappingOptions")
            .field("renames", &self.renames)
            .field("ignored", &self.ignored)
            .field("transforms", &transforms)
            .finish()
    }
}
