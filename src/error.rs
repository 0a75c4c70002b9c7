use thiserror::Error;

use crate::value::{ConversionError, TypeInfo, Value};

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure aborts the mapping call that produced it. Nothing is retried or substituted
/// with a default value, so a destination handed to [`crate::MapperRegistry::map_into`] may be
/// left partially populated when an error is returned.
///
/// # Error Categories
///
/// ## Argument Errors
/// - [`Error::NullArgument`] - Source or destination missing on the dynamic dispatch path
/// - [`Error::InstanceMismatch`] - An instance of the wrong runtime type crossed an erased boundary
///
/// ## Mapping Errors
/// - [`Error::NotWritable`] - Matched destination property has no setter
/// - [`Error::ConversionFailed`] - A value could not be converted to the destination type
/// - [`Error::Conversion`] - Raw conversion failure reported by an accessor
///
/// ## Registry Errors
/// - [`Error::NoMapperRegistered`] - No mapper registered for the requested type pair
/// - [`Error::InvalidConfigurationType`] - A configuration unit could not be resolved
///
/// # Examples
///
/// ```rust
/// use propmapper::{Error, MapperRegistry};
///
/// struct Person;
/// struct PersonDto;
///
/// let registry = MapperRegistry::new();
/// match registry.map::<Person, PersonDto>(&Person) {
///     Err(Error::NoMapperRegistered { source_type, destination_type }) => {
///         eprintln!("nothing maps {} to {}", source_type, destination_type);
///     }
///     Err(e) => eprintln!("mapping failed: {}", e),
///     Ok(_) => {}
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A required argument was absent.
    ///
    /// Only reachable through the type-erased dispatch path
    /// ([`crate::MapperRegistry::map_dynamic`]); the typed API cannot express an absent
    /// source or destination.
    #[error("Value cannot be null (parameter '{argument}')")]
    NullArgument {
        /// Name of the missing argument, `source` or `destination`
        argument: &'static str,
    },

    /// An instance handed across a type-erased boundary was not of the expected type.
    #[error("Instance is not of the expected type '{expected}'")]
    InstanceMismatch {
        /// The type the accessor or mapper was specialised for
        expected: &'static str,
    },

    /// The matched destination property cannot be written.
    #[error("Property '{property}' on type '{destination_type}' is not writable.")]
    NotWritable {
        /// Name of the destination property
        property: &'static str,
        /// Name of the destination type
        destination_type: &'static str,
    },

    /// A source value could not be converted to, or assigned into, the destination property.
    ///
    /// The boxed [`ConversionFailure`] carries the full addressing context.
    #[error(transparent)]
    ConversionFailed(Box<ConversionFailure>),

    /// A raw conversion error, as reported by a property setter.
    ///
    /// The mapping pipeline never returns this variant to callers; it rewraps it into
    /// [`Error::ConversionFailed`] with the property and type names attached. It surfaces
    /// only when a setter from [`crate::AccessorCache`] is invoked directly.
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// `map` was invoked for a type pair without a prior registration.
    #[error("No mapper registered for {source_type} to {destination_type}")]
    NoMapperRegistered {
        /// Full name of the source type
        source_type: &'static str,
        /// Full name of the destination type
        destination_type: &'static str,
    },

    /// A configuration unit supplied by type name is not a known configuration unit.
    #[error("{type_name} does not implement MapperConfig")]
    InvalidConfigurationType {
        /// The type name that failed to resolve
        type_name: String,
    },
}

/// Context attached to [`Error::ConversionFailed`].
#[derive(Error, Debug)]
#[error(
    "Error mapping property '{source_property}' (source type: {}) to property \
     '{destination_property}' (target type: {target_type}) in mapping from {source_type} to \
     {destination_type}. Conversion failed: {error}",
    .value.type_name()
)]
pub struct ConversionFailure {
    /// Name of the source property
    pub source_property: &'static str,
    /// Name of the destination property
    pub destination_property: &'static str,
    /// Name of the mapper's source type
    pub source_type: &'static str,
    /// Name of the mapper's destination type
    pub destination_type: &'static str,
    /// The offending value
    pub value: Value,
    /// Declared type of the destination property
    pub target_type: TypeInfo,
    /// The underlying conversion error
    #[source]
    pub error: ConversionError,
}

impl ConversionFailure {
    /// Runtime type name of the offending value
    #[must_use]
    pub fn value_type(&self) -> String {
        self.value.type_name()
    }
}
