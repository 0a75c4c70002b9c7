//! # propmapper Prelude
//!
//! This module provides a convenient prelude for the most commonly used types, traits and
//! macros of the propmapper library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all propmapper operations
pub use crate::Error;

/// The result type used throughout propmapper
pub use crate::Result;

/// Context of a failed property conversion
pub use crate::ConversionFailure;

// ================================================================================================
// Property Model
// ================================================================================================

/// Property declaration and access
pub use crate::accessor::{AccessorCache, Mappable, PropertyAccess, PropertyDescriptor};

/// Declaration macros
pub use crate::{mappable, object_property};

/// Dynamic values and declared types
pub use crate::value::{ConversionError, PropertyValue, ScalarKind, TypeInfo, Value};

// ================================================================================================
// Mapping
// ================================================================================================

/// Per-pair mappers and their overrides
pub use crate::mapper::{MappingOptions, TypeMap, TypeMapper};

/// Registry and type-pair identity
pub use crate::registry::{MapperRegistry, TypePair};

/// Configuration units
pub use crate::config::{ConfigCatalog, MapperConfig, MapperConfigurator};
