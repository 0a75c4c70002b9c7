// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # propmapper
//!
//! A type-pair based object mapping engine. Given a source value of type `S` and a
//! destination type `D`, `propmapper` copies every same-named property from the source to
//! the destination, converting scalar values where the declared types differ. Per-pair
//! options rename, ignore or transform individual properties.
//!
//! ## Features
//!
//! - **Declared property tables** - Types opt in once through [`Mappable`], usually with the
//!   [`mappable!`] macro
//! - **Cached accessors** - Property lists, getters and setters are built once per type and
//!   shared through a concurrent [`AccessorCache`]
//! - **Scalar conversion** - `"42"` maps onto an `i32`, `42` onto a `String`, with checked
//!   narrowing between numeric types
//! - **Type-pair registry** - [`MapperRegistry`] resolves and dispatches mappers by
//!   (source, destination) type identity, with a type-erased path for dynamic callers
//! - **Configuration units** - [`MapperConfig`] groups registrations; [`MapperConfigurator`]
//!   applies them in order
//!
//! ## Quick Start
//!
//! ```rust
//! use propmapper::prelude::*;
//!
//! #[derive(Default)]
//! struct User {
//!     id: i32,
//!     name: String,
//!     email: String,
//!     password: String,
//! }
//!
//! #[derive(Default)]
//! struct UserDto {
//!     id: String,
//!     name: String,
//!     email_address: String,
//!     password: String,
//! }
//!
//! mappable!(User { id: i32, name: String, email: String, password: String });
//! mappable!(UserDto { id: String, name: String, email_address: String, password: String });
//!
//! let mut registry = MapperRegistry::new();
//! registry.register_with::<User, UserDto, _>(|options| {
//!     options.rename("email", "email_address").ignore("password");
//! });
//!
//! let user = User {
//!     id: 42,
//!     name: "Ada".into(),
//!     email: "ada@example.com".into(),
//!     password: "secret".into(),
//! };
//!
//! let dto = registry.map::<User, UserDto>(&user)?;
//! assert_eq!(dto.id, "42");
//! assert_eq!(dto.email_address, "ada@example.com");
//! assert!(dto.password.is_empty());
//! # Ok::<(), propmapper::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result`]. A failing property aborts the mapping call; the
//! [`Error`] variants are matchable and [`Error::ConversionFailed`] carries the property and
//! type names involved.
//!
//! ## Logging
//!
//! `propmapper` logs through the [`log`](https://docs.rs/log) facade: accessor cache
//! population at `trace` level, registrations and configuration units at `debug` level.

#[macro_use]
pub(crate) mod macros;

pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// ```rust
/// use propmapper::prelude::*;
///
/// let registry = MapperRegistry::new();
/// assert!(registry.is_empty());
/// ```
pub mod prelude;

/// Dynamic values, declared property types and scalar conversion
///
/// # Key Types
///
/// - [`value::Value`] - A property value in transit
/// - [`value::TypeInfo`] - The declared type of a property
/// - [`value::PropertyValue`] - Bridge between field types and [`value::Value`]
/// - [`value::ConversionError`] - Why a conversion failed
pub mod value;

pub mod accessor;
pub mod config;
pub mod mapper;
pub mod registry;

/// `propmapper` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use error::{ConversionFailure, Error};

pub use value::Value;

pub use accessor::{AccessorCache, Mappable, PropertyDescriptor};

pub use mapper::{MappingOptions, TypeMap, TypeMapper};

pub use registry::{MapperRegistry, TypePair};

pub use config::{ConfigCatalog, MapperConfig, MapperConfigurator};
