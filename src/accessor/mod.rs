//! Property model and cached accessors.
//!
//! Types take part in mapping by declaring their properties once through the [`Mappable`]
//! trait, usually generated with the [`crate::mappable!`] macro. The declaration is a table
//! of [`PropertyDescriptor`]s, each carrying the property name, declared [`TypeInfo`],
//! access flags and the raw functions that read or write the field on an erased instance.
//!
//! The [`AccessorCache`] turns those tables into memoized, shareable getters and setters.
//!
//! # Key Components
//!
//! - [`Mappable`] - Per-type property declaration
//! - [`PropertyDescriptor`] - Metadata and raw access for one property
//! - [`PropertyAccess`] - Readable / writable flags
//! - [`AccessorCache`] - Memoized property lists, getters and setters
//! - [`PropertySet`] - The cached, ordered property list of one type
//!
//! # Examples
//!
//! ```rust
//! use propmapper::{mappable, AccessorCache};
//!
//! #[derive(Default)]
//! struct Book {
//!     title: String,
//!     pages: i32,
//! }
//!
//! mappable!(Book { title: String, pages: i32 });
//!
//! let cache = AccessorCache::new();
//! let properties = cache.properties::<Book>();
//! assert_eq!(properties.len(), 2);
//!
//! let pages = properties.get("pages").unwrap();
//! let getter = cache.getter(pages).unwrap();
//! let book = Book { title: "Dune".into(), pages: 412 };
//! assert_eq!(getter(&book)?, propmapper::Value::I32(412));
//! # Ok::<(), propmapper::Error>(())
//! ```

mod cache;

use std::{
    any::{Any, TypeId},
    fmt,
};

use bitflags::bitflags;

use crate::value::{ConversionError, PropertyValue, TypeInfo, Value};

pub use cache::{AccessorCache, Getter, PropertySet, Setter};

/// Raw read function: `None` when the instance is not of the declaring type
pub type ReadFn = fn(&dyn Any) -> Option<Value>;

/// Raw write function: `None` when the instance is not of the declaring type
pub type WriteFn = fn(&mut dyn Any, Value) -> Option<Result<(), ConversionError>>;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    /// Access capabilities of a property
    pub struct PropertyAccess: u8 {
        /// Property has a getter
        const READ = 0x01;
        /// Property has a setter
        const WRITE = 0x02;
        /// Property has both
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

/// Metadata and raw access for one property of one declaring type
///
/// Descriptors are immutable once created. The access flags always agree with the presence
/// of the raw read and write functions.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: &'static str,
    type_info: TypeInfo,
    declaring_type: TypeId,
    declaring_type_name: &'static str,
    read: Option<ReadFn>,
    write: Option<WriteFn>,
}

impl PropertyDescriptor {
    /// Describe property `name` of `T`, holding a value of type `V`
    ///
    /// ## Arguments
    /// * `name`  - Property name used for matching
    /// * `read`  - Raw read function, `None` for a write-only property
    /// * `write` - Raw write function, `None` for a read-only property
    #[must_use]
    pub fn new<T: Mappable, V: PropertyValue>(
        name: &'static str,
        read: Option<ReadFn>,
        write: Option<WriteFn>,
    ) -> Self {
        PropertyDescriptor {
            name,
            type_info: V::type_info(),
            declaring_type: TypeId::of::<T>(),
            declaring_type_name: T::TYPE_NAME,
            read,
            write,
        }
    }

    /// Property name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type of the property
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// Access flags derived from the available raw functions
    #[must_use]
    pub fn access(&self) -> PropertyAccess {
        let mut access = PropertyAccess::empty();
        if self.read.is_some() {
            access |= PropertyAccess::READ;
        }
        if self.write.is_some() {
            access |= PropertyAccess::WRITE;
        }
        access
    }

    /// True if the property has a getter
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    /// True if the property has a setter
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Identity of the declaring type
    #[must_use]
    pub fn declaring_type(&self) -> TypeId {
        self.declaring_type
    }

    /// Name of the declaring type
    #[must_use]
    pub fn declaring_type_name(&self) -> &'static str {
        self.declaring_type_name
    }

    pub(crate) fn raw_read(&self) -> Option<ReadFn> {
        self.read
    }

    pub(crate) fn raw_write(&self) -> Option<WriteFn> {
        self.write
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("type_info", &self.type_info)
            .field("declaring_type", &self.declaring_type_name)
            .field("access", &self.access())
            .finish()
    }
}

/// A type whose properties can be discovered and accessed by the mapping engine
///
/// Implementations are normally generated by [`crate::mappable!`]. A hand-written
/// implementation must return descriptors whose raw functions only succeed for `Self`
/// instances, and must return the same list, in the same order, on every call.
pub trait Mappable: Any {
    /// Short display name of the type, used in diagnostics
    const TYPE_NAME: &'static str;

    /// The property table of this type, in declaration order
    fn describe() -> Vec<PropertyDescriptor>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{Book, User};
    use crate::value::ScalarKind;

    #[test]
    fn test_describe_order_and_types() {
        let properties = Book::describe();
        let names: Vec<&str> = properties.iter().map(PropertyDescriptor::name).collect();
        assert_eq!(names, vec!["title", "pages"]);

        assert_eq!(
            properties[1].type_info(),
            TypeInfo::scalar(ScalarKind::I32)
        );
        assert!(properties[0].type_info().nullable);
        assert_eq!(properties[0].declaring_type(), TypeId::of::<Book>());
        assert_eq!(properties[0].declaring_type_name(), "Book");
    }

    #[test]
    fn test_access_flags() {
        let properties = User::describe();
        let id = properties.iter().find(|p| p.name() == "id").unwrap();
        assert_eq!(id.access(), PropertyAccess::READ);
        assert!(id.is_readable());
        assert!(!id.is_writable());

        let name = properties.iter().find(|p| p.name() == "name").unwrap();
        assert_eq!(name.access(), PropertyAccess::READ_WRITE);
    }

    #[test]
    fn test_raw_access_rejects_foreign_instance() {
        let properties = Book::describe();
        let read = properties[1].raw_read().unwrap();
        let user = User::default();
        assert!(read(&user).is_none());

        let book = Book {
            title: None,
            pages: 3,
        };
        assert_eq!(read(&book), Some(Value::I32(3)));
    }
}
