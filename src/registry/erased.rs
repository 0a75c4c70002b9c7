//! Type-erased mapper handles.
//!
//! The registry stores mappers for arbitrary type pairs in one table. Each entry keeps the
//! typed handle, recovered by downcast on the typed path, and an [`ErasedMapper`] that
//! re-validates the runtime types of its arguments on the dynamic path.

use std::{
    any::{self, Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{mapper::TypeMap, value::short_type_name, Error, Result};

/// Identity of a (source type, destination type) pair
///
/// Equality and hashing use the [`TypeId`]s only; the names are carried for diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct TypePair {
    source: TypeId,
    destination: TypeId,
    source_name: &'static str,
    destination_name: &'static str,
}

impl TypePair {
    /// The pair (`S`, `D`)
    #[must_use]
    pub fn of<S: Any, D: Any>() -> Self {
        TypePair {
            source: TypeId::of::<S>(),
            destination: TypeId::of::<D>(),
            source_name: any::type_name::<S>(),
            destination_name: any::type_name::<D>(),
        }
    }

    /// Identity of the source type
    #[must_use]
    pub fn source(&self) -> TypeId {
        self.source
    }

    /// Identity of the destination type
    #[must_use]
    pub fn destination(&self) -> TypeId {
        self.destination
    }

    /// Full name of the source type
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.source_name
    }

    /// Full name of the destination type
    #[must_use]
    pub fn destination_name(&self) -> &'static str {
        self.destination_name
    }

    pub(crate) fn not_registered(&self) -> Error {
        Error::NoMapperRegistered {
            source_type: self.source_name,
            destination_type: self.destination_name,
        }
    }
}

impl PartialEq for TypePair {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.destination == other.destination
    }
}

impl Eq for TypePair {}

impl Hash for TypePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.destination.hash(state);
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_name, self.destination_name)
    }
}

/// A mapper invoked with erased arguments
pub(crate) trait ErasedMapper: Send + Sync {
    /// Map an erased source into a boxed destination
    fn map(&self, source: &dyn Any) -> Result<Box<dyn Any>>;

    /// Map an erased source onto an erased destination
    fn map_into(&self, source: &dyn Any, destination: &mut dyn Any) -> Result<()>;
}

/// Adapter from a typed [`TypeMap`] to [`ErasedMapper`]
pub(crate) struct Erased<S, D> {
    inner: Arc<dyn TypeMap<S, D>>,
}

impl<S, D> Erased<S, D> {
    pub(crate) fn new(inner: Arc<dyn TypeMap<S, D>>) -> Self {
        Erased { inner }
    }
}

impl<S: Any, D: Any> ErasedMapper for Erased<S, D> {
    fn map(&self, source: &dyn Any) -> Result<Box<dyn Any>> {
        let source = source
            .downcast_ref::<S>()
            .ok_or(Error::InstanceMismatch {
                expected: short_type_name::<S>(),
            })?;

        Ok(Box::new(self.inner.map(source)?))
    }

    fn map_into(&self, source: &dyn Any, destination: &mut dyn Any) -> Result<()> {
        let source = source
            .downcast_ref::<S>()
            .ok_or(Error::InstanceMismatch {
                expected: short_type_name::<S>(),
            })?;
        let destination = destination
            .downcast_mut::<D>()
            .ok_or(Error::InstanceMismatch {
                expected: short_type_name::<D>(),
            })?;

        self.inner.map_into(source, destination)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        test::{Item, ItemDto},
        AccessorCache, TypeMapper,
    };

    #[test]
    fn test_type_pair_identity() {
        let a = TypePair::of::<Item, ItemDto>();
        let b = TypePair::of::<Item, ItemDto>();
        let reversed = TypePair::of::<ItemDto, Item>();

        assert_eq!(a, b);
        assert_ne!(a, reversed);
        assert_eq!(a.source(), TypeId::of::<Item>());
        assert!(a.source_name().ends_with("Item"));
        assert!(a.to_string().contains(" -> "));

        let set: HashSet<TypePair> = [a, b, reversed].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_erased_rejects_wrong_instances() {
        let mapper: Arc<dyn TypeMap<Item, ItemDto>> =
            Arc::new(TypeMapper::<Item, ItemDto>::new(Arc::new(AccessorCache::new())));
        let erased = Erased::new(mapper);

        let wrong = ItemDto::default();
        assert!(matches!(
            erased.map(&wrong),
            Err(Error::InstanceMismatch { expected: "Item" })
        ));

        let source = Item {
            value: Some("5".to_string()),
        };
        let mut wrong_destination = Item::default();
        assert!(matches!(
            erased.map_into(&source, &mut wrong_destination),
            Err(Error::InstanceMismatch { expected: "ItemDto" })
        ));

        let mapped = erased.map(&source).unwrap();
        assert_eq!(mapped.downcast_ref::<ItemDto>().unwrap().value, 5);
    }
}
