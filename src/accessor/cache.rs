//! Memoized property lists and accessors.
//!
//! # Thread Safety
//!
//! All tables are [`DashMap`]s populated with insert-if-absent semantics. Two threads racing
//! on the same key may both build an entry, but only the first insert is kept and every
//! caller, including the loser of the race, receives that stored entry. Entries are never
//! replaced or evicted, so a handle returned once stays the handle returned forever.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use dashmap::DashMap;
use log::trace;

use crate::{
    accessor::{Mappable, PropertyDescriptor, ReadFn, WriteFn},
    value::Value,
    Error, Result,
};

/// Cached getter: reads one property from an instance of its declaring type
pub type Getter = Arc<dyn Fn(&dyn Any) -> Result<Value> + Send + Sync>;

/// Cached setter: writes one property on an instance of its declaring type
pub type Setter = Arc<dyn Fn(&mut dyn Any, Value) -> Result<()> + Send + Sync>;

type AccessorKey = (TypeId, &'static str);

/// The ordered property list of one type, with a name index
#[derive(Debug)]
pub struct PropertySet {
    type_name: &'static str,
    properties: Vec<PropertyDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl PropertySet {
    fn new(type_name: &'static str, properties: Vec<PropertyDescriptor>) -> Self {
        let mut by_name = HashMap::with_capacity(properties.len());
        for (index, property) in properties.iter().enumerate() {
            by_name.entry(property.name()).or_insert(index);
        }

        PropertySet {
            type_name,
            properties,
            by_name,
        }
    }

    /// Name of the type these properties belong to
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Find a property by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name).map(|index| &self.properties[*index])
    }

    /// Iterate in discovery order
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyDescriptor> {
        self.properties.iter()
    }

    /// Number of properties
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True if the type declares no properties
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The properties as a slice, in discovery order
    #[must_use]
    pub fn as_slice(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a PropertyDescriptor;
    type IntoIter = std::slice::Iter<'a, PropertyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

/// Process-lifetime cache of property lists and compiled accessors
///
/// One instance is meant to be shared (behind an [`Arc`]) by every mapper of a registry.
/// The cache only grows; nothing is ever evicted.
#[derive(Default)]
pub struct AccessorCache {
    properties: DashMap<TypeId, Arc<PropertySet>>,
    getters: DashMap<AccessorKey, Getter>,
    setters: DashMap<AccessorKey, Setter>,
}

impl AccessorCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The properties of `T`, discovered on first use
    ///
    /// Every call for the same `T` returns the same [`Arc`].
    pub fn properties<T: Mappable>(&self) -> Arc<PropertySet> {
        let type_id = TypeId::of::<T>();
        if let Some(existing) = self.properties.get(&type_id) {
            return existing.value().clone();
        }

        self.properties
            .entry(type_id)
            .or_insert_with(|| {
                let set = PropertySet::new(T::TYPE_NAME, T::describe());
                trace!("discovered {} properties on {}", set.len(), T::TYPE_NAME);
                Arc::new(set)
            })
            .value()
            .clone()
    }

    /// The memoized getter of `descriptor`, `None` if the property is write-only
    ///
    /// Every call for the same (declaring type, property name) returns the same [`Arc`].
    /// Invoking the getter with an instance of another type yields
    /// [`Error::InstanceMismatch`].
    pub fn getter(&self, descriptor: &PropertyDescriptor) -> Option<Getter> {
        let read = descriptor.raw_read()?;
        let key = (descriptor.declaring_type(), descriptor.name());
        if let Some(existing) = self.getters.get(&key) {
            return Some(existing.value().clone());
        }

        let getter = self
            .getters
            .entry(key)
            .or_insert_with(|| {
                trace!(
                    "compiled getter {}.{}",
                    descriptor.declaring_type_name(),
                    descriptor.name()
                );
                build_getter(read, descriptor.declaring_type_name())
            })
            .value()
            .clone();
        Some(getter)
    }

    /// The memoized setter of `descriptor`, `None` if the property is read-only
    ///
    /// Every call for the same (declaring type, property name) returns the same [`Arc`].
    /// The setter performs no conversion: a value that is not assignment-compatible with
    /// the declared type fails with [`Error::Conversion`].
    pub fn setter(&self, descriptor: &PropertyDescriptor) -> Option<Setter> {
        let write = descriptor.raw_write()?;
        let key = (descriptor.declaring_type(), descriptor.name());
        if let Some(existing) = self.setters.get(&key) {
            return Some(existing.value().clone());
        }

        let setter = self
            .setters
            .entry(key)
            .or_insert_with(|| {
                trace!(
                    "compiled setter {}.{}",
                    descriptor.declaring_type_name(),
                    descriptor.name()
                );
                build_setter(write, descriptor.declaring_type_name())
            })
            .value()
            .clone();
        Some(setter)
    }

    /// Number of types whose properties have been discovered
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.properties.len()
    }
}

fn build_getter(read: ReadFn, expected: &'static str) -> Getter {
    Arc::new(move |instance: &dyn Any| read(instance).ok_or(Error::InstanceMismatch { expected }))
}

fn build_setter(write: WriteFn, expected: &'static str) -> Setter {
    Arc::new(
        move |instance: &mut dyn Any, value: Value| match write(instance, value) {
            Some(result) => result.map_err(Error::from),
            None => Err(Error::InstanceMismatch { expected }),
        },
    )
}
