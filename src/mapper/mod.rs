//! Per-type-pair mapping.
//!
//! A [`TypeMapper`] copies the properties of a source type onto a destination type. For
//! every source property, in declaration order, it:
//!
//! 1. skips the property if it is ignored,
//! 2. resolves the destination name through the rename table,
//! 3. skips the property if the destination has no property of that name,
//! 4. fails with [`Error::NotWritable`] if the matched destination property is read-only,
//! 5. reads the source value through the cached getter,
//! 6. runs the transform registered for the property, if any,
//! 7. otherwise converts the value to the destination's declared type,
//! 8. writes the value through the cached setter.
//!
//! The first failure aborts the call. Properties written before the failure stay written.
//!
//! # Key Components
//!
//! - [`TypeMap`] - The mapping contract, also implemented by custom mappers
//! - [`TypeMapper`] - The property-matching implementation
//! - [`MappingOptions`] - Rename, ignore and transform overrides

mod options;

use std::{any::Any, fmt, marker::PhantomData, sync::Arc};

use crate::{
    accessor::{AccessorCache, Mappable, PropertyDescriptor},
    error::ConversionFailure,
    value::{ConversionError, Value},
    Error, Result,
};

pub use options::{MappingOptions, Transform};

/// Maps values of type `S` onto values of type `D`
///
/// Implemented by [`TypeMapper`]; implement it directly to register a hand-written mapper
/// with [`crate::MapperRegistry::register_mapper`].
pub trait TypeMap<S, D>: Send + Sync {
    /// Map `source` onto a freshly constructed destination
    ///
    /// # Errors
    /// Returns an error if any property fails to map.
    fn map(&self, source: &S) -> Result<D>;

    /// Map `source` onto an existing `destination`
    ///
    /// # Errors
    /// Returns an error if any property fails to map. `destination` keeps every property
    /// written before the failure.
    fn map_into(&self, source: &S, destination: &mut D) -> Result<()>;
}

/// Property-matching mapper for one (source, destination) type pair
pub struct TypeMapper<S, D> {
    cache: Arc<AccessorCache>,
    options: MappingOptions,
    _types: PhantomData<fn(&S) -> D>,
}

impl<S: Mappable, D: Mappable> TypeMapper<S, D> {
    /// Mapper without overrides
    #[must_use]
    pub fn new(cache: Arc<AccessorCache>) -> Self {
        Self::with_options(cache, MappingOptions::new())
    }

    /// Mapper applying `options`
    #[must_use]
    pub fn with_options(cache: Arc<AccessorCache>, options: MappingOptions) -> Self {
        TypeMapper {
            cache,
            options,
            _types: PhantomData,
        }
    }

    /// The overrides in effect
    #[must_use]
    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Mutable access to the overrides; changes apply to the next mapping call
    pub fn options_mut(&mut self) -> &mut MappingOptions {
        &mut self.options
    }

    /// The shared accessor cache
    #[must_use]
    pub fn cache(&self) -> &Arc<AccessorCache> {
        &self.cache
    }

    fn conversion_failed(
        &self,
        source: &PropertyDescriptor,
        target: &PropertyDescriptor,
        value: Value,
        error: ConversionError,
    ) -> Error {
        Error::ConversionFailed(Box::new(ConversionFailure {
            source_property: source.name(),
            destination_property: target.name(),
            source_type: S::TYPE_NAME,
            destination_type: D::TYPE_NAME,
            value,
            target_type: target.type_info(),
            error,
        }))
    }
}

impl<S: Mappable, D: Mappable + Default> TypeMap<S, D> for TypeMapper<S, D> {
    fn map(&self, source: &S) -> Result<D> {
        let mut destination = D::default();
        self.map_into(source, &mut destination)?;
        Ok(destination)
    }

    fn map_into(&self, source: &S, destination: &mut D) -> Result<()> {
        let source_properties = self.cache.properties::<S>();
        let destination_properties = self.cache.properties::<D>();

        for property in &*source_properties {
            if self.options.is_ignored(property.name()) {
                continue;
            }

            let target_name = self.options.destination_name(property.name());
            let Some(target) = destination_properties.get(target_name) else {
                continue;
            };

            let Some(setter) = self.cache.setter(target) else {
                return Err(Error::NotWritable {
                    property: target.name(),
                    destination_type: D::TYPE_NAME,
                });
            };

            // Write-only source properties have nothing to copy.
            let Some(getter) = self.cache.getter(property) else {
                continue;
            };

            let value = getter(source as &dyn Any)?;
            let value = match self.options.transform_for(property.name()) {
                Some(transform) => transform(value),
                None => match value.convert_to(&target.type_info()) {
                    Ok(converted) => converted,
                    Err(error) => return Err(self.conversion_failed(property, target, value, error)),
                },
            };

            let target_type = target.type_info();
            if !target_type.accepts(&value) {
                let error = ConversionError::rejected(&value, target_type);
                return Err(self.conversion_failed(property, target, value, error));
            }

            setter(&mut *destination, value)?;
        }

        Ok(())
    }
}

impl<S, D> fmt::Debug for TypeMapper<S, D>
where
    S: Mappable,
    D: Mappable,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMapper")
            .field("source", &S::TYPE_NAME)
            .field("destination", &D::TYPE_NAME)
            .field("options", &self.options)
            .finish()
    }
}
