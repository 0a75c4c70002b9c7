//! Configuration units and registry construction.
//!
//! Mappings are usually declared in configuration units: types implementing
//! [`MapperConfig`] that register a related group of mappers. A [`MapperConfigurator`]
//! collects units and applies them, in insertion order, to a fresh [`MapperRegistry`].
//!
//! Units can be added by type, by instance, or by name. Names resolve through a
//! [`ConfigCatalog`]; a name the catalog does not know fails with
//! [`Error::InvalidConfigurationType`].
//!
//! # Examples
//!
//! ```rust
//! use propmapper::{mappable, MapperConfig, MapperRegistry};
//!
//! #[derive(Default)]
//! struct Book {
//!     title: String,
//! }
//!
//! #[derive(Default)]
//! struct BookDto {
//!     title: String,
//! }
//!
//! mappable!(Book { title: String });
//! mappable!(BookDto { title: String });
//!
//! #[derive(Default)]
//! struct LibraryMappings;
//!
//! impl MapperConfig for LibraryMappings {
//!     fn configure(&self, registry: &mut MapperRegistry) {
//!         registry.register::<Book, BookDto>();
//!     }
//! }
//!
//! let registry = MapperRegistry::build(|mappers| {
//!     mappers.add::<LibraryMappings>();
//!     Ok(())
//! })?;
//!
//! let dto = registry.map::<Book, BookDto>(&Book { title: "Dune".into() })?;
//! assert_eq!(dto.title, "Dune");
//! # Ok::<(), propmapper::Error>(())
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use log::debug;

use crate::{value::short_type_name, Error, MapperRegistry, Result};

/// A unit of mapping configuration
pub trait MapperConfig: Send + Sync {
    /// Register this unit's mappers into `registry`
    fn configure(&self, registry: &mut MapperRegistry);
}

type ConfigFactory = fn() -> Box<dyn MapperConfig>;

fn construct<C: MapperConfig + Default + 'static>() -> Box<dyn MapperConfig> {
    Box::new(C::default())
}

/// Name-addressable set of configuration unit types
#[derive(Default, Clone)]
pub struct ConfigCatalog {
    factories: HashMap<&'static str, ConfigFactory>,
}

impl ConfigCatalog {
    /// Empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `C` resolvable under its short type name
    pub fn register<C: MapperConfig + Default + 'static>(&mut self) -> &mut Self {
        self.factories.insert(short_type_name::<C>(), construct::<C>);
        self
    }

    /// True if `name` resolves to a configuration unit
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Number of known unit types
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// True if no unit type is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Construct the unit registered as `name`
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfigurationType`] if `name` is not registered.
    pub fn resolve(&self, name: &str) -> Result<(&'static str, Box<dyn MapperConfig>)> {
        self.factories
            .get_key_value(name)
            .map(|(name, factory)| (*name, factory()))
            .ok_or_else(|| Error::InvalidConfigurationType {
                type_name: name.to_string(),
            })
    }
}

impl fmt::Debug for ConfigCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&&str> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ConfigCatalog").field("units", &names).finish()
    }
}

/// Collects configuration units and builds a registry from them
#[derive(Default)]
pub struct MapperConfigurator {
    catalog: ConfigCatalog,
    units: Vec<(&'static str, Box<dyn MapperConfig>)>,
}

impl MapperConfigurator {
    /// Configurator without units, over an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configurator resolving names through `catalog`
    #[must_use]
    pub fn with_catalog(catalog: ConfigCatalog) -> Self {
        MapperConfigurator {
            catalog,
            units: Vec::new(),
        }
    }

    /// The catalog used by [`MapperConfigurator::add_type`]
    #[must_use]
    pub fn catalog(&self) -> &ConfigCatalog {
        &self.catalog
    }

    /// Mutable access to the catalog
    pub fn catalog_mut(&mut self) -> &mut ConfigCatalog {
        &mut self.catalog
    }

    /// Add a default-constructed `C`
    pub fn add<C: MapperConfig + Default + 'static>(&mut self) -> &mut Self {
        self.add_instance(C::default())
    }

    /// Add an already constructed unit
    pub fn add_instance<C: MapperConfig + 'static>(&mut self, config: C) -> &mut Self {
        self.units.push((short_type_name::<C>(), Box::new(config)));
        self
    }

    /// Add the unit registered in the catalog as `name`
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfigurationType`] if the catalog does not know `name`.
    pub fn add_type(&mut self, name: &str) -> Result<&mut Self> {
        let unit = self.catalog.resolve(name)?;
        self.units.push(unit);
        Ok(self)
    }

    /// Number of collected units
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if no unit has been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Apply every unit, in insertion order, to a fresh registry
    #[must_use]
    pub fn configure(&self) -> MapperRegistry {
        let mut registry = MapperRegistry::new();
        for (name, unit) in &self.units {
            debug!("applying mapper configuration {}", name);
            unit.configure(&mut registry);
        }
        registry
    }
}

impl fmt::Debug for MapperConfigurator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units: Vec<&str> = self.units.iter().map(|(name, _)| *name).collect();
        f.debug_struct("MapperConfigurator")
            .field("catalog", &self.catalog)
            .field("units", &units)
            .finish()
    }
}

impl MapperRegistry {
    /// Build a shared registry from the units added by `setup`
    ///
    /// The returned handle is meant to be created once and held for the lifetime of the
    /// process.
    ///
    /// # Errors
    /// Returns the first error raised by `setup`.
    pub fn build<F>(setup: F) -> Result<Arc<MapperRegistry>>
    where
        F: FnOnce(&mut MapperConfigurator) -> Result<()>,
    {
        let mut configurator = MapperConfigurator::new();
        setup(&mut configurator)?;
        Ok(Arc::new(configurator.configure()))
    }
}
