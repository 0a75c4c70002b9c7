//! The type-pair registry.
//!
//! A [`MapperRegistry`] resolves a (source, destination) type pair to the mapper registered
//! for it and dispatches the call. Registration needs `&mut self` and happens during setup;
//! afterwards the registry is shared read-only (typically behind an [`Arc`]) and every
//! lookup is a plain hash map read.
//!
//! # Key Components
//!
//! - [`MapperRegistry`] - Registration and dispatch
//! - [`TypePair`] - Identity of a (source, destination) pair
//!
//! # Examples
//!
//! ```rust
//! use propmapper::{mappable, MapperRegistry};
//!
//! #[derive(Default)]
//! struct User {
//!     name: String,
//!     email: String,
//! }
//!
//! #[derive(Default)]
//! struct UserDto {
//!     name: String,
//!     email_address: String,
//! }
//!
//! mappable!(User { name: String, email: String });
//! mappable!(UserDto { name: String, email_address: String });
//!
//! let mut registry = MapperRegistry::new();
//! registry.register_with::<User, UserDto, _>(|options| {
//!     options.rename("email", "email_address");
//! });
//!
//! let user = User { name: "Ada".into(), email: "ada@example.com".into() };
//! let dto = registry.map::<User, UserDto>(&user)?;
//! assert_eq!(dto.email_address, "ada@example.com");
//! # Ok::<(), propmapper::Error>(())
//! ```

mod erased;

use std::{any::Any, collections::HashMap, fmt, sync::Arc};

use log::debug;

use crate::{
    accessor::{AccessorCache, Mappable},
    mapper::{MappingOptions, TypeMap, TypeMapper},
    Error, Result,
};

use erased::{Erased, ErasedMapper};

pub use erased::TypePair;

struct MapperEntry {
    /// Holds an `Arc<dyn TypeMap<S, D>>` for the entry's pair
    typed: Box<dyn Any + Send + Sync>,
    erased: Arc<dyn ErasedMapper>,
}

/// Registry of mappers keyed by (source type, destination type)
///
/// All [`TypeMapper`]s created through the registry share one [`AccessorCache`].
/// Registering a pair that is already present replaces its mapper.
#[derive(Default)]
pub struct MapperRegistry {
    cache: Arc<AccessorCache>,
    mappers: HashMap<TypePair, MapperEntry>,
}

impl MapperRegistry {
    /// Empty registry with its own accessor cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry creating its mappers over an existing `cache`
    #[must_use]
    pub fn with_cache(cache: Arc<AccessorCache>) -> Self {
        MapperRegistry {
            cache,
            mappers: HashMap::new(),
        }
    }

    /// The accessor cache shared by mappers created through this registry
    #[must_use]
    pub fn cache(&self) -> &Arc<AccessorCache> {
        &self.cache
    }

    /// Register a mapper for (`S`, `D`) without overrides
    pub fn register<S, D>(&mut self) -> &mut Self
    where
        S: Mappable,
        D: Mappable + Default,
    {
        self.register_options::<S, D>(MappingOptions::new())
    }

    /// Register a mapper for (`S`, `D`) applying `options`
    pub fn register_options<S, D>(&mut self, options: MappingOptions) -> &mut Self
    where
        S: Mappable,
        D: Mappable + Default,
    {
        let mapper = TypeMapper::<S, D>::with_options(Arc::clone(&self.cache), options);
        self.insert::<S, D>(Arc::new(mapper))
    }

    /// Register a mapper for (`S`, `D`) whose options are filled in by `configure`
    pub fn register_with<S, D, F>(&mut self, configure: F) -> &mut Self
    where
        S: Mappable,
        D: Mappable + Default,
        F: FnOnce(&mut MappingOptions),
    {
        let mut options = MappingOptions::new();
        configure(&mut options);
        self.register_options::<S, D>(options)
    }

    /// Register a hand-written mapper for (`S`, `D`)
    ///
    /// Neither type has to implement [`Mappable`]; the registry only dispatches.
    pub fn register_mapper<S, D, M>(&mut self, mapper: M) -> &mut Self
    where
        S: Any,
        D: Any,
        M: TypeMap<S, D> + 'static,
    {
        self.insert::<S, D>(Arc::new(mapper))
    }

    fn insert<S: Any, D: Any>(&mut self, mapper: Arc<dyn TypeMap<S, D>>) -> &mut Self {
        let pair = TypePair::of::<S, D>();
        let entry = MapperEntry {
            typed: Box::new(Arc::clone(&mapper)),
            erased: Arc::new(Erased::new(mapper)),
        };

        if self.mappers.insert(pair, entry).is_some() {
            debug!("replaced mapper for {}", pair);
        } else {
            debug!("registered mapper for {}", pair);
        }
        self
    }

    /// The mapper registered for (`S`, `D`), if any
    #[must_use]
    pub fn mapper<S: Any, D: Any>(&self) -> Option<Arc<dyn TypeMap<S, D>>> {
        self.mappers
            .get(&TypePair::of::<S, D>())
            .and_then(|entry| entry.typed.downcast_ref::<Arc<dyn TypeMap<S, D>>>())
            .cloned()
    }

    /// Map `source` onto a new `D`
    ///
    /// # Errors
    /// Returns [`Error::NoMapperRegistered`] if nothing is registered for (`S`, `D`), or
    /// the mapper's error unchanged.
    pub fn map<S: Any, D: Any>(&self, source: &S) -> Result<D> {
        self.mapper::<S, D>()
            .ok_or_else(|| TypePair::of::<S, D>().not_registered())?
            .map(source)
    }

    /// Map `source` onto the existing `destination`
    ///
    /// # Errors
    /// Returns [`Error::NoMapperRegistered`] if nothing is registered for (`S`, `D`), or
    /// the mapper's error unchanged. `destination` may be partially populated on error.
    pub fn map_into<S: Any, D: Any>(&self, source: &S, destination: &mut D) -> Result<()> {
        self.mapper::<S, D>()
            .ok_or_else(|| TypePair::of::<S, D>().not_registered())?
            .map_into(source, destination)
    }

    /// Map an erased `source` through the mapper registered for `pair`
    ///
    /// The result is boxed as the pair's destination type.
    ///
    /// # Errors
    /// - [`Error::NullArgument`] if `source` is `None`
    /// - [`Error::NoMapperRegistered`] if nothing is registered for `pair`
    /// - [`Error::InstanceMismatch`] if `source` is not of the pair's source type
    pub fn map_dynamic(&self, pair: TypePair, source: Option<&dyn Any>) -> Result<Box<dyn Any>> {
        let source = source.ok_or(Error::NullArgument { argument: "source" })?;
        self.erased(pair)?.map(source)
    }

    /// Map an erased `source` onto an erased `destination` through the mapper for `pair`
    ///
    /// # Errors
    /// - [`Error::NullArgument`] if `source` or `destination` is `None`
    /// - [`Error::NoMapperRegistered`] if nothing is registered for `pair`
    /// - [`Error::InstanceMismatch`] if an argument is not of the pair's type
    pub fn map_dynamic_into(
        &self,
        pair: TypePair,
        source: Option<&dyn Any>,
        destination: Option<&mut dyn Any>,
    ) -> Result<()> {
        let source = source.ok_or(Error::NullArgument { argument: "source" })?;
        let destination = destination.ok_or(Error::NullArgument {
            argument: "destination",
        })?;
        self.erased(pair)?.map_into(source, destination)
    }

    fn erased(&self, pair: TypePair) -> Result<&Arc<dyn ErasedMapper>> {
        self.mappers
            .get(&pair)
            .map(|entry| &entry.erased)
            .ok_or_else(|| pair.not_registered())
    }

    /// True if a mapper is registered for (`S`, `D`)
    #[must_use]
    pub fn contains<S: Any, D: Any>(&self) -> bool {
        self.mappers.contains_key(&TypePair::of::<S, D>())
    }

    /// True if a mapper is registered for `pair`
    #[must_use]
    pub fn contains_pair(&self, pair: &TypePair) -> bool {
        self.mappers.contains_key(pair)
    }

    /// Number of registered pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    /// True if nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// The registered pairs, in no particular order
    pub fn pairs(&self) -> impl Iterator<Item = TypePair> + '_ {
        self.mappers.keys().copied()
    }
}

impl fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = self.pairs().map(|pair| pair.to_string()).collect();
        pairs.sort();

        f.debug_struct("MapperRegistry")
            .field("pairs", &pairs)
            .field("cached_types", &self.cache.type_count())
            .finish()
    }
}
