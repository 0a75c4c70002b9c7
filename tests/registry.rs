//! Integration tests for registration, dispatch and configuration units.

use std::{any::Any, sync::Arc};

use propmapper::{prelude::*, Result};

#[derive(Debug, Clone, Default, PartialEq)]
struct Order {
    number: u32,
    total: f64,
    note: Option<String>,
}

mappable!(Order {
    number: u32,
    total: f64,
    note: Option<String>,
});

#[derive(Debug, Clone, Default, PartialEq)]
struct OrderDto {
    number: String,
    total: f32,
    comment: Option<String>,
}

mappable!(OrderDto {
    number: String,
    total: f32,
    comment: Option<String>,
});

/// Plain types without property tables, mapped by hand
struct Celsius(f64);
struct Fahrenheit(f64);

struct TemperatureMapper;

impl TypeMap<Celsius, Fahrenheit> for TemperatureMapper {
    fn map(&self, source: &Celsius) -> Result<Fahrenheit> {
        Ok(Fahrenheit(source.0 * 9.0 / 5.0 + 32.0))
    }

    fn map_into(&self, source: &Celsius, destination: &mut Fahrenheit) -> Result<()> {
        *destination = self.map(source)?;
        Ok(())
    }
}

#[derive(Default)]
struct OrderMappings;

impl MapperConfig for OrderMappings {
    fn configure(&self, registry: &mut MapperRegistry) {
        registry.register_with::<Order, OrderDto, _>(|options| {
            options.rename("note", "comment");
        });
    }
}

#[derive(Default)]
struct TemperatureMappings;

impl MapperConfig for TemperatureMappings {
    fn configure(&self, registry: &mut MapperRegistry) {
        registry.register_mapper::<Celsius, Fahrenheit, _>(TemperatureMapper);
    }
}

fn order() -> Order {
    Order {
        number: 77,
        total: 19.5,
        note: Some("gift wrap".to_string()),
    }
}

#[test]
fn custom_mapper_for_plain_types() -> Result<()> {
    let mut registry = MapperRegistry::new();
    registry.register_mapper::<Celsius, Fahrenheit, _>(TemperatureMapper);

    let hot = registry.map::<Celsius, Fahrenheit>(&Celsius(100.0))?;
    assert_eq!(hot.0, 212.0);

    let mut cold = Fahrenheit(0.0);
    registry.map_into(&Celsius(-40.0), &mut cold)?;
    assert_eq!(cold.0, -40.0);
    Ok(())
}

#[test]
fn missing_pair_names_both_types() {
    let registry = MapperRegistry::new();
    let message = match registry.map::<Order, OrderDto>(&order()) {
        Err(err @ Error::NoMapperRegistered { .. }) => err.to_string(),
        other => panic!("unexpected result {:?}", other.map(|_| ())),
    };

    assert!(message.contains("Order"));
    assert!(message.contains("OrderDto"));
}

#[test]
fn reregistration_replaces_mapper() -> Result<()> {
    let mut registry = MapperRegistry::new();
    registry.register::<Order, OrderDto>();
    assert_eq!(registry.map::<Order, OrderDto>(&order())?.comment, None);

    registry.register_with::<Order, OrderDto, _>(|options| {
        options.rename("note", "comment");
    });
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.map::<Order, OrderDto>(&order())?.comment.as_deref(),
        Some("gift wrap")
    );
    Ok(())
}

#[test]
fn registered_mapper_is_retrievable() -> Result<()> {
    let mut registry = MapperRegistry::new();
    registry.register::<Order, OrderDto>();

    let mapper = registry
        .mapper::<Order, OrderDto>()
        .expect("mapper registered");
    assert_eq!(mapper.map(&order())?.number, "77");
    assert!(registry.mapper::<OrderDto, Order>().is_none());
    Ok(())
}

#[test]
fn dynamic_dispatch_revalidates_types() {
    let mut registry = MapperRegistry::new();
    registry.register::<Order, OrderDto>();
    let pair = TypePair::of::<Order, OrderDto>();

    let source: &dyn Any = &order();
    let mapped = registry.map_dynamic(pair, Some(source)).unwrap();
    let dto = mapped.downcast::<OrderDto>().unwrap();
    assert_eq!(dto.total, 19.5);

    let wrong: &dyn Any = &OrderDto::default();
    assert!(matches!(
        registry.map_dynamic(pair, Some(wrong)),
        Err(Error::InstanceMismatch { expected: "Order" })
    ));
    assert!(matches!(
        registry.map_dynamic(pair, None),
        Err(Error::NullArgument { argument: "source" })
    ));

    let mut destination = OrderDto::default();
    registry
        .map_dynamic_into(pair, Some(source), Some(&mut destination))
        .unwrap();
    assert_eq!(destination.number, "77");
}

#[test]
fn configuration_units_build_a_shared_registry() -> Result<()> {
    let registry: Arc<MapperRegistry> = MapperRegistry::build(|mappers| {
        mappers.catalog_mut().register::<TemperatureMappings>();
        mappers.add::<OrderMappings>().add_type("TemperatureMappings")?;
        Ok(())
    })?;

    assert_eq!(registry.len(), 2);
    assert!(registry.contains::<Order, OrderDto>());
    assert!(registry.contains::<Celsius, Fahrenheit>());

    let dto = registry.map::<Order, OrderDto>(&order())?;
    assert_eq!(dto.comment.as_deref(), Some("gift wrap"));
    Ok(())
}

#[test]
fn unknown_configuration_name_is_rejected() {
    let mut catalog = ConfigCatalog::new();
    catalog.register::<OrderMappings>();
    let mut configurator = MapperConfigurator::with_catalog(catalog);

    let err = configurator.add_type("Order").unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidConfigurationType { ref type_name } if type_name == "Order"
    ));
    assert!(configurator.is_empty());
}
