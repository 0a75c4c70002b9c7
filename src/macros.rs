/// Declares the property table of a struct by implementing [`crate::Mappable`]
///
/// Every listed field becomes a property named after the field. Field types must implement
/// [`crate::value::PropertyValue`]. A field can be marked `#[readonly]` (no setter) or
/// `#[writeonly]` (no getter); unmarked fields are readable and writable. Fields that are
/// not listed are invisible to the mapping engine.
///
/// ```rust
/// use propmapper::mappable;
///
/// #[derive(Default)]
/// struct User {
///     id: i32,
///     name: Option<String>,
///     password: Option<String>,
/// }
///
/// mappable!(User {
///     #[readonly]
///     id: i32,
///     name: Option<String>,
///     #[writeonly]
///     password: Option<String>,
/// });
/// ```
#[macro_export]
macro_rules! mappable {
    ($name:ident { $( $(#[$mode:ident])? $field:ident : $ty:ty ),* $(,)? }) => {
        impl $crate::Mappable for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn describe() -> ::std::vec::Vec<$crate::PropertyDescriptor> {
                ::std::vec![
                    $( $crate::mappable!(@property $name, $field, $ty $(, $mode)?) ),*
                ]
            }
        }
    };

    (@property $name:ident, $field:ident, $ty:ty) => {
        $crate::PropertyDescriptor::new::<$name, $ty>(
            stringify!($field),
            Some($crate::mappable!(@read $name, $field, $ty)),
            Some($crate::mappable!(@write $name, $field, $ty)),
        )
    };

    (@property $name:ident, $field:ident, $ty:ty, readonly) => {
        $crate::PropertyDescriptor::new::<$name, $ty>(
            stringify!($field),
            Some($crate::mappable!(@read $name, $field, $ty)),
            None,
        )
    };

    (@property $name:ident, $field:ident, $ty:ty, writeonly) => {
        $crate::PropertyDescriptor::new::<$name, $ty>(
            stringify!($field),
            None,
            Some($crate::mappable!(@write $name, $field, $ty)),
        )
    };

    (@read $name:ident, $field:ident, $ty:ty) => {{
        fn read(instance: &dyn ::std::any::Any) -> Option<$crate::Value> {
            instance
                .downcast_ref::<$name>()
                .map(|it| <$ty as $crate::value::PropertyValue>::to_value(&it.$field))
        }
        read as $crate::accessor::ReadFn
    }};

    (@write $name:ident, $field:ident, $ty:ty) => {{
        fn write(
            instance: &mut dyn ::std::any::Any,
            value: $crate::Value,
        ) -> Option<::std::result::Result<(), $crate::value::ConversionError>> {
            instance.downcast_mut::<$name>().map(|it| {
                <$ty as $crate::value::PropertyValue>::from_value(value)
                    .map(|field| it.$field = field)
            })
        }
        write as $crate::accessor::WriteFn
    }};
}

/// Lets a cloneable nested type (`Clone + Send + Sync + 'static`) be used as a property value
///
/// The value travels through the mapping engine as a [`crate::value::ObjectValue`]; reading
/// the property clones the field, writing it clones out of the shared payload. Nested
/// values are never mapped member by member; pair them with a transform to convert
/// between different nested types.
///
/// ```rust
/// use propmapper::{mappable, object_property};
///
/// #[derive(Clone, Default)]
/// struct Address {
///     street: String,
/// }
///
/// #[derive(Default)]
/// struct Customer {
///     address: Option<Address>,
/// }
///
/// object_property!(Address);
/// mappable!(Customer { address: Option<Address> });
/// ```
#[macro_export]
macro_rules! object_property {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::value::PropertyValue for $ty {
                fn type_info() -> $crate::value::TypeInfo {
                    $crate::value::TypeInfo::object($crate::value::ObjectType::of::<$ty>())
                }

                fn to_value(&self) -> $crate::Value {
                    $crate::Value::Object($crate::value::ObjectValue::new(
                        ::std::clone::Clone::clone(self),
                    ))
                }

                fn from_value(
                    value: $crate::Value,
                ) -> ::std::result::Result<Self, $crate::value::ConversionError> {
                    let inner = match &value {
                        $crate::Value::Object(object) => object.downcast_ref::<$ty>().cloned(),
                        _ => None,
                    };
                    inner.ok_or_else(|| {
                        $crate::value::ConversionError::rejected(
                            &value,
                            <Self as $crate::value::PropertyValue>::type_info(),
                        )
                    })
                }
            }
        )+
    };
}
