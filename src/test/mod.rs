//! Fixture types shared by the unit tests.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    pub title: Option<String>,
    pub pages: i32,
}

mappable!(Book {
    title: Option<String>,
    pages: i32,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDto {
    pub title: Option<String>,
    pub pages_count: i64,
}

mappable!(BookDto {
    title: Option<String>,
    pages_count: i64,
});

/// Declaration order (`id`, `name`, `age`, `email`, `password`) is relied upon by the
/// partial population tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: Option<String>,
    pub age: i32,
    pub email: Option<String>,
    pub password: Option<String>,
}

mappable!(User {
    #[readonly]
    id: i32,
    name: Option<String>,
    age: i32,
    email: Option<String>,
    password: Option<String>,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub name: Option<String>,
    pub age: String,
    pub email: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

mappable!(UserDto {
    id: i32,
    name: Option<String>,
    age: String,
    email: Option<String>,
    email_address: Option<String>,
    password: Option<String>,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub value: Option<String>,
}

mappable!(Item {
    value: Option<String>,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDto {
    pub value: i32,
}

mappable!(ItemDto { value: i32 });

/// Destination whose only property is read-only
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Locked {
    pub id: i32,
}

mappable!(Locked {
    #[readonly]
    id: i32,
});

/// Source with a write-only `password`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub name: Option<String>,
    pub password: Option<String>,
}

mappable!(Credentials {
    name: Option<String>,
    #[writeonly]
    password: Option<String>,
});
