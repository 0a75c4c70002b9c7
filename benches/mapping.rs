#![allow(unused)]
extern crate propmapper;

use criterion::{criterion_group, criterion_main, Criterion};
use propmapper::prelude::*;
use std::hint::black_box;

#[derive(Default)]
struct Profile {
    id: i32,
    name: String,
    email: String,
    age: i32,
    score: f64,
    bio: Option<String>,
}

mappable!(Profile {
    id: i32,
    name: String,
    email: String,
    age: i32,
    score: f64,
    bio: Option<String>,
});

#[derive(Default)]
struct ProfileDto {
    id: i32,
    name: String,
    email_address: String,
    age: String,
    score: i32,
    bio: Option<String>,
}

mappable!(ProfileDto {
    id: i32,
    name: String,
    email_address: String,
    age: String,
    score: i32,
    bio: Option<String>,
});

fn profile() -> Profile {
    Profile {
        id: 1,
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        age: 36,
        score: 98.5,
        bio: Some("Analyst".to_string()),
    }
}

/// Mapping through the registry with warm caches, plain vs. converting vs. transforming
fn bench_map(c: &mut Criterion) {
    let source = profile();

    let mut registry = MapperRegistry::new();
    registry.register_with::<Profile, ProfileDto, _>(|options| {
        options.rename("email", "email_address");
    });

    let mut transforming = MapperRegistry::new();
    transforming.register_with::<Profile, ProfileDto, _>(|options| {
        options
            .rename("email", "email_address")
            .transform("name", |name: String| name.to_uppercase());
    });

    let mut group = c.benchmark_group("map");
    group.bench_function("registry_map", |b| {
        b.iter(|| registry.map::<Profile, ProfileDto>(black_box(&source)).unwrap())
    });
    group.bench_function("registry_map_into", |b| {
        let mut destination = ProfileDto::default();
        b.iter(|| {
            registry
                .map_into(black_box(&source), &mut destination)
                .unwrap()
        })
    });
    group.bench_function("registry_map_transform", |b| {
        b.iter(|| {
            transforming
                .map::<Profile, ProfileDto>(black_box(&source))
                .unwrap()
        })
    });
    group.finish();
}

/// Cold path: a fresh cache and mapper for every iteration
fn bench_cold(c: &mut Criterion) {
    let source = profile();

    c.bench_function("cold_register_and_map", |b| {
        b.iter(|| {
            let mut registry = MapperRegistry::new();
            registry.register::<Profile, ProfileDto>();
            registry.map::<Profile, ProfileDto>(black_box(&source)).unwrap()
        })
    });
}

/// Scalar conversion in isolation
fn bench_convert(c: &mut Criterion) {
    let target = TypeInfo::scalar(ScalarKind::I32);
    let text = Value::from("123456");
    let float = Value::F64(2.5);

    let mut group = c.benchmark_group("convert");
    group.bench_function("string_to_i32", |b| {
        b.iter(|| black_box(&text).convert_to(&target).unwrap())
    });
    group.bench_function("f64_to_i32", |b| {
        b.iter(|| black_box(&float).convert_to(&target).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_map, bench_cold, bench_convert);
criterion_main!(benches);
