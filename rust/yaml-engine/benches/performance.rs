// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

use std::fmt::Write as _;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use yaml_engine::{DumpSettings, LoadSettings, compose, dump, load, parse};

/// A device inventory with nested mappings, flow sequences and aliases.
fn inventory(devices: usize) -> String {
    let mut text = String::from("defaults: &defaults\n  mtu: 9214\n  vrf: default\ndevices:\n");
    for id in 0..devices {
        let _ = write!(
            text,
            "- name: leaf{id}\n  settings: *defaults\n  vlans: [10, 20, 30]\n  description: 'rack {id}, row a'\n"
        );
    }
    text
}

pub fn benchmark_parse(c: &mut Criterion) {
    let input = inventory(500);
    let settings = LoadSettings::default();
    c.bench_function("parse", |b| {
        b.iter(|| {
            parse(black_box(&input), &settings)
                .map(|parser| parser.filter_map(Result::ok).count())
        });
    });
}

pub fn benchmark_compose(c: &mut Criterion) {
    let input = inventory(500);
    let settings = LoadSettings::builder()
        .with_max_aliases_for_collections(1000)
        .build();
    let Ok(settings) = settings else {
        return;
    };
    c.bench_function("compose", |b| {
        b.iter(|| compose(black_box(&input), &settings));
    });
}

pub fn benchmark_dump(c: &mut Criterion) {
    let load_settings = LoadSettings::builder()
        .with_max_aliases_for_collections(1000)
        .build();
    let Ok(Ok(value)) = load_settings.map(|settings| load(&inventory(500), &settings)) else {
        return;
    };
    let settings = DumpSettings::default();
    c.bench_function("dump", |b| {
        b.iter(|| dump(black_box(&value), &settings));
    });
}

criterion_group!(benches, benchmark_parse, benchmark_compose, benchmark_dump);
criterion_main!(benches);
