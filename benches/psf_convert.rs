//! Decode, encode and merge benchmarks on synthetic fonts.
//!
//! The large font mimics a Terminus 16x32 build: 512 glyphs with a unicode
//! table, the slowest shape found in console-setup.

use criterion::{criterion_group, criterion_main, Criterion};
use psf2flf::{
    flf,
    test_support::{patterned_psf1, Psf2Builder},
    Font, RenderMode,
};
use std::hint::black_box;

fn large_psf2() -> Vec<u8> {
    let glyphs = 512u32;
    let chars: Vec<String> = (0..glyphs)
        .map(|i| char::from_u32(0x20 + i).map(String::from).unwrap_or_default())
        .collect();
    let entries: Vec<&str> = chars.iter().map(String::as_str).collect();
    let mut builder = Psf2Builder::new(16, 32, glyphs);
    for i in 0..glyphs as usize {
        let row = [(i >> 8) as u8 | 0x81, i as u8];
        builder = builder.glyph(i, &row.repeat(32));
    }
    builder.unicode_entries(&entries).build()
}

fn bench_decode(c: &mut Criterion) {
    let small = patterned_psf1();
    let large = large_psf2();
    c.bench_function("decode_psf1_8x8", |b| {
        b.iter(|| Font::load(black_box(&small)).unwrap())
    });
    c.bench_function("decode_psf2_16x32", |b| {
        b.iter(|| Font::load(black_box(&large)).unwrap())
    });
}

fn bench_encode(c: &mut Criterion) {
    let font = Font::load(&large_psf2()).unwrap();
    c.bench_function("encode_short_16x32", |b| {
        b.iter(|| flf::encode(black_box(&font), RenderMode::Short).unwrap())
    });
    c.bench_function("encode_tall_16x32", |b| {
        b.iter(|| flf::encode(black_box(&font), RenderMode::Tall).unwrap())
    });
}

fn bench_merge(c: &mut Criterion) {
    let small = Font::load(&patterned_psf1()).unwrap();
    let mut other = small.clone();
    other.meta.charset = Some("Uni2".into());
    c.bench_function("merge_identical_8x8", |b| {
        b.iter(|| {
            let mut font = small.clone();
            font.merge(black_box(&other)).unwrap();
            font
        })
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_merge);
criterion_main!(benches);
