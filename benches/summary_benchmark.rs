//! Benchmarks for reading slides and rendering inspection summaries.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use deckwright::{summarize, Deck, Rect, RoundedBox, SlideLayout};

/// Builds a presentation with `slide_count` slides of five boxes each.
fn create_test_deck(slide_count: usize) -> Vec<u8> {
    let mut deck = Deck::create().unwrap();
    let look = RoundedBox::default();
    for i in 0..slide_count {
        let index = deck
            .add_slide(SlideLayout::TitleOnly, Some(&format!("Slide {}", i + 1)))
            .unwrap();
        for b in 0..5 {
            let rect = Rect::from_points(40.0 + 130.0 * b as f64, 200.0, 120.0, 80.0);
            deck.add_rounded_text_box(index, &format!("Step {} of slide {}", b + 1, i + 1), rect, &look)
                .unwrap();
        }
    }
    deck.to_bytes().unwrap()
}

fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");

    for slide_count in [1, 10, 50] {
        let data = create_test_deck(slide_count);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("slides", slide_count), &data, |b, data| {
            b.iter(|| Deck::from_bytes(black_box(data.clone())).unwrap())
        });
    }

    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary");

    for slide_count in [1, 10, 50] {
        let deck = Deck::from_bytes(create_test_deck(slide_count)).unwrap();
        group.bench_with_input(BenchmarkId::new("slides", slide_count), &deck, |b, deck| {
            b.iter(|| {
                let snapshot = deck.snapshot().unwrap();
                summarize(black_box(&snapshot), "bench.pptx")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_open, bench_summary);
criterion_main!(benches);
