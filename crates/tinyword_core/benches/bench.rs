use divan::{bench, Bencher};
use tinyword_core::{Document, StyleTag};

fn main() {
    divan::main();
}

fn large_document() -> Document {
    let line = "the quick brown fox jumps over the lazy dog\n";
    Document::from_runs(std::iter::repeat((line, StyleTag::Normal)).take(2000))
}

#[bench]
fn apply_style_everything(bencher: Bencher) {
    let mut doc = large_document();
    let len = doc.len();

    bencher.bench_local(|| {
        doc.apply_style(0..len, StyleTag::Bold).unwrap();
    });
}

#[bench]
fn apply_style_word(bencher: Bencher) {
    let mut doc = large_document();

    bencher.bench_local(|| {
        doc.apply_style(4_000..4_005, StyleTag::Red).unwrap();
    });
}

#[bench(min_time = 0.25)]
fn insert_then_remove(bencher: Bencher) {
    let mut doc = large_document();

    bencher.bench_local(|| {
        doc.insert(40_000, "x", StyleTag::Normal).unwrap();
        doc.remove(40_000..40_001).unwrap();
    });
}

#[bench]
fn co_edit_far_apart(bencher: Bencher) {
    let mut doc = large_document();
    let len = doc.len();

    bencher.bench_local(|| {
        doc.insert(0, "x", StyleTag::Normal).unwrap();
        doc.remove(len..len + 1).unwrap();
    });
}
