use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use enlighten::annotate::{Annotator, Occurrences};
use enlighten::dispatch::{ClickTarget, DEFAULT_HANDLE};
use enlighten::download::{FileSource, RemoteSource};
use enlighten::glossary::GlossaryStore;
use enlighten::scanner::find_entry_ids;
use enlighten::{NewEntry, Set};

const BENCH_FIXTURE: &str = "tests/fixtures/words_en.json";
const PARAGRAPH: &str = "<p>Gender and age are grounds of discrimination. Being asexual, \
    queer or <b class='intergender'>intergender</b> is outside the norm for many. \
    <en-ignore>Nothing here is matched: asexual gender.</en-ignore> \
    <enlighten data-word=\"age\">Years</enlighten> pass.</p>\n";

fn store() -> GlossaryStore {
    let words = FileSource.fetch(BENCH_FIXTURE).unwrap();
    let mut store = GlossaryStore::from_words(words).unwrap();
    // Enough filler rules that the priority table is not trivially short
    for i in 0..200 {
        let word = format!("filler{i}");
        let pattern = format!("{word}*");
        store
            .add_word(NewEntry::new(&word, &[pattern.as_str()], ""))
            .unwrap();
    }
    store
}

fn document() -> String {
    PARAGRAPH.repeat(100)
}

fn bench_scan(c: &mut Criterion) {
    let store = store();
    let text = document();
    let exclude = Set::default();

    c.bench_function("scan_100_paragraphs", |b| {
        b.iter(|| find_entry_ids(&store, black_box(&text), &exclude));
    });
}

fn bench_annotate(c: &mut Criterion) {
    let store = store();
    let text = document();
    let exclude = Set::default();
    let annotator = Annotator::new(&store, &exclude, DEFAULT_HANDLE).unwrap();

    c.bench_function("annotate_100_paragraphs", |b| {
        b.iter(|| annotator.annotate(black_box(&text), Occurrences::All, &ClickTarget::Popup));
    });
}

criterion_group!(benches, bench_scan, bench_annotate);
criterion_main!(benches);
