use criterion::{black_box, criterion_group, criterion_main, Criterion};
use corpus_wsd::annotation::{LowercaseLemmatizer, SegmentTagger, Tagger, Word};
use corpus_wsd::processing::SentenceBatcher;

// an article with a few short sentences and a run-on one (tables, lists)
fn article() -> String {
    let short = "The Louvre is the world's most-visited museum. ";
    let long = std::iter::repeat("item, ").take(1000).collect::<String>();
    format!("{}{}{}.", short.repeat(20), long, short.repeat(20))
}

pub fn batch(c: &mut Criterion) {
    let sentences: Vec<Vec<Word>> = SegmentTagger.tag(&article()).unwrap();
    let batcher = SentenceBatcher::default();
    let lemmatizer = LowercaseLemmatizer;

    c.bench_function("batch_article", |b| {
        b.iter(|| {
            batcher.batch(
                black_box("Louvre"),
                black_box(sentences.clone()),
                &lemmatizer,
            )
        })
    });
}

pub fn tag(c: &mut Criterion) {
    let text = article();
    c.bench_function("segment_tagger", |b| {
        b.iter(|| SegmentTagger.tag(black_box(&text)))
    });
}

criterion_group!(benches, batch, tag);
criterion_main!(benches);
