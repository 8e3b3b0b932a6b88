use ave_util::Symbol;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_intern_repeated(c: &mut Criterion) {
    c.bench_function("intern_repeated_identifier", |b| {
        b.iter(|| black_box(Symbol::intern("repeatedIdentifierName")));
    });
}

fn bench_intern_unique(c: &mut Criterion) {
    let mut i = 0usize;
    c.bench_function("intern_unique_identifier", |b| {
        b.iter(|| {
            i += 1;
            black_box(Symbol::intern(&format!("uniqueIdent{i}")));
        });
    });
}

criterion_group!(benches, bench_intern_repeated, bench_intern_unique);
criterion_main!(benches);
