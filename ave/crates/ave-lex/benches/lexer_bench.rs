use ave_lex::lex;
use ave_util::{FileId, Handler};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::PathBuf;

const SAMPLE: &str = r#"
record Point:
  x: num
  y: num

func distance(a: Point, b: Point) -> num:
  dx = a.x - b.x
  dy = a.y - b.y
  return (dx * dx + dy * dy) ** 0.5

var total = 0
for i = 0, 100:
  total += i
"#;

fn bench_lex_sample(c: &mut Criterion) {
    c.bench_function("lex_sample_program", |b| {
        b.iter(|| {
            let handler = Handler::new();
            let data = lex(PathBuf::from("<bench>"), FileId(0), SAMPLE.to_string(), &handler);
            black_box(data.tokens.len());
        });
    });
}

criterion_group!(benches, bench_lex_sample);
criterion_main!(benches);
