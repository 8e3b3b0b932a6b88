use ave_lex::lex;
use ave_par::parse;
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

if total > 50:
  result = "big"
else:
  result = "small"
"#;

fn bench_parse_sample(c: &mut Criterion) {
    c.bench_function("parse_sample_program", |b| {
        b.iter(|| {
            let handler = Handler::new();
            let scanned = lex(PathBuf::from("<bench>"), FileId(0), SAMPLE.to_string(), &handler);
            let parsed = parse(scanned, &handler);
            black_box(parsed.ast.body.stmts.len());
        });
    });
}

criterion_group!(benches, bench_parse_sample);
criterion_main!(benches);
