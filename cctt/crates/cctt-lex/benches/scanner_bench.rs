//! Scanner benchmarks.
//!
//! Run with: `cargo bench --package cctt-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use cctt_lex::TokenTree;

fn token_count(source: &str) -> usize {
    TokenTree::new(source).expect("benchmark sources are valid").tokens().len()
}

const SIMPLE: &str = "namespace a { int x = 10; }";

const COMPLEX: &str = r##"
#include <cstdint>

namespace app::config {

    CCTT_INTROSPECT()
    enum struct Mode: std::uint8_t { idle, running, stopped };

    CCTT_INTROSPECT(description("a point"))
    struct Point final: public Object
    {
        double x{};
        double y{};

        Point(double x, double y): x{x}, y{y} {}

        auto length() const -> double { return x*x + y*y; }
        auto operator + (Point const& o) const -> Point;
    };

    template <class T>
    auto lerp(T a, T b, double t) -> T
    {
        return a * (1 - t) + b * t;
    }

    constexpr auto banner = R"x(hello "world")x";
}
"##;

fn bench_scanner_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");
    group.throughput(Throughput::Bytes(SIMPLE.len() as u64));
    group.bench_function("simple_namespace", |b| {
        b.iter(|| token_count(black_box(SIMPLE)))
    });
    group.finish();
}

fn bench_scanner_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_complex");
    group.throughput(Throughput::Bytes(COMPLEX.len() as u64));
    group.bench_function("introspected_source", |b| {
        b.iter(|| token_count(black_box(COMPLEX)))
    });
    group.finish();
}

criterion_group!(benches, bench_scanner_simple, bench_scanner_complex);
criterion_main!(benches);
