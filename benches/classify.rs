//! Benchmarks for line classification and aggregation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rulemerge::aggregator::RuleSet;
use rulemerge::classifier::{classify, classify_lines};
use std::hint::black_box;

/// Generate a mixed rule list: explicit prefixes, bare CIDRs, bare
/// domains, comments.
fn generate_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 5 {
            0 => format!("DOMAIN,host{}.example.org", i),
            1 => format!("10.{}.{}.0/24", i % 256, (i / 256) % 256),
            2 => format!("sub{}.example.org", i),
            3 => format!("IP-ASN,{},no-resolve", 40000 + i),
            _ => "# comment".to_string(),
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in [100, 1000, 10000] {
        let lines = generate_lines(size);
        group.bench_with_input(BenchmarkId::new("mixed_lines", size), &lines, |b, lines| {
            b.iter(|| {
                for line in lines {
                    black_box(classify(line));
                }
            });
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for size in [100, 1000, 10000] {
        // Duplicate the input so dedup has work to do
        let mut lines = generate_lines(size);
        lines.extend(lines.clone());
        let rules = classify_lines(&lines).rules;

        group.bench_with_input(
            BenchmarkId::new("with_duplicates", size * 2),
            &rules,
            |b, rules| {
                b.iter(|| {
                    let mut set = RuleSet::new("bench");
                    set.extend(rules.iter().cloned());
                    black_box(set.total())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_aggregate);
criterion_main!(benches);
