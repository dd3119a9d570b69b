use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use rewrite_rules::{RequestFacts, RuleSet, RuleSetBuilder};

fn build_shared_ruleset() -> Arc<RuleSet> {
    let mut builder = RuleSetBuilder::new();
    for i in 0..20 {
        builder = builder.rule(&format!("^/old{i}/(.*)$"), &format!("/new{i}/$1"), &["R=301", "L"]);
    }
    let ruleset = builder
        .rule("^/(.*)\\.aspx$", "/$1.php", &["NC"])
        .compile()
        .unwrap();
    Arc::new(ruleset)
}

fn bench_throughput(c: &mut Criterion) {
    let thread_counts = [1, 2, 4, 8];

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    for &threads in &thread_counts {
        let ruleset = build_shared_ruleset();
        let facts = RequestFacts::new("/catalog/item.ASPX?id=7").host("www.foo.org");

        group.bench_function(&format!("{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let per_thread = iters / threads as u64;
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let rs = Arc::clone(&ruleset);
                        let f = facts.clone();
                        thread::spawn(move || {
                            let start = Instant::now();
                            for _ in 0..per_thread {
                                let _ = rs.interpret(&f);
                            }
                            start.elapsed()
                        })
                    })
                    .collect();

                let mut max_elapsed = Duration::ZERO;
                for h in handles {
                    let elapsed = h.join().unwrap();
                    if elapsed > max_elapsed {
                        max_elapsed = elapsed;
                    }
                }
                max_elapsed
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
