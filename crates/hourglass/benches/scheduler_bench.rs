use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hourglass::{Process, Scheduler, SimTime, Step};

#[derive(Default)]
struct Counter(u64);

struct Ticker {
    period: SimTime,
}

impl Process<Counter> for Ticker {
    type Error = std::convert::Infallible;

    fn label(&self) -> &'static str {
        "ticker"
    }

    fn resume(&mut self, world: &mut Counter, _now: SimTime) -> Result<Step, Self::Error> {
        world.0 += 1;
        Ok(Step::Sleep(self.period))
    }
}

fn bench_single_process(c: &mut Criterion) {
    c.bench_function("single_process_10k_wakes", |b| {
        b.iter(|| {
            let mut sched = Scheduler::new(Counter::default());
            sched.spawn(Ticker { period: 0.1 });
            sched.run_until(black_box(1_000.0)).unwrap();
            black_box(sched.world().0)
        })
    });
}

fn bench_many_processes(c: &mut Criterion) {
    // 100 processes with slightly different periods to exercise heap churn
    c.bench_function("hundred_processes_interleaved", |b| {
        b.iter(|| {
            let mut sched = Scheduler::new(Counter::default());
            for i in 0..100_u32 {
                sched.spawn(Ticker {
                    period: 0.5 + f64::from(i) * 0.01,
                });
            }
            sched.run_until(black_box(100.0)).unwrap();
            black_box(sched.world().0)
        })
    });
}

criterion_group!(benches, bench_single_process, bench_many_processes);
criterion_main!(benches);
