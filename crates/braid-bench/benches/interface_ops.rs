//! Criterion benchmarks for a full commit/fetch step on one interface.

use braid_bench::{reference_frame, reference_grid};
use braid_core::{Rank, Timestep};
use braid_engine::{create_interfaces, InterfaceConfig, Wait};
use braid_sampler::TemporalSampler;
use braid_test_utils::MockLink;
use braid_transport::{split_by_app, LocalBus, Transport};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Benchmark: push the 10K reference grid and commit it on a lone rank.
fn bench_push_commit_10k(c: &mut Criterion) {
    let (points, values) = reference_grid(100);
    let parts = split_by_app(&["ping"]).unwrap();
    let bus = LocalBus::new(1);
    let config = InterfaceConfig {
        history_capacity: Some(4),
        ..InterfaceConfig::default()
    };
    let mut set = create_interfaces("bench", &["ifs1"], &parts[0], &bus, &config).unwrap();
    let ifs = &mut set["ifs1"];
    let mut t = 0u64;

    c.bench_function("push_commit_10k", |b| {
        b.iter(|| {
            ifs.push_many("data", &points, &values).unwrap();
            black_box(ifs.commit(t).unwrap());
            t += 1;
        });
    });
}

/// Benchmark: receive a 10K-point frame and read all its values back.
fn bench_fetch_values_10k(c: &mut Criterion) {
    let (points, values) = reference_grid(100);
    let (link, peer) = MockLink::new("ifs1", Rank(1), &[Rank(0)]);
    let transport = SingleLink::new(link);
    let parts = split_by_app(&["ping"]).unwrap();
    let config = InterfaceConfig {
        received_capacity: Some(4),
        ..InterfaceConfig::default()
    };
    let mut set = create_interfaces("bench", &["ifs1"], &parts[0], &transport, &config).unwrap();
    let ifs = &mut set["ifs1"];
    let mut t = 0u64;

    c.bench_function("fetch_values_10k", |b| {
        b.iter(|| {
            peer.send(reference_frame(t, &points, &values));
            let v = ifs
                .fetch_values("data", Timestep(t), TemporalSampler::Exact, Wait::Never)
                .unwrap();
            black_box(v.len());
            t += 1;
        });
    });
}

/// Hands out one pre-built link.
struct SingleLink(std::sync::Mutex<Option<MockLink>>);

impl SingleLink {
    fn new(link: MockLink) -> Self {
        Self(std::sync::Mutex::new(Some(link)))
    }
}

impl Transport for SingleLink {
    fn open(
        &self,
        _partition: &braid_transport::Partition,
        _run: &str,
        _channels: &[String],
    ) -> Result<Vec<Box<dyn braid_transport::Link>>, braid_transport::TransportError> {
        let link = self.0.lock().unwrap().take().expect("opened once");
        Ok(vec![Box::new(link)])
    }
}

criterion_group!(benches, bench_push_commit_10k, bench_fetch_values_10k);
criterion_main!(benches);
