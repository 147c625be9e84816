//! Ping/pong coupling over the in-process bus.
//!
//! Rank 0 ("ping") pushes a 100x100 grid at 293.0 under `data` and
//! commits it as timestep 0. Rank 1 ("pong") waits for that timestep and
//! samples it.
//!
//! Run with `cargo run -p braid --example ping`.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use braid::prelude::*;

fn ping(ifs: &mut Interface) -> Result<(), Box<dyn std::error::Error>> {
    for i in 0..100 {
        for j in 0..100 {
            ifs.push("data", [i as f64, j as f64], 293.0)?;
        }
    }
    let n = ifs.commit(0u64)?;
    println!("[{}] committed {n} values at timestep 0", ifs.uri());
    Ok(())
}

fn pong(ifs: &mut Interface) -> Result<(), Box<dyn std::error::Error>> {
    let wait = Wait::For(Duration::from_secs(5));
    let values = ifs.fetch_values("data", 0u64, TemporalSampler::Exact, wait)?;
    let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;
    let centre = ifs.fetch(
        "data",
        &Point::from([50.0, 50.0]),
        0u64,
        SpatialSampler::exact(),
        TemporalSampler::Exact,
        Wait::Never,
    )?;
    println!(
        "[{}] received {} values at timestep 0, mean {mean}, centre {centre}",
        ifs.uri(),
        values.len()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let parts = split_by_app(&["ping", "pong"])?;
    let bus = Arc::new(LocalBus::new(parts.len()));

    let handles: Vec<_> = parts
        .into_iter()
        .map(|part| {
            let bus = Arc::clone(&bus);
            thread::spawn(move || -> Result<(), String> {
                let config = InterfaceConfig::default();
                let mut set = create_interfaces("ping", &["ifs1"], &part, bus.as_ref(), &config)
                    .map_err(|e| e.to_string())?;
                let ifs = &mut set["ifs1"];
                let res = if part.app() == "ping" { ping(ifs) } else { pong(ifs) };
                res.map_err(|e| format!("rank {}: {e}", part.rank()))
            })
        })
        .collect();

    for h in handles {
        h.join().map_err(|_| "rank thread panicked")??;
    }
    Ok(())
}
