use std::io;
use std::path::Path;
use std::process;

use sim_lib::memory::CacheConfig;
use sim_lib::memory::Hierarchy;
use sim_lib::run_wrapper;

fn main() {
    if let Err(e) = run_sweep() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Sweep single-level geometries over one trace and record the
/// miss rates for offline analysis
fn run_sweep() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let trace_path =
        args.next().ok_or("You should specify exactly one trace file")?;

    let output_path = "eval/sweep.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["Cache size", "Block size", "Miss rate", "Memory traffic"])?;

    // Cache sizes: 1KB - 256KB
    let cache_sizes = vec![1024, 4 * 1024, 16 * 1024, 64 * 1024, 256 * 1024];
    // Block sizes: 16B - 128B
    let block_sizes = vec![16, 32, 64, 128];

    for cache_size in &cache_sizes {
        for block_size in &block_sizes {
            let mut hierarchy =
                Hierarchy::new(vec![CacheConfig::new(*block_size, *cache_size, 1)]);
            // The report narration is not interesting here
            run_wrapper::run_trace(
                &mut hierarchy,
                Path::new(&trace_path),
                &mut io::sink(),
            )?;

            let stats = hierarchy.levels[0].stats;
            writer.write_record([
                cache_size.to_string(),
                block_size.to_string(),
                format!("{:.6}", stats.miss_rate()),
                hierarchy.memory_traffic().to_string(),
            ])?;
        }
    }

    writer.flush()?;
    eprintln!("Wrote {}", output_path);
    Ok(())
}
