//! A simulator wrapper

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::error::SimulatorError;
use crate::error::SimulatorResult;
use crate::memory::CacheConfig;
use crate::memory::Hierarchy;
use crate::report;
use crate::trace::TraceEntry;

/// How many leading references are echoed verbatim
const ECHO_REFERENCES: u64 = 5;
/// Progress notice interval for large traces
const PROGRESS_INTERVAL: u64 = 100_000;

/// Full simulator parameters as given on the command line.
/// Both levels share the block size; `l2` may be disabled
#[derive(Clone, Debug)]
pub struct SimulationParams {
    pub l1: CacheConfig,
    pub l2: CacheConfig,
    pub pref_n: u32,
    pub pref_m: u32,
    pub trace_file: PathBuf,
}

impl SimulationParams {
    /// Validate cache geometries and prefetcher knobs.
    /// L1 must be enabled; only L2 may be disabled
    pub fn validate(&self) -> SimulatorResult<()> {
        self.l1
            .validate()
            .map_err(|source| SimulatorError::CacheConfig { level: "L1", source })?;
        if self.l2.is_enabled() {
            self.l2
                .validate()
                .map_err(|source| SimulatorError::CacheConfig { level: "L2", source })?;
        }
        // Stream buffers are not simulated, but the knobs are
        // still checked for consistency
        if self.pref_n > 0 && self.pref_m == 0 {
            return Err(SimulatorError::PrefetcherDepthMissing);
        }
        Ok(())
    }

    pub fn build_hierarchy(&self) -> Hierarchy {
        Hierarchy::new(vec![self.l1, self.l2])
    }
}

/// Outcome of driving one trace through the hierarchy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceSummary {
    /// Well-formed references applied to the top level
    pub accesses: u64,
    /// Malformed lines warned about and skipped
    pub skipped: u64,
}

/// Run the whole simulation, writing the report to `out`
pub fn run<W: Write>(params: &SimulationParams, out: &mut W) -> SimulatorResult<()> {
    params.validate()?;
    let mut hierarchy = params.build_hierarchy();

    report::write_configuration(params, out)?;
    writeln!(out, "Starting cache simulation...")?;
    run_trace(&mut hierarchy, &params.trace_file, out)?;
    writeln!(out)?;

    report::write_contents(&hierarchy.levels[0], "L1", out)?;
    if let Some(l2) = hierarchy.level(1) {
        report::write_contents(l2, "L2", out)?;
    }
    report::write_results(&hierarchy, out)?;
    Ok(())
}

/// Open a trace file and stream it through the hierarchy
pub fn run_trace<W: Write>(
    hierarchy: &mut Hierarchy,
    trace_file: &Path,
    out: &mut W,
) -> SimulatorResult<TraceSummary> {
    let file = File::open(trace_file).map_err(|source| SimulatorError::TraceOpen {
        path: trace_file.to_path_buf(),
        source,
    })?;

    writeln!(out, "Processing trace file: {}", trace_file.display())?;
    writeln!(
        out,
        "Note: All addresses are 32-bit (8 hex digits). Leading zeros may be omitted in trace file."
    )?;

    let summary = apply_trace(hierarchy, BufReader::new(file), out)?;

    writeln!(out, "Trace processing complete. Total accesses: {}", summary.accesses)?;
    Ok(summary)
}

/// Apply a trace from any line source to the top level.
/// Blank lines and `#` comments are skipped silently; malformed
/// lines are warned about on stderr and skipped
pub fn apply_trace<R: BufRead, W: Write>(
    hierarchy: &mut Hierarchy,
    reader: R,
    out: &mut W,
) -> SimulatorResult<TraceSummary> {
    let mut summary = TraceSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let entry: TraceEntry = match line.parse() {
            Ok(entry) => entry,
            Err(err) => {
                summary.skipped += 1;
                eprintln!("Warning: Invalid trace format at line {}: '{}'", line_number, line);
                log::debug!("line {} rejected: {}", line_number, err);
                continue;
            }
        };

        summary.accesses += 1;
        if summary.accesses <= ECHO_REFERENCES {
            writeln!(
                out,
                "Line {}: {} {:08x} (from: {})",
                line_number, entry.operation, entry.address, line
            )?;
        }

        hierarchy.access(entry.address, entry.operation);

        if summary.accesses % PROGRESS_INTERVAL == 0 {
            writeln!(out, "Processed {} accesses...", summary.accesses)?;
        }
    }

    Ok(summary)
}
