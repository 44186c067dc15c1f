//! End-of-run reporting: configuration echo, cache contents
//! and the labelled results block

use std::io;
use std::io::Write;

use crate::memory::Cache;
use crate::memory::CacheStats;
use crate::memory::Hierarchy;
use crate::run_wrapper::SimulationParams;

/// Echo the command-line configuration
pub fn write_configuration<W: Write>(params: &SimulationParams, out: &mut W) -> io::Result<()> {
    writeln!(out, "===== Simulator configuration =====")?;
    writeln!(out, "{:<23}{}", "BLOCKSIZE:", params.l1.block_size)?;
    writeln!(out, "{:<23}{}", "L1_SIZE:", params.l1.size)?;
    writeln!(out, "{:<23}{}", "L1_ASSOC:", params.l1.associativity)?;
    writeln!(out, "{:<23}{}", "L2_SIZE:", params.l2.size)?;
    writeln!(out, "{:<23}{}", "L2_ASSOC:", params.l2.associativity)?;
    writeln!(out, "{:<23}{}", "PREF_N:", params.pref_n)?;
    writeln!(out, "{:<23}{}", "PREF_M:", params.pref_m)?;
    writeln!(out, "{:<23}{}", "trace_file:", params.trace_file.display())?;
    writeln!(out)
}

/// Dump the valid lines of every set in MRU to LRU order.
/// Sets without valid lines are omitted; a cache without any
/// valid line prints a single `Empty`
pub fn write_contents<W: Write>(cache: &Cache, name: &str, out: &mut W) -> io::Result<()> {
    writeln!(out, "===== {} contents =====", name)?;

    let mut has_valid_lines = false;
    for (set_index, set) in cache.sets.iter().enumerate() {
        if set.valid_lines().next().is_none() {
            continue;
        }
        write!(out, "Set {:>3}:", set_index)?;
        for line in set.valid_lines() {
            write!(out, " {:08x}", line.tag)?;
            if line.dirty {
                write!(out, " D")?;
            }
        }
        writeln!(out)?;
        has_valid_lines = true;
    }

    if !has_valid_lines {
        writeln!(out, "Empty")?;
    }
    writeln!(out)
}

/// The raw results block, items a. through q.
pub fn write_results<W: Write>(hierarchy: &Hierarchy, out: &mut W) -> io::Result<()> {
    writeln!(out, "===== Simulation results (raw) =====")?;

    let zero = CacheStats::default();
    let l1 = hierarchy.level(0).map_or(zero, |level| level.stats);
    let l2 = hierarchy.level(1).map(|level| level.stats);

    writeln!(out, "a. number of L1 reads:        {}", l1.reads)?;
    writeln!(out, "b. number of L1 read misses:  {}", l1.read_misses)?;
    writeln!(out, "c. number of L1 writes:       {}", l1.writes)?;
    writeln!(out, "d. number of L1 write misses: {}", l1.write_misses)?;
    writeln!(out, "e. L1 miss rate:              {:.6}", l1.miss_rate())?;
    writeln!(out, "f. number of writebacks from L1: {}", l1.writebacks)?;
    writeln!(out, "g. number of L1 prefetches:   0")?;

    let l2_stats = l2.unwrap_or(zero);
    writeln!(out, "h. number of L2 reads (demand): {}", l2_stats.reads)?;
    writeln!(out, "i. number of L2 read misses (demand): {}", l2_stats.read_misses)?;
    writeln!(out, "j. number of L2 reads (prefetch): 0")?;
    writeln!(out, "k. number of L2 read misses (prefetch): 0")?;
    writeln!(out, "l. number of L2 writes:       {}", l2_stats.writes)?;
    writeln!(out, "m. number of L2 write misses: {}", l2_stats.write_misses)?;
    // The L2 rate is the demand read miss rate, unlike L1's
    // overall rate
    writeln!(out, "n. L2 miss rate:              {:.6}", l2_stats.read_miss_rate())?;
    writeln!(out, "o. number of writebacks from L2: {}", l2_stats.writebacks)?;
    writeln!(out, "p. number of L2 prefetches:   0")?;
    writeln!(out, "q. total memory traffic:      {}", hierarchy.memory_traffic())?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::AccessType;
    use crate::memory::CacheConfig;
    use std::path::PathBuf;

    fn render<F: FnOnce(&mut Vec<u8>)>(f: F) -> String {
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_configuration_echo_format() {
        let params = SimulationParams {
            l1: CacheConfig::new(16, 1024, 2),
            l2: CacheConfig::new(16, 8192, 4),
            pref_n: 0,
            pref_m: 0,
            trace_file: PathBuf::from("traces/gcc_trace.txt"),
        };
        let rendered = render(|out| write_configuration(&params, out).unwrap());
        assert_eq!(
            rendered,
            "===== Simulator configuration =====\n\
             BLOCKSIZE:             16\n\
             L1_SIZE:               1024\n\
             L1_ASSOC:              2\n\
             L2_SIZE:               8192\n\
             L2_ASSOC:              4\n\
             PREF_N:                0\n\
             PREF_M:                0\n\
             trace_file:            traces/gcc_trace.txt\n\
             \n"
        );
    }

    #[test]
    fn test_contents_dump_is_mru_to_lru_with_dirty_markers() {
        // One set, two ways
        let mut hierarchy = Hierarchy::new(vec![CacheConfig::new(16, 32, 2)]);
        hierarchy.access(0x0, AccessType::Write);
        hierarchy.access(0x10, AccessType::Read);
        let rendered =
            render(|out| write_contents(&hierarchy.levels[0], "L1", out).unwrap());
        assert_eq!(
            rendered,
            "===== L1 contents =====\n\
             Set   0: 00000001 00000000 D\n\
             \n"
        );
    }

    #[test]
    fn test_contents_dump_does_not_mutate() {
        let mut hierarchy = Hierarchy::new(vec![CacheConfig::new(16, 64, 2)]);
        hierarchy.access(0x0, AccessType::Write);
        hierarchy.access(0x40, AccessType::Read);
        let before: Vec<_> = hierarchy.levels[0]
            .sets
            .iter()
            .map(|set| (set.lines.clone(), set.recency.clone()))
            .collect();
        let first = render(|out| write_contents(&hierarchy.levels[0], "L1", out).unwrap());
        let second = render(|out| write_contents(&hierarchy.levels[0], "L1", out).unwrap());
        let after: Vec<_> = hierarchy.levels[0]
            .sets
            .iter()
            .map(|set| (set.lines.clone(), set.recency.clone()))
            .collect();
        assert_eq!(first, second);
        assert_eq!(before, after);
    }

    #[test]
    fn test_contents_dump_empty_cache() {
        let hierarchy = Hierarchy::new(vec![CacheConfig::new(16, 64, 1)]);
        let rendered =
            render(|out| write_contents(&hierarchy.levels[0], "L1", out).unwrap());
        assert_eq!(rendered, "===== L1 contents =====\nEmpty\n\n");
    }

    #[test]
    fn test_results_block_without_l2() {
        // Cold misses only: 4 reads, 4 read misses
        let mut hierarchy = Hierarchy::new(vec![CacheConfig::new(16, 64, 1)]);
        for address in [0x0, 0x10, 0x20, 0x30] {
            hierarchy.access(address, AccessType::Read);
        }
        let rendered = render(|out| write_results(&hierarchy, out).unwrap());
        assert_eq!(
            rendered,
            "===== Simulation results (raw) =====\n\
             a. number of L1 reads:        4\n\
             b. number of L1 read misses:  4\n\
             c. number of L1 writes:       0\n\
             d. number of L1 write misses: 0\n\
             e. L1 miss rate:              1.000000\n\
             f. number of writebacks from L1: 0\n\
             g. number of L1 prefetches:   0\n\
             h. number of L2 reads (demand): 0\n\
             i. number of L2 read misses (demand): 0\n\
             j. number of L2 reads (prefetch): 0\n\
             k. number of L2 read misses (prefetch): 0\n\
             l. number of L2 writes:       0\n\
             m. number of L2 write misses: 0\n\
             n. L2 miss rate:              0.000000\n\
             o. number of writebacks from L2: 0\n\
             p. number of L2 prefetches:   0\n\
             q. total memory traffic:      4\n\
             \n"
        );
    }

    #[test]
    fn test_results_block_with_l2_uses_demand_read_miss_rate() {
        // L1 holds a single block, so block 0 bounces out of L1
        // but stays resident in L2
        let mut hierarchy = Hierarchy::new(vec![
            CacheConfig::new(16, 16, 1),
            CacheConfig::new(16, 64, 2),
        ]);
        hierarchy.access(0x0, AccessType::Read);
        hierarchy.access(0x40, AccessType::Read);
        // Hits in L2 after being evicted from L1
        hierarchy.access(0x0, AccessType::Read);
        let rendered = render(|out| write_results(&hierarchy, out).unwrap());
        assert!(rendered.contains("a. number of L1 reads:        3\n"));
        assert!(rendered.contains("b. number of L1 read misses:  3\n"));
        assert!(rendered.contains("h. number of L2 reads (demand): 3\n"));
        assert!(rendered.contains("i. number of L2 read misses (demand): 2\n"));
        assert!(rendered.contains("n. L2 miss rate:              0.666667\n"));
        assert!(rendered.contains("q. total memory traffic:      2\n"));
    }
}
