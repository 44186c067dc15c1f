use std::path::PathBuf;

xflags::xflags! {
    /// Two-level cache hierarchy simulator.
    cmd CacheSimArgs {
        /// Block size in bytes, shared by both levels (power of 2).
        required blocksize: u32

        /// L1 cache size in bytes.
        required l1_size: u32

        /// L1 set-associativity.
        required l1_assoc: u32

        /// L2 cache size in bytes (0 = no L2).
        required l2_size: u32

        /// L2 set-associativity.
        required l2_assoc: u32

        /// Number of stream buffers (0 = prefetching disabled; accepted but not simulated).
        required pref_n: u32

        /// Number of memory blocks per stream buffer.
        required pref_m: u32

        /// Path to the trace file.
        required trace_file: PathBuf
    }
}

use crate::memory::CacheConfig;
use crate::run_wrapper::SimulationParams;

impl From<CacheSimArgs> for SimulationParams {
    fn from(args: CacheSimArgs) -> Self {
        SimulationParams {
            l1: CacheConfig::new(args.blocksize, args.l1_size, args.l1_assoc),
            l2: CacheConfig::new(args.blocksize, args.l2_size, args.l2_assoc),
            pref_n: args.pref_n,
            pref_m: args.pref_m,
            trace_file: args.trace_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_arguments() {
        let args = CacheSimArgs::from_vec(vec![
            "16".into(),
            "1024".into(),
            "2".into(),
            "8192".into(),
            "4".into(),
            "0".into(),
            "0".into(),
            "traces/gcc_trace.txt".into(),
        ])
        .unwrap();
        assert_eq!(args.blocksize, 16);
        assert_eq!(args.l2_size, 8192);
        let params = SimulationParams::from(args);
        assert_eq!(params.l1.block_size, 16);
        assert_eq!(params.l2.block_size, 16);
        assert!(params.l2.is_enabled());
    }

    #[test]
    fn test_parse_rejects_negative_and_missing_arguments() {
        assert!(CacheSimArgs::from_vec(vec![
            "16".into(),
            "1024".into(),
            "2".into(),
            "-1".into(),
            "4".into(),
            "0".into(),
            "0".into(),
            "t.txt".into(),
        ])
        .is_err());
        assert!(CacheSimArgs::from_vec(vec!["16".into(), "1024".into()]).is_err());
    }
}
