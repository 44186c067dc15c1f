//! Cache level implementation

use super::AccessType;
use crate::error::ConfigError;

pub fn get_log_2(value: u32) -> usize {
    assert!(value > 0);
    31 - value.leading_zeros() as usize
}

pub fn is_pow_2(value: u32) -> bool {
    value != 0 && value & (value - 1) == 0
}

pub fn get_mask(bits: usize) -> u32 {
    (1 << bits) - 1
}

/// A single cache line.
/// A fresh line is invalid, clean, tag zero
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Line {
    pub valid: bool,
    pub dirty: bool,
    pub tag: u64,
}

/// Geometry of one cache level.
/// A level with `size == 0` is disabled and is never wired
/// into the hierarchy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub block_size: u32,
    pub size: u32,
    pub associativity: u32,
}

impl CacheConfig {
    pub fn new(block_size: u32, size: u32, associativity: u32) -> Self {
        Self { block_size, size, associativity }
    }

    pub fn is_enabled(&self) -> bool {
        self.size > 0
    }

    pub fn num_blocks(&self) -> u32 {
        self.size / self.block_size
    }

    pub fn num_sets(&self) -> u32 {
        self.num_blocks() / self.associativity
    }

    /// Validate the geometry, reporting the first violated rule
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::BlockSizeNotPositive);
        }
        if self.size == 0 {
            return Err(ConfigError::SizeNotPositive);
        }
        if self.associativity == 0 {
            return Err(ConfigError::AssociativityNotPositive);
        }
        if !is_pow_2(self.block_size) {
            return Err(ConfigError::BlockSizeNotPowerOfTwo);
        }
        if self.size % self.block_size != 0 {
            return Err(ConfigError::SizeNotMultipleOfBlockSize);
        }
        if self.num_blocks() % self.associativity != 0 {
            return Err(ConfigError::BlocksNotMultipleOfAssociativity);
        }
        if !is_pow_2(self.num_sets()) {
            return Err(ConfigError::SetsNotPowerOfTwo);
        }
        if self.associativity > self.num_blocks() {
            return Err(ConfigError::AssociativityExceedsBlocks);
        }
        Ok(())
    }
}

/// One set: the lines of each way plus the recency order.
/// `recency` is a permutation of the way indices where
/// position 0 is MRU and the last position is LRU
#[derive(Clone, Debug)]
pub struct CacheSet {
    pub lines: Vec<Line>,
    pub recency: Vec<usize>,
}

impl CacheSet {
    pub fn new(associativity: usize) -> Self {
        Self {
            lines: vec![Line::default(); associativity],
            recency: (0..associativity).collect(),
        }
    }

    /// Find the way holding a valid line with the given tag
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.valid && line.tag == tag)
    }

    /// Move the given way to the MRU position
    pub fn touch(&mut self, way: usize) {
        self.recency.retain(|&w| w != way);
        self.recency.insert(0, way);
    }

    /// The way at the LRU end, i.e. the next victim
    pub fn lru_way(&self) -> usize {
        *self.recency.last().unwrap()
    }

    /// Valid lines in MRU to LRU order
    pub fn valid_lines(&self) -> impl Iterator<Item = &Line> {
        self.recency.iter().map(|&w| &self.lines[w]).filter(|line| line.valid)
    }
}

/// Per-level access counters.
/// `writebacks` counts only dirty evictions sent to the memory
/// sink; a dirty victim evicted towards another cache level is
/// recorded there as a write instead
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct CacheStats {
    pub reads: u64,
    pub writes: u64,
    pub read_misses: u64,
    pub write_misses: u64,
    pub writebacks: u64,
}

impl CacheStats {
    pub fn record_access(&mut self, access: AccessType) {
        match access {
            AccessType::Read => self.reads += 1,
            AccessType::Write => self.writes += 1,
        }
    }

    pub fn record_miss(&mut self, access: AccessType) {
        match access {
            AccessType::Read => self.read_misses += 1,
            AccessType::Write => self.write_misses += 1,
        }
    }

    pub fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    pub fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// Overall miss rate, 0 when the level saw no accesses
    pub fn miss_rate(&self) -> f64 {
        if self.accesses() == 0 {
            0.0
        } else {
            self.misses() as f64 / self.accesses() as f64
        }
    }

    /// Demand read miss rate, 0 when the level saw no reads
    pub fn read_miss_rate(&self) -> f64 {
        if self.reads == 0 {
            0.0
        } else {
            self.read_misses as f64 / self.reads as f64
        }
    }

    pub fn write_miss_rate(&self) -> f64 {
        if self.writes == 0 {
            0.0
        } else {
            self.write_misses as f64 / self.writes as f64
        }
    }

    /// This level's contribution to memory traffic when it is the
    /// last level of the hierarchy
    pub fn memory_traffic(&self) -> u64 {
        self.read_misses + self.write_misses + self.writebacks
    }
}

/// One cache level
// Assume that address is 32-bit
// and looks like this:
// | tag | index | offset |
pub struct Cache {
    pub config: CacheConfig,
    pub stats: CacheStats,
    pub sets: Vec<CacheSet>,

    // Constants
    offset_bits: usize,
    index_bits: usize,
    index_mask: u32,
}

impl Cache {
    /// Build a level from a validated, enabled config
    pub fn new(config: CacheConfig) -> Self {
        debug_assert!(config.is_enabled());
        debug_assert!(config.validate().is_ok());

        let offset_bits = get_log_2(config.block_size);
        let index_bits = get_log_2(config.num_sets());
        let index_mask = get_mask(index_bits);

        let sets = (0..config.num_sets())
            .map(|_| CacheSet::new(config.associativity as usize))
            .collect();

        Self { config, stats: CacheStats::default(), sets, offset_bits, index_bits, index_mask }
    }

    pub fn set_index(&self, address: u32) -> usize {
        ((address >> self.offset_bits) & self.index_mask) as usize
    }

    pub fn tag(&self, address: u32) -> u64 {
        u64::from(address >> (self.offset_bits + self.index_bits))
    }

    /// Reconstruct the byte address of the block held by
    /// (tag, set_index)
    pub fn rebuild_address(&self, tag: u64, set_index: usize) -> u32 {
        let block_addr = (tag as u32) << self.index_bits | set_index as u32;
        block_addr << self.offset_bits
    }

    /// Check the structural invariants of every set:
    /// the recency order is a permutation of the ways, and
    /// no line is dirty-and-invalid
    pub fn check_invariants(&self) -> bool {
        let associativity = self.config.associativity as usize;
        for set in &self.sets {
            if set.recency.len() != associativity {
                return false;
            }
            let mut present = vec![false; associativity];
            for &way in &set.recency {
                if way >= associativity || present[way] {
                    return false;
                }
                present[way] = true;
            }
            for line in &set.lines {
                if line.dirty && !line.valid {
                    return false;
                }
            }
        }
        true
    }
}
