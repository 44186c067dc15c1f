//! Cache hierarchy: an ordered list of levels ending at a
//! memory sink

use super::cache::Cache;
use super::cache::CacheConfig;
use super::cache::Line;
use super::AccessType;

/// Terminal recipient of the traffic that leaves the last cache
/// level. It only counts events
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct MemorySink {
    pub reads: u64,
    pub writes: u64,
}

impl MemorySink {
    pub fn read(&mut self, address: u32) {
        log::trace!("memory read {:#010x}", address);
        self.reads += 1;
    }

    pub fn write(&mut self, address: u32) {
        log::trace!("memory write {:#010x}", address);
        self.writes += 1;
    }

    pub fn operations(&self) -> u64 {
        self.reads + self.writes
    }
}

/// The memory hierarchy. Level 0 is the top (L1); the last
/// level's successor is the memory sink. Disabled configs are
/// elided at wiring time, so every wired level is enabled
pub struct Hierarchy {
    pub levels: Vec<Cache>,
    pub memory: MemorySink,
}

impl Hierarchy {
    pub fn new(configs: Vec<CacheConfig>) -> Self {
        let levels = configs
            .into_iter()
            .filter(CacheConfig::is_enabled)
            .map(Cache::new)
            .collect();
        Self { levels, memory: MemorySink::default() }
    }

    pub fn level(&self, k: usize) -> Option<&Cache> {
        self.levels.get(k)
    }

    /// Total memory traffic: read misses, write misses and
    /// writebacks of the last level
    pub fn memory_traffic(&self) -> u64 {
        self.levels.last().map_or(0, |level| level.stats.memory_traffic())
    }

    /// Apply one reference to the top level.
    /// Returns whether it hit there
    pub fn access(&mut self, address: u32, access: AccessType) -> bool {
        if self.levels.is_empty() {
            // Defensive: disabled levels are elided at wiring time
            return false;
        }
        self.access_at(0, address, access)
    }

    /// Apply one access to level k, recursing into level k + 1
    /// (or the memory sink) on a miss
    fn access_at(&mut self, k: usize, address: u32, access: AccessType) -> bool {
        let (set_index, tag) = {
            let level = &self.levels[k];
            (level.set_index(address), level.tag(address))
        };

        // Lookup
        {
            let level = &mut self.levels[k];
            level.stats.record_access(access);
            if let Some(way) = level.sets[set_index].find(tag) {
                level.sets[set_index].touch(way);
                if access == AccessType::Write {
                    level.sets[set_index].lines[way].dirty = true;
                }
                return true;
            }
            level.stats.record_miss(access);
        }

        // Step 1: make space, writing back the victim if dirty.
        // The writeback is issued before the fill so the next
        // level sees the victim's traffic first
        let victim_way = self.levels[k].sets[set_index].lru_way();
        let victim = self.levels[k].sets[set_index].lines[victim_way];
        if victim.valid {
            if victim.dirty {
                let victim_address = self.levels[k].rebuild_address(victim.tag, set_index);
                log::debug!(
                    "L{}: evicting dirty block {:#010x} from set {}",
                    k + 1,
                    victim_address,
                    set_index
                );
                if k + 1 < self.levels.len() {
                    self.access_at(k + 1, victim_address, AccessType::Write);
                } else {
                    self.levels[k].stats.writebacks += 1;
                    self.memory.write(victim_address);
                }
            }
            self.levels[k].sets[set_index].lines[victim_way] = Line::default();
        }

        // Step 2: bring in the requested block. Whether it hits
        // below does not matter here
        let block_address = self.levels[k].rebuild_address(tag, set_index);
        if k + 1 < self.levels.len() {
            self.access_at(k + 1, block_address, AccessType::Read);
        } else {
            self.memory.read(block_address);
        }

        // Step 3: install, dirty iff the missing access is a write
        {
            let set = &mut self.levels[k].sets[set_index];
            set.lines[victim_way] =
                Line { valid: true, dirty: access == AccessType::Write, tag };
            set.touch(victim_way);
        }

        debug_assert!(self.levels[k].check_invariants());
        false
    }
}
