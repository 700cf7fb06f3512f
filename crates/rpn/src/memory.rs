//! Named memory: slots 00..=99 for STO/RCL.

use platform::MemorySlot;

/// Fixed bank of optional values; `None` marks an unused slot.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMemory {
    slots: [Option<f64>; MemorySlot::COUNT],
}

impl NamedMemory {
    pub const fn new() -> Self {
        Self {
            slots: [None; MemorySlot::COUNT],
        }
    }

    pub fn get(&self, slot: MemorySlot) -> Option<f64> {
        self.slots.get(slot.as_usize()).copied().flatten()
    }

    pub fn store(&mut self, slot: MemorySlot, value: f64) {
        if let Some(cell) = self.slots.get_mut(slot.as_usize()) {
            *cell = Some(value);
        }
    }

    pub fn clear_slot(&mut self, slot: MemorySlot) {
        if let Some(cell) = self.slots.get_mut(slot.as_usize()) {
            *cell = None;
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; MemorySlot::COUNT];
    }

    /// Used slots in ascending order.
    pub fn iter_used(&self) -> impl Iterator<Item = (MemorySlot, f64)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, v)| {
            let slot = MemorySlot::new(u8::try_from(i).ok()?).ok()?;
            v.map(|value| (slot, value))
        })
    }

    pub fn used_count(&self) -> usize {
        self.slots.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.used_count() == 0
    }
}

impl Default for NamedMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn slot(i: u8) -> MemorySlot {
        MemorySlot::new(i).unwrap()
    }

    #[test]
    fn test_store_and_recall() {
        let mut mem = NamedMemory::new();
        assert_eq!(mem.get(slot(7)), None);
        mem.store(slot(7), 1.5);
        assert_eq!(mem.get(slot(7)), Some(1.5));
        mem.clear_slot(slot(7));
        assert!(mem.is_empty());
    }

    #[test]
    fn test_iter_used_is_ascending() {
        let mut mem = NamedMemory::new();
        mem.store(slot(99), 3.0);
        mem.store(slot(0), 1.0);
        mem.store(slot(42), 2.0);
        let used: Vec<(u8, f64)> = mem.iter_used().map(|(s, v)| (s.get(), v)).collect();
        assert_eq!(used, vec![(0, 1.0), (42, 2.0), (99, 3.0)]);
    }
}
