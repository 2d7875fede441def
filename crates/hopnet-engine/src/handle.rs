//! Generational table backing [`RunHandle`]s.
//!
//! A handle packs a slot index (upper 32 bits) and a generation (lower 32
//! bits). Taking an entry bumps the slot's generation, so a handle that was
//! already consumed never resolves again, even after its slot is reused.

use std::fmt;

/// Opaque identifier for a dispatched run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunHandle(u64);

impl RunHandle {
    fn pack(slot: u32, generation: u32) -> Self {
        Self((u64::from(slot) << 32) | u64::from(generation))
    }

    fn slot(self) -> usize {
        (self.0 >> 32) as usize
    }

    fn generation(self) -> u32 {
        self.0 as u32
    }

    /// Rebuild a handle from its raw value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw `u64` value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {}#{}", self.slot(), self.generation())
    }
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Slots hold at most one value each; vacated slots are recycled unless
/// their generation has wrapped.
pub(crate) struct RunTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
}

impl<T> RunTable<T> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> RunHandle {
        if let Some(slot) = self.vacant.pop() {
            let entry = &mut self.entries[slot as usize];
            entry.value = Some(value);
            return RunHandle::pack(slot, entry.generation);
        }
        let slot = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            value: Some(value),
        });
        RunHandle::pack(slot, 0)
    }

    pub(crate) fn contains(&self, handle: RunHandle) -> bool {
        self.entries
            .get(handle.slot())
            .is_some_and(|e| e.generation == handle.generation() && e.value.is_some())
    }

    /// Remove and return the value. `None` for stale or unknown handles.
    pub(crate) fn take(&mut self, handle: RunHandle) -> Option<T> {
        let entry = self.entries.get_mut(handle.slot())?;
        if entry.generation != handle.generation() {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        // A wrapped generation could alias handles from the first epoch.
        if entry.generation != 0 {
            self.vacant.push(handle.slot() as u32);
        }
        Some(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_some()).count()
    }
}

impl<T> Default for RunTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_exactly_once() {
        let mut table = RunTable::new();
        let h = table.insert("job");
        assert!(table.contains(h));
        assert_eq!(table.take(h), Some("job"));
        assert_eq!(table.take(h), None);
        assert!(!table.contains(h));
    }

    #[test]
    fn reused_slot_does_not_resolve_old_handle() {
        let mut table = RunTable::new();
        let first = table.insert(1);
        table.take(first);
        let second = table.insert(2);
        assert_eq!(first.slot(), second.slot());
        assert_ne!(first, second);
        assert_eq!(table.take(first), None);
        assert_eq!(table.take(second), Some(2));
    }

    #[test]
    fn unknown_slot_is_none() {
        let mut table: RunTable<u8> = RunTable::new();
        assert_eq!(table.take(RunHandle::pack(7, 0)), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn wrapped_generation_retires_slot() {
        let mut table = RunTable::new();
        let h = table.insert(0);
        table.take(h);
        table.entries[0].generation = u32::MAX;
        let last = table.insert(1);
        assert_eq!(last.generation(), u32::MAX);
        table.take(last);
        assert!(table.vacant.is_empty());
        let fresh = table.insert(2);
        assert_eq!(fresh.slot(), 1);
        assert_eq!(table.take(RunHandle::pack(0, 0)), None);
    }

    #[test]
    fn raw_round_trip_and_display() {
        let h = RunHandle::pack(3, 5);
        assert_eq!(RunHandle::from_raw(h.raw()), h);
        assert_eq!(h.to_string(), "run 3#5");
    }
}
