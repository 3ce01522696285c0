//! Fixed-capacity open-addressing table with double hashing.
//!
//! Deleted slots are probe-transparent for lookups and reusable for inserts.
//! The table never grows: inserting into a table with no free or deleted slot
//! fails with [`InsertError::Full`].

use super::symbol::Symbol;

#[derive(Debug, Clone)]
enum Slot {
    Free,
    Deleted,
    Occupied(Symbol),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    Duplicate,
    Full,
}

#[derive(Debug, Clone)]
pub struct SymbolMap {
    slots: Vec<Slot>,
    len: usize,
}

/// Polynomial rolling hash, multiplier 31.
pub fn primary_hash(name: &str, capacity: usize) -> usize {
    let h = name.bytes().fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(usize::from(b)));
    h % capacity
}

/// Probe step: multiplier 17, reduced to an odd value in `[1, capacity - 2]`.
pub fn probe_step(name: &str, capacity: usize) -> usize {
    let h = name.bytes().fold(0usize, |h, b| h.wrapping_mul(17).wrapping_add(usize::from(b)));
    let range = capacity.saturating_sub(2).max(1);
    (h % range) | 1
}

impl SymbolMap {
    /// `capacity` should be prime so every probe sequence visits every slot.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(3);
        Self { slots: vec![Slot::Free; capacity], len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn probe(&self, name: &str) -> impl Iterator<Item = usize> {
        let cap = self.capacity();
        let start = primary_hash(name, cap);
        let step = probe_step(name, cap);
        (0..cap).map(move |i| (start + i * step) % cap)
    }

    fn find_slot(&self, name: &str) -> Option<usize> {
        for idx in self.probe(name) {
            match &self.slots[idx] {
                Slot::Free => return None,
                Slot::Deleted => continue,
                Slot::Occupied(sym) if sym.name == name => return Some(idx),
                Slot::Occupied(_) => continue,
            }
        }
        None
    }

    pub fn insert(&mut self, symbol: Symbol) -> Result<&mut Symbol, InsertError> {
        let mut reusable = None;
        let mut target = None;
        for idx in self.probe(&symbol.name) {
            match &self.slots[idx] {
                Slot::Free => {
                    target = Some(reusable.unwrap_or(idx));
                    break;
                }
                Slot::Deleted => {
                    reusable.get_or_insert(idx);
                }
                Slot::Occupied(existing) if existing.name == symbol.name => {
                    return Err(InsertError::Duplicate);
                }
                Slot::Occupied(_) => {}
            }
        }
        let idx = target.or(reusable).ok_or(InsertError::Full)?;
        self.slots[idx] = Slot::Occupied(symbol);
        self.len += 1;
        match &mut self.slots[idx] {
            Slot::Occupied(sym) => Ok(sym),
            Slot::Free | Slot::Deleted => unreachable!("slot was just filled"),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        match &self.slots[self.find_slot(name)?] {
            Slot::Occupied(sym) => Some(sym),
            Slot::Free | Slot::Deleted => None,
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let idx = self.find_slot(name)?;
        match &mut self.slots[idx] {
            Slot::Occupied(sym) => Some(sym),
            Slot::Free | Slot::Deleted => None,
        }
    }

    /// Marks the slot deleted without compaction.
    pub fn remove(&mut self, name: &str) -> Option<Symbol> {
        let idx = self.find_slot(name)?;
        match std::mem::replace(&mut self.slots[idx], Slot::Deleted) {
            Slot::Occupied(sym) => {
                self.len -= 1;
                Some(sym)
            }
            other => {
                self.slots[idx] = other;
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(sym) => Some(sym),
            Slot::Free | Slot::Deleted => None,
        })
    }
}
