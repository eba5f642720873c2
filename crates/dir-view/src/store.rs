//! Item store: a slot arena holding every tracked directory entry.
//!
//! Slots are addressed by a generation-checked `SlotId`. Freed slots go on a
//! free list and are reused, but reuse bumps the generation, so a stale id
//! held across a remove can never resolve to the new occupant.

use crate::identifier::ParsedId;
use crate::metadata::FileMetadata;
use crate::view::RowId;

/// Stable identifier for a tracked item, valid until the slot is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: u32,
    generation: u32,
}

/// Owned extended display info for an item.
///
/// The `ParsedId` is acquired on resolve and released (dropped) when the slot
/// is freed or the identifier is replaced on rename.
#[derive(Debug, Clone)]
pub struct ExtendedInfo {
    pub identifier: ParsedId,
    pub display_name: String,
}

/// One live or pending-visible directory entry.
#[derive(Debug, Clone)]
pub struct DirectoryItem {
    pub metadata: FileMetadata,
    pub extended: ExtendedInfo,
    /// Back-reference to the view row showing this item; `None` while the
    /// item has no row (filtered out).
    pub row: Option<RowId>,
}

enum Slot {
    Occupied { generation: u32, item: DirectoryItem },
    Free { generation: u32, next_free: Option<u32> },
}

/// Arena of item slots with a free list.
#[derive(Default)]
pub struct ItemStore {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    live: usize,
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Number of live (occupied) slots.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Takes the first free slot (or grows the table) and stores the item.
    pub fn allocate(&mut self, item: DirectoryItem) -> SlotId {
        self.live += 1;

        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            let generation = match slot {
                Slot::Free {
                    generation,
                    next_free,
                } => {
                    self.free_head = *next_free;
                    *generation
                }
                Slot::Occupied { .. } => unreachable!("free list points at occupied slot"),
            };
            *slot = Slot::Occupied { generation, item };
            return SlotId { index, generation };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot::Occupied { generation: 0, item });
        SlotId { index, generation: 0 }
    }

    /// Releases a slot, returning its item (the caller finishes any cleanup,
    /// then the owned identifier drops with the item).
    ///
    /// Returns `None` for a stale or already-freed id.
    pub fn free(&mut self, id: SlotId) -> Option<DirectoryItem> {
        let slot = self.slots.get_mut(id.index as usize)?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == id.generation => {
                let next_generation = id.generation.wrapping_add(1);
                let old = std::mem::replace(
                    slot,
                    Slot::Free {
                        generation: next_generation,
                        next_free: self.free_head,
                    },
                );
                self.free_head = Some(id.index);
                self.live -= 1;
                match old {
                    Slot::Occupied { item, .. } => Some(item),
                    Slot::Free { .. } => unreachable!(),
                }
            }
            _ => None,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&DirectoryItem> {
        match self.slots.get(id.index as usize)? {
            Slot::Occupied { generation, item } if *generation == id.generation => Some(item),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut DirectoryItem> {
        match self.slots.get_mut(id.index as usize)? {
            Slot::Occupied { generation, item } if *generation == id.generation => Some(item),
            _ => None,
        }
    }

    /// Iterates over all live items.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &DirectoryItem)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Occupied { generation, item } => Some((
                SlotId {
                    index: index as u32,
                    generation: *generation,
                },
                item,
            )),
            Slot::Free { .. } => None,
        })
    }

    /// Linear scan for the item whose stored identifier matches `id`.
    /// Resolves remove and rename targets. A miss is non-fatal (stale or
    /// never-added notification).
    pub fn locate_by_identifier(&self, id: &ParsedId) -> Option<SlotId> {
        self.iter()
            .find(|(_, item)| &item.extended.identifier == id)
            .map(|(slot, _)| slot)
    }

    /// Linear scan by stored file name, for notifications that carry only a
    /// name (the modify path).
    pub fn locate_by_name(&self, name: &str) -> Option<SlotId> {
        self.iter()
            .find(|(_, item)| item.metadata.name == name)
            .map(|(slot, _)| slot)
    }

    /// Drops every slot. Used on directory change (full reset).
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }
}

#[cfg(test)]
pub(crate) fn make_item(parent: &std::path::Path, name: &str, size: u64) -> DirectoryItem {
    use crate::metadata::FileAttributes;

    DirectoryItem {
        metadata: FileMetadata {
            name: name.to_string(),
            size,
            attributes: FileAttributes::empty(),
            modified_at: Some(1_700_000_000),
            created_at: Some(1_699_000_000),
        },
        extended: ExtendedInfo {
            identifier: ParsedId::new(parent, name),
            display_name: name.to_string(),
        },
        row: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_allocate_and_locate() {
        let mut store = ItemStore::new();
        let a = store.allocate(make_item(Path::new("/d"), "a.txt", 10));
        let b = store.allocate(make_item(Path::new("/d"), "b.txt", 20));

        assert_eq!(store.live_count(), 2);
        assert_eq!(store.locate_by_name("b.txt"), Some(b));
        assert_eq!(
            store.locate_by_identifier(&ParsedId::new("/d", "a.txt")),
            Some(a)
        );
        assert_eq!(store.locate_by_name("c.txt"), None);
    }

    #[test]
    fn test_free_reuses_slot_with_new_generation() {
        let mut store = ItemStore::new();
        let a = store.allocate(make_item(Path::new("/d"), "a.txt", 10));

        let freed = store.free(a).unwrap();
        assert_eq!(freed.metadata.name, "a.txt");
        assert_eq!(store.live_count(), 0);

        // Reuses the same physical slot.
        let b = store.allocate(make_item(Path::new("/d"), "b.txt", 20));
        assert_eq!(store.live_count(), 1);

        // The stale id must not resolve to the new occupant.
        assert!(store.get(a).is_none());
        assert!(store.free(a).is_none());
        assert_eq!(store.get(b).unwrap().metadata.name, "b.txt");
    }

    #[test]
    fn test_double_free_is_rejected() {
        let mut store = ItemStore::new();
        let a = store.allocate(make_item(Path::new("/d"), "a.txt", 10));
        assert!(store.free(a).is_some());
        assert!(store.free(a).is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut store = ItemStore::new();
        let a = store.allocate(make_item(Path::new("/d"), "a.txt", 10));
        store.clear();
        assert_eq!(store.live_count(), 0);
        assert!(store.get(a).is_none());
    }
}
