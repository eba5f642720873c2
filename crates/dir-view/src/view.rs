//! View collaborator: the virtualized list control showing the directory.
//!
//! The engine drives the view through this trait and never assumes anything
//! about its rendering. Rows are addressed by the `RowId` the view hands back
//! on insertion; each tracked item holds at most one row at a time.

use serde::{Deserialize, Serialize};

use crate::store::SlotId;

/// Handle to one view row, assigned by the view on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowId(pub u64);

/// Displayable fields of a row, refreshed on add, modify, and rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFields {
    pub display_text: String,
    pub icon_id: String,
    pub size: u64,
    /// Unix timestamp in seconds.
    pub modified_at: Option<u64>,
    /// Render the row ghosted (the entry carries the hidden attribute).
    pub hidden: bool,
}

/// Trait for the list control the engine keeps in sync.
pub trait ListView {
    /// Inserts a row at the given 0-based position, bound to a store slot.
    /// Returns the view's handle for the new row.
    fn insert_row(&mut self, position: usize, bound: SlotId, fields: RowFields) -> RowId;

    /// Deletes a row previously returned by `insert_row`.
    fn delete_row(&mut self, row: RowId);

    /// Refreshes the displayable fields of a row in place.
    fn update_row(&mut self, row: RowId, fields: RowFields);

    /// Whether the row is currently selected by the user.
    fn is_row_selected(&self, row: RowId) -> bool;

    /// Fired when the live item count transitions to zero with no filter
    /// active, so the owner can show an empty-folder placeholder.
    fn folder_empty(&mut self);
}
