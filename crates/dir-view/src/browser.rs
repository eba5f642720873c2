//! The directory-view engine: routes change notifications into
//! add/remove/rename/modify operations against the item store, keeps the
//! view order sorted, and maintains the running size totals.

use std::path::{Path, PathBuf};

use crate::identifier::ParsedId;
use crate::metadata::FileMetadata;
use crate::namespace::{DisplayNameFormat, Namespace};
use crate::pending::PendingAddQueue;
use crate::sorting::{SortConfig, determine_sorted_position};
use crate::store::{DirectoryItem, ExtendedInfo, ItemStore, SlotId};
use crate::totals::{AggregateTotals, Delta};
use crate::view::{ListView, RowFields};
use crate::watcher::ChangeNotification;

/// Predicate deciding whether an entry is hidden from the view.
/// Returns `true` to exclude the entry. Excluded items stay in the store so
/// totals remain complete; they simply hold no row.
pub type FilterPredicate = Box<dyn Fn(&FileMetadata) -> bool>;

/// Live mirror of a single directory, bound to a view and a namespace.
///
/// Single-threaded: all mutation happens on the thread pumping
/// notifications. Stale notifications for a previously monitored directory
/// are tolerated — every routing path re-checks that the subject's immediate
/// parent is the current directory.
pub struct ShellBrowser<N: Namespace, V: ListView> {
    namespace: N,
    view: V,
    directory: PathBuf,
    /// Virtual (non-real) folders get in-folder-only display names.
    virtual_folder: bool,
    store: ItemStore,
    totals: AggregateTotals,
    pending: PendingAddQueue,
    sort: SortConfig,
    /// When off, new items append at the end instead of sorted insertion.
    insert_sorted: bool,
    filter: Option<FilterPredicate>,
    /// Display names the UI itself just created via drag-drop; their add
    /// notifications bypass sorted insertion (the drop already placed them).
    dropped_names: Vec<String>,
    /// Current view order: one slot per visible row, sorted.
    visible: Vec<SlotId>,
}

impl<N: Namespace, V: ListView> ShellBrowser<N, V> {
    pub fn new(namespace: N, view: V, directory: impl Into<PathBuf>) -> Self {
        Self {
            namespace,
            view,
            directory: directory.into(),
            virtual_folder: false,
            store: ItemStore::new(),
            totals: AggregateTotals::default(),
            pending: PendingAddQueue::new(),
            sort: SortConfig::default(),
            insert_sorted: true,
            filter: None,
            dropped_names: Vec::new(),
            visible: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn totals(&self) -> AggregateTotals {
        self.totals
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn pending(&self) -> &PendingAddQueue {
        &self.pending
    }

    /// Current view order, one slot per row.
    pub fn visible_order(&self) -> &[SlotId] {
        &self.visible
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn set_sort_config(&mut self, sort: SortConfig) {
        self.sort = sort;
    }

    pub fn set_insert_sorted(&mut self, insert_sorted: bool) {
        self.insert_sorted = insert_sorted;
    }

    pub fn set_virtual_folder(&mut self, virtual_folder: bool) {
        self.virtual_folder = virtual_folder;
    }

    /// Installs or clears the view filter. Applies to entries processed from
    /// now on; the owner reloads the directory to re-filter existing rows.
    pub fn set_filter(&mut self, filter: Option<FilterPredicate>) {
        self.filter = filter;
    }

    /// Records a display name the UI just created via drag-drop. The matching
    /// add notification appends at the end instead of sorted insertion.
    pub fn note_dropped_name(&mut self, display_name: &str) {
        self.dropped_names.push(display_name.to_string());
    }

    /// Switches to a new directory: full reset of store, totals, pending
    /// queue and view order, then seeds from an initial enumeration snapshot.
    ///
    /// The owner clears the view's rows and re-registers the watcher around
    /// this call.
    pub fn navigate(
        &mut self,
        directory: impl Into<PathBuf>,
        virtual_folder: bool,
        snapshot: Vec<FileMetadata>,
    ) {
        self.directory = directory.into();
        self.virtual_folder = virtual_folder;
        self.store.clear();
        self.totals.reset();
        self.pending.clear();
        self.dropped_names.clear();
        self.visible.clear();

        for metadata in snapshot {
            let id = ParsedId::new(&self.directory, metadata.name.clone());
            self.insert_resolved(id, metadata);
        }
    }

    /// Routes one decoded change notification.
    ///
    /// Reproduces the original routing table: a rename with both subjects in
    /// scope renames; with only the old subject in scope it removes (the item
    /// left the directory); with only the new subject in scope it is a
    /// documented no-op (a later update notification reconciles the entry).
    /// Removes act only on subjects whose immediate parent is the monitored
    /// directory, which discards stale events from a directory the user just
    /// navigated away from.
    pub fn handle_notification(&mut self, notification: ChangeNotification) {
        match notification {
            ChangeNotification::Renamed { old, new } => {
                let old_id = old
                    .as_deref()
                    .and_then(ParsedId::from_path)
                    .filter(|id| id.is_child_of(&self.directory));
                let new_id = new
                    .as_deref()
                    .and_then(ParsedId::from_path)
                    .filter(|id| id.is_child_of(&self.directory));

                match (old_id, new_id) {
                    (Some(old_id), Some(new_id)) => self.rename_item(&old_id, new_id),
                    (Some(old_id), None) => self.remove_by_identifier(&old_id),
                    (None, Some(new_id)) => {
                        // Item renamed into scope: not handled. Kept as a
                        // no-op to match the observed behavior.
                        log::debug!(
                            "Ignoring rename into monitored directory: {}",
                            new_id.name()
                        );
                    }
                    (None, None) => {}
                }
            }
            ChangeNotification::Removed { subject } => {
                if let Some(id) = ParsedId::from_path(&subject)
                    && id.is_child_of(&self.directory)
                {
                    self.remove_by_identifier(&id);
                }
            }
            ChangeNotification::Created { subject } => {
                if let Some(id) = ParsedId::from_path(&subject)
                    && id.is_child_of(&self.directory)
                {
                    let name = id.name().to_string();
                    self.add_item(&name);
                }
            }
            ChangeNotification::Modified { subject } => {
                if let Some(id) = ParsedId::from_path(&subject)
                    && id.is_child_of(&self.directory)
                {
                    let name = id.name().to_string();
                    self.modify_item(&name);
                }
            }
        }
    }

    /// Handles an add notification for a leaf name in the monitored
    /// directory.
    ///
    /// Resolution can fail when the object was renamed or deleted before this
    /// ran; the name then waits in the pending-add queue for a later retry —
    /// an expected race, not an error.
    pub fn add_item(&mut self, name: &str) {
        let id = match self.namespace.resolve(&self.directory, name) {
            Ok(id) => id,
            Err(_) => {
                self.pending.enqueue(name);
                return;
            }
        };
        let metadata = match self.namespace.probe(&id) {
            Ok(metadata) => metadata,
            Err(_) => {
                self.pending.enqueue(name);
                return;
            }
        };

        self.insert_resolved(id, metadata);

        // Directory state changed; names stuck in the pending queue may
        // resolve now.
        self.promote_pending();
    }

    /// Removes the item matching a parsed identifier. A miss is a no-op
    /// (stale notification, or an item that was never added).
    pub fn remove_by_identifier(&mut self, id: &ParsedId) {
        match self.store.locate_by_identifier(id) {
            Some(slot) => self.remove_slot(slot),
            None => log::debug!("Remove for untracked item: {}", id.name()),
        }
    }

    /// Removes a tracked item by slot: subtracts its size from the totals,
    /// deletes its bound row, then frees the slot (dropping the owned
    /// identifier). Fires the folder-empty signal on the transition to zero
    /// live items when no filter is active.
    pub fn remove_slot(&mut self, slot: SlotId) {
        let Some(item) = self.store.get(slot) else {
            return;
        };
        let size = item.metadata.size;
        let row = item.row;

        let selected = row.is_some_and(|r| self.view.is_row_selected(r));
        self.totals.apply_delta(size, selected, Delta::Subtract);

        if let Some(row) = row {
            if let Some(position) = self.visible.iter().position(|&s| s == slot) {
                self.visible.remove(position);
            }
            self.view.delete_row(row);
        }

        self.store.free(slot);

        if self.store.live_count() == 0 && self.filter.is_none() {
            self.view.folder_empty();
        }
    }

    /// Handles a modify notification, which carries only a leaf name.
    ///
    /// The add and modify notifications for a just-created file often arrive
    /// in the same batch, so a name missing from the store is checked against
    /// the pending-add queue and promoted from there. Sizes are recomputed
    /// from a live probe rather than trusted from the event: the transport
    /// coalesces and can drop events.
    pub fn modify_item(&mut self, name: &str) {
        let Some(slot) = self.store.locate_by_name(name) else {
            self.try_promote(name);
            return;
        };

        let Some(item) = self.store.get(slot) else {
            return;
        };
        let row = item.row;
        let selected = row.is_some_and(|r| self.view.is_row_selected(r));

        // Subtract the old size before overwriting the record, reading it
        // from the record itself.
        let old_size = item.metadata.size;
        self.totals.apply_delta(old_size, selected, Delta::Subtract);

        let probe = self.namespace.probe(&item.extended.identifier);
        let Some(item) = self.store.get_mut(slot) else {
            return;
        };
        match probe {
            Ok(mut metadata) => {
                // The identifier and name stay unchanged through a modify.
                metadata.name = item.metadata.name.clone();
                item.metadata = metadata;
            }
            Err(_) => {
                // The file vanished between notification and processing. A
                // stale size here would corrupt the totals when the follow-up
                // rename or remove subtracts it.
                item.metadata.size = 0;
            }
        }
        let new_size = item.metadata.size;
        self.totals.apply_delta(new_size, selected, Delta::Add);

        if let Some(row) = row
            && let Some(fields) = self.make_row_fields(slot)
        {
            self.view.update_row(row, fields);
        }
    }

    /// Renames a tracked item in place: same slot, new identifier and display
    /// name, refreshed icon. A miss on the old identifier is a no-op (for
    /// example an item that was filtered out originally).
    pub fn rename_item(&mut self, old: &ParsedId, new: ParsedId) {
        let Some(slot) = self.store.locate_by_identifier(old) else {
            log::debug!("Rename for untracked item: {}", old.name());
            return;
        };

        let display = match self
            .namespace
            .display_name(&new, DisplayNameFormat::InFolderParsing)
        {
            Ok(display) => display,
            // Skip on failure; a later notification reconciles the entry.
            Err(_) => return,
        };

        {
            let Some(item) = self.store.get_mut(slot) else {
                return;
            };
            // Assigning drops the old identifier.
            item.extended.identifier = new;
            item.extended.display_name = display.clone();
            item.metadata.name = display;
        }

        let row = self.store.get(slot).and_then(|item| item.row);
        if let Some(row) = row {
            if let Some(fields) = self.make_row_fields(slot) {
                self.view.update_row(row, fields);
            }

            // The new name may be excluded by the active filter; the item
            // then loses its row but stays tracked.
            let excluded = match (&self.filter, self.store.get(slot)) {
                (Some(filter), Some(item)) => filter(&item.metadata),
                _ => false,
            };
            if excluded {
                if let Some(position) = self.visible.iter().position(|&s| s == slot) {
                    self.visible.remove(position);
                }
                self.view.delete_row(row);
                if let Some(item) = self.store.get_mut(slot) {
                    item.row = None;
                }
            }
        }
    }

    /// Applies a selection-state transition reported by the view. The caller
    /// reports each transition exactly once.
    pub fn selection_changed(&mut self, slot: SlotId, selected: bool) {
        let Some(item) = self.store.get(slot) else {
            return;
        };
        let sign = if selected { Delta::Add } else { Delta::Subtract };
        self.totals.apply_selection_delta(item.metadata.size, sign);
    }

    /// Inserts an item whose identifier and metadata are already resolved:
    /// display name, slot allocation, totals, and (unless filtered out) a
    /// view row at its sorted position.
    fn insert_resolved(&mut self, id: ParsedId, metadata: FileMetadata) {
        let format = if self.virtual_folder {
            DisplayNameFormat::InFolder
        } else {
            DisplayNameFormat::InFolderParsing
        };
        let display = match self.namespace.display_name(&id, format) {
            Ok(display) => display,
            Err(_) => {
                // Treated like a failed resolve: retry later.
                self.pending.enqueue(id.name());
                return;
            }
        };

        let dropped = match self.dropped_names.iter().position(|n| n == &display) {
            Some(index) => {
                self.dropped_names.remove(index);
                true
            }
            None => false,
        };

        let excluded = self.filter.as_ref().is_some_and(|f| f(&metadata));
        let size = metadata.size;
        let fields = RowFields {
            display_text: display.clone(),
            icon_id: self.namespace.icon_id(&id, &metadata),
            size,
            modified_at: metadata.modified_at,
            hidden: metadata.is_hidden(),
        };

        let slot = self.store.allocate(DirectoryItem {
            metadata,
            extended: ExtendedInfo {
                identifier: id,
                display_name: display,
            },
            row: None,
        });
        self.totals.apply_delta(size, false, Delta::Add);

        if !excluded {
            let position = if self.insert_sorted && !dropped {
                determine_sorted_position(&self.store, &self.visible, slot, self.sort)
            } else {
                self.visible.len()
            };
            let row = self.view.insert_row(position, slot, fields);
            if let Some(item) = self.store.get_mut(slot) {
                item.row = Some(row);
            }
            self.visible.insert(position, slot);
        }
    }

    /// Retries every pending name; entries whose resolve and probe now
    /// succeed become live items and leave the queue.
    fn promote_pending(&mut self) {
        for name in self.pending.snapshot() {
            self.try_promote(&name);
        }
    }

    /// Promotes one pending name if it now resolves. The queue entry is
    /// removed only on success.
    fn try_promote(&mut self, name: &str) {
        if !self.pending.contains(name) {
            return;
        }
        let Ok(id) = self.namespace.resolve(&self.directory, name) else {
            return;
        };
        let Ok(metadata) = self.namespace.probe(&id) else {
            return;
        };
        self.pending.take(name);
        self.insert_resolved(id, metadata);
    }

    /// Rebuilds the displayable row fields for a slot, re-requesting the
    /// icon from the namespace (the type or overlay may have changed).
    fn make_row_fields(&self, slot: SlotId) -> Option<RowFields> {
        let item = self.store.get(slot)?;
        Some(RowFields {
            display_text: item.extended.display_name.clone(),
            icon_id: self
                .namespace
                .icon_id(&item.extended.identifier, &item.metadata),
            size: item.metadata.size,
            modified_at: item.metadata.modified_at,
            hidden: item.metadata.is_hidden(),
        })
    }
}
