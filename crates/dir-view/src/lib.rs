//! Live directory-view engine.
//!
//! Maintains an in-memory, incrementally updated mirror of a single
//! filesystem directory, synchronized against debounced OS change
//! notifications, and keeps a virtualized list view in step with it: sorted
//! insertion for new entries, in-place updates on modify and rename, and
//! running totals for directory and selection size.
//!
//! The engine is a library with no UI of its own. The surrounding
//! application supplies the list control (the [`view::ListView`] trait) and
//! the shell-namespace services (the [`namespace::Namespace`] trait), wires
//! a [`watcher::DirectoryWatcher`] to the monitored directory, and pumps it
//! on its event loop. All mutation is single-threaded and non-reentrant:
//! notifications are processed in delivery order, one at a time.

pub mod browser;
pub mod dialog;
pub mod identifier;
pub mod metadata;
pub mod namespace;
pub mod pending;
pub mod sorting;
pub mod store;
pub mod totals;
pub mod view;
pub mod watcher;

pub use browser::{FilterPredicate, ShellBrowser};
pub use dialog::{DialogHooks, DialogHost, DialogMessage};
pub use identifier::ParsedId;
pub use metadata::{FileAttributes, FileMetadata, probe_metadata};
pub use namespace::{DisplayNameFormat, LocalNamespace, Namespace, NamespaceError};
pub use pending::PendingAddQueue;
pub use sorting::{SortColumn, SortConfig, SortOrder, determine_sorted_position};
pub use store::{DirectoryItem, ExtendedInfo, ItemStore, SlotId};
pub use totals::{AggregateTotals, Delta};
pub use view::{ListView, RowFields, RowId};
pub use watcher::{ChangeNotification, DirectoryWatcher};
