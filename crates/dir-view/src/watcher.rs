//! Change-notification dispatcher.
//!
//! Registers a non-recursive, debounced OS watch on the monitored directory,
//! queues the raw events, and decodes them into add/remove/rename/modify
//! notifications on pump. The transport coalesces: events may arrive merged,
//! out of order relative to the underlying filesystem changes, or not at all
//! — downstream handling re-probes the filesystem instead of trusting event
//! payloads.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify_debouncer_full::{
    DebounceEventResult, DebouncedEvent, Debouncer, RecommendedCache, new_debouncer,
    notify::{
        self, RecommendedWatcher, RecursiveMode,
        event::{EventKind, ModifyKind, RenameMode},
    },
};

use crate::browser::ShellBrowser;
use crate::namespace::Namespace;
use crate::view::ListView;

/// Default debounce duration in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// One decoded change notification: an event kind plus one or two subject
/// paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeNotification {
    Created { subject: PathBuf },
    Removed { subject: PathBuf },
    Modified { subject: PathBuf },
    /// A rename carries up to two subjects; either side may fall outside the
    /// monitored directory (or be unreported by the platform).
    Renamed {
        old: Option<PathBuf>,
        new: Option<PathBuf>,
    },
}

/// Maps a raw watcher event onto a change notification. Event kinds with no
/// bearing on directory contents (access, metadata-only churn we cannot
/// classify) decode to `None` and are dropped.
pub(crate) fn decode(event: &notify::Event) -> Option<ChangeNotification> {
    match event.kind {
        EventKind::Create(_) => Some(ChangeNotification::Created {
            subject: event.paths.first()?.clone(),
        }),
        EventKind::Remove(_) => Some(ChangeNotification::Removed {
            subject: event.paths.first()?.clone(),
        }),
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::Both => Some(ChangeNotification::Renamed {
                old: event.paths.first().cloned(),
                new: event.paths.get(1).cloned(),
            }),
            RenameMode::From => Some(ChangeNotification::Renamed {
                old: event.paths.first().cloned(),
                new: None,
            }),
            RenameMode::To => Some(ChangeNotification::Renamed {
                old: None,
                new: event.paths.first().cloned(),
            }),
            // Platform didn't say which side this is. With both paths it's a
            // complete rename; with one, a re-probe sorts it out.
            RenameMode::Any | RenameMode::Other => {
                if event.paths.len() == 2 {
                    Some(ChangeNotification::Renamed {
                        old: event.paths.first().cloned(),
                        new: event.paths.get(1).cloned(),
                    })
                } else {
                    Some(ChangeNotification::Modified {
                        subject: event.paths.first()?.clone(),
                    })
                }
            }
        },
        EventKind::Modify(_) => Some(ChangeNotification::Modified {
            subject: event.paths.first()?.clone(),
        }),
        _ => None,
    }
}

enum WatchState {
    Unregistered,
    Registered {
        directory: PathBuf,
        #[allow(dead_code, reason = "Debouncer must be held to keep watching")]
        debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    },
}

/// Owns the OS watch for the monitored directory.
///
/// Lifecycle: `Unregistered → Registered → Unregistered`, driven by
/// navigation. Registration failure is non-fatal — it is logged and the view
/// simply receives no live updates until the next navigation retries.
pub struct DirectoryWatcher {
    state: WatchState,
    debounce: Duration,
    queue: Arc<Mutex<Vec<DebouncedEvent>>>,
}

impl DirectoryWatcher {
    pub fn new() -> Self {
        Self::with_debounce(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            state: WatchState::Unregistered,
            debounce,
            queue: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self.state, WatchState::Registered { .. })
    }

    /// The directory currently being watched, if any.
    pub fn monitored_directory(&self) -> Option<&Path> {
        match &self.state {
            WatchState::Registered { directory, .. } => Some(directory),
            WatchState::Unregistered => None,
        }
    }

    /// Starts watching `directory`, replacing any previous registration.
    pub fn register(&mut self, directory: &Path) -> Result<(), String> {
        self.deregister();

        match self.try_register(directory) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!(
                    "Couldn't monitor directory \"{}\" for changes: {}",
                    directory.display(),
                    e
                );
                Err(e)
            }
        }
    }

    fn try_register(&mut self, directory: &Path) -> Result<(), String> {
        let queue = Arc::clone(&self.queue);
        let mut debouncer = new_debouncer(
            self.debounce,
            None, // No tick rate limit
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let mut queue = queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    queue.extend(events);
                }
                Err(errors) => {
                    for error in errors {
                        log::warn!("Watcher error: {}", error);
                    }
                }
            },
        )
        .map_err(|e| format!("Failed to create watcher: {}", e))?;

        debouncer
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| format!("Failed to watch path: {}", e))?;

        self.state = WatchState::Registered {
            directory: directory.to_path_buf(),
            debouncer,
        };
        Ok(())
    }

    /// Drops the OS watch. Events the OS already delivered remain queued and
    /// reach the next pump; the browser's containment checks discard the
    /// stale ones.
    pub fn deregister(&mut self) {
        self.state = WatchState::Unregistered;
    }

    /// Drains queued raw events, decodes them, and routes each notification
    /// into the browser, preserving delivery order. Returns the number of
    /// notifications routed.
    ///
    /// The queue lock is held only while reading and decoding the raw
    /// payloads, never across item-store mutation.
    pub fn pump<N: Namespace, V: ListView>(&self, browser: &mut ShellBrowser<N, V>) -> usize {
        let notifications: Vec<ChangeNotification> = {
            let mut queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            queue.drain(..).filter_map(|event| decode(&event)).collect()
        };

        let count = notifications.len();
        for notification in notifications {
            browser.handle_notification(notification);
        }
        count
    }
}

impl Default for DirectoryWatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_debouncer_full::notify::event::{AccessKind, CreateKind, DataChange, RemoveKind};

    fn make_event(kind: EventKind, paths: &[&str]) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    #[test]
    fn test_decode_create_and_remove() {
        let event = make_event(EventKind::Create(CreateKind::File), &["/d/a.txt"]);
        assert_eq!(
            decode(&event),
            Some(ChangeNotification::Created {
                subject: PathBuf::from("/d/a.txt")
            })
        );

        let event = make_event(EventKind::Remove(RemoveKind::Any), &["/d/a.txt"]);
        assert_eq!(
            decode(&event),
            Some(ChangeNotification::Removed {
                subject: PathBuf::from("/d/a.txt")
            })
        );
    }

    #[test]
    fn test_decode_rename_variants() {
        let both = make_event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/d/old.txt", "/d/new.txt"],
        );
        assert_eq!(
            decode(&both),
            Some(ChangeNotification::Renamed {
                old: Some(PathBuf::from("/d/old.txt")),
                new: Some(PathBuf::from("/d/new.txt")),
            })
        );

        let from = make_event(EventKind::Modify(ModifyKind::Name(RenameMode::From)), &["/d/old.txt"]);
        assert_eq!(
            decode(&from),
            Some(ChangeNotification::Renamed {
                old: Some(PathBuf::from("/d/old.txt")),
                new: None,
            })
        );

        let to = make_event(EventKind::Modify(ModifyKind::Name(RenameMode::To)), &["/d/new.txt"]);
        assert_eq!(
            decode(&to),
            Some(ChangeNotification::Renamed {
                old: None,
                new: Some(PathBuf::from("/d/new.txt")),
            })
        );
    }

    #[test]
    fn test_decode_ambiguous_rename_with_two_paths() {
        let event = make_event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Any)),
            &["/d/old.txt", "/d/new.txt"],
        );
        assert!(matches!(
            decode(&event),
            Some(ChangeNotification::Renamed { old: Some(_), new: Some(_) })
        ));
    }

    #[test]
    fn test_decode_data_change_is_modify() {
        let event = make_event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/d/a.txt"],
        );
        assert_eq!(
            decode(&event),
            Some(ChangeNotification::Modified {
                subject: PathBuf::from("/d/a.txt")
            })
        );
    }

    #[test]
    fn test_decode_ignores_access_events() {
        let event = make_event(EventKind::Access(AccessKind::Any), &["/d/a.txt"]);
        assert_eq!(decode(&event), None);
    }

    #[test]
    fn test_register_and_deregister() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = DirectoryWatcher::new();
        assert!(!watcher.is_registered());

        watcher.register(dir.path()).unwrap();
        assert!(watcher.is_registered());
        assert_eq!(watcher.monitored_directory(), Some(dir.path()));

        watcher.deregister();
        assert!(!watcher.is_registered());
    }

    #[test]
    fn test_register_missing_directory_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let mut watcher = DirectoryWatcher::new();

        assert!(watcher.register(&missing).is_err());
        assert!(!watcher.is_registered());
    }
}
