//! Sort configuration and sorted-position computation for the view order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::store::{DirectoryItem, ItemStore, SlotId};

/// Column to sort the view by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    #[default]
    Name,
    Size,
    Modified,
    /// Sorts by file type (extension); dotfiles first, then extensionless
    /// names, then by extension.
    Type,
}

/// Sort order (ascending or descending).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Active comparator: column plus direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    pub column: SortColumn,
    pub order: SortOrder,
}

/// Compares two strings using natural (alphanumeric) sort, case-insensitive.
fn compare_names_natural(a: &str, b: &str) -> Ordering {
    alphanumeric_sort::compare_str(a.to_lowercase(), b.to_lowercase())
}

/// Extension key for Type sorting: (is_dotfile, has_extension, extension).
fn extension_key(name: &str) -> (bool, bool, String) {
    if name.starts_with('.') && !name[1..].contains('.') {
        return (true, false, String::new());
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (false, true, ext.to_lowercase())
        }
        _ => (false, false, String::new()),
    }
}

/// Compares two items under the active comparator.
///
/// Directories always come before files, regardless of column or direction.
/// Equal keys compare `Equal` so callers can keep arrival order for ties.
pub fn compare_items(a: &DirectoryItem, b: &DirectoryItem, config: SortConfig) -> Ordering {
    match (a.metadata.is_directory(), b.metadata.is_directory()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    let primary = match config.column {
        SortColumn::Name => compare_names_natural(&a.metadata.name, &b.metadata.name),
        SortColumn::Size => a
            .metadata
            .size
            .cmp(&b.metadata.size)
            .then_with(|| compare_names_natural(&a.metadata.name, &b.metadata.name)),
        SortColumn::Modified => match (a.metadata.modified_at, b.metadata.modified_at) {
            (None, None) => compare_names_natural(&a.metadata.name, &b.metadata.name),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_time), Some(b_time)) => a_time
                .cmp(&b_time)
                .then_with(|| compare_names_natural(&a.metadata.name, &b.metadata.name)),
        },
        SortColumn::Type => {
            let (a_dot, a_has, a_ext) = extension_key(&a.metadata.name);
            let (b_dot, b_has, b_ext) = extension_key(&b.metadata.name);
            // Dotfiles first, then no extension, then by extension.
            b_dot
                .cmp(&a_dot)
                .then(a_has.cmp(&b_has))
                .then_with(|| alphanumeric_sort::compare_str(&a_ext, &b_ext))
                .then_with(|| compare_names_natural(&a.metadata.name, &b.metadata.name))
        }
    };

    match config.order {
        SortOrder::Ascending => primary,
        SortOrder::Descending => primary.reverse(),
    }
}

/// Finds the 0-based insertion position for `new_item` within the current
/// sorted view order.
///
/// Upper-bound binary search: a new item lands after existing equal-key
/// items, so ties keep arrival order. Ids in `order` that no longer resolve
/// are treated as smallest so the search stays monotone.
pub fn determine_sorted_position(
    store: &ItemStore,
    order: &[SlotId],
    new_item: SlotId,
    config: SortConfig,
) -> usize {
    let Some(new) = store.get(new_item) else {
        return order.len();
    };

    order.partition_point(|&id| match store.get(id) {
        Some(existing) => compare_items(existing, new, config) != Ordering::Greater,
        None => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FileAttributes;
    use crate::store::make_item;
    use std::path::Path;

    fn insert_all(store: &mut ItemStore, names_sizes: &[(&str, u64)], config: SortConfig) -> Vec<SlotId> {
        let mut order = Vec::new();
        for (name, size) in names_sizes {
            let id = store.allocate(make_item(Path::new("/d"), name, *size));
            let pos = determine_sorted_position(store, &order, id, config);
            order.insert(pos, id);
        }
        order
    }

    fn names(store: &ItemStore, order: &[SlotId]) -> Vec<String> {
        order
            .iter()
            .map(|&id| store.get(id).unwrap().metadata.name.clone())
            .collect()
    }

    #[test]
    fn test_name_ascending_insertion_order() {
        let mut store = ItemStore::new();
        let config = SortConfig::default();
        let order = insert_all(&mut store, &[("b", 1), ("a", 1), ("c", 1)], config);
        assert_eq!(names(&store, &order), ["a", "b", "c"]);
    }

    #[test]
    fn test_equal_keys_keep_arrival_order() {
        let mut store = ItemStore::new();
        let config = SortConfig::default();
        let mut order = insert_all(&mut store, &[("b", 1), ("a", 1), ("c", 1)], config);

        let second_b = store.allocate(make_item(Path::new("/d"), "b", 2));
        let pos = determine_sorted_position(&store, &order, second_b, config);
        order.insert(pos, second_b);

        assert_eq!(names(&store, &order), ["a", "b", "b", "c"]);
        // The later arrival sits after the first "b".
        assert_eq!(order[2], second_b);
    }

    #[test]
    fn test_name_descending() {
        let mut store = ItemStore::new();
        let config = SortConfig {
            column: SortColumn::Name,
            order: SortOrder::Descending,
        };
        let order = insert_all(&mut store, &[("b", 1), ("a", 1), ("c", 1)], config);
        assert_eq!(names(&store, &order), ["c", "b", "a"]);
    }

    #[test]
    fn test_natural_name_order() {
        let mut store = ItemStore::new();
        let config = SortConfig::default();
        let order = insert_all(&mut store, &[("img_10", 1), ("img_2", 1)], config);
        assert_eq!(names(&store, &order), ["img_2", "img_10"]);
    }

    #[test]
    fn test_size_ascending() {
        let mut store = ItemStore::new();
        let config = SortConfig {
            column: SortColumn::Size,
            order: SortOrder::Ascending,
        };
        let order = insert_all(&mut store, &[("big", 300), ("small", 10), ("mid", 50)], config);
        assert_eq!(names(&store, &order), ["small", "mid", "big"]);
    }

    #[test]
    fn test_directories_sort_before_files() {
        let mut store = ItemStore::new();
        let config = SortConfig::default();

        let file = store.allocate(make_item(Path::new("/d"), "aaa.txt", 1));
        let mut order = vec![file];

        let mut dir_item = make_item(Path::new("/d"), "zzz", 0);
        dir_item.metadata.attributes |= FileAttributes::DIRECTORY;
        let dir = store.allocate(dir_item);

        let pos = determine_sorted_position(&store, &order, dir, config);
        order.insert(pos, dir);
        assert_eq!(names(&store, &order), ["zzz", "aaa.txt"]);
    }

    #[test]
    fn test_type_column_groups_by_extension() {
        let mut store = ItemStore::new();
        let config = SortConfig {
            column: SortColumn::Type,
            order: SortOrder::Ascending,
        };
        let order = insert_all(
            &mut store,
            &[("b.txt", 1), ("a.jpg", 1), (".gitignore", 1), ("README", 1)],
            config,
        );
        assert_eq!(names(&store, &order), [".gitignore", "README", "a.jpg", "b.txt"]);
    }
}
