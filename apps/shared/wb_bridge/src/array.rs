//! Arrays of typed objects on a resolved target
//!
//! Bounds and "is this an array" checks are reads. Callers run them through
//! [`items`] or [`insert_position`] before opening a transaction, so a request
//! that cannot succeed never touches the undo history.

use wb_protocol::ArrayItem;

use crate::error::{BridgeError, Result};
use crate::host::WorldEditorApi;
use crate::path::ResolvedTarget;
use crate::transaction::ActionTransaction;

/// Runtime class of every element, empty when `key` is not an array of objects
pub fn list_items(api: &dyn WorldEditorApi, resolved: &ResolvedTarget, key: &str) -> Vec<ArrayItem> {
    api.read_array_elements(resolved.target, resolved.remaining.entries(), key)
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, class_name)| ArrayItem { index, class_name })
        .collect()
}

/// Element classes, `NotFound` when `key` is not an array of objects
pub fn items(api: &dyn WorldEditorApi, resolved: &ResolvedTarget, key: &str) -> Result<Vec<String>> {
    api.read_array_elements(resolved.target, resolved.remaining.entries(), key)
        .ok_or_else(|| BridgeError::NotFound(format!("Array property not found: {}", key)))
}

/// Where an insert will land
///
/// An absent or negative `at` appends. A position past the end is `NotFound`.
pub fn insert_position(len: usize, key: &str, at: Option<i64>) -> Result<usize> {
    match at {
        Some(at) if at >= 0 => {
            let at = at as usize;
            if at > len {
                return Err(BridgeError::NotFound(format!(
                    "Index {} out of range for '{}' (length: {})",
                    at, key, len
                )));
            }
            Ok(at)
        }
        _ => Ok(len),
    }
}

/// Insert a new element of `class_name` into `key`, returning its position
pub fn insert(
    tx: &mut ActionTransaction<'_>,
    resolved: &ResolvedTarget,
    key: &str,
    class_name: &str,
    at: Option<i64>,
) -> Result<usize> {
    let len = items(&**tx, resolved, key)?.len();
    let position = insert_position(len, key, at)?;

    if tx.create_array_member(resolved.target, resolved.remaining.entries(), key, class_name, position) {
        Ok(position)
    } else {
        Err(BridgeError::NativeRejected(format!(
            "CreateObjectArrayVariableMember returned false for class: {}",
            class_name
        )))
    }
}

/// Remove the element at `index`, shifting later elements down
pub fn remove_at(tx: &mut ActionTransaction<'_>, resolved: &ResolvedTarget, key: &str, index: usize) -> Result<()> {
    check_index(items(&**tx, resolved, key)?.len(), key, index)?;

    if tx.remove_array_member(resolved.target, resolved.remaining.entries(), key, index) {
        Ok(())
    } else {
        Err(BridgeError::NativeRejected(format!(
            "RemoveObjectArrayVariableMember returned false for index: {}",
            index
        )))
    }
}

/// `NotFound` unless `index` addresses an existing element
pub fn check_index(len: usize, key: &str, index: usize) -> Result<()> {
    if index >= len {
        return Err(BridgeError::NotFound(format!(
            "Index {} out of range for '{}' (length: {})",
            index, key, len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::locator;
    use crate::memory::fixtures::tower_scene;
    use crate::path::resolve;

    const WAYPOINTS: &str = "m_aWaypoints";

    fn area(api: &dyn WorldEditorApi) -> ResolvedTarget {
        let tower = locator::find(api, "Tower_01").unwrap();
        resolve(api, tower, "SCR_ScenarioFrameworkArea").unwrap()
    }

    fn classes(items: &[ArrayItem]) -> Vec<&str> {
        items.iter().map(|item| item.class_name.as_str()).collect()
    }

    #[test]
    fn test_list_items_reports_index_and_class() {
        let editor = tower_scene();
        let api = editor.world();
        let items = list_items(api, &area(api), WAYPOINTS);

        assert_eq!(classes(&items), ["SCR_Waypoint", "SCR_Waypoint", "SCR_DefendWaypoint"]);
        assert_eq!(items.iter().map(|i| i.index).collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn test_list_items_on_non_array_is_empty() {
        let editor = tower_scene();
        let api = editor.world();

        assert!(list_items(api, &area(api), "Radius").is_empty());
        assert!(list_items(api, &area(api), "m_NoSuchArray").is_empty());
    }

    #[test]
    fn test_insert_append_then_list() {
        let mut editor = tower_scene();
        let resolved = area(editor.world());

        let mut tx = ActionTransaction::open(editor.world_mut(), "Insert array item").unwrap();
        let position = insert(&mut tx, &resolved, WAYPOINTS, "SCR_DefendWaypoint", None).unwrap();
        tx.close();

        let items = list_items(editor.world(), &resolved, WAYPOINTS);
        assert_eq!(position, 3);
        assert_eq!(items.last().unwrap().class_name, "SCR_DefendWaypoint");
        assert_eq!(items.last().unwrap().index, 3);
    }

    #[test]
    fn test_insert_negative_index_appends() {
        let mut editor = tower_scene();
        let resolved = area(editor.world());
        assert_eq!(list_items(editor.world(), &resolved, WAYPOINTS).len(), 3);

        let mut tx = ActionTransaction::open(editor.world_mut(), "Insert array item").unwrap();
        let position = insert(&mut tx, &resolved, WAYPOINTS, "SCR_Waypoint", Some(-1)).unwrap();
        tx.close();

        assert_eq!(position, 3);
        let items = list_items(editor.world(), &resolved, WAYPOINTS);
        assert_eq!(classes(&items), ["SCR_Waypoint", "SCR_Waypoint", "SCR_DefendWaypoint", "SCR_Waypoint"]);
    }

    #[test]
    fn test_insert_at_front_shifts_existing() {
        let mut editor = tower_scene();
        let resolved = area(editor.world());

        let mut tx = ActionTransaction::open(editor.world_mut(), "Insert array item").unwrap();
        assert_eq!(insert(&mut tx, &resolved, WAYPOINTS, "SCR_DefendWaypoint", Some(0)).unwrap(), 0);
        tx.close();

        let items = list_items(editor.world(), &resolved, WAYPOINTS);
        assert_eq!(classes(&items), ["SCR_DefendWaypoint", "SCR_Waypoint", "SCR_Waypoint", "SCR_DefendWaypoint"]);
    }

    #[test]
    fn test_insert_past_end_is_not_found() {
        assert_eq!(insert_position(3, WAYPOINTS, Some(3)).unwrap(), 3);
        let err = insert_position(3, WAYPOINTS, Some(4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Index 4 out of range for 'm_aWaypoints' (length: 3)");
    }

    #[test]
    fn test_insert_unknown_class_is_rejected() {
        let mut editor = tower_scene();
        let resolved = area(editor.world());

        let mut tx = ActionTransaction::open(editor.world_mut(), "Insert array item").unwrap();
        let err = insert(&mut tx, &resolved, WAYPOINTS, "SCR_NoSuchWaypoint", None).unwrap_err();
        drop(tx);

        assert_eq!(err.kind(), ErrorKind::NativeRejected);
        assert!(err.to_string().contains("SCR_NoSuchWaypoint"));
        assert_eq!(list_items(editor.world(), &resolved, WAYPOINTS).len(), 3);
        let stats = editor.world().action_stats();
        assert_eq!((stats.opens, stats.closes), (1, 1));
    }

    #[test]
    fn test_insert_into_scalar_is_not_found() {
        let mut editor = tower_scene();
        let resolved = area(editor.world());

        let mut tx = ActionTransaction::open(editor.world_mut(), "Insert array item").unwrap();
        let err = insert(&mut tx, &resolved, "Radius", "SCR_Waypoint", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_then_list_shifts_down() {
        let mut editor = tower_scene();
        let resolved = area(editor.world());
        let before = list_items(editor.world(), &resolved, WAYPOINTS);

        let mut tx = ActionTransaction::open(editor.world_mut(), "Remove array item").unwrap();
        remove_at(&mut tx, &resolved, WAYPOINTS, 1).unwrap();
        tx.close();

        let after = list_items(editor.world(), &resolved, WAYPOINTS);
        assert_eq!(after.len(), before.len() - 1);
        assert_eq!(after[1].class_name, before[2].class_name);
        assert_eq!(after[1].index, 1);
    }

    #[test]
    fn test_remove_out_of_bounds_is_not_found() {
        let mut editor = tower_scene();
        let resolved = area(editor.world());

        let mut tx = ActionTransaction::open(editor.world_mut(), "Remove array item").unwrap();
        let err = remove_at(&mut tx, &resolved, WAYPOINTS, 3).unwrap_err();
        tx.close();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(list_items(editor.world(), &resolved, WAYPOINTS).len(), 3);
    }
}
