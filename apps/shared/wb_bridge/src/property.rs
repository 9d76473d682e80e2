//! Scalar field access on a resolved target
//!
//! Values are opaque text in both directions. Type coercion is the host's
//! business.
//!
//! A missing field and a field holding the empty string are distinguished:
//! [`get`] reports the former as `NotFound` and returns `Ok("")` for the latter.

use crate::error::{BridgeError, Result};
use crate::host::WorldEditorApi;
use crate::path::ResolvedTarget;
use crate::transaction::ActionTransaction;

/// Current value of `key` on the resolved target
pub fn get(api: &dyn WorldEditorApi, resolved: &ResolvedTarget, key: &str) -> Result<String> {
    let path = resolved.remaining.entries();
    if let Some(value) = api.get_variable(resolved.target, path, key) {
        return Ok(value);
    }

    if api.variable_names(resolved.target, path).is_none() {
        return Err(path_not_found(resolved));
    }
    Err(BridgeError::NotFound(format!("Property not found: {}", key)))
}

/// Field names of the resolved target, in declaration order
pub fn list(api: &dyn WorldEditorApi, resolved: &ResolvedTarget) -> Result<Vec<String>> {
    api.variable_names(resolved.target, resolved.remaining.entries())
        .ok_or_else(|| path_not_found(resolved))
}

/// Set `key` to `value`
pub fn set(tx: &mut ActionTransaction<'_>, resolved: &ResolvedTarget, key: &str, value: &str) -> Result<()> {
    if tx.set_variable(resolved.target, resolved.remaining.entries(), key, value) {
        Ok(())
    } else {
        Err(BridgeError::NativeRejected(format!(
            "SetVariableValue returned false for key: {}",
            key
        )))
    }
}

/// Reset `key` to its class default
///
/// Clearing a field that already holds its default succeeds.
pub fn clear(tx: &mut ActionTransaction<'_>, resolved: &ResolvedTarget, key: &str) -> Result<()> {
    if tx.clear_variable(resolved.target, resolved.remaining.entries(), key) {
        Ok(())
    } else {
        Err(BridgeError::NativeRejected(format!(
            "ClearVariableValue returned false for key: {}",
            key
        )))
    }
}

fn path_not_found(resolved: &ResolvedTarget) -> BridgeError {
    BridgeError::NotFound(format!("Path not found: {}", resolved.remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::host::ContainerRef;
    use crate::locator;
    use crate::memory::fixtures::tower_scene;
    use crate::path::resolve;

    #[test]
    fn test_component_radius_scenario() {
        let mut editor = tower_scene();
        let api = editor.world_mut();
        let tower = locator::find(api, "Tower_01").unwrap();

        let resolved = resolve(api, tower, "SCR_ScenarioFrameworkArea").unwrap();
        assert!(matches!(resolved.target, ContainerRef::Component { entity, .. } if entity == tower));
        assert!(resolved.remaining.is_empty());

        let mut tx = ActionTransaction::open(api, "Set property").unwrap();
        set(&mut tx, &resolved, "Radius", "50").unwrap();
        tx.close();

        assert_eq!(get(editor.world(), &resolved, "Radius").unwrap(), "50");
        assert_eq!(editor.world().last_set(), Some((resolved.target, Vec::new(), "Radius".to_string())));
    }

    #[test]
    fn test_entity_name_scenario() {
        let editor = tower_scene();
        let api = editor.world();
        let tower = locator::find(api, "Tower_01").unwrap();

        let resolved = resolve(api, tower, "").unwrap();
        assert_eq!(resolved.target, ContainerRef::Entity(tower));
        assert!(resolved.remaining.is_empty());
        assert_eq!(get(api, &resolved, "Name").unwrap(), "Tower_01");
    }

    #[test]
    fn test_missing_and_empty_are_distinguished() {
        let editor = tower_scene();
        let api = editor.world();
        let tower = locator::find(api, "Tower_01").unwrap();
        let area = resolve(api, tower, "SCR_ScenarioFrameworkArea").unwrap();

        assert_eq!(get(api, &area, "m_sAreaName").unwrap(), "");

        let err = get(api, &area, "m_sNoSuchField").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Property not found: m_sNoSuchField");
    }

    #[test]
    fn test_nested_path_through_entity_field() {
        let editor = tower_scene();
        let api = editor.world();
        let tower = locator::find(api, "Tower_01").unwrap();

        let spawn = resolve(api, tower, "m_Spawn").unwrap();
        assert_eq!(spawn.target, ContainerRef::Entity(tower));
        assert_eq!(get(api, &spawn, "Count").unwrap(), "4");

        let missing = resolve(api, tower, "m_NoSuchObject").unwrap();
        let err = get(api, &missing, "Count").unwrap_err();
        assert_eq!(err.to_string(), "Path not found: m_NoSuchObject");
    }

    #[test]
    fn test_list_in_declaration_order() {
        let editor = tower_scene();
        let api = editor.world();
        let tower = locator::find(api, "Tower_01").unwrap();

        let area = resolve(api, tower, "SCR_ScenarioFrameworkArea").unwrap();
        assert_eq!(list(api, &area).unwrap(), ["Radius", "m_sAreaName", "m_aWaypoints", "m_Plugin"]);

        let entity = resolve(api, tower, "").unwrap();
        let names = list(api, &entity).unwrap();
        assert_eq!(&names[..2], ["Name", "coords"]);
    }

    #[test]
    fn test_clear_twice_leaves_default() {
        let mut editor = tower_scene();
        let api = editor.world_mut();
        let tower = locator::find(api, "Tower_01").unwrap();
        let area = resolve(api, tower, "SCR_ScenarioFrameworkArea").unwrap();

        {
            let mut tx = ActionTransaction::open(api, "Set property").unwrap();
            set(&mut tx, &area, "Radius", "80").unwrap();
        }
        for _ in 0..2 {
            let mut tx = ActionTransaction::open(editor.world_mut(), "Clear property").unwrap();
            clear(&mut tx, &area, "Radius").unwrap();
            tx.close();
            assert_eq!(get(editor.world(), &area, "Radius").unwrap(), "25");
        }

        let stats = editor.world().action_stats();
        assert_eq!(stats.opens, 3);
        assert_eq!(stats.closes, 3);
    }

    #[test]
    fn test_set_unknown_key_is_rejected_and_closed() {
        let mut editor = tower_scene();
        let api = editor.world_mut();
        let tower = locator::find(api, "Tower_01").unwrap();
        let resolved = resolve(api, tower, "").unwrap();

        let mut tx = ActionTransaction::open(api, "Set property").unwrap();
        let err = set(&mut tx, &resolved, "NoSuchField", "1").unwrap_err();
        drop(tx);

        assert_eq!(err.kind(), ErrorKind::NativeRejected);
        assert_eq!(err.to_string(), "SetVariableValue returned false for key: NoSuchField");
        let stats = editor.world().action_stats();
        assert_eq!((stats.opens, stats.closes), (1, 1));
    }

    #[test]
    fn test_forced_native_failure_still_closes_once() {
        let mut editor = tower_scene();
        let api = editor.world_mut();
        let tower = locator::find(api, "Tower_01").unwrap();
        let area = resolve(api, tower, "SCR_ScenarioFrameworkArea").unwrap();
        api.fail_native_calls(true);

        let mut tx = ActionTransaction::open(api, "Set property").unwrap();
        assert!(set(&mut tx, &area, "Radius", "50").is_err());
        tx.close();

        let stats = editor.world().action_stats();
        assert_eq!((stats.opens, stats.closes), (1, 1));
        editor.world_mut().fail_native_calls(false);
        assert_eq!(get(editor.world(), &area, "Radius").unwrap(), "25");
    }
}
