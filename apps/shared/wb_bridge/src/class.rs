//! Runtime class replacement of polymorphic sub-objects
//!
//! The object being reclassified is the current value of a field, so the native
//! path addresses the field itself: `container_path` and `field` dot-joined,
//! walked from the entity. `field` may carry an index (`m_aWaypoints[1]`) to
//! reclassify one array element.

use crate::error::{BridgeError, Result};
use crate::host::{ContainerRef, EntityHandle};
use crate::path::PropertyPath;
use crate::transaction::ActionTransaction;

/// Full native path of `field` inside `container_path`
pub fn field_path(container_path: &str, field: &str) -> Result<PropertyPath> {
    let path = PropertyPath::parse(container_path)?.join(field)?;
    if path.is_empty() {
        return Err(BridgeError::InvalidRequest(
            "field parameter required for changeClass".to_string(),
        ));
    }
    Ok(path)
}

/// Replace the object held by `field` with a fresh instance of `new_class`
pub fn change_class(
    tx: &mut ActionTransaction<'_>,
    entity: EntityHandle,
    container_path: &str,
    field: &str,
    new_class: &str,
) -> Result<()> {
    let path = field_path(container_path, field)?;

    if tx.change_class(ContainerRef::Entity(entity), path.entries(), new_class) {
        Ok(())
    } else {
        Err(BridgeError::NativeRejected(format!(
            "ChangeClass returned false for '{}' -> {}",
            path, new_class
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::list_items;
    use crate::error::ErrorKind;
    use crate::locator;
    use crate::memory::fixtures::tower_scene;
    use crate::path::resolve;
    use crate::property;

    #[test]
    fn test_field_path_joins_container_and_field() {
        let path = field_path("SCR_ScenarioFrameworkArea", "m_aWaypoints[1]").unwrap();
        assert_eq!(path.to_string(), "SCR_ScenarioFrameworkArea.m_aWaypoints[1]");
        assert_eq!(field_path("", "m_Spawn").unwrap().to_string(), "m_Spawn");
        assert_eq!(field_path("", "").unwrap_err().kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_change_class_of_object_field() {
        let mut editor = tower_scene();
        let tower = locator::find(editor.world(), "Tower_01").unwrap();

        let mut tx = ActionTransaction::open(editor.world_mut(), "Change class").unwrap();
        change_class(&mut tx, tower, "SCR_ScenarioFrameworkArea", "m_Plugin", "SCR_TimerPlugin").unwrap();
        tx.close();

        let api = editor.world();
        let area = resolve(api, tower, "SCR_ScenarioFrameworkArea").unwrap();
        assert_eq!(property::get(api, &area, "m_Plugin").unwrap(), "SCR_TimerPlugin");

        let plugin = resolve(api, tower, "SCR_ScenarioFrameworkArea.m_Plugin").unwrap();
        assert_eq!(property::list(api, &plugin).unwrap(), ["m_fDelay"]);
    }

    #[test]
    fn test_change_class_of_array_element() {
        let mut editor = tower_scene();
        let tower = locator::find(editor.world(), "Tower_01").unwrap();

        let mut tx = ActionTransaction::open(editor.world_mut(), "Change class").unwrap();
        change_class(&mut tx, tower, "SCR_ScenarioFrameworkArea", "m_aWaypoints[0]", "SCR_DefendWaypoint").unwrap();
        tx.close();

        let api = editor.world();
        let area = resolve(api, tower, "SCR_ScenarioFrameworkArea").unwrap();
        let items = list_items(api, &area, "m_aWaypoints");
        assert_eq!(items[0].class_name, "SCR_DefendWaypoint");
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_unknown_class_is_rejected_and_closed() {
        let mut editor = tower_scene();
        let tower = locator::find(editor.world(), "Tower_01").unwrap();

        let mut tx = ActionTransaction::open(editor.world_mut(), "Change class").unwrap();
        let err = change_class(&mut tx, tower, "SCR_ScenarioFrameworkArea", "m_Plugin", "SCR_Nope").unwrap_err();
        drop(tx);

        assert_eq!(err.kind(), ErrorKind::NativeRejected);
        assert_eq!(
            err.to_string(),
            "ChangeClass returned false for 'SCR_ScenarioFrameworkArea.m_Plugin' -> SCR_Nope"
        );
        let stats = editor.world().action_stats();
        assert_eq!((stats.opens, stats.closes), (1, 1));
    }
}
