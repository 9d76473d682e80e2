//! Entity lookup by display name or positional index
//!
//! Positional indices are only valid for the enumeration they came from. The
//! host makes no promise about enumeration order, so any mutation (a delete, a
//! paste, a rename in some hosts) may make the same index refer to another
//! entity on the next request. Clients that need a stable reference should use
//! names.

use wb_protocol::{EntityPage, EntitySummary};

use crate::error::{BridgeError, Result};
use crate::host::{EntityHandle, WorldEditorApi};

/// Page size used when a listing asks for none
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// First entity whose name is exactly `name` (case-sensitive)
pub fn find(api: &dyn WorldEditorApi, name: &str) -> Option<EntityHandle> {
    (0..api.entity_count())
        .filter_map(|index| api.entity_at(index))
        .find(|&entity| api.entity_name(entity) == name)
}

/// Like [`find`], reporting a missing entity as `NotFound`
pub fn find_required(api: &dyn WorldEditorApi, name: &str) -> Result<EntityHandle> {
    find(api, name).ok_or_else(|| BridgeError::NotFound(format!("Entity not found: {}", name)))
}

/// Entity at a position of the current enumeration
pub fn at(api: &dyn WorldEditorApi, index: usize) -> Result<EntityHandle> {
    let count = api.entity_count();
    if index >= count {
        return Err(BridgeError::NotFound(format!(
            "Index {} out of range (count: {})",
            index, count
        )));
    }

    api.entity_at(index)
        .ok_or_else(|| BridgeError::NotFound(format!("Entity at index {} is null", index)))
}

/// Locate by name when one is given, otherwise by a non-negative index
pub fn locate(api: &dyn WorldEditorApi, name: &str, index: Option<i64>) -> Result<EntityHandle> {
    if !name.is_empty() {
        return find(api, name)
            .ok_or_else(|| BridgeError::NotFound(format!("Entity not found with name: {}", name)));
    }

    match index {
        Some(index) if index >= 0 => at(api, index as usize),
        _ => Err(BridgeError::InvalidRequest(
            "Provide either name or index (>= 0)".to_string(),
        )),
    }
}

/// List entities whose name contains `filter` (case-insensitive)
///
/// A negative offset starts at 0 and a non-positive limit means
/// [`DEFAULT_PAGE_SIZE`]. `total_count` counts every match, not just the page.
pub fn list(api: &dyn WorldEditorApi, filter: &str, offset: Option<i64>, limit: Option<i64>) -> EntityPage {
    let offset = offset.filter(|&o| o > 0).unwrap_or(0) as usize;
    let limit = limit.filter(|&l| l > 0).map(|l| l as usize).unwrap_or(DEFAULT_PAGE_SIZE);
    let filter = filter.to_lowercase();

    let matches: Vec<EntityHandle> = (0..api.entity_count())
        .filter_map(|index| api.entity_at(index))
        .filter(|&entity| filter.is_empty() || api.entity_name(entity).to_lowercase().contains(&filter))
        .collect();

    let entities: Vec<EntitySummary> = matches
        .iter()
        .skip(offset)
        .take(limit)
        .map(|&entity| EntitySummary {
            name: api.entity_name(entity),
            class_name: api.entity_class_name(entity),
            position: api.entity_origin(entity),
        })
        .collect();

    EntityPage {
        total_count: matches.len(),
        returned_count: entities.len(),
        offset,
        entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::memory::fixtures::tower_scene;

    #[test]
    fn test_find_is_exact_and_case_sensitive() {
        let editor = tower_scene();
        let api = editor.world();

        let tower = find(api, "Tower_01").unwrap();
        assert_eq!(api.entity_name(tower), "Tower_01");
        assert!(find(api, "tower_01").is_none());
        assert!(find(api, "Tower").is_none());
    }

    #[test]
    fn test_find_first_match_wins() {
        let editor = tower_scene();
        let api = editor.world();

        // The scene holds two entities named "Crate"
        let first = find(api, "Crate").unwrap();
        let position = (0..api.entity_count())
            .position(|i| api.entity_at(i) == Some(first))
            .unwrap();
        let earlier = (0..position).filter_map(|i| api.entity_at(i)).any(|e| api.entity_name(e) == "Crate");
        assert!(!earlier);
        assert_eq!(api.entity_class_name(first), "GenericEntity");
    }

    #[test]
    fn test_at_out_of_range_reports_count() {
        let editor = tower_scene();
        let api = editor.world();
        let count = api.entity_count();

        let err = at(api, count).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), format!("Index {} out of range (count: {})", count, count));
    }

    #[test]
    fn test_locate_prefers_name_over_index() {
        let editor = tower_scene();
        let api = editor.world();

        let by_name = locate(api, "Tower_01", Some(3)).unwrap();
        assert_eq!(api.entity_name(by_name), "Tower_01");

        let by_index = locate(api, "", Some(0)).unwrap();
        assert_eq!(Some(by_index), api.entity_at(0));

        let err = locate(api, "", Some(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        let err = locate(api, "", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_list_filters_and_pages() {
        let editor = tower_scene();
        let api = editor.world();

        let page = list(api, "TOWER", None, None);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.returned_count, 2);
        assert!(page.entities.iter().all(|e| e.name.starts_with("Tower_")));

        let page = list(api, "tower", Some(1), Some(1));
        assert_eq!(page.total_count, 2);
        assert_eq!(page.offset, 1);
        assert_eq!(page.entities.len(), 1);
        assert_eq!(page.entities[0].name, "Tower_02");
    }

    #[test]
    fn test_list_normalizes_offset_and_limit() {
        let editor = tower_scene();
        let api = editor.world();

        let page = list(api, "", Some(-4), Some(0));
        assert_eq!(page.offset, 0);
        assert_eq!(page.total_count, api.entity_count());
        assert_eq!(page.returned_count, api.entity_count().min(DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_index_may_change_after_delete() {
        let mut editor = tower_scene();
        let first_name = {
            let api = editor.world();
            api.entity_name(api.entity_at(0).unwrap())
        };

        let api = editor.world_mut();
        let first = api.entity_at(0).unwrap();
        assert!(api.delete_entity(first));

        let now_first = at(api, 0).unwrap();
        assert_ne!(api.entity_name(now_first), first_name);
    }
}
