use serde::{Deserialize, Serialize};

/// A single bridge request
///
/// Requests are a flat field set: every action reads the fields it needs and
/// ignores the rest. Empty strings mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    /// Correlation id, echoed back in the response
    pub id: u64,
    /// Symbolic action name (e.g. "setProperty", "ping")
    pub action: String,
    /// Subject entity name
    pub name: String,
    /// Positional entity index, component index or array index depending on the action
    pub index: Option<i64>,
    /// Dotted property path selecting the target container
    pub path: String,
    /// Field name on the target container
    pub key: String,
    /// Opaque text value
    pub value: String,
    /// Runtime class name (array items, class changes, components)
    pub class_name: String,
    /// Pagination offset for listings
    pub offset: Option<i64>,
    /// Pagination limit for listings
    pub limit: Option<i64>,
    /// Case-insensitive name filter for listings
    pub name_filter: String,
    /// World X coordinate (terrain queries)
    pub x: Option<f32>,
    /// World Z coordinate (terrain queries)
    pub z: Option<f32>,
    /// Localization item id
    pub item_id: String,
    /// Localization item property
    pub property: String,
    /// Initial position "x y z" of a created entity
    pub position: String,
    /// Initial angles "x y z" of a created entity
    pub rotation: String,
    /// Layer of a created entity
    pub layer_id: Option<i32>,
}

impl Request {
    /// Create a request for the given action with every other field empty
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Set listing pagination
    pub fn with_page(mut self, offset: i64, limit: i64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    pub fn with_name_filter(mut self, filter: impl Into<String>) -> Self {
        self.name_filter = filter.into();
        self
    }

    /// Set terrain query coordinates
    pub fn with_coords(mut self, x: f32, z: f32) -> Self {
        self.x = Some(x);
        self.z = Some(z);
        self
    }

    pub fn with_item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = item_id.into();
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    /// Set the initial transform of a created entity
    pub fn with_transform(mut self, position: impl Into<String>, rotation: impl Into<String>) -> Self {
        self.position = position.into();
        self.rotation = rotation.into();
        self
    }

    pub fn with_layer_id(mut self, layer_id: i32) -> Self {
        self.layer_id = Some(layer_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let req = Request::new("setProperty")
            .with_id(7)
            .with_name("Tower_01")
            .with_path("SCR_ScenarioFrameworkArea")
            .with_key("Radius")
            .with_value("50");

        assert_eq!(req.id, 7);
        assert_eq!(req.action, "setProperty");
        assert_eq!(req.name, "Tower_01");
        assert_eq!(req.path, "SCR_ScenarioFrameworkArea");
        assert_eq!(req.key, "Radius");
        assert_eq!(req.value, "50");
        assert_eq!(req.index, None);
    }

    #[test]
    fn test_bincode_preserves_optional_fields() {
        let req = Request::new("insertArrayItem")
            .with_index(-1)
            .with_class_name("SCR_Waypoint")
            .with_coords(1.5, -2.0);

        let bytes = bincode::serialize(&req).unwrap();
        let parsed: Request = bincode::deserialize(&bytes).unwrap();
        assert_eq!(parsed, req);
    }
}
