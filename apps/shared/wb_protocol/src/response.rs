use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Ok,
    Error,
}

/// Which editor surface is currently reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    /// The world editor module is not loaded at all
    NoWorldEditor,
    /// The world editor is loaded but its API is gone (play mode)
    Game,
    /// Full editing API available
    #[default]
    Edit,
}

impl EditorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::NoWorldEditor => "no_world_editor",
            EditorMode::Game => "game",
            EditorMode::Edit => "edit",
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot returned by `ping` and `getState`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub mode: EditorMode,
    pub entity_count: Option<usize>,
    pub selected_count: Option<usize>,
    pub selected_names: Vec<String>,
    pub bounds_min: Option<[f32; 3]>,
    pub bounds_max: Option<[f32; 3]>,
}

/// One row of an entity listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub name: String,
    pub class_name: String,
    pub position: [f32; 3],
}

/// A page of an entity listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPage {
    /// Number of entities matching the filter, across all pages
    pub total_count: usize,
    pub returned_count: usize,
    pub offset: usize,
    pub entities: Vec<EntitySummary>,
}

/// Name/value pair of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub name: String,
    pub value: String,
}

/// Component position and class on its entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    pub index: usize,
    pub class_name: String,
}

/// Element of an array-of-objects field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayItem {
    pub index: usize,
    pub class_name: String,
}

/// Entities sharing one layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSummary {
    pub layer_id: i32,
    pub entity_count: usize,
}

/// Detailed view of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetails {
    pub name: String,
    pub class_name: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub layer_id: i32,
    /// Total number of entity variables (may exceed `properties.len()`)
    pub var_count: usize,
    pub properties: Vec<PropertyEntry>,
    pub components: Vec<ComponentSummary>,
}

/// Action-specific payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseData {
    #[default]
    None,
    State(EditorState),
    Entities(EntityPage),
    Entity(EntityDetails),
    Value { key: String, value: String },
    Fields(Vec<String>),
    ArrayItems(Vec<ArrayItem>),
    Inserted { index: usize },
    Components { count: usize, components: Vec<ComponentSummary> },
    TerrainHeight(f32),
    TerrainBounds { min: [f32; 3], max: [f32; 3] },
    LocalizationTable { item_count: usize },
    Flag(bool),
    /// Current selection, `entities` capped while `selected_count` is the total
    Selection { selected_count: usize, entities: Vec<EntitySummary> },
    Layers(Vec<LayerSummary>),
    Layer { layer_id: i32 },
}

/// A bridge response
///
/// Every request produces exactly one response, errors included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Correlation id copied from the request
    pub id: u64,
    pub status: Status,
    /// Human-readable outcome
    pub message: String,
    /// Echo of the requested action
    pub action: String,
    /// Resolved entity name, when the action targeted one
    pub entity_name: Option<String>,
    pub data: ResponseData,
}

impl Response {
    pub fn ok(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            message: message.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn error(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn with_entity_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    pub fn with_data(mut self, data: ResponseData) -> Self {
        self.data = data;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
