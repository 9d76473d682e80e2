//! JSON scene documents for the in-memory editor
//!
//! ```json
//! {
//!   "classes": [
//!     { "class": "SCR_Waypoint", "fields": [ { "type": "scalar", "name": "Radius", "value": "5" } ] }
//!   ],
//!   "entities": [
//!     {
//!       "name": "Tower_01",
//!       "position": [10.0, 0.0, 20.0],
//!       "components": [
//!         { "class": "SCR_ScenarioFrameworkArea", "fields": [
//!           { "type": "array", "name": "m_aWaypoints", "items": [ { "class": "SCR_Waypoint" } ] }
//!         ] }
//!       ]
//!     }
//!   ],
//!   "terrain": { "min": [0, 0, 0], "max": [1024, 120, 1024], "height": 12.5 },
//!   "localization": { "items": [ { "id": "STR_Tower", "properties": { "Target_en_us": "Radio tower" } } ] },
//!   "selected": ["Tower_01"]
//! }
//! ```
//!
//! Objects start from their class template when one is declared under
//! `classes`, and listed fields override template fields in place. A template
//! field's value is the default a cleared field goes back to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use super::node::{ClassRegistry, FieldValue, ObjectNode};

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDocument {
    /// Class templates known to the object factory
    pub classes: Vec<ObjectDoc>,
    pub entities: Vec<EntityDoc>,
    pub terrain: Option<TerrainDoc>,
    /// String table, absent when no localization file is loaded
    pub localization: Option<LocalizationDoc>,
    /// Names of initially selected entities
    pub selected: Vec<String>,
}

impl SceneDocument {
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Class registry built from the declared templates
    ///
    /// Templates may reference each other, each one is built against the
    /// templates declared before it.
    pub fn registry(&self) -> ClassRegistry {
        let mut registry = ClassRegistry::default();
        for template in &self.classes {
            let node = template.build(&registry);
            registry.register(node);
        }
        registry
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDoc {
    pub class: String,
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
}

impl ObjectDoc {
    pub fn build(&self, classes: &ClassRegistry) -> ObjectNode {
        let mut node = classes
            .instantiate(&self.class)
            .unwrap_or_else(|| ObjectNode::new(&self.class));
        apply_fields(&mut node, &self.fields, classes);
        node
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldDoc {
    Scalar {
        name: String,
        #[serde(default)]
        value: String,
        #[serde(default)]
        default: Option<String>,
    },
    Object {
        name: String,
        #[serde(default)]
        value: Option<ObjectDoc>,
    },
    Array {
        name: String,
        #[serde(default)]
        items: Vec<ObjectDoc>,
    },
}

impl FieldDoc {
    pub fn name(&self) -> &str {
        match self {
            FieldDoc::Scalar { name, .. } | FieldDoc::Object { name, .. } | FieldDoc::Array { name, .. } => name,
        }
    }
}

/// Apply field overrides on top of a (possibly templated) node
pub(crate) fn apply_fields(node: &mut ObjectNode, fields: &[FieldDoc], classes: &ClassRegistry) {
    for doc in fields {
        let value = match doc {
            FieldDoc::Scalar { value, default, .. } => {
                let template_default = match node.field(doc.name()) {
                    Some(FieldValue::Scalar { default, .. }) => Some(default.clone()),
                    _ => None,
                };
                FieldValue::Scalar {
                    value: value.clone(),
                    default: default
                        .clone()
                        .or(template_default)
                        .unwrap_or_else(|| value.clone()),
                }
            }
            FieldDoc::Object { value, .. } => {
                FieldValue::Object(value.as_ref().map(|object| Box::new(object.build(classes))))
            }
            FieldDoc::Array { items, .. } => {
                FieldValue::Array(items.iter().map(|item| item.build(classes)).collect())
            }
        };
        node.upsert(doc.name(), value);
    }
}

fn default_entity_class() -> String {
    "GenericEntity".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDoc {
    pub name: String,
    #[serde(default = "default_entity_class")]
    pub class: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub angles: [f32; 3],
    #[serde(default)]
    pub layer_id: i32,
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
    #[serde(default)]
    pub components: Vec<ObjectDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainDoc {
    pub min: [f32; 3],
    pub max: [f32; 3],
    /// Surface height, the terrain is flat
    #[serde(default)]
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizationDoc {
    #[serde(default)]
    pub items: Vec<LocItemDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocItemDoc {
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}
