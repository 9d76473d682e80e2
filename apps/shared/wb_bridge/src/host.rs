//! Host editor boundary
//!
//! The bridge never owns the scene. Everything it reads or mutates goes through
//! the capability traits in this module, implemented by whatever embeds the
//! bridge (a live editor binding, or [`crate::memory::MemoryEditor`]).
//!
//! Native calls report failure with a `bool` or an `Option`, never by panicking;
//! turning those outcomes into [`crate::BridgeError`] is the caller's job.

use std::fmt;
use wb_protocol::EditorMode;

/// Opaque handle to an entity of the live scene
///
/// Only meaningful for the host that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub u64);

/// Opaque handle to a component, valid only together with its owning entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentHandle(pub u64);

/// The object a field operation actually reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    Entity(EntityHandle),
    Component {
        entity: EntityHandle,
        component: ComponentHandle,
    },
}

impl ContainerRef {
    /// Entity owning this container
    pub fn entity(&self) -> EntityHandle {
        match *self {
            ContainerRef::Entity(entity) => entity,
            ContainerRef::Component { entity, .. } => entity,
        }
    }
}

/// One native addressing step: a field name, optionally indexing into an array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub name: String,
    pub index: Option<usize>,
}

impl PathEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => f.write_str(&self.name),
        }
    }
}

/// Module lookup on the host editor
pub trait EditorHost {
    /// Which editor surface is reachable right now
    fn mode(&self) -> EditorMode;

    /// World editor API, `None` unless the editor is in edit mode
    fn world_api(&mut self) -> Option<&mut dyn WorldEditorApi>;

    /// Terrain bounds as `(min, max)`, `None` when no terrain is loaded
    fn terrain_bounds(&self) -> Option<([f32; 3], [f32; 3])>;

    /// Localization editor, `None` when the module is not loaded
    fn localization(&mut self) -> Option<&mut dyn LocalizationEditorApi>;
}

/// Native world editor API
///
/// Field access methods take a container plus an ordered list of path entries
/// descending from it. An empty path addresses the container itself.
pub trait WorldEditorApi {
    // Entity enumeration. Order is whatever the registry yields right now and
    // may change after any mutation.
    fn entity_count(&self) -> usize;
    fn entity_at(&self, index: usize) -> Option<EntityHandle>;
    fn entity_name(&self, entity: EntityHandle) -> String;
    fn entity_class_name(&self, entity: EntityHandle) -> String;
    fn entity_origin(&self, entity: EntityHandle) -> [f32; 3];
    fn entity_angles(&self, entity: EntityHandle) -> [f32; 3];
    fn entity_layer_id(&self, entity: EntityHandle) -> i32;

    // Component enumeration
    fn component_count(&self, entity: EntityHandle) -> usize;
    fn component_at(&self, entity: EntityHandle, index: usize) -> Option<ComponentHandle>;
    fn component_class_name(&self, entity: EntityHandle, component: ComponentHandle) -> String;

    // Fields
    /// Current value of a field as text, `None` when the field does not exist
    fn get_variable(&self, container: ContainerRef, path: &[PathEntry], key: &str) -> Option<String>;
    /// Field names in declaration order, `None` when the path addresses nothing
    fn variable_names(&self, container: ContainerRef, path: &[PathEntry]) -> Option<Vec<String>>;
    fn set_variable(&mut self, container: ContainerRef, path: &[PathEntry], key: &str, value: &str) -> bool;
    fn clear_variable(&mut self, container: ContainerRef, path: &[PathEntry], key: &str) -> bool;

    // Arrays of objects
    fn create_array_member(
        &mut self,
        container: ContainerRef,
        path: &[PathEntry],
        key: &str,
        class_name: &str,
        index: usize,
    ) -> bool;
    fn remove_array_member(&mut self, container: ContainerRef, path: &[PathEntry], key: &str, index: usize) -> bool;
    /// Runtime class of every element, `None` when `key` is not an array of objects
    fn read_array_elements(&self, container: ContainerRef, path: &[PathEntry], key: &str) -> Option<Vec<String>>;

    /// Replace the object addressed by the last path entry with a fresh instance of `class_name`
    fn change_class(&mut self, container: ContainerRef, path: &[PathEntry], class_name: &str) -> bool;

    // Undo bracket
    fn begin_action(&mut self, label: &str) -> bool;
    fn end_action(&mut self) -> bool;

    // Undo history. Both refuse while an action is open or nothing is recorded.
    fn undo(&mut self) -> bool;
    fn redo(&mut self) -> bool;

    // Entity and component lifecycle
    /// New entity of `class_name` (a class or prefab resource); an empty name lets the editor pick one
    fn create_entity(
        &mut self,
        class_name: &str,
        name: &str,
        layer_id: i32,
        position: [f32; 3],
        angles: [f32; 3],
    ) -> Option<EntityHandle>;
    fn rename_entity(&mut self, entity: EntityHandle, name: &str) -> bool;
    fn delete_entity(&mut self, entity: EntityHandle) -> bool;
    fn create_component(&mut self, entity: EntityHandle, class_name: &str) -> Option<ComponentHandle>;
    fn delete_component(&mut self, entity: EntityHandle, component: ComponentHandle) -> bool;

    fn terrain_surface_y(&self, x: f32, z: f32) -> f32;

    // Selection and clipboard
    fn selected_count(&self) -> usize;
    fn selected_entity(&self, index: usize) -> Option<EntityHandle>;
    /// `false` when the entity was already selected
    fn add_to_selection(&mut self, entity: EntityHandle) -> bool;
    /// `false` when the entity was not selected
    fn remove_from_selection(&mut self, entity: EntityHandle) -> bool;
    fn clear_selection(&mut self);
    fn copy_selected(&mut self) -> bool;
    fn cut_selected(&mut self) -> bool;
    fn paste(&mut self) -> bool;
    fn paste_at_cursor(&mut self) -> bool;
    fn duplicate_selected(&mut self) -> bool;
    fn has_copied(&self) -> bool;
}

/// Native localization (string table) editor
pub trait LocalizationEditorApi {
    fn begin_modify(&mut self, label: &str);
    fn end_modify(&mut self);

    /// Number of items in the loaded string table, `None` when no table is loaded
    fn table_item_count(&self) -> Option<usize>;
    /// Position of the item with the given id
    fn find_item(&self, item_id: &str) -> Option<usize>;
    /// Index of a property on an item, `None` when the item has no such property
    fn property_index(&self, item: usize, property: &str) -> Option<usize>;

    fn insert_item(&mut self, item_id: &str) -> bool;
    fn delete_item(&mut self, item_id: &str);
    fn modify_property(&mut self, item: usize, property: usize, value: &str);
}
