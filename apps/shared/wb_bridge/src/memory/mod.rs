//! In-memory editor host
//!
//! A complete implementation of the host traits over a tree of
//! [`ObjectNode`]s. The server runs it when no live editor is attached, and the
//! tests use it as a fake that records what the bridge did to it: how many
//! actions were opened and closed, edits made outside any action, and the last
//! native set call. Native failure can be forced with
//! [`MemoryWorld::fail_native_calls`].
//!
//! Undo history is snapshot based: an action that changed something, and each
//! clipboard edit made outside an action, records the world as it was before.
//!
//! Native addressing from an entity follows the editor: a first path entry
//! that names no entity field selects the first component of that class.

pub mod node;
pub mod scene;

use std::path::Path;
use tracing::debug;
use wb_protocol::EditorMode;

use crate::host::{
    ComponentHandle, ContainerRef, EditorHost, EntityHandle, LocalizationEditorApi, PathEntry, WorldEditorApi,
};
pub use node::{ClassRegistry, Field, FieldValue, ObjectNode};
pub use scene::{SceneDocument, SceneError};

/// Bracket bookkeeping of a [`MemoryWorld`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionStats {
    /// Successful `begin_action` calls
    pub opens: usize,
    /// Successful `end_action` calls
    pub closes: usize,
    /// `begin_action` calls refused because an action was already open
    pub nested_opens: usize,
    /// Successful mutations made while no action was open
    pub untracked_edits: usize,
}

#[derive(Debug, Clone)]
struct MemoryComponent {
    id: ComponentHandle,
    node: ObjectNode,
}

#[derive(Debug, Clone)]
struct MemoryEntity {
    id: EntityHandle,
    layer_id: i32,
    /// Entity variables, `Name` and the transform included
    node: ObjectNode,
    components: Vec<MemoryComponent>,
}

impl MemoryEntity {
    fn name(&self) -> &str {
        self.node.scalar("Name").unwrap_or_default()
    }

    fn component(&self, id: ComponentHandle) -> Option<&MemoryComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Leading entry naming a component instead of an entity field
    fn component_entry<'p>(&self, path: &'p [PathEntry]) -> Option<(&'p PathEntry, &'p [PathEntry])> {
        let (first, rest) = path.split_first()?;
        if first.index.is_some() || self.node.field(&first.name).is_some() {
            return None;
        }
        Some((first, rest))
    }

    fn walk(&self, path: &[PathEntry]) -> Option<&ObjectNode> {
        if let Some((first, rest)) = self.component_entry(path) {
            let component = self.components.iter().find(|c| c.node.class_name == first.name)?;
            return component.node.walk(rest);
        }
        self.node.walk(path)
    }

    fn walk_mut(&mut self, path: &[PathEntry]) -> Option<&mut ObjectNode> {
        if let Some((first, rest)) = self.component_entry(path) {
            let component = self.components.iter_mut().find(|c| c.node.class_name == first.name)?;
            return component.node.walk_mut(rest);
        }
        self.node.walk_mut(path)
    }
}

/// Entities and selection as an undo step restores them
#[derive(Debug, Clone)]
struct Snapshot {
    entities: Vec<MemoryEntity>,
    selection: Vec<EntityHandle>,
}

#[derive(Debug, Clone)]
struct UndoStep {
    label: String,
    /// World this step puts back
    restores: Snapshot,
}

fn format_vec3(v: [f32; 3]) -> String {
    format!("{} {} {}", v[0], v[1], v[2])
}

fn parse_vec3(text: &str) -> Option<[f32; 3]> {
    let mut parts = text.split_whitespace().map(|p| p.parse::<f32>().ok());
    let v = [parts.next()??, parts.next()??, parts.next()??];
    Some(v)
}

/// In-memory world editor API
#[derive(Debug, Clone, Default)]
pub struct MemoryWorld {
    entities: Vec<MemoryEntity>,
    classes: ClassRegistry,
    next_id: u64,
    terrain_height: f32,
    selection: Vec<EntityHandle>,
    clipboard: Vec<MemoryEntity>,
    cursor: Option<[f32; 3]>,
    open_action: Option<String>,
    /// World before the open action, and the edits made in it so far
    pending: Option<(Snapshot, usize)>,
    history: Vec<String>,
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    stats: ActionStats,
    fail_native: bool,
    last_set: Option<(ContainerRef, Vec<PathEntry>, String)>,
}

impl MemoryWorld {
    pub fn new(classes: ClassRegistry) -> Self {
        Self {
            classes,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Add an entity with its transform variables, returning its handle
    pub fn spawn(
        &mut self,
        name: &str,
        class_name: &str,
        position: [f32; 3],
        angles: [f32; 3],
        layer_id: i32,
    ) -> EntityHandle {
        let mut node = self
            .classes
            .instantiate(class_name)
            .unwrap_or_else(|| ObjectNode::new(class_name));

        let mut variables = vec![
            Field { name: "Name".into(), value: FieldValue::Scalar { value: name.into(), default: String::new() } },
            Field {
                name: "coords".into(),
                value: FieldValue::Scalar { value: format_vec3(position), default: "0 0 0".into() },
            },
        ];
        for (axis, angle) in ["angleX", "angleY", "angleZ"].iter().zip(angles) {
            variables.push(Field {
                name: axis.to_string(),
                value: FieldValue::Scalar { value: angle.to_string(), default: "0".into() },
            });
        }
        node.fields.retain(|f| !variables.iter().any(|v| v.name == f.name));
        variables.append(&mut node.fields);
        node.fields = variables;

        let id = EntityHandle(self.next_id());
        self.entities.push(MemoryEntity {
            id,
            layer_id,
            node,
            components: Vec::new(),
        });
        id
    }

    /// Attach an already built component node
    pub fn attach(&mut self, entity: EntityHandle, node: ObjectNode) -> Option<ComponentHandle> {
        let id = ComponentHandle(self.next_id());
        self.entity_mut(entity)?.components.push(MemoryComponent { id, node });
        Some(id)
    }

    /// Root object of an entity, for direct inspection
    pub fn entity_node(&self, entity: EntityHandle) -> Option<&ObjectNode> {
        self.entity(entity).map(|e| &e.node)
    }

    pub fn entity_node_mut(&mut self, entity: EntityHandle) -> Option<&mut ObjectNode> {
        self.entity_mut(entity).map(|e| &mut e.node)
    }

    pub fn set_terrain_height(&mut self, height: f32) {
        self.terrain_height = height;
    }

    /// Position used by `paste_at_cursor`, `None` when the cursor is off the terrain
    pub fn set_cursor(&mut self, cursor: Option<[f32; 3]>) {
        self.cursor = cursor;
    }

    /// Make every mutating native call report failure (brackets still work)
    pub fn fail_native_calls(&mut self, fail: bool) {
        self.fail_native = fail;
    }

    pub fn action_stats(&self) -> ActionStats {
        self.stats
    }

    /// Labels of closed actions, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_action_open(&self) -> bool {
        self.open_action.is_some()
    }

    /// `(undo, redo)` steps available
    pub fn undo_depth(&self) -> (usize, usize) {
        (self.undo_stack.len(), self.redo_stack.len())
    }

    /// Target, path and key of the last `set_variable` call
    pub fn last_set(&self) -> Option<(ContainerRef, Vec<PathEntry>, String)> {
        self.last_set.clone()
    }

    fn entity(&self, id: EntityHandle) -> Option<&MemoryEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    fn entity_mut(&mut self, id: EntityHandle) -> Option<&mut MemoryEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    fn container(&self, container: ContainerRef, path: &[PathEntry]) -> Option<&ObjectNode> {
        let entity = self.entity(container.entity())?;
        match container {
            ContainerRef::Entity(_) => entity.walk(path),
            ContainerRef::Component { component, .. } => entity.component(component)?.node.walk(path),
        }
    }

    fn container_mut(&mut self, container: ContainerRef, path: &[PathEntry]) -> Option<&mut ObjectNode> {
        let entity = self.entity_mut(container.entity())?;
        match container {
            ContainerRef::Entity(_) => entity.walk_mut(path),
            ContainerRef::Component { component, .. } => {
                entity.components.iter_mut().find(|c| c.id == component)?.node.walk_mut(path)
            }
        }
    }

    /// Count a successful mutation
    fn edited(&mut self) -> bool {
        match self.pending.as_mut() {
            Some((_, edits)) => *edits += 1,
            None => self.stats.untracked_edits += 1,
        }
        true
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            entities: self.entities.clone(),
            selection: self.selection.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.entities = snapshot.entities;
        self.selection = snapshot.selection;
    }

    fn push_undo(&mut self, label: &str, before: Snapshot) {
        self.undo_stack.push(UndoStep {
            label: label.to_string(),
            restores: before,
        });
        self.redo_stack.clear();
    }

    /// Count a clipboard edit; outside an action it is its own undo step
    fn clipboard_edit(&mut self, label: &str, before: Snapshot) -> bool {
        if self.open_action.is_none() {
            self.push_undo(label, before);
        }
        self.edited()
    }

    /// Classes the object factory can build an entity from
    fn knows_entity_class(&self, class_name: &str) -> bool {
        self.classes.contains(class_name) || self.entities.iter().any(|e| e.node.class_name == class_name)
    }

    /// Copy of an entity with fresh handles
    fn fresh_copy(&mut self, source: &MemoryEntity) -> MemoryEntity {
        let mut copy = source.clone();
        copy.id = EntityHandle(self.next_id());
        for component in &mut copy.components {
            component.id = ComponentHandle(self.next_id());
        }
        copy
    }

    fn selected_entities(&self) -> Vec<MemoryEntity> {
        self.selection
            .iter()
            .filter_map(|&id| self.entity(id).cloned())
            .collect()
    }

    fn paste_copies(&mut self, position: Option<[f32; 3]>) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }

        let before = self.snapshot();
        let sources = self.clipboard.clone();
        self.selection.clear();
        for source in &sources {
            let mut copy = self.fresh_copy(source);
            if let Some(position) = position {
                copy.node.set_scalar("coords", &format_vec3(position));
            }
            self.selection.push(copy.id);
            self.entities.push(copy);
        }
        self.clipboard_edit("Paste", before)
    }
}

impl WorldEditorApi for MemoryWorld {
    fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn entity_at(&self, index: usize) -> Option<EntityHandle> {
        self.entities.get(index).map(|e| e.id)
    }

    fn entity_name(&self, entity: EntityHandle) -> String {
        self.entity(entity).map(|e| e.name().to_string()).unwrap_or_default()
    }

    fn entity_class_name(&self, entity: EntityHandle) -> String {
        self.entity(entity).map(|e| e.node.class_name.clone()).unwrap_or_default()
    }

    fn entity_origin(&self, entity: EntityHandle) -> [f32; 3] {
        self.entity(entity)
            .and_then(|e| e.node.scalar("coords"))
            .and_then(parse_vec3)
            .unwrap_or_default()
    }

    fn entity_angles(&self, entity: EntityHandle) -> [f32; 3] {
        let Some(entity) = self.entity(entity) else {
            return [0.0; 3];
        };
        let angle = |axis: &str| {
            entity
                .node
                .scalar(axis)
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or_default()
        };
        [angle("angleX"), angle("angleY"), angle("angleZ")]
    }

    fn entity_layer_id(&self, entity: EntityHandle) -> i32 {
        self.entity(entity).map(|e| e.layer_id).unwrap_or_default()
    }

    fn component_count(&self, entity: EntityHandle) -> usize {
        self.entity(entity).map(|e| e.components.len()).unwrap_or_default()
    }

    fn component_at(&self, entity: EntityHandle, index: usize) -> Option<ComponentHandle> {
        self.entity(entity)?.components.get(index).map(|c| c.id)
    }

    fn component_class_name(&self, entity: EntityHandle, component: ComponentHandle) -> String {
        self.entity(entity)
            .and_then(|e| e.component(component))
            .map(|c| c.node.class_name.clone())
            .unwrap_or_default()
    }

    fn get_variable(&self, container: ContainerRef, path: &[PathEntry], key: &str) -> Option<String> {
        self.container(container, path)?.field(key).map(FieldValue::as_text)
    }

    fn variable_names(&self, container: ContainerRef, path: &[PathEntry]) -> Option<Vec<String>> {
        self.container(container, path).map(ObjectNode::field_names)
    }

    fn set_variable(&mut self, container: ContainerRef, path: &[PathEntry], key: &str, value: &str) -> bool {
        self.last_set = Some((container, path.to_vec(), key.to_string()));
        if self.fail_native {
            return false;
        }

        let updated = self
            .container_mut(container, path)
            .is_some_and(|node| node.set_scalar(key, value));
        updated && self.edited()
    }

    fn clear_variable(&mut self, container: ContainerRef, path: &[PathEntry], key: &str) -> bool {
        if self.fail_native {
            return false;
        }

        let cleared = match self.container_mut(container, path).and_then(|node| node.field_mut(key)) {
            Some(field) => {
                field.reset();
                true
            }
            None => false,
        };
        cleared && self.edited()
    }

    fn create_array_member(
        &mut self,
        container: ContainerRef,
        path: &[PathEntry],
        key: &str,
        class_name: &str,
        index: usize,
    ) -> bool {
        if self.fail_native {
            return false;
        }
        let Some(item) = self.classes.instantiate(class_name) else {
            debug!("No class template for '{}'", class_name);
            return false;
        };

        let inserted = match self.container_mut(container, path).and_then(|node| node.field_mut(key)) {
            Some(FieldValue::Array(items)) if index <= items.len() => {
                items.insert(index, item);
                true
            }
            _ => false,
        };
        inserted && self.edited()
    }

    fn remove_array_member(&mut self, container: ContainerRef, path: &[PathEntry], key: &str, index: usize) -> bool {
        if self.fail_native {
            return false;
        }

        let removed = match self.container_mut(container, path).and_then(|node| node.field_mut(key)) {
            Some(FieldValue::Array(items)) if index < items.len() => {
                items.remove(index);
                true
            }
            _ => false,
        };
        removed && self.edited()
    }

    fn read_array_elements(&self, container: ContainerRef, path: &[PathEntry], key: &str) -> Option<Vec<String>> {
        match self.container(container, path)?.field(key)? {
            FieldValue::Array(items) => Some(items.iter().map(|item| item.class_name.clone()).collect()),
            _ => None,
        }
    }

    fn change_class(&mut self, container: ContainerRef, path: &[PathEntry], class_name: &str) -> bool {
        if self.fail_native {
            return false;
        }
        let Some((field, parent)) = path.split_last() else {
            return false;
        };
        let Some(instance) = self.classes.instantiate(class_name) else {
            debug!("No class template for '{}'", class_name);
            return false;
        };

        let changed = match (
            self.container_mut(container, parent).and_then(|node| node.field_mut(&field.name)),
            field.index,
        ) {
            (Some(FieldValue::Object(slot)), None) => {
                *slot = Some(Box::new(instance));
                true
            }
            (Some(FieldValue::Array(items)), Some(index)) if index < items.len() => {
                items[index] = instance;
                true
            }
            _ => false,
        };
        changed && self.edited()
    }

    fn begin_action(&mut self, label: &str) -> bool {
        if self.open_action.is_some() {
            self.stats.nested_opens += 1;
            return false;
        }
        self.open_action = Some(label.to_string());
        self.pending = Some((self.snapshot(), 0));
        self.stats.opens += 1;
        true
    }

    fn end_action(&mut self) -> bool {
        let Some(label) = self.open_action.take() else {
            return false;
        };
        if let Some((before, edits)) = self.pending.take() {
            if edits > 0 {
                self.push_undo(&label, before);
            }
        }
        self.history.push(label);
        self.stats.closes += 1;
        true
    }

    fn undo(&mut self) -> bool {
        if self.fail_native || self.open_action.is_some() {
            return false;
        }
        let Some(step) = self.undo_stack.pop() else {
            return false;
        };

        debug!("Undo '{}'", step.label);
        let after = self.snapshot();
        self.restore(step.restores);
        self.redo_stack.push(UndoStep {
            label: step.label,
            restores: after,
        });
        true
    }

    fn redo(&mut self) -> bool {
        if self.fail_native || self.open_action.is_some() {
            return false;
        }
        let Some(step) = self.redo_stack.pop() else {
            return false;
        };

        debug!("Redo '{}'", step.label);
        let before = self.snapshot();
        self.restore(step.restores);
        self.undo_stack.push(UndoStep {
            label: step.label,
            restores: before,
        });
        true
    }

    fn create_entity(
        &mut self,
        class_name: &str,
        name: &str,
        layer_id: i32,
        position: [f32; 3],
        angles: [f32; 3],
    ) -> Option<EntityHandle> {
        if self.fail_native || !self.knows_entity_class(class_name) {
            return None;
        }

        let entity = self.spawn(name, class_name, position, angles, layer_id);
        if name.is_empty() {
            let generated = format!("Entity_{}", entity.0);
            self.entity_mut(entity)?.node.set_scalar("Name", &generated);
        }
        self.edited();
        Some(entity)
    }

    fn rename_entity(&mut self, entity: EntityHandle, name: &str) -> bool {
        if self.fail_native || name.is_empty() {
            return false;
        }
        let renamed = self
            .entity_mut(entity)
            .is_some_and(|e| e.node.set_scalar("Name", name));
        renamed && self.edited()
    }

    fn delete_entity(&mut self, entity: EntityHandle) -> bool {
        if self.fail_native {
            return false;
        }
        let Some(position) = self.entities.iter().position(|e| e.id == entity) else {
            return false;
        };
        self.entities.remove(position);
        self.selection.retain(|&id| id != entity);
        self.edited()
    }

    fn create_component(&mut self, entity: EntityHandle, class_name: &str) -> Option<ComponentHandle> {
        if self.fail_native || self.entity(entity).is_none() {
            return None;
        }
        let node = self.classes.instantiate(class_name)?;
        let id = self.attach(entity, node)?;
        self.edited();
        Some(id)
    }

    fn delete_component(&mut self, entity: EntityHandle, component: ComponentHandle) -> bool {
        if self.fail_native {
            return false;
        }
        let removed = match self.entity_mut(entity) {
            Some(e) => {
                let before = e.components.len();
                e.components.retain(|c| c.id != component);
                e.components.len() < before
            }
            None => false,
        };
        removed && self.edited()
    }

    fn terrain_surface_y(&self, _x: f32, _z: f32) -> f32 {
        self.terrain_height
    }

    fn selected_count(&self) -> usize {
        self.selection.len()
    }

    fn selected_entity(&self, index: usize) -> Option<EntityHandle> {
        self.selection.get(index).copied()
    }

    fn add_to_selection(&mut self, entity: EntityHandle) -> bool {
        if self.entity(entity).is_none() || self.selection.contains(&entity) {
            return false;
        }
        self.selection.push(entity);
        true
    }

    fn remove_from_selection(&mut self, entity: EntityHandle) -> bool {
        let Some(position) = self.selection.iter().position(|&id| id == entity) else {
            return false;
        };
        self.selection.remove(position);
        true
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn copy_selected(&mut self) -> bool {
        if self.fail_native || self.selection.is_empty() {
            return false;
        }
        self.clipboard = self.selected_entities();
        true
    }

    fn cut_selected(&mut self) -> bool {
        if !self.copy_selected() {
            return false;
        }
        let before = self.snapshot();
        let cut: Vec<EntityHandle> = self.selection.drain(..).collect();
        self.entities.retain(|e| !cut.contains(&e.id));
        self.clipboard_edit("Cut", before)
    }

    fn paste(&mut self) -> bool {
        !self.fail_native && self.paste_copies(None)
    }

    fn paste_at_cursor(&mut self) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        !self.fail_native && self.paste_copies(Some(cursor))
    }

    fn duplicate_selected(&mut self) -> bool {
        if self.fail_native || self.selection.is_empty() {
            return false;
        }

        let before = self.snapshot();
        let sources = self.selected_entities();
        self.selection.clear();
        for source in &sources {
            let copy = self.fresh_copy(source);
            self.selection.push(copy.id);
            self.entities.push(copy);
        }
        self.clipboard_edit("Duplicate", before)
    }

    fn has_copied(&self) -> bool {
        !self.clipboard.is_empty()
    }
}

#[derive(Debug, Clone)]
struct LocItem {
    id: String,
    properties: Vec<(String, String)>,
}

/// In-memory localization editor
#[derive(Debug, Clone, Default)]
pub struct MemoryStringTable {
    /// `None` while no string table is loaded
    items: Option<Vec<LocItem>>,
    modifying: bool,
    modify_opens: usize,
    modify_closes: usize,
}

impl MemoryStringTable {
    /// Module loaded, no table
    pub fn unloaded() -> Self {
        Self::default()
    }

    pub fn with_items<I, P>(items: I) -> Self
    where
        I: IntoIterator<Item = (String, P)>,
        P: IntoIterator<Item = (String, String)>,
    {
        let items = items
            .into_iter()
            .map(|(id, properties)| {
                let mut all = vec![("Id".to_string(), id.clone())];
                all.extend(properties.into_iter().filter(|(name, _)| name != "Id"));
                LocItem { id, properties: all }
            })
            .collect();
        Self {
            items: Some(items),
            ..Self::default()
        }
    }

    /// Value of one property of one item
    pub fn item_property(&self, item_id: &str, property: &str) -> Option<&str> {
        let item = self.items.as_ref()?.iter().find(|i| i.id == item_id)?;
        item.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// `(begin_modify, end_modify)` call counts
    pub fn modify_counts(&self) -> (usize, usize) {
        (self.modify_opens, self.modify_closes)
    }
}

impl LocalizationEditorApi for MemoryStringTable {
    fn begin_modify(&mut self, label: &str) {
        debug!("Localization modify '{}'", label);
        self.modifying = true;
        self.modify_opens += 1;
    }

    fn end_modify(&mut self) {
        self.modifying = false;
        self.modify_closes += 1;
    }

    fn table_item_count(&self) -> Option<usize> {
        self.items.as_ref().map(Vec::len)
    }

    fn find_item(&self, item_id: &str) -> Option<usize> {
        self.items.as_ref()?.iter().position(|i| i.id == item_id)
    }

    fn property_index(&self, item: usize, property: &str) -> Option<usize> {
        self.items
            .as_ref()?
            .get(item)?
            .properties
            .iter()
            .position(|(name, _)| name == property)
    }

    fn insert_item(&mut self, item_id: &str) -> bool {
        let Some(items) = self.items.as_mut() else {
            return false;
        };
        if item_id.is_empty() || items.iter().any(|i| i.id == item_id) {
            return false;
        }
        items.push(LocItem {
            id: item_id.to_string(),
            properties: vec![
                ("Id".to_string(), item_id.to_string()),
                ("Target_en_us".to_string(), String::new()),
                ("Comment".to_string(), String::new()),
            ],
        });
        true
    }

    fn delete_item(&mut self, item_id: &str) {
        if let Some(items) = self.items.as_mut() {
            items.retain(|i| i.id != item_id);
        }
    }

    fn modify_property(&mut self, item: usize, property: usize, value: &str) {
        let Some(item) = self.items.as_mut().and_then(|items| items.get_mut(item)) else {
            return;
        };
        if let Some((name, slot)) = item.properties.get_mut(property) {
            *slot = value.to_string();
            if *name == "Id" {
                item.id = value.to_string();
            }
        }
    }
}

/// In-memory editor: a world, optional terrain and a localization module
#[derive(Debug, Clone, Default)]
pub struct MemoryEditor {
    mode: EditorMode,
    world: MemoryWorld,
    terrain: Option<([f32; 3], [f32; 3])>,
    localization: Option<MemoryStringTable>,
}

impl MemoryEditor {
    /// Empty world in edit mode, localization module loaded without a table
    pub fn new() -> Self {
        Self {
            localization: Some(MemoryStringTable::unloaded()),
            ..Self::default()
        }
    }

    pub fn from_scene(doc: &SceneDocument) -> Self {
        let classes = doc.registry();
        let mut world = MemoryWorld::new(classes.clone());

        for entity in &doc.entities {
            let handle = world.spawn(&entity.name, &entity.class, entity.position, entity.angles, entity.layer_id);
            if let Some(node) = world.entity_node_mut(handle) {
                scene::apply_fields(node, &entity.fields, &classes);
            }
            for component in &entity.components {
                world.attach(handle, component.build(&classes));
            }
        }

        for name in &doc.selected {
            if let Some(handle) = crate::locator::find(&world, name) {
                world.add_to_selection(handle);
            }
        }

        if let Some(terrain) = &doc.terrain {
            world.set_terrain_height(terrain.height);
        }

        let localization = match &doc.localization {
            Some(table) => MemoryStringTable::with_items(
                table
                    .items
                    .iter()
                    .map(|item| (item.id.clone(), item.properties.clone())),
            ),
            None => MemoryStringTable::unloaded(),
        };

        Self {
            mode: EditorMode::Edit,
            world,
            terrain: doc.terrain.as_ref().map(|t| (t.min, t.max)),
            localization: Some(localization),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        Ok(Self::from_scene(&SceneDocument::from_json_str(json)?))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        Ok(Self::from_scene(&SceneDocument::from_json_file(path)?))
    }

    pub fn with_mode(mut self, mode: EditorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    /// Drop the localization module entirely
    pub fn unload_localization(&mut self) {
        self.localization = None;
    }

    pub fn world(&self) -> &MemoryWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut MemoryWorld {
        &mut self.world
    }

    pub fn string_table(&self) -> Option<&MemoryStringTable> {
        self.localization.as_ref()
    }
}

impl EditorHost for MemoryEditor {
    fn mode(&self) -> EditorMode {
        self.mode
    }

    fn world_api(&mut self) -> Option<&mut dyn WorldEditorApi> {
        match self.mode {
            EditorMode::Edit => Some(&mut self.world as &mut dyn WorldEditorApi),
            EditorMode::Game | EditorMode::NoWorldEditor => None,
        }
    }

    fn terrain_bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        match self.mode {
            EditorMode::NoWorldEditor => None,
            EditorMode::Game | EditorMode::Edit => self.terrain,
        }
    }

    fn localization(&mut self) -> Option<&mut dyn LocalizationEditorApi> {
        self.localization
            .as_mut()
            .map(|table| table as &mut dyn LocalizationEditorApi)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::MemoryEditor;
    use serde_json::json;

    /// Scene shared by the unit tests
    ///
    /// Tower_01 carries a scenario area with three waypoints and a trigger
    /// plugin. There are two entities named "Crate".
    pub(crate) fn tower_scene() -> MemoryEditor {
        let scene = json!({
            "classes": [
                { "class": "SCR_Waypoint", "fields": [
                    { "type": "scalar", "name": "Radius", "value": "5" },
                    { "type": "scalar", "name": "Priority", "value": "0" }
                ] },
                { "class": "SCR_DefendWaypoint", "fields": [
                    { "type": "scalar", "name": "Radius", "value": "10" },
                    { "type": "scalar", "name": "Duration", "value": "60" }
                ] },
                { "class": "SCR_TriggerPlugin", "fields": [
                    { "type": "scalar", "name": "m_fInterval", "value": "1" }
                ] },
                { "class": "SCR_TimerPlugin", "fields": [
                    { "type": "scalar", "name": "m_fDelay", "value": "0" }
                ] },
                { "class": "SCR_ScenarioFrameworkArea", "fields": [
                    { "type": "scalar", "name": "Radius", "value": "25" },
                    { "type": "scalar", "name": "m_sAreaName", "value": "" },
                    { "type": "array", "name": "m_aWaypoints" },
                    { "type": "object", "name": "m_Plugin" }
                ] },
                { "class": "SCR_SpawnSettings", "fields": [
                    { "type": "scalar", "name": "Count", "value": "1" },
                    { "type": "scalar", "name": "Faction", "value": "US" }
                ] },
                { "class": "MeshObject", "fields": [
                    { "type": "scalar", "name": "Object", "value": "" }
                ] },
                { "class": "RigidBody", "fields": [
                    { "type": "scalar", "name": "Mass", "value": "10" }
                ] }
            ],
            "entities": [
                {
                    "name": "Tower_01",
                    "position": [10.0, 0.0, 20.0],
                    "fields": [
                        { "type": "scalar", "name": "Flags", "value": "0" },
                        { "type": "object", "name": "m_Spawn", "value": { "class": "SCR_SpawnSettings", "fields": [
                            { "type": "scalar", "name": "Count", "value": "4" }
                        ] } }
                    ],
                    "components": [
                        { "class": "MeshObject", "fields": [
                            { "type": "scalar", "name": "Object", "value": "{A1B2}Tower.xob" }
                        ] },
                        { "class": "SCR_ScenarioFrameworkArea", "fields": [
                            { "type": "array", "name": "m_aWaypoints", "items": [
                                { "class": "SCR_Waypoint" },
                                { "class": "SCR_Waypoint" },
                                { "class": "SCR_DefendWaypoint" }
                            ] },
                            { "type": "object", "name": "m_Plugin", "value": { "class": "SCR_TriggerPlugin" } }
                        ] }
                    ]
                },
                {
                    "name": "Tower_02",
                    "position": [40.0, 0.0, 20.0],
                    "angles": [0.0, 90.0, 0.0],
                    "components": [ { "class": "MeshObject" } ]
                },
                {
                    "name": "Crate",
                    "position": [5.0, 0.0, 5.0],
                    "components": [ { "class": "MeshObject" }, { "class": "RigidBody" } ]
                },
                { "name": "Crate", "class": "SCR_CrateEntity", "position": [6.0, 0.0, 5.0] },
                { "name": "SpawnPoint_A", "class": "SCR_SpawnPoint", "layer_id": 1 }
            ],
            "terrain": { "min": [0.0, 0.0, 0.0], "max": [1024.0, 120.0, 1024.0], "height": 12.5 },
            "localization": { "items": [
                { "id": "STR_Tower_Name", "properties": { "Target_en_us": "Radio tower" } }
            ] },
            "selected": ["Tower_02"]
        });

        MemoryEditor::from_json_str(&scene.to_string()).expect("fixture scene parses")
    }
}
