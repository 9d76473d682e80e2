use std::fmt;
use std::str::FromStr;

use crate::error::BridgeError;

/// Every action the bridge understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Status
    Ping,
    GetState,

    // Entities
    ListEntities,
    GetEntity,
    Move,
    Rotate,
    Rename,
    DeleteEntity,
    CreateEntity,

    // Selection
    SelectEntity,
    DeselectEntity,
    ClearSelection,
    GetSelected,

    // Layers
    ListLayers,
    GetEntityLayer,

    // Properties
    GetProperty,
    ListProperties,
    SetProperty,
    ClearProperty,
    ListArrayItems,
    InsertArrayItem,
    RemoveArrayItem,
    ChangeClass,

    // Components
    ListComponents,
    AddComponent,
    RemoveComponent,

    // Terrain
    GetTerrainHeight,
    GetTerrainBounds,

    // Localization
    InsertLocItem,
    DeleteLocItem,
    ModifyLocItem,
    GetLocTable,

    // Clipboard
    Copy,
    Cut,
    Paste,
    PasteAtCursor,
    Duplicate,
    HasCopied,

    // Undo history
    Undo,
    Redo,
}

impl Action {
    pub const ALL: [Action; 40] = [
        Action::Ping,
        Action::GetState,
        Action::ListEntities,
        Action::GetEntity,
        Action::Move,
        Action::Rotate,
        Action::Rename,
        Action::DeleteEntity,
        Action::CreateEntity,
        Action::SelectEntity,
        Action::DeselectEntity,
        Action::ClearSelection,
        Action::GetSelected,
        Action::ListLayers,
        Action::GetEntityLayer,
        Action::GetProperty,
        Action::ListProperties,
        Action::SetProperty,
        Action::ClearProperty,
        Action::ListArrayItems,
        Action::InsertArrayItem,
        Action::RemoveArrayItem,
        Action::ChangeClass,
        Action::ListComponents,
        Action::AddComponent,
        Action::RemoveComponent,
        Action::GetTerrainHeight,
        Action::GetTerrainBounds,
        Action::InsertLocItem,
        Action::DeleteLocItem,
        Action::ModifyLocItem,
        Action::GetLocTable,
        Action::Copy,
        Action::Cut,
        Action::Paste,
        Action::PasteAtCursor,
        Action::Duplicate,
        Action::HasCopied,
        Action::Undo,
        Action::Redo,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Ping => "ping",
            Action::GetState => "getState",
            Action::ListEntities => "listEntities",
            Action::GetEntity => "getEntity",
            Action::Move => "move",
            Action::Rotate => "rotate",
            Action::Rename => "rename",
            Action::DeleteEntity => "deleteEntity",
            Action::CreateEntity => "createEntity",
            Action::SelectEntity => "selectEntity",
            Action::DeselectEntity => "deselectEntity",
            Action::ClearSelection => "clearSelection",
            Action::GetSelected => "getSelected",
            Action::ListLayers => "listLayers",
            Action::GetEntityLayer => "getEntityLayer",
            Action::GetProperty => "getProperty",
            Action::ListProperties => "listProperties",
            Action::SetProperty => "setProperty",
            Action::ClearProperty => "clearProperty",
            Action::ListArrayItems => "listArrayItems",
            Action::InsertArrayItem => "insertArrayItem",
            Action::RemoveArrayItem => "removeArrayItem",
            Action::ChangeClass => "changeClass",
            Action::ListComponents => "listComponents",
            Action::AddComponent => "addComponent",
            Action::RemoveComponent => "removeComponent",
            Action::GetTerrainHeight => "getTerrainHeight",
            Action::GetTerrainBounds => "getTerrainBounds",
            Action::InsertLocItem => "insertLocItem",
            Action::DeleteLocItem => "deleteLocItem",
            Action::ModifyLocItem => "modifyLocItem",
            Action::GetLocTable => "getLocTable",
            Action::Copy => "copy",
            Action::Cut => "cut",
            Action::Paste => "paste",
            Action::PasteAtCursor => "pasteAtCursor",
            Action::Duplicate => "duplicate",
            Action::HasCopied => "hasCopied",
            Action::Undo => "undo",
            Action::Redo => "redo",
        }
    }

    /// Whether the action changes the scene or a string table
    ///
    /// Clipboard edits and undo/redo mutate without an [`crate::ActionTransaction`]:
    /// the editor records clipboard calls in its undo history itself, and
    /// undo/redo operate on that history. Selection changes are not mutations.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Action::Move
                | Action::Rotate
                | Action::Rename
                | Action::DeleteEntity
                | Action::CreateEntity
                | Action::SetProperty
                | Action::ClearProperty
                | Action::InsertArrayItem
                | Action::RemoveArrayItem
                | Action::ChangeClass
                | Action::AddComponent
                | Action::RemoveComponent
                | Action::InsertLocItem
                | Action::DeleteLocItem
                | Action::ModifyLocItem
                | Action::Cut
                | Action::Paste
                | Action::PasteAtCursor
                | Action::Duplicate
                | Action::Undo
                | Action::Redo
        )
    }

    /// Comma-separated list of every wire name
    pub fn valid_names() -> String {
        Action::ALL.iter().map(Action::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for Action {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(BridgeError::InvalidRequest(format!(
                "action parameter required. Valid: {}",
                Action::valid_names()
            )));
        }

        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| {
                BridgeError::InvalidRequest(format!("Unknown action: {}. Valid: {}", s, Action::valid_names()))
            })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
