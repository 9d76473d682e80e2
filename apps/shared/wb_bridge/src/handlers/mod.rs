//! Per-family request handlers
//!
//! Each handler validates its parameters first, then looks up the host modules
//! it needs, then reads, and only then opens a transaction for the native
//! mutation. A request rejected before the last step leaves no trace in the
//! editor's undo history.

mod clipboard;
mod components;
mod entities;
mod history;
mod layers;
mod localization;
mod properties;
mod selection;
mod status;
mod terrain;

use wb_protocol::{Request, Response};

use crate::action::Action;
use crate::error::{BridgeError, Result};
use crate::host::{EditorHost, WorldEditorApi};

/// Run `action` against the host
pub(crate) fn handle(action: Action, host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    match action {
        Action::Ping => status::ping(host),
        Action::GetState => status::get_state(host),

        Action::ListEntities => entities::list(host, request),
        Action::GetEntity => entities::get(host, request),
        Action::Move => entities::move_to(host, request),
        Action::Rotate => entities::rotate(host, request),
        Action::Rename => entities::rename(host, request),
        Action::DeleteEntity => entities::delete(host, request),
        Action::CreateEntity => entities::create(host, request),

        Action::SelectEntity => selection::select(host, request),
        Action::DeselectEntity => selection::deselect(host, request),
        Action::ClearSelection => selection::clear(host),
        Action::GetSelected => selection::get(host),

        Action::ListLayers => layers::list(host),
        Action::GetEntityLayer => layers::entity_layer(host, request),

        Action::GetProperty => properties::get(host, request),
        Action::ListProperties => properties::list(host, request),
        Action::SetProperty => properties::set(host, request),
        Action::ClearProperty => properties::clear(host, request),
        Action::ListArrayItems => properties::list_items(host, request),
        Action::InsertArrayItem => properties::insert_item(host, request),
        Action::RemoveArrayItem => properties::remove_item(host, request),
        Action::ChangeClass => properties::change_class(host, request),

        Action::ListComponents => components::list(host, request),
        Action::AddComponent => components::add(host, request),
        Action::RemoveComponent => components::remove(host, request),

        Action::GetTerrainHeight => terrain::height(host, request),
        Action::GetTerrainBounds => terrain::bounds(host),

        Action::InsertLocItem => localization::insert(host, request),
        Action::DeleteLocItem => localization::delete(host, request),
        Action::ModifyLocItem => localization::modify(host, request),
        Action::GetLocTable => localization::table(host),

        Action::Copy
        | Action::Cut
        | Action::Paste
        | Action::PasteAtCursor
        | Action::Duplicate
        | Action::HasCopied => clipboard::run(action, host),

        Action::Undo | Action::Redo => history::run(action, host),
    }
}

/// World editor API, or `Unavailable` naming what is missing
fn world_api(host: &mut dyn EditorHost) -> Result<&mut dyn WorldEditorApi> {
    let mode = host.mode();
    host.world_api().ok_or_else(|| BridgeError::world_unavailable(mode))
}

/// Non-empty request parameter
fn require<'r>(value: &'r str, param: &str, action: Action) -> Result<&'r str> {
    if value.is_empty() {
        return Err(BridgeError::missing(param, action.as_str()));
    }
    Ok(value)
}

/// Three whitespace separated numbers, e.g. `"10 0 20"`
fn parse_vector(value: &str, action: Action) -> Result<[f32; 3]> {
    let parts: Vec<f32> = value
        .split_whitespace()
        .map(|part| part.parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| invalid_vector(value, action))?;

    match parts.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(invalid_vector(value, action)),
    }
}

fn invalid_vector(value: &str, action: Action) -> BridgeError {
    BridgeError::InvalidRequest(format!(
        "value for {} must be three numbers \"x y z\", got '{}'",
        action, value
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("10 0 -20.5", Action::Move).unwrap(), [10.0, 0.0, -20.5]);
        assert_eq!(parse_vector("  1   2 3 ", Action::Move).unwrap(), [1.0, 2.0, 3.0]);

        for bad in ["", "1 2", "1 2 3 4", "a b c"] {
            let err = parse_vector(bad, Action::Rotate).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRequest, "{}", bad);
        }
    }

    #[test]
    fn test_require_rejects_empty() {
        assert_eq!(require("Tower_01", "name", Action::Rename).unwrap(), "Tower_01");
        let err = require("", "name", Action::Rename).unwrap_err();
        assert_eq!(err.to_string(), "name parameter required for rename");
    }
}
