use wb_protocol::{EditorMode, EditorState, Response, ResponseData};

use crate::action::Action;
use crate::error::Result;
use crate::host::EditorHost;

/// Most selected names reported by `getState`
const MAX_SELECTED_NAMES: usize = 50;

/// Liveness check, ok in every mode
pub(super) fn ping(host: &mut dyn EditorHost) -> Result<Response> {
    let mode = host.mode();
    let message = match mode {
        EditorMode::NoWorldEditor => "Workbench bridge active (no WorldEditor module)",
        EditorMode::Game => "Workbench bridge active (game mode)",
        EditorMode::Edit => "Workbench bridge active",
    };

    Ok(Response::ok(Action::Ping.as_str(), message).with_data(ResponseData::State(EditorState {
        mode,
        ..EditorState::default()
    })))
}

/// Editor snapshot: mode, counts, selection and terrain bounds
pub(super) fn get_state(host: &mut dyn EditorHost) -> Result<Response> {
    let mode = host.mode();
    let mut state = EditorState {
        mode,
        ..EditorState::default()
    };

    if mode == EditorMode::NoWorldEditor {
        return Ok(Response::ok(Action::GetState.as_str(), "WorldEditor module not loaded")
            .with_data(ResponseData::State(state)));
    }

    if let Some((min, max)) = host.terrain_bounds() {
        state.bounds_min = Some(min);
        state.bounds_max = Some(max);
    }

    let Some(api) = host.world_api() else {
        return Ok(
            Response::ok(Action::GetState.as_str(), "In game mode (WorldEditorAPI not available)")
                .with_data(ResponseData::State(state)),
        );
    };

    let entity_count = api.entity_count();
    let selected_count = api.selected_count();
    state.entity_count = Some(entity_count);
    state.selected_count = Some(selected_count);
    state.selected_names = (0..selected_count.min(MAX_SELECTED_NAMES))
        .map(|i| api.selected_entity(i).map(|e| api.entity_name(e)).unwrap_or_default())
        .collect();

    let message = format!(
        "State snapshot: {} entities, {} selected",
        entity_count, selected_count
    );
    Ok(Response::ok(Action::GetState.as_str(), message).with_data(ResponseData::State(state)))
}
