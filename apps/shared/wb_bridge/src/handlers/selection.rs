use wb_protocol::{EntitySummary, Request, Response, ResponseData};

use super::{require, world_api};
use crate::action::Action;
use crate::error::Result;
use crate::host::{EditorHost, WorldEditorApi};
use crate::locator;

/// Most entities reported by `getSelected`
const MAX_SELECTED: usize = 100;

/// Add one entity to the selection
pub(super) fn select(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::SelectEntity)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let message = if api.add_to_selection(entity) {
        format!("Entity selected: {}", name)
    } else {
        format!("Entity already selected: {}", name)
    };
    Ok(Response::ok(Action::SelectEntity.as_str(), message)
        .with_entity_name(name)
        .with_data(selection(api)))
}

pub(super) fn deselect(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::DeselectEntity)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let message = if api.remove_from_selection(entity) {
        format!("Entity deselected: {}", name)
    } else {
        format!("Entity was not selected: {}", name)
    };
    Ok(Response::ok(Action::DeselectEntity.as_str(), message)
        .with_entity_name(name)
        .with_data(selection(api)))
}

pub(super) fn clear(host: &mut dyn EditorHost) -> Result<Response> {
    let api = world_api(host)?;
    api.clear_selection();
    Ok(Response::ok(Action::ClearSelection.as_str(), "Selection cleared").with_data(selection(api)))
}

pub(super) fn get(host: &mut dyn EditorHost) -> Result<Response> {
    let api = world_api(host)?;
    let data = selection(api);
    let count = api.selected_count();
    Ok(Response::ok(Action::GetSelected.as_str(), format!("Selected entities: {}", count)).with_data(data))
}

fn selection(api: &dyn WorldEditorApi) -> ResponseData {
    let selected_count = api.selected_count();
    let entities = (0..selected_count.min(MAX_SELECTED))
        .filter_map(|i| api.selected_entity(i))
        .map(|entity| EntitySummary {
            name: api.entity_name(entity),
            class_name: api.entity_class_name(entity),
            position: api.entity_origin(entity),
        })
        .collect();
    ResponseData::Selection {
        selected_count,
        entities,
    }
}
