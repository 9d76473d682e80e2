use wb_protocol::{ComponentSummary, Request, Response, ResponseData};

use super::{require, world_api};
use crate::action::Action;
use crate::error::{BridgeError, Result};
use crate::host::{ComponentHandle, EditorHost, EntityHandle, WorldEditorApi};
use crate::locator;
use crate::transaction::ActionTransaction;

fn summaries(api: &dyn WorldEditorApi, entity: EntityHandle) -> Vec<ComponentSummary> {
    (0..api.component_count(entity))
        .map(|index| ComponentSummary {
            index,
            class_name: api
                .component_at(entity, index)
                .map(|c| api.component_class_name(entity, c))
                .unwrap_or_else(|| "null".to_string()),
        })
        .collect()
}

fn components_data(api: &dyn WorldEditorApi, entity: EntityHandle) -> ResponseData {
    let components = summaries(api, entity);
    ResponseData::Components {
        count: components.len(),
        components,
    }
}

pub(super) fn list(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::ListComponents)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let data = components_data(api, entity);
    let count = api.component_count(entity);
    Ok(Response::ok(Action::ListComponents.as_str(), format!("Components listed: {}", count))
        .with_entity_name(name)
        .with_data(data))
}

pub(super) fn add(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::AddComponent)?;
    let class_name = require(&request.class_name, "className", Action::AddComponent)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let mut tx = ActionTransaction::open(api, "Add component via bridge")?;
    if tx.create_component(entity, class_name).is_none() {
        return Err(BridgeError::NativeRejected(format!(
            "CreateComponent returned null for class: {}",
            class_name
        )));
    }
    tx.close();

    Ok(Response::ok(Action::AddComponent.as_str(), format!("Component added: {}", class_name))
        .with_entity_name(name)
        .with_data(components_data(api, entity)))
}

/// An in-range index wins over a class name; otherwise the first component
/// of that class is removed
fn find_component(
    api: &dyn WorldEditorApi,
    entity: EntityHandle,
    index: Option<i64>,
    class_name: &str,
) -> Option<ComponentHandle> {
    let count = api.component_count(entity);

    if let Some(index) = index.filter(|&i| i >= 0 && (i as usize) < count) {
        return api.component_at(entity, index as usize);
    }
    if class_name.is_empty() {
        return None;
    }
    (0..count)
        .filter_map(|i| api.component_at(entity, i))
        .find(|&c| api.component_class_name(entity, c) == class_name)
}

pub(super) fn remove(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::RemoveComponent)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let component = find_component(api, entity, request.index, &request.class_name).ok_or_else(|| {
        BridgeError::NotFound("Component not found. Specify className or index.".to_string())
    })?;

    let mut tx = ActionTransaction::open(api, "Remove component via bridge")?;
    if !tx.delete_component(entity, component) {
        return Err(BridgeError::NativeRejected("DeleteComponent returned false".to_string()));
    }
    tx.close();

    Ok(Response::ok(Action::RemoveComponent.as_str(), "Component removed")
        .with_entity_name(name)
        .with_data(components_data(api, entity)))
}
