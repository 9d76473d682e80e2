use wb_protocol::{ComponentSummary, EntityDetails, PropertyEntry, Request, Response, ResponseData};

use super::{parse_vector, require, world_api};
use crate::action::Action;
use crate::error::{BridgeError, Result};
use crate::host::{ContainerRef, EditorHost, EntityHandle, WorldEditorApi};
use crate::locator;
use crate::transaction::ActionTransaction;

/// Most entity variables returned by `getEntity`
const MAX_DETAIL_VARS: usize = 50;

pub(super) fn list(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let api = world_api(host)?;
    let page = locator::list(api, &request.name_filter, request.offset, request.limit);

    let message = format!("Listed {} of {} entities", page.returned_count, page.total_count);
    Ok(Response::ok(Action::ListEntities.as_str(), message).with_data(ResponseData::Entities(page)))
}

pub(super) fn get(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let api = world_api(host)?;
    let entity = locator::locate(api, &request.name, request.index)?;
    let details = details(api, entity);

    Ok(Response::ok(Action::GetEntity.as_str(), "Entity details retrieved")
        .with_entity_name(details.name.clone())
        .with_data(ResponseData::Entity(details)))
}

fn details(api: &dyn WorldEditorApi, entity: EntityHandle) -> EntityDetails {
    let container = ContainerRef::Entity(entity);
    let names = api.variable_names(container, &[]).unwrap_or_default();

    let properties = names
        .iter()
        .take(MAX_DETAIL_VARS)
        .map(|name| PropertyEntry {
            name: name.clone(),
            value: api.get_variable(container, &[], name).unwrap_or_default(),
        })
        .collect();

    let components = (0..api.component_count(entity))
        .map(|index| ComponentSummary {
            index,
            class_name: api
                .component_at(entity, index)
                .map(|c| api.component_class_name(entity, c))
                .unwrap_or_else(|| "null".to_string()),
        })
        .collect();

    EntityDetails {
        name: api.entity_name(entity),
        class_name: api.entity_class_name(entity),
        position: api.entity_origin(entity),
        rotation: api.entity_angles(entity),
        layer_id: api.entity_layer_id(entity),
        var_count: names.len(),
        properties,
        components,
    }
}

/// Set the entity's `coords` variable
pub(super) fn move_to(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::Move)?;
    let position = parse_vector(&request.value, Action::Move)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let coords = format!("{} {} {}", position[0], position[1], position[2]);
    let mut tx = ActionTransaction::open(api, "Move entity via bridge")?;
    set_entity_variable(&mut tx, entity, "coords", &coords)?;
    tx.close();

    Ok(Response::ok(Action::Move.as_str(), format!("Entity moved to {}", coords)).with_entity_name(name))
}

/// Set the entity's `angleX`, `angleY` and `angleZ` variables in one action
pub(super) fn rotate(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::Rotate)?;
    let angles = parse_vector(&request.value, Action::Rotate)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let mut tx = ActionTransaction::open(api, "Rotate entity via bridge")?;
    for (key, angle) in ["angleX", "angleY", "angleZ"].into_iter().zip(angles) {
        set_entity_variable(&mut tx, entity, key, &angle.to_string())?;
    }
    tx.close();

    let message = format!("Entity rotated to {} {} {}", angles[0], angles[1], angles[2]);
    Ok(Response::ok(Action::Rotate.as_str(), message).with_entity_name(name))
}

fn set_entity_variable(tx: &mut ActionTransaction<'_>, entity: EntityHandle, key: &str, value: &str) -> Result<()> {
    if tx.set_variable(ContainerRef::Entity(entity), &[], key, value) {
        Ok(())
    } else {
        Err(BridgeError::NativeRejected(format!(
            "SetVariableValue returned false for key: {}",
            key
        )))
    }
}

pub(super) fn rename(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::Rename)?;
    let new_name = require(&request.value, "value", Action::Rename)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let mut tx = ActionTransaction::open(api, "Rename entity via bridge")?;
    if !tx.rename_entity(entity, new_name) {
        return Err(BridgeError::NativeRejected("RenameEntity returned false".to_string()));
    }
    tx.close();

    Ok(Response::ok(Action::Rename.as_str(), format!("Entity renamed to: {}", new_name)).with_entity_name(name))
}

/// New entity of a class or prefab, named, placed and rotated in one action
pub(super) fn create(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let class_name = require(&request.class_name, "className", Action::CreateEntity)?;
    let position = transform_part(&request.position, "position")?;
    let angles = transform_part(&request.rotation, "rotation")?;
    let layer_id = request.layer_id.filter(|&id| id >= 0).unwrap_or(0);
    let api = world_api(host)?;

    let mut tx = ActionTransaction::open(api, "Create entity via bridge")?;
    let Some(entity) = tx.create_entity(class_name, &request.name, layer_id, position, angles) else {
        return Err(BridgeError::NativeRejected(format!(
            "CreateEntity returned null. Check class or prefab: {}",
            class_name
        )));
    };
    let renamed = request.name.is_empty()
        || tx.entity_name(entity) == request.name
        || tx.rename_entity(entity, &request.name);
    if !renamed {
        return Err(BridgeError::NativeRejected("RenameEntity returned false".to_string()));
    }
    let details = details(&*tx, entity);
    tx.close();

    Ok(
        Response::ok(Action::CreateEntity.as_str(), format!("Entity created: {} ({})", details.name, class_name))
            .with_entity_name(details.name.clone())
            .with_data(ResponseData::Entity(details)),
    )
}

/// Optional "x y z" transform part, zero when not supplied
fn transform_part(text: &str, param: &str) -> Result<[f32; 3]> {
    if text.trim().is_empty() {
        return Ok([0.0; 3]);
    }
    parse_vector(text, Action::CreateEntity).map_err(|_| {
        BridgeError::InvalidRequest(format!(
            "{} for createEntity must be three numbers \"x y z\", got '{}'",
            param, text
        ))
    })
}

pub(super) fn delete(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::DeleteEntity)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let mut tx = ActionTransaction::open(api, "Delete entity via bridge")?;
    if !tx.delete_entity(entity) {
        return Err(BridgeError::NativeRejected(format!(
            "DeleteEntity returned false for: {}",
            name
        )));
    }
    tx.close();

    Ok(Response::ok(Action::DeleteEntity.as_str(), format!("Entity deleted: {}", name)).with_entity_name(name))
}
