//! The property mutation family
//!
//! Every handler here runs locate, resolve and read checks against the live
//! scene before opening its transaction.

use wb_protocol::{Request, Response, ResponseData};

use super::{require, world_api};
use crate::action::Action;
use crate::array;
use crate::class;
use crate::error::{BridgeError, Result};
use crate::host::{EditorHost, EntityHandle, WorldEditorApi};
use crate::locator;
use crate::path::{self, ResolvedTarget};
use crate::property;
use crate::transaction::ActionTransaction;

/// Located entity and resolved target of a request
fn target(api: &dyn WorldEditorApi, name: &str, path: &str) -> Result<(EntityHandle, ResolvedTarget)> {
    let entity = locator::find_required(api, name)?;
    let resolved = path::resolve(api, entity, path)?;
    Ok((entity, resolved))
}

pub(super) fn get(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::GetProperty)?;
    let key = require(&request.key, "key", Action::GetProperty)?;
    let api = world_api(host)?;
    let (_, resolved) = target(api, name, &request.path)?;

    let value = property::get(api, &resolved, key)?;
    Ok(Response::ok(Action::GetProperty.as_str(), format!("Property '{}' is '{}'", key, value))
        .with_entity_name(name)
        .with_data(ResponseData::Value {
            key: key.to_string(),
            value,
        }))
}

pub(super) fn list(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::ListProperties)?;
    let api = world_api(host)?;
    let (_, resolved) = target(api, name, &request.path)?;

    let fields = property::list(api, &resolved)?;
    let message = format!("{} properties on {}", fields.len(), resolved.describe(api));
    Ok(Response::ok(Action::ListProperties.as_str(), message)
        .with_entity_name(name)
        .with_data(ResponseData::Fields(fields)))
}

pub(super) fn set(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::SetProperty)?;
    let key = require(&request.key, "key", Action::SetProperty)?;
    let api = world_api(host)?;
    let (_, resolved) = target(api, name, &request.path)?;

    let mut tx = ActionTransaction::open(api, "Set property via bridge")?;
    property::set(&mut tx, &resolved, key, &request.value)?;
    tx.close();

    Ok(Response::ok(
        Action::SetProperty.as_str(),
        format!("Property '{}' set to '{}'", key, request.value),
    )
    .with_entity_name(name)
    .with_data(ResponseData::Value {
        key: key.to_string(),
        value: request.value.clone(),
    }))
}

pub(super) fn clear(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::ClearProperty)?;
    let key = require(&request.key, "key", Action::ClearProperty)?;
    let api = world_api(host)?;
    let (_, resolved) = target(api, name, &request.path)?;

    let mut tx = ActionTransaction::open(api, "Clear property via bridge")?;
    property::clear(&mut tx, &resolved, key)?;
    tx.close();

    Ok(Response::ok(Action::ClearProperty.as_str(), format!("Property '{}' cleared", key)).with_entity_name(name))
}

pub(super) fn list_items(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::ListArrayItems)?;
    let key = require(&request.key, "key", Action::ListArrayItems)?;
    let api = world_api(host)?;
    let (_, resolved) = target(api, name, &request.path)?;

    let items = array::list_items(api, &resolved, key);
    Ok(Response::ok(Action::ListArrayItems.as_str(), format!("{} items in '{}'", items.len(), key))
        .with_entity_name(name)
        .with_data(ResponseData::ArrayItems(items)))
}

pub(super) fn insert_item(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::InsertArrayItem)?;
    let key = require(&request.key, "key", Action::InsertArrayItem)?;
    let class_name = require(&request.class_name, "className", Action::InsertArrayItem)?;
    let api = world_api(host)?;
    let (_, resolved) = target(api, name, &request.path)?;

    let len = array::items(api, &resolved, key)?.len();
    array::insert_position(len, key, request.index)?;

    let mut tx = ActionTransaction::open(api, "Insert array item via bridge")?;
    let index = array::insert(&mut tx, &resolved, key, class_name, request.index)?;
    tx.close();

    Ok(Response::ok(
        Action::InsertArrayItem.as_str(),
        format!("Inserted '{}' into '{}' at {}", class_name, key, index),
    )
    .with_entity_name(name)
    .with_data(ResponseData::Inserted { index }))
}

pub(super) fn remove_item(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::RemoveArrayItem)?;
    let key = require(&request.key, "key", Action::RemoveArrayItem)?;
    let index = match request.index {
        Some(index) if index >= 0 => index as usize,
        _ => return Err(BridgeError::missing("index (>= 0)", Action::RemoveArrayItem.as_str())),
    };
    let api = world_api(host)?;
    let (_, resolved) = target(api, name, &request.path)?;

    array::check_index(array::items(api, &resolved, key)?.len(), key, index)?;

    let mut tx = ActionTransaction::open(api, "Remove array item via bridge")?;
    array::remove_at(&mut tx, &resolved, key, index)?;
    tx.close();

    Ok(Response::ok(Action::RemoveArrayItem.as_str(), format!("Removed item {} from '{}'", index, key))
        .with_entity_name(name))
}

/// `path` selects the container, `key` the field whose object is reclassified
pub(super) fn change_class(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::ChangeClass)?;
    let field = require(&request.key, "key", Action::ChangeClass)?;
    let class_name = require(&request.class_name, "className", Action::ChangeClass)?;
    class::field_path(&request.path, field)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;

    let mut tx = ActionTransaction::open(api, "Change class via bridge")?;
    class::change_class(&mut tx, entity, &request.path, field, class_name)?;
    tx.close();

    Ok(Response::ok(
        Action::ChangeClass.as_str(),
        format!("Class of '{}' changed to '{}'", field, class_name),
    )
    .with_entity_name(name))
}
