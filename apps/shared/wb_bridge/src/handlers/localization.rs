use wb_protocol::{Request, Response, ResponseData};

use super::require;
use crate::action::Action;
use crate::error::{BridgeError, Result};
use crate::host::{EditorHost, LocalizationEditorApi};

fn editor(host: &mut dyn EditorHost) -> Result<&mut dyn LocalizationEditorApi> {
    host.localization()
        .ok_or_else(|| BridgeError::Unavailable("LocalizationEditor module not available".to_string()))
}

pub(super) fn insert(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let item_id = require(&request.item_id, "itemId", Action::InsertLocItem)?;
    let loc = editor(host)?;

    loc.begin_modify("Insert item via bridge");
    let inserted = loc.insert_item(item_id);
    loc.end_modify();

    if !inserted {
        return Err(BridgeError::NativeRejected(format!(
            "InsertItem returned null for: {}",
            item_id
        )));
    }
    Ok(Response::ok(
        Action::InsertLocItem.as_str(),
        format!("Localization item inserted: {}", item_id),
    ))
}

pub(super) fn delete(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let item_id = require(&request.item_id, "itemId", Action::DeleteLocItem)?;
    let loc = editor(host)?;

    loc.begin_modify("Delete item via bridge");
    loc.delete_item(item_id);
    loc.end_modify();

    Ok(Response::ok(
        Action::DeleteLocItem.as_str(),
        format!("Localization item deleted: {}", item_id),
    ))
}

pub(super) fn modify(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    if request.item_id.is_empty() || request.property.is_empty() {
        return Err(BridgeError::missing("itemId and property", Action::ModifyLocItem.as_str()));
    }
    let loc = editor(host)?;

    if loc.table_item_count().is_none() {
        return Err(BridgeError::Unavailable("Could not get string table".to_string()));
    }
    let item = loc.find_item(&request.item_id).ok_or_else(|| {
        BridgeError::NotFound(format!("Localization item not found: {}", request.item_id))
    })?;
    let property = loc
        .property_index(item, &request.property)
        .ok_or_else(|| BridgeError::NotFound(format!("Property not found: {}", request.property)))?;

    loc.begin_modify("Modify property via bridge");
    loc.modify_property(item, property, &request.value);
    loc.end_modify();

    Ok(Response::ok(
        Action::ModifyLocItem.as_str(),
        format!(
            "Property '{}' set to '{}' on item: {}",
            request.property, request.value, request.item_id
        ),
    ))
}

pub(super) fn table(host: &mut dyn EditorHost) -> Result<Response> {
    let loc = editor(host)?;
    let item_count = loc.table_item_count().ok_or_else(|| {
        BridgeError::Unavailable("Could not get string table (no localization file loaded?)".to_string())
    })?;

    Ok(
        Response::ok(Action::GetLocTable.as_str(), format!("String table has {} items", item_count))
            .with_data(ResponseData::LocalizationTable { item_count }),
    )
}
