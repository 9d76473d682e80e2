use std::collections::BTreeMap;

use wb_protocol::{LayerSummary, Request, Response, ResponseData};

use super::{require, world_api};
use crate::action::Action;
use crate::error::Result;
use crate::host::EditorHost;
use crate::locator;

/// Layers in use, by ascending id, with their entity counts
pub(super) fn list(host: &mut dyn EditorHost) -> Result<Response> {
    let api = world_api(host)?;
    let entity_count = api.entity_count();

    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for entity in (0..entity_count).filter_map(|i| api.entity_at(i)) {
        *counts.entry(api.entity_layer_id(entity)).or_default() += 1;
    }

    let layers: Vec<LayerSummary> = counts
        .into_iter()
        .map(|(layer_id, entity_count)| LayerSummary { layer_id, entity_count })
        .collect();
    let message = format!("Found {} layers across {} entities", layers.len(), entity_count);
    Ok(Response::ok(Action::ListLayers.as_str(), message).with_data(ResponseData::Layers(layers)))
}

pub(super) fn entity_layer(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let name = require(&request.name, "name", Action::GetEntityLayer)?;
    let api = world_api(host)?;
    let entity = locator::find_required(api, name)?;
    let layer_id = api.entity_layer_id(entity);

    Ok(
        Response::ok(Action::GetEntityLayer.as_str(), format!("Entity '{}' is on layer {}", name, layer_id))
            .with_entity_name(name)
            .with_data(ResponseData::Layer { layer_id }),
    )
}
