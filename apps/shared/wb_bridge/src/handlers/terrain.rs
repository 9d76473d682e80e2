use wb_protocol::{EditorMode, Request, Response, ResponseData};

use super::world_api;
use crate::action::Action;
use crate::error::{BridgeError, Result};
use crate::host::EditorHost;

pub(super) fn height(host: &mut dyn EditorHost, request: &Request) -> Result<Response> {
    let (Some(x), Some(z)) = (request.x, request.z) else {
        return Err(BridgeError::missing("x and z", Action::GetTerrainHeight.as_str()));
    };
    let api = world_api(host)?;

    let y = api.terrain_surface_y(x, z);
    Ok(Response::ok(
        Action::GetTerrainHeight.as_str(),
        format!("Terrain height at ({}, {}): {}", x, z, y),
    )
    .with_data(ResponseData::TerrainHeight(y)))
}

/// Bounds are readable in game mode too
pub(super) fn bounds(host: &mut dyn EditorHost) -> Result<Response> {
    let mode = host.mode();
    if mode == EditorMode::NoWorldEditor {
        return Err(BridgeError::world_unavailable(mode));
    }

    let (min, max) = host.terrain_bounds().ok_or_else(|| {
        BridgeError::NativeRejected("GetTerrainBounds returned false (no terrain loaded?)".to_string())
    })?;

    Ok(Response::ok(Action::GetTerrainBounds.as_str(), "Terrain bounds retrieved")
        .with_data(ResponseData::TerrainBounds { min, max }))
}
