use wb_protocol::{Response, ResponseData};

use super::world_api;
use crate::action::Action;
use crate::error::Result;
use crate::host::EditorHost;

/// Step the editor's undo history; an empty history is an ok `Flag(false)`
pub(super) fn run(action: Action, host: &mut dyn EditorHost) -> Result<Response> {
    let api = world_api(host)?;

    let (done, ok_message, failed_message) = match action {
        Action::Redo => (api.redo(), "Redo executed", "Nothing to redo"),
        _ => (api.undo(), "Undo executed", "Nothing to undo"),
    };

    let message = if done { ok_message } else { failed_message };
    Ok(Response::ok(action.as_str(), message).with_data(ResponseData::Flag(done)))
}
