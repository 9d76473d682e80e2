use wb_protocol::{Response, ResponseData};

use super::world_api;
use crate::action::Action;
use crate::error::Result;
use crate::host::EditorHost;

/// Clipboard calls report their boolean outcome in the payload; a `false`
/// from the editor is still an ok response
///
/// No [`ActionTransaction`](crate::ActionTransaction) here: the editor records
/// each clipboard edit as its own undo step.
pub(super) fn run(action: Action, host: &mut dyn EditorHost) -> Result<Response> {
    let api = world_api(host)?;

    let (done, ok_message, failed_message) = match action {
        Action::Copy => (
            api.copy_selected(),
            "Selected entities copied",
            "CopySelectedEntities returned false (nothing selected?)",
        ),
        Action::Cut => (
            api.cut_selected(),
            "Selected entities cut",
            "CutSelectedEntities returned false (nothing selected?)",
        ),
        Action::Paste => (
            api.paste(),
            "Entities pasted at original position",
            "PasteEntities returned false (nothing copied?)",
        ),
        Action::PasteAtCursor => (
            api.paste_at_cursor(),
            "Entities pasted at mouse cursor position",
            "PasteEntitiesAtMouseCursorPos returned false",
        ),
        Action::Duplicate => (
            api.duplicate_selected(),
            "Selected entities duplicated",
            "DuplicateSelectedEntities returned false (nothing selected?)",
        ),
        _ => (
            api.has_copied(),
            "Clipboard has copied entities",
            "Clipboard is empty",
        ),
    };

    let message = if done { ok_message } else { failed_message };
    Ok(Response::ok(action.as_str(), message).with_data(ResponseData::Flag(done)))
}
