use tracing::{debug, info, warn};
use wb_protocol::{Request, Response};

use crate::action::Action;
use crate::handlers;
use crate::host::EditorHost;

/// Routes requests to their handler against one editor host
///
/// The dispatcher owns the host for its whole life, so requests are served
/// strictly one after the other and every request yields exactly one response.
pub struct Dispatcher<H: EditorHost> {
    host: H,
}

impl<H: EditorHost> Dispatcher<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Serve one request
    pub fn dispatch(&mut self, request: &Request) -> Response {
        let action = match request.action.parse::<Action>() {
            Ok(action) => action,
            Err(e) => {
                warn!(action = request.action.as_str(), request_id = request.id, "{}", e);
                return Response::error(request.action.as_str(), e.to_string()).with_id(request.id);
            }
        };

        if action.is_mutating() {
            info!(action = action.as_str(), request_id = request.id, "Dispatching");
        } else {
            debug!(action = action.as_str(), request_id = request.id, "Dispatching");
        }

        match handlers::handle(action, &mut self.host, request) {
            Ok(response) => {
                debug!(action = action.as_str(), request_id = request.id, "{}", response.message);
                response.with_id(request.id)
            }
            Err(e) => {
                warn!(
                    action = action.as_str(),
                    request_id = request.id,
                    "Request failed ({:?}): {}",
                    e.kind(),
                    e
                );
                Response::error(action.as_str(), e.to_string()).with_id(request.id)
            }
        }
    }
}
