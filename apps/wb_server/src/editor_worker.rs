use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use wb_bridge::{Dispatcher, EditorHost};
use wb_protocol::{Request, Response};

/// A request waiting for the editor, with the channel its response goes back on
type Job = (Request, oneshot::Sender<Response>);

const QUEUE_DEPTH: usize = 64;

/// Cloneable handle for submitting requests to the editor worker
#[derive(Clone)]
pub struct EditorHandle {
    jobs: mpsc::Sender<Job>,
}

impl EditorHandle {
    /// Queue `request` and wait for its response
    ///
    /// Returns `None` once the worker has stopped.
    pub async fn execute(&self, request: Request) -> Option<Response> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.jobs.send((request, reply_tx)).await.ok()?;
        reply_rx.await.ok()
    }
}

/// Spawn the task that owns the editor
///
/// Every connection funnels into this single task, so requests run strictly
/// one at a time. The task ends when the last handle is dropped and gives the
/// host back.
pub fn spawn<H>(host: H) -> (EditorHandle, JoinHandle<H>)
where
    H: EditorHost + Send + 'static,
{
    let (jobs_tx, mut jobs_rx) = mpsc::channel::<Job>(QUEUE_DEPTH);

    let task = tokio::spawn(async move {
        let mut dispatcher = Dispatcher::new(host);
        info!("Editor worker started ({} mode)", dispatcher.host().mode());

        while let Some((request, reply)) = jobs_rx.recv().await {
            let response = dispatcher.dispatch(&request);
            if reply.send(response).is_err() {
                debug!("Requester for '{}' went away before the response", request.action);
            }
        }

        info!("Editor worker stopped");
        dispatcher.into_host()
    });

    (EditorHandle { jobs: jobs_tx }, task)
}
