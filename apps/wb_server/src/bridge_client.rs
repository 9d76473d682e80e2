use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use wb_protocol::{BridgeMessage, BridgeStream, ProtocolError, Response};

use crate::VERSION;
use crate::client_manager::{ClientCommand, ClientManager};
use crate::editor_worker::EditorHandle;

/// One bridge connection
///
/// Sends Welcome, then answers each Request with exactly one Response until
/// the peer hangs up or the server asks it to disconnect.
pub struct BridgeClient {
    stream: TcpStream,
    addr: SocketAddr,
    max_message_size: usize,
    client_manager: ClientManager,
    editor: EditorHandle,
}

impl BridgeClient {
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        max_message_size: usize,
        client_manager: ClientManager,
        editor: EditorHandle,
    ) -> Self {
        debug!("New client connected from {}", addr);
        Self {
            stream,
            addr,
            max_message_size,
            client_manager,
            editor,
        }
    }

    pub async fn handle(mut self) {
        let addr = self.addr;
        let client_manager = self.client_manager.clone();
        let mut commands = client_manager.register_client(addr).await;

        let welcome = BridgeMessage::Welcome {
            version: VERSION.to_string(),
        };
        if let Err(e) = self.send(&welcome).await {
            error!("Failed to send Welcome to {}: {}", addr, e);
            client_manager.unregister_client(&addr).await;
            return;
        }

        self.serve(&mut commands).await;

        client_manager.unregister_client(&addr).await;
        info!("Client {} disconnected", addr);
    }

    async fn serve(&mut self, commands: &mut mpsc::Receiver<ClientCommand>) {
        loop {
            tokio::select! {
                command = commands.recv() => {
                    if let Some(ClientCommand::Disconnect { message }) = command {
                        let _ = self.send(&BridgeMessage::Disconnect { message }).await;
                    }
                    return;
                }

                message = self.stream.read_message_with_max_size(self.max_message_size) => {
                    match message {
                        Ok(BridgeMessage::Request(request)) => {
                            let action = request.action.clone();
                            let id = request.id;
                            let response = match self.editor.execute(request).await {
                                Some(response) => response,
                                None => Response::error(action, "Editor worker not running").with_id(id),
                            };
                            if let Err(e) = self.send(&BridgeMessage::Response(response)).await {
                                warn!("Failed to send response to {}: {}", self.addr, e);
                                return;
                            }
                        }
                        Ok(other) => {
                            let e = ProtocolError::UnexpectedMessage("Request");
                            warn!("{} from {}: {:?}", e, self.addr, other);
                            let _ = self
                                .send(&BridgeMessage::Error {
                                    message: e.to_string(),
                                })
                                .await;
                            return;
                        }
                        Err(ProtocolError::ConnectionClosed) => return,
                        Err(e) => {
                            warn!("Error reading from {}: {}", self.addr, e);
                            let _ = self
                                .send(&BridgeMessage::Error {
                                    message: e.to_string(),
                                })
                                .await;
                            return;
                        }
                    }
                }
            }
        }
    }

    async fn send(&mut self, message: &BridgeMessage) -> wb_protocol::Result<()> {
        self.stream
            .write_message_with_max_size(message, self.max_message_size)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor_worker;
    use tokio::net::TcpListener;
    use wb_bridge::MemoryEditor;
    use wb_protocol::{DEFAULT_MAX_MESSAGE_SIZE, Request, Status};

    async fn start_server(manager: ClientManager) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (editor, _task) = editor_worker::spawn(MemoryEditor::new());

        tokio::spawn(async move {
            while let Ok((stream, peer)) = listener.accept().await {
                let client = BridgeClient::new(stream, peer, DEFAULT_MAX_MESSAGE_SIZE, manager.clone(), editor.clone());
                tokio::spawn(client.handle());
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_welcome_then_request_response() {
        let addr = start_server(ClientManager::new()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        let welcome = stream.read_message().await.unwrap();
        assert_eq!(
            welcome,
            BridgeMessage::Welcome {
                version: VERSION.to_string()
            }
        );

        for id in [10, 11] {
            stream
                .write_message(&BridgeMessage::Request(Request::new("ping").with_id(id)))
                .await
                .unwrap();
            let BridgeMessage::Response(response) = stream.read_message().await.unwrap() else {
                panic!("expected a response");
            };
            assert_eq!(response.status, Status::Ok);
            assert_eq!(response.id, id);
        }
    }

    #[tokio::test]
    async fn test_unexpected_message_closes_connection() {
        let addr = start_server(ClientManager::new()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.read_message().await.unwrap();

        stream
            .write_message(&BridgeMessage::Welcome {
                version: "0".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            stream.read_message().await.unwrap(),
            BridgeMessage::Error {
                message: "Unexpected message: expected Request".to_string()
            }
        );
        assert!(matches!(stream.read_message().await, Err(ProtocolError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_server_shutdown_sends_disconnect() {
        let manager = ClientManager::new();
        let addr = start_server(manager.clone()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.read_message().await.unwrap();

        while manager.get_total_count().await == 0 {
            tokio::task::yield_now().await;
        }
        manager.disconnect_all("bye").await;

        assert_eq!(
            stream.read_message().await.unwrap(),
            BridgeMessage::Disconnect {
                message: "bye".to_string()
            }
        );
    }
}
