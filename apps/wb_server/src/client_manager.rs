use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};

/// Commands pushed to a connection task from outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Disconnect { message: String },
}

/// Registered bridge connection
#[derive(Debug)]
pub struct ClientHandle {
    pub connected_at: Instant,
    commands: mpsc::Sender<ClientCommand>,
}

/// Tracks active bridge connections
#[derive(Clone, Default)]
pub struct ClientManager {
    clients: Arc<RwLock<HashMap<SocketAddr, ClientHandle>>>,
}

impl ClientManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the receiver for its commands
    pub async fn register_client(&self, addr: SocketAddr) -> mpsc::Receiver<ClientCommand> {
        let (tx, rx) = mpsc::channel(4);
        let mut clients = self.clients.write().await;
        clients.insert(
            addr,
            ClientHandle {
                connected_at: Instant::now(),
                commands: tx,
            },
        );

        info!("Registered client {} - Total active: {}", addr, clients.len());
        rx
    }

    pub async fn unregister_client(&self, addr: &SocketAddr) {
        let mut clients = self.clients.write().await;
        if let Some(handle) = clients.remove(addr) {
            info!(
                "Unregistered client {} after {:.1}s - Total active: {}",
                addr,
                handle.connected_at.elapsed().as_secs_f32(),
                clients.len()
            );
        }
    }

    pub async fn get_total_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Ask every connection to send `message` as a Disconnect and close
    pub async fn disconnect_all(&self, message: &str) {
        let clients = self.clients.read().await;
        if clients.is_empty() {
            return;
        }

        info!("Disconnecting {} clients: {}", clients.len(), message);

        for (addr, handle) in clients.iter() {
            let command = ClientCommand::Disconnect {
                message: message.to_string(),
            };
            if handle.commands.send(command).await.is_err() {
                debug!("Client {} already gone", addr);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        let manager = ClientManager::new();
        let _rx1 = manager.register_client(addr(4001)).await;
        let _rx2 = manager.register_client(addr(4002)).await;
        assert_eq!(manager.get_total_count().await, 2);

        manager.unregister_client(&addr(4001)).await;
        manager.unregister_client(&addr(4001)).await;
        assert_eq!(manager.get_total_count().await, 1);
    }

    #[tokio::test]
    async fn test_disconnect_all_reaches_every_client() {
        let manager = ClientManager::new();
        let mut rx1 = manager.register_client(addr(4001)).await;
        let mut rx2 = manager.register_client(addr(4002)).await;

        manager.disconnect_all("Server shutting down").await;

        let expected = ClientCommand::Disconnect {
            message: "Server shutting down".to_string(),
        };
        assert_eq!(rx1.recv().await, Some(expected.clone()));
        assert_eq!(rx2.recv().await, Some(expected));
    }
}
