use serde::{Deserialize, Serialize};

use crate::request::Request;
use crate::response::Response;

/// Messages exchanged between a bridge client and the bridge server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BridgeMessage {
    // Server -> Client messages
    /// Sent once right after the connection is accepted
    Welcome {
        /// Server version string
        version: String,
    },

    /// Answer to exactly one `Request`
    Response(Response),

    /// Protocol-level failure (the connection is closed afterwards)
    Error {
        message: String,
    },

    /// Graceful disconnection, e.g. on server shutdown
    Disconnect {
        message: String,
    },

    // Client -> Server messages
    /// An action to execute against the editor
    Request(Request),
}

impl BridgeMessage {
    /// Serialize message to bytes using bincode
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize message from bytes using bincode
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}
