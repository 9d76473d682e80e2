pub mod error;
pub mod message;
pub mod request;
pub mod response;
pub mod stream;

pub use error::{ProtocolError, Result};
pub use message::BridgeMessage;
pub use request::Request;
pub use response::{
    ArrayItem, ComponentSummary, EditorMode, EditorState, EntityDetails, EntityPage,
    EntitySummary, LayerSummary, PropertyEntry, Response, ResponseData, Status,
};
pub use stream::{BridgeStream, DEFAULT_MAX_MESSAGE_SIZE};
