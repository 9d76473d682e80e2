use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpStream;
use tokio::time::{Duration, timeout};
use tracing::{Level, debug, error};

use wb_log::init_logging_simple;
use wb_protocol::{BridgeMessage, BridgeStream, Request, Response};

/// Sends one request to a workbench bridge server and prints the response
#[derive(Parser, Debug)]
#[command(name = "wb_client")]
#[command(version = "0.1.0")]
#[command(about = "One-shot workbench bridge client", long_about = None)]
struct Args {
    /// Action to run, e.g. getState, setProperty, insertArrayItem
    action: String,

    /// Server host
    #[arg(long, env = "WB_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, env = "WB_PORT", default_value_t = 5775)]
    port: u16,

    /// Entity name
    #[arg(short, long, default_value = "")]
    name: String,

    /// Entity, array or component index
    #[arg(short, long, allow_hyphen_values = true)]
    index: Option<i64>,

    /// Dotted property path, e.g. "SCR_ScenarioFrameworkArea.m_aWaypoints[0]"
    #[arg(short, long, default_value = "")]
    path: String,

    /// Field name
    #[arg(short, long, default_value = "")]
    key: String,

    /// New value, as text
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    value: String,

    /// Class name for inserts, class changes and components
    #[arg(short = 'c', long, default_value = "")]
    class_name: String,

    /// Listing offset
    #[arg(long)]
    offset: Option<i64>,

    /// Listing page size
    #[arg(long)]
    limit: Option<i64>,

    /// Case-insensitive entity name filter
    #[arg(long, default_value = "")]
    filter: String,

    #[arg(long, allow_hyphen_values = true)]
    x: Option<f32>,

    #[arg(long, allow_hyphen_values = true)]
    z: Option<f32>,

    /// Localization item id
    #[arg(long, default_value = "")]
    item_id: String,

    /// Localization property name
    #[arg(long, default_value = "")]
    property: String,

    /// Position "x y z" of a created entity
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    position: String,

    /// Angles "x y z" of a created entity
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    rotation: String,

    /// Layer of a created entity
    #[arg(long)]
    layer_id: Option<i32>,

    /// Seconds to wait for the response
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Log protocol traffic
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn to_request(&self) -> Request {
        Request {
            id: 1,
            action: self.action.clone(),
            name: self.name.clone(),
            index: self.index,
            path: self.path.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
            class_name: self.class_name.clone(),
            offset: self.offset,
            limit: self.limit,
            name_filter: self.filter.clone(),
            x: self.x,
            z: self.z,
            item_id: self.item_id.clone(),
            property: self.property.clone(),
            position: self.position.clone(),
            rotation: self.rotation.clone(),
            layer_id: self.layer_id,
        }
    }
}

async fn run(args: &Args) -> Result<Response, String> {
    let addr = format!("{}:{}", args.host, args.port);
    let mut stream = TcpStream::connect(&addr)
        .await
        .map_err(|e| format!("Failed to connect to {}: {}", addr, e))?;

    match stream.read_message().await {
        Ok(BridgeMessage::Welcome { version }) => debug!("Connected to bridge v{}", version),
        Ok(other) => return Err(format!("Expected Welcome, got {:?}", other)),
        Err(e) => return Err(format!("Failed to read Welcome: {}", e)),
    }

    let request = args.to_request();
    debug!("Sending {:?}", request);
    stream
        .write_message(&BridgeMessage::Request(request))
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    let reply = timeout(Duration::from_secs(args.timeout), stream.read_message())
        .await
        .map_err(|_| format!("No response within {}s", args.timeout))?;

    match reply {
        Ok(BridgeMessage::Response(response)) => Ok(response),
        Ok(BridgeMessage::Error { message }) => Err(format!("Server error: {}", message)),
        Ok(BridgeMessage::Disconnect { message }) => Err(format!("Disconnected: {}", message)),
        Ok(other) => Err(format!("Unexpected message: {:?}", other)),
        Err(e) => Err(format!("Failed to read response: {}", e)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    if let Err(e) = init_logging_simple("wb_client::", level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let response = match run(&args).await {
        Ok(response) => response,
        Err(message) => {
            error!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to format response: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if response.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_map_to_request() {
        let args = Args::parse_from([
            "wb_client",
            "insertArrayItem",
            "--name",
            "Tower_01",
            "--path",
            "SCR_ScenarioFrameworkArea",
            "--key",
            "m_aWaypoints",
            "-c",
            "SCR_Waypoint",
            "--index",
            "-1",
        ]);

        let request = args.to_request();
        assert_eq!(request.action, "insertArrayItem");
        assert_eq!(request.name, "Tower_01");
        assert_eq!(request.class_name, "SCR_Waypoint");
        assert_eq!(request.index, Some(-1));
        assert_eq!(request.x, None);
    }

    #[test]
    fn test_create_entity_arguments() {
        let args = Args::parse_from([
            "wb_client",
            "createEntity",
            "-c",
            "{A1B2}Prefabs/Crate.et",
            "--position",
            "-4 0 12",
            "--layer-id",
            "2",
        ]);

        let request = args.to_request();
        assert_eq!(request.position, "-4 0 12");
        assert!(request.rotation.is_empty());
        assert_eq!(request.layer_id, Some(2));
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["wb_client", "ping"]);
        assert_eq!(args.port, 5775);
        assert_eq!(args.host, "127.0.0.1");
        assert!(args.to_request().path.is_empty());
    }
}
