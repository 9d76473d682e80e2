use std::env;
use std::path::Path;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use wb_bridge::MemoryEditor;
use wb_log::{LogConfig, init_logging, parse_level};

mod config;
use config::{Config, Validatable};

mod bridge_client;
use bridge_client::BridgeClient;

mod client_manager;
use client_manager::ClientManager;

mod editor_worker;

const VERSION: &str = "0.1.0";

/// Default config path: `<executable stem>.json` next to the executable
fn default_config_path() -> String {
    env::current_exe()
        .ok()
        .and_then(|exe_path| {
            let stem = exe_path.file_stem()?;
            let parent = exe_path.parent()?;
            Some(parent.join(stem).with_extension("json"))
        })
        .and_then(|path| path.to_str().map(|s| s.to_string()))
        .unwrap_or_else(|| "./wb_server.json".to_string())
}

/// Workbench bridge server
#[derive(Parser, Debug)]
#[command(name = "wb_server")]
#[command(version = VERSION)]
#[command(about = "Serves editor property-path requests over TCP", long_about = None)]
struct Args {
    /// Path to configuration file (JSON); defaults are used when it does not exist
    #[arg(short, long, default_value_t = default_config_path())]
    config: String,

    /// Scene document to load instead of the configured scene_path
    #[arg(long, env = "WB_SCENE")]
    scene: Option<String>,

    /// Also log to wb_server.log in the current directory
    #[arg(long, env = "WB_LOG_FILE")]
    log_file: bool,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    print_schema: bool,
}

fn load_config(path: &str) -> Result<Config, config::ConfigError> {
    if Path::new(path).exists() {
        Config::from_json_file(path)
    } else {
        Ok(Config::default())
    }
}

fn load_editor(config: &Config, scene: Option<&str>) -> Result<MemoryEditor, wb_bridge::SceneError> {
    let editor = match scene.or(config.scene_path.as_deref()) {
        Some(path) => {
            info!("Loading scene {}", path);
            MemoryEditor::from_json_file(path)?
        }
        None => {
            info!("No scene configured, starting with an empty world");
            MemoryEditor::new()
        }
    };
    Ok(editor.with_mode(config.editor_mode.into()))
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!("Error setting up SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await;
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.print_schema {
        match Config::schema_json() {
            Ok(schema) => println!("{}", schema),
            Err(e) => {
                eprintln!("Failed to generate schema: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Logging needs the configured level, so config errors go to stderr
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from '{}': {}", args.config, e);
            std::process::exit(1);
        }
    };

    let log_level = parse_level(&config.log_level).unwrap_or_else(|| {
        eprintln!("Warning: Invalid log level '{}', using INFO", config.log_level);
        tracing::Level::INFO
    });

    let log_result = if args.log_file {
        let file = tracing_appender::rolling::never(".", "wb_server.log");
        init_logging(LogConfig::new("wb_server::").with_level(log_level).with_log_file(file))
    } else {
        init_logging(LogConfig::<std::fs::File>::new("wb_server::").with_level(log_level))
    };
    if let Err(e) = log_result {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("{} v{}", config.name, VERSION);
    info!("Configuration: {}", args.config);

    debug!("Settings:");
    debug!("  Local IP: {}", config.local_ip);
    debug!("  Local Port: {}", config.local_port);
    debug!("  Log Level: {}", config.log_level);
    debug!("  Max Message Size: {}", config.max_message_size);
    debug!("  Editor Mode: {:?}", config.editor_mode);

    let editor = match load_editor(&config, args.scene.as_deref()) {
        Ok(editor) => editor,
        Err(e) => {
            error!("Failed to load scene: {}", e);
            std::process::exit(1);
        }
    };

    let (editor, editor_task) = editor_worker::spawn(editor);

    let bind_addr = format!("{}:{}", config.local_ip, config.local_port);
    info!("Binding TCP on {}...", bind_addr);

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind TCP listener on {}: {}", bind_addr, e);
            std::process::exit(1);
        }
    };

    info!("Waiting for bridge requests...(Use Ctrl+C to shutdown)");

    let client_manager = ClientManager::new();
    let max_message_size = config.max_message_size.as_bytes();

    let terminate = wait_for_sigterm();
    tokio::pin!(terminate);

    loop {
        tokio::select! {
            biased;

            _ = signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C)");
                break;
            }

            _ = &mut terminate => {
                info!("Received SIGTERM signal");
                break;
            }

            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        info!("Accepted connection from {}", addr);
                        let client = BridgeClient::new(
                            stream,
                            addr,
                            max_message_size,
                            client_manager.clone(),
                            editor.clone(),
                        );
                        tokio::spawn(client.handle());
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                }
            }
        }
    }

    info!(
        "Shutting down server gracefully ({} clients connected)...",
        client_manager.get_total_count().await
    );
    client_manager.disconnect_all("Server shutting down").await;

    // Give clients time to receive the Disconnect and release their editor handles
    tokio::time::sleep(Duration::from_millis(500)).await;

    drop(editor);
    if tokio::time::timeout(Duration::from_secs(2), editor_task).await.is_err() {
        warn!("Editor worker still busy, exiting anyway");
    }

    info!("Shutdown complete.");
}
