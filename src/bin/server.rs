//! kvline Server Binary
//!
//! Starts the TCP or UDP server for kvline.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use kvline::config::parse_port;
use kvline::network::Server;
use kvline::protocol::Separator;
use kvline::{Config, Engine, TransportKind};
use tracing_subscriber::{fmt, EnvFilter};

/// kvline Server
#[derive(Parser, Debug)]
#[command(name = "kvline-server")]
#[command(about = "Line-oriented key-value store over TCP or UDP")]
#[command(version)]
struct Args {
    /// Port to listen on (0-65535)
    #[arg(value_parser = parse_port)]
    port: u16,

    /// Interface to bind
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Serve over UDP instead of TCP
    #[arg(short, long)]
    udp: bool,

    /// JSON file loaded at startup and written on STOP
    #[arg(short, long, default_value = "./contents.json")]
    data_file: PathBuf,

    /// Split requests on tabs only, so keys and values may contain spaces
    #[arg(short, long)]
    tab_separated: bool,

    /// Drop a TCP client that sends nothing for this long (0 = never)
    #[arg(short, long, default_value = "0")]
    read_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvline=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("kvline Server v{}", kvline::VERSION);
    tracing::info!("Data file: {}", args.data_file.display());

    // Build config from args
    let config = Config::builder()
        .listen_addr(format!("{}:{}", args.bind, args.port))
        .transport(if args.udp {
            TransportKind::Datagram
        } else {
            TransportKind::Stream
        })
        .data_file(&args.data_file)
        .separator(if args.tab_separated {
            Separator::Tab
        } else {
            Separator::Whitespace
        })
        .read_timeout_ms(args.read_timeout_ms)
        .build();

    // Load the store
    let engine = match Engine::open(&config) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to load data file: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, engine) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
