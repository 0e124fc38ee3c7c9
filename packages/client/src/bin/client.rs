//! Chatzito terminal client.
//!
//! Asks for a display name, joins the chat and relays typing indicators.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatzito-client
//! cargo run --bin chatzito-client -- --name Bea
//! cargo run --bin chatzito-client -- -u ws://192.168.0.10:3001/ws
//! ```

use chatzito_client::domain::DEFAULT_SERVER_URL;
use chatzito_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chatzito-client")]
#[command(about = "Terminal client for the Chatzito chat", long_about = None)]
struct Args {
    /// Display name (asked for interactively when omitted)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// WebSocket URL of the hub
    #[arg(short = 'u', long, default_value = DEFAULT_SERVER_URL)]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    if let Err(e) = chatzito_client::run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
