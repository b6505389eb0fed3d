mod join;
mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use tandem::utils::DEFAULT_RELAY_PORT;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tandem", version, about = "Room-based WebRTC signaling relay and peer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,

        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_RELAY_PORT)]
        port: u16,

        /// Allowed CORS origin. Repeat for several; none allows any origin.
        #[arg(long = "allow-origin")]
        allow_origins: Vec<String>,

        /// Announce departures to the remaining room members.
        #[arg(long)]
        notify_on_leave: bool,
    },

    /// Join a room as a peer and negotiate with whoever else is there.
    Join {
        #[arg(long, env = "TANDEM_RELAY_URL", default_value = "ws://127.0.0.1:3001/ws")]
        url: String,

        #[arg(short, long)]
        room: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Call the next participant that joins.
        #[arg(long)]
        call: bool,

        /// Trickle ICE candidates instead of waiting for gathering.
        #[arg(long)]
        trickle: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve {
            host,
            port,
            allow_origins,
            notify_on_leave,
        } => serve::run(host, port, allow_origins, notify_on_leave).await,

        Commands::Join {
            url,
            room,
            email,
            call,
            trickle,
        } => join::run(join::JoinArgs {
            url,
            room,
            email,
            call,
            trickle,
        })
        .await,
    }
}
