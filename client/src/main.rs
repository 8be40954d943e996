mod board;
mod bullet;
mod error;
mod game;
mod input;
mod network;
mod rendering;

use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Player name shown on the board (also the tank id)
    #[arg(short = 'n', long)]
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting tank client...");
    info!("Connecting to: {}", args.server);
    info!("Controls: WASD or arrows to move, Space to shoot");

    let mut client = network::Client::new(&args.server, &args.name).await?;

    client.run().await?;

    Ok(())
}
