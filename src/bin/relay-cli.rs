use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use emote_relay::relay::{build_join_url, EmoteJoin, RelayError};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Send emote join commands through an emote relay", long_about = None)]
struct Cli {
    /// Relay endpoint.
    #[arg(short, long, default_value = "http://localhost:8080/")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct JoinArgs {
    /// Emote server base URL
    #[arg(long)]
    server: String,
    #[arg(long)]
    tc: String,
    #[arg(long)]
    emote_id: String,
    /// Player uid; repeat for more slots, pass "" to leave a slot empty
    #[arg(long = "uid")]
    uids: Vec<String>,
}

impl JoinArgs {
    fn payload(&self) -> Value {
        json!({
            "server": self.server,
            "tc": self.tc,
            "emote_id": self.emote_id,
            "uids": self.uids,
        })
    }

    /// The upstream URL the relay would request for these arguments.
    fn join_url(&self) -> Result<String, RelayError> {
        let body = self.payload().to_string();
        let join = EmoteJoin::from_body(body.as_bytes())?;
        Ok(build_join_url(&join))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Send a join command through the relay
    Join(JoinArgs),
    /// Print the upstream URL the relay would request, without sending anything
    Url(JoinArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Join(args) => {
            let client = reqwest::Client::new();
            let res = client.post(&cli.url).json(&args.payload()).send().await?;
            print_response(res).await?;
        }
        Commands::Url(args) => {
            println!("{}", args.join_url()?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => {
            if !status.is_success() {
                eprintln!("Error: relay returned status {}", status);
            }
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: relay returned status {}", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(())
}
