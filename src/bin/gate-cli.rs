use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use site_gate::auth::{parse_ttl, Role, SessionClaims, TokenCodec};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Credential and admin tooling for site-gate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a session credential
    Sign {
        #[arg(long, env = "JWT_SECRET")]
        secret: String,
        #[arg(long)]
        sub: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "USER")]
        role: Role,
        #[arg(long, default_value = "7d")]
        ttl: String,
    },
    /// Verify a credential and print its claims
    Verify {
        #[arg(long, env = "JWT_SECRET")]
        secret: String,
        token: String,
    },
    /// Fetch admin statistics from a running server
    Stats {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
        /// Admin credential
        #[arg(short, long)]
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sign { secret, sub, name, phone, role, ttl } => {
            let codec = TokenCodec::with_system_clock(secret.as_bytes());
            let claims = SessionClaims { sub, name, phone, role };
            println!("{}", codec.sign(&claims, parse_ttl(&ttl)?)?);
        }
        Commands::Verify { secret, token } => {
            let codec = TokenCodec::with_system_clock(secret.as_bytes());
            match codec.verify::<SessionClaims>(&token) {
                Ok(claims) => println!("{}", serde_json::to_string_pretty(&claims)?),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Stats { url, token } => {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);

            let res = reqwest::Client::new()
                .get(format!("{}/api/admin/stats", url.trim_end_matches('/')))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
