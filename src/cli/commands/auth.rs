use clap::Subcommand;
use serde_json::json;

use crate::auth::TokenAuthority;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint an access token with the configured ACCESS_TOKEN_SECRET")]
    Token {
        #[arg(help = "Email address to use as the token subject")]
        email: String,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { email } => {
            let config = AppConfig::from_env();
            let tokens = TokenAuthority::from_config(&config.security);
            let access_token = tokens.issue(&email)?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", json!({ "auth": true, "accessToken": access_token }));
                }
                OutputFormat::Text => {
                    println!("{}", access_token);
                    eprintln!("(expires in {} seconds)", tokens.ttl().num_seconds());
                }
            }
            Ok(())
        }
    }
}
