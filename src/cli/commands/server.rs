use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Start the API server (configuration from environment and .env)")]
    Start {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },
}

pub async fn handle(cmd: ServerCommands, _output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Start { port } => {
            let mut config = AppConfig::from_env();
            if let Some(port) = port {
                config.server.port = port;
            }
            crate::server::serve(config).await
        }
    }
}
