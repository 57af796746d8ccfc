use classmarket_api::{server, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up ACCESS_TOKEN_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    server::init_tracing();

    server::serve(AppConfig::from_env()).await
}
