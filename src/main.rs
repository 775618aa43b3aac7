use std::error::Error;

use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the process environment.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("no .env loaded: {e}");
    }

    llm_gateway::telemetry::init("info", Level::INFO)?;

    api::start().await?;

    Ok(())
}
