//! One-shot upload of the local spec-sheet folder to the object store.

use std::error::Error;

use doc_uploader::{UploadConfig, upload_dir};
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("no .env loaded: {e}");
    }
    llm_gateway::telemetry::init("info", Level::INFO)?;

    let cfg = UploadConfig::from_env()?;
    info!(
        dir = %cfg.local_dir.display(),
        bucket = %cfg.bucket,
        prefix = %cfg.prefix,
        "starting upload"
    );

    let report = upload_dir(&cfg).await?;
    for key in &report.uploaded {
        info!(key = %key, "uploaded");
    }
    for name in &report.skipped {
        info!(file = %name, "skipped");
    }
    info!(
        uploaded = report.uploaded.len(),
        skipped = report.skipped.len(),
        "upload finished"
    );
    Ok(())
}
