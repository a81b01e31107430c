use std::io::Read;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verifact::{CancellationToken, PipelineConfig, VerificationPipeline, VerificationRequest};

/// Read the text to verify from the first argument (a file path) or stdin
fn read_input() -> std::io::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PipelineConfig::from_env();
    let pipeline = VerificationPipeline::from_config(&config)?;

    let text = read_input()?;
    let request = VerificationRequest::Text { text };

    // Stop consuming provider budget promptly on Ctrl-C
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling verification");
            on_signal.cancel();
        }
    });

    let report = pipeline.verify(&request, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
