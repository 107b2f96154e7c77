use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use stroke_core::config::Config;
use stroke_core::encoder::FeatureEncoder;
use stroke_core::traits::Classifier;
use stroke_model::get_default_classifier;
use stroke_web::cli::{apply_args, CliAction, USAGE};
use stroke_web::logging::{init_logging, LogConfig};
use stroke_web::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    if apply_args(&mut settings, &args)? == CliAction::Help {
        println!("{USAGE}");
        return Ok(());
    }

    init_logging(&LogConfig::from_settings(&settings.logging))?;

    let base = env::current_dir().context("Failed to read working directory")?;
    let classifier = get_default_classifier(&settings.model, &base)
        .map_err(|e| { error!(error = %e, "Failed to load model"); e })?;
    let encoder = FeatureEncoder::new(settings.encoding.strict_categories);
    info!(
        model = %settings.model.resolved_path(&base).display(),
        n_features = classifier.n_features(),
        strict_categories = encoder.is_strict(),
        "Model loaded"
    );

    let state = AppState::new(Arc::from(classifier), encoder, settings.report.clone());
    let app = router(state);

    let bind_addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
