use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use server::{build_server_app, load_config, Args, MatchReportSink};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = load_config(&args.config)?.with_args(&args);
    info!(?cfg, "Server config loaded");

    let report_path = args.report.clone();
    let sink = MatchReportSink::default();
    let mut app = build_server_app(cfg)?;
    app.insert_resource(args);
    app.insert_resource(sink.clone());
    app.run();

    if let Some(report) = sink.take() {
        for vessel in &report.vessels {
            info!(?vessel, "final state");
        }
        if let Some(path) = report_path {
            std::fs::write(&path, report.to_toml()?)
                .with_context(|| format!("writing report {}", path.display()))?;
            info!(path = %path.display(), "match report written");
        }
    }
    Ok(())
}
