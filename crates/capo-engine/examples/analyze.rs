//! Example: analyze the `<head>` of an HTML file (or stdin) and print the
//! report as JSON.
//!
//! ```text
//! RUST_LOG=debug cargo run --example analyze -- page.html https://example.com/
//! ```

use anyhow::Context;
use capo_engine::{Config, Engine};
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let html = match args.next() {
        Some(path) if path != "-" => {
            std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?
        }
        _ => {
            let mut html = String::new();
            std::io::stdin().read_to_string(&mut html)?;
            html
        }
    };

    let mut engine = Engine::new(Config::default());
    if let Some(url) = args.next() {
        engine.set("documentUrl", &url)?;
    }
    if let Ok(adapter) = std::env::var("CAPO_ADAPTER") {
        engine.set("adapter", &adapter)?;
    }

    tracing::info!("capo v{}", capo_engine::VERSION);
    let report = engine.analyze_html(&html)?;
    println!("{}", report.to_json()?);
    Ok(())
}
