//! Standalone CLI for the earthquake zoning pipeline
//!
//! Run with: cargo run --features cli --bin quake-cli
//!
//! Loads the catalog once and prints the first outcome as JSON. Each line on
//! stdin then changes one parameter and re-runs the pipeline:
//! `mag <x>`, `zones <k>`, `cap <n>`, `show`, `quit`.

use quake_zones::{CatalogCache, CatalogError, CatalogState, Config, Params, Pipeline};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quake_zones=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::var("QUAKE_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Reading JSON config");
            Config::from_json(&tokio::fs::read_to_string(&path).await?)?
        }
        Err(_) => Config::from_env(),
    };

    info!(catalog = %config.catalog.display(), seed = config.seed, "Loading catalog");
    let path = config.catalog.clone();
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        });
    let mut cache = CatalogCache::with_load_floor(config.load_floor);
    let catalog = cache.load(&path.display().to_string(), || text);

    let pipeline = config.pipeline();
    let mut params = config.params;
    emit(&pipeline, &catalog, &params)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match apply_command(&line, params) {
            Ok(Some(next)) => match next.validate() {
                Ok(()) => {
                    params = next;
                    emit(&pipeline, &catalog, &params)?;
                }
                Err(e) => warn!(error = %e, "Parameters rejected, keeping previous"),
            },
            Ok(None) => break,
            Err(msg) => warn!(line = %line.trim(), "{msg}"),
        }
    }

    info!("Input closed");
    Ok(())
}

/// Run once and print the outcome as a JSON document on stdout
fn emit(
    pipeline: &Pipeline,
    catalog: &CatalogState,
    params: &Params,
) -> Result<(), Box<dyn std::error::Error>> {
    match pipeline.run(catalog, params) {
        Ok(outcome) => println!("{}", serde_json::to_string(&outcome)?),
        Err(e) => error!(error = %e, "Pipeline run rejected"),
    }
    Ok(())
}

/// Apply one stdin command to the current parameters.
///
/// `Ok(None)` ends the session.
fn apply_command(line: &str, current: Params) -> Result<Option<Params>, String> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Err("empty command".to_string());
    };
    let arg = parts.next();
    let mut next = current;

    match (cmd, arg) {
        ("quit" | "exit", _) => return Ok(None),
        ("show", _) => {}
        ("mag", Some(v)) => {
            next.min_magnitude = v.parse().map_err(|e| format!("bad magnitude: {e}"))?;
        }
        ("zones" | "k", Some(v)) => {
            next.zones = v.parse().map_err(|e| format!("bad zone count: {e}"))?;
        }
        ("cap", Some(v)) => {
            next.display_cap = v.parse().map_err(|e| format!("bad display cap: {e}"))?;
        }
        _ => return Err(format!("unknown command `{cmd}`")),
    }
    Ok(Some(next))
}
