//! Pixseek - a terminal image search gallery.
//!
//! # Usage
//!
//! ```bash
//! pixseek "yellow flowers"
//! pixseek --no-images cats
//! pixseek --per-page 20 "mountain lake"
//! ```
//!
//! Requires a Pixabay API key, supplied via `--api-key`, the saved
//! config, or the `PIXSEEK_API_KEY` environment variable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pixseek::app::App;
use pixseek::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use pixseek::perf;

/// A terminal image search gallery
#[derive(Parser, Debug)]
#[command(name = "pixseek", version, about, long_about = None)]
struct Cli {
    /// Query to search for on startup
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Pixabay API key (overrides config and PIXSEEK_API_KEY)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Override the search API endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Results per page (Pixabay allows 3-200)
    #[arg(long, value_name = "N")]
    per_page: Option<u32>,

    /// Disable inline thumbnail rendering (show placeholders only)
    #[arg(long)]
    no_images: bool,

    /// Force image rendering to use half-cell fallback mode
    #[arg(long)]
    force_half_cell: bool,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed fetch/render debug events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults in .pixseekrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .pixseekrc
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("PIXSEEK_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize debug log {}: {}",
            debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let api_key = effective
        .api_key
        .clone()
        .or_else(|| std::env::var("PIXSEEK_API_KEY").ok())
        .filter(|key| !key.trim().is_empty());
    let Some(api_key) = api_key else {
        anyhow::bail!(
            "No API key configured. Pass --api-key, run `pixseek --api-key KEY --save`, \
             or set PIXSEEK_API_KEY."
        );
    };

    let mut app = App::new(api_key)
        .with_endpoint(effective.endpoint.clone())
        .with_per_page(effective.per_page)
        .with_initial_query(cli.query)
        .with_images_enabled(!effective.no_images)
        .with_force_half_cell(effective.force_half_cell)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
