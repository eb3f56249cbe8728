use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

use ads_dashboard::config;
use ads_dashboard::dashboard::Dashboard;
use ads_dashboard::gate::PasswordGate;
use ads_dashboard::store::SupabaseStore;
use ads_dashboard::view;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Render the newsletter ads dashboard to a local HTML page."
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Dashboard password; without the correct value only the gate page is
    /// rendered
    #[arg(long)]
    password: Option<String>,

    /// Only show ads from this sponsor (exact match)
    #[arg(long)]
    sponsor: Option<String>,

    /// Only show ads from this newsletter (exact match)
    #[arg(long)]
    newsletter: Option<String>,

    /// Inclusive lower bound on send date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Inclusive upper bound on send date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Number of 20-row pages to reveal, simulating "load more"
    #[arg(long, default_value_t = 1)]
    pages: usize,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", s, e))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let mut cfg = config::load(Some(&args.config))?;
    cfg.apply_env_overrides();
    cfg.ensure_dirs()?;

    let out_dir = PathBuf::from(&cfg.app.out_dir);

    let mut gate = PasswordGate::new(cfg.gate.password.clone());
    let attempt = args.password.as_deref().unwrap_or_default();
    if !gate.submit(attempt) {
        // Wrong or missing password: render the gate, with the inline
        // message only when an attempt was actually made.
        let html = view::render_gate(args.password.is_some());
        write_page(&out_dir, &html).await?;
        return Ok(());
    }

    let store = SupabaseStore::new(
        &cfg.store.url,
        cfg.store.api_key.clone(),
        cfg.store.table.clone(),
    )?;

    let mut dash = Dashboard::new();
    dash.set_sponsor(args.sponsor);
    dash.set_newsletter(args.newsletter);
    dash.set_start_date(args.from);
    dash.set_end_date(args.to);
    dash.load(&store).await;

    for _ in 1..args.pages {
        if !dash.request_more() {
            break;
        }
    }

    info!(
        total = dash.total_records(),
        filtered = dash.filtered_len(),
        visible = dash.visible().len(),
        "rendering dashboard"
    );

    let html = view::render_dashboard(&dash);
    write_page(&out_dir, &html).await?;
    Ok(())
}

async fn write_page(out_dir: &Path, html: &str) -> Result<()> {
    let static_dir = out_dir.join("static");
    tokio::fs::create_dir_all(&static_dir)
        .await
        .with_context(|| format!("failed to create {}", static_dir.display()))?;

    let index_path = out_dir.join("index.html");
    tokio::fs::write(&index_path, html)
        .await
        .with_context(|| format!("failed to write {}", index_path.display()))?;

    let css_path = static_dir.join("style.css");
    tokio::fs::write(&css_path, view::DEFAULT_STYLE)
        .await
        .with_context(|| format!("failed to write {}", css_path.display()))?;

    println!("Wrote {} and {}", index_path.display(), css_path.display());
    Ok(())
}
