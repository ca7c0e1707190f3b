use anyhow::Context as _;
use clap::Parser;
use domain::SiteConfig;
use serve::PageDetector;
use tracing_subscriber::EnvFilter;

use app::cli::{Cli, Commands, ServeCmd, SitemapCmd};
use app::handlers::sitemap::build_sitemap_xml;
use app::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .try_init();

    let cli = Cli::parse();
    let config = SiteConfig::from_env().context("failed to load configuration")?;

    match cli.command {
        Commands::Serve(cmd) => serve(config, cmd).await,
        Commands::Sitemap(cmd) => write_sitemap(config, cmd),
    }
}

async fn serve(mut config: SiteConfig, cmd: ServeCmd) -> anyhow::Result<()> {
    if let Some(bind) = cmd.bind {
        config.bind_addr = bind;
    }
    let bind_addr = config.bind_addr.clone();

    let app_state = AppState::new(config)?;
    let routes = app_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, routes).await?;
    Ok(())
}

fn write_sitemap(config: SiteConfig, cmd: SitemapCmd) -> anyhow::Result<()> {
    let xml = build_sitemap_xml(&config);

    if let Some(parent) = cmd.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&cmd.out, &xml)
        .with_context(|| format!("failed to write {}", cmd.out.display()))?;

    let pages = PageDetector::new(&config.routes_dir).detect_pages();
    tracing::info!("{} pages in sitemap", pages.len());
    for page in &pages {
        tracing::info!(
            "  {} (priority {:.1}, changefreq {})",
            page.path,
            page.priority,
            page.changefreq
        );
    }
    tracing::info!("sitemap written to {}", cmd.out.display());

    Ok(())
}
