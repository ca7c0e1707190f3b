use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "utaportal", version, about = "Kuroco-backed karaoke portal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the portal HTTP server
    Serve(ServeCmd),

    /// Write sitemap.xml as a build artifact
    Sitemap(SitemapCmd),
}

#[derive(Parser, Debug)]
pub struct ServeCmd {
    /// Address to bind, e.g. 0.0.0.0:3000 (overrides BIND_ADDR)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SitemapCmd {
    /// Output file
    #[arg(long, value_name = "FILE", default_value = "public/sitemap.xml")]
    pub out: PathBuf,
}
