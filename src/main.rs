use anyhow::Context;
use clap::Parser;
use invite_banner::{FontPaths, RendererConfig};
use log::{info, LevelFilter};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;

/// Render an invite banner as SVG
#[derive(Parser)]
#[command(name = "invite-banner", version)]
struct Cli {
    /// The invite code to render
    code: String,

    /// Language of the banner labels; unknown codes fall back to English
    #[clap(long, short = 'L', default_value = "en")]
    lang: String,

    /// Reserved for animated output; currently has no effect
    #[clap(long)]
    animation: bool,

    /// Write the SVG here instead of stdout
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,

    /// Directory holding bold.ttf, semibold.ttf and medium.ttf
    #[clap(long, default_value = "fonts")]
    fonts_dir: PathBuf,

    /// JSON locale table replacing the built-in strings
    #[clap(long)]
    locales: Option<PathBuf>,

    #[clap(long)]
    api_base: Option<String>,

    #[clap(long)]
    cdn_base: Option<String>,

    /// Timeout for each remote call in milliseconds
    #[clap(long, default_value_t = invite_banner::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    #[clap(long, short = 'l', default_value = "warn")]
    log_level: LevelFilter,
}

impl Cli {
    fn config(&self) -> RendererConfig {
        let defaults = RendererConfig::default();
        RendererConfig {
            api_base_url: self.api_base.clone().unwrap_or(defaults.api_base_url),
            cdn_base_url: self.cdn_base.clone().unwrap_or(defaults.cdn_base_url),
            timeout_ms: self.timeout_ms,
            fonts: FontPaths::in_dir(&self.fonts_dir),
            locales_path: self.locales.clone(),
            ..defaults
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level,
        Default::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logging")?;

    let renderer =
        invite_banner::new_renderer(cli.config()).context("Failed to set up the renderer")?;
    let svg = renderer
        .render(&cli.code, &cli.lang, cli.animation)
        .await
        .with_context(|| format!("Failed to render invite {}", cli.code))?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &svg)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", svg.len(), path.display());
        }
        None => println!("{}", svg),
    }

    Ok(())
}
