//! Invite Banner
//!
//! Renders a small SVG preview card for a chat-server invite code: server
//! icon, badges, name, live online/member counts and a join button, with the
//! labels localized into one of several languages.
//!
//! # Features
//!
//! - **Self-contained output**: text is converted to outlines and the icon is
//!   embedded as base64, so the SVG references no external files
//! - **Two-tier caching**: invite records and icon bytes are fetched at most
//!   once per process (per shared [`RenderCaches`])
//! - **Swappable upstream**: fetching goes through the [`InviteSource`] trait
//!
//! # Example
//!
//! ```no_run
//! use invite_banner::{FontPaths, RendererConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RendererConfig {
//!     fonts: FontPaths::in_dir("assets/fonts"),
//!     timeout_ms: 5000,
//!     ..Default::default()
//! };
//!
//! let renderer = invite_banner::new_renderer(config)?;
//! let svg = renderer.render("discord-developers", "en", false).await?;
//! std::fs::write("banner.svg", svg)?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub mod cache;
pub mod canvas;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod glyphs;
pub mod layout;
pub mod locale;
pub mod model;
pub mod renderer;

pub use cache::{FetchCache, RenderCaches};
pub use error::{Endpoint, Error, Result};
pub use fetch::{HttpSource, InviteSource};
pub use glyphs::{FontPaths, FontSet, FontWeight, GlyphRenderer};
pub use locale::{LocaleStrings, LocaleTable};
pub use model::{GuildFeature, ImageFormat, InviteRecord};
pub use renderer::InviteRenderer;

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for the default renderer
///
/// The defaults point at the public API and CDN and expect the fonts in a
/// `fonts/` directory next to the working directory.
///
/// # Examples
///
/// ```
/// let cfg = invite_banner::RendererConfig::default();
/// assert!(cfg.api_base_url.starts_with("https://"));
/// assert!(cfg.locales_path.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Base URL of the invite lookup API
    pub api_base_url: String,
    /// Base URL of the icon CDN
    pub cdn_base_url: String,
    /// User agent string sent with requests
    pub user_agent: String,
    /// Timeout for each remote call in milliseconds
    pub timeout_ms: u64,
    /// Font files for the three weights
    pub fonts: FontPaths,
    /// Locale table to use instead of the built-in one
    pub locales_path: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://discord.com/api/v9/".to_string(),
            cdn_base_url: "https://cdn.discordapp.com/".to_string(),
            user_agent: format!("invite-banner/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fonts: FontPaths::default(),
            locales_path: None,
        }
    }
}

impl RendererConfig {
    pub fn load_locales(&self) -> Result<LocaleTable> {
        match &self.locales_path {
            Some(path) => LocaleTable::from_file(path),
            None => LocaleTable::builtin(),
        }
    }
}

/// Renderer backed by the HTTP API and fonts loaded from disk
pub type DefaultRenderer = InviteRenderer<HttpSource, FontSet>;

/// Build a renderer with its own, empty caches
pub fn new_renderer(config: RendererConfig) -> Result<DefaultRenderer> {
    new_renderer_with_caches(config, Arc::new(RenderCaches::new()))
}

/// Build a renderer that reads through the given caches
pub fn new_renderer_with_caches(
    config: RendererConfig,
    caches: Arc<RenderCaches>,
) -> Result<DefaultRenderer> {
    if config.timeout_ms == 0 {
        return Err(Error::ConfigError("timeout_ms must be positive".into()));
    }
    let fonts = FontSet::load(&config.fonts)?;
    let locales = config.load_locales()?;
    let source = HttpSource::new(&config)?;
    let renderer = InviteRenderer::new(source, Arc::new(fonts), Arc::new(locales), caches)?
        .with_timeout(Duration::from_millis(config.timeout_ms));
    log::info!("Renderer ready ({} ms timeout)", config.timeout_ms);
    Ok(renderer)
}
