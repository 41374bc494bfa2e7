//! The banner pipeline: fetch (through the caches), resolve strings, compose, serialize.

use crate::cache::RenderCaches;
use crate::canvas::{Canvas, Layer};
use crate::error::{Endpoint, Error, Result};
use crate::fetch::InviteSource;
use crate::geometry::{Frame, Point, VectorPath};
use crate::glyphs::{FontWeight, GlyphRenderer};
use crate::layout::{self, colors, Badge, BadgeArt};
use crate::locale::{LocaleStrings, LocaleTable};
use crate::model::{ImageFormat, InviteRecord};
use base64::Engine as Base64Engine;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Renders invite banners.
///
/// Fonts, locale strings and caches are built once by the caller and shared
/// by reference; a renderer itself holds no per-request state.
pub struct InviteRenderer<S, G> {
    source: S,
    glyphs: Arc<G>,
    locales: Arc<LocaleTable>,
    caches: Arc<RenderCaches>,
    badges: BadgeArt,
    timeout: Duration,
}

impl<S: InviteSource, G: GlyphRenderer> InviteRenderer<S, G> {
    pub fn new(
        source: S,
        glyphs: Arc<G>,
        locales: Arc<LocaleTable>,
        caches: Arc<RenderCaches>,
    ) -> Result<Self> {
        let badges = BadgeArt::load()
            .map_err(|e| Error::InitializationError(format!("Invalid badge outline: {}", e)))?;
        Ok(Self {
            source,
            glyphs,
            locales,
            caches,
            badges,
            timeout: Duration::from_millis(crate::DEFAULT_TIMEOUT_MS),
        })
    }

    /// Upper bound for each individual remote call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn caches(&self) -> &Arc<RenderCaches> {
        &self.caches
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Render the banner for `code` as an SVG document.
    ///
    /// `language` picks the display strings (unknown codes fall back to
    /// English). `animation` is accepted for API compatibility and currently
    /// has no effect.
    pub async fn render(&self, code: &str, language: &str, animation: bool) -> Result<String> {
        log::debug!(
            "Rendering invite {} (language {}, animation {})",
            code,
            language,
            animation
        );
        let invite = self.invite(code).await?;
        let icon = self.icon(&invite).await?;
        let locale = self.locales.resolve(language);
        let canvas = self.compose(&invite, &icon, locale)?;
        Ok(canvas.to_svg())
    }

    /// Invite record for `code`, fetched at most once per cache.
    ///
    /// A record without an icon cannot be drawn and is never cached.
    pub async fn invite(&self, code: &str) -> Result<Arc<InviteRecord>> {
        self.caches
            .invites
            .get_or_fetch(code, || async {
                let record =
                    bounded(self.timeout, Endpoint::Invite, self.source.fetch_invite(code)).await?;
                record.require_icon()?;
                Ok::<_, Error>(Arc::new(record))
            })
            .await
    }

    /// Base64 icon bytes for the invite's guild, cached by icon id
    pub async fn icon(&self, invite: &InviteRecord) -> Result<Arc<str>> {
        let icon_id = invite.require_icon()?;
        let format = ImageFormat::for_icon(icon_id);
        self.caches
            .icons
            .get_or_fetch(icon_id, || async {
                let bytes = bounded(
                    self.timeout,
                    Endpoint::Icon,
                    self.source.fetch_icon(&invite.guild_id, icon_id, format),
                )
                .await?;
                let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
                Ok::<_, Error>(Arc::from(encoded))
            })
            .await
    }

    /// Lay out and draw every element of the banner.
    ///
    /// Draw order matters: the button label is centered on the measured
    /// button, and each status element is placed after the previous one.
    pub fn compose(
        &self,
        invite: &InviteRecord,
        icon_base64: &str,
        locale: &LocaleStrings,
    ) -> Result<Canvas> {
        let icon_id = invite.require_icon()?;
        let format = ImageFormat::for_icon(icon_id);
        let mut canvas = Canvas::new(layout::INVITE_WIDTH, layout::INVITE_HEIGHT);

        canvas.rect(
            Layer::Background,
            layout::canvas_frame(),
            layout::BACKGROUND_RADIUS,
            colors::BACKGROUND,
        );

        // Server icon, clipped to the squircle
        let icon_frame = layout::icon_frame();
        let squircle = canvas.clip_rect(Layer::IconMask, icon_frame, layout::SQUIRCLE_RADIUS);
        canvas.image(
            Layer::Icon,
            icon_frame,
            format!("data:image/{};base64,{}", format.mime_subtype(), icon_base64),
            Some(squircle),
        );

        // Join button
        let button = canvas.rect(
            Layer::JoinButton,
            layout::button_frame(),
            layout::BUTTON_RADIUS,
            colors::JOIN_BUTTON,
        );
        let label = self.text(&locale.button, FontWeight::Medium, layout::BUTTON_LABEL_SIZE);
        let label_size = label.bounds();
        let label_at = layout::center_within(button, label_size.width, label_size.height);
        place(&mut canvas, Layer::JoinLabel, label, label_at, colors::WHITE);

        // Header is anchored by the glyph renderer, not moved
        let header_at = layout::header_origin();
        let header = self.glyphs.text_path(
            &locale.header.to_uppercase(),
            FontWeight::Bold,
            layout::HEADER_SIZE,
            header_at,
        );
        if !header.is_empty() {
            canvas.path(Layer::Header, header, colors::MUTED_TEXT);
        }

        let badge = Badge::select(&invite.features);
        if let Some(badge) = badge {
            let origin = layout::badge_origin();
            let offset = badge.glyph_offset();
            canvas.path(
                Layer::BadgeBackground,
                self.badges.background.moved_to(origin.x, origin.y),
                badge.color(),
            );
            canvas.path(
                Layer::BadgeGlyph,
                self.badges
                    .glyph(badge)
                    .moved_to(origin.x + offset.x, origin.y + offset.y),
                colors::WHITE,
            );
        }

        let name = self.text(&invite.guild_name, FontWeight::Semibold, layout::SERVER_NAME_SIZE);
        place(
            &mut canvas,
            Layer::ServerName,
            name,
            layout::name_origin(badge),
            colors::WHITE,
        );

        // Online and member counts share one row
        let dot_at = layout::presence_dot_origin();
        let presence_dot = canvas.circle(
            Layer::PresenceDot,
            dot_at.x,
            dot_at.y,
            layout::STATUS_DOT_SIZE,
            colors::ONLINE,
        );
        let row_y = presence_dot.y;

        let presence = self.text(
            &locale.online_text(invite.approximate_presence_count),
            FontWeight::Semibold,
            layout::STATUS_TEXT_SIZE,
        );
        let presence_label = place(
            &mut canvas,
            Layer::PresenceLabel,
            presence,
            layout::right_of(presence_dot, layout::STATUS_CIRCLE_MARGIN_RIGHT, row_y),
            colors::MUTED_TEXT,
        );

        let member_at = layout::right_of(presence_label, layout::STATUS_GAP, row_y);
        let member_dot = canvas.circle(
            Layer::MemberDot,
            member_at.x,
            member_at.y,
            layout::STATUS_DOT_SIZE,
            colors::MEMBERS,
        );

        let members = self.text(
            &locale.members_text(invite.approximate_member_count),
            FontWeight::Semibold,
            layout::STATUS_TEXT_SIZE,
        );
        place(
            &mut canvas,
            Layer::MemberLabel,
            members,
            layout::right_of(member_dot, layout::STATUS_CIRCLE_MARGIN_RIGHT, row_y),
            colors::MUTED_TEXT,
        );

        Ok(canvas)
    }

    fn text(&self, text: &str, weight: FontWeight, size: f32) -> VectorPath {
        self.glyphs.text_path(text, weight, size, Point::default())
    }
}

/// Move `path` so its top-left corner is at `at` and draw it.
/// Empty text draws nothing but still occupies a zero-width frame at `at`.
fn place(canvas: &mut Canvas, layer: Layer, path: VectorPath, at: Point, fill: &str) -> Frame {
    if path.is_empty() {
        return Frame::new(at.x, at.y, 0.0, 0.0);
    }
    canvas.path(layer, path.moved_to(at.x, at.y), fill)
}

async fn bounded<T>(
    timeout: Duration,
    endpoint: Endpoint,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => {
            log::warn!("{} request timed out after {:?}", endpoint, timeout);
            Err(Error::Timeout {
                endpoint,
                ms: timeout.as_millis() as u64,
            })
        }
    }
}
