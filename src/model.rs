//! Invite metadata as returned by the upstream API

use crate::error::{Endpoint, Error, Result};
use serde::Deserialize;
use std::collections::HashSet;

/// Icon ids starting with this prefix refer to animated GIF icons
pub const ANIMATED_ICON_PREFIX: &str = "a_";

/// Guild feature tag. Only the tags the banner reacts to get their own variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum GuildFeature {
    Partnered,
    Verified,
    Other(String),
}

impl From<String> for GuildFeature {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "PARTNERED" => GuildFeature::Partnered,
            "VERIFIED" => GuildFeature::Verified,
            _ => GuildFeature::Other(tag),
        }
    }
}

impl From<&str> for GuildFeature {
    fn from(tag: &str) -> Self {
        GuildFeature::from(tag.to_string())
    }
}

/// Everything the banner needs to know about one invite
#[derive(Debug, Clone, PartialEq)]
pub struct InviteRecord {
    pub guild_id: String,
    pub guild_name: String,
    pub guild_icon_id: Option<String>,
    pub features: HashSet<GuildFeature>,
    pub approximate_presence_count: u64,
    pub approximate_member_count: u64,
}

#[derive(Deserialize)]
struct InvitePayload {
    guild: GuildPayload,
    approximate_presence_count: u64,
    approximate_member_count: u64,
}

#[derive(Deserialize)]
struct GuildPayload {
    id: String,
    name: String,
    icon: Option<String>,
    #[serde(default)]
    features: Vec<GuildFeature>,
}

impl InviteRecord {
    /// Parse an invite lookup response body
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let payload: InvitePayload =
            serde_json::from_slice(body).map_err(|e| Error::malformed(Endpoint::Invite, e))?;

        Ok(Self {
            guild_id: payload.guild.id,
            guild_name: payload.guild.name,
            guild_icon_id: payload.guild.icon,
            features: payload.guild.features.into_iter().collect(),
            approximate_presence_count: payload.approximate_presence_count,
            approximate_member_count: payload.approximate_member_count,
        })
    }

    pub fn has_feature(&self, feature: &GuildFeature) -> bool {
        self.features.contains(feature)
    }

    /// The icon id, or a malformed-response error when the guild has none
    pub fn require_icon(&self) -> Result<&str> {
        self.guild_icon_id
            .as_deref()
            .ok_or_else(|| Error::malformed(Endpoint::Invite, "guild has no icon"))
    }
}

pub fn is_animated_icon(icon_id: &str) -> bool {
    icon_id.starts_with(ANIMATED_ICON_PREFIX)
}

/// Raster format of an embedded icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Gif,
}

impl ImageFormat {
    pub fn for_icon(icon_id: &str) -> Self {
        if is_animated_icon(icon_id) {
            ImageFormat::Gif
        } else {
            ImageFormat::Jpeg
        }
    }

    /// File extension used by the icon CDN
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
        }
    }

    /// Subtype used in the `data:image/...` URI
    pub fn mime_subtype(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        }
    }
}
