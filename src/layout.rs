//! Fixed banner layout.
//!
//! Every position is either a constant or derived from the frame of an
//! element that was placed earlier; nothing is laid out twice.

use crate::geometry::{Frame, PathError, Point, VectorPath};
use crate::model::GuildFeature;
use std::collections::HashSet;

pub const PADDING: f32 = 16.0;
pub const ICON_SIZE: f32 = 50.0;
pub const SERVER_NAME_SIZE: f32 = 16.0;
pub const HEADER_SIZE: f32 = 12.0;
pub const INVITE_WIDTH: f32 = 430.0;
pub const INVITE_HEIGHT: f32 = 110.0;
pub const BUTTON_WIDTH: f32 = 94.75;
pub const BUTTON_HEIGHT: f32 = 40.0;
pub const BUTTON_Y: f32 = 50.0;
pub const BUTTON_LABEL_SIZE: f32 = 14.0;
pub const BADGE_MARGIN_RIGHT: f32 = 8.0;
pub const STATUS_CIRCLE_MARGIN_RIGHT: f32 = 4.0;
pub const STATUS_GAP: f32 = 8.0;
pub const STATUS_DOT_SIZE: f32 = 8.0;
pub const STATUS_TEXT_SIZE: f32 = 14.0;

pub const BACKGROUND_RADIUS: f32 = 3.0;
pub const SQUIRCLE_RADIUS: f32 = 16.0;
pub const BUTTON_RADIUS: f32 = 3.0;

pub const INNER_X: f32 = 2.0 * PADDING + ICON_SIZE;
pub const INNER_Y: f32 = PADDING + HEADER_SIZE + 12.0;

pub mod colors {
    pub const BACKGROUND: &str = "#2f3136";
    pub const JOIN_BUTTON: &str = "#43b581";
    pub const WHITE: &str = "#ffffff";
    pub const MUTED_TEXT: &str = "#b9bbbe";
    pub const ONLINE: &str = "#43b581";
    pub const MEMBERS: &str = "#747f8d";
    pub const PARTNERED: &str = "#4087ed";
    pub const VERIFIED: &str = "#7289da";
}

// Stand-in badge art (rosette, heart, check). Positions and sizes match the
// banner; the outlines are not the production ones.

/// 16x16 rosette drawn behind a badge glyph
pub const SPECIAL_BADGE: &str = "M8 0L10.53 1.9L13.66 2.34L14.1 5.47L16 8L14.1 10.53L13.66 13.66L10.53 14.1\
L8 16L5.47 14.1L2.34 13.66L1.9 10.53L0 8L1.9 5.47L2.34 2.34L5.47 1.9Z";
pub const PARTNER_ICON: &str = "M4.8 7.8L1.74 4.86C0.96 4.08 0.96 2.82 1.74 2.04C2.52 1.26 3.78 1.26 4.56 2.04\
L4.8 2.28L5.04 2.04C5.82 1.26 7.08 1.26 7.86 2.04C8.64 2.82 8.64 4.08 7.86 4.86Z";
pub const PARTNER_ICON_X_OFFSET: f32 = 4.5;
pub const PARTNER_ICON_Y_OFFSET: f32 = 4.8;
pub const VERIFIED_ICON: &str = "M7.4 11.17L4 8.62L5 7.26L7 8.79L10.64 4L12 5Z";
pub const VERIFIED_ICON_X_OFFSET: f32 = 4.0;
pub const VERIFIED_ICON_Y_OFFSET: f32 = 4.4;

/// Status badge shown in front of the server name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    Partnered,
    Verified,
}

impl Badge {
    /// Checked in order; the first badge whose feature is present wins.
    pub const PRIORITY: [Badge; 2] = [Badge::Partnered, Badge::Verified];

    pub fn select(features: &HashSet<GuildFeature>) -> Option<Badge> {
        Self::PRIORITY
            .iter()
            .copied()
            .find(|badge| features.contains(&badge.feature()))
    }

    pub fn feature(self) -> GuildFeature {
        match self {
            Badge::Partnered => GuildFeature::Partnered,
            Badge::Verified => GuildFeature::Verified,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Badge::Partnered => colors::PARTNERED,
            Badge::Verified => colors::VERIFIED,
        }
    }

    /// Glyph position relative to the badge origin
    pub fn glyph_offset(self) -> Point {
        match self {
            Badge::Partnered => Point::new(PARTNER_ICON_X_OFFSET, PARTNER_ICON_Y_OFFSET),
            Badge::Verified => Point::new(VERIFIED_ICON_X_OFFSET, VERIFIED_ICON_Y_OFFSET),
        }
    }
}

/// Badge outlines, parsed once when a renderer is built
#[derive(Debug, Clone)]
pub struct BadgeArt {
    pub background: VectorPath,
    pub partner: VectorPath,
    pub verified: VectorPath,
}

impl BadgeArt {
    pub fn load() -> Result<Self, PathError> {
        Ok(Self {
            background: VectorPath::parse(SPECIAL_BADGE)?,
            partner: VectorPath::parse(PARTNER_ICON)?,
            verified: VectorPath::parse(VERIFIED_ICON)?,
        })
    }

    pub fn glyph(&self, badge: Badge) -> &VectorPath {
        match badge {
            Badge::Partnered => &self.partner,
            Badge::Verified => &self.verified,
        }
    }
}

pub fn canvas_frame() -> Frame {
    Frame::new(0.0, 0.0, INVITE_WIDTH, INVITE_HEIGHT)
}

/// Squircle mask and icon image share this frame
pub fn icon_frame() -> Frame {
    Frame::new(PADDING, INNER_Y, ICON_SIZE, ICON_SIZE)
}

pub fn button_frame() -> Frame {
    Frame::new(
        INVITE_WIDTH - PADDING - BUTTON_WIDTH,
        BUTTON_Y,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    )
}

/// Top-left corner that centers a `width` x `height` box inside `outer`.
pub fn center_within(outer: Frame, width: f32, height: f32) -> Point {
    Point::new(outer.center_x() - width / 2.0, outer.center_y() - height / 2.0)
}

pub fn header_origin() -> Point {
    Point::new(PADDING, PADDING)
}

pub fn badge_origin() -> Point {
    Point::new(INNER_X, INNER_Y)
}

/// Horizontal space reserved in front of the server name
pub fn name_padding(badge: Option<Badge>) -> f32 {
    match badge {
        Some(_) => PADDING + BADGE_MARGIN_RIGHT,
        None => 0.0,
    }
}

pub fn name_origin(badge: Option<Badge>) -> Point {
    Point::new(INNER_X + name_padding(badge), INNER_Y)
}

pub fn presence_dot_origin() -> Point {
    Point::new(INNER_X, INNER_Y + SERVER_NAME_SIZE + 2.0)
}

/// Next element on a row: `gap` units past the right edge of `prev`.
pub fn right_of(prev: Frame, gap: f32, row_y: f32) -> Point {
    Point::new(prev.right() + gap, row_y)
}

/// Group digits by three with commas, independent of the display language.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
