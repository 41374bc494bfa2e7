//! Shared fixtures for integration tests
#![allow(dead_code)]

use futures::future::{BoxFuture, FutureExt};
use invite_banner::geometry::{Point, VectorPath};
use invite_banner::{
    Endpoint, Error, FontWeight, GlyphRenderer, GuildFeature, ImageFormat, InviteRecord,
    InviteSource, LocaleStrings, LocaleTable, Result,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Draws every character as a 6 unit wide box and remembers what it drew.
#[derive(Default)]
pub struct RecordingGlyphs {
    pub calls: Mutex<Vec<(String, FontWeight, f32)>>,
}

impl RecordingGlyphs {
    pub fn texts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(t, _, _)| t.clone()).collect()
    }
}

impl GlyphRenderer for RecordingGlyphs {
    fn text_path(&self, text: &str, weight: FontWeight, size: f32, origin: Point) -> VectorPath {
        self.calls.lock().unwrap().push((text.to_string(), weight, size));
        let mut d = String::new();
        for (i, _) in text.chars().enumerate() {
            let x = origin.x + 6.0 * i as f32;
            d.push_str(&format!(
                "M{} {}H{}V{}H{}Z",
                x,
                origin.y,
                x + 5.0,
                origin.y + size,
                x
            ));
        }
        VectorPath::parse(&d).unwrap()
    }
}

/// In-memory upstream that counts how often it is asked.
#[derive(Default)]
pub struct MemorySource {
    pub invites: HashMap<String, InviteRecord>,
    pub icons: HashMap<String, Vec<u8>>,
    pub invite_calls: AtomicUsize,
    pub icon_calls: AtomicUsize,
    pub offline: AtomicBool,
    pub delay: Option<Duration>,
}

impl MemorySource {
    pub fn with_invite(mut self, code: &str, record: InviteRecord) -> Self {
        if let Some(icon) = &record.guild_icon_id {
            self.icons.insert(icon.clone(), vec![0xff, 0xd8, 0xff, 0xe0]);
        }
        self.invites.insert(code.to_string(), record);
        self
    }

    pub fn invite_calls(&self) -> usize {
        self.invite_calls.load(Ordering::SeqCst)
    }

    pub fn icon_calls(&self) -> usize {
        self.icon_calls.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl InviteSource for MemorySource {
    fn fetch_invite<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<InviteRecord>> {
        async move {
            self.invite_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.offline.load(Ordering::SeqCst) {
                return Err(Error::FetchFailure {
                    endpoint: Endpoint::Invite,
                    reason: "connection refused".into(),
                });
            }
            self.invites.get(code).cloned().ok_or(Error::FetchFailure {
                endpoint: Endpoint::Invite,
                reason: "404 Not Found".into(),
            })
        }
        .boxed()
    }

    fn fetch_icon<'a>(
        &'a self,
        _guild_id: &'a str,
        icon_id: &'a str,
        _format: ImageFormat,
    ) -> BoxFuture<'a, Result<Vec<u8>>> {
        async move {
            self.icon_calls.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(Error::FetchFailure {
                    endpoint: Endpoint::Icon,
                    reason: "connection refused".into(),
                });
            }
            self.icons.get(icon_id).cloned().ok_or(Error::FetchFailure {
                endpoint: Endpoint::Icon,
                reason: "404 Not Found".into(),
            })
        }
        .boxed()
    }
}

pub fn record(guild_id: &str, name: &str, icon: Option<&str>, features: &[&str]) -> InviteRecord {
    InviteRecord {
        guild_id: guild_id.to_string(),
        guild_name: name.to_string(),
        guild_icon_id: icon.map(str::to_string),
        features: features.iter().map(|f| GuildFeature::from(*f)).collect(),
        approximate_presence_count: 42,
        approximate_member_count: 1500,
    }
}

/// Locale table whose English strings are easy to spot in assertions
pub fn test_locales() -> LocaleTable {
    let mut map = HashMap::new();
    map.insert(
        "en".to_string(),
        LocaleStrings {
            button: "EN-BUTTON".into(),
            header: "en-header-string".into(),
            online: "{{count}} online".into(),
            members: "{{count}} members".into(),
        },
    );
    map.insert(
        "de".to_string(),
        LocaleStrings {
            button: "DE-BUTTON".into(),
            header: "de-header".into(),
            online: "{{count}} online".into(),
            members: "{{count}} Mitglieder".into(),
        },
    );
    LocaleTable::from_map(map).unwrap()
}
