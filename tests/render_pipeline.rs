//! End-to-end rendering against an in-memory upstream

mod common;

use common::{record, test_locales, MemorySource, RecordingGlyphs};
use invite_banner::{Endpoint, Error, InviteRenderer, LocaleTable, RenderCaches};
use std::sync::Arc;
use std::time::Duration;

fn renderer(
    source: MemorySource,
) -> (InviteRenderer<MemorySource, RecordingGlyphs>, Arc<RecordingGlyphs>) {
    let glyphs = Arc::new(RecordingGlyphs::default());
    let renderer = InviteRenderer::new(
        source,
        glyphs.clone(),
        Arc::new(test_locales()),
        Arc::new(RenderCaches::new()),
    )
    .expect("renderer");
    (renderer, glyphs)
}

#[tokio::test]
async fn test_end_to_end_banner() {
    let source = MemorySource::default().with_invite(
        "abc123",
        record("81384788765712384", "Test Server", Some("abcdef"), &[]),
    );
    let (renderer, glyphs) = renderer(source);

    let svg = renderer.render("abc123", "en", false).await.expect("render");

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("viewBox=\"0 0 430 110\""));
    assert!(svg.contains("<image "));
    assert!(svg.contains("data:image/jpeg;base64,/9j/4A=="));
    assert!(!svg.contains("#4087ed"));
    assert!(!svg.contains("#7289da"));

    let texts = glyphs.texts();
    assert!(texts.contains(&"EN-HEADER-STRING".to_string()));
    assert!(texts.contains(&"EN-BUTTON".to_string()));
    assert!(texts.contains(&"Test Server".to_string()));
    assert!(texts.contains(&"42 online".to_string()));
    assert!(texts.contains(&"1,500 members".to_string()));
}

#[tokio::test]
async fn test_second_render_hits_both_caches() {
    let source = MemorySource::default()
        .with_invite("abc123", record("1", "Test Server", Some("abcdef"), &[]));
    let (renderer, _) = renderer(source);

    let first = renderer.render("abc123", "en", false).await.unwrap();
    let second = renderer.render("abc123", "en", true).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(renderer.source().invite_calls(), 1);
    assert_eq!(renderer.source().icon_calls(), 1);
    assert!(renderer.caches().invites.contains("abc123"));
    assert!(renderer.caches().icons.contains("abcdef"));
}

#[tokio::test]
async fn test_invites_to_same_guild_share_icon_fetch() {
    let source = MemorySource::default()
        .with_invite("first", record("1", "Test Server", Some("abcdef"), &[]))
        .with_invite("second", record("1", "Test Server", Some("abcdef"), &[]));
    let (renderer, _) = renderer(source);

    renderer.render("first", "en", false).await.unwrap();
    renderer.render("second", "en", false).await.unwrap();

    assert_eq!(renderer.source().invite_calls(), 2);
    assert_eq!(renderer.source().icon_calls(), 1);
}

#[tokio::test]
async fn test_unknown_language_matches_english() {
    let source = MemorySource::default()
        .with_invite("abc123", record("1", "Test Server", Some("abcdef"), &[]));
    let (renderer, glyphs) = renderer(source);

    let en = renderer.render("abc123", "en", false).await.unwrap();
    let en_texts = glyphs.texts();
    glyphs.calls.lock().unwrap().clear();

    let xx = renderer.render("abc123", "xx", false).await.unwrap();
    assert_eq!(en, xx);
    assert_eq!(glyphs.texts(), en_texts);

    glyphs.calls.lock().unwrap().clear();
    renderer.render("abc123", "de", false).await.unwrap();
    assert!(glyphs.texts().contains(&"1,500 Mitglieder".to_string()));
}

#[tokio::test]
async fn test_fetch_failure_is_not_cached() {
    let source = MemorySource::default()
        .with_invite("abc123", record("1", "Test Server", Some("abcdef"), &[]));
    source.set_offline(true);
    let (renderer, _) = renderer(source);

    let err = renderer.render("abc123", "en", false).await.unwrap_err();
    assert!(matches!(err, Error::FetchFailure { endpoint: Endpoint::Invite, .. }));
    assert!(!renderer.caches().invites.contains("abc123"));
    assert!(renderer.caches().invites.is_empty());

    // the next call retries and succeeds
    renderer.source().set_offline(false);
    renderer.render("abc123", "en", false).await.expect("recovers");
    assert_eq!(renderer.source().invite_calls(), 2);
}

#[tokio::test]
async fn test_icon_failure_fails_the_render() {
    let source = MemorySource::default()
        .with_invite("abc123", record("1", "Test Server", Some("abcdef"), &[]));
    let (renderer, _) = renderer(source);

    // warm the invite cache, then lose the network
    renderer.invite("abc123").await.unwrap();
    renderer.source().set_offline(true);

    let err = renderer.render("abc123", "en", false).await.unwrap_err();
    assert_eq!(err.endpoint(), Some(Endpoint::Icon));
    assert!(renderer.caches().invites.contains("abc123"));
    assert!(!renderer.caches().icons.contains("abcdef"));
}

#[tokio::test]
async fn test_guild_without_icon_is_malformed() {
    let source =
        MemorySource::default().with_invite("noicon", record("1", "Test Server", None, &[]));
    let (renderer, _) = renderer(source);

    let err = renderer.render("noicon", "en", false).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { endpoint: Endpoint::Invite, .. }));
    assert_eq!(renderer.source().icon_calls(), 0);
}

#[tokio::test]
async fn test_icon_less_invite_is_refetched() {
    let source =
        MemorySource::default().with_invite("noicon", record("1", "Test Server", None, &[]));
    let (renderer, _) = renderer(source);

    for _ in 0..2 {
        let err = renderer.render("noicon", "en", false).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { endpoint: Endpoint::Invite, .. }));
        assert!(!renderer.caches().invites.contains("noicon"));
    }
    assert_eq!(renderer.source().invite_calls(), 2);
    assert!(renderer.caches().invites.is_empty());
}

#[tokio::test]
async fn test_concurrent_renders_share_one_fetch() {
    let source = MemorySource {
        delay: Some(Duration::from_millis(30)),
        ..Default::default()
    }
    .with_invite("abc123", record("1", "Test Server", Some("abcdef"), &[]));
    let (renderer, _) = renderer(source);
    let renderer = Arc::new(renderer);

    let mut handles = Vec::new();
    for _ in 0..6 {
        let renderer = renderer.clone();
        handles.push(tokio::spawn(async move {
            renderer.render("abc123", "en", false).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("render");
    }

    assert_eq!(renderer.source().invite_calls(), 1);
    assert_eq!(renderer.source().icon_calls(), 1);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let source = MemorySource {
        delay: Some(Duration::from_secs(5)),
        ..Default::default()
    }
    .with_invite("abc123", record("1", "Test Server", Some("abcdef"), &[]));
    let (renderer, _) = renderer(source);
    let renderer = renderer.with_timeout(Duration::from_millis(20));

    let err = renderer.render("abc123", "en", false).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { endpoint: Endpoint::Invite, ms: 20 }));
    assert!(!renderer.caches().invites.contains("abc123"));
}

#[tokio::test]
async fn test_shared_caches_span_renderers() {
    let caches = Arc::new(RenderCaches::new());
    let make = || {
        InviteRenderer::new(
            MemorySource::default()
                .with_invite("abc123", record("1", "Test Server", Some("abcdef"), &[])),
            Arc::new(RecordingGlyphs::default()),
            Arc::new(LocaleTable::builtin().unwrap()),
            caches.clone(),
        )
        .unwrap()
    };

    let a = make();
    let b = make();
    a.render("abc123", "en", false).await.unwrap();
    b.render("abc123", "en", false).await.unwrap();

    assert_eq!(a.source().invite_calls(), 1);
    assert_eq!(b.source().invite_calls(), 0);
    assert_eq!(b.source().icon_calls(), 0);
}
