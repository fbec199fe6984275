//! Render Tests for the Card Dashboard
//!
//! These tests drive the [`App`] against a real card engine and draw into a
//! ratatui `TestBackend`, checking what ends up on screen.
//!
//! # Test Coverage
//!
//! 1. **Idle card**: heading, summary, content, chips and footer controls
//! 2. **Regeneration**: content hidden mid-session, new units after commit
//! 3. **Host controls**: kind toggle, copy feedback, clipboard failure
//! 4. **Quit**: the engine is torn down
//!
//! The tokio clock is paused, so every phase boundary is exact.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use genblock_core::{
    CardConfig, CardEngine, ClipboardError, ContentKind, EngineError, MemoryClipboard, Phase,
    SamplePools, SampleProvider,
};
use genblock_tui::dashboard::content_for;
use genblock_tui::widgets::card::{COPIED_LABEL, FOOTER_LABEL, REGENERATE_LABEL};
use genblock_tui::{App, Dashboard};

// ============================================================================
// Helpers
// ============================================================================

async fn app_with(clipboard: MemoryClipboard) -> App {
    let config = CardConfig::default().with_samples(SamplePools {
        paragraph: vec!["Regenerated paragraph".to_string()],
        bullet: vec!["Regenerated bullet".to_string()],
    });
    let dashboard = Dashboard::new(ContentKind::Paragraph);
    let provider = SampleProvider::seeded(config.samples.clone(), 5).unwrap();
    let (engine, card) =
        CardEngine::with_provider(config, dashboard.block(), provider, clipboard).unwrap();
    engine.spawn();
    App::new(card, dashboard).await.unwrap()
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();

    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

async fn press(app: &mut App, c: char) {
    app.handle_key(key(c)).await.unwrap();
    app.refresh().await.unwrap();
}

async fn advance(app: &mut App, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    app.refresh().await.unwrap();
}

// ============================================================================
// Idle Card
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_idle_card_renders_everything() {
    let app = app_with(MemoryClipboard::new()).await;
    let screen = screen(&app);

    assert!(screen.contains("Dynamic Content Display"));
    assert!(screen.contains("Content displayed in paragraph format."));
    assert!(screen.contains("Artificial Intelligence has revolutionized"));
    assert!(screen.contains("[Generate more content]"));
    assert!(screen.contains("[Summarize content]"));
    assert!(screen.contains(FOOTER_LABEL));
    assert!(screen.contains("Copy"));
    assert!(screen.contains(REGENERATE_LABEL));
    assert!(screen.contains("Paragraph"));
    assert!(screen.contains("Bullet Points"));
}

// ============================================================================
// Regeneration
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_regeneration_hides_then_replaces_content() {
    let mut app = app_with(MemoryClipboard::new()).await;

    press(&mut app, 'r').await;
    assert_eq!(app.snapshot().phase, Phase::HeaderCollapsing);

    // Content hidden, header collapsed (summary gone)
    advance(&mut app, 450).await;
    let hidden = screen(&app);
    assert!(hidden.contains("Dynamic Content Display"));
    assert!(!hidden.contains("Content displayed in paragraph format."));
    assert!(!hidden.contains("Artificial Intelligence"));

    advance(&mut app, 10_000).await;
    assert_eq!(app.snapshot().phase, Phase::Idle);
    let done = screen(&app);
    assert!(done.contains("Regenerated paragraph"));
    assert!(!done.contains("Artificial Intelligence"));
    assert!(done.contains("Content displayed in paragraph format."));
}

#[tokio::test(start_paused = true)]
async fn test_typing_unit_is_partial() {
    let mut app = app_with(MemoryClipboard::new()).await;

    press(&mut app, 'r').await;
    // Reveal(0) starts at 600ms; 10 characters in at 30ms each
    advance(&mut app, 900).await;
    assert_eq!(app.snapshot().phase, Phase::RevealingItem(0));

    let screen = screen(&app);
    assert!(screen.contains("Regenerate▌"));
    assert!(!screen.contains("Regenerated paragraph"));
}

// ============================================================================
// Host Controls
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_kind_toggle_swaps_content() {
    let mut app = app_with(MemoryClipboard::new()).await;

    press(&mut app, 'b').await;
    assert_eq!(app.dashboard().kind(), ContentKind::BulletList);
    assert_eq!(
        app.snapshot().visible_units,
        content_for(ContentKind::BulletList).units
    );

    let screen = screen(&app);
    assert!(screen.contains("Content displayed in bullet point format."));
    assert!(screen.contains("• AI revolutionizes content creation"));
}

#[tokio::test(start_paused = true)]
async fn test_kind_toggle_disabled_while_busy() {
    let mut app = app_with(MemoryClipboard::new()).await;

    press(&mut app, 'r').await;
    press(&mut app, 'b').await;
    assert_eq!(app.dashboard().kind(), ContentKind::Paragraph);

    advance(&mut app, 10_000).await;
    assert_eq!(app.snapshot().kind, ContentKind::Paragraph);
}

#[tokio::test(start_paused = true)]
async fn test_copy_shows_feedback() {
    let clipboard = MemoryClipboard::new();
    let mut app = app_with(clipboard.clone()).await;

    press(&mut app, 'c').await;
    assert!(screen(&app).contains(COPIED_LABEL));
    assert_eq!(
        clipboard.contents(),
        Some(content_for(ContentKind::Paragraph).copy_text())
    );

    advance(&mut app, 2500).await;
    assert!(!screen(&app).contains(COPIED_LABEL));
}

#[tokio::test(start_paused = true)]
async fn test_clipboard_failure_shows_notice() {
    let clipboard = MemoryClipboard::failing(ClipboardError::Unavailable("no display".into()));
    let mut app = app_with(clipboard).await;

    press(&mut app, 'c').await;
    assert_eq!(app.notice(), Some("Clipboard unavailable: no display"));
    assert!(screen(&app).contains("Clipboard unavailable: no display"));
    assert_eq!(app.snapshot().phase, Phase::Idle);

    // The notice is transient, even with no working clipboard
    press(&mut app, 'r').await;
    advance(&mut app, 60_000).await;
    assert_eq!(app.snapshot().phase, Phase::Idle);
    assert_eq!(app.notice(), None);
    assert!(!screen(&app).contains("Clipboard unavailable"));
}

// ============================================================================
// Quit
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_quit_shuts_engine_down() {
    let mut app = app_with(MemoryClipboard::new()).await;

    press(&mut app, 'r').await;
    tokio_test::assert_ok!(app.handle_key(key('q')).await);
    assert!(!app.is_running());

    // Let the engine task finish
    tokio::task::yield_now().await;
    assert_eq!(app.refresh().await.unwrap_err(), EngineError::Closed);
}
