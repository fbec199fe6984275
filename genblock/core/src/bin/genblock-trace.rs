//! Genblock Trace - Headless Regeneration Runner
//!
//! Drives one card through one or more regeneration sessions with no
//! surface attached and prints every snapshot change, as a renderer would
//! have drawn it at that moment.
//!
//! # Usage
//!
//! ```bash
//! # One paragraph session with default timing
//! genblock-trace
//!
//! # Three bullet sessions, one JSON snapshot per line
//! genblock-trace --kind bullet --sessions 3 --json
//!
//! # Faster typing
//! genblock-trace --base-reveal-ms 100 --per-char-reveal-ms 5
//!
//! # Verbose logging
//! RUST_LOG=genblock_core=debug genblock-trace
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use genblock_core::{
    load_config_from_path, CardSnapshot, ConfigOverrides, ContentBlock, ContentKind,
    Orchestrator, Phase, TimerFired, TriggerOutcome,
};

/// Genblock Trace - run regeneration sessions without a surface
#[derive(Parser, Debug)]
#[command(name = "genblock-trace")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "GENBLOCK_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Content kind (paragraph, bullet)
    #[arg(short = 'k', long, value_name = "KIND")]
    kind: Option<String>,

    /// Number of units in the initial content (defaults to the pool size)
    #[arg(short = 'u', long, value_name = "N")]
    units: Option<usize>,

    /// Number of back-to-back regeneration sessions
    #[arg(short = 's', long, default_value_t = 1)]
    sessions: usize,

    /// Base delay of every unit reveal, in milliseconds
    #[arg(long, value_name = "MS")]
    base_reveal_ms: Option<u64>,

    /// Per-character reveal delay, in milliseconds
    #[arg(long, value_name = "MS")]
    per_char_reveal_ms: Option<u64>,

    /// Print each snapshot as a JSON line
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "GENBLOCK_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

fn initial_block(kind: ContentKind, pool: &[String], units: Option<usize>) -> ContentBlock {
    let units = match units {
        Some(n) => pool.iter().cycle().take(n).cloned().collect(),
        None => pool.to_vec(),
    };
    ContentBlock::new("Dynamic Content Display", kind, units)
        .with_summary(format!("Content displayed in {} format.", kind.label()))
}

fn print_snapshot(start: Instant, snapshot: &CardSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
        return Ok(());
    }

    let elapsed = start.elapsed().as_millis();
    println!(
        "{elapsed:>7}ms  {:<14} units={} header={} content={}",
        snapshot.phase.to_string(),
        snapshot.visible_units.len(),
        if snapshot.header_collapsed { "collapsed" } else { "expanded" },
        if snapshot.content_visible { "visible" } else { "hidden" },
    );
    if snapshot.phase == Phase::Idle {
        for unit in &snapshot.visible_units {
            println!("           - {unit}");
        }
    }
    Ok(())
}

/// Drive the running session to Idle, passing each changed snapshot to `emit`
async fn trace_session(
    orchestrator: &mut Orchestrator,
    timers: &mut mpsc::UnboundedReceiver<TimerFired>,
    last: &mut CardSnapshot,
    mut emit: impl FnMut(&CardSnapshot) -> Result<()>,
) -> Result<()> {
    while orchestrator.is_busy() {
        let Some(fired) = timers.recv().await else { break };
        if !orchestrator.on_timer(fired) {
            continue;
        }
        // Committing restores the header without changing phase
        let snapshot = orchestrator.snapshot();
        if snapshot != *last {
            emit(&snapshot)?;
            *last = snapshot;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("genblock_trace={}", args.log_level).parse()?)
                .add_directive(format!("genblock_core={}", args.log_level).parse()?),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config_from_path(args.config.clone()).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ref kind) = args.kind {
        let kind = ContentKind::parse(kind)
            .with_context(|| format!("Unknown content kind: {kind}"))?;
        overrides = overrides.with_kind(kind);
    }
    if let Some(ms) = args.base_reveal_ms {
        overrides = overrides.with_base_reveal_ms(ms);
    }
    if let Some(ms) = args.per_char_reveal_ms {
        overrides = overrides.with_per_character_reveal_ms(ms);
    }
    overrides.apply(&mut config).context("Invalid command-line override")?;

    info!(source = %config.source(), kind = %config.kind, "Configuration loaded");

    let block = initial_block(config.kind, config.samples.pool(config.kind), args.units);
    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(config, block, timer_tx)?;

    let start = Instant::now();
    let mut last = orchestrator.snapshot();
    print_snapshot(start, &last, args.json)?;

    for session in 1..=args.sessions {
        if let TriggerOutcome::Rejected { phase } = orchestrator.regenerate() {
            warn!(session, %phase, "Regenerate rejected");
            continue;
        }
        last = orchestrator.snapshot();
        print_snapshot(start, &last, args.json)?;

        let interrupted = tokio::select! {
            result = trace_session(&mut orchestrator, &mut timer_rx, &mut last, |snapshot| {
                print_snapshot(start, snapshot, args.json)
            }) => {
                result?;
                false
            }
            _ = tokio::signal::ctrl_c() => true,
        };
        if interrupted {
            info!("Interrupted, tearing down");
            orchestrator.teardown();
            return Ok(());
        }
    }

    orchestrator.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use genblock_core::{CardConfig, SamplePools, SampleProvider};

    #[tokio::test(start_paused = true)]
    async fn test_trace_emits_header_restore_within_commit() {
        let config = CardConfig::default().with_samples(SamplePools {
            paragraph: vec!["Alpha".to_string()],
            bullet: vec!["Beta".to_string()],
        });
        let provider = SampleProvider::seeded(config.samples.clone(), 3).unwrap();
        let block = ContentBlock::new("Card", ContentKind::Paragraph, vec!["A".to_string()]);
        let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
        let mut orchestrator =
            Orchestrator::with_provider(config, block, provider, timer_tx).unwrap();

        orchestrator.regenerate();
        let mut last = orchestrator.snapshot();
        let mut emitted = Vec::new();
        trace_session(&mut orchestrator, &mut timer_rx, &mut last, |snapshot| {
            emitted.push((snapshot.phase, snapshot.header_collapsed));
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            emitted,
            vec![
                (Phase::Generating, true),
                (Phase::RevealingItem(0), true),
                (Phase::Committing, true),
                (Phase::Committing, false),
                (Phase::Idle, false),
            ]
        );
    }
}
