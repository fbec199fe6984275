//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT sleep to wait for state changes. The
//! card's timeline advances only through `RevealScheduler::after`, and a
//! renderer learns about progress by pulling a snapshot.
//!
//! **Exceptions**: the timer primitive in `genblock/core/src/reveal.rs`,
//! frame rate limiting in `tui/src/app.rs`, and test code.

use std::path::Path;

use architectural_enforcement::{code_part, scan, Violation};

fn calls_sleep(line: &str) -> bool {
    let code = code_part(line);
    code.contains("::sleep(") || code.contains(".sleep(") || code.contains("sleep_until(")
}

/// Check if sleep is used for frame rate limiting
fn is_frame_limiting_context(lines: &[(usize, &str)], current_idx: usize) -> bool {
    let context = current_idx.saturating_sub(10)..(current_idx + 5).min(lines.len());
    lines[context].iter().any(|(_, line)| {
        let line = line.to_lowercase();
        line.contains("frame") || line.contains("fps")
    })
}

fn find_sleep_violations() -> Vec<Violation> {
    let mut violations = scan("genblock/core/src", |path: &Path, lines, idx| {
        calls_sleep(lines[idx].1) && !path.ends_with("genblock/core/src/reveal.rs")
    });

    violations.extend(scan("tui/src", |path: &Path, lines, idx| {
        calls_sleep(lines[idx].1)
            && !(path.ends_with("tui/src/app.rs") && is_frame_limiting_context(lines, idx))
    }));

    violations
}

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nSchedule work with RevealScheduler::after and pull snapshots instead.");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

#[test]
fn test_timer_primitive_is_the_only_core_sleeper() {
    let sleepers = scan("genblock/core/src", |_, lines, idx| calls_sleep(lines[idx].1));
    assert!(
        sleepers
            .iter()
            .all(|v| v.path.ends_with("genblock/core/src/reveal.rs")),
        "unexpected sleepers: {sleepers:?}"
    );
    assert!(!sleepers.is_empty(), "reveal.rs should own the delay primitive");
}

#[test]
fn test_frame_limiting_detection() {
    let code = vec![
        (1, "fn render_loop() {"),
        (2, "    let frame_duration = Duration::from_millis(33);"),
        (3, "    loop {"),
        (4, "        tokio::time::sleep(frame_duration).await;"),
        (5, "    }"),
    ];
    assert!(calls_sleep(code[3].1));
    assert!(is_frame_limiting_context(&code, 3));
}

#[test]
fn test_commented_sleep_is_ignored() {
    assert!(!calls_sleep("// tokio::time::sleep(d).await"));
}
