//! Integration Test: Renderer Purity
//!
//! **Policy**: Renderers draw solely from a `CardSnapshot`. Widgets and the
//! dashboard host may not read a clock, and the core crate may not depend
//! on any terminal library.

use std::fs;

use architectural_enforcement::{code_part, scan, workspace_root};

/// Tokens that mean a renderer is keeping time
const CLOCK_TOKENS: &[&str] = &["Instant", "SystemTime", "sleep", "interval("];

fn reads_clock(line: &str) -> bool {
    let code = code_part(line);
    CLOCK_TOKENS.iter().any(|token| code.contains(token))
}

#[test]
fn test_widgets_never_read_a_clock() {
    let mut violations = scan("tui/src/widgets", |_, lines, idx| reads_clock(lines[idx].1));
    violations.extend(scan("tui/src/dashboard.rs", |_, lines, idx| {
        reads_clock(lines[idx].1)
    }));

    assert!(
        violations.is_empty(),
        "renderers must draw from the snapshot only:\n{}",
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[test]
fn test_core_has_no_terminal_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("genblock/core/Cargo.toml"))
        .expect("core manifest should be readable");

    for forbidden in ["ratatui", "crossterm", "arboard"] {
        assert!(
            !manifest.contains(forbidden),
            "genblock-core must not depend on {forbidden}"
        );
    }

    let uses = scan("genblock/core/src", |_, lines, idx| {
        let code = code_part(lines[idx].1);
        code.contains("ratatui::") || code.contains("crossterm::")
    });
    assert!(uses.is_empty(), "terminal code in core: {uses:?}");
}
