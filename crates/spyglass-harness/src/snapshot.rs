#![forbid(unsafe_code)]

//! Text snapshot assertions.
//!
//! Snapshots live under `tests/snapshots/<name>.snap` relative to the
//! caller's `CARGO_MANIFEST_DIR`. Run with `BLESS=1` to create or update them.
//! Trailing whitespace on each line is ignored, as is a final newline.

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

fn trim_trailing(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lines that differ, numbered from 1. Empty when the inputs match.
///
/// Each differing position yields a `-` line from `expected` and a `+` line
/// from `actual`; a side that ran out of lines contributes nothing.
pub fn diff_text(expected: &str, actual: &str) -> String {
    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();

    let mut out = String::new();
    for i in 0..expected.len().max(actual.len()) {
        let (e, a) = (expected.get(i), actual.get(i));
        if e == a {
            continue;
        }
        if let Some(e) = e {
            let _ = writeln!(out, "{:>4} -{e}", i + 1);
        }
        if let Some(a) = a {
            let _ = writeln!(out, "{:>4} +{a}", i + 1);
        }
    }
    out
}

fn snapshot_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir
        .join("tests")
        .join("snapshots")
        .join(format!("{name}.snap"))
}

fn is_bless() -> bool {
    std::env::var("BLESS").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Compare `actual` with the stored text. `Err` carries the report.
fn check(path: &Path, name: &str, actual: &str) -> Result<(), String> {
    let stored = match std::fs::read_to_string(path) {
        Ok(stored) => stored,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(format!(
                "no snapshot '{name}' at {}; run with BLESS=1 to create it.\n\n{actual}",
                path.display()
            ));
        }
        Err(e) => return Err(format!("cannot read snapshot {}: {e}", path.display())),
    };
    let diff = diff_text(&trim_trailing(&stored), &trim_trailing(actual));
    if diff.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "snapshot '{name}' differs ({}); BLESS=1 updates it.\n\n{diff}",
            path.display()
        ))
    }
}

/// Assert that `actual` matches the stored snapshot `name`.
///
/// # Panics
///
/// When the snapshot is missing or differs, unless `BLESS=1` is set, in which
/// case the snapshot is (re)written.
pub fn assert_text_snapshot(name: &str, actual: &str, base_dir: &str) {
    let path = snapshot_path(Path::new(base_dir), name);
    if is_bless() {
        let written = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::write(&path, format!("{}\n", trim_trailing(actual))));
        if let Err(e) = written {
            panic!("cannot write snapshot {}: {e}", path.display());
        }
        return;
    }
    if let Err(report) = check(&path, name, actual) {
        panic!("{report}");
    }
}

/// Compare text against a stored snapshot of the calling crate.
///
/// ```ignore
/// assert_snapshot!("mirror_list_selected", &lines.join("\n"));
/// ```
#[macro_export]
macro_rules! assert_snapshot {
    ($name:expr, $text:expr) => {
        $crate::snapshot::assert_text_snapshot($name, $text, env!("CARGO_MANIFEST_DIR"))
    };
}
