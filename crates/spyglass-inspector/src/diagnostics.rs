#![forbid(unsafe_code)]

//! JSONL diagnostics and telemetry hooks for the inspector.
//!
//! Each entry gets a per-recorder sequence number and a timestamp in
//! microseconds since the recorder was created. In deterministic mode the
//! timestamp is `seq * 1000`, so two runs of the same scenario produce
//! byte-identical logs. Every entry carries an FNV-1a checksum of its
//! payload fields.
//!
//! Enable with `SPYGLASS_INSPECTOR_DIAGNOSTICS=true`; deterministic
//! timestamps with `SPYGLASS_INSPECTOR_DETERMINISTIC=true` (see
//! [`InspectorConfig`](crate::config::InspectorConfig)).

use std::io::Write;

use web_time::Instant;

use crate::decorate::DecoratorKind;

/// Diagnostic event types for JSONL logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticEventKind {
    /// The selection moved, or was cleared.
    SelectionChanged,
    /// The active decorator variant changed.
    DecoratorChanged,
    /// A decorator could not fully apply or remove its highlight.
    DecorationFailed,
    /// A panel stack was built.
    PanelsBuilt,
    /// A panel constructor failed.
    PanelsFailed,
    /// The tree mirror moved to a different root.
    MirrorRerooted,
    /// The inspector shut down.
    Shutdown,
}

impl DiagnosticEventKind {
    /// JSONL event type string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelectionChanged => "selection_changed",
            Self::DecoratorChanged => "decorator_changed",
            Self::DecorationFailed => "decoration_failed",
            Self::PanelsBuilt => "panels_built",
            Self::PanelsFailed => "panels_failed",
            Self::MirrorRerooted => "mirror_rerooted",
            Self::Shutdown => "shutdown",
        }
    }
}

/// JSONL diagnostic log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    /// Monotonic sequence number, assigned when recorded.
    pub seq: u64,
    /// Timestamp in microseconds, assigned when recorded.
    pub timestamp_us: u64,
    pub kind: DiagnosticEventKind,
    /// Label of the widget involved.
    pub target: Option<String>,
    /// Qualified type name of the widget involved.
    pub target_type: Option<String>,
    pub decorator: Option<DecoratorKind>,
    pub previous_decorator: Option<DecoratorKind>,
    pub panel_count: Option<usize>,
    /// Constructor that failed.
    pub panel: Option<String>,
    pub node_count: Option<usize>,
    /// Free-form detail, such as an error message.
    pub context: Option<String>,
    /// FNV-1a checksum of the payload fields.
    pub checksum: u64,
}

impl DiagnosticEntry {
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            seq: 0,
            timestamp_us: 0,
            kind,
            target: None,
            target_type: None,
            decorator: None,
            previous_decorator: None,
            panel_count: None,
            panel: None,
            node_count: None,
            context: None,
            checksum: 0,
        }
    }

    /// Set the widget label and type.
    #[must_use]
    pub fn with_target(mut self, label: impl Into<String>, type_name: &str) -> Self {
        self.target = Some(label.into());
        self.target_type = Some(type_name.to_string());
        self
    }

    #[must_use]
    pub fn with_decorator(mut self, kind: DecoratorKind) -> Self {
        self.decorator = Some(kind);
        self
    }

    #[must_use]
    pub fn with_previous_decorator(mut self, kind: DecoratorKind) -> Self {
        self.previous_decorator = Some(kind);
        self
    }

    #[must_use]
    pub fn with_panel_count(mut self, count: usize) -> Self {
        self.panel_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_panel(mut self, name: impl Into<String>) -> Self {
        self.panel = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_node_count(mut self, count: usize) -> Self {
        self.node_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Compute and set the checksum.
    #[must_use]
    pub fn with_checksum(mut self) -> Self {
        self.checksum = self.compute_checksum();
        self
    }

    /// FNV-1a over the payload fields. Sequence and time are excluded.
    fn compute_checksum(&self) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        let payload = format!(
            "{:?}{:?}{:?}{:?}{:?}{:?}{:?}{:?}{:?}",
            self.kind,
            self.target.as_deref().unwrap_or(""),
            self.target_type.as_deref().unwrap_or(""),
            self.decorator.map(DecoratorKind::as_str).unwrap_or(""),
            self.previous_decorator.map(DecoratorKind::as_str).unwrap_or(""),
            self.panel_count.unwrap_or(0),
            self.panel.as_deref().unwrap_or(""),
            self.node_count.unwrap_or(0),
            self.context.as_deref().unwrap_or("")
        );
        for &b in payload.as_bytes() {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }

    /// Format as one JSON object on a single line.
    pub fn to_jsonl(&self) -> String {
        let mut parts = vec![
            format!("\"seq\":{}", self.seq),
            format!("\"ts_us\":{}", self.timestamp_us),
            format!("\"kind\":\"{}\"", self.kind.as_str()),
        ];

        if let Some(ref target) = self.target {
            parts.push(format!("\"target\":\"{}\"", escape(target)));
        }
        if let Some(ref ty) = self.target_type {
            parts.push(format!("\"target_type\":\"{}\"", escape(ty)));
        }
        if let Some(kind) = self.decorator {
            parts.push(format!("\"decorator\":\"{}\"", kind.as_str()));
        }
        if let Some(kind) = self.previous_decorator {
            parts.push(format!("\"prev_decorator\":\"{}\"", kind.as_str()));
        }
        if let Some(count) = self.panel_count {
            parts.push(format!("\"panel_count\":{count}"));
        }
        if let Some(ref panel) = self.panel {
            parts.push(format!("\"panel\":\"{}\"", escape(panel)));
        }
        if let Some(count) = self.node_count {
            parts.push(format!("\"node_count\":{count}"));
        }
        if let Some(ref ctx) = self.context {
            parts.push(format!("\"context\":\"{}\"", escape(ctx)));
        }
        parts.push(format!("\"checksum\":\"{:016x}\"", self.checksum));

        format!("{{{}}}", parts.join(","))
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}

/// Diagnostic log collector.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<DiagnosticEntry>,
    max_entries: usize,
    write_stderr: bool,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 5000,
            write_stderr: false,
        }
    }

    /// Also write every entry to stderr.
    #[must_use]
    pub fn with_stderr(mut self) -> Self {
        self.write_stderr = true;
        self
    }

    /// Keep at most `max` entries, dropping the oldest. `0` is unbounded.
    #[must_use]
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    pub fn record(&mut self, entry: DiagnosticEntry) {
        if self.write_stderr {
            let _ = writeln!(std::io::stderr(), "{}", entry.to_jsonl());
        }
        if self.max_entries > 0 && self.entries.len() >= self.max_entries {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn entries_of_kind(&self, kind: DiagnosticEventKind) -> Vec<&DiagnosticEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export all entries, one per line.
    pub fn to_jsonl(&self) -> String {
        self.entries
            .iter()
            .map(DiagnosticEntry::to_jsonl)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Callback invoked with each recorded entry.
pub type TelemetryCallback = Box<dyn Fn(&DiagnosticEntry)>;

/// Observers for inspector events.
#[derive(Default)]
pub struct TelemetryHooks {
    on_selection_change: Option<TelemetryCallback>,
    on_decorator_change: Option<TelemetryCallback>,
    on_failure: Option<TelemetryCallback>,
    on_any_event: Option<TelemetryCallback>,
}

impl std::fmt::Debug for TelemetryHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryHooks")
            .field("on_selection_change", &self.on_selection_change.is_some())
            .field("on_decorator_change", &self.on_decorator_change.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .field("on_any_event", &self.on_any_event.is_some())
            .finish()
    }
}

impl TelemetryHooks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_selection_change(mut self, f: impl Fn(&DiagnosticEntry) + 'static) -> Self {
        self.on_selection_change = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_decorator_change(mut self, f: impl Fn(&DiagnosticEntry) + 'static) -> Self {
        self.on_decorator_change = Some(Box::new(f));
        self
    }

    /// Decoration and panel construction failures.
    #[must_use]
    pub fn on_failure(mut self, f: impl Fn(&DiagnosticEntry) + 'static) -> Self {
        self.on_failure = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_any(mut self, f: impl Fn(&DiagnosticEntry) + 'static) -> Self {
        self.on_any_event = Some(Box::new(f));
        self
    }

    fn dispatch(&self, entry: &DiagnosticEntry) {
        if let Some(ref cb) = self.on_any_event {
            cb(entry);
        }

        let specific = match entry.kind {
            DiagnosticEventKind::SelectionChanged => &self.on_selection_change,
            DiagnosticEventKind::DecoratorChanged => &self.on_decorator_change,
            DiagnosticEventKind::DecorationFailed | DiagnosticEventKind::PanelsFailed => {
                &self.on_failure
            }
            _ => &None,
        };
        if let Some(cb) = specific {
            cb(entry);
        }
    }
}

/// Stamps entries and fans them out to the log and the hooks.
///
/// Does nothing when neither a log nor hooks are installed.
#[derive(Debug)]
pub struct Diagnostics {
    log: Option<DiagnosticLog>,
    hooks: Option<TelemetryHooks>,
    next_seq: u64,
    deterministic: bool,
    start: Instant,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Diagnostics {
    pub fn disabled() -> Self {
        Self {
            log: None,
            hooks: None,
            next_seq: 0,
            deterministic: false,
            start: Instant::now(),
        }
    }

    #[must_use]
    pub fn with_log(mut self, log: DiagnosticLog) -> Self {
        self.log = Some(log);
        self
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: TelemetryHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Use `seq * 1000` as the timestamp.
    #[must_use]
    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    pub fn is_active(&self) -> bool {
        self.log.is_some() || self.hooks.is_some()
    }

    pub fn log(&self) -> Option<&DiagnosticLog> {
        self.log.as_ref()
    }

    pub fn log_mut(&mut self) -> Option<&mut DiagnosticLog> {
        self.log.as_mut()
    }

    pub fn set_hooks(&mut self, hooks: Option<TelemetryHooks>) {
        self.hooks = hooks;
    }

    /// Stamp, checksum, dispatch and store an entry.
    pub fn record(&mut self, entry: DiagnosticEntry) {
        if !self.is_active() {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        let mut entry = entry.with_checksum();
        entry.seq = seq;
        entry.timestamp_us = if self.deterministic {
            seq.saturating_mul(1_000)
        } else {
            u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX)
        };

        if let Some(ref hooks) = self.hooks {
            hooks.dispatch(&entry);
        }
        if let Some(ref mut log) = self.log {
            log.record(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> Diagnostics {
        Diagnostics::disabled()
            .with_log(DiagnosticLog::new())
            .deterministic(true)
    }

    #[test]
    fn deterministic_stamps() {
        let mut diag = recorder();
        diag.record(DiagnosticEntry::new(DiagnosticEventKind::SelectionChanged));
        diag.record(DiagnosticEntry::new(DiagnosticEventKind::Shutdown));
        let entries = diag.log().unwrap().entries();
        assert_eq!((entries[0].seq, entries[0].timestamp_us), (0, 0));
        assert_eq!((entries[1].seq, entries[1].timestamp_us), (1, 1000));
    }

    #[test]
    fn checksum_ignores_sequence() {
        let a = DiagnosticEntry::new(DiagnosticEventKind::PanelsBuilt)
            .with_panel_count(4)
            .with_checksum();
        let mut b = a.clone();
        b.seq = 9;
        assert_eq!(a.checksum, b.clone().with_checksum().checksum);
        let c = DiagnosticEntry::new(DiagnosticEventKind::PanelsBuilt)
            .with_panel_count(5)
            .with_checksum();
        assert_ne!(a.checksum, c.checksum);
    }

    #[test]
    fn jsonl_escapes_strings() {
        let entry = DiagnosticEntry::new(DiagnosticEventKind::SelectionChanged)
            .with_target("say \"hi\"\n", "demo.Button")
            .with_decorator(DecoratorKind::Border);
        let line = entry.to_jsonl();
        assert!(line.starts_with("{\"seq\":0,\"ts_us\":0,\"kind\":\"selection_changed\""));
        assert!(line.contains("\"target\":\"say \\\"hi\\\"\\n\""));
        assert!(line.contains("\"decorator\":\"Border\""));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn log_drops_oldest_past_capacity() {
        let mut log = DiagnosticLog::new().with_max_entries(2);
        for kind in [
            DiagnosticEventKind::SelectionChanged,
            DiagnosticEventKind::DecoratorChanged,
            DiagnosticEventKind::Shutdown,
        ] {
            log.record(DiagnosticEntry::new(kind));
        }
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].kind, DiagnosticEventKind::DecoratorChanged);
        assert_eq!(log.entries_of_kind(DiagnosticEventKind::Shutdown).len(), 1);
    }

    #[test]
    fn hooks_receive_matching_kinds() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let any = Rc::new(RefCell::new(0));
        let hooks = {
            let seen = seen.clone();
            let any = any.clone();
            TelemetryHooks::new()
                .on_failure(move |e| seen.borrow_mut().push(e.kind))
                .on_any(move |_| *any.borrow_mut() += 1)
        };
        let mut diag = Diagnostics::disabled().with_hooks(hooks);
        diag.record(DiagnosticEntry::new(DiagnosticEventKind::SelectionChanged));
        diag.record(DiagnosticEntry::new(DiagnosticEventKind::PanelsFailed));
        diag.record(DiagnosticEntry::new(DiagnosticEventKind::DecorationFailed));
        assert_eq!(
            *seen.borrow(),
            [
                DiagnosticEventKind::PanelsFailed,
                DiagnosticEventKind::DecorationFailed
            ]
        );
        assert_eq!(*any.borrow(), 3);
    }

    #[test]
    fn disabled_recorder_is_inert() {
        let mut diag = Diagnostics::disabled();
        diag.record(DiagnosticEntry::new(DiagnosticEventKind::Shutdown));
        assert!(diag.log().is_none());
        assert!(!diag.is_active());
    }
}
