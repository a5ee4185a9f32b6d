//! Line-oriented settings document and the remove-then-append patch operation.
//!
//! Frostbite settings files (`BootOptions`, `ProfileOptions_profile`,
//! `Scripts/Win32Game.cfg`) are plain text with one setting per line: the
//! dotted setting name comes first, the value follows the first run of
//! whitespace.  Lines that do not look like settings (blank lines, comments)
//! are carried through untouched.
//!
//! Patching a key means *removing every line whose first token is that key*
//! and then *appending a single fresh line* at the end of the document.
//! That formulation has two properties the fix relies on:
//!
//! - It is idempotent: running the fix twice leaves the file identical to
//!   running it once.
//! - It collapses duplicate key lines (which the game itself sometimes
//!   writes) into exactly one authoritative line.

use serde::{Deserialize, Serialize};

/// One `key value` assignment to apply to a settings document.
///
/// The key is a dotted setting name such as `GstRender.Dx12Enabled`; the
/// value is kept as an opaque string because the game parses each setting
/// with its own rules (`1`, `1.200000`, `512`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEdit {
    pub key: String,
    pub value: String,
}

impl SettingEdit {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Renders the edit as the settings line that will be appended.
    fn line(&self) -> String {
        format!("{} {}", self.key, self.value)
    }
}

/// An ordered group of edits applied to one document as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBatch {
    edits: Vec<SettingEdit>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a batch from `(key, value)` pairs, preserving order.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            edits: pairs
                .iter()
                .map(|(k, v)| SettingEdit::new(*k, *v))
                .collect(),
        }
    }

    pub fn push(&mut self, edit: SettingEdit) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[SettingEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Returns `true` if any edit in the batch targets `key`.
    fn contains_key(&self, key: &str) -> bool {
        self.edits.iter().any(|e| e.key == key)
    }
}

/// A settings file held in memory as an ordered sequence of lines.
///
/// # Line model
///
/// The document is split on `\n`.  A `\r` preceding a split point stays
/// attached to its line, so untouched CRLF content round-trips byte-exact
/// (token matching is unaffected because `\r` counts as whitespace).  A
/// single trailing newline is recorded as a flag rather than an empty final
/// line; this keeps appended settings adjacent to the last real line instead
/// of landing after a phantom blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsDocument {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl SettingsDocument {
    /// Creates an empty document (renders as the empty string).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a settings file body into a document.
    ///
    /// `parse` followed by [`render`](Self::render) reproduces the input
    /// byte-for-byte.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        let trailing_newline = text.ends_with('\n');
        let body = if trailing_newline {
            &text[..text.len() - 1]
        } else {
            text
        };
        Self {
            lines: body.split('\n').map(str::to_string).collect(),
            trailing_newline,
        }
    }

    /// Renders the document back to the on-disk text form.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    /// Applies an edit batch: for each key in the batch, every line whose
    /// first whitespace-delimited token equals that key exactly is removed,
    /// then one line per edit is appended in batch order.
    ///
    /// When a batch repeats a key, only the last occurrence is appended, so
    /// the batch-internal last write wins.  Applying the same batch twice
    /// yields a document equal to applying it once.
    pub fn apply(&mut self, batch: &EditBatch) {
        if batch.is_empty() {
            return;
        }
        self.lines.retain(|line| match first_token(line) {
            Some(token) => !batch.contains_key(token),
            None => true,
        });
        let edits = batch.edits();
        for (i, edit) in edits.iter().enumerate() {
            let overridden = edits[i + 1..].iter().any(|later| later.key == edit.key);
            if !overridden {
                self.lines.push(edit.line());
            }
        }
    }

    /// Consuming variant of [`apply`](Self::apply), handy for building
    /// documents from scratch.
    pub fn applied(mut self, batch: &EditBatch) -> Self {
        self.apply(batch);
        self
    }

    /// Appends a raw line verbatim (used for comment headers in generated
    /// profiles).
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Returns the value of the last line whose first token equals `key`,
    /// with surrounding whitespace trimmed.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| {
            let (token, rest) = split_setting(line)?;
            (token == key).then(|| rest.trim())
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Returns the first whitespace-delimited token of a line, if any.
fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Splits a line into its first token and the remainder after the first run
/// of whitespace.  Returns `None` for blank lines and key-only lines.
fn split_setting(line: &str) -> Option<(&str, &str)> {
    line.trim_start().split_once(char::is_whitespace)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
