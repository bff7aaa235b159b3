use std::sync::LazyLock;

use regex::Regex;

/// Tail of previously scanned text kept for re-scanning, in characters.
/// Catches tags split across chunk boundaries; a tag whose text spans more
/// than this window between flushes goes undetected (accepted trade-off).
const TAIL_WINDOW: usize = 100;

static SINGLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<package>([^<]+)</package>").expect("valid pattern"));

static BLOCK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<packages>(.*?)</packages>").expect("valid pattern"));

/// Incremental scanner for `<package>` / `<packages>` declarations in
/// streamed model output.
///
/// Each chunk is scanned against the rolling tail of already-seen text plus
/// the chunk itself, so a tag straddling a chunk boundary still matches.
/// Names are trimmed and deduplicated case-sensitively, insertion order
/// preserved, for the lifetime of one request.
pub struct PackageScanner {
    tail: String,
    seen: Vec<String>,
}

impl PackageScanner {
    pub fn new() -> Self {
        Self {
            tail: String::new(),
            seen: Vec::new(),
        }
    }

    /// Scan one chunk of streamed text. Returns the names discovered for the
    /// first time, in the order they appeared.
    pub fn scan(&mut self, chunk: &str) -> Vec<String> {
        let search_text = format!("{}{}", self.tail, chunk);
        let mut found = Vec::new();

        for capture in SINGLE_TAG.captures_iter(&search_text) {
            self.record(capture[1].trim(), &mut found);
        }

        for capture in BLOCK_TAG.captures_iter(&search_text) {
            for name in capture[1].split(|c: char| c == ',' || c == '\n') {
                self.record(name.trim(), &mut found);
            }
        }

        self.tail = tail_chars(&search_text, TAIL_WINDOW);
        found
    }

    /// Every name discovered so far, in insertion order.
    pub fn packages(&self) -> &[String] {
        &self.seen
    }

    fn record(&mut self, name: &str, found: &mut Vec<String>) {
        if name.is_empty() {
            return;
        }
        if self.seen.iter().any(|seen| seen == name) {
            return;
        }
        self.seen.push(name.to_string());
        found.push(name.to_string());
    }
}

impl Default for PackageScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Last `max` characters of `text`, on a char boundary.
fn tail_chars(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        text.to_string()
    } else {
        text.chars().skip(count - max).collect()
    }
}
