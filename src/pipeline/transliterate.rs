//! Line transliteration: Scrapbox markup → esa Markdown, one line at a time.
//!
//! A raw Scrapbox line goes through an indentation pass followed by eight
//! regex rewrites. Every pass is a pure `&str → String` function and every
//! regex pass replaces all non-overlapping matches in the line.
//!
//! ## Rule Order
//!
//! Order is part of the contract: indentation must be turned into tabs before
//! the list rule can see them, the in-site reference rule must run before the
//! emphasis rules, and the labeled-link rules must run before the image rule so
//! that `[label http://host/a.png]` becomes a link rather than an image.
//!
//! ## Quirks kept on purpose
//!
//! - A run of leading spaces immediately followed by a digit is dropped
//!   instead of becoming indentation (Scrapbox numbered-list convention).
//! - The image rule's "extension" is a character class: any URL whose last
//!   character before `]` is one of `p n g | j e` is treated as an image.

use crate::error::MigrateError;
use regex::Regex;
use std::borrow::Cow;
use tracing::debug;

/// Built-in rewrite rules: `(name, pattern, replacement)`, applied in order.
const RULES: [(&str, &str, &str); 8] = [
    // [#Other Page] → [***Other Page***](/#)
    // esa assigns post URLs by creation order, so the target is left for manual fixing.
    ("in_site_link", r"\[#([^\]]+)\]", "[***${1}***](/#)"),
    // [* text] → **text**
    ("strong", r"\[\* ([^\]]+)\]", "**${1}**"),
    // [** text], [*** text], … → ## text
    ("heading", r"\[\*\*+ (.+)\]", "## ${1}"),
    // <tabs>\t<text> → <tabs>* <text>
    ("list_item", r"^(\t*)\t(.*)$", "${1}* ${2}"),
    // [label http://…] → [label](http://…)
    ("link_label_first", r"\[(.+) (http[^ ]+)\]", "[${1}](${2})"),
    // [http://… label] → [label](http://…)
    ("link_url_first", r"\[(http[^ ]+) (.*)\]", "[${2}](${1})"),
    // `[png|jpeg|jpg]` is a character class, not an alternation.
    (
        "image",
        r"\[((https://gyazo\.com.+)|(http.*[png|jpeg|jpg]))\]",
        "![image](${1})",
    ),
    // [- text] → ~~text~~
    ("strikethrough", r"\[- ([^\]]+)\]", "~~${1}~~"),
];

/// One compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    /// Short identifier used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Replace every match in `line`. Returns `None` when nothing matched.
    fn apply(&self, line: &str) -> Option<String> {
        match self.pattern.replace_all(line, self.replacement) {
            Cow::Borrowed(_) => None,
            Cow::Owned(s) => Some(s),
        }
    }
}

/// The ordered rule set. Build it once per run and pass it by reference.
#[derive(Debug, Clone)]
pub struct Transliterator {
    rules: Vec<Rule>,
}

impl Transliterator {
    /// Compile the built-in rules.
    pub fn new() -> Result<Self, MigrateError> {
        let rules = RULES
            .iter()
            .map(|&(name, pattern, replacement)| {
                Regex::new(pattern)
                    .map(|pattern| Rule {
                        name,
                        pattern,
                        replacement,
                    })
                    .map_err(|source| MigrateError::InvalidPattern { rule: name, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Convert one Scrapbox line to one esa Markdown line. Never fails.
    pub fn transliterate(&self, raw: &str) -> String {
        let mut line = normalise_indentation(raw);
        for rule in &self.rules {
            if let Some(rewritten) = rule.apply(&line) {
                debug!(rule = rule.name, "rewrote {:?} -> {:?}", line, rewritten);
                line = rewritten;
            }
        }
        line
    }
}

// ── Indentation ──────────────────────────────────────────────────────────────

/// Replace the leading space run with the same number of tabs.
///
/// Counting stops at the first non-space. If that character is a digit the
/// count is reset to zero, so `"  3rd item"` loses its indentation entirely.
/// Leading spaces are always stripped.
pub fn normalise_indentation(line: &str) -> String {
    let mut depth = 0usize;
    for c in line.chars() {
        match c {
            ' ' => depth += 1,
            '0'..='9' => {
                depth = 0;
                break;
            }
            _ => break,
        }
    }
    let rest = line.trim_start_matches(' ');
    let mut out = String::with_capacity(depth + rest.len());
    out.push_str(&"\t".repeat(depth));
    out.push_str(rest);
    out
}

// ── Tests ────────────────────────────────────────────────────────────────────
