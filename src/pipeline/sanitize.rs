//! Sanitisation: rendered bill HTML → ordered, trimmed text lines.
//!
//! The bill template renderer produces styled HTML (fonts, tables, inline
//! CSS). Messaging channels accept only plain text, so the first stage
//! strips all markup down to the visual line sequence the classifier works
//! on. Five cheap passes run in a defined order: style/script bodies must go
//! before the generic tag strip (their text content is not bill text), and
//! entity decoding must precede whitespace collapsing so a decoded `&nbsp;`
//! collapses like any other space.
//!
//! Block-level tags (`<p>`, `<div>`, headings, table rows …) mark visual
//! line boundaries and turn into line breaks; inline tags turn into a plain
//! space. The distinction is what lets the classifier see one bill line per
//! visual line even when the template renderer emits the whole bill on a
//! single line of HTML.
//!
//! There are no error conditions. Malformed HTML — unclosed tags, stray
//! angle brackets, unknown entities — degrades to noisier lines, never to a
//! failure.

use once_cell::sync::Lazy;
use regex::Regex;

/// Strip markup and collapse whitespace, returning the bill's visual lines.
///
/// Passes (applied in order):
/// 1. Remove `<style>` and `<script>` blocks, bodies included
/// 2. Replace block-level tags with a line break, every other tag with a
///    single space
/// 3. Decode the fixed entity set the template renderer emits
/// 4. Collapse whitespace runs and blank-line runs
/// 5. Split into trimmed, non-empty lines
pub fn sanitize(html: &str) -> Vec<String> {
    let s = strip_style_and_script(html);
    let s = strip_tags(&s);
    let s = decode_entities(&s);
    let s = collapse_whitespace(&s);
    split_lines(&s)
}

// ── Pass 1: Remove style/script blocks ───────────────────────────────────────

static RE_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap());
static RE_SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());

fn strip_style_and_script(input: &str) -> String {
    let without_style = RE_STYLE.replace_all(input, "");
    RE_SCRIPT.replace_all(&without_style, "").into_owned()
}

// ── Pass 2: Strip remaining tags ─────────────────────────────────────────────

static RE_BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:p|div|h[1-6]|table|tr|li|ul|ol|section|header|footer|br)\b[^>]*>")
        .unwrap()
});
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Block-level tags mark visual line boundaries and become line breaks;
/// every other tag becomes a single space so `<td>Chicken</td><td>500</td>`
/// cannot fuse into `Chicken500`.
fn strip_tags(input: &str) -> String {
    let with_breaks = RE_BLOCK_TAG.replace_all(input, "\n");
    RE_TAG.replace_all(&with_breaks, " ").into_owned()
}

// ── Pass 3: Decode the fixed entity set ──────────────────────────────────────

const ENTITIES: [(&str, &str); 10] = [
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&hellip;", "…"),
    ("&mdash;", "—"),
    ("&ndash;", "–"),
];

/// Unrecognised entities are left as-is.
fn decode_entities(input: &str) -> String {
    let mut out = input.to_string();
    for (entity, replacement) in ENTITIES {
        out = out.replace(entity, replacement);
    }
    out
}

// ── Pass 4: Collapse whitespace ──────────────────────────────────────────────

static RE_HSPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());
static RE_BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_whitespace(input: &str) -> String {
    let unified = input.replace("\r\n", "\n").replace('\r', "\n");
    let single_spaced = RE_HSPACE.replace_all(&unified, " ");
    let trimmed = single_spaced
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    // 3+ consecutive blank lines become exactly one
    RE_BLANK_RUNS.replace_all(&trimmed, "\n\n").into_owned()
}

// ── Pass 5: Split into lines ─────────────────────────────────────────────────

fn split_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────
