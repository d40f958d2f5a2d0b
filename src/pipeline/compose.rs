//! Composition: classified, decorated messaging text from sanitised lines.
//!
//! A bill has a fixed shape — store header, receipt banner, table/date
//! metadata, an order-number block, an item table, totals, payment details,
//! a thank-you footer. Each sanitised line is matched against a priority-
//! ordered rule list (first match wins) and rendered with the decoration of
//! the bill region it belongs to: emoji markers, `*bold*`, and 30-character
//! separator rules.
//!
//! The only transformation state is the active [`Section`], carried forward
//! between lines. It gates two rules (order ids, item quantity lines) and
//! decides whether an otherwise-unclassified line is indented under the
//! current region or emitted verbatim. [`step`] is a pure
//! `(section, line) -> (section, emitted)` function so every rule is
//! testable in isolation; [`compose`] folds it over the line sequence and
//! tidies the result.

use once_cell::sync::Lazy;
use regex::Regex;

/// The bill region the composer is currently inside.
///
/// Carried forward across lines until a section-start pattern is seen.
/// Unclassified lines take their indentation from the latest-seen section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// No section-start pattern seen yet.
    #[default]
    None,
    /// Inside the order-numbers block.
    Orders,
    /// Inside the item table.
    Items,
    /// Inside the subtotal/tax/total block.
    Totals,
    /// Inside the payment-details block.
    Payment,
}

const RULE_WIDTH: usize = 30;
const INDENT: &str = "   ";

fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn indent(line: &str) -> String {
    format!("{INDENT}{line}")
}

// Rule 3 requires a word boundary before the keyword; rule 11 deliberately
// does not (it re-lists "Date:"/"Time:" unanchored — shadowed by rule 3, but
// kept to match the shipped behaviour).
static RE_META: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:table|date|time):").unwrap());
static RE_ORDER_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)order numbers|combined bill").unwrap());
static RE_QTY_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[x×]").unwrap());
static RE_CURRENCY: Lazy<Regex> = Lazy::new(|| Regex::new(r"₹|\$|Rs\.").unwrap());
static RE_TOTALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)subtotal|tax|total amount|final|grand total").unwrap());
static RE_TOTALS_EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)total amount|final|grand total").unwrap());
static RE_PAYMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)payment details|method:").unwrap());
static RE_GENERATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)generated on|date:|time:").unwrap());

/// Classify one line and render its decorated output.
///
/// Rules are evaluated in priority order; the first match emits and wins.
/// Lines matching no rule and failing the default rule's length check are
/// dropped.
pub fn step(section: Section, index: usize, line: &str) -> (Section, Vec<String>) {
    let lower = line.to_lowercase();

    // 1. Store header — only near the top of the bill
    if index < 3 && lower.contains("restaurant") {
        return (section, vec![format!("🏪 *{line}*")]);
    }

    // 2. Receipt banner
    if lower.contains("bill receipt") {
        return (
            section,
            vec![String::new(), format!("📋 *{line}*"), heavy_rule()],
        );
    }

    // 3. Table / date / time metadata
    if RE_META.is_match(line) {
        return (section, vec![format!("📍 {line}")]);
    }

    // 4. Order-numbers block header
    if RE_ORDER_HEADER.is_match(line) {
        return (
            Section::Orders,
            vec![String::new(), format!("🎫 *{line}*")],
        );
    }

    // 5. Order ids under the block header
    if section == Section::Orders && line.starts_with('#') {
        return (section, vec![indent(line)]);
    }

    // 6. Item-table header
    if lower.contains("item") && lower.contains("total") {
        return (
            Section::Items,
            vec![String::new(), "🍽️ *ITEMS & TOTALS*".to_string(), light_rule()],
        );
    }

    // 7. Quantity line — inside the item table, or (before any section has
    // started) a line that already carries a currency marker. Bills without
    // an item-table header still list "Chicken x2 ₹500" style lines.
    if RE_QTY_MARK.is_match(line)
        && (section == Section::Items
            || (section == Section::None && RE_CURRENCY.is_match(line)))
    {
        return (section, vec![item_line(line)]);
    }

    // 8. Totals block
    if RE_TOTALS.is_match(line) {
        if RE_TOTALS_EMPHASIS.is_match(line) {
            return (
                Section::Totals,
                vec![light_rule(), format!("💰 *{line}*"), heavy_rule()],
            );
        }
        return (Section::Totals, vec![indent(line)]);
    }

    // 9. Payment block
    if RE_PAYMENT.is_match(line) {
        if lower.contains("payment details") {
            return (
                Section::Payment,
                vec![String::new(), format!("💳 *{line}*"), light_rule()],
            );
        }
        return (Section::Payment, vec![indent(line)]);
    }

    // 10. Thank-you footer
    if lower.contains("thank you") {
        return (
            section,
            vec![
                String::new(),
                format!("🙏 *{line}*"),
                "Please visit again!".to_string(),
            ],
        );
    }

    // 11. Generation timestamp (the date/time alternates never fire — rule 3
    // claims those lines first)
    if RE_GENERATED.is_match(line) {
        return (section, vec![String::new(), format!("📅 {line}")]);
    }

    // 12. Default: contact lines get a pin, everything else indents under
    // the active section or passes through verbatim
    if line.chars().count() > 3 && !lower.contains("restaurant address") {
        if is_contact_line(&lower) {
            return (section, vec![format!("📍 {line}")]);
        }
        if section != Section::None {
            return (section, vec![indent(line)]);
        }
        return (section, vec![line.to_string()]);
    }

    (section, Vec::new())
}

fn is_contact_line(lower: &str) -> bool {
    lower.contains("phone")
        || lower.contains('@')
        || lower.contains("www.")
        || lower.contains(".com")
        || lower.contains("address")
}

/// Split a quantity line on its currency delimiter.
///
/// With at least two segments the name and amount re-join as
/// `• <name> - ₹<amount>`; otherwise the whole line becomes the bullet.
/// The delimiter may appear zero or several times — only the first and last
/// segments are used.
fn item_line(line: &str) -> String {
    let parts: Vec<&str> = RE_CURRENCY.split(line).collect();
    if parts.len() >= 2 {
        let name = parts.first().map(|p| p.trim()).unwrap_or_default();
        let amount = parts.last().map(|p| p.trim()).unwrap_or_default();
        format!("• {name} - ₹{amount}")
    } else {
        format!("• {line}")
    }
}

/// Compose the full messaging text from sanitised bill lines.
pub fn compose(lines: &[String]) -> String {
    let mut section = Section::default();
    let mut emitted: Vec<String> = Vec::with_capacity(lines.len() * 2);

    for (index, line) in lines.iter().enumerate() {
        let (next, rendered) = step(section, index, line);
        section = next;
        emitted.extend(rendered);
    }

    tidy(&emitted)
}

/// Collapse runs of 3+ blank lines to one and strip leading/trailing blanks.
fn tidy(lines: &[String]) -> String {
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut run = 0usize;

    for line in lines {
        if line.trim().is_empty() {
            run += 1;
            continue;
        }
        if run > 0 && !kept.is_empty() {
            let blanks = if run >= 3 { 1 } else { run };
            for _ in 0..blanks {
                kept.push("");
            }
        }
        run = 0;
        kept.push(line);
    }

    kept.join("\n").trim().to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
