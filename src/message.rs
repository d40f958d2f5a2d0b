//! Messaging formatters: phone normalisation, deep links, and message
//! templates.
//!
//! A messaging channel needs three things from the billing flow: a phone
//! number in country-code + national-number form, a percent-encoded deep
//! link that opens a pre-filled conversation, and the message text itself —
//! either the full reformatted bill or a short notice that the PDF was
//! saved and should be attached by hand.

use crate::error::BillError;
use crate::format::format_bill_text;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Country code prefixed to bare 10-digit national numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "91";

/// Caller-supplied order metadata used by the message templates.
///
/// Constructed by the order/billing layer; immutable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub restaurant_name: String,
    pub table_number: String,
    pub order_numbers: Vec<String>,
    pub total_amount: f64,
    /// Rendered bill HTML, reformatted into the order message body.
    #[serde(default)]
    pub bill_html: String,
}

/// Which WhatsApp client the deep link should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkVariant {
    /// `web.whatsapp.com` — for desktop browsers.
    Web,
    /// `wa.me` — resolves to the installed mobile app. (default)
    #[default]
    Mobile,
}

/// Normalise a phone number to country-code + national-number digits.
///
/// Accepted shapes, after stripping every non-digit character:
/// * exactly 10 digits — the default country code is prefixed;
/// * exactly 12 digits already starting with the country code — unchanged;
/// * exactly 11 digits with a leading trunk `0` — the zero is dropped and
///   the country code prefixed;
/// * 10 or more digits otherwise — returned as-is (already international).
///
/// Anything shorter fails with [`BillError::InvalidPhoneNumber`].
pub fn normalize_phone_number(
    raw: &str,
    default_country_code: &str,
) -> Result<String, BillError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.len() == 10 {
        return Ok(format!("{default_country_code}{digits}"));
    }
    if digits.len() == 12 && digits.starts_with(default_country_code) {
        return Ok(digits);
    }
    if digits.len() == 11 && digits.starts_with('0') {
        return Ok(format!("{default_country_code}{}", &digits[1..]));
    }
    if digits.len() >= 10 {
        return Ok(digits);
    }

    Err(BillError::InvalidPhoneNumber {
        raw: raw.to_string(),
        digits: digits.len(),
    })
}

/// Build a WhatsApp deep link carrying a pre-filled message.
///
/// # Errors
/// Propagates [`BillError::InvalidPhoneNumber`] from normalisation.
pub fn build_messaging_link(
    phone: &str,
    text: &str,
    variant: LinkVariant,
) -> Result<String, BillError> {
    let phone = normalize_phone_number(phone, DEFAULT_COUNTRY_CODE)?;
    let encoded = urlencoding::encode(text);

    Ok(match variant {
        LinkVariant::Web => {
            format!("https://web.whatsapp.com/send?phone={phone}&text={encoded}")
        }
        LinkVariant::Mobile => format!("https://wa.me/{phone}?text={encoded}"),
    })
}

/// Compose the order-confirmation message with the full bill embedded.
pub fn build_order_message(order: &OrderSummary) -> String {
    let bill = format_bill_text(&order.bill_html);
    format!(
        "🧾 *Order Confirmation — {name}*\n\
         \n\
         📍 Table: {table}\n\
         🎫 Orders: {orders}\n\
         \n\
         {bill}\n\
         \n\
         ✅ Payment Completed\n\
         Total Amount: ₹{total}\n\
         \n\
         📅 Generated on {timestamp}",
        name = order.restaurant_name,
        table = order.table_number,
        orders = order.order_numbers.join(", "),
        bill = bill,
        total = money(order.total_amount),
        timestamp = generated_at(),
    )
}

/// Compose the handoff message sent alongside a saved PDF.
///
/// Same header and totals as [`build_order_message`], but the bill body is
/// replaced with an attach-it-yourself notice — the messaging channel only
/// accepts plain text, so the document travels separately.
pub fn build_document_handoff_message(order: &OrderSummary) -> String {
    format!(
        "🧾 *Order Confirmation — {name}*\n\
         \n\
         📍 Table: {table}\n\
         🎫 Orders: {orders}\n\
         \n\
         📄 Bill PDF downloaded — please attach it here.\n\
         \n\
         ✅ Payment Completed\n\
         Total Amount: ₹{total}\n\
         \n\
         📅 Generated on {timestamp}",
        name = order.restaurant_name,
        table = order.table_number,
        orders = order.order_numbers.join(", "),
        total = money(order.total_amount),
        timestamp = generated_at(),
    )
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn generated_at() -> String {
    Local::now().format("%d/%m/%Y, %I:%M %p").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
