//! Itinerary rendering: escaped HTML and PDF export.
//!
//! Both renderers only ever read the structured [`TripPlan`] model and emit
//! one day section per day of the plan's date range.
//!
//! [`TripPlan`]: crate::domain::TripPlan

pub mod html;
pub mod pdf;
pub mod pdf_writer;

use rust_decimal::Decimal;

pub use html::render_html;
pub use pdf::{render_pdf, render_pdf_base64};

/// `₹1200`, `₹99.5`: at most two decimals, no trailing zeros.
pub(crate) fn format_money(amount: Decimal) -> String {
    format!("\u{20b9}{}", amount.round_dp(2).normalize())
}

pub(crate) fn travelers_label(count: u32) -> String {
    if count == 1 {
        "1 Traveler".to_string()
    } else {
        format!("{} Travelers", count)
    }
}
