//! PDF export: cover, overview, one section per day of the date range,
//! then notes, tips and emergency contacts.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::pdf_writer::{Font, PdfError, PdfWriter};
use super::{format_money, travelers_label};
use crate::domain::{DayPlan, TripPlan};

const TITLE_SIZE: f32 = 24.0;
const SUBTITLE_SIZE: f32 = 16.0;
const DAY_TITLE_SIZE: f32 = 16.0;
const TEXT_SIZE: f32 = 12.0;
const INDENT: f32 = 14.0;

const PLACEHOLDER_DAY: [&str; 3] = [
    "Morning: Activity based on preferences",
    "Afternoon: Flexible time for exploration",
    "Evening: Local experiences",
];

const IMPORTANT_NOTES: [&str; 3] = [
    "Remember to carry necessary travel documents",
    "Check local weather conditions before activities",
    "Keep emergency contacts handy",
];

pub fn render_pdf(plan: &TripPlan) -> Result<Vec<u8>, PdfError> {
    let mut pdf = PdfWriter::new(format!("Travel Itinerary - {}", plan.destination()));

    // Cover
    pdf.text(Font::Bold, TITLE_SIZE, 0.0, "Travel Itinerary")?;
    pdf.gap(6.0);
    pdf.text(Font::Regular, SUBTITLE_SIZE, 0.0, plan.destination())?;
    pdf.text(Font::Regular, TEXT_SIZE, 0.0, &plan.dates().display_long())?;
    pdf.text(Font::Regular, TEXT_SIZE, 0.0, &travelers_label(plan.travelers()))?;
    pdf.text(
        Font::Regular,
        TEXT_SIZE,
        0.0,
        &format!("Estimated Total: {}", format_money(plan.total_cost())),
    )?;
    pdf.gap(20.0);

    if let Some(overview) = plan.overview() {
        pdf.text(Font::Bold, TEXT_SIZE, 0.0, "Trip Overview")?;
        pdf.text(Font::Regular, TEXT_SIZE, 0.0, overview)?;
        pdf.gap(16.0);
    }

    let dates = plan.dates();
    for offset in 0..dates.day_count() {
        let date = dates.day(offset);
        pdf.text(
            Font::Bold,
            DAY_TITLE_SIZE,
            0.0,
            &format!("Day {} - {}", offset + 1, date.format("%a, %b %d, %Y")),
        )?;
        match plan.day(offset) {
            Some(day) if !day.schedule.is_empty() => write_day(&mut pdf, day)?,
            _ => {
                for line in PLACEHOLDER_DAY {
                    pdf.text(Font::Regular, TEXT_SIZE, INDENT, line)?;
                }
            }
        }
        pdf.gap(12.0);
    }

    pdf.text(Font::Bold, TEXT_SIZE, 0.0, "Important Notes")?;
    for note in IMPORTANT_NOTES {
        pdf.text(Font::Regular, TEXT_SIZE, INDENT, &format!("\u{2022} {}", note))?;
    }

    for tip in plan.tips() {
        pdf.gap(10.0);
        pdf.text(Font::Bold, TEXT_SIZE, 0.0, &tip.category)?;
        for item in &tip.items {
            pdf.text(Font::Regular, TEXT_SIZE, INDENT, &format!("\u{2022} {}", item))?;
        }
    }

    if !plan.emergency_contacts().is_empty() {
        pdf.gap(10.0);
        pdf.text(Font::Bold, TEXT_SIZE, 0.0, "Emergency Contacts")?;
        for contact in plan.emergency_contacts() {
            pdf.text(
                Font::Regular,
                TEXT_SIZE,
                INDENT,
                &format!("{}: {}", contact.kind, contact.contact),
            )?;
        }
    }

    pdf.finish()
}

/// The PDF as a base64 string, for JSON transport.
pub fn render_pdf_base64(plan: &TripPlan) -> Result<String, PdfError> {
    render_pdf(plan).map(|bytes| STANDARD.encode(bytes))
}

fn write_day(pdf: &mut PdfWriter, day: &DayPlan) -> Result<(), PdfError> {
    for item in &day.schedule {
        let mut line = if item.time.is_empty() {
            item.activity.clone()
        } else {
            format!("{}  {}", item.time, item.activity)
        };
        if let Some(cost) = item.cost {
            line.push_str(&format!(" ({})", format_money(cost)));
        }
        pdf.text(Font::Regular, TEXT_SIZE, INDENT, &line)?;
        if let Some(location) = &item.location {
            pdf.text(Font::Regular, TEXT_SIZE - 2.0, INDENT * 2.0, &format!("at {}", location))?;
        }
        if let Some(description) = &item.description {
            pdf.text(Font::Regular, TEXT_SIZE - 2.0, INDENT * 2.0, description)?;
        }
    }

    if let Some(meals) = &day.meals {
        let parts: Vec<String> = [
            ("Breakfast", &meals.breakfast),
            ("Lunch", &meals.lunch),
            ("Dinner", &meals.dinner),
        ]
        .into_iter()
        .filter_map(|(label, meal)| meal.as_ref().map(|m| format!("{}: {}", label, m)))
        .collect();
        if !parts.is_empty() {
            pdf.text(Font::Regular, TEXT_SIZE, INDENT, &format!("Meals - {}", parts.join("; ")))?;
        }
    }

    if let Some(transport) = &day.transportation {
        let cost = transport.cost.map(|c| format!(" ({})", format_money(c))).unwrap_or_default();
        pdf.text(
            Font::Regular,
            TEXT_SIZE,
            INDENT,
            &format!("Getting around: {}{}", transport.kind, cost),
        )?;
    }

    if let Some(stay) = &day.accommodation {
        let cost = stay.cost.map(|c| format!(" ({})", format_money(c))).unwrap_or_default();
        pdf.text(Font::Regular, TEXT_SIZE, INDENT, &format!("Stay: {}{}", stay.name, cost))?;
    }

    Ok(())
}
