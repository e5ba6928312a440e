//! Structured HTML rendering through the itinerary page template. Values
//! are pre-formatted here and escaped by the template engine.

use handlebars::RenderError;
use serde::Serialize;

use super::{format_money, travelers_label};
use crate::domain::{DayPlan, TripPlan};
use crate::templates::{Templates, ITINERARY_PAGE};

#[derive(Serialize)]
struct PageView<'a> {
    destination: &'a str,
    dates: String,
    travelers: String,
    total: String,
    overview: Option<&'a str>,
    days: Vec<DayView<'a>>,
    tips: Vec<TipView<'a>>,
    contacts: Vec<ContactView<'a>>,
}

#[derive(Serialize, Default)]
struct DayView<'a> {
    number: u32,
    date: String,
    items: Vec<ItemView<'a>>,
    meals: Vec<MealView<'a>>,
    transportation: Option<String>,
    accommodation: Option<String>,
    weather: Option<String>,
}

#[derive(Serialize)]
struct ItemView<'a> {
    time: &'a str,
    activity: &'a str,
    cost: Option<String>,
    location: Option<&'a str>,
    description: Option<&'a str>,
}

#[derive(Serialize)]
struct MealView<'a> {
    label: &'static str,
    dish: &'a str,
}

#[derive(Serialize)]
struct TipView<'a> {
    category: &'a str,
    items: &'a [String],
}

#[derive(Serialize)]
struct ContactView<'a> {
    kind: &'a str,
    contact: &'a str,
}

pub fn render_html(templates: &Templates, plan: &TripPlan) -> Result<String, RenderError> {
    let dates = plan.dates();
    let days = (0..dates.day_count())
        .map(|offset| {
            let mut view = plan.day(offset).map(day_view).unwrap_or_default();
            view.number = offset + 1;
            view.date = dates.day(offset).format("%a, %b %-d").to_string();
            view
        })
        .collect();

    let page = PageView {
        destination: plan.destination(),
        dates: dates.display_short(),
        travelers: travelers_label(plan.travelers()),
        total: format_money(plan.total_cost()),
        overview: plan.overview(),
        days,
        tips: plan
            .tips()
            .iter()
            .map(|t| TipView {
                category: &t.category,
                items: &t.items,
            })
            .collect(),
        contacts: plan
            .emergency_contacts()
            .iter()
            .map(|c| ContactView {
                kind: &c.kind,
                contact: &c.contact,
            })
            .collect(),
    };

    templates.render(ITINERARY_PAGE, &page)
}

fn day_view(day: &DayPlan) -> DayView<'_> {
    let items = day
        .schedule
        .iter()
        .map(|item| ItemView {
            time: &item.time,
            activity: &item.activity,
            cost: item.cost.map(format_money),
            location: item.location.as_deref(),
            description: item.description.as_deref(),
        })
        .collect();

    let meals = day
        .meals
        .as_ref()
        .map(|m| {
            [
                ("Breakfast", &m.breakfast),
                ("Lunch", &m.lunch),
                ("Dinner", &m.dinner),
            ]
            .into_iter()
            .filter_map(|(label, dish)| dish.as_deref().map(|dish| MealView { label, dish }))
            .collect()
        })
        .unwrap_or_default();

    let transportation = day.transportation.as_ref().map(|t| {
        let mut line = t.kind.clone();
        if let Some(cost) = t.cost {
            line.push_str(&format!(" ({})", format_money(cost)));
        }
        if let Some(notes) = &t.notes {
            line.push_str(&format!(". {}", notes));
        }
        line
    });

    let accommodation = day.accommodation.as_ref().map(|a| match a.cost {
        Some(cost) => format!("{} ({})", a.name, format_money(cost)),
        None => a.name.clone(),
    });

    let weather = day.weather.as_ref().map(|w| match w.temperature {
        Some(t) => format!("{}, {:.0}\u{b0}C", w.condition, t),
        None => w.condition.clone(),
    });

    DayView {
        number: day.day,
        date: String::new(),
        items,
        meals,
        transportation,
        accommodation,
        weather,
    }
}
