//! Turns validated trip preferences into a chat-completion prompt and the
//! model's answer into a [`TripPlan`].

use anyhow::Context;
use handlebars::RenderError;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::domain::plan::{
    Accommodation, DayPlan, EmergencyContact, Meals, ScheduleItem, Tip, Transportation, Weather,
};
use crate::domain::{TripFormData, TripPlan, TripPlanDocument};
use crate::error::{ApiError, ApiResult};
use crate::services::llm_client::{ChatMessage, LlmClient};
use crate::templates::{Templates, TRIP_PROMPT};

const SYSTEM_PROMPT: &str = "You are an expert travel planner. Create detailed, personalized \
travel itineraries based on user preferences.

Answer with a single JSON object and nothing else. Use this shape:
{
  \"status\": \"ok\",
  \"overview\": \"one paragraph summary\",
  \"days\": [
    {
      \"schedule\": [
        { \"time\": \"09:00\", \"activity\": \"...\", \"description\": \"...\", \"location\": \"...\", \"cost\": 0 }
      ],
      \"meals\": { \"breakfast\": \"...\", \"lunch\": \"...\", \"dinner\": \"...\" },
      \"transportation\": { \"type\": \"...\", \"cost\": 0, \"notes\": \"...\" },
      \"accommodation\": { \"name\": \"...\", \"type\": \"...\", \"cost\": 0, \"location\": \"...\" },
      \"weather\": { \"condition\": \"...\", \"temperature\": 0, \"precipitation\": 0 }
    }
  ],
  \"tips\": [ { \"category\": \"...\", \"items\": [\"...\"] } ],
  \"emergencyContacts\": [ { \"type\": \"...\", \"contact\": \"...\" } ]
}
Costs are plain numbers in Indian rupees. Return exactly one entry in \"days\" per day of the trip, in order.
If the destination is not a real place you can plan for, answer instead with
{ \"status\": \"unknown_destination\", \"reason\": \"short explanation\" }";

/// The chat messages for one generation request.
pub fn build_messages(templates: &Templates, form: &TripFormData) -> Result<Vec<ChatMessage>, RenderError> {
    Ok(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_prompt(templates, form)?),
    ])
}

#[derive(Serialize)]
struct PromptView<'a> {
    days: u32,
    travelers: u32,
    people: &'static str,
    destination: &'a str,
    from: String,
    to: String,
    group: &'static str,
    style: &'static str,
    budget: u32,
    level: &'static str,
    interests: String,
    dietary: String,
    accommodation: &'static str,
    special: &'a str,
}

pub fn build_prompt(templates: &Templates, form: &TripFormData) -> Result<String, RenderError> {
    let dietary = if form.dietary_preferences.is_empty() {
        "None".to_string()
    } else {
        form.dietary_preferences.join(", ")
    };

    let view = PromptView {
        days: form.dates.day_count(),
        travelers: form.travelers,
        people: if form.travelers == 1 { "person" } else { "people" },
        destination: &form.destination,
        from: form.dates.from.format("%Y-%m-%d").to_string(),
        to: form.dates.to.format("%Y-%m-%d").to_string(),
        group: form.group_type.as_str(),
        style: form.trip_style.as_str(),
        budget: form.budget,
        level: form.activity_level.as_str(),
        interests: form.interests.join(", "),
        dietary,
        accommodation: form.accommodation_type.as_str(),
        special: form.special_requirements.as_deref().unwrap_or("None"),
    };

    templates.render(TRIP_PROMPT, &view)
}

/// Summary used when the model leaves `overview` out.
pub fn default_overview(form: &TripFormData) -> String {
    let days = form.dates.day_count();
    format!(
        "{} {}-day {} journey in {} designed for {} travelers with a {} activity level.",
        indefinite_article(days),
        days,
        form.trip_style,
        form.destination,
        form.group_type,
        form.activity_level
    )
}

/// "An" for numbers spoken with a leading vowel: 8, 11, 18, 80-89, 800-899.
fn indefinite_article(n: u32) -> &'static str {
    let digits = n.to_string();
    // "eleven", "eighteen" only when they lead a thousands group
    let two_digit_lead = digits.len() % 3 == 2;
    if digits.starts_with('8') || (two_digit_lead && (digits.starts_with("11") || digits.starts_with("18"))) {
        "An"
    } else {
        "A"
    }
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum CompletionStatus {
    #[default]
    Ok,
    UnknownDestination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItinerary {
    #[serde(default)]
    status: CompletionStatus,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    days: Vec<RawDay>,
    #[serde(default)]
    tips: Vec<Tip>,
    #[serde(default)]
    emergency_contacts: Vec<EmergencyContact>,
}

#[derive(Debug, Deserialize)]
struct RawDay {
    #[serde(default, alias = "activities")]
    schedule: Vec<ScheduleItem>,
    #[serde(default)]
    meals: Option<Meals>,
    #[serde(default)]
    transportation: Option<Transportation>,
    #[serde(default)]
    accommodation: Option<Accommodation>,
    #[serde(default, alias = "weatherForecast")]
    weather: Option<Weather>,
}

/// The JSON object inside a completion, without Markdown fences or chatter.
fn extract_json(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (start < end).then(|| &content[start..=end])
}

/// Parse the model's answer for `form` into a plan.
///
/// More days than the trip spans are dropped; fewer is a failure, since a
/// partial itinerary is never returned.
pub fn parse_completion(content: &str, form: &TripFormData) -> ApiResult<TripPlan> {
    let json = extract_json(content)
        .ok_or_else(|| ApiError::GenerationFailed("completion contained no JSON object".into()))?;

    let raw: RawItinerary = serde_json::from_str(json)
        .map_err(|e| ApiError::GenerationFailed(format!("unexpected completion shape: {}", e)))?;

    if raw.status == CompletionStatus::UnknownDestination {
        let reason = raw
            .reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| form.destination.clone());
        return Err(ApiError::UnknownDestination(reason));
    }

    let expected = form.dates.day_count();
    if raw.days.len() < expected as usize {
        return Err(ApiError::GenerationFailed(format!(
            "completion covered {} of {} days",
            raw.days.len(),
            expected
        )));
    }
    if raw.days.len() > expected as usize {
        warn!(
            returned = raw.days.len(),
            expected = expected,
            "Dropping days beyond the trip range"
        );
    }

    let days = raw
        .days
        .into_iter()
        .take(expected as usize)
        .zip(0..expected)
        .map(|(day, offset)| DayPlan {
            day: offset + 1,
            date: form.dates.day(offset),
            schedule: day.schedule,
            meals: day.meals,
            transportation: day.transportation,
            accommodation: day.accommodation,
            weather: day.weather,
        })
        .collect();

    let overview = raw
        .overview
        .filter(|o| !o.trim().is_empty())
        .unwrap_or_else(|| default_overview(form));

    TripPlan::try_from(TripPlanDocument {
        id: None,
        destination: form.destination.clone(),
        dates: form.dates,
        travelers: form.travelers,
        total_cost: None,
        overview: Some(overview),
        days,
        tips: raw.tips,
        emergency_contacts: raw.emergency_contacts,
    })
    .map_err(|e| ApiError::GenerationFailed(e.to_string()))
}

/// Ask the model for an itinerary and parse its answer.
#[instrument(skip(llm, templates, form), fields(destination = %form.destination, days = form.dates.day_count()))]
pub async fn generate_trip_plan(
    llm: &LlmClient,
    templates: &Templates,
    form: &TripFormData,
    request_id: Option<&str>,
) -> ApiResult<TripPlan> {
    let messages = build_messages(templates, form).context("Failed to render trip prompt")?;
    let content = llm.complete(&messages, request_id).await?;
    let plan = parse_completion(&content, form)?;

    info!(
        plan_id = %plan.id(),
        total_cost = %plan.total_cost(),
        "Trip plan generated"
    );

    Ok(plan)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::form::tests::agra_form;
    use crate::domain::form::FormStep;
    use rust_decimal::Decimal;
    use serde_json::json;

    /// A model answer with `days` days, each costing 350 across two items.
    pub fn completion_with_days(days: usize) -> String {
        let day = json!({
            "schedule": [
                { "time": "06:00", "activity": "Taj Mahal sunrise", "location": "Taj Mahal", "cost": 50 },
                { "time": "13:00", "activity": "Mughlai lunch", "cost": "INR 300" },
                { "time": "19:00", "activity": "Evening walk" }
            ],
            "meals": { "breakfast": "Paratha", "lunch": "Mughlai", "dinner": "Thali" }
        });
        let body = json!({
            "status": "ok",
            "days": vec![day; days],
            "tips": [{ "category": "Etiquette", "items": ["Dress modestly at temples"] }],
            "emergencyContacts": [{ "type": "Police", "contact": "112" }]
        });
        format!("Here is your plan:\n```json\n{}\n```", body)
    }

    #[test]
    fn prompt_embeds_every_field() {
        let mut form = agra_form();
        form.special_requirements = Some("wheelchair access".into());
        let prompt = build_prompt(&Templates::new().unwrap(), &form).unwrap();

        assert!(prompt.starts_with("Create a detailed 8-day travel itinerary for 2 people traveling to Agra"));
        assert!(prompt.contains("- Group Type: couple"));
        assert!(prompt.contains("- Travel Style: cultural"));
        assert!(prompt.contains("- Daily Budget: \u{20b9}5000"));
        assert!(prompt.contains("- Activity Level: medium"));
        assert!(prompt.contains("- Interests: history, food"));
        assert!(prompt.contains("- Dietary Preferences: vegetarian"));
        assert!(prompt.contains("- Accommodation Type: hotel"));
        assert!(prompt.contains("- Special Requirements: wheelchair access"));
    }

    #[test]
    fn prompt_handles_single_traveler_and_no_preferences() {
        let mut form = agra_form();
        form.travelers = 1;
        form.dietary_preferences.clear();
        let prompt = build_prompt(&Templates::new().unwrap(), &form).unwrap();
        assert!(prompt.contains("for 1 person traveling"));
        assert!(prompt.contains("- Dietary Preferences: None"));
        assert!(prompt.contains("- Special Requirements: None"));
    }

    #[test]
    fn agra_completion_yields_eight_dated_days() {
        let form = agra_form();
        let plan = parse_completion(&completion_with_days(8), &form).unwrap();

        assert_eq!(plan.days().len(), 8);
        assert_eq!(plan.days()[0].day, 1);
        assert_eq!(plan.days()[7].date, form.dates.day(7));
        assert_eq!(plan.dates().display_short(), "Nov 7 \u{2013} Nov 15, 2024");
        assert_eq!(plan.travelers(), 2);
        assert_eq!(plan.total_cost(), Decimal::from(8 * 350));
        assert_eq!(
            plan.overview(),
            Some("An 8-day cultural journey in Agra designed for couple travelers with a medium activity level.")
        );
        assert_eq!(plan.emergency_contacts()[0].contact, "112");
    }

    #[test]
    fn extra_days_are_truncated_and_missing_days_fail() {
        let form = agra_form();
        assert_eq!(
            parse_completion(&completion_with_days(10), &form).unwrap().days().len(),
            8
        );
        assert!(matches!(
            parse_completion(&completion_with_days(5), &form),
            Err(ApiError::GenerationFailed(_))
        ));
    }

    #[test]
    fn unknown_destination_is_a_structured_result() {
        let form = agra_form();
        let content = r#"{"status": "unknown_destination", "reason": "Atlantis is fictional"}"#;
        match parse_completion(content, &form) {
            Err(ApiError::UnknownDestination(reason)) => assert_eq!(reason, "Atlantis is fictional"),
            other => panic!("expected unknown destination, got {:?}", other.map(|p| p.id())),
        }
    }

    #[test]
    fn prose_and_html_are_generation_failures() {
        let form = agra_form();
        for content in ["I cannot help with that.", "<h1>Agra</h1><ul><li>Day 1</li></ul>", "{\"days\": 3}"] {
            assert!(matches!(
                parse_completion(content, &form),
                Err(ApiError::GenerationFailed(_))
            ));
        }
    }

    #[test]
    fn fixture_form_is_valid_for_every_step() {
        let draft = crate::domain::TripFormDraft::from(agra_form());
        for step in FormStep::ALL {
            assert!(crate::domain::form::validate_step(step, &draft).is_ok());
        }
    }

    #[test]
    fn prompt_keeps_user_text_verbatim() {
        let mut form = agra_form();
        form.special_requirements = Some("kids <5 & \"no stairs\"".into());
        let prompt = build_prompt(&Templates::new().unwrap(), &form).unwrap();
        assert!(prompt.contains("- Special Requirements: kids <5 & \"no stairs\""));
        assert!(prompt.contains("from 2024-11-07 to 2024-11-15."));
    }

    #[test]
    fn overview_article_follows_the_number() {
        assert_eq!(indefinite_article(1), "A");
        assert_eq!(indefinite_article(8), "An");
        assert_eq!(indefinite_article(11), "An");
        assert_eq!(indefinite_article(18), "An");
        assert_eq!(indefinite_article(21), "A");
        assert_eq!(indefinite_article(110), "A");
    }
}
