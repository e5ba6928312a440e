//! Generated itinerary model.
//!
//! A [`TripPlan`] is immutable once built. Its total cost is never stored
//! independently of the days it covers: it is recomputed on construction
//! and whenever a plan is read back from JSON.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::form::{iso_date, DateRange};
use super::validation::ValidationError;

/// One scheduled entry in a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    #[serde(default)]
    pub time: String,
    #[serde(alias = "title")]
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::cost",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transportation {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "lenient::cost",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accommodation {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "lenient::cost",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default)]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based index within the trip.
    pub day: u32,
    #[serde(deserialize_with = "iso_date::deserialize")]
    pub date: NaiveDate,
    #[serde(default, alias = "activities")]
    pub schedule: Vec<ScheduleItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals: Option<Meals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation: Option<Transportation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<Accommodation>,
    #[serde(default, alias = "weatherForecast", skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
}

impl DayPlan {
    /// Sum of every itemized cost in the day: scheduled items, transport
    /// and accommodation. Missing costs count as zero.
    pub fn total_cost(&self) -> Decimal {
        let items: Decimal = self.schedule.iter().filter_map(|i| i.cost).sum();
        let transport = self
            .transportation
            .as_ref()
            .and_then(|t| t.cost)
            .unwrap_or_default();
        let stay = self
            .accommodation
            .as_ref()
            .and_then(|a| a.cost)
            .unwrap_or_default();
        items + transport + stay
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub category: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(rename = "type")]
    pub kind: String,
    pub contact: String,
}

/// Wire form of a [`TripPlan`]. `totalCost` is written on output and
/// ignored on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanDocument {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub destination: String,
    pub dates: DateRange,
    pub travelers: u32,
    #[serde(default, deserialize_with = "lenient::cost")]
    pub total_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub tips: Vec<Tip>,
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TripPlanDocument", into = "TripPlanDocument")]
pub struct TripPlan {
    id: Uuid,
    destination: String,
    dates: DateRange,
    travelers: u32,
    overview: Option<String>,
    days: Vec<DayPlan>,
    tips: Vec<Tip>,
    emergency_contacts: Vec<EmergencyContact>,
}

impl TripPlan {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn dates(&self) -> &DateRange {
        &self.dates
    }

    pub fn travelers(&self) -> u32 {
        self.travelers
    }

    pub fn overview(&self) -> Option<&str> {
        self.overview.as_deref()
    }

    pub fn days(&self) -> &[DayPlan] {
        &self.days
    }

    pub fn tips(&self) -> &[Tip] {
        &self.tips
    }

    pub fn emergency_contacts(&self) -> &[EmergencyContact] {
        &self.emergency_contacts
    }

    /// Plan for the 0-based `offset`-th day of the range, if the plan has one.
    pub fn day(&self, offset: u32) -> Option<&DayPlan> {
        self.days.get(offset as usize)
    }

    pub fn total_cost(&self) -> Decimal {
        self.days.iter().map(DayPlan::total_cost).sum()
    }
}

impl TryFrom<TripPlanDocument> for TripPlan {
    type Error = ValidationError;

    fn try_from(doc: TripPlanDocument) -> Result<Self, Self::Error> {
        doc.dates.check()?;
        let mut days = doc.days;
        days.truncate(doc.dates.day_count() as usize);

        Ok(Self {
            id: doc.id.unwrap_or_else(Uuid::new_v4),
            destination: doc.destination,
            dates: doc.dates,
            travelers: doc.travelers,
            overview: doc.overview.filter(|o| !o.trim().is_empty()),
            days,
            tips: doc.tips,
            emergency_contacts: doc.emergency_contacts,
        })
    }
}

impl From<TripPlan> for TripPlanDocument {
    fn from(plan: TripPlan) -> Self {
        let total_cost = Some(plan.total_cost());
        Self {
            id: Some(plan.id),
            destination: plan.destination,
            dates: plan.dates,
            travelers: plan.travelers,
            total_cost,
            overview: plan.overview,
            days: plan.days,
            tips: plan.tips,
            emergency_contacts: plan.emergency_contacts,
        }
    }
}

/// Cost fields written by a language model are not always numbers.
pub(crate) mod lenient {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// Accepts `150`, `150.5`, `"150"`, `"INR 1,200 - 1,500"` (first amount),
    /// `"Free"` (zero) and `null`. Anything else reads as no cost.
    pub fn cost<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(parse(&Value::deserialize(deserializer)?))
    }

    pub fn parse(value: &Value) -> Option<Decimal> {
        match value {
            Value::Number(n) => {
                let raw = n.to_string();
                Decimal::from_str(&raw)
                    .or_else(|_| Decimal::from_scientific(&raw))
                    .ok()
                    .map(|d| d.abs())
            }
            Value::String(s) => parse_str(s),
            _ => None,
        }
    }

    fn parse_str(s: &str) -> Option<Decimal> {
        let mut digits = String::new();
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '.' if !digits.is_empty() && !digits.contains('.') => digits.push(c),
                ',' if !digits.is_empty() => {}
                _ if !digits.is_empty() => break,
                _ => {}
            }
        }
        let digits = digits.trim_end_matches('.');
        if digits.is_empty() {
            return s.to_lowercase().contains("free").then_some(Decimal::ZERO);
        }
        Decimal::from_str(digits).ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub fn item(activity: &str, cost: Option<i64>) -> ScheduleItem {
        ScheduleItem {
            time: "09:00".into(),
            activity: activity.into(),
            description: None,
            location: Some("Agra".into()),
            cost: cost.map(Decimal::from),
        }
    }

    pub fn agra_document() -> TripPlanDocument {
        let dates = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 11, 7).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
        };
        let days = (0..dates.day_count())
            .map(|offset| DayPlan {
                day: offset + 1,
                date: dates.day(offset),
                schedule: vec![
                    item("Taj Mahal sunrise", Some(50)),
                    item("Mughlai lunch", Some(300)),
                    item("Evening walk", None),
                ],
                meals: None,
                transportation: None,
                accommodation: None,
                weather: None,
            })
            .collect();
        TripPlanDocument {
            id: None,
            destination: "Agra".into(),
            dates,
            travelers: 2,
            total_cost: None,
            overview: None,
            days,
            tips: vec![],
            emergency_contacts: vec![],
        }
    }

    pub fn agra_plan() -> TripPlan {
        TripPlan::try_from(agra_document()).unwrap()
    }

    #[test]
    fn total_is_exact_sum_of_item_costs() {
        let plan = agra_plan();
        assert_eq!(plan.days().len(), 8);
        assert_eq!(plan.total_cost(), Decimal::from(8 * 350));
    }

    #[test]
    fn changing_one_item_moves_total_by_its_delta() {
        let base = agra_plan();

        let mut doc = agra_document();
        doc.days[3].schedule[1].cost = Some(Decimal::new(42575, 2));
        let changed = TripPlan::try_from(doc).unwrap();

        assert_eq!(
            changed.total_cost() - base.total_cost(),
            Decimal::new(42575, 2) - Decimal::from(300)
        );
    }

    #[test]
    fn day_total_includes_transport_and_stay() {
        let mut day = agra_document().days.remove(0);
        day.transportation = Some(Transportation {
            kind: "rickshaw".into(),
            cost: Some(Decimal::from(200)),
            notes: None,
        });
        day.accommodation = Some(Accommodation {
            name: "Hotel Amar".into(),
            kind: "hotel".into(),
            cost: Some(Decimal::from(3500)),
            location: None,
        });
        assert_eq!(day.total_cost(), Decimal::from(350 + 200 + 3500));
    }

    #[test]
    fn client_supplied_total_is_ignored() {
        let mut value = serde_json::to_value(agra_plan()).unwrap();
        assert_eq!(value["totalCost"], json!(2800.0));

        value["totalCost"] = json!(1);
        let plan: TripPlan = serde_json::from_value(value).unwrap();
        assert_eq!(plan.total_cost(), Decimal::from(2800));
    }

    #[test]
    fn extra_days_beyond_the_range_are_dropped() {
        let mut doc = agra_document();
        let extra = doc.days[0].clone();
        doc.days.push(extra);
        assert_eq!(TripPlan::try_from(doc).unwrap().days().len(), 8);
    }

    #[test]
    fn inverted_dates_are_rejected() {
        let mut doc = agra_document();
        std::mem::swap(&mut doc.dates.from, &mut doc.dates.to);
        assert_eq!(TripPlan::try_from(doc).unwrap_err().field, "dates");
    }

    #[test]
    fn overlong_ranges_are_rejected() {
        let mut doc = agra_document();
        doc.dates.from = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        doc.dates.to = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        doc.days.clear();
        let err = TripPlan::try_from(doc).unwrap_err();
        assert_eq!(err.field, "dates");
        assert_eq!(err.message, "Trips can be at most 30 days long");
    }

    #[test]
    fn same_day_plan_has_no_days() {
        let mut doc = agra_document();
        doc.dates.to = doc.dates.from;
        let plan = TripPlan::try_from(doc).unwrap();
        assert!(plan.days().is_empty());
        assert_eq!(plan.total_cost(), Decimal::ZERO);
    }

    #[test]
    fn lenient_costs() {
        assert_eq!(lenient::parse(&json!(150)), Some(Decimal::from(150)));
        assert_eq!(lenient::parse(&json!(12.5)), Some(Decimal::new(125, 1)));
        assert_eq!(lenient::parse(&json!("INR 1,200 - 1,500")), Some(Decimal::from(1200)));
        assert_eq!(lenient::parse(&json!("Cost: 50.")), Some(Decimal::from(50)));
        assert_eq!(lenient::parse(&json!("FREE")), Some(Decimal::ZERO));
        assert_eq!(lenient::parse(&json!("varies")), None);
        assert_eq!(lenient::parse(&json!(null)), None);
    }

    #[test]
    fn items_accept_title_and_activities_aliases() {
        let day: DayPlan = serde_json::from_value(json!({
            "day": 1,
            "date": "2024-11-07",
            "activities": [{ "time": "10:00", "title": "Agra Fort", "cost": "INR 50" }]
        }))
        .unwrap();
        assert_eq!(day.schedule[0].activity, "Agra Fort");
        assert_eq!(day.schedule[0].cost, Some(Decimal::from(50)));
    }
}
