//! Trip preference form: wire types, per-step validation and the
//! draft → validated conversion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::{
    ValidationError, MAX_SPECIAL_REQUIREMENTS_LEN, MAX_TRIP_DAYS, MAX_TRAVELERS, MIN_DAILY_BUDGET,
    MIN_DESTINATION_LEN, MIN_TRAVELERS,
};

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Capitalized form used in rendered documents.
            pub fn label(&self) -> String {
                let s = self.as_str();
                let mut chars = s.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum!(GroupType {
    Solo => "solo",
    Couple => "couple",
    Family => "family",
    Friends => "friends",
});

labelled_enum!(TripStyle {
    Adventure => "adventure",
    Cultural => "cultural",
    Relaxed => "relaxed",
    Foodie => "foodie",
    Budget => "budget",
});

labelled_enum!(AccommodationType {
    Hotel => "hotel",
    Hostel => "hostel",
    Apartment => "apartment",
    Resort => "resort",
    Local => "local",
});

labelled_enum!(ActivityLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

/// Inclusive calendar date range of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    #[serde(deserialize_with = "iso_date::deserialize")]
    from: NaiveDate,
    #[serde(deserialize_with = "iso_date::deserialize")]
    to: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = String;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.from, raw.to).map_err(|e| e.message)
    }
}

impl DateRange {
    /// A range may start and end on the same day, and spans at most
    /// [`MAX_TRIP_DAYS`] days.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        let range = Self { from, to };
        range.check()?;
        Ok(range)
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        if self.to < self.from {
            return Err(ValidationError::new(
                "dates",
                "Return date cannot be before the departure date",
            ));
        }
        if (self.to - self.from).num_days() > i64::from(MAX_TRIP_DAYS) {
            return Err(ValidationError::new(
                "dates",
                format!("Trips can be at most {} days long", MAX_TRIP_DAYS),
            ));
        }
        Ok(())
    }

    /// Number of day sections in the itinerary: whole days between the two
    /// dates (`ceil((to - from) / 1 day)`).
    pub fn day_count(&self) -> u32 {
        (self.to - self.from).num_days().max(0) as u32
    }

    /// Date of the 0-based `offset`-th day of the trip.
    pub fn day(&self, offset: u32) -> NaiveDate {
        self.from + chrono::Duration::days(i64::from(offset))
    }

    /// Short display form, e.g. `Nov 7 – Nov 15, 2024`.
    pub fn display_short(&self) -> String {
        use chrono::Datelike;

        if self.from.year() == self.to.year() {
            format!(
                "{} \u{2013} {}",
                self.from.format("%b %-d"),
                self.to.format("%b %-d, %Y")
            )
        } else {
            format!(
                "{} \u{2013} {}",
                self.from.format("%b %-d, %Y"),
                self.to.format("%b %-d, %Y")
            )
        }
    }

    /// Long display form used on the PDF cover, e.g. `Nov 07, 2024 - Nov 15, 2024`.
    pub fn display_long(&self) -> String {
        format!(
            "{} - {}",
            self.from.format("%b %d, %Y"),
            self.to.format("%b %d, %Y")
        )
    }
}

/// Fully validated trip preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripFormData {
    pub destination: String,
    pub dates: DateRange,
    pub travelers: u32,
    pub group_type: GroupType,
    pub trip_style: TripStyle,
    pub budget: u32,
    pub interests: Vec<String>,
    pub dietary_preferences: Vec<String>,
    pub accommodation_type: AccommodationType,
    pub activity_level: ActivityLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRangeDraft {
    #[serde(default, deserialize_with = "iso_date::deserialize_opt")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "iso_date::deserialize_opt")]
    pub to: Option<NaiveDate>,
}

/// Partially filled trip form. Every field may be missing; converting into
/// [`TripFormData`] runs the validation of all three steps in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripFormDraft {
    pub destination: Option<String>,
    pub dates: Option<DateRangeDraft>,
    pub travelers: Option<i64>,
    pub group_type: Option<GroupType>,
    pub trip_style: Option<TripStyle>,
    pub budget: Option<i64>,
    pub interests: Vec<String>,
    pub dietary_preferences: Vec<String>,
    pub accommodation_type: Option<AccommodationType>,
    pub activity_level: Option<ActivityLevel>,
    pub special_requirements: Option<String>,
}

impl TripFormDraft {
    /// A fresh form session with the defaults the form starts from.
    pub fn with_form_defaults() -> Self {
        Self {
            destination: Some(String::new()),
            travelers: Some(1),
            group_type: Some(GroupType::Solo),
            trip_style: Some(TripStyle::Cultural),
            budget: Some(5000),
            accommodation_type: Some(AccommodationType::Hotel),
            activity_level: Some(ActivityLevel::Medium),
            special_requirements: Some(String::new()),
            ..Self::default()
        }
    }
}

impl From<TripFormData> for TripFormDraft {
    fn from(data: TripFormData) -> Self {
        Self {
            destination: Some(data.destination),
            dates: Some(DateRangeDraft {
                from: Some(data.dates.from),
                to: Some(data.dates.to),
            }),
            travelers: Some(i64::from(data.travelers)),
            group_type: Some(data.group_type),
            trip_style: Some(data.trip_style),
            budget: Some(i64::from(data.budget)),
            interests: data.interests,
            dietary_preferences: data.dietary_preferences,
            accommodation_type: Some(data.accommodation_type),
            activity_level: Some(data.activity_level),
            special_requirements: data.special_requirements,
        }
    }
}

/// The three wizard steps and the fields each one owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormStep {
    /// destination, dates, travelers, group type
    Basics,
    /// trip style, interests, dietary preferences
    Preferences,
    /// accommodation, budget, activity level, special requirements
    Logistics,
}

impl FormStep {
    pub const ALL: [FormStep; 3] = [Self::Basics, Self::Preferences, Self::Logistics];

    pub fn number(&self) -> u8 {
        match self {
            Self::Basics => 1,
            Self::Preferences => 2,
            Self::Logistics => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Basics),
            2 => Some(Self::Preferences),
            3 => Some(Self::Logistics),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}

/// Validate only the fields owned by `step`, returning the first failure.
pub fn validate_step(step: FormStep, draft: &TripFormDraft) -> Result<(), ValidationError> {
    match step {
        FormStep::Basics => {
            destination(draft)?;
            dates(draft)?;
            travelers(draft)?;
            group_type(draft)?;
        }
        FormStep::Preferences => {
            trip_style(draft)?;
            interests(draft)?;
        }
        FormStep::Logistics => {
            accommodation_type(draft)?;
            budget(draft)?;
            activity_level(draft)?;
            special_requirements(draft)?;
        }
    }
    Ok(())
}

impl TryFrom<TripFormDraft> for TripFormData {
    type Error = ValidationError;

    fn try_from(draft: TripFormDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            destination: destination(&draft)?,
            dates: dates(&draft)?,
            travelers: travelers(&draft)?,
            group_type: group_type(&draft)?,
            trip_style: trip_style(&draft)?,
            interests: interests(&draft)?,
            dietary_preferences: tags(&draft.dietary_preferences),
            accommodation_type: accommodation_type(&draft)?,
            budget: budget(&draft)?,
            activity_level: activity_level(&draft)?,
            special_requirements: special_requirements(&draft)?,
        })
    }
}

fn destination(draft: &TripFormDraft) -> Result<String, ValidationError> {
    let value = draft.destination.as_deref().unwrap_or_default().trim();
    if value.chars().count() < MIN_DESTINATION_LEN {
        return Err(ValidationError::new("destination", "Please enter a destination"));
    }
    Ok(value.to_string())
}

fn dates(draft: &TripFormDraft) -> Result<DateRange, ValidationError> {
    let (from, to) = match &draft.dates {
        Some(DateRangeDraft {
            from: Some(from),
            to: Some(to),
        }) => (*from, *to),
        _ => return Err(ValidationError::new("dates", "Please select your travel dates")),
    };
    DateRange::new(from, to)
}

fn travelers(draft: &TripFormDraft) -> Result<u32, ValidationError> {
    match draft.travelers {
        None => Err(ValidationError::new("travelers", "Please enter the number of travelers")),
        Some(n) if !(MIN_TRAVELERS..=MAX_TRAVELERS).contains(&n) => Err(ValidationError::new(
            "travelers",
            format!("Travelers must be between {} and {}", MIN_TRAVELERS, MAX_TRAVELERS),
        )),
        Some(n) => Ok(n as u32),
    }
}

fn group_type(draft: &TripFormDraft) -> Result<GroupType, ValidationError> {
    draft
        .group_type
        .ok_or_else(|| ValidationError::new("groupType", "Please choose who you're traveling with"))
}

fn trip_style(draft: &TripFormDraft) -> Result<TripStyle, ValidationError> {
    draft
        .trip_style
        .ok_or_else(|| ValidationError::new("tripStyle", "Please choose a trip style"))
}

fn interests(draft: &TripFormDraft) -> Result<Vec<String>, ValidationError> {
    let interests = tags(&draft.interests);
    if interests.is_empty() {
        return Err(ValidationError::new("interests", "Select at least one interest"));
    }
    Ok(interests)
}

fn accommodation_type(draft: &TripFormDraft) -> Result<AccommodationType, ValidationError> {
    draft.accommodation_type.ok_or_else(|| {
        ValidationError::new("accommodationType", "Please choose an accommodation type")
    })
}

fn budget(draft: &TripFormDraft) -> Result<u32, ValidationError> {
    match draft.budget {
        None => Err(ValidationError::new("budget", "Please enter a daily budget")),
        Some(b) if b < MIN_DAILY_BUDGET => Err(ValidationError::new(
            "budget",
            format!("Daily budget must be at least \u{20b9}{}", MIN_DAILY_BUDGET),
        )),
        Some(b) => u32::try_from(b)
            .map_err(|_| ValidationError::new("budget", "Daily budget is too large")),
    }
}

fn activity_level(draft: &TripFormDraft) -> Result<ActivityLevel, ValidationError> {
    draft
        .activity_level
        .ok_or_else(|| ValidationError::new("activityLevel", "Please choose an activity level"))
}

fn special_requirements(draft: &TripFormDraft) -> Result<Option<String>, ValidationError> {
    let value = draft
        .special_requirements
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match value {
        Some(s) if s.chars().count() > MAX_SPECIAL_REQUIREMENTS_LEN => Err(ValidationError::new(
            "specialRequirements",
            format!(
                "Special requirements must be at most {} characters",
                MAX_SPECIAL_REQUIREMENTS_LEN
            ),
        )),
        other => Ok(other.map(str::to_string)),
    }
}

/// Trimmed, non-empty, de-duplicated tags in their original order.
fn tags(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !out.iter().any(|seen| seen == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Dates arrive either as `YYYY-MM-DD` or as a full ISO-8601 timestamp
/// (`2024-11-07T00:00:00.000Z`); the calendar date is taken in the
/// timestamp's own offset.
pub(crate) mod iso_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw)))
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw))),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub fn agra_draft() -> TripFormDraft {
        serde_json::from_value(json!({
            "destination": "Agra",
            "dates": { "from": "2024-11-07", "to": "2024-11-15" },
            "travelers": 2,
            "groupType": "couple",
            "tripStyle": "cultural",
            "budget": 5000,
            "interests": ["history", "food"],
            "dietaryPreferences": ["vegetarian"],
            "accommodationType": "hotel",
            "activityLevel": "medium"
        }))
        .unwrap()
    }

    pub fn agra_form() -> TripFormData {
        TripFormData::try_from(agra_draft()).unwrap()
    }

    #[test]
    fn agra_trip_spans_eight_days() {
        let form = agra_form();
        assert_eq!(form.dates.day_count(), 8);
        assert_eq!(form.dates.display_short(), "Nov 7 \u{2013} Nov 15, 2024");
        assert_eq!(form.dates.display_long(), "Nov 07, 2024 - Nov 15, 2024");
    }

    #[test]
    fn day_count_matches_millisecond_formula() {
        let from = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        for len in 1..40i64 {
            let range = DateRange {
                from,
                to: from + chrono::Duration::days(len),
            };
            let ms = (range.to - range.from).num_milliseconds() as f64;
            assert_eq!(range.day_count() as f64, (ms / 86_400_000.0).ceil());
        }
    }

    #[test]
    fn cross_year_range_shows_both_years() {
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 12, 28).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
        };
        assert_eq!(range.display_short(), "Dec 28, 2024 \u{2013} Jan 3, 2025");
    }

    #[test]
    fn accepts_browser_iso_timestamps() {
        let draft: TripFormDraft = serde_json::from_value(json!({
            "dates": { "from": "2024-11-07T00:00:00.000Z", "to": "2024-11-15T10:30:00+05:30" }
        }))
        .unwrap();
        let dates = draft.dates.unwrap();
        assert_eq!(dates.from, NaiveDate::from_ymd_opt(2024, 11, 7));
        assert_eq!(dates.to, NaiveDate::from_ymd_opt(2024, 11, 15));
    }

    #[test]
    fn first_error_follows_step_order() {
        let mut draft = agra_draft();
        draft.destination = Some(" ".into());
        draft.interests.clear();
        let err = TripFormData::try_from(draft).unwrap_err();
        assert_eq!(err.field, "destination");
        assert_eq!(err.message, "Please enter a destination");
    }

    #[test]
    fn step_validation_only_checks_its_own_fields() {
        let mut draft = agra_draft();
        draft.budget = Some(10);
        assert!(validate_step(FormStep::Basics, &draft).is_ok());
        assert!(validate_step(FormStep::Preferences, &draft).is_ok());
        let err = validate_step(FormStep::Logistics, &draft).unwrap_err();
        assert_eq!(err.field, "budget");
    }

    #[test]
    fn rejects_out_of_range_travelers_and_inverted_dates() {
        let mut draft = agra_draft();
        draft.travelers = Some(11);
        assert_eq!(validate_step(FormStep::Basics, &draft).unwrap_err().field, "travelers");

        let mut draft = agra_draft();
        draft.dates = Some(DateRangeDraft {
            from: NaiveDate::from_ymd_opt(2024, 11, 15),
            to: NaiveDate::from_ymd_opt(2024, 11, 7),
        });
        assert_eq!(validate_step(FormStep::Basics, &draft).unwrap_err().field, "dates");
    }

    #[test]
    fn interests_are_required_and_deduplicated() {
        let mut draft = agra_draft();
        draft.interests = vec![" ".into()];
        assert_eq!(
            validate_step(FormStep::Preferences, &draft).unwrap_err().message,
            "Select at least one interest"
        );

        draft.interests = vec!["food".into(), " food ".into(), "art".into()];
        let form = TripFormData::try_from(draft).unwrap();
        assert_eq!(form.interests, vec!["food".to_string(), "art".to_string()]);
    }

    #[test]
    fn blank_special_requirements_become_none() {
        let mut draft = agra_draft();
        draft.special_requirements = Some("   ".into());
        assert_eq!(TripFormData::try_from(draft).unwrap().special_requirements, None);
    }

    #[test]
    fn form_defaults_fail_only_on_missing_inputs() {
        let draft = TripFormDraft::with_form_defaults();
        assert_eq!(validate_step(FormStep::Basics, &draft).unwrap_err().field, "destination");
        assert_eq!(
            validate_step(FormStep::Preferences, &draft).unwrap_err().field,
            "interests"
        );
        assert!(validate_step(FormStep::Logistics, &draft).is_ok());
    }

    #[test]
    fn steps_are_linear() {
        assert_eq!(FormStep::Basics.next(), Some(FormStep::Preferences));
        assert_eq!(FormStep::Logistics.next(), None);
        assert_eq!(FormStep::Basics.previous(), None);
        assert_eq!(FormStep::from_number(4), None);
    }

    #[test]
    fn same_day_trip_has_no_day_sections() {
        let mut draft = agra_draft();
        draft.dates = Some(DateRangeDraft {
            from: NaiveDate::from_ymd_opt(2024, 11, 7),
            to: NaiveDate::from_ymd_opt(2024, 11, 7),
        });
        assert!(validate_step(FormStep::Basics, &draft).is_ok());
        assert_eq!(TripFormData::try_from(draft).unwrap().dates.day_count(), 0);
    }

    #[test]
    fn trip_length_is_capped() {
        let from = NaiveDate::from_ymd_opt(2024, 11, 7).unwrap();
        let longest = from + chrono::Duration::days(i64::from(MAX_TRIP_DAYS));
        assert_eq!(DateRange::new(from, longest).unwrap().day_count(), MAX_TRIP_DAYS);

        let mut draft = agra_draft();
        draft.dates = Some(DateRangeDraft {
            from: Some(from),
            to: Some(longest + chrono::Duration::days(1)),
        });
        let err = validate_step(FormStep::Basics, &draft).unwrap_err();
        assert_eq!(err.field, "dates");
        assert_eq!(err.message, "Trips can be at most 30 days long");
    }

    #[test]
    fn date_range_json_is_checked() {
        let err = serde_json::from_value::<DateRange>(json!({ "from": "0001-01-01", "to": "9999-12-31" }))
            .unwrap_err();
        assert!(err.to_string().contains("Trips can be at most 30 days long"));
        assert!(serde_json::from_value::<DateRange>(json!({ "from": "2024-11-15", "to": "2024-11-07" })).is_err());
    }
}
