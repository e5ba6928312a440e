//! Domain types and DTOs
//!
//! Trip preferences, the generated itinerary model, contact details and
//! the client-side wizard/autocomplete state machines.

pub mod autocomplete;
pub mod contact;
pub mod form;
pub mod plan;
pub mod validation;
pub mod wizard;

// Re-export commonly used types
pub use contact::{ContactInfo, NotificationChannel};
pub use form::{DateRange, FormStep, TripFormData, TripFormDraft};
pub use plan::{DayPlan, ScheduleItem, TripPlan, TripPlanDocument};
pub use validation::ValidationError;
