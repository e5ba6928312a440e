use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use validator::ValidateEmail;

use super::validation::ValidationError;

static WHATSAPP_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,20}$").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Whatsapp,
}

/// Where to deliver a saved itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notification_preferences: Vec<NotificationChannel>,
}

impl ContactInfo {
    /// Trim the fields and check them, returning the first failure.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.email = self.email.trim().to_string();
        if !self.email.validate_email() {
            return Err(ValidationError::new("email", "Please enter a valid email address"));
        }

        self.whatsapp = self
            .whatsapp
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty());
        if let Some(number) = &self.whatsapp {
            let digits = number.chars().filter(char::is_ascii_digit).count();
            if !WHATSAPP_NUMBER.is_match(number) || !(7..=15).contains(&digits) {
                return Err(ValidationError::new(
                    "whatsapp",
                    "Please enter a valid WhatsApp number",
                ));
            }
        }

        if self.notification_preferences.contains(&NotificationChannel::Whatsapp)
            && self.whatsapp.is_none()
        {
            return Err(ValidationError::new(
                "whatsapp",
                "A WhatsApp number is required for WhatsApp notifications",
            ));
        }
        let mut channels = Vec::with_capacity(self.notification_preferences.len());
        for channel in self.notification_preferences {
            if !channels.contains(&channel) {
                channels.push(channel);
            }
        }
        self.notification_preferences = channels;

        Ok(self)
    }
}

/// Validate `contact` and, only if it is valid, pass it on to `save`.
pub async fn submit_contact<F, Fut>(contact: ContactInfo, save: F) -> Result<(), ValidationError>
where
    F: FnOnce(ContactInfo) -> Fut,
    Fut: Future<Output = ()>,
{
    let contact = contact.validated()?;
    save(contact).await;
    Ok(())
}
