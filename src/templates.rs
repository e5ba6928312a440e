//! Handlebars templates for the itinerary page and the generation prompt.
//!
//! Every `{{ }}` interpolation is HTML-escaped, so model output and form
//! input never reach the page as markup. The prompt is plain text and uses
//! triple-stash `{{{ }}}` throughout.

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

pub const ITINERARY_PAGE: &str = "itinerary-page";
pub const TRIP_PROMPT: &str = "trip-prompt";

const EMBEDDED: [(&str, &str); 2] = [
    (ITINERARY_PAGE, include_str!("../templates/itinerary.html.hbs")),
    (TRIP_PROMPT, include_str!("../templates/trip_prompt.hbs")),
];

/// Registry of the compiled templates, built once at startup.
pub struct Templates {
    hbs: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut hbs = Handlebars::new();
        for (name, source) in EMBEDDED {
            hbs.register_template_string(name, source)?;
        }
        tracing::debug!(count = EMBEDDED.len(), "Templates registered");
        Ok(Self { hbs })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, RenderError> {
        self.hbs.render(name, data)
    }
}
