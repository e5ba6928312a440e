//! Service layer modules for external integrations.
//!
//! Contains the chat-completion client, itinerary generation, the
//! destination catalog and the save/notify hand-off.

pub mod catalog;
pub mod itinerary;
pub mod llm_client;
pub mod notifier;

pub use catalog::DestinationCatalog;
pub use llm_client::LlmClient;
pub use notifier::Notifier;
