//! Travel itinerary backend.
//!
//! Validates trip preferences collected by a three-step wizard, asks an
//! LLM provider for a day-by-day plan, and renders the structured result
//! as HTML or PDF. Also hosts destination autocomplete and the
//! save/notify hand-off.

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod services;
pub mod templates;
