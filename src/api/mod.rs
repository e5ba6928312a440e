//! API request and response types

pub mod extract;
pub mod response;

pub use extract::ApiJson;
pub use response::{Accepted, DataResponse, MessageResponse};
