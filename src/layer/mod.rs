//! Tower layers wrapped around the client stack

pub mod validation;

pub use validation::{A2AValidationLayer, A2AValidationService};
