//! HTTP handlers for the risk assessment API.

pub mod assessments;

pub use assessments::{create_assessment_handler, list_assessments_handler};
