//! Business logic for the risk assessment API.

mod history_service;

pub use history_service::{HistoryService, DEFAULT_HISTORY_LIMIT};
