//! # riskgate-core
//!
//! Core shared types for the riskgate workspace: strongly typed
//! identifiers used across the database, auth, and API crates.

mod ids;

pub use ids::{AssessmentId, ChallengeId, FactorId, ParseIdError, UserId};
