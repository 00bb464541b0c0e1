//! # riskgate-db
//!
//! Database access layer for the riskgate service.
//!
//! Provides:
//!
//! - [`DbPool`] - connection pool wrapper around `sqlx::PgPool`
//! - [`run_migrations`] - embedded versioned migrations
//! - [`set_user_context`] - row-level security context for user-owned rows
//! - Entity models under [`models`]
//!
//! ## Row-level security
//!
//! The `risk_analysis_history` table is protected by Postgres RLS policies
//! keyed on the `app.user_id` session variable. Queries against it must run
//! inside a transaction that has called [`set_user_context`] first; without
//! it, inserts are rejected and selects return no rows.

mod context;
mod error;
mod migrations;
pub mod models;
mod pool;

pub use context::set_user_context;
pub use error::DbError;
pub use migrations::run_migrations;
pub use pool::{DbPool, DbPoolConfig};
