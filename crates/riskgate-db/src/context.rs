//! Row-level security context management.
//!
//! History rows are isolated per user by Postgres RLS policies keyed on the
//! `app.user_id` session variable. The variable is set with `set_config(...,
//! true)` so it is scoped to the current transaction and cannot leak across
//! pooled connections.

use riskgate_core::UserId;
use sqlx::PgExecutor;

use crate::error::DbError;

/// Set the RLS user context for the current transaction.
///
/// Must be called inside a transaction before any query against a
/// user-scoped table. The setting is transaction-local (`SET LOCAL`
/// semantics) and resets automatically at commit or rollback.
///
/// # Errors
///
/// Returns `DbError::QueryFailed` if the statement cannot be executed.
pub async fn set_user_context<'e, E>(executor: E, user_id: UserId) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query("SELECT set_config('app.user_id', $1::text, true)")
        .bind(user_id.as_uuid())
        .execute(executor)
        .await
        .map_err(DbError::QueryFailed)?;
    Ok(())
}

