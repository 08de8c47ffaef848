//! Profile directory lookups (read-only).

use std::sync::Arc;

use crate::models::principal::Role;
use crate::Result;

use super::db::Database;

/// A display profile row: name and optional avatar.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProfileRow {
    /// Display name shown next to messages.
    pub display_name: String,
    /// Avatar URL, when the profile has one.
    pub avatar_url: Option<String>,
}

/// Read-only repository over the profile table.
#[derive(Clone)]
pub struct ProfileRepo {
    db: Arc<Database>,
}

impl ProfileRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Find the display profile for a principal, scoped by role.
    ///
    /// Returns `None` when no profile row exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn find_display(
        &self,
        principal_id: &str,
        role: Role,
    ) -> Result<Option<ProfileRow>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "SELECT display_name, avatar_url
             FROM profile WHERE principal_id = ?1 AND role = ?2",
        )
        .bind(principal_id)
        .bind(role.as_str())
        .fetch_optional(self.db.as_ref())
        .await?;
        Ok(row)
    }
}
