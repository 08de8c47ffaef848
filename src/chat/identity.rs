//! Display identity resolution for message decoration.

use tracing::warn;

use crate::models::principal::{Principal, Role};
use crate::persistence::profile_repo::ProfileRepo;

/// Display name and avatar used to decorate messages and notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayProfile {
    /// Display name of the principal.
    pub name: String,
    /// Avatar URL, when the profile has one.
    pub avatar_url: Option<String>,
}

/// Role-generic label used when no profile record exists.
fn fallback_label(role: Role) -> &'static str {
    match role {
        Role::Customer => "Customer",
        Role::Agent => "Delivery Agent",
    }
}

/// Resolves principals to their display profile.
#[derive(Clone)]
pub struct IdentityResolver {
    profiles: ProfileRepo,
}

impl IdentityResolver {
    /// Create a new resolver over the profile directory.
    #[must_use]
    pub fn new(profiles: ProfileRepo) -> Self {
        Self { profiles }
    }

    /// Resolve the display profile for a principal.
    ///
    /// Lookup failure is non-fatal: a missing row or a directory error
    /// yields the role-generic label with no avatar, never an error.
    pub async fn resolve_display(&self, principal: &Principal) -> DisplayProfile {
        let role = principal.role();
        match self.profiles.find_display(principal.id(), role).await {
            Ok(Some(row)) => DisplayProfile {
                name: row.display_name,
                avatar_url: row.avatar_url,
            },
            Ok(None) => DisplayProfile {
                name: fallback_label(role).to_owned(),
                avatar_url: None,
            },
            Err(err) => {
                warn!(principal = %principal.id(), %err, "profile lookup failed, using generic label");
                DisplayProfile {
                    name: fallback_label(role).to_owned(),
                    avatar_url: None,
                }
            }
        }
    }
}
