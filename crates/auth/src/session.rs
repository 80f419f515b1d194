use rijschool_domain::Role;
use serde::{Deserialize, Serialize};

/// Someone whose credentials were accepted by a verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Login name or e-mail address.
    pub subject: String,
    pub display_name: String,
    pub role: Role,
}

/// Request-scoped identity decoded from a session token.
///
/// Handlers receive it explicitly instead of looking up a global session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub subject: String,
    pub display_name: String,
    pub role: Role,
}

impl SessionContext {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

impl From<Principal> for SessionContext {
    fn from(principal: Principal) -> Self {
        Self {
            subject: principal.subject,
            display_name: principal.display_name,
            role: principal.role,
        }
    }
}
