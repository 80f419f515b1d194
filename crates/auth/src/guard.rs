//! Path-based role rules for the back office.
//!
//! Admin pages need [`Role::Admin`], instructor pages need
//! [`Role::Instructor`]. Anyone else is sent to the matching login page
//! instead of getting a 403.

use rijschool_domain::Role;

use crate::session::SessionContext;

pub const ADMIN_LOGIN_PATH: &str = "/login";
pub const INSTRUCTOR_LOGIN_PATH: &str = "/instructor/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

fn has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// The role a path demands, or `None` for public paths.
pub fn required_role(path: &str) -> Option<Role> {
    if has_prefix(path, "/admin") {
        return Some(Role::Admin);
    }
    if has_prefix(path, "/instructor") && !has_prefix(path, INSTRUCTOR_LOGIN_PATH) {
        return Some(Role::Instructor);
    }
    None
}

pub fn login_path_for(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_LOGIN_PATH,
        Role::Instructor => INSTRUCTOR_LOGIN_PATH,
    }
}

pub fn authorize(path: &str, session: Option<&SessionContext>) -> Access {
    let Some(required) = required_role(path) else {
        return Access::Allow;
    };

    match session {
        Some(session) if session.has_role(required) => Access::Allow,
        _ => Access::Redirect(login_path_for(required)),
    }
}
