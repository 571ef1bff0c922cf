//! Static access policy: which paths need a session, and which role.
//!
//! # Design Decisions
//! - Built once at startup, immutable for the process lifetime
//! - Prefix matching, case-sensitive, same as route matching elsewhere
//! - Protected prefixes are checked before auth pages

use crate::auth::Role;

/// What a protected path demands from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any verified session.
    Authenticated,
    /// A verified session whose role claim equals this role.
    Role(Role),
}

impl Requirement {
    pub fn admits(&self, role: Role) -> bool {
        match self {
            Requirement::Authenticated => true,
            Requirement::Role(required) => *required == role,
        }
    }
}

/// Classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    /// Login/register pages, which signed-in users are sent away from.
    AuthPage,
    Protected(Requirement),
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    protected: Vec<(String, Requirement)>,
    auth_pages: Vec<String>,
}

impl AccessPolicy {
    pub fn new(protected: Vec<(String, Requirement)>, auth_pages: Vec<String>) -> Self {
        Self {
            protected,
            auth_pages,
        }
    }

    /// `/dashboard` for admins, `/profile` for members, `/login` and `/register` as auth pages.
    pub fn site_default() -> Self {
        Self::new(
            vec![
                ("/dashboard".to_string(), Requirement::Role(Role::Admin)),
                ("/profile".to_string(), Requirement::Authenticated),
            ],
            vec!["/login".to_string(), "/register".to_string()],
        )
    }

    pub fn classify(&self, path: &str) -> PathClass {
        if let Some((_, requirement)) = self
            .protected
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
        {
            return PathClass::Protected(*requirement);
        }

        if self.auth_pages.iter().any(|p| path.starts_with(p.as_str())) {
            return PathClass::AuthPage;
        }

        PathClass::Public
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::site_default()
    }
}
