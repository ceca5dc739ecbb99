//! Request identity derived from the session cookie pair
//!
//! The login flow (an external collaborator) sets two cookies after a
//! successful credential exchange: an opaque session token and a role tag.
//! Nothing here verifies the token; presence of both values is what makes a
//! request authenticated. The role tag decides which route areas it may
//! enter.

use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Default name of the session token cookie
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";
/// Default name of the role tag cookie
pub const USER_ROLE_COOKIE: &str = "user_role";

/// Roles known to the barbershop app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Barber,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Barber => "barber",
            Role::Customer => "customer",
        }
    }

    /// Landing page for the role, used whenever a redirect has no more
    /// specific target.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Barber => "/barber/dashboard",
            Role::Customer => "/booking",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "barber" => Ok(Role::Barber),
            "customer" => Ok(Role::Customer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role cookie value as read from the request.
///
/// Values outside the closed [`Role`] set are kept verbatim so they can be
/// logged, but they never match any role area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleTag {
    Known(Role),
    Unrecognized(String),
}

impl RoleTag {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Role>() {
            Ok(role) => RoleTag::Known(role),
            Err(_) => RoleTag::Unrecognized(raw.to_string()),
        }
    }

    pub fn known(&self) -> Option<Role> {
        match self {
            RoleTag::Known(role) => Some(*role),
            RoleTag::Unrecognized(_) => None,
        }
    }
}

/// Identity of a single request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    /// True iff both the token and the role cookie are present and non-empty
    pub authenticated: bool,
    pub role: Option<RoleTag>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_role(role: Role) -> Self {
        Self {
            authenticated: true,
            role: Some(RoleTag::Known(role)),
        }
    }

    /// Recognized role, or `None` when the tag is missing or unknown
    pub fn known_role(&self) -> Option<Role> {
        self.role.as_ref().and_then(RoleTag::known)
    }
}

/// Read-only access to request cookies.
///
/// Implemented for the server-side cookie jar, a raw header map and a plain
/// map so callers can hand over whatever they already hold.
pub trait CookieSource {
    fn get(&self, name: &str) -> Option<String>;
}

impl CookieSource for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        // `value_trimmed` drops surrounding quotes, so `""` reads as empty
        CookieJar::get(self, name).map(|c| c.value_trimmed().to_string())
    }
}

/// Parsed through [`CookieJar::from_headers`] so the raw header and the jar
/// always agree on duplicates, percent-encoding and quoting.
impl CookieSource for HeaderMap {
    fn get(&self, name: &str) -> Option<String> {
        CookieSource::get(&CookieJar::from_headers(self), name)
    }
}

impl CookieSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Names of the two cookies that carry the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieNames {
    pub token: String,
    pub role: String,
}

impl Default for CookieNames {
    fn default() -> Self {
        Self {
            token: AUTH_TOKEN_COOKIE.to_string(),
            role: USER_ROLE_COOKIE.to_string(),
        }
    }
}

/// Build the request identity from its cookies. Never fails: absent cookies
/// are the anonymous state.
pub fn extract_identity<C: CookieSource + ?Sized>(cookies: &C, names: &CookieNames) -> Identity {
    let token = cookies.get(&names.token).filter(|v| !v.is_empty());
    let role = cookies.get(&names.role).filter(|v| !v.is_empty());

    Identity {
        authenticated: token.is_some() && role.is_some(),
        role: role.as_deref().map(RoleTag::parse),
    }
}
