//! Static route tables and path classification
//!
//! Paths are classified against three sets: exact-match public pages,
//! prefix-match protected areas, and one area prefix per role. Asset and
//! API paths are excluded before any of this runs.

use crate::identity::Role;

/// Area of the app a path belongs to, by prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleArea {
    Admin,
    Barber,
    /// Shared area open to every authenticated role
    Customer,
    None,
}

impl RoleArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleArea::Admin => "admin",
            RoleArea::Barber => "barber",
            RoleArea::Customer => "customer",
            RoleArea::None => "none",
        }
    }
}

/// Route configuration the access policy is evaluated against
#[derive(Debug, Clone)]
pub struct RouteTable {
    /// Exact-match paths reachable without a session
    pub public: Vec<String>,
    /// Exact-match pages that only make sense without a session
    pub auth_pages: Vec<String>,
    pub admin_prefixes: Vec<String>,
    pub barber_prefixes: Vec<String>,
    pub customer_prefixes: Vec<String>,
    /// Prefixes that never reach the policy (framework internals, API proxy)
    pub excluded_prefixes: Vec<String>,
    pub login_path: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        fn owned(paths: &[&str]) -> Vec<String> {
            paths.iter().map(|p| p.to_string()).collect()
        }

        Self {
            public: owned(&["/", "/login", "/register"]),
            auth_pages: owned(&["/login", "/register"]),
            admin_prefixes: owned(&["/admin"]),
            barber_prefixes: owned(&["/barber"]),
            customer_prefixes: owned(&["/booking", "/riwayat", "/galeri"]),
            excluded_prefixes: owned(&["/_next", "/api"]),
            login_path: "/login".to_string(),
        }
    }
}

fn has_any_prefix(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

impl RouteTable {
    pub fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|p| p == path)
    }

    /// True for every path under an admin, barber or customer area
    pub fn is_protected(&self, path: &str) -> bool {
        self.role_area_of(path) != RoleArea::None
    }

    pub fn is_auth_page(&self, path: &str) -> bool {
        self.auth_pages.iter().any(|p| p == path)
    }

    pub fn role_area_of(&self, path: &str) -> RoleArea {
        if has_any_prefix(path, &self.admin_prefixes) {
            RoleArea::Admin
        } else if has_any_prefix(path, &self.barber_prefixes) {
            RoleArea::Barber
        } else if has_any_prefix(path, &self.customer_prefixes) {
            RoleArea::Customer
        } else {
            RoleArea::None
        }
    }

    /// Framework internals, API calls and static files (a `.` in the last
    /// segment). `.` and `..` are traversal segments, not file names.
    pub fn is_excluded(&self, path: &str) -> bool {
        if has_any_prefix(path, &self.excluded_prefixes) {
            return true;
        }

        let last = path.rsplit('/').next().unwrap_or("");
        last != "." && last != ".." && last.contains('.')
    }

    /// Whether a signed-in user with `role` may enter `path`. `None` is a
    /// signed-in user whose role tag is not recognized: it still reaches the
    /// shared customer area but no role-scoped one. Anything outside a known
    /// area is denied.
    pub fn has_role_access(&self, role: Option<Role>, path: &str) -> bool {
        match (self.role_area_of(path), role) {
            (RoleArea::Admin, Some(Role::Admin)) => true,
            (RoleArea::Barber, Some(Role::Barber)) => true,
            (RoleArea::Customer, _) => true,
            _ => false,
        }
    }
}

/// Validate a post-login return target.
///
/// Only same-origin absolute paths are accepted; `//host` and anything with
/// a scheme or backslash are rejected so the login flow cannot be turned
/// into an open redirect.
pub fn sanitize_return_path(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    if !raw.starts_with('/') || raw.starts_with("//") || raw.contains('\\') {
        return None;
    }
    if raw.chars().any(|c| c.is_control()) {
        return None;
    }
    Some(raw)
}
