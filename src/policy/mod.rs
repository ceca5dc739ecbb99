//! Route access policy for page navigations.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. excluded path (assets, API) → allow
//! 2. anonymous on a protected path → login, carrying the return path
//! 3. signed in on an auth page → role dashboard
//! 4. signed in on a non-public path outside the role → role dashboard, denied
//! 5. signed in on `/` → role dashboard
//! 6. allow
//!
//! Rule 2 comes before rule 4 so an anonymous visitor to `/admin` is sent to
//! the login page with a way back, not bounced as forbidden. Rule 3 comes
//! before rule 5 so auth pages always resolve through the signed-in branch.

use crate::flash::{strip_message, FlashMessage};
use crate::identity::{Identity, Role};
use crate::routes::{sanitize_return_path, RouteTable};

/// Landing page for signed-in users whose role tag is not recognized
pub const FALLBACK_LANDING: &str = "/booking";

/// Query parameter carrying the post-login return path
pub const RETURN_PARAM: &str = "redirect";

/// Which rule produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Excluded,
    LoginRequired,
    AlreadyAuthenticated,
    PermissionDenied,
    RootRedirect,
    Allowed,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Excluded => "excluded",
            Rule::LoginRequired => "login_required",
            Rule::AlreadyAuthenticated => "already_authenticated",
            Rule::PermissionDenied => "permission_denied",
            Rule::RootRedirect => "root_redirect",
            Rule::Allowed => "allowed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    /// Path to come back to after login
    pub return_to: Option<String>,
    pub message: Option<FlashMessage>,
}

impl Redirect {
    fn to(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            return_to: None,
            message: None,
        }
    }

    fn with_message(mut self, message: FlashMessage) -> Self {
        self.message = Some(message);
        self
    }

    /// Full `Location` value: target, return path, then message parameters.
    pub fn location(&self) -> String {
        let mut location = self.target.clone();
        if let Some(return_to) = &self.return_to {
            let separator = if location.contains('?') { '&' } else { '?' };
            location = format!(
                "{location}{separator}{RETURN_PARAM}={}",
                urlencoding::encode(return_to)
            );
        }
        match &self.message {
            Some(message) => message.append_to(&location),
            None => location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Redirect),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decision together with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub rule: Rule,
    pub decision: Decision,
}

/// Landing page for `role`, or the shared fallback for unknown roles
pub fn landing_for(role: Option<Role>) -> &'static str {
    role.map(|r| r.dashboard_path()).unwrap_or(FALLBACK_LANDING)
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    routes: RouteTable,
}

impl AccessPolicy {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn decide(&self, identity: &Identity, path: &str) -> Decision {
        self.evaluate(identity, path, None).decision
    }

    /// Evaluate the rules for `path`. `query` is only used to rebuild the
    /// return path on login redirects.
    pub fn evaluate(&self, identity: &Identity, path: &str, query: Option<&str>) -> Evaluation {
        let routes = &self.routes;

        if routes.is_excluded(path) {
            return allow(Rule::Excluded);
        }

        if !identity.authenticated {
            if routes.is_protected(path) {
                // A message meant for this page must not replay after login
                let return_to = match query.filter(|q| !q.is_empty()) {
                    Some(query) => strip_message(&format!("{path}?{query}")),
                    None => path.to_string(),
                };
                let redirect = Redirect {
                    return_to: sanitize_return_path(&return_to).map(str::to_string),
                    ..Redirect::to(routes.login_path.clone())
                }
                .with_message(FlashMessage::login_required());
                return redirect_by(Rule::LoginRequired, redirect);
            }
            return allow(Rule::Allowed);
        }

        let role = identity.known_role();
        let landing = landing_for(role);

        if routes.is_auth_page(path) {
            return redirect_by(Rule::AlreadyAuthenticated, Redirect::to(landing));
        }

        if !routes.is_public(path) && !routes.has_role_access(role, path) {
            let redirect = Redirect::to(landing).with_message(FlashMessage::permission_denied());
            return redirect_by(Rule::PermissionDenied, redirect);
        }

        if path == "/" {
            return redirect_by(Rule::RootRedirect, Redirect::to(landing));
        }

        allow(Rule::Allowed)
    }
}

fn allow(rule: Rule) -> Evaluation {
    Evaluation {
        rule,
        decision: Decision::Allow,
    }
}

fn redirect_by(rule: Rule, redirect: Redirect) -> Evaluation {
    Evaluation {
        rule,
        decision: Decision::Redirect(redirect),
    }
}
