//! One-shot user messages carried on redirect URLs
//!
//! A redirect may append `message=<text>&type=<severity>` to its target.
//! The page that receives it shows the message once and strips both
//! parameters (see [`surface`]). The channel is best effort: parameters may
//! be dropped, repeated, or missing and every consumer must cope.

pub mod surface;

use std::fmt;
use url::form_urlencoded;

pub use surface::{History, MessageSurface, Notifier};

/// Query parameter holding the message text
pub const MESSAGE_PARAM: &str = "message";
/// Query parameter holding the message severity
pub const TYPE_PARAM: &str = "type";

/// Shown when an anonymous visitor opens a protected page
pub const LOGIN_REQUIRED: &str = "Please log in to continue";
/// Shown when a signed-in user opens an area outside their role
pub const PERMISSION_DENIED: &str = "You do not have permission to access that page";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Lenient parse: anything unknown or missing is informational.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("success") => Severity::Success,
            Some("warning") => Severity::Warning,
            Some("error") => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub text: String,
    pub severity: Severity,
}

impl FlashMessage {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn login_required() -> Self {
        Self::new(LOGIN_REQUIRED, Severity::Info)
    }

    pub fn permission_denied() -> Self {
        Self::new(PERMISSION_DENIED, Severity::Error)
    }

    /// Append this message to `target` as `message`/`type` query parameters.
    pub fn append_to(&self, target: &str) -> String {
        let separator = if target.contains('?') { '&' } else { '?' };
        format!(
            "{target}{separator}{MESSAGE_PARAM}={}&{TYPE_PARAM}={}",
            urlencoding::encode(&self.text),
            self.severity.as_str()
        )
    }
}

/// Location split into its path, query and fragment parts
struct SplitUrl<'a> {
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn split_url(url: &str) -> SplitUrl<'_> {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    SplitUrl {
        path,
        query,
        fragment,
    }
}

fn decoded_key(pair: &str) -> Option<String> {
    form_urlencoded::parse(pair.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
}

/// Read the message carried by `url`, if any. An empty `message` counts as
/// absent.
pub fn read_message(url: &str) -> Option<FlashMessage> {
    let query = split_url(url).query?;

    let mut text = None;
    let mut severity = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            MESSAGE_PARAM if text.is_none() => text = Some(value.into_owned()),
            TYPE_PARAM if severity.is_none() => severity = Some(value.into_owned()),
            _ => {}
        }
    }

    let text = text.filter(|t| !t.trim().is_empty())?;
    Some(FlashMessage::new(
        text,
        Severity::parse_lenient(severity.as_deref()),
    ))
}

/// Remove every `message` and `type` parameter from `url`, keeping the other
/// parameters and the fragment untouched.
pub fn strip_message(url: &str) -> String {
    let parts = split_url(url);
    let kept: Vec<&str> = parts
        .query
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            !matches!(
                decoded_key(pair).as_deref(),
                Some(MESSAGE_PARAM) | Some(TYPE_PARAM)
            )
        })
        .collect();

    let mut out = parts.path.to_string();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(fragment) = parts.fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
