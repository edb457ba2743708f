//! Route Guard Module
//!
//! The per-request access policy that sits in front of every page handler.
//! Given the requested path and whether the caller holds a session, it answers
//! whether the request may continue or must be bounced back to the home page.
//!
//! The policy is plain data (`RoutePolicy`) so the same value drives both the
//! interception filter and the route classification, and can be unit tested
//! without any HTTP plumbing.

/// RouteClass
///
/// Every path falls into exactly one of these classes. `Protected` is the
/// fallback for anything not explicitly listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Reachable by anyone, signed in or not.
    Open,
    /// Reachable only while signed out (sign-in / sign-up).
    AuthOnly,
    /// Reachable only while signed in.
    Protected,
}

/// Decision
///
/// The directive handed back to the routing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Continue to the originally requested handler.
    Allow,
    /// Redirect to the configured home path.
    RedirectHome,
}

/// decide
///
/// The core rule table, evaluated on an already classified path.
///
/// | session | class     | decision     |
/// |---------|-----------|--------------|
/// | yes     | Open      | Allow        |
/// | yes     | AuthOnly  | RedirectHome |
/// | yes     | Protected | Allow        |
/// | no      | Open      | Allow        |
/// | no      | AuthOnly  | Allow        |
/// | no      | Protected | RedirectHome |
pub fn decide(class: RouteClass, has_session: bool) -> Decision {
    match (has_session, class) {
        // A signed-in user has no business on the sign-in/sign-up pages.
        (true, RouteClass::AuthOnly) => Decision::RedirectHome,
        (false, RouteClass::Open) => Decision::Allow,
        (false, RouteClass::Protected) => Decision::RedirectHome,
        _ => Decision::Allow,
    }
}

/// RoutePolicy
///
/// Declarative route configuration: which paths are intercepted at all, and
/// how intercepted paths are classified. Matching against `open` and
/// `auth_only` is by exact path equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    open: Vec<String>,
    auth_only: Vec<String>,
    excluded_prefixes: Vec<String>,
    excluded_paths: Vec<String>,
    home: String,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new(["/"], ["/signin", "/signup"])
    }
}

impl RoutePolicy {
    /// Builds a policy with the given route sets and the standard exclusions
    /// (`/_internal`, `/api`, `/static` prefixes and `/favicon.ico`).
    pub fn new<O, A>(open: O, auth_only: A) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            open: open.into_iter().map(Into::into).collect(),
            auth_only: auth_only.into_iter().map(Into::into).collect(),
            excluded_prefixes: vec!["/_internal".into(), "/api".into(), "/static".into()],
            excluded_paths: vec!["/favicon.ico".into()],
            home: "/".into(),
        }
    }

    /// Replaces the redirect target used for `Decision::RedirectHome`.
    pub fn with_home(mut self, home: impl Into<String>) -> Self {
        self.home = home.into();
        self
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn open_routes(&self) -> &[String] {
        &self.open
    }

    pub fn auth_only_routes(&self) -> &[String] {
        &self.auth_only
    }

    /// intercepts
    ///
    /// Whether the guard runs for this path at all. Static assets, internal
    /// bundles and the `/api` surface bypass it and never trigger a session lookup.
    pub fn intercepts(&self, path: &str) -> bool {
        !(self.excluded_prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self.excluded_paths.iter().any(|p| p == path))
    }

    /// classify
    ///
    /// `AuthOnly` is checked before `Open`, so a path listed in both behaves as
    /// auth-only. Anything unlisted is `Protected`.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.auth_only.iter().any(|p| p == path) {
            RouteClass::AuthOnly
        } else if self.open.iter().any(|p| p == path) {
            RouteClass::Open
        } else {
            RouteClass::Protected
        }
    }

    /// decide
    ///
    /// Classifies `path` and applies the rule table.
    pub fn decide(&self, path: &str, has_session: bool) -> Decision {
        decide(self.classify(path), has_session)
    }
}
