//! Static route classification for the session gate.
//!
//! Paths are classified once per request: public (auth) prefixes are checked
//! first, then protected prefixes, and anything unmatched is unrestricted.
//! A prefix matches the exact path or a path-segment boundary, so `/` as a
//! protected entry guards only the root rather than swallowing every path.

/// Classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a valid session.
    Protected,
    /// Auth surface; sessions are redirected away from it.
    Public,
    /// No session handling at all.
    Unrestricted,
}

/// Static route policy consulted by the session gate.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    protected: Vec<String>,
    public: Vec<String>,
    api_prefix: String,
    login_path: String,
    callback_path: String,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            protected: [
                "/",
                "/invoices",
                "/rooms",
                "/tenants",
                "/contracts",
                "/reports",
                "/api",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            public: vec!["/auth".to_owned()],
            api_prefix: "/api".to_owned(),
            login_path: "/auth/login".to_owned(),
            callback_path: "/auth/callback".to_owned(),
        }
    }
}

fn prefix_matches(path: &str, prefix: &str) -> bool {
    if path == prefix {
        return true;
    }
    // The root entry matches exactly; as a prefix it would swallow every
    // path.
    if prefix == "/" {
        return false;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

impl RoutePolicy {
    /// Build a policy from explicit prefix lists.
    pub fn new(
        protected: Vec<String>,
        public: Vec<String>,
        api_prefix: impl Into<String>,
        login_path: impl Into<String>,
        callback_path: impl Into<String>,
    ) -> Self {
        Self {
            protected,
            public,
            api_prefix: api_prefix.into(),
            login_path: login_path.into(),
            callback_path: callback_path.into(),
        }
    }

    /// Classify a request path. Public prefixes win over protected ones, so
    /// each path has exactly one authoritative class.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.public.iter().any(|p| prefix_matches(path, p)) {
            return RouteClass::Public;
        }
        if self.protected.iter().any(|p| prefix_matches(path, p)) {
            return RouteClass::Protected;
        }
        RouteClass::Unrestricted
    }

    /// Whether the path sits under the API prefix.
    pub fn is_api(&self, path: &str) -> bool {
        prefix_matches(path, &self.api_prefix)
    }

    /// Whether the path is the auth-callback sub-path, which stays reachable
    /// with an active session.
    pub fn is_callback(&self, path: &str) -> bool {
        prefix_matches(path, &self.callback_path)
    }

    /// Login path used for redirects.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", RouteClass::Protected)]
    #[case("/invoices", RouteClass::Protected)]
    #[case("/invoices/42", RouteClass::Protected)]
    #[case("/api/invoices", RouteClass::Protected)]
    #[case("/auth/login", RouteClass::Public)]
    #[case("/auth/callback", RouteClass::Public)]
    #[case("/favicon.ico", RouteClass::Unrestricted)]
    #[case("/health/live", RouteClass::Unrestricted)]
    fn default_policy_classifies_paths(#[case] path: &str, #[case] expected: RouteClass) {
        assert_eq!(RoutePolicy::default().classify(path), expected);
    }

    #[rstest]
    fn root_prefix_does_not_swallow_sibling_paths() {
        // "/" guards only the exact root; "/authx" must not match "/auth"
        // either.
        let policy = RoutePolicy::default();
        assert_eq!(policy.classify("/authx"), RouteClass::Unrestricted);
        assert_eq!(policy.classify("/invoicesx"), RouteClass::Unrestricted);
    }

    #[rstest]
    fn public_wins_over_protected() {
        let policy = RoutePolicy::new(
            vec!["/auth".into()],
            vec!["/auth".into()],
            "/api",
            "/auth/login",
            "/auth/callback",
        );
        assert_eq!(policy.classify("/auth/login"), RouteClass::Public);
    }

    #[rstest]
    #[case("/api", true)]
    #[case("/api/invoices", true)]
    #[case("/apix", false)]
    #[case("/invoices", false)]
    fn api_prefix_matches_on_segment_boundaries(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(RoutePolicy::default().is_api(path), expected);
    }

    #[rstest]
    fn callback_is_detected() {
        let policy = RoutePolicy::default();
        assert!(policy.is_callback("/auth/callback"));
        assert!(!policy.is_callback("/auth/login"));
    }
}
