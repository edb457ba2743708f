use account_portal::guard::{Decision, RouteClass, RoutePolicy, decide};

const AUTH_ONLY: [&str; 2] = ["/signin", "/signup"];
const PROTECTED_SAMPLES: [&str; 8] = [
    "/profile",
    "/settings",
    "/settings/profile",
    "/settings/account",
    "/does-not-exist",
    "/signin/",
    "/SIGNIN",
    "",
];

// --- Rule table ---

#[test]
fn test_rule_table_matches_every_combination() {
    let cases = [
        (true, RouteClass::Open, Decision::Allow),
        (true, RouteClass::AuthOnly, Decision::RedirectHome),
        (true, RouteClass::Protected, Decision::Allow),
        (false, RouteClass::Open, Decision::Allow),
        (false, RouteClass::AuthOnly, Decision::Allow),
        (false, RouteClass::Protected, Decision::RedirectHome),
    ];

    for (has_session, class, expected) in cases {
        assert_eq!(
            decide(class, has_session),
            expected,
            "session={} class={:?}",
            has_session,
            class
        );
    }
}

// --- Default policy ---

#[test]
fn test_signed_in_user_is_bounced_from_auth_pages() {
    let policy = RoutePolicy::default();
    for path in AUTH_ONLY {
        assert_eq!(policy.decide(path, true), Decision::RedirectHome, "{}", path);
    }
}

#[test]
fn test_signed_out_user_may_reach_auth_pages() {
    let policy = RoutePolicy::default();
    for path in AUTH_ONLY {
        assert_eq!(policy.decide(path, false), Decision::Allow, "{}", path);
    }
}

#[test]
fn test_home_is_open_to_everyone() {
    let policy = RoutePolicy::default();
    assert_eq!(policy.decide("/", true), Decision::Allow);
    assert_eq!(policy.decide("/", false), Decision::Allow);
}

#[test]
fn test_signed_out_user_is_redirected_from_everything_else() {
    let policy = RoutePolicy::default();
    for path in PROTECTED_SAMPLES {
        assert_eq!(policy.decide(path, false), Decision::RedirectHome, "{:?}", path);
    }
}

#[test]
fn test_signed_in_user_reaches_everything_but_auth_pages() {
    let policy = RoutePolicy::default();
    for path in PROTECTED_SAMPLES.iter().copied().chain(["/"]) {
        assert_eq!(policy.decide(path, true), Decision::Allow, "{:?}", path);
    }
}

#[test]
fn test_decide_is_stable_across_repeated_calls() {
    let policy = RoutePolicy::default();
    for path in ["/", "/signin", "/profile"] {
        for has_session in [true, false] {
            let first = policy.decide(path, has_session);
            for _ in 0..10 {
                assert_eq!(policy.decide(path, has_session), first);
            }
        }
    }
}

// --- Classification ---

#[test]
fn test_classification_is_exact_match() {
    let policy = RoutePolicy::default();
    assert_eq!(policy.classify("/"), RouteClass::Open);
    assert_eq!(policy.classify("/signin"), RouteClass::AuthOnly);
    assert_eq!(policy.classify("/signup"), RouteClass::AuthOnly);
    // No prefix or trailing-slash leniency.
    assert_eq!(policy.classify("/signin/"), RouteClass::Protected);
    assert_eq!(policy.classify("/signup/verify"), RouteClass::Protected);
    assert_eq!(policy.classify("//"), RouteClass::Protected);
}

#[test]
fn test_every_path_lands_in_exactly_one_class() {
    let policy = RoutePolicy::default();
    let paths = ["/", "/signin", "/signup", "/profile", "/x/y/z", "", "/%20"];

    for path in paths {
        let class = policy.classify(path);
        let in_open = policy.open_routes().iter().any(|p| p == path);
        let in_auth = policy.auth_only_routes().iter().any(|p| p == path);
        match class {
            RouteClass::Open => assert!(in_open && !in_auth),
            RouteClass::AuthOnly => assert!(in_auth),
            RouteClass::Protected => assert!(!in_open && !in_auth),
        }
    }
}

#[test]
fn test_path_listed_twice_behaves_as_auth_only() {
    let policy = RoutePolicy::new(["/", "/welcome"], ["/welcome"]);
    assert_eq!(policy.classify("/welcome"), RouteClass::AuthOnly);
    assert_eq!(policy.decide("/welcome", true), Decision::RedirectHome);
    assert_eq!(policy.decide("/welcome", false), Decision::Allow);
}

#[test]
fn test_custom_route_sets() {
    let policy = RoutePolicy::new(["/", "/about", "/pricing"], ["/login"]);

    assert_eq!(policy.decide("/about", false), Decision::Allow);
    assert_eq!(policy.decide("/login", true), Decision::RedirectHome);
    // The default auth pages are ordinary protected pages here.
    assert_eq!(policy.decide("/signin", false), Decision::RedirectHome);
    assert_eq!(policy.decide("/signin", true), Decision::Allow);
}

#[test]
fn test_home_target_is_configurable() {
    let policy = RoutePolicy::default();
    assert_eq!(policy.home(), "/");

    let policy = RoutePolicy::default().with_home("/welcome");
    assert_eq!(policy.home(), "/welcome");
}

// --- Interception filter ---

#[test]
fn test_static_internal_and_api_paths_are_not_intercepted() {
    let policy = RoutePolicy::default();
    for path in [
        "/api",
        "/api/health",
        "/api/auth/callback/google",
        "/api-docs/ui",
        "/static/logo.png",
        "/_internal/chunk.js",
        "/favicon.ico",
    ] {
        assert!(!policy.intercepts(path), "{} should bypass the guard", path);
    }
}

#[test]
fn test_pages_are_intercepted() {
    let policy = RoutePolicy::default();
    // "/apps" shares a prefix with "/api" but is not under it.
    for path in ["/", "/signin", "/profile", "/settings/account", "/favicon.ico.bak", "/apps"] {
        assert!(policy.intercepts(path), "{} should be guarded", path);
    }
}
