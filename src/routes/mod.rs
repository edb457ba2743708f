/// Router Module Index
///
/// Page routes are grouped by the class the route guard assigns them. The
/// grouping documents intent only: access is enforced by the guard layer in
/// `create_router`, driven by `RoutePolicy`, not by which module a route lives in.

/// Routes reachable by everyone.
pub mod open;

/// Routes reachable only while signed out.
pub mod auth_only;

/// Routes reachable only while signed in (the guard's default class).
pub mod protected;

/// `/api` routes, excluded from interception.
pub mod api;
