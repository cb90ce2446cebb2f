use super::Route;
use crate::types::RouteParams;
use http::Method;

/// The registered routes in registration order, which is also their priority order.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> RouteTable {
        RouteTable::default()
    }

    pub(crate) fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Returns the earliest registered route whose path and verb both match, with the captured parameters.
    pub fn find_first_match(&self, method: &Method, target_path: &str) -> Option<(&Route, RouteParams)> {
        self.routes.iter().find_map(|route| {
            if !route.is_match_method(method) {
                return None;
            }
            route.match_path(target_path).map(|params| (route, params))
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}
