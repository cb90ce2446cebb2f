use crate::middleware::Handler;
use crate::pattern::{PatternOptions, RoutePath, RoutePattern};
use crate::types::RouteParams;
use crate::Error;
use http::Method;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

pub use self::table::RouteTable;

mod table;

/// The http verbs a route can be registered for. `All` matches every request method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
    All,
}

impl RouteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Delete => "DELETE",
            RouteMethod::All => "ALL",
        }
    }

    /// Returns `true` if a request with `method` may be dispatched to a route registered for this verb.
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            RouteMethod::All => true,
            verb => method.as_str().eq_ignore_ascii_case(verb.as_str()),
        }
    }
}

impl Display for RouteMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a single route.
///
/// A route consists of a verb, a compiled path and a non-empty chain of handlers. It shouldn't be created directly,
/// use the [RouterBuilder](./struct.RouterBuilder.html) methods to register a route.
pub struct Route {
    pub(crate) method: RouteMethod,
    pub(crate) pattern: RoutePattern,
    pub(crate) handlers: Vec<Arc<Handler>>,
}

impl Route {
    pub(crate) fn new(
        method: RouteMethod,
        path: RoutePath,
        options: PatternOptions,
        handlers: Vec<Arc<Handler>>,
    ) -> crate::Result<Route> {
        if handlers.is_empty() {
            return Err(Error::MissingHandler {
                method: method.to_string(),
                path: path.to_string(),
            });
        }

        let pattern = RoutePattern::compile(path, options)?;

        Ok(Route {
            method,
            pattern,
            handlers,
        })
    }

    pub fn method(&self) -> RouteMethod {
        self.method
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn is_match_method(&self, method: &Method) -> bool {
        self.method.matches(method)
    }

    /// Matches `target_path` into a fresh parameter container.
    pub(crate) fn match_path(&self, target_path: &str) -> Option<RouteParams> {
        let mut route_params = RouteParams::with_capacity(self.pattern.keys().len());
        if self.pattern.match_path(target_path, &mut route_params) {
            Some(route_params)
        } else {
            None
        }
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ method: {}, pattern: {:?}, handlers: {} }}",
            self.method,
            self.pattern,
            self.handlers.len()
        )
    }
}
