pub use self::request_context::RequestContext;
pub use self::route_params::RouteParams;

mod request_context;
mod route_params;
