//! The most used types, to be imported with `use webservice::prelude::*`.

pub use crate::logger::Logger;
pub use crate::middleware::{HandlerChain, Step};
pub use crate::response::Payload;
pub use crate::route::RouteMethod;
pub use crate::types::RequestContext;
