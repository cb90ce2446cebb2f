pub(crate) const NOT_FOUND_MESSAGE: &str = "I'm sorry, but what you're looking for is not here.";

pub(crate) const DEFAULT_CONTENT_TYPE: &str = "text/html";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";
pub(crate) const ERROR_CONTENT_TYPE: &str = "text/plain";

pub(crate) const NO_CACHE: &str = "no-cache";
pub(crate) const EXPIRES_IMMEDIATELY: &str = "-1";

pub(crate) const LOOPBACK: [u8; 4] = [127, 0, 0, 1];
