use percent_encoding::percent_decode_str;
use std::any::Any;
use std::fmt::Write;

pub(crate) fn percent_decode_capture(capture: &str) -> String {
    percent_decode_str(capture).decode_utf8_lossy().into_owned()
}

/// Renders an error with its chain of sources, one `caused by:` line per source.
pub(crate) fn error_report(err: &(dyn std::error::Error + 'static)) -> String {
    let mut report = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(report, "\n    caused by: {}", cause);
        source = cause.source();
    }
    report
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
