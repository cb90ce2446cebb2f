use crate::pattern::{ParamKey, PatternOptions, RoutePath};
use lazy_static::lazy_static;
use regex::{Captures, Regex, RegexBuilder};

lazy_static! {
    static ref PARAM_MARKER_RE: Regex =
        Regex::new(r"(/)?(\.)?:([A-Za-z0-9_]+)(?:(\(.*?\)))?(\?)?").expect("invalid param marker regex");
    static ref SEPARATOR_RE: Regex = Regex::new(r"([/.])").expect("invalid separator regex");
}

const SEGMENT_CAPTURE: &str = "([^/]+?)";
const FORMAT_CAPTURE: &str = "([^/.]+?)";

/// Compiles a route path into an anchored regex and the ordered list of its named parameters.
///
/// A `RoutePath::Regex` is used verbatim and declares no named parameters.
pub(crate) fn generate_exact_match_regex(
    path: &RoutePath,
    options: PatternOptions,
) -> Result<(Regex, Vec<ParamKey>), regex::Error> {
    let template = match path {
        RoutePath::Regex(re) => return Ok((re.clone(), Vec::new())),
        RoutePath::Alternatives(alts) => format!("({})", alts.join("|")),
        RoutePath::Template(template) => template.clone(),
    };

    let mut keys = Vec::new();
    let source = generate_regex_source(&template, options.strict, &mut keys);

    let re = RegexBuilder::new(source.as_str())
        .case_insensitive(!options.sensitive)
        .build()?;

    Ok((re, keys))
}

fn generate_regex_source(template: &str, strict: bool, keys: &mut Vec<ParamKey>) -> String {
    let mut path = String::with_capacity(template.len() + 2);
    path.push_str(template);
    if !strict {
        path.push_str("/?");
    }

    let path = path.replace("/(", "(?:/");

    let path = PARAM_MARKER_RE.replace_all(&path, |caps: &Captures| {
        let slash = caps.get(1).map_or("", |m| m.as_str());
        let format = caps.get(2).map_or("", |m| m.as_str());
        let optional = caps.get(5).is_some();

        keys.push(ParamKey {
            name: caps[3].to_string(),
            optional,
        });

        let capture = match caps.get(4) {
            Some(custom) => custom.as_str(),
            None if format.is_empty() => SEGMENT_CAPTURE,
            None => FORMAT_CAPTURE,
        };

        if optional {
            format!("(?:{}{}{})?", slash, format, capture)
        } else {
            format!("{}(?:{}{})", slash, format, capture)
        }
    });

    let path = SEPARATOR_RE.replace_all(&path, r"\${1}");
    let path = path.replace('*', "(.*)");

    format!("^{}$", path)
}
