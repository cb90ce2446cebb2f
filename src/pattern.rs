use crate::helpers;
use crate::regex_generator::generate_exact_match_regex;
use crate::types::RouteParams;
use crate::Error;
use regex::Regex;
use std::fmt::{self, Debug, Display, Formatter};

/// A route path as accepted by the route registration methods.
///
/// * `Template` is an express-style path such as `/users/:userId` or `/files/*`.
/// * `Alternatives` is a list of templates, matched as if written `(alt1|alt2|...)`.
/// * `Regex` is a precompiled regular expression used verbatim; its captures are positional.
#[derive(Clone, Debug)]
pub enum RoutePath {
    Template(String),
    Alternatives(Vec<String>),
    Regex(Regex),
}

impl From<&str> for RoutePath {
    fn from(path: &str) -> Self {
        RoutePath::Template(path.to_string())
    }
}

impl From<String> for RoutePath {
    fn from(path: String) -> Self {
        RoutePath::Template(path)
    }
}

impl From<Vec<String>> for RoutePath {
    fn from(paths: Vec<String>) -> Self {
        RoutePath::Alternatives(paths)
    }
}

impl From<Vec<&str>> for RoutePath {
    fn from(paths: Vec<&str>) -> Self {
        RoutePath::Alternatives(paths.into_iter().map(String::from).collect())
    }
}

impl From<Regex> for RoutePath {
    fn from(re: Regex) -> Self {
        RoutePath::Regex(re)
    }
}

impl Display for RoutePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RoutePath::Template(path) => f.write_str(path),
            RoutePath::Alternatives(paths) => write!(f, "({})", paths.join("|")),
            RoutePath::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Options applied when a route path is compiled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatternOptions {
    /// Match the path case-sensitively.
    pub sensitive: bool,
    /// Do not accept an optional trailing `/`.
    pub strict: bool,
}

impl PatternOptions {
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// A named parameter declared by a route path, in the order it appears in the path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamKey {
    pub name: String,
    pub optional: bool,
}

/// A compiled route path.
///
/// # Examples
///
/// ```
/// use webservice::{PatternOptions, RouteParams, RoutePattern};
///
/// let pattern = RoutePattern::compile("/echo/:value", PatternOptions::default()).unwrap();
/// let mut params = RouteParams::new();
///
/// assert!(pattern.match_path("/echo/this?verbose=1", &mut params));
/// assert_eq!(params.get("value"), Some("this"));
/// ```
#[derive(Clone)]
pub struct RoutePattern {
    path: RoutePath,
    regex: Regex,
    keys: Vec<ParamKey>,
    options: PatternOptions,
}

impl RoutePattern {
    /// Compiles a route path. It only fails when the resulting regular expression is malformed,
    /// e.g. because of an invalid custom capture.
    pub fn compile<P: Into<RoutePath>>(path: P, options: PatternOptions) -> crate::Result<RoutePattern> {
        let path = path.into();
        let (regex, keys) = generate_exact_match_regex(&path, options).map_err(|source| Error::InvalidPattern {
            path: path.to_string(),
            source,
        })?;

        Ok(RoutePattern {
            path,
            regex,
            keys,
            options,
        })
    }

    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn keys(&self) -> &[ParamKey] {
        &self.keys
    }

    pub fn options(&self) -> PatternOptions {
        self.options
    }

    /// Matches a request path (a query string suffix is ignored) and fills `params` on success.
    ///
    /// Capture `i` is stored under the `i`-th named parameter if there is one, otherwise it is
    /// appended to the positional captures. A named parameter which already holds a value is
    /// left untouched. On a mismatch `params` is not modified.
    pub fn match_path(&self, path: &str, params: &mut RouteParams) -> bool {
        let pathname = match path.find('?') {
            Some(idx) => &path[..idx],
            None => path,
        };

        let caps = match self.regex.captures(pathname) {
            Some(caps) => caps,
            None => return false,
        };

        // Skip the first match because it's the whole path.
        for (idx, group) in caps.iter().enumerate().skip(1) {
            let value = group.map(|m| helpers::percent_decode_capture(m.as_str()));
            match self.keys.get(idx - 1) {
                Some(key) => params.set_if_absent(key.name.as_str(), value),
                None => params.push_positional(value),
            }
        }

        true
    }
}

impl Debug for RoutePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ path: {}, regex: {:?}, keys: {:?}, options: {:?} }}",
            self.path, self.regex, self.keys, self.options
        )
    }
}
