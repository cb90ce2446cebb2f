use std::collections::HashMap;

/// The parameters captured from the request path by the matched route.
///
/// Named parameters are stored by name. A named optional parameter whose segment was absent from
/// the path is recorded without a value. Captures which have no name, such as `*` wildcards or the
/// groups of a regex route, are kept in order in the positional list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    named: HashMap<String, Option<String>>,
    positional: Vec<Option<String>>,
}

impl RouteParams {
    pub fn new() -> RouteParams {
        RouteParams::default()
    }

    pub fn with_capacity(capacity: usize) -> RouteParams {
        RouteParams {
            named: HashMap::with_capacity(capacity),
            positional: Vec::new(),
        }
    }

    /// Sets a named parameter, replacing any previous value.
    pub fn set<N: Into<String>, V: Into<String>>(&mut self, param_name: N, param_val: V) {
        self.named.insert(param_name.into(), Some(param_val.into()));
    }

    /// Stores a captured value unless the parameter already holds a value.
    pub(crate) fn set_if_absent(&mut self, param_name: &str, param_val: Option<String>) {
        match self.named.get_mut(param_name) {
            Some(Some(_)) => {}
            Some(slot) => *slot = param_val,
            None => {
                self.named.insert(param_name.to_string(), param_val);
            }
        }
    }

    pub(crate) fn push_positional(&mut self, param_val: Option<String>) {
        self.positional.push(param_val);
    }

    /// Returns the value of a named parameter, `None` if it is unknown or was absent from the path.
    pub fn get<N: AsRef<str>>(&self, param_name: N) -> Option<&str> {
        self.named.get(param_name.as_ref()).and_then(|val| val.as_deref())
    }

    /// Returns `true` if the parameter was declared by the matched route, even when its segment was absent.
    pub fn contains<N: AsRef<str>>(&self, param_name: N) -> bool {
        self.named.contains_key(param_name.as_ref())
    }

    pub fn positional(&self) -> &[Option<String>] {
        &self.positional
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.named.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, Option<&str>)> {
        self.named.iter().map(|(name, val)| (name, val.as_deref()))
    }
}
