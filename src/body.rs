use serde_json::{Map, Value};

/// Parses a buffered request body: JSON when the content type mentions `json`, form-encoded pairs otherwise.
pub(crate) fn parse_body(raw: &[u8], content_type: Option<&str>) -> crate::Result<Value> {
    let is_json = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);

    if is_json {
        Ok(serde_json::from_slice(raw)?)
    } else {
        Ok(parse_form(raw))
    }
}

/// Parses `application/x-www-form-urlencoded` data into a JSON object. A repeated key collects its
/// values into an array.
pub(crate) fn parse_form(raw: &[u8]) -> Value {
    let mut map = Map::new();

    for (key, val) in url::form_urlencoded::parse(raw) {
        let val = Value::String(val.into_owned());
        match map.get_mut(key.as_ref()) {
            Some(Value::Array(vals)) => vals.push(val),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, val]);
            }
            None => {
                map.insert(key.into_owned(), val);
            }
        }
    }

    Value::Object(map)
}
