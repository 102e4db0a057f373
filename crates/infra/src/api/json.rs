//! Response body parsing

use serde_json::Value;

/// Keys removed from every object in a response body.
pub const STRIPPED_KEYS: [&str; 2] = ["href", "link"];

/// Parse a response body, dropping resource links at any depth.
pub fn parse_sanitized(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::from_slice(bytes)?;
    strip_links(&mut value);
    Ok(value)
}

/// Remove [`STRIPPED_KEYS`] from `value` recursively.
pub fn strip_links(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !STRIPPED_KEYS.contains(&key.as_str()));
            map.values_mut().for_each(strip_links);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_links),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn links_are_removed_at_every_depth() {
        let body = br#"[
            {"id": 1, "href": "https://evil.example", "team": {"id": 2, "link": "/x", "name": "ops"}},
            {"id": 3, "members": [{"href": "/m/1", "id": 4}]}
        ]"#;

        let value = parse_sanitized(body).unwrap();
        assert_eq!(
            value,
            json!([
                {"id": 1, "team": {"id": 2, "name": "ops"}},
                {"id": 3, "members": [{"id": 4}]}
            ])
        );
    }

    #[test]
    fn only_exact_key_names_are_stripped() {
        let value = parse_sanitized(br#"{"hrefs": 1, "Link": 2, "value": "href"}"#).unwrap();
        assert_eq!(value, json!({"hrefs": 1, "Link": 2, "value": "href"}));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_sanitized(b"<html>").is_err());
    }
}
