//! Resolution of YAML tags found in `mkdocs.yml`.
//!
//! `!ENV` reads the environment:
//!
//! ```yaml
//! site_url: !ENV SITE_URL                      # null when unset
//! site_name: !ENV [BOOK_NAME, TITLE, "Book"]   # first set variable, else last item
//! ```
//!
//! Any other tag (for example `!!python/name:...`) is replaced by its inner value.

use serde_yaml::Value;
use serde_yaml::value::TaggedValue;

/// Replace every tagged value in the tree with its resolved value.
pub(crate) fn resolve_tags(value: &mut Value) {
    match value {
        Value::Tagged(tagged) => {
            let resolved = resolve_tagged(tagged);
            *value = resolved;
            resolve_tags(value);
        }
        Value::Sequence(items) => items.iter_mut().for_each(resolve_tags),
        Value::Mapping(map) => map.values_mut().for_each(resolve_tags),
        _ => {}
    }
}

fn resolve_tagged(tagged: &mut TaggedValue) -> Value {
    if tagged.tag != "ENV" {
        return std::mem::take(&mut tagged.value);
    }

    match &tagged.value {
        Value::String(name) => lookup(name).map_or(Value::Null, |v| scalar(&v)),
        Value::Sequence(items) => {
            let names: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            let Some((default, vars)) = names.split_last() else {
                return Value::Null;
            };
            if let Some(found) = vars.iter().find_map(|name| lookup(name)) {
                return scalar(&found);
            }
            // A single-item list names a variable, not a default.
            if vars.is_empty() {
                return lookup(default).map_or(Value::Null, |v| scalar(&v));
            }
            scalar(default)
        }
        _ => Value::Null,
    }
}

fn lookup(name: &str) -> Option<String> {
    std::env::var(name.trim()).ok()
}

/// Interpret text as a YAML scalar so `true` and `42` keep their types.
fn scalar(text: &str) -> Value {
    match serde_yaml::from_str::<Value>(text) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::Null)) => value,
        _ => Value::String(text.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolve(yaml: &str) -> Value {
        let mut value: Value = serde_yaml::from_str(yaml).unwrap();
        resolve_tags(&mut value);
        value
    }

    #[test]
    fn test_env_scalar_set() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TF_TAG_SITE_URL", "https://book.example.com");
        }
        let value = resolve("site_url: !ENV TF_TAG_SITE_URL");
        assert_eq!(value["site_url"].as_str(), Some("https://book.example.com"));
        unsafe {
            std::env::remove_var("TF_TAG_SITE_URL");
        }
    }

    #[test]
    fn test_env_scalar_unset_is_null() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TF_TAG_UNSET");
        }
        let value = resolve("site_url: !ENV TF_TAG_UNSET");
        assert_eq!(value["site_url"], Value::Null);
    }

    #[test]
    fn test_env_list_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TF_TAG_A");
            std::env::remove_var("TF_TAG_B");
        }
        let value = resolve("name: !ENV [TF_TAG_A, TF_TAG_B, Fallback Book]");
        assert_eq!(value["name"].as_str(), Some("Fallback Book"));
    }

    #[test]
    fn test_env_list_first_set_wins() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TF_TAG_FIRST");
            std::env::set_var("TF_TAG_SECOND", "second");
        }
        let value = resolve("name: !ENV [TF_TAG_FIRST, TF_TAG_SECOND, default]");
        assert_eq!(value["name"].as_str(), Some("second"));
        unsafe {
            std::env::remove_var("TF_TAG_SECOND");
        }
    }

    #[test]
    fn test_env_value_keeps_scalar_type() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TF_TAG_STRICT", "true");
        }
        let value = resolve("strict: !ENV TF_TAG_STRICT");
        assert_eq!(value["strict"], Value::Bool(true));
        unsafe {
            std::env::remove_var("TF_TAG_STRICT");
        }
    }

    #[test]
    fn test_other_tags_unwrapped_in_nested_values() {
        let value = resolve(
            "markdown_extensions:\n  - pymdownx.emoji:\n      emoji_index: !!python/name:material.extensions.emoji.twemoji x\n",
        );
        let ext = &value["markdown_extensions"][0]["pymdownx.emoji"]["emoji_index"];
        assert!(!matches!(ext, Value::Tagged(_)));
    }
}
