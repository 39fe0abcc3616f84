//! Input map: string keys to ordered lists of string values.
//!
//! Producing a [`Form`] from raw request bytes happens upstream; the engine
//! only reads an already-decoded map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Decoded form data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Form {
    values: HashMap<String, Vec<String>>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the list stored under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Replace the list stored under `key`.
    pub fn set<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.values
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    /// All values for `key`, in insertion order.
    ///
    /// A key present with an empty list returns `Some(&[])`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// First value for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for Form {
    fn from(values: HashMap<String, Vec<String>>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Form {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Form::new();
        form.extend(iter);
        form
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Form {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_append_in_order() {
        let form: Form = [("tag", "a"), ("page", "2"), ("tag", "b")].into_iter().collect();

        assert_eq!(form.len(), 2);
        assert_eq!(form.get("tag"), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(form.first("page"), Some("2"));
        assert_eq!(form.get("missing"), None);
    }

    #[test]
    fn test_empty_list_is_present() {
        let mut form = Form::new();
        form.set("ids", Vec::<String>::new());

        assert!(form.contains_key("ids"));
        assert_eq!(form.get("ids"), Some(&[][..]));
        assert_eq!(form.first("ids"), None);
    }

    #[test]
    fn test_json_round_shape() {
        let form: Form = serde_json::from_str(r#"{"field9": ["haha", "hehe"]}"#).unwrap();
        assert_eq!(form.get("field9").map(|v| v.len()), Some(2));

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["field9"][1], "hehe");
    }
}
