use std::collections::BTreeMap;

/// Dynamic attribute value. Numbers, strings, bools and arrays all occur in
/// practice, so the JSON value domain is used directly.
pub type AttrValue = serde_json::Value;

/**
 * Two-tier attribute storage for one kind of element.
 *
 * Every element kind shares one map of default attributes. Individual
 * elements own an optional override map layered on top of it. Reads go
 * through the override first, then the defaults; unsetting an attribute
 * removes the override only, so later reads fall back to the default again.
 */
#[derive(Clone, Debug, Default)]
pub(crate) struct AttrStore<K> {
    defaults: BTreeMap<String, AttrValue>,
    custom: BTreeMap<K, BTreeMap<String, AttrValue>>,
}

impl<K: Ord + Copy> AttrStore<K> {
    pub fn new() -> Self {
        AttrStore {
            defaults: BTreeMap::new(),
            custom: BTreeMap::new(),
        }
    }

    pub fn with_defaults<I>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        AttrStore {
            defaults: defaults.into_iter().collect(),
            custom: BTreeMap::new(),
        }
    }

    /// Create the override row for an element if it doesn't exist yet.
    pub fn ensure_row(&mut self, key: K) {
        self.custom.entry(key).or_default();
    }

    /// Create the row if needed and overwrite it with the given names.
    pub fn merge_row<I>(&mut self, key: K, attrs: I)
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        let row = self.custom.entry(key).or_default();
        for (name, value) in attrs {
            row.insert(name, value);
        }
    }

    pub fn drop_row(&mut self, key: K) {
        self.custom.remove(&key);
    }

    pub fn has_row(&self, key: K) -> bool {
        self.custom.contains_key(&key)
    }

    /// Read one override, ignoring the defaults.
    pub fn get_custom(&self, key: K, name: &str) -> Option<AttrValue> {
        self.custom
            .get(&key)
            .and_then(|row| row.get(name))
            .cloned()
    }

    /// Read one attribute: override first, then default, then nothing.
    pub fn get(&self, key: K, name: &str) -> Option<AttrValue> {
        if let Some(row) = self.custom.get(&key) {
            if let Some(value) = row.get(name) {
                return Some(value.clone());
            }
        }
        self.defaults.get(name).cloned()
    }

    pub fn set(&mut self, key: K, name: impl Into<String>, value: AttrValue) {
        self.custom
            .entry(key)
            .or_default()
            .insert(name.into(), value);
    }

    /// Remove the override. The default, if any, is left untouched.
    pub fn unset(&mut self, key: K, name: &str) {
        if let Some(row) = self.custom.get_mut(&key) {
            row.remove(name);
        }
    }

    /// The merged view: every default name with its effective value for the
    /// element. Override names without a default do not appear here; read
    /// them through `get` or `custom`.
    pub fn merged(&self, key: K) -> BTreeMap<String, AttrValue> {
        let row = self.custom.get(&key);
        self.defaults
            .iter()
            .map(|(name, default)| {
                let value = row
                    .and_then(|row| row.get(name))
                    .unwrap_or(default)
                    .clone();
                (name.clone(), value)
            })
            .collect()
    }

    /// The override view: only the names explicitly set on the element.
    pub fn custom(&self, key: K) -> BTreeMap<String, AttrValue> {
        self.custom.get(&key).cloned().unwrap_or_default()
    }

    pub fn defaults(&self) -> &BTreeMap<String, AttrValue> {
        &self.defaults
    }

    pub fn update_defaults<I>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        for (name, value) in attrs {
            self.defaults.insert(name, value);
        }
    }

    pub fn set_defaults(&mut self, defaults: BTreeMap<String, AttrValue>) {
        self.defaults = defaults;
    }

    /// Iterate all override rows, empty ones included.
    pub fn rows(&self) -> impl Iterator<Item = (K, &BTreeMap<String, AttrValue>)> {
        self.custom.iter().map(|(key, row)| (*key, row))
    }

    pub fn clear(&mut self) {
        self.custom.clear();
    }
}

#[cfg(test)]
mod test {
    use super::AttrStore;
    use serde_json::json;

    fn store() -> AttrStore<u32> {
        AttrStore::with_defaults([
            ("q".to_string(), json!(1.0)),
            ("open".to_string(), json!(false)),
        ])
    }

    #[test]
    fn t_default_fallback() {
        let mut attrs = store();
        attrs.ensure_row(0);
        assert_eq!(attrs.get(0, "q"), Some(json!(1.0)));
        attrs.set(0, "q", json!(2.5));
        assert_eq!(attrs.get(0, "q"), Some(json!(2.5)));
        attrs.unset(0, "q");
        assert_eq!(attrs.get(0, "q"), Some(json!(1.0)));
        assert_eq!(attrs.get(0, "missing"), None);
    }

    #[test]
    fn t_merged_view_uses_default_names() {
        let mut attrs = store();
        attrs.set(3, "q", json!(7));
        attrs.set(3, "extra", json!("x"));
        let merged = attrs.merged(3);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["q"], json!(7));
        assert_eq!(merged["open"], json!(false));
        // The extra name is visible only through the custom view.
        let custom = attrs.custom(3);
        assert_eq!(custom.len(), 2);
        assert_eq!(custom["extra"], json!("x"));
    }

    #[test]
    fn t_update_defaults_applies_everywhere() {
        let mut attrs = store();
        attrs.ensure_row(0);
        attrs.ensure_row(1);
        attrs.set(1, "q", json!(9));
        attrs.update_defaults([("q".to_string(), json!(4.0))]);
        assert_eq!(attrs.get(0, "q"), Some(json!(4.0)));
        assert_eq!(attrs.get(1, "q"), Some(json!(9)));
    }

    #[test]
    fn t_drop_row() {
        let mut attrs = store();
        attrs.set(5, "q", json!(2));
        attrs.drop_row(5);
        assert!(!attrs.has_row(5));
        assert_eq!(attrs.get(5, "q"), Some(json!(1.0)));
    }
}
