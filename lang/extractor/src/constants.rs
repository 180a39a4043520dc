use std::collections::HashMap;

/// Module-level names bound to string literals.
///
/// Only `NAME = "literal"` at module scope inserts an entry. Any other binding
/// of the same name removes it again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantTable {
    values: HashMap<String, String>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    /// Forget `name` because it was rebound to something that is not a literal.
    pub fn invalidate(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConstantTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::ConstantTable;

    #[test]
    fn last_write_wins() {
        let mut table = ConstantTable::new();
        assert_eq!(table.insert("X", "/a"), None);
        assert_eq!(table.insert("X", "/b"), Some("/a".to_string()));
        assert_eq!(table.get("X"), Some("/b"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn invalidate_removes_binding() {
        let mut table: ConstantTable = [("X", "/a")].into_iter().collect();
        table.invalidate("X");
        assert!(!table.contains("X"));
        assert!(table.is_empty());
    }
}
