//! # Ordered Property Sets
//!
//! [`PropertySet`] is the body of a descriptor: `{Key, Value}` pairs with
//! unique atom keys, kept in insertion order. Property counts are small, so
//! lookup is a linear scan over a vector.
//!
//! ## Upsert Semantics
//!
//! [`PropertySet::upsert`] replaces an existing value *in place*, preserving
//! the key's original position, and appends otherwise. Applying a sequence
//! of upserts is therefore order-sensitive: for a repeated key the last
//! value wins, but the position is that of the first occurrence.

use crate::atom::Atom;
use crate::error::PropertyError;
use crate::term::Term;

/// Ordered key/value association with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    entries: Vec<(Atom, Term)>,
}

impl PropertySet {
    /// An empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a property-list term: a list of `{Key, Value}` tuples with
    /// atom keys and no repeated key.
    pub fn from_term(term: &Term) -> Result<Self, PropertyError> {
        let items = term.as_list().ok_or_else(|| PropertyError::NotAList {
            found: term.to_string(),
        })?;
        let mut set = Self::new();
        for (index, item) in items.iter().enumerate() {
            let (key, value) = match item.as_tuple() {
                Some([Term::Atom(key), value]) => (key, value),
                _ => {
                    return Err(PropertyError::MalformedEntry {
                        index,
                        found: item.to_string(),
                    })
                }
            };
            if set.contains_key(key.as_str()) {
                return Err(PropertyError::DuplicateKey {
                    key: key.as_str().to_string(),
                });
            }
            set.entries.push((key.clone(), value.clone()));
        }
        Ok(set)
    }

    /// The property list as a term.
    pub fn to_term(&self) -> Term {
        Term::List(
            self.entries
                .iter()
                .map(|(k, v)| Term::Tuple(vec![Term::Atom(k.clone()), v.clone()]))
                .collect(),
        )
    }

    /// Replace the value of `key` in place, or append it.
    pub fn upsert(&mut self, key: impl Into<Atom>, value: Term) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert `key` at the front. Returns `false` and leaves the set
    /// unchanged if the key is already present.
    pub fn prepend(&mut self, key: impl Into<Atom>, value: Term) -> bool {
        let key = key.into();
        if self.contains_key(key.as_str()) {
            return false;
        }
        self.entries.insert(0, (key, value));
        true
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Term> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &Atom> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &Term)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<Atom>> FromIterator<(K, Term)> for PropertySet {
    /// Collects with upsert semantics: a repeated key keeps its first
    /// position and its last value.
    fn from_iter<I: IntoIterator<Item = (K, Term)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.upsert(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_term;

    fn keys(set: &PropertySet) -> Vec<&str> {
        set.keys().map(Atom::as_str).collect()
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut set: PropertySet = [("a", Term::Integer(1)), ("b", Term::Integer(2))]
            .into_iter()
            .collect();
        set.upsert("a", Term::Integer(10));
        assert_eq!(keys(&set), vec!["a", "b"]);
        assert_eq!(set.get("a"), Some(&Term::Integer(10)));
    }

    #[test]
    fn upsert_appends_new_keys() {
        let mut set = PropertySet::new();
        set.upsert("a", Term::Integer(1));
        set.upsert("c", Term::Integer(3));
        assert_eq!(keys(&set), vec!["a", "c"]);
    }

    #[test]
    fn prepend_only_when_absent() {
        let mut set: PropertySet = [("vsn", Term::string("1"))].into_iter().collect();
        assert!(set.prepend("registered", Term::List(vec![])));
        assert!(!set.prepend("vsn", Term::string("2")));
        assert_eq!(keys(&set), vec!["registered", "vsn"]);
        assert_eq!(set.get("vsn"), Some(&Term::string("1")));
    }

    #[test]
    fn from_term_accepts_property_lists() {
        let term = parse_term("[{description, \"x\"}, {vsn, \"0.1.0\"}].").unwrap();
        let set = PropertySet::from_term(&term).unwrap();
        assert_eq!(keys(&set), vec!["description", "vsn"]);
        assert_eq!(set.to_term(), term);
    }

    #[test]
    fn from_term_rejects_malformed_entries() {
        let err = PropertySet::from_term(&parse_term("[{a, 1}, b].").unwrap()).unwrap_err();
        assert_eq!(
            err,
            PropertyError::MalformedEntry {
                index: 1,
                found: "b".to_string()
            }
        );
        let err = PropertySet::from_term(&parse_term("[{\"a\", 1}].").unwrap()).unwrap_err();
        assert!(matches!(err, PropertyError::MalformedEntry { index: 0, .. }));
        let err = PropertySet::from_term(&parse_term("{a, 1}.").unwrap()).unwrap_err();
        assert!(matches!(err, PropertyError::NotAList { .. }));
    }

    #[test]
    fn from_term_rejects_duplicate_keys() {
        let term = parse_term("[{vsn, \"1\"}, {vsn, \"2\"}].").unwrap();
        assert_eq!(
            PropertySet::from_term(&term).unwrap_err(),
            PropertyError::DuplicateKey {
                key: "vsn".to_string()
            }
        );
    }
}
