//! VoteEngine v1: Option Registry
//!
//! The fixed, ordered set of votable options. Built once at startup,
//! read-only afterwards. Declaration order is significant: it breaks
//! ties when results are ranked.

use std::collections::BTreeMap;

use crate::arithmetic::validate_option_key;
use crate::domain::VoteOption;
use crate::error::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRegistry {
    options: Vec<VoteOption>,
    index: BTreeMap<String, usize>,
}

impl OptionRegistry {
    /// Build a registry, rejecting empty sets, malformed keys and duplicates.
    pub fn new(options: Vec<VoteOption>) -> Result<Self, RegistryError> {
        if options.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut index = BTreeMap::new();
        for (pos, option) in options.iter().enumerate() {
            validate_option_key(&option.key).map_err(RegistryError::MalformedKey)?;
            if index.insert(option.key.clone(), pos).is_some() {
                return Err(RegistryError::DuplicateKey(option.key.clone()));
            }
        }

        Ok(Self { options, index })
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Options in declaration order.
    pub fn list_options(&self) -> &[VoteOption] {
        &self.options
    }

    pub fn get(&self, key: &str) -> Option<&VoteOption> {
        self.index.get(key).map(|&pos| &self.options[pos])
    }

    /// Declaration index of `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn keys(&self) -> Vec<String> {
        self.options.iter().map(|o| o.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Default for OptionRegistry {
    /// The default lunch poll.
    fn default() -> Self {
        let options = vec![
            VoteOption::new("pizza", "Pizza", "A classic Italian-style choice", "🍕"),
            VoteOption::new("chicken", "Chicken", "Crispy Korean soul food", "🍗"),
            VoteOption::new("burger", "Burger", "Hearty American-style meal", "🍔"),
            VoteOption::new("ramen", "Ramen", "A warm, easy bowl of noodles", "🍜"),
        ];
        let index = options
            .iter()
            .enumerate()
            .map(|(pos, o)| (o.key.clone(), pos))
            .collect();
        Self { options, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(key: &str) -> VoteOption {
        VoteOption::new(key, key, "", "")
    }

    #[test]
    fn default_registry_is_ordered() {
        let reg = OptionRegistry::default();
        assert_eq!(reg.keys(), vec!["pizza", "chicken", "burger", "ramen"]);
        assert_eq!(reg.position("burger"), Some(2));
        assert!(reg.is_valid("ramen"));
        assert!(!reg.is_valid("sushi"));
    }

    #[test]
    fn default_registry_passes_validation() {
        let reg = OptionRegistry::default();
        assert!(OptionRegistry::new(reg.list_options().to_vec()).is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(OptionRegistry::new(vec![]), Err(RegistryError::Empty));
    }

    #[test]
    fn rejects_duplicates() {
        assert_eq!(
            OptionRegistry::new(vec![opt("a"), opt("b"), opt("a")]),
            Err(RegistryError::DuplicateKey("a".to_string()))
        );
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(matches!(
            OptionRegistry::new(vec![opt("Bad Key")]),
            Err(RegistryError::MalformedKey(_))
        ));
    }

    #[test]
    fn get_returns_metadata() {
        let reg = OptionRegistry::default();
        assert_eq!(reg.get("ramen").map(|o| o.emoji.as_str()), Some("🍜"));
        assert!(reg.get("sushi").is_none());
    }
}
