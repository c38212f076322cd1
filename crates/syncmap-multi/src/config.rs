use serde::{Deserialize, Serialize};

/// Construction options for a [`MultiValueConcurrentMap`](crate::MultiValueConcurrentMap).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiMapConfig {
    /// Number of keys to reserve room for up front.
    pub initial_capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        assert_eq!(MultiMapConfig::default().initial_capacity, 0);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let c: MultiMapConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, MultiMapConfig::default());
    }
}
