use serde::{Deserialize, Serialize};

/// Construction options for an [`OrderedConcurrentMap`](crate::OrderedConcurrentMap).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderedMapConfig {
    /// Escape `<`, `>` and `&` inside JSON strings.
    pub escape_html: bool,
    /// Capacity reserved up front for keys and values.
    pub initial_capacity: usize,
}

impl Default for OrderedMapConfig {
    fn default() -> Self {
        Self {
            escape_html: true,
            initial_capacity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = OrderedMapConfig::default();
        assert!(c.escape_html);
        assert_eq!(c.initial_capacity, 0);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c: OrderedMapConfig = toml::from_str("initial_capacity = 64").unwrap();
        assert!(c.escape_html);
        assert_eq!(c.initial_capacity, 64);

        let c: OrderedMapConfig = toml::from_str("escape_html = false").unwrap();
        assert!(!c.escape_html);
        assert_eq!(c.initial_capacity, 0);
    }
}
