use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

// number followed by an optional binary, decimal or exponent suffix
static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([KMGTPE]i|[numkMGTPE]|[eE][+-]?\d+)?$")
        .expect("quantity regex")
});

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid quantity '{0}': expected a number with an optional suffix such as 100m, 0.5, 128Mi or 1G")]
pub struct QuantityError(pub String);

/// Kubernetes resource quantity such as `100m` or `256Mi`.
///
/// The input text is kept as is, only its syntax is checked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Quantity(String);

impl Quantity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if QUANTITY_RE.is_match(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(QuantityError(value.to_owned()))
        }
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

// plain numbers are valid quantities in YAML, e.g. `cpu: 1`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match RawQuantity::deserialize(deserializer)? {
            RawQuantity::Text(text) => text,
            RawQuantity::Integer(value) => value.to_string(),
            RawQuantity::Float(value) => value.to_string(),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_valid_quantities() {
        for value in ["100m", "0.5", "1", "128Mi", "1Gi", "512M", "2", "1e3", ".5", "+1k"] {
            let quantity: Quantity = value.parse().expect("valid quantity");
            assert_eq!(quantity.as_str(), value);
        }
    }

    #[test]
    fn test_invalid_quantities() {
        for value in ["", "abc", "1.2.3", "10 Mi", "Mi", "5mi", "1Ki2"] {
            assert!(value.parse::<Quantity>().is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_quantity_trims_input() {
        let quantity: Quantity = " 250m ".parse().expect("valid");
        assert_eq!(quantity.to_string(), "250m");
    }

    #[test]
    fn test_numeric_quantity_from_yaml() {
        let quantity: Quantity = serde_yaml::from_str("2").expect("numeric");
        assert_eq!(quantity.as_str(), "2");
        let quantity: Quantity = serde_yaml::from_str("0.5").expect("numeric");
        assert_eq!(quantity.as_str(), "0.5");
    }

    #[test]
    fn test_quantity_rejected_on_deserialize() {
        let result: Result<Quantity, _> = serde_yaml::from_str("lots");
        assert!(result.is_err());
    }
}
