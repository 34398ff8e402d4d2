use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A coffee variety carried by the shop.
///
/// The set is closed: both ledger tables are keyed by these names and nothing
/// else is ever written to them. Names match exactly, in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Arabica,
    Liberica,
    Robusta,
}

impl Category {
    /// Every category, in the same ascending order the store lists them.
    pub const ALL: [Category; 3] = [Category::Arabica, Category::Liberica, Category::Robusta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Arabica => "arabica",
            Category::Liberica => "liberica",
            Category::Robusta => "robusta",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arabica" => Ok(Category::Arabica),
            "liberica" => Ok(Category::Liberica),
            "robusta" => Ok(Category::Robusta),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid coffee type", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_parse_requires_exact_lowercase_name() {
        assert!("Arabica".parse::<Category>().is_err());
        assert!(" robusta".parse::<Category>().is_err());
        assert!("liberica ".parse::<Category>().is_err());
    }

    #[test]
    fn test_unknown_category() {
        let err = "mocha".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("mocha".into()));
        assert_eq!(err.to_string(), "mocha is not a valid coffee type");
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_all_is_sorted_by_name() {
        let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
