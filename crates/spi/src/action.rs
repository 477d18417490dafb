use std::fmt;
use std::str::FromStr;

/// Record action requested by a document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ActionType {
    /// Add or replace the record.
    Add,
    /// Remove the record from the index.
    Delete,
}

impl ActionType {
    /// Returns the wire spelling used in the `action` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "delete" => Ok(Self::Delete),
            _ => Err(value.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_actions_case_insensitively() {
        assert_eq!("add".parse::<ActionType>(), Ok(ActionType::Add));
        assert_eq!(" DELETE".parse::<ActionType>(), Ok(ActionType::Delete));
        assert_eq!("erase".parse::<ActionType>(), Err("erase".to_owned()));
    }
}
