use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Artist group an entry belongs to. The set is closed and fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupId {
    #[serde(rename = "ONEUS")]
    Oneus,
    #[serde(rename = "ONF")]
    Onf,
    #[serde(rename = "VERIVERY")]
    Verivery,
    #[serde(rename = "P1HARMONY")]
    P1harmony,
}

impl GroupId {
    pub const ALL: [GroupId; 4] = [
        GroupId::Oneus,
        GroupId::Onf,
        GroupId::Verivery,
        GroupId::P1harmony,
    ];

    /// The identifier as it appears in routes and storage keys.
    pub fn as_str(self) -> &'static str {
        match self {
            GroupId::Oneus => "ONEUS",
            GroupId::Onf => "ONF",
            GroupId::Verivery => "VERIVERY",
            GroupId::P1harmony => "P1HARMONY",
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown group: {0}")]
pub struct UnknownGroup(pub String);

impl FromStr for GroupId {
    type Err = UnknownGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupId::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownGroup(s.to_string()))
    }
}

/// Static display metadata for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupMeta {
    pub id: GroupId,
    pub image: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!("P1HARMONY".parse::<GroupId>(), Ok(GroupId::P1harmony));
        assert_eq!(
            "oneus".parse::<GroupId>(),
            Err(UnknownGroup("oneus".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_route_name() {
        let json = serde_json::to_string(&GroupId::Onf).unwrap();
        assert_eq!(json, "\"ONF\"");
        let back: GroupId = serde_json::from_str("\"VERIVERY\"").unwrap();
        assert_eq!(back, GroupId::Verivery);
    }
}
