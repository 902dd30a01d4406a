// Production line identity
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three production lines monitored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LineId {
    L1,
    L2,
    L3,
}

impl LineId {
    /// Fixed display order used by every per-line view.
    pub const ALL: [LineId; 3] = [LineId::L1, LineId::L2, LineId::L3];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineId::L1 => "L1",
            LineId::L2 => "L2",
            LineId::L3 => "L3",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|line| line.as_str() == value)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_lines() {
        assert_eq!(LineId::parse("L2"), Some(LineId::L2));
        assert_eq!(LineId::parse("l2"), None);
        assert_eq!(LineId::parse("L4"), None);
    }

    #[test]
    fn test_lines_deserialize_as_map_keys() {
        let parsed: std::collections::BTreeMap<LineId, u32> =
            serde_json::from_str(r#"{"L3": 3, "L1": 1}"#).unwrap();
        let keys: Vec<LineId> = parsed.keys().copied().collect();
        assert_eq!(keys, vec![LineId::L1, LineId::L3]);
    }
}
