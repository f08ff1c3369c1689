use crate::error::BenchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workloads the benchmark driver can measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Upsert the batch unchanged
    Insert,
    /// Full-scan `LIST`, independent of batch size
    Query,
    /// Upsert the batch with `content` overridden
    Update,
    /// `DELETE_MANY` with the keys of the batch
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Insert,
        Operation::Query,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Query => "query",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "insert" => Ok(Operation::Insert),
            "query" | "select" => Ok(Operation::Query),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(BenchError::Config(format!(
                "Unknown operation '{}' (expected insert, query, update or delete)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operations() {
        assert_eq!("insert".parse::<Operation>().unwrap(), Operation::Insert);
        assert_eq!("UPDATE".parse::<Operation>().unwrap(), Operation::Update);
        assert_eq!("select".parse::<Operation>().unwrap(), Operation::Query);
        assert!("upsert".parse::<Operation>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Operation::ALL).unwrap();
        assert_eq!(json, r#"["insert","query","update","delete"]"#);
        let op: Operation = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(op, Operation::Delete);
    }
}
