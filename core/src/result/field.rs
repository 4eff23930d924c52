use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Leaf payload fields that can be selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultField {
    Stdout,
    Result,
    Stderr,
    Diff,
    Exception,
    Tests,
}

/// Fields rendered when the caller does not pick any.
pub const DEFAULT_FIELDS: [ResultField; 4] = [
    ResultField::Stdout,
    ResultField::Result,
    ResultField::Stderr,
    ResultField::Diff,
];

impl ResultField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Result => "result",
            Self::Stderr => "stderr",
            Self::Diff => "diff",
            Self::Exception => "exception",
            Self::Tests => "tests",
        }
    }

    /// Parse a comma-separated list, dropping duplicates but keeping order.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        let mut out = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let field = part.parse::<Self>()?;
            if !out.contains(&field) {
                out.push(field);
            }
        }
        Ok(out)
    }
}

impl fmt::Display for ResultField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "result" => Ok(Self::Result),
            "stderr" => Ok(Self::Stderr),
            "diff" => Ok(Self::Diff),
            "exception" => Ok(Self::Exception),
            "tests" => Ok(Self::Tests),
            other => Err(format!("unknown result field '{other}'")),
        }
    }
}
