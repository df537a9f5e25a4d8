use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a catalog icon
///
/// Catalog files may use numeric or string ids; the id is echoed back in
/// responses exactly as it was read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconId {
    Number(u64),
    Text(String),
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconId::Number(n) => write!(f, "{n}"),
            IconId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for IconId {
    fn from(value: u64) -> Self {
        IconId::Number(value)
    }
}

impl From<&str> for IconId {
    fn from(value: &str) -> Self {
        IconId::Text(value.to_string())
    }
}

/// One entry of the reference catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconRecord {
    pub id: IconId,
    /// Path to the icon's source image, relative to the catalog asset root
    pub nodepath: String,
}
