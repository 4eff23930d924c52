use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("failed to read inventory file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse inventory file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("duplicate host '{0}' in inventory")]
    DuplicateHost(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid filter predicate '{0}' (expected key=value)")]
    InvalidPredicate(String),

    #[error("empty key in filter predicate '{0}'")]
    EmptyKey(String),
}
