use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One inventory host and its attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Look up an attribute by name: built-in fields first, then `data`
    /// (dotted keys walk nested objects).
    pub fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "name" => Some(Value::String(self.name.clone())),
            "hostname" => self.hostname.clone().map(Value::String),
            "username" => self.username.clone().map(Value::String),
            "platform" => self.platform.clone().map(Value::String),
            "port" => self.port.map(Value::from),
            "groups" => Some(Value::from(self.groups.clone())),
            _ => {
                let mut parts = key.split('.');
                let mut current = self.data.get(parts.next()?)?;
                for part in parts {
                    current = current.get(part)?;
                }
                Some(current.clone())
            }
        }
    }

    /// Snapshot of every attribute as JSON.
    pub fn snapshot(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub(crate) fn merged_with(mut self, defaults: &Host) -> Self {
        if self.hostname.is_none() {
            self.hostname = defaults.hostname.clone();
        }
        if self.username.is_none() {
            self.username = defaults.username.clone();
        }
        if self.password.is_none() {
            self.password = defaults.password.clone();
        }
        if self.platform.is_none() {
            self.platform = defaults.platform.clone();
        }
        if self.port.is_none() {
            self.port = defaults.port;
        }
        for (k, v) in &defaults.data {
            self.data.entry(k.clone()).or_insert_with(|| v.clone());
        }
        self
    }
}
