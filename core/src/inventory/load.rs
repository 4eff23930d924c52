use std::path::Path;

use serde_yaml::Value as YamlValue;

use super::{Host, Inventory};
use crate::error::InventoryError;

/// Parse a hosts document: a mapping of host name to attributes, kept in
/// document order.
pub fn parse_hosts(content: &str, source: &str) -> Result<Vec<Host>, InventoryError> {
    let parse_err = |source_err| InventoryError::Parse {
        path: source.to_string(),
        source: source_err,
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: Option<serde_yaml::Mapping> = serde_yaml::from_str(content).map_err(parse_err)?;
    let Some(mapping) = doc else {
        return Ok(Vec::new());
    };

    let mut hosts = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = match key {
            YamlValue::String(s) => s,
            other => serde_yaml::to_string(&other)
                .map(|s| s.trim().to_string())
                .map_err(parse_err)?,
        };
        let mut host: Host = match value {
            YamlValue::Null => Host::default(),
            v => serde_yaml::from_value(v).map_err(parse_err)?,
        };
        host.name = name;
        hosts.push(host);
    }
    Ok(hosts)
}

fn read(path: &Path) -> Result<String, InventoryError> {
    std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Load the hosts file and, when given, a defaults file whose values fill
/// fields the hosts leave unset.
pub fn load_inventory(
    hosts_file: &Path,
    defaults_file: Option<&Path>,
) -> Result<Inventory, InventoryError> {
    let hosts = parse_hosts(&read(hosts_file)?, &hosts_file.display().to_string())?;
    tracing::debug!(hosts = hosts.len(), path = %hosts_file.display(), "inventory loaded");
    let inventory = Inventory::new(hosts)?;

    match defaults_file {
        Some(path) => {
            let content = read(path)?;
            let defaults: Host = if content.trim().is_empty() {
                Host::default()
            } else {
                serde_yaml::from_str(&content).map_err(|source| InventoryError::Parse {
                    path: path.display().to_string(),
                    source,
                })?
            };
            Ok(inventory.with_defaults(defaults))
        }
        None => Ok(inventory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HOSTS: &str = r#"
r2:
  hostname: 10.0.0.2
  platform: eos
  groups: [edge]
r1:
  hostname: 10.0.0.1
  password: s3cret
  groups: [core]
  data:
    site: ams
localhost:
"#;

    #[test]
    fn test_parse_keeps_document_order() {
        let hosts = parse_hosts(HOSTS, "hosts.yaml").unwrap();
        let names: Vec<_> = hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["r2", "r1", "localhost"]);
        assert_eq!(hosts[1].password.as_deref(), Some("s3cret"));
        assert_eq!(hosts[1].data["site"], "ams");
        assert_eq!(hosts[2], Host::new("localhost"));
    }

    #[test]
    fn test_parse_rejects_sequence() {
        let err = parse_hosts("- r1\n- r2\n", "hosts.yaml").unwrap_err();
        assert!(matches!(err, InventoryError::Parse { .. }));
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_hosts("", "hosts.yaml").unwrap().is_empty());
    }

    #[test]
    fn test_load_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let hosts_path = dir.path().join("hosts.yaml");
        let defaults_path = dir.path().join("defaults.yaml");
        std::fs::File::create(&hosts_path)
            .unwrap()
            .write_all(HOSTS.as_bytes())
            .unwrap();
        std::fs::write(&defaults_path, "username: admin\nport: 22\n").unwrap();

        let inv = load_inventory(&hosts_path, Some(&defaults_path)).unwrap();
        assert_eq!(inv.len(), 3);
        assert_eq!(inv.get("r1").unwrap().username.as_deref(), Some("admin"));
        assert_eq!(inv.defaults().port, Some(22));
    }

    #[test]
    fn test_missing_file() {
        let err = load_inventory(Path::new("/nonexistent/hosts.yaml"), None).unwrap_err();
        assert!(matches!(err, InventoryError::Read { .. }));
    }
}
