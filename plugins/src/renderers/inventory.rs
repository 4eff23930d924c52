use serde_json::Value;

use richtask_core::api::{Host, Inventory, Line, RenderError, Style};
use richtask_core::console::{Column, Highlighter, Table};

pub const REDACTED: &str = "******";

const SECRET_KEYS: &[&str] = &["password", "secret", "token", "api_key"];

/// Replace credential values anywhere in `value` with [`REDACTED`].
/// Null or absent credentials are left as they are.
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                if SECRET_KEYS.contains(&key.as_str()) {
                    if !item.is_null() {
                        *item = Value::String(REDACTED.to_string());
                    }
                } else {
                    redact(item);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// YAML view of one host without its name, optionally redacted.
pub fn host_yaml(host: &Host, reveal_secrets: bool) -> Result<String, RenderError> {
    let mut snapshot = host.snapshot();
    if let Value::Object(map) = &mut snapshot {
        map.remove("name");
    }
    if !reveal_secrets {
        redact(&mut snapshot);
    }
    serde_yaml::to_string(&snapshot).map_err(|e| RenderError::Field {
        field: host.name.clone(),
        message: e.to_string(),
    })
}

/// Two-column `Host` / `Data` table over the inventory in its own order.
pub fn dump(
    inventory: &Inventory,
    reveal_secrets: bool,
    highlight: bool,
    width: usize,
) -> Result<Vec<Line>, RenderError> {
    let mut table = Table::new()
        .column(Column::new("Host"))
        .column(Column::new("Data").ratio(3))
        .show_lines(true);

    let highlighter = if highlight {
        Highlighter::Repr
    } else {
        Highlighter::None
    };

    for host in inventory.hosts() {
        let yaml = host_yaml(host, reveal_secrets)?;
        let data = Line::split_segments(highlighter.highlight(yaml.trim_end(), Style::Plain));
        table.add_row(vec![vec![Line::styled(host.name.clone(), Style::Bold)], data]);
    }
    Ok(table.render(width))
}
