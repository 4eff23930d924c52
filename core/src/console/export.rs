use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Line;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Text,
    #[default]
    Html,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Html => f.write_str("html"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

pub(crate) fn to_text(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.plain_text().trim_end());
        out.push('\n');
    }
    out
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<style>
body { color: #cccccc; background-color: #0c0c0c; }
pre { font-family: Menlo, 'DejaVu Sans Mono', consolas, 'Courier New', monospace; }
</style>
</head>
<body>
<pre><code>"#;

const HTML_TAIL: &str = "</code></pre>\n</body>\n</html>\n";

pub(crate) fn to_html(lines: &[Line]) -> String {
    let mut out = String::from(HTML_HEAD);
    for line in lines {
        for seg in line.segments() {
            let text = escape_html(&seg.text);
            match seg.style.css() {
                Some(css) => out.push_str(&format!("<span style=\"{css}\">{text}</span>")),
                None => out.push_str(&text),
            }
        }
        out.push('\n');
    }
    out.push_str(HTML_TAIL);
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
