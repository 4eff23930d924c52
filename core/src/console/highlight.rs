use lazy_static::lazy_static;
use regex::Regex;

use super::{Segment, Style};

lazy_static! {
    // Later rules win where spans overlap.
    static ref REPR_RULES: Vec<(Regex, Style)> = vec![
        (Regex::new(r#""[^"\n]*""#).unwrap(), Style::Str),
        (Regex::new(r"'[^'\n]*'").unwrap(), Style::Str),
        (
            Regex::new(r"(?:^|[^\w.])(-?[0-9]+(?:\.[0-9]+)?(?:[eE][-+]?[0-9]+)?)\b").unwrap(),
            Style::Number,
        ),
        (Regex::new(r"\b0x[0-9a-fA-F]+\b").unwrap(), Style::Number),
        (Regex::new(r"\b(?:true|True)\b").unwrap(), Style::BoolTrue),
        (Regex::new(r"\b(?:false|False)\b").unwrap(), Style::BoolFalse),
        (Regex::new(r"\b(?:null|None)\b").unwrap(), Style::Null),
        (Regex::new(r"[{}\[\]()]").unwrap(), Style::Brace),
        (Regex::new(r#"("[\w\-.]*") ?:"#).unwrap(), Style::AttribName),
        (Regex::new(r"(?m)^\s*([\w\-.]+) ?:").unwrap(), Style::AttribName),
        (Regex::new(r"(?m)^\+.*$").unwrap(), Style::DiffAdd),
        (Regex::new(r"(?m)^-.*$").unwrap(), Style::DiffRemove),
    ];
}

/// Regex highlighter for rendered values: attribute names, strings, numbers,
/// booleans, braces and unified-diff lines.
#[derive(Debug, Clone, Copy, Default)]
pub enum Highlighter {
    /// Paint everything in one style.
    #[default]
    None,
    Repr,
    /// Paint everything red.
    Red,
}

impl Highlighter {
    pub fn highlight(&self, text: &str, base: Style) -> Vec<Segment> {
        match self {
            Self::None => vec![Segment::new(text, base)],
            Self::Red => vec![Segment::new(text, Style::Exception)],
            Self::Repr => repr_highlight(text, base),
        }
    }
}

fn repr_highlight(text: &str, base: Style) -> Vec<Segment> {
    let mut styles = vec![base; text.len()];
    for (re, style) in REPR_RULES.iter() {
        for caps in re.captures_iter(text) {
            let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };
            for slot in &mut styles[m.start()..m.end()] {
                *slot = *style;
            }
        }
    }

    let mut segments: Vec<Segment> = Vec::new();
    for (idx, ch) in text.char_indices() {
        let style = styles[idx];
        match segments.last_mut() {
            Some(last) if last.style == style => last.text.push(ch),
            _ => segments.push(Segment::new(ch.to_string(), style)),
        }
    }
    segments
}
