use crossterm::style::{Attribute, Attributes, Color, ContentStyle};

/// Semantic style tags. The theme lives here, not at call sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Style {
    #[default]
    Plain,
    Bold,
    Header,
    Host,
    Ok,
    Changed,
    Failed,
    Skipped,
    Params,
    Exception,
    Pass,
    Fail,
    // value highlighting
    AttribName,
    Str,
    Number,
    BoolTrue,
    BoolFalse,
    Null,
    Brace,
    DiffAdd,
    DiffRemove,
}

impl Style {
    fn parts(&self) -> (Option<Color>, &'static [Attribute]) {
        match self {
            Self::Plain => (None, &[]),
            Self::Bold => (None, &[Attribute::Bold]),
            Self::Header => (Some(Color::DarkGrey), &[Attribute::Underlined]),
            Self::Host => (Some(Color::Blue), &[]),
            Self::Ok => (Some(Color::DarkGreen), &[]),
            Self::Changed => (Some(Color::Rgb { r: 255, g: 175, b: 0 }), &[]),
            Self::Failed => (Some(Color::DarkRed), &[]),
            Self::Skipped | Self::Params => (Some(Color::DarkGrey), &[]),
            Self::Exception => (Some(Color::Red), &[]),
            Self::Pass => (Some(Color::Green), &[]),
            Self::Fail => (Some(Color::Red), &[]),
            Self::AttribName => (Some(Color::Yellow), &[]),
            Self::Str => (Some(Color::Green), &[]),
            Self::Number => (Some(Color::Cyan), &[Attribute::Bold]),
            Self::BoolTrue => (Some(Color::Green), &[Attribute::Italic]),
            Self::BoolFalse => (Some(Color::Red), &[Attribute::Italic]),
            Self::Null => (Some(Color::Magenta), &[Attribute::Italic]),
            Self::Brace => (None, &[Attribute::Bold]),
            Self::DiffAdd => (Some(Color::Green), &[]),
            Self::DiffRemove => (Some(Color::Red), &[]),
        }
    }

    pub fn content_style(&self) -> ContentStyle {
        let (color, attrs) = self.parts();
        let mut attributes = Attributes::default();
        for attr in attrs {
            attributes.set(*attr);
        }
        let mut style = ContentStyle::new();
        style.foreground_color = color;
        style.attributes = attributes;
        style
    }

    /// Inline CSS for HTML export; `None` for unstyled text.
    pub fn css(&self) -> Option<String> {
        let (color, attrs) = self.parts();
        let mut rules = Vec::new();
        if let Some(color) = color {
            rules.push(format!("color: {}", css_color(color)));
        }
        for attr in attrs {
            match attr {
                Attribute::Bold => rules.push("font-weight: bold".to_string()),
                Attribute::Italic => rules.push("font-style: italic".to_string()),
                Attribute::Underlined => rules.push("text-decoration: underline".to_string()),
                _ => {}
            }
        }
        (!rules.is_empty()).then(|| rules.join("; "))
    }
}

fn css_color(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("#{r:02x}{g:02x}{b:02x}"),
        Color::Blue => "#3b78ff".to_string(),
        Color::DarkGreen => "#008000".to_string(),
        Color::Green => "#16c60c".to_string(),
        Color::DarkRed => "#c50f1f".to_string(),
        Color::Red => "#e74856".to_string(),
        Color::DarkGrey => "#808080".to_string(),
        Color::Yellow => "#f9f1a5".to_string(),
        Color::Cyan => "#61d6d6".to_string(),
        Color::Magenta => "#b4009e".to_string(),
        _ => "inherit".to_string(),
    }
}
