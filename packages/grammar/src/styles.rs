//! Style Rule Table: CSS declarations that map onto semantic elements.

use crate::color::palette_color;
use crate::kind::ElementKind;
use notepaste_common::Attribute;

/// CSS properties with a semantic counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    FontWeight,
    FontStyle,
    TextDecoration,
    Background,
    Color,
}

/// Element to synthesise for a matching declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMatch {
    pub kind: ElementKind,
    pub attribute: Option<Attribute>,
}

impl StyleMatch {
    fn bare(kind: ElementKind) -> Self {
        Self {
            kind,
            attribute: None,
        }
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        self.attribute.iter().cloned().collect()
    }
}

impl StyleProperty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "font-weight" => Some(StyleProperty::FontWeight),
            "font-style" => Some(StyleProperty::FontStyle),
            "text-decoration" | "text-decoration-line" => Some(StyleProperty::TextDecoration),
            "background" | "background-color" => Some(StyleProperty::Background),
            "color" => Some(StyleProperty::Color),
            _ => None,
        }
    }

    /// Every kind this property can synthesise.
    pub fn targets(self) -> &'static [ElementKind] {
        match self {
            StyleProperty::FontWeight => &[ElementKind::Strong],
            StyleProperty::FontStyle => &[ElementKind::Em],
            StyleProperty::TextDecoration => &[ElementKind::U, ElementKind::Strike],
            StyleProperty::Background => &[ElementKind::SyntheticHighlight],
            StyleProperty::Color => &[ElementKind::SyntheticFont],
        }
    }

    pub fn apply(self, value: &str) -> Option<StyleMatch> {
        let value = value.trim().to_ascii_lowercase();
        match self {
            StyleProperty::FontWeight => {
                let bold = match value.as_str() {
                    "bold" | "bolder" => true,
                    numeric => numeric.parse::<u16>().map(|w| w >= 600).unwrap_or(false),
                };
                bold.then(|| StyleMatch::bare(ElementKind::Strong))
            }
            StyleProperty::FontStyle => matches!(value.as_str(), "italic" | "oblique")
                .then(|| StyleMatch::bare(ElementKind::Em)),
            StyleProperty::TextDecoration => {
                value.split_whitespace().find_map(|token| match token {
                    "underline" => Some(StyleMatch::bare(ElementKind::U)),
                    "line-through" => Some(StyleMatch::bare(ElementKind::Strike)),
                    _ => None,
                })
            }
            StyleProperty::Background => {
                color_in(&value).map(|color| StyleMatch {
                    kind: ElementKind::SyntheticHighlight,
                    attribute: Some(Attribute::new("color", color)),
                })
            }
            StyleProperty::Color => color_in(&value).map(|color| StyleMatch {
                kind: ElementKind::SyntheticFont,
                attribute: Some(Attribute::new("color", color)),
            }),
        }
    }
}

// Shorthands like `background: yellow none repeat` carry the colour as one token.
fn color_in(value: &str) -> Option<String> {
    palette_color(value).or_else(|| value.split_whitespace().find_map(palette_color))
}

/// Split a `style` attribute into `(property, value)` declarations.
pub fn declarations(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        let name = name.trim();
        let value = value.trim();
        (!name.is_empty() && !value.is_empty()).then_some((name, value))
    })
}

/// Look a single declaration up in the table.
pub fn lookup(property: &str, value: &str) -> Option<StyleMatch> {
    StyleProperty::from_name(property)?.apply(value)
}

/// Elements to synthesise for a `style` attribute, in declaration order.
pub fn synthesize(style: &str) -> Vec<StyleMatch> {
    declarations(style)
        .filter_map(|(property, value)| lookup(property, value))
        .collect()
}
