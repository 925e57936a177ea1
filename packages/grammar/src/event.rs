use crate::kind::ElementKind;
use notepaste_common::Attribute;
use serde::Serialize;

/// Canonical event emitted by the cleaner and consumed by the writers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    StartTag {
        name: ElementKind,
        attributes: Vec<Attribute>,
    },
    EndTag {
        name: ElementKind,
    },
    StandaloneTag {
        name: ElementKind,
        attributes: Vec<Attribute>,
    },
    Text {
        content: String,
    },
}

impl Event {
    pub fn start(name: ElementKind, attributes: Vec<Attribute>) -> Self {
        Event::StartTag { name, attributes }
    }

    pub fn end(name: ElementKind) -> Self {
        Event::EndTag { name }
    }

    pub fn standalone(name: ElementKind, attributes: Vec<Attribute>) -> Self {
        Event::StandaloneTag { name, attributes }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Event::Text {
            content: content.into(),
        }
    }

    pub fn is_start_of(&self, kind: ElementKind) -> bool {
        matches!(self, Event::StartTag { name, .. } if *name == kind)
    }
}
