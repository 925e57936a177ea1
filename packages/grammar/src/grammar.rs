use crate::color::palette_color;
use crate::error::GrammarError;
use crate::event::Event;
use crate::kind::{ElementKind, TagName};
use crate::styles::StyleProperty;
use notepaste_common::{find_attribute, Attribute};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Block synthesised around stray inline content and text
pub const DEFAULT_BLOCK: ElementKind = ElementKind::P;

static STANDARD: Lazy<Grammar> = Lazy::new(|| {
    Grammar::build(standard_specs())
        .unwrap_or_else(|err| panic!("built-in grammar is invalid: {}", err))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Block,
    Inline,
    ListItem,
    DefListItem,
    TableRow,
    TableContent,
}

/// Child or parent reference used when declaring an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allow {
    Kind(ElementKind),
    /// Every entry declared with this category
    Category(Category),
    /// Text nodes
    Text,
    /// Blocks, inlines and text
    Flow,
}

/// Transform applied to a recognised source attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRule {
    Href,
    Color,
    ListStyle,
}

impl AttributeRule {
    pub fn apply(self, value: &str) -> Option<String> {
        match self {
            AttributeRule::Href => usable_href(value).map(str::to_string),
            AttributeRule::Color => palette_color(value),
            AttributeRule::ListStyle => match value.trim().to_ascii_lowercase().as_str() {
                "disc" => Some("disc".to_string()),
                "number" => Some("number".to_string()),
                _ => None,
            },
        }
    }
}

/// Attribute computed from the element's parent rather than the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedAttribute {
    /// `list="number"` under `ol`, `list="disc"` otherwise
    ListStyle,
}

impl DerivedAttribute {
    pub fn derive(self, parent: Option<ElementKind>) -> Attribute {
        match self {
            DerivedAttribute::ListStyle => {
                let style = if parent == Some(ElementKind::Ol) {
                    "number"
                } else {
                    "disc"
                };
                Attribute::new("list", style)
            }
        }
    }
}

/// Children an entry silently drops depending on what it already holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreChild {
    /// Drop a default block opened as the very first child. Its content
    /// lands directly in the parent.
    LeadingParagraph,
}

impl IgnoreChild {
    pub fn ignores(self, parent: &Entry, last: Option<&Event>, candidate: ElementKind) -> bool {
        match self {
            IgnoreChild::LeadingParagraph => {
                candidate == DEFAULT_BLOCK && last.is_some_and(|event| event.is_start_of(parent.kind))
            }
        }
    }
}

/// Source-attribute condition an element must meet to be kept at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// `href` present and usable
    UsableHref,
    /// Outline items carrying a `data-type` marker only count as list
    /// items when they also carry `data-list`
    ListMarker,
}

impl Precondition {
    pub fn admits(self, raw: &[Attribute]) -> bool {
        match self {
            Precondition::UsableHref => find_attribute(raw, "href")
                .and_then(usable_href)
                .is_some(),
            Precondition::ListMarker => {
                find_attribute(raw, "data-type").is_none()
                    || find_attribute(raw, "data-list").is_some()
            }
        }
    }
}

/// The href, trimmed, unless it is empty or uses a script-capable scheme.
pub fn usable_href(value: &str) -> Option<&str> {
    let href = value.trim();
    if href.is_empty() {
        return None;
    }

    let compact: String = href
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    let unsafe_scheme = ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| compact.starts_with(scheme));

    (!unsafe_scheme).then_some(href)
}

#[derive(Debug, Clone, Default)]
struct ChildSet {
    kinds: HashSet<ElementKind>,
    text: bool,
}

/// Declaration of one grammar entry before group macros are expanded
#[derive(Debug, Clone)]
pub struct EntrySpec {
    kind: ElementKind,
    category: Option<Category>,
    output: Option<&'static str>,
    replace: Option<ElementKind>,
    children: Vec<Allow>,
    parents: Vec<Allow>,
    attributes: Vec<(&'static str, AttributeRule)>,
    derived: Vec<DerivedAttribute>,
    attrs_as_style: Vec<(&'static str, StyleProperty)>,
    ignore_child: Option<IgnoreChild>,
    preconditions: Vec<Precondition>,
    standalone: bool,
    empty_collapsible: bool,
    break_line: bool,
}

impl EntrySpec {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            category: None,
            output: None,
            replace: None,
            children: Vec::new(),
            parents: Vec::new(),
            attributes: Vec::new(),
            derived: Vec::new(),
            attrs_as_style: Vec::new(),
            ignore_child: None,
            preconditions: Vec::new(),
            standalone: false,
            empty_collapsible: false,
            break_line: false,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn output(mut self, name: &'static str) -> Self {
        self.output = Some(name);
        self
    }

    pub fn replace(mut self, target: ElementKind) -> Self {
        self.replace = Some(target);
        self
    }

    pub fn children(mut self, allowed: &[Allow]) -> Self {
        self.children.extend_from_slice(allowed);
        self
    }

    pub fn parents(mut self, required: &[Allow]) -> Self {
        self.parents.extend_from_slice(required);
        self
    }

    pub fn attribute(mut self, name: &'static str, rule: AttributeRule) -> Self {
        self.attributes.push((name, rule));
        self
    }

    pub fn derived(mut self, attribute: DerivedAttribute) -> Self {
        self.derived.push(attribute);
        self
    }

    pub fn attr_as_style(mut self, name: &'static str, property: StyleProperty) -> Self {
        self.attrs_as_style.push((name, property));
        self
    }

    pub fn ignore_child(mut self, predicate: IgnoreChild) -> Self {
        self.ignore_child = Some(predicate);
        self
    }

    pub fn requires(mut self, precondition: Precondition) -> Self {
        self.preconditions.push(precondition);
        self
    }

    pub fn standalone(mut self) -> Self {
        self.standalone = true;
        self
    }

    pub fn empty_collapsible(mut self) -> Self {
        self.empty_collapsible = true;
        self
    }

    pub fn break_line(mut self) -> Self {
        self.break_line = true;
        self
    }
}

/// Resolved grammar entry
#[derive(Debug, Clone)]
pub struct Entry {
    pub kind: ElementKind,
    pub category: Option<Category>,
    /// Name written to the canonical tree. `None` keeps the content and
    /// drops the element.
    pub output: Option<&'static str>,
    pub replace: Option<ElementKind>,
    pub standalone: bool,
    pub empty_collapsible: bool,
    pub break_line: bool,
    pub ignore_child: Option<IgnoreChild>,
    pub attrs_as_style: Vec<(&'static str, StyleProperty)>,
    attributes: Vec<(&'static str, AttributeRule)>,
    derived: Vec<DerivedAttribute>,
    preconditions: Vec<Precondition>,
    children: ChildSet,
    parents: Vec<ElementKind>,
}

impl Entry {
    pub fn allows(&self, kind: ElementKind) -> bool {
        self.children.kinds.contains(&kind)
    }

    pub fn allows_text(&self) -> bool {
        self.children.text
    }

    /// Required parents in declaration order. Empty when any parent will do.
    pub fn required_parents(&self) -> &[ElementKind] {
        &self.parents
    }

    /// Whether the source attributes meet every precondition.
    pub fn admits(&self, raw: &[Attribute]) -> bool {
        self.preconditions.iter().all(|precondition| precondition.admits(raw))
    }

    pub fn is_block(&self) -> bool {
        self.category == Some(Category::Block)
    }

    pub fn is_inline(&self) -> bool {
        self.category == Some(Category::Inline)
    }

    /// Keep the recognised attributes, transformed, then append derived ones.
    pub fn clean_attributes(&self, raw: &[Attribute], parent: Option<ElementKind>) -> Vec<Attribute> {
        let mut cleaned = Vec::new();

        for (name, rule) in &self.attributes {
            let value = find_attribute(raw, name).and_then(|value| rule.apply(value));
            if let Some(value) = value {
                cleaned.push(Attribute::new(*name, value));
            }
        }

        for derived in &self.derived {
            cleaned.push(derived.derive(parent));
        }

        cleaned
    }
}

/// The content grammar: one entry per recognised element kind
#[derive(Debug, Clone)]
pub struct Grammar {
    entries: HashMap<ElementKind, Entry>,
}

impl Grammar {
    /// The built-in grammar, built on first use.
    pub fn standard() -> &'static Grammar {
        &STANDARD
    }

    /// Expand group macros and validate the declarations.
    pub fn build(specs: Vec<EntrySpec>) -> Result<Self, GrammarError> {
        let mut groups: HashMap<Category, Vec<ElementKind>> = HashMap::new();
        let mut declared = HashSet::new();
        for spec in &specs {
            if !declared.insert(spec.kind) {
                return Err(GrammarError::Duplicate(spec.kind));
            }
            if let Some(category) = spec.category {
                groups.entry(category).or_default().push(spec.kind);
            }
        }

        let mut entries = HashMap::with_capacity(specs.len());
        for spec in specs {
            let children = expand_children(&spec.children, &groups);
            let parents = expand_parents(&spec.parents, &groups);

            if let Some(&parent) = parents.first() {
                if !declared.contains(&parent) {
                    return Err(GrammarError::MissingParent {
                        kind: spec.kind,
                        parent,
                    });
                }
            }

            entries.insert(
                spec.kind,
                Entry {
                    kind: spec.kind,
                    category: spec.category,
                    output: spec.output,
                    replace: spec.replace,
                    standalone: spec.standalone,
                    empty_collapsible: spec.empty_collapsible,
                    break_line: spec.break_line,
                    ignore_child: spec.ignore_child,
                    attrs_as_style: spec.attrs_as_style,
                    attributes: spec.attributes,
                    derived: spec.derived,
                    preconditions: spec.preconditions,
                    children,
                    parents,
                },
            );
        }

        let grammar = Grammar { entries };
        grammar.check_default_block()?;
        grammar.check_aliases()?;
        grammar.check_style_synthesis()?;
        Ok(grammar)
    }

    pub fn entry(&self, kind: ElementKind) -> Option<&Entry> {
        self.entries.get(&kind)
    }

    /// Follow `replace` links to the concrete kind.
    pub fn resolve(&self, kind: ElementKind) -> ElementKind {
        let mut current = kind;
        // Chains were checked for cycles at build time.
        for _ in 0..=self.entries.len() {
            match self.entries.get(&current).and_then(|entry| entry.replace) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    pub fn resolve_name(&self, name: TagName) -> TagName {
        match name {
            TagName::Known(kind) => TagName::Known(self.resolve(kind)),
            unknown => unknown,
        }
    }

    pub fn output_name(&self, kind: ElementKind) -> Option<&'static str> {
        self.entry(kind).and_then(|entry| entry.output)
    }

    fn check_default_block(&self) -> Result<(), GrammarError> {
        match self.entry(DEFAULT_BLOCK) {
            Some(entry) if entry.is_block() => Ok(()),
            _ => Err(GrammarError::MissingDefaultBlock(DEFAULT_BLOCK)),
        }
    }

    fn check_aliases(&self) -> Result<(), GrammarError> {
        for &start in self.entries.keys() {
            let mut current = start;
            let mut steps = 0;
            while let Some(next) = self.entry(current).and_then(|entry| entry.replace) {
                steps += 1;
                if steps > self.entries.len() {
                    return Err(GrammarError::AliasCycle(start));
                }
                current = next;
            }
        }
        Ok(())
    }

    fn check_style_synthesis(&self) -> Result<(), GrammarError> {
        for &start in self.entries.keys() {
            let mut pending = self.style_targets(start);
            let mut seen = HashSet::new();
            while let Some(kind) = pending.pop() {
                if kind == start {
                    return Err(GrammarError::StyleCycle(start));
                }
                if seen.insert(kind) {
                    pending.extend(self.style_targets(kind));
                }
            }
        }
        Ok(())
    }

    fn style_targets(&self, kind: ElementKind) -> Vec<ElementKind> {
        self.entry(kind)
            .map(|entry| {
                entry
                    .attrs_as_style
                    .iter()
                    .flat_map(|(_, property)| property.targets())
                    .map(|&target| self.resolve(target))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn expand_children(allowed: &[Allow], groups: &HashMap<Category, Vec<ElementKind>>) -> ChildSet {
    let mut set = ChildSet::default();
    for allow in allowed {
        match allow {
            Allow::Kind(kind) => {
                set.kinds.insert(*kind);
            }
            Allow::Category(category) => {
                set.kinds.extend(groups.get(category).into_iter().flatten());
            }
            Allow::Text => set.text = true,
            Allow::Flow => {
                for category in [Category::Block, Category::Inline] {
                    set.kinds.extend(groups.get(&category).into_iter().flatten());
                }
                set.text = true;
            }
        }
    }
    set
}

fn expand_parents(required: &[Allow], groups: &HashMap<Category, Vec<ElementKind>>) -> Vec<ElementKind> {
    let mut parents = Vec::new();
    let mut push = |kind: ElementKind| {
        if !parents.contains(&kind) {
            parents.push(kind);
        }
    };
    for allow in required {
        match allow {
            Allow::Kind(kind) => push(*kind),
            Allow::Category(category) => {
                for kind in groups.get(category).into_iter().flatten() {
                    push(*kind);
                }
            }
            Allow::Text => {}
            Allow::Flow => {
                for category in [Category::Block, Category::Inline] {
                    for kind in groups.get(&category).into_iter().flatten() {
                        push(*kind);
                    }
                }
            }
        }
    }
    parents
}

fn standard_specs() -> Vec<EntrySpec> {
    use ElementKind as K;

    const PHRASING: &[Allow] = &[Allow::Category(Category::Inline), Allow::Text];
    const FLOW: &[Allow] = &[Allow::Flow];
    const LIST_CONTENT: &[Allow] = &[
        Allow::Category(Category::ListItem),
        Allow::Kind(K::Ul),
        Allow::Kind(K::Ol),
    ];

    let block = |kind: ElementKind| EntrySpec::new(kind).category(Category::Block);
    let inline = |kind: ElementKind| {
        EntrySpec::new(kind)
            .category(Category::Inline)
            .children(PHRASING)
    };

    vec![
        // Blocks
        block(K::P).output("text").children(PHRASING).empty_collapsible(),
        block(K::Text)
            .output("text")
            .children(FLOW)
            .attribute("list", AttributeRule::ListStyle)
            .empty_collapsible(),
        block(K::H1).output("h1").children(PHRASING),
        block(K::H2).output("h2").children(PHRASING),
        block(K::H3).output("h3").children(PHRASING),
        EntrySpec::new(K::H4).replace(K::H3),
        EntrySpec::new(K::H5).replace(K::H3),
        EntrySpec::new(K::H6).replace(K::H3),
        block(K::Blockquote).output("quote").children(FLOW),
        block(K::Quote).output("quote").children(FLOW),
        block(K::Hr).output("hr").standalone(),
        // Lists
        block(K::Ul).children(LIST_CONTENT),
        block(K::Ol).children(LIST_CONTENT),
        EntrySpec::new(K::Li)
            .category(Category::ListItem)
            .output("text")
            .parents(&[Allow::Kind(K::Ul), Allow::Kind(K::Ol)])
            .children(FLOW)
            .derived(DerivedAttribute::ListStyle)
            .requires(Precondition::ListMarker)
            .ignore_child(IgnoreChild::LeadingParagraph),
        block(K::Dl)
            .output("text")
            .children(&[Allow::Category(Category::DefListItem)]),
        EntrySpec::new(K::Dt)
            .category(Category::DefListItem)
            .output("strong")
            .parents(&[Allow::Kind(K::Dl)])
            .children(PHRASING),
        EntrySpec::new(K::Dd)
            .category(Category::DefListItem)
            .parents(&[Allow::Kind(K::Dl)])
            .children(FLOW)
            .ignore_child(IgnoreChild::LeadingParagraph),
        // Tables
        block(K::Table).output("table").children(&[Allow::Kind(K::Tr)]),
        EntrySpec::new(K::Tr)
            .category(Category::TableRow)
            .output("tr")
            .parents(&[Allow::Kind(K::Table)])
            .children(&[Allow::Category(Category::TableContent)]),
        EntrySpec::new(K::Td)
            .category(Category::TableContent)
            .output("td")
            .parents(&[Allow::Category(Category::TableRow)])
            .children(FLOW)
            .empty_collapsible()
            .ignore_child(IgnoreChild::LeadingParagraph),
        EntrySpec::new(K::Th)
            .category(Category::TableContent)
            .output("th")
            .parents(&[Allow::Category(Category::TableRow)])
            .children(FLOW)
            .empty_collapsible()
            .ignore_child(IgnoreChild::LeadingParagraph),
        // Inline
        inline(K::A)
            .output("a")
            .attribute("href", AttributeRule::Href)
            .requires(Precondition::UsableHref),
        inline(K::B).output("strong"),
        inline(K::Strong).output("strong"),
        inline(K::I).output("em"),
        inline(K::Em).output("em"),
        inline(K::Sub).output("sub"),
        inline(K::Sup).output("sup"),
        inline(K::U).output("u"),
        inline(K::S).output("strike"),
        inline(K::Strike).output("strike"),
        inline(K::Code).output("code"),
        inline(K::Cite).output("cite"),
        inline(K::SyntheticHighlight)
            .output("highlight")
            .attribute("color", AttributeRule::Color),
        inline(K::SyntheticFont)
            .output("font")
            .attribute("color", AttributeRule::Color),
        inline(K::Highlight).attr_as_style("color", StyleProperty::Background),
        inline(K::Font).attr_as_style("color", StyleProperty::Color),
        // Content kept, element dropped
        inline(K::Acronym),
        inline(K::Ins),
        inline(K::Small),
        inline(K::Span),
        inline(K::St1),
        inline(K::Var),
        inline(K::Wbr),
        // Aliases and markers
        EntrySpec::new(K::Div).replace(K::P),
        EntrySpec::new(K::Pre).replace(K::P),
        EntrySpec::new(K::Br).break_line(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_declared() {
        let grammar = Grammar::standard();
        for kind in ElementKind::ALL {
            assert!(grammar.entry(*kind).is_some(), "missing entry for {}", kind);
        }
    }

    #[test]
    fn test_macros_expand_to_concrete_kinds() {
        let grammar = Grammar::standard();
        let p = grammar.entry(ElementKind::P).unwrap();
        assert!(p.allows(ElementKind::Strong));
        assert!(p.allows(ElementKind::SyntheticFont));
        assert!(p.allows_text());
        assert!(!p.allows(ElementKind::P));
        assert!(!p.allows(ElementKind::Div), "aliases carry no category");

        let quote = grammar.entry(ElementKind::Blockquote).unwrap();
        assert!(quote.allows(ElementKind::P));
        assert!(quote.allows(ElementKind::Em));
        assert!(quote.allows_text());
        assert!(!quote.allows(ElementKind::Li));

        let td = grammar.entry(ElementKind::Td).unwrap();
        assert_eq!(td.required_parents(), &[ElementKind::Tr]);
    }

    #[test]
    fn test_alias_resolution() {
        let grammar = Grammar::standard();
        assert_eq!(grammar.resolve(ElementKind::Div), ElementKind::P);
        assert_eq!(grammar.resolve(ElementKind::H5), ElementKind::H3);
        assert_eq!(grammar.resolve(ElementKind::Strong), ElementKind::Strong);
        assert_eq!(
            grammar.resolve_name(TagName::parse("pre")),
            TagName::Known(ElementKind::P)
        );
    }

    #[test]
    fn test_clean_attributes() {
        let grammar = Grammar::standard();
        let a = grammar.entry(ElementKind::A).unwrap();
        let raw = vec![
            Attribute::new("class", "x"),
            Attribute::new("HREF", "  https://example.com  "),
        ];
        assert_eq!(
            a.clean_attributes(&raw, None),
            vec![Attribute::new("href", "https://example.com")]
        );

        let li = grammar.entry(ElementKind::Li).unwrap();
        assert_eq!(
            li.clean_attributes(&[], Some(ElementKind::Ol)),
            vec![Attribute::new("list", "number")]
        );
        assert_eq!(
            li.clean_attributes(&[], Some(ElementKind::Ul)),
            vec![Attribute::new("list", "disc")]
        );
    }

    #[test]
    fn test_usable_href() {
        assert_eq!(usable_href(" /path "), Some("/path"));
        assert_eq!(usable_href(""), None);
        assert_eq!(usable_href("   "), None);
        assert_eq!(usable_href("JavaScript:alert(1)"), None);
        assert_eq!(usable_href("java\tscript:alert(1)"), None);
        assert_eq!(usable_href("data:text/html,x"), None);
    }

    #[test]
    fn test_preconditions() {
        let grammar = Grammar::standard();
        let a = grammar.entry(ElementKind::A).unwrap();
        assert!(a.admits(&[Attribute::new("href", "/x")]));
        assert!(!a.admits(&[]));
        assert!(!a.admits(&[Attribute::new("href", " ")]));

        let li = grammar.entry(ElementKind::Li).unwrap();
        assert!(li.admits(&[]));
        assert!(li.admits(&[
            Attribute::new("data-type", "paragraph"),
            Attribute::new("data-list", "paragraph"),
        ]));
        assert!(!li.admits(&[Attribute::new("data-type", "paragraph")]));
    }

    #[test]
    fn test_ignore_leading_paragraph() {
        let grammar = Grammar::standard();
        let li = grammar.entry(ElementKind::Li).unwrap();
        let predicate = li.ignore_child.unwrap();

        let opened = Event::start(ElementKind::Li, vec![]);
        let text = Event::text("item");
        assert!(predicate.ignores(li, Some(&opened), ElementKind::P));
        assert!(!predicate.ignores(li, Some(&text), ElementKind::P));
        assert!(!predicate.ignores(li, Some(&opened), ElementKind::Strong));
    }

    #[test]
    fn test_alias_cycle_is_rejected() {
        let specs = vec![
            EntrySpec::new(ElementKind::P).category(Category::Block),
            EntrySpec::new(ElementKind::Div).replace(ElementKind::Pre),
            EntrySpec::new(ElementKind::Pre).replace(ElementKind::Div),
        ];
        let err = Grammar::build(specs).unwrap_err();
        assert!(matches!(err, GrammarError::AliasCycle(_)));
    }

    #[test]
    fn test_style_cycle_is_rejected() {
        let specs = vec![
            EntrySpec::new(ElementKind::P).category(Category::Block),
            EntrySpec::new(ElementKind::SyntheticFont)
                .category(Category::Inline)
                .attr_as_style("color", StyleProperty::Color),
        ];
        let err = Grammar::build(specs).unwrap_err();
        assert_eq!(err, GrammarError::StyleCycle(ElementKind::SyntheticFont));
    }

    #[test]
    fn test_duplicate_and_missing_default_block() {
        let duplicate = vec![
            EntrySpec::new(ElementKind::P).category(Category::Block),
            EntrySpec::new(ElementKind::P).category(Category::Block),
        ];
        assert_eq!(
            Grammar::build(duplicate).unwrap_err(),
            GrammarError::Duplicate(ElementKind::P)
        );

        let no_block = vec![EntrySpec::new(ElementKind::Span).category(Category::Inline)];
        assert_eq!(
            Grammar::build(no_block).unwrap_err(),
            GrammarError::MissingDefaultBlock(ElementKind::P)
        );
    }
}
