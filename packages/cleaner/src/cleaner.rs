use crate::error::CleanResult;
use crate::options::CleanOptions;
use crate::walker::{TreeListener, Walker};
use crate::writer::{MarkupWriter, TreeWriter};
use notepaste_common::{find_attribute, Attribute, Node};
use notepaste_grammar::styles::{self, StyleMatch};
use notepaste_grammar::{Category, ElementKind, Entry, Event, Grammar, TagName, DEFAULT_BLOCK};
use std::borrow::Cow;
use tracing::{debug, info, instrument, trace};

/// Turns an arbitrary source tree into a grammar-conforming event stream
#[derive(Debug, Clone)]
pub struct Cleaner<'g> {
    grammar: &'g Grammar,
    options: CleanOptions,
}

impl Cleaner<'static> {
    /// Cleaner over the built-in grammar.
    pub fn standard(options: CleanOptions) -> Self {
        Self::new(Grammar::standard(), options)
    }
}

impl Default for Cleaner<'static> {
    fn default() -> Self {
        Self::standard(CleanOptions::default())
    }
}

impl<'g> Cleaner<'g> {
    pub fn new(grammar: &'g Grammar, options: CleanOptions) -> Self {
        Self { grammar, options }
    }

    /// Clean the children of `root`. Fails only when `root` is not an element.
    #[instrument(skip_all, fields(root = root.name().unwrap_or("#text")))]
    pub fn clean(&self, root: &Node) -> CleanResult<CleanOutput<'g>> {
        let walker = Walker::new(root)?;
        info!("Starting clean pass");

        let mut pass = Pass::new(self.grammar, &self.options);
        walker.walk(&mut pass);
        let events = pass.finish();

        info!(events = events.len(), "Clean pass complete");
        Ok(CleanOutput {
            grammar: self.grammar,
            events,
        })
    }
}

/// Balanced event stream produced by one pass
#[derive(Debug, Clone)]
pub struct CleanOutput<'g> {
    grammar: &'g Grammar,
    events: Vec<Event>,
}

impl<'g> CleanOutput<'g> {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn to_tree(&self) -> Node {
        TreeWriter::new(self.grammar).write(&self.events)
    }

    pub fn to_markup(&self) -> String {
        MarkupWriter::new(self.grammar).write(&self.events)
    }
}

/// One open source element
#[derive(Debug, Clone)]
struct Frame {
    /// Alias-resolved name
    name: TagName,
    /// Output index of the StartTag, `None` when nothing was emitted
    start: Option<usize>,
}

/// State of a single cleaning pass
struct Pass<'a> {
    grammar: &'a Grammar,
    options: &'a CleanOptions,
    output: Vec<Event>,
    open: Vec<Frame>,
    /// Positions in `open` of emitted block frames
    blocks: Vec<usize>,
}

impl<'a> Pass<'a> {
    fn new(grammar: &'a Grammar, options: &'a CleanOptions) -> Self {
        Self {
            grammar,
            options,
            output: Vec::new(),
            open: Vec::new(),
            blocks: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<Event> {
        self.pop_to(0);
        self.output
    }

    fn open_tag(&mut self, name: TagName, attributes: &[Attribute]) {
        let name = self.grammar.resolve_name(name);
        let Some((kind, entry)) = self.known(&name) else {
            trace!(element = %name, "Opaque element");
            self.open.push(Frame { name, start: None });
            return;
        };

        if !entry.admits(attributes) {
            debug!(element = %kind, "Dropping element failing its precondition");
            return;
        }

        if entry.break_line {
            self.break_line();
            return;
        }

        if let Some((_, parent)) = self.nearest_known() {
            if let Some(predicate) = parent.ignore_child {
                if predicate.ignores(parent, self.output.last(), kind) {
                    debug!(element = %kind, parent = %parent.kind, "Ignoring child");
                    return;
                }
            }
        }

        while let Some((position, parent)) = self.nearest_known() {
            if parent.allows(kind) {
                break;
            }
            debug!(element = %kind, closing = %parent.kind, "Closing incompatible ancestor");
            self.pop_to(position);
        }

        let required = entry.required_parents();
        if let Some(&first) = required.first() {
            let satisfied = self
                .nearest_known()
                .is_some_and(|(_, parent)| required.contains(&parent.kind));
            if !satisfied {
                debug!(element = %kind, parent = %first, "Synthesising required parent");
                self.open_tag(TagName::Known(first), &[]);
            }
        }

        if entry.is_inline() && self.blocks.is_empty() {
            self.open_default_block();
        }

        let parent = self.nearest_known().map(|(_, parent)| parent.kind);
        let cleaned = entry.clean_attributes(attributes, parent);

        if entry.standalone {
            self.emit(Event::standalone(kind, cleaned));
            return;
        }

        if self.options.dedupe_inline && entry.is_inline() && self.is_open(kind) {
            debug!(element = %kind, "Passing through repeated inline element");
            self.open.push(Frame { name, start: None });
            return;
        }

        let synthesized = style_expansions(entry, attributes);

        let start = self.output.len();
        self.emit(Event::start(kind, cleaned));
        if entry.is_block() {
            self.blocks.push(self.open.len());
        }
        self.open.push(Frame {
            name,
            start: Some(start),
        });

        for style in synthesized {
            let accepted = self
                .nearest_known()
                .is_some_and(|(_, parent)| parent.allows(style.kind));
            if !accepted {
                debug!(element = %style.kind, "Skipping style not allowed here");
                continue;
            }
            trace!(element = %style.kind, "Synthesising element from style");
            self.open_tag(TagName::Known(style.kind), &style.attributes());
        }
    }

    fn close_tag(&mut self, name: TagName) {
        let name = self.grammar.resolve_name(name);
        match self.open.iter().rposition(|frame| frame.name == name) {
            Some(position) => self.pop_to(position),
            None => trace!(element = %name, "Close without matching open"),
        }
    }

    fn text(&mut self, content: Cow<'_, str>) {
        match self.nearest_known() {
            Some((_, parent)) if !parent.allows_text() => {
                debug!(parent = %parent.kind, "Dropping text not allowed here");
                return;
            }
            Some(_) if !self.blocks.is_empty() => {}
            _ => self.open_default_block(),
        }
        self.emit(Event::text(content.into_owned()));
    }

    /// End the current line. The innermost written element holding the
    /// line is split in two and open inline elements continue in the
    /// second half. A table cell, or a `dd` which has no output of its
    /// own, starts a default block inside itself instead. A break directly
    /// inside a table row is ignored.
    fn break_line(&mut self) {
        let target = self
            .open
            .iter()
            .enumerate()
            .rev()
            .find_map(|(position, frame)| {
                frame.start?;
                let (_, entry) = self.known(&frame.name)?;
                (!entry.is_inline()).then_some((position, entry))
            });

        let Some((position, entry)) = target else {
            debug!("Line break outside a block");
            let depth = self.open.len();
            self.open_default_block();
            self.pop_to(depth);
            return;
        };

        match entry.category {
            Some(Category::TableRow) => debug!(parent = %entry.kind, "Ignoring line break"),
            Some(Category::TableContent) => self.start_line_inside(position),
            _ if entry.output.is_none() && entry.allows(DEFAULT_BLOCK) => {
                self.start_line_inside(position)
            }
            _ => {
                trace!(element = %entry.kind, "Splitting at line break");
                let line = self.snapshot(position);
                self.pop_to(position);
                self.reopen(line);
            }
        }
    }

    /// Close the frames above `position`, open a default block and reopen
    /// the closed frames inside it.
    fn start_line_inside(&mut self, position: usize) {
        let inline = self.snapshot(position + 1);
        self.pop_to(position + 1);
        self.open_default_block();
        self.reopen(inline);
    }

    /// Frames from `position` up, each with the StartTag it emitted.
    fn snapshot(&self, position: usize) -> Vec<(Frame, Option<Event>)> {
        self.open[position..]
            .iter()
            .map(|frame| {
                let start = frame.start.map(|index| self.output[index].clone());
                (frame.clone(), start)
            })
            .collect()
    }

    fn reopen(&mut self, frames: Vec<(Frame, Option<Event>)>) {
        for (frame, start) in frames {
            let start = start.map(|event| {
                self.emit(event);
                self.output.len() - 1
            });
            let is_block = self
                .known(&frame.name)
                .is_some_and(|(_, entry)| entry.is_block());
            if start.is_some() && is_block {
                self.blocks.push(self.open.len());
            }
            self.open.push(Frame { start, ..frame });
        }
    }

    fn open_default_block(&mut self) {
        debug!(element = %DEFAULT_BLOCK, "Synthesising default block");
        self.open_tag(TagName::Known(DEFAULT_BLOCK), &[]);
    }

    /// Pop frames until `open` has `position` entries.
    fn pop_to(&mut self, position: usize) {
        while self.open.len() > position {
            match self.open.pop() {
                Some(frame) => self.close_frame(frame),
                None => break,
            }
        }
    }

    fn close_frame(&mut self, frame: Frame) {
        let Some(start) = frame.start else {
            return;
        };
        let Some((kind, entry)) = self.known(&frame.name) else {
            return;
        };

        if entry.is_block() {
            self.blocks.pop();
        }

        if start + 1 != self.output.len() {
            self.emit(Event::end(kind));
            return;
        }

        // Nothing was emitted inside: collapse or drop.
        match self.output.pop() {
            Some(Event::StartTag { name, attributes }) if entry.empty_collapsible => {
                self.emit(Event::standalone(name, attributes));
            }
            _ => trace!(element = %kind, "Dropping empty element"),
        }
    }

    fn emit(&mut self, event: Event) {
        trace!(?event, "Emit");
        self.output.push(event);
    }

    fn known(&self, name: &TagName) -> Option<(ElementKind, &'a Entry)> {
        let kind = name.kind()?;
        self.grammar.entry(kind).map(|entry| (kind, entry))
    }

    /// Innermost frame the grammar knows about. Opaque frames are transparent.
    fn nearest_known(&self) -> Option<(usize, &'a Entry)> {
        self.open
            .iter()
            .enumerate()
            .rev()
            .find_map(|(position, frame)| {
                self.known(&frame.name).map(|(_, entry)| (position, entry))
            })
    }

    fn is_open(&self, kind: ElementKind) -> bool {
        self.open
            .iter()
            .any(|frame| frame.name == TagName::Known(kind))
    }
}

impl TreeListener for Pass<'_> {
    fn start_element(&mut self, name: &str, attributes: &[Attribute]) {
        self.open_tag(TagName::parse(name), attributes);
    }

    fn end_element(&mut self, name: &str) {
        self.close_tag(TagName::parse(name));
    }

    fn characters(&mut self, text: &str) {
        let text = if self.options.normalize_line_breaks {
            normalize_line_breaks(text)
        } else {
            Cow::Borrowed(text)
        };
        if text.is_empty() || (self.options.skip_blank_text && text.trim().is_empty()) {
            return;
        }
        self.text(text);
    }
}

/// Elements implied by presentational attributes and the `style` attribute.
fn style_expansions(entry: &Entry, attributes: &[Attribute]) -> Vec<StyleMatch> {
    let mut matches = Vec::new();
    for (name, property) in &entry.attrs_as_style {
        if let Some(value) = find_attribute(attributes, name) {
            matches.extend(property.apply(value));
        }
    }
    if let Some(style) = find_attribute(attributes, "style") {
        matches.extend(styles::synthesize(style));
    }
    matches
}

fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\r', '\n']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", " ").replace(['\r', '\n'], " "))
}
