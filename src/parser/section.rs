//! Declarative section schemas.
//!
//! A [`Schema`] describes the expected structure of a flattened report
//! document as an ordered list of [`Section`]s. Each section carries boundary
//! predicates deciding where it starts and ends, and optionally a
//! content-parser that converts its buffered lines into structured records.
//!
//! Schemas are pure configuration: construction has no side effects, sections
//! are immutable once built, and the same `Schema` instance can drive any
//! number of concurrent or sequential parses — all per-parse bookkeeping
//! (including completion state) lives in the engine, never here.

use serde_json::{Map, Value};

/// Stable identity of a section within a [`Schema`].
///
/// Assigned at schema construction and used by the engine to key per-parse
/// completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(pub(crate) usize);

/// The closed set of section shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// A single region with no repeating structure (e.g. a title block).
    Leaf,
    /// Groups zero-or-more repetitions of exactly one nested template
    /// (e.g. "all findings"). Containers carry no content-parser of their
    /// own; their buffered lines are dropped at boundaries.
    Container,
    /// The per-instance template owned by a [`Container`](SectionKind::Container);
    /// one definition produces one runtime instance per detected occurrence.
    RepeatingItem,
}

/// Everything a boundary predicate may look at when classifying a line.
///
/// Predicates must be locally decidable from this context alone — the engine
/// never offers lookahead and never revisits a boundary decision.
pub struct BoundaryContext<'a> {
    /// The line under classification (trimmed, non-empty).
    pub line: &'a str,
    /// The previously fed line, or `""` at the start of the document.
    pub previous_line: &'a str,
    /// Lines buffered since the last boundary.
    pub buffer: &'a [String],
    /// Which sections have completed so far in this parse.
    pub completed: &'a Completed,
}

/// Read-only view of per-parse completion state.
///
/// Owned by the engine; exposed to predicates so that, for example, a title
/// section can assert it only matches before anything else has finished.
#[derive(Debug)]
pub struct Completed {
    flags: Vec<bool>,
    count: usize,
}

impl Completed {
    pub(crate) fn new(section_count: usize) -> Self {
        Completed {
            flags: vec![false; section_count],
            count: 0,
        }
    }

    /// Marks a section completed. The false→true transition happens at most
    /// once per parse; marking an already-completed section is a no-op.
    pub(crate) fn mark(&mut self, id: SectionId) {
        if !self.flags[id.0] {
            self.flags[id.0] = true;
            self.count += 1;
        }
    }

    /// Returns `true` if the given section has completed in this parse.
    pub fn contains(&self, id: SectionId) -> bool {
        self.flags[id.0]
    }

    /// Number of sections completed so far.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no section has completed yet.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// What a content-parser hands back to the engine.
pub enum SectionOutput {
    /// Key/value pairs merged into the report's `metadata` slot.
    Metadata(Map<String, Value>),
    /// Entity records merged into the report's `data` slot, keyed by derived
    /// entity key. Records flushed from a repeating item also feed the
    /// summary and aggregation counters.
    Records(Map<String, Value>),
}

pub(crate) type BoundaryFn = Box<dyn Fn(&BoundaryContext<'_>) -> bool + Send + Sync>;
pub(crate) type ContentParserFn =
    Box<dyn Fn(&str, &[String]) -> Result<SectionOutput, String> + Send + Sync>;

/// One declared region of the expected document structure.
///
/// Built with [`Section::leaf`], [`Section::container`], or
/// [`Section::repeating_item`]; the kind tag enforces which capabilities each
/// shape may carry (a container must own exactly one template and no
/// content-parser, a repeating item can nest nothing).
pub struct Section {
    pub(crate) name: &'static str,
    pub(crate) kind: SectionKind,
    pub(crate) start: BoundaryFn,
    pub(crate) end: Option<BoundaryFn>,
    pub(crate) nested: Option<Box<Section>>,
    pub(crate) parser: Option<ContentParserFn>,
}

impl Section {
    /// A leaf section: one region, no repetition.
    pub fn leaf(
        name: &'static str,
        start: impl Fn(&BoundaryContext<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Section {
            name,
            kind: SectionKind::Leaf,
            start: Box::new(start),
            end: None,
            nested: None,
            parser: None,
        }
    }

    /// A container grouping repeated instances of `item`.
    ///
    /// # Panics
    ///
    /// Panics if `item` is not a [`Section::repeating_item`]. Schemas are
    /// static program configuration, so a malformed one is a programming
    /// error caught at construction.
    pub fn container(
        name: &'static str,
        start: impl Fn(&BoundaryContext<'_>) -> bool + Send + Sync + 'static,
        item: Section,
    ) -> Self {
        assert!(
            item.kind == SectionKind::RepeatingItem,
            "container '{name}' requires a repeating_item template, got {:?}",
            item.kind
        );
        Section {
            name,
            kind: SectionKind::Container,
            start: Box::new(start),
            end: None,
            nested: Some(Box::new(item)),
            parser: None,
        }
    }

    /// The per-instance template of a container.
    pub fn repeating_item(
        name: &'static str,
        start: impl Fn(&BoundaryContext<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Section {
            name,
            kind: SectionKind::RepeatingItem,
            start: Box::new(start),
            end: None,
            nested: None,
            parser: None,
        }
    }

    /// Sets the end boundary predicate.
    ///
    /// Sections without an end predicate are closed by their active
    /// container's end, or superseded by the next section's start.
    pub fn until(
        mut self,
        end: impl Fn(&BoundaryContext<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.end = Some(Box::new(end));
        self
    }

    /// Attaches the content-parser invoked when this section's buffer is
    /// flushed at a boundary.
    ///
    /// # Panics
    ///
    /// Panics for containers: a container has no direct content of its own,
    /// only its repeated children do.
    pub fn with_parser(
        mut self,
        parser: impl Fn(&str, &[String]) -> Result<SectionOutput, String> + Send + Sync + 'static,
    ) -> Self {
        assert!(
            self.kind != SectionKind::Container,
            "container '{}' cannot carry a content-parser",
            self.name
        );
        self.parser = Some(Box::new(parser));
        self
    }

    /// Attaches a nested section to a leaf.
    ///
    /// # Panics
    ///
    /// Panics for repeating items, which can nest nothing.
    pub fn with_nested(mut self, nested: Section) -> Self {
        assert!(
            self.kind != SectionKind::RepeatingItem,
            "repeating item '{}' cannot nest a section",
            self.name
        );
        self.nested = Some(Box::new(nested));
        self
    }
}

/// Flattened, immutable schema node. The container→template edge is resolved
/// to ids once, here; the engine never mutates parent or child pointers.
pub(crate) struct Node {
    pub(crate) name: &'static str,
    pub(crate) kind: SectionKind,
    pub(crate) start: BoundaryFn,
    pub(crate) end: Option<BoundaryFn>,
    pub(crate) nested: Option<SectionId>,
    pub(crate) parser: Option<ContentParserFn>,
}

/// An ordered collection of top-level sections forming the document's
/// expected structure.
///
/// The declared order defines the expected order of appearance; the engine
/// only ever skips forward to the next not-yet-completed entry.
pub struct Schema {
    nodes: Vec<Node>,
    top_level: Vec<SectionId>,
}

impl Schema {
    /// Flattens the section tree into an id-addressed arena.
    pub fn new(sections: Vec<Section>) -> Self {
        let mut nodes = Vec::new();
        let mut top_level = Vec::new();
        for section in sections {
            let id = Self::insert(&mut nodes, section);
            top_level.push(id);
        }
        Schema { nodes, top_level }
    }

    fn insert(nodes: &mut Vec<Node>, section: Section) -> SectionId {
        let Section {
            name,
            kind,
            start,
            end,
            nested,
            parser,
        } = section;
        let id = SectionId(nodes.len());
        nodes.push(Node {
            name,
            kind,
            start,
            end,
            nested: None,
            parser,
        });
        if let Some(nested) = nested {
            let child = Self::insert(nodes, *nested);
            nodes[id.0].nested = Some(child);
        }
        id
    }

    /// Total number of sections, nested templates included.
    pub fn section_count(&self) -> usize {
        self.nodes.len()
    }

    /// Declared name of a section, for diagnostics.
    pub fn name_of(&self, id: SectionId) -> &'static str {
        self.nodes[id.0].name
    }

    pub(crate) fn node(&self, id: SectionId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn top_level(&self) -> &[SectionId] {
        &self.top_level
    }
}
