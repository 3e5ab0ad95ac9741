//! Hierarchical streaming section parser.
//!
//! Converts a flat, line-oriented text stream — typically the flattened text
//! of a vendor security report — into a nested, structured [`Report`], driven
//! entirely by a caller-supplied declarative [`Schema`] of sections with
//! boundary-detection predicates.
//!
//! # Control flow
//!
//! The caller feeds trimmed, non-empty lines one at a time. Each line is
//! classified in priority order:
//!
//! 1. **New boundary** — an open repeating item checks its own start
//!    predicate first (a new instance may begin); otherwise the expected next
//!    section's start predicate is tested.
//! 2. **End of section** — the current section's end predicate, then the
//!    active container's.
//! 3. **Accumulation** — neither fired; the line joins the buffer.
//!
//! On every boundary the buffer is flushed to the open section's
//! content-parser exactly once, completion marks are applied, the expected
//! next section is recomputed from the updated completion set, and the buffer
//! restarts at the triggering line. Parsing stops when the schema is
//! exhausted or the line source runs dry — no backtracking, no lookahead.
//!
//! # Example
//!
//! ```rust
//! use vulnharvest::parser::{Schema, Section, SectionOutput, SectionedTextParser};
//! use serde_json::Map;
//!
//! let schema = Schema::new(vec![Section::leaf("title", |ctx| {
//!     ctx.completed.is_empty() && ctx.buffer.is_empty()
//! })
//! .until(|ctx| ctx.line == "---")
//! .with_parser(|_line, buffer| {
//!     let mut map = Map::new();
//!     map.insert("title".into(), buffer.join(" ").into());
//!     Ok(SectionOutput::Metadata(map))
//! })]);
//!
//! let report = SectionedTextParser::new(&schema)
//!     .parse(["Annual Assessment", "---"])
//!     .unwrap();
//! assert_eq!(report.metadata["title"], "Annual Assessment");
//! ```

pub mod section;

pub use section::{
    BoundaryContext, Completed, Schema, Section, SectionId, SectionKind, SectionOutput,
};

use crate::report::Report;
use std::path::{Path, PathBuf};

/// Errors surfaced by a parse invocation.
///
/// A content-parser failure aborts the whole parse: the engine offers no
/// per-section isolation, so the caller never receives a partial report on a
/// malformed section. Callers that want per-file resilience catch this one
/// level up.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("content parser for section '{section}' failed at input line {line_no}: {message}")]
    Content {
        section: &'static str,
        line_no: usize,
        message: String,
    },
}

/// Where the machine currently sits. Every legal transition is enumerated in
/// [`SectionedTextParser::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Idle,
    InLeaf,
    InContainer,
    InRepeatingItem,
}

/// The boundary classification of one line.
enum Transition {
    /// The expected container's start fired.
    EnterContainer(SectionId),
    /// A repeating-item instance begins (first or subsequent).
    EnterItem(SectionId),
    /// The expected leaf's start fired.
    EnterLeaf(SectionId),
    /// The current section's own end predicate fired.
    EndCurrent(SectionId),
    /// The active container's end fired while one of its items was open.
    EndContainer(SectionId),
}

/// One parse invocation: borrows an immutable [`Schema`], owns all mutable
/// state, and is discarded when [`parse`](SectionedTextParser::parse)
/// returns. Completion tracking lives here, keyed by [`SectionId`], so the
/// same schema instance can be reused across concurrent or repeated parses.
pub struct SectionedTextParser<'s> {
    schema: &'s Schema,
    state: EngineState,
    current: Option<SectionId>,
    next: Option<SectionId>,
    active_container: Option<SectionId>,
    buffer: Vec<String>,
    previous_line: String,
    completed: Completed,
    line_no: usize,
    report: Report,
}

impl<'s> SectionedTextParser<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        SectionedTextParser {
            schema,
            state: EngineState::Idle,
            current: None,
            next: schema.top_level().first().copied(),
            active_container: None,
            buffer: Vec::new(),
            previous_line: String::new(),
            completed: Completed::new(schema.section_count()),
            line_no: 0,
            report: Report::default(),
        }
    }

    /// Parses a finite sequence of pre-trimmed, non-empty lines into a
    /// [`Report`].
    ///
    /// Stops early when no expected next section remains (trailing lines are
    /// silently ignored), otherwise runs until the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Content`] when a content-parser rejects its
    /// buffered lines; nothing parsed so far is returned in that case.
    pub fn parse<I, S>(mut self, lines: I) -> Result<Report, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.next.is_none() {
            return Ok(self.report);
        }
        for line in lines {
            self.line_no += 1;
            if !self.feed(line.as_ref())? {
                break;
            }
        }
        Ok(self.report)
    }

    /// Reads `path`, trims every line, drops blank lines and lines matched by
    /// the caller's `ignore_line` filter, and parses the rest.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] when the file cannot be read, or any error
    /// from [`parse`](Self::parse).
    pub fn parse_file(
        self,
        path: &Path,
        ignore_line: impl Fn(&str) -> bool,
    ) -> Result<Report, ParseError> {
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !ignore_line(line)),
        )
    }

    /// Classifies one line and applies its effects. Returns `false` when the
    /// schema is exhausted and parsing should stop.
    fn feed(&mut self, line: &str) -> Result<bool, ParseError> {
        let open = self.current;
        let transition = self
            .detect_start(line)
            .or_else(|| self.detect_end(line));

        match transition {
            None => {
                self.buffer.push(line.to_string());
            }
            Some(transition) => {
                if let Some(id) = open {
                    if !self.completed.contains(id) {
                        self.flush(id, line)?;
                        self.mark_completions(id, &transition);
                    }
                }
                self.advance(transition);
                self.buffer.clear();
                self.buffer.push(line.to_string());
            }
        }

        self.previous_line.clear();
        self.previous_line.push_str(line);
        Ok(self.next.is_some() || self.current.is_some())
    }

    fn context<'a>(&'a self, line: &'a str) -> BoundaryContext<'a> {
        BoundaryContext {
            line,
            previous_line: &self.previous_line,
            buffer: &self.buffer,
            completed: &self.completed,
        }
    }

    /// Priority 1: does a new section (or a new repeating-item instance)
    /// start at this line?
    fn detect_start(&self, line: &str) -> Option<Transition> {
        let ctx = self.context(line);

        // An open repeating item tests its own start first: another instance
        // may begin before the container ends.
        if self.state == EngineState::InRepeatingItem {
            if let Some(current) = self.current {
                if !self.completed.contains(current) && (self.schema.node(current).start)(&ctx) {
                    return Some(Transition::EnterItem(current));
                }
            }
        }

        let next = self.next?;
        let node = self.schema.node(next);
        if (node.start)(&ctx) {
            return Some(match node.kind {
                SectionKind::Container => Transition::EnterContainer(next),
                SectionKind::RepeatingItem => Transition::EnterItem(next),
                SectionKind::Leaf => Transition::EnterLeaf(next),
            });
        }
        None
    }

    /// Priority 2: does the current section, or its active container, end at
    /// this line?
    fn detect_end(&self, line: &str) -> Option<Transition> {
        let ctx = self.context(line);

        if let Some(current) = self.current {
            if !self.completed.contains(current) {
                if let Some(end) = &self.schema.node(current).end {
                    if end(&ctx) {
                        return Some(Transition::EndCurrent(current));
                    }
                }
            }
        }

        // The container's end closes both the open item and the container
        // itself, even when the item carries its own (unfired) end predicate.
        if let Some(container) = self.active_container {
            if self.current != Some(container) && !self.completed.contains(container) {
                if let Some(end) = &self.schema.node(container).end {
                    if end(&ctx) {
                        return Some(Transition::EndContainer(container));
                    }
                }
            }
        }
        None
    }

    /// Hands the buffered lines (plus the triggering line) to the open
    /// section's content-parser and merges the result into the report.
    ///
    /// Sections without a parser (pure containers) drop their buffer here;
    /// that is the only sanctioned loss of buffered content.
    fn flush(&mut self, id: SectionId, line: &str) -> Result<(), ParseError> {
        let schema = self.schema;
        let node = schema.node(id);
        let Some(parser) = &node.parser else {
            return Ok(());
        };

        let output = parser(line, &self.buffer).map_err(|message| ParseError::Content {
            section: node.name,
            line_no: self.line_no,
            message,
        })?;

        match output {
            SectionOutput::Metadata(entries) => {
                for (key, value) in entries {
                    self.report.metadata.insert(key, value);
                }
            }
            SectionOutput::Records(records) => {
                for (key, record) in records {
                    if node.kind == SectionKind::RepeatingItem {
                        self.report.tally(&record);
                    }
                    self.report.data.insert(key, record);
                }
            }
        }
        Ok(())
    }

    /// Applies completion marks for the just-flushed section, before the next
    /// expected section is recomputed.
    fn mark_completions(&mut self, flushed: SectionId, transition: &Transition) {
        match self.schema.node(flushed).kind {
            // A flushed leaf is done whether its own end fired or the next
            // section superseded it.
            SectionKind::Leaf => self.completed.mark(flushed),
            // An item instance completes only when its container ends; an
            // item-to-item boundary leaves the template open for more
            // instances.
            SectionKind::RepeatingItem => {
                if let Transition::EndContainer(container) = transition {
                    self.completed.mark(flushed);
                    self.completed.mark(*container);
                }
            }
            // A container completes only via its own end predicate.
            SectionKind::Container => {
                if let Transition::EndCurrent(id) = transition {
                    if *id == flushed {
                        self.completed.mark(flushed);
                    }
                }
            }
        }
    }

    /// The transition table: every pointer update the machine can make.
    fn advance(&mut self, transition: Transition) {
        match transition {
            Transition::EnterContainer(id) => {
                self.current = Some(id);
                self.next = self.schema.node(id).nested;
                self.active_container = Some(id);
                self.state = EngineState::InContainer;
            }
            Transition::EnterItem(id) => {
                self.current = Some(id);
                // More instances may follow; the template stays expected.
                self.next = Some(id);
                self.state = EngineState::InRepeatingItem;
            }
            Transition::EnterLeaf(id) => {
                self.current = Some(id);
                self.next = match self.schema.node(id).nested {
                    Some(nested) => Some(nested),
                    None => self.next_pending(Some(id)),
                };
                self.state = EngineState::InLeaf;
            }
            Transition::EndCurrent(id) => match self.schema.node(id).kind {
                SectionKind::Leaf => {
                    self.current = None;
                    self.next = self
                        .schema
                        .node(id)
                        .nested
                        .filter(|nested| !self.completed.contains(*nested))
                        .or_else(|| self.next_pending(None));
                    self.state = EngineState::Idle;
                }
                SectionKind::Container => {
                    self.current = None;
                    self.active_container = None;
                    self.next = self.next_pending(None);
                    self.state = EngineState::Idle;
                }
                SectionKind::RepeatingItem => {
                    // The instance flushed, but the template stays open and
                    // expected until its container ends.
                    self.state = EngineState::InRepeatingItem;
                }
            },
            Transition::EndContainer(_) => {
                self.current = None;
                self.active_container = None;
                self.next = self.next_pending(None);
                self.state = EngineState::Idle;
            }
        }
    }

    /// The next not-yet-completed top-level section in declared order,
    /// computed from the already-updated completion set.
    fn next_pending(&self, exclude: Option<SectionId>) -> Option<SectionId> {
        self.schema
            .top_level()
            .iter()
            .copied()
            .find(|id| Some(*id) != exclude && !self.completed.contains(*id))
    }
}
