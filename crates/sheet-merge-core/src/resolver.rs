//! Conflict resolution
//!
//! [`ConflictResolver`] walks the conflicting cells of a merge in the order
//! they were found and asks a [`DecisionSource`] for each one. The source is
//! the only thing that differs between an interactive run ([`LineSource`]
//! over stdin/stdout), a scripted one ([`ScriptedSource`]) and a batch run
//! ([`FixedSource`]).
//!
//! Per conflict the resolver moves through
//! `Prompting -> AwaitingInput -> Applying` and then on to the next conflict,
//! ending in `Done`. An unrecognized answer keeps it in `AwaitingInput` for
//! the same conflict.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::cell::CellSnapshot;
use crate::diff::{MergeDecision, MergeTarget};
use crate::error::{Error, Result};
use crate::orchestrator::PlannedMerge;
use crate::workbook::WorkbookEdit;
use crate::writer::MergeWriter;

/// Answer to one conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Take file1's cell (`1`)
    Side1,
    /// Take file2's cell (`2`)
    Side2,
    /// Keep base's cell (`b`)
    KeepBase,
}

impl Resolution {
    /// Parse an answer token: exactly `1`, `2` or `b`
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "1" => Some(Resolution::Side1),
            "2" => Some(Resolution::Side2),
            "b" => Some(Resolution::KeepBase),
            _ => None,
        }
    }

    /// The token that selects this resolution
    pub fn token(&self) -> &'static str {
        match self {
            Resolution::Side1 => "1",
            Resolution::Side2 => "2",
            Resolution::KeepBase => "b",
        }
    }

    /// The merge target this resolution writes
    pub fn target(&self) -> MergeTarget {
        match self {
            Resolution::Side1 => MergeTarget::Side1,
            Resolution::Side2 => MergeTarget::Side2,
            Resolution::KeepBase => MergeTarget::Base,
        }
    }
}

/// What a decision source is being asked about
#[derive(Debug, Clone, Copy)]
pub struct ConflictPrompt<'a> {
    /// Position of this conflict, starting at 1
    pub ordinal: usize,
    /// Number of conflicts in the merge
    pub total: usize,
    /// Sheet holding the cell
    pub sheet: &'a str,
    /// The conflicting decision
    pub decision: &'a MergeDecision,
}

/// Supplies answers to conflicts
pub trait DecisionSource {
    /// Announce a conflict; called once per conflict before any read
    fn prompt(&mut self, prompt: &ConflictPrompt<'_>) -> Result<()> {
        let _ = prompt;
        Ok(())
    }

    /// Report that `token` was not a valid answer; the same conflict is asked again
    fn invalid(&mut self, prompt: &ConflictPrompt<'_>, token: &str) -> Result<()> {
        let _ = (prompt, token);
        Ok(())
    }

    /// Next answer token, `None` once the source has no more input
    fn next_token(&mut self, prompt: &ConflictPrompt<'_>) -> Result<Option<String>>;
}

/// Resolver progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// About to announce the conflict at this index
    Prompting(usize),
    /// Waiting for an answer to the conflict at this index
    AwaitingInput(usize),
    /// Answer received, about to write it
    Applying(usize, Resolution),
    /// Every conflict has been resolved
    Done,
}

/// Sequentially resolves conflicting cells
pub struct ConflictResolver<'a> {
    conflicts: &'a [PlannedMerge],
    state: ResolverState,
    writer: MergeWriter,
    resolutions: Vec<Resolution>,
}

impl<'a> ConflictResolver<'a> {
    /// Create a resolver over conflicts in the order they were collected
    pub fn new(conflicts: &'a [PlannedMerge]) -> Self {
        let state = if conflicts.is_empty() {
            ResolverState::Done
        } else {
            ResolverState::Prompting(0)
        };
        Self {
            conflicts,
            state,
            writer: MergeWriter::new(),
            resolutions: Vec::with_capacity(conflicts.len()),
        }
    }

    /// Current state
    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// Resolutions chosen so far, in conflict order
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Advance the state machine by one transition
    pub fn step<S, W>(&mut self, source: &mut S, dest: &mut W) -> Result<ResolverState>
    where
        S: DecisionSource + ?Sized,
        W: WorkbookEdit + ?Sized,
    {
        let total = self.conflicts.len();

        self.state = match self.state {
            ResolverState::Prompting(index) => {
                source.prompt(&self.prompt(index))?;
                ResolverState::AwaitingInput(index)
            }
            ResolverState::AwaitingInput(index) => {
                let prompt = self.prompt(index);
                let token = source.next_token(&prompt)?.ok_or(Error::InputExhausted {
                    remaining: total - index,
                    total,
                })?;
                match Resolution::parse(&token) {
                    Some(resolution) => ResolverState::Applying(index, resolution),
                    None => {
                        tracing::debug!("Rejected answer {token:?} for conflict {}", index + 1);
                        source.invalid(&prompt, &token)?;
                        ResolverState::AwaitingInput(index)
                    }
                }
            }
            ResolverState::Applying(index, resolution) => {
                let planned = &self.conflicts[index];
                if resolution != Resolution::KeepBase {
                    let mut sheet = dest
                        .sheet_mut(&planned.sheet)
                        .ok_or_else(|| Error::SheetNotFound(planned.sheet.clone()))?;
                    self.writer
                        .apply_resolution(&planned.decision, resolution, &mut sheet)?;
                }
                tracing::info!(
                    "Conflict {}/{} at {}!{} resolved to {}",
                    index + 1,
                    total,
                    planned.sheet,
                    planned.decision.address(),
                    resolution.target().label()
                );
                self.resolutions.push(resolution);
                if index + 1 < total {
                    ResolverState::Prompting(index + 1)
                } else {
                    ResolverState::Done
                }
            }
            ResolverState::Done => ResolverState::Done,
        };

        Ok(self.state)
    }

    /// Run until every conflict is resolved
    pub fn run<S, W>(mut self, source: &mut S, dest: &mut W) -> Result<Vec<Resolution>>
    where
        S: DecisionSource + ?Sized,
        W: WorkbookEdit + ?Sized,
    {
        while self.state != ResolverState::Done {
            self.step(source, dest)?;
        }
        Ok(self.resolutions)
    }

    fn prompt(&self, index: usize) -> ConflictPrompt<'a> {
        let planned = &self.conflicts[index];
        ConflictPrompt {
            ordinal: index + 1,
            total: self.conflicts.len(),
            sheet: &planned.sheet,
            decision: &planned.decision,
        }
    }
}

/// Line-oriented console protocol over any reader/writer pair
///
/// Prints `conflict {n} / {total} [1 , 2 , b]` followed by the three
/// competing cells, then reads one line per answer.
pub struct LineSource<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineSource<R, W> {
    /// Create a source reading answers from `reader` and prompting on `writer`
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Give back the reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn describe(snapshot: &CellSnapshot) -> String {
        if !snapshot.is_literal() {
            format!("={}", snapshot.formula)
        } else if snapshot.value.is_empty() {
            "(empty)".to_string()
        } else {
            snapshot.value.to_string()
        }
    }
}

impl<R: BufRead, W: Write> DecisionSource for LineSource<R, W> {
    fn prompt(&mut self, prompt: &ConflictPrompt<'_>) -> Result<()> {
        let d = prompt.decision;
        writeln!(
            self.writer,
            "conflict {} / {} [1 , 2 , b]",
            prompt.ordinal, prompt.total
        )?;
        writeln!(self.writer, "  {}!{}", prompt.sheet, d.address())?;
        writeln!(self.writer, "    base : {}", Self::describe(&d.base))?;
        writeln!(self.writer, "    file1: {}", Self::describe(&d.side1))?;
        writeln!(self.writer, "    file2: {}", Self::describe(&d.side2))?;
        self.writer.flush()?;
        Ok(())
    }

    fn invalid(&mut self, _prompt: &ConflictPrompt<'_>, _token: &str) -> Result<()> {
        writeln!(self.writer, "Please type [1 , 2 , b]")?;
        self.writer.flush()?;
        Ok(())
    }

    fn next_token(&mut self, _prompt: &ConflictPrompt<'_>) -> Result<Option<String>> {
        // Undecodable bytes become an unrecognized answer, not a read failure
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&line);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Answers from a fixed list of tokens, for scripted runs and tests
///
/// Records which conflicts were announced and which tokens were rejected.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    tokens: VecDeque<String>,
    prompted: Vec<(usize, usize)>,
    rejected: Vec<(usize, String)>,
}

impl ScriptedSource {
    /// Create a source that hands out `tokens` in order
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            prompted: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// `(ordinal, total)` of every prompt issued
    pub fn prompted(&self) -> &[(usize, usize)] {
        &self.prompted
    }

    /// `(ordinal, token)` of every rejected answer
    pub fn rejected(&self) -> &[(usize, String)] {
        &self.rejected
    }
}

impl DecisionSource for ScriptedSource {
    fn prompt(&mut self, prompt: &ConflictPrompt<'_>) -> Result<()> {
        self.prompted.push((prompt.ordinal, prompt.total));
        Ok(())
    }

    fn invalid(&mut self, prompt: &ConflictPrompt<'_>, token: &str) -> Result<()> {
        self.rejected.push((prompt.ordinal, token.to_string()));
        Ok(())
    }

    fn next_token(&mut self, _prompt: &ConflictPrompt<'_>) -> Result<Option<String>> {
        Ok(self.tokens.pop_front())
    }
}

/// Answers every conflict the same way
#[derive(Debug, Clone, Copy)]
pub struct FixedSource {
    resolution: Resolution,
}

impl FixedSource {
    /// Create a source that always answers `resolution`
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }
}

impl DecisionSource for FixedSource {
    fn next_token(&mut self, _prompt: &ConflictPrompt<'_>) -> Result<Option<String>> {
        Ok(Some(self.resolution.token().to_string()))
    }
}
