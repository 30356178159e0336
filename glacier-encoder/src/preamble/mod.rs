// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod sequences;
mod template;

pub use sequences::SequencePreambleContributor;
pub use template::{TemplateLoader, TemplateSource};

use crate::{ast, errors::EncodingResult, sink::PreambleSink};
use fir::{Sort, SortDecl};

/// One contributed block of preamble text: a human-readable origin tag
/// and the raw lines. Blocks are concatenated preserving discovery
/// order, which keeps prover input reproducible and diffable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreambleBlock {
    pub origin: String,
    pub lines: Vec<String>,
}

impl PreambleBlock {
    pub fn new<S: Into<String>>(origin: S, lines: Vec<String>) -> Self {
        PreambleBlock {
            origin: origin.into(),
            lines,
        }
    }
}

/// A contributor of one parametric background theory.
///
/// Lifecycle: [`reset`](Self::reset) clears accumulated state and is
/// idempotent; [`analyze`](Self::analyze) performs a single pass over the
/// program and must be called exactly once per program before any
/// accessor is read; [`start`](Self::start)/[`stop`](Self::stop) are
/// reserved for contributors holding external resources. Accessors are
/// pure given the last `analyze` call.
pub trait PreambleContributor {
    fn reset(&mut self);

    fn start(&mut self) {}

    fn stop(&mut self) {}

    fn analyze(&mut self, program: &ast::Program) -> EncodingResult<()>;

    /// The discovered concrete sorts, in first-seen order.
    fn sorts(&self) -> &[Sort];

    fn declare_sorts<S: PreambleSink>(&self, sink: &mut S) {
        for sort in self.sorts() {
            sink.declare(&SortDecl::new(sort.clone()));
        }
    }

    /// The function-symbol declaration blocks of the discovered sorts.
    fn symbol_declarations(&self) -> EncodingResult<Vec<PreambleBlock>>;

    fn declare_symbols<S: PreambleSink>(&self, sink: &mut S) -> EncodingResult<()> {
        emit_blocks(self.symbol_declarations()?, sink);
        Ok(())
    }

    /// The axiom blocks of the discovered sorts.
    fn axioms(&self) -> EncodingResult<Vec<PreambleBlock>>;

    fn emit_axioms<S: PreambleSink>(&self, sink: &mut S) -> EncodingResult<()> {
        emit_blocks(self.axioms()?, sink);
        Ok(())
    }
}

fn emit_blocks<S: PreambleSink>(blocks: Vec<PreambleBlock>, sink: &mut S) {
    for block in blocks {
        sink.comment(&block.origin);
        sink.emit(&block.lines);
    }
}
