// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    ast,
    errors::EncodingResult,
    preamble::{PreambleBlock, PreambleContributor, TemplateSource},
    symbols::SymbolService,
};
use fir::Sort;
use glacier_common::utils::{InsertionOrderedSet, NameService};
use log::debug;

/// Contributes the sequence background theory: one declaration and one
/// axiom block per concrete sequence sort occurring in the program, plus
/// an integer-specialized tier if and only if `Seq[Int]` occurs.
///
/// Instantiations still carrying type parameters are skipped here; they
/// are the responsibility of the generic-domain encoder.
pub struct SequencePreambleContributor<'p> {
    symbols: &'p dyn SymbolService,
    templates: &'p dyn TemplateSource,
    discovered: InsertionOrderedSet<Sort>,
    analyzed: bool,
}

impl<'p> SequencePreambleContributor<'p> {
    pub fn new(symbols: &'p dyn SymbolService, templates: &'p dyn TemplateSource) -> Self {
        SequencePreambleContributor {
            symbols,
            templates,
            discovered: InsertionOrderedSet::new(),
            analyzed: false,
        }
    }

    /// The substitution applied to the generic templates for one
    /// discovered sequence sort.
    fn element_substitution(sort: &Sort) -> [(String, String); 2] {
        let element = match sort {
            Sort::Seq(element) => element,
            _ => unreachable!("discovered sort {sort} is not a sequence"),
        };
        [
            ("S".to_string(), element.template_name()),
            ("SNAME".to_string(), NameService::sanitize(&element.template_name())),
        ]
    }

    fn instantiate(
        &self,
        template: &str,
        sort: &Sort,
    ) -> EncodingResult<PreambleBlock> {
        let substitution = Self::element_substitution(sort);
        let pairs: Vec<(&str, &str)> = substitution
            .iter()
            .map(|(placeholder, replacement)| (placeholder.as_str(), replacement.as_str()))
            .collect();
        let lines = self.templates.read(template, &pairs)?;
        Ok(PreambleBlock::new(
            format!("{template} [{sort}]"),
            lines,
        ))
    }

    fn has_int_sequences(&self) -> bool {
        self.discovered.contains(&Sort::seq(Sort::Int))
    }

    fn assert_analyzed(&self) {
        assert!(
            self.analyzed,
            "sequence preamble accessor read before analyze"
        );
    }
}

impl<'p> PreambleContributor for SequencePreambleContributor<'p> {
    fn reset(&mut self) {
        self.discovered.clear();
        self.analyzed = false;
    }

    #[tracing::instrument(level = "debug", skip_all, fields(program = %program.name))]
    fn analyze(&mut self, program: &ast::Program) -> EncodingResult<()> {
        assert!(
            !self.analyzed,
            "sequence preamble analyzed twice without reset"
        );
        let mut result = Ok(());
        program.walk_types(|typ| {
            for constituent in typ.constituents() {
                if constituent.is_seq() && constituent.is_concrete() {
                    match self.symbols.sort(constituent) {
                        Ok(sort) => {
                            if self.discovered.insert(sort) {
                                debug!("Discovered sequence sort {constituent}");
                            }
                        }
                        Err(error) => {
                            if result.is_ok() {
                                result = Err(error);
                            }
                        }
                    }
                }
            }
        });
        self.analyzed = true;
        result
    }

    fn sorts(&self) -> &[Sort] {
        self.assert_analyzed();
        self.discovered.as_slice()
    }

    fn symbol_declarations(&self) -> EncodingResult<Vec<PreambleBlock>> {
        self.assert_analyzed();
        let mut blocks = Vec::new();
        for sort in self.discovered.iter() {
            blocks.push(self.instantiate("sequences_decls", sort)?);
        }
        if self.has_int_sequences() {
            blocks.push(PreambleBlock::new(
                "sequences_int_decls",
                self.templates.read("sequences_int_decls", &[])?,
            ));
        }
        Ok(blocks)
    }

    fn axioms(&self) -> EncodingResult<Vec<PreambleBlock>> {
        self.assert_analyzed();
        let mut blocks = Vec::new();
        for sort in self.discovered.iter() {
            blocks.push(self.instantiate("sequences_axioms", sort)?);
        }
        if self.has_int_sequences() {
            blocks.push(PreambleBlock::new(
                "sequences_int_axioms",
                self.templates.read("sequences_int_axioms", &[])?,
            ));
        }
        Ok(blocks)
    }
}
