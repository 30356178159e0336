// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    ast,
    errors::{EncodingError, EncodingResult},
    functions::{
        heap_functions::HeapFunctionSymbols,
        recorder::{
            FunctionRecorder, InverseFunction, RecursiveCallSite, Representative, SummaryFunction,
        },
    },
    symbols::SymbolService,
    translator::ExpressionTranslator,
};
use fir::{Expr, ExprIterator, FuncDecl, LocalVar, Sort, Trigger};
use glacier_common::utils::{InsertionOrderedMap, InsertionOrderedSet, NameService};
use log::debug;
use once_cell::unsync::OnceCell;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};

/// The translation phases of one function. Phases advance one at a
/// time; reading a phase's results before it is reached is a defect of
/// the driving caller, not of the program under verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Not yet analyzed.
    Unanalysed,
    /// Well-definedness phase results available.
    WellDefinedness,
    /// Verification phase results available.
    Verification,
}

impl Phase {
    fn next(self) -> Phase {
        match self {
            Phase::Unanalysed => Phase::WellDefinedness,
            Phase::WellDefinedness => Phase::Verification,
            Phase::Verification => panic!("no phase after verification"),
        }
    }
}

/// Mints the heap-summary functions of one quantified field: the value
/// function over a region and the matching region-membership function.
/// The execution engine attaches the membership axiom it derives.
#[derive(Debug, Clone)]
pub struct SummaryFunctionGenerator {
    base: String,
    value_sort: Sort,
}

impl SummaryFunctionGenerator {
    pub fn fresh(&self, names: &NameService) -> (FuncDecl, FuncDecl) {
        let name = names.fresh(&self.base);
        let receiver = vec![LocalVar::new("r", Sort::Ref)];
        (
            FuncDecl::new(name.clone(), receiver.clone(), self.value_sort.clone()),
            FuncDecl::new(format!("{name}$domain"), receiver, Sort::Bool),
        )
    }
}

/// Accumulates the symbolic-execution results of one heap-dependent
/// function across its execution branches and derives the function's
/// axioms: the limited-unfolding pair at construction, the
/// postcondition axiom at the well-definedness phase, and the
/// definitional axiom plus recursion triggers at the verification
/// phase.
///
/// Owned exclusively by the function-translation driver for the
/// lifetime of translating one function. The only shared state it
/// touches (program, symbol/identifier services, configuration) is
/// read-only or internally synchronized, so axiomatizers of different
/// functions are safely usable in parallel.
pub struct FunctionAxiomatizer<'p> {
    program: &'p ast::Program,
    function: &'p ast::FunctionDecl,
    height: usize,
    translator: &'p dyn ExpressionTranslator,
    symbols: &'p dyn SymbolService,

    heap_functions: HeapFunctionSymbols,
    snapshot_formal: LocalVar,
    formals: Vec<(ast::VarDecl, LocalVar)>,
    summary_generators: FxHashMap<String, SummaryFunctionGenerator>,

    phase: Phase,
    // Replaced on every phase advance.
    location_values: InsertionOrderedMap<ast::Expr, Expr>,
    application_values: InsertionOrderedMap<ast::Expr, Expr>,
    // Accumulated across phases: later axioms may reference symbols
    // discovered in the well-definedness phase.
    field_summaries: InsertionOrderedMap<String, SummaryFunction>,
    predicate_summaries: InsertionOrderedMap<String, SummaryFunction>,
    inverse_functions: InsertionOrderedSet<InverseFunction>,
    representatives: InsertionOrderedSet<Representative>,
    recursive_calls: Vec<RecursiveCallSite>,

    translated_pres: OnceCell<Vec<Expr>>,
    post_axiom: OnceCell<Option<Expr>>,
    emitted: Cell<bool>,
    errors: RefCell<Vec<EncodingError>>,
}

impl<'p> FunctionAxiomatizer<'p> {
    /// Phase 0, pure from its inputs: allocates fresh formals, derives
    /// the symbol triple and its two axioms, and prepares one summary
    /// generator per field with quantified-permission reasoning.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %function.name))]
    pub fn new(
        function: &'p ast::FunctionDecl,
        height: usize,
        quantified_fields: &[ast::Field],
        program: &'p ast::Program,
        symbols: &'p dyn SymbolService,
        translator: &'p dyn ExpressionTranslator,
        names: &'p NameService,
    ) -> EncodingResult<Self> {
        let snapshot_formal = LocalVar::new(names.fresh("s"), Sort::Snap);
        let mut formals = Vec::with_capacity(function.formal_args.len());
        for arg in &function.formal_args {
            let fresh = LocalVar::new(
                names.fresh(&NameService::sanitize(&arg.name)),
                symbols.sort(&arg.typ)?,
            );
            formals.push((arg.clone(), fresh));
        }
        let heap_functions = HeapFunctionSymbols::new(
            symbols.function_names(&function.name),
            snapshot_formal.clone(),
            formals.iter().map(|(_, fresh)| fresh.clone()).collect(),
            symbols.sort(&function.return_type)?,
        );
        let mut summary_generators = FxHashMap::default();
        for field in quantified_fields {
            summary_generators.insert(
                field.name.clone(),
                SummaryFunctionGenerator {
                    base: symbols.field_summary_base(field),
                    value_sort: symbols.sort(&field.typ)?,
                },
            );
        }
        Ok(FunctionAxiomatizer {
            program,
            function,
            height,
            translator,
            symbols,
            heap_functions,
            snapshot_formal,
            formals,
            summary_generators,
            phase: Phase::Unanalysed,
            location_values: InsertionOrderedMap::new(),
            application_values: InsertionOrderedMap::new(),
            field_summaries: InsertionOrderedMap::new(),
            predicate_summaries: InsertionOrderedMap::new(),
            inverse_functions: InsertionOrderedSet::new(),
            representatives: InsertionOrderedSet::new(),
            recursive_calls: Vec::new(),
            translated_pres: OnceCell::new(),
            post_axiom: OnceCell::new(),
            emitted: Cell::new(false),
            errors: RefCell::new(Vec::new()),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn program(&self) -> &'p ast::Program {
        self.program
    }

    pub fn function(&self) -> &'p ast::FunctionDecl {
        self.function
    }

    /// Topological height in the call graph; callers use it to order
    /// cross-function axiom emission.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn heap_functions(&self) -> &HeapFunctionSymbols {
        &self.heap_functions
    }

    pub fn snapshot_formal(&self) -> &LocalVar {
        &self.snapshot_formal
    }

    /// The fresh formal allocated for a source argument.
    pub fn formal(&self, name: &str) -> Option<&LocalVar> {
        self.formals
            .iter()
            .find(|(arg, _)| arg.name == name)
            .map(|(_, fresh)| fresh)
    }

    pub fn formals(&self) -> &[(ast::VarDecl, LocalVar)] {
        &self.formals
    }

    pub fn summary_generator(&self, field: &str) -> Option<&SummaryFunctionGenerator> {
        self.summary_generators.get(field)
    }

    pub fn location_values(&self) -> &InsertionOrderedMap<ast::Expr, Expr> {
        &self.location_values
    }

    pub fn application_values(&self) -> &InsertionOrderedMap<ast::Expr, Expr> {
        &self.application_values
    }

    /// Merge the per-branch recorders of the next phase and advance.
    /// The merged value mappings replace the current ones; the fresh
    /// symbol sets accumulate. An empty slice is the neutral recorder.
    ///
    /// Panics if the verification phase was already reached.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %self.function.name))]
    pub fn advance_phase(&mut self, recorders: &[FunctionRecorder]) {
        assert!(
            self.phase != Phase::Verification,
            "advance_phase called on function {} already at the verification phase",
            self.function.name
        );
        if self.phase == Phase::WellDefinedness {
            // The postcondition axiom is built from well-definedness
            // data; fix it before the merge replaces that data.
            self.cached_post_axiom();
        }
        let merged = recorders
            .iter()
            .cloned()
            .fold(FunctionRecorder::new(), FunctionRecorder::combine)
            .into_parts();
        self.location_values = merged.location_values;
        self.application_values = merged.application_values;
        self.field_summaries.extend_absent(merged.field_summaries);
        self.predicate_summaries
            .extend_absent(merged.predicate_summaries);
        self.inverse_functions.extend(merged.inverse_functions);
        self.representatives.extend(merged.representatives);
        self.recursive_calls.extend(merged.recursive_calls);
        self.phase = self.phase.next();
        debug!(
            "Function {} advanced to phase {:?}",
            self.function.name, self.phase
        );
    }

    /// The translated preconditions, computed on first use and fixed
    /// for the remainder of the object's lifetime (preconditions do not
    /// change between the two phases).
    ///
    /// Panics before the well-definedness phase.
    pub fn translated_pres(&self) -> &[Expr] {
        assert!(
            self.phase >= Phase::WellDefinedness,
            "preconditions of function {} requested before the well-definedness phase",
            self.function.name
        );
        self.translated_pres.get_or_init(|| {
            match self
                .translator
                .translate_assertions(self.program, &self.function.pres, self)
            {
                Ok(terms) => terms,
                Err(error) => {
                    self.errors.borrow_mut().push(error);
                    Vec::new()
                }
            }
        })
    }

    /// The well-definedness axiom: for functions with a postcondition,
    /// `forall args, snapshot :: {limited(s, args)}
    /// fresh-definitions && (pres ==> let result == limited(s, args) in posts)`.
    ///
    /// The trigger is deliberately the *limited* application so the
    /// postcondition axiom cannot itself drive runaway unfolding.
    ///
    /// Panics unless the current phase is exactly well-definedness.
    pub fn post_axiom(&self) -> Option<Expr> {
        assert!(
            self.phase == Phase::WellDefinedness,
            "post_axiom of function {} is a well-definedness phase accessor (phase is {:?})",
            self.function.name,
            self.phase
        );
        self.cached_post_axiom().clone()
    }

    pub(super) fn cached_post_axiom(&self) -> &Option<Expr> {
        self.post_axiom.get_or_init(|| self.build_post_axiom())
    }

    fn build_post_axiom(&self) -> Option<Expr> {
        if self.function.posts.is_empty() {
            return None;
        }
        let posts = match self
            .translator
            .translate_assertions(self.program, &self.function.posts, self)
        {
            Ok(terms) => terms,
            Err(error) => {
                self.errors.borrow_mut().push(error);
                return None;
            }
        };
        let limited_app = self.heap_functions.limited_application();
        let result_var = LocalVar::new("__result", self.heap_functions.full.return_sort.clone());
        let bound_posts = Expr::let_expr(
            result_var,
            limited_app.clone(),
            posts.into_iter().conjoin(),
        );
        let body = self
            .fresh_symbol_definitions()
            .chain(std::iter::once(Expr::implies(
                self.pres_conjunction(),
                bound_posts,
            )))
            .conjoin();
        Some(Expr::forall(
            self.heap_functions.quantified_formals(),
            vec![Trigger::new(vec![limited_app])],
            body,
        ))
    }

    /// One trigger application per distinct predicate whose unfold
    /// scope encloses a recursive self-call: a syntactic hook, anchored
    /// at predicate-unfold sites, for re-deriving the definitional
    /// axiom exactly where a recursive unfolding makes it relevant.
    ///
    /// Panics before the verification phase.
    pub fn predicate_triggers(&self) -> EncodingResult<Vec<Expr>> {
        assert!(
            self.phase == Phase::Verification,
            "predicate triggers of function {} requested before the verification phase",
            self.function.name
        );
        let mut seen = InsertionOrderedSet::new();
        let mut triggers = Vec::new();
        for site in &self.recursive_calls {
            let Some(instance) = &site.enclosing_predicate else {
                continue;
            };
            if !seen.insert(instance.predicate.clone()) {
                continue;
            }
            let predicate = self.program.predicate(&instance.predicate).ok_or_else(|| {
                EncodingError::internal(format!(
                    "recursive call in function {} recorded under unknown predicate {}",
                    self.function.name, instance.predicate
                ))
            })?;
            let trigger_function = self.symbols.predicate_trigger_function(predicate)?;
            let mut args = vec![instance.snapshot.clone()];
            args.extend(instance.args.iter().cloned());
            triggers.push(trigger_function.apply(args));
        }
        Ok(triggers)
    }

    /// The definitional axiom: for functions whose body translates to a
    /// term, `forall args, snapshot :: {full(s, args)}
    /// {stateless(args), predicate-trigger}...
    /// fresh-definitions && (pres ==> full(s, args) == body)`.
    ///
    /// `Ok(None)` when the body does not translate — either because the
    /// function is abstract, or because translation failed, in which
    /// case the failure is accumulated on this axiomatizer.
    ///
    /// Panics unless the current phase is exactly verification.
    pub fn definitional_axiom(&self) -> EncodingResult<Option<Expr>> {
        assert!(
            self.phase == Phase::Verification,
            "definitional axiom of function {} is a verification phase accessor (phase is {:?})",
            self.function.name,
            self.phase
        );
        let body = match self.translator.translate_body(self.program, self) {
            Ok(Some(body)) => body,
            Ok(None) => return Ok(None),
            Err(error) => {
                self.errors.borrow_mut().push(error);
                return Ok(None);
            }
        };
        let full_app = self.heap_functions.full_application();
        let content = self
            .fresh_symbol_definitions()
            .chain(std::iter::once(Expr::implies(
                self.pres_conjunction(),
                Expr::eq_cmp(full_app.clone(), body),
            )))
            .conjoin();
        let mut triggers = vec![Trigger::new(vec![full_app])];
        let stateless_app = self.heap_functions.stateless_application();
        for predicate_trigger in self.predicate_triggers()? {
            triggers.push(Trigger::new(vec![
                stateless_app.clone(),
                predicate_trigger,
            ]));
        }
        Ok(Some(Expr::forall(
            self.heap_functions.quantified_formals(),
            triggers,
            content,
        )))
    }

    /// The declarations of all fresh symbols introduced so far, in
    /// discovery order.
    pub fn fresh_symbol_declarations(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for summary in self
            .field_summaries
            .values()
            .chain(self.predicate_summaries.values())
        {
            lines.push(summary.decl.to_string());
            lines.push(summary.domain_decl.to_string());
        }
        for inverse in self.inverse_functions.iter() {
            lines.push(inverse.decl.to_string());
        }
        for representative in self.representatives.iter() {
            lines.push(format!(
                "function {}(): {}",
                representative.var.name, representative.var.sort
            ));
        }
        lines
    }

    /// Conjunction-ready definitional axioms of all fresh symbols
    /// introduced so far: summary membership axioms, inverse-function
    /// axioms, representative constraints.
    fn fresh_symbol_definitions(&self) -> impl Iterator<Item = Expr> + '_ {
        self.field_summaries
            .values()
            .chain(self.predicate_summaries.values())
            .map(|summary| summary.membership_axiom.clone())
            .chain(
                self.inverse_functions
                    .iter()
                    .map(|inverse| inverse.axiom.clone()),
            )
            .chain(
                self.representatives
                    .iter()
                    .map(|representative| representative.constraint.clone()),
            )
    }

    fn pres_conjunction(&self) -> Expr {
        self.translated_pres().iter().cloned().conjoin()
    }

    pub(super) fn mark_emitted(&self) {
        assert!(
            !self.emitted.get(),
            "theory of function {} emitted twice",
            self.function.name
        );
        self.emitted.set(true);
    }

    /// Drain the translation failures accumulated so far. Failures are
    /// collected rather than thrown so that independent errors across
    /// one function can be reported together.
    pub fn take_translation_errors(&mut self) -> Vec<EncodingError> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}
