// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! End-to-end tests of the function axiomatization flow: a driver
//! advances a `FunctionAxiomatizer` through both phases with hand-built
//! branch recorders and a structural expression translator, then checks
//! the derived axioms.

use fir::{Expr as Term, LocalVar, Sort};
use glacier_common::utils::NameService;
use glacier_encoder::{
    ast::{self, BinOp, Expr, Field, FunctionDecl, Position, Predicate, Program, Type, VarDecl},
    errors::{EncodingErrorKind, EncodingResult},
    functions::{
        emit_function_theory, FunctionAxiomatizer, FunctionRecorder, Phase, PredicateInstance,
        RecursiveCallSite,
    },
    sink::PreambleSink,
    symbols::{SymbolService, Symbols},
    translator::{lookup_recorded_value, ExpressionTranslator},
};

/// Translates assertions structurally: formals become the fresh
/// prover-level formals, heap accesses and recursive applications are
/// looked up in the recorded value mappings.
struct StructuralTranslator;

impl StructuralTranslator {
    fn translate(
        &self,
        program: &Program,
        expr: &Expr,
        axiomatizer: &FunctionAxiomatizer,
    ) -> EncodingResult<Term> {
        let symbols = Symbols::new();
        let function = &axiomatizer.function().name;
        match &expr.kind {
            ast::ExprKind::Local(name) => axiomatizer
                .formal(name)
                .cloned()
                .map(Term::local)
                .ok_or_else(|| {
                    glacier_encoder::errors::EncodingError::internal(format!(
                        "unknown formal {name} in function {function}"
                    ))
                }),
            ast::ExprKind::Result => Ok(Term::local(LocalVar::new(
                "__result",
                symbols.sort(&axiomatizer.function().return_type)?,
            ))),
            ast::ExprKind::IntConst(value) => Ok((*value).into()),
            ast::ExprKind::BoolConst(value) => Ok((*value).into()),
            ast::ExprKind::FieldAccess(..) => lookup_recorded_value(
                axiomatizer.location_values(),
                expr,
                &symbols.sort(&expr.typ)?,
                function,
            )
            .cloned(),
            ast::ExprKind::FuncApp(name, _) if name == function => lookup_recorded_value(
                axiomatizer.application_values(),
                expr,
                &symbols.sort(&expr.typ)?,
                function,
            )
            .cloned(),
            ast::ExprKind::FuncApp(name, args) => {
                let translated = args
                    .iter()
                    .map(|arg| self.translate(program, arg, axiomatizer))
                    .collect::<EncodingResult<Vec<_>>>()?;
                Ok(Term::func_app(
                    name.clone(),
                    translated,
                    symbols.sort(&expr.typ)?,
                ))
            }
            ast::ExprKind::Unary(op, operand) => {
                let operand = self.translate(program, operand, axiomatizer)?;
                let kind = match op {
                    ast::UnOp::Not => fir::UnaryOpKind::Not,
                    ast::UnOp::Neg => fir::UnaryOpKind::Minus,
                };
                Ok(Term::UnaryOp(kind, Box::new(operand)))
            }
            ast::ExprKind::Binary(op, left, right) => {
                let left = self.translate(program, left, axiomatizer)?;
                let right = self.translate(program, right, axiomatizer)?;
                let kind = match op {
                    BinOp::Eq => fir::BinOpKind::EqCmp,
                    BinOp::Ne => fir::BinOpKind::NeCmp,
                    BinOp::Gt => fir::BinOpKind::GtCmp,
                    BinOp::Ge => fir::BinOpKind::GeCmp,
                    BinOp::Lt => fir::BinOpKind::LtCmp,
                    BinOp::Le => fir::BinOpKind::LeCmp,
                    BinOp::Add => fir::BinOpKind::Add,
                    BinOp::Sub => fir::BinOpKind::Sub,
                    BinOp::Mul => fir::BinOpKind::Mul,
                    BinOp::Div => fir::BinOpKind::Div,
                    BinOp::Mod => fir::BinOpKind::Mod,
                    BinOp::And => fir::BinOpKind::And,
                    BinOp::Or => fir::BinOpKind::Or,
                    BinOp::Implies => fir::BinOpKind::Implies,
                };
                Ok(Term::BinOp(kind, Box::new(left), Box::new(right)))
            }
            ast::ExprKind::Unfolding(_, _, body) => self.translate(program, body, axiomatizer),
            ast::ExprKind::Cond(guard, then_expr, else_expr) => Ok(Term::cond(
                self.translate(program, guard, axiomatizer)?,
                self.translate(program, then_expr, axiomatizer)?,
                self.translate(program, else_expr, axiomatizer)?,
            )),
            ast::ExprKind::Forall(..) => Err(
                glacier_encoder::errors::EncodingError::unsupported(
                    "quantified source assertion in structural translation",
                ),
            ),
        }
    }
}

impl ExpressionTranslator for StructuralTranslator {
    fn translate_assertions(
        &self,
        program: &Program,
        assertions: &[Expr],
        axiomatizer: &FunctionAxiomatizer,
    ) -> EncodingResult<Vec<Term>> {
        assertions
            .iter()
            .map(|assertion| self.translate(program, assertion, axiomatizer))
            .collect()
    }

    fn translate_body(
        &self,
        program: &Program,
        axiomatizer: &FunctionAxiomatizer,
    ) -> EncodingResult<Option<Term>> {
        match &axiomatizer.function().body {
            None => Ok(None),
            Some(body) => self.translate(program, body, axiomatizer).map(Some),
        }
    }
}

fn xs() -> Expr {
    Expr::local("xs", Type::Ref)
}

fn val_access() -> Expr {
    Expr::field_access(xs(), "val", Type::Int)
}

fn next_access() -> Expr {
    Expr::field_access(xs(), "next", Type::Ref)
}

fn recursive_call() -> Expr {
    Expr::func_app("len", vec![next_access()], Type::Int)
}

/// `function len(xs: Ref): Int` over a linked list, with a recursive
/// call nested in the `List` predicate-unfold scope.
fn list_program() -> Program {
    let body = Expr::unfolding(
        "List",
        vec![xs()],
        Expr::cond(
            Expr::binary(BinOp::Eq, val_access(), Expr::int(0), Type::Bool),
            Expr::int(0),
            Expr::binary(BinOp::Add, Expr::int(1), recursive_call(), Type::Int),
        ),
    );
    Program {
        name: "lists".to_string(),
        functions: vec![FunctionDecl {
            name: "len".to_string(),
            formal_args: vec![VarDecl::new("xs", Type::Ref)],
            return_type: Type::Int,
            pres: vec![Expr::bool(true)],
            posts: vec![Expr::binary(
                BinOp::Ge,
                Expr::result(Type::Int),
                Expr::int(0),
                Type::Bool,
            )],
            body: Some(body),
            pos: Position::new(10, 1, 1),
        }],
        predicates: vec![Predicate {
            name: "List".to_string(),
            formal_args: vec![VarDecl::new("xs", Type::Ref)],
        }],
        fields: vec![
            Field::new("val", Type::Int),
            Field::new("next", Type::Ref),
        ],
    }
}

struct Fixture {
    program: Program,
    names: NameService,
    symbols: Symbols,
    translator: StructuralTranslator,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            program: list_program(),
            names: NameService::new(),
            symbols: Symbols::new(),
            translator: StructuralTranslator,
        }
    }

    fn axiomatizer(&self) -> FunctionAxiomatizer {
        FunctionAxiomatizer::new(
            self.program.function("len").unwrap(),
            1,
            &[Field::new("val", Type::Int)],
            &self.program,
            &self.symbols,
            &self.translator,
            &self.names,
        )
        .unwrap()
    }

    /// A recorder covering the heap accesses of `len`'s body.
    fn branch_recorder(&self, axiomatizer: &FunctionAxiomatizer) -> FunctionRecorder {
        let snapshot: Term = axiomatizer.snapshot_formal().clone().into();
        let xs_formal: Term = axiomatizer.formal("xs").unwrap().clone().into();
        let mut recorder = FunctionRecorder::new();
        recorder.record_location(
            val_access(),
            Term::func_app(
                "lookup$val",
                vec![snapshot.clone(), xs_formal.clone()],
                Sort::Int,
            ),
        );
        recorder.record_location(
            next_access(),
            Term::func_app(
                "lookup$next",
                vec![snapshot.clone(), xs_formal.clone()],
                Sort::Ref,
            ),
        );
        recorder.record_application(
            recursive_call(),
            Term::func_app(
                "len$limited",
                vec![
                    Term::func_app("snap$List$next", vec![snapshot.clone()], Sort::Snap),
                    Term::func_app("lookup$next", vec![snapshot.clone(), xs_formal.clone()], Sort::Ref),
                ],
                Sort::Int,
            ),
        );
        recorder.record_recursive_call(RecursiveCallSite {
            call: recursive_call(),
            args: vec![Term::func_app(
                "lookup$next",
                vec![snapshot.clone(), xs_formal.clone()],
                Sort::Ref,
            )],
            enclosing_predicate: Some(PredicateInstance {
                predicate: "List".to_string(),
                snapshot: Term::func_app("snap$List", vec![snapshot], Sort::Snap),
                args: vec![xs_formal],
            }),
        });
        recorder
    }
}

#[test]
fn post_axiom_is_triggered_on_the_limited_application() {
    let fixture = Fixture::new();
    let mut axiomatizer = fixture.axiomatizer();
    axiomatizer.advance_phase(&[fixture.branch_recorder(&axiomatizer)]);
    assert_eq!(axiomatizer.phase(), Phase::WellDefinedness);

    let post_axiom = axiomatizer.post_axiom().expect("len has a postcondition");
    let Term::ForAll(vars, triggers, body) = post_axiom else {
        panic!("post axiom is not a quantifier");
    };
    // args then snapshot are bound.
    assert_eq!(vars.len(), 2);
    assert_eq!(triggers.len(), 1);
    assert_eq!(
        triggers[0].terms(),
        &[axiomatizer.heap_functions().limited_application()]
    );
    // The result variable is let-bound to the limited application.
    assert!(body.to_string().contains("let __result"));
    assert!(axiomatizer.take_translation_errors().is_empty());
}

#[test]
fn definitional_axiom_carries_predicate_triggers() {
    let fixture = Fixture::new();
    let mut axiomatizer = fixture.axiomatizer();
    let recorder = fixture.branch_recorder(&axiomatizer);
    axiomatizer.advance_phase(&[recorder.clone()]);
    axiomatizer.advance_phase(&[recorder]);
    assert_eq!(axiomatizer.phase(), Phase::Verification);

    let predicate_triggers = axiomatizer.predicate_triggers().unwrap();
    assert_eq!(predicate_triggers.len(), 1);
    assert!(predicate_triggers[0].to_string().starts_with("List$trigger("));

    let axiom = axiomatizer
        .definitional_axiom()
        .unwrap()
        .expect("len has a translatable body");
    let Term::ForAll(_, triggers, body) = axiom else {
        panic!("definitional axiom is not a quantifier");
    };
    // The full application, plus one alternative pattern per recorded
    // predicate pairing the stateless anchor with the predicate trigger.
    assert_eq!(triggers.len(), 2);
    assert_eq!(
        triggers[0].terms(),
        &[axiomatizer.heap_functions().full_application()]
    );
    assert_eq!(triggers[1].terms().len(), 2);
    assert_eq!(
        triggers[1].terms()[0],
        axiomatizer.heap_functions().stateless_application()
    );
    // The axiom equates the full application with the translated body.
    let full_app = axiomatizer.heap_functions().full_application().to_string();
    assert!(body.to_string().contains(&format!("({full_app}) == ")));
}

#[test]
fn merging_multiple_branch_recorders_is_one_merge_point() {
    let fixture = Fixture::new();
    let mut axiomatizer = fixture.axiomatizer();
    let full = fixture.branch_recorder(&axiomatizer);
    // Split the recording across two branches plus a neutral one.
    let mut left = FunctionRecorder::new();
    left.record_location(
        val_access(),
        full.location_values().get(&val_access()).unwrap().clone(),
    );
    let mut right = FunctionRecorder::new();
    right.record_location(
        next_access(),
        full.location_values().get(&next_access()).unwrap().clone(),
    );
    right.record_application(
        recursive_call(),
        full.application_values()
            .get(&recursive_call())
            .unwrap()
            .clone(),
    );
    right.record_recursive_call(full.recursive_calls()[0].clone());
    axiomatizer.advance_phase(&[left, FunctionRecorder::new(), right]);

    assert_eq!(axiomatizer.location_values().len(), 2);
    assert_eq!(axiomatizer.application_values().len(), 1);
    // Preconditions translate against the merged mapping.
    assert_eq!(axiomatizer.translated_pres().len(), 1);
}

#[test]
fn function_without_recursion_has_a_single_trigger() {
    let names = NameService::new();
    let symbols = Symbols::new();
    let translator = StructuralTranslator;
    let program = Program {
        name: "plain".to_string(),
        functions: vec![FunctionDecl {
            name: "get".to_string(),
            formal_args: vec![VarDecl::new("xs", Type::Ref)],
            return_type: Type::Int,
            pres: vec![],
            posts: vec![],
            body: Some(val_access()),
            pos: Position::default(),
        }],
        predicates: vec![],
        fields: vec![Field::new("val", Type::Int)],
    };
    let mut axiomatizer = FunctionAxiomatizer::new(
        program.function("get").unwrap(),
        0,
        &[],
        &program,
        &symbols,
        &translator,
        &names,
    )
    .unwrap();

    let mut recorder = FunctionRecorder::new();
    recorder.record_location(
        val_access(),
        Term::func_app(
            "lookup$val",
            vec![
                axiomatizer.snapshot_formal().clone().into(),
                axiomatizer.formal("xs").unwrap().clone().into(),
            ],
            Sort::Int,
        ),
    );
    axiomatizer.advance_phase(&[recorder.clone()]);
    // No postcondition: no well-definedness axiom.
    assert_eq!(axiomatizer.post_axiom(), None);
    axiomatizer.advance_phase(&[recorder]);

    assert!(axiomatizer.predicate_triggers().unwrap().is_empty());
    let axiom = axiomatizer.definitional_axiom().unwrap().unwrap();
    let Term::ForAll(_, triggers, _) = axiom else {
        panic!("definitional axiom is not a quantifier");
    };
    assert_eq!(triggers.len(), 1);
}

#[test]
fn untranslatable_body_yields_no_definitional_axiom_but_keeps_the_post_axiom() {
    let fixture = Fixture::new();
    let mut axiomatizer = fixture.axiomatizer();
    // Record nothing: the body's heap accesses miss their lookups, but
    // the postcondition (which needs no heap) still translates.
    axiomatizer.advance_phase(&[]);
    let post_axiom = axiomatizer.post_axiom();
    assert!(post_axiom.is_some());
    axiomatizer.advance_phase(&[]);

    assert_eq!(axiomatizer.definitional_axiom().unwrap(), None);
    let errors = axiomatizer.take_translation_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].kind(), EncodingErrorKind::Internal(_)));
}

#[test]
fn abstract_function_yields_no_definitional_axiom_and_no_error() {
    let names = NameService::new();
    let symbols = Symbols::new();
    let translator = StructuralTranslator;
    let program = Program {
        name: "abstract".to_string(),
        functions: vec![FunctionDecl {
            name: "cap".to_string(),
            formal_args: vec![],
            return_type: Type::Int,
            pres: vec![],
            posts: vec![],
            body: None,
            pos: Position::default(),
        }],
        predicates: vec![],
        fields: vec![],
    };
    let mut axiomatizer = FunctionAxiomatizer::new(
        program.function("cap").unwrap(),
        0,
        &[],
        &program,
        &symbols,
        &translator,
        &names,
    )
    .unwrap();
    axiomatizer.advance_phase(&[]);
    axiomatizer.advance_phase(&[]);
    assert_eq!(axiomatizer.definitional_axiom().unwrap(), None);
    assert!(axiomatizer.take_translation_errors().is_empty());
}

#[test]
#[should_panic(expected = "before the well-definedness phase")]
fn phase_one_accessor_at_phase_zero_panics() {
    let fixture = Fixture::new();
    let axiomatizer = fixture.axiomatizer();
    let _ = axiomatizer.translated_pres();
}

#[test]
#[should_panic(expected = "well-definedness phase accessor")]
fn post_axiom_outside_phase_one_panics() {
    let fixture = Fixture::new();
    let mut axiomatizer = fixture.axiomatizer();
    let recorder = fixture.branch_recorder(&axiomatizer);
    axiomatizer.advance_phase(&[recorder.clone()]);
    axiomatizer.advance_phase(&[recorder]);
    let _ = axiomatizer.post_axiom();
}

#[test]
#[should_panic(expected = "already at the verification phase")]
fn advancing_past_the_verification_phase_panics() {
    let fixture = Fixture::new();
    let mut axiomatizer = fixture.axiomatizer();
    axiomatizer.advance_phase(&[]);
    axiomatizer.advance_phase(&[]);
    axiomatizer.advance_phase(&[]);
}

/// A sink recording what was emitted, for order assertions.
#[derive(Default)]
struct RecordingSink {
    events: Vec<String>,
}

impl PreambleSink for RecordingSink {
    fn comment(&mut self, text: &str) {
        self.events.push(format!("comment: {text}"));
    }

    fn declare(&mut self, decl: &fir::SortDecl) {
        self.events.push(format!("declare: {decl}"));
    }

    fn emit(&mut self, lines: &[String]) {
        for line in lines {
            self.events.push(format!("emit: {line}"));
        }
    }
}

#[test]
fn theory_is_emitted_once_with_symbols_before_axioms() {
    let fixture = Fixture::new();
    let mut axiomatizer = fixture.axiomatizer();
    let recorder = fixture.branch_recorder(&axiomatizer);
    axiomatizer.advance_phase(&[recorder.clone()]);
    axiomatizer.advance_phase(&[recorder]);

    let mut sink = RecordingSink::default();
    emit_function_theory(&axiomatizer, &mut sink).unwrap();

    let first_axiom = sink
        .events
        .iter()
        .position(|event| event.contains("axiom "))
        .unwrap();
    let last_declaration = sink
        .events
        .iter()
        .rposition(|event| event.contains("function len"))
        .unwrap();
    assert!(last_declaration < first_axiom);
    assert!(sink.events[0].starts_with("comment: function len"));
    // All four axioms of `len` are present.
    for axiom in [
        "len$limitedAxiom",
        "len$statelessAxiom",
        "len$postAxiom",
        "len$definitionalAxiom",
    ] {
        assert_eq!(
            sink.events
                .iter()
                .filter(|event| event.contains(axiom))
                .count(),
            1,
            "{axiom} emitted exactly once"
        );
    }
}

#[test]
#[should_panic(expected = "emitted twice")]
fn emitting_a_function_theory_twice_panics() {
    let fixture = Fixture::new();
    let mut axiomatizer = fixture.axiomatizer();
    axiomatizer.advance_phase(&[]);
    axiomatizer.advance_phase(&[]);
    let mut sink = RecordingSink::default();
    emit_function_theory(&axiomatizer, &mut sink).unwrap();
    let _ = emit_function_theory(&axiomatizer, &mut sink);
}
