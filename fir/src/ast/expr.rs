// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{domain::DomainFunc, LocalVar, Sort};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Expr {
    /// A bound or formal variable.
    Local(LocalVar),
    Const(Const),
    UnaryOp(UnaryOpKind, Box<Expr>),
    BinOp(BinOpKind, Box<Expr>, Box<Expr>),
    /// Operation on a built-in sequence value.
    ContainerOp(ContainerOpKind, Box<Expr>, Box<Expr>),
    /// Cond: guard, then, else.
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
    /// Application of a heap-dependent function symbol: name, args, return sort.
    FuncApp(String, Vec<Expr>, Sort),
    /// Application of a domain function.
    DomainFuncApp(DomainFunc, Vec<Expr>),
    /// ForAll: variables, triggers, body.
    ForAll(Vec<LocalVar>, Vec<Trigger>, Box<Expr>),
    /// Exists: variables, triggers, body.
    Exists(Vec<LocalVar>, Vec<Trigger>, Box<Expr>),
    /// let variable == (expr) in body. The binding is part of the term and
    /// survives serialization; it is not a generator-internal shorthand.
    LetExpr(LocalVar, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Const {
    Bool(bool),
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum UnaryOpKind {
    Not,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BinOpKind {
    EqCmp,
    NeCmp,
    GtCmp,
    GeCmp,
    LtCmp,
    LeCmp,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Implies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ContainerOpKind {
    SeqIndex,
    SeqConcat,
    SeqLen,
}

/// A syntactic instantiation pattern attached to a quantifier. Several
/// triggers on one quantifier are alternative patterns, any of which may
/// fire the instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Trigger(Vec<Expr>);

impl Trigger {
    pub fn new(terms: Vec<Expr>) -> Self {
        Trigger(terms)
    }

    pub fn terms(&self) -> &[Expr] {
        &self.0
    }
}

impl Expr {
    pub fn local(var: LocalVar) -> Self {
        Expr::Local(var)
    }

    pub fn not(expr: Expr) -> Self {
        Expr::UnaryOp(UnaryOpKind::Not, Box::new(expr))
    }

    pub fn eq_cmp(left: Expr, right: Expr) -> Self {
        Expr::BinOp(BinOpKind::EqCmp, Box::new(left), Box::new(right))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::BinOp(BinOpKind::And, Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::BinOp(BinOpKind::Or, Box::new(left), Box::new(right))
    }

    pub fn implies(left: Expr, right: Expr) -> Self {
        Expr::BinOp(BinOpKind::Implies, Box::new(left), Box::new(right))
    }

    pub fn cond(guard: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        Expr::Cond(Box::new(guard), Box::new(then_expr), Box::new(else_expr))
    }

    pub fn func_app<S: Into<String>>(name: S, args: Vec<Expr>, return_sort: Sort) -> Self {
        Expr::FuncApp(name.into(), args, return_sort)
    }

    pub fn domain_func_app(func: DomainFunc, args: Vec<Expr>) -> Self {
        Expr::DomainFuncApp(func, args)
    }

    pub fn forall(vars: Vec<LocalVar>, triggers: Vec<Trigger>, body: Expr) -> Self {
        Expr::ForAll(vars, triggers, Box::new(body))
    }

    pub fn exists(vars: Vec<LocalVar>, triggers: Vec<Trigger>, body: Expr) -> Self {
        Expr::Exists(vars, triggers, Box::new(body))
    }

    pub fn let_expr(var: LocalVar, def: Expr, body: Expr) -> Self {
        Expr::LetExpr(var, Box::new(def), Box::new(body))
    }

    pub fn seq_index(seq: Expr, index: Expr) -> Self {
        Expr::ContainerOp(ContainerOpKind::SeqIndex, Box::new(seq), Box::new(index))
    }

    pub fn seq_len(seq: Expr) -> Self {
        Expr::ContainerOp(ContainerOpKind::SeqLen, Box::new(seq.clone()), Box::new(seq))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Expr::Const(Const::Bool(true)))
    }

    /// The sort of this term, when it can be computed without a typing
    /// environment. Comparisons and connectives are `Bool`; applications
    /// carry their return sort.
    pub fn sort(&self) -> Option<Sort> {
        match self {
            Expr::Local(var) => Some(var.sort.clone()),
            Expr::Const(Const::Bool(_)) => Some(Sort::Bool),
            Expr::Const(Const::Int(_)) => Some(Sort::Int),
            Expr::UnaryOp(UnaryOpKind::Not, _) => Some(Sort::Bool),
            Expr::UnaryOp(UnaryOpKind::Minus, _) => Some(Sort::Int),
            Expr::BinOp(kind, left, _) => match kind {
                BinOpKind::EqCmp
                | BinOpKind::NeCmp
                | BinOpKind::GtCmp
                | BinOpKind::GeCmp
                | BinOpKind::LtCmp
                | BinOpKind::LeCmp
                | BinOpKind::And
                | BinOpKind::Or
                | BinOpKind::Implies => Some(Sort::Bool),
                BinOpKind::Add | BinOpKind::Sub | BinOpKind::Mul | BinOpKind::Div
                | BinOpKind::Mod => left.sort(),
            },
            Expr::ContainerOp(ContainerOpKind::SeqLen, _, _) => Some(Sort::Int),
            Expr::ContainerOp(ContainerOpKind::SeqConcat, left, _) => left.sort(),
            Expr::ContainerOp(ContainerOpKind::SeqIndex, seq, _) => match seq.sort() {
                Some(Sort::Seq(elem)) => Some(*elem),
                _ => None,
            },
            Expr::Cond(_, then_expr, _) => then_expr.sort(),
            Expr::FuncApp(_, _, return_sort) => Some(return_sort.clone()),
            Expr::DomainFuncApp(func, _) => Some(func.return_sort.clone()),
            Expr::ForAll(..) | Expr::Exists(..) => Some(Sort::Bool),
            Expr::LetExpr(_, _, body) => body.sort(),
        }
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Const(Const::Bool(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Const(Const::Int(value))
    }
}

impl From<LocalVar> for Expr {
    fn from(var: LocalVar) -> Self {
        Expr::Local(var)
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Const::Bool(value) => write!(f, "{value}"),
            Const::Int(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for UnaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOpKind::Not => write!(f, "!"),
            UnaryOpKind::Minus => write!(f, "-"),
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinOpKind::EqCmp => write!(f, "=="),
            BinOpKind::NeCmp => write!(f, "!="),
            BinOpKind::GtCmp => write!(f, ">"),
            BinOpKind::GeCmp => write!(f, ">="),
            BinOpKind::LtCmp => write!(f, "<"),
            BinOpKind::LeCmp => write!(f, "<="),
            BinOpKind::Add => write!(f, "+"),
            BinOpKind::Sub => write!(f, "-"),
            BinOpKind::Mul => write!(f, "*"),
            BinOpKind::Div => write!(f, "/"),
            BinOpKind::Mod => write!(f, "%"),
            BinOpKind::And => write!(f, "&&"),
            BinOpKind::Or => write!(f, "||"),
            BinOpKind::Implies => write!(f, "==>"),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{ {} }}",
            self.0
                .iter()
                .map(|term| term.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Local(var) => write!(f, "{var}"),
            Expr::Const(value) => write!(f, "{value}"),
            Expr::UnaryOp(op, expr) => write!(f, "{op}({expr})"),
            Expr::BinOp(op, left, right) => write!(f, "({left}) {op} ({right})"),
            Expr::ContainerOp(op, left, right) => match op {
                ContainerOpKind::SeqIndex => write!(f, "{left}[{right}]"),
                ContainerOpKind::SeqConcat => write!(f, "{left} ++ {right}"),
                ContainerOpKind::SeqLen => write!(f, "|{left}|"),
            },
            Expr::Cond(guard, then_expr, else_expr) => {
                write!(f, "({guard}) ? ({then_expr}) : ({else_expr})")
            }
            Expr::FuncApp(name, args, _) => write!(f, "{}({})", name, display_args(args)),
            Expr::DomainFuncApp(func, args) => {
                write!(f, "{}({})", func.name, display_args(args))
            }
            Expr::ForAll(vars, triggers, body) => write!(
                f,
                "forall {} {} :: {}",
                display_vars(vars),
                display_triggers(triggers),
                body
            ),
            Expr::Exists(vars, triggers, body) => write!(
                f,
                "exists {} {} :: {}",
                display_vars(vars),
                display_triggers(triggers),
                body
            ),
            Expr::LetExpr(var, def, body) => {
                write!(f, "(let {var:?} == ({def}) in {body})")
            }
        }
    }
}

fn display_args(args: &[Expr]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

fn display_vars(vars: &[LocalVar]) -> String {
    vars.iter()
        .map(|var| format!("{var:?}"))
        .collect::<Vec<String>>()
        .join(", ")
}

fn display_triggers(triggers: &[Trigger]) -> String {
    triggers
        .iter()
        .map(|trigger| trigger.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

/// Conjoin or disjoin a sequence of terms into a single term.
pub trait ExprIterator {
    /// Conjoin a sequence of expressions into a single expression.
    /// Returns true if the sequence has no elements.
    fn conjoin(&mut self) -> Expr;

    /// Disjoin a sequence of expressions into a single expression.
    /// Returns false if the sequence has no elements.
    fn disjoin(&mut self) -> Expr;
}

impl<T> ExprIterator for T
where
    T: Iterator<Item = Expr>,
{
    fn conjoin(&mut self) -> Expr {
        if let Some(mut conjunction) = self.next() {
            for conjunct in self {
                conjunction = Expr::and(conjunction, conjunct);
            }
            conjunction
        } else {
            true.into()
        }
    }

    fn disjoin(&mut self) -> Expr {
        if let Some(mut disjunction) = self.next() {
            for disjunct in self {
                disjunction = Expr::or(disjunction, disjunct);
            }
            disjunction
        } else {
            false.into()
        }
    }
}
