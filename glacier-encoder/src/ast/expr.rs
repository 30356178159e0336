// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{Position, Type};
use std::fmt;

/// A typed source expression. Equality and hashing ignore positions, so
/// expressions can key the recorder maps: two branches that access the
/// same heap location produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub typ: Type,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ExprKind {
    /// A local variable or formal argument.
    Local(String),
    /// The result variable of the enclosing function, only valid inside
    /// postconditions.
    Result,
    IntConst(i64),
    BoolConst(bool),
    /// A heap location access: base.field.
    FieldAccess(Box<Expr>, String),
    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// Application of a source-level function: name, arguments.
    FuncApp(String, Vec<Expr>),
    /// unfolding pred(args) in body — a predicate-unfold scope.
    Unfolding(String, Vec<Expr>, Box<Expr>),
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
    /// forall vars :: body.
    Forall(Vec<VarDecl>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum UnOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BinOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Implies,
}

/// A formal argument or bound variable declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub typ: Type,
}

impl VarDecl {
    pub fn new<S: Into<String>>(name: S, typ: Type) -> Self {
        VarDecl {
            name: name.into(),
            typ,
        }
    }
}

impl Expr {
    pub fn new(kind: ExprKind, typ: Type) -> Self {
        Expr {
            kind,
            typ,
            pos: Position::default(),
        }
    }

    pub fn with_pos(mut self, pos: Position) -> Self {
        self.pos = pos;
        self
    }

    pub fn local<S: Into<String>>(name: S, typ: Type) -> Self {
        Expr::new(ExprKind::Local(name.into()), typ)
    }

    pub fn result(typ: Type) -> Self {
        Expr::new(ExprKind::Result, typ)
    }

    pub fn int(value: i64) -> Self {
        Expr::new(ExprKind::IntConst(value), Type::Int)
    }

    pub fn bool(value: bool) -> Self {
        Expr::new(ExprKind::BoolConst(value), Type::Bool)
    }

    pub fn field_access<S: Into<String>>(base: Expr, field: S, typ: Type) -> Self {
        Expr::new(ExprKind::FieldAccess(Box::new(base), field.into()), typ)
    }

    pub fn unary(op: UnOp, operand: Expr, typ: Type) -> Self {
        Expr::new(ExprKind::Unary(op, Box::new(operand)), typ)
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr, typ: Type) -> Self {
        Expr::new(ExprKind::Binary(op, Box::new(left), Box::new(right)), typ)
    }

    pub fn func_app<S: Into<String>>(name: S, args: Vec<Expr>, typ: Type) -> Self {
        Expr::new(ExprKind::FuncApp(name.into(), args), typ)
    }

    pub fn unfolding<S: Into<String>>(predicate: S, args: Vec<Expr>, body: Expr) -> Self {
        let typ = body.typ.clone();
        Expr::new(
            ExprKind::Unfolding(predicate.into(), args, Box::new(body)),
            typ,
        )
    }

    pub fn cond(guard: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        let typ = then_expr.typ.clone();
        Expr::new(
            ExprKind::Cond(Box::new(guard), Box::new(then_expr), Box::new(else_expr)),
            typ,
        )
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }

    /// Visit this node and all sub-expressions, outermost first.
    pub fn visit<F: FnMut(&Expr)>(&self, visitor: &mut F) {
        visitor(self);
        match &self.kind {
            ExprKind::Local(_)
            | ExprKind::Result
            | ExprKind::IntConst(_)
            | ExprKind::BoolConst(_) => {}
            ExprKind::FieldAccess(base, _) => base.visit(visitor),
            ExprKind::Unary(_, operand) => operand.visit(visitor),
            ExprKind::Binary(_, left, right) => {
                left.visit(visitor);
                right.visit(visitor);
            }
            ExprKind::FuncApp(_, args) => {
                for arg in args {
                    arg.visit(visitor);
                }
            }
            ExprKind::Unfolding(_, args, body) => {
                for arg in args {
                    arg.visit(visitor);
                }
                body.visit(visitor);
            }
            ExprKind::Cond(guard, then_expr, else_expr) => {
                guard.visit(visitor);
                then_expr.visit(visitor);
                else_expr.visit(visitor);
            }
            ExprKind::Forall(_, body) => body.visit(visitor),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ExprKind::Local(name) => write!(f, "{name}"),
            ExprKind::Result => write!(f, "result"),
            ExprKind::IntConst(value) => write!(f, "{value}"),
            ExprKind::BoolConst(value) => write!(f, "{value}"),
            ExprKind::FieldAccess(base, field) => write!(f, "{base}.{field}"),
            ExprKind::Unary(op, operand) => {
                let symbol = match op {
                    UnOp::Not => "!",
                    UnOp::Neg => "-",
                };
                write!(f, "{symbol}({operand})")
            }
            ExprKind::Binary(op, left, right) => {
                let symbol = match op {
                    BinOp::Eq => "==",
                    BinOp::Ne => "!=",
                    BinOp::Gt => ">",
                    BinOp::Ge => ">=",
                    BinOp::Lt => "<",
                    BinOp::Le => "<=",
                    BinOp::Add => "+",
                    BinOp::Sub => "-",
                    BinOp::Mul => "*",
                    BinOp::Div => "/",
                    BinOp::Mod => "%",
                    BinOp::And => "&&",
                    BinOp::Or => "||",
                    BinOp::Implies => "==>",
                };
                write!(f, "({left}) {symbol} ({right})")
            }
            ExprKind::FuncApp(name, args) => write!(f, "{}({})", name, display_args(args)),
            ExprKind::Unfolding(predicate, args, body) => write!(
                f,
                "(unfolding {}({}) in {})",
                predicate,
                display_args(args),
                body
            ),
            ExprKind::Cond(guard, then_expr, else_expr) => {
                write!(f, "({guard}) ? ({then_expr}) : ({else_expr})")
            }
            ExprKind::Forall(vars, body) => write!(
                f,
                "forall {} :: {}",
                vars.iter()
                    .map(|var| format!("{}: {}", var.name, var.typ))
                    .collect::<Vec<String>>()
                    .join(", "),
                body
            ),
        }
    }
}

fn display_args(args: &[Expr]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}
