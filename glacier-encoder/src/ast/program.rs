// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{Expr, Position, Type, VarDecl};

/// Declaration of a heap-dependent (impure) source function. The heap
/// snapshot parameter is implicit here; encoding makes it explicit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub formal_args: Vec<VarDecl>,
    pub return_type: Type,
    pub pres: Vec<Expr>,
    pub posts: Vec<Expr>,
    /// `None` for abstract (uninterpreted) functions.
    pub body: Option<Expr>,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Predicate {
    pub name: String,
    pub formal_args: Vec<VarDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Field {
    pub name: String,
    pub typ: Type,
}

impl Field {
    pub fn new<S: Into<String>>(name: S, typ: Type) -> Self {
        Field {
            name: name.into(),
            typ,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Program {
    pub name: String,
    pub functions: Vec<FunctionDecl>,
    pub predicates: Vec<Predicate>,
    pub fields: Vec<Field>,
}

impl Program {
    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.iter().find(|function| function.name == name)
    }

    pub fn predicate(&self, name: &str) -> Option<&Predicate> {
        self.predicates.iter().find(|predicate| predicate.name == name)
    }

    /// Visit the resolved type of every typed node of the program:
    /// field declarations, predicate and function signatures, and every
    /// expression node of contracts and bodies.
    pub fn walk_types<F: FnMut(&Type)>(&self, mut visitor: F) {
        for field in &self.fields {
            visitor(&field.typ);
        }
        for predicate in &self.predicates {
            for arg in &predicate.formal_args {
                visitor(&arg.typ);
            }
        }
        for function in &self.functions {
            for arg in &function.formal_args {
                visitor(&arg.typ);
            }
            visitor(&function.return_type);
            let mut visit_expr = |expr: &Expr| visitor(expr.typ());
            for pre in &function.pres {
                pre.visit(&mut visit_expr);
            }
            for post in &function.posts {
                post.visit(&mut visit_expr);
            }
            if let Some(body) = &function.body {
                body.visit(&mut visit_expr);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_types_reaches_expression_nodes() {
        let program = Program {
            name: "p".to_string(),
            functions: vec![FunctionDecl {
                name: "f".to_string(),
                formal_args: vec![VarDecl::new("xs", Type::Ref)],
                return_type: Type::Int,
                pres: vec![],
                posts: vec![],
                body: Some(Expr::func_app(
                    "g",
                    vec![Expr::local("xs", Type::Ref)],
                    Type::seq(Type::Int),
                )),
                pos: Position::default(),
            }],
            predicates: vec![],
            fields: vec![Field::new("next", Type::Ref)],
        };
        let mut seen = Vec::new();
        program.walk_types(|typ| seen.push(typ.to_string()));
        assert!(seen.contains(&"Seq[Int]".to_string()));
        assert!(seen.contains(&"Ref".to_string()));
        assert!(seen.contains(&"Int".to_string()));
    }
}
