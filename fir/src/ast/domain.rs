// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{Expr, LocalVar, Sort};
use std::fmt;

/// Declaration of an uninterpreted sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SortDecl {
    pub sort: Sort,
}

impl SortDecl {
    pub fn new(sort: Sort) -> Self {
        SortDecl { sort }
    }
}

impl fmt::Display for SortDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "sort {}", self.sort)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Domain {
    pub name: String,
    pub functions: Vec<DomainFunc>,
    pub axioms: Vec<DomainAxiom>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DomainFunc {
    pub name: String,
    pub formal_args: Vec<LocalVar>,
    pub return_sort: Sort,
    pub unique: bool,
    pub domain_name: String,
}

impl DomainFunc {
    pub fn apply(&self, args: Vec<Expr>) -> Expr {
        debug_assert_eq!(self.formal_args.len(), args.len());
        Expr::domain_func_app(self.clone(), args)
    }
}

impl fmt::Display for DomainFunc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.unique {
            write!(f, "unique ")?;
        }
        write!(
            f,
            "function {}({}): {}",
            self.name,
            self.formal_args
                .iter()
                .map(|arg| format!("{arg:?}"))
                .collect::<Vec<String>>()
                .join(", "),
            self.return_sort
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DomainAxiom {
    pub name: String,
    pub expr: Expr,
    pub domain_name: String,
}

impl fmt::Display for DomainAxiom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "axiom {} {{ {} }}", self.name, self.expr)
    }
}
