// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{Expr, LocalVar, Sort};
use std::fmt;

/// Declaration of a prover-level function symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FuncDecl {
    pub name: String,
    pub formal_args: Vec<LocalVar>,
    pub return_sort: Sort,
}

impl FuncDecl {
    pub fn new<S: Into<String>>(name: S, formal_args: Vec<LocalVar>, return_sort: Sort) -> Self {
        FuncDecl {
            name: name.into(),
            formal_args,
            return_sort,
        }
    }

    /// The application of this symbol to the given arguments.
    pub fn apply(&self, args: Vec<Expr>) -> Expr {
        debug_assert_eq!(self.formal_args.len(), args.len());
        Expr::func_app(self.name.clone(), args, self.return_sort.clone())
    }

    /// The application of this symbol to its own formal arguments.
    pub fn apply_formals(&self) -> Expr {
        self.apply(
            self.formal_args
                .iter()
                .cloned()
                .map(Expr::local)
                .collect(),
        )
    }
}

impl fmt::Display for FuncDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
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
