// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    ast,
    errors::{EncodingError, EncodingResult},
};
use fir::{DomainFunc, LocalVar, Sort};
use glacier_common::utils::NameService;

/// The domain that hosts the per-predicate trigger functions.
const PREDICATE_TRIGGER_DOMAIN: &str = "$PredicateTrigger";

/// The names of the three prover symbols encoding one heap-dependent
/// source function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapFunctionNames {
    pub full: String,
    pub limited: String,
    pub stateless: String,
}

/// Deterministic conversion of source-level identities to prover-level
/// symbols and sorts.
pub trait SymbolService: Send + Sync {
    /// The prover sort encoding a *concrete* source type. Unresolved type
    /// parameters are an internal error: callers must have skipped them.
    fn sort(&self, typ: &ast::Type) -> EncodingResult<Sort>;

    /// The full/limited/stateless symbol names of a function.
    fn function_names(&self, function: &str) -> HeapFunctionNames;

    /// The dedicated trigger function of a predicate, applied to the
    /// predicate's snapshot and arguments.
    fn predicate_trigger_function(&self, predicate: &ast::Predicate) -> EncodingResult<DomainFunc>;

    /// Base name for heap-summary functions over a field.
    fn field_summary_base(&self, field: &ast::Field) -> String;
}

/// The default symbol conversion.
#[derive(Debug, Default)]
pub struct Symbols;

impl Symbols {
    pub fn new() -> Self {
        Symbols
    }
}

impl SymbolService for Symbols {
    fn sort(&self, typ: &ast::Type) -> EncodingResult<Sort> {
        match typ {
            ast::Type::Int => Ok(Sort::Int),
            ast::Type::Bool => Ok(Sort::Bool),
            ast::Type::Ref => Ok(Sort::Ref),
            ast::Type::Seq(element) => Ok(Sort::seq(self.sort(element)?)),
            ast::Type::TypeVar(name) => Err(EncodingError::internal(format!(
                "sort conversion of unresolved type parameter {name}"
            ))),
            ast::Type::Named(name, args) => {
                let mut sort_name = NameService::sanitize(name);
                for arg in args {
                    sort_name.push('$');
                    sort_name.push_str(&self.sort(arg)?.to_string());
                }
                Ok(Sort::Domain(sort_name))
            }
        }
    }

    fn function_names(&self, function: &str) -> HeapFunctionNames {
        let base = NameService::sanitize(function);
        HeapFunctionNames {
            full: base.clone(),
            limited: format!("{base}$limited"),
            stateless: format!("{base}$stateless"),
        }
    }

    fn predicate_trigger_function(&self, predicate: &ast::Predicate) -> EncodingResult<DomainFunc> {
        let mut formal_args = vec![LocalVar::new("s", Sort::Snap)];
        for arg in &predicate.formal_args {
            formal_args.push(LocalVar::new(arg.name.clone(), self.sort(&arg.typ)?));
        }
        Ok(DomainFunc {
            name: format!("{}$trigger", NameService::sanitize(&predicate.name)),
            formal_args,
            return_sort: Sort::Bool,
            unique: false,
            domain_name: PREDICATE_TRIGGER_DOMAIN.to_string(),
        })
    }

    fn field_summary_base(&self, field: &ast::Field) -> String {
        format!("sm${}", NameService::sanitize(&field.name))
    }
}
