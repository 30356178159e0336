// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::ast;
use glacier_common::utils::{InsertionOrderedMap, InsertionOrderedSet};

/// A heap-summary function introduced during the execution of one
/// function: the value function over a quantified region, the function
/// describing the region itself, and the axiom tying them together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SummaryFunction {
    pub decl: fir::FuncDecl,
    pub domain_decl: fir::FuncDecl,
    pub membership_axiom: fir::Expr,
}

/// An inverse function introduced to axiomatize a quantifier's
/// index-to-witness relationship without a second-order quantifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InverseFunction {
    pub decl: fir::FuncDecl,
    pub axiom: fir::Expr,
}

/// A fresh arbitrary-representative constant and its defining
/// constraint, introduced where execution needed a witness value but no
/// concrete one was determined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Representative {
    pub var: fir::LocalVar,
    pub constraint: fir::Expr,
}

/// The predicate instance enclosing a recorded recursive call: the
/// predicate's name, the snapshot recorded for that instance, and the
/// translated argument terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredicateInstance {
    pub predicate: String,
    pub snapshot: fir::Expr,
    pub args: Vec<fir::Expr>,
}

/// A recursive self-call found in the function's body, together with
/// the innermost predicate-unfold scope it is nested in, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursiveCallSite {
    pub call: ast::Expr,
    pub args: Vec<fir::Expr>,
    pub enclosing_predicate: Option<PredicateInstance>,
}

/// The immutable log of one execution branch: heap accesses, function
/// application values, and the helper symbols execution introduced.
///
/// Recorders form a monoid under [`combine`](Self::combine) with the
/// empty recorder as identity; `advance_phase` folds all branch
/// recorders of one phase into one. The map union is left-biased: in
/// well-formed input two branches record equal values for equal keys,
/// so the bias is unobservable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionRecorder {
    location_values: InsertionOrderedMap<ast::Expr, fir::Expr>,
    application_values: InsertionOrderedMap<ast::Expr, fir::Expr>,
    field_summaries: InsertionOrderedMap<String, SummaryFunction>,
    predicate_summaries: InsertionOrderedMap<String, SummaryFunction>,
    inverse_functions: InsertionOrderedSet<InverseFunction>,
    representatives: InsertionOrderedSet<Representative>,
    recursive_calls: Vec<RecursiveCallSite>,
}

impl FunctionRecorder {
    pub fn new() -> Self {
        FunctionRecorder::default()
    }

    pub fn record_location(&mut self, location: ast::Expr, value: fir::Expr) {
        self.location_values.insert_if_absent(location, value);
    }

    pub fn record_application(&mut self, application: ast::Expr, value: fir::Expr) {
        self.application_values.insert_if_absent(application, value);
    }

    pub fn record_field_summary<S: Into<String>>(&mut self, field: S, summary: SummaryFunction) {
        self.field_summaries.insert_if_absent(field.into(), summary);
    }

    pub fn record_predicate_summary<S: Into<String>>(
        &mut self,
        predicate: S,
        summary: SummaryFunction,
    ) {
        self.predicate_summaries
            .insert_if_absent(predicate.into(), summary);
    }

    pub fn record_inverse_function(&mut self, inverse: InverseFunction) {
        self.inverse_functions.insert(inverse);
    }

    pub fn record_representative(&mut self, representative: Representative) {
        self.representatives.insert(representative);
    }

    pub fn record_recursive_call(&mut self, site: RecursiveCallSite) {
        self.recursive_calls.push(site);
    }

    pub fn location_values(&self) -> &InsertionOrderedMap<ast::Expr, fir::Expr> {
        &self.location_values
    }

    pub fn application_values(&self) -> &InsertionOrderedMap<ast::Expr, fir::Expr> {
        &self.application_values
    }

    pub fn field_summaries(&self) -> &InsertionOrderedMap<String, SummaryFunction> {
        &self.field_summaries
    }

    pub fn predicate_summaries(&self) -> &InsertionOrderedMap<String, SummaryFunction> {
        &self.predicate_summaries
    }

    pub fn inverse_functions(&self) -> &InsertionOrderedSet<InverseFunction> {
        &self.inverse_functions
    }

    pub fn representatives(&self) -> &InsertionOrderedSet<Representative> {
        &self.representatives
    }

    pub fn recursive_calls(&self) -> &[RecursiveCallSite] {
        &self.recursive_calls
    }

    pub fn is_empty(&self) -> bool {
        self.location_values.is_empty()
            && self.application_values.is_empty()
            && self.field_summaries.is_empty()
            && self.predicate_summaries.is_empty()
            && self.inverse_functions.is_empty()
            && self.representatives.is_empty()
            && self.recursive_calls.is_empty()
    }

    /// The associative merge of two branch recorders; the empty recorder
    /// is its identity. Insertion order is self-then-other.
    #[must_use]
    pub fn combine(mut self, other: FunctionRecorder) -> FunctionRecorder {
        self.location_values.extend_absent(other.location_values);
        self.application_values
            .extend_absent(other.application_values);
        self.field_summaries.extend_absent(other.field_summaries);
        self.predicate_summaries
            .extend_absent(other.predicate_summaries);
        self.inverse_functions.extend(other.inverse_functions);
        self.representatives.extend(other.representatives);
        self.recursive_calls.extend(other.recursive_calls);
        self
    }

    pub(super) fn into_parts(self) -> RecorderParts {
        RecorderParts {
            location_values: self.location_values,
            application_values: self.application_values,
            field_summaries: self.field_summaries,
            predicate_summaries: self.predicate_summaries,
            inverse_functions: self.inverse_functions,
            representatives: self.representatives,
            recursive_calls: self.recursive_calls,
        }
    }
}

pub(super) struct RecorderParts {
    pub location_values: InsertionOrderedMap<ast::Expr, fir::Expr>,
    pub application_values: InsertionOrderedMap<ast::Expr, fir::Expr>,
    pub field_summaries: InsertionOrderedMap<String, SummaryFunction>,
    pub predicate_summaries: InsertionOrderedMap<String, SummaryFunction>,
    pub inverse_functions: InsertionOrderedSet<InverseFunction>,
    pub representatives: InsertionOrderedSet<Representative>,
    pub recursive_calls: Vec<RecursiveCallSite>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Type;
    use fir::{LocalVar, Sort};

    fn location(name: &str) -> ast::Expr {
        ast::Expr::field_access(ast::Expr::local("xs", Type::Ref), name, Type::Int)
    }

    fn value(name: &str) -> fir::Expr {
        fir::Expr::local(LocalVar::new(name, Sort::Int))
    }

    fn recorder_with(locations: &[(&str, &str)]) -> FunctionRecorder {
        let mut recorder = FunctionRecorder::new();
        for (loc, val) in locations {
            recorder.record_location(location(loc), value(val));
        }
        recorder
    }

    #[test]
    fn merge_unions_disjoint_mappings_in_order() {
        let left = recorder_with(&[("val", "v1")]);
        let right = recorder_with(&[("next", "v2")]);
        let merged = left.combine(right);
        let entries: Vec<_> = merged
            .location_values()
            .iter()
            .map(|(key, val)| (key.to_string(), val.to_string()))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("xs.val".to_string(), "v1".to_string()),
                ("xs.next".to_string(), "v2".to_string()),
            ]
        );
    }

    #[test]
    fn merge_is_left_biased_on_duplicate_keys() {
        let left = recorder_with(&[("val", "v1")]);
        let right = recorder_with(&[("val", "other")]);
        let merged = left.combine(right);
        assert_eq!(
            merged.location_values().get(&location("val")),
            Some(&value("v1"))
        );
        assert_eq!(merged.location_values().len(), 1);
    }

    #[test]
    fn empty_recorder_is_identity() {
        let recorder = recorder_with(&[("val", "v1"), ("next", "v2")]);
        let left_identity = FunctionRecorder::new().combine(recorder.clone());
        let right_identity = recorder.clone().combine(FunctionRecorder::new());
        assert_eq!(left_identity, recorder);
        assert_eq!(right_identity, recorder);
    }

    #[test]
    fn combine_is_associative() {
        let a = recorder_with(&[("val", "v1")]);
        let mut b = recorder_with(&[("next", "v2")]);
        b.record_inverse_function(InverseFunction {
            decl: fir::FuncDecl::new("inv@0", vec![LocalVar::new("r", Sort::Ref)], Sort::Int),
            axiom: true.into(),
        });
        let c = recorder_with(&[("len", "v3")]);

        let left_first = a.clone().combine(b.clone()).combine(c.clone());
        let right_first = a.combine(b.combine(c));
        assert_eq!(left_first, right_first);
    }

    #[test]
    fn fresh_symbol_sets_union() {
        let mut left = FunctionRecorder::new();
        left.record_representative(Representative {
            var: LocalVar::new("rep@0", Sort::Int),
            constraint: true.into(),
        });
        let mut right = FunctionRecorder::new();
        right.record_representative(Representative {
            var: LocalVar::new("rep@0", Sort::Int),
            constraint: true.into(),
        });
        right.record_representative(Representative {
            var: LocalVar::new("rep@1", Sort::Int),
            constraint: false.into(),
        });
        let merged = left.combine(right);
        assert_eq!(merged.representatives().len(), 2);
    }
}
