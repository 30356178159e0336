// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::symbols::HeapFunctionNames;
use fir::{Expr, FuncDecl, LocalVar, Sort, Trigger};

/// The three prover symbols encoding one heap-dependent function.
///
/// * `full` takes the heap snapshot plus arguments; its axiom defines
///   the function's meaning.
/// * `limited` has the same signature and is provably equal to `full`,
///   but is never itself unfolded further; it is what callers see, so
///   the prover can use the function's value without re-expanding a
///   recursive body on every occurrence.
/// * `stateless` drops the snapshot and serves purely as a trigger
///   anchor tied to the logical arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapFunctionSymbols {
    pub full: FuncDecl,
    pub limited: FuncDecl,
    pub stateless: FuncDecl,
}

impl HeapFunctionSymbols {
    /// Build the triple over the already-allocated fresh formals: the
    /// snapshot formal and one formal per source argument.
    pub fn new(
        names: HeapFunctionNames,
        snapshot: LocalVar,
        args: Vec<LocalVar>,
        return_sort: Sort,
    ) -> Self {
        let mut heap_args = vec![snapshot];
        heap_args.extend(args.iter().cloned());
        let full = FuncDecl::new(names.full, heap_args.clone(), return_sort.clone());
        let limited = FuncDecl::new(names.limited, heap_args, return_sort);
        let stateless = FuncDecl::new(names.stateless, args, Sort::Bool);
        HeapFunctionSymbols {
            full,
            limited,
            stateless,
        }
    }

    pub fn full_application(&self) -> Expr {
        self.full.apply_formals()
    }

    pub fn limited_application(&self) -> Expr {
        self.limited.apply_formals()
    }

    pub fn stateless_application(&self) -> Expr {
        self.stateless.apply_formals()
    }

    /// All quantified formals: source arguments, then the snapshot.
    pub fn quantified_formals(&self) -> Vec<LocalVar> {
        let mut formals: Vec<LocalVar> = self.full.formal_args[1..].to_vec();
        formals.push(self.full.formal_args[0].clone());
        formals
    }

    /// `limited(s, args) == full(s, args)`, triggered on the full
    /// application — never the reverse, so instantiation is driven by
    /// occurrences of the fully unfolded application.
    pub fn limited_axiom(&self) -> Expr {
        let full_app = self.full_application();
        Expr::forall(
            self.quantified_formals(),
            vec![Trigger::new(vec![full_app.clone()])],
            Expr::eq_cmp(self.limited_application(), full_app),
        )
    }

    /// `stateless(args)`, triggered on the full application: a trigger
    /// anchor decoupled from the heap snapshot in play.
    pub fn stateless_trigger_axiom(&self) -> Expr {
        Expr::forall(
            self.quantified_formals(),
            vec![Trigger::new(vec![self.full_application()])],
            self.stateless_application(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> HeapFunctionSymbols {
        HeapFunctionSymbols::new(
            HeapFunctionNames {
                full: "len".to_string(),
                limited: "len$limited".to_string(),
                stateless: "len$stateless".to_string(),
            },
            LocalVar::new("s@0", Sort::Snap),
            vec![LocalVar::new("xs@1", Sort::Ref)],
            Sort::Int,
        )
    }

    #[test]
    fn limited_axiom_is_the_equality_triggered_on_full() {
        let symbols = symbols();
        let axiom = symbols.limited_axiom();
        assert_eq!(
            axiom.to_string(),
            "forall xs@1: Ref, s@0: $Snap { len(s@0, xs@1) } :: \
             (len$limited(s@0, xs@1)) == (len(s@0, xs@1))"
        );
        // The trigger is the full application, never the limited one.
        if let Expr::ForAll(_, triggers, _) = axiom {
            assert_eq!(triggers.len(), 1);
            assert_eq!(triggers[0].terms(), &[symbols.full_application()]);
        } else {
            panic!("limited axiom is not a quantifier");
        }
    }

    #[test]
    fn stateless_symbol_drops_the_snapshot() {
        let symbols = symbols();
        assert_eq!(
            symbols.stateless_application().to_string(),
            "len$stateless(xs@1)"
        );
        assert_eq!(
            symbols.stateless_trigger_axiom().to_string(),
            "forall xs@1: Ref, s@0: $Snap { len(s@0, xs@1) } :: len$stateless(xs@1)"
        );
    }
}
