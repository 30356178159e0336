// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    ast,
    errors::{EncodingError, EncodingResult},
    functions::FunctionAxiomatizer,
};
use glacier_common::utils::InsertionOrderedMap;

/// Translation of source assertions and bodies into prover terms.
///
/// Implemented outside this crate, next to the symbolic execution
/// engine; the axiomatizer only decides *what* needs translating and
/// assembles the results.
pub trait ExpressionTranslator {
    /// Translate a sequence of source assertions in the context of the
    /// given axiomatizer (its formals, recorded values and fresh
    /// symbols are in scope).
    fn translate_assertions(
        &self,
        program: &ast::Program,
        assertions: &[ast::Expr],
        axiomatizer: &FunctionAxiomatizer,
    ) -> EncodingResult<Vec<fir::Expr>>;

    /// Translate the function's body. `Ok(None)` means the body is not
    /// translatable to a term (e.g. the function is abstract); that is
    /// not an error.
    fn translate_body(
        &self,
        program: &ast::Program,
        axiomatizer: &FunctionAxiomatizer,
    ) -> EncodingResult<Option<fir::Expr>>;
}

/// Retrieve the value recorded for a location or application
/// expression. Every such expression reachable in a body must have been
/// recorded by execution, so a miss (or a sort mismatch) is an
/// internal-consistency error, never a property of the program under
/// verification.
pub fn lookup_recorded_value<'a>(
    values: &'a InsertionOrderedMap<ast::Expr, fir::Expr>,
    key: &ast::Expr,
    expected_sort: &fir::Sort,
    function: &str,
) -> EncodingResult<&'a fir::Expr> {
    let value = values.get(key).ok_or_else(|| {
        EncodingError::internal(format!(
            "no value recorded for {key} in function {function}"
        ))
        .with_pos(key.pos)
    })?;
    if let Some(sort) = value.sort() {
        if &sort != expected_sort {
            return Err(EncodingError::internal(format!(
                "value recorded for {key} in function {function} has sort {sort}, expected {expected_sort}"
            ))
            .with_pos(key.pos));
        }
    }
    Ok(value)
}
