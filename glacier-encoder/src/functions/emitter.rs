// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{errors::EncodingResult, functions::FunctionAxiomatizer, sink::PreambleSink};
use glacier_common::config;
use log::debug;

/// Emit the complete theory contribution of one function exactly once,
/// independent of how many execution branches were merged: symbol
/// declarations first, then the axioms that reference them.
///
/// Panics if the axiomatizer has not reached the verification phase,
/// or if the function's theory was already emitted.
pub fn emit_function_theory<S: PreambleSink>(
    axiomatizer: &FunctionAxiomatizer,
    sink: &mut S,
) -> EncodingResult<()> {
    assert!(
        axiomatizer.phase() == crate::functions::Phase::Verification,
        "theory of function {} emitted before the verification phase",
        axiomatizer.function().name
    );
    axiomatizer.mark_emitted();
    let function = &axiomatizer.function().name;
    sink.comment(&format!(
        "function {} (height {})",
        function,
        axiomatizer.height()
    ));

    let heap_functions = axiomatizer.heap_functions();
    let mut declarations = vec![
        heap_functions.full.to_string(),
        heap_functions.limited.to_string(),
        heap_functions.stateless.to_string(),
    ];
    declarations.extend(axiomatizer.fresh_symbol_declarations());
    sink.emit(&declarations);

    let mut axioms = vec![
        format!(
            "axiom {function}$limitedAxiom {{ {} }}",
            heap_functions.limited_axiom()
        ),
        format!(
            "axiom {function}$statelessAxiom {{ {} }}",
            heap_functions.stateless_trigger_axiom()
        ),
    ];
    if let Some(post_axiom) = axiomatizer.cached_post_axiom() {
        axioms.push(format!("axiom {function}$postAxiom {{ {post_axiom} }}"));
    }
    if let Some(definitional_axiom) = axiomatizer.definitional_axiom()? {
        axioms.push(format!(
            "axiom {function}$definitionalAxiom {{ {definitional_axiom} }}"
        ));
    }
    sink.emit(&axioms);

    if config::dump_preamble() {
        debug!("Emitted theory of function {function}: {} axioms", axioms.len());
    }
    Ok(())
}
