// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod axiomatizer;
mod emitter;
mod heap_functions;
mod recorder;

pub use axiomatizer::{FunctionAxiomatizer, Phase, SummaryFunctionGenerator};
pub use emitter::emit_function_theory;
pub use heap_functions::HeapFunctionSymbols;
pub use recorder::{
    FunctionRecorder, InverseFunction, PredicateInstance, RecursiveCallSite, Representative,
    SummaryFunction,
};
