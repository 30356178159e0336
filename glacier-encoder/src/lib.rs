// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Encoding of program-level constructs into first-order prover theories.
//!
//! Two entry points share one pattern, *analyze once, then emit sorts,
//! symbols and axioms in that order*:
//!
//! * [`preamble::PreambleContributor`] instances discover which concrete
//!   instantiations of a built-in theory a program needs and contribute
//!   the corresponding declarations and axioms
//!   ([`preamble::SequencePreambleContributor`] for the sequence theory);
//! * [`functions::FunctionAxiomatizer`] turns the per-branch results of
//!   symbolically executing one heap-dependent function into that
//!   function's definitional and well-definedness axioms.

#![deny(unreachable_patterns)]
#![deny(unused_mut)]
#![deny(unused_must_use)]

pub mod ast;
pub mod errors;
pub mod functions;
pub mod preamble;
pub mod sink;
pub mod symbols;
pub mod translator;
