// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! First-order intermediate representation of prover input: sorts, terms,
//! quantifiers with triggers, and the declarations that introduce them.

#![deny(unreachable_patterns)]
#![deny(unused_mut)]
#![deny(unused_must_use)]

pub mod ast;

pub use ast::*;
