// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The slice of the source-program representation this crate consumes:
//! typed expressions, function and predicate declarations, and the
//! program container. Statement-level program structure lives with the
//! symbolic execution engine, not here.

mod common;
mod expr;
mod program;

pub use common::*;
pub use expr::*;
pub use program::*;
