// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod encoding_error;
mod encoding_error_kind;

pub use encoding_error::*;
pub use encoding_error_kind::*;
