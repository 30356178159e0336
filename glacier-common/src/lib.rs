// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![deny(unreachable_patterns)]
#![deny(unused_mut)]
#![deny(unused_must_use)]

#[macro_use]
extern crate lazy_static;
extern crate config as config_crate;

pub mod config;
pub mod utils;
