// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rustc_hash::FxHashMap;
use std::sync::Mutex;

/// Deterministic, injective fresh-name generation, shared by all encoders
/// of one verification run. Fresh names are `base@N` with a per-base
/// counter; a name is never handed out twice.
#[derive(Debug, Default)]
pub struct NameService {
    counters: Mutex<FxHashMap<String, usize>>,
}

impl NameService {
    pub fn new() -> Self {
        NameService::default()
    }

    /// The next unused name derived from `base`.
    pub fn fresh(&self, base: &str) -> String {
        let mut counters = self.counters.lock().unwrap();
        let counter = counters.entry(base.to_string()).or_insert(0);
        let name = format!("{base}@{counter}");
        *counter += 1;
        name
    }

    /// Make a source-level identifier safe for embedding into a prover
    /// symbol name. Alphanumerics, `_` and `$` pass through; everything
    /// else becomes `_`.
    pub fn sanitize(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}
