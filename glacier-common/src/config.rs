// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use config_crate::{Config, Environment};
use serde::de::DeserializeOwned;
use std::sync::RwLock;

lazy_static! {
    static ref SETTINGS: RwLock<Config> = RwLock::new({
        Config::builder()
            // 1. Default values
            .set_default("LOG_DIR", "./log/")
            .unwrap()
            .set_default("DUMP_PREAMBLE", false)
            .unwrap()
            .set_default("TEMPLATE_DIR", "")
            .unwrap()
            .set_default("CACHE_TEMPLATES", true)
            .unwrap()
            // 2. Override with environment variables (`GLACIER_LOG_DIR`, ...)
            .add_source(Environment::with_prefix("GLACIER"))
            .build()
            .unwrap()
    });
}

fn read_setting<T: DeserializeOwned>(name: &str) -> T {
    SETTINGS
        .read()
        .unwrap()
        .get(name)
        .unwrap_or_else(|err| panic!("Failed to read setting {name}: {err}"))
}

/// Directory in which to dump debug artefacts such as generated preambles.
pub fn log_dir() -> String {
    read_setting("LOG_DIR")
}

/// When enabled, every generated preamble block is also logged.
pub fn dump_preamble() -> bool {
    read_setting("DUMP_PREAMBLE")
}

/// Optional directory overriding the axiom templates that are compiled
/// into the binary. Empty means: use the embedded templates.
pub fn template_dir() -> String {
    read_setting("TEMPLATE_DIR")
}

/// Memoize template reads keyed by template name and substitution.
pub fn cache_templates() -> bool {
    read_setting("CACHE_TEMPLATES")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_present() {
        assert_eq!(log_dir(), "./log/");
        assert!(!dump_preamble());
        assert!(template_dir().is_empty());
        assert!(cache_templates());
    }
}
