// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::errors::{EncodingError, EncodingResult};
use glacier_common::config;
use log::debug;
use rustc_hash::FxHashMap;
use std::{fs, path::Path, sync::Mutex};

/// Read-only source of axiom template text. Given a template identifier
/// and a placeholder substitution, yields the ordered, substituted lines.
/// Failure is fatal (a broken installation) and not locally retried.
pub trait TemplateSource: Send + Sync {
    fn read(&self, template: &str, substitutions: &[(&str, &str)]) -> EncodingResult<Vec<String>>;
}

/// Templates compiled into the binary. An installation may override them
/// by pointing `TEMPLATE_DIR` at a directory of `<name>.vpr` files.
const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    (
        "sequences_decls",
        include_str!("templates/sequences_decls.vpr"),
    ),
    (
        "sequences_axioms",
        include_str!("templates/sequences_axioms.vpr"),
    ),
    (
        "sequences_int_decls",
        include_str!("templates/sequences_int_decls.vpr"),
    ),
    (
        "sequences_int_axioms",
        include_str!("templates/sequences_int_axioms.vpr"),
    ),
];

/// The default [`TemplateSource`], with memoized reads keyed by template
/// name and substitution.
#[derive(Debug, Default)]
pub struct TemplateLoader {
    cache: Mutex<FxHashMap<String, Vec<String>>>,
}

impl TemplateLoader {
    pub fn new() -> Self {
        TemplateLoader::default()
    }

    fn template_text(&self, template: &str) -> EncodingResult<String> {
        let override_dir = config::template_dir();
        if !override_dir.is_empty() {
            let path = Path::new(&override_dir).join(format!("{template}.vpr"));
            return fs::read_to_string(&path).map_err(|error| {
                EncodingError::configuration(format!(
                    "cannot read axiom template {}: {}",
                    path.display(),
                    error
                ))
            });
        }
        EMBEDDED_TEMPLATES
            .iter()
            .find(|(name, _)| *name == template)
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| {
                EncodingError::configuration(format!("unknown axiom template {template}"))
            })
    }

    fn substitute(text: &str, substitutions: &[(&str, &str)]) -> Vec<String> {
        text.lines()
            .map(|line| {
                let mut line = line.to_string();
                for (placeholder, replacement) in substitutions {
                    line = line.replace(&format!("${placeholder}$"), replacement);
                }
                line
            })
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}

impl TemplateSource for TemplateLoader {
    fn read(&self, template: &str, substitutions: &[(&str, &str)]) -> EncodingResult<Vec<String>> {
        let cache_key = substitutions.iter().fold(template.to_string(), |key, (placeholder, replacement)| {
            format!("{key}|{placeholder}={replacement}")
        });
        if config::cache_templates() {
            if let Some(lines) = self.cache.lock().unwrap().get(&cache_key) {
                return Ok(lines.clone());
            }
        }
        debug!("Reading axiom template {template}");
        let lines = Self::substitute(&self.template_text(template)?, substitutions);
        if config::cache_templates() {
            self.cache
                .lock()
                .unwrap()
                .insert(cache_key, lines.clone());
        }
        Ok(lines)
    }
}
