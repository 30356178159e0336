// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

/// An error in the encoding with no information regarding the source
/// code position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodingErrorKind {
    /// Usage of an unsupported source feature.
    Unsupported(String),
    /// An incorrect usage of the verifier (e.g. an ill-typed contract).
    Incorrect(String),
    /// An internal error of the encoder (e.g. a phase-ordering defect of
    /// the driving caller, or a missing recorded value).
    Internal(String),
    /// A broken installation (e.g. a missing or malformed axiom template).
    Configuration(String),
}

impl EncodingErrorKind {
    /// Usage of an unsupported source feature.
    pub fn unsupported<M: ToString>(message: M) -> Self {
        EncodingErrorKind::Unsupported(message.to_string())
    }

    /// An incorrect usage of the verifier.
    pub fn incorrect<M: ToString>(message: M) -> Self {
        EncodingErrorKind::Incorrect(message.to_string())
    }

    /// An internal error of the encoder.
    pub fn internal<M: ToString>(message: M) -> Self {
        EncodingErrorKind::Internal(message.to_string())
    }

    /// A broken installation.
    pub fn configuration<M: ToString>(message: M) -> Self {
        EncodingErrorKind::Configuration(message.to_string())
    }
}

impl fmt::Display for EncodingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodingErrorKind::Unsupported(message) => write!(f, "unsupported: {message}"),
            EncodingErrorKind::Incorrect(message) => write!(f, "incorrect: {message}"),
            EncodingErrorKind::Internal(message) => write!(f, "internal error: {message}"),
            EncodingErrorKind::Configuration(message) => {
                write!(f, "configuration error: {message}")
            }
        }
    }
}
