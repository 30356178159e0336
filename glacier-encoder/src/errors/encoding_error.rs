// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{ast::Position, errors::EncodingErrorKind};
use backtrace::Backtrace;
use log::{debug, error};
use std::fmt;

/// An error in the encoding with *optional* information regarding the
/// source code position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodingError {
    kind: EncodingErrorKind,
    pos: Option<Position>,
}

pub type EncodingResult<T> = Result<T, EncodingError>;

impl EncodingError {
    /// Usage of an unsupported source feature.
    pub fn unsupported<M: ToString>(message: M) -> Self {
        if cfg!(debug_assertions) {
            debug!("Constructing unsupported error at:\n{:?}", Backtrace::new());
        }
        EncodingError {
            kind: EncodingErrorKind::unsupported(message),
            pos: None,
        }
    }

    /// An incorrect usage of the verifier.
    pub fn incorrect<M: ToString>(message: M) -> Self {
        if cfg!(debug_assertions) {
            debug!("Constructing incorrect error at:\n{:?}", Backtrace::new());
        }
        EncodingError {
            kind: EncodingErrorKind::incorrect(message),
            pos: None,
        }
    }

    /// An internal error of the encoder; indicates that the surrounding
    /// system, not the program under verification, is broken.
    pub fn internal<M: ToString>(message: M) -> Self {
        if cfg!(debug_assertions) {
            error!("Constructing internal error at:\n{:?}", Backtrace::new());
        }
        EncodingError {
            kind: EncodingErrorKind::internal(message),
            pos: None,
        }
    }

    /// A broken installation; aborts the whole contribution pass.
    pub fn configuration<M: ToString>(message: M) -> Self {
        if cfg!(debug_assertions) {
            error!(
                "Constructing configuration error at:\n{:?}",
                Backtrace::new()
            );
        }
        EncodingError {
            kind: EncodingErrorKind::configuration(message),
            pos: None,
        }
    }

    pub fn kind(&self) -> &EncodingErrorKind {
        &self.kind
    }

    pub fn pos(&self) -> Option<Position> {
        self.pos
    }

    #[must_use]
    pub fn with_pos(mut self, pos: Position) -> Self {
        self.pos = Some(pos);
        self
    }

    /// Attach a position only if none is present yet.
    #[must_use]
    pub fn with_default_pos(self, pos: Position) -> Self {
        if self.pos.is_some() {
            self
        } else {
            self.with_pos(pos)
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.pos {
            Some(pos) if !pos.is_default() => write!(f, "[{}] {}", pos, self.kind),
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// Attach positions to encoding results.
pub trait WithPos {
    #[must_use]
    fn with_pos(self, pos: Position) -> Self;

    #[must_use]
    fn with_default_pos(self, pos: Position) -> Self;
}

impl<T> WithPos for EncodingResult<T> {
    fn with_pos(self, pos: Position) -> Self {
        self.map_err(|error| error.with_pos(pos))
    }

    fn with_default_pos(self, pos: Position) -> Self {
        self.map_err(|error| error.with_default_pos(pos))
    }
}

#[macro_export]
macro_rules! error_internal {
    ($message:expr) => {
        return Err($crate::errors::EncodingError::internal($message))
    };
    ($($tokens:tt)+) => {
        return Err($crate::errors::EncodingError::internal(format!($($tokens)+)))
    };
}

#[macro_export]
macro_rules! error_configuration {
    ($message:expr) => {
        return Err($crate::errors::EncodingError::configuration($message))
    };
    ($($tokens:tt)+) => {
        return Err($crate::errors::EncodingError::configuration(format!($($tokens)+)))
    };
}
