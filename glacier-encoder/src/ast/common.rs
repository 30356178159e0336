// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// The identifier of a source construct. Used in error reporting.
#[derive(Debug, Copy, Clone, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub(crate) line: i32,
    pub(crate) column: i32,
    pub(crate) id: u64,
}

impl PartialEq for Position {
    // Positions always eq!
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}
impl Eq for Position {}
impl Hash for Position {
    // Don't include Position info in hash!
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl Position {
    pub fn new(line: i32, column: i32, id: u64) -> Self {
        Position { line, column, id }
    }

    pub fn is_default(&self) -> bool {
        self.line == 0 && self.column == 0 && self.id == 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(0, 0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A resolved source type. `TypeVar` marks an unresolved type parameter;
/// a type is *concrete* when no `TypeVar` occurs anywhere inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Type {
    Int,
    Bool,
    Ref,
    Seq(Box<Type>),
    TypeVar(String),
    /// A named (struct-like) type and its type arguments.
    Named(String, Vec<Type>),
}

impl Type {
    pub fn seq(element: Type) -> Self {
        Type::Seq(Box::new(element))
    }

    pub fn named<S: Into<String>>(name: S) -> Self {
        Type::Named(name.into(), Vec::new())
    }

    pub fn is_seq(&self) -> bool {
        matches!(self, Type::Seq(_))
    }

    /// No unresolved type parameter occurs in this type.
    pub fn is_concrete(&self) -> bool {
        match self {
            Type::Int | Type::Bool | Type::Ref => true,
            Type::TypeVar(_) => false,
            Type::Seq(element) => element.is_concrete(),
            Type::Named(_, args) => args.iter().all(Type::is_concrete),
        }
    }

    /// This type followed by all of its structural constituents, so a
    /// `Seq[Seq[Int]]` also yields `Seq[Int]` and `Int`.
    pub fn constituents(&self) -> Vec<&Type> {
        let mut result = vec![self];
        match self {
            Type::Seq(element) => result.extend(element.constituents()),
            Type::Named(_, args) => {
                for arg in args {
                    result.extend(arg.constituents());
                }
            }
            Type::Int | Type::Bool | Type::Ref | Type::TypeVar(_) => {}
        }
        result
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Bool => write!(f, "Bool"),
            Type::Ref => write!(f, "Ref"),
            Type::Seq(element) => write!(f, "Seq[{element}]"),
            Type::TypeVar(name) => write!(f, "{name}"),
            Type::Named(name, args) => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(
                        f,
                        "[{}]",
                        args.iter()
                            .map(|arg| arg.to_string())
                            .collect::<Vec<String>>()
                            .join(", ")
                    )?;
                }
                Ok(())
            }
        }
    }
}
