// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Failure values of the descriptor API.

use crate::runtime::{ChanDir, Kind, Type};
use std::fmt;

/// Why a descriptor operation could not be performed.
///
/// Every variant names the operation (`op`) that failed. The `Display` text is
/// derived from the fields; branch on the variant instead of parsing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// Receiver kind outside the operation's required set.
    WrongKind {
        op: &'static str,
        expected: &'static [Kind],
        actual: Kind,
    },
    /// Index not in `[0, len)`.
    IndexOutOfRange {
        op: &'static str,
        index: usize,
        len: usize,
    },
    /// Field path with no steps.
    EmptyIndexPath { op: &'static str },
    /// Operation on the zero value.
    InvalidValue { op: &'static str },
    /// Nil function, channel or embedded pointer.
    NilValue { op: &'static str, kind: Kind },
    /// Send on a receive-only channel, or receive on a send-only one.
    ChannelDirection { op: &'static str, dir: ChanDir },
    /// Wrong number of call arguments. `expected` is the minimum when
    /// `variadic` is set.
    ArgumentCount {
        op: &'static str,
        expected: usize,
        variadic: bool,
        got: usize,
    },
    /// Argument `index` not assignable to its parameter type.
    ArgumentType {
        op: &'static str,
        index: usize,
        expected: Type,
        actual: Type,
    },
    /// Function implementation returned the wrong number of results.
    ResultCount {
        op: &'static str,
        expected: usize,
        got: usize,
    },
    /// Result `index` missing a type or not assignable to its declared type.
    /// `actual` is `None` for the zero value.
    ResultType {
        op: &'static str,
        index: usize,
        expected: Type,
        actual: Option<Type>,
    },
    /// Map key not assignable to the map's key type.
    KeyType {
        op: &'static str,
        expected: Type,
        actual: Type,
    },
    /// Map key type that does not support `==`.
    IncomparableKey { op: &'static str, key: Type },
}

impl ReflectError {
    pub(crate) const fn wrong_kind(op: &'static str, expected: &'static [Kind], actual: Kind) -> Self {
        Self::WrongKind {
            op,
            expected,
            actual,
        }
    }

    pub(crate) const fn out_of_range(op: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { op, index, len }
    }

    /// Name of the operation that failed.
    pub fn op(&self) -> &'static str {
        match self {
            Self::WrongKind { op, .. }
            | Self::IndexOutOfRange { op, .. }
            | Self::EmptyIndexPath { op }
            | Self::InvalidValue { op }
            | Self::NilValue { op, .. }
            | Self::ChannelDirection { op, .. }
            | Self::ArgumentCount { op, .. }
            | Self::ArgumentType { op, .. }
            | Self::ResultCount { op, .. }
            | Self::ResultType { op, .. }
            | Self::KeyType { op, .. }
            | Self::IncomparableKey { op, .. } => op,
        }
    }

    /// Kind of the receiver when the failure is about its kind.
    pub fn actual_kind(&self) -> Option<Kind> {
        match self {
            Self::WrongKind { actual, .. } => Some(*actual),
            Self::NilValue { kind, .. } => Some(*kind),
            Self::InvalidValue { .. } => Some(Kind::Invalid),
            _ => None,
        }
    }
}

struct KindSet(&'static [Kind]);

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, k) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", k)?;
        }
        Ok(())
    }
}

impl fmt::Display for ReflectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongKind {
                op,
                expected,
                actual,
            } => write!(
                f,
                "{}: expected kind in [{}], got {}",
                op,
                KindSet(expected),
                actual
            ),
            Self::IndexOutOfRange { op, index, len } => {
                write!(f, "{}: index {} out of range [0, {})", op, index, len)
            }
            Self::EmptyIndexPath { op } => write!(f, "{}: empty index path", op),
            Self::InvalidValue { op } => write!(f, "{}: invalid value", op),
            Self::NilValue { op, kind } => write!(f, "{}: nil {} value", op, kind),
            Self::ChannelDirection { op, dir } => {
                write!(f, "{}: not allowed on {} channel", op, dir)
            }
            Self::ArgumentCount {
                op,
                expected,
                variadic,
                got,
            } => {
                let bound = if *variadic { "at least " } else { "" };
                write!(f, "{}: expected {}{} arguments, got {}", op, bound, expected, got)
            }
            Self::ArgumentType {
                op,
                index,
                expected,
                actual,
            } => write!(
                f,
                "{}: argument {} has type {}, not assignable to {}",
                op, index, actual, expected
            ),
            Self::ResultCount { op, expected, got } => {
                write!(f, "{}: function returned {} results, want {}", op, got, expected)
            }
            Self::ResultType {
                op,
                index,
                expected,
                actual: Some(actual),
            } => write!(
                f,
                "{}: result {} has type {}, not assignable to {}",
                op, index, actual, expected
            ),
            Self::ResultType {
                op,
                index,
                expected,
                actual: None,
            } => write!(f, "{}: result {} is invalid, want {}", op, index, expected),
            Self::KeyType {
                op,
                expected,
                actual,
            } => write!(
                f,
                "{}: key of type {} not assignable to {}",
                op, actual, expected
            ),
            Self::IncomparableKey { op, key } => {
                write!(f, "{}: key type {} is not comparable", op, key)
            }
        }
    }
}

impl std::error::Error for ReflectError {}

/// Result type of descriptor operations.
pub type Result<T> = std::result::Result<T, ReflectError>;
