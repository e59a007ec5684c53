// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # safereflect - Panic-free runtime type introspection
//!
//! Two layers:
//!
//! - [`runtime`]: a Go-style reflection facility. Types are interned handles,
//!   values are immutable, functions can be called and channels drained.
//!   Operations that only make sense for some kinds panic when misused, as
//!   the reflection API they model does.
//! - [`safe`]: descriptors that wrap one runtime handle each and make every
//!   operation total. Misuse returns a structured [`ReflectError`] naming the
//!   operation, the accepted kinds and the actual kind.
//!
//! ## Quick Start
//!
//! ```rust
//! use safereflect::runtime::{type_of, value_of, FuncBuilder, Kind};
//! use safereflect::safe::{ReflectError, SafeType, SafeValue, ValueSequence};
//!
//! // Type descriptors
//! let sum = SafeType::new(
//!     FuncBuilder::new()
//!         .variadic(&type_of::<i64>())
//!         .output(&type_of::<i64>())
//!         .build(),
//! );
//! assert_eq!(sum.is_variadic(), Ok(true));
//! assert_eq!(sum.input(0).and_then(|t| t.elem()).map(|t| t.kind()), Ok(Kind::Int64));
//! assert!(matches!(sum.input(1), Err(ReflectError::IndexOutOfRange { index: 1, len: 1, .. })));
//! assert!(matches!(sum.key(), Err(ReflectError::WrongKind { actual: Kind::Func, .. })));
//!
//! // Value descriptors and sequences
//! let readings = SafeValue::new(value_of(vec![21.5f64, 22.0, 22.5]));
//! let total: f64 = ValueSequence::iter(&readings)?
//!     .filter_map(|e| e.value.float().ok())
//!     .sum();
//! assert_eq!(total, 66.0);
//! # Ok::<(), ReflectError>(())
//! ```
//!
//! ## Configuration
//!
//! Sizes and alignments follow a [`TargetLayout`](config::TargetLayout),
//! the host's by default. Call [`config::init_layout`] before building the
//! first type to describe another pointer width.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: type interning at `trace`,
//! method tables and layout initialization at `debug`. Descriptor failures are
//! returned, never logged.

pub mod config;
pub mod runtime;
pub mod safe;

pub use runtime::{Kind, Type, Value};
pub use safe::{ReflectError, SafeMethod, SafeType, SafeValue};
