// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Panic-free descriptors over the runtime facility.
//!
//! Each descriptor wraps exactly one runtime handle and never panics: an
//! operation the runtime only defines for some kinds is checked first and
//! returns a [`ReflectError`] describing the mismatch. `into_inner` is the
//! escape hatch back to the raw handle.
//!
//! # Example
//!
//! ```rust
//! use safereflect::runtime::{type_of, Kind};
//! use safereflect::safe::{ReflectError, SafeType};
//!
//! let t = SafeType::new(type_of::<i64>());
//! assert_eq!(t.bits(), Ok(64));
//! assert!(matches!(
//!     t.num_field(),
//!     Err(ReflectError::WrongKind { actual: Kind::Int64, .. })
//! ));
//! ```

mod error;
pub mod kinds;
mod safe_method;
mod safe_type;
mod safe_value;
mod sequence;

pub use error::{ReflectError, Result};
pub use safe_method::SafeMethod;
pub use safe_type::{SafeField, SafeType};
pub use safe_value::SafeValue;
pub use sequence::{Element, Step, Steps, ValueSequence};
