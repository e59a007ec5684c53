// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime Type Introspection
//!
//! Go-style reflection over a closed set of kinds: type handles, struct
//! fields and tags, method sets, function values and channels.
//!
//! Accessors that only make sense for some kinds panic when misused, as
//! documented in their `# Panics` sections. Wrap handles in the
//! [`safe`](crate::safe) descriptors to get `Result`s instead.
//!
//! # Features
//!
//! - **Type**: interned handle; equality is type identity
//! - **Builders**: structs, functions, interfaces and defined types with methods
//! - **Value**: immutable values with invocation and channel operations
//! - **Relations**: implements, assignable, convertible, comparable
//!
//! # Example
//!
//! ```rust
//! use safereflect::runtime::{type_of, value_of, Kind, StructBuilder};
//!
//! let reading = StructBuilder::new("example.com/sensor")
//!     .field("ID", &type_of::<u32>())
//!     .tagged_field("Celsius", &type_of::<f64>(), r#"json:"celsius""#)
//!     .build();
//!
//! assert_eq!(reading.kind(), Kind::Struct);
//! assert_eq!(reading.num_field(), 2);
//! assert_eq!(reading.field(1).tag.get("json"), "celsius");
//! assert_eq!(value_of(vec![1u8, 2, 3]).len(), 3);
//! ```

mod builder;
mod cache;
mod fields;
mod kind;
mod method;
mod reflect;
mod relations;
mod types;
mod value;

pub use builder::{FuncBuilder, InterfaceBuilder, NamedTypeBuilder, StructBuilder};
pub use cache::{
    array_of, cached_types, chan_of, func_of, interface_of, map_of, pointer_to, slice_of,
    struct_of,
};
pub use fields::{FieldDef, StructField, StructTag};
pub use kind::{ChanDir, Kind};
pub use method::{InterfaceMethod, Method};
pub use reflect::{type_of, value_of, Reflect};
pub use types::Type;
pub use value::{Func, Value};
