// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kind sets accepted by the gated descriptor operations.

use crate::runtime::Kind;

pub const SIGNED_INTS: &[Kind] = &[Kind::Int, Kind::Int8, Kind::Int16, Kind::Int32, Kind::Int64];

pub const UNSIGNED_INTS: &[Kind] = &[
    Kind::Uint,
    Kind::Uint8,
    Kind::Uint16,
    Kind::Uint32,
    Kind::Uint64,
    Kind::Uintptr,
];

pub const FLOATS: &[Kind] = &[Kind::Float32, Kind::Float64];

pub const COMPLEXES: &[Kind] = &[Kind::Complex64, Kind::Complex128];

/// Kinds with a bit size.
pub const NUMERIC: &[Kind] = &[
    Kind::Int,
    Kind::Int8,
    Kind::Int16,
    Kind::Int32,
    Kind::Int64,
    Kind::Uint,
    Kind::Uint8,
    Kind::Uint16,
    Kind::Uint32,
    Kind::Uint64,
    Kind::Uintptr,
    Kind::Float32,
    Kind::Float64,
    Kind::Complex64,
    Kind::Complex128,
];

pub const BOOL: &[Kind] = &[Kind::Bool];
pub const STRING: &[Kind] = &[Kind::String];
pub const ARRAY: &[Kind] = &[Kind::Array];
pub const CHAN: &[Kind] = &[Kind::Chan];
pub const FUNC: &[Kind] = &[Kind::Func];
pub const MAP: &[Kind] = &[Kind::Map];
pub const STRUCT: &[Kind] = &[Kind::Struct];

/// Kinds with an element type.
pub const WITH_ELEM: &[Kind] = &[Kind::Array, Kind::Chan, Kind::Map, Kind::Pointer, Kind::Slice];

/// Kinds of values that have a length.
pub const WITH_LEN: &[Kind] = &[Kind::Array, Kind::Chan, Kind::Map, Kind::Slice, Kind::String];

/// Kinds of values that have a capacity.
pub const WITH_CAP: &[Kind] = &[Kind::Array, Kind::Chan, Kind::Slice];

/// Kinds of values that can be indexed.
pub const INDEXABLE: &[Kind] = &[Kind::Array, Kind::Slice, Kind::String];

/// Kinds of values whose `elem` is defined.
pub const INDIRECT: &[Kind] = &[Kind::Interface, Kind::Pointer];

/// Kinds whose values can be nil.
pub const NILABLE: &[Kind] = &[
    Kind::Chan,
    Kind::Func,
    Kind::Interface,
    Kind::Map,
    Kind::Pointer,
    Kind::Slice,
    Kind::UnsafePointer,
];

/// Kinds a value sequence can walk.
pub const SEQUENCE: &[Kind] = &[
    Kind::Array,
    Kind::Chan,
    Kind::Map,
    Kind::Pointer,
    Kind::Slice,
    Kind::String,
];
