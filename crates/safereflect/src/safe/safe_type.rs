// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptor: total introspection over one type handle.

use super::kinds;
use super::{ReflectError, Result, SafeMethod};
use crate::runtime::{self, ChanDir, Kind, StructField, StructTag, Type};
use std::fmt;

/// Total wrapper around a [`Type`].
///
/// Operations that the runtime only defines for some kinds check the kind
/// first and return [`ReflectError::WrongKind`] instead of panicking.
/// Positional lookups return [`ReflectError::IndexOutOfRange`] for any index
/// not below the count. Name-based lookups return `Option`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SafeType(Type);

/// Struct field with its type already wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeField(StructField);

fn checked_field(t: &Type, op: &'static str, i: usize) -> Result<StructField> {
    match t.kind() {
        Kind::Struct => {
            let count = t.num_field();
            if i < count {
                Ok(t.field(i))
            } else {
                Err(ReflectError::out_of_range(op, i, count))
            }
        }
        actual => Err(ReflectError::wrong_kind(op, kinds::STRUCT, actual)),
    }
}

impl SafeType {
    pub fn new(t: Type) -> Self {
        Self(t)
    }

    /// Wrapped handle, for operations this API does not cover.
    pub fn reflect_type(&self) -> &Type {
        &self.0
    }

    pub fn into_inner(self) -> Type {
        self.0
    }

    // --- unconditional ---

    pub fn align(&self) -> usize {
        self.0.align()
    }

    pub fn field_align(&self) -> usize {
        self.0.field_align()
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn pkg_path(&self) -> &str {
        self.0.pkg_path()
    }

    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub fn kind(&self) -> Kind {
        self.0.kind()
    }

    pub fn implements(&self, u: &SafeType) -> bool {
        self.0.implements(&u.0)
    }

    pub fn assignable_to(&self, u: &SafeType) -> bool {
        self.0.assignable_to(&u.0)
    }

    pub fn convertible_to(&self, u: &SafeType) -> bool {
        self.0.convertible_to(&u.0)
    }

    pub fn comparable(&self) -> bool {
        self.0.comparable()
    }

    pub fn num_method(&self) -> usize {
        self.0.num_method()
    }

    // --- kind-gated ---

    /// Size in bits of a numeric type.
    pub fn bits(&self) -> Result<usize> {
        match self.kind() {
            Kind::Int
            | Kind::Int8
            | Kind::Int16
            | Kind::Int32
            | Kind::Int64
            | Kind::Uint
            | Kind::Uint8
            | Kind::Uint16
            | Kind::Uint32
            | Kind::Uint64
            | Kind::Uintptr
            | Kind::Float32
            | Kind::Float64
            | Kind::Complex64
            | Kind::Complex128 => Ok(self.0.bits()),
            actual => Err(ReflectError::wrong_kind("Bits", kinds::NUMERIC, actual)),
        }
    }

    pub fn chan_dir(&self) -> Result<ChanDir> {
        match self.kind() {
            Kind::Chan => Ok(self.0.chan_dir()),
            actual => Err(ReflectError::wrong_kind("ChanDir", kinds::CHAN, actual)),
        }
    }

    pub fn is_variadic(&self) -> Result<bool> {
        match self.kind() {
            Kind::Func => Ok(self.0.is_variadic()),
            actual => Err(ReflectError::wrong_kind("IsVariadic", kinds::FUNC, actual)),
        }
    }

    /// Element type of an array, channel, map, pointer or slice type.
    pub fn elem(&self) -> Result<SafeType> {
        match self.kind() {
            Kind::Array | Kind::Chan | Kind::Map | Kind::Pointer | Kind::Slice => {
                Ok(Self(self.0.elem()))
            }
            actual => Err(ReflectError::wrong_kind("Elem", kinds::WITH_ELEM, actual)),
        }
    }

    pub fn key(&self) -> Result<SafeType> {
        match self.kind() {
            Kind::Map => Ok(Self(self.0.key())),
            actual => Err(ReflectError::wrong_kind("Key", kinds::MAP, actual)),
        }
    }

    /// Length of an array type.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Result<usize> {
        match self.kind() {
            Kind::Array => Ok(self.0.len()),
            actual => Err(ReflectError::wrong_kind("Len", kinds::ARRAY, actual)),
        }
    }

    pub fn num_field(&self) -> Result<usize> {
        match self.kind() {
            Kind::Struct => Ok(self.0.num_field()),
            actual => Err(ReflectError::wrong_kind("NumField", kinds::STRUCT, actual)),
        }
    }

    pub fn field(&self, i: usize) -> Result<SafeField> {
        checked_field(&self.0, "Field", i).map(SafeField)
    }

    /// Nested field reached by following `index`. Embedded pointers to
    /// structs are stepped through; every step is checked.
    pub fn field_by_index(&self, index: &[usize]) -> Result<SafeField> {
        const OP: &str = "FieldByIndex";
        let Some((&first, rest)) = index.split_first() else {
            return Err(ReflectError::EmptyIndexPath { op: OP });
        };
        let mut field = checked_field(&self.0, OP, first)?;
        for &i in rest {
            let mut next = field.typ.clone();
            if next.kind() == Kind::Pointer && next.elem().kind() == Kind::Struct {
                next = next.elem();
            }
            field = checked_field(&next, OP, i)?;
        }
        Ok(SafeField(field))
    }

    /// Field with the given name, including promoted fields of embedded
    /// structs. `None` for non-struct types.
    pub fn field_by_name(&self, name: &str) -> Option<SafeField> {
        match self.kind() {
            Kind::Struct => self.0.field_by_name(name).map(SafeField),
            _ => None,
        }
    }

    /// First field, breadth-first over embedded structs, whose name satisfies
    /// `matches`. Several matches at the same depth yield `None`, as does a
    /// non-struct type.
    pub fn field_by_name_func<F>(&self, matches: F) -> Option<SafeField>
    where
        F: FnMut(&str) -> bool,
    {
        match self.kind() {
            Kind::Struct => self.0.field_by_name_func(matches).map(SafeField),
            _ => None,
        }
    }

    pub fn num_in(&self) -> Result<usize> {
        match self.kind() {
            Kind::Func => Ok(self.0.num_in()),
            actual => Err(ReflectError::wrong_kind("NumIn", kinds::FUNC, actual)),
        }
    }

    /// Type of the i'th input. A variadic `...T` parameter is one input of
    /// type `[]T`.
    pub fn input(&self, i: usize) -> Result<SafeType> {
        match self.kind() {
            Kind::Func => {
                let count = self.0.num_in();
                if i < count {
                    Ok(Self(self.0.input(i)))
                } else {
                    Err(ReflectError::out_of_range("In", i, count))
                }
            }
            actual => Err(ReflectError::wrong_kind("In", kinds::FUNC, actual)),
        }
    }

    pub fn num_out(&self) -> Result<usize> {
        match self.kind() {
            Kind::Func => Ok(self.0.num_out()),
            actual => Err(ReflectError::wrong_kind("NumOut", kinds::FUNC, actual)),
        }
    }

    pub fn output(&self, i: usize) -> Result<SafeType> {
        match self.kind() {
            Kind::Func => {
                let count = self.0.num_out();
                if i < count {
                    Ok(Self(self.0.output(i)))
                } else {
                    Err(ReflectError::out_of_range("Out", i, count))
                }
            }
            actual => Err(ReflectError::wrong_kind("Out", kinds::FUNC, actual)),
        }
    }

    /// The i'th method of the sorted method set.
    pub fn method(&self, i: usize) -> Result<SafeMethod> {
        let count = self.0.num_method();
        if i < count {
            Ok(SafeMethod::new(self.clone(), self.0.method(i)))
        } else {
            Err(ReflectError::out_of_range("Method", i, count))
        }
    }

    pub fn method_by_name(&self, name: &str) -> Option<SafeMethod> {
        self.0
            .method_by_name(name)
            .map(|m| SafeMethod::new(self.clone(), m))
    }

    // --- derived types ---

    /// `*T`
    pub fn pointer_to(&self) -> SafeType {
        Self(runtime::pointer_to(&self.0))
    }

    /// `[]T`
    pub fn slice_of(&self) -> SafeType {
        Self(runtime::slice_of(&self.0))
    }

    /// `[len]T`
    pub fn array_of(&self, len: usize) -> SafeType {
        Self(runtime::array_of(len, &self.0))
    }

    pub fn chan_of(&self, dir: ChanDir) -> SafeType {
        Self(runtime::chan_of(dir, &self.0))
    }

    /// `map[T]elem`; fails when `T` is not comparable.
    pub fn map_of(&self, elem: &SafeType) -> Result<SafeType> {
        if !self.0.comparable() {
            return Err(ReflectError::IncomparableKey {
                op: "MapOf",
                key: self.0.clone(),
            });
        }
        Ok(Self(runtime::map_of(&self.0, &elem.0)))
    }
}

impl From<Type> for SafeType {
    fn from(t: Type) -> Self {
        Self(t)
    }
}

impl fmt::Display for SafeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for SafeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SafeType({})", self.0)
    }
}

impl SafeField {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn pkg_path(&self) -> &str {
        &self.0.pkg_path
    }

    pub fn ty(&self) -> SafeType {
        SafeType(self.0.typ.clone())
    }

    pub fn tag(&self) -> &StructTag {
        &self.0.tag
    }

    pub fn offset(&self) -> usize {
        self.0.offset
    }

    pub fn index(&self) -> &[usize] {
        &self.0.index
    }

    pub fn anonymous(&self) -> bool {
        self.0.anonymous
    }

    pub fn is_exported(&self) -> bool {
        self.0.is_exported()
    }

    pub fn reflect_field(&self) -> &StructField {
        &self.0
    }

    pub fn into_inner(self) -> StructField {
        self.0
    }
}

impl From<StructField> for SafeField {
    fn from(f: StructField) -> Self {
        Self(f)
    }
}
