// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type handles.
//!
//! A [`Type`] is a cheap, clonable handle to immutable type metadata. Unnamed
//! composite types are interned (see `cache.rs`), so handle identity is type
//! identity: two handles compare equal exactly when they describe the same
//! type.
//!
//! Kind-specific accessors follow the reflection contract they model: calling
//! one on a type of the wrong kind panics. Use
//! [`SafeType`](crate::safe::SafeType) for a total API.

use super::fields::StructField;
use super::method::{InterfaceMethod, MethodDecl};
use super::{ChanDir, Kind};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Handle to a runtime type.
#[derive(Clone)]
pub struct Type(pub(crate) Arc<TypeInner>);

pub(crate) struct TypeInner {
    pub(crate) kind: Kind,
    /// Empty for unnamed types.
    pub(crate) name: String,
    pub(crate) pkg_path: String,
    pub(crate) repr: String,
    pub(crate) size: usize,
    pub(crate) align: usize,
    pub(crate) shape: Shape,
    /// Set for defined types whose underlying type is another handle.
    pub(crate) underlying: Option<Type>,
    /// Declared methods of a defined type, installed once by `NamedTypeBuilder`.
    pub(crate) methods: OnceLock<Arc<[MethodDecl]>>,
}

/// Kind-specific structure of a type.
#[derive(Clone)]
pub(crate) enum Shape {
    Basic,
    Array {
        elem: Type,
        len: usize,
    },
    Chan {
        dir: ChanDir,
        elem: Type,
    },
    Func {
        ins: Vec<Type>,
        outs: Vec<Type>,
        variadic: bool,
    },
    Interface {
        methods: Vec<InterfaceMethod>,
    },
    Map {
        key: Type,
        elem: Type,
    },
    Pointer {
        elem: Type,
    },
    Slice {
        elem: Type,
    },
    Struct {
        fields: Vec<StructField>,
    },
}

impl TypeInner {
    pub(crate) fn unnamed(kind: Kind, repr: String, size: usize, align: usize, shape: Shape) -> Self {
        Self {
            kind,
            name: String::new(),
            pkg_path: String::new(),
            repr,
            size,
            align,
            shape,
            underlying: None,
            methods: OnceLock::new(),
        }
    }
}

impl Type {
    /// Specific kind of this type.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.0.kind
    }

    /// Name within its package for a defined type, empty otherwise.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Import path of the package defining this type, empty for predeclared
    /// and unnamed types.
    #[inline]
    pub fn pkg_path(&self) -> &str {
        &self.0.pkg_path
    }

    /// Bytes needed to store a value of this type.
    #[inline]
    pub fn size(&self) -> usize {
        self.0.size
    }

    /// Alignment in bytes of a value of this type in memory.
    #[inline]
    pub fn align(&self) -> usize {
        self.0.align
    }

    /// Alignment in bytes of a value of this type used as a struct field.
    #[inline]
    pub fn field_align(&self) -> usize {
        self.0.align
    }

    /// Whether this is a named (defined or predeclared) type.
    #[inline]
    pub fn is_named(&self) -> bool {
        !self.0.name.is_empty()
    }

    /// Size of the type in bits.
    ///
    /// # Panics
    /// If the kind is not one of the sized or unsized Int, Uint, Float or
    /// Complex kinds.
    pub fn bits(&self) -> usize {
        if !self.kind().is_numeric() {
            panic!("reflect: Bits of non-arithmetic type {}", self);
        }
        self.0.size * 8
    }

    /// Direction of a channel type.
    ///
    /// # Panics
    /// If the kind is not Chan.
    pub fn chan_dir(&self) -> ChanDir {
        match &self.0.shape {
            Shape::Chan { dir, .. } => *dir,
            _ => panic!("reflect: ChanDir of non-chan type {}", self),
        }
    }

    /// Whether a function type's final input is a `...` parameter.
    ///
    /// # Panics
    /// If the kind is not Func.
    pub fn is_variadic(&self) -> bool {
        self.func_shape("IsVariadic").2
    }

    /// Element type.
    ///
    /// # Panics
    /// If the kind is not Array, Chan, Map, Pointer or Slice.
    pub fn elem(&self) -> Type {
        match &self.0.shape {
            Shape::Array { elem, .. }
            | Shape::Chan { elem, .. }
            | Shape::Map { elem, .. }
            | Shape::Pointer { elem }
            | Shape::Slice { elem } => elem.clone(),
            _ => panic!("reflect: Elem of invalid type {}", self),
        }
    }

    /// Key type of a map type.
    ///
    /// # Panics
    /// If the kind is not Map.
    pub fn key(&self) -> Type {
        match &self.0.shape {
            Shape::Map { key, .. } => key.clone(),
            _ => panic!("reflect: Key of non-map type {}", self),
        }
    }

    /// Length of an array type.
    ///
    /// # Panics
    /// If the kind is not Array.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match &self.0.shape {
            Shape::Array { len, .. } => *len,
            _ => panic!("reflect: Len of non-array type {}", self),
        }
    }

    /// Number of input parameters of a function type.
    ///
    /// # Panics
    /// If the kind is not Func.
    pub fn num_in(&self) -> usize {
        self.func_shape("NumIn").0.len()
    }

    /// Type of the i'th input parameter. For a variadic function the last
    /// input is the implicit slice type `[]T`.
    ///
    /// # Panics
    /// If the kind is not Func, or `i` is not in `[0, num_in())`.
    pub fn input(&self, i: usize) -> Type {
        let ins = self.func_shape("In").0;
        match ins.get(i) {
            Some(t) => t.clone(),
            None => panic!("reflect: In index {} out of range [0, {})", i, ins.len()),
        }
    }

    /// Number of output parameters of a function type.
    ///
    /// # Panics
    /// If the kind is not Func.
    pub fn num_out(&self) -> usize {
        self.func_shape("NumOut").1.len()
    }

    /// Type of the i'th output parameter.
    ///
    /// # Panics
    /// If the kind is not Func, or `i` is not in `[0, num_out())`.
    pub fn output(&self, i: usize) -> Type {
        let outs = self.func_shape("Out").1;
        match outs.get(i) {
            Some(t) => t.clone(),
            None => panic!("reflect: Out index {} out of range [0, {})", i, outs.len()),
        }
    }

    pub(crate) fn func_shape(&self, op: &str) -> (&[Type], &[Type], bool) {
        match &self.0.shape {
            Shape::Func {
                ins,
                outs,
                variadic,
            } => (ins, outs, *variadic),
            _ => panic!("reflect: {} of non-func type {}", op, self),
        }
    }

    /// Underlying type: the handle itself for predeclared and unnamed types.
    pub(crate) fn underlying(&self) -> &Type {
        self.0.underlying.as_ref().unwrap_or(self)
    }

    /// Stable identity of the handle, used as interning key.
    #[inline]
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub(crate) fn shape(&self) -> &Shape {
        &self.0.shape
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.repr)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.0.repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{array_of, chan_of, func_of, map_of, pointer_to, slice_of, type_of};

    #[test]
    fn test_basic_accessors() {
        let t = type_of::<u8>();
        assert_eq!(t.kind(), Kind::Uint8);
        assert_eq!(t.name(), "uint8");
        assert_eq!(t.pkg_path(), "");
        assert_eq!(t.size(), 1);
        assert_eq!(t.bits(), 8);
        assert!(t.is_named());
    }

    #[test]
    fn test_elem_and_key() {
        let m = map_of(&type_of::<String>(), &type_of::<i32>());
        assert_eq!(m.key(), type_of::<String>());
        assert_eq!(m.elem(), type_of::<i32>());

        let a = array_of(4, &type_of::<i64>());
        assert_eq!(a.len(), 4);
        assert_eq!(a.size(), 32);
        assert_eq!(a.elem(), type_of::<i64>());
    }

    #[test]
    fn test_func_shape() {
        let f = func_of(
            &[type_of::<i64>(), slice_of(&type_of::<f64>())],
            &[type_of::<bool>()],
            true,
        );
        assert!(f.is_variadic());
        assert_eq!(f.num_in(), 2);
        assert_eq!(f.input(1), slice_of(&type_of::<f64>()));
        assert_eq!(f.num_out(), 1);
        assert_eq!(f.output(0), type_of::<bool>());
    }

    #[test]
    #[should_panic(expected = "Elem of invalid type")]
    fn test_elem_panics_on_int() {
        let _ = type_of::<i64>().elem();
    }

    #[test]
    #[should_panic(expected = "non-chan")]
    fn test_chan_dir_panics_on_struct() {
        let _ = pointer_to(&type_of::<i64>()).chan_dir();
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_input_panics_at_count() {
        let f = func_of(&[type_of::<i64>()], &[], false);
        let _ = f.input(1);
    }

    #[test]
    fn test_identity_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(chan_of(ChanDir::Both, &type_of::<i32>()));
        set.insert(chan_of(ChanDir::Both, &type_of::<i32>()));
        set.insert(chan_of(ChanDir::Recv, &type_of::<i32>()));
        assert_eq!(set.len(), 2);
    }
}
