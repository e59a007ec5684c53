// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping of Rust types onto runtime types.

use super::cache::predeclared;
use super::{array_of, map_of, pointer_to, slice_of, Kind, Type, Value};
use std::collections::{BTreeMap, HashMap};

/// Rust type with a runtime type counterpart.
///
/// | Rust | Runtime |
/// |---|---|
/// | `bool` | `bool` |
/// | `i8`..`i64`, `isize` | `int8`..`int64`, `int` |
/// | `u8`..`u64`, `usize` | `uint8`..`uint64`, `uint` |
/// | `f32`, `f64` | `float32`, `float64` |
/// | `char` | `int32` (rune) |
/// | `String`, `&str` | `string` |
/// | `Vec<T>` | `[]T` |
/// | `[T; N]` | `[N]T` |
/// | `HashMap<K, V>`, `BTreeMap<K, V>` | `map[K]V` |
/// | `Box<T>` | `*T` |
pub trait Reflect {
    fn reflect_type() -> Type;

    fn into_value(self) -> Value;
}

/// Runtime type of `T`.
pub fn type_of<T: Reflect>() -> Type {
    T::reflect_type()
}

/// Runtime value holding `x`.
pub fn value_of<T: Reflect>(x: T) -> Value {
    x.into_value()
}

macro_rules! reflect_scalar {
    ($($t:ty => $kind:ident, $ctor:ident, $conv:ty;)*) => {
        $(
            impl Reflect for $t {
                fn reflect_type() -> Type {
                    predeclared(Kind::$kind)
                }

                fn into_value(self) -> Value {
                    Value::$ctor(&Self::reflect_type(), self as $conv)
                }
            }
        )*
    };
}

reflect_scalar! {
    i8 => Int8, new_int, i64;
    i16 => Int16, new_int, i64;
    i32 => Int32, new_int, i64;
    i64 => Int64, new_int, i64;
    isize => Int, new_int, i64;
    u8 => Uint8, new_uint, u64;
    u16 => Uint16, new_uint, u64;
    u32 => Uint32, new_uint, u64;
    u64 => Uint64, new_uint, u64;
    usize => Uint, new_uint, u64;
    f32 => Float32, new_float, f64;
    f64 => Float64, new_float, f64;
}

impl Reflect for bool {
    fn reflect_type() -> Type {
        predeclared(Kind::Bool)
    }

    fn into_value(self) -> Value {
        Value::new_bool(&Self::reflect_type(), self)
    }
}

impl Reflect for char {
    fn reflect_type() -> Type {
        predeclared(Kind::Int32)
    }

    fn into_value(self) -> Value {
        Value::new_int(&Self::reflect_type(), i64::from(u32::from(self)))
    }
}

impl Reflect for String {
    fn reflect_type() -> Type {
        predeclared(Kind::String)
    }

    fn into_value(self) -> Value {
        Value::new_string(&Self::reflect_type(), &self)
    }
}

impl Reflect for &str {
    fn reflect_type() -> Type {
        predeclared(Kind::String)
    }

    fn into_value(self) -> Value {
        Value::new_string(&Self::reflect_type(), self)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect_type() -> Type {
        slice_of(&T::reflect_type())
    }

    fn into_value(self) -> Value {
        let elems = self.into_iter().map(Reflect::into_value).collect();
        Value::make_slice(&Self::reflect_type(), elems)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect_type() -> Type {
        array_of(N, &T::reflect_type())
    }

    fn into_value(self) -> Value {
        let elems = self.into_iter().map(Reflect::into_value).collect();
        Value::make_array(&Self::reflect_type(), elems)
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn reflect_type() -> Type {
        map_of(&K::reflect_type(), &V::reflect_type())
    }

    fn into_value(self) -> Value {
        let entries = self
            .into_iter()
            .map(|(k, v)| (k.into_value(), v.into_value()))
            .collect();
        Value::make_map(&Self::reflect_type(), entries)
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect_type() -> Type {
        map_of(&K::reflect_type(), &V::reflect_type())
    }

    fn into_value(self) -> Value {
        let entries = self
            .into_iter()
            .map(|(k, v)| (k.into_value(), v.into_value()))
            .collect();
        Value::make_map(&Self::reflect_type(), entries)
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn reflect_type() -> Type {
        pointer_to(&T::reflect_type())
    }

    fn into_value(self) -> Value {
        Value::new_pointer((*self).into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_types() {
        assert_eq!(type_of::<i32>().kind(), Kind::Int32);
        assert_eq!(type_of::<usize>().kind(), Kind::Uint);
        assert_eq!(type_of::<char>(), type_of::<i32>());
        assert_eq!(type_of::<&str>(), type_of::<String>());
        assert_eq!(value_of('A').int(), 65);
        assert_eq!(value_of(u16::MAX).uint(), 65535);
    }

    #[test]
    fn test_composite_types() {
        assert_eq!(type_of::<Vec<Vec<u8>>>().to_string(), "[][]uint8");
        assert_eq!(type_of::<[bool; 2]>().to_string(), "[2]bool");
        assert_eq!(type_of::<BTreeMap<String, f64>>().to_string(), "map[string]float64");
        assert_eq!(type_of::<Box<i64>>().to_string(), "*int64");
    }

    #[test]
    fn test_composite_values() {
        let v = value_of(vec![1i32, 2, 3]);
        assert_eq!(v.len(), 3);
        assert_eq!(v.index(2).int(), 3);

        let m = value_of(BTreeMap::from([("a".to_string(), 1.5f64)]));
        assert_eq!(m.map_index(&value_of("a")).float(), 1.5);

        let p = value_of(Box::new(7u8));
        assert_eq!(p.elem().uint(), 7);
    }
}
