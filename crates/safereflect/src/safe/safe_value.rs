// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value descriptor: total access to one runtime value.

use super::kinds;
use super::{ReflectError, Result, SafeType};
use crate::runtime::{Kind, Value};

/// Total wrapper around a [`Value`].
///
/// Every operation checks the value's kind (and validity) before delegating.
/// The zero value only supports [`is_valid`](Self::is_valid) and
/// [`kind`](Self::kind); everything else returns
/// [`ReflectError::InvalidValue`]. No operation blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SafeValue(Value);

fn field_at(v: &Value, op: &'static str, i: usize) -> Result<Value> {
    match v.kind() {
        Kind::Struct => {
            let count = v.num_field();
            if i < count {
                Ok(v.field(i))
            } else {
                Err(ReflectError::out_of_range(op, i, count))
            }
        }
        actual => Err(ReflectError::wrong_kind(op, kinds::STRUCT, actual)),
    }
}

impl SafeValue {
    pub fn new(v: Value) -> Self {
        Self(v)
    }

    /// The zero value.
    pub fn invalid() -> Self {
        Self(Value::invalid())
    }

    /// Wrapped handle, for operations this API does not cover.
    pub fn reflect_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }

    /// Kind of the value, `Kind::Invalid` for the zero value.
    pub fn kind(&self) -> Kind {
        self.0.kind()
    }

    /// Kind of a valid value.
    pub(crate) fn checked(&self, op: &'static str) -> Result<Kind> {
        match self.0.kind() {
            Kind::Invalid => Err(ReflectError::InvalidValue { op }),
            kind => Ok(kind),
        }
    }

    pub fn ty(&self) -> Result<SafeType> {
        self.checked("Type")?;
        Ok(SafeType::new(self.0.ty()))
    }

    // --- scalars ---

    pub fn bool(&self) -> Result<bool> {
        match self.checked("Bool")? {
            Kind::Bool => Ok(self.0.bool()),
            actual => Err(ReflectError::wrong_kind("Bool", kinds::BOOL, actual)),
        }
    }

    pub fn int(&self) -> Result<i64> {
        match self.checked("Int")? {
            Kind::Int | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 => Ok(self.0.int()),
            actual => Err(ReflectError::wrong_kind("Int", kinds::SIGNED_INTS, actual)),
        }
    }

    pub fn uint(&self) -> Result<u64> {
        match self.checked("Uint")? {
            Kind::Uint
            | Kind::Uint8
            | Kind::Uint16
            | Kind::Uint32
            | Kind::Uint64
            | Kind::Uintptr => Ok(self.0.uint()),
            actual => Err(ReflectError::wrong_kind("Uint", kinds::UNSIGNED_INTS, actual)),
        }
    }

    pub fn float(&self) -> Result<f64> {
        match self.checked("Float")? {
            Kind::Float32 | Kind::Float64 => Ok(self.0.float()),
            actual => Err(ReflectError::wrong_kind("Float", kinds::FLOATS, actual)),
        }
    }

    /// Real and imaginary parts.
    pub fn complex(&self) -> Result<(f64, f64)> {
        match self.checked("Complex")? {
            Kind::Complex64 | Kind::Complex128 => Ok(self.0.complex()),
            actual => Err(ReflectError::wrong_kind("Complex", kinds::COMPLEXES, actual)),
        }
    }

    pub fn str(&self) -> Result<String> {
        match self.checked("String")? {
            Kind::String => Ok(self.0.str()),
            actual => Err(ReflectError::wrong_kind("String", kinds::STRING, actual)),
        }
    }

    // --- containers ---

    /// Length of an array, channel buffer, map, slice or string (in bytes).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Result<usize> {
        match self.checked("Len")? {
            Kind::Array | Kind::Chan | Kind::Map | Kind::Slice | Kind::String => Ok(self.0.len()),
            actual => Err(ReflectError::wrong_kind("Len", kinds::WITH_LEN, actual)),
        }
    }

    pub fn cap(&self) -> Result<usize> {
        match self.checked("Cap")? {
            Kind::Array | Kind::Chan | Kind::Slice => Ok(self.0.cap()),
            actual => Err(ReflectError::wrong_kind("Cap", kinds::WITH_CAP, actual)),
        }
    }

    /// The i'th element of an array or slice, or the i'th byte of a string.
    pub fn index(&self, i: usize) -> Result<SafeValue> {
        match self.checked("Index")? {
            Kind::Array | Kind::Slice | Kind::String => {
                let len = self.0.len();
                if i < len {
                    Ok(Self(self.0.index(i)))
                } else {
                    Err(ReflectError::out_of_range("Index", i, len))
                }
            }
            actual => Err(ReflectError::wrong_kind("Index", kinds::INDEXABLE, actual)),
        }
    }

    /// Value stored under `key`; `None` when the key is absent or the map is
    /// nil.
    pub fn map_index(&self, key: &SafeValue) -> Result<Option<SafeValue>> {
        const OP: &str = "MapIndex";
        match self.checked(OP)? {
            Kind::Map => {
                key.checked(OP)?;
                let (want, got) = (self.0.ty().key(), key.0.ty());
                if !got.assignable_to(&want) {
                    return Err(ReflectError::KeyType {
                        op: OP,
                        expected: want,
                        actual: got,
                    });
                }
                let found = self.0.map_index(&key.0);
                Ok(found.is_valid().then_some(Self(found)))
            }
            actual => Err(ReflectError::wrong_kind(OP, kinds::MAP, actual)),
        }
    }

    /// Keys in insertion order.
    pub fn map_keys(&self) -> Result<Vec<SafeValue>> {
        match self.checked("MapKeys")? {
            Kind::Map => Ok(self.0.map_keys().into_iter().map(Self).collect()),
            actual => Err(ReflectError::wrong_kind("MapKeys", kinds::MAP, actual)),
        }
    }

    // --- structs ---

    pub fn num_field(&self) -> Result<usize> {
        match self.checked("NumField")? {
            Kind::Struct => Ok(self.0.num_field()),
            actual => Err(ReflectError::wrong_kind("NumField", kinds::STRUCT, actual)),
        }
    }

    pub fn field(&self, i: usize) -> Result<SafeValue> {
        self.checked("Field")?;
        field_at(&self.0, "Field", i).map(Self)
    }

    /// Nested field, stepping through embedded pointers to structs. A nil
    /// embedded pointer on the path yields [`ReflectError::NilValue`].
    pub fn field_by_index(&self, index: &[usize]) -> Result<SafeValue> {
        const OP: &str = "FieldByIndex";
        self.checked(OP)?;
        let Some((&first, rest)) = index.split_first() else {
            return Err(ReflectError::EmptyIndexPath { op: OP });
        };
        let mut v = field_at(&self.0, OP, first)?;
        for &i in rest {
            if v.kind() == Kind::Pointer && v.ty().elem().kind() == Kind::Struct {
                if v.is_nil() {
                    return Err(ReflectError::NilValue {
                        op: OP,
                        kind: Kind::Pointer,
                    });
                }
                v = v.elem();
            }
            v = field_at(&v, OP, i)?;
        }
        Ok(Self(v))
    }

    /// Field with the given name, including promoted fields. `None` for
    /// non-struct values, missing names, and fields behind a nil embedded
    /// pointer.
    pub fn field_by_name(&self, name: &str) -> Option<SafeValue> {
        if self.kind() != Kind::Struct {
            return None;
        }
        let field = self.0.ty().field_by_name(name)?;
        self.field_by_index(&field.index).ok()
    }

    // --- indirection ---

    /// Value an interface holds or a pointer points to. A nil interface or
    /// pointer yields the zero value.
    pub fn elem(&self) -> Result<SafeValue> {
        match self.checked("Elem")? {
            Kind::Interface | Kind::Pointer => Ok(Self(self.0.elem())),
            actual => Err(ReflectError::wrong_kind("Elem", kinds::INDIRECT, actual)),
        }
    }

    pub fn is_nil(&self) -> Result<bool> {
        match self.checked("IsNil")? {
            Kind::Chan
            | Kind::Func
            | Kind::Interface
            | Kind::Map
            | Kind::Pointer
            | Kind::Slice
            | Kind::UnsafePointer => Ok(self.0.is_nil()),
            actual => Err(ReflectError::wrong_kind("IsNil", kinds::NILABLE, actual)),
        }
    }

    pub fn is_zero(&self) -> Result<bool> {
        self.checked("IsZero")?;
        Ok(self.0.is_zero())
    }

    // --- invocation ---

    /// Call a function value. Arguments are checked against the signature
    /// first; trailing arguments of a variadic function are packed into its
    /// final slice parameter. Results the implementation returns are checked
    /// against the declared outputs ([`ReflectError::ResultCount`],
    /// [`ReflectError::ResultType`]).
    pub fn call(&self, args: &[SafeValue]) -> Result<Vec<SafeValue>> {
        const OP: &str = "Call";
        match self.checked(OP)? {
            Kind::Func => {}
            actual => return Err(ReflectError::wrong_kind(OP, kinds::FUNC, actual)),
        }
        let Some(imp) = self.0.func_impl() else {
            return Err(ReflectError::NilValue {
                op: OP,
                kind: Kind::Func,
            });
        };

        let sig = self.0.ty();
        let (num_in, variadic) = (sig.num_in(), sig.is_variadic());
        let fixed = if variadic { num_in - 1 } else { num_in };
        if args.len() < fixed || (!variadic && args.len() > fixed) {
            return Err(ReflectError::ArgumentCount {
                op: OP,
                expected: fixed,
                variadic,
                got: args.len(),
            });
        }

        for (index, arg) in args.iter().enumerate() {
            arg.checked(OP)?;
            let param = if index < fixed {
                sig.input(index)
            } else {
                sig.input(fixed).elem()
            };
            let actual = arg.0.ty();
            if !actual.assignable_to(&param) {
                return Err(ReflectError::ArgumentType {
                    op: OP,
                    index,
                    expected: param,
                    actual,
                });
            }
        }

        let mut converted: Vec<Value> = args[..fixed]
            .iter()
            .enumerate()
            .map(|(i, a)| a.0.clone().assign_to(&sig.input(i), OP))
            .collect();
        if variadic {
            let tail = args[fixed..].iter().map(|a| a.0.clone()).collect();
            converted.push(Value::make_slice(&sig.input(fixed), tail));
        }

        let results = imp.invoke(&converted);
        if results.len() != sig.num_out() {
            return Err(ReflectError::ResultCount {
                op: OP,
                expected: sig.num_out(),
                got: results.len(),
            });
        }
        let mut out = Vec::with_capacity(results.len());
        for (index, r) in results.into_iter().enumerate() {
            let expected = sig.output(index);
            let actual = r.is_valid().then(|| r.ty());
            if !actual.as_ref().is_some_and(|t| t.assignable_to(&expected)) {
                return Err(ReflectError::ResultType {
                    op: OP,
                    index,
                    expected,
                    actual,
                });
            }
            out.push(Self(r.assign_to(&expected, OP)));
        }
        Ok(out)
    }

    pub fn num_method(&self) -> Result<usize> {
        self.checked("NumMethod")?;
        Ok(self.0.num_method())
    }

    fn check_receiver(&self, op: &'static str) -> Result<()> {
        if self.kind() == Kind::Interface && self.0.is_nil() {
            return Err(ReflectError::NilValue {
                op,
                kind: Kind::Interface,
            });
        }
        Ok(())
    }

    /// The i'th method bound to this value.
    ///
    /// On an interface value the method is looked up on the dynamic value.
    /// The interface's method set includes unexported methods, which the
    /// dynamic value does not expose: for those the result is `Ok` holding
    /// an invalid `SafeValue` (check [`is_valid`](Self::is_valid)), where
    /// [`method_by_name`](Self::method_by_name) returns `Ok(None)`.
    pub fn method(&self, i: usize) -> Result<SafeValue> {
        self.checked("Method")?;
        let count = self.0.num_method();
        if i >= count {
            return Err(ReflectError::out_of_range("Method", i, count));
        }
        self.check_receiver("Method")?;
        Ok(Self(self.0.method(i)))
    }

    /// Method with the given name bound to this value. `Ok(None)` when the
    /// method set has no such method, or when an interface value's dynamic
    /// value does not expose it.
    pub fn method_by_name(&self, name: &str) -> Result<Option<SafeValue>> {
        self.checked("MethodByName")?;
        if self.0.ty().method_by_name(name).is_none() {
            return Ok(None);
        }
        self.check_receiver("MethodByName")?;
        let bound = self.0.method_by_name(name);
        Ok(bound.is_valid().then_some(Self(bound)))
    }

    // --- channels ---

    fn ready_chan(&self, op: &'static str, send: bool) -> Result<()> {
        match self.checked(op)? {
            Kind::Chan => {}
            actual => return Err(ReflectError::wrong_kind(op, kinds::CHAN, actual)),
        }
        let dir = self.0.ty().chan_dir();
        if (send && !dir.can_send()) || (!send && !dir.can_recv()) {
            return Err(ReflectError::ChannelDirection { op, dir });
        }
        if self.0.is_nil() {
            return Err(ReflectError::NilValue {
                op,
                kind: Kind::Chan,
            });
        }
        Ok(())
    }

    /// Send without blocking. `Ok(false)` when the buffer is full (or, for
    /// an unbuffered channel, no receiver is waiting).
    pub fn try_send(&self, v: &SafeValue) -> Result<bool> {
        const OP: &str = "TrySend";
        self.ready_chan(OP, true)?;
        v.checked(OP)?;
        let (want, got) = (self.0.ty().elem(), v.0.ty());
        if !got.assignable_to(&want) {
            return Err(ReflectError::ArgumentType {
                op: OP,
                index: 0,
                expected: want,
                actual: got,
            });
        }
        Ok(self.0.try_send(v.0.clone()))
    }

    /// Receive without blocking. `Ok(None)` when nothing is ready.
    pub fn try_recv(&self) -> Result<Option<SafeValue>> {
        self.ready_chan("TryRecv", false)?;
        Ok(self.0.try_recv().map(Self))
    }
}

impl From<Value> for SafeValue {
    fn from(v: Value) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{chan_of, type_of, value_of, ChanDir, FuncBuilder, StructBuilder};

    #[test]
    fn test_invalid_value_fails_everything() {
        let v = SafeValue::invalid();
        assert!(!v.is_valid());
        assert_eq!(v.kind(), Kind::Invalid);
        assert_eq!(v.ty(), Err(ReflectError::InvalidValue { op: "Type" }));
        assert_eq!(v.int(), Err(ReflectError::InvalidValue { op: "Int" }));
        assert_eq!(v.is_zero(), Err(ReflectError::InvalidValue { op: "IsZero" }));
        assert_eq!(v.num_method(), Err(ReflectError::InvalidValue { op: "NumMethod" }));
        assert_eq!(v.field_by_name("X"), None);
    }

    #[test]
    fn test_index_boundary() {
        let v = SafeValue::new(value_of(vec![10i32, 20]));
        assert_eq!(v.index(1).and_then(|e| e.int()), Ok(20));
        assert_eq!(
            v.index(2),
            Err(ReflectError::IndexOutOfRange {
                op: "Index",
                index: 2,
                len: 2
            })
        );
    }

    #[test]
    fn test_map_index_key_type() {
        let m = SafeValue::new(value_of(std::collections::BTreeMap::from([(1i32, true)])));
        assert_eq!(
            m.map_index(&SafeValue::new(value_of(1i32))).map(|v| v.map(|b| b.bool())),
            Ok(Some(Ok(true)))
        );
        assert_eq!(m.map_index(&SafeValue::new(value_of(2i32))), Ok(None));
        let err = m.map_index(&SafeValue::new(value_of("1"))).unwrap_err();
        assert!(matches!(err, ReflectError::KeyType { op: "MapIndex", .. }));
    }

    #[test]
    fn test_nil_embedded_pointer() {
        let base = crate::runtime::NamedTypeBuilder::new(
            "example.com/geo",
            "Base",
            &StructBuilder::new("example.com/geo")
                .field("ID", &type_of::<u64>())
                .build(),
        )
        .build();
        let outer = StructBuilder::new("example.com/geo")
            .embedded(&crate::runtime::pointer_to(&base))
            .build();
        let v = SafeValue::new(Value::zero(&outer));
        assert_eq!(
            v.field_by_index(&[0, 0]),
            Err(ReflectError::NilValue {
                op: "FieldByIndex",
                kind: Kind::Pointer
            })
        );
        assert_eq!(v.field_by_name("ID"), None);
        assert!(v.field_by_name("Base").is_some());
    }

    #[test]
    fn test_call_argument_checks() {
        let sig = FuncBuilder::new()
            .input(&type_of::<i64>())
            .variadic(&type_of::<String>())
            .output(&type_of::<usize>())
            .build();
        let f = SafeValue::new(Value::make_func(&sig, |args: &[Value]| {
            vec![value_of(args[1].len())]
        }));

        let n = SafeValue::new(value_of(1i64));
        let s = SafeValue::new(value_of("a"));
        assert_eq!(
            f.call(&[n.clone(), s.clone(), s.clone()])
                .map(|out| out[0].uint()),
            Ok(Ok(2))
        );
        assert!(matches!(
            f.call(&[]),
            Err(ReflectError::ArgumentCount {
                expected: 1,
                variadic: true,
                got: 0,
                ..
            })
        ));
        assert!(matches!(
            f.call(&[n.clone(), n.clone()]),
            Err(ReflectError::ArgumentType { index: 1, .. })
        ));
        assert_eq!(
            f.call(&[n, SafeValue::invalid()]),
            Err(ReflectError::InvalidValue { op: "Call" })
        );

        let nil = SafeValue::new(Value::zero(&sig));
        assert_eq!(
            nil.call(&[]),
            Err(ReflectError::NilValue {
                op: "Call",
                kind: Kind::Func
            })
        );
    }

    #[test]
    fn test_call_checks_results() {
        let sig = FuncBuilder::new().output(&type_of::<i64>()).build();

        let none = SafeValue::new(Value::make_func(&sig, |_: &[Value]| Vec::new()));
        assert_eq!(
            none.call(&[]),
            Err(ReflectError::ResultCount {
                op: "Call",
                expected: 1,
                got: 0
            })
        );

        let wrong = SafeValue::new(Value::make_func(&sig, |_: &[Value]| vec![value_of("x")]));
        assert_eq!(
            wrong.call(&[]),
            Err(ReflectError::ResultType {
                op: "Call",
                index: 0,
                expected: type_of::<i64>(),
                actual: Some(type_of::<String>())
            })
        );

        let zero = SafeValue::new(Value::make_func(&sig, |_: &[Value]| vec![Value::invalid()]));
        assert!(matches!(
            zero.call(&[]),
            Err(ReflectError::ResultType { actual: None, .. })
        ));

        let ok = SafeValue::new(Value::make_func(&sig, |_: &[Value]| vec![value_of(5i64)]));
        assert_eq!(ok.call(&[]).map(|out| out[0].int()), Ok(Ok(5)));
    }

    #[test]
    fn test_channel_checks() {
        let both = chan_of(ChanDir::Both, &type_of::<u8>());
        let ch = SafeValue::new(Value::make_chan(&both, 1));
        let byte = SafeValue::new(value_of(7u8));
        assert_eq!(ch.try_recv(), Ok(None));
        assert_eq!(ch.try_send(&byte), Ok(true));
        assert_eq!(ch.try_send(&byte), Ok(false));
        assert!(matches!(
            ch.try_send(&SafeValue::new(value_of(7i32))),
            Err(ReflectError::ArgumentType { op: "TrySend", .. })
        ));
        assert_eq!(ch.try_recv(), Ok(Some(byte)));

        let recv_only = chan_of(ChanDir::Recv, &type_of::<u8>());
        let view = SafeValue::new(Value::zero(&recv_only));
        assert_eq!(
            view.try_send(&SafeValue::new(value_of(1u8))),
            Err(ReflectError::ChannelDirection {
                op: "TrySend",
                dir: ChanDir::Recv
            })
        );
        assert_eq!(
            view.try_recv(),
            Err(ReflectError::NilValue {
                op: "TryRecv",
                kind: Kind::Chan
            })
        );
    }
}
