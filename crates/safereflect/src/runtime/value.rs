// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime values.
//!
//! A [`Value`] pairs a [`Type`] with immutable data. Values are cheap to clone:
//! composite payloads are shared behind `Arc`. The only mutable state a value
//! can reach is the buffer of a channel.
//!
//! Like [`Type`], most accessors are only defined for some kinds and panic
//! otherwise. The zero `Value` (see [`Value::invalid`]) represents "no value";
//! only [`is_valid`](Value::is_valid) and [`kind`](Value::kind) accept it.

use super::types::Shape;
use super::{func_of, Kind, Type};
use crossbeam::channel::{self, Receiver, Sender, TryRecvError, TrySendError};
use std::fmt;
use std::sync::Arc;

/// Implementation of a function value.
///
/// Receives arguments already converted to the parameter types (with a
/// variadic tail packed into a slice) and returns one value per result.
#[derive(Clone)]
pub struct Func {
    imp: Arc<dyn Fn(&[Value]) -> Vec<Value> + Send + Sync>,
    /// Receiver and method implementation of a bound method.
    binding: Option<Arc<(Value, Func)>>,
}

impl Func {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        Self {
            imp: Arc::new(f),
            binding: None,
        }
    }

    /// `method` with `recv` prepended to every argument list.
    pub(crate) fn bound(recv: Value, method: Func) -> Self {
        let (r, m) = (recv.clone(), method.clone());
        let imp = move |args: &[Value]| {
            let mut full = Vec::with_capacity(args.len() + 1);
            full.push(r.clone());
            full.extend_from_slice(args);
            m.invoke(&full)
        };
        Self {
            imp: Arc::new(imp),
            binding: Some(Arc::new((recv, method))),
        }
    }

    /// Run the function without any argument or result checking.
    pub fn invoke(&self, args: &[Value]) -> Vec<Value> {
        (self.imp)(args)
    }

    /// Whether both handles run the same implementation. Bound methods are
    /// the same when they bind equal receivers to the same method.
    pub fn same_func(&self, other: &Func) -> bool {
        match (&self.binding, &other.binding) {
            (Some(a), Some(b)) => a.1.same_func(&b.1) && a.0 == b.0,
            (None, None) => Arc::ptr_eq(&self.imp, &other.imp),
            _ => false,
        }
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding {
            Some(b) => write!(f, "Func(bound {:?})", b.1),
            None => write!(f, "Func({:p})", Arc::as_ptr(&self.imp)),
        }
    }
}

/// Channel buffer shared by every copy of a channel value.
#[derive(Clone)]
pub(crate) struct Chan {
    tx: Sender<Value>,
    rx: Receiver<Value>,
}

impl Chan {
    fn with_capacity(cap: usize) -> Self {
        let (tx, rx) = channel::bounded(cap);
        Self { tx, rx }
    }

    fn same_channel(&self, other: &Chan) -> bool {
        self.tx.same_channel(&other.tx)
    }
}

impl fmt::Debug for Chan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chan")
            .field("len", &self.rx.len())
            .field("cap", &self.tx.capacity().unwrap_or(0))
            .finish()
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Data {
    None,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(f64, f64),
    Str(Arc<str>),
    Array(Arc<[Value]>),
    Slice(Option<Arc<[Value]>>),
    /// Entries in insertion order.
    Map(Option<Arc<[(Value, Value)]>>),
    Pointer(Option<Arc<Value>>),
    Struct(Arc<[Value]>),
    /// Dynamic value held by an interface.
    Interface(Option<Arc<Value>>),
    Func(Option<Func>),
    Chan(Option<Chan>),
    UnsafePointer(usize),
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Data::None, Data::None) => true,
            (Data::Bool(a), Data::Bool(b)) => a == b,
            (Data::Int(a), Data::Int(b)) => a == b,
            (Data::Uint(a), Data::Uint(b)) => a == b,
            (Data::Float(a), Data::Float(b)) => a == b,
            (Data::Complex(ar, ai), Data::Complex(br, bi)) => ar == br && ai == bi,
            (Data::Str(a), Data::Str(b)) => a == b,
            (Data::Array(a), Data::Array(b)) | (Data::Struct(a), Data::Struct(b)) => a == b,
            (Data::Slice(a), Data::Slice(b)) => a == b,
            (Data::Map(a), Data::Map(b)) => a == b,
            (Data::Pointer(a), Data::Pointer(b)) => match (a, b) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            },
            (Data::Interface(a), Data::Interface(b)) => a == b,
            (Data::Func(a), Data::Func(b)) => match (a, b) {
                (Some(a), Some(b)) => a.same_func(b),
                (None, None) => true,
                _ => false,
            },
            (Data::Chan(a), Data::Chan(b)) => match (a, b) {
                (Some(a), Some(b)) => a.same_channel(b),
                (None, None) => true,
                _ => false,
            },
            (Data::UnsafePointer(a), Data::UnsafePointer(b)) => a == b,
            _ => false,
        }
    }
}

/// Handle to a runtime value.
#[derive(Clone)]
pub struct Value {
    typ: Option<Type>,
    data: Data,
}

fn truncate_int(v: i64, size: usize) -> i64 {
    let shift = 64 - (size * 8).min(64) as u32;
    (v << shift) >> shift
}

fn truncate_uint(v: u64, size: usize) -> u64 {
    let bits = size * 8;
    if bits >= 64 {
        v
    } else {
        v & ((1u64 << bits) - 1)
    }
}

fn round_float(v: f64, kind: Kind) -> f64 {
    if matches!(kind, Kind::Float32 | Kind::Complex64) {
        v as f32 as f64
    } else {
        v
    }
}

// Construction.
impl Value {
    /// The zero `Value`: no type, kind `Invalid`.
    pub const fn invalid() -> Self {
        Self {
            typ: None,
            data: Data::None,
        }
    }

    fn typed(t: &Type, data: Data) -> Self {
        Self {
            typ: Some(t.clone()),
            data,
        }
    }

    fn expect_kind(t: &Type, op: &str, ok: bool) {
        if !ok {
            panic!("reflect.{}: invalid type {} ({})", op, t, t.kind());
        }
    }

    /// Zero value of `t`.
    pub fn zero(t: &Type) -> Self {
        let data = match t.shape() {
            Shape::Basic => match t.kind() {
                Kind::Bool => Data::Bool(false),
                k if k.is_signed_int() => Data::Int(0),
                k if k.is_unsigned_int() => Data::Uint(0),
                k if k.is_float() => Data::Float(0.0),
                k if k.is_complex() => Data::Complex(0.0, 0.0),
                Kind::String => Data::Str(Arc::from("")),
                _ => Data::UnsafePointer(0),
            },
            Shape::Array { elem, len } => {
                Data::Array((0..*len).map(|_| Value::zero(elem)).collect())
            }
            Shape::Struct { fields } => {
                Data::Struct(fields.iter().map(|f| Value::zero(&f.typ)).collect())
            }
            Shape::Chan { .. } => Data::Chan(None),
            Shape::Func { .. } => Data::Func(None),
            Shape::Interface { .. } => Data::Interface(None),
            Shape::Map { .. } => Data::Map(None),
            Shape::Pointer { .. } => Data::Pointer(None),
            Shape::Slice { .. } => Data::Slice(None),
        };
        Self::typed(t, data)
    }

    /// # Panics
    /// If `t` is not of kind Bool.
    pub fn new_bool(t: &Type, v: bool) -> Self {
        Self::expect_kind(t, "ValueOf", t.kind() == Kind::Bool);
        Self::typed(t, Data::Bool(v))
    }

    /// Signed integer of type `t`, truncated to its width.
    ///
    /// # Panics
    /// If `t` is not a signed integer type.
    pub fn new_int(t: &Type, v: i64) -> Self {
        Self::expect_kind(t, "ValueOf", t.kind().is_signed_int());
        Self::typed(t, Data::Int(truncate_int(v, t.size())))
    }

    /// Unsigned integer of type `t`, truncated to its width.
    ///
    /// # Panics
    /// If `t` is not an unsigned integer type.
    pub fn new_uint(t: &Type, v: u64) -> Self {
        Self::expect_kind(t, "ValueOf", t.kind().is_unsigned_int());
        Self::typed(t, Data::Uint(truncate_uint(v, t.size())))
    }

    /// # Panics
    /// If `t` is not a float type.
    pub fn new_float(t: &Type, v: f64) -> Self {
        Self::expect_kind(t, "ValueOf", t.kind().is_float());
        Self::typed(t, Data::Float(round_float(v, t.kind())))
    }

    /// # Panics
    /// If `t` is not a complex type.
    pub fn new_complex(t: &Type, re: f64, im: f64) -> Self {
        Self::expect_kind(t, "ValueOf", t.kind().is_complex());
        let k = t.kind();
        Self::typed(t, Data::Complex(round_float(re, k), round_float(im, k)))
    }

    /// # Panics
    /// If `t` is not a string type.
    pub fn new_string(t: &Type, v: &str) -> Self {
        Self::expect_kind(t, "ValueOf", t.kind() == Kind::String);
        Self::typed(t, Data::Str(Arc::from(v)))
    }

    /// # Panics
    /// If `t` is not an unsafe pointer type.
    pub fn new_unsafe_pointer(t: &Type, addr: usize) -> Self {
        Self::expect_kind(t, "ValueOf", t.kind() == Kind::UnsafePointer);
        Self::typed(t, Data::UnsafePointer(addr))
    }

    /// Pointer to a fresh copy of `v`, of type `*T` where `T` is `v`'s type.
    ///
    /// # Panics
    /// If `v` is the zero `Value`.
    pub fn new_pointer(v: Value) -> Self {
        let t = super::pointer_to(&v.ty());
        Self::typed(&t, Data::Pointer(Some(Arc::new(v))))
    }

    /// # Panics
    /// If `t` is not an array type, the element count differs from its
    /// length, or an element is not assignable to the element type.
    pub fn make_array(t: &Type, elems: Vec<Value>) -> Self {
        Self::expect_kind(t, "ArrayOf", t.kind() == Kind::Array);
        if elems.len() != t.len() {
            panic!("reflect: array of length {} given {} elements", t.len(), elems.len());
        }
        let elem = t.elem();
        let values = elems.into_iter().map(|v| v.assign_to(&elem, "ArrayOf"));
        Self::typed(t, Data::Array(values.collect()))
    }

    /// Non-nil slice holding `elems`.
    ///
    /// # Panics
    /// If `t` is not a slice type or an element is not assignable to its
    /// element type.
    pub fn make_slice(t: &Type, elems: Vec<Value>) -> Self {
        Self::expect_kind(t, "MakeSlice", t.kind() == Kind::Slice);
        let elem = t.elem();
        let values = elems.into_iter().map(|v| v.assign_to(&elem, "MakeSlice"));
        Self::typed(t, Data::Slice(Some(values.collect())))
    }

    /// Non-nil map holding `entries`. A repeated key keeps its first position
    /// and its last value.
    ///
    /// # Panics
    /// If `t` is not a map type or a key or value has the wrong type.
    pub fn make_map(t: &Type, entries: Vec<(Value, Value)>) -> Self {
        Self::expect_kind(t, "MakeMap", t.kind() == Kind::Map);
        let (key_t, elem_t) = (t.key(), t.elem());
        let mut out: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
        for (k, v) in entries {
            let k = k.assign_to(&key_t, "MakeMap");
            let v = v.assign_to(&elem_t, "MakeMap");
            match out.iter_mut().find(|(existing, _)| *existing == k) {
                Some(slot) => slot.1 = v,
                None => out.push((k, v)),
            }
        }
        Self::typed(t, Data::Map(Some(out.into())))
    }

    /// # Panics
    /// If `t` is not a struct type, the value count differs from its field
    /// count, or a value is not assignable to its field type.
    pub fn make_struct(t: &Type, fields: Vec<Value>) -> Self {
        Self::expect_kind(t, "StructOf", t.kind() == Kind::Struct);
        if fields.len() != t.num_field() {
            panic!(
                "reflect: struct {} has {} fields, given {} values",
                t,
                t.num_field(),
                fields.len()
            );
        }
        let values = fields
            .into_iter()
            .enumerate()
            .map(|(i, v)| v.assign_to(&t.field(i).typ, "StructOf"));
        Self::typed(t, Data::Struct(values.collect()))
    }

    /// Function value of type `t` backed by `f`.
    ///
    /// # Panics
    /// If `t` is not a function type.
    pub fn make_func<F>(t: &Type, f: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        Self::from_func(t, Func::new(f))
    }

    /// # Panics
    /// If `t` is not a function type.
    pub fn from_func(t: &Type, f: Func) -> Self {
        Self::expect_kind(t, "MakeFunc", t.kind() == Kind::Func);
        Self::typed(t, Data::Func(Some(f)))
    }

    /// Channel with a buffer of `cap` elements. `cap == 0` is unbuffered.
    ///
    /// # Panics
    /// If `t` is not a bidirectional channel type.
    pub fn make_chan(t: &Type, cap: usize) -> Self {
        Self::expect_kind(t, "MakeChan", t.kind() == Kind::Chan);
        if t.chan_dir() != super::ChanDir::Both {
            panic!("reflect.MakeChan: unidirectional channel type");
        }
        Self::typed(t, Data::Chan(Some(Chan::with_capacity(cap))))
    }

    /// Value as stored in a slot of type `target`: boxed when `target` is an
    /// interface, otherwise retagged with `target`.
    ///
    /// # Panics
    /// If the value is invalid or not assignable to `target`.
    pub(crate) fn assign_to(self, target: &Type, op: &str) -> Value {
        let Some(own) = self.typ.clone() else {
            panic!("reflect: {} using zero Value argument", op);
        };
        if !own.assignable_to(target) {
            panic!("reflect: {}: value of type {} is not assignable to type {}", op, own, target);
        }
        if own == *target {
            return self;
        }
        if target.kind() == Kind::Interface {
            let dynamic = match self.data {
                Data::Interface(inner) => inner,
                _ => Some(Arc::new(self)),
            };
            return Self::typed(target, Data::Interface(dynamic));
        }
        Self::typed(target, self.data)
    }

    pub(crate) fn func_impl(&self) -> Option<Func> {
        match &self.data {
            Data::Func(f) => f.clone(),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::invalid()
    }
}

// Inspection.
impl Value {
    fn unsupported(&self, op: &str) -> ! {
        if self.typ.is_none() {
            panic!("reflect: call of reflect.Value.{} on zero Value", op);
        }
        panic!("reflect: call of reflect.Value.{} on {} Value", op, self.kind());
    }

    pub fn is_valid(&self) -> bool {
        self.typ.is_some()
    }

    /// Kind of the value's type, `Kind::Invalid` for the zero `Value`.
    pub fn kind(&self) -> Kind {
        self.typ.as_ref().map_or(Kind::Invalid, Type::kind)
    }

    /// # Panics
    /// On the zero `Value`.
    pub fn ty(&self) -> Type {
        match &self.typ {
            Some(t) => t.clone(),
            None => self.unsupported("Type"),
        }
    }

    /// # Panics
    /// If the kind is not Bool.
    pub fn bool(&self) -> bool {
        match self.data {
            Data::Bool(b) => b,
            _ => self.unsupported("Bool"),
        }
    }

    /// # Panics
    /// If the kind is not a signed integer kind.
    pub fn int(&self) -> i64 {
        match self.data {
            Data::Int(v) => v,
            _ => self.unsupported("Int"),
        }
    }

    /// # Panics
    /// If the kind is not an unsigned integer kind.
    pub fn uint(&self) -> u64 {
        match self.data {
            Data::Uint(v) => v,
            _ => self.unsupported("Uint"),
        }
    }

    /// # Panics
    /// If the kind is not Float32 or Float64.
    pub fn float(&self) -> f64 {
        match self.data {
            Data::Float(v) => v,
            _ => self.unsupported("Float"),
        }
    }

    /// Real and imaginary parts.
    ///
    /// # Panics
    /// If the kind is not Complex64 or Complex128.
    pub fn complex(&self) -> (f64, f64) {
        match self.data {
            Data::Complex(re, im) => (re, im),
            _ => self.unsupported("Complex"),
        }
    }

    /// Contents of a string value. Other kinds render as `<T Value>` rather
    /// than panicking.
    pub fn str(&self) -> String {
        match (&self.data, &self.typ) {
            (Data::Str(s), _) => s.to_string(),
            (_, Some(t)) => format!("<{} Value>", t),
            (_, None) => "<invalid Value>".to_string(),
        }
    }

    /// Length. For a channel, the number of queued elements.
    ///
    /// # Panics
    /// If the kind is not Array, Chan, Map, Slice or String.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match &self.data {
            Data::Array(elems) => elems.len(),
            Data::Slice(elems) => elems.as_ref().map_or(0, |e| e.len()),
            Data::Map(entries) => entries.as_ref().map_or(0, |e| e.len()),
            Data::Str(s) => s.len(),
            Data::Chan(ch) => ch.as_ref().map_or(0, |c| c.rx.len()),
            _ => self.unsupported("Len"),
        }
    }

    /// Capacity. For slices this equals the length.
    ///
    /// # Panics
    /// If the kind is not Array, Chan or Slice.
    pub fn cap(&self) -> usize {
        match &self.data {
            Data::Array(elems) => elems.len(),
            Data::Slice(elems) => elems.as_ref().map_or(0, |e| e.len()),
            Data::Chan(ch) => ch.as_ref().and_then(|c| c.tx.capacity()).unwrap_or(0),
            _ => self.unsupported("Cap"),
        }
    }

    /// The i'th element. For strings, the i'th byte as a `uint8`.
    ///
    /// # Panics
    /// If the kind is not Array, Slice or String, or `i` is out of range.
    pub fn index(&self, i: usize) -> Value {
        match &self.data {
            Data::Array(elems) => match elems.get(i) {
                Some(v) => v.clone(),
                None => panic!("reflect: array index out of range"),
            },
            Data::Slice(elems) => match elems.as_ref().and_then(|e| e.get(i)) {
                Some(v) => v.clone(),
                None => panic!("reflect: slice index out of range"),
            },
            Data::Str(s) => match s.as_bytes().get(i) {
                Some(b) => Value::typed(&super::type_of::<u8>(), Data::Uint(u64::from(*b))),
                None => panic!("reflect: string index out of range"),
            },
            _ => self.unsupported("Index"),
        }
    }

    fn entries(&self, op: &str) -> &[(Value, Value)] {
        match &self.data {
            Data::Map(entries) => entries.as_deref().unwrap_or(&[]),
            _ => self.unsupported(op),
        }
    }

    /// Value stored under `key`, or the zero `Value` if absent.
    ///
    /// # Panics
    /// If the kind is not Map, or `key` is not assignable to the key type.
    pub fn map_index(&self, key: &Value) -> Value {
        let entries = self.entries("MapIndex");
        let key = key.clone().assign_to(&self.ty().key(), "Value.MapIndex");
        entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    /// Keys in insertion order.
    ///
    /// # Panics
    /// If the kind is not Map.
    pub fn map_keys(&self) -> Vec<Value> {
        self.entries("MapKeys").iter().map(|(k, _)| k.clone()).collect()
    }

    /// Key/value pairs in insertion order.
    ///
    /// # Panics
    /// If the kind is not Map.
    pub fn map_entries(&self) -> Vec<(Value, Value)> {
        self.entries("MapRange").to_vec()
    }

    fn struct_values(&self, op: &str) -> &[Value] {
        match &self.data {
            Data::Struct(values) => values,
            _ => self.unsupported(op),
        }
    }

    /// # Panics
    /// If the kind is not Struct.
    pub fn num_field(&self) -> usize {
        self.struct_values("NumField").len()
    }

    /// The i'th field.
    ///
    /// # Panics
    /// If the kind is not Struct or `i` is out of range.
    pub fn field(&self, i: usize) -> Value {
        match self.struct_values("Field").get(i) {
            Some(v) => v.clone(),
            None => panic!("reflect: Field index out of range"),
        }
    }

    /// Nested field, stepping through embedded pointers to structs.
    ///
    /// # Panics
    /// If a step is not a struct, an index is out of range, a traversed
    /// embedded pointer is nil, or `index` is empty.
    pub fn field_by_index(&self, index: &[usize]) -> Value {
        let Some((&first, rest)) = index.split_first() else {
            panic!("reflect: FieldByIndex with empty index");
        };
        let mut v = self.field(first);
        for &x in rest {
            if v.kind() == Kind::Pointer && v.ty().elem().kind() == Kind::Struct {
                if v.is_nil() {
                    panic!("reflect: indirection through nil pointer to embedded struct");
                }
                v = v.elem();
            }
            v = v.field(x);
        }
        v
    }

    /// Field with the given name, or the zero `Value` if there is none.
    ///
    /// # Panics
    /// If the kind is not Struct.
    pub fn field_by_name(&self, name: &str) -> Value {
        self.struct_values("FieldByName");
        match self.ty().field_by_name(name) {
            Some(f) => self.field_by_index(&f.index),
            None => Value::invalid(),
        }
    }

    /// Value an interface holds or a pointer points to. The zero `Value` when
    /// either is nil.
    ///
    /// # Panics
    /// If the kind is not Interface or Pointer.
    pub fn elem(&self) -> Value {
        match &self.data {
            Data::Interface(inner) | Data::Pointer(inner) => {
                inner.as_deref().cloned().unwrap_or_default()
            }
            _ => self.unsupported("Elem"),
        }
    }

    /// # Panics
    /// If the kind is not Chan, Func, Interface, Map, Pointer, Slice or
    /// UnsafePointer.
    pub fn is_nil(&self) -> bool {
        match &self.data {
            Data::Chan(c) => c.is_none(),
            Data::Func(f) => f.is_none(),
            Data::Interface(v) | Data::Pointer(v) => v.is_none(),
            Data::Map(m) => m.is_none(),
            Data::Slice(s) => s.is_none(),
            Data::UnsafePointer(addr) => *addr == 0,
            _ => self.unsupported("IsNil"),
        }
    }

    /// Whether the value is the zero value of its type. Negative zero floats
    /// are not zero.
    ///
    /// # Panics
    /// On the zero `Value`.
    pub fn is_zero(&self) -> bool {
        match &self.data {
            Data::None => self.unsupported("IsZero"),
            Data::Bool(b) => !b,
            Data::Int(v) => *v == 0,
            Data::Uint(v) => *v == 0,
            Data::Float(v) => v.to_bits() == 0,
            Data::Complex(re, im) => re.to_bits() == 0 && im.to_bits() == 0,
            Data::Str(s) => s.is_empty(),
            Data::Array(values) | Data::Struct(values) => values.iter().all(Value::is_zero),
            Data::UnsafePointer(addr) => *addr == 0,
            _ => self.is_nil(),
        }
    }
}

// Invocation.
impl Value {
    /// Call a function value.
    ///
    /// Arguments are converted to the parameter types. For a variadic
    /// function the trailing arguments are packed into the final slice
    /// parameter.
    ///
    /// # Panics
    /// If the kind is not Func, the function is nil, an argument is invalid
    /// or not assignable, the argument count is wrong, or the implementation
    /// returns results that do not match the signature.
    pub fn call(&self, args: &[Value]) -> Vec<Value> {
        let f = match &self.data {
            Data::Func(Some(f)) => f.clone(),
            Data::Func(None) => panic!("reflect: call of nil function"),
            _ => self.unsupported("Call"),
        };
        let t = self.ty();
        let (ins, outs, variadic) = t.func_shape("Call");

        let fixed = if variadic { ins.len() - 1 } else { ins.len() };
        if args.len() < fixed {
            panic!("reflect: Call with too few input arguments");
        }
        if !variadic && args.len() > fixed {
            panic!("reflect: Call with too many input arguments");
        }

        let mut converted: Vec<Value> = args[..fixed]
            .iter()
            .zip(ins)
            .map(|(arg, param)| arg.clone().assign_to(param, "Call"))
            .collect();
        if variadic {
            let slice_t = &ins[fixed];
            let tail = args[fixed..].to_vec();
            converted.push(Value::make_slice(slice_t, tail));
        }

        let results = f.invoke(&converted);
        if results.len() != outs.len() {
            panic!(
                "reflect: function returned {} results, want {}",
                results.len(),
                outs.len()
            );
        }
        results
            .into_iter()
            .zip(outs)
            .map(|(r, out)| r.assign_to(out, "Call"))
            .collect()
    }

    /// Number of methods in the value's method set.
    ///
    /// # Panics
    /// On the zero `Value`.
    pub fn num_method(&self) -> usize {
        self.ty().num_method()
    }

    /// The i'th method bound to this receiver, as a function value without
    /// the receiver parameter. On an interface value the method is looked up
    /// on the dynamic value; the zero `Value` when it is unexported there.
    ///
    /// # Panics
    /// On the zero `Value`, if `i` is out of range, or if the value is a nil
    /// interface.
    pub fn method(&self, i: usize) -> Value {
        let t = self.ty();
        if i >= t.num_method() {
            panic!("reflect: Method index out of range");
        }
        let m = t.method(i);
        self.bind(&m.name, &m.func)
    }

    /// Method with the given name bound to this receiver, or the zero `Value`.
    ///
    /// # Panics
    /// On the zero `Value`, or if the value is a nil interface and the method
    /// exists.
    pub fn method_by_name(&self, name: &str) -> Value {
        match self.ty().method_by_name(name) {
            Some(m) => self.bind(&m.name, &m.func),
            None => Value::invalid(),
        }
    }

    fn bind(&self, name: &str, imp: &Value) -> Value {
        if self.kind() == Kind::Interface {
            let dynamic = self.elem();
            if !dynamic.is_valid() {
                panic!("reflect: Method on nil interface value");
            }
            // Unexported interface methods have no accessible implementation.
            return dynamic.method_by_name(name);
        }

        let Some(func) = imp.func_impl() else {
            panic!("reflect: method {} has no implementation", name);
        };
        let sig = imp.ty();
        let (ins, outs, variadic) = sig.func_shape("Method");
        let bound_t = func_of(&ins[1..], outs, variadic);
        Value::from_func(&bound_t, Func::bound(self.clone(), func))
    }
}

// Channels.
impl Value {
    fn chan(&self, op: &str, send: bool) -> &Chan {
        let Data::Chan(ch) = &self.data else {
            self.unsupported(op);
        };
        let dir = self.ty().chan_dir();
        if send && !dir.can_send() {
            panic!("reflect: send on recv-only channel");
        }
        if !send && !dir.can_recv() {
            panic!("reflect: recv on send-only channel");
        }
        match ch {
            Some(ch) => ch,
            None => panic!("reflect: {} on nil channel", op),
        }
    }

    /// Send `v`, blocking until buffer space or a receiver is available.
    ///
    /// # Panics
    /// If the kind is not Chan, the channel is nil or receive-only, or `v`
    /// is not assignable to the element type.
    pub fn send(&self, v: Value) {
        let ch = self.chan("Send", true);
        let v = v.assign_to(&self.ty().elem(), "Value.Send");
        // Both ends live in `ch`, so the channel never disconnects.
        let _ = ch.tx.send(v);
    }

    /// Receive a value, blocking until one is available.
    ///
    /// # Panics
    /// If the kind is not Chan, or the channel is nil or send-only.
    pub fn recv(&self) -> Value {
        let ch = self.chan("Recv", false);
        ch.rx.recv().unwrap_or_default()
    }

    /// Send without blocking. Returns whether the value was sent.
    ///
    /// # Panics
    /// Same conditions as [`send`](Self::send).
    pub fn try_send(&self, v: Value) -> bool {
        let ch = self.chan("TrySend", true);
        let v = v.assign_to(&self.ty().elem(), "Value.TrySend");
        match ch.tx.try_send(v) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }

    /// Receive without blocking. `None` when nothing is ready.
    ///
    /// # Panics
    /// Same conditions as [`recv`](Self::recv).
    pub fn try_recv(&self) -> Option<Value> {
        let ch = self.chan("TryRecv", false);
        match ch.rx.try_recv() {
            Ok(v) => Some(v),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ && self.data == other.data
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.typ {
            None => f.write_str("Value(<invalid>)"),
            Some(t) => f
                .debug_tuple("Value")
                .field(&format_args!("{}", t))
                .field(&self.data)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{chan_of, map_of, type_of, value_of, ChanDir, FuncBuilder};

    #[test]
    fn test_zero_values() {
        assert!(!Value::invalid().is_valid());
        assert_eq!(Value::invalid().kind(), Kind::Invalid);

        let z = Value::zero(&type_of::<[i32; 3]>());
        assert_eq!(z.len(), 3);
        assert!(z.is_zero());

        let s = Value::zero(&type_of::<Vec<u8>>());
        assert!(s.is_nil());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn test_int_truncation() {
        let v = Value::new_int(&type_of::<i8>(), 300);
        assert_eq!(v.int(), 44);
        let u = Value::new_uint(&type_of::<u8>(), 0x1ff);
        assert_eq!(u.uint(), 0xff);
    }

    #[test]
    fn test_negative_zero_is_not_zero() {
        assert!(!value_of(-0.0f64).is_zero());
        assert!(value_of(0.0f64).is_zero());
    }

    #[test]
    fn test_string_index_yields_bytes() {
        let v = value_of("hé");
        assert_eq!(v.len(), 3);
        let b = v.index(1);
        assert_eq!(b.kind(), Kind::Uint8);
        assert_eq!(b.uint(), 0xc3);
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let t = map_of(&type_of::<String>(), &type_of::<i64>());
        let m = Value::make_map(
            &t,
            vec![
                (value_of("b"), value_of(2i64)),
                (value_of("a"), value_of(1i64)),
                (value_of("b"), value_of(3i64)),
            ],
        );
        let keys: Vec<String> = m.map_keys().iter().map(Value::str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(m.map_index(&value_of("b")).int(), 3);
        assert!(!m.map_index(&value_of("zz")).is_valid());
    }

    #[test]
    fn test_variadic_call_packs_tail() {
        let sig = FuncBuilder::new()
            .input(&type_of::<String>())
            .variadic(&type_of::<i64>())
            .output(&type_of::<i64>())
            .build();
        let sum = Value::make_func(&sig, |args: &[Value]| {
            let total: i64 = (0..args[1].len()).map(|i| args[1].index(i).int()).sum();
            vec![value_of(total)]
        });
        let out = sum.call(&[value_of("x"), value_of(1i64), value_of(2i64), value_of(4i64)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].int(), 7);

        let none = sum.call(&[value_of("x")]);
        assert_eq!(none[0].int(), 0);
    }

    #[test]
    #[should_panic(expected = "not assignable")]
    fn test_call_rejects_wrong_argument_type() {
        let sig = FuncBuilder::new().input(&type_of::<i64>()).build();
        let f = Value::make_func(&sig, |_: &[Value]| Vec::new());
        let _ = f.call(&[value_of("nope")]);
    }

    #[test]
    fn test_channel_try_ops() {
        let t = chan_of(ChanDir::Both, &type_of::<i32>());
        let ch = Value::make_chan(&t, 1);
        assert_eq!(ch.cap(), 1);
        assert!(ch.try_recv().is_none());
        assert!(ch.try_send(value_of(5i32)));
        assert!(!ch.try_send(value_of(6i32)));
        assert_eq!(ch.len(), 1);
        assert_eq!(ch.try_recv().map(|v| v.int()), Some(5));
    }

    #[test]
    fn test_pointer_identity() {
        let a = Value::new_pointer(value_of(1i32));
        let b = Value::new_pointer(value_of(1i32));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.elem(), b.elem());
        assert!(!Value::zero(&a.ty()).elem().is_valid());
    }

    #[test]
    #[should_panic(expected = "on zero Value")]
    fn test_invalid_value_panics() {
        let _ = Value::invalid().ty();
    }

    #[test]
    #[should_panic(expected = "call of reflect.Value.Int on string Value")]
    fn test_int_on_string_panics() {
        let _ = value_of("x").int();
    }
}
