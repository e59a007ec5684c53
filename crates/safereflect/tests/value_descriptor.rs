// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::cast_precision_loss)] // Stats/metrics need this
#![allow(clippy::cast_sign_loss)] // Test data conversions
#![allow(clippy::cast_possible_truncation)] // Test parameters
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::doc_markdown)] // Test documentation
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::missing_errors_doc)] // Test documentation
#![allow(clippy::items_after_statements)] // Test helpers
#![allow(clippy::module_name_repetitions)] // Test modules
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::match_same_arms)] // Test pattern matching
#![allow(clippy::no_effect_underscore_binding)] // Test variables
#![allow(clippy::wildcard_imports)] // Test utility imports
#![allow(clippy::redundant_closure_for_method_calls)] // Test code clarity
#![allow(clippy::similar_names)] // Test variable naming
#![allow(clippy::shadow_unrelated)] // Test scoping
#![allow(clippy::needless_pass_by_value)] // Test functions
#![allow(clippy::cast_possible_wrap)] // Test conversions
#![allow(clippy::single_match_else)] // Test clarity
#![allow(clippy::needless_continue)] // Test logic
#![allow(clippy::cast_lossless)] // Test simplicity
#![allow(clippy::match_wild_err_arm)] // Test error handling
#![allow(clippy::explicit_iter_loop)] // Test iteration
#![allow(clippy::must_use_candidate)] // Test functions
#![allow(clippy::if_not_else)] // Test conditionals
#![allow(clippy::map_unwrap_or)] // Test options
#![allow(clippy::match_wildcard_for_single_variants)] // Test patterns
#![allow(clippy::ignored_unit_patterns)] // Test closures

//! Value descriptor integration tests
//!
//! Calls, bound methods, maps, channels and struct access through SafeValue.

use safereflect::runtime::{
    chan_of, interface_of, map_of, pointer_to, slice_of, type_of, value_of, ChanDir, FuncBuilder,
    InterfaceMethod, Kind, NamedTypeBuilder, StructBuilder, Type, Value,
};
use safereflect::{ReflectError, SafeValue};
use std::collections::HashMap;

fn sum_func() -> SafeValue {
    let t = FuncBuilder::new()
        .input(&type_of::<String>())
        .variadic(&type_of::<i64>())
        .output(&type_of::<String>())
        .build();
    SafeValue::new(Value::make_func(&t, |args: &[Value]| {
        let rest = &args[1];
        let total: i64 = (0..rest.len()).map(|i| rest.index(i).int()).sum();
        vec![value_of(format!("{}={}", args[0].str(), total))]
    }))
}

#[test]
fn test_variadic_call() {
    let f = sum_func();
    let label = SafeValue::new(value_of("total"));
    let args: Vec<SafeValue> = std::iter::once(label.clone())
        .chain((1..=4i64).map(|i| SafeValue::new(value_of(i))))
        .collect();
    let out = f.call(&args).expect("call");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].str(), Ok("total=10".to_string()));

    // No variadic arguments at all.
    let out = f.call(&[label]).expect("call");
    assert_eq!(out[0].str(), Ok("total=0".to_string()));
}

#[test]
fn test_call_argument_checks() {
    let f = sum_func();
    assert_eq!(
        f.call(&[]),
        Err(ReflectError::ArgumentCount {
            op: "Call",
            expected: 1,
            variadic: true,
            got: 0
        })
    );

    let err = f
        .call(&[SafeValue::new(value_of("x")), SafeValue::new(value_of(1.5f64))])
        .unwrap_err();
    assert!(matches!(err, ReflectError::ArgumentType { op: "Call", index: 1, .. }));

    assert_eq!(
        f.call(&[SafeValue::invalid()]),
        Err(ReflectError::InvalidValue { op: "Call" })
    );

    let nil = SafeValue::new(Value::zero(&f.reflect_value().ty()));
    assert_eq!(nil.is_nil(), Ok(true));
    assert!(matches!(
        nil.call(&[]),
        Err(ReflectError::NilValue {
            op: "Call",
            kind: Kind::Func
        })
    ));
}

fn celsius_type() -> Type {
    let b = NamedTypeBuilder::new("example.com/temp", "Celsius", &type_of::<f64>());
    let to_f = FuncBuilder::new().output(&type_of::<f64>()).build();
    let scaled = FuncBuilder::new()
        .input(&type_of::<f64>())
        .output(&b.self_type())
        .build();
    let own = b.self_type();
    b.method("Fahrenheit", &to_f, |args: &[Value]| {
        vec![value_of(args[0].float() * 9.0 / 5.0 + 32.0)]
    })
    .method("Scale", &scaled, move |args: &[Value]| {
        vec![Value::new_float(&own, args[0].float() * args[1].float())]
    })
    .method("round", &to_f, |args: &[Value]| {
        vec![value_of(args[0].float().round())]
    })
    .build()
}

#[test]
fn test_bound_methods() {
    let celsius = celsius_type();
    let boiling = SafeValue::new(Value::new_float(&celsius, 100.0));
    assert_eq!(boiling.kind(), Kind::Float64);
    assert_eq!(boiling.float(), Ok(100.0));
    assert_eq!(boiling.num_method(), Ok(2));

    let f = boiling
        .method_by_name("Fahrenheit")
        .expect("lookup")
        .expect("exists");
    assert_eq!(f.call(&[]).expect("call")[0].float(), Ok(212.0));

    let scale = boiling.method(1).expect("Scale");
    let half = scale
        .call(&[SafeValue::new(value_of(0.5f64))])
        .expect("call");
    assert_eq!(half[0].ty().map(|t| t.name().to_string()), Ok("Celsius".to_string()));
    assert_eq!(half[0].float(), Ok(50.0));

    assert_eq!(boiling.method_by_name("Kelvin"), Ok(None));
    assert!(matches!(
        boiling.method(2),
        Err(ReflectError::IndexOutOfRange { op: "Method", .. })
    ));
}

#[test]
fn test_methods_through_interface() {
    let celsius = celsius_type();
    let stringer = interface_of(&[
        InterfaceMethod::new("Fahrenheit", &FuncBuilder::new().output(&type_of::<f64>()).build()),
        InterfaceMethod::new("round", &FuncBuilder::new().output(&type_of::<f64>()).build())
            .in_package("example.com/temp"),
    ]);
    assert!(celsius.implements(&stringer));

    let boxed = Value::make_slice(
        &slice_of(&stringer),
        vec![Value::new_float(&celsius, 20.0)],
    )
    .index(0);
    let v = SafeValue::new(boxed);
    assert_eq!(v.kind(), Kind::Interface);
    assert_eq!(v.num_method(), Ok(2));
    assert_eq!(v.elem().and_then(|e| e.float()), Ok(20.0));

    let f = v.method(0).expect("Fahrenheit");
    assert_eq!(f.call(&[]).expect("call")[0].float(), Ok(68.0));

    // Interfaces list unexported methods, but the dynamic value does not
    // expose them.
    assert_eq!(v.method_by_name("round"), Ok(None));
    assert!(!v.method(1).expect("round").is_valid());

    let nil = SafeValue::new(Value::zero(&stringer));
    assert!(matches!(
        nil.method(0),
        Err(ReflectError::NilValue {
            op: "Method",
            kind: Kind::Interface
        })
    ));
    assert_eq!(nil.elem().map(|e| e.is_valid()), Ok(false));
}

#[test]
fn test_map_lookup() {
    let mut table = HashMap::new();
    table.insert("a".to_string(), 1u8);
    let m = SafeValue::new(value_of(table));

    assert_eq!(m.len(), Ok(1));
    let hit = m.map_index(&SafeValue::new(value_of("a"))).expect("lookup");
    assert_eq!(hit.and_then(|v| v.uint().ok()), Some(1));
    assert_eq!(m.map_index(&SafeValue::new(value_of("b"))), Ok(None));

    assert!(matches!(
        m.map_index(&SafeValue::new(value_of(1i32))),
        Err(ReflectError::KeyType {
            op: "MapIndex",
            ..
        })
    ));

    let nil = SafeValue::new(Value::zero(&map_of(&type_of::<String>(), &type_of::<u8>())));
    assert_eq!(nil.map_keys(), Ok(Vec::new()));
    assert_eq!(nil.map_index(&SafeValue::new(value_of("a"))), Ok(None));
}

#[test]
fn test_indexing() {
    let s = SafeValue::new(value_of(vec![10u16, 20, 30]));
    assert_eq!(s.index(2).and_then(|v| v.uint()), Ok(30));
    assert_eq!(
        s.index(3),
        Err(ReflectError::IndexOutOfRange {
            op: "Index",
            index: 3,
            len: 3
        })
    );
    assert_eq!(s.cap(), Ok(3));

    let text = SafeValue::new(value_of("hé"));
    assert_eq!(text.len(), Ok(3));
    assert_eq!(text.index(1).map(|b| b.kind()), Ok(Kind::Uint8));
    assert!(matches!(
        SafeValue::new(value_of(7i8)).index(0),
        Err(ReflectError::WrongKind { op: "Index", actual: Kind::Int8, .. })
    ));
}

#[test]
fn test_nested_fields_through_pointer() {
    let point = NamedTypeBuilder::new(
        "example.com/geo",
        "Point",
        &StructBuilder::new("example.com/geo")
            .field("X", &type_of::<f64>())
            .field("Y", &type_of::<f64>())
            .build(),
    )
    .build();
    let labeled = StructBuilder::new("example.com/geo")
        .embedded(&pointer_to(&point))
        .field("Label", &type_of::<String>())
        .build();

    let inner = Value::make_struct(&point, vec![value_of(1.0f64), value_of(2.0f64)]);
    let full = SafeValue::new(Value::make_struct(
        &labeled,
        vec![Value::new_pointer(inner), value_of("origin")],
    ));
    assert_eq!(full.field_by_index(&[0, 1]).and_then(|y| y.float()), Ok(2.0));
    assert_eq!(full.field_by_name("X").map(|x| x.float()), Some(Ok(1.0)));
    assert_eq!(full.field(1).and_then(|l| l.str()), Ok("origin".to_string()));
    assert!(matches!(
        full.field(2),
        Err(ReflectError::IndexOutOfRange { op: "Field", .. })
    ));

    let empty = SafeValue::new(Value::zero(&labeled));
    assert_eq!(
        empty.field_by_index(&[0, 0]),
        Err(ReflectError::NilValue {
            op: "FieldByIndex",
            kind: Kind::Pointer
        })
    );
    assert!(empty.field_by_name("X").is_none());
    assert_eq!(empty.field_by_name("Label").map(|l| l.is_zero()), Some(Ok(true)));
}

#[test]
fn test_channel_operations() {
    let t = chan_of(ChanDir::Both, &type_of::<u32>());
    let ch = SafeValue::new(Value::make_chan(&t, 1));
    let one = SafeValue::new(value_of(1u32));

    assert_eq!(ch.try_send(&one), Ok(true));
    assert_eq!(ch.try_send(&one), Ok(false));
    assert_eq!(ch.len(), Ok(1));
    assert_eq!(ch.cap(), Ok(1));
    assert_eq!(ch.try_recv().map(|v| v.map(|v| v.uint())), Ok(Some(Ok(1))));
    assert_eq!(ch.try_recv(), Ok(None));

    assert!(matches!(
        ch.try_send(&SafeValue::new(value_of("x"))),
        Err(ReflectError::ArgumentType { op: "TrySend", .. })
    ));

    let recv_only = SafeValue::new(Value::zero(&chan_of(ChanDir::Recv, &type_of::<u32>())));
    assert_eq!(
        recv_only.try_send(&one),
        Err(ReflectError::ChannelDirection {
            op: "TrySend",
            dir: ChanDir::Recv
        })
    );
    assert_eq!(
        recv_only.try_recv(),
        Err(ReflectError::NilValue {
            op: "TryRecv",
            kind: Kind::Chan
        })
    );
}

#[test]
fn test_invalid_value_is_reported() {
    let v = SafeValue::invalid();
    assert!(!v.is_valid());
    assert_eq!(v.kind(), Kind::Invalid);
    assert_eq!(v.int(), Err(ReflectError::InvalidValue { op: "Int" }));
    assert_eq!(v.is_zero(), Err(ReflectError::InvalidValue { op: "IsZero" }));
    assert_eq!(v.ty().map(|t| t.kind()), Err(ReflectError::InvalidValue { op: "Type" }));
    assert!(v.field_by_name("A").is_none());
}

#[test]
fn test_zero_detection() {
    assert_eq!(SafeValue::new(value_of(0.0f64)).is_zero(), Ok(true));
    assert_eq!(SafeValue::new(value_of(-0.0f64)).is_zero(), Ok(false));
    assert_eq!(SafeValue::new(value_of([0u8; 3])).is_zero(), Ok(true));
    assert_eq!(SafeValue::new(value_of(vec![0u8])).is_zero(), Ok(false));
}
