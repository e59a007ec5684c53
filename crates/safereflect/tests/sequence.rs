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

//! Sequence integration tests
//!
//! Walks every supported source kind through ValueSequence and the Steps
//! iterator adapter.

use safereflect::runtime::{chan_of, map_of, type_of, value_of, ChanDir, Kind, Value};
use safereflect::safe::{Step, ValueSequence};
use safereflect::{ReflectError, SafeValue};
use std::collections::BTreeMap;

#[test]
fn test_slice_elements_and_positions() {
    let v = SafeValue::new(value_of(vec!["a".to_string(), "b".to_string()]));
    let elems: Vec<_> = ValueSequence::iter(&v).expect("sequence").collect();
    assert_eq!(elems.len(), 2);
    for (i, e) in elems.iter().enumerate() {
        assert_eq!(e.key.as_ref().map(|k| k.int()), Some(Ok(i as i64)));
        assert_eq!(e.value_type.kind(), Kind::String);
    }
    assert_eq!(elems[1].value.str(), Ok("b".to_string()));
}

#[test]
fn test_map_entries_in_insertion_order() {
    let t = map_of(&type_of::<String>(), &type_of::<i32>());
    let m = Value::make_map(
        &t,
        vec![
            (value_of("zeta"), value_of(1i32)),
            (value_of("alpha"), value_of(2i32)),
            (value_of("zeta"), value_of(3i32)),
        ],
    );
    let got: Vec<(String, i64)> = ValueSequence::iter(&SafeValue::new(m))
        .expect("sequence")
        .map(|e| {
            let key = e.key.and_then(|k| k.str().ok()).unwrap_or_default();
            (key, e.value.int().unwrap_or(-1))
        })
        .collect();
    assert_eq!(got, vec![("zeta".to_string(), 3), ("alpha".to_string(), 2)]);
}

#[test]
fn test_btreemap_walks_sorted_keys() {
    let mut src = BTreeMap::new();
    src.insert(3u8, true);
    src.insert(1u8, false);
    let keys: Vec<u64> = ValueSequence::iter(&SafeValue::new(value_of(src)))
        .expect("sequence")
        .filter_map(|e| e.key.and_then(|k| k.uint().ok()))
        .collect();
    assert_eq!(keys, vec![1, 3]);
}

#[test]
fn test_restart_replays_immutable_sources() {
    let v = SafeValue::new(value_of([5u8, 6, 7]));
    let first: Vec<_> = ValueSequence::iter(&v).expect("first").collect();
    let second: Vec<_> = ValueSequence::iter(&v).expect("second").collect();
    assert_eq!(first, second);
}

#[test]
fn test_manual_walk_counts_steps() {
    let v = SafeValue::new(value_of("añb"));
    let mut step = ValueSequence::start(&v).expect("start");
    let mut runes = Vec::new();
    while let Some(s) = step {
        runes.push(s.value().int().unwrap_or(-1));
        assert_eq!(s.value_type().kind(), Kind::Int32);
        step = s.advance();
    }
    assert_eq!(runes, vec!['a' as i64, 'ñ' as i64, 'b' as i64]);
}

#[test]
fn test_channel_sequence_consumes() {
    let t = chan_of(ChanDir::Both, &type_of::<u8>());
    let raw = Value::make_chan(&t, 8);
    for b in b"ok" {
        raw.send(value_of(*b));
    }
    let ch = SafeValue::new(raw);
    let elems: Vec<_> = ValueSequence::iter(&ch).expect("sequence").collect();
    assert_eq!(elems.len(), 2);
    assert!(elems.iter().all(|e| e.key.is_none()));
    assert_eq!(ch.len(), Ok(0));

    let send_only = SafeValue::new(Value::zero(&chan_of(ChanDir::Send, &type_of::<u8>())));
    assert_eq!(
        ValueSequence::start(&send_only).map(|s| s.is_some()),
        Err(ReflectError::ChannelDirection {
            op: "Range",
            dir: ChanDir::Send
        })
    );
}

#[test]
fn test_rejected_sources() {
    assert_eq!(
        ValueSequence::start(&SafeValue::invalid()).map(|s| s.is_some()),
        Err(ReflectError::InvalidValue { op: "Range" })
    );
    for v in [value_of(true), value_of(3u64), value_of(Box::new(1i8))] {
        assert!(matches!(
            ValueSequence::iter(&SafeValue::new(v)),
            Err(ReflectError::WrongKind { op: "Range", .. })
        ));
    }
}

#[test]
fn test_lazy_iteration_stops_early() {
    let v = SafeValue::new(value_of((0..1000i64).collect::<Vec<_>>()));
    let picked: Vec<i64> = ValueSequence::iter(&v)
        .expect("sequence")
        .filter_map(|e| e.value.int().ok())
        .filter(|n| n % 250 == 0)
        .take(2)
        .collect();
    assert_eq!(picked, vec![0, 250]);
}
