// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic sequence facade.
//!
//! A sequence is a chain of steps. Each step exposes the current element and
//! its type; [`Step::advance`] consumes the step and returns the next one, or
//! `None` at the end. Sequences are single-pass. To walk a value again, start
//! a new sequence from it; since values are immutable this replays the same
//! elements, except for channels, whose elements are consumed.

use super::kinds;
use super::{ReflectError, Result, SafeType, SafeValue};
use crate::runtime::{type_of, value_of, Kind, Value};
use std::vec;

/// One position of a forward-only walk.
pub trait Step: Sized {
    /// Current element.
    fn value(&self) -> &SafeValue;

    /// Element type of the walked collection.
    fn value_type(&self) -> SafeType;

    /// Map key, or position for arrays, slices and strings. `None` for
    /// channels.
    fn key(&self) -> Option<&SafeValue>;

    /// Next step, `None` at the end of the sequence.
    fn advance(self) -> Option<Self>;
}

#[derive(Debug)]
enum Cursor {
    /// Array or slice elements.
    Indexed { source: Value, next: usize },
    /// Unicode scalar values; `next` is a byte offset.
    Runes { text: String, next: usize },
    Entries(vec::IntoIter<(Value, Value)>),
    Chan(Value),
}

impl Cursor {
    fn next(&mut self) -> Option<(Option<SafeValue>, SafeValue)> {
        match self {
            Cursor::Indexed { source, next } => {
                if *next >= source.len() {
                    return None;
                }
                let pos = *next;
                *next += 1;
                Some((Some(position(pos)), SafeValue::new(source.index(pos))))
            }
            Cursor::Runes { text, next } => {
                let pos = *next;
                let c = text.get(pos..)?.chars().next()?;
                *next += c.len_utf8();
                Some((Some(position(pos)), SafeValue::new(value_of(c))))
            }
            Cursor::Entries(entries) => entries
                .next()
                .map(|(k, v)| (Some(SafeValue::new(k)), SafeValue::new(v))),
            Cursor::Chan(chan) => chan.try_recv().map(|v| (None, SafeValue::new(v))),
        }
    }
}

fn position(pos: usize) -> SafeValue {
    SafeValue::new(value_of(pos as isize))
}

/// Walk over an array, slice, pointer to array, string, map or channel.
///
/// | Source | Element | Key |
/// |---|---|---|
/// | array, slice, `*[N]T` | element | index (`int`) |
/// | string | rune (`int32`) | byte offset (`int`) |
/// | map | value, in insertion order | map key |
/// | channel | received value, until the buffer is empty | none |
#[derive(Debug)]
pub struct ValueSequence {
    cursor: Cursor,
    elem_type: SafeType,
    key: Option<SafeValue>,
    value: SafeValue,
}

impl ValueSequence {
    /// First step over `source`, or `None` if it has no elements.
    pub fn start(source: &SafeValue) -> Result<Option<Self>> {
        const OP: &str = "Range";
        let raw = source.reflect_value();
        let (cursor, elem) = match source.checked(OP)? {
            Kind::Array | Kind::Slice => (
                Cursor::Indexed {
                    source: raw.clone(),
                    next: 0,
                },
                raw.ty().elem(),
            ),
            Kind::Pointer => {
                let target = raw.ty().elem();
                if target.kind() != Kind::Array {
                    return Err(ReflectError::wrong_kind(OP, kinds::SEQUENCE, Kind::Pointer));
                }
                if raw.is_nil() {
                    return Err(ReflectError::NilValue {
                        op: OP,
                        kind: Kind::Pointer,
                    });
                }
                let cursor = Cursor::Indexed {
                    source: raw.elem(),
                    next: 0,
                };
                (cursor, target.elem())
            }
            Kind::String => (
                Cursor::Runes {
                    text: raw.str(),
                    next: 0,
                },
                type_of::<char>(),
            ),
            Kind::Map => (Cursor::Entries(raw.map_entries().into_iter()), raw.ty().elem()),
            Kind::Chan => {
                let dir = raw.ty().chan_dir();
                if !dir.can_recv() {
                    return Err(ReflectError::ChannelDirection { op: OP, dir });
                }
                if raw.is_nil() {
                    return Err(ReflectError::NilValue {
                        op: OP,
                        kind: Kind::Chan,
                    });
                }
                (Cursor::Chan(raw.clone()), raw.ty().elem())
            }
            actual => return Err(ReflectError::wrong_kind(OP, kinds::SEQUENCE, actual)),
        };
        Ok(Self::step(cursor, SafeType::new(elem)))
    }

    /// Iterator over the elements of `source`.
    pub fn iter(source: &SafeValue) -> Result<Steps<Self>> {
        Self::start(source).map(Steps::new)
    }

    fn step(mut cursor: Cursor, elem_type: SafeType) -> Option<Self> {
        let (key, value) = cursor.next()?;
        Some(Self {
            cursor,
            elem_type,
            key,
            value,
        })
    }
}

impl Step for ValueSequence {
    fn value(&self) -> &SafeValue {
        &self.value
    }

    fn value_type(&self) -> SafeType {
        self.elem_type.clone()
    }

    fn key(&self) -> Option<&SafeValue> {
        self.key.as_ref()
    }

    fn advance(self) -> Option<Self> {
        Self::step(self.cursor, self.elem_type)
    }
}

/// Element produced by [`Steps`].
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: Option<SafeValue>,
    pub value: SafeValue,
    pub value_type: SafeType,
}

/// Adapter from a chain of steps to an [`Iterator`].
///
/// A step is only advanced when the next element is requested.
#[derive(Debug)]
pub struct Steps<S> {
    current: Option<S>,
    started: bool,
}

impl<S: Step> Steps<S> {
    pub fn new(first: Option<S>) -> Self {
        Self {
            current: first,
            started: false,
        }
    }
}

impl<S: Step> Iterator for Steps<S> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        if self.started {
            self.current = self.current.take()?.advance();
        }
        self.started = true;
        self.current.as_ref().map(|step| Element {
            key: step.key().cloned(),
            value: step.value().clone(),
            value_type: step.value_type(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{chan_of, ChanDir};

    fn ints(v: &SafeValue) -> Vec<i64> {
        ValueSequence::iter(v)
            .expect("sequence")
            .map(|e| e.value.int().expect("int"))
            .collect()
    }

    #[test]
    fn test_manual_stepping() {
        let v = SafeValue::new(value_of([3i32, 4]));
        let first = ValueSequence::start(&v).expect("start").expect("non-empty");
        assert_eq!(first.value().int(), Ok(3));
        assert_eq!(first.key().map(|k| k.int()), Some(Ok(0)));
        assert_eq!(first.value_type().kind(), Kind::Int32);
        let second = first.advance().expect("second");
        assert_eq!(second.value().int(), Ok(4));
        assert!(second.advance().is_none());
    }

    #[test]
    fn test_empty_source_starts_at_end() {
        let v = SafeValue::new(value_of(Vec::<u8>::new()));
        assert!(matches!(ValueSequence::start(&v), Ok(None)));
        let nil = SafeValue::new(Value::zero(&type_of::<Vec<u8>>()));
        assert!(matches!(ValueSequence::start(&nil), Ok(None)));
    }

    #[test]
    fn test_string_yields_runes_with_byte_offsets() {
        let v = SafeValue::new(value_of("aé!"));
        let got: Vec<(i64, i64)> = ValueSequence::iter(&v)
            .expect("sequence")
            .map(|e| {
                let pos = e.key.and_then(|k| k.int().ok()).unwrap_or(-1);
                (pos, e.value.int().unwrap_or(-1))
            })
            .collect();
        assert_eq!(got, vec![(0, 'a' as i64), (1, 'é' as i64), (3, '!' as i64)]);
    }

    #[test]
    fn test_pointer_to_array() {
        let p = SafeValue::new(value_of(Box::new([1i64, 2, 3])));
        assert_eq!(ints(&p), vec![1, 2, 3]);

        let nil = SafeValue::new(Value::zero(&type_of::<Box<[i64; 3]>>()));
        assert!(matches!(
            ValueSequence::start(&nil),
            Err(ReflectError::NilValue { op: "Range", .. })
        ));
        let not_array = SafeValue::new(value_of(Box::new(1i64)));
        assert!(matches!(
            ValueSequence::start(&not_array),
            Err(ReflectError::WrongKind { op: "Range", .. })
        ));
    }

    #[test]
    fn test_channel_drains_without_blocking() {
        let t = chan_of(ChanDir::Both, &type_of::<i64>());
        let raw = Value::make_chan(&t, 4);
        for i in 0..3i64 {
            raw.send(value_of(i));
        }
        let ch = SafeValue::new(raw);
        assert_eq!(ints(&ch), vec![0, 1, 2]);
        assert!(matches!(ValueSequence::start(&ch), Ok(None)));
    }

    #[test]
    fn test_wrong_kind() {
        let v = SafeValue::new(value_of(1.5f64));
        assert_eq!(
            ValueSequence::start(&v).map(|s| s.is_some()),
            Err(ReflectError::WrongKind {
                op: "Range",
                expected: kinds::SEQUENCE,
                actual: Kind::Float64
            })
        );
    }
}
