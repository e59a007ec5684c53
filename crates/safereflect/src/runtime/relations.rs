// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type identity, assignability, convertibility and comparability.
//!
//! These relations are total: they accept any pair of types and never panic.

use super::types::Shape;
use super::{ChanDir, Kind, Type};

fn identical_lists(a: &[Type], b: &[Type], cmp_tags: bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| identical(x, y, cmp_tags))
}

/// Structural comparison of two shapes of the same kind.
fn identical_shape(a: &Type, b: &Type, cmp_tags: bool) -> bool {
    match (a.shape(), b.shape()) {
        (Shape::Basic, Shape::Basic) => a.kind() == b.kind(),
        (Shape::Array { elem: ea, len: la }, Shape::Array { elem: eb, len: lb }) => {
            la == lb && identical(ea, eb, cmp_tags)
        }
        (Shape::Chan { dir: da, elem: ea }, Shape::Chan { dir: db, elem: eb }) => {
            da == db && identical(ea, eb, cmp_tags)
        }
        (
            Shape::Func {
                ins: ia,
                outs: oa,
                variadic: va,
            },
            Shape::Func {
                ins: ib,
                outs: ob,
                variadic: vb,
            },
        ) => va == vb && identical_lists(ia, ib, cmp_tags) && identical_lists(oa, ob, cmp_tags),
        (Shape::Interface { methods: ma }, Shape::Interface { methods: mb }) => {
            ma.len() == mb.len()
                && ma.iter().zip(mb).all(|(x, y)| {
                    x.name == y.name && x.pkg_path == y.pkg_path && identical(&x.sig, &y.sig, cmp_tags)
                })
        }
        (Shape::Map { key: ka, elem: ea }, Shape::Map { key: kb, elem: eb }) => {
            identical(ka, kb, cmp_tags) && identical(ea, eb, cmp_tags)
        }
        (Shape::Pointer { elem: ea }, Shape::Pointer { elem: eb })
        | (Shape::Slice { elem: ea }, Shape::Slice { elem: eb }) => identical(ea, eb, cmp_tags),
        (Shape::Struct { fields: fa }, Shape::Struct { fields: fb }) => {
            fa.len() == fb.len()
                && fa.iter().zip(fb).all(|(x, y)| {
                    x.name == y.name
                        && x.pkg_path == y.pkg_path
                        && x.anonymous == y.anonymous
                        && x.offset == y.offset
                        && (!cmp_tags || x.tag == y.tag)
                        && identical(&x.typ, &y.typ, cmp_tags)
                })
        }
        _ => false,
    }
}

/// Type identity. Named types are only identical to themselves; with
/// `cmp_tags == false` struct tags are ignored.
pub(crate) fn identical(a: &Type, b: &Type, cmp_tags: bool) -> bool {
    if a == b {
        return true;
    }
    if a.is_named() || b.is_named() || a.kind() != b.kind() {
        return false;
    }
    identical_shape(a, b, cmp_tags)
}

fn identical_underlying(a: &Type, b: &Type, cmp_tags: bool) -> bool {
    if a == b {
        return true;
    }
    a.kind() == b.kind() && identical_shape(a.underlying(), b.underlying(), cmp_tags)
}

/// A bidirectional channel value may be assigned to a channel type of any
/// direction with the same element type, if at least one side is unnamed.
fn special_channel_assignability(dst: &Type, src: &Type) -> bool {
    src.chan_dir() == ChanDir::Both
        && (!dst.is_named() || !src.is_named())
        && identical(&dst.elem(), &src.elem(), true)
}

fn directly_assignable(dst: &Type, src: &Type) -> bool {
    if dst == src {
        return true;
    }
    if (dst.is_named() && src.is_named()) || dst.kind() != src.kind() {
        return false;
    }
    if dst.kind() == Kind::Chan && special_channel_assignability(dst, src) {
        return true;
    }
    identical_underlying(dst, src, true)
}

/// Element kinds a string converts to and from: `[]byte` and `[]rune`.
fn is_byte_or_rune_slice(t: &Type) -> bool {
    if t.kind() != Kind::Slice {
        return false;
    }
    let elem = t.elem();
    elem.pkg_path().is_empty() && matches!(elem.kind(), Kind::Uint8 | Kind::Int32)
}

impl Type {
    /// Whether the type implements the interface type `u`. Always false when
    /// `u` is not an interface.
    pub fn implements(&self, u: &Type) -> bool {
        let Shape::Interface { methods: wanted } = u.shape() else {
            return false;
        };
        if wanted.is_empty() {
            return true;
        }
        let have = self.method_signatures();
        wanted.iter().all(|w| {
            have.iter()
                .any(|h| h.name == w.name && h.pkg_path == w.pkg_path && h.sig == w.sig)
        })
    }

    /// Whether a value of this type is assignable to type `u`.
    pub fn assignable_to(&self, u: &Type) -> bool {
        (u.kind() == Kind::Interface && self.implements(u)) || directly_assignable(u, self)
    }

    /// Whether a value of this type is convertible to type `u`. Slice to
    /// array conversions are reported convertible regardless of length.
    pub fn convertible_to(&self, u: &Type) -> bool {
        let (src, dst) = (self.kind(), u.kind());
        let numeric_int = |k: Kind| k.is_signed_int() || k.is_unsigned_int();

        if numeric_int(src) && (numeric_int(dst) || dst.is_float() || dst == Kind::String) {
            return true;
        }
        if src.is_float() && (numeric_int(dst) || dst.is_float()) {
            return true;
        }
        if src.is_complex() && dst.is_complex() {
            return true;
        }
        if src == Kind::String && is_byte_or_rune_slice(u) {
            return true;
        }
        if src == Kind::Slice {
            if dst == Kind::String && is_byte_or_rune_slice(self) {
                return true;
            }
            if dst == Kind::Array && self.elem() == u.elem() {
                return true;
            }
            if dst == Kind::Pointer
                && u.elem().kind() == Kind::Array
                && self.elem() == u.elem().elem()
            {
                return true;
            }
        }
        if src == Kind::Chan && dst == Kind::Chan && special_channel_assignability(u, self) {
            return true;
        }
        if identical_underlying(u, self, false) {
            return true;
        }
        if src == Kind::Pointer
            && dst == Kind::Pointer
            && !self.is_named()
            && !u.is_named()
            && identical_underlying(&u.elem(), &self.elem(), false)
        {
            return true;
        }
        self.assignable_to(u)
    }

    /// Whether values of this type support `==`.
    pub fn comparable(&self) -> bool {
        match self.shape() {
            Shape::Func { .. } | Shape::Map { .. } | Shape::Slice { .. } => false,
            Shape::Array { elem, .. } => elem.comparable(),
            Shape::Struct { fields } => fields.iter().all(|f| f.typ.comparable()),
            _ => true,
        }
    }
}
