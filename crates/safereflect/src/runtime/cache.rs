// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type constructors and the process-wide type cache.
//!
//! Every unnamed composite type is interned: building `[]int` twice returns
//! the same handle. Keys refer to component types by handle identity, which
//! stays valid because the cache keeps every interned type (and therefore its
//! components) alive.

use super::fields::{is_exported, FieldDef, StructField};
use super::method::InterfaceMethod;
use super::types::{Shape, TypeInner};
use super::{ChanDir, Kind, Type};
use crate::config::layout;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

#[derive(Debug, PartialEq, Eq, Hash)]
enum TypeKey {
    Basic(Kind),
    Pointer(usize),
    Slice(usize),
    Array(usize, usize),
    Chan(ChanDir, usize),
    Map(usize, usize),
    Func(Vec<usize>, Vec<usize>, bool),
    Struct(Vec<FieldKey>),
    Interface(Vec<(String, String, usize)>),
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct FieldKey {
    name: String,
    pkg_path: String,
    typ: usize,
    tag: String,
    embedded: bool,
}

static CACHE: OnceLock<DashMap<TypeKey, Type>> = OnceLock::new();

fn cache() -> &'static DashMap<TypeKey, Type> {
    CACHE.get_or_init(DashMap::new)
}

/// Number of interned types.
pub fn cached_types() -> usize {
    cache().len()
}

fn intern(key: TypeKey, build: impl FnOnce() -> TypeInner) -> Type {
    if let Some(hit) = cache().get(&key) {
        return hit.value().clone();
    }
    // `build` only reads component handles; it never re-enters the cache.
    cache()
        .entry(key)
        .or_insert_with(|| {
            let t = Type(Arc::new(build()));
            log::trace!("[types] interned {} ({})", t, t.kind());
            t
        })
        .value()
        .clone()
}

const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) / align * align
}

impl Type {
    /// Predeclared type of a basic kind; `None` for composite kinds and
    /// `Kind::Invalid`.
    pub fn basic(kind: Kind) -> Option<Type> {
        Kind::BASIC.contains(&kind).then(|| predeclared(kind))
    }
}

/// Predeclared type of a kind listed in `Kind::BASIC`.
pub(crate) fn predeclared(kind: Kind) -> Type {
    intern(TypeKey::Basic(kind), || {
        let l = layout();
        let size = match kind {
            Kind::Bool | Kind::Int8 | Kind::Uint8 => 1,
            Kind::Int16 | Kind::Uint16 => 2,
            Kind::Int32 | Kind::Uint32 | Kind::Float32 => 4,
            Kind::Int64 | Kind::Uint64 | Kind::Float64 | Kind::Complex64 => 8,
            Kind::Complex128 => 16,
            Kind::String => l.string_size(),
            _ => l.pointer_size(),
        };
        let align = match kind {
            Kind::Complex64 => 4,
            Kind::Complex128 => l.scalar_align(8),
            Kind::String => l.word_align(),
            _ => l.scalar_align(size),
        };
        let (name, repr) = match kind {
            Kind::UnsafePointer => ("Pointer", "unsafe.Pointer"),
            other => (other.as_str(), other.as_str()),
        };
        TypeInner {
            name: name.to_string(),
            ..TypeInner::unnamed(kind, repr.to_string(), size, align, Shape::Basic)
        }
    })
}

/// Pointer type `*elem`.
pub fn pointer_to(elem: &Type) -> Type {
    intern(TypeKey::Pointer(elem.id()), || {
        let p = layout().pointer_size();
        TypeInner::unnamed(
            Kind::Pointer,
            format!("*{}", elem),
            p,
            p,
            Shape::Pointer { elem: elem.clone() },
        )
    })
}

/// Slice type `[]elem`.
pub fn slice_of(elem: &Type) -> Type {
    intern(TypeKey::Slice(elem.id()), || {
        let l = layout();
        TypeInner::unnamed(
            Kind::Slice,
            format!("[]{}", elem),
            l.slice_size(),
            l.word_align(),
            Shape::Slice { elem: elem.clone() },
        )
    })
}

/// Array type `[len]elem`.
pub fn array_of(len: usize, elem: &Type) -> Type {
    intern(TypeKey::Array(len, elem.id()), || {
        TypeInner::unnamed(
            Kind::Array,
            format!("[{}]{}", len, elem),
            elem.size() * len,
            elem.align(),
            Shape::Array {
                elem: elem.clone(),
                len,
            },
        )
    })
}

/// Channel type with the given direction.
pub fn chan_of(dir: ChanDir, elem: &Type) -> Type {
    intern(TypeKey::Chan(dir, elem.id()), || {
        let repr = match (dir, elem.shape()) {
            // `chan (<-chan T)` keeps the inner arrow attached to its channel.
            (ChanDir::Both, Shape::Chan { dir: ChanDir::Recv, .. }) if !elem.is_named() => {
                format!("chan ({})", elem)
            }
            _ => format!("{} {}", dir.prefix(), elem),
        };
        let p = layout().pointer_size();
        TypeInner::unnamed(
            Kind::Chan,
            repr,
            p,
            p,
            Shape::Chan {
                dir,
                elem: elem.clone(),
            },
        )
    })
}

/// Map type `map[key]elem`.
///
/// # Panics
/// If `key` is not comparable.
pub fn map_of(key: &Type, elem: &Type) -> Type {
    if !key.comparable() {
        panic!("reflect.MapOf: invalid key type {}", key);
    }
    intern(TypeKey::Map(key.id(), elem.id()), || {
        let p = layout().pointer_size();
        TypeInner::unnamed(
            Kind::Map,
            format!("map[{}]{}", key, elem),
            p,
            p,
            Shape::Map {
                key: key.clone(),
                elem: elem.clone(),
            },
        )
    })
}

pub(crate) fn signature_repr(ins: &[Type], outs: &[Type], variadic: bool) -> String {
    let mut params: Vec<String> = ins.iter().map(Type::to_string).collect();
    if variadic {
        if let (Some(last), Some(t)) = (params.last_mut(), ins.last()) {
            *last = format!("...{}", t.elem());
        }
    }
    let mut repr = format!("({})", params.join(", "));
    match outs {
        [] => {}
        [single] => {
            repr.push(' ');
            repr.push_str(&single.to_string());
        }
        many => {
            let results: Vec<String> = many.iter().map(Type::to_string).collect();
            repr.push_str(&format!(" ({})", results.join(", ")));
        }
    }
    repr
}

/// Function type. When `variadic`, the last input must be a slice type
/// standing for the `...` parameter.
///
/// # Panics
/// If `variadic` is set and the last input is missing or not a slice.
pub fn func_of(ins: &[Type], outs: &[Type], variadic: bool) -> Type {
    if variadic && ins.last().map(Type::kind) != Some(Kind::Slice) {
        panic!("reflect.FuncOf: last arg of variadic func must be slice");
    }
    let key = TypeKey::Func(
        ins.iter().map(Type::id).collect(),
        outs.iter().map(Type::id).collect(),
        variadic,
    );
    intern(key, || {
        let p = layout().pointer_size();
        TypeInner::unnamed(
            Kind::Func,
            format!("func{}", signature_repr(ins, outs, variadic)),
            p,
            p,
            Shape::Func {
                ins: ins.to_vec(),
                outs: outs.to_vec(),
                variadic,
            },
        )
    })
}

fn qualified(name: &str, pkg_path: &str) -> String {
    if pkg_path.is_empty() {
        name.to_string()
    } else {
        let pkg = pkg_path.rsplit('/').next().unwrap_or(pkg_path);
        format!("{}.{}", pkg, name)
    }
}

/// Struct type with the given fields, laid out in order.
///
/// # Panics
/// On duplicate or empty field names, or an unexported field without a
/// package path.
pub fn struct_of(defs: &[FieldDef]) -> Type {
    let mut seen = HashSet::new();
    for def in defs {
        if def.name.is_empty() {
            panic!("reflect.StructOf: field has no name");
        }
        if !seen.insert(def.name.as_str()) {
            panic!("reflect.StructOf: duplicate field {}", def.name);
        }
        if !is_exported(&def.name) && def.pkg_path.is_empty() {
            panic!(
                "reflect.StructOf: field \"{}\" is unexported but missing PkgPath",
                def.name
            );
        }
    }
    let field_pkg = |def: &FieldDef| {
        if is_exported(&def.name) {
            String::new()
        } else {
            def.pkg_path.clone()
        }
    };
    let key = TypeKey::Struct(
        defs.iter()
            .map(|def| FieldKey {
                name: def.name.clone(),
                pkg_path: field_pkg(def),
                typ: def.typ.id(),
                tag: def.tag.as_str().to_string(),
                embedded: def.embedded,
            })
            .collect(),
    );
    intern(key, || {
        let mut offset = 0;
        let mut align = 1;
        let mut fields = Vec::with_capacity(defs.len());
        let mut parts = Vec::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            let fa = def.typ.field_align();
            offset = align_up(offset, fa);
            align = align.max(fa);
            fields.push(StructField {
                name: def.name.clone(),
                pkg_path: field_pkg(def),
                typ: def.typ.clone(),
                tag: def.tag.clone(),
                offset,
                index: vec![i],
                anonymous: def.embedded,
            });
            offset += def.typ.size();

            let mut part = if def.embedded {
                def.typ.to_string()
            } else {
                format!("{} {}", def.name, def.typ)
            };
            if !def.tag.is_empty() {
                part.push_str(&format!(" {:?}", def.tag.as_str()));
            }
            parts.push(part);
        }
        let repr = if parts.is_empty() {
            "struct {}".to_string()
        } else {
            format!("struct {{ {} }}", parts.join("; "))
        };
        TypeInner::unnamed(
            Kind::Struct,
            repr,
            align_up(offset, align),
            align,
            Shape::Struct { fields },
        )
    })
}

/// Interface type with the given methods (sorted by name).
///
/// # Panics
/// On duplicate method names.
pub fn interface_of(methods: &[InterfaceMethod]) -> Type {
    let mut sorted = methods.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    if let Some(dup) = sorted.windows(2).find(|w| w[0].name == w[1].name) {
        panic!("reflect: duplicate interface method {}", dup[0].name);
    }
    let key = TypeKey::Interface(
        sorted
            .iter()
            .map(|m| (m.name.clone(), m.pkg_path.clone(), m.sig.id()))
            .collect(),
    );
    intern(key, || {
        let parts: Vec<String> = sorted
            .iter()
            .map(|m| {
                let (ins, outs, variadic) = m.sig.func_shape("InterfaceOf");
                format!(
                    "{}{}",
                    qualified(&m.name, &m.pkg_path),
                    signature_repr(ins, outs, variadic)
                )
            })
            .collect();
        let repr = if parts.is_empty() {
            "interface {}".to_string()
        } else {
            format!("interface {{ {} }}", parts.join("; "))
        };
        let l = layout();
        TypeInner::unnamed(
            Kind::Interface,
            repr,
            l.interface_size(),
            l.word_align(),
            Shape::Interface { methods: sorted },
        )
    })
}

/// Type-string of a defined type: `pkg.Name`, or just `Name` without package.
pub(crate) fn defined_repr(pkg_path: &str, name: &str) -> String {
    qualified(name, pkg_path)
}
