// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct fields, tags and field lookup.

use super::types::Shape;
use super::{Kind, Type};
use std::collections::{HashMap, HashSet};

/// Tag string attached to a struct field.
///
/// By convention a tag is a space-separated list of `key:"value"` pairs,
/// e.g. `json:"id,omitempty" db:"sensor_id"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructTag(String);

impl StructTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value associated with `key`, or an empty string.
    pub fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }

    /// Value associated with `key`, or `None` if the key is absent.
    /// Parsing stops at the first malformed pair.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut tag = self.0.as_bytes();
        while !tag.is_empty() {
            let start = tag.iter().position(|&b| b != b' ').unwrap_or(tag.len());
            tag = &tag[start..];
            if tag.is_empty() {
                break;
            }

            let mut i = 0;
            while i < tag.len() && tag[i] > b' ' && tag[i] != b':' && tag[i] != b'"' && tag[i] != 0x7f
            {
                i += 1;
            }
            if i == 0 || i + 1 >= tag.len() || tag[i] != b':' || tag[i + 1] != b'"' {
                break;
            }
            let name = &tag[..i];
            tag = &tag[i + 1..];

            // Scan the quoted value, honouring backslash escapes.
            let mut j = 1;
            while j < tag.len() && tag[j] != b'"' {
                if tag[j] == b'\\' {
                    j += 1;
                }
                j += 1;
            }
            if j >= tag.len() {
                break;
            }
            let quoted = &tag[1..j];
            tag = &tag[j + 1..];

            if name == key.as_bytes() {
                return unquote(quoted);
            }
        }
        None
    }
}

fn unquote(raw: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(raw).ok()?;
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            _ => return None,
        }
    }
    Some(out)
}

impl From<&str> for StructTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// A single field of a struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Field name (the type name for embedded fields).
    pub name: String,
    /// Package path qualifying an unexported name, empty for exported fields.
    pub pkg_path: String,
    pub typ: Type,
    pub tag: StructTag,
    /// Byte offset within the struct.
    pub offset: usize,
    /// Index sequence for `Type::field_by_index`.
    pub index: Vec<usize>,
    /// Whether the field is embedded.
    pub anonymous: bool,
}

impl StructField {
    pub fn is_exported(&self) -> bool {
        self.pkg_path.is_empty()
    }
}

/// Field definition used to build struct types with [`struct_of`](super::struct_of).
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) pkg_path: String,
    pub(crate) typ: Type,
    pub(crate) tag: StructTag,
    pub(crate) embedded: bool,
}

impl FieldDef {
    /// Named field.
    pub fn new(name: impl Into<String>, typ: &Type) -> Self {
        Self {
            name: name.into(),
            pkg_path: String::new(),
            typ: typ.clone(),
            tag: StructTag::default(),
            embedded: false,
        }
    }

    /// Embedded field of a defined type `T` or `*T`, named after `T`.
    ///
    /// # Panics
    /// If the embedded type (or pointee) is unnamed.
    pub fn embedded(typ: &Type) -> Self {
        let base = if typ.kind() == Kind::Pointer && !typ.is_named() {
            typ.elem()
        } else {
            typ.clone()
        };
        if !base.is_named() {
            panic!("reflect: embedded field of unnamed type {}", typ);
        }
        Self {
            name: base.name().to_string(),
            pkg_path: String::new(),
            typ: typ.clone(),
            tag: StructTag::default(),
            embedded: true,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<StructTag>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Package qualifying the field name. Only kept for unexported names.
    pub fn in_package(mut self, pkg_path: impl Into<String>) -> Self {
        self.pkg_path = pkg_path.into();
        self
    }
}

pub(crate) fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

impl Type {
    fn struct_fields(&self, op: &str) -> &[StructField] {
        match self.shape() {
            Shape::Struct { fields } => fields,
            _ => panic!("reflect: {} of non-struct type {}", op, self),
        }
    }

    /// Number of fields of a struct type.
    ///
    /// # Panics
    /// If the kind is not Struct.
    pub fn num_field(&self) -> usize {
        self.struct_fields("NumField").len()
    }

    /// The i'th field of a struct type.
    ///
    /// # Panics
    /// If the kind is not Struct, or `i` is not in `[0, num_field())`.
    pub fn field(&self, i: usize) -> StructField {
        let fields = self.struct_fields("Field");
        match fields.get(i) {
            Some(f) => f.clone(),
            None => panic!("reflect: Field index {} out of bounds [0, {})", i, fields.len()),
        }
    }

    /// Nested field reached by following `index`, stepping through embedded
    /// pointers to structs. Equivalent to calling `field` successively.
    ///
    /// # Panics
    /// If any step is not a struct, any index is out of range, or `index` is
    /// empty.
    pub fn field_by_index(&self, index: &[usize]) -> StructField {
        let Some((&first, rest)) = index.split_first() else {
            panic!("reflect: FieldByIndex with empty index on {}", self);
        };
        let mut field = self.field(first);
        for &x in rest {
            let mut next = field.typ.clone();
            if next.kind() == Kind::Pointer && next.elem().kind() == Kind::Struct {
                next = next.elem();
            }
            field = next.field(x);
        }
        field
    }

    /// Field with the given name, searching embedded structs breadth-first.
    ///
    /// # Panics
    /// If the kind is not Struct.
    pub fn field_by_name(&self, name: &str) -> Option<StructField> {
        let fields = self.struct_fields("FieldByName");
        let mut has_embeds = false;
        if !name.is_empty() {
            for (i, f) in fields.iter().enumerate() {
                if f.name == name {
                    return Some(self.field(i));
                }
                has_embeds |= f.anonymous;
            }
            if !has_embeds {
                return None;
            }
        }
        self.field_by_name_func(|s| s == name)
    }

    /// Field whose name satisfies `matches`.
    ///
    /// The struct's own fields are considered first, then the fields of
    /// embedded structs in breadth-first order, stopping at the shallowest
    /// depth with at least one match. Several matches at that depth cancel
    /// each other and the lookup returns `None`.
    ///
    /// # Panics
    /// If the kind is not Struct.
    pub fn field_by_name_func<F>(&self, mut matches: F) -> Option<StructField>
    where
        F: FnMut(&str) -> bool,
    {
        struct Scan {
            typ: Type,
            index: Vec<usize>,
        }

        self.struct_fields("FieldByNameFunc");

        let mut current: Vec<Scan> = Vec::new();
        let mut next = vec![Scan {
            typ: self.clone(),
            index: Vec::new(),
        }];
        // Number of times a struct type was reached at the current / next depth.
        let mut next_count: HashMap<Type, u32> = HashMap::new();
        let mut visited: HashSet<Type> = HashSet::new();
        let mut result: Option<StructField> = None;

        while !next.is_empty() {
            std::mem::swap(&mut current, &mut next);
            next.clear();
            let count = std::mem::take(&mut next_count);

            for scan in current.drain(..) {
                let t = scan.typ;
                if !visited.insert(t.clone()) {
                    continue;
                }
                let seen_twice = count.get(&t).copied().unwrap_or(0) > 1;

                for (i, f) in t.struct_fields("FieldByNameFunc").iter().enumerate() {
                    let mut embedded_struct = None;
                    if f.anonymous {
                        let mut ntyp = f.typ.clone();
                        if ntyp.kind() == Kind::Pointer {
                            ntyp = ntyp.elem();
                        }
                        embedded_struct = Some(ntyp);
                    }

                    if matches(&f.name) {
                        if seen_twice || result.is_some() {
                            // Name appears more than once at this depth.
                            return None;
                        }
                        let mut found = t.field(i);
                        let mut index = scan.index.clone();
                        index.push(i);
                        found.index = index;
                        result = Some(found);
                        continue;
                    }

                    if result.is_some() {
                        continue;
                    }
                    let Some(styp) = embedded_struct.filter(|t| t.kind() == Kind::Struct) else {
                        continue;
                    };

                    let entry = next_count.entry(styp.clone()).or_insert(0);
                    if *entry > 0 {
                        // Already queued at this depth; only the count matters.
                        *entry = 2;
                        continue;
                    }
                    *entry = if seen_twice { 2 } else { 1 };

                    let mut index = scan.index.clone();
                    index.push(i);
                    next.push(Scan { typ: styp, index });
                }
            }
            if result.is_some() {
                break;
            }
        }
        result
    }
}
