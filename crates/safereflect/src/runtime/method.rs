// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Method tables and method sets.

use super::fields::is_exported;
use super::types::Shape;
use super::value::{Func, Value};
use super::{func_of, Kind, Type};
use std::fmt;

/// Method declared by an interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMethod {
    pub name: String,
    /// Package path qualifying an unexported name, empty when exported.
    pub pkg_path: String,
    /// Signature without receiver.
    pub sig: Type,
}

impl InterfaceMethod {
    /// # Panics
    /// If `sig` is not a function type.
    pub fn new(name: impl Into<String>, sig: &Type) -> Self {
        if sig.kind() != Kind::Func {
            panic!("reflect: interface method signature {} is not a func type", sig);
        }
        Self {
            name: name.into(),
            pkg_path: String::new(),
            sig: sig.clone(),
        }
    }

    pub fn in_package(mut self, pkg_path: impl Into<String>) -> Self {
        if !is_exported(&self.name) {
            self.pkg_path = pkg_path.into();
        }
        self
    }
}

/// Method declared on a defined type, with its implementation.
#[derive(Clone)]
pub(crate) struct MethodDecl {
    pub(crate) name: String,
    pub(crate) pkg_path: String,
    /// Signature without receiver.
    pub(crate) sig: Type,
    /// Receives the receiver as first argument.
    pub(crate) func: Func,
    /// Implementation reached through `*T`: `func` itself for pointer
    /// receivers, `func` behind a dereference otherwise.
    pub(crate) via_pointer: Func,
    pub(crate) pointer_receiver: bool,
}

impl MethodDecl {
    pub(crate) fn new(
        name: String,
        pkg_path: String,
        sig: Type,
        func: Func,
        pointer_receiver: bool,
    ) -> Self {
        let via_pointer = if pointer_receiver {
            func.clone()
        } else {
            let imp = func.clone();
            Func::new(move |args: &[Value]| {
                let mut args = args.to_vec();
                if let Some(recv) = args.first_mut() {
                    *recv = recv.elem();
                }
                imp.invoke(&args)
            })
        };
        Self {
            name,
            pkg_path,
            sig,
            func,
            via_pointer,
            pointer_receiver,
        }
    }
}

/// Entry of a type's method set.
#[derive(Clone)]
pub struct Method {
    pub name: String,
    /// Package path qualifying an unexported name, empty when exported.
    pub pkg_path: String,
    /// For concrete types, the function type with the receiver as first
    /// input. For interface types, the signature without receiver.
    pub typ: Type,
    /// Implementation taking the receiver first; the zero `Value` for
    /// interface methods.
    pub func: Value,
    /// Position in the sorted method set.
    pub index: usize,
}

impl Method {
    pub fn is_exported(&self) -> bool {
        self.pkg_path.is_empty()
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.pkg_path == other.pkg_path
            && self.typ == other.typ
            && self.index == other.index
            && self.func == other.func
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("pkg_path", &self.pkg_path)
            .field("typ", &self.typ)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Type {
    fn declared_methods(&self) -> &[MethodDecl] {
        self.0.methods.get().map(|m| &m[..]).unwrap_or(&[])
    }

    /// Method declarations visible through this type, and whether they are
    /// reached through a pointer to the defining type.
    fn method_source(&self) -> Option<(&[MethodDecl], bool)> {
        if self.is_named() {
            return Some((self.declared_methods(), false));
        }
        match self.shape() {
            Shape::Pointer { elem } if elem.kind() != Kind::Interface => {
                Some((elem.declared_methods(), true))
            }
            _ => None,
        }
    }

    /// Full method set as name/signature pairs, unexported names included.
    pub(crate) fn method_signatures(&self) -> Vec<InterfaceMethod> {
        if let Shape::Interface { methods } = self.shape() {
            return methods.clone();
        }
        let Some((decls, via_pointer)) = self.method_source() else {
            return Vec::new();
        };
        decls
            .iter()
            .filter(|d| via_pointer || !d.pointer_receiver)
            .map(|d| InterfaceMethod {
                name: d.name.clone(),
                pkg_path: d.pkg_path.clone(),
                sig: d.sig.clone(),
            })
            .collect()
    }

    /// Accessible method set: every method for interfaces, exported methods
    /// only otherwise. Sorted by name.
    pub(crate) fn method_set(&self) -> Vec<Method> {
        if let Shape::Interface { methods } = self.shape() {
            return methods
                .iter()
                .enumerate()
                .map(|(index, m)| Method {
                    name: m.name.clone(),
                    pkg_path: m.pkg_path.clone(),
                    typ: m.sig.clone(),
                    func: Value::invalid(),
                    index,
                })
                .collect();
        }
        let Some((decls, via_pointer)) = self.method_source() else {
            return Vec::new();
        };
        decls
            .iter()
            .filter(|d| d.pkg_path.is_empty() && (via_pointer || !d.pointer_receiver))
            .enumerate()
            .map(|(index, d)| self.concrete_method(d, via_pointer, index))
            .collect()
    }

    fn concrete_method(&self, decl: &MethodDecl, via_pointer: bool, index: usize) -> Method {
        let (ins, outs, variadic) = decl.sig.func_shape("Method");
        let mut with_receiver = Vec::with_capacity(ins.len() + 1);
        with_receiver.push(self.clone());
        with_receiver.extend_from_slice(ins);
        let typ = func_of(&with_receiver, outs, variadic);

        let func = if via_pointer {
            decl.via_pointer.clone()
        } else {
            decl.func.clone()
        };

        Method {
            name: decl.name.clone(),
            pkg_path: String::new(),
            typ: typ.clone(),
            func: Value::from_func(&typ, func),
            index,
        }
    }

    /// Number of methods accessible through [`method`](Self::method).
    /// Unexported methods are only counted for interface types.
    pub fn num_method(&self) -> usize {
        self.method_set().len()
    }

    /// The i'th method of the sorted method set.
    ///
    /// # Panics
    /// If `i` is not in `[0, num_method())`.
    pub fn method(&self, i: usize) -> Method {
        let mut set = self.method_set();
        let len = set.len();
        if i >= len {
            panic!("reflect: Method index {} out of range [0, {}) on {}", i, len, self);
        }
        set.swap_remove(i)
    }

    /// Method with the given name.
    pub fn method_by_name(&self, name: &str) -> Option<Method> {
        self.method_set().into_iter().find(|m| m.name == name)
    }
}
