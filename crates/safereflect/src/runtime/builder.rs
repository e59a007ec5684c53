// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for composite and defined types.

use super::cache::defined_repr;
use super::fields::{is_exported, FieldDef, StructTag};
use super::method::{InterfaceMethod, MethodDecl};
use super::types::TypeInner;
use super::value::{Func, Value};
use super::{func_of, interface_of, slice_of, struct_of, Kind, Type};
use std::sync::{Arc, OnceLock};

/// Builder for struct types.
#[derive(Debug)]
pub struct StructBuilder {
    pkg_path: String,
    fields: Vec<FieldDef>,
}

impl StructBuilder {
    /// Create a builder; `pkg_path` qualifies unexported field names.
    pub fn new(pkg_path: impl Into<String>) -> Self {
        Self {
            pkg_path: pkg_path.into(),
            fields: Vec::new(),
        }
    }

    /// Add a named field.
    pub fn field(mut self, name: impl Into<String>, typ: &Type) -> Self {
        let def = FieldDef::new(name, typ).in_package(self.pkg_path.clone());
        self.fields.push(def);
        self
    }

    /// Add a named field with a tag.
    pub fn tagged_field(
        mut self,
        name: impl Into<String>,
        typ: &Type,
        tag: impl Into<StructTag>,
    ) -> Self {
        let def = FieldDef::new(name, typ)
            .in_package(self.pkg_path.clone())
            .with_tag(tag);
        self.fields.push(def);
        self
    }

    /// Add an embedded field of type `T` or `*T`.
    pub fn embedded(mut self, typ: &Type) -> Self {
        let def = FieldDef::embedded(typ).in_package(self.pkg_path.clone());
        self.fields.push(def);
        self
    }

    /// Build the (interned) struct type.
    pub fn build(self) -> Type {
        struct_of(&self.fields)
    }
}

/// Builder for function types.
#[derive(Debug, Default)]
pub struct FuncBuilder {
    ins: Vec<Type>,
    outs: Vec<Type>,
    variadic: bool,
}

impl FuncBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, typ: &Type) -> Self {
        self.ins.push(typ.clone());
        self
    }

    pub fn output(mut self, typ: &Type) -> Self {
        self.outs.push(typ.clone());
        self
    }

    /// Final `...elem` parameter, stored as `[]elem`.
    pub fn variadic(mut self, elem: &Type) -> Self {
        self.ins.push(slice_of(elem));
        self.variadic = true;
        self
    }

    pub fn build(self) -> Type {
        func_of(&self.ins, &self.outs, self.variadic)
    }
}

/// Builder for interface types.
#[derive(Debug)]
pub struct InterfaceBuilder {
    pkg_path: String,
    methods: Vec<InterfaceMethod>,
}

impl InterfaceBuilder {
    /// Create a builder; `pkg_path` qualifies unexported method names.
    pub fn new(pkg_path: impl Into<String>) -> Self {
        Self {
            pkg_path: pkg_path.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, name: impl Into<String>, sig: &Type) -> Self {
        let m = InterfaceMethod::new(name, sig).in_package(self.pkg_path.clone());
        self.methods.push(m);
        self
    }

    pub fn build(self) -> Type {
        interface_of(&self.methods)
    }
}

/// Builder for defined (named) types.
///
/// The new type gets its identity when the builder is created, so method
/// signatures may refer to it through [`self_type`](Self::self_type). Methods
/// are installed by [`build`](Self::build).
pub struct NamedTypeBuilder {
    typ: Type,
    decls: Vec<MethodDecl>,
}

impl NamedTypeBuilder {
    /// Define `pkg_path.name` with the given underlying type.
    ///
    /// # Panics
    /// If `name` is empty.
    pub fn new(pkg_path: impl Into<String>, name: impl Into<String>, underlying: &Type) -> Self {
        let (pkg_path, name) = (pkg_path.into(), name.into());
        if name.is_empty() {
            panic!("reflect: defined type needs a name");
        }
        let base = underlying.underlying().clone();
        let inner = TypeInner {
            kind: base.kind(),
            repr: defined_repr(&pkg_path, &name),
            name,
            pkg_path,
            size: base.size(),
            align: base.align(),
            shape: base.shape().clone(),
            underlying: Some(base),
            methods: OnceLock::new(),
        };
        Self {
            typ: Type(Arc::new(inner)),
            decls: Vec::new(),
        }
    }

    /// Handle of the type being defined.
    pub fn self_type(&self) -> Type {
        self.typ.clone()
    }

    /// Declare a method with a value receiver. `f` receives the receiver
    /// followed by the arguments.
    pub fn method<F>(self, name: impl Into<String>, sig: &Type, f: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        self.declare(name.into(), sig, Func::new(f), false)
    }

    /// Declare a method with a pointer receiver. `f` receives a `*T` value
    /// followed by the arguments.
    pub fn pointer_method<F>(self, name: impl Into<String>, sig: &Type, f: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        self.declare(name.into(), sig, Func::new(f), true)
    }

    fn declare(mut self, name: String, sig: &Type, func: Func, pointer_receiver: bool) -> Self {
        if sig.kind() != Kind::Func {
            panic!("reflect: method {} signature {} is not a func type", name, sig);
        }
        let pkg_path = if is_exported(&name) {
            String::new()
        } else {
            self.typ.pkg_path().to_string()
        };
        self.decls
            .push(MethodDecl::new(name, pkg_path, sig.clone(), func, pointer_receiver));
        self
    }

    /// Install the methods and return the type.
    ///
    /// # Panics
    /// If methods are declared on an interface or pointer type, or a method
    /// name is declared twice.
    pub fn build(mut self) -> Type {
        if !self.decls.is_empty() && matches!(self.typ.kind(), Kind::Interface | Kind::Pointer) {
            panic!("reflect: invalid receiver type {}", self.typ);
        }
        self.decls.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(dup) = self.decls.windows(2).find(|w| w[0].name == w[1].name) {
            panic!("reflect: method redeclared: {}.{}", self.typ, dup[0].name);
        }
        let count = self.decls.len();
        let decls: Arc<[MethodDecl]> = self.decls.into();
        // The builder owns the only reference that could have installed methods.
        let _ = self.typ.0.methods.set(decls);
        if count > 0 {
            log::debug!("[types] defined {} with {} method(s)", self.typ, count);
        }
        self.typ
    }
}
