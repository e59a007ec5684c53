// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Method descriptor.

use super::{SafeType, SafeValue};
use crate::runtime::Method;

/// Entry of a type's method set, together with the type it belongs to.
///
/// None of these accessors can fail; returned types and values are wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeMethod {
    owner: SafeType,
    method: Method,
}

impl SafeMethod {
    pub fn new(owner: SafeType, method: Method) -> Self {
        Self { owner, method }
    }

    pub fn name(&self) -> &str {
        &self.method.name
    }

    /// Package path for an unexported method, empty otherwise.
    pub fn pkg_path(&self) -> &str {
        &self.method.pkg_path
    }

    pub fn is_exported(&self) -> bool {
        self.method.is_exported()
    }

    /// Position in the owner's sorted method set.
    pub fn index(&self) -> usize {
        self.method.index
    }

    /// Type the method was looked up on.
    pub fn receiver_type(&self) -> &SafeType {
        &self.owner
    }

    /// Function type of the method. Includes the receiver as first input
    /// unless the owner is an interface.
    pub fn ty(&self) -> SafeType {
        SafeType::new(self.method.typ.clone())
    }

    /// Implementation taking the receiver as first argument. `None` for
    /// interface methods.
    pub fn func(&self) -> Option<SafeValue> {
        self.method
            .func
            .is_valid()
            .then(|| SafeValue::new(self.method.func.clone()))
    }

    pub fn reflect_method(&self) -> &Method {
        &self.method
    }

    pub fn into_inner(self) -> Method {
        self.method
    }
}
