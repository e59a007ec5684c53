// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Target layout configuration.
//!
//! Sizes and alignments of runtime types depend on the pointer width of the
//! target being described. This module holds the static constants and the
//! process-wide [`TargetLayout`] every type constructor reads.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: host pointer size, supported widths
//! - **Level 2 (Runtime)**: [`TargetLayout`], set once with [`init_layout`]
//!   before the first type is built, read everywhere through [`layout`]
//!
//! # Example
//!
//! ```rust
//! use safereflect::config::{init_layout, layout, ConfigError, TargetLayout};
//! use safereflect::runtime::type_of;
//!
//! // Describe a 32-bit target
//! init_layout(TargetLayout::new(4)?)?;
//! assert_eq!(layout().pointer_size(), 4);
//! assert_eq!(type_of::<String>().size(), 8);
//! # Ok::<(), ConfigError>(())
//! ```

use std::fmt;
use std::sync::OnceLock;

/// Pointer size of the host this crate was compiled for.
pub const HOST_POINTER_SIZE: usize = std::mem::size_of::<usize>();

/// Pointer widths a [`TargetLayout`] may describe (32-bit and 64-bit).
pub const SUPPORTED_POINTER_SIZES: [usize; 2] = [4, 8];

static LAYOUT: OnceLock<TargetLayout> = OnceLock::new();

/// Errors raised while building or installing a [`TargetLayout`].
#[derive(Debug)]
pub enum ConfigError {
    /// Pointer size is not one of [`SUPPORTED_POINTER_SIZES`].
    InvalidPointerSize(usize),
    /// The layout was already fixed (explicitly or by building a type).
    AlreadyInitialized(TargetLayout),
    /// Config file could not be read.
    Io(std::io::Error),
    /// Config document is malformed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPointerSize(size) => write!(
                f,
                "Invalid pointer size: {} (must be one of {:?})",
                size, SUPPORTED_POINTER_SIZES
            ),
            Self::AlreadyInitialized(current) => write!(
                f,
                "Target layout already initialized (pointer size {})",
                current.pointer_size
            ),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Parse(msg) => write!(f, "Layout parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Memory layout parameters of the described target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "yaml", derive(serde::Deserialize, serde::Serialize))]
pub struct TargetLayout {
    pointer_size: usize,
}

impl TargetLayout {
    /// Layout of the host.
    pub const fn host() -> Self {
        Self {
            pointer_size: HOST_POINTER_SIZE,
        }
    }

    /// Layout with an explicit pointer size (4 or 8 bytes).
    pub fn new(pointer_size: usize) -> Result<Self, ConfigError> {
        if !SUPPORTED_POINTER_SIZES.contains(&pointer_size) {
            return Err(ConfigError::InvalidPointerSize(pointer_size));
        }
        Ok(Self { pointer_size })
    }

    /// Size in bytes of pointers, `int`, `uint` and `uintptr`.
    pub const fn pointer_size(&self) -> usize {
        self.pointer_size
    }

    /// Alignment of word-sized values.
    pub const fn word_align(&self) -> usize {
        self.pointer_size
    }

    /// Alignment of a scalar of `size` bytes. 8-byte scalars are only
    /// word-aligned on 32-bit targets.
    pub const fn scalar_align(&self, size: usize) -> usize {
        if size > self.pointer_size {
            self.pointer_size
        } else {
            size
        }
    }

    /// Size of a string header (data pointer + length).
    pub const fn string_size(&self) -> usize {
        2 * self.pointer_size
    }

    /// Size of a slice header (data pointer + length + capacity).
    pub const fn slice_size(&self) -> usize {
        3 * self.pointer_size
    }

    /// Size of an interface value (type word + data word).
    pub const fn interface_size(&self) -> usize {
        2 * self.pointer_size
    }

    /// Parse a layout from a YAML document.
    ///
    /// ```yaml
    /// pointer_size: 4
    /// ```
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let parsed: TargetLayout =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        // Re-validate: serde bypasses `new`.
        Self::new(parsed.pointer_size)
    }

    /// Load a layout from a YAML file.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

impl Default for TargetLayout {
    fn default() -> Self {
        Self::host()
    }
}

/// Install the process-wide layout.
///
/// Must run before any runtime type is built; the first call to [`layout`]
/// fixes the host layout otherwise.
pub fn init_layout(target: TargetLayout) -> Result<(), ConfigError> {
    let mut installed = false;
    let current = LAYOUT.get_or_init(|| {
        installed = true;
        target
    });
    if installed {
        log::debug!(
            "[config] target layout initialized: pointer size {}",
            current.pointer_size
        );
        return Ok(());
    }
    if *current == target {
        return Ok(());
    }
    log::warn!(
        "[config] layout re-initialization ignored (pointer size {} already in use)",
        current.pointer_size
    );
    Err(ConfigError::AlreadyInitialized(*current))
}

/// Current process-wide layout (host layout unless [`init_layout`] ran first).
#[inline]
pub fn layout() -> &'static TargetLayout {
    LAYOUT.get_or_init(TargetLayout::host)
}
