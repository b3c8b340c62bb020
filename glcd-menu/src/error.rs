//! Error types and result definitions for menu operations.

use thiserror::Error;

use crate::data::types::{ItemType, ScalarType};

/// Errors reported by bindings, option selects, items and pages.
///
/// None of these are fatal: the controller decides what the user sees
/// (ignore the key press, flash an indicator, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// Write attempted on a readonly binding.
    #[error("variable is readonly")]
    ReadonlyViolation,

    /// Option index outside `0..len`.
    #[error("option index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The bound value matches none of the options.
    #[error("value has no matching option")]
    NotFound,

    /// Back navigation requested on a page without a parent.
    #[error("page has no parent")]
    NoParent,

    /// Readonly state queried or toggled on an item without a bound variable.
    #[error("{0:?} item has no bound variable")]
    NotApplicable(ItemType),

    /// Value, binding and option set disagree on the scalar type.
    #[error("type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        expected: ScalarType,
        actual: ScalarType,
    },

    /// Item is already part of a page's item list.
    #[error("item `{0}` is already linked into a page")]
    AlreadyLinked(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, MenuError>;
