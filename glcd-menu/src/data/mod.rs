//! Menu data model.
//!
//! The structures here hold references to caller-owned storage only:
//! variables, titles, option arrays, items and pages all outlive the
//! menu and nothing is allocated while building it.
//!
//! ## Architecture
//!
//! - [`types`] - Scalar and item type tags, owned [`Value`](types::Value)
//! - [`binding`] - Type-erased references to bound variables
//! - [`select`] - Option sets and value/index resolution
//! - [`item`] - Menu items and activation dispatch
//! - [`page`] - Pages, item lists and back navigation
//! - [`cursor`] - Option select edit sessions

/// Type tags, values and shared constants.
pub mod types;

/// Variable bindings.
pub mod binding;

/// Option selects.
pub mod select;

/// Menu items.
pub mod item;

/// Menu pages.
pub mod page;

/// Edit session over a select item's options.
pub mod cursor;

pub use binding::{ValueBinding, VariableRef};
pub use cursor::OptionCursor;
pub use item::{Action, Activation, ItemKind, MenuItem};
pub use page::{Items, MenuPage};
pub use select::{OptionSet, Options, SelectOption};
pub use types::{ItemType, READONLY, ScalarType, TEXT_CAPACITY, TextBuffer, TextValue, Value};
