//! # glcd-menu
//!
//! Data model and linkage layer for multi-level menus drawn on character or
//! graphic LCD modules by microcontroller firmware.
//!
//! A menu is a tree of [`MenuPage`]s holding [`MenuItem`]s. Items either
//! edit a variable owned by the application, pick its value from an
//! [`OptionSet`], link to another page, return to the parent page or run a
//! button action. Rendering and key handling belong to the display
//! controller; this crate gives it the items, their current values and the
//! operations to change them.
//!
//! ## Quick Start
//!
//! ```rust
//! use core::cell::Cell;
//! use glcd_menu::data::{MenuItem, MenuPage, OptionSet, SelectOption, ValueBinding};
//!
//! let interval = Cell::new(200i32);
//! let mode = Cell::new(1u8);
//! const MODES: &[SelectOption<'static, u8>] =
//!     &[SelectOption::new("Auto", 0), SelectOption::new("Manual", 1)];
//! let modes = OptionSet::byte(MODES);
//!
//! let interval_item = MenuItem::variable("Interval", ValueBinding::integer(&interval));
//! let mode_item = MenuItem::select("Mode", ValueBinding::byte(&mode), &modes);
//! let main = MenuPage::new("Main");
//! main.add_item(&interval_item).unwrap();
//! main.add_item(&mode_item).unwrap();
//!
//! assert_eq!(modes.selected_label(mode_item.binding().unwrap()), Ok("Manual"));
//! mode_item.commit_option(0).unwrap();
//! assert_eq!(mode.get(), 0);
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Bindings, option sets, items and pages
//! - [`config`] - Editing behaviour settings
//! - [`error`] - Error types and result definitions

#[macro_use]
extern crate log;

/// Menu data model.
pub mod data;

/// Editing behaviour settings, loadable from TOML or JSON.
pub mod config;

/// Error types and result definitions.
pub mod error;

pub use config::{MenuConfig, SelectFallback};
pub use data::{MenuItem, MenuPage, OptionSet, ValueBinding};
pub use error::{MenuError, Result};
