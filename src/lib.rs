//! Bindings for the Win32 menu API: `CreateMenu`, `InsertMenuItemW`, the
//! `MENUITEMINFOW` layout and its flag constants.
//!
//! The entry points are resolved from `user32.dll` by name on first use. On
//! other targets everything except the calls themselves (constants, layout,
//! descriptor building) still works, and the calls report failure.

pub mod api;
pub mod config;
pub mod flags;
pub mod handle;
pub mod item;
pub mod layout;
pub mod logging;
pub mod platform;

pub use api::{create_menu, EntryPoints, MenuApi, ResolveError};
pub use flags::*;
pub use handle::*;
pub use item::{MenuItemInfo, WideText};
pub use layout::MenuItemLayout;
