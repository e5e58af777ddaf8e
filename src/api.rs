use std::{
    error::Error as StdError,
    ffi::c_void,
    fmt,
    sync::{Arc, OnceLock},
};

use anyhow::Result;

use crate::handle::HMenu;
use crate::item::MenuItemInfo;
use crate::platform;

/// `HMENU CreateMenu(void)`
pub type CreateMenuFn = unsafe extern "system" fn() -> usize;
/// `BOOL InsertMenuItemW(HMENU, UINT item, BOOL fByPosition, LPCMENUITEMINFOW)`
pub type InsertMenuItemFn =
    unsafe extern "system" fn(menu: usize, item: u32, by_position: i32, lpmi: *const c_void) -> i32;
/// `BOOL DestroyMenu(HMENU)`
pub type DestroyMenuFn = unsafe extern "system" fn(menu: usize) -> i32;
/// `int GetMenuItemCount(HMENU)`
pub type GetMenuItemCountFn = unsafe extern "system" fn(menu: usize) -> i32;

/// The resolved `user32.dll` functions a [`MenuApi`] dispatches to.
#[derive(Debug, Clone, Copy)]
pub struct EntryPoints {
    pub create_menu: CreateMenuFn,
    pub insert_menu_item: InsertMenuItemFn,
    pub destroy_menu: DestroyMenuFn,
    pub get_menu_item_count: GetMenuItemCountFn,
}

/// Why `user32.dll` could not be bound. Cached for the life of the process,
/// so it is shared; the underlying error (e.g. `windows::core::Error`) stays
/// reachable through `source()` / `anyhow::Error::chain`.
#[derive(Debug, Clone)]
pub struct ResolveError(Arc<anyhow::Error>);

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for ResolveError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Menu API calls over a set of entry points.
///
/// Every operation is one synchronous call. Failures come back as `false` /
/// `None`; the `try_*` variants additionally read the thread's last OS error.
#[derive(Debug)]
pub struct MenuApi {
    entry: EntryPoints,
}

impl MenuApi {
    /// Process-wide binding to `user32.dll`.
    ///
    /// Resolved on first use and cached, including a failed resolution; the
    /// library is never unloaded.
    pub fn user32() -> Result<&'static MenuApi> {
        static USER32: OnceLock<std::result::Result<MenuApi, ResolveError>> = OnceLock::new();

        let api = USER32.get_or_init(|| match platform::load_user32() {
            Ok(entry) => {
                log::debug!("resolved user32 menu entry points: {entry:?}");
                Ok(MenuApi { entry })
            }
            Err(err) => {
                log::warn!("failed to resolve user32 menu entry points: {err:#}");
                Err(ResolveError(Arc::new(err)))
            }
        });

        api.as_ref().map_err(|err| anyhow::Error::new(err.clone()))
    }

    /// Binds to caller-supplied entry points.
    ///
    /// # Safety
    ///
    /// Each pointer must implement the contract of the Win32 function its
    /// field is named after, for as long as the returned value is used.
    pub unsafe fn from_entry_points(entry: EntryPoints) -> Self {
        Self { entry }
    }

    /// `CreateMenu`. `None` when the OS returns a null handle.
    /// (https://learn.microsoft.com/windows/win32/api/winuser/nf-winuser-createmenu)
    pub fn create_menu(&self) -> Option<HMenu> {
        // SAFETY: `entry` upholds the CreateMenu contract (see `from_entry_points`
        // and `platform::load_user32`); it takes no arguments.
        let raw = unsafe { (self.entry.create_menu)() };
        (raw != 0).then(|| HMenu::from_raw(raw))
    }

    /// `InsertMenuItemW`. Stamps `info.cbSize` immediately before the call.
    /// (https://learn.microsoft.com/windows/win32/api/winuser/nf-winuser-insertmenuitemw)
    pub fn insert_menu_item(
        &self,
        menu: HMenu,
        item: u32,
        by_position: bool,
        info: &mut MenuItemInfo<'_>,
    ) -> bool {
        let by_position: i32 = if by_position { 1 } else { 0 };
        info.stamp_size();
        // SAFETY: `info` is a live `#[repr(C)]` MENUITEMINFOW for the duration
        // of the call, any text it points at is borrowed for `'_`, and the OS
        // only reads through the pointer.
        let ret = unsafe {
            (self.entry.insert_menu_item)(menu.as_raw(), item, by_position, info.as_ffi_ptr())
        };
        ret != 0
    }

    /// `DestroyMenu`. The handle must not be used afterwards.
    pub fn destroy_menu(&self, menu: HMenu) -> bool {
        // SAFETY: the OS validates the handle and fails on stale values.
        unsafe { (self.entry.destroy_menu)(menu.as_raw()) != 0 }
    }

    /// `GetMenuItemCount`. `None` when the OS reports -1.
    pub fn item_count(&self, menu: HMenu) -> Option<u32> {
        // SAFETY: as for `destroy_menu`.
        let n = unsafe { (self.entry.get_menu_item_count)(menu.as_raw()) };
        u32::try_from(n).ok()
    }

    pub fn try_create_menu(&self) -> Result<HMenu> {
        self.create_menu().ok_or_else(|| last_os_error("CreateMenu"))
    }

    pub fn try_insert_menu_item(
        &self,
        menu: HMenu,
        item: u32,
        by_position: bool,
        info: &mut MenuItemInfo<'_>,
    ) -> Result<()> {
        if self.insert_menu_item(menu, item, by_position, info) {
            Ok(())
        } else {
            Err(last_os_error("InsertMenuItemW"))
        }
    }
}

// Must run before anything else touches the thread's last-error slot.
fn last_os_error(function: &'static str) -> anyhow::Error {
    anyhow::Error::new(std::io::Error::last_os_error()).context(format!("{function} failed"))
}

/// Creates an empty menu through the process-wide `user32.dll` binding.
///
/// The caller owns the menu and releases it with [`HMenu::destroy`] unless it
/// ends up attached to a window.
pub fn create_menu() -> Option<HMenu> {
    match MenuApi::user32() {
        Ok(api) => api.create_menu(),
        Err(err) => {
            log::warn!("CreateMenu unavailable: {err:#}");
            None
        }
    }
}

impl HMenu {
    /// Inserts `info` at position `item` (`by_position`) or before the item
    /// whose command ID is `item`.
    pub fn insert_menu_item(
        self,
        item: u32,
        by_position: bool,
        info: &mut MenuItemInfo<'_>,
    ) -> bool {
        match MenuApi::user32() {
            Ok(api) => api.insert_menu_item(self, item, by_position, info),
            Err(err) => {
                log::warn!("InsertMenuItemW unavailable: {err:#}");
                false
            }
        }
    }

    pub fn destroy(self) -> bool {
        MenuApi::user32()
            .map(|api| api.destroy_menu(self))
            .unwrap_or(false)
    }

    pub fn item_count(self) -> Option<u32> {
        MenuApi::user32().ok().and_then(|api| api.item_count(self))
    }
}
