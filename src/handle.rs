/// Handle to a menu object owned by the window manager.
/// (https://learn.microsoft.com/windows/win32/winprog/windows-data-types#HMENU)
///
/// Only [`create_menu`](crate::create_menu) and
/// [`MenuApi::create_menu`](crate::MenuApi::create_menu) hand these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct HMenu(usize);

impl HMenu {
    /// The null menu. Used as the "no submenu" value in a descriptor.
    pub const NULL: HMenu = HMenu(0);

    pub(crate) fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw handle value, for passing to other Win32 bindings.
    pub fn as_raw(self) -> usize {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Handle to a bitmap, or one of the reserved `HBMMENU_*` values.
/// (https://learn.microsoft.com/windows/win32/winprog/windows-data-types#HBITMAP)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct HBitmap(usize);

impl HBitmap {
    pub const NULL: HBitmap = HBitmap(0);

    /// Wraps a bitmap handle obtained from another API (e.g. `LoadImageW`).
    ///
    /// # Safety
    ///
    /// `raw` must be zero, a reserved `HBMMENU_*` value, or a live `HBITMAP`
    /// that outlives every menu item referencing it.
    pub const unsafe fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> usize {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

// Reserved bitmap values for `MenuItemInfo::hbmp_item` (used with MIIM_BITMAP).

/// Bitmap drawn by the window that owns the menu (WM_MEASUREITEM / WM_DRAWITEM).
pub const HBMMENU_CALLBACK: HBitmap = HBitmap(usize::MAX);
/// Windows icon, or the icon of the window given in `dwItemData`.
pub const HBMMENU_SYSTEM: HBitmap = HBitmap(1);
/// Restore button for the menu bar.
pub const HBMMENU_MBAR_RESTORE: HBitmap = HBitmap(2);
/// Minimize button for the menu bar.
pub const HBMMENU_MBAR_MINIMIZE: HBitmap = HBitmap(3);
/// Close button for the menu bar.
pub const HBMMENU_MBAR_CLOSE: HBitmap = HBitmap(5);
/// Disabled close button for the menu bar.
pub const HBMMENU_MBAR_CLOSE_D: HBitmap = HBitmap(6);
/// Disabled minimize button for the menu bar.
pub const HBMMENU_MBAR_MINIMIZE_D: HBitmap = HBitmap(7);
/// Close button for the submenu.
pub const HBMMENU_POPUP_CLOSE: HBitmap = HBitmap(8);
/// Restore button for the submenu.
pub const HBMMENU_POPUP_RESTORE: HBitmap = HBitmap(9);
/// Maximize button for the submenu.
pub const HBMMENU_POPUP_MAXIMIZE: HBitmap = HBitmap(10);
/// Minimize button for the submenu.
pub const HBMMENU_POPUP_MINIMIZE: HBitmap = HBitmap(11);

pub const BITMAP_SENTINELS: &[(&str, HBitmap)] = &[
    ("HBMMENU_CALLBACK", HBMMENU_CALLBACK),
    ("HBMMENU_SYSTEM", HBMMENU_SYSTEM),
    ("HBMMENU_MBAR_RESTORE", HBMMENU_MBAR_RESTORE),
    ("HBMMENU_MBAR_MINIMIZE", HBMMENU_MBAR_MINIMIZE),
    ("HBMMENU_MBAR_CLOSE", HBMMENU_MBAR_CLOSE),
    ("HBMMENU_MBAR_CLOSE_D", HBMMENU_MBAR_CLOSE_D),
    ("HBMMENU_MBAR_MINIMIZE_D", HBMMENU_MBAR_MINIMIZE_D),
    ("HBMMENU_POPUP_CLOSE", HBMMENU_POPUP_CLOSE),
    ("HBMMENU_POPUP_RESTORE", HBMMENU_POPUP_RESTORE),
    ("HBMMENU_POPUP_MAXIMIZE", HBMMENU_POPUP_MAXIMIZE),
    ("HBMMENU_POPUP_MINIMIZE", HBMMENU_POPUP_MINIMIZE),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_is_all_ones() {
        // (HBITMAP)-1 sign-extends to every bit set at any pointer width.
        assert_eq!(HBMMENU_CALLBACK.as_raw() as isize, -1);
    }

    #[test]
    fn sentinels_are_distinct() {
        for (i, (a, x)) in BITMAP_SENTINELS.iter().enumerate() {
            for (b, y) in &BITMAP_SENTINELS[i + 1..] {
                assert_ne!(x, y, "{a} and {b} share a value");
            }
        }
    }

    #[test]
    fn null_handles() {
        assert!(HMenu::NULL.is_null());
        assert!(HBitmap::NULL.is_null());
        assert!(!HBMMENU_SYSTEM.is_null());
        assert!(!HMenu::from_raw(0x1234).is_null());
    }
}
