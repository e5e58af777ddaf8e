use std::{ffi::c_void, marker::PhantomData, mem::size_of, ptr};

use crate::flags::{
    MaskFlag, StateFlag, TypeFlag, MIIM_BITMAP, MIIM_CHECKMARKS, MIIM_DATA, MIIM_FTYPE, MIIM_ID,
    MIIM_STATE, MIIM_STRING, MIIM_SUBMENU,
};
use crate::handle::{HBitmap, HMenu};

/// Information about a menu item, laid out as `MENUITEMINFOW`.
/// (https://learn.microsoft.com/windows/win32/api/winuser/ns-winuser-menuiteminfow)
///
/// Only the members named by `fMask` are read by the OS; the rest may hold
/// anything (they stay zeroed when built through the `with_*` methods).
/// `cbSize` is written by the binding right before each call.
///
/// The lifetime ties the descriptor to the UTF-16 text it points at.
/// On 64-bit targets the ABI padding after `wID` and `cch` is spelled out so
/// every byte of the record is initialized.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct MenuItemInfo<'a> {
    pub(crate) cb_size: u32,
    pub(crate) f_mask: MaskFlag,
    pub(crate) f_type: TypeFlag,
    pub(crate) f_state: StateFlag,
    pub(crate) w_id: u32,
    #[cfg(target_pointer_width = "64")]
    _pad0: u32,
    pub(crate) h_sub_menu: HMenu,
    pub(crate) hbmp_checked: HBitmap,
    pub(crate) hbmp_unchecked: HBitmap,
    pub(crate) dw_item_data: usize,
    pub(crate) dw_type_data: *mut u16,
    pub(crate) cch: u32,
    #[cfg(target_pointer_width = "64")]
    _pad1: u32,
    pub(crate) hbmp_item: HBitmap,
    text: PhantomData<&'a [u16]>,
}

impl Default for MenuItemInfo<'_> {
    fn default() -> Self {
        Self {
            cb_size: 0,
            f_mask: MaskFlag::default(),
            f_type: TypeFlag::default(),
            f_state: StateFlag::default(),
            w_id: 0,
            #[cfg(target_pointer_width = "64")]
            _pad0: 0,
            h_sub_menu: HMenu::NULL,
            hbmp_checked: HBitmap::NULL,
            hbmp_unchecked: HBitmap::NULL,
            dw_item_data: 0,
            dw_type_data: ptr::null_mut(),
            cch: 0,
            #[cfg(target_pointer_width = "64")]
            _pad1: 0,
            hbmp_item: HBitmap::NULL,
            text: PhantomData,
        }
    }
}

impl<'a> MenuItemInfo<'a> {
    /// `sizeof(MENUITEMINFOW)` on the build target.
    pub const SIZE: u32 = size_of::<MenuItemInfo<'static>>() as u32;

    pub fn new() -> Self {
        Self::default()
    }

    /// Adds bits to `fMask` without touching any other member.
    pub fn with_mask(mut self, mask: MaskFlag) -> Self {
        self.f_mask |= mask;
        self
    }

    pub fn with_type(mut self, ty: TypeFlag) -> Self {
        self.f_type = ty;
        self.f_mask |= MIIM_FTYPE;
        self
    }

    pub fn with_state(mut self, state: StateFlag) -> Self {
        self.f_state = state;
        self.f_mask |= MIIM_STATE;
        self
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.w_id = id;
        self.f_mask |= MIIM_ID;
        self
    }

    pub fn with_submenu(mut self, submenu: HMenu) -> Self {
        self.h_sub_menu = submenu;
        self.f_mask |= MIIM_SUBMENU;
        self
    }

    pub fn with_checkmarks(mut self, checked: HBitmap, unchecked: HBitmap) -> Self {
        self.hbmp_checked = checked;
        self.hbmp_unchecked = unchecked;
        self.f_mask |= MIIM_CHECKMARKS;
        self
    }

    pub fn with_data(mut self, data: usize) -> Self {
        self.dw_item_data = data;
        self.f_mask |= MIIM_DATA;
        self
    }

    /// Points `dwTypeData` at `text` and sets `cch` to its visible length.
    pub fn with_text(mut self, text: &'a WideText) -> Self {
        self.dw_type_data = text.0.as_ptr().cast_mut();
        self.cch = text.len();
        self.text = PhantomData;
        self.f_mask |= MIIM_STRING;
        self
    }

    pub fn with_bitmap(mut self, bitmap: HBitmap) -> Self {
        self.hbmp_item = bitmap;
        self.f_mask |= MIIM_BITMAP;
        self
    }

    pub fn mask(&self) -> MaskFlag {
        self.f_mask
    }

    pub fn item_type(&self) -> TypeFlag {
        self.f_type
    }

    pub fn state(&self) -> StateFlag {
        self.f_state
    }

    pub fn id(&self) -> u32 {
        self.w_id
    }

    pub fn submenu(&self) -> HMenu {
        self.h_sub_menu
    }

    pub fn text_len(&self) -> u32 {
        self.cch
    }

    /// Current `cbSize`. Zero until the descriptor has been passed to an
    /// insert call.
    pub fn size_field(&self) -> u32 {
        self.cb_size
    }

    /// Writes `cbSize`. Called at the call boundary, never earlier.
    pub(crate) fn stamp_size(&mut self) {
        self.cb_size = Self::SIZE;
    }

    pub(crate) fn as_ffi_ptr(&self) -> *const c_void {
        (self as *const Self).cast()
    }
}

/// NUL-terminated UTF-16 text for `dwTypeData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideText(Vec<u16>);

impl WideText {
    pub fn new(s: &str) -> Self {
        let mut v: Vec<u16> = s.encode_utf16().collect();
        v.push(0);
        Self(v)
    }

    /// Length in UTF-16 units up to the first NUL.
    pub fn len(&self) -> u32 {
        self.0.iter().position(|c| *c == 0).unwrap_or(self.0.len()) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_units(&self) -> &[u16] {
        &self.0
    }
}

impl From<&str> for WideText {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
