use std::ops::{BitOr, BitOrAssign};

use anyhow::{anyhow, Result};
use serde::Serialize;

macro_rules! bit_set {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            pub const fn bits(self) -> u32 {
                self.0
            }

            /// True when every bit of `other` is set in `self`. Zero-valued
            /// flags are always contained.
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

bit_set!(
    /// `fMask`: which members of a [`MenuItemInfo`](crate::MenuItemInfo) are set.
    MaskFlag
);
bit_set!(
    /// `fType`: how the menu item is laid out and drawn.
    TypeFlag
);
bit_set!(
    /// `fState`: checked / enabled / highlighted state of the item.
    StateFlag
);

/// Retrieves or sets `hbmpItem`.
pub const MIIM_BITMAP: MaskFlag = MaskFlag(0x0000_0080);
/// Retrieves or sets `hbmpChecked` and `hbmpUnchecked`.
pub const MIIM_CHECKMARKS: MaskFlag = MaskFlag(0x0000_0008);
/// Retrieves or sets `dwItemData`.
pub const MIIM_DATA: MaskFlag = MaskFlag(0x0000_0020);
/// Retrieves or sets `fType`.
pub const MIIM_FTYPE: MaskFlag = MaskFlag(0x0000_0100);
/// Retrieves or sets `wID`.
pub const MIIM_ID: MaskFlag = MaskFlag(0x0000_0002);
/// Retrieves or sets `fState`.
pub const MIIM_STATE: MaskFlag = MaskFlag(0x0000_0001);
/// Retrieves or sets `dwTypeData`.
pub const MIIM_STRING: MaskFlag = MaskFlag(0x0000_0040);
/// Retrieves or sets `hSubMenu`.
pub const MIIM_SUBMENU: MaskFlag = MaskFlag(0x0000_0004);
/// Retrieves or sets `fType` and `dwTypeData`. Superseded by
/// `MIIM_BITMAP`, `MIIM_FTYPE` and `MIIM_STRING`.
pub const MIIM_TYPE: MaskFlag = MaskFlag(0x0000_0010);

/// The low-order word of `dwTypeData` is a bitmap handle. Superseded by
/// `MIIM_BITMAP` and `hbmpItem`.
pub const MFT_BITMAP: TypeFlag = TypeFlag(0x0000_0004);
/// New line (menu bar) or new column (drop-down) with a separating line.
pub const MFT_MENUBARBREAK: TypeFlag = TypeFlag(0x0000_0020);
/// New line (menu bar) or new column (drop-down) without a separating line.
pub const MFT_MENUBREAK: TypeFlag = TypeFlag(0x0000_0040);
/// The owning window draws the item (WM_MEASUREITEM / WM_DRAWITEM).
pub const MFT_OWNERDRAW: TypeFlag = TypeFlag(0x0000_0100);
/// Radio-button mark instead of a check mark when `hbmpChecked` is null.
pub const MFT_RADIOCHECK: TypeFlag = TypeFlag(0x0000_0200);
/// Menus cascade right-to-left.
pub const MFT_RIGHTORDER: TypeFlag = TypeFlag(0x0000_2000);
/// Horizontal dividing line; `dwTypeData` and `cch` are ignored.
pub const MFT_SEPARATOR: TypeFlag = TypeFlag(0x0000_0800);
/// Text item. Superseded by `MIIM_STRING`.
pub const MFT_STRING: TypeFlag = TypeFlag(0x0000_0000);

pub const MFS_CHECKED: StateFlag = StateFlag(0x0000_0008);
/// Shown in bold; a menu holds at most one default item.
pub const MFS_DEFAULT: StateFlag = StateFlag(0x0000_1000);
/// Same value as `MFS_GRAYED`.
pub const MFS_DISABLED: StateFlag = StateFlag(0x0000_0003);
pub const MFS_ENABLED: StateFlag = StateFlag(0x0000_0000);
pub const MFS_GRAYED: StateFlag = StateFlag(0x0000_0003);
pub const MFS_HILITE: StateFlag = StateFlag(0x0000_0080);
pub const MFS_UNCHECKED: StateFlag = StateFlag(0x0000_0000);
pub const MFS_UNHILITE: StateFlag = StateFlag(0x0000_0000);

pub const MASK_FLAGS: &[(&str, MaskFlag)] = &[
    ("MIIM_BITMAP", MIIM_BITMAP),
    ("MIIM_CHECKMARKS", MIIM_CHECKMARKS),
    ("MIIM_DATA", MIIM_DATA),
    ("MIIM_FTYPE", MIIM_FTYPE),
    ("MIIM_ID", MIIM_ID),
    ("MIIM_STATE", MIIM_STATE),
    ("MIIM_STRING", MIIM_STRING),
    ("MIIM_SUBMENU", MIIM_SUBMENU),
    ("MIIM_TYPE", MIIM_TYPE),
];

pub const TYPE_FLAGS: &[(&str, TypeFlag)] = &[
    ("MFT_BITMAP", MFT_BITMAP),
    ("MFT_MENUBARBREAK", MFT_MENUBARBREAK),
    ("MFT_MENUBREAK", MFT_MENUBREAK),
    ("MFT_OWNERDRAW", MFT_OWNERDRAW),
    ("MFT_RADIOCHECK", MFT_RADIOCHECK),
    ("MFT_RIGHTORDER", MFT_RIGHTORDER),
    ("MFT_SEPARATOR", MFT_SEPARATOR),
    ("MFT_STRING", MFT_STRING),
];

pub const STATE_FLAGS: &[(&str, StateFlag)] = &[
    ("MFS_CHECKED", MFS_CHECKED),
    ("MFS_DEFAULT", MFS_DEFAULT),
    ("MFS_DISABLED", MFS_DISABLED),
    ("MFS_ENABLED", MFS_ENABLED),
    ("MFS_GRAYED", MFS_GRAYED),
    ("MFS_HILITE", MFS_HILITE),
    ("MFS_UNCHECKED", MFS_UNCHECKED),
    ("MFS_UNHILITE", MFS_UNHILITE),
];

/// Looks up a flag by name in one of the tables above.
///
/// Accepts the full constant name (`MFS_CHECKED`) or the part after the
/// prefix (`checked`), case-insensitively.
pub fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Result<T> {
    let wanted = name.trim();
    let found = table.iter().find(|(full, _)| {
        let full: &str = full;
        let short = full.split_once('_').map(|(_, s)| s).unwrap_or(full);
        full.eq_ignore_ascii_case(wanted) || short.eq_ignore_ascii_case(wanted)
    });
    if let Some((_, value)) = found {
        return Ok(*value);
    }

    let known = table
        .iter()
        .map(|(full, _)| {
            full.split_once('_')
                .map(|(_, s)| s.to_ascii_lowercase())
                .unwrap_or_else(|| full.to_ascii_lowercase())
        })
        .collect::<Vec<_>>();
    Err(anyhow!(
        "Unknown flag '{wanted}'. Known flags: {}",
        known.join(", ")
    ))
}
