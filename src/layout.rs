//! Byte layout of `MENUITEMINFOW` for a given pointer width.
//!
//! `MenuItemInfo` only exists in the build target's layout; this model lets
//! both the 32-bit and 64-bit variants be inspected from any host.

use std::mem::size_of;

use anyhow::{bail, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    U32,
    Pointer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLayout {
    pub name: &'static str,
    pub kind: FieldKind,
    pub offset: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemLayout {
    pub pointer_width: usize,
    pub size: usize,
    pub fields: Vec<FieldLayout>,
}

const FIELDS: &[(&str, FieldKind)] = &[
    ("cbSize", FieldKind::U32),
    ("fMask", FieldKind::U32),
    ("fType", FieldKind::U32),
    ("fState", FieldKind::U32),
    ("wID", FieldKind::U32),
    ("hSubMenu", FieldKind::Pointer),
    ("hbmpChecked", FieldKind::Pointer),
    ("hbmpUnchecked", FieldKind::Pointer),
    ("dwItemData", FieldKind::Pointer),
    ("dwTypeData", FieldKind::Pointer),
    ("cch", FieldKind::U32),
    ("hbmpItem", FieldKind::Pointer),
];

impl MenuItemLayout {
    /// C layout rules: each field aligned to its own size, the struct
    /// padded to its largest alignment.
    pub fn for_pointer_width(pointer_width: usize) -> Result<Self> {
        if pointer_width != 4 && pointer_width != 8 {
            bail!("pointer width must be 4 or 8 bytes, got {pointer_width}");
        }

        let mut offset = 0usize;
        let mut align = 4usize;
        let mut fields = Vec::with_capacity(FIELDS.len());
        for (name, kind) in FIELDS {
            let size = match kind {
                FieldKind::U32 => 4,
                FieldKind::Pointer => pointer_width,
            };
            offset = offset.next_multiple_of(size);
            align = align.max(size);
            fields.push(FieldLayout {
                name: *name,
                kind: *kind,
                offset,
                size,
            });
            offset += size;
        }

        Ok(Self {
            pointer_width,
            size: offset.next_multiple_of(align),
            fields,
        })
    }

    /// Layout for the build target.
    pub fn native() -> Self {
        use std::mem::offset_of;

        use crate::item::MenuItemInfo;

        let p = size_of::<usize>();
        let offsets = [
            offset_of!(MenuItemInfo<'static>, cb_size),
            offset_of!(MenuItemInfo<'static>, f_mask),
            offset_of!(MenuItemInfo<'static>, f_type),
            offset_of!(MenuItemInfo<'static>, f_state),
            offset_of!(MenuItemInfo<'static>, w_id),
            offset_of!(MenuItemInfo<'static>, h_sub_menu),
            offset_of!(MenuItemInfo<'static>, hbmp_checked),
            offset_of!(MenuItemInfo<'static>, hbmp_unchecked),
            offset_of!(MenuItemInfo<'static>, dw_item_data),
            offset_of!(MenuItemInfo<'static>, dw_type_data),
            offset_of!(MenuItemInfo<'static>, cch),
            offset_of!(MenuItemInfo<'static>, hbmp_item),
        ];

        let fields = FIELDS
            .iter()
            .zip(offsets)
            .map(|((name, kind), offset)| FieldLayout {
                name: *name,
                kind: *kind,
                offset,
                size: match kind {
                    FieldKind::U32 => 4,
                    FieldKind::Pointer => p,
                },
            })
            .collect();

        Self {
            pointer_width: p,
            size: MenuItemInfo::SIZE as usize,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(layout: &MenuItemLayout) -> Vec<usize> {
        layout.fields.iter().map(|f| f.offset).collect()
    }

    #[test]
    fn layout_32bit() {
        let l = MenuItemLayout::for_pointer_width(4).unwrap();
        assert_eq!(l.size, 48);
        assert_eq!(offsets(&l), vec![0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44]);
    }

    #[test]
    fn layout_64bit() {
        let l = MenuItemLayout::for_pointer_width(8).unwrap();
        assert_eq!(l.size, 80);
        assert_eq!(offsets(&l), vec![0, 4, 8, 12, 16, 24, 32, 40, 48, 56, 64, 72]);
        // 4 bytes of padding after wID and after cch.
        assert_eq!(l.field("hSubMenu").unwrap().offset, 24);
        assert_eq!(l.field("hbmpItem").unwrap().offset, 72);
    }

    #[test]
    fn rejects_odd_pointer_width() {
        let err = MenuItemLayout::for_pointer_width(2).unwrap_err();
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn native_matches_model() {
        let model = MenuItemLayout::for_pointer_width(size_of::<usize>()).unwrap();
        assert_eq!(MenuItemLayout::native(), model);
    }

    #[test]
    fn serializes_field_table() {
        let l = MenuItemLayout::for_pointer_width(8).unwrap();
        let json = serde_json::to_value(&l).unwrap();
        assert_eq!(json["size"], 80);
        assert_eq!(json["fields"][5]["name"], "hSubMenu");
        assert_eq!(json["fields"][5]["kind"], "pointer");
    }
}
