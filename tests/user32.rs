//! Calls into the real user32.dll. Only built on Windows.
#![cfg(windows)]

use winmenu::{
    create_menu, MenuApi, MenuItemInfo, WideText, MFS_CHECKED, MIIM_ID, MIIM_STATE, MIIM_STRING,
};

#[test]
fn create_insert_count_destroy() {
    let menu = create_menu().expect("CreateMenu");
    assert!(!menu.is_null());

    let text = WideText::new("&Hello");
    let mut mii = MenuItemInfo::new()
        .with_id(1001)
        .with_text(&text)
        .with_state(MFS_CHECKED);
    assert_eq!(mii.mask(), MIIM_ID | MIIM_STRING | MIIM_STATE);

    assert!(menu.insert_menu_item(1001, false, &mut mii));
    assert_eq!(mii.size_field(), MenuItemInfo::SIZE);
    assert_eq!(menu.item_count(), Some(1));
    assert!(menu.destroy());
}

#[test]
fn menus_are_distinct() {
    let api = MenuApi::user32().expect("resolve user32.dll");
    let a = api.try_create_menu().expect("first menu");
    let b = api.try_create_menu().expect("second menu");
    assert_ne!(a, b);
    assert!(api.destroy_menu(a));
    assert!(api.destroy_menu(b));
}

#[test]
fn insert_into_destroyed_menu_fails() {
    let api = MenuApi::user32().expect("resolve user32.dll");
    let menu = api.try_create_menu().expect("menu");
    assert!(api.destroy_menu(menu));

    let mut mii = MenuItemInfo::new().with_id(1);
    let err = api
        .try_insert_menu_item(menu, 0, true, &mut mii)
        .unwrap_err();
    assert_eq!(err.to_string(), "InsertMenuItemW failed");
}
