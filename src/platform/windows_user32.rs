use std::mem::transmute;

use anyhow::{anyhow, Context, Result};
use windows::{
    core::{s, w, Error as WinError, PCSTR},
    Win32::{
        Foundation::HMODULE,
        System::LibraryLoader::{GetProcAddress, LoadLibraryW},
    },
};

use crate::api::{CreateMenuFn, DestroyMenuFn, EntryPoints, GetMenuItemCountFn, InsertMenuItemFn};

type Farproc = unsafe extern "system" fn() -> isize;

pub fn load() -> Result<EntryPoints> {
    // Never freed: the entry points live for the rest of the process.
    let module = unsafe { LoadLibraryW(w!("user32.dll")) }.context("LoadLibraryW(user32.dll)")?;
    log::debug!("user32.dll loaded at {:?}", module.0);

    let create_menu = proc_address(module, s!("CreateMenu"), "CreateMenu")?;
    let insert_menu_item = proc_address(module, s!("InsertMenuItemW"), "InsertMenuItemW")?;
    let destroy_menu = proc_address(module, s!("DestroyMenu"), "DestroyMenu")?;
    let get_menu_item_count = proc_address(module, s!("GetMenuItemCount"), "GetMenuItemCount")?;

    // SAFETY: each export has exactly the signature of the alias it is
    // transmuted to (winuser.h); HMENU and BOOL are passed as their
    // pointer-width / 32-bit integer representations.
    unsafe {
        Ok(EntryPoints {
            create_menu: transmute::<Farproc, CreateMenuFn>(create_menu),
            insert_menu_item: transmute::<Farproc, InsertMenuItemFn>(insert_menu_item),
            destroy_menu: transmute::<Farproc, DestroyMenuFn>(destroy_menu),
            get_menu_item_count: transmute::<Farproc, GetMenuItemCountFn>(get_menu_item_count),
        })
    }
}

fn proc_address(module: HMODULE, name: PCSTR, label: &str) -> Result<Farproc> {
    let proc = unsafe { GetProcAddress(module, name) }
        .ok_or_else(|| anyhow!(WinError::from_thread()))
        .with_context(|| format!("GetProcAddress({label})"))?;
    log::debug!("resolved user32!{label}");
    Ok(proc)
}
