use anyhow::Result;

use crate::api::EntryPoints;

#[cfg(target_os = "windows")]
mod windows_user32;

/// Resolves the menu entry points from `user32.dll` by name.
///
/// Callers go through `MenuApi::user32`, which does this once per process.
pub fn load_user32() -> Result<EntryPoints> {
    #[cfg(target_os = "windows")]
    {
        return windows_user32::load();
    }

    #[cfg(not(target_os = "windows"))]
    {
        use anyhow::bail;
        bail!("user32.dll is only available on Windows.");
    }
}
