use std::{
    env,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::flags::{self, StateFlag, TypeFlag, STATE_FLAGS, TYPE_FLAGS};
use crate::handle::{HBitmap, BITMAP_SENTINELS};
use crate::item::{MenuItemInfo, WideText};

/// A menu definition file (`winmenu.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// `MFT_*` names, e.g. `["radiocheck"]` or `["separator"]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub r#type: Vec<String>,

    /// `MFS_*` names, e.g. `["checked", "default"]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<usize>,

    /// One of the reserved `HBMMENU_*` names, e.g. `"popup_close"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitmap: Option<String>,
}

/// An item with every name parsed, ready to be turned into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub id: Option<u32>,
    pub text: Option<WideText>,
    pub item_type: Option<TypeFlag>,
    pub state: Option<StateFlag>,
    pub data: Option<usize>,
    pub bitmap: Option<HBitmap>,
}

impl ResolvedItem {
    /// Descriptor with a mask bit for each member that was configured.
    pub fn descriptor(&self) -> MenuItemInfo<'_> {
        let mut mii = MenuItemInfo::new();
        if let Some(id) = self.id {
            mii = mii.with_id(id);
        }
        if let Some(text) = &self.text {
            mii = mii.with_text(text);
        }
        if let Some(ty) = self.item_type {
            mii = mii.with_type(ty);
        }
        if let Some(state) = self.state {
            mii = mii.with_state(state);
        }
        if let Some(data) = self.data {
            mii = mii.with_data(data);
        }
        if let Some(bitmap) = self.bitmap {
            mii = mii.with_bitmap(bitmap);
        }
        mii
    }
}

impl MenuConfig {
    /// Used when no definition file exists.
    pub fn default_menu() -> Self {
        let action = |id: u32, text: &str| ItemConfig {
            id: Some(id),
            text: Some(text.to_string()),
            ..Default::default()
        };
        Self {
            items: vec![
                action(100, "&Open"),
                ItemConfig {
                    state: vec!["default".to_string()],
                    ..action(101, "&Save")
                },
                ItemConfig {
                    r#type: vec!["separator".to_string()],
                    ..Default::default()
                },
                ItemConfig {
                    bitmap: Some("popup_close".to_string()),
                    ..action(102, "E&xit")
                },
            ],
        }
    }

    pub fn resolve(&self) -> Result<Vec<ResolvedItem>> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| resolve_item(item).with_context(|| format!("menu item #{}", i + 1)))
            .collect()
    }
}

fn resolve_item(item: &ItemConfig) -> Result<ResolvedItem> {
    let item_type = fold_flags(&item.r#type, |name| flags::lookup(TYPE_FLAGS, name))?;
    let state = fold_flags(&item.state, |name| flags::lookup(STATE_FLAGS, name))?;
    let bitmap = item
        .bitmap
        .as_deref()
        .map(|name| flags::lookup(BITMAP_SENTINELS, name))
        .transpose()?;

    Ok(ResolvedItem {
        id: item.id,
        text: item.text.as_deref().map(WideText::new),
        item_type,
        state,
        data: item.data,
        bitmap,
    })
}

fn fold_flags<T, F>(names: &[String], lookup: F) -> Result<Option<T>>
where
    T: std::ops::BitOr<Output = T>,
    F: Fn(&str) -> Result<T>,
{
    let mut acc: Option<T> = None;
    for name in names {
        let flag = lookup(name)?;
        acc = Some(match acc {
            Some(prev) => prev | flag,
            None => flag,
        });
    }
    Ok(acc)
}

pub fn load_optional() -> Result<Option<MenuConfig>> {
    let Some(path) = resolve_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    load_from(&path).map(Some)
}

pub fn load_from(path: &Path) -> Result<MenuConfig> {
    let bytes = fs::read(path)
        .with_context(|| format!("reading menu definition {}", path.display()))?;
    let cfg: MenuConfig =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(p) = env::var("WINMENU_CONFIG") {
        if !p.trim().is_empty() {
            return Some(PathBuf::from(p));
        }
    }

    let local = PathBuf::from("winmenu.json");
    if local.exists() {
        return Some(local);
    }

    if let Some(appdata) = env::var_os("APPDATA") {
        return Some(PathBuf::from(appdata).join("winmenu").join("menu.json"));
    }

    if let Some(home) = env::var_os("HOME") {
        return Some(PathBuf::from(home).join(".config").join("winmenu").join("menu.json"));
    }

    None
}

/// Writes the default menu to the resolved path unless a file is already there.
pub fn ensure_config_file_exists() -> Result<PathBuf> {
    let Some(path) = resolve_config_path() else {
        return Err(anyhow!(
            "No config path available (set WINMENU_CONFIG or ensure APPDATA/HOME is present)"
        ));
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
    }

    if !path.exists() {
        let mut s = serde_json::to_string_pretty(&MenuConfig::default_menu())
            .context("serialize default menu")?;
        s.push('\n');
        fs::write(&path, s.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::ffi::{OsStr, OsString};
    use std::sync::{Mutex, MutexGuard};

    use super::*;
    use crate::flags::{
        MFS_CHECKED, MFS_DEFAULT, MFT_RADIOCHECK, MFT_SEPARATOR, MIIM_BITMAP, MIIM_FTYPE, MIIM_ID,
        MIIM_STATE, MIIM_STRING,
    };
    use crate::handle::{HBMMENU_MBAR_CLOSE_D, HBMMENU_POPUP_CLOSE};

    // Tests that touch the process environment hold this for their duration.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Overrides environment variables and puts the previous values back on drop.
    struct EnvVars {
        saved: Vec<(&'static str, Option<OsString>)>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvVars {
        fn lock() -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            Self {
                saved: Vec::new(),
                _lock: lock,
            }
        }

        fn save(&mut self, key: &'static str) {
            if !self.saved.iter().any(|(k, _)| *k == key) {
                self.saved.push((key, env::var_os(key)));
            }
        }

        fn set(&mut self, key: &'static str, value: impl AsRef<OsStr>) {
            self.save(key);
            env::set_var(key, value);
        }

        fn remove(&mut self, key: &'static str) {
            self.save(key);
            env::remove_var(key);
        }
    }

    impl Drop for EnvVars {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain(..) {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    fn parses_definition() {
        let json = r#"{
            "items": [
                {"id": 1, "text": "Bold", "type": ["radiocheck"], "state": ["checked", "DEFAULT"]},
                {"type": ["separator"]},
                {"id": 2, "text": "Close", "bitmap": "HBMMENU_MBAR_CLOSE_D", "data": 99}
            ]
        }"#;
        let cfg: MenuConfig = serde_json::from_str(json).expect("parse");
        let items = cfg.resolve().expect("resolve");
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].item_type, Some(MFT_RADIOCHECK));
        assert_eq!(items[0].state, Some(MFS_CHECKED | MFS_DEFAULT));
        assert_eq!(items[1].item_type, Some(MFT_SEPARATOR));
        assert_eq!(items[1].id, None);
        assert_eq!(items[2].bitmap, Some(HBMMENU_MBAR_CLOSE_D));
        assert_eq!(items[2].data, Some(99));
    }

    #[test]
    fn descriptor_mask_follows_configured_members() {
        let item = ResolvedItem {
            id: Some(7),
            text: Some(WideText::new("Go")),
            item_type: None,
            state: Some(MFS_CHECKED),
            data: None,
            bitmap: None,
        };
        let mii = item.descriptor();
        assert_eq!(mii.mask(), MIIM_ID | MIIM_STRING | MIIM_STATE);
        assert_eq!(mii.text_len(), 2);

        let sep = ResolvedItem {
            id: None,
            text: None,
            item_type: Some(MFT_SEPARATOR),
            state: None,
            data: None,
            bitmap: None,
        };
        assert_eq!(sep.descriptor().mask(), MIIM_FTYPE);
    }

    #[test]
    fn unknown_state_names_the_item() {
        let cfg: MenuConfig =
            serde_json::from_str(r#"{"items":[{"id":1},{"id":2,"state":["blinking"]}]}"#).unwrap();
        let err = cfg.resolve().unwrap_err();
        assert_eq!(err.to_string(), "menu item #2");
        let full = format!("{err:#}");
        assert!(full.contains("'blinking'"), "{full}");
        assert!(full.contains("checked"), "{full}");
    }

    #[test]
    fn default_menu_resolves() {
        let items = MenuConfig::default_menu().resolve().expect("default menu");
        assert_eq!(items.len(), 4);
        assert_eq!(items[1].state, Some(MFS_DEFAULT));
        assert_eq!(items[3].bitmap, Some(HBMMENU_POPUP_CLOSE));
        assert!(items[3].descriptor().mask().contains(MIIM_BITMAP));
    }

    #[test]
    fn missing_fields_default() {
        let cfg: MenuConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.items.is_empty());
        let cfg: MenuConfig = serde_json::from_str(r#"{"items":[{}]}"#).unwrap();
        let items = cfg.resolve().unwrap();
        assert_eq!(items[0].descriptor().mask().bits(), 0);
    }

    #[test]
    fn load_from_file() {
        let path = env::temp_dir().join(format!("winmenu-test-{}.json", std::process::id()));
        let mut s = serde_json::to_string_pretty(&MenuConfig::default_menu()).unwrap();
        s.push('\n');
        fs::write(&path, s).unwrap();

        let cfg = load_from(&path).expect("load");
        let _ = fs::remove_file(&path);
        assert_eq!(cfg.items.len(), 4);
        assert_eq!(cfg.items[2].r#type, vec!["separator".to_string()]);
    }

    #[test]
    fn load_from_reports_path() {
        let path = env::temp_dir().join("winmenu-test-does-not-exist.json");
        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().contains("winmenu-test-does-not-exist.json"));
    }

    #[test]
    fn env_override_wins() {
        let mut vars = EnvVars::lock();
        let path = env::temp_dir().join("winmenu-env-override.json");
        vars.set("WINMENU_CONFIG", &path);
        vars.set("APPDATA", env::temp_dir());

        assert_eq!(resolve_config_path(), Some(path));
    }

    #[test]
    fn blank_env_override_falls_through() {
        let mut vars = EnvVars::lock();
        let home = env::temp_dir().join(format!("winmenu-home-{}", std::process::id()));
        vars.set("WINMENU_CONFIG", "   ");
        vars.remove("APPDATA");
        vars.set("HOME", &home);

        let resolved = resolve_config_path().expect("HOME is set");
        assert_ne!(resolved, PathBuf::from("   "));
        if !Path::new("winmenu.json").exists() {
            assert_eq!(resolved, home.join(".config").join("winmenu").join("menu.json"));
        }
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let mut vars = EnvVars::lock();
        let path = env::temp_dir().join(format!("winmenu-missing-{}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        vars.set("WINMENU_CONFIG", &path);

        let loaded = load_optional().expect("missing file is not an error");
        assert!(loaded.is_none());
    }

    #[test]
    fn init_writes_default_menu_to_bare_filename() {
        let mut vars = EnvVars::lock();
        // No directory component, so the parent is the empty path.
        let name = format!("winmenu-init-{}.json", std::process::id());
        let _ = fs::remove_file(&name);
        vars.set("WINMENU_CONFIG", &name);

        let path = ensure_config_file_exists().expect("write default menu");
        assert_eq!(path, PathBuf::from(&name));
        let cfg = load_from(&path).expect("load written menu");
        let again = ensure_config_file_exists().expect("existing file is kept");
        let _ = fs::remove_file(&path);

        assert_eq!(again, path);
        assert_eq!(cfg.items.len(), 4);
        assert_eq!(cfg.items[1].state, vec!["default".to_string()]);
    }
}
