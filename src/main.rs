use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use winmenu::{config, flags, handle, logging, MenuApi, MenuItemLayout};

#[derive(Parser, Debug)]
#[command(
    name = "winmenu",
    version,
    about = "Win32 menu API bindings: layout, constants, smoke test"
)]
struct Cli {
    /// Log entry-point resolution and each call to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the MENUITEMINFOW field offsets and size.
    Layout {
        /// 4 or 8. Defaults to this build's pointer width.
        #[arg(long)]
        pointer_width: Option<usize>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Prints the MIIM_*, MFT_*, MFS_* and HBMMENU_* constants.
    Constants {
        #[arg(long)]
        json: bool,
    },
    /// Resolves the user32.dll entry points (Windows-only).
    Doctor,
    /// Creates a menu and inserts every item of a menu definition (Windows-only).
    Build {
        /// Menu definition. If omitted, `winmenu.json` / config defaults are used.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Leave the menu allocated instead of destroying it.
        #[arg(long)]
        keep: bool,
    },
    /// Prints the menu definition path that would be used (if any).
    ConfigPath,
    /// Writes the default menu definition if none exists and prints its path.
    InitConfig,
}

#[derive(Serialize)]
struct ConstantRow {
    group: &'static str,
    name: &'static str,
    value: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Layout {
            pointer_width,
            json,
        } => {
            let layout = match pointer_width {
                Some(width) => MenuItemLayout::for_pointer_width(width)?,
                None => MenuItemLayout::native(),
            };
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&layout).context("serialize layout")?
                );
            } else {
                println!(
                    "MENUITEMINFOW ({}-byte pointers): {} bytes",
                    layout.pointer_width, layout.size
                );
                for f in &layout.fields {
                    println!("  {:>3}  {:<14} {} bytes", f.offset, f.name, f.size);
                }
            }
        }
        Command::Constants { json } => {
            let rows = constant_rows();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&rows).context("serialize constants")?
                );
            } else {
                for row in rows {
                    println!("{:<6} {:<24} {:#x}", row.group, row.name, row.value);
                }
            }
        }
        Command::Doctor => {
            let _api = MenuApi::user32().context("resolve user32.dll menu entry points")?;
            println!("user32.dll: OK (CreateMenu, InsertMenuItemW, DestroyMenu, GetMenuItemCount)");
        }
        Command::Build { config, keep } => build(config, keep)?,
        Command::ConfigPath => {
            if let Some(path) = config::resolve_config_path() {
                println!("{}", path.display());
            }
        }
        Command::InitConfig => {
            let path = config::ensure_config_file_exists().context("write default menu")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn build(path: Option<PathBuf>, keep: bool) -> Result<()> {
    let cfg = match path {
        Some(path) => config::load_from(&path)?,
        None => config::load_optional()?.unwrap_or_else(config::MenuConfig::default_menu),
    };
    let items = cfg.resolve()?;
    if items.is_empty() {
        bail!("Menu definition has no items.");
    }

    let api = MenuApi::user32().context("resolve user32.dll menu entry points")?;
    let menu = api.try_create_menu()?;
    log::debug!("created menu {:#x}", menu.as_raw());

    for (pos, item) in items.iter().enumerate() {
        let mut mii = item.descriptor();
        let result = api
            .try_insert_menu_item(menu, pos as u32, true, &mut mii)
            .with_context(|| format!("insert menu item #{}", pos + 1));
        if let Err(e) = result {
            let _ = api.destroy_menu(menu);
            return Err(e);
        }
        log::debug!("inserted item #{} (mask {:#x})", pos + 1, mii.mask().bits());
    }

    let count = api.item_count(menu);
    match count {
        Some(n) => println!("menu {:#x}: {n} item(s)", menu.as_raw()),
        None => println!("menu {:#x}: item count unavailable", menu.as_raw()),
    }

    if !keep && !api.destroy_menu(menu) {
        log::warn!("DestroyMenu({:#x}) failed", menu.as_raw());
    }
    Ok(())
}

fn constant_rows() -> Vec<ConstantRow> {
    let mut rows = Vec::new();
    rows.extend(flags::MASK_FLAGS.iter().map(|(name, f)| ConstantRow {
        group: "mask",
        name: *name,
        value: f.bits() as usize,
    }));
    rows.extend(flags::TYPE_FLAGS.iter().map(|(name, f)| ConstantRow {
        group: "type",
        name: *name,
        value: f.bits() as usize,
    }));
    rows.extend(flags::STATE_FLAGS.iter().map(|(name, f)| ConstantRow {
        group: "state",
        name: *name,
        value: f.bits() as usize,
    }));
    rows.extend(handle::BITMAP_SENTINELS.iter().map(|(name, h)| ConstantRow {
        group: "bitmap",
        name: *name,
        value: h.as_raw(),
    }));
    rows
}
