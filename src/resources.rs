//! Locating bundled assets relative to the installation rather than through
//! absolute paths baked into the code.

use crate::config::UiConfig;
use crate::ui::widgets::icon::HelpIcon;
use std::path::{Path, PathBuf};

pub const ASSETS_ENV: &str = "SENTIVIEW_ASSETS";
pub const HELP_ICON: &str = "help.png";

#[derive(Debug, Clone, Default)]
pub struct AssetLocator {
    search_dirs: Vec<PathBuf>,
}

impl AssetLocator {
    /// Search order: `$SENTIVIEW_ASSETS`, `<exe dir>/assets`,
    /// `<exe dir>/../share/sentiview/assets`, then the source tree's `assets/`.
    pub fn from_environment() -> Self {
        let mut search_dirs = Vec::new();

        if let Some(dir) = std::env::var_os(ASSETS_ENV) {
            search_dirs.push(PathBuf::from(dir));
        }

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            search_dirs.push(exe_dir.join("assets"));
            search_dirs.push(exe_dir.join("..").join("share").join("sentiview").join("assets"));
        }

        search_dirs.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"));

        Self { search_dirs }
    }

    pub fn with_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}

/// Find the help icon: an explicit config path wins, otherwise the locator.
pub fn help_icon_path(ui: &UiConfig, locator: &AssetLocator) -> Option<PathBuf> {
    match &ui.help_icon {
        Some(path) => Some(path.clone()),
        None => locator.resolve(HELP_ICON),
    }
}

/// Load the help icon. Failure is not fatal; the UI renders without it.
pub fn load_help_icon(ui: &UiConfig, locator: &AssetLocator) -> Option<HelpIcon> {
    let Some(path) = help_icon_path(ui, locator) else {
        tracing::warn!(
            dirs = ?locator.search_dirs(),
            "help icon {} not found in any asset directory",
            HELP_ICON
        );
        return None;
    };

    match HelpIcon::load(&path, ui.icon_size) {
        Ok(icon) => {
            tracing::debug!(path = %path.display(), "loaded help icon");
            Some(icon)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "failed to load help icon: {}", e);
            None
        }
    }
}
