use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::SiteConfig;
use crate::model::dashboard::DashboardRegistry;
use crate::model::node::MenuTree;
use crate::model::site::Site;
use crate::ops::navigator::MenuData;

/// Name of the site directory holding config, data and session
pub const SITE_DIR: &str = "menunav";
/// Config file inside the site directory
pub const CONFIG_FILE: &str = "menunav.toml";

/// Error type for site I/O operations
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("not a menunav site: no menunav/menunav.toml found")]
    NotASite,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse menunav.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit menunav.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("could not parse {path}: {source}")]
    DataParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the site by walking up from the given directory, looking for a
/// `menunav/` subdirectory with a config file.
pub fn discover_site(start: &Path) -> Result<PathBuf, SiteError> {
    let mut current = start.to_path_buf();
    loop {
        let site_dir = current.join(SITE_DIR);
        if site_dir.is_dir() && site_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(SiteError::NotASite);
        }
    }
}

fn read_file(path: &Path) -> Result<String, SiteError> {
    fs::read_to_string(path).map_err(|e| SiteError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read and parse menunav.toml
pub fn read_config(site_dir: &Path) -> Result<SiteConfig, SiteError> {
    let text = read_file(&site_dir.join(CONFIG_FILE))?;
    Ok(toml::from_str(&text)?)
}

/// Load the menu tree, logging validation warnings.
pub fn load_menu(path: &Path) -> Result<MenuTree, SiteError> {
    let text = read_file(path)?;
    let (tree, warnings) = MenuTree::from_json(&text).map_err(|e| SiteError::DataParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    for warning in &warnings {
        tracing::warn!(file = %path.display(), "{}", warning);
    }
    Ok(tree)
}

/// Load the dashboard registry. A missing file yields an empty registry.
pub fn load_dashboards(path: &Path) -> Result<DashboardRegistry, SiteError> {
    if !path.exists() {
        tracing::warn!(file = %path.display(), "dashboard registry not found, dashboard links will not resolve");
        return Ok(DashboardRegistry::default());
    }
    let text = read_file(path)?;
    let (registry, skipped) =
        DashboardRegistry::from_json(&text).map_err(|e| SiteError::DataParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    for title in &skipped {
        tracing::warn!(file = %path.display(), %title, "dashboard record has no id, skipped");
    }
    Ok(registry)
}

/// Load a complete site from the given root directory.
pub fn load_site(root: &Path) -> Result<Site, SiteError> {
    let site_dir = root.join(SITE_DIR);
    if !site_dir.is_dir() {
        return Err(SiteError::NotASite);
    }

    let config = read_config(&site_dir)?;
    let tree = load_menu(&site_dir.join(&config.data.menu))?;
    let dashboards = load_dashboards(&site_dir.join(&config.data.dashboards))?;
    tracing::debug!(
        root = %root.display(),
        nodes = tree.len(),
        dashboards = dashboards.len(),
        "site loaded"
    );

    Ok(Site {
        root: root.to_path_buf(),
        site_dir,
        config,
        tree,
        dashboards,
    })
}

impl Site {
    /// Hand the loaded data to a navigator.
    pub fn menu_data(&self) -> MenuData {
        MenuData {
            tree: self.tree.clone(),
            config: self.config.clone(),
            dashboards: self.dashboards.clone(),
        }
    }
}
