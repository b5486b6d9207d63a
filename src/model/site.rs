use std::path::PathBuf;

use super::config::SiteConfig;
use super::dashboard::DashboardRegistry;
use super::node::MenuTree;

/// A fully loaded menu site
#[derive(Debug)]
pub struct Site {
    /// Root directory of the site (parent of `menunav/`)
    pub root: PathBuf,
    /// Path to the `menunav/` directory
    pub site_dir: PathBuf,
    /// Parsed menunav.toml
    pub config: SiteConfig,
    /// The menu, validated
    pub tree: MenuTree,
    /// Dashboard registry used by link indirection
    pub dashboards: DashboardRegistry,
}
