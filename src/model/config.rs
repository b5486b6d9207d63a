use serde::{Deserialize, Serialize};

/// Configuration from menunav.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub app: AppInfo,
    #[serde(default)]
    pub data: DataFiles,
    #[serde(default)]
    pub links: LinkConfig,
    #[serde(default)]
    pub base_paths: Vec<BasePath>,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub header_image: Option<String>,
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        AppInfo {
            title: default_title(),
            header_image: None,
            default_language: default_language(),
        }
    }
}

fn default_title() -> String {
    "Default App Title".to_string()
}

pub fn default_language() -> String {
    "pt".to_string()
}

/// Data files, relative to the site directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFiles {
    #[serde(default = "default_menu_file")]
    pub menu: String,
    #[serde(default = "default_dashboards_file")]
    pub dashboards: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        DataFiles {
            menu: default_menu_file(),
            dashboards: default_dashboards_file(),
        }
    }
}

fn default_menu_file() -> String {
    "menu.json".to_string()
}

fn default_dashboards_file() -> String {
    "dashboards.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Url scheme that marks a dashboard indirection (`<scheme>:<key>:<title>`)
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            scheme: default_scheme(),
        }
    }
}

fn default_scheme() -> String {
    "sisense".to_string()
}

/// One entry of the base-path table used by dashboard indirection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePath {
    pub key: String,
    pub base: String,
    #[serde(default)]
    pub path: String,
}

/// What `back` does when only one level is on the stack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackPolicy {
    /// Reset all the way to Home
    #[default]
    Home,
    /// Stay on the first level
    Stay,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default)]
    pub back_policy: BackPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Only leaves (nodes with a url) can match
    #[serde(default)]
    pub leaves_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert_eq!(config.app.default_language, "pt");
        assert_eq!(config.data.menu, "menu.json");
        assert_eq!(config.data.dashboards, "dashboards.json");
        assert_eq!(config.links.scheme, "sisense");
        assert!(config.base_paths.is_empty());
        assert_eq!(config.navigation.back_policy, BackPolicy::Home);
        assert!(!config.search.leaves_only);
    }

    #[test]
    fn parses_full_config() {
        let config: SiteConfig = toml::from_str(
            r#"[app]
title = "Portal"
default_language = "en"

[links]
scheme = "bi"

[[base_paths]]
key = "base1"
base = "https://bi"
path = "embed"

[[base_paths]]
key = "bare"
base = "https://other"

[navigation]
back_policy = "stay"

[search]
leaves_only = true
"#,
        )
        .unwrap();
        assert_eq!(config.app.title, "Portal");
        assert_eq!(config.app.default_language, "en");
        assert_eq!(config.links.scheme, "bi");
        assert_eq!(config.base_paths.len(), 2);
        assert_eq!(config.base_paths[1].path, "");
        assert_eq!(config.navigation.back_policy, BackPolicy::Stay);
        assert!(config.search.leaves_only);
    }

    #[test]
    fn rejects_unknown_back_policy() {
        let result: Result<SiteConfig, _> = toml::from_str("[navigation]\nback_policy = \"sideways\"\n");
        assert!(result.is_err());
    }
}
