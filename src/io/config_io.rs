use std::fs;
use std::path::Path;

use crate::io::site_io::{CONFIG_FILE, SiteError};
use crate::model::config::SiteConfig;

/// Read the site config, returning both the parsed config and the raw
/// toml_edit Document for round-trip-safe editing.
pub fn read_config(site_dir: &Path) -> Result<(SiteConfig, toml_edit::DocumentMut), SiteError> {
    let config_path = site_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| SiteError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: SiteConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(site_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), SiteError> {
    let config_path = site_dir.join(CONFIG_FILE);
    super::atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| {
        SiteError::ReadError {
            path: config_path,
            source: e,
        }
    })?;
    Ok(())
}

/// Update the default_language field in the config document
pub fn set_default_language(doc: &mut toml_edit::DocumentMut, language: &str) {
    if !doc.contains_key("app") {
        doc["app"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["app"]["default_language"] = toml_edit::value(language);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# Portal configuration
[app]
title = "Portal"
default_language = "pt"   # shown on first visit

[[base_paths]]
key = "base1"
base = "https://bi"
path = "embed"
"#
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);

        let original = sample_config();
        fs::write(&config_path, original).unwrap();

        let (config, doc) = read_config(tmp.path()).unwrap();
        assert_eq!(config.app.title, "Portal");
        write_config(tmp.path(), &doc).unwrap();

        let written = fs::read_to_string(&config_path).unwrap();
        assert_eq!(written, original);
    }

    #[test]
    fn test_set_default_language_keeps_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_default_language(&mut doc, "en");
        let result = doc.to_string();
        assert!(result.contains("# Portal configuration"));
        assert!(result.contains("default_language = \"en\""));
        let config: SiteConfig = toml::from_str(&result).unwrap();
        assert_eq!(config.app.default_language, "en");
        assert_eq!(config.base_paths.len(), 1);
    }

    #[test]
    fn test_set_default_language_creates_app_table() {
        let mut doc: toml_edit::DocumentMut = "[search]\nleaves_only = true\n".parse().unwrap();
        set_default_language(&mut doc, "es");
        let config: SiteConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.app.default_language, "es");
        assert!(config.search.leaves_only);
    }

    #[test]
    fn test_read_config_rejects_bad_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[app\n").unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(SiteError::ConfigParseError(_))
        ));
    }
}
