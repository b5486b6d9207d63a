use std::fs;

use crate::cli::commands::InitArgs;
use crate::io::site_io::{self, CONFIG_FILE, SITE_DIR};
use crate::model::config::default_language;

const CONFIG_TEMPLATE: &str = r##"[app]
title = "{title}"
default_language = "{language}"

[data]
menu = "menu.json"
dashboards = "dashboards.json"

[links]
# Prefix of indirect dashboard links: "<scheme>:<base key>:<dashboard title>"
scheme = "sisense"

# --- Base paths ---
# Each key can be used in a dashboard link. The link opens
# "<base>/<path>/<dashboard id>".
#
# [[base_paths]]
# key = "base1"
# base = "https://bi.example.com"
# path = "app/main/dashboards"

[navigation]
# "home" returns to the top when going back from the first level,
# "stay" keeps the first level
back_policy = "home"

[search]
# Only entries with a link can match a search
leaves_only = false
"##;

const MENU_TEMPLATE: &str = r#"[
  {
    "title": "Home",
    "isHome": true
  },
  {
    "title": "Getting started",
    "description": "Edit menunav/menu.json to build your menu",
    "children": [
      {
        "title": "Documentation",
        "url": "https://example.com/docs"
      }
    ]
  }
]
"#;

const DASHBOARDS_TEMPLATE: &str = "[]\n";

/// Infer an app title from a directory name: hyphens and underscores become
/// spaces, words are title-cased.
fn infer_title(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_config(title: &str) -> String {
    CONFIG_TEMPLATE
        .replace("{title}", &title.replace('\\', "\\\\").replace('"', "\\\""))
        .replace("{language}", &default_language())
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let site_dir = cwd.join(SITE_DIR);

    if site_dir.join(CONFIG_FILE).exists() && !args.force {
        return Err("menunav site already exists in ./menunav/ (use --force to overwrite the config)".into());
    }

    if let Some(parent) = cwd.parent()
        && let Ok(parent_root) = site_io::discover_site(parent)
    {
        eprintln!("Note: parent site found at {}/", parent_root.join(SITE_DIR).display());
        eprintln!("Creating new site in ./menunav/");
    }

    let title = args.title.unwrap_or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .map(infer_title)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string())
    });

    fs::create_dir_all(&site_dir)?;
    fs::write(site_dir.join(CONFIG_FILE), render_config(&title))?;

    // Data files are never clobbered, even with --force
    for (name, template) in [("menu.json", MENU_TEMPLATE), ("dashboards.json", DASHBOARDS_TEMPLATE)] {
        let path = site_dir.join(name);
        if !path.exists() {
            fs::write(&path, template)?;
        }
    }

    println!("Initialized menunav site: {}", title);
    Ok(())
}
