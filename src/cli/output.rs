use serde::Serialize;

use crate::model::node::{NodeKind, TreeNode};
use crate::ops::navigator::Navigator;
use crate::ops::search::{MatchResult, SearchHit, SearchScope};
use crate::util::text::{display_width, pad_to_width, single_line, truncate_to_width};

/// Widest a title column gets before entries stop being aligned
const MAX_TITLE_COLUMN: usize = 32;
/// Descriptions are cut to this many cells in listings
const DESCRIPTION_WIDTH: usize = 48;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EntryJson {
    pub title: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_frequency: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_home: bool,
}

#[derive(Serialize)]
pub struct LocationJson {
    pub breadcrumbs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub entries: Vec<EntryJson>,
}

#[derive(Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActivationJson {
    Navigated { location: LocationJson },
    OpenExternal { url: String },
    Empty { title: String },
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub title: String,
    pub kind: NodeKind,
    pub field: &'static str,
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct SearchJson {
    pub query: String,
    pub scope: SearchScope,
    pub no_results: bool,
    pub matches: Vec<SearchHitJson>,
}

#[derive(Serialize)]
pub struct LanguageJson {
    pub language: String,
    pub default_language: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn entry_to_json(node: &TreeNode) -> EntryJson {
    EntryJson {
        title: node.title.clone(),
        kind: node.kind(),
        url: node.link().map(str::to_string),
        description: node.description.clone(),
        update_frequency: node.update_frequency.clone(),
        is_home: node.is_home,
    }
}

pub fn location_to_json(nav: &Navigator) -> LocationJson {
    LocationJson {
        breadcrumbs: nav.breadcrumbs().to_vec(),
        current: nav.current().map(|n| n.title.clone()),
        can_go_back: nav.can_go_back(),
        can_go_forward: nav.can_go_forward(),
        entries: nav.entries().iter().map(entry_to_json).collect(),
    }
}

pub fn hit_to_json(hit: &SearchHit<'_>) -> SearchHitJson {
    SearchHitJson {
        title: hit.node.title.clone(),
        kind: hit.node.kind(),
        field: hit.field.name(),
        path: hit.path.iter().map(|s| s.to_string()).collect(),
        url: hit.node.link().map(str::to_string),
    }
}

pub fn search_to_json(query: &str, scope: SearchScope, result: &MatchResult<'_>) -> SearchJson {
    let matches = match result {
        MatchResult::Reset => Vec::new(),
        MatchResult::Hits { matches, .. } => matches.iter().map(hit_to_json).collect(),
    };
    SearchJson {
        query: query.to_string(),
        scope,
        no_results: result.no_results(),
        matches,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One-column marker for an entry
pub fn kind_marker(node: &TreeNode) -> &'static str {
    if node.is_home {
        return "[~]";
    }
    match node.kind() {
        NodeKind::Container => "[+]",
        NodeKind::Leaf => "[>]",
        NodeKind::DeadEnd => "[ ]",
    }
}

/// `Home > Reports > Regional`
pub fn format_trail(breadcrumbs: &[String]) -> String {
    let mut parts = vec!["Home"];
    parts.extend(breadcrumbs.iter().map(|s| s.as_str()));
    parts.join(" > ")
}

/// Entries of a level, titles aligned, descriptions cut to fit.
pub fn format_entries(entries: &[TreeNode]) -> String {
    let title_col = entries
        .iter()
        .map(|n| display_width(&n.title))
        .max()
        .unwrap_or(0)
        .min(MAX_TITLE_COLUMN);

    let mut out = String::new();
    for node in entries {
        let detail = match (&node.description, node.kind()) {
            (Some(d), _) if !d.trim().is_empty() => {
                truncate_to_width(&single_line(d), DESCRIPTION_WIDTH)
            }
            (_, NodeKind::Container) => match node.children.len() {
                1 => "1 item".to_string(),
                n => format!("{} items", n),
            },
            _ => String::new(),
        };
        let line = if detail.is_empty() {
            format!("  {} {}", kind_marker(node), node.title)
        } else {
            format!(
                "  {} {}  {}",
                kind_marker(node),
                pad_to_width(&node.title, title_col),
                detail
            )
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Full view of the current location
pub fn format_location(nav: &Navigator, app_title: &str) -> String {
    let mut out = String::new();
    out.push_str(app_title);
    out.push('\n');
    out.push_str(&format_trail(nav.breadcrumbs()));
    out.push('\n');
    let entries = nav.entries();
    if entries.is_empty() {
        out.push_str("  (nothing here)\n");
    } else {
        out.push_str(&format_entries(entries));
    }
    out.push_str(&format!(
        "back: {}  forward: {}\n",
        yes_no(nav.can_go_back()),
        yes_no(nav.can_go_forward())
    ));
    out
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

/// Indented outline of the menu
pub fn format_tree(roots: &[TreeNode], max_depth: Option<usize>) -> String {
    let mut out = String::new();
    write_tree(roots, 0, max_depth, &mut out);
    out
}

fn write_tree(nodes: &[TreeNode], depth: usize, max_depth: Option<usize>, out: &mut String) {
    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        out.push_str(kind_marker(node));
        out.push(' ');
        out.push_str(&node.title);
        if let Some(url) = node.link() {
            out.push_str(&format!("  ({})", url));
        }
        out.push('\n');
        write_tree(&node.children, depth + 1, max_depth, out);
    }
}

/// Search hits, one per line, with where they live
pub fn format_hits(query: &str, result: &MatchResult<'_>) -> String {
    match result {
        MatchResult::Reset => String::new(),
        MatchResult::Hits { no_results: true, .. } => {
            format!("no items found for \"{}\"\n", query.trim())
        }
        MatchResult::Hits { matches, .. } => {
            let mut out = String::new();
            for hit in matches {
                out.push_str(&format!(
                    "{} {}  [{}]\n",
                    kind_marker(hit.node),
                    hit.node.title,
                    hit.path.join(" > ")
                ));
            }
            out
        }
    }
}
