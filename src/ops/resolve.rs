use crate::model::config::{BasePath, SiteConfig};
use crate::model::dashboard::DashboardRegistry;
use crate::model::node::TreeNode;

/// What activating a node should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<'a> {
    /// Open the url in a new context; the navigation state is untouched
    OpenExternal(String),
    /// Show the node's children
    Descend(&'a TreeNode),
    /// Childless, url-less node: show empty content
    RenderLeaf(&'a TreeNode),
}

/// Error type for dashboard link indirection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("malformed dashboard link '{url}': expected <scheme>:<base key>:<dashboard title>")]
    Malformed { url: String },
    #[error("no base path configured for key '{key}'")]
    UnknownBasePath { key: String },
    #[error("no dashboard named '{title}' in the registry")]
    UnknownDashboard { title: String },
}

/// The two lookup tables dashboard links are resolved against
#[derive(Debug, Clone, Copy)]
pub struct LinkTables<'a> {
    pub scheme: &'a str,
    pub base_paths: &'a [BasePath],
    pub dashboards: &'a DashboardRegistry,
}

impl<'a> LinkTables<'a> {
    pub fn new(config: &'a SiteConfig, dashboards: &'a DashboardRegistry) -> Self {
        LinkTables {
            scheme: &config.links.scheme,
            base_paths: &config.base_paths,
            dashboards,
        }
    }

    fn base_path(&self, key: &str) -> Option<&'a BasePath> {
        self.base_paths.iter().find(|bp| bp.key == key)
    }
}

/// Decide what activating `node` does.
///
/// A url always wins over children. Dashboard links
/// (`<scheme>:<key>:<title>`) are expanded to `<base>/<path>/<id>`; any other
/// url is passed through verbatim.
pub fn resolve<'a>(node: &'a TreeNode, tables: &LinkTables<'_>) -> Result<Action<'a>, ResolutionError> {
    if let Some(url) = node.link() {
        return resolve_url(url, tables).map(Action::OpenExternal);
    }
    if !node.children.is_empty() {
        Ok(Action::Descend(node))
    } else {
        Ok(Action::RenderLeaf(node))
    }
}

/// Expand a single url.
pub fn resolve_url(url: &str, tables: &LinkTables<'_>) -> Result<String, ResolutionError> {
    let mut parts = url.splitn(3, ':');
    let scheme = parts.next().unwrap_or("");
    if scheme != tables.scheme {
        return Ok(url.to_string());
    }
    let (Some(key), Some(title)) = (parts.next(), parts.next()) else {
        return Err(ResolutionError::Malformed {
            url: url.to_string(),
        });
    };

    let base_path = tables
        .base_path(key)
        .ok_or_else(|| ResolutionError::UnknownBasePath {
            key: key.to_string(),
        })?;
    let id = tables
        .dashboards
        .get(title)
        .ok_or_else(|| ResolutionError::UnknownDashboard {
            title: title.to_string(),
        })?;

    Ok(join_link(&base_path.base, &base_path.path, id))
}

fn join_link(base: &str, path: &str, id: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_matches('/');
    let id = id.trim_start_matches('/');
    if path.is_empty() {
        format!("{}/{}", base, id)
    } else {
        format!("{}/{}/{}", base, path, id)
    }
}
