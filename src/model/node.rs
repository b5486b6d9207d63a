use serde::{Deserialize, Serialize};

/// What a node does when activated, derived from its url and children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Has a url; opens an external resource
    Leaf,
    /// No url, has children; navigable via descent
    Container,
    /// Neither url nor children
    DeadEnd,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Leaf => write!(f, "leaf"),
            NodeKind::Container => write!(f, "container"),
            NodeKind::DeadEnd => write!(f, "dead end"),
        }
    }
}

/// A single menu entry and its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, alias = "childrens", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// How often the linked resource is refreshed ("daily", "weekly", ...)
    #[serde(default, alias = "time", skip_serializing_if = "Option::is_none")]
    pub update_frequency: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_home: bool,
}

impl TreeNode {
    /// Container with the given children
    pub fn container(title: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode {
            title: title.into(),
            children,
            ..Default::default()
        }
    }

    /// Leaf pointing at `url`
    pub fn leaf(title: impl Into<String>, url: impl Into<String>) -> Self {
        TreeNode {
            title: title.into(),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The url, if present and non-empty
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// A url always wins over children.
    pub fn kind(&self) -> NodeKind {
        if self.link().is_some() {
            NodeKind::Leaf
        } else if !self.children.is_empty() {
            NodeKind::Container
        } else {
            NodeKind::DeadEnd
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind() == NodeKind::Container
    }
}

/// Problems found while validating a freshly loaded tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeWarning {
    /// A node has both a url and children; the children are unreachable
    UrlShadowsChildren { path: Vec<String> },
    /// A node has an empty or whitespace-only title
    EmptyTitle { path: Vec<String> },
}

impl std::fmt::Display for TreeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeWarning::UrlShadowsChildren { path } => write!(
                f,
                "{}: has both a url and children, children are unreachable",
                path.join(" > ")
            ),
            TreeWarning::EmptyTitle { path } => {
                write!(f, "{}: empty title", path.join(" > "))
            }
        }
    }
}

/// The whole menu: an ordered list of top-level nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuTree {
    pub roots: Vec<TreeNode>,
}

impl MenuTree {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        MenuTree { roots }
    }

    /// Parse a tree from its JSON form and normalize it.
    pub fn from_json(text: &str) -> Result<(Self, Vec<TreeWarning>), serde_json::Error> {
        let mut tree: MenuTree = serde_json::from_str(text)?;
        let warnings = tree.normalize();
        Ok((tree, warnings))
    }

    /// Turn empty urls into `None` and collect validation warnings.
    pub fn normalize(&mut self) -> Vec<TreeWarning> {
        let mut warnings = Vec::new();
        let mut path = Vec::new();
        for node in &mut self.roots {
            normalize_node(node, &mut path, &mut warnings);
        }
        warnings
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn len(&self) -> usize {
        fn count(nodes: &[TreeNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }
}

fn normalize_node(node: &mut TreeNode, path: &mut Vec<String>, warnings: &mut Vec<TreeWarning>) {
    if node.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
        node.url = None;
    }
    path.push(node.title.clone());
    if node.title.trim().is_empty() {
        warnings.push(TreeWarning::EmptyTitle { path: path.clone() });
    }
    if node.url.is_some() && !node.children.is_empty() {
        warnings.push(TreeWarning::UrlShadowsChildren { path: path.clone() });
    }
    for child in &mut node.children {
        normalize_node(child, path, warnings);
    }
    path.pop();
}
