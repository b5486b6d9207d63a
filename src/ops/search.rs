use serde::Serialize;

use crate::model::node::{NodeKind, TreeNode};

/// Which field of a node matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Title,
    Description,
    Url,
}

impl MatchField {
    pub fn name(&self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Description => "description",
            MatchField::Url => "url",
        }
    }
}

/// Where a search looked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SearchScope {
    /// Every level below the top-level entries
    Global,
    /// Only below the node currently shown
    CurrentLevel { title: String },
}

/// A matching node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub node: &'a TreeNode,
    pub field: MatchField,
    /// Titles from the search root down to the node's parent. The root is
    /// the scope node for a scoped search, the top-level node otherwise.
    pub path: Vec<&'a str>,
}

/// Outcome of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<'a> {
    /// The query was empty: put back whatever was shown before searching
    Reset,
    Hits {
        matches: Vec<SearchHit<'a>>,
        no_results: bool,
    },
}

impl<'a> MatchResult<'a> {
    /// Matched nodes in tree order; empty for `Reset`.
    pub fn nodes(&self) -> Vec<&'a TreeNode> {
        match self {
            MatchResult::Reset => Vec::new(),
            MatchResult::Hits { matches, .. } => matches.iter().map(|h| h.node).collect(),
        }
    }

    pub fn no_results(&self) -> bool {
        matches!(self, MatchResult::Hits { no_results: true, .. })
    }
}

/// Options that shape the predicate
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Only nodes with a url can match
    pub leaves_only: bool,
}

/// Trim and case-fold a query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Search the tree.
///
/// With no `scope`, every top-level node's descendants are searched (the
/// top-level nodes themselves never match). With a `scope`, only that node's
/// descendants are. Matching is case-insensitive substring containment on
/// title, description and url; hits come back in depth-first tree order.
pub fn search<'a>(
    roots: &'a [TreeNode],
    query: &str,
    scope: Option<&'a TreeNode>,
    options: SearchOptions,
) -> MatchResult<'a> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return MatchResult::Reset;
    }

    let mut matches = Vec::new();
    match scope {
        Some(node) => {
            let mut path = vec![node.title.as_str()];
            search_nodes(&node.children, &needle, options, &mut path, &mut matches);
        }
        None => {
            for top in roots {
                let mut path = vec![top.title.as_str()];
                search_nodes(&top.children, &needle, options, &mut path, &mut matches);
            }
        }
    }

    let no_results = matches.is_empty();
    MatchResult::Hits {
        matches,
        no_results,
    }
}

fn search_nodes<'a>(
    nodes: &'a [TreeNode],
    needle: &str,
    options: SearchOptions,
    path: &mut Vec<&'a str>,
    hits: &mut Vec<SearchHit<'a>>,
) {
    for node in nodes {
        if let Some(field) = match_node(node, needle, options) {
            hits.push(SearchHit {
                node,
                field,
                path: path.clone(),
            });
        }
        if !node.children.is_empty() {
            path.push(&node.title);
            search_nodes(&node.children, needle, options, path, hits);
            path.pop();
        }
    }
}

/// First field of `node` containing `needle` (already normalized).
fn match_node(node: &TreeNode, needle: &str, options: SearchOptions) -> Option<MatchField> {
    if options.leaves_only && node.kind() != NodeKind::Leaf {
        return None;
    }
    let contains = |text: &str| text.to_lowercase().contains(needle);
    if contains(&node.title) {
        Some(MatchField::Title)
    } else if node.description.as_deref().is_some_and(contains) {
        Some(MatchField::Description)
    } else if node.url.as_deref().is_some_and(contains) {
        Some(MatchField::Url)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Search state
// ---------------------------------------------------------------------------

/// What the caller should show after a query change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchUpdate {
    /// Show `SearchState::matches`
    Results,
    /// The search was cleared: restore the view from before searching
    RestoreView,
    /// Empty query with no active search: nothing to do
    Idle,
}

/// The current search, recomputed on every query change.
///
/// Matches are owned so the state can outlive a borrow of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub scope: SearchScope,
    pub matches: Vec<TreeNode>,
    pub no_results: bool,
    active: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState {
            query: String::new(),
            scope: SearchScope::Global,
            matches: Vec::new(),
            no_results: false,
            active: false,
        }
    }
}

impl SearchState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run `query` and record the outcome.
    ///
    /// Clearing an active search yields `RestoreView` once; clearing again
    /// yields `Idle`.
    pub fn update(
        &mut self,
        roots: &[TreeNode],
        query: &str,
        scope: Option<&TreeNode>,
        options: SearchOptions,
    ) -> SearchUpdate {
        self.query = query.to_string();
        self.scope = match scope {
            Some(node) => SearchScope::CurrentLevel {
                title: node.title.clone(),
            },
            None => SearchScope::Global,
        };

        match search(roots, query, scope, options) {
            MatchResult::Reset => {
                self.matches.clear();
                self.no_results = false;
                if std::mem::replace(&mut self.active, false) {
                    SearchUpdate::RestoreView
                } else {
                    SearchUpdate::Idle
                }
            }
            MatchResult::Hits {
                matches,
                no_results,
            } => {
                self.matches = matches.into_iter().map(|h| h.node.clone()).collect();
                self.no_results = no_results;
                self.active = true;
                SearchUpdate::Results
            }
        }
    }

    /// Drop the search without signalling a restore.
    pub fn clear(&mut self) {
        *self = SearchState::default();
    }
}
