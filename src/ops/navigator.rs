use crate::io::state::SessionState;
use crate::model::config::SiteConfig;
use crate::model::dashboard::DashboardRegistry;
use crate::model::node::{MenuTree, TreeNode};
use crate::ops::history::{NavEvent, NavigationHistory};
use crate::ops::resolve::{self, Action, LinkTables, ResolutionError};
use crate::ops::search::{SearchOptions, SearchState, SearchUpdate};

/// Everything the engine needs before navigation is possible
#[derive(Debug, Clone)]
pub struct MenuData {
    pub tree: MenuTree,
    pub config: SiteConfig,
    pub dashboards: DashboardRegistry,
}

/// Result of activating a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Navigation moved (descent, collapse or home)
    Navigated(NavEvent),
    /// Open this url in a new context; navigation did not move
    OpenExternal(String),
    /// Dead end: show empty content
    Empty,
    /// Nothing loaded yet, or the node cannot be entered
    Ignored,
}

/// One user's session over a loaded menu.
///
/// All user actions go through here. Until data is loaded every navigation
/// call is ignored and the session stays at Home.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    data: Option<MenuData>,
    history: NavigationHistory,
    search: SearchState,
}

impl Navigator {
    /// An empty navigator waiting for data.
    pub fn new() -> Self {
        Self::default()
    }

    /// A navigator over already loaded data, starting at Home.
    pub fn with_data(data: MenuData) -> Self {
        let mut nav = Navigator::new();
        nav.load(data);
        nav
    }

    /// Install the menu data. Any previous navigation is discarded.
    pub fn load(&mut self, data: MenuData) {
        self.history = NavigationHistory::with_back_policy(data.config.navigation.back_policy);
        self.search.clear();
        tracing::debug!(nodes = data.tree.len(), dashboards = data.dashboards.len(), "menu data loaded");
        self.data = Some(data);
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&MenuData> {
        self.data.as_ref()
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn current(&self) -> Option<&TreeNode> {
        self.history.current()
    }

    pub fn breadcrumbs(&self) -> &[String] {
        self.history.breadcrumbs()
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    /// Entries shown at the current level: the top-level menu at Home,
    /// otherwise the current node's children.
    pub fn entries(&self) -> &[TreeNode] {
        match (self.history.current(), &self.data) {
            (Some(node), _) => &node.children,
            (None, Some(data)) => &data.tree.roots,
            (None, None) => &[],
        }
    }

    /// Find an entry of the current level by title: exact match first, then
    /// case-insensitive.
    pub fn find_entry(&self, title: &str) -> Option<&TreeNode> {
        let entries = self.entries();
        entries.iter().find(|n| n.title == title).or_else(|| {
            let wanted = title.to_lowercase();
            entries.iter().find(|n| n.title.to_lowercase() == wanted)
        })
    }

    /// Activate a node: reset on the home sentinel, open links, descend into
    /// containers.
    ///
    /// A resolution error leaves the session untouched.
    pub fn activate(&mut self, node: &TreeNode) -> Result<Activation, ResolutionError> {
        let Some(data) = &self.data else {
            tracing::debug!(title = %node.title, "activate before data loaded");
            return Ok(Activation::Ignored);
        };
        if node.is_home {
            return Ok(self.home_event());
        }

        let tables = LinkTables::new(&data.config, &data.dashboards);
        let action = resolve::resolve(node, &tables).inspect_err(|e| {
            tracing::warn!(title = %node.title, error = %e, "could not resolve link");
        })?;

        match action {
            Action::OpenExternal(url) => {
                tracing::debug!(title = %node.title, %url, "open external");
                Ok(Activation::OpenExternal(url))
            }
            Action::Descend(target) => {
                let event = self.history.descend(target);
                if event != NavEvent::Ignored {
                    self.search.clear();
                }
                Ok(Activation::Navigated(event))
            }
            Action::RenderLeaf(_) => Ok(Activation::Empty),
        }
    }

    /// Descend into a container directly.
    pub fn descend(&mut self, node: &TreeNode) -> NavEvent {
        if !self.is_loaded() {
            return NavEvent::Ignored;
        }
        let event = self.history.descend(node);
        self.after_move(&event);
        event
    }

    pub fn back(&mut self) -> NavEvent {
        if !self.is_loaded() {
            return NavEvent::Ignored;
        }
        let event = self.history.back();
        self.after_move(&event);
        event
    }

    pub fn forward(&mut self) -> NavEvent {
        if !self.is_loaded() {
            return NavEvent::Ignored;
        }
        let event = self.history.forward();
        self.after_move(&event);
        event
    }

    pub fn jump_to_breadcrumb(&mut self, index: usize) -> NavEvent {
        if !self.is_loaded() {
            return NavEvent::Ignored;
        }
        let event = self.history.jump_to_breadcrumb(index);
        self.after_move(&event);
        event
    }

    pub fn home(&mut self) -> NavEvent {
        let event = self.history.reset();
        self.after_move(&event);
        event
    }

    fn home_event(&mut self) -> Activation {
        Activation::Navigated(self.home())
    }

    fn after_move(&mut self, event: &NavEvent) {
        if *event != NavEvent::Ignored {
            self.search.clear();
        }
    }

    /// Search from the current location: globally at Home, otherwise below
    /// the current node.
    pub fn search(&mut self, query: &str) -> SearchUpdate {
        let Some(data) = &self.data else {
            return SearchUpdate::Idle;
        };
        let options = SearchOptions {
            leaves_only: data.config.search.leaves_only,
        };
        let update = self
            .search
            .update(&data.tree.roots, query, self.history.current(), options);
        tracing::debug!(
            query,
            matches = self.search.matches.len(),
            update = ?update,
            "search"
        );
        update
    }

    /// Re-enter a persisted session.
    ///
    /// Only when the saved node, trail and stack are all present; otherwise
    /// the session starts at Home. The saved nodes are matched by title path
    /// against the loaded menu, so edits made since the session was saved
    /// show up; the trail is cut back at the first level that no longer
    /// exists. Returns whether anything was restored.
    pub fn restore(&mut self, session: &SessionState) -> bool {
        let Some(data) = &self.data else {
            return false;
        };
        let (Some(last), Some(trail), Some(stack)) = (
            session.last_selected.as_ref(),
            session.breadcrumbs.as_ref(),
            session.stack.as_ref(),
        ) else {
            return false;
        };
        let back_policy = data.config.navigation.back_policy;
        self.search.clear();

        let live_stack = follow_titles(&data.tree.roots, stack.iter().map(|n| n.title.as_str()));
        let intact = live_stack.len() == stack.len();
        if !intact {
            tracing::warn!(
                saved = stack.len(),
                kept = live_stack.len(),
                "menu changed since the session was saved, trail cut back"
            );
        }

        let below = live_stack.last().map_or(&data.tree.roots[..], |n| &n.children[..]);
        let live_last = match live_stack.last() {
            Some(top) if top.title == last.title => Some(*top),
            top if intact => below.iter().find(|n| n.title == last.title).or(top.copied()),
            top => top.copied(),
        };
        let Some(live_last) = live_last else {
            self.history = NavigationHistory::with_back_policy(back_policy);
            return false;
        };

        let trail = if trail.len() == stack.len() {
            trail[..live_stack.len()].to_vec()
        } else {
            trail.clone()
        };
        self.history = NavigationHistory::restore(
            back_policy,
            live_stack.into_iter().cloned().collect(),
            trail,
            live_last,
        );

        // Forward history only makes sense on top of the exact saved trail
        if intact
            && let Some(forward) = &session.forward
            && let Some(current) = self.history.current()
        {
            let mut redo = follow_titles(&current.children, forward.iter().rev().map(|n| n.title.as_str()))
                .into_iter()
                .cloned()
                .collect::<Vec<_>>();
            redo.reverse();
            self.history.restore_redo(redo);
        }

        tracing::debug!(depth = self.history.depth(), "session restored");
        !self.history.is_home()
    }

    /// Snapshot the navigation for persistence.
    pub fn to_session(&self, language: Option<String>) -> SessionState {
        let mut session = SessionState {
            language,
            saved_at: Some(chrono::Utc::now()),
            ..Default::default()
        };
        if let Some(current) = self.history.current() {
            session.last_selected = Some(current.clone());
            session.breadcrumbs = Some(self.history.breadcrumbs().to_vec());
            session.stack = Some(self.history.stack().to_vec());
            if self.history.can_go_forward() {
                session.forward = Some(self.history.redo_stack().to_vec());
            }
        }
        session
    }
}

/// Walk `titles` down from `level`, one tree level per title, stopping at
/// the first title that is not there.
fn follow_titles<'a, 't>(
    mut level: &'a [TreeNode],
    titles: impl IntoIterator<Item = &'t str>,
) -> Vec<&'a TreeNode> {
    let mut found = Vec::new();
    for title in titles {
        let Some(node) = level.iter().find(|n| n.title == title) else {
            break;
        };
        found.push(node);
        level = &node.children;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{BackPolicy, BasePath};
    use pretty_assertions::assert_eq;

    fn sample_data() -> MenuData {
        let tree = MenuTree::new(vec![
            TreeNode {
                title: "Home".into(),
                is_home: true,
                ..Default::default()
            },
            TreeNode::container(
                "Reports",
                vec![
                    TreeNode::leaf("SalesDash", "sisense:base1:Sales"),
                    TreeNode::leaf("Broken", "sisense:base1:Missing"),
                    TreeNode::container("Empty", vec![]),
                    TreeNode::container(
                        "Regional",
                        vec![TreeNode::leaf("North", "https://north")],
                    ),
                ],
            ),
        ]);
        let mut config = SiteConfig::default();
        config.base_paths.push(BasePath {
            key: "base1".into(),
            base: "https://bi".into(),
            path: "embed".into(),
        });
        let mut dashboards = DashboardRegistry::default();
        dashboards.insert("Sales", "id-42");
        MenuData {
            tree,
            config,
            dashboards,
        }
    }

    fn reports(nav: &Navigator) -> TreeNode {
        nav.data().unwrap().tree.roots[1].clone()
    }

    #[test]
    fn unloaded_navigator_ignores_everything() {
        let mut nav = Navigator::new();
        let node = TreeNode::container("A", vec![TreeNode::leaf("x", "y")]);
        assert_eq!(nav.activate(&node), Ok(Activation::Ignored));
        assert_eq!(nav.descend(&node), NavEvent::Ignored);
        assert_eq!(nav.back(), NavEvent::Ignored);
        assert_eq!(nav.forward(), NavEvent::Ignored);
        assert_eq!(nav.jump_to_breadcrumb(0), NavEvent::Ignored);
        assert_eq!(nav.search("x"), SearchUpdate::Idle);
        assert!(nav.history().is_home());
        assert!(nav.entries().is_empty());
    }

    #[test]
    fn descend_then_open_dashboard() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        assert_eq!(
            nav.activate(&reports),
            Ok(Activation::Navigated(NavEvent::Descended { depth: 1 }))
        );
        let sales = nav.find_entry("SalesDash").unwrap().clone();
        assert_eq!(
            nav.activate(&sales),
            Ok(Activation::OpenExternal("https://bi/embed/id-42".into()))
        );
        assert_eq!(nav.breadcrumbs(), &["Reports"]);
    }

    #[test]
    fn resolution_error_leaves_state_alone() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let before = nav.history().clone();
        let broken = nav.find_entry("broken").unwrap().clone();
        assert_eq!(
            nav.activate(&broken),
            Err(ResolutionError::UnknownDashboard {
                title: "Missing".into()
            })
        );
        assert_eq!(nav.history(), &before);
    }

    #[test]
    fn dead_end_renders_empty_without_moving() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let empty = nav.find_entry("Empty").unwrap().clone();
        assert_eq!(nav.activate(&empty), Ok(Activation::Empty));
        assert_eq!(nav.history().depth(), 1);
    }

    #[test]
    fn home_sentinel_resets() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let home = nav.data().unwrap().tree.roots[0].clone();
        assert_eq!(nav.activate(&home), Ok(Activation::Navigated(NavEvent::Home)));
        assert!(nav.history().is_home());
    }

    #[test]
    fn entries_follow_location() {
        let mut nav = Navigator::with_data(sample_data());
        assert_eq!(nav.entries().len(), 2);
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let titles: Vec<_> = nav.entries().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["SalesDash", "Broken", "Empty", "Regional"]);
    }

    #[test]
    fn search_scope_follows_location() {
        let mut nav = Navigator::with_data(sample_data());
        assert_eq!(nav.search("north"), SearchUpdate::Results);
        assert_eq!(nav.search_state().matches.len(), 1);

        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let regional = nav.find_entry("Regional").unwrap().clone();
        nav.activate(&regional).unwrap();
        assert_eq!(nav.search("sales"), SearchUpdate::Results);
        assert!(nav.search_state().no_results);
    }

    #[test]
    fn moving_clears_active_search() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        nav.search("north");
        assert!(nav.search_state().is_active());
        nav.back();
        assert!(!nav.search_state().is_active());
        assert_eq!(nav.search(""), SearchUpdate::Idle);
    }

    #[test]
    fn session_round_trip() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let regional = nav.find_entry("Regional").unwrap().clone();
        nav.activate(&regional).unwrap();

        let session = nav.to_session(Some("en".into()));
        assert_eq!(session.breadcrumbs.as_deref().unwrap(), &["Reports", "Regional"]);

        let mut restored = Navigator::with_data(sample_data());
        assert!(restored.restore(&session));
        assert_eq!(restored.breadcrumbs(), nav.breadcrumbs());
        assert_eq!(restored.current(), nav.current());
        assert!(!restored.can_go_forward());
    }

    #[test]
    fn forward_history_survives_a_session() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let regional = nav.find_entry("Regional").unwrap().clone();
        nav.activate(&regional).unwrap();
        nav.back();

        let session = nav.to_session(None);
        assert_eq!(session.forward.as_ref().map(Vec::len), Some(1));

        let mut restored = Navigator::with_data(sample_data());
        restored.restore(&session);
        assert!(restored.can_go_forward());
        assert_eq!(restored.forward(), NavEvent::Forward { depth: 2 });
        assert_eq!(restored.breadcrumbs(), &["Reports", "Regional"]);
    }

    #[test]
    fn partial_session_starts_at_home() {
        let mut nav = Navigator::with_data(sample_data());
        let session = SessionState {
            breadcrumbs: Some(vec!["Reports".into()]),
            ..Default::default()
        };
        assert!(!nav.restore(&session));
        assert!(nav.history().is_home());
    }

    fn edited(edit: impl FnOnce(&mut Vec<TreeNode>)) -> MenuData {
        let mut data = sample_data();
        edit(&mut data.tree.roots);
        data
    }

    #[test]
    fn restored_session_sees_menu_edits() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let session = nav.to_session(None);

        let data = edited(|roots| roots[1].children[1].url = Some("https://fixed".into()));
        let mut restored = Navigator::with_data(data);
        assert!(restored.restore(&session));
        let broken = restored.find_entry("Broken").unwrap().clone();
        assert_eq!(
            restored.activate(&broken),
            Ok(Activation::OpenExternal("https://fixed".into()))
        );
    }

    #[test]
    fn removed_level_cuts_the_trail_back() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let regional = nav.find_entry("Regional").unwrap().clone();
        nav.activate(&regional).unwrap();
        let session = nav.to_session(None);

        let data = edited(|roots| roots[1].children.retain(|n| n.title != "Regional"));
        let mut restored = Navigator::with_data(data);
        assert!(restored.restore(&session));
        assert_eq!(restored.breadcrumbs(), &["Reports"]);
        assert_eq!(restored.history().stack().len(), 1);
        assert_eq!(restored.entries().len(), 3);
    }

    #[test]
    fn removed_root_starts_at_home() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let session = nav.to_session(None);

        let data = edited(|roots| roots.truncate(1));
        let mut restored = Navigator::with_data(data);
        assert!(!restored.restore(&session));
        assert!(restored.history().is_home());
    }

    #[test]
    fn forward_to_a_removed_level_is_dropped() {
        let mut nav = Navigator::with_data(sample_data());
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        let regional = nav.find_entry("Regional").unwrap().clone();
        nav.activate(&regional).unwrap();
        nav.back();
        let session = nav.to_session(None);

        let data = edited(|roots| roots[1].children.retain(|n| n.title != "Regional"));
        let mut restored = Navigator::with_data(data);
        assert!(restored.restore(&session));
        assert_eq!(restored.breadcrumbs(), &["Reports"]);
        assert!(!restored.can_go_forward());
    }

    #[test]
    fn home_session_has_no_navigation_keys() {
        let nav = Navigator::with_data(sample_data());
        let session = nav.to_session(None);
        assert!(session.last_selected.is_none());
        assert!(session.breadcrumbs.is_none());
        assert!(session.stack.is_none());
    }

    #[test]
    fn back_policy_comes_from_config() {
        let mut data = sample_data();
        data.config.navigation.back_policy = BackPolicy::Stay;
        let mut nav = Navigator::with_data(data);
        let reports = reports(&nav);
        nav.activate(&reports).unwrap();
        assert_eq!(nav.back(), NavEvent::Ignored);
        assert_eq!(nav.breadcrumbs(), &["Reports"]);
    }
}
