use crate::model::config::BackPolicy;
use crate::model::node::TreeNode;

/// What a navigation operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// A new level was pushed
    Descended { depth: usize },
    /// The title was already on the trail; trail and stack were cut back to it
    Collapsed { depth: usize },
    /// One level was moved onto the redo stack
    Back { depth: usize },
    /// Everything was cleared
    Home,
    /// A level was restored from the redo stack
    Forward { depth: usize },
    /// Trail and stack were truncated by a breadcrumb click
    Jumped { depth: usize },
    /// The call was not valid in the current state; nothing changed
    Ignored,
}

/// Where the user is in the tree.
///
/// Owns the navigation stack, the redo stack and the breadcrumb trail. The
/// fields are private so the three collections only change together, through
/// the operations below; `stack.len() == breadcrumbs.len()` holds after every
/// call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationHistory {
    stack: Vec<TreeNode>,
    redo: Vec<TreeNode>,
    breadcrumbs: Vec<String>,
    back_policy: BackPolicy,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_back_policy(back_policy: BackPolicy) -> Self {
        NavigationHistory {
            back_policy,
            ..Self::default()
        }
    }

    /// Rebuild a history from persisted state.
    ///
    /// The stack is authoritative: if the saved trail does not line up with
    /// it, the trail is rebuilt from the stack titles. The restored node is
    /// then descended into, which collapses the trail onto it when it is
    /// already present.
    pub fn restore(
        back_policy: BackPolicy,
        stack: Vec<TreeNode>,
        breadcrumbs: Vec<String>,
        last_selected: &TreeNode,
    ) -> Self {
        let breadcrumbs = if breadcrumbs.len() == stack.len() {
            breadcrumbs
        } else {
            tracing::warn!(
                stack = stack.len(),
                breadcrumbs = breadcrumbs.len(),
                "saved trail does not match saved stack, rebuilding from stack"
            );
            stack.iter().map(|n| n.title.clone()).collect()
        };
        let mut history = NavigationHistory {
            stack,
            redo: Vec::new(),
            breadcrumbs,
            back_policy,
        };
        history.descend(last_selected);
        history
    }

    /// Reinstall a saved forward history on a restored session.
    ///
    /// Ignored at Home, where there is nothing to go forward from.
    pub fn restore_redo(&mut self, redo: Vec<TreeNode>) {
        if !self.stack.is_empty() {
            self.redo = redo;
        }
    }

    pub fn back_policy(&self) -> BackPolicy {
        self.back_policy
    }

    pub fn stack(&self) -> &[TreeNode] {
        &self.stack
    }

    pub fn redo_stack(&self) -> &[TreeNode] {
        &self.redo
    }

    pub fn breadcrumbs(&self) -> &[String] {
        &self.breadcrumbs
    }

    /// The node being shown, `None` at Home
    pub fn current(&self) -> Option<&TreeNode> {
        self.stack.last()
    }

    pub fn is_home(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn can_go_forward(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Push a container onto the stack and its title onto the trail.
    ///
    /// If the title is already on the trail, both are cut back to that entry
    /// instead. Non-containers are ignored. Always clears the redo stack when
    /// it moves.
    pub fn descend(&mut self, node: &TreeNode) -> NavEvent {
        if !node.is_container() {
            tracing::debug!(title = %node.title, kind = %node.kind(), "descend ignored");
            return NavEvent::Ignored;
        }
        self.redo.clear();

        if let Some(existing) = self.breadcrumbs.iter().position(|t| *t == node.title) {
            self.breadcrumbs.truncate(existing + 1);
            self.stack.truncate(existing + 1);
            tracing::debug!(title = %node.title, depth = self.stack.len(), "trail collapsed");
            return NavEvent::Collapsed {
                depth: self.stack.len(),
            };
        }

        self.stack.push(node.clone());
        self.breadcrumbs.push(node.title.clone());
        tracing::debug!(title = %node.title, depth = self.stack.len(), "descended");
        NavEvent::Descended {
            depth: self.stack.len(),
        }
    }

    /// Step back one level.
    ///
    /// From the first level this resets to Home (or does nothing under
    /// `BackPolicy::Stay`). At Home it does nothing.
    pub fn back(&mut self) -> NavEvent {
        match self.stack.len() {
            0 => NavEvent::Ignored,
            1 => match self.back_policy {
                BackPolicy::Home => self.reset(),
                BackPolicy::Stay => NavEvent::Ignored,
            },
            _ => {
                if let Some(top) = self.stack.pop() {
                    self.redo.push(top);
                }
                self.breadcrumbs.pop();
                tracing::debug!(depth = self.stack.len(), "back");
                NavEvent::Back {
                    depth: self.stack.len(),
                }
            }
        }
    }

    /// Re-enter the most recently undone level.
    pub fn forward(&mut self) -> NavEvent {
        let Some(next) = self.redo.pop() else {
            return NavEvent::Ignored;
        };
        if self.breadcrumbs.last() == Some(&next.title) {
            // Same title already on top of the trail: swap the node in place.
            if let Some(top) = self.stack.last_mut() {
                *top = next;
            }
        } else {
            self.breadcrumbs.push(next.title.clone());
            self.stack.push(next);
        }
        tracing::debug!(depth = self.stack.len(), "forward");
        NavEvent::Forward {
            depth: self.stack.len(),
        }
    }

    /// Cut the trail back to `index` (0-based). Forward history is dropped.
    pub fn jump_to_breadcrumb(&mut self, index: usize) -> NavEvent {
        if index >= self.stack.len() {
            tracing::debug!(index, depth = self.stack.len(), "breadcrumb jump out of range");
            return NavEvent::Ignored;
        }
        self.stack.truncate(index + 1);
        self.breadcrumbs.truncate(index + 1);
        self.redo.clear();
        tracing::debug!(depth = self.stack.len(), "jumped to breadcrumb");
        NavEvent::Jumped {
            depth: self.stack.len(),
        }
    }

    /// Clear everything and return Home.
    pub fn reset(&mut self) -> NavEvent {
        if self.stack.is_empty() && self.redo.is_empty() && self.breadcrumbs.is_empty() {
            return NavEvent::Ignored;
        }
        self.stack.clear();
        self.redo.clear();
        self.breadcrumbs.clear();
        tracing::debug!("reset to home");
        NavEvent::Home
    }
}
