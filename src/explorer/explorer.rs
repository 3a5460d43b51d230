use super::node::{NodeState, TreeNode};
use super::tree::{build_children, Tree};
use crate::core::error::{Error, Result};
use crate::listing::{normalize_path, DirectoryEntry, DirectoryLister};
use crate::view::{self, TreeView};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Whether the highlighted path was found after ancestor expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HighlightStatus {
    /// No highlight requested
    None,
    /// The highlighted node is present in the tree
    Resolved,
    /// The chain broke off; `deepest` is the last expanded ancestor
    Stale { deepest: Option<String> },
}

/// Handle to a directory node
///
/// Only [`TreeExplorer::dir`] hands these out, and only for directories,
/// so files can never reach `expand`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirRef {
    path: String,
}

impl DirRef {
    pub fn path(&self) -> &str {
        &self.path
    }
}

struct Inner {
    tree: Tree,
    highlight: HighlightStatus,
    /// In-flight loads by ticket; the sender side closes once the listing is applied
    loads: HashMap<u64, watch::Receiver<()>>,
}

/// What an `expand` call has to do after inspecting the node
enum Step {
    Done,
    Fetch {
        ticket: u64,
        done: watch::Sender<()>,
    },
    Join {
        ticket: u64,
        pending: watch::Receiver<()>,
    },
}

/// Lazily loaded file tree for one repository view
///
/// All operations take `&self`; the tree lock is never held while a listing
/// is being fetched, so expansions of different directories can overlap.
pub struct TreeExplorer {
    repository: String,
    highlighted: String,
    lister: Arc<dyn DirectoryLister>,
    inner: Mutex<Inner>,
    next_ticket: AtomicU64,
}

impl TreeExplorer {
    /// Fetch the root listing and expand every ancestor of `highlighted`
    ///
    /// # Errors
    ///
    /// `InvalidRepository` for an empty repository, `ListingFailed` if the
    /// root listing cannot be fetched. A highlight that cannot be fully
    /// resolved is not an error; see [`HighlightStatus`].
    pub async fn load(
        lister: Arc<dyn DirectoryLister>,
        repository: &str,
        highlighted: &str,
    ) -> Result<Self> {
        let repository = repository.trim();
        if repository.is_empty() {
            return Err(Error::InvalidRepository);
        }
        let highlighted = normalize_path(highlighted).to_string();

        let root = lister
            .list_directory(repository, "")
            .await
            .map_err(|e| Error::ListingFailed {
                repository: repository.to_string(),
                message: e.user_message(),
            })?;

        let explorer = Self {
            repository: repository.to_string(),
            highlighted,
            lister,
            inner: Mutex::new(Inner {
                tree: Tree::from_listing(root),
                highlight: HighlightStatus::None,
                loads: HashMap::new(),
            }),
            next_ticket: AtomicU64::new(1),
        };

        if !explorer.highlighted.is_empty() {
            explorer.expand_ancestors().await;
        }

        Ok(explorer)
    }

    /// Expand ancestors of the highlight one level at a time, root first
    async fn expand_ancestors(&self) {
        let mut parent = String::new();
        let mut deepest = None;

        loop {
            let next = {
                let inner = self.inner.lock();
                inner.tree.children_of(&parent).and_then(|children| {
                    children
                        .iter()
                        .find(|n| n.is_dir() && is_ancestor(n.path(), &self.highlighted))
                        .map(|n| n.path().to_string())
                })
            };

            let Some(path) = next else {
                break;
            };

            let dir = DirRef { path: path.clone() };
            if let Err(e) = self.expand(&dir).await {
                warn!(path = %path, error = %e, "ancestor expansion stopped");
                break;
            }

            deepest = Some(path.clone());
            parent = path;
        }

        let mut inner = self.inner.lock();
        inner.highlight = if inner.tree.find(&self.highlighted).is_some() {
            HighlightStatus::Resolved
        } else {
            info!(
                highlighted = %self.highlighted,
                "highlighted path not found in repository tree"
            );
            HighlightStatus::Stale { deepest }
        };
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Normalized highlighted path (`""` when none)
    pub fn highlighted(&self) -> &str {
        &self.highlighted
    }

    pub fn highlight_status(&self) -> HighlightStatus {
        self.inner.lock().highlight.clone()
    }

    /// Handle for the directory at `path`, if it is a directory in the tree
    pub fn dir(&self, path: &str) -> Option<DirRef> {
        let path = normalize_path(path);
        let inner = self.inner.lock();
        inner
            .tree
            .find(path)
            .filter(|n| n.is_dir())
            .map(|n| DirRef {
                path: n.path().to_string(),
            })
    }

    /// Run `f` against the current tree
    pub fn with_tree<R>(&self, f: impl FnOnce(&Tree) -> R) -> R {
        f(&self.inner.lock().tree)
    }

    /// Expand a directory, fetching its listing the first time
    ///
    /// Already loaded directories reuse their cached children. A directory
    /// that is still loading gets its expansion intent restored and the call
    /// waits for that load instead of fetching again.
    ///
    /// # Errors
    ///
    /// `ExpandFailed` if the listing fetch fails; the node is left unloaded
    /// with its inline error set so a later call retries.
    pub async fn expand(&self, dir: &DirRef) -> Result<()> {
        loop {
            match self.begin_expand(dir)? {
                Step::Done => return Ok(()),
                Step::Fetch { ticket, done } => return self.fetch(dir, ticket, done).await,
                Step::Join { ticket, pending } => {
                    if let Some(outcome) = self.join_load(dir, ticket, pending).await {
                        return outcome;
                    }
                }
            }
        }
    }

    fn begin_expand(&self, dir: &DirRef) -> Result<Step> {
        let mut inner = self.inner.lock();
        let Inner { tree, loads, .. } = &mut *inner;
        let node = tree.find_mut(&dir.path).ok_or_else(|| Error::UnknownNode {
            path: dir.path.clone(),
        })?;

        let step = match node.state {
            NodeState::Leaf => {
                return Err(Error::NotADirectory {
                    path: dir.path.clone(),
                })
            }
            NodeState::Loaded { .. } => {
                node.state = NodeState::Loaded { expanded: true };
                Step::Done
            }
            NodeState::Loading { ticket, .. } => match loads.get(&ticket) {
                Some(pending) if pending.has_changed().is_ok() => {
                    node.state = NodeState::Loading {
                        ticket,
                        expand_on_load: true,
                    };
                    Step::Join {
                        ticket,
                        pending: pending.clone(),
                    }
                }
                // The expansion that owned this ticket was dropped mid-fetch
                _ => {
                    debug!(path = %dir.path, ticket, "restarting abandoned load");
                    loads.remove(&ticket);
                    self.start_load(node, loads)
                }
            },
            NodeState::Unloaded => self.start_load(node, loads),
        };
        Ok(step)
    }

    fn start_load(
        &self,
        node: &mut TreeNode,
        loads: &mut HashMap<u64, watch::Receiver<()>>,
    ) -> Step {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        node.state = NodeState::Loading {
            ticket,
            expand_on_load: true,
        };
        node.error = None;

        let (done, pending) = watch::channel(());
        loads.insert(ticket, pending);
        Step::Fetch { ticket, done }
    }

    async fn fetch(&self, dir: &DirRef, ticket: u64, done: watch::Sender<()>) -> Result<()> {
        debug!(repository = %self.repository, path = %dir.path, ticket, "loading directory");
        let result = self.lister.list_directory(&self.repository, &dir.path).await;

        let outcome = self.apply_listing(dir, ticket, result);
        // Closing the channel wakes every expansion that joined this load
        drop(done);
        outcome
    }

    fn apply_listing(
        &self,
        dir: &DirRef,
        ticket: u64,
        result: Result<Vec<DirectoryEntry>>,
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.loads.remove(&ticket);

        let Some(node) = inner.tree.find_mut(&dir.path) else {
            debug!(path = %dir.path, "discarding listing for node no longer in tree");
            return Ok(());
        };

        let expand_on_load = match node.state {
            NodeState::Loading {
                ticket: current,
                expand_on_load,
            } if current == ticket => expand_on_load,
            _ => {
                debug!(path = %dir.path, ticket, "discarding stale listing");
                return Ok(());
            }
        };

        match result {
            Ok(entries) => {
                node.children = build_children(&dir.path, entries);
                node.state = NodeState::Loaded {
                    expanded: expand_on_load,
                };
                Ok(())
            }
            Err(e) => {
                let message = e.user_message();
                warn!(path = %dir.path, error = %message, "failed to expand directory");
                node.state = NodeState::Unloaded;
                node.error = Some(message.clone());
                Err(Error::ExpandFailed {
                    path: dir.path.clone(),
                    message,
                })
            }
        }
    }

    /// Wait for another expansion's fetch, then report how it ended
    ///
    /// `None` means the fetch was abandoned before it applied and the
    /// caller should try again.
    async fn join_load(
        &self,
        dir: &DirRef,
        ticket: u64,
        mut pending: watch::Receiver<()>,
    ) -> Option<Result<()>> {
        // Nothing is ever sent; `changed` errors once the sender is dropped
        while pending.changed().await.is_ok() {}

        let inner = self.inner.lock();
        match inner.tree.find(&dir.path) {
            Some(node) if node.state == NodeState::Unloaded => match node.error() {
                Some(message) => Some(Err(Error::ExpandFailed {
                    path: dir.path.clone(),
                    message: message.to_string(),
                })),
                None => Some(Ok(())),
            },
            Some(node) if matches!(node.state, NodeState::Loading { ticket: t, .. } if t == ticket) => {
                None
            }
            _ => Some(Ok(())),
        }
    }

    /// Collapse a directory, keeping its children for cheap re-expansion
    pub fn collapse(&self, dir: &DirRef) {
        let mut inner = self.inner.lock();
        let Some(node) = inner.tree.find_mut(&dir.path) else {
            return;
        };

        match node.state {
            NodeState::Loaded { .. } => node.state = NodeState::Loaded { expanded: false },
            NodeState::Loading { ticket, .. } => {
                node.state = NodeState::Loading {
                    ticket,
                    expand_on_load: false,
                }
            }
            NodeState::Leaf | NodeState::Unloaded => {}
        }
    }

    /// Collapse if expanded, expand otherwise
    pub async fn toggle(&self, dir: &DirRef) -> Result<()> {
        let expanded = self.with_tree(|tree| tree.find(&dir.path).is_some_and(|n| n.is_expanded()));
        if expanded {
            self.collapse(dir);
            Ok(())
        } else {
            self.expand(dir).await
        }
    }

    /// View model of the current state
    pub fn view(&self) -> TreeView {
        let inner = self.inner.lock();
        TreeView {
            repository: self.repository.clone(),
            highlighted: (!self.highlighted.is_empty()).then(|| self.highlighted.clone()),
            highlight: inner.highlight.clone(),
            breadcrumb: view::breadcrumb(&self.highlighted),
            nodes: view::render(&inner.tree, &self.highlighted),
        }
    }
}

/// `dir` is a proper ancestor of `path`
fn is_ancestor(dir: &str, path: &str) -> bool {
    path.len() > dir.len() + 1 && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{DirectoryEntry, MemoryLister};

    const REPO: &str = "octo/repo";

    fn url(path: &str) -> String {
        format!("https://github.com/{}/blob/main/{}", REPO, path)
    }

    fn dir(path: &str) -> DirectoryEntry {
        DirectoryEntry::dir(path, &url(path))
    }

    fn file(path: &str) -> DirectoryEntry {
        DirectoryEntry::file(path, &url(path))
    }

    /// a/ { b/ { c.txt, d.txt }, e/ { f.txt } }, x/ { y.txt }, top.txt
    fn nested_lister() -> Arc<MemoryLister> {
        Arc::new(
            MemoryLister::new(REPO)
                .with_dir("", vec![dir("a"), dir("x"), file("top.txt")])
                .with_dir("a", vec![dir("a/b"), dir("a/e")])
                .with_dir("a/b", vec![file("a/b/c.txt"), file("a/b/d.txt")])
                .with_dir("a/e", vec![file("a/e/f.txt")])
                .with_dir("x", vec![file("x/y.txt")]),
        )
    }

    #[tokio::test]
    async fn test_empty_highlight_single_fetch() {
        let lister = nested_lister();
        let explorer = TreeExplorer::load(lister.clone(), REPO, "").await.unwrap();

        assert_eq!(lister.calls(), vec![""]);
        assert_eq!(explorer.highlight_status(), HighlightStatus::None);
        explorer.with_tree(|tree| {
            assert_eq!(tree.roots().len(), 3);
            assert!(tree.roots().iter().all(|n| !n.is_expanded()));
        });
    }

    #[tokio::test]
    async fn test_ancestor_expansion() {
        let lister = nested_lister();
        let explorer = TreeExplorer::load(lister.clone(), REPO, "a/b/c.txt")
            .await
            .unwrap();

        // Root to leaf, nothing off the chain
        assert_eq!(lister.calls(), vec!["", "a", "a/b"]);
        assert_eq!(explorer.highlight_status(), HighlightStatus::Resolved);

        explorer.with_tree(|tree| {
            assert!(tree.find("a").unwrap().is_expanded());
            assert!(tree.find("a/b").unwrap().is_expanded());
            assert!(!tree.find("a/e").unwrap().is_loaded());
            assert!(!tree.find("x").unwrap().is_loaded());
            assert!(tree.find("a/b/c.txt").unwrap().is_file());
        });

        let view = explorer.view();
        let a = &view.nodes[0];
        let b = &a.children[0];
        assert!(b.children[0].highlighted);
        assert!(!b.children[1].highlighted);
    }

    #[tokio::test]
    async fn test_scenario_octo_repo() {
        let lister = Arc::new(
            MemoryLister::new(REPO)
                .with_dir("", vec![dir("src"), file("README.md")])
                .with_dir("src", vec![file("src/index.js")]),
        );

        let explorer = TreeExplorer::load(lister.clone(), REPO, "src/index.js")
            .await
            .unwrap();

        assert_eq!(lister.calls(), vec!["", "src"]);
        explorer.with_tree(|tree| {
            assert_eq!(tree.roots().len(), 2);
            let src = tree.find("src").unwrap();
            assert!(src.is_expanded());
            assert_eq!(src.children().len(), 1);
            assert_eq!(src.children()[0].name(), "index.js");
        });

        let view = explorer.view();
        assert!(view.nodes[0].children[0].highlighted);
        assert!(!view.nodes[1].highlighted);
    }

    #[tokio::test]
    async fn test_root_failure_is_listing_failed() {
        let lister = Arc::new(MemoryLister::new(REPO).with_failure("", "rate limited"));

        let err = TreeExplorer::load(lister.clone(), REPO, "src/index.js")
            .await
            .err()
            .unwrap();

        match err {
            Error::ListingFailed { repository, message } => {
                assert_eq!(repository, REPO);
                assert_eq!(message, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(lister.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_repository_rejected() {
        let lister = nested_lister();
        let err = TreeExplorer::load(lister.clone(), "  ", "").await.err().unwrap();
        assert!(matches!(err, Error::InvalidRepository));
        assert_eq!(lister.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stale_highlight_stops_quietly() {
        let lister = nested_lister();
        let explorer = TreeExplorer::load(lister.clone(), REPO, "a/gone/file.txt")
            .await
            .unwrap();

        assert_eq!(lister.calls(), vec!["", "a"]);
        assert_eq!(
            explorer.highlight_status(),
            HighlightStatus::Stale {
                deepest: Some("a".to_string())
            }
        );
        assert!(explorer.with_tree(|t| t.find("a").unwrap().is_expanded()));
    }

    #[tokio::test]
    async fn test_ancestor_failure_keeps_tree() {
        let lister = Arc::new(
            MemoryLister::new(REPO)
                .with_dir("", vec![dir("a")])
                .with_failure("a", "boom"),
        );
        let explorer = TreeExplorer::load(lister.clone(), REPO, "a/b.txt")
            .await
            .unwrap();

        assert_eq!(
            explorer.highlight_status(),
            HighlightStatus::Stale { deepest: None }
        );
        explorer.with_tree(|tree| {
            let a = tree.find("a").unwrap();
            assert_eq!(a.state(), &NodeState::Unloaded);
            assert_eq!(a.error(), Some("boom"));
            assert!(a.children().is_empty());
        });
    }

    #[tokio::test]
    async fn test_highlight_with_slashes_is_normalized() {
        let lister = nested_lister();
        let explorer = TreeExplorer::load(lister, REPO, "/x/y.txt").await.unwrap();
        assert_eq!(explorer.highlighted(), "x/y.txt");
        assert_eq!(explorer.highlight_status(), HighlightStatus::Resolved);
    }

    #[tokio::test]
    async fn test_files_have_no_dir_ref() {
        let lister = nested_lister();
        let explorer = TreeExplorer::load(lister, REPO, "").await.unwrap();

        assert!(explorer.dir("top.txt").is_none());
        assert!(explorer.dir("missing").is_none());
        assert_eq!(explorer.dir("a").unwrap().path(), "a");
    }

    #[tokio::test]
    async fn test_double_expand_fetches_once() {
        let lister = nested_lister();
        let explorer = TreeExplorer::load(lister.clone(), REPO, "").await.unwrap();
        let x = explorer.dir("x").unwrap();

        explorer.expand(&x).await.unwrap();
        explorer.expand(&x).await.unwrap();

        assert_eq!(lister.calls_for("x"), 1);
        assert!(explorer.with_tree(|t| t.find("x").unwrap().is_expanded()));
    }

    #[tokio::test]
    async fn test_collapse_then_expand_reuses_children() {
        let lister = nested_lister();
        let explorer = TreeExplorer::load(lister.clone(), REPO, "").await.unwrap();
        let a = explorer.dir("a").unwrap();

        explorer.expand(&a).await.unwrap();
        let before: Vec<String> = explorer.with_tree(|t| {
            t.find("a")
                .unwrap()
                .children()
                .iter()
                .map(|c| c.path().to_string())
                .collect()
        });
        let calls = lister.call_count();

        explorer.collapse(&a);
        assert!(!explorer.with_tree(|t| t.find("a").unwrap().is_expanded()));
        assert_eq!(
            explorer.with_tree(|t| t.find("a").unwrap().children().len()),
            2
        );

        explorer.expand(&a).await.unwrap();
        let after: Vec<String> = explorer.with_tree(|t| {
            t.find("a")
                .unwrap()
                .children()
                .iter()
                .map(|c| c.path().to_string())
                .collect()
        });

        assert_eq!(lister.call_count(), calls);
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_expand_failure_then_retry() {
        let lister = nested_lister();
        lister.set_failure("x", "rate limited");
        let explorer = TreeExplorer::load(lister.clone(), REPO, "").await.unwrap();
        let x = explorer.dir("x").unwrap();

        let err = explorer.expand(&x).await.unwrap_err();
        assert!(matches!(err, Error::ExpandFailed { ref message, .. } if message == "rate limited"));
        explorer.with_tree(|t| {
            let node = t.find("x").unwrap();
            assert_eq!(node.state(), &NodeState::Unloaded);
            assert!(!node.is_expanded());
            assert!(node.children().is_empty());
            assert_eq!(node.error(), Some("rate limited"));
        });

        lister.set_dir("x", vec![file("x/y.txt")]);
        explorer.expand(&x).await.unwrap();

        assert_eq!(lister.calls_for("x"), 2);
        explorer.with_tree(|t| {
            let node = t.find("x").unwrap();
            assert!(node.is_expanded());
            assert!(node.error().is_none());
        });
    }

    #[tokio::test]
    async fn test_empty_directory_not_refetched() {
        let lister = Arc::new(
            MemoryLister::new(REPO)
                .with_dir("", vec![dir("empty")])
                .with_dir("empty", vec![]),
        );
        let explorer = TreeExplorer::load(lister.clone(), REPO, "").await.unwrap();
        let empty = explorer.dir("empty").unwrap();

        explorer.expand(&empty).await.unwrap();
        explorer.collapse(&empty);
        explorer.expand(&empty).await.unwrap();

        assert_eq!(lister.calls_for("empty"), 1);
    }

    #[tokio::test]
    async fn test_collapse_while_loading_still_populates() {
        let lister = nested_lister();
        let gate = lister.hold("a");
        let explorer = Arc::new(TreeExplorer::load(lister.clone(), REPO, "").await.unwrap());
        let a = explorer.dir("a").unwrap();

        let task = {
            let explorer = explorer.clone();
            let a = a.clone();
            tokio::spawn(async move { explorer.expand(&a).await })
        };

        // Wait until the fetch is in flight
        while lister.calls_for("a") == 0 {
            tokio::task::yield_now().await;
        }
        assert!(explorer.with_tree(|t| t.find("a").unwrap().is_loading()));

        explorer.collapse(&a);
        gate.notify_one();
        task.await.unwrap().unwrap();

        explorer.with_tree(|t| {
            let node = t.find("a").unwrap();
            assert_eq!(node.state(), &NodeState::Loaded { expanded: false });
            assert_eq!(node.children().len(), 2);
        });
    }

    #[tokio::test]
    async fn test_expand_during_load_joins_fetch() {
        let lister = nested_lister();
        let gate = lister.hold("x");
        let explorer = Arc::new(TreeExplorer::load(lister.clone(), REPO, "").await.unwrap());
        let x = explorer.dir("x").unwrap();

        let task = {
            let explorer = explorer.clone();
            let x = x.clone();
            tokio::spawn(async move { explorer.expand(&x).await })
        };
        while lister.calls_for("x") == 0 {
            tokio::task::yield_now().await;
        }

        explorer.collapse(&x);
        let (joined, ()) = tokio::join!(explorer.expand(&x), async {
            gate.notify_one();
        });
        joined.unwrap();
        task.await.unwrap().unwrap();

        assert_eq!(lister.calls_for("x"), 1);
        assert!(explorer.with_tree(|t| t.find("x").unwrap().is_expanded()));
    }

    #[tokio::test]
    async fn test_joined_expand_waits_for_children() {
        let lister = nested_lister();
        let gate = lister.hold("a");
        let explorer = Arc::new(TreeExplorer::load(lister.clone(), REPO, "").await.unwrap());
        let a = explorer.dir("a").unwrap();

        let first = {
            let explorer = explorer.clone();
            let a = a.clone();
            tokio::spawn(async move { explorer.expand(&a).await })
        };
        while lister.calls_for("a") == 0 {
            tokio::task::yield_now().await;
        }

        let second = {
            let explorer = explorer.clone();
            let a = a.clone();
            tokio::spawn(async move {
                explorer.expand(&a).await?;
                // Children must be in the tree by the time expand returns
                Ok::<_, Error>(explorer.dir("a/b").is_some())
            })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!second.is_finished());

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert!(second.await.unwrap().unwrap());
        assert_eq!(lister.calls_for("a"), 1);
    }

    #[tokio::test]
    async fn test_joined_expand_reports_failure() {
        let lister = nested_lister();
        lister.set_failure("x", "rate limited");
        let gate = lister.hold("x");
        let explorer = Arc::new(TreeExplorer::load(lister.clone(), REPO, "").await.unwrap());
        let x = explorer.dir("x").unwrap();

        let first = {
            let explorer = explorer.clone();
            let x = x.clone();
            tokio::spawn(async move { explorer.expand(&x).await })
        };
        while lister.calls_for("x") == 0 {
            tokio::task::yield_now().await;
        }

        let (joined, ()) = tokio::join!(explorer.expand(&x), async {
            gate.notify_one();
        });
        assert!(matches!(first.await.unwrap(), Err(Error::ExpandFailed { .. })));
        match joined {
            Err(Error::ExpandFailed { message, .. }) => assert_eq!(message, "rate limited"),
            other => panic!("expected ExpandFailed, got {:?}", other),
        }
        assert_eq!(lister.calls_for("x"), 1);
    }

    #[tokio::test]
    async fn test_abandoned_load_is_restarted() {
        let lister = nested_lister();
        let gate = lister.hold("x");
        let explorer = TreeExplorer::load(lister.clone(), REPO, "").await.unwrap();
        let x = explorer.dir("x").unwrap();

        // Poll the expansion until it parks on the held fetch, then drop it
        tokio::select! {
            biased;
            _ = explorer.expand(&x) => panic!("fetch should be held"),
            _ = std::future::ready(()) => {}
        }
        assert!(explorer.with_tree(|t| t.find("x").unwrap().is_loading()));

        gate.notify_one();
        explorer.expand(&x).await.unwrap();

        assert_eq!(lister.calls_for("x"), 2);
        assert!(explorer.with_tree(|t| t.find("x").unwrap().is_expanded()));
    }

    #[tokio::test]
    async fn test_joined_expand_outlives_dropped_fetch() {
        let lister = nested_lister();
        let gate = lister.hold("x");
        let explorer = TreeExplorer::load(lister.clone(), REPO, "").await.unwrap();
        let x = explorer.dir("x").unwrap();

        let mut first = Box::pin(explorer.expand(&x));
        assert!(futures::poll!(&mut first).is_pending());
        let mut second = Box::pin(explorer.expand(&x));
        assert!(futures::poll!(&mut second).is_pending());

        // The owner of the fetch goes away; the waiting expansion takes over
        drop(first);
        gate.notify_one();
        second.await.unwrap();

        assert_eq!(lister.calls_for("x"), 2);
        assert!(explorer.with_tree(|t| t.find("x").unwrap().is_expanded()));
    }

    #[tokio::test]
    async fn test_concurrent_sibling_expansion() {
        let lister = nested_lister();
        let explorer = TreeExplorer::load(lister.clone(), REPO, "").await.unwrap();
        let a = explorer.dir("a").unwrap();
        let x = explorer.dir("x").unwrap();

        let (ra, rx) = tokio::join!(explorer.expand(&a), explorer.expand(&x));
        ra.unwrap();
        rx.unwrap();

        explorer.with_tree(|t| {
            assert!(t.find("a").unwrap().is_expanded());
            assert!(t.find("x").unwrap().is_expanded());
            assert_eq!(t.node_count(), 3 + 2 + 1);
        });
    }

    #[test]
    fn test_is_ancestor() {
        assert!(is_ancestor("src", "src/index.js"));
        assert!(is_ancestor("a/b", "a/b/c.txt"));
        assert!(!is_ancestor("src", "src"));
        assert!(!is_ancestor("src", "srcs/index.js"));
        assert!(!is_ancestor("src", "src/"));
    }
}
