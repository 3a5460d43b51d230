use super::explorer::{DirRef, TreeExplorer};
use crate::core::error::{Error, Result};
use crate::listing::normalize_path;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// User interaction on a tree row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    ExpandNode { path: String },
    CollapseNode { path: String },
    ToggleNode { path: String },
    OpenFile { path: String },
}

impl Command {
    pub fn path(&self) -> &str {
        match self {
            Command::ExpandNode { path }
            | Command::CollapseNode { path }
            | Command::ToggleNode { path }
            | Command::OpenFile { path } => path,
        }
    }
}

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Tree state changed; render again
    Rerender,
    /// Expansion failed; render again with the message on that row
    RowError { path: String, message: String },
    /// Open the file's page in a new browsing context
    OpenUrl { url: String },
}

impl TreeExplorer {
    /// Apply a command to the tree
    ///
    /// Expansion failures are reported as [`Effect::RowError`], not as
    /// errors: they only affect one row.
    ///
    /// # Errors
    ///
    /// `UnknownNode` for a path not in the tree, `NotADirectory` when a
    /// directory command targets a file, `NotAFile` when opening a directory.
    pub async fn dispatch(&self, command: Command) -> Result<Effect> {
        debug!(?command, "dispatching tree command");

        match command {
            Command::ExpandNode { path } => {
                let dir = self.require_dir(&path)?;
                Ok(expand_effect(self.expand(&dir).await))
            }
            Command::CollapseNode { path } => {
                let dir = self.require_dir(&path)?;
                self.collapse(&dir);
                Ok(Effect::Rerender)
            }
            Command::ToggleNode { path } => {
                let dir = self.require_dir(&path)?;
                Ok(expand_effect(self.toggle(&dir).await))
            }
            Command::OpenFile { path } => {
                let path = normalize_path(&path);
                self.with_tree(|tree| match tree.find(path) {
                    None => Err(Error::UnknownNode {
                        path: path.to_string(),
                    }),
                    Some(node) if node.is_dir() => Err(Error::NotAFile {
                        path: path.to_string(),
                    }),
                    Some(node) => Ok(Effect::OpenUrl {
                        url: node.entry().html_url.clone(),
                    }),
                })
            }
        }
    }

    fn require_dir(&self, path: &str) -> Result<DirRef> {
        if let Some(dir) = self.dir(path) {
            return Ok(dir);
        }

        let path = normalize_path(path).to_string();
        let exists = self.with_tree(|tree| tree.find(&path).is_some());
        if exists {
            Err(Error::NotADirectory { path })
        } else {
            Err(Error::UnknownNode { path })
        }
    }
}

fn expand_effect(result: Result<()>) -> Effect {
    match result {
        Ok(()) => Effect::Rerender,
        Err(Error::ExpandFailed { path, message }) => Effect::RowError { path, message },
        Err(other) => Effect::RowError {
            path: String::new(),
            message: other.to_string(),
        },
    }
}
