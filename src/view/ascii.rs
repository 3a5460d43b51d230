//! Terminal tree output
//!
//! @module view/ascii

use super::{Arrow, NodeView, TreeView};
use crate::explorer::HighlightStatus;
use crate::listing::EntryKind;

/// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
}

const ARROW_OPEN: &str = "▾";
const ARROW_CLOSED: &str = "▸";
const TARGET: &str = "←";

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, colors::RESET)
        } else {
            text.to_string()
        }
    }
}

/// Render the explorer as an indented tree
pub fn render(view: &TreeView, color: bool) -> String {
    let painter = Painter { color };
    let mut out = String::new();

    out.push_str(&painter.paint(colors::BOLD, &view.repository));
    out.push('\n');

    for node in &view.nodes {
        render_node(node, &painter, &mut out);
    }

    if let (HighlightStatus::Stale { .. }, Some(highlighted)) = (&view.highlight, &view.highlighted)
    {
        out.push_str(&painter.paint(
            colors::YELLOW,
            &format!("! {} was not found in this repository", highlighted),
        ));
        out.push('\n');
    }

    out
}

fn render_node(node: &NodeView, painter: &Painter, out: &mut String) {
    out.push_str(&"  ".repeat(node.depth + 1));

    match node.arrow {
        Some(Arrow::Open) => out.push_str(ARROW_OPEN),
        Some(Arrow::Closed) => out.push_str(ARROW_CLOSED),
        None => out.push(' '),
    }
    out.push(' ');

    let name = match node.kind {
        EntryKind::Dir => painter.paint(colors::BLUE, &format!("{}/", node.name)),
        EntryKind::File if node.highlighted => painter.paint(colors::CYAN, &node.name),
        EntryKind::File => node.name.clone(),
    };
    out.push_str(&name);

    if node.highlighted {
        out.push(' ');
        out.push_str(&painter.paint(colors::CYAN, TARGET));
    }
    if node.loading {
        out.push(' ');
        out.push_str(&painter.paint(colors::DIM, "(loading)"));
    }
    if let Some(error) = &node.error {
        out.push(' ');
        out.push_str(&painter.paint(colors::RED, &format!("[{}]", error)));
    }
    out.push('\n');

    for child in &node.children {
        render_node(child, painter, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::TreeExplorer;
    use crate::listing::{DirectoryEntry, MemoryLister};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_plain_output() {
        let lister = Arc::new(
            MemoryLister::new("octo/repo")
                .with_dir(
                    "",
                    vec![
                        DirectoryEntry::dir("src", ""),
                        DirectoryEntry::dir("docs", ""),
                        DirectoryEntry::file("README.md", ""),
                    ],
                )
                .with_dir("src", vec![DirectoryEntry::file("src/index.js", "")])
                .with_failure("docs", "rate limited"),
        );
        let explorer = TreeExplorer::load(lister, "octo/repo", "src/index.js")
            .await
            .unwrap();
        let docs = explorer.dir("docs").unwrap();
        assert!(explorer.expand(&docs).await.is_err());

        let text = render(&explorer.view(), false);
        let expected = "\
octo/repo
  ▾ src/
      index.js ←
  ▸ docs/ [rate limited]
    README.md
";
        assert_eq!(text, expected);
    }

    #[tokio::test]
    async fn test_stale_notice() {
        let lister = Arc::new(
            MemoryLister::new("octo/repo").with_dir("", vec![DirectoryEntry::file("a.txt", "")]),
        );
        let explorer = TreeExplorer::load(lister, "octo/repo", "b.txt").await.unwrap();
        let text = render(&explorer.view(), false);
        assert!(text.ends_with("! b.txt was not found in this repository\n"));
    }

    #[test]
    fn test_color_codes() {
        let painter = Painter { color: true };
        assert_eq!(painter.paint(colors::RED, "x"), "\x1b[31mx\x1b[0m");
        let plain = Painter { color: false };
        assert_eq!(plain.paint(colors::RED, "x"), "x");
    }
}
