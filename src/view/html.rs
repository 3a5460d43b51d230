//! HTML fragment rendering
//!
//! Rows carry `data-command`/`data-path` attributes; the page script turns
//! clicks into commands. Every piece of listing text is escaped.
//!
//! @module view/html

use super::{Arrow, Crumb, NodeView, TreeView};
use crate::explorer::HighlightStatus;
use crate::listing::EntryKind;
use std::fmt::Write;

const INDENT_PX: usize = 16;

/// Render the explorer into a fragment for the tree container
pub fn render_fragment(view: &TreeView) -> String {
    let mut out = String::new();

    let _ = write!(
        out,
        r#"<div class="file-tree" data-repository="{}">"#,
        escape(&view.repository)
    );

    if let HighlightStatus::Stale { .. } = view.highlight {
        if let Some(highlighted) = &view.highlighted {
            let _ = write!(
                out,
                r#"<p class="tree-notice">{} was not found in this repository</p>"#,
                escape(highlighted)
            );
        }
    }

    if view.highlighted.is_some() {
        render_breadcrumb(&view.breadcrumb, &mut out);
    }

    for node in &view.nodes {
        render_node(node, &mut out);
    }

    out.push_str("</div>");
    out
}

/// Full-panel placeholder shown when the root listing fails
pub fn failure_placeholder(message: &str) -> String {
    format!(
        r#"<p class="error">Failed to load file tree: {}</p>"#,
        escape(message)
    )
}

// Ancestor directories are clickable and expand that folder; the root and
// the highlighted file itself are plain labels
fn render_breadcrumb(crumbs: &[Crumb], out: &mut String) {
    out.push_str(r#"<div class="file-tree-breadcrumb">"#);
    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            out.push_str(r#"<span class="breadcrumb-separator">/</span>"#);
        }
        if crumb.current {
            let _ = write!(
                out,
                r#"<span class="breadcrumb-item current">{}</span>"#,
                escape(&crumb.label)
            );
        } else if crumb.path.is_empty() {
            let _ = write!(
                out,
                r#"<span class="breadcrumb-item">{}</span>"#,
                escape(&crumb.label)
            );
        } else {
            let _ = write!(
                out,
                r#"<span class="breadcrumb-item link" data-command="expand_node" data-path="{}">{}</span>"#,
                escape(&crumb.path),
                escape(&crumb.label)
            );
        }
    }
    out.push_str("</div>");
}

fn render_node(node: &NodeView, out: &mut String) {
    let mut classes = vec![match node.kind {
        EntryKind::Dir => "folder",
        EntryKind::File => "file",
    }];
    classes.extend(node.tags.iter().map(|t| t.css_class()));
    if node.highlighted {
        classes.push("highlighted");
    }
    if node.expanded {
        classes.push("expanded");
    }
    if node.loading {
        classes.push("loading");
    }

    let path = escape(&node.path);
    let command = match node.kind {
        EntryKind::Dir => "toggle_node",
        EntryKind::File => "open_file",
    };

    let _ = write!(
        out,
        r#"<div class="file-tree-item {}" data-path="{}" data-type="{}">"#,
        classes.join(" "),
        path,
        node.kind.as_str()
    );
    let _ = write!(
        out,
        r#"<div class="file-tree-item-content" data-command="{}" data-path="{}""#,
        command, path
    );
    if node.kind == EntryKind::File && !node.html_url.is_empty() {
        let _ = write!(out, r#" data-url="{}""#, escape(&node.html_url));
    }
    let _ = write!(
        out,
        r#" style="padding-left: {}px">"#,
        node.depth * INDENT_PX
    );

    match node.arrow {
        Some(Arrow::Open) => out.push_str(r#"<i class="tree-expand-icon fas fa-chevron-down"></i>"#),
        Some(Arrow::Closed) => {
            out.push_str(r#"<i class="tree-expand-icon fas fa-chevron-right"></i>"#)
        }
        None => out.push_str(r#"<span class="tree-spacer"></span>"#),
    }
    out.push_str(match node.kind {
        EntryKind::Dir => r#"<i class="fas fa-folder"></i>"#,
        EntryKind::File => r#"<i class="fas fa-file"></i>"#,
    });
    let _ = write!(out, r#"<span class="file-name">{}</span>"#, escape(&node.name));

    if node.loading {
        out.push_str(r#"<span class="tree-loading">Loading…</span>"#);
    }
    if let Some(error) = &node.error {
        let _ = write!(out, r#"<span class="tree-error">{}</span>"#, escape(error));
    }
    out.push_str("</div>");

    if !node.children.is_empty() {
        out.push_str(r#"<div class="file-tree-children">"#);
        for child in &node.children {
            render_node(child, out);
        }
        out.push_str("</div>");
    }

    out.push_str("</div>");
}

/// Escape HTML special characters
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
