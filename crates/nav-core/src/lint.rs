//! Structural checks for menu trees.
//!
//! Reports invariant violations without modifying the tree. The builder logs
//! these after loading stored menus; tests use them as a property oracle
//! after every mutation.

use crate::id::MenuId;
use crate::model::{MAX_DEPTH, MenuNode};
use std::collections::HashSet;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Breaks a tree invariant.
    Error,
    /// Suspicious but harmless.
    Warning,
}

/// A single finding for one node.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    pub node_id: MenuId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "depth-mismatch").
    pub rule: &'static str,
}

/// Run every rule and collect the findings.
#[must_use]
pub fn lint_tree(nodes: &[MenuNode]) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    let mut seen = HashSet::new();
    lint_level(nodes, None, 0, &mut seen, &mut diags);
    diags
}

/// True when no rule reports an error.
pub fn is_well_formed(nodes: &[MenuNode]) -> bool {
    lint_tree(nodes)
        .iter()
        .all(|d| d.severity != LintSeverity::Error)
}

fn lint_level(
    nodes: &[MenuNode],
    parent: Option<MenuId>,
    depth: usize,
    seen: &mut HashSet<MenuId>,
    diags: &mut Vec<LintDiagnostic>,
) {
    for (position, node) in nodes.iter().enumerate() {
        if !seen.insert(node.id) {
            diags.push(error(node.id, "duplicate-id", format!("`{}` appears more than once", node.id)));
        }
        if node.depth != depth {
            diags.push(error(
                node.id,
                "depth-mismatch",
                format!("`{}` has depth {} but sits at depth {depth}", node.id, node.depth),
            ));
        }
        if depth > MAX_DEPTH {
            diags.push(error(
                node.id,
                "max-depth",
                format!("`{}` is nested deeper than {MAX_DEPTH}", node.id),
            ));
        }
        if node.parent_id != parent {
            diags.push(error(
                node.id,
                "parent-mismatch",
                format!("`{}` records parent {:?} but sits under {:?}", node.id, node.parent_id, parent),
            ));
        }
        if node.order != position {
            diags.push(error(
                node.id,
                "order-gap",
                format!("`{}` has order {} at position {position}", node.id, node.order),
            ));
        }
        if node.kind.is_reference() && node.source_ref.is_none() {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("`{}` is a {:?} without a source reference", node.id, node.kind),
                severity: LintSeverity::Warning,
                rule: "missing-source-ref",
            });
        }
        lint_level(&node.children, Some(node.id), depth + 1, seen, diags);
    }
}

fn error(node_id: MenuId, rule: &'static str, message: String) -> LintDiagnostic {
    LintDiagnostic {
        node_id,
        message,
        severity: LintSeverity::Error,
        rule,
    }
}
