//! Conversion between the persisted flat list and the in-memory tree.
//!
//! The flat form links records through `parent_id` and orders siblings with
//! an explicit `order`. The tree form nests children and derives both from
//! position. Loading never fails on structurally odd input:
//!
//! - a dangling `parent_id` makes the record a root,
//! - a record caught in a `parent_id` cycle is demoted to a root,
//! - a repeated `id` keeps only its first record,
//! - records nested past `MAX_DEPTH` are lifted to `MAX_DEPTH`, right after
//!   their deepest kept ancestor.
//!
//! Stored `parent_id` chains can be arbitrarily long, so the tree is built
//! by an explicit-stack walk rather than by recursion.

use crate::id::MenuId;
use crate::model::{MAX_DEPTH, MenuItemFlat, MenuNode};
use crate::tree::renumber;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

// ─── Flat → Tree ─────────────────────────────────────────────────────────

/// Build the tree form from persisted records.
pub fn flat_to_tree(flat: &[MenuItemFlat]) -> Vec<MenuNode> {
    let mut seen = HashSet::with_capacity(flat.len());
    let records: Vec<&MenuItemFlat> = flat
        .iter()
        .filter(|r| {
            let fresh = seen.insert(r.id);
            if !fresh {
                log::warn!("flat_to_tree: duplicate record {}, keeping the first", r.id);
            }
            fresh
        })
        .collect();

    let index: HashMap<MenuId, usize> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id, i))
        .collect();

    let mut parents: Vec<Option<usize>> = records
        .iter()
        .map(|r| {
            let pid = r.parent_id?;
            let parent = index.get(&pid).copied();
            if parent.is_none() {
                log::debug!("flat_to_tree: {} has dangling parent {pid}, treating as root", r.id);
            }
            parent
        })
        .collect();

    break_cycles(&records, &mut parents);

    let mut roots: Vec<usize> = Vec::new();
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children_of[*p].push(i),
            None => roots.push(i),
        }
    }

    // Stable: equal `order` values keep input order.
    roots.sort_by_key(|&i| records[i].order);
    for siblings in &mut children_of {
        siblings.sort_by_key(|&i| records[i].order);
    }

    // Pre-order, with each record's depth in the stored hierarchy.
    let mut preorder: Vec<(usize, usize)> = Vec::with_capacity(records.len());
    let mut pending: Vec<(usize, usize)> = roots.iter().rev().map(|&i| (i, 0)).collect();
    while let Some((i, depth)) = pending.pop() {
        preorder.push((i, depth));
        pending.extend(children_of[i].iter().rev().map(|&c| (c, depth + 1)));
    }

    let lifted = preorder.iter().filter(|&&(_, depth)| depth > MAX_DEPTH).count();
    if lifted > 0 {
        log::debug!("flat_to_tree: lifting {lifted} record(s) nested past depth {MAX_DEPTH}");
    }

    let tree = assemble(
        preorder
            .into_iter()
            .map(|(i, depth)| (records[i].to_node(), depth.min(MAX_DEPTH))),
    );
    renumber(tree)
}

/// Nest a pre-order sequence of `(node, depth)` pairs, where each depth is
/// at most one more than the previous one. `open` holds the chain from the
/// current root down to the last node.
fn assemble(sequence: impl IntoIterator<Item = (MenuNode, usize)>) -> Vec<MenuNode> {
    let mut roots = Vec::new();
    let mut open: Vec<MenuNode> = Vec::with_capacity(MAX_DEPTH + 1);
    for (node, depth) in sequence {
        close_down_to(&mut open, &mut roots, depth);
        open.push(node);
    }
    close_down_to(&mut open, &mut roots, 0);
    roots
}

/// Attach finished nodes to their parents until `depth` nodes stay open.
fn close_down_to(open: &mut Vec<MenuNode>, roots: &mut Vec<MenuNode>, depth: usize) {
    while open.len() > depth {
        let Some(done) = open.pop() else {
            break;
        };
        match open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// Demote one record per `parent_id` cycle to a root.
///
/// Each record has at most one parent, so every non-trivial strongly
/// connected component of the parent graph is a simple cycle and cutting a
/// single link breaks it.
fn break_cycles(records: &[&MenuItemFlat], parents: &mut [Option<usize>]) {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(records.len(), records.len());
    let nodes: Vec<NodeIndex> = (0..records.len()).map(|i| graph.add_node(i)).collect();
    for (child, parent) in parents.iter().enumerate() {
        if let Some(p) = parent {
            graph.add_edge(nodes[*p], nodes[child], ());
        }
    }

    for component in tarjan_scc(&graph) {
        let members: Vec<usize> = component.iter().map(|&n| graph[n]).collect();
        let cyclic = match members.as_slice() {
            [single] => parents[*single] == Some(*single),
            _ => true,
        };
        if !cyclic {
            continue;
        }
        if let Some(&first) = members.iter().min() {
            log::warn!(
                "flat_to_tree: parent cycle through {} record(s), promoting {} to root",
                members.len(),
                records[first].id
            );
            parents[first] = None;
        }
    }
}

// ─── Tree → Flat ─────────────────────────────────────────────────────────

/// Depth-first pre-order projection. `order` is the index within the current
/// sibling list, so each parent's children come out numbered 0..n-1.
pub fn tree_to_flat(nodes: &[MenuNode]) -> Vec<MenuItemFlat> {
    let mut out = Vec::new();
    emit_level(nodes, None, &mut out);
    out
}

fn emit_level(nodes: &[MenuNode], parent: Option<MenuId>, out: &mut Vec<MenuItemFlat>) {
    for (order, node) in nodes.iter().enumerate() {
        out.push(node.to_flat(parent, order));
        emit_level(&node.children, Some(node.id), out);
    }
}

// ─── JSON ────────────────────────────────────────────────────────────────

/// Parse the stored JSON array of flat records.
pub fn parse_flat_json(json: &str) -> Result<Vec<MenuItemFlat>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize flat records to the stored JSON array shape.
pub fn flat_to_json(flat: &[MenuItemFlat]) -> Result<String, serde_json::Error> {
    serde_json::to_string(flat)
}
