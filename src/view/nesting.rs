//! Turns a flat, sorted resource list into a parent-aware display order.
//!
//! Rearrangement happens after filtering and sorting so nested resources
//! inherit the caller's sort within each sibling group. A resource whose
//! parent is absent from the input set is treated as a root; members of a
//! parent cycle degrade to roots as well, so the result is always a total
//! order over the input.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::model::Resource;

/// One row of the paged query result: the resource plus its computed
/// nesting flags.
#[derive(Debug, Clone)]
pub struct ResourceRow {
    pub resource: Arc<Resource>,
    /// Whether this resource's own descendants are hidden
    pub is_collapsed: bool,
    /// Whether some ancestor along the chain is collapsed. Hidden rows keep
    /// their position but are excluded from the visible list and count.
    pub is_hidden: bool,
    /// Whether any resource in the input set names this one as parent
    pub has_children: bool,
    /// Nesting depth within the output (roots are 0)
    pub depth: usize,
}

/// Rearrange `resources` (already filtered and sorted) depth-first by
/// parent, marking rows hidden when any ancestor satisfies `collapsed`.
///
/// Guarantees: no resource appears before its parent, sibling order matches
/// the input order, and every input resource appears exactly once.
pub fn order_nested<F>(
    resources: Vec<Arc<Resource>>,
    collapsed: F,
) -> Vec<ResourceRow>
where
    F: Fn(&Resource) -> bool,
{
    let names: std::collections::HashSet<&str> = resources.iter().map(|r| r.name.as_str()).collect();

    // Group children by parent name, preserving input order within groups.
    // Only parents present in the input set count; anything else is a root.
    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (index, resource) in resources.iter().enumerate() {
        let parent = resource
            .parent_name
            .as_deref()
            .filter(|p| *p != resource.name && names.contains(*p));
        match parent {
            Some(parent) => children.entry(parent).or_default().push(index),
            None => roots.push(index),
        }
    }

    let mut ordered: Vec<ResourceRow> = Vec::with_capacity(resources.len());
    let mut visited = vec![false; resources.len()];

    // Depth-first placement. The explicit stack keeps the walk bounded by
    // the input size regardless of chain shape.
    let mut stack: Vec<(usize, bool, usize)> = Vec::new();
    let push_root = |stack: &mut Vec<(usize, bool, usize)>, index: usize| {
        stack.push((index, false, 0));
    };

    for &root in &roots {
        push_root(&mut stack, root);
        drain(&resources, &children, &collapsed, &mut stack, &mut visited, &mut ordered);
    }

    // Resources unreachable from any root can only be members of a parent
    // cycle. Emit them as roots in input order rather than dropping them.
    for index in 0..resources.len() {
        if !visited[index] {
            warn!(
                "parent cycle detected at resource: {}; treating as root",
                resources[index].name
            );
            push_root(&mut stack, index);
            drain(&resources, &children, &collapsed, &mut stack, &mut visited, &mut ordered);
        }
    }

    ordered
}

fn drain<F>(
    resources: &[Arc<Resource>],
    children: &HashMap<&str, Vec<usize>>,
    collapsed: &F,
    stack: &mut Vec<(usize, bool, usize)>,
    visited: &mut [bool],
    ordered: &mut Vec<ResourceRow>,
) where
    F: Fn(&Resource) -> bool,
{
    while let Some((index, ancestor_collapsed, depth)) = stack.pop() {
        if visited[index] {
            continue;
        }
        visited[index] = true;

        let resource = &resources[index];
        let child_indexes = children.get(resource.name.as_str());
        let is_collapsed = collapsed(resource);

        ordered.push(ResourceRow {
            resource: resource.clone(),
            is_collapsed,
            is_hidden: ancestor_collapsed,
            has_children: child_indexes.is_some_and(|c| !c.is_empty()),
            depth,
        });

        if let Some(child_indexes) = child_indexes {
            // Reverse push so children pop in input (sort) order.
            for &child in child_indexes.iter().rev() {
                stack.push((child, ancestor_collapsed || is_collapsed, depth + 1));
            }
        }
    }
}
