//! Graph analyses behind cascading re-validation.
//!
//! The graph works on a plain forward adjacency list (node index → downstream
//! node indices) so these routines stay independent of node and edge storage.

use std::collections::VecDeque;

/// Computes which nodes must be re-checked, and in which order, after a change.
pub struct CascadePlanner;

impl CascadePlanner {
    /// Build a forward adjacency list over `n` node slots.
    ///
    /// Parallel edges between the same pair of nodes are kept; Kahn's
    /// algorithm below counts them consistently in the in-degrees.
    pub fn build_adjacency(n: usize, links: impl IntoIterator<Item = (usize, usize)>) -> Vec<Vec<usize>> {
        let mut fwd_adj = vec![Vec::new(); n];
        for (from, to) in links {
            if from < n && to < n {
                fwd_adj[from].push(to);
            }
        }
        fwd_adj
    }

    /// Nodes that must be re-checked after `roots` changed, in topological order.
    ///
    /// The roots themselves are included.
    pub fn plan(roots: &[usize], fwd_adj: &[Vec<usize>]) -> Vec<usize> {
        let affected = Self::forward_reachability(roots, fwd_adj);
        let order = Self::topological_sort(fwd_adj, &affected);

        tracing::debug!(
            "Cascade plan: {} of {} nodes from {} root(s)",
            order.len(),
            fwd_adj.len(),
            roots.len()
        );

        order
    }

    /// Mark every node reachable from `roots` (roots included) using DFS.
    pub fn forward_reachability(roots: &[usize], fwd_adj: &[Vec<usize>]) -> Vec<bool> {
        let mut reachable = vec![false; fwd_adj.len()];
        let mut stack = Vec::new();

        for &root in roots {
            if root < reachable.len() && !reachable[root] {
                reachable[root] = true;
                stack.push(root);
            }
        }

        while let Some(node) = stack.pop() {
            for &neighbor in &fwd_adj[node] {
                if !reachable[neighbor] {
                    reachable[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }

        reachable
    }

    /// Topological sort of the nodes flagged in `subset` using Kahn's algorithm.
    ///
    /// Ties are broken by ascending node index, so the order is stable for a
    /// given graph.
    pub fn topological_sort(fwd_adj: &[Vec<usize>], subset: &[bool]) -> Vec<usize> {
        let n = fwd_adj.len();
        let mut in_degree = vec![0usize; n];

        for (from, targets) in fwd_adj.iter().enumerate() {
            if !subset[from] {
                continue;
            }
            for &to in targets {
                if subset[to] {
                    in_degree[to] += 1;
                }
            }
        }

        let mut queue: VecDeque<usize> = (0..n)
            .filter(|&i| subset[i] && in_degree[i] == 0)
            .collect();
        let mut order = Vec::new();

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &next in &fwd_adj[node] {
                if !subset[next] {
                    continue;
                }
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        let expected = subset.iter().filter(|&&s| s).count();
        if order.len() != expected {
            tracing::warn!(
                "Pipeline graph has a cycle! Only {} of {} nodes ordered.",
                order.len(),
                expected
            );
        }

        order
    }

    /// True when `to` already reaches `from`, so adding `from → to` closes a cycle.
    pub fn would_create_cycle(fwd_adj: &[Vec<usize>], from: usize, to: usize) -> bool {
        if from == to {
            return true;
        }
        Self::forward_reachability(&[to], fwd_adj)
            .get(from)
            .copied()
            .unwrap_or(false)
    }
}
