//! Dependency graph analysis for one batch.
//!
//! Edges run task -> dependency, restricted to ids present in the batch.
//! Two results are computed once per batch:
//! - which tasks sit on a cycle (`has_circular_dependency`)
//! - how many other tasks list each task as a dependency
//!
//! Cycle detection is a depth-first walk driven by an explicit frame stack,
//! so pathological chains cannot exhaust the call stack. Each node carries a
//! three-state marker; reaching an in-progress node means a back edge. Low-link
//! bookkeeping on top of that groups nodes into strongly connected components,
//! which also catches cycles closed through an already-finished node.
//! A task that merely depends on a cycle is not flagged.

use crate::task::Task;
use std::collections::HashMap;

pub const BASE_DEPENDENCY_SCORE: f64 = 30.0;
pub const PER_DEPENDENT_BONUS: f64 = 25.0;
pub const MAX_DEPENDENCY_SCORE: f64 = 100.0;

/// `min(100, 30 + 25 * dependents)`.
pub fn dependency_score(dependents: usize) -> f64 {
    (BASE_DEPENDENCY_SCORE + PER_DEPENDENT_BONUS * dependents as f64).min(MAX_DEPENDENCY_SCORE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Per-batch graph facts, indexed by batch position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyAnalysis {
    circular: Vec<bool>,
    dependents: Vec<usize>,
    /// Ids of each strongly connected component that contains a cycle,
    /// in batch order within the group.
    cycle_groups: Vec<Vec<String>>,
}

impl DependencyAnalysis {
    pub fn analyze(tasks: &[Task]) -> Self {
        let adj = build_adjacency(tasks);

        let mut dependents = vec![0usize; tasks.len()];
        for (from, deps) in adj.iter().enumerate() {
            for &to in deps {
                if to != from {
                    dependents[to] += 1;
                }
            }
        }

        let (circular, groups) = find_cycles(&adj);
        let cycle_groups = groups
            .into_iter()
            .map(|g| g.into_iter().map(|i| tasks[i].id.clone()).collect())
            .collect();

        Self {
            circular,
            dependents,
            cycle_groups,
        }
    }

    pub fn has_circular_dependency(&self, index: usize) -> bool {
        self.circular.get(index).copied().unwrap_or(false)
    }

    pub fn dependents(&self, index: usize) -> usize {
        self.dependents.get(index).copied().unwrap_or(0)
    }

    pub fn score(&self, index: usize) -> f64 {
        dependency_score(self.dependents(index))
    }

    pub fn cycle_groups(&self) -> &[Vec<String>] {
        &self.cycle_groups
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycle_groups.is_empty()
    }
}

/// Outgoing edges per task, deduplicated, dangling ids dropped.
fn build_adjacency(tasks: &[Task]) -> Vec<Vec<usize>> {
    let index: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();

    tasks
        .iter()
        .map(|t| {
            let mut out: Vec<usize> = Vec::with_capacity(t.dependencies.len());
            for dep in &t.dependencies {
                let Some(&j) = index.get(dep.as_str()) else {
                    continue;
                };
                if !out.contains(&j) {
                    out.push(j);
                }
            }
            out
        })
        .collect()
}

/// Iterative Tarjan over `adj`. Returns the on-cycle flag per node and the
/// node groups that form cycles.
fn find_cycles(adj: &[Vec<usize>]) -> (Vec<bool>, Vec<Vec<usize>>) {
    let n = adj.len();
    let mut state = vec![VisitState::Unvisited; n];
    let mut order = vec![0usize; n];
    let mut low = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut component: Vec<usize> = Vec::new();
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut next_order = 0usize;

    let mut circular = vec![false; n];
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for root in 0..n {
        if state[root] != VisitState::Unvisited {
            continue;
        }

        state[root] = VisitState::InProgress;
        order[root] = next_order;
        low[root] = next_order;
        next_order += 1;
        component.push(root);
        on_stack[root] = true;
        frames.push((root, 0));

        while let Some(frame) = frames.last_mut() {
            let v = frame.0;

            if frame.1 < adj[v].len() {
                let w = adj[v][frame.1];
                frame.1 += 1;

                match state[w] {
                    VisitState::Unvisited => {
                        state[w] = VisitState::InProgress;
                        order[w] = next_order;
                        low[w] = next_order;
                        next_order += 1;
                        component.push(w);
                        on_stack[w] = true;
                        frames.push((w, 0));
                    }
                    // Back edge: w is an ancestor on the current path.
                    VisitState::InProgress => low[v] = low[v].min(order[w]),
                    VisitState::Done if on_stack[w] => low[v] = low[v].min(order[w]),
                    VisitState::Done => {}
                }
                continue;
            }

            frames.pop();
            state[v] = VisitState::Done;
            if let Some(&(parent, _)) = frames.last() {
                low[parent] = low[parent].min(low[v]);
            }

            if low[v] == order[v] {
                let mut group = Vec::new();
                while let Some(w) = component.pop() {
                    on_stack[w] = false;
                    group.push(w);
                    if w == v {
                        break;
                    }
                }

                let self_loop = adj[v].contains(&v);
                if group.len() > 1 || self_loop {
                    group.sort_unstable();
                    for &w in &group {
                        circular[w] = true;
                    }
                    groups.push(group);
                }
            }
        }
    }

    groups.sort_by_key(|g| g[0]);
    (circular, groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, deps: &[&str]) -> Task {
        deps.iter().fold(Task::new(id, id), |t, d| t.depends_on(*d))
    }

    fn flags(a: &DependencyAnalysis, n: usize) -> Vec<bool> {
        (0..n).map(|i| a.has_circular_dependency(i)).collect()
    }

    #[test]
    fn test_score_formula() {
        assert_eq!(dependency_score(0), 30.0);
        assert_eq!(dependency_score(1), 55.0);
        assert_eq!(dependency_score(2), 80.0);
        assert_eq!(dependency_score(3), 100.0);
        assert_eq!(dependency_score(40), 100.0);
    }

    #[test]
    fn test_counts_direct_dependents_only() {
        let tasks = vec![
            task("1", &[]),
            task("2", &["1"]),
            task("3", &["1", "2"]),
        ];
        let a = DependencyAnalysis::analyze(&tasks);
        assert_eq!(a.dependents(0), 2);
        assert_eq!(a.dependents(1), 1);
        assert_eq!(a.dependents(2), 0);
        assert_eq!(a.score(0), 80.0);
        assert!(!a.has_cycles());
    }

    #[test]
    fn test_dangling_and_duplicate_references_ignored() {
        let tasks = vec![task("a", &[]), task("b", &["a", "a", "ghost"])];
        let a = DependencyAnalysis::analyze(&tasks);
        assert_eq!(a.dependents(0), 1);
        assert_eq!(flags(&a, 2), vec![false, false]);
    }

    #[test]
    fn test_three_cycle_flags_members_not_dependents() {
        let tasks = vec![
            task("A", &["B"]),
            task("B", &["C"]),
            task("C", &["A"]),
            task("D", &["A"]),
        ];
        let a = DependencyAnalysis::analyze(&tasks);
        assert_eq!(flags(&a, 4), vec![true, true, true, false]);
        assert_eq!(a.cycle_groups(), &[vec!["A".to_string(), "B".into(), "C".into()]]);
    }

    #[test]
    fn test_cycle_closed_through_finished_node() {
        // DFS from A finishes B (via the A<->B back edge) before reaching C,
        // and C closes A -> C -> B -> A through the finished B.
        let tasks = vec![
            task("A", &["B", "C"]),
            task("B", &["A"]),
            task("C", &["B"]),
        ];
        let a = DependencyAnalysis::analyze(&tasks);
        assert_eq!(flags(&a, 3), vec![true, true, true]);
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let tasks = vec![task("solo", &["solo"]), task("other", &[])];
        let a = DependencyAnalysis::analyze(&tasks);
        assert_eq!(flags(&a, 2), vec![true, false]);
        // A self reference is not a dependent.
        assert_eq!(a.dependents(0), 0);
    }

    #[test]
    fn test_disjoint_cycles_reported_separately() {
        let tasks = vec![
            task("a", &["b"]),
            task("b", &["a"]),
            task("x", &["y"]),
            task("y", &["x"]),
            task("free", &["a", "x"]),
        ];
        let a = DependencyAnalysis::analyze(&tasks);
        assert_eq!(a.cycle_groups().len(), 2);
        assert!(!a.has_circular_dependency(4));
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let n = 100_000;
        let tasks: Vec<Task> = (0..n)
            .map(|i| {
                let t = Task::new(i.to_string(), "chain");
                if i + 1 < n {
                    t.depends_on((i + 1).to_string())
                } else {
                    t.depends_on("0")
                }
            })
            .collect();
        let a = DependencyAnalysis::analyze(&tasks);
        assert!(a.has_circular_dependency(0));
        assert!(a.has_circular_dependency(n - 1));
        assert_eq!(a.cycle_groups().len(), 1);
    }
}
