//! Task dependency graph of a single plan.
//!
//! Edges point from a dependent task to its prerequisite. The graph is kept
//! acyclic: [`DependencyGraph::validate_edge`] rejects an edge when the
//! prerequisite already (transitively) waits on the dependent. The store calls
//! it inside the same write transaction that inserts the edge, so two
//! concurrent inserts cannot jointly close a cycle.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use crate::{
    error::{PlannerError, Result},
    models::TaskDependency,
};

/// Adjacency view over a set of [`TaskDependency`] edges.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    prerequisites: BTreeMap<u64, BTreeSet<u64>>,
}

impl DependencyGraph {
    /// Builds the graph from stored edges.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a TaskDependency>,
    {
        let mut graph = Self::default();
        for edge in edges {
            graph.insert(edge.dependent_id, edge.prerequisite_id);
        }
        graph
    }

    fn insert(&mut self, dependent: u64, prerequisite: u64) {
        self.prerequisites
            .entry(dependent)
            .or_default()
            .insert(prerequisite);
    }

    /// Direct prerequisites of `task_id`.
    pub fn prerequisites_of(&self, task_id: u64) -> impl Iterator<Item = u64> + '_ {
        self.prerequisites
            .get(&task_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Whether `edge` already exists.
    pub fn contains(&self, dependent: u64, prerequisite: u64) -> bool {
        self.prerequisites
            .get(&dependent)
            .is_some_and(|set| set.contains(&prerequisite))
    }

    /// Whether `target` is a (transitive) prerequisite of `from`.
    pub fn depends_on(&self, from: u64, target: u64) -> bool {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            for next in self.prerequisites_of(current) {
                if next == target {
                    return true;
                }
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Whether adding `dependent -> prerequisite` would close a cycle.
    pub fn would_create_cycle(&self, dependent: u64, prerequisite: u64) -> bool {
        dependent == prerequisite || self.depends_on(prerequisite, dependent)
    }

    /// Checks a new edge against the current graph.
    ///
    /// # Errors
    ///
    /// * `PlannerError::SelfDependency` - both endpoints are the same task
    /// * `PlannerError::CycleDetected` - the prerequisite already waits on the
    ///   dependent
    pub fn validate_edge(&self, dependent: u64, prerequisite: u64) -> Result<()> {
        if dependent == prerequisite {
            return Err(PlannerError::SelfDependency { task_id: dependent });
        }
        if self.would_create_cycle(dependent, prerequisite) {
            return Err(PlannerError::CycleDetected {
                dependent_id: dependent,
                prerequisite_id: prerequisite,
            });
        }
        Ok(())
    }

    /// Orders `tasks` so every prerequisite precedes its dependents.
    ///
    /// Ties keep the order of `tasks`. Tasks on a cycle (which a validated
    /// graph never has) are appended at the end in their input order.
    pub fn topological_order(&self, tasks: &[u64]) -> Vec<u64> {
        let members: HashSet<u64> = tasks.iter().copied().collect();
        let mut pending: BTreeMap<u64, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<u64, Vec<u64>> = BTreeMap::new();

        for &task in tasks {
            let prereqs: Vec<u64> = self
                .prerequisites_of(task)
                .filter(|p| members.contains(p))
                .collect();
            pending.insert(task, prereqs.len());
            for p in prereqs {
                dependents.entry(p).or_default().push(task);
            }
        }

        let mut ready: VecDeque<u64> = tasks
            .iter()
            .copied()
            .filter(|t| pending.get(t) == Some(&0))
            .collect();
        let mut ordered = Vec::with_capacity(tasks.len());
        let mut placed = HashSet::new();

        while let Some(task) = ready.pop_front() {
            if !placed.insert(task) {
                continue;
            }
            ordered.push(task);
            for &next in dependents.get(&task).map(Vec::as_slice).unwrap_or_default() {
                if let Some(count) = pending.get_mut(&next) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(next);
                    }
                }
            }
        }

        ordered.extend(tasks.iter().copied().filter(|t| !placed.contains(t)));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: u64, dependent_id: u64, prerequisite_id: u64) -> TaskDependency {
        TaskDependency {
            id,
            dependent_id,
            prerequisite_id,
        }
    }

    #[test]
    fn rejects_self_dependency() {
        let graph = DependencyGraph::default();
        assert!(matches!(
            graph.validate_edge(4, 4),
            Err(PlannerError::SelfDependency { task_id: 4 })
        ));
    }

    #[test]
    fn rejects_direct_cycle() {
        // A(1) depends on B(2); B depending on A closes the loop.
        let edges = [edge(1, 1, 2)];
        let graph = DependencyGraph::from_edges(&edges);
        assert!(matches!(
            graph.validate_edge(2, 1),
            Err(PlannerError::CycleDetected {
                dependent_id: 2,
                prerequisite_id: 1
            })
        ));
    }

    #[test]
    fn rejects_transitive_cycle() {
        // 1 -> 2 -> 3 -> 4
        let edges = [edge(1, 1, 2), edge(2, 2, 3), edge(3, 3, 4)];
        let graph = DependencyGraph::from_edges(&edges);
        assert!(graph.would_create_cycle(4, 1));
        assert!(graph.validate_edge(4, 1).is_err());
        // A shortcut in the same direction is fine.
        assert!(graph.validate_edge(1, 4).is_ok());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        // 1 waits on 2 and 3, both of which wait on 4.
        let edges = [edge(1, 1, 2), edge(2, 1, 3), edge(3, 2, 4), edge(4, 3, 4)];
        let graph = DependencyGraph::from_edges(&edges);
        assert!(graph.validate_edge(2, 3).is_ok());
        assert!(graph.depends_on(1, 4));
        assert!(!graph.depends_on(4, 1));
        assert!(graph.contains(1, 3));
        assert!(!graph.contains(3, 1));
    }

    #[test]
    fn topological_order_puts_prerequisites_first() {
        // 3 waits on 1, 1 waits on 2
        let edges = [edge(1, 3, 1), edge(2, 1, 2)];
        let graph = DependencyGraph::from_edges(&edges);
        assert_eq!(graph.topological_order(&[1, 2, 3, 4]), vec![2, 4, 1, 3]);
    }
}
