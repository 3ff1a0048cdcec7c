/// This module implements the best-first search shared by Dijkstra and A*. It is a variant of
/// [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
/// that records every node it finalizes, in order, so the search can be replayed afterwards.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::debug;
use num_traits::Zero;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// One node pulled from the frontier and finalized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceStep<N, C> {
    pub node: N,
    /// Position in the trace, starting at 0.
    pub order: usize,
    /// Distance from the start when the node was finalized.
    pub cost: C,
}

/// Every node a search finalized, in extraction order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTrace<N, C> {
    steps: Vec<TraceStep<N, C>>,
}

impl<N: PartialEq, C> SearchTrace<N, C> {
    pub fn len(&self) -> usize {
        self.steps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
    pub fn steps(&self) -> &[TraceStep<N, C>] {
        &self.steps
    }
    pub fn get(&self, order: usize) -> Option<&TraceStep<N, C>> {
        self.steps.get(order)
    }
    pub fn iter(&self) -> impl Iterator<Item = &TraceStep<N, C>> {
        self.steps.iter()
    }
    pub fn contains(&self, node: &N) -> bool {
        self.steps.iter().any(|s| s.node == *node)
    }
}

/// Outcome of a search. [PathResult::NoPath] is a normal terminal state, not a failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathResult<N, C> {
    /// Nodes from start to goal, both included, and the summed edge cost.
    Found { nodes: Vec<N>, cost: C },
    NoPath,
}

impl<N, C: Copy> PathResult<N, C> {
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found { .. })
    }
    pub fn cost(&self) -> Option<C> {
        match self {
            PathResult::Found { cost, .. } => Some(*cost),
            PathResult::NoPath => None,
        }
    }
    /// Empty when no path exists.
    pub fn nodes(&self) -> &[N] {
        match self {
            PathResult::Found { nodes, .. } => nodes,
            PathResult::NoPath => &[],
        }
    }
}

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    sequence: u64,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.sequence == other.sequence
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimate first; among equal estimates the entry pushed first wins
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

fn reverse_path<N, C>(parents: &FxIndexMap<N, (usize, C)>, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    let mut path: Vec<N> = std::iter::successors(Some(start), |&i| {
        parents
            .get_index(i)
            .map(|(_, &(parent, _))| parent)
            .filter(|&p| p != usize::MAX)
    })
    .filter_map(|i| parents.get_index(i).map(|(node, _)| node.clone()))
    .collect();
    path.reverse();
    path
}

/// Runs a best-first search from `start`, ranking frontier entries by `cost + heuristic`.
/// With a zero heuristic this is Dijkstra's algorithm. The heuristic must be consistent:
/// finalized nodes are never reopened. Returns the trace of finalized nodes together with
/// the path to the first node accepted by `success`.
pub fn best_first<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> (SearchTrace<N, C>, PathResult<N, C>)
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut steps: Vec<TraceStep<N, C>> = Vec::new();
    let mut to_see = BinaryHeap::new();
    let mut sequence: u64 = 0;
    to_see.push(SmallestCostHolder {
        estimated_cost: heuristic(start),
        cost: Zero::zero(),
        sequence,
        index: 0,
    });
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (usize::MAX, Zero::zero()));
    let mut closed: Vec<bool> = vec![false];
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let successors = {
            let Some((node, &(_, c))) = parents.get_index(index) else {
                continue;
            };
            // A node may sit in the heap several times if a cheaper way to it was found
            // later; only the cheapest entry is expanded.
            if cost > c || closed[index] {
                continue;
            }
            closed[index] = true;
            steps.push(TraceStep {
                node: node.clone(),
                order: steps.len(),
                cost,
            });
            if success(node) {
                let nodes = reverse_path(&parents, index);
                return (SearchTrace { steps }, PathResult::Found { nodes, cost });
            }
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h; // heuristic(&successor)
            let n; // index for successor
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert((index, new_cost));
                    closed.push(false);
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost && !closed[e.index()] {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            sequence += 1;
            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                sequence,
                index: n,
            });
        }
    }
    debug!("Frontier exhausted after finalizing {} nodes", steps.len());
    (SearchTrace { steps }, PathResult::NoPath)
}
