//! Routing over a street network given as a node-link document:
//!
//! ```json
//! {"nodes": [{"id": "17", "x": 25.0, "y": 40.5, "label": "A"}],
//!  "edges": [{"from": "17", "to": "18", "weight": 4.2}]}
//! ```
//!
//! Edges are directed. Weights are decimals between 1.0 and 20.0 with one digit after the point
//! and are stored as integer tenths so both searches work on exact costs.
use fxhash::FxHashMap;
use log::{info, warn};
use num_traits::Zero;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::search::best_first;
use crate::solver::{Algorithm, SearchRun};

/// Edge weight in tenths of the document's unit.
pub type Tenths = u64;

const MIN_WEIGHT_TENTHS: Tenths = 10;
const MAX_WEIGHT_TENTHS: Tenths = 200;

pub type NetworkRun = SearchRun<NodeIndex, Tenths>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Junction {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl Junction {
    fn distance(&self, other: &Junction) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

fn to_tenths(edge: &EdgeRecord) -> Result<Tenths, NetworkError> {
    let tenths = (edge.weight * 10.0).round();
    let range = MIN_WEIGHT_TENTHS as f64..=MAX_WEIGHT_TENTHS as f64;
    if !edge.weight.is_finite() || !range.contains(&tenths) {
        return Err(NetworkError::InvalidWeight {
            from: edge.from.clone(),
            to: edge.to.clone(),
            weight: edge.weight,
        });
    }
    Ok(tenths as Tenths)
}

#[derive(Clone, Debug)]
pub struct RoadNetwork {
    graph: DiGraph<Junction, Tenths>,
    ids: FxHashMap<String, NodeIndex>,
    /// Tenths of weight per unit of straight-line distance, never more than any edge has.
    heuristic_scale: f64,
}

impl RoadNetwork {
    pub fn from_json(json: &str) -> Result<RoadNetwork, NetworkError> {
        let document: NodeLinkDocument = serde_json::from_str(json)?;
        RoadNetwork::from_document(document)
    }

    pub fn from_document(document: NodeLinkDocument) -> Result<RoadNetwork, NetworkError> {
        let mut graph = DiGraph::with_capacity(document.nodes.len(), document.edges.len());
        let mut ids = FxHashMap::default();
        for node in document.nodes {
            if ids.contains_key(&node.id) {
                return Err(NetworkError::DuplicateNode(node.id));
            }
            let id = node.id.clone();
            let ix = graph.add_node(Junction {
                id: node.id,
                label: node.label,
                x: node.x,
                y: node.y,
            });
            ids.insert(id, ix);
        }
        for edge in &document.edges {
            let lookup = |id: &String| {
                ids.get(id)
                    .copied()
                    .ok_or_else(|| NetworkError::UnknownNode(id.clone()))
            };
            let (a, b) = (lookup(&edge.from)?, lookup(&edge.to)?);
            graph.add_edge(a, b, to_tenths(edge)?);
        }
        let mut network = RoadNetwork {
            graph,
            ids,
            heuristic_scale: 0.0,
        };
        network.update_heuristic_scale();
        info!(
            "Loaded road network with {} nodes and {} edges",
            network.node_count(),
            network.edge_count()
        );
        Ok(network)
    }

    /// Writes the network back out in node-link form, weights in their decimal unit.
    pub fn to_document(&self) -> NodeLinkDocument {
        let nodes = self
            .graph
            .node_weights()
            .map(|j| NodeRecord {
                id: j.id.clone(),
                x: j.x,
                y: j.y,
                label: j.label.clone(),
            })
            .collect();
        let edges = self
            .graph
            .edge_references()
            .map(|e| EdgeRecord {
                from: self.graph[e.source()].id.clone(),
                to: self.graph[e.target()].id.clone(),
                weight: *e.weight() as f64 / 10.0,
            })
            .collect();
        NodeLinkDocument { nodes, edges }
    }

    fn update_heuristic_scale(&mut self) {
        let scale = self
            .graph
            .edge_references()
            .filter_map(|e| {
                let length = self.graph[e.source()].distance(&self.graph[e.target()]);
                (length > f64::EPSILON).then(|| *e.weight() as f64 / length)
            })
            .fold(f64::INFINITY, f64::min);
        // Shrunk slightly so rounding cannot push an estimate past an edge weight.
        self.heuristic_scale = if scale.is_finite() {
            scale * (1.0 - 1e-9)
        } else {
            0.0
        };
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: &str) -> Result<NodeIndex, NetworkError> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| NetworkError::UnknownNode(id.to_owned()))
    }

    pub fn junction(&self, ix: NodeIndex) -> Option<&Junction> {
        self.graph.node_weight(ix)
    }

    /// Keeps the nodes lying at or right of the leftmost reference node and drops every edge
    /// that loses an endpoint. Reference ids missing from the network are skipped.
    pub fn retain_from_min_x(&mut self, reference_ids: &[&str]) -> Result<(), NetworkError> {
        let min_x = reference_ids
            .iter()
            .filter_map(|id| match self.ids.get(*id) {
                Some(&ix) => Some(self.graph[ix].x),
                None => {
                    warn!("Reference node {} is not in the network", id);
                    None
                }
            })
            .fold(f64::INFINITY, f64::min);
        if !min_x.is_finite() {
            return Err(NetworkError::UnknownNode(reference_ids.join(", ")));
        }
        let (nodes_before, edges_before) = (self.node_count(), self.edge_count());
        self.graph = self.graph.filter_map(
            |_, j| (j.x >= min_x).then(|| j.clone()),
            |_, w| Some(*w),
        );
        self.ids = self
            .graph
            .node_indices()
            .map(|ix| (self.graph[ix].id.clone(), ix))
            .collect();
        self.update_heuristic_scale();
        info!(
            "Filtered network from {} nodes and {} edges to {} nodes and {} edges",
            nodes_before,
            edges_before,
            self.node_count(),
            self.edge_count()
        );
        Ok(())
    }

    /// Straight-line lower bound on the cost from `a` to `b`.
    pub fn heuristic(&self, a: NodeIndex, b: NodeIndex) -> Tenths {
        let distance = self.graph[a].distance(&self.graph[b]);
        (distance * self.heuristic_scale).floor() as Tenths
    }

    fn search<FH>(
        &self,
        algorithm: Algorithm,
        from: &str,
        to: &str,
        heuristic: FH,
    ) -> Result<NetworkRun, NetworkError>
    where
        FH: FnMut(&NodeIndex) -> Tenths,
    {
        let start = self.node(from)?;
        let goal = self.node(to)?;
        let (trace, path) = best_first(
            &start,
            |&node| {
                self.graph
                    .edges(node)
                    .map(|e| (e.target(), *e.weight()))
                    .collect::<Vec<_>>()
            },
            heuristic,
            |&node| node == goal,
        );
        info!(
            "{} from {} to {} finalized {} nodes",
            algorithm,
            from,
            to,
            trace.len()
        );
        Ok(NetworkRun {
            algorithm,
            trace,
            path,
        })
    }

    pub fn dijkstra(&self, from: &str, to: &str) -> Result<NetworkRun, NetworkError> {
        self.search(Algorithm::Dijkstra, from, to, |_| Zero::zero())
    }

    pub fn astar(&self, from: &str, to: &str) -> Result<NetworkRun, NetworkError> {
        let goal = self.node(to)?;
        self.search(Algorithm::Astar, from, to, |&n| self.heuristic(n, goal))
    }

    /// Display labels along a path, falling back to the id for unlabelled nodes.
    pub fn labels<'a>(&'a self, nodes: &[NodeIndex]) -> Vec<&'a str> {
        nodes
            .iter()
            .filter_map(|&ix| self.junction(ix))
            .map(|j| {
                if j.label.is_empty() {
                    j.id.as_str()
                } else {
                    j.label.as_str()
                }
            })
            .collect()
    }
}
