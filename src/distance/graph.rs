//! Weighted location graph with cached all-pairs shortest paths.

use tracing::debug;

use crate::collections::OrderedMap;
use crate::error::RoutingError;
use crate::models::LocationId;

/// Shortest distance between two locations and the locations walked.
///
/// The path includes both endpoints; a location's path to itself is empty.
/// Unreachable pairs have an infinite distance and an empty path.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub distance: f64,
    pub path: Vec<LocationId>,
}

impl ShortestPath {
    fn unreachable() -> Self {
        Self {
            distance: f64::INFINITY,
            path: Vec::new(),
        }
    }

    /// Returns `true` if a path exists.
    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

/// Read-only all-pairs shortest path table, dense and row-major.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    index: OrderedMap<LocationId, usize>,
    paths: Vec<ShortestPath>,
}

impl PathTable {
    /// Shortest path from `from` to `to`, or `None` if either is unknown.
    pub fn get(&self, from: LocationId, to: LocationId) -> Option<&ShortestPath> {
        let i = *self.index.get(&from)?;
        let j = *self.index.get(&to)?;
        self.paths.get(i * self.index.len() + j)
    }

    /// Shortest distance from `from` to `to`.
    pub fn distance(&self, from: LocationId, to: LocationId) -> Option<f64> {
        self.get(from, to).map(|p| p.distance)
    }

    /// Locations walked from `from` to `to`.
    pub fn path(&self, from: LocationId, to: LocationId) -> Option<&[LocationId]> {
        self.get(from, to).map(|p| p.path.as_slice())
    }

    /// Number of locations covered.
    pub fn size(&self) -> usize {
        self.index.len()
    }
}

/// Undirected weighted graph over locations.
///
/// Edge updates mark the shortest path table stale; the next read
/// recomputes it with Floyd-Warshall in O(V³).
///
/// # Examples
///
/// ```
/// use package_routing::distance::DistanceGraph;
/// use package_routing::models::LocationId;
///
/// let (a, b, c) = (LocationId::new(0), LocationId::new(1), LocationId::new(2));
/// let mut graph = DistanceGraph::new();
/// graph.add_edge(a, b, 1.0);
/// graph.add_edge(b, c, 2.0);
/// graph.add_edge(a, c, 4.0);
///
/// let sp = graph.shortest_distance(a, c).unwrap();
/// assert_eq!(sp.distance, 3.0);
/// assert_eq!(sp.path, vec![a, b, c]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DistanceGraph {
    nodes: OrderedMap<LocationId, usize>,
    edges: OrderedMap<(LocationId, LocationId), f64>,
    table: PathTable,
    valid: bool,
    recomputations: usize,
}

impl DistanceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a location with no edges.
    pub fn add_node(&mut self, id: LocationId) {
        if !self.nodes.contains_key(&id) {
            let next = self.nodes.len();
            self.nodes.insert(id, next);
            self.valid = false;
        }
    }

    /// Sets the weight between `a` and `b` in both directions.
    ///
    /// Unknown endpoints are registered. Weights must be non-negative.
    pub fn add_edge(&mut self, a: LocationId, b: LocationId, weight: f64) {
        self.add_node(a);
        self.add_node(b);
        self.edges.insert(edge_key(a, b), weight);
        self.valid = false;
    }

    /// Direct edge weight between `a` and `b`.
    pub fn weight(&self, a: LocationId, b: LocationId) -> Option<f64> {
        self.edges.get(&edge_key(a, b)).copied()
    }

    /// Returns `true` if `id` is a registered location.
    pub fn contains_node(&self, id: LocationId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Locations in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.nodes.keys().copied()
    }

    /// Returns the number of registered locations.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the cached table reflects every edge update.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of times the table has been rebuilt.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// The shortest path table, rebuilt first if stale.
    pub fn paths(&mut self) -> &PathTable {
        if !self.valid {
            self.recompute();
        }
        &self.table
    }

    /// Shortest path between two known locations.
    pub fn shortest_distance(
        &mut self,
        from: LocationId,
        to: LocationId,
    ) -> Result<&ShortestPath, RoutingError> {
        for id in [from, to] {
            if !self.nodes.contains_key(&id) {
                return Err(RoutingError::UnknownLocation(id));
            }
        }
        self.paths()
            .get(from, to)
            .ok_or(RoutingError::UnknownLocation(from))
    }

    fn recompute(&mut self) {
        let n = self.nodes.len();
        let mut paths = vec![ShortestPath::unreachable(); n * n];

        for (&(a, b), &weight) in &self.edges {
            if a == b {
                continue;
            }
            let (Some(&i), Some(&j)) = (self.nodes.get(&a), self.nodes.get(&b)) else {
                continue;
            };
            paths[i * n + j] = ShortestPath {
                distance: weight,
                path: vec![a, b],
            };
            paths[j * n + i] = ShortestPath {
                distance: weight,
                path: vec![b, a],
            };
        }
        for i in 0..n {
            paths[i * n + i] = ShortestPath {
                distance: 0.0,
                path: Vec::new(),
            };
        }

        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let through = paths[i * n + k].distance + paths[k * n + j].distance;
                    if through < paths[i * n + j].distance {
                        let mut path = paths[i * n + k].path.clone();
                        path.extend(paths[k * n + j].path.iter().skip(1));
                        paths[i * n + j] = ShortestPath {
                            distance: through,
                            path,
                        };
                    }
                }
            }
        }

        self.table = PathTable {
            index: self.nodes.clone(),
            paths,
        };
        self.valid = true;
        self.recomputations += 1;
        debug!(
            "Recomputed shortest paths for {} locations ({} rebuilds)",
            n, self.recomputations
        );
    }
}

fn edge_key(a: LocationId, b: LocationId) -> (LocationId, LocationId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
