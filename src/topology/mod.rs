pub mod edge;
pub mod vertex;

pub use edge::{EdgeData, EdgeId};
pub use vertex::{VertexData, VertexId};

use std::collections::HashMap;

use crate::error::{GeometryError, OperationError, Result, TopologyError};
use crate::geometry::Segment;
use crate::math::distance_2d::distance;
use crate::math::{xy, CoordKey, Point2};
use crate::operations::modification::{InsertAtClosestEdge, SplitEdge};
use crate::operations::steiner::{SteinerTree, SteinerTreeResult};
use slotmap::SlotMap;

/// Unordered vertex pair used to keep edges unique.
type VertexPair = (VertexId, VertexId);

fn vertex_pair(a: VertexId, b: VertexId) -> VertexPair {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A planar graph whose vertices are identified by their coordinates.
///
/// Vertices and edges live in generational arenas; a coordinate index and an
/// endpoint-pair index keep both unique, so inserting a known coordinate or
/// reconnecting a connected pair never creates a duplicate.
#[derive(Debug, Default, Clone)]
pub struct PlanarGraph {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    vertex_index: HashMap<CoordKey, VertexId>,
    edge_index: HashMap<VertexPair, EdgeId>,
}

impl PlanarGraph {
    /// Creates a new, empty planar graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from segment endpoint pairs with Euclidean weights.
    ///
    /// # Errors
    ///
    /// Fails like [`PlanarGraph::add_edge`].
    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Point2, Point2)>,
    {
        let mut graph = Self::new();
        for (p0, p1) in edges {
            graph.add_edge(p0, p1, false, false, None)?;
        }
        Ok(graph)
    }

    // --- Vertex operations ---

    /// Inserts a vertex at `point`, or overwrites the terminal flag of the
    /// vertex already there.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN or infinite coordinates.
    pub fn add_vertex(&mut self, point: Point2, terminal: bool) -> Result<VertexId> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(GeometryError::NonFinite {
                x: point.x,
                y: point.y,
            }
            .into());
        }

        let key = CoordKey::new(&point);
        if let Some(&id) = self.vertex_index.get(&key) {
            self.vertex_mut(id)?.terminal = terminal;
            return Ok(id);
        }

        let id = self.vertices.insert(VertexData::new(point, terminal));
        self.vertex_index.insert(key, id);
        Ok(id)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()).into())
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()).into())
    }

    /// Returns the vertex located exactly at `point`.
    #[must_use]
    pub fn find_vertex(&self, point: &Point2) -> Option<VertexId> {
        self.vertex_index.get(&CoordKey::new(point)).copied()
    }

    /// Sets the terminal flag of the vertex at `point`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::VertexNotFound` if no vertex is there.
    pub fn set_terminal(&mut self, point: &Point2, terminal: bool) -> Result<VertexId> {
        let id = self.find_vertex(point).ok_or(TopologyError::VertexNotFound {
            x: point.x,
            y: point.y,
        })?;
        self.vertex_mut(id)?.terminal = terminal;
        Ok(id)
    }

    /// Iterates over all vertices in storage order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the ids of all terminal vertices in storage order.
    #[must_use]
    pub fn terminals(&self) -> Vec<VertexId> {
        self.vertices
            .iter()
            .filter(|(_, v)| v.terminal)
            .map(|(id, _)| id)
            .collect()
    }

    // --- Edge operations ---

    /// Connects `p0` and `p1`, adding either endpoint that is missing.
    ///
    /// Both endpoints go through [`PlanarGraph::add_vertex`], so their
    /// terminal flags are overwritten with `terminal0`/`terminal1`. If the
    /// pair is already connected the existing edge is returned untouched,
    /// keeping its original weight, and `weight` is not looked at. Without
    /// an explicit `weight` a new edge costs its Euclidean length.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::SelfLoop` if `p0 == p1`, and
    /// `OperationError::InvalidInput` when a new edge would get a weight that
    /// is not finite and strictly positive.
    pub fn add_edge(
        &mut self,
        p0: Point2,
        p1: Point2,
        terminal0: bool,
        terminal1: bool,
        weight: Option<f64>,
    ) -> Result<EdgeId> {
        if CoordKey::new(&p0) == CoordKey::new(&p1) {
            return Err(TopologyError::SelfLoop { x: p0.x, y: p0.y }.into());
        }
        if let Some(existing) = self.find_edge(&p0, &p1) {
            self.add_vertex(p0, terminal0)?;
            self.add_vertex(p1, terminal1)?;
            return Ok(existing);
        }
        let weight = validate_weight(weight.unwrap_or_else(|| distance(&p0, &p1)))?;

        let v0 = self.add_vertex(p0, terminal0)?;
        let v1 = self.add_vertex(p1, terminal1)?;
        self.connect(v0, v1, weight)
    }

    /// Connects two existing vertices without touching their flags.
    pub(crate) fn connect(&mut self, a: VertexId, b: VertexId, weight: f64) -> Result<EdgeId> {
        if a == b {
            let p = self.vertex(a)?.point;
            return Err(TopologyError::SelfLoop { x: p.x, y: p.y }.into());
        }
        self.vertex(a)?;
        self.vertex(b)?;

        if let Some(&existing) = self.edge_index.get(&vertex_pair(a, b)) {
            return Ok(existing);
        }

        let id = self.edges.insert(EdgeData::new(a, b, weight));
        self.edge_index.insert(vertex_pair(a, b), id);
        Ok(id)
    }

    /// Removes an edge, leaving its endpoints in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found in the graph.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<EdgeData> {
        let data = self
            .edges
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))?;
        self.edge_index.remove(&vertex_pair(data.start, data.end));
        Ok(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()).into())
    }

    /// Returns a mutable reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()).into())
    }

    /// Returns the edge connecting the vertices at `p0` and `p1`, in either
    /// direction.
    #[must_use]
    pub fn find_edge(&self, p0: &Point2, p1: &Point2) -> Option<EdgeId> {
        let a = self.find_vertex(p0)?;
        let b = self.find_vertex(p1)?;
        self.edge_between(a, b)
    }

    /// Returns the edge connecting two vertices, in either direction.
    #[must_use]
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&vertex_pair(a, b)).copied()
    }

    /// Iterates over all edges in storage order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the endpoint coordinates of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or one of its endpoints is missing.
    pub fn edge_endpoints(&self, id: EdgeId) -> Result<(Point2, Point2)> {
        let edge = self.edge(id)?;
        Ok((self.vertex(edge.start)?.point, self.vertex(edge.end)?.point))
    }

    /// Returns an edge as a geometric segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing or is a loop.
    pub fn edge_segment(&self, id: EdgeId) -> Result<Segment> {
        let (p0, p1) = self.edge_endpoints(id)?;
        Segment::new(p0, p1)
    }

    // --- Steiner flags ---

    /// Returns the ids of all edges flagged as part of a Steiner tree.
    #[must_use]
    pub fn steiner_edges(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|(_, e)| e.steiner)
            .map(|(id, _)| id)
            .collect()
    }

    /// Flags every edge in `ids` as part of a Steiner tree.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is not found; edges before it stay flagged.
    pub fn mark_steiner(&mut self, ids: &[EdgeId]) -> Result<()> {
        for &id in ids {
            self.edge_mut(id)?.steiner = true;
        }
        Ok(())
    }

    /// Clears the Steiner flag on every edge.
    pub fn clear_steiner_flags(&mut self) {
        for (_, edge) in &mut self.edges {
            edge.steiner = false;
        }
    }

    /// Extracts the subgraph made of `ids` and the vertices they touch.
    ///
    /// Vertex flags and edge weights and flags are carried over.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is not found.
    pub fn edge_subgraph(&self, ids: &[EdgeId]) -> Result<Self> {
        let mut sub = Self::new();
        for &id in ids {
            let edge = self.edge(id)?;
            let start = self.vertex(edge.start)?;
            let end = self.vertex(edge.end)?;

            let a = sub.add_vertex(start.point, start.terminal)?;
            let b = sub.add_vertex(end.point, end.terminal)?;
            let new_id = sub.connect(a, b, edge.weight)?;
            sub.edge_mut(new_id)?.steiner = edge.steiner;
        }
        Ok(sub)
    }

    // --- Operations ---

    /// Splits the edge under `segment` at `point`.
    ///
    /// # Errors
    ///
    /// See [`SplitEdge::execute`].
    pub fn split_edge_by_vertex(
        &mut self,
        segment: &Segment,
        point: Point2,
        terminal: bool,
    ) -> Result<VertexId> {
        SplitEdge::new(*segment, point).terminal(terminal).execute(self)
    }

    /// Attaches `point` to the graph at the closest location on any edge.
    ///
    /// # Errors
    ///
    /// See [`InsertAtClosestEdge::execute`].
    pub fn add_vertex_at_closest_edge(&mut self, point: Point2, terminal: bool) -> Result<VertexId> {
        InsertAtClosestEdge::new(point).terminal(terminal).execute(self)
    }

    /// Approximates a Steiner tree over the terminal vertices and flags its
    /// edges. Other edges keep their flags.
    ///
    /// # Errors
    ///
    /// See [`SteinerTree::execute`].
    pub fn steiner_tree_approximate(&mut self) -> Result<SteinerTreeResult> {
        let result = SteinerTree::new().execute(self)?;
        self.mark_steiner(&result.edges)?;
        Ok(result)
    }
}

/// Checks that an edge weight can be used by shortest-path searches.
pub(crate) fn validate_weight(weight: f64) -> Result<f64> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(OperationError::InvalidInput(format!(
            "edge weight must be finite and positive, got {weight}"
        ))
        .into())
    }
}

/// Error for a missing edge between two points.
pub(crate) fn edge_not_found(p0: &Point2, p1: &Point2) -> TopologyError {
    TopologyError::EdgeNotFound {
        from: xy(p0),
        to: xy(p1),
    }
}
