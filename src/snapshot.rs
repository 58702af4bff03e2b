//! Structural snapshots of a planar graph, for saving and loading.
//!
//! A snapshot lists vertices by coordinate and edges by their endpoint
//! coordinates, so it carries no arena ids and can be rebuilt into an
//! equivalent graph.

use std::collections::HashSet;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result, TopologyError};
use crate::math::{xy, CoordKey, Point2};
use crate::topology::{validate_weight, PlanarGraph};

/// A vertex as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub point: [f64; 2],
    #[serde(default)]
    pub terminal: bool,
}

/// An edge as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub weight: f64,
    #[serde(default)]
    pub steiner: bool,
}

/// Every vertex and edge of a planar graph with their attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub vertices: Vec<VertexRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl PlanarGraph {
    /// Captures the graph in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge refers to a missing vertex.
    pub fn to_snapshot(&self) -> Result<GraphSnapshot> {
        let vertices = self
            .vertices()
            .map(|(_, v)| VertexRecord {
                point: xy(&v.point),
                terminal: v.terminal,
            })
            .collect();

        let mut edges = Vec::with_capacity(self.edge_count());
        for (_, e) in self.edges() {
            edges.push(EdgeRecord {
                start: xy(&self.vertex(e.start)?.point),
                end: xy(&self.vertex(e.end)?.point),
                weight: e.weight,
                steiner: e.steiner,
            });
        }

        Ok(GraphSnapshot { vertices, edges })
    }

    /// Rebuilds a graph from a snapshot.
    ///
    /// Unlike incremental construction, duplicates are rejected: a snapshot
    /// taken from a valid graph never contains any.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::DuplicateVertex`, `DuplicateEdge`,
    /// `VertexNotFound` or `SelfLoop` for a snapshot that does not describe
    /// a valid graph, and `OperationError::InvalidInput` for a bad weight.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Self> {
        let mut graph = Self::new();

        for record in &snapshot.vertices {
            let point = Point2::new(record.point[0], record.point[1]);
            if graph.find_vertex(&point).is_some() {
                return Err(TopologyError::DuplicateVertex {
                    x: point.x,
                    y: point.y,
                }
                .into());
            }
            graph.add_vertex(point, record.terminal)?;
        }

        let mut seen = HashSet::with_capacity(snapshot.edges.len());
        for record in &snapshot.edges {
            let start = Point2::new(record.start[0], record.start[1]);
            let end = Point2::new(record.end[0], record.end[1]);
            let lookup = |p: &Point2| {
                graph
                    .find_vertex(p)
                    .ok_or(TopologyError::VertexNotFound { x: p.x, y: p.y })
            };
            let a = lookup(&start)?;
            let b = lookup(&end)?;

            let (ka, kb) = (CoordKey::new(&start), CoordKey::new(&end));
            let pair = if ka <= kb { (ka, kb) } else { (kb, ka) };
            if !seen.insert(pair) {
                return Err(TopologyError::DuplicateEdge {
                    from: record.start,
                    to: record.end,
                }
                .into());
            }

            let id = graph.connect(a, b, validate_weight(record.weight)?)?;
            graph.edge_mut(id)?.steiner = record.steiner;
        }

        Ok(graph)
    }

    /// Writes the graph as JSON.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if encoding or writing fails.
    pub fn save_json<W: Write>(&self, writer: W) -> Result<()> {
        let snapshot = self.to_snapshot()?;
        serde_json::to_writer(writer, &snapshot).map_err(PersistError::from)?;
        Ok(())
    }

    /// Reads a graph written by [`PlanarGraph::save_json`].
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if reading or decoding fails, and the errors of
    /// [`PlanarGraph::from_snapshot`] for an invalid graph.
    pub fn load_json<R: Read>(reader: R) -> Result<Self> {
        let snapshot: GraphSnapshot =
            serde_json::from_reader(reader).map_err(PersistError::from)?;
        Self::from_snapshot(&snapshot)
    }
}
