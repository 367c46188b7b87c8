//! Arena-backed metro-map graph.
//!
//! Nodes and edges live in append-only arenas addressed by [`NodeId`] / [`EdgeId`]. Deleting
//! leaves a tombstone; [`Graph::remove_deleted`] drops tombstoned nodes from the live set.
//! Every positional mutation goes through the graph, which refreshes the dependent edge
//! geometry and node signatures before returning.

mod edge_cache;
mod entries;

use std::cell::RefCell;

use indexmap::IndexSet;
use octopus_geom::{Envelope, Point, PrecisionModel, envelope_of};
use rustc_hash::FxBuildHasher;

use crate::direction::OctilinearDirection;
use crate::error::{Error, Result};
use crate::route::{Color, Route, RouteId};
use crate::signature::{NodeSignature, SignatureKind};

use edge_cache::EdgeCache;
pub use entries::{Edge, EdgeId, Node, NodeId};

type NodeSet = IndexSet<NodeId, FxBuildHasher>;

#[derive(Debug)]
pub struct Graph {
    precision: PrecisionModel,

    nodes: Vec<Node>,
    live: NodeSet,
    edges: Vec<Edge>,
    routes: Vec<Route>,

    // `edges()` is derived from node adjacency; conflict evaluation asks for it many times
    // per iteration, so keep a lazily rebuilt snapshot.
    edge_cache_gen: u64,
    edge_cache: RefCell<Option<EdgeCache>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(PrecisionModel::default())
    }
}

impl Graph {
    pub fn new(precision: PrecisionModel) -> Self {
        Self {
            precision,
            nodes: Vec::new(),
            live: NodeSet::default(),
            edges: Vec::new(),
            routes: Vec::new(),
            edge_cache_gen: 0,
            edge_cache: RefCell::new(None),
        }
    }

    pub fn precision(&self) -> &PrecisionModel {
        &self.precision
    }

    fn invalidate_edge_cache(&mut self) {
        self.edge_cache_gen = self.edge_cache_gen.wrapping_add(1);
        *self.edge_cache.get_mut() = None;
    }

    pub fn create_route(&mut self, line_width: f64, color: Color) -> Route {
        let route = Route::new(RouteId(self.routes.len()), line_width, color);
        self.routes.push(route);
        route
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn create_node(&mut self, x: f64, y: f64, name: Option<&str>, kind: SignatureKind) -> NodeId {
        self.create_node_with(x, y, name, |_| kind)
    }

    /// Like [`create_node`](Self::create_node), letting `factory` pick the signature once the
    /// node exists.
    pub fn create_node_with<F>(&mut self, x: f64, y: f64, name: Option<&str>, factory: F) -> NodeId
    where
        F: FnOnce(&Node) -> SignatureKind,
    {
        let id = NodeId(self.nodes.len());
        let position = self.precision.point(x, y);
        let mut node = Node {
            id,
            name: name.map(str::to_string),
            position,
            signature: NodeSignature::new(SignatureKind::Empty, position),
            adjacent: Default::default(),
            deleted: false,
        };
        let kind = factory(&node);
        node.signature = NodeSignature::new(kind, position);
        self.nodes.push(node);
        self.live.insert(id);
        self.refresh_signature(id);
        id
    }

    pub fn create_edge(&mut self, a: NodeId, b: NodeId, routes: &[Route]) -> Result<EdgeId> {
        self.create_named_edge(a, b, None, routes)
    }

    pub fn create_named_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        name: Option<&str>,
        routes: &[Route],
    ) -> Result<EdgeId> {
        if a == b {
            return Err(Error::SelfLoop(a));
        }
        let pa = self.try_node(a)?.position;
        let pb = self.try_node(b)?.position;
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(
            id,
            (a, pa),
            (b, pb),
            name.map(str::to_string),
            routes.to_vec(),
            &self.precision,
        ));
        self.nodes[a.0].adjacent.insert(id);
        self.nodes[b.0].adjacent.insert(id);
        self.invalidate_edge_cache();
        self.refresh_signature(a);
        self.refresh_signature(b);
        Ok(id)
    }

    pub fn add_routes(&mut self, edge: EdgeId, routes: &[Route]) -> Result<()> {
        let e = self.try_edge_mut(edge)?;
        e.add_routes(routes.iter().copied());
        let (a, b) = (e.a, e.b);
        self.refresh_signature(a);
        self.refresh_signature(b);
        Ok(())
    }

    /// Re-registers nodes detached with [`remove_nodes`](Self::remove_nodes).
    pub fn add_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) -> Result<()> {
        for id in ids {
            if self.try_node(id)?.deleted {
                return Err(Error::UnknownNode(id));
            }
            self.live.insert(id);
        }
        self.invalidate_edge_cache();
        Ok(())
    }

    /// Detaches nodes from the live set without deleting them.
    pub fn remove_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        for id in ids {
            self.live.shift_remove(&id);
        }
        self.invalidate_edge_cache();
    }

    pub fn try_node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(Error::UnknownNode(id))
    }

    pub fn try_edge(&self, id: EdgeId) -> Result<&Edge> {
        self.edges.get(id.0).ok_or(Error::UnknownEdge(id))
    }

    fn try_edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge> {
        self.edges.get_mut(id.0).ok_or(Error::UnknownEdge(id))
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this graph.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.live.contains(&id)
    }

    pub fn node_count(&self) -> usize {
        self.live.len()
    }

    /// Live nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.live.iter().map(|id| &self.nodes[id.0])
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.live.iter().copied().collect()
    }

    /// Edges reachable from the live nodes, in first-seen order.
    pub fn edges(&self) -> Vec<EdgeId> {
        let generation = self.edge_cache_gen;
        let mut cache = self.edge_cache.borrow_mut();
        let stale = cache
            .as_ref()
            .map(|c| c.generation != generation)
            .unwrap_or(true);
        if stale {
            *cache = Some(EdgeCache::build(
                generation,
                self.live.iter().map(|id| &self.nodes[id.0]),
                &self.edges,
            ));
        }
        cache.as_ref().map(|c| c.edges.clone()).unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        node.adjacent
            .iter()
            .filter_map(|&e| self.edges[e.0].other_node(id).ok())
            .collect()
    }

    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.node(a)
            .adjacent
            .iter()
            .copied()
            .find(|&e| self.edges[e.0].is_incident(b))
    }

    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_between(a, b).is_some()
    }

    /// Adjacent edges of `node` except `except`.
    pub fn other_adjacent_edges(&self, node: NodeId, except: EdgeId) -> Vec<EdgeId> {
        self.node(node)
            .adjacent
            .iter()
            .copied()
            .filter(|&e| e != except)
            .collect()
    }

    /// Live node sitting exactly on `position`, ignoring `except`.
    pub fn node_at(&self, position: Point, except: NodeId) -> Option<NodeId> {
        let p = self.precision.snap(position);
        self.nodes()
            .find(|n| n.id != except && !n.deleted && n.position == p)
            .map(|n| n.id)
    }

    pub fn move_node(&mut self, id: NodeId, position: Point) -> Result<()> {
        let position = self.precision.snap(position);
        let node = self.nodes.get_mut(id.0).ok_or(Error::UnknownNode(id))?;
        if node.position == position {
            return Ok(());
        }
        node.position = position;
        self.refresh_node(id);
        Ok(())
    }

    pub fn translate_node(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<()> {
        let p = self.try_node(id)?.position;
        self.move_node(id, octopus_geom::point(p.x + dx, p.y + dy))
    }

    /// Moves `distance` units along `direction` (diagonals move along the unit diagonal).
    pub fn move_node_towards(
        &mut self,
        id: NodeId,
        direction: OctilinearDirection,
        distance: f64,
    ) -> Result<()> {
        let step = direction.unit_vector() * distance;
        self.translate_node(id, step.x, step.y)
    }

    /// Recomputes adjacent edge geometry and the signatures of the node and its neighbours.
    fn refresh_node(&mut self, id: NodeId) {
        let adjacent: Vec<EdgeId> = self.nodes[id.0].adjacent.iter().copied().collect();
        let mut touched = vec![id];
        for e in adjacent {
            let (a, b) = (self.edges[e.0].a, self.edges[e.0].b);
            let (pa, pb) = (self.nodes[a.0].position, self.nodes[b.0].position);
            self.edges[e.0].update_geometry(pa, pb, &self.precision);
            touched.push(if a == id { b } else { a });
        }
        for n in touched {
            self.refresh_signature(n);
        }
    }

    fn refresh_signature(&mut self, id: NodeId) {
        let node = &self.nodes[id.0];
        let position = node.position;
        let mut signature = node.signature.clone();
        signature.recompute(
            position,
            node.adjacent.iter().map(|e| &self.edges[e.0]),
            &self.precision,
        );
        self.nodes[id.0].signature = signature;
    }

    /// Records the current bearing of every octilinear edge as its original direction.
    pub fn snapshot_directions(&mut self) {
        for e in self.edges.iter_mut().filter(|e| !e.deleted) {
            if let Some(direction) = e.direction.as_octilinear() {
                e.original_direction = direction;
            }
        }
    }

    pub fn delete_edge(&mut self, id: EdgeId) -> Result<()> {
        let edge = self.try_edge_mut(id)?;
        if edge.deleted {
            return Ok(());
        }
        edge.deleted = true;
        let (a, b) = (edge.a, edge.b);
        self.nodes[a.0].adjacent.shift_remove(&id);
        self.nodes[b.0].adjacent.shift_remove(&id);
        self.invalidate_edge_cache();
        self.refresh_signature(a);
        self.refresh_signature(b);
        Ok(())
    }

    /// Deletes every adjacent edge and tombstones the node. It stays listed until
    /// [`remove_deleted`](Self::remove_deleted).
    pub fn delete_node(&mut self, id: NodeId) -> Result<()> {
        let adjacent: Vec<EdgeId> = self.try_node(id)?.adjacent.iter().copied().collect();
        for e in adjacent {
            self.delete_edge(e)?;
        }
        self.nodes[id.0].deleted = true;
        Ok(())
    }

    pub fn remove_deleted(&mut self) {
        let nodes = &self.nodes;
        self.live.retain(|id| !nodes[id.0].deleted);
        self.invalidate_edge_cache();
    }

    /// Envelope of all edge lines and node signatures.
    pub fn bounding_box(&self) -> Option<Envelope> {
        let signature_points = self
            .nodes()
            .flat_map(|n| n.signature.geometry().vertices().into_iter().chain([n.position]));
        let edge_points: Vec<Point> = self
            .edges()
            .into_iter()
            .flat_map(|e| self.edges[e.0].line.points().to_vec())
            .collect();
        envelope_of(signature_points.chain(edge_points))
    }

    pub fn non_octilinear_edges(&self) -> Vec<EdgeId> {
        self.edges()
            .into_iter()
            .filter(|&e| !self.edges[e.0].is_octilinear())
            .collect()
    }
}
