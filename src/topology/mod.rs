pub mod edge;
pub mod face;
mod raycast;
pub mod snapshot;
pub mod vertex;

pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceHandle, FaceId, HandleId};
pub use raycast::SurfaceHit;
pub use snapshot::SurfaceSnapshot;
pub use vertex::{Magnitude, VertexData, VertexId};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::collections::OrderedSet;
use crate::error::SurfaceError;
use crate::math::{Point3, EPSILON};
use crate::settings::LayerSettings;

use face::resolve_corners;

/// Triangulated navigation surface of one layer.
///
/// Owns the welded vertices, the edges between them and the faces bounded
/// by those edges. Entities reference each other via typed IDs; usage
/// trackers record who references whom, and an entity is destroyed as soon
/// as nothing uses it.
///
/// The vertex index holds exactly the live vertices, ordered by magnitude.
#[derive(Debug)]
pub struct Surface {
    connection_radius: f64,
    max_edge_length: f64,
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    vertex_index: OrderedSet<Magnitude, VertexId>,
    handles: HashMap<HandleId, FaceId>,
}

impl Surface {
    /// Creates an empty surface for a layer.
    #[must_use]
    pub fn new(settings: &LayerSettings) -> Self {
        Self {
            connection_radius: settings.connection_radius(),
            max_edge_length: settings.max_edge_length(),
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            vertex_index: OrderedSet::new(),
            handles: HashMap::new(),
        }
    }

    /// Maximum distance between two points welded into one vertex.
    #[must_use]
    pub fn connection_radius(&self) -> f64 {
        self.connection_radius
    }

    #[must_use]
    pub fn max_edge_length(&self) -> f64 {
        self.max_edge_length
    }

    // --- Face registration ---

    /// Adds the triangle `a`, `b`, `c` to the surface.
    ///
    /// Corners closer than the connection radius to an existing vertex are
    /// welded to it, and existing edges between welded vertices are reused,
    /// which is what connects the new face to its neighbours. Degenerate
    /// triangles are accepted.
    ///
    /// Registering a handle that is already registered logs an error and
    /// returns the existing face.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::EntityNotFound`] if the store is inconsistent.
    pub fn register_face(
        &mut self,
        a: Point3,
        b: Point3,
        c: Point3,
        handle: FaceHandle,
    ) -> Result<FaceId, SurfaceError> {
        if let Some(&existing) = self.handles.get(&handle.id()) {
            tracing::error!(handle = handle.id().0, "face handle is already registered");
            return Ok(existing);
        }

        let va = self.find_or_create_vertex(a);
        let vb = self.find_or_create_vertex(b);
        let vc = self.find_or_create_vertex(c);

        let ab = self.find_or_create_edge(va, vb)?;
        let bc = self.find_or_create_edge(vb, vc)?;
        let ca = self.find_or_create_edge(vc, va)?;

        let (edges, vertices) =
            resolve_corners([self.edge_ends(ab)?, self.edge_ends(bc)?, self.edge_ends(ca)?]);
        let corners = [
            self.vertex(vertices[0])?.point,
            self.vertex(vertices[1])?.point,
            self.vertex(vertices[2])?.point,
        ];

        let face = self
            .faces
            .insert(FaceData::new(edges, vertices, corners, handle));
        for edge in edges {
            self.edge_mut(edge)?.faces.add_user(face);
        }
        self.handles.insert(handle.id(), face);
        Ok(face)
    }

    /// Removes the face registered with `handle`, along with every edge and
    /// vertex left unused.
    ///
    /// Returns `false` and logs an error if the handle is not registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the usage records are inconsistent.
    pub fn unregister_face(&mut self, handle: &FaceHandle) -> Result<bool, SurfaceError> {
        let Some(face_id) = self.handles.remove(&handle.id()) else {
            tracing::error!(
                handle = handle.id().0,
                "attempt to unregister a face that is not registered"
            );
            return Ok(false);
        };
        let face = self
            .faces
            .remove(face_id)
            .ok_or(SurfaceError::EntityNotFound("face"))?;
        for edge in face.edges {
            self.release_edge(edge, face_id)?;
        }
        Ok(true)
    }

    // --- Queries ---

    /// Returns `true` if `face` is alive in this surface.
    #[must_use]
    pub fn contains_face(&self, face: FaceId) -> bool {
        self.faces.contains_key(face)
    }

    /// The face registered with `handle`, if any.
    #[must_use]
    pub fn face_for_handle(&self, handle: &FaceHandle) -> Option<FaceId> {
        self.handles.get(&handle.id()).copied()
    }

    /// The vertex within the connection radius of `point`, if any.
    #[must_use]
    pub fn find_vertex(&self, point: &Point3) -> Option<VertexId> {
        let reach = self.connection_radius + EPSILON;
        let magnitude = Magnitude::of(point).0;
        let mut found = None;
        self.vertex_index.visit_range(
            &Magnitude(magnitude - reach),
            &Magnitude(magnitude + reach),
            |_, &id| {
                if found.is_some() {
                    return;
                }
                if let Some(vertex) = self.vertices.get(id) {
                    if (vertex.point - point).norm() < reach {
                        found = Some(id);
                    }
                }
            },
        );
        found
    }

    /// The edge joining `x` and `y`, if any.
    #[must_use]
    pub fn find_edge(&self, x: VertexId, y: VertexId) -> Option<EdgeId> {
        let vx = self.vertices.get(x)?;
        let vy = self.vertices.get(y)?;
        let scanned = if vx.edges.user_count() <= vy.edges.user_count() {
            vx
        } else {
            vy
        };
        scanned
            .edges
            .users()
            .find(|&edge| self.edges.get(edge).is_some_and(|e| e.joins(x, y)))
    }

    /// The face across edge slot `slot` of `face`: the first other face
    /// using that edge.
    #[must_use]
    pub fn neighbour(&self, face: FaceId, slot: usize) -> Option<FaceId> {
        let edge = *self.faces.get(face)?.edges.get(slot)?;
        self.edges.get(edge)?.faces.other_user(face)
    }

    /// The neighbours across each of the three edges of `face`.
    #[must_use]
    pub fn neighbours(&self, face: FaceId) -> [Option<FaceId>; 3] {
        std::array::from_fn(|slot| self.neighbour(face, slot))
    }

    /// The edge shared by `face` and `other`, if both exist and touch.
    #[must_use]
    pub fn shared_edge(&self, face: FaceId, other: FaceId) -> Option<EdgeId> {
        let face = self.faces.get(face)?;
        let other = self.faces.get(other)?;
        face.shared_edge(other)
    }

    // --- Accessors ---

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the surface.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, SurfaceError> {
        self.vertices
            .get(id)
            .ok_or(SurfaceError::EntityNotFound("vertex"))
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the surface.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, SurfaceError> {
        self.edges.get(id).ok_or(SurfaceError::EntityNotFound("edge"))
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the surface.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, SurfaceError> {
        self.faces.get(id).ok_or(SurfaceError::EntityNotFound("face"))
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Iterates over all edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Iterates over all faces.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    // --- Internals ---

    fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, SurfaceError> {
        self.vertices
            .get_mut(id)
            .ok_or(SurfaceError::EntityNotFound("vertex"))
    }

    fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, SurfaceError> {
        self.edges
            .get_mut(id)
            .ok_or(SurfaceError::EntityNotFound("edge"))
    }

    fn edge_ends(&self, id: EdgeId) -> Result<(EdgeId, VertexId, VertexId), SurfaceError> {
        let edge = self.edge(id)?;
        Ok((id, edge.a, edge.b))
    }

    fn find_or_create_vertex(&mut self, point: Point3) -> VertexId {
        if let Some(id) = self.find_vertex(&point) {
            return id;
        }
        let data = VertexData::new(point);
        let magnitude = data.magnitude;
        let id = self.vertices.insert(data);
        self.vertex_index.add(magnitude, id);
        id
    }

    fn find_or_create_edge(&mut self, x: VertexId, y: VertexId) -> Result<EdgeId, SurfaceError> {
        if let Some(edge) = self.find_edge(x, y) {
            return Ok(edge);
        }
        let edge = self.edges.insert(EdgeData::new(x, y));
        self.vertex_mut(x)?.edges.add_user(edge);
        self.vertex_mut(y)?.edges.add_user(edge);
        Ok(edge)
    }

    fn release_edge(&mut self, id: EdgeId, face: FaceId) -> Result<(), SurfaceError> {
        let edge = self.edge_mut(id)?;
        edge.faces.remove_user(face)?;
        if !edge.faces.is_unused() {
            return Ok(());
        }
        let (a, b) = (edge.a, edge.b);
        self.edges.remove(id);
        self.release_vertex(a, id)?;
        self.release_vertex(b, id)
    }

    fn release_vertex(&mut self, id: VertexId, edge: EdgeId) -> Result<(), SurfaceError> {
        let vertex = self.vertex_mut(id)?;
        vertex.edges.remove_user(edge)?;
        if !vertex.edges.is_unused() {
            return Ok(());
        }
        let magnitude = vertex.magnitude;
        self.vertices.remove(id);
        self.vertex_index.remove(&magnitude, &id);
        Ok(())
    }
}
