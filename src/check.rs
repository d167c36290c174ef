use crate::{error::Error, iterator, mesh::Mesh, topol::cycle_pairs};

impl Mesh {
    /// Verify the structural invariants of the mesh and return the first
    /// violation found.
    ///
    /// Checked are: every topological vertex has an attribute record and
    /// vice versa, attribute records never outlive their face or edge, both
    /// directions of every stored edge exist, no edge has both directions on
    /// the boundary, every halfedge face is a live face, and every face
    /// cycle is at least a triangle whose halfedges all point back at it.
    pub fn check(&self) -> Result<(), Error> {
        for v in self.topol.vertices() {
            if !self.vattr.has_row(v) {
                return Err(Error::MissingVertexAttributes(v));
            }
        }
        for (v, _) in self.vattr.rows() {
            if !self.topol.has_vertex(v) {
                return Err(Error::StrayVertexAttributes(v));
            }
        }
        for (f, _) in self.fattr.rows() {
            if !self.topol.has_face(f) {
                return Err(Error::StrayFaceAttributes(f));
            }
        }
        for ((u, v), _) in self.eattr.rows() {
            if !self.topol.has_edge(u, v) {
                return Err(Error::StrayEdgeAttributes(u, v));
            }
        }
        for u in self.topol.vertices() {
            let row = match self.topol.row(u) {
                Some(row) => row,
                None => continue,
            };
            for (v, target) in row {
                let reverse = self
                    .topol
                    .halfedge_target(*v, u)
                    .ok_or(Error::AsymmetricHalfedge(*v, u))?;
                if target.is_boundary() && reverse.is_boundary() {
                    return Err(Error::UnusedEdge(u, *v));
                }
                if let Some(f) = target.face() {
                    if !self.topol.has_face(f) {
                        return Err(Error::FaceNotFound(f));
                    }
                }
            }
        }
        for f in self.topol.faces() {
            let cycle = match self.topol.face_vertices(f) {
                Some(cycle) => cycle,
                None => continue,
            };
            if cycle.len() < 3 {
                return Err(Error::DegenerateFace(f));
            }
            for (a, b) in cycle_pairs(cycle) {
                if !self.topol.has_vertex(a) {
                    return Err(Error::VertexNotFound(a));
                }
                if self.topol.halfedge_target(a, b).and_then(|t| t.face()) != Some(f) {
                    return Err(Error::BrokenFaceCycle(f));
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    /// Check that every vertex has at most one outgoing boundary halfedge
    /// and that its incident faces form one contiguous fan.
    pub fn is_manifold(&self) -> bool {
        self.topol.vertices().all(|v| {
            let row = match self.topol.row(v) {
                Some(row) => row,
                None => return true,
            };
            if row.values().filter(|t| t.is_boundary()).count() > 1 {
                return false;
            }
            row.len() < 2 || iterator::vertex_neighbors_ordered(&self.topol, v).is_ok()
        })
    }

    /// Check that all vertices share one degree and all faces share one
    /// degree.
    pub fn is_regular(&self) -> bool {
        let mut vdegrees = self.topol.vertices().map(|v| self.topol.vertex_degree(v));
        let first = vdegrees.next();
        if let Some(first) = first {
            if !vdegrees.all(|d| d == first) {
                return false;
            }
        }
        let mut fdegrees = self.topol.faces().map(|f| self.topol.face_degree(f));
        let first = fdegrees.next();
        if let Some(first) = first {
            if !fdegrees.all(|d| d == first) {
                return false;
            }
        }
        true
    }

    pub fn is_trimesh(&self) -> bool {
        self.num_faces() > 0 && self.faces().all(|f| self.topol.face_degree(f) == Some(3))
    }

    pub fn is_quadmesh(&self) -> bool {
        self.num_faces() > 0 && self.faces().all(|f| self.topol.face_degree(f) == Some(4))
    }

    /// The Euler characteristic `V - E + F`, counting only vertices with at
    /// least one incident edge.
    pub fn euler(&self) -> i64 {
        let v = self
            .topol
            .vertices()
            .filter(|v| self.topol.vertex_degree(*v).unwrap_or(0) > 0)
            .count() as i64;
        let e = self.num_edges() as i64;
        let f = self.num_faces() as i64;
        v - e + f
    }

    /// Whether the faces can be oriented consistently.
    ///
    /// Not implemented; callers get an explicit error instead of a guessed
    /// answer. `genus` depends on this and fails the same way.
    pub fn is_orientable(&self) -> Result<bool, Error> {
        Err(Error::Unsupported("is_orientable"))
    }

    /// The number of handles of the surface, derived from the Euler
    /// characteristic and the boundary loop count. Fails until
    /// `is_orientable` is implemented.
    pub fn genus(&self) -> Result<i64, Error> {
        let orientable = self.is_orientable()?;
        let x = self.euler();
        let b = self.vertices_on_boundaries()?.len() as i64;
        Ok(if orientable {
            (2 - b - x) / 2
        } else {
            2 - b - x
        })
    }
}
