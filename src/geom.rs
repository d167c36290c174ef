use crate::{
    element::{FK, VK},
    error::Error,
    mesh::Mesh,
    topol::cycle_pairs,
};
use glam::{DVec3, dvec3};

impl Mesh {
    /// The position of a vertex, read from its `x`/`y`/`z` attributes.
    /// Coordinates missing from both the overrides and the defaults read as
    /// zero.
    pub fn vertex_point(&self, v: VK) -> Result<DVec3, Error> {
        if !self.topol.has_vertex(v) {
            return Err(Error::VertexNotFound(v));
        }
        let coord = |name: &str| {
            self.vattr
                .get(v, name)
                .and_then(|value| value.as_f64())
                .unwrap_or(0.0)
        };
        Ok(dvec3(coord("x"), coord("y"), coord("z")))
    }

    pub fn set_vertex_point(&mut self, v: VK, point: DVec3) -> Result<(), Error> {
        if !self.topol.has_vertex(v) {
            return Err(Error::VertexNotFound(v));
        }
        self.vattr.set(v, "x", point.x.into());
        self.vattr.set(v, "y", point.y.into());
        self.vattr.set(v, "z", point.z.into());
        Ok(())
    }

    /// Add a vertex at a position; shorthand for `add_vertex` plus writing
    /// the coordinate attributes.
    pub fn add_vertex_at(&mut self, key: Option<VK>, point: DVec3) -> VK {
        let v = self.add_vertex(key);
        self.vattr.set(v, "x", point.x.into());
        self.vattr.set(v, "y", point.y.into());
        self.vattr.set(v, "z", point.z.into());
        v
    }

    /// The centroid of all vertex positions; zero for an empty mesh.
    pub fn centroid(&self) -> Result<DVec3, Error> {
        let mut sum = DVec3::ZERO;
        let mut count = 0usize;
        for v in self.vertices() {
            sum += self.vertex_point(v)?;
            count += 1;
        }
        Ok(if count == 0 {
            DVec3::ZERO
        } else {
            sum / count as f64
        })
    }

    pub fn edge_vector(&self, edge: (VK, VK)) -> Result<DVec3, Error> {
        let (u, v) = edge;
        if !self.topol.has_edge(u, v) {
            return Err(Error::EdgeNotFound(u, v));
        }
        Ok(self.vertex_point(v)? - self.vertex_point(u)?)
    }

    pub fn edge_length(&self, edge: (VK, VK)) -> Result<f64, Error> {
        Ok(self.edge_vector(edge)?.length())
    }

    pub fn edge_midpoint(&self, edge: (VK, VK)) -> Result<DVec3, Error> {
        let (u, v) = edge;
        if !self.topol.has_edge(u, v) {
            return Err(Error::EdgeNotFound(u, v));
        }
        Ok((self.vertex_point(u)? + self.vertex_point(v)?) * 0.5)
    }

    pub fn face_centroid(&self, f: FK) -> Result<DVec3, Error> {
        let cycle = self.face_vertices(f)?.to_vec();
        let mut sum = DVec3::ZERO;
        for v in &cycle {
            sum += self.vertex_point(*v)?;
        }
        Ok(sum / cycle.len() as f64)
    }

    // Newell's method; the result's length is twice the face area and its
    // direction follows the cycle orientation.
    fn face_newell(&self, f: FK) -> Result<DVec3, Error> {
        let cycle = self.face_vertices(f)?.to_vec();
        let mut n = DVec3::ZERO;
        for (u, v) in cycle_pairs(&cycle) {
            let pc = self.vertex_point(u)?;
            let pn = self.vertex_point(v)?;
            let a = pc - pn;
            let b = pc + pn;
            n += dvec3(a.y * b.z, a.z * b.x, a.x * b.y);
        }
        Ok(n)
    }

    /// The unit normal of a face, zero when the face is degenerate.
    pub fn face_normal(&self, f: FK) -> Result<DVec3, Error> {
        Ok(self.face_newell(f)?.normalize_or_zero())
    }

    pub fn face_area(&self, f: FK) -> Result<f64, Error> {
        Ok(self.face_newell(f)?.length() * 0.5)
    }

    /// The total surface area.
    pub fn area(&self) -> Result<f64, Error> {
        let mut area = 0.0;
        for f in self.faces() {
            area += self.face_area(f)?;
        }
        Ok(area)
    }

    /// The centroid of the neighbors of a vertex; the vertex's own position
    /// when it has no neighbors.
    pub fn vertex_centroid(&self, v: VK) -> Result<DVec3, Error> {
        let nbrs = self.vertex_neighbors(v)?;
        if nbrs.is_empty() {
            return self.vertex_point(v);
        }
        let mut sum = DVec3::ZERO;
        for n in &nbrs {
            sum += self.vertex_point(*n)?;
        }
        Ok(sum / nbrs.len() as f64)
    }

    /// The unit normal at a vertex: the normalized sum of the incident face
    /// normal vectors, zero when no faces are incident.
    pub fn vertex_normal(&self, v: VK) -> Result<DVec3, Error> {
        let mut sum = DVec3::ZERO;
        for f in self.vertex_faces(v)? {
            // Not normalized per face, so larger faces weigh more.
            sum += self.face_newell(f)?;
        }
        Ok(sum.normalize_or_zero())
    }

    /// The tributary area of a vertex: a quarter of the summed cross
    /// products spanned towards the incident face centroids, which
    /// partitions the total area of the mesh over its vertices.
    pub fn vertex_area(&self, v: VK) -> Result<f64, Error> {
        let p0 = self.vertex_point(v)?;
        let nbrs = self.vertex_neighbors(v)?;
        let mut area = 0.0;
        for n in nbrs {
            let spoke = self.vertex_point(n)? - p0;
            if let Some(f) = self.topol.halfedge_target(v, n).and_then(|t| t.face()) {
                let c = self.face_centroid(f)?;
                area += spoke.cross(c - p0).length();
            }
            if let Some(f) = self.topol.halfedge_target(n, v).and_then(|t| t.face()) {
                let c = self.face_centroid(f)?;
                area += spoke.cross(c - p0).length();
            }
        }
        Ok(0.25 * area)
    }
}

#[cfg(test)]
mod test {
    use crate::{macros::assert_f64_eq, mesh::Mesh};
    use glam::dvec3;

    fn unit_square() -> Mesh {
        Mesh::from_vertices_and_faces(
            &[
                dvec3(0.0, 0.0, 0.0),
                dvec3(1.0, 0.0, 0.0),
                dvec3(1.0, 1.0, 0.0),
                dvec3(0.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn t_vertex_point_round_trip() {
        let mut mesh = Mesh::new();
        let v = mesh.add_vertex_at(None, dvec3(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertex_point(v), Ok(dvec3(1.0, 2.0, 3.0)));
        mesh.set_vertex_point(v, dvec3(-1.0, 0.0, 0.5)).unwrap();
        assert_eq!(mesh.vertex_point(v), Ok(dvec3(-1.0, 0.0, 0.5)));
        // Unset coordinates fall back to the default, which is zero.
        let w = mesh.add_vertex(None);
        assert_eq!(mesh.vertex_point(w), Ok(dvec3(0.0, 0.0, 0.0)));
        assert!(mesh.vertex_point(9.into()).is_err());
    }

    #[test]
    fn t_face_measures() {
        let mesh = unit_square();
        assert_eq!(mesh.face_centroid(0.into()), Ok(dvec3(0.5, 0.5, 0.0)));
        assert_eq!(mesh.face_normal(0.into()), Ok(dvec3(0.0, 0.0, 1.0)));
        assert_f64_eq!(mesh.face_area(0.into()).unwrap(), 1.0);
        assert_f64_eq!(mesh.area().unwrap(), 1.0);
    }

    #[test]
    fn t_edge_measures() {
        let mesh = unit_square();
        let e = (0.into(), 1.into());
        assert_eq!(mesh.edge_vector(e), Ok(dvec3(1.0, 0.0, 0.0)));
        assert_f64_eq!(mesh.edge_length(e).unwrap(), 1.0);
        assert_eq!(mesh.edge_midpoint(e), Ok(dvec3(0.5, 0.0, 0.0)));
        // Direction flips the vector but not the midpoint.
        assert_eq!(
            mesh.edge_vector((1.into(), 0.into())),
            Ok(dvec3(-1.0, 0.0, 0.0))
        );
        assert!(mesh.edge_vector((0.into(), 2.into())).is_err());
    }

    #[test]
    fn t_centroid() {
        let mesh = unit_square();
        assert_eq!(mesh.centroid(), Ok(dvec3(0.5, 0.5, 0.0)));
        assert_eq!(Mesh::new().centroid(), Ok(dvec3(0.0, 0.0, 0.0)));
    }

    #[test]
    fn t_vertex_measures() {
        let mesh = unit_square();
        // Each corner of a lone square claims a quarter of its area.
        for v in mesh.vertices().collect::<Vec<_>>() {
            assert_f64_eq!(mesh.vertex_area(v).unwrap(), 0.25);
            assert_eq!(mesh.vertex_normal(v), Ok(dvec3(0.0, 0.0, 1.0)));
        }
        assert_eq!(
            mesh.vertex_centroid(0.into()),
            Ok(dvec3(0.5, 0.5, 0.0)) // neighbors 1 and 3
        );
    }
}
