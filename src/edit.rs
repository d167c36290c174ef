use crate::{
    element::{FK, VK},
    error::Error,
    mesh::Mesh,
};

impl Mesh {
    /// Delete a vertex and everything hanging off it: every incident face,
    /// every edge left without a face on either side, and the attribute
    /// records of all of them. The key watermark is not lowered; the key
    /// will not be reused.
    pub fn delete_vertex(&mut self, v: VK) -> Result<(), Error> {
        let (faces, edges) = self.topol.delete_vertex(v)?;
        for f in faces {
            self.fattr.drop_row(f);
        }
        for (a, b) in edges {
            self.eattr.drop_row((a, b));
            self.eattr.drop_row((b, a));
        }
        self.vattr.drop_row(v);
        Ok(())
    }

    /// Delete a face. Its halfedges become boundary entries; an edge whose
    /// other direction was already on the boundary is removed entirely,
    /// together with its attributes.
    pub fn delete_face(&mut self, f: FK) -> Result<(), Error> {
        let edges = self.topol.delete_face(f)?;
        for (a, b) in edges {
            self.eattr.drop_row((a, b));
            self.eattr.drop_row((b, a));
        }
        self.fattr.drop_row(f);
        Ok(())
    }

    /// Split a face into a triangle fan around a new vertex.
    ///
    /// One triangle `(u, v, w)` is added per halfedge `(u, v)` of the
    /// original boundary cycle, where `w` is the inserted vertex. The
    /// original face record is removed without the boundary-zeroing cascade
    /// of [`delete_face`], since all of its halfedges are immediately
    /// claimed by the fan. The new vertex sits at `point`, or at the face
    /// centroid when no point is given.
    ///
    /// Returns the inserted vertex and the fan faces.
    pub fn insert_vertex(
        &mut self,
        f: FK,
        key: Option<VK>,
        point: Option<glam::DVec3>,
    ) -> Result<(VK, Vec<FK>), Error> {
        let cycle = self.face_vertices(f)?.to_vec();
        let point = match point {
            Some(p) => p,
            None => self.face_centroid(f)?,
        };
        self.topol.remove_face_entry(f);
        self.fattr.drop_row(f);
        let w = self.add_vertex_at(key, point);
        let mut fan = Vec::with_capacity(cycle.len());
        for (i, u) in cycle.iter().enumerate() {
            let v = cycle[(i + 1) % cycle.len()];
            if let Some(nf) = self.add_face(&[*u, v, w], None)? {
                fan.push(nf);
            }
        }
        Ok((w, fan))
    }

    /// Remove every vertex with an empty adjacency row, along with its
    /// attribute record.
    pub fn cull_vertices(&mut self) -> Vec<VK> {
        let culled = self.topol.cull_vertices();
        for v in &culled {
            self.vattr.drop_row(*v);
        }
        culled
    }
}

#[cfg(test)]
mod test {
    use crate::{element::VK, error::Error, mesh::Mesh};
    use serde_json::json;

    /*
           6----------7----------8
           |          |          |
           |    f2    |    f3    |
           |          |          |
           3----------4----------5
           |          |          |
           |    f0    |    f1    |
           |          |          |
           0----------1----------2
    */
    fn grid() -> Mesh {
        let mut points = Vec::new();
        for j in 0..3 {
            for i in 0..3 {
                points.push(glam::dvec3(i as f64, j as f64, 0.0));
            }
        }
        Mesh::from_vertices_and_faces(
            &points,
            &[
                vec![0, 1, 4, 3],
                vec![1, 2, 5, 4],
                vec![3, 4, 7, 6],
                vec![4, 5, 8, 7],
            ],
        )
        .unwrap()
    }

    #[test]
    fn t_delete_face() {
        let mut mesh = grid();
        mesh.set_edge_attribute((1.into(), 2.into()), "q", json!(2.0))
            .unwrap();
        mesh.delete_face(1.into()).unwrap();
        assert_eq!(mesh.num_faces(), 3);
        // The rim edges of the deleted face are gone with their attributes.
        assert!(!mesh.has_edge(1.into(), 2.into()));
        assert!(!mesh.has_edge(2.into(), 5.into()));
        // Edges shared with surviving faces remain.
        assert!(mesh.has_edge(1.into(), 4.into()));
        assert!(mesh.has_edge(4.into(), 5.into()));
        // Vertex 2 lost all incident edges but is still registered.
        assert_eq!(mesh.vertex_degree(2.into()), Ok(0));
        assert_eq!(
            mesh.delete_face(1.into()),
            Err(Error::FaceNotFound(1.into()))
        );
    }

    #[test]
    fn t_delete_vertex_cascade() {
        let mut mesh = grid();
        mesh.delete_vertex(4.into()).unwrap();
        // The center vertex touches every face.
        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_edges(), 0);
        assert!(mesh.vertex_attribute(4.into(), "x").is_err());
        // The watermark still covers the deleted key; new keys move on.
        assert_eq!(mesh.add_vertex(None), VK::from(9));
    }

    #[test]
    fn t_delete_vertex_boundary() {
        let mut mesh = grid();
        mesh.delete_vertex(0.into()).unwrap();
        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.num_vertices(), 8);
        // Only the corner face went away; its far edges survive on their
        // neighbor faces.
        assert!(!mesh.has_edge(0.into(), 1.into()));
        assert!(!mesh.has_edge(0.into(), 3.into()));
        assert!(mesh.has_edge(1.into(), 4.into()));
        assert!(mesh.has_edge(3.into(), 4.into()));
    }

    #[test]
    fn t_insert_vertex_fan() {
        let mut mesh = grid();
        let (w, fan) = mesh.insert_vertex(0.into(), None, None).unwrap();
        assert_eq!(w, VK::from(9));
        assert_eq!(fan.len(), 4);
        assert_eq!(mesh.num_faces(), 7);
        assert_eq!(mesh.num_vertices(), 10);
        // The new vertex sits at the centroid of the old quad.
        assert_eq!(mesh.vertex_point(w).unwrap(), glam::dvec3(0.5, 0.5, 0.0));
        // Every fan triangle closes on the inserted vertex.
        for f in &fan {
            let cycle = mesh.face_vertices(*f).unwrap();
            assert_eq!(cycle.len(), 3);
            assert_eq!(cycle[2], w);
        }
        assert_eq!(mesh.vertex_degree(w), Ok(4));
        // The old boundary cycle is fully reclaimed; no halfedge still
        // points at the removed face.
        assert!(mesh.is_valid());
    }

    #[test]
    fn t_insert_vertex_explicit_point() {
        let mut mesh = grid();
        let (w, _) = mesh
            .insert_vertex(3.into(), Some(20.into()), Some(glam::dvec3(1.5, 1.5, 1.0)))
            .unwrap();
        assert_eq!(w, VK::from(20));
        assert_eq!(mesh.vertex_point(w).unwrap(), glam::dvec3(1.5, 1.5, 1.0));
        assert_eq!(mesh.add_vertex(None), VK::from(21));
    }

    #[test]
    fn t_cull_vertices() {
        let mut mesh = grid();
        mesh.delete_face(1.into()).unwrap();
        // Vertex 2 is disconnected now, but still present.
        assert_eq!(mesh.vertex_degree(2.into()), Ok(0));
        let culled = mesh.cull_vertices();
        assert_eq!(culled, vec![VK::from(2)]);
        assert!(mesh.vertex_attribute(2.into(), "x").is_err());
        assert_eq!(mesh.num_vertices(), 8);
    }
}
