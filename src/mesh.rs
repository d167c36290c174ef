use crate::{
    attr::{AttrStore, AttrValue},
    element::{FK, HalfedgeTarget, Key, VK},
    error::Error,
    iterator,
    key::KeyGen,
    topol::{Topology, normalize_cycle},
};
use std::collections::BTreeMap;

/**
 * A polygon mesh over a halfedge adjacency store, with a layered attribute
 * dictionary on every vertex, face and edge.
 *
 * Vertices and faces are addressed by sparse integer keys ([`VK`], [`FK`])
 * that survive deletions: the allocator only moves forward, so a key freed
 * by a delete is never handed out again. Edges are derived from the halfedge
 * store and addressed by vertex pairs.
 *
 * The mesh is a plain in-memory value with no interior locking. Mutations
 * are not safe against concurrent access to the same instance; clone the
 * mesh (a full deep copy of all stores) to hand independent state to another
 * task.
 */
#[derive(Clone, Debug)]
pub struct Mesh {
    pub(crate) topol: Topology,
    pub(crate) attributes: BTreeMap<String, AttrValue>,
    pub(crate) vattr: AttrStore<VK>,
    pub(crate) eattr: AttrStore<(VK, VK)>,
    pub(crate) fattr: AttrStore<FK>,
    pub(crate) vkeys: KeyGen,
    pub(crate) fkeys: KeyGen,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert("name".to_string(), AttrValue::from("Mesh"));
        Mesh {
            topol: Topology::new(),
            attributes,
            vattr: AttrStore::with_defaults([
                ("x".to_string(), AttrValue::from(0.0)),
                ("y".to_string(), AttrValue::from(0.0)),
                ("z".to_string(), AttrValue::from(0.0)),
            ]),
            eattr: AttrStore::new(),
            fattr: AttrStore::new(),
            vkeys: KeyGen::default(),
            fkeys: KeyGen::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.attributes
            .get("name")
            .and_then(|value| value.as_str())
            .unwrap_or("Mesh")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.attributes
            .insert("name".to_string(), AttrValue::from(name.into()));
    }

    // ------------------------------------------------------------------
    // Counts and key queries.
    // ------------------------------------------------------------------

    pub fn num_vertices(&self) -> usize {
        self.topol.num_vertices()
    }

    pub fn num_edges(&self) -> usize {
        self.topol.num_edges()
    }

    pub fn num_faces(&self) -> usize {
        self.topol.num_faces()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VK> + '_ {
        self.topol.vertices()
    }

    pub fn faces(&self) -> impl Iterator<Item = FK> + '_ {
        self.topol.faces()
    }

    /// Every undirected edge once, smaller key first.
    pub fn edges(&self) -> impl Iterator<Item = (VK, VK)> + '_ {
        self.topol.edges()
    }

    pub fn has_vertex(&self, v: VK) -> bool {
        self.topol.has_vertex(v)
    }

    pub fn has_face(&self, f: FK) -> bool {
        self.topol.has_face(f)
    }

    pub fn has_edge(&self, u: VK, v: VK) -> bool {
        self.topol.has_edge(u, v)
    }

    pub fn has_halfedge(&self, u: VK, v: VK) -> bool {
        self.topol.has_halfedge(u, v)
    }

    /// The highest vertex key ever assigned, if any.
    pub fn max_vertex_key(&self) -> Option<VK> {
        self.vkeys.watermark().map(VK::from)
    }

    /// The highest face key ever assigned, if any.
    pub fn max_face_key(&self) -> Option<FK> {
        self.fkeys.watermark().map(FK::from)
    }

    // ------------------------------------------------------------------
    // Construction.
    // ------------------------------------------------------------------

    /// Add a vertex. Without a key the next free key is allocated; with one,
    /// the allocator watermark is raised to cover it. Re-adding an existing
    /// key is a topological no-op.
    pub fn add_vertex(&mut self, key: Option<VK>) -> VK {
        let v = match key {
            Some(v) => {
                self.vkeys.claim(v.id());
                v
            }
            None => VK::from(self.vkeys.next()),
        };
        if self.topol.add_vertex(v) {
            self.vattr.ensure_row(v);
        }
        v
    }

    /// Add a vertex and set attributes on it. On an existing vertex the
    /// attributes are merged over whatever is already there.
    pub fn add_vertex_with<I>(&mut self, key: Option<VK>, attrs: I) -> VK
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        let v = self.add_vertex(key);
        self.vattr.merge_row(v, attrs);
        v
    }

    /// Add a face over existing vertices.
    ///
    /// The vertex cycle is normalized first: a duplicated closing vertex is
    /// dropped and consecutive duplicates are collapsed. If fewer than 3
    /// vertices remain this is a silent no-op returning `Ok(None)`; callers
    /// must check the returned key. Unknown vertices and an already used
    /// face key are errors.
    pub fn add_face(&mut self, vertices: &[VK], key: Option<FK>) -> Result<Option<FK>, Error> {
        let cycle = normalize_cycle(vertices);
        if cycle.len() < 3 {
            return Ok(None);
        }
        for v in &cycle {
            if !self.topol.has_vertex(*v) {
                return Err(Error::VertexNotFound(*v));
            }
        }
        let f = match key {
            Some(f) => {
                if self.topol.has_face(f) {
                    return Err(Error::FaceExists(f));
                }
                self.fkeys.claim(f.id());
                f
            }
            None => FK::from(self.fkeys.next()),
        };
        self.topol.add_face(f, cycle);
        Ok(Some(f))
    }

    /// Add a face and set attributes on it.
    pub fn add_face_with<I>(
        &mut self,
        vertices: &[VK],
        key: Option<FK>,
        attrs: I,
    ) -> Result<Option<FK>, Error>
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        let f = self.add_face(vertices, key)?;
        if let Some(f) = f {
            self.fattr.merge_row(f, attrs);
        }
        Ok(f)
    }

    /// Build a mesh from a list of positions and a list of vertex index
    /// cycles. This is the normalized entry point every format reader and
    /// shape generator funnels through; vertices receive keys `0..n` in
    /// order.
    pub fn from_vertices_and_faces(
        vertices: &[glam::DVec3],
        faces: &[Vec<u32>],
    ) -> Result<Self, Error> {
        let mut mesh = Mesh::new();
        for p in vertices {
            mesh.add_vertex_at(None, *p);
        }
        for fvs in faces {
            let cycle: Vec<VK> = fvs.iter().map(VK::from).collect();
            mesh.add_face(&cycle, None)?;
        }
        Ok(mesh)
    }

    /// Export to a position list and dense index cycles. Sparse keys are
    /// reindexed in key order; the inverse of `from_vertices_and_faces` up
    /// to renumbering.
    pub fn to_vertices_and_faces(&self) -> Result<(Vec<glam::DVec3>, Vec<Vec<u32>>), Error> {
        let index: BTreeMap<VK, u32> = self
            .vertices()
            .enumerate()
            .map(|(i, v)| (v, i as u32))
            .collect();
        let mut points = Vec::with_capacity(index.len());
        for v in self.vertices() {
            points.push(self.vertex_point(v)?);
        }
        let mut faces = Vec::with_capacity(self.num_faces());
        for f in self.faces() {
            let cycle = self.face_vertices(f)?;
            faces.push(cycle.iter().map(|v| index[v]).collect());
        }
        Ok((points, faces))
    }

    /// Drop all vertices, faces, attributes and reset the key watermarks.
    pub fn clear(&mut self) {
        self.topol.clear();
        self.vattr.clear();
        self.eattr.clear();
        self.fattr.clear();
        self.vkeys = KeyGen::default();
        self.fkeys = KeyGen::default();
    }

    // ------------------------------------------------------------------
    // Topological queries.
    // ------------------------------------------------------------------

    pub fn vertex_degree(&self, v: VK) -> Result<usize, Error> {
        self.topol
            .vertex_degree(v)
            .ok_or(Error::VertexNotFound(v))
    }

    pub fn face_degree(&self, f: FK) -> Result<usize, Error> {
        self.topol.face_degree(f).ok_or(Error::FaceNotFound(f))
    }

    /// The ordered vertex cycle of a face.
    pub fn face_vertices(&self, f: FK) -> Result<&[VK], Error> {
        self.topol.face_vertices(f).ok_or(Error::FaceNotFound(f))
    }

    pub fn face_halfedges(&self, f: FK) -> Result<Vec<(VK, VK)>, Error> {
        iterator::face_halfedges(&self.topol, f)
    }

    pub fn face_neighbors(&self, f: FK) -> Result<Vec<FK>, Error> {
        iterator::face_neighbors(&self.topol, f)
    }

    pub fn face_vertex_descendant(&self, f: FK, v: VK) -> Result<VK, Error> {
        self.topol.face_vertex_descendant(f, v)
    }

    pub fn face_vertex_ancestor(&self, f: FK, v: VK) -> Result<VK, Error> {
        self.topol.face_vertex_ancestor(f, v)
    }

    pub fn vertex_neighbors(&self, v: VK) -> Result<Vec<VK>, Error> {
        iterator::vertex_neighbors(&self.topol, v)
    }

    /// Neighbors in fan order; see the traversal notes on the crate root.
    pub fn vertex_neighbors_ordered(&self, v: VK) -> Result<Vec<VK>, Error> {
        iterator::vertex_neighbors_ordered(&self.topol, v)
    }

    pub fn vertex_faces(&self, v: VK) -> Result<Vec<FK>, Error> {
        iterator::vertex_faces(&self.topol, v)
    }

    pub fn vertex_faces_ordered(&self, v: VK) -> Result<Vec<FK>, Error> {
        iterator::vertex_faces_ordered(&self.topol, v)
    }

    /// The face bounded by the directed halfedge `u -> v`, or `None` when
    /// that direction lies on the boundary.
    pub fn halfedge_face(&self, u: VK, v: VK) -> Result<Option<FK>, Error> {
        self.topol
            .halfedge_target(u, v)
            .map(HalfedgeTarget::face)
            .ok_or(Error::HalfedgeNotFound(u, v))
    }

    // ------------------------------------------------------------------
    // Vertex attributes.
    // ------------------------------------------------------------------

    fn want_vertex(&self, v: VK) -> Result<(), Error> {
        if self.topol.has_vertex(v) {
            Ok(())
        } else {
            Err(Error::VertexNotFound(v))
        }
    }

    fn want_face(&self, f: FK) -> Result<(), Error> {
        if self.topol.has_face(f) {
            Ok(())
        } else {
            Err(Error::FaceNotFound(f))
        }
    }

    fn want_edge(&self, u: VK, v: VK) -> Result<(), Error> {
        if self.topol.has_edge(u, v) {
            Ok(())
        } else {
            Err(Error::EdgeNotFound(u, v))
        }
    }

    /// Read one vertex attribute; the override if set, else the default,
    /// else `None`.
    pub fn vertex_attribute(&self, v: VK, name: &str) -> Result<Option<AttrValue>, Error> {
        self.want_vertex(v)?;
        Ok(self.vattr.get(v, name))
    }

    pub fn set_vertex_attribute(
        &mut self,
        v: VK,
        name: impl Into<String>,
        value: AttrValue,
    ) -> Result<(), Error> {
        self.want_vertex(v)?;
        self.vattr.set(v, name, value);
        Ok(())
    }

    /// Remove the override; later reads fall back to the default.
    pub fn unset_vertex_attribute(&mut self, v: VK, name: &str) -> Result<(), Error> {
        self.want_vertex(v)?;
        self.vattr.unset(v, name);
        Ok(())
    }

    /// The merged view over the default attribute names.
    pub fn vertex_attributes(&self, v: VK) -> Result<BTreeMap<String, AttrValue>, Error> {
        self.want_vertex(v)?;
        Ok(self.vattr.merged(v))
    }

    /// Only the overrides explicitly set on this vertex.
    pub fn custom_vertex_attributes(&self, v: VK) -> Result<BTreeMap<String, AttrValue>, Error> {
        self.want_vertex(v)?;
        Ok(self.vattr.custom(v))
    }

    pub fn set_vertex_attributes<I>(&mut self, v: VK, attrs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        self.want_vertex(v)?;
        self.vattr.merge_row(v, attrs);
        Ok(())
    }

    pub fn default_vertex_attributes(&self) -> &BTreeMap<String, AttrValue> {
        self.vattr.defaults()
    }

    pub fn update_default_vertex_attributes<I>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        self.vattr.update_defaults(attrs);
    }

    // ------------------------------------------------------------------
    // Face attributes.
    // ------------------------------------------------------------------

    pub fn face_attribute(&self, f: FK, name: &str) -> Result<Option<AttrValue>, Error> {
        self.want_face(f)?;
        Ok(self.fattr.get(f, name))
    }

    pub fn set_face_attribute(
        &mut self,
        f: FK,
        name: impl Into<String>,
        value: AttrValue,
    ) -> Result<(), Error> {
        self.want_face(f)?;
        self.fattr.set(f, name, value);
        Ok(())
    }

    pub fn unset_face_attribute(&mut self, f: FK, name: &str) -> Result<(), Error> {
        self.want_face(f)?;
        self.fattr.unset(f, name);
        Ok(())
    }

    pub fn face_attributes(&self, f: FK) -> Result<BTreeMap<String, AttrValue>, Error> {
        self.want_face(f)?;
        Ok(self.fattr.merged(f))
    }

    pub fn custom_face_attributes(&self, f: FK) -> Result<BTreeMap<String, AttrValue>, Error> {
        self.want_face(f)?;
        Ok(self.fattr.custom(f))
    }

    pub fn set_face_attributes<I>(&mut self, f: FK, attrs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        self.want_face(f)?;
        self.fattr.merge_row(f, attrs);
        Ok(())
    }

    pub fn default_face_attributes(&self) -> &BTreeMap<String, AttrValue> {
        self.fattr.defaults()
    }

    pub fn update_default_face_attributes<I>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        self.fattr.update_defaults(attrs);
    }

    // ------------------------------------------------------------------
    // Edge attributes. Stored under both directions so retrieval does not
    // depend on the direction the caller happens to hold.
    // ------------------------------------------------------------------

    pub fn edge_attribute(&self, edge: (VK, VK), name: &str) -> Result<Option<AttrValue>, Error> {
        let (u, v) = edge;
        self.want_edge(u, v)?;
        Ok(self
            .eattr
            .get_custom((u, v), name)
            .or_else(|| self.eattr.get_custom((v, u), name))
            .or_else(|| self.eattr.defaults().get(name).cloned()))
    }

    pub fn set_edge_attribute(
        &mut self,
        edge: (VK, VK),
        name: impl Into<String>,
        value: AttrValue,
    ) -> Result<(), Error> {
        let (u, v) = edge;
        self.want_edge(u, v)?;
        let name = name.into();
        self.eattr.set((u, v), name.clone(), value.clone());
        self.eattr.set((v, u), name, value);
        Ok(())
    }

    pub fn unset_edge_attribute(&mut self, edge: (VK, VK), name: &str) -> Result<(), Error> {
        let (u, v) = edge;
        self.want_edge(u, v)?;
        self.eattr.unset((u, v), name);
        self.eattr.unset((v, u), name);
        Ok(())
    }

    pub fn edge_attributes(&self, edge: (VK, VK)) -> Result<BTreeMap<String, AttrValue>, Error> {
        let (u, v) = edge;
        self.want_edge(u, v)?;
        let mut merged = self.eattr.defaults().clone();
        for (name, value) in self.eattr.custom((v, u)) {
            if merged.contains_key(&name) {
                merged.insert(name, value);
            }
        }
        for (name, value) in self.eattr.custom((u, v)) {
            if merged.contains_key(&name) {
                merged.insert(name, value);
            }
        }
        Ok(merged)
    }

    pub fn custom_edge_attributes(
        &self,
        edge: (VK, VK),
    ) -> Result<BTreeMap<String, AttrValue>, Error> {
        let (u, v) = edge;
        self.want_edge(u, v)?;
        let mut custom = self.eattr.custom((v, u));
        custom.extend(self.eattr.custom((u, v)));
        Ok(custom)
    }

    pub fn set_edge_attributes<I>(&mut self, edge: (VK, VK), attrs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        let (u, v) = edge;
        self.want_edge(u, v)?;
        for (name, value) in attrs {
            self.eattr.set((u, v), name.clone(), value.clone());
            self.eattr.set((v, u), name, value);
        }
        Ok(())
    }

    pub fn default_edge_attributes(&self) -> &BTreeMap<String, AttrValue> {
        self.eattr.defaults()
    }

    pub fn update_default_edge_attributes<I>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        self.eattr.update_defaults(attrs);
    }
}
