use crate::{
    element::{FK, HalfedgeTarget, VK},
    error::Error,
};
use std::collections::BTreeMap;

/// Consecutive pairs of a face cycle, wrapping around at the end.
pub(crate) fn cycle_pairs(cycle: &[VK]) -> impl Iterator<Item = (VK, VK)> + '_ {
    cycle
        .iter()
        .zip(cycle.iter().cycle().skip(1))
        .map(|(u, v)| (*u, *v))
}

/// Normalize a candidate face cycle: drop a duplicated closing vertex and
/// collapse runs of consecutive duplicates. The result may be shorter than 3
/// vertices; the caller decides what to do with that.
pub(crate) fn normalize_cycle(vertices: &[VK]) -> Vec<VK> {
    let mut cycle: Vec<VK> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if cycle.last() != Some(v) {
            cycle.push(*v);
        }
    }
    while cycle.len() > 1 && cycle.first() == cycle.last() {
        cycle.pop();
    }
    cycle
}

/**
 * The adjacency structure of the mesh.
 *
 * Every vertex owns a row mapping each incident neighbor to the target of the
 * directed halfedge towards it. Faces store their boundary cycle as an
 * ordered vertex list (cyclic, first != last). Edges are derived: an
 * undirected pair exists exactly when both directed entries are stored, and
 * at least one of the two carries a face.
 *
 * Ordered maps keep every traversal deterministic in key order.
 */
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Topology {
    halfedge: BTreeMap<VK, BTreeMap<VK, HalfedgeTarget>>,
    face: BTreeMap<FK, Vec<VK>>,
}

impl Topology {
    pub fn new() -> Self {
        Topology {
            halfedge: BTreeMap::new(),
            face: BTreeMap::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.halfedge.len()
    }

    pub fn num_faces(&self) -> usize {
        self.face.len()
    }

    pub fn has_vertex(&self, v: VK) -> bool {
        self.halfedge.contains_key(&v)
    }

    pub fn has_face(&self, f: FK) -> bool {
        self.face.contains_key(&f)
    }

    pub fn has_halfedge(&self, u: VK, v: VK) -> bool {
        self.halfedge
            .get(&u)
            .is_some_and(|row| row.contains_key(&v))
    }

    /// Check if the undirected edge exists, in either direction.
    pub fn has_edge(&self, u: VK, v: VK) -> bool {
        self.has_halfedge(u, v) || self.has_halfedge(v, u)
    }

    pub fn vertices(&self) -> impl Iterator<Item = VK> + '_ {
        self.halfedge.keys().copied()
    }

    pub fn faces(&self) -> impl Iterator<Item = FK> + '_ {
        self.face.keys().copied()
    }

    pub fn row(&self, v: VK) -> Option<&BTreeMap<VK, HalfedgeTarget>> {
        self.halfedge.get(&v)
    }

    pub fn halfedge_target(&self, u: VK, v: VK) -> Option<HalfedgeTarget> {
        self.halfedge.get(&u).and_then(|row| row.get(&v)).copied()
    }

    /// Write a single directed entry. Bypasses all bookkeeping; exists for
    /// validation tests that need to construct broken stores.
    #[cfg(test)]
    pub fn set_halfedge(&mut self, u: VK, v: VK, target: HalfedgeTarget) {
        self.halfedge.entry(u).or_default().insert(v, target);
    }

    pub fn face_vertices(&self, f: FK) -> Option<&[VK]> {
        self.face.get(&f).map(|cycle| cycle.as_slice())
    }

    pub fn vertex_degree(&self, v: VK) -> Option<usize> {
        self.halfedge.get(&v).map(|row| row.len())
    }

    pub fn face_degree(&self, f: FK) -> Option<usize> {
        self.face.get(&f).map(|cycle| cycle.len())
    }

    /// The vertex after `v` in the boundary cycle of `f`.
    pub fn face_vertex_descendant(&self, f: FK, v: VK) -> Result<VK, Error> {
        let cycle = self.face.get(&f).ok_or(Error::FaceNotFound(f))?;
        let at = cycle
            .iter()
            .position(|w| *w == v)
            .ok_or(Error::VertexNotInFace(v, f))?;
        Ok(cycle[(at + 1) % cycle.len()])
    }

    /// The vertex before `v` in the boundary cycle of `f`.
    pub fn face_vertex_ancestor(&self, f: FK, v: VK) -> Result<VK, Error> {
        let cycle = self.face.get(&f).ok_or(Error::FaceNotFound(f))?;
        let at = cycle
            .iter()
            .position(|w| *w == v)
            .ok_or(Error::VertexNotInFace(v, f))?;
        Ok(cycle[(at + cycle.len() - 1) % cycle.len()])
    }

    /// Every undirected edge once, as the pair with the smaller key first.
    pub fn edges(&self) -> impl Iterator<Item = (VK, VK)> + '_ {
        self.halfedge.iter().flat_map(move |(u, row)| {
            row.keys()
                .filter(move |v| u < *v || !self.has_halfedge(**v, *u))
                .map(move |v| (*u, *v))
        })
    }

    pub fn num_edges(&self) -> usize {
        self.edges().count()
    }

    /// Register a vertex with an empty adjacency row. Returns false if the
    /// vertex already exists (nothing is touched in that case).
    pub fn add_vertex(&mut self, v: VK) -> bool {
        match self.halfedge.entry(v) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(BTreeMap::new());
                true
            }
        }
    }

    /// Store a face cycle and claim its halfedges. The cycle is expected to
    /// be normalized, at least 3 long, over existing vertices, under a fresh
    /// face key. Each directed entry `u -> v` is pointed at the face; the
    /// reverse direction is created as a boundary entry if it is not already
    /// claimed by another face.
    pub fn add_face(&mut self, f: FK, cycle: Vec<VK>) {
        for (u, v) in cycle_pairs(&cycle) {
            if u == v {
                continue;
            }
            self.halfedge
                .entry(u)
                .or_default()
                .insert(v, HalfedgeTarget::Face(f));
            self.halfedge
                .entry(v)
                .or_default()
                .entry(u)
                .or_insert(HalfedgeTarget::Boundary);
        }
        self.face.insert(f, cycle);
    }

    /// Remove the face record only, leaving its halfedges untouched. Used
    /// when the halfedges are about to be reclaimed by replacement faces.
    pub fn remove_face_entry(&mut self, f: FK) -> Option<Vec<VK>> {
        self.face.remove(&f)
    }

    /// Delete a face: zero its halfedges and drop every undirected edge
    /// whose both directions end up on the boundary. Returns the dropped
    /// pairs so the caller can purge edge attributes.
    pub fn delete_face(&mut self, f: FK) -> Result<Vec<(VK, VK)>, Error> {
        let cycle = self.face.remove(&f).ok_or(Error::FaceNotFound(f))?;
        let mut dropped = Vec::new();
        for (u, v) in cycle_pairs(&cycle) {
            if u == v {
                continue;
            }
            // Guarded: another face may have overwritten this direction.
            if self.halfedge_target(u, v) == Some(HalfedgeTarget::Face(f)) {
                if let Some(row) = self.halfedge.get_mut(&u) {
                    row.insert(v, HalfedgeTarget::Boundary);
                }
            }
            let forward = self.halfedge_target(u, v);
            let backward = self.halfedge_target(v, u);
            if forward == Some(HalfedgeTarget::Boundary)
                && backward == Some(HalfedgeTarget::Boundary)
            {
                if let Some(row) = self.halfedge.get_mut(&u) {
                    row.remove(&v);
                }
                if let Some(row) = self.halfedge.get_mut(&v) {
                    row.remove(&u);
                }
                dropped.push((u, v));
            }
        }
        Ok(dropped)
    }

    /// Delete a vertex and cascade: every incident face is deleted the same
    /// way `delete_face` deletes it, which also prunes the edges around the
    /// vertex once their last face is gone. Returns the deleted faces and
    /// dropped edge pairs for attribute cleanup.
    pub fn delete_vertex(&mut self, v: VK) -> Result<(Vec<FK>, Vec<(VK, VK)>), Error> {
        let faces: Vec<FK> = self
            .halfedge
            .get(&v)
            .ok_or(Error::VertexNotFound(v))?
            .values()
            .filter_map(|target| target.face())
            .collect();
        let mut dropped = Vec::new();
        for f in &faces {
            if self.face.contains_key(f) {
                dropped.extend(self.delete_face(*f)?);
            }
        }
        // A consistent store has an empty row left at this point. Force out
        // whatever a malformed store might still hold.
        if let Some(row) = self.halfedge.remove(&v) {
            for n in row.into_keys() {
                if let Some(nrow) = self.halfedge.get_mut(&n) {
                    nrow.remove(&v);
                }
                dropped.push((v, n));
            }
        }
        Ok((faces, dropped))
    }

    /// Remove every vertex whose adjacency row is empty. Returns the culled
    /// keys.
    pub fn cull_vertices(&mut self) -> Vec<VK> {
        let culled: Vec<VK> = self
            .halfedge
            .iter()
            .filter(|(_, row)| row.is_empty())
            .map(|(v, _)| *v)
            .collect();
        for v in &culled {
            self.halfedge.remove(v);
        }
        culled
    }

    pub fn clear(&mut self) {
        self.halfedge.clear();
        self.face.clear();
    }
}
