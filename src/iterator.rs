use crate::{
    element::{FK, VK},
    error::Error,
    mesh::Mesh,
    topol::{Topology, cycle_pairs},
};
use std::collections::BTreeSet;

/// Neighbors of a vertex in key order.
pub(crate) fn vertex_neighbors(topol: &Topology, v: VK) -> Result<Vec<VK>, Error> {
    let row = topol.row(v).ok_or(Error::VertexNotFound(v))?;
    Ok(row.keys().copied().collect())
}

/**
 * Neighbors of a vertex in fan order.
 *
 * The walk starts at a neighbor reached through a boundary halfedge when one
 * exists, so a boundary fan is traversed end to end; an interior fan starts
 * at the smallest neighbor key. From the current neighbor, the next one is
 * the successor of `v` in the face on the far side, and the walk advances
 * into that face's neighborhood until it either returns to the start or runs
 * off the boundary.
 *
 * A walk that leaves the fan, or one that terminates without covering the
 * full vertex degree, means the faces around `v` do not form a single fan;
 * that is reported as `MalformedTopology` instead of being truncated.
 */
pub(crate) fn vertex_neighbors_ordered(topol: &Topology, v: VK) -> Result<Vec<VK>, Error> {
    let row = topol.row(v).ok_or(Error::VertexNotFound(v))?;
    let degree = row.len();
    if degree < 2 {
        return Ok(row.keys().copied().collect());
    }
    let start = row
        .iter()
        .find(|(_, target)| target.is_boundary())
        .or_else(|| row.iter().next())
        .map(|(n, _)| *n)
        .ok_or(Error::VertexNotFound(v))?;
    let mut ordered = vec![start];
    let mut face = topol
        .halfedge_target(start, v)
        .ok_or(Error::AsymmetricHalfedge(start, v))?
        .face();
    while let Some(f) = face {
        if ordered.len() > degree {
            return Err(Error::MalformedTopology(v));
        }
        let nbr = topol.face_vertex_descendant(f, v)?;
        if nbr == start {
            break;
        }
        ordered.push(nbr);
        face = topol
            .halfedge_target(nbr, v)
            .ok_or(Error::AsymmetricHalfedge(nbr, v))?
            .face();
    }
    if ordered.len() != degree {
        return Err(Error::MalformedTopology(v));
    }
    Ok(ordered)
}

/// Faces incident to a vertex, in neighbor key order.
pub(crate) fn vertex_faces(topol: &Topology, v: VK) -> Result<Vec<FK>, Error> {
    let row = topol.row(v).ok_or(Error::VertexNotFound(v))?;
    Ok(row.values().filter_map(|target| target.face()).collect())
}

/// Faces incident to a vertex, in fan order.
pub(crate) fn vertex_faces_ordered(topol: &Topology, v: VK) -> Result<Vec<FK>, Error> {
    let ordered = vertex_neighbors_ordered(topol, v)?;
    Ok(ordered
        .iter()
        .filter_map(|n| topol.halfedge_target(v, *n).and_then(|t| t.face()))
        .collect())
}

/// The directed halfedges of a face's boundary cycle.
pub(crate) fn face_halfedges(topol: &Topology, f: FK) -> Result<Vec<(VK, VK)>, Error> {
    let cycle = topol.face_vertices(f).ok_or(Error::FaceNotFound(f))?;
    Ok(cycle_pairs(cycle).collect())
}

/// Faces sharing an edge with the given face, in cycle order. A neighbor
/// sharing several edges appears once per shared edge.
pub(crate) fn face_neighbors(topol: &Topology, f: FK) -> Result<Vec<FK>, Error> {
    let cycle = topol.face_vertices(f).ok_or(Error::FaceNotFound(f))?;
    Ok(cycle_pairs(cycle)
        .filter_map(|(u, v)| topol.halfedge_target(v, u).and_then(|t| t.face()))
        .collect())
}

/// Every directed halfedge lying on the boundary, in key order.
pub(crate) fn boundary_halfedges(topol: &Topology) -> Vec<(VK, VK)> {
    let mut out = Vec::new();
    for u in topol.vertices() {
        if let Some(row) = topol.row(u) {
            out.extend(
                row.iter()
                    .filter(|(_, target)| target.is_boundary())
                    .map(|(v, _)| (u, *v)),
            );
        }
    }
    out
}

/// Every vertex incident to a boundary halfedge, in key order.
pub(crate) fn boundary_vertices(topol: &Topology) -> BTreeSet<VK> {
    let mut out = BTreeSet::new();
    for (u, v) in boundary_halfedges(topol) {
        out.insert(u);
        out.insert(v);
    }
    out
}

/**
 * Walk one boundary loop starting at `seed`, following outgoing boundary
 * halfedges. Where several leave the same vertex, the smallest neighbor key
 * wins, so the walk is deterministic. Returns the ordered loop, seed first.
 *
 * A walk that re-enters a vertex other than the seed does not describe a
 * simple loop and is reported as `MalformedTopology`.
 */
pub(crate) fn boundary_loop_from(topol: &Topology, seed: VK) -> Result<Vec<VK>, Error> {
    let mut looped = vec![seed];
    let mut visited = BTreeSet::from([seed]);
    let mut current = seed;
    loop {
        let row = topol.row(current).ok_or(Error::VertexNotFound(current))?;
        let next = row
            .iter()
            .find(|(_, target)| target.is_boundary())
            .map(|(n, _)| *n)
            .ok_or(Error::MalformedTopology(current))?;
        if next == seed {
            return Ok(looped);
        }
        if !visited.insert(next) {
            return Err(Error::MalformedTopology(next));
        }
        looped.push(next);
        current = next;
    }
}

impl Mesh {
    /// Check if the vertex touches a boundary halfedge in either direction.
    pub fn is_vertex_on_boundary(&self, v: VK) -> Result<bool, Error> {
        let row = self.topol.row(v).ok_or(Error::VertexNotFound(v))?;
        Ok(row.values().any(|target| target.is_boundary())
            || row.keys().any(|n| {
                self.topol
                    .halfedge_target(*n, v)
                    .is_some_and(|target| target.is_boundary())
            }))
    }

    /// Check if either direction of the edge lies on the boundary.
    pub fn is_edge_on_boundary(&self, u: VK, v: VK) -> Result<bool, Error> {
        match (
            self.topol.halfedge_target(u, v),
            self.topol.halfedge_target(v, u),
        ) {
            (None, None) => Err(Error::EdgeNotFound(u, v)),
            (forward, backward) => Ok(forward.is_none_or(|t| t.is_boundary())
                || backward.is_none_or(|t| t.is_boundary())),
        }
    }

    /// Check if any edge of the face lies on the boundary.
    pub fn is_face_on_boundary(&self, f: FK) -> Result<bool, Error> {
        Ok(face_halfedges(&self.topol, f)?.iter().any(|(u, v)| {
            self.topol
                .halfedge_target(*v, *u)
                .is_none_or(|t| t.is_boundary())
        }))
    }

    /// All boundary edges, oriented along the boundary: `(u, v)` such that
    /// the directed halfedge `u -> v` carries no face.
    pub fn edges_on_boundary(&self) -> Vec<(VK, VK)> {
        boundary_halfedges(&self.topol)
    }

    /// All faces with at least one boundary edge, in key order.
    pub fn faces_on_boundary(&self) -> Vec<FK> {
        self.topol
            .faces()
            .filter(|f| self.is_face_on_boundary(*f).unwrap_or(false))
            .collect()
    }

    /// One boundary loop as an ordered vertex cycle. The walk seeds at the
    /// boundary vertex with the lexicographically smallest position, ties
    /// broken by key, so repeated calls return the same loop. Returns an
    /// empty list on a closed mesh.
    pub fn vertices_on_boundary(&self) -> Result<Vec<VK>, Error> {
        let candidates = boundary_vertices(&self.topol);
        match self.boundary_seed(&candidates)? {
            Some(seed) => boundary_loop_from(&self.topol, seed),
            None => Ok(Vec::new()),
        }
    }

    /// All boundary loops, each an ordered vertex cycle. Loops are walked
    /// from deterministic seeds until every boundary vertex is consumed.
    pub fn vertices_on_boundaries(&self) -> Result<Vec<Vec<VK>>, Error> {
        let mut remaining = boundary_vertices(&self.topol);
        let mut loops = Vec::new();
        while let Some(seed) = self.boundary_seed(&remaining)? {
            let looped = boundary_loop_from(&self.topol, seed)?;
            for v in &looped {
                remaining.remove(v);
            }
            loops.push(looped);
        }
        Ok(loops)
    }

    fn boundary_seed(&self, candidates: &BTreeSet<VK>) -> Result<Option<VK>, Error> {
        let mut best: Option<([f64; 3], VK)> = None;
        for v in candidates {
            let p = self.vertex_point(*v)?;
            let pos = [p.x, p.y, p.z];
            let smaller = match &best {
                Some((bpos, _)) => {
                    pos.iter()
                        .zip(bpos.iter())
                        .map(|(a, b)| a.total_cmp(b))
                        .find(|ord| ord.is_ne())
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .is_lt()
                }
                None => true,
            };
            if smaller {
                best = Some((pos, *v));
            }
        }
        Ok(best.map(|(_, v)| v))
    }
}
