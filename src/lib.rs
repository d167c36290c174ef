/*!
This is a halfedge mesh datastructure addressed by sparse integer keys, with
a layered attribute dictionary on every vertex, face and edge.

# Overview

+ The topology of the mesh, i.e. the connectivity of vertices, edges and
  faces, is kept in a halfedge map: every vertex owns a row mapping each
  incident neighbor to the face left of the directed halfedge towards it, or
  to an explicit boundary marker ([`HalfedgeTarget`]). Faces store their
  boundary cycle as an ordered vertex list; edges are derived from the rows.

+ Vertices and faces are addressed by [`VK`] and [`FK`] keys that never get
  reused: the allocator watermark only moves forward, whether keys are
  generated or supplied by the caller, so deleting an element cannot make an
  old key ambiguous.

+ Every element carries attributes in two tiers: mesh-wide defaults per
  element kind, and per-element overrides layered on top. Reading an unset
  name falls back to the default; unsetting an override restores the
  fallback. Vertex positions are ordinary attributes (`x`, `y`, `z`),
  consumed by the geometric queries as [`glam::DVec3`].

+ [`Mesh::data`] flattens the whole structure into a serializable form
  ([`MeshData`]) and [`Mesh::from_data`] rebuilds it, preserving keys,
  attributes and watermarks. [`Mesh::from_vertices_and_faces`] is the
  normalized entry point for format readers and shape generators;
  [`Mesh::load_obj`] funnels Wavefront OBJ files through it.
*/

mod attr;
mod check;
mod data;
mod edit;
mod element;
mod error;
mod geom;
mod iterator;
mod key;
mod macros;
mod mesh;
mod obj;
mod primitive;
mod topol;

pub use attr::AttrValue;
pub use data::MeshData;
pub use element::{FK, HalfedgeTarget, Key, VK};
pub use error::Error;
pub use mesh::Mesh;
