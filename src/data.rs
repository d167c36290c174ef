use crate::{
    attr::AttrValue,
    element::{FK, Key, VK},
    error::Error,
    key::KeyGen,
    mesh::Mesh,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/**
 * The flattened form of a mesh.
 *
 * Every entity key is stored as a string so the structure survives formats
 * whose maps only allow string keys: vertex and face keys as their decimal
 * representation, edge keys as the pair `"(u, v)"`. The two watermarks are
 * serialized as signed integers, -1 standing for "no key assigned yet".
 *
 * `vertex` holds one entry per vertex (its attribute overrides, possibly
 * empty); `facedata` and `edgedata` only hold entries for elements that have
 * overrides, since those records are created lazily.
 */
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub attributes: BTreeMap<String, AttrValue>,
    pub dva: BTreeMap<String, AttrValue>,
    pub dea: BTreeMap<String, AttrValue>,
    pub dfa: BTreeMap<String, AttrValue>,
    pub vertex: BTreeMap<String, BTreeMap<String, AttrValue>>,
    pub face: BTreeMap<String, Vec<String>>,
    pub facedata: BTreeMap<String, BTreeMap<String, AttrValue>>,
    pub edgedata: BTreeMap<String, BTreeMap<String, AttrValue>>,
    pub max_int_key: i64,
    pub max_int_fkey: i64,
}

fn parse_id(text: &str) -> Result<u32, Error> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| Error::InvalidKey(text.to_string()))
}

fn edge_repr(u: VK, v: VK) -> String {
    format!("({}, {})", u.id(), v.id())
}

fn parse_edge(text: &str) -> Result<(VK, VK), Error> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| Error::InvalidKey(text.to_string()))?;
    let mut parts = inner.splitn(2, ',');
    match (parts.next(), parts.next()) {
        (Some(u), Some(v)) => Ok((VK::from(parse_id(u)?), VK::from(parse_id(v)?))),
        _ => Err(Error::InvalidKey(text.to_string())),
    }
}

impl Mesh {
    /// Flatten the mesh into its serialized form.
    pub fn data(&self) -> MeshData {
        MeshData {
            attributes: self.attributes.clone(),
            dva: self.vattr.defaults().clone(),
            dea: self.eattr.defaults().clone(),
            dfa: self.fattr.defaults().clone(),
            vertex: self
                .topol
                .vertices()
                .map(|v| (v.id().to_string(), self.vattr.custom(v)))
                .collect(),
            face: self
                .topol
                .faces()
                .filter_map(|f| {
                    self.topol.face_vertices(f).map(|cycle| {
                        (
                            f.id().to_string(),
                            cycle.iter().map(|v| v.id().to_string()).collect(),
                        )
                    })
                })
                .collect(),
            facedata: self
                .fattr
                .rows()
                .map(|(f, row)| (f.id().to_string(), row.clone()))
                .collect(),
            edgedata: self
                .eattr
                .rows()
                .map(|((u, v), row)| (edge_repr(u, v), row.clone()))
                .collect(),
            max_int_key: self.vkeys.to_serial(),
            max_int_fkey: self.fkeys.to_serial(),
        }
    }

    /// Rebuild a mesh from its serialized form.
    ///
    /// The reconstruction funnels through `add_vertex`/`add_face`, so the
    /// halfedge store is derived from the face cycles rather than trusted
    /// from the input. Unparsable keys and attribute records pointing at
    /// missing elements are errors.
    pub fn from_data(data: &MeshData) -> Result<Self, Error> {
        let mut mesh = Mesh::new();
        mesh.attributes = data.attributes.clone();
        mesh.vattr.set_defaults(data.dva.clone());
        mesh.eattr.set_defaults(data.dea.clone());
        mesh.fattr.set_defaults(data.dfa.clone());
        for (key, attrs) in &data.vertex {
            let v = VK::from(parse_id(key)?);
            mesh.add_vertex_with(Some(v), attrs.clone());
        }
        for (key, cycle) in &data.face {
            let f = FK::from(parse_id(key)?);
            let cycle = cycle
                .iter()
                .map(|v| Ok(VK::from(parse_id(v)?)))
                .collect::<Result<Vec<VK>, Error>>()?;
            mesh.add_face(&cycle, Some(f))?;
        }
        for (key, attrs) in &data.facedata {
            let f = FK::from(parse_id(key)?);
            if !mesh.has_face(f) {
                return Err(Error::FaceNotFound(f));
            }
            mesh.fattr.merge_row(f, attrs.clone());
        }
        for (key, attrs) in &data.edgedata {
            let (u, v) = parse_edge(key)?;
            if !mesh.has_edge(u, v) {
                return Err(Error::EdgeNotFound(u, v));
            }
            mesh.eattr.merge_row((u, v), attrs.clone());
        }
        if let Some(mark) = KeyGen::from_serial(data.max_int_key)?.watermark() {
            mesh.vkeys.claim(mark);
        }
        if let Some(mark) = KeyGen::from_serial(data.max_int_fkey)?.watermark() {
            mesh.fkeys.claim(mark);
        }
        Ok(mesh)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(&self.data()).map_err(|e| Error::InvalidData(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, Error> {
        let data: MeshData =
            serde_json::from_str(text).map_err(|e| Error::InvalidData(e.to_string()))?;
        Mesh::from_data(&data)
    }
}

#[cfg(test)]
mod test {
    use super::{MeshData, parse_edge};
    use crate::{element::VK, error::Error, mesh::Mesh};
    use serde_json::json;

    /// A mesh with sparse keys, deletions behind the watermark, and
    /// attributes on all three element kinds.
    fn scarred_mesh() -> Mesh {
        let mut mesh = Mesh::from_vertices_and_faces(
            &[
                glam::dvec3(0.0, 0.0, 0.0),
                glam::dvec3(1.0, 0.0, 0.0),
                glam::dvec3(1.0, 1.0, 0.0),
                glam::dvec3(0.0, 1.0, 0.0),
                glam::dvec3(2.0, 0.0, 0.0),
            ],
            &[vec![0, 1, 2, 3], vec![1, 4, 2]],
        )
        .unwrap();
        mesh.set_name("scarred");
        mesh.set_vertex_attribute(1.into(), "weight", json!(2.5))
            .unwrap();
        mesh.set_face_attribute(0.into(), "color", json!("red"))
            .unwrap();
        mesh.set_edge_attribute((1.into(), 2.into()), "crease", json!(true))
            .unwrap();
        mesh.update_default_face_attributes([("color".to_string(), json!("white"))]);
        // Deletions leave the watermarks where they were.
        mesh.delete_face(1.into()).unwrap();
        mesh.cull_vertices();
        mesh
    }

    #[test]
    fn t_round_trip() {
        let mesh = scarred_mesh();
        let data = mesh.data();
        let rebuilt = Mesh::from_data(&data).unwrap();
        assert_eq!(rebuilt.data(), data);
        assert_eq!(rebuilt.name(), "scarred");
        assert_eq!(
            rebuilt.vertices().collect::<Vec<_>>(),
            mesh.vertices().collect::<Vec<_>>()
        );
        assert_eq!(
            rebuilt.face_vertices(0.into()).unwrap(),
            mesh.face_vertices(0.into()).unwrap()
        );
        // Watermarks survive even though the elements behind them are gone.
        assert_eq!(rebuilt.max_vertex_key(), Some(4.into()));
        assert_eq!(rebuilt.max_face_key(), Some(1.into()));
        assert_eq!(
            rebuilt.vertex_attribute(1.into(), "weight").unwrap(),
            Some(json!(2.5))
        );
        assert_eq!(
            rebuilt.face_attribute(0.into(), "color").unwrap(),
            Some(json!("red"))
        );
    }

    #[test]
    fn t_json_round_trip() {
        let mesh = scarred_mesh();
        let text = mesh.to_json().unwrap();
        let rebuilt = Mesh::from_json(&text).unwrap();
        assert_eq!(rebuilt.data(), mesh.data());
    }

    #[test]
    fn t_serialized_shape() {
        let mesh = scarred_mesh();
        let data = mesh.data();
        // String keys throughout, one vertex entry per vertex.
        assert_eq!(data.vertex.len(), 4);
        assert!(data.vertex.contains_key("0"));
        assert_eq!(data.face["0"], vec!["0", "1", "2", "3"]);
        assert_eq!(data.max_int_key, 4);
        assert_eq!(data.max_int_fkey, 1);
        // Edge overrides are stored under both directions.
        assert_eq!(data.edgedata.len(), 2);
        assert_eq!(data.edgedata["(1, 2)"]["crease"], json!(true));
        assert_eq!(data.edgedata["(2, 1)"]["crease"], json!(true));
        assert_eq!(data.dfa["color"], json!("white"));
    }

    #[test]
    fn t_bad_keys_are_errors() {
        let mut data = MeshData::default();
        data.max_int_key = -1;
        data.max_int_fkey = -1;
        data.vertex.insert("nope".to_string(), Default::default());
        assert_eq!(
            Mesh::from_data(&data).unwrap_err(),
            Error::InvalidKey("nope".to_string())
        );
        assert_eq!(parse_edge("(0, 1)"), Ok((VK::from(0), VK::from(1))));
        assert!(parse_edge("0, 1").is_err());
        assert!(parse_edge("(0; 1)").is_err());
    }

    #[test]
    fn t_dangling_attribute_records_are_errors() {
        let mesh = scarred_mesh();
        let mut data = mesh.data();
        data.facedata
            .insert("9".to_string(), [("q".to_string(), json!(1))].into());
        assert_eq!(
            Mesh::from_data(&data).unwrap_err(),
            Error::FaceNotFound(9.into())
        );
    }
}
