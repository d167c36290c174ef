use crate::{element::VK, error::Error, mesh::Mesh};
use std::path::Path;

impl Mesh {
    /// Load a Wavefront OBJ file. All models in the file are merged into one
    /// mesh; polygonal faces are kept as-is.
    pub fn load_obj(path: &Path) -> Result<Self, Error> {
        let options = tobj::LoadOptions::default();
        let (models, _) =
            tobj::load_obj(path, &options).map_err(|e| Error::ObjLoadFailed(format!("{}", e)))?;
        let mut mesh = Mesh::new();
        let mut voffset = 0u32;
        let mut fvs: Vec<VK> = Vec::new();
        for model in models {
            let m = model.mesh;
            if m.positions.len() % 3 != 0 {
                return Err(Error::IncorrectNumberOfCoordinates(m.positions.len()));
            }
            let nverts = (m.positions.len() / 3) as u32;
            for triplet in m.positions.chunks(3) {
                mesh.add_vertex_at(None, glam::dvec3(triplet[0], triplet[1], triplet[2]));
            }
            // Without arities the face list is uniform triangles.
            let mut start = 0usize;
            let sizes: Vec<usize> = if m.face_arities.is_empty() {
                vec![3; m.indices.len() / 3]
            } else {
                m.face_arities.iter().map(|size| *size as usize).collect()
            };
            for size in sizes {
                let indices = &m.indices[start..(start + size)];
                start += size;
                fvs.clear();
                fvs.extend(indices.iter().map(|i| VK::from(i + voffset)));
                mesh.add_face(&fvs, None)?;
            }
            voffset += nverts;
        }
        Ok(mesh)
    }

    pub fn to_ply(&self) -> Result<String, Error> {
        Err(Error::Unsupported("to_ply"))
    }

    pub fn to_stl(&self) -> Result<String, Error> {
        Err(Error::Unsupported("to_stl"))
    }

    pub fn to_off(&self) -> Result<String, Error> {
        Err(Error::Unsupported("to_off"))
    }
}

#[cfg(test)]
mod test {
    use crate::{error::Error, mesh::Mesh};
    use std::{fs, path::PathBuf};

    const BOX_OBJ: &str = "\
# unit box
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
v 0.0 0.0 1.0
v 1.0 0.0 1.0
v 1.0 1.0 1.0
v 0.0 1.0 1.0
f 4 3 2 1
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
f 5 6 7 8
";

    fn write_temp_obj(name: &str, content: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(name);
        fs::write(&path, content).expect("Cannot write temp obj file");
        path
    }

    #[test]
    fn t_load_box_obj() {
        let path = write_temp_obj("lamella_box_test.obj", BOX_OBJ);
        let mesh = Mesh::load_obj(&path).expect("Cannot load obj file");
        fs::remove_file(&path).ok();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.num_faces(), 6);
        assert!(mesh.is_valid());
        assert!(mesh.is_quadmesh());
        assert_eq!(mesh.euler(), 2);
    }

    #[test]
    fn t_load_missing_file() {
        let mut path = std::env::temp_dir();
        path.push("lamella_does_not_exist.obj");
        assert!(matches!(
            Mesh::load_obj(&path),
            Err(Error::ObjLoadFailed(_))
        ));
    }

    #[test]
    fn t_unsupported_exports() {
        let mesh = Mesh::new();
        assert_eq!(mesh.to_ply(), Err(Error::Unsupported("to_ply")));
        assert_eq!(mesh.to_stl(), Err(Error::Unsupported("to_stl")));
        assert_eq!(mesh.to_off(), Err(Error::Unsupported("to_off")));
    }
}
