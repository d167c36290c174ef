use crate::{error::Error, mesh::Mesh};
use glam::dvec3;

/// Platonic solids, all centered at the origin with the given circumradius,
/// so the vertices lie on a sphere of that radius.
impl Mesh {
    pub fn tetrahedron(radius: f64) -> Result<Self, Error> {
        let a = radius / 3.0;
        let b = radius * (8.0f64 / 9.0).sqrt();
        let c = radius * (2.0f64 / 9.0).sqrt();
        let d = radius * (2.0f64 / 3.0).sqrt();
        Self::from_vertices_and_faces(
            &[
                dvec3(0.0, 0.0, radius),
                dvec3(-c, d, -a),
                dvec3(-c, -d, -a),
                dvec3(b, 0.0, -a),
            ],
            &[vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 1], vec![3, 2, 1]],
        )
    }

    pub fn hexahedron(radius: f64) -> Result<Self, Error> {
        let a = radius / 3.0f64.sqrt();
        Self::from_vertices_and_faces(
            &[
                dvec3(-a, -a, -a),
                dvec3(a, -a, -a),
                dvec3(a, a, -a),
                dvec3(-a, a, -a),
                dvec3(-a, -a, a),
                dvec3(a, -a, a),
                dvec3(a, a, a),
                dvec3(-a, a, a),
            ],
            &[
                vec![3, 2, 1, 0],
                vec![2, 6, 5, 1],
                vec![5, 6, 7, 4],
                vec![0, 4, 7, 3],
                vec![3, 7, 6, 2],
                vec![1, 5, 4, 0],
            ],
        )
    }

    pub fn octahedron(radius: f64) -> Result<Self, Error> {
        Self::from_vertices_and_faces(
            &[
                dvec3(radius, 0.0, 0.0),
                dvec3(0.0, radius, 0.0),
                dvec3(-radius, 0.0, 0.0),
                dvec3(0.0, -radius, 0.0),
                dvec3(0.0, 0.0, radius),
                dvec3(0.0, 0.0, -radius),
            ],
            &[
                vec![0, 4, 3],
                vec![1, 4, 0],
                vec![2, 4, 1],
                vec![3, 4, 2],
                vec![3, 5, 0],
                vec![0, 5, 1],
                vec![1, 5, 2],
                vec![2, 5, 3],
            ],
        )
    }

    pub fn icosahedron(radius: f64) -> Result<Self, Error> {
        const P: f64 = 0.8506508083520399;
        const Q: f64 = 0.5257311121191336;
        let p = radius * P;
        let q = radius * Q;
        Self::from_vertices_and_faces(
            &[
                dvec3(0.0, q, -p),
                dvec3(q, p, 0.0),
                dvec3(-q, p, 0.0),
                dvec3(0.0, q, p),
                dvec3(0.0, -q, p),
                dvec3(-p, 0.0, q),
                dvec3(0.0, -q, -p),
                dvec3(p, 0.0, -q),
                dvec3(p, 0.0, q),
                dvec3(-p, 0.0, -q),
                dvec3(q, -p, 0.0),
                dvec3(-q, -p, 0.0),
            ],
            &[
                vec![2, 1, 0],
                vec![1, 2, 3],
                vec![5, 4, 3],
                vec![4, 8, 3],
                vec![7, 6, 0],
                vec![6, 9, 0],
                vec![11, 10, 4],
                vec![10, 11, 6],
                vec![9, 5, 2],
                vec![5, 9, 11],
                vec![8, 7, 1],
                vec![7, 8, 10],
                vec![2, 5, 3],
                vec![8, 1, 3],
                vec![9, 2, 0],
                vec![1, 7, 0],
                vec![11, 9, 6],
                vec![7, 10, 6],
                vec![5, 11, 4],
                vec![10, 8, 4],
            ],
        )
    }

    pub fn dodecahedron(radius: f64) -> Result<Self, Error> {
        const P: f64 = 0.9341723589627157;
        const Q: f64 = 0.35682208977308993;
        const R: f64 = 0.5773502691896257;
        let p = radius * P;
        let q = radius * Q;
        let r = radius * R;
        Self::from_vertices_and_faces(
            &[
                dvec3(0.0, p, -q),
                dvec3(0.0, p, q),
                dvec3(-q, 0.0, p),
                dvec3(q, 0.0, p),
                dvec3(q, 0.0, -p),
                dvec3(-q, 0.0, -p),
                dvec3(0.0, -p, q),
                dvec3(0.0, -p, -q),
                dvec3(-p, q, 0.0),
                dvec3(-p, -q, 0.0),
                dvec3(p, q, 0.0),
                dvec3(p, -q, 0.0),
                dvec3(-r, r, r),
                dvec3(r, r, r),
                dvec3(-r, r, -r),
                dvec3(r, r, -r),
                dvec3(-r, -r, -r),
                dvec3(r, -r, -r),
                dvec3(-r, -r, r),
                dvec3(r, -r, r),
            ],
            &[
                vec![15, 4, 5, 14, 0],
                vec![15, 0, 1, 13, 10],
                vec![14, 8, 12, 1, 0],
                vec![13, 1, 12, 2, 3],
                vec![19, 3, 2, 18, 6],
                vec![18, 2, 12, 8, 9],
                vec![17, 7, 16, 5, 4],
                vec![17, 4, 15, 10, 11],
                vec![19, 11, 10, 13, 3],
                vec![16, 9, 8, 14, 5],
                vec![19, 6, 7, 17, 11],
                vec![18, 9, 16, 7, 6],
            ],
        )
    }

    /// Dispatch on the face count of the five platonic solids, with a unit
    /// circumradius.
    pub fn from_platonic_solid(faces: usize) -> Result<Self, Error> {
        match faces {
            4 => Self::tetrahedron(1.0),
            6 => Self::hexahedron(1.0),
            8 => Self::octahedron(1.0),
            12 => Self::dodecahedron(1.0),
            20 => Self::icosahedron(1.0),
            _ => Err(Error::Unsupported(
                "platonic solids have 4, 6, 8, 12 or 20 faces",
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{macros::assert_f64_eq, mesh::Mesh};

    #[test]
    fn t_tetrahedron() {
        let tet = Mesh::tetrahedron(1.0).expect("Cannot create a tetrahedron");
        assert_eq!(tet.num_vertices(), 4);
        assert_eq!(tet.num_edges(), 6);
        assert_eq!(tet.num_faces(), 4);
        assert!(tet.is_valid());
        assert!(tet.is_trimesh());
        assert!(tet.is_regular());
        assert_eq!(tet.euler(), 2);
        assert_f64_eq!(8.0 / 3.0f64.sqrt(), tet.area().unwrap(), 1e-12);
    }

    #[test]
    fn t_hexahedron() {
        let hex = Mesh::hexahedron(1.0).expect("Cannot create a hexahedron");
        assert_eq!(hex.num_vertices(), 8);
        assert_eq!(hex.num_edges(), 12);
        assert_eq!(hex.num_faces(), 6);
        assert!(hex.is_valid());
        assert!(hex.is_quadmesh());
        assert!(hex.is_manifold());
        assert_eq!(hex.euler(), 2);
        assert_f64_eq!(8.0, hex.area().unwrap(), 1e-12);
    }

    #[test]
    fn t_octahedron() {
        let oct = Mesh::octahedron(1.0).expect("Cannot create an octahedron");
        assert_eq!(oct.num_vertices(), 6);
        assert_eq!(oct.num_edges(), 12);
        assert_eq!(oct.num_faces(), 8);
        assert!(oct.is_valid());
        assert_eq!(oct.euler(), 2);
        assert_f64_eq!(4.0 * 3.0f64.sqrt(), oct.area().unwrap(), 1e-12);
    }

    #[test]
    fn t_icosahedron() {
        let ico = Mesh::icosahedron(1.0).expect("Cannot create an icosahedron");
        assert_eq!(ico.num_vertices(), 12);
        assert_eq!(ico.num_edges(), 30);
        assert_eq!(ico.num_faces(), 20);
        assert!(ico.is_valid());
        assert!(ico.is_trimesh());
        assert!(ico.is_regular());
        assert_eq!(ico.euler(), 2);
        assert_f64_eq!(
            {
                let phi = (1.0 + 5.0f64.sqrt()) / 2.0;
                20.0 * 3.0f64.sqrt() / (phi * phi + 1.0)
            },
            ico.area().unwrap(),
            1e-9
        );
    }

    #[test]
    fn t_dodecahedron() {
        let dod = Mesh::dodecahedron(1.0).expect("Cannot create a dodecahedron");
        assert_eq!(dod.num_vertices(), 20);
        assert_eq!(dod.num_edges(), 30);
        assert_eq!(dod.num_faces(), 12);
        assert!(dod.is_valid());
        assert!(dod.is_regular());
        assert_eq!(dod.euler(), 2);
        assert_f64_eq!(
            {
                let phi = (1.0 + 5.0f64.sqrt()) / 2.0;
                20.0 / (phi * (3.0 - phi).sqrt())
            },
            dod.area().unwrap(),
            1e-9
        );
    }

    #[test]
    fn t_from_platonic_solid() {
        for n in [4usize, 6, 8, 12, 20] {
            let mesh = Mesh::from_platonic_solid(n).expect("Cannot create solid");
            assert_eq!(mesh.num_faces(), n);
            assert_eq!(mesh.euler(), 2);
        }
        assert!(Mesh::from_platonic_solid(5).is_err());
    }
}
