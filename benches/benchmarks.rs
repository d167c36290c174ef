use criterion::{Criterion, criterion_group, criterion_main};
use lamella::Mesh;
use std::hint::black_box;

/// Build an n x n grid of quad faces.
fn grid_mesh(n: usize) -> Mesh {
    let mut points = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            points.push(glam::dvec3(i as f64, j as f64, 0.0));
        }
    }
    let mut faces = Vec::with_capacity(n * n);
    let stride = (n + 1) as u32;
    for j in 0..n as u32 {
        for i in 0..n as u32 {
            let a = j * stride + i;
            faces.push(vec![a, a + 1, a + stride + 1, a + stride]);
        }
    }
    Mesh::from_vertices_and_faces(&points, &faces).unwrap()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    for n in [16usize, 64] {
        group.bench_function(format!("grid_{}x{}", n, n), |b| {
            b.iter(|| {
                let mesh = grid_mesh(black_box(n));
                black_box(mesh);
            });
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mesh = grid_mesh(64);
    let mut group = c.benchmark_group("traversal");
    group.bench_function("ordered_neighbors_sweep", |b| {
        b.iter(|| {
            for v in mesh.vertices() {
                black_box(mesh.vertex_neighbors_ordered(black_box(v)).unwrap());
            }
        });
    });
    group.bench_function("boundary_loops", |b| {
        b.iter(|| {
            black_box(mesh.vertices_on_boundaries().unwrap());
        });
    });
    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mesh = grid_mesh(32);
    let mut group = c.benchmark_group("serialization");
    group.bench_function("data_round_trip", |b| {
        b.iter(|| {
            let data = mesh.data();
            black_box(Mesh::from_data(black_box(&data)).unwrap());
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_traversal,
    bench_serialization
);
criterion_main!(benches);
