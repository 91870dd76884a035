//! Cross-strategy checks against an exhaustive ray/triangle count.

use insol_geom::{Mesh, Point3, Vec3};
use insol_raycast::intersect::intersect_triangle;
use insol_raycast::{
    triangulate, BatchedPipeline, CulledParallelScan, HostBackend, Ray, RaycastSettings,
    SequentialScan, Strategy, TaskParallelBruteForce,
};

/// 4 x 4 grid of 2 x 2 x 1 boxes on a 5-unit pitch.
fn box_grid() -> Vec<Mesh> {
    let mut meshes = Vec::new();
    for i in 0..4 {
        for j in 0..4 {
            let min = Point3::new(i as f64 * 5.0, j as f64 * 5.0, 0.0);
            meshes.push(Mesh::cuboid(min, min + Vec3::new(2.0, 2.0, 1.0)));
        }
    }
    meshes
}

/// Rays fanned from above the grid center toward a jittered target lattice.
fn ray_fan() -> Vec<Ray> {
    let origin = Point3::new(8.5, 8.25, 20.0);
    let mut directions = Vec::new();
    for k in 0..24 {
        for l in 0..24 {
            let target = Point3::new(k as f64 * 0.83 - 1.7, l as f64 * 0.87 - 1.3, 0.5);
            directions.push(target - origin);
        }
    }
    Ray::fan(origin, &directions)
}

fn hits_mesh(ray: &Ray, mesh: &Mesh) -> bool {
    triangulate(mesh).iter().any(|tri| {
        let [a, b, c] = &tri.vertices;
        intersect_triangle(ray, a, b, c).is_some()
    })
}

/// Rays with at least one hit, testing every triangle independently.
fn ground_truth_rays(rays: &[Ray], meshes: &[Mesh]) -> usize {
    rays.iter()
        .filter(|ray| meshes.iter().any(|mesh| hits_mesh(ray, mesh)))
        .count()
}

/// (ray, mesh) pairs with at least one triangle hit.
fn ground_truth_pairs(rays: &[Ray], meshes: &[Mesh]) -> usize {
    rays.iter()
        .map(|ray| meshes.iter().filter(|mesh| hits_mesh(ray, mesh)).count())
        .sum()
}

fn settings() -> RaycastSettings {
    RaycastSettings {
        threads: 4,
        ..Default::default()
    }
}

#[test]
fn test_sequential_matches_ground_truth() {
    let (rays, meshes) = (ray_fan(), box_grid());
    let expected = ground_truth_rays(&rays, &meshes);

    assert!(expected > 0, "scene should produce some hits");
    assert!(expected < rays.len(), "scene should produce some misses");
    assert_eq!(SequentialScan.run(&rays, &meshes).unwrap(), expected);
}

#[test]
fn test_task_parallel_counts_pairs_over_truncated_ranges() {
    let (rays, meshes) = (ray_fan(), box_grid());
    let strategy = TaskParallelBruteForce::new(&settings()).unwrap();

    let expected = ground_truth_pairs(&rays[..rays.len() - 1], &meshes[..meshes.len() - 1]);
    assert_eq!(strategy.run(&rays, &meshes).unwrap(), expected);
}

#[test]
fn test_culled_double_counts() {
    // The circle test never rejects a pair that truly hits, so the ray sweep
    // reproduces the ray count and the mesh sweep the pair count.
    let (rays, meshes) = (ray_fan(), box_grid());
    let strategy = CulledParallelScan::new(&settings()).unwrap();

    let expected = ground_truth_rays(&rays, &meshes) + ground_truth_pairs(&rays, &meshes);
    assert_eq!(strategy.run(&rays, &meshes).unwrap(), expected);
}

#[test]
fn test_batched_host_counts_hit_pairs() {
    let (rays, meshes) = (ray_fan(), box_grid());
    let pipeline = BatchedPipeline::new(HostBackend, settings()).unwrap();

    assert_eq!(
        pipeline.run(&rays, &meshes).unwrap(),
        ground_truth_pairs(&rays, &meshes)
    );
}

#[test]
fn test_batched_host_far_from_world_origin() {
    // Same scene moved to survey-grid coordinates, where f32 has a 0.5 ulp.
    let offset = Vec3::new(-1_079_800.0, 4_580_400.0, 0.0);
    let rays: Vec<Ray> = ray_fan()
        .into_iter()
        .map(|r| Ray::new(r.origin + offset, r.direction))
        .collect();
    let meshes: Vec<Mesh> = box_grid()
        .into_iter()
        .map(|m| Mesh::new(m.vertices.iter().map(|v| v + offset).collect(), m.faces))
        .collect();
    let pipeline = BatchedPipeline::new(HostBackend, settings()).unwrap();

    let expected = ground_truth_pairs(&rays, &meshes);
    assert_eq!(pipeline.run(&rays, &meshes).unwrap(), expected);
}

#[test]
fn test_batched_result_independent_of_chunking() {
    let (rays, meshes) = (ray_fan(), box_grid());
    let baseline = BatchedPipeline::new(HostBackend, RaycastSettings::default())
        .unwrap()
        .run(&rays, &meshes)
        .unwrap();

    for (read_chunk, pair_batch) in [(1, 1), (7, 13), (64, 500), (100_000, 100_000)] {
        let settings = RaycastSettings {
            read_chunk,
            pair_batch,
            ..Default::default()
        };
        let count = BatchedPipeline::new(HostBackend, settings)
            .unwrap()
            .run(&rays, &meshes)
            .unwrap();
        assert_eq!(count, baseline, "read_chunk={read_chunk} pair_batch={pair_batch}");
    }
}

#[test]
fn test_all_strategies_agree_on_misses() {
    // Every ray points up, away from every box.
    let origin = Point3::new(8.5, 8.25, 20.0);
    let rays = Ray::fan(
        origin,
        &[Vec3::new(0.1, 0.2, 1.0), Vec3::new(-1.0, 0.0, 0.5), Vec3::z()],
    );
    let meshes = box_grid();

    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(TaskParallelBruteForce::new(&settings()).unwrap()),
        Box::new(SequentialScan),
        Box::new(CulledParallelScan::new(&settings()).unwrap()),
        Box::new(BatchedPipeline::new(HostBackend, settings()).unwrap()),
    ];
    for strategy in &strategies {
        assert_eq!(strategy.run(&rays, &meshes).unwrap(), 0, "{}", strategy.name());
    }
}

#[cfg(feature = "gpu")]
#[test]
#[ignore = "requires GPU"]
fn test_batched_wgpu_matches_host() {
    let Ok(backend) = insol_raycast::WgpuBackend::init() else {
        return;
    };
    let (rays, meshes) = (ray_fan(), box_grid());

    let device = BatchedPipeline::new(backend, settings()).unwrap();
    let host = BatchedPipeline::new(HostBackend, settings()).unwrap();
    assert_eq!(
        device.run(&rays, &meshes).unwrap(),
        host.run(&rays, &meshes).unwrap()
    );
}
