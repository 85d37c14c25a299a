use std::time::Instant;

use glam::Vec3;
use voxdraw_core::config::DrawConfig;
use voxdraw_core::constants::INDICES_PER_QUAD;
use voxdraw_core::error::DrawError;
use voxdraw_world::{ChunkMesh, DrawWorld};

use crate::scenes::{self, SceneConfig};

/// Timing data for a single benchmark stage.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub chunk_count: u32,
    pub quad_count: u32,
    pub draw_count: u32,
    pub iterations: u32,
    /// Encoding plus heap placement of every chunk.
    pub upload: TimingSeries,
    /// One full draw-list build.
    pub build: TimingSeries,
}

/// Runs CPU-side benchmarks of the upload and draw-list paths.
pub struct BenchmarkRunner {
    iterations: u32,
}

impl BenchmarkRunner {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, DrawError> {
        log::info!(
            "Running scene '{}' ({} chunks, {:?})...",
            config.name,
            config.grid_side * config.grid_side,
            config.format
        );

        let coords = scenes::scene_coords(config);
        let meshes: Vec<ChunkMesh> = coords
            .iter()
            .enumerate()
            .map(|(i, &coord)| {
                scenes::generate_bench_mesh(i as u32, coord, config.max_height, config.format)
            })
            .collect();

        let vertex_total: usize = meshes.iter().map(ChunkMesh::vertex_count).sum();
        let index_total: usize = meshes.iter().map(ChunkMesh::index_count).sum();

        // Heaps sized to the scene so re-uploads never exhaust them.
        let draw_config = DrawConfig {
            format: config.format,
            use_index_map: config.use_index_map,
            draw_order: config.draw_order,
            vertex_capacity: (vertex_total as u32).max(1),
            index_capacity: (index_total as u32).max(1),
            ..Default::default()
        };
        let mut world = DrawWorld::new(draw_config)?;

        let eye = Vec3::from_array(config.camera_position);
        let mut upload_times = Vec::with_capacity(self.iterations as usize);
        let mut build_times = Vec::with_capacity(self.iterations as usize);
        let mut draw_count = 0;

        for _ in 0..self.iterations {
            let start = Instant::now();
            for (coord, mesh) in coords.iter().zip(&meshes) {
                world.upload_chunk(*coord, mesh)?;
            }
            upload_times.push(start.elapsed().as_secs_f64() * 1000.0);

            let start = Instant::now();
            let list = world.build_all(eye);
            build_times.push(start.elapsed().as_secs_f64() * 1000.0);
            draw_count = list.draw_count();
        }

        let upload = compute_timings(&upload_times);
        let build = compute_timings(&build_times);
        log::info!(
            "  Done: upload mean={:.2}ms, build mean={:.3}ms p99={:.3}ms",
            upload.mean_ms,
            build.mean_ms,
            build.p99_ms
        );

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            chunk_count: coords.len() as u32,
            quad_count: (index_total / INDICES_PER_QUAD as usize) as u32,
            draw_count,
            iterations: self.iterations,
            upload,
            build,
        })
    }
}

/// Compute timing statistics from a list of times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxdraw_core::types::{DrawOrder, FormatVersion};

    #[test]
    fn test_timings_of_empty_series() {
        let t = compute_timings(&[]);
        assert_eq!(t.mean_ms, 0.0);
        assert_eq!(t.max_ms, 0.0);
    }

    #[test]
    fn test_timings_statistics() {
        let times: Vec<f64> = (1..=100).rev().map(|i| i as f64).collect();
        let t = compute_timings(&times);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 100.0);
        assert_eq!(t.median_ms, 50.5);
        assert_eq!(t.mean_ms, 50.5);
        assert_eq!(t.p95_ms, 96.0);
        assert_eq!(t.p99_ms, 100.0);
    }

    #[test]
    fn test_run_small_scene() {
        let scene = SceneConfig {
            name: "tiny",
            grid_side: 2,
            max_height: 4,
            format: FormatVersion::CornerBit,
            use_index_map: true,
            draw_order: DrawOrder::FrontToBack,
            camera_position: [0.0, 16.0, 0.0],
        };
        let result = BenchmarkRunner::new(2).run_scene(&scene).expect("scene fits");
        assert_eq!(result.chunk_count, 4);
        assert_eq!(result.iterations, 2);
        // Up plus four walls per chunk
        assert_eq!(result.draw_count, 20);
        assert!(result.quad_count >= 4 * 32 * 32);
    }
}
