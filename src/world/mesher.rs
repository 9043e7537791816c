//! Height-field chunk mesher
//!
//! Grid convention: a chunk spans `[-half_extent, half_extent]` on both axes
//! around its world origin. Grid line `i` sits at `-half_extent + i * step`
//! for `i < cells`, and the last line (`i == cells`) is pinned to
//! `half_extent`, so the final cell may be narrower than `step` but the outer
//! edge never leaves a gap. `cells = ceil(2 * half_extent / step)`, giving
//! `cells + 1` grid lines per axis and `6 * cells^2` vertices.
//!
//! Neighbouring chunks at different LODs do not share interior grid lines,
//! so their shared edge can show small seams.

use crate::config::MeshConfig;
use crate::constants::mesh::VERTICES_PER_CELL;
use crate::renderer::Vertex;

use super::chunk::Chunk;
use super::generation::TerrainGenerator;

/// Grid spacing for a LOD tier: `base_step * growth_factor^min(lod, max_lod)`
pub fn lod_step(config: &MeshConfig, lod: u32) -> f32 {
    let tier = lod.min(config.max_lod);
    config.base_step * config.growth_factor.powi(tier as i32)
}

/// Cells along one axis of a chunk
pub fn cells_per_axis(half_extent: f32, step: f32) -> usize {
    ((2.0 * half_extent) / step).ceil() as usize
}

/// Closed-form vertex count for a chunk, `None` on overflow
pub fn vertex_count(half_extent: f32, step: f32) -> Option<usize> {
    let cells = cells_per_axis(half_extent, step);
    cells
        .checked_mul(cells)
        .and_then(|n| n.checked_mul(VERTICES_PER_CELL))
}

/// Local coordinate of grid line `index`, last line clamped to the edge
pub fn grid_line(index: usize, cells: usize, half_extent: f32, step: f32) -> f32 {
    if index >= cells {
        half_extent
    } else {
        (-half_extent + index as f32 * step).min(half_extent)
    }
}

/// Builds chunk meshes from a terrain generator
///
/// Holds only shared references and copies, so one mesher can serve
/// parallel chunk builds.
#[derive(Clone, Copy)]
pub struct ChunkMesher<'a> {
    generator: &'a TerrainGenerator,
    config: MeshConfig,
}

impl<'a> ChunkMesher<'a> {
    pub fn new(generator: &'a TerrainGenerator, config: MeshConfig) -> Self {
        Self { generator, config }
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// Mesh the chunk at chunk coordinate `(origin_x, origin_z)`
    ///
    /// Heights are sampled once per grid point: the previous row of samples
    /// is carried forward as the lower edge of the next row of cells. If the
    /// vertex buffer cannot be allocated the chunk comes back empty.
    pub fn build_chunk(&self, origin_x: f32, origin_z: f32, lod: u32) -> Chunk {
        let half_extent = self.config.half_extent;
        let step = lod_step(&self.config, lod);
        let cells = cells_per_axis(half_extent, step);

        let count = match vertex_count(half_extent, step) {
            Some(count) => count,
            None => {
                log::warn!(
                    "[ChunkMesher::build_chunk] Vertex count overflow for chunk ({}, {}) at step {}, leaving it empty",
                    origin_x, origin_z, step
                );
                return Chunk::empty(origin_x, origin_z, lod);
            }
        };

        let mut vertices: Vec<Vertex> = Vec::new();
        if let Err(e) = vertices.try_reserve_exact(count) {
            log::warn!(
                "[ChunkMesher::build_chunk] Failed to allocate {} vertices for chunk ({}, {}): {}, leaving it empty",
                count, origin_x, origin_z, e
            );
            return Chunk::empty(origin_x, origin_z, lod);
        }

        let chunk_size = self.config.chunk_size();
        let base_x = origin_x * chunk_size;
        let base_z = origin_z * chunk_size;

        let lines: Vec<f32> = (0..=cells)
            .map(|i| grid_line(i, cells, half_extent, step))
            .collect();

        let sample_row = |z: f32| -> Vec<f32> {
            lines
                .iter()
                .map(|&x| self.generator.height(base_x + x, base_z + z))
                .collect()
        };

        let mut lower = sample_row(lines[0]);
        for row in 0..cells {
            let z0 = lines[row];
            let z1 = lines[row + 1];
            let upper = sample_row(z1);

            for col in 0..cells {
                let x0 = lines[col];
                let x1 = lines[col + 1];

                let top_left = self.vertex(base_x + x0, base_z + z1, upper[col]);
                let top_right = self.vertex(base_x + x1, base_z + z1, upper[col + 1]);
                let bottom_left = self.vertex(base_x + x0, base_z + z0, lower[col]);
                let bottom_right = self.vertex(base_x + x1, base_z + z0, lower[col + 1]);

                // Counter-clockwise when viewed from above
                vertices.extend_from_slice(&[
                    top_left,
                    top_right,
                    bottom_left,
                    bottom_left,
                    top_right,
                    bottom_right,
                ]);
            }

            lower = upper;
        }

        log::debug!(
            "[ChunkMesher::build_chunk] Chunk ({}, {}) lod {} step {:.2}: {} vertices",
            origin_x,
            origin_z,
            lod,
            step,
            vertices.len()
        );

        Chunk::new(origin_x, origin_z, lod, vertices)
    }

    /// Vertex at a world position with its raw height
    fn vertex(&self, world_x: f32, world_z: f32, height: f32) -> Vertex {
        let scale = self.config.world_scale;
        Vertex::new(
            [
                scale * world_x,
                self.generator.noise_mod(height),
                scale * world_z,
            ],
            self.generator.color(height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::{BiomePalette, FbmField, HeightShaper};

    fn small_config() -> MeshConfig {
        MeshConfig {
            base_step: 5.0,
            growth_factor: 1.75,
            max_lod: 8,
            half_extent: 10.0,
            world_scale: 0.01,
        }
    }

    fn generator() -> TerrainGenerator {
        TerrainGenerator::new(
            Box::new(FbmField::new(0, 0.0005, 6)),
            HeightShaper::default(),
            BiomePalette::default(),
        )
    }

    #[test]
    fn test_lod_step_growth_and_cap() {
        let config = MeshConfig::default();
        assert_eq!(lod_step(&config, 0), 5.0);
        assert!((lod_step(&config, 1) - 8.75).abs() < 1e-5);
        assert!((lod_step(&config, 2) - 15.3125).abs() < 1e-4);
        assert_eq!(lod_step(&config, 8), lod_step(&config, 9));
        assert_eq!(lod_step(&config, 8), lod_step(&config, 60));
    }

    #[test]
    fn test_closed_form_counts() {
        // Even division: 2000 / 5 = 400 cells
        assert_eq!(cells_per_axis(1000.0, 5.0), 400);
        assert_eq!(vertex_count(1000.0, 5.0), Some(6 * 400 * 400));

        // Uneven division: 20 / 3 = 6.67 -> 7 cells, last one narrower
        assert_eq!(cells_per_axis(10.0, 3.0), 7);
        assert_eq!(vertex_count(10.0, 3.0), Some(294));

        // Step wider than the chunk still yields one cell
        assert_eq!(cells_per_axis(10.0, 50.0), 1);
        assert_eq!(vertex_count(10.0, 50.0), Some(6));
    }

    #[test]
    fn test_grid_lines_are_boundary_inclusive() {
        let cells = cells_per_axis(10.0, 3.0);
        assert_eq!(grid_line(0, cells, 10.0, 3.0), -10.0);
        assert_eq!(grid_line(1, cells, 10.0, 3.0), -7.0);
        assert_eq!(grid_line(6, cells, 10.0, 3.0), 8.0);
        assert_eq!(grid_line(cells, cells, 10.0, 3.0), 10.0);
    }

    #[test]
    fn test_vertex_count_matches_closed_form_for_every_lod() {
        let generator = generator();
        let mut config = small_config();
        config.half_extent = 40.0;
        let mesher = ChunkMesher::new(&generator, config);
        for lod in 0..=10 {
            let chunk = mesher.build_chunk(1.0, -2.0, lod);
            let expected = vertex_count(config.half_extent, lod_step(&config, lod));
            assert_eq!(Some(chunk.vertex_count()), expected, "lod {}", lod);
            assert_eq!(chunk.vertex_count() % 6, 0);
            assert_eq!(chunk.lod(), lod);
        }
    }

    #[test]
    fn test_first_triangle_matches_noise_formula() {
        let generator = generator();
        let config = small_config();
        let scale = config.world_scale;
        let mesher = ChunkMesher::new(&generator, config);
        let chunk = mesher.build_chunk(0.0, 0.0, 0);

        // Cell (0, 0) spans x, z in [-10, -5]
        let h_tl = generator.height(-10.0, -5.0);
        let h_tr = generator.height(-5.0, -5.0);
        let h_bl = generator.height(-10.0, -10.0);

        let first = &chunk.vertices()[..3];

        // First corner worked out from the raw formulas: six octaves of
        // fract(sin(ix * 12.9898 + iz * 78.233) * 43758.5453) value noise,
        // then the mid/cliff/valley shaping at vertical scale 10.
        let hash = |ix: f64, iz: f64| {
            let v = (ix * 12.9898 + iz * 78.233).sin() * 43758.5453;
            v - v.floor()
        };
        let smooth = |t: f64| t * t * (3.0 - 2.0 * t);
        let value = |x: f64, z: f64| {
            let (x0, z0) = (x.floor(), z.floor());
            let (u, v) = (smooth(x - x0), smooth(z - z0));
            let bottom = hash(x0, z0) + (hash(x0 + 1.0, z0) - hash(x0, z0)) * u;
            let top = hash(x0, z0 + 1.0) + (hash(x0 + 1.0, z0 + 1.0) - hash(x0, z0 + 1.0)) * u;
            bottom + (top - bottom) * v
        };
        let scale_in = 0.0005_f32 as f64;
        let raw: f64 = (0..6)
            .map(|i| {
                let frequency = scale_in * 2f64.powi(i);
                0.5f64.powi(i + 1) * value(-10.0 * frequency, -5.0 * frequency)
            })
            .sum();
        let shaped = if raw > 0.6 {
            let mut y = 0.6 + (1.0 + (raw - 0.6) * 4.0).ln() / 4.0;
            if raw > 0.7 {
                y += (raw - 0.7) * 0.5;
            }
            y
        } else if raw < 0.25 {
            0.25 * (raw / 0.25).powf(1.0 / 0.9)
        } else {
            raw
        };
        assert!((h_tl as f64 - raw).abs() < 1e-6, "height {} vs {}", h_tl, raw);
        assert!((first[0].position[1] as f64 - shaped * 10.0).abs() < 1e-4);

        assert_eq!(first[0].position, [scale * -10.0, generator.noise_mod(h_tl), scale * -5.0]);
        assert_eq!(first[1].position, [scale * -5.0, generator.noise_mod(h_tr), scale * -5.0]);
        assert_eq!(first[2].position, [scale * -10.0, generator.noise_mod(h_bl), scale * -10.0]);
        assert_eq!(first[0].color, generator.color(h_tl));
        assert_eq!(first[1].color, generator.color(h_tr));
        assert_eq!(first[2].color, generator.color(h_bl));
    }

    #[test]
    fn test_row_reuse_matches_direct_sampling() {
        let generator = generator();
        let config = MeshConfig {
            half_extent: 13.0,
            ..small_config()
        };
        let mesher = ChunkMesher::new(&generator, config);
        let chunk = mesher.build_chunk(-3.0, 2.0, 1);

        // Reference: every cell samples its own four corners
        let step = lod_step(&config, 1);
        let cells = cells_per_axis(config.half_extent, step);
        let base_x = -3.0 * config.chunk_size();
        let base_z = 2.0 * config.chunk_size();
        let corner = |x: f32, z: f32| {
            let world_x = base_x + x;
            let world_z = base_z + z;
            let h = generator.height(world_x, world_z);
            Vertex::new(
                [
                    config.world_scale * world_x,
                    generator.noise_mod(h),
                    config.world_scale * world_z,
                ],
                generator.color(h),
            )
        };

        let mut expected = Vec::new();
        for row in 0..cells {
            for col in 0..cells {
                let x0 = grid_line(col, cells, config.half_extent, step);
                let x1 = grid_line(col + 1, cells, config.half_extent, step);
                let z0 = grid_line(row, cells, config.half_extent, step);
                let z1 = grid_line(row + 1, cells, config.half_extent, step);
                expected.extend_from_slice(&[
                    corner(x0, z1),
                    corner(x1, z1),
                    corner(x0, z0),
                    corner(x0, z0),
                    corner(x1, z1),
                    corner(x1, z0),
                ]);
            }
        }

        assert_eq!(chunk.vertices(), expected.as_slice());
    }

    #[test]
    fn test_triangles_face_up() {
        let generator = generator();
        let mesher = ChunkMesher::new(&generator, small_config());
        let chunk = mesher.build_chunk(0.0, 0.0, 0);

        for tri in chunk.vertices().chunks(3) {
            let (a, b, c) = (tri[0].position, tri[1].position, tri[2].position);
            // Y component of (b - a) x (c - a)
            let normal_y = (b[2] - a[2]) * (c[0] - a[0]) - (b[0] - a[0]) * (c[2] - a[2]);
            assert!(normal_y > 0.0, "triangle {:?} is wound clockwise", tri);
        }
    }

    #[test]
    fn test_overflowing_chunk_is_empty() {
        let generator = generator();
        let config = MeshConfig {
            half_extent: 1.0e9,
            base_step: 0.001,
            ..small_config()
        };
        let mesher = ChunkMesher::new(&generator, config);
        let chunk = mesher.build_chunk(0.0, 0.0, 0);
        assert!(chunk.is_empty());
        assert_eq!(chunk.vertex_count(), 0);
    }
}
