//! World grid: a square array of chunks around the origin
//!
//! Cell `(cx, cz)` lives at index `cx + cz * world_size` and maps to chunk
//! coordinate `(cx - world_size / 2, cz - world_size / 2)`. Its LOD is the
//! Chebyshev distance from the center cell. The whole grid is meshed once,
//! eagerly; each chunk build only reads the shared generator, so builds may
//! run on the rayon pool.

use std::time::Instant;

use rayon::prelude::*;

use crate::config::MeshConfig;
use crate::constants::camera_constants::{CULL_FOV_FRACTION, CULL_PULLBACK};

use super::chunk::Chunk;
use super::generation::TerrainGenerator;
use super::mesher::ChunkMesher;

/// Integer chunk coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Signed offset of a grid cell from the center cell
pub fn cell_offset(cell: u32, world_size: u32) -> i32 {
    cell as i32 - (world_size / 2) as i32
}

/// LOD for a grid cell: Chebyshev distance from the center cell
pub fn chunk_lod(cx: u32, cz: u32, world_size: u32) -> u32 {
    let dx = cell_offset(cx, world_size).unsigned_abs();
    let dz = cell_offset(cz, world_size).unsigned_abs();
    dx.max(dz)
}

/// Eagerly meshed square grid of chunks
#[derive(Debug)]
pub struct WorldGrid {
    world_size: u32,
    chunks: Vec<Chunk>,
}

impl WorldGrid {
    /// Mesh every chunk of a `world_size x world_size` grid centered on `center`
    pub fn build(
        generator: &TerrainGenerator,
        mesh_config: MeshConfig,
        world_size: u32,
        center: ChunkCoord,
        parallel: bool,
    ) -> Self {
        let start = Instant::now();
        let cell_count = (world_size as usize) * (world_size as usize);
        log::info!(
            "[WorldGrid::build] Building {}x{} chunks ({} total, {})",
            world_size,
            world_size,
            cell_count,
            if parallel { "parallel" } else { "serial" }
        );

        let mesher = ChunkMesher::new(generator, mesh_config);
        let build_cell = |index: usize| {
            let cx = (index % world_size as usize) as u32;
            let cz = (index / world_size as usize) as u32;
            let origin_x = center.x + cell_offset(cx, world_size);
            let origin_z = center.z + cell_offset(cz, world_size);
            mesher.build_chunk(
                origin_x as f32,
                origin_z as f32,
                chunk_lod(cx, cz, world_size),
            )
        };

        let chunks: Vec<Chunk> = if parallel {
            (0..cell_count).into_par_iter().map(build_cell).collect()
        } else {
            (0..cell_count).map(build_cell).collect()
        };

        let grid = Self {
            world_size,
            chunks,
        };

        let empty = grid.chunks.iter().filter(|chunk| chunk.is_empty()).count();
        if empty > 0 {
            log::warn!("[WorldGrid::build] {} chunks have no geometry", empty);
        }
        log::info!(
            "[WorldGrid::build] Built {} chunks, {} vertices in {:.2?}",
            grid.chunks.len(),
            grid.total_vertices(),
            start.elapsed()
        );

        grid
    }

    pub fn world_size(&self) -> u32 {
        self.world_size
    }

    /// Chunk for grid cell `(cx, cz)`
    pub fn chunk(&self, cx: u32, cz: u32) -> Option<&Chunk> {
        if cx >= self.world_size || cz >= self.world_size {
            return None;
        }
        self.chunks
            .get(cx as usize + cz as usize * self.world_size as usize)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn total_vertices(&self) -> usize {
        self.chunks.iter().map(Chunk::vertex_count).sum()
    }
}

/// Whether a chunk should be drawn this frame
///
/// Distance test on the XZ plane against `view_distance`, then a bearing
/// test: the direction from the chunk center to a point pulled back behind
/// the camera must lie within `fov * 0.667` degrees of the camera yaw.
/// Pulling the reference point back keeps chunks around the camera visible.
/// Yaw 0 looks down -Z.
pub fn is_chunk_visible(
    chunk_center: [f32; 2],
    camera_position: [f32; 3],
    yaw_degrees: f32,
    fov_degrees: f32,
    view_distance: f32,
) -> bool {
    let [cx, cz] = chunk_center;
    let dx = cx - camera_position[0];
    let dz = cz - camera_position[2];
    if dx * dx + dz * dz > view_distance * view_distance {
        return false;
    }

    let (sin_yaw, cos_yaw) = yaw_degrees.to_radians().sin_cos();
    let px = camera_position[0] + sin_yaw * CULL_PULLBACK;
    let pz = camera_position[2] + cos_yaw * CULL_PULLBACK;

    let bearing = (px - cx).atan2(pz - cz).to_degrees();
    let angle_diff = (yaw_degrees - bearing + 180.0).rem_euclid(360.0) - 180.0;
    let limit = fov_degrees * CULL_FOV_FRACTION;

    angle_diff.abs() <= limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::{BiomePalette, FbmField, HeightShaper};

    fn tiny_mesh() -> MeshConfig {
        MeshConfig {
            half_extent: 10.0,
            base_step: 5.0,
            ..MeshConfig::default()
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
    fn test_lod_assignment_5x5() {
        assert_eq!(chunk_lod(2, 2, 5), 0);
        // Edge midpoints
        assert_eq!(chunk_lod(2, 0, 5), 2);
        assert_eq!(chunk_lod(0, 2, 5), 2);
        assert_eq!(chunk_lod(4, 2, 5), 2);
        assert_eq!(chunk_lod(2, 4, 5), 2);
        // Corners
        assert_eq!(chunk_lod(0, 0, 5), 2);
        assert_eq!(chunk_lod(4, 4, 5), 2);
        assert_eq!(chunk_lod(0, 4, 5), 2);
        // Inner ring
        assert_eq!(chunk_lod(1, 3, 5), 1);
        assert_eq!(chunk_lod(3, 2, 5), 1);
    }

    #[test]
    fn test_lod_monotonic_with_distance() {
        let size = 9;
        for cz in 0..size {
            for cx in 0..size {
                let dx = cell_offset(cx, size).abs();
                let dz = cell_offset(cz, size).abs();
                assert_eq!(chunk_lod(cx, cz, size) as i32, dx.max(dz));
            }
        }
    }

    #[test]
    fn test_grid_layout_and_origins() {
        let generator = generator();
        let grid = WorldGrid::build(&generator, tiny_mesh(), 5, ChunkCoord::default(), false);

        assert_eq!(grid.chunks().len(), 25);
        for cz in 0..5 {
            for cx in 0..5 {
                let chunk = grid.chunk(cx, cz).expect("cell in range");
                assert_eq!(chunk.origin(), ((cx as f32) - 2.0, (cz as f32) - 2.0));
                assert_eq!(chunk.lod(), chunk_lod(cx, cz, 5));
            }
        }
        assert!(grid.chunk(5, 0).is_none());
    }

    #[test]
    fn test_parallel_build_matches_serial() {
        let generator = generator();
        let serial = WorldGrid::build(&generator, tiny_mesh(), 3, ChunkCoord::new(4, -1), false);
        let parallel = WorldGrid::build(&generator, tiny_mesh(), 3, ChunkCoord::new(4, -1), true);
        assert_eq!(serial.chunks(), parallel.chunks());
        assert_eq!(serial.chunk(1, 1).map(Chunk::origin), Some((4.0, -1.0)));
    }

    #[test]
    fn test_visibility_ahead_behind_and_far() {
        let camera = [0.0, 5.0, 0.0];
        // Yaw 0 looks down -Z
        assert!(is_chunk_visible([0.0, -100.0], camera, 0.0, 120.0, 750.0));
        assert!(!is_chunk_visible([0.0, 100.0], camera, 0.0, 120.0, 750.0));
        assert!(!is_chunk_visible([0.0, -800.0], camera, 0.0, 120.0, 750.0));
        // Turning around flips the result
        assert!(is_chunk_visible([0.0, 100.0], camera, 180.0, 120.0, 750.0));
        // The chunk under the camera is always drawn
        assert!(is_chunk_visible([0.0, 0.0], camera, 37.0, 120.0, 750.0));
    }
}
