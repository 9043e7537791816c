use crate::config::MeshConfig;
use crate::renderer::Vertex;

/// One square region of terrain with its generated mesh
///
/// Vertices are unindexed triangles, six per grid cell. A chunk is never
/// modified after the mesher returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    origin_x: f32,
    origin_z: f32,
    lod: u32,
    vertices: Vec<Vertex>,
}

impl Chunk {
    pub fn new(origin_x: f32, origin_z: f32, lod: u32, vertices: Vec<Vertex>) -> Self {
        Self {
            origin_x,
            origin_z,
            lod,
            vertices,
        }
    }

    /// Geometry-less chunk used when mesh allocation fails
    pub fn empty(origin_x: f32, origin_z: f32, lod: u32) -> Self {
        Self::new(origin_x, origin_z, lod, Vec::new())
    }

    /// Chunk coordinate (in chunks, not world units)
    pub fn origin(&self) -> (f32, f32) {
        (self.origin_x, self.origin_z)
    }

    pub fn lod(&self) -> u32 {
        self.lod
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Center of the chunk on the XZ plane in render units
    pub fn render_center(&self, config: &MeshConfig) -> [f32; 2] {
        let chunk_size = config.chunk_size() * config.world_scale;
        [self.origin_x * chunk_size, self.origin_z * chunk_size]
    }
}
