//! Grid-to-mesh conversion.
//!
//! Every cell becomes two triangles (six vertices, no index buffer) in a
//! pixel space whose origin is the bottom-left of the surface. The whole grid
//! is rebuilt every frame; empty cells are drawn as spaces so the vertex
//! count only depends on the grid size.

use crate::atlas::GlyphAtlas;
use crate::grid::TerminalGrid;
use termglyph_core::profiling::profile_function;

/// Vertices emitted per grid cell.
pub const VERTICES_PER_CELL: usize = 6;

/// Parallel position and UV streams for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphMesh {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
}

impl GlyphMesh {
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    /// Positions as a flat `x, y, z` sequence.
    pub fn position_data(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    /// UVs as a flat `u, v` sequence.
    pub fn uv_data(&self) -> &[f32] {
        self.uvs.as_flattened()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Builds a [`GlyphMesh`] from a terminal grid and a glyph atlas.
pub struct MeshBuilder;

impl MeshBuilder {
    /// Build the mesh for every cell of `grid`, row-major.
    ///
    /// Terminal row 0 is the top of the screen, so row `r` is placed at
    /// `y0 = (rows - 1 - r) * cell_height`. V runs down the atlas image while
    /// Y runs up the screen, so a quad's top edge (`y1`) takes `v0`.
    pub fn build(grid: &(impl TerminalGrid + ?Sized), atlas: &GlyphAtlas) -> GlyphMesh {
        profile_function!();

        let (columns, rows) = (grid.columns(), grid.rows());
        let cells = columns * rows;
        let mut mesh = GlyphMesh {
            positions: Vec::with_capacity(cells * VERTICES_PER_CELL),
            uvs: Vec::with_capacity(cells * VERTICES_PER_CELL),
        };

        let cell_width = atlas.cell_width() as f32;
        let cell_height = atlas.cell_height() as f32;

        for r in 0..rows {
            let y0 = (rows - 1 - r) as f32 * cell_height;
            let y1 = y0 + cell_height;

            for c in 0..columns {
                let ch = match grid.char_at(c, r) {
                    '\0' => ' ',
                    ch => ch,
                };
                let glyph = atlas.lookup(ch);

                let x0 = c as f32 * cell_width;
                let x1 = x0 + cell_width;

                mesh.positions.extend_from_slice(&[
                    [x0, y1, 0.0],
                    [x0, y0, 0.0],
                    [x1, y1, 0.0],
                    [x0, y0, 0.0],
                    [x1, y0, 0.0],
                    [x1, y1, 0.0],
                ]);
                mesh.uvs.extend_from_slice(&[
                    [glyph.u0, glyph.v0],
                    [glyph.u0, glyph.v1],
                    [glyph.u1, glyph.v0],
                    [glyph.u0, glyph.v1],
                    [glyph.u1, glyph.v1],
                    [glyph.u1, glyph.v0],
                ]);
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSnapshot;
    use crate::testing::BlockRasterizer;

    /// 16 px font with 4 px padding: 20 px cells.
    fn atlas() -> GlyphAtlas {
        GlyphAtlas::new(16, 4, &mut BlockRasterizer).unwrap()
    }

    fn cell(mesh: &GlyphMesh, index: usize) -> &[[f32; 3]] {
        &mesh.positions()[index * VERTICES_PER_CELL..(index + 1) * VERTICES_PER_CELL]
    }

    fn cell_uvs(mesh: &GlyphMesh, index: usize) -> &[[f32; 2]] {
        &mesh.uvs()[index * VERTICES_PER_CELL..(index + 1) * VERTICES_PER_CELL]
    }

    #[test]
    fn test_output_lengths() {
        let atlas = atlas();
        for (columns, rows) in [(0, 0), (0, 5), (5, 0), (1, 1), (80, 24), (7, 3)] {
            let mesh = MeshBuilder::build(&GridSnapshot::new(columns, rows), &atlas);
            assert_eq!(mesh.position_data().len(), columns * rows * 6 * 3);
            assert_eq!(mesh.uv_data().len(), columns * rows * 6 * 2);
            assert_eq!(mesh.vertex_count(), columns * rows * 6);
        }
    }

    #[test]
    fn test_empty_grid_produces_empty_mesh() {
        let mesh = MeshBuilder::build(&GridSnapshot::new(0, 24), &atlas());
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_cell_mapping_80x24() {
        let grid = GridSnapshot::new(80, 24);
        let mesh = MeshBuilder::build(&grid, &atlas());

        // Top-left character sits at the top of the screen.
        let top_left = cell(&mesh, 0);
        assert_eq!(top_left[1], [0.0, 460.0, 0.0]);
        assert_eq!(top_left[0], [0.0, 480.0, 0.0]);

        // Bottom-left character sits at the bottom.
        let bottom_left = cell(&mesh, 23 * 80);
        assert_eq!(bottom_left[1], [0.0, 0.0, 0.0]);
        assert_eq!(bottom_left[0], [0.0, 20.0, 0.0]);

        for r in 0..24 {
            for c in 0..80 {
                let quad = cell(&mesh, r * 80 + c);
                let (x0, y0) = (c as f32 * 20.0, (23 - r) as f32 * 20.0);
                assert_eq!(quad[3], [x0, y0, 0.0]);
                assert_eq!(quad[5], [x0 + 20.0, y0 + 20.0, 0.0]);
            }
        }
    }

    #[test]
    fn test_two_cell_scenario() {
        let atlas = atlas();
        let grid = GridSnapshot::from_lines(2, 1, ["AB"]);
        let mesh = MeshBuilder::build(&grid, &atlas);

        assert_eq!(mesh.vertex_count(), 12);

        let a = cell(&mesh, 0);
        let b = cell(&mesh, 1);
        assert!(a.iter().all(|p| p[0] == 0.0 || p[0] == 20.0));
        assert!(b.iter().all(|p| p[0] == 20.0 || p[0] == 40.0));
        for p in a.iter().chain(b) {
            assert!(p[1] == 0.0 || p[1] == 20.0);
            assert_eq!(p[2], 0.0);
        }

        let glyph_a = atlas.lookup('A');
        assert_eq!(cell_uvs(&mesh, 0)[0], [glyph_a.u0, glyph_a.v0]);
        let glyph_b = atlas.lookup('B');
        assert_eq!(cell_uvs(&mesh, 1)[4], [glyph_b.u1, glyph_b.v1]);
    }

    #[test]
    fn test_null_renders_as_space() {
        let atlas = atlas();
        let mut grid = GridSnapshot::new(2, 1);
        grid.set(1, 0, ' ');
        let mesh = MeshBuilder::build(&grid, &atlas);

        assert_eq!(cell_uvs(&mesh, 0), cell_uvs(&mesh, 1));
        let space = atlas.lookup(' ');
        assert_eq!(cell_uvs(&mesh, 0)[0], [space.u0, space.v0]);
    }

    #[test]
    fn test_rebuild_is_bit_identical() {
        let atlas = atlas();
        let grid = GridSnapshot::from_lines(10, 3, ["hello", "world", "\u{2603}!"]);
        let first = MeshBuilder::build(&grid, &atlas);
        let second = MeshBuilder::build(&grid, &atlas);

        let bits = |data: &[f32]| data.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(first.position_data()), bits(second.position_data()));
        assert_eq!(bits(first.uv_data()), bits(second.uv_data()));
    }

    #[test]
    fn test_triangles_wind_counter_clockwise() {
        let mesh = MeshBuilder::build(&GridSnapshot::from_lines(3, 2, ["abc", "def"]), &atlas());
        for tri in mesh.positions().chunks_exact(3) {
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0, "clockwise triangle {tri:?}");
        }
    }

    #[test]
    fn test_uv_follows_screen_orientation() {
        let atlas = atlas();
        let mesh = MeshBuilder::build(&GridSnapshot::from_lines(1, 1, ["x"]), &atlas);
        let glyph = atlas.lookup('x');

        // Image rows are stored top first, so the screen-top edge samples v0
        // and the screen-bottom edge v1. Left and right map to u0 and u1.
        for (p, uv) in mesh.positions().iter().zip(mesh.uvs()) {
            let expected_v = if p[1] == 20.0 { glyph.v0 } else { glyph.v1 };
            let expected_u = if p[0] == 0.0 { glyph.u0 } else { glyph.u1 };
            assert_eq!(*uv, [expected_u, expected_v], "vertex {p:?}");
        }
    }
}
