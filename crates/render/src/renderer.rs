use mansion_kernel::{GridLayout, Layout};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Renderer-agnostic interface, implemented once per kind of state a
/// renderer can draw.
///
/// A renderer reads state and produces output. It never mutates the state;
/// the kernel owns layout truth.
pub trait Renderer<S: ?Sized> {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given state.
    fn render(&self, state: &S) -> Self::Output;
}

/// Plain-text renderer for terminals, logs and tests.
///
/// The grid is drawn as a label table; the scene as a top-down plan showing
/// the topmost block of every occupied column.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer<GridLayout> for TextRenderer {
    type Output = String;

    fn render(&self, grid: &GridLayout) -> String {
        let mut out = String::new();
        let total = GridLayout::coords().count();
        let _ = writeln!(
            out,
            "=== Grid ({}/{} painted) ===",
            grid.painted_count(),
            total
        );
        for row in grid.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|(_, cell)| match cell.kind {
                    Some(kind) => format!("{}{}", kind.label(), cell.rotation.arrow()),
                    None => ". ".to_string(),
                })
                .collect();
            let _ = writeln!(out, "{}", line.join(" ").trim_end());
        }
        out
    }
}

impl Renderer<Layout> for TextRenderer {
    type Output = String;

    fn render(&self, layout: &Layout) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene ({} blocks) ===", layout.len());

        // Topmost block per (x, z) column.
        let mut tops = BTreeMap::new();
        for (pos, block) in layout.iter() {
            let top = tops.entry((pos.z, pos.x)).or_insert((pos.y, block.kind));
            if pos.y >= top.0 {
                *top = (pos.y, block.kind);
            }
        }

        let Some((min_x, max_x)) = min_max(tops.keys().map(|&(_, x)| x)) else {
            let _ = writeln!(out, "(empty)");
            return out;
        };
        let Some((min_z, max_z)) = min_max(tops.keys().map(|&(z, _)| z)) else {
            return out;
        };

        for z in min_z..=max_z {
            let line: Vec<String> = (min_x..=max_x)
                .map(|x| match tops.get(&(z, x)) {
                    Some((y, kind)) => format!("{}{}", kind.label(), y),
                    None => ". ".to_string(),
                })
                .collect();
            let _ = writeln!(out, "{:>4} {}", z, line.join(" ").trim_end());
        }
        out
    }
}

fn min_max(values: impl Iterator<Item = i32>) -> Option<(i32, i32)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mansion_common::{BlockKind, CellCoord, GridPos, Rotation};
    use mansion_kernel::BlockRecord;

    #[test]
    fn blank_grid_is_all_dots() {
        let out = TextRenderer::new().render(&GridLayout::new());
        assert!(out.starts_with("=== Grid (0/80 painted) ==="));
        assert_eq!(out.lines().count(), 9);
        assert!(out.lines().skip(1).all(|l| l.chars().all(|c| c == '.' || c == ' ')));
    }

    #[test]
    fn painted_cell_shows_label_and_arrow() {
        let mut grid = GridLayout::new();
        grid.paint(CellCoord::new(0, 0), BlockKind::Kitchen, Rotation::Deg90)
            .unwrap();
        let out = TextRenderer::new().render(&grid);
        let first_row = out.lines().nth(1).unwrap();
        assert!(first_row.starts_with(&format!("K{}", Rotation::Deg90.arrow())));
        assert!(out.contains("(1/80 painted)"));
    }

    #[test]
    fn scene_plan_shows_top_block_per_column() {
        let mut layout = Layout::new();
        layout
            .place(BlockRecord::new(
                GridPos::new(-5, 1, -5),
                BlockKind::Kitchen,
                Rotation::Deg0,
            ))
            .unwrap();
        let out = TextRenderer::new().render(&layout);
        assert!(out.starts_with("=== Scene (101 blocks) ==="));
        // 10 ground rows, one header.
        assert_eq!(out.lines().count(), 11);
        let first_row = out.lines().nth(1).unwrap();
        assert!(first_row.contains("K1 L0"));
    }

    #[test]
    fn empty_scene() {
        let out = TextRenderer::new().render(&Layout::empty());
        assert!(out.contains("(empty)"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let layout = Layout::new();
        let renderer = TextRenderer::new();
        assert_eq!(renderer.render(&layout), renderer.render(&layout));
    }
}
