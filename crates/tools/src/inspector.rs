use mansion_common::{BlockKind, GridPos, Rotation};
use mansion_kernel::{GridLayout, Layout};
use std::collections::BTreeMap;

/// Read-only queries over scene and grid state, for status panels and the
/// CLI.
pub struct LayoutInspector;

impl LayoutInspector {
    /// Produce a summary of the scene.
    pub fn summary(layout: &Layout) -> LayoutSummary {
        let mut per_kind = BTreeMap::new();
        let mut ground = 0;
        let mut bounds: Option<(GridPos, GridPos)> = None;
        for (pos, block) in layout.iter() {
            *per_kind.entry(block.kind).or_insert(0) += 1;
            if Layout::is_ground(pos) {
                ground += 1;
            }
            bounds = Some(match bounds {
                None => (pos, pos),
                Some((lo, hi)) => (
                    GridPos::new(lo.x.min(pos.x), lo.y.min(pos.y), lo.z.min(pos.z)),
                    GridPos::new(hi.x.max(pos.x), hi.y.max(pos.y), hi.z.max(pos.z)),
                ),
            });
        }
        LayoutSummary {
            blocks: layout.len(),
            ground,
            placed: layout.len() - ground,
            per_kind,
            bounds,
            pending_events: layout.events().len(),
        }
    }

    pub fn grid_summary(grid: &GridLayout) -> GridSummary {
        let painted = grid.painted_count();
        GridSummary {
            painted,
            empty: GridLayout::coords().count() - painted,
        }
    }

    /// Details of the block at `pos`, if any.
    pub fn inspect(layout: &Layout, pos: GridPos) -> Option<BlockInfo> {
        layout.get(pos).map(|block| BlockInfo {
            pos,
            kind: block.kind,
            rotation: block.rotation,
            ground: Layout::is_ground(pos),
        })
    }
}

/// Scene counts for the inspector.
#[derive(Debug, Clone)]
pub struct LayoutSummary {
    pub blocks: usize,
    pub ground: usize,
    pub placed: usize,
    pub per_kind: BTreeMap<BlockKind, usize>,
    /// Smallest and largest coordinate on each axis; `None` when empty.
    pub bounds: Option<(GridPos, GridPos)>,
    pub pending_events: usize,
}

impl std::fmt::Display for LayoutSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: blocks={} ground={} placed={} pending_events={}",
            self.blocks, self.ground, self.placed, self.pending_events
        )?;
        if let Some((lo, hi)) = self.bounds {
            write!(f, " bounds={lo}..{hi}")?;
        }
        for (kind, count) in &self.per_kind {
            write!(f, "\n  {kind}: {count}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSummary {
    pub painted: usize,
    pub empty: usize,
}

impl std::fmt::Display for GridSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grid: painted={} empty={}", self.painted, self.empty)
    }
}

/// Detailed info about a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub pos: GridPos,
    pub kind: BlockKind,
    pub rotation: Rotation,
    pub ground: bool,
}

impl std::fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block {} {} {}", self.pos, self.kind, self.rotation)?;
        if self.ground {
            f.write_str(" (ground)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mansion_common::CellCoord;
    use mansion_kernel::BlockRecord;

    #[test]
    fn summary_fresh_layout() {
        let summary = LayoutInspector::summary(&Layout::new());
        assert_eq!(summary.blocks, 100);
        assert_eq!(summary.ground, 100);
        assert_eq!(summary.placed, 0);
        assert_eq!(summary.per_kind.get(&BlockKind::Lounge), Some(&100));
        assert_eq!(
            summary.bounds,
            Some((GridPos::new(-5, 0, -5), GridPos::new(4, 0, 4)))
        );
        assert_eq!(summary.pending_events, 0);
    }

    #[test]
    fn summary_with_placed_blocks() {
        let mut layout = Layout::new();
        layout
            .place(BlockRecord::new(
                GridPos::new(0, 3, 0),
                BlockKind::Pool,
                Rotation::Deg0,
            ))
            .unwrap();
        // A lounge placed above the ground is not ground.
        layout
            .place(BlockRecord::new(
                GridPos::new(1, 1, 0),
                BlockKind::Lounge,
                Rotation::Deg0,
            ))
            .unwrap();
        let summary = LayoutInspector::summary(&layout);
        assert_eq!(summary.placed, 2);
        assert_eq!(summary.per_kind.get(&BlockKind::Lounge), Some(&101));
        assert_eq!(summary.bounds.unwrap().1.y, 3);
        assert_eq!(summary.pending_events, 2);
    }

    #[test]
    fn summary_empty_layout() {
        let summary = LayoutInspector::summary(&Layout::empty());
        assert_eq!(summary.blocks, 0);
        assert!(summary.bounds.is_none());
    }

    #[test]
    fn grid_summary_counts() {
        let mut grid = GridLayout::new();
        grid.paint(CellCoord::new(1, 1), BlockKind::Cinema, Rotation::Deg0)
            .unwrap();
        let summary = LayoutInspector::grid_summary(&grid);
        assert_eq!(summary, GridSummary { painted: 1, empty: 79 });
        assert_eq!(summary.to_string(), "Grid: painted=1 empty=79");
    }

    #[test]
    fn inspect_block() {
        let layout = Layout::new();
        let info = LayoutInspector::inspect(&layout, GridPos::new(0, 0, 0)).unwrap();
        assert!(info.ground);
        assert_eq!(info.kind, BlockKind::Lounge);
        assert!(info.to_string().ends_with("(ground)"));
        assert!(LayoutInspector::inspect(&layout, GridPos::new(0, 1, 0)).is_none());
    }

    #[test]
    fn summary_display() {
        let summary = LayoutInspector::summary(&Layout::new());
        let s = format!("{summary}");
        assert!(s.starts_with("Scene: blocks=100"));
        assert!(s.contains("lounge: 100"));
    }
}
