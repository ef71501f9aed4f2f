use mansion_common::{BlockKind, CellCoord, GridPos};

/// A high-level editor action any input surface can produce.
///
/// The editor session consumes actions, never raw input events, so the
/// toolbar, the keyboard, touch buttons and the CLI share one code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Choose the block type new blocks are made of.
    SelectKind(BlockKind),
    /// Advance the orientation for new blocks by a quarter turn.
    Rotate,
    /// Add a block to the scene at a coordinate.
    PlaceAt(GridPos),
    /// Remove the scene block at a coordinate.
    RemoveAt(GridPos),
    /// Overwrite a grid cell with the selected type and orientation.
    PaintCell(CellCoord),
    /// Clear the scene back to the bare ground layer.
    ResetScene,
    /// Blank every grid cell.
    ResetGrid,
    SaveScene,
    LoadScene,
    SaveGrid,
    LoadGrid,
    /// Flip between light and dark.
    ToggleTheme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_kind_carries_kind() {
        let a = Action::SelectKind(BlockKind::Kitchen);
        assert!(matches!(a, Action::SelectKind(BlockKind::Kitchen)));
    }
}
