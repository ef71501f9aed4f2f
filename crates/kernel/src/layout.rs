use mansion_common::{BlockKind, CellCoord, GridPos, Rotation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ground layer extent on X and Z: `GROUND_MIN..GROUND_MAX` at y = 0.
pub const GROUND_MIN: i32 = -5;
pub const GROUND_MAX: i32 = 5;

/// The persisted unit of scene state.
///
/// Field names match the saved JSON (`{"x":0,"y":0,"z":0,"type":"lounge","rotation":0}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub rotation: Rotation,
}

impl BlockRecord {
    pub fn new(pos: GridPos, kind: BlockKind, rotation: Rotation) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            kind,
            rotation,
        }
    }

    pub fn pos(&self) -> GridPos {
        GridPos::new(self.x, self.y, self.z)
    }

    fn block(&self) -> Block {
        Block {
            kind: self.kind,
            rotation: self.rotation,
        }
    }
}

/// What occupies a scene coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub rotation: Rotation,
}

/// An event record produced by every mutation of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    /// A block was added.
    Placed(BlockRecord),
    /// A block was taken away. Carries what it was.
    Removed(BlockRecord),
    /// Everything was cleared and the ground regenerated.
    Reset { ground: usize },
    /// The whole layout was replaced from saved records.
    Restored { count: usize },
}

/// Errors from layout and grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("a block already occupies {0}")]
    Occupied(GridPos),
    #[error("no block at {0}")]
    NotFound(GridPos),
    #[error("{0} is part of the ground layer and cannot be removed")]
    Protected(GridPos),
    #[error("more than one record for {0}")]
    DuplicatePosition(GridPos),
    #[error("more than one record for cell {0}")]
    DuplicateCell(CellCoord),
    #[error("cell {0} is outside the grid")]
    OutOfBounds(CellCoord),
}

/// The authoritative 3D scene layout.
///
/// Blocks are keyed by coordinate, so "one block per position" holds by
/// construction. `BTreeMap` gives deterministic iteration and a stable
/// save order.
#[derive(Debug, Clone)]
pub struct Layout {
    blocks: BTreeMap<GridPos, Block>,
    /// Append-only log of mutations since the last drain.
    event_log: Vec<LayoutEvent>,
}

impl Layout {
    /// A fresh layout holding only the ground layer.
    pub fn new() -> Self {
        let mut layout = Self::empty();
        layout.reset();
        layout.event_log.clear();
        layout
    }

    /// A layout with no blocks at all, not even ground.
    pub fn empty() -> Self {
        Self {
            blocks: BTreeMap::new(),
            event_log: Vec::new(),
        }
    }

    /// Whether `pos` belongs to the protected ground layer.
    pub fn is_ground(pos: GridPos) -> bool {
        pos.y == 0
            && (GROUND_MIN..GROUND_MAX).contains(&pos.x)
            && (GROUND_MIN..GROUND_MAX).contains(&pos.z)
    }

    /// Every ground position, in X-major order.
    pub fn ground_positions() -> impl Iterator<Item = GridPos> {
        (GROUND_MIN..GROUND_MAX)
            .flat_map(|x| (GROUND_MIN..GROUND_MAX).map(move |z| GridPos::new(x, 0, z)))
    }

    /// Clear every block and regenerate the ground layer.
    pub fn reset(&mut self) {
        self.blocks.clear();
        for pos in Self::ground_positions() {
            self.blocks.insert(
                pos,
                Block {
                    kind: BlockKind::GROUND,
                    rotation: Rotation::Deg0,
                },
            );
        }
        tracing::debug!(ground = self.blocks.len(), "layout reset");
        self.event_log.push(LayoutEvent::Reset {
            ground: self.blocks.len(),
        });
    }

    /// Add a block. An occupied coordinate is rejected and nothing changes.
    pub fn place(&mut self, record: BlockRecord) -> Result<(), LayoutError> {
        let pos = record.pos();
        if self.blocks.contains_key(&pos) {
            return Err(LayoutError::Occupied(pos));
        }
        self.blocks.insert(pos, record.block());
        tracing::debug!(%pos, kind = %record.kind, rotation = %record.rotation, "block placed");
        self.event_log.push(LayoutEvent::Placed(record));
        Ok(())
    }

    /// Take away the block at `pos`, unless it is ground.
    pub fn remove(&mut self, pos: GridPos) -> Result<BlockRecord, LayoutError> {
        if Self::is_ground(pos) {
            return Err(LayoutError::Protected(pos));
        }
        let block = self.blocks.remove(&pos).ok_or(LayoutError::NotFound(pos))?;
        let record = BlockRecord::new(pos, block.kind, block.rotation);
        tracing::debug!(%pos, kind = %block.kind, "block removed");
        self.event_log.push(LayoutEvent::Removed(record));
        Ok(record)
    }

    /// Replace the whole layout with `records`.
    ///
    /// All-or-nothing: duplicate coordinates are rejected before anything
    /// is touched. Records are taken verbatim; a saved layout without
    /// ground stays without ground.
    pub fn restore(&mut self, records: &[BlockRecord]) -> Result<(), LayoutError> {
        let mut blocks = BTreeMap::new();
        for record in records {
            if blocks.insert(record.pos(), record.block()).is_some() {
                return Err(LayoutError::DuplicatePosition(record.pos()));
            }
        }
        self.blocks = blocks;
        tracing::debug!(count = records.len(), "layout restored");
        self.event_log.push(LayoutEvent::Restored {
            count: records.len(),
        });
        Ok(())
    }

    /// Build a layout directly from records.
    pub fn from_records(records: &[BlockRecord]) -> Result<Self, LayoutError> {
        let mut layout = Self::empty();
        layout.restore(records)?;
        layout.event_log.clear();
        Ok(layout)
    }

    pub fn get(&self, pos: GridPos) -> Option<&Block> {
        self.blocks.get(&pos)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.blocks.contains_key(&pos)
    }

    /// Number of blocks, ground included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &Block)> {
        self.blocks.iter().map(|(pos, block)| (*pos, block))
    }

    /// All blocks as persisted records, in coordinate order.
    pub fn records(&self) -> Vec<BlockRecord> {
        self.iter()
            .map(|(pos, b)| BlockRecord::new(pos, b.kind, b.rotation))
            .collect()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[LayoutEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.event_log)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

/// Two layouts are equal when they hold the same blocks; pending events are
/// bookkeeping, not state.
impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}

impl Eq for Layout {}
