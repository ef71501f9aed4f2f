use mansion_common::{BlockKind, CellCoord, GridPos, Rotation, Theme};
use mansion_input::Action;
use mansion_kernel::{BlockRecord, GridLayout, Layout, LayoutError, LayoutEvent, Ray};
use mansion_persist::{DirStorage, MemoryStorage, Storage, StoreError};
use std::fmt;
use std::path::Path;

/// How far a pick ray reaches, matching the camera's far plane.
pub const PICK_RANGE: f32 = 1000.0;

/// A short message for the user after an operation, shown as a toast in
/// the desktop app and printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    RotationSet(Rotation),
    Reset,
    Saved,
    Loaded,
    NothingSaved,
    Failed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RotationSet(rotation) => write!(f, "Block rotation set to {rotation}"),
            Self::Reset => f.write_str("Grid reset!"),
            Self::Saved => f.write_str("Layout saved!"),
            Self::Loaded => f.write_str("Layout loaded!"),
            Self::NothingSaved => f.write_str("No saved layout found."),
            Self::Failed(msg) => f.write_str(msg),
        }
    }
}

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The two storage namespaces: one for the scene, one for the grid.
#[derive(Debug)]
pub struct Stores<S> {
    pub scene: S,
    pub grid: S,
}

impl Stores<DirStorage> {
    /// Open (creating if needed) `<data_dir>/scene` and `<data_dir>/grid`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        Ok(Self {
            scene: DirStorage::open(data_dir.join("scene"))?,
            grid: DirStorage::open(data_dir.join("grid"))?,
        })
    }
}

impl Stores<MemoryStorage> {
    pub fn in_memory() -> Self {
        Self {
            scene: MemoryStorage::new(),
            grid: MemoryStorage::new(),
        }
    }
}

/// Editor state: both layouts plus the current tool settings.
///
/// Input handlers never touch the layouts directly. They call a session
/// operation or dispatch an [`Action`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    layout: Layout,
    grid: GridLayout,
    kind: BlockKind,
    rotation: Rotation,
    theme: Theme,
}

impl Session {
    /// A session with a fresh ground layer, a blank grid, bedroom selected
    /// at 0° and the dark theme.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn select_kind(&mut self, kind: BlockKind) {
        self.kind = kind;
        tracing::debug!(%kind, "block type selected");
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Advance the rotation for new blocks by 90°, wrapping after 270°.
    pub fn rotate(&mut self) -> Notice {
        self.rotation = self.rotation.next();
        Notice::RotationSet(self.rotation)
    }

    /// Place a block of the selected type and rotation at `pos`.
    pub fn place_at(&mut self, pos: GridPos) -> Result<BlockRecord, LayoutError> {
        let record = BlockRecord::new(pos, self.kind, self.rotation);
        self.layout.place(record)?;
        Ok(record)
    }

    pub fn remove_at(&mut self, pos: GridPos) -> Result<BlockRecord, LayoutError> {
        self.layout.remove(pos)
    }

    /// The empty coordinate a ray would place into: the cell beyond the
    /// face it hits first.
    pub fn place_target(&self, ray: &Ray) -> Option<GridPos> {
        self.layout.raycast(ray, PICK_RANGE).map(|hit| hit.adjacent())
    }

    /// The block a ray would remove: the first one it hits.
    pub fn remove_target(&self, ray: &Ray) -> Option<GridPos> {
        self.layout.raycast(ray, PICK_RANGE).map(|hit| hit.pos)
    }

    /// Place where `ray` points. `Ok(None)` when the ray hits nothing.
    pub fn place_from_ray(&mut self, ray: &Ray) -> Result<Option<BlockRecord>, LayoutError> {
        match self.place_target(ray) {
            Some(pos) => self.place_at(pos).map(Some),
            None => Ok(None),
        }
    }

    /// Remove the block `ray` hits first. Ground blocks are refused.
    pub fn remove_from_ray(&mut self, ray: &Ray) -> Result<Option<BlockRecord>, LayoutError> {
        match self.remove_target(ray) {
            Some(pos) => self.remove_at(pos).map(Some),
            None => Ok(None),
        }
    }

    /// Overwrite a grid cell with the selected type and rotation.
    pub fn paint_cell(&mut self, coord: CellCoord) -> Result<(), LayoutError> {
        self.grid.paint(coord, self.kind, self.rotation)
    }

    pub fn reset_scene(&mut self) -> Notice {
        self.layout.reset();
        Notice::Reset
    }

    pub fn reset_grid(&mut self) -> Notice {
        self.grid.reset();
        Notice::Reset
    }

    pub fn save_scene<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<Notice, StoreError> {
        mansion_persist::save_layout(storage, &self.layout)?;
        Ok(Notice::Saved)
    }

    /// Replace the scene with the saved one. Nothing saved, or a failure,
    /// leaves the scene as it was.
    pub fn load_scene<S: Storage + ?Sized>(&mut self, storage: &S) -> Result<Notice, StoreError> {
        let Some(saved) = mansion_persist::load_layout(storage)? else {
            return Ok(Notice::NothingSaved);
        };
        self.layout.restore(&saved.records())?;
        Ok(Notice::Loaded)
    }

    pub fn save_grid<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<Notice, StoreError> {
        mansion_persist::save_grid(storage, &self.grid)?;
        Ok(Notice::Saved)
    }

    pub fn load_grid<S: Storage + ?Sized>(&mut self, storage: &S) -> Result<Notice, StoreError> {
        let Some(saved) = mansion_persist::load_grid(storage)? else {
            return Ok(Notice::NothingSaved);
        };
        self.grid = saved;
        Ok(Notice::Loaded)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        tracing::debug!(theme = %self.theme, "theme toggled");
        self.theme
    }

    /// Drain the scene's pending mutation events.
    pub fn drain_events(&mut self) -> Vec<LayoutEvent> {
        self.layout.drain_events()
    }

    /// Run one action, reporting failures as errors.
    pub fn dispatch<S: Storage>(
        &mut self,
        action: Action,
        stores: &mut Stores<S>,
    ) -> Result<Option<Notice>, SessionError> {
        let notice = match action {
            Action::SelectKind(kind) => {
                self.select_kind(kind);
                None
            }
            Action::Rotate => Some(self.rotate()),
            Action::PlaceAt(pos) => {
                self.place_at(pos)?;
                None
            }
            Action::RemoveAt(pos) => {
                self.remove_at(pos)?;
                None
            }
            Action::PaintCell(coord) => {
                self.paint_cell(coord)?;
                None
            }
            Action::ResetScene => Some(self.reset_scene()),
            Action::ResetGrid => Some(self.reset_grid()),
            Action::SaveScene => Some(self.save_scene(&mut stores.scene)?),
            Action::LoadScene => Some(self.load_scene(&stores.scene)?),
            Action::SaveGrid => Some(self.save_grid(&mut stores.grid)?),
            Action::LoadGrid => Some(self.load_grid(&stores.grid)?),
            Action::ToggleTheme => {
                self.toggle_theme();
                None
            }
        };
        Ok(notice)
    }

    /// Run one action from the UI.
    ///
    /// Rejected edits (occupied cell, ground block) are silent no-ops.
    /// Storage failures come back as a [`Notice::Failed`].
    pub fn apply<S: Storage>(&mut self, action: Action, stores: &mut Stores<S>) -> Option<Notice> {
        match self.dispatch(action, stores) {
            Ok(notice) => notice,
            Err(SessionError::Layout(e)) => {
                tracing::warn!(?action, "edit rejected: {e}");
                None
            }
            Err(SessionError::Store(e)) => {
                tracing::error!(?action, "storage failed: {e}");
                Some(Notice::Failed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn down_at(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
    }

    #[test]
    fn new_session_defaults() {
        let session = Session::new();
        assert_eq!(session.layout().len(), 100);
        assert_eq!(session.grid().painted_count(), 0);
        assert_eq!(session.kind(), BlockKind::Bedroom);
        assert_eq!(session.rotation(), Rotation::Deg0);
        assert_eq!(session.theme(), Theme::Dark);
    }

    #[test]
    fn rotate_reports_new_angle_and_wraps() {
        let mut session = Session::new();
        let texts: Vec<String> = (0..4).map(|_| session.rotate().to_string()).collect();
        assert_eq!(
            texts,
            [
                "Block rotation set to 90°",
                "Block rotation set to 180°",
                "Block rotation set to 270°",
                "Block rotation set to 0°",
            ]
        );
    }

    #[test]
    fn kitchen_scenario_survives_save_and_load() {
        let mut session = Session::new();
        session.reset_scene();
        session.select_kind(BlockKind::Kitchen);
        session.rotate();

        let placed = session.place_from_ray(&down_at(2.0, -3.0)).unwrap().unwrap();
        let expected = BlockRecord::new(GridPos::new(2, 1, -3), BlockKind::Kitchen, Rotation::Deg90);
        assert_eq!(placed, expected);
        let count = |s: &Session| s.layout().records().iter().filter(|r| **r == expected).count();
        assert_eq!(count(&session), 1);
        assert_eq!(session.layout().len(), 101);

        let mut stores = Stores::in_memory();
        assert_eq!(session.save_scene(&mut stores.scene).unwrap(), Notice::Saved);

        let mut fresh = Session::new();
        assert_eq!(fresh.load_scene(&stores.scene).unwrap(), Notice::Loaded);
        assert_eq!(count(&fresh), 1);
        assert_eq!(fresh.layout(), session.layout());
    }

    #[test]
    fn placing_on_top_of_placed_block_stacks() {
        let mut session = Session::new();
        session.place_from_ray(&down_at(0.0, 0.0)).unwrap();
        let second = session.place_from_ray(&down_at(0.0, 0.0)).unwrap().unwrap();
        assert_eq!(second.pos(), GridPos::new(0, 2, 0));
    }

    #[test]
    fn placing_twice_at_same_position_is_a_no_op() {
        let mut session = Session::new();
        let pos = GridPos::new(3, 1, 3);
        session.place_at(pos).unwrap();
        session.select_kind(BlockKind::Pool);
        assert_eq!(session.place_at(pos), Err(LayoutError::Occupied(pos)));
        assert_eq!(session.layout().len(), 101);
        assert_eq!(session.layout().get(pos).unwrap().kind, BlockKind::Bedroom);
    }

    #[test]
    fn remove_from_ray_spares_ground() {
        let mut session = Session::new();
        let ray = down_at(1.0, 1.0);
        assert_eq!(
            session.remove_from_ray(&ray),
            Err(LayoutError::Protected(GridPos::new(1, 0, 1)))
        );
        session.place_from_ray(&ray).unwrap();
        let removed = session.remove_from_ray(&ray).unwrap().unwrap();
        assert_eq!(removed.pos(), GridPos::new(1, 1, 1));
        assert_eq!(session.layout().len(), 100);
    }

    #[test]
    fn ray_into_the_void_does_nothing() {
        let mut session = Session::new();
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert_eq!(session.place_from_ray(&ray), Ok(None));
        assert_eq!(session.remove_from_ray(&ray), Ok(None));
    }

    #[test]
    fn reset_scene_drops_placed_blocks() {
        let mut session = Session::new();
        session.place_at(GridPos::new(0, 1, 0)).unwrap();
        assert_eq!(session.reset_scene().to_string(), "Grid reset!");
        assert_eq!(session.layout(), &Layout::new());
    }

    #[test]
    fn load_without_save_leaves_state() {
        let mut session = Session::new();
        session.place_at(GridPos::new(0, 1, 0)).unwrap();
        let before = session.layout().clone();
        let stores = Stores::in_memory();
        let notice = session.load_scene(&stores.scene).unwrap();
        assert_eq!(notice.to_string(), "No saved layout found.");
        assert_eq!(session.layout(), &before);
    }

    #[test]
    fn paint_and_grid_round_trip() {
        let mut session = Session::new();
        session.select_kind(BlockKind::Vault);
        session.rotate();
        session.paint_cell(CellCoord::new(9, 7)).unwrap();
        assert!(session.paint_cell(CellCoord::new(10, 0)).is_err());

        let mut stores = Stores::in_memory();
        session.save_grid(&mut stores.grid).unwrap();
        session.reset_grid();
        assert_eq!(session.grid().painted_count(), 0);

        session.load_grid(&stores.grid).unwrap();
        let cell = session.grid().get(CellCoord::new(9, 7)).unwrap();
        assert_eq!(cell.kind, Some(BlockKind::Vault));
        assert_eq!(cell.rotation, Rotation::Deg90);
    }

    #[test]
    fn scene_and_grid_use_separate_namespaces() {
        let mut session = Session::new();
        let mut stores = Stores::in_memory();
        session.apply(Action::SaveGrid, &mut stores);
        assert!(stores.scene.is_empty());
        assert_eq!(
            session.apply(Action::LoadScene, &mut stores),
            Some(Notice::NothingSaved)
        );
    }

    #[test]
    fn apply_routes_actions() {
        let mut session = Session::new();
        let mut stores = Stores::in_memory();

        assert_eq!(session.apply(Action::SelectKind(BlockKind::Cinema), &mut stores), None);
        assert_eq!(
            session.apply(Action::Rotate, &mut stores),
            Some(Notice::RotationSet(Rotation::Deg90))
        );
        let pos = GridPos::new(-1, 1, -1);
        session.apply(Action::PlaceAt(pos), &mut stores);
        assert_eq!(session.layout().get(pos).unwrap().kind, BlockKind::Cinema);

        // Occupied: silent no-op.
        assert_eq!(session.apply(Action::PlaceAt(pos), &mut stores), None);

        assert_eq!(session.apply(Action::SaveScene, &mut stores), Some(Notice::Saved));
        session.apply(Action::RemoveAt(pos), &mut stores);
        assert!(!session.layout().contains(pos));
        assert_eq!(session.apply(Action::LoadScene, &mut stores), Some(Notice::Loaded));
        assert!(session.layout().contains(pos));

        session.apply(Action::ToggleTheme, &mut stores);
        assert_eq!(session.theme(), Theme::Light);
    }

    #[test]
    fn corrupt_save_is_reported_and_ignored() {
        let mut session = Session::new();
        let mut stores = Stores::in_memory();
        stores
            .scene
            .set_item(mansion_persist::LAYOUT_KEY, "not json")
            .unwrap();
        let before = session.layout().clone();
        let notice = session.apply(Action::LoadScene, &mut stores);
        assert!(matches!(notice, Some(Notice::Failed(_))));
        assert_eq!(session.layout(), &before);
    }

    #[test]
    fn dir_stores_persist_between_sessions() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut stores = Stores::open(tmp.path()).unwrap();
            let mut session = Session::new();
            session.place_at(GridPos::new(4, 1, 4)).unwrap();
            session.apply(Action::SaveScene, &mut stores);
        }
        assert!(tmp.path().join("scene").join("mansionLayout").is_file());
        assert!(tmp.path().join("grid").is_dir());

        let mut stores = Stores::open(tmp.path()).unwrap();
        let mut session = Session::new();
        session.apply(Action::LoadScene, &mut stores);
        assert!(session.layout().contains(GridPos::new(4, 1, 4)));
    }

    #[test]
    fn events_are_drained() {
        let mut session = Session::new();
        session.place_at(GridPos::new(0, 1, 0)).unwrap();
        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LayoutEvent::Placed(_)));
        assert!(session.drain_events().is_empty());
    }
}
