use crate::storage::{Storage, StoreError};
use mansion_kernel::{BlockRecord, CellRecord, GridLayout, Layout};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// The single key a layout is stored under.
pub const LAYOUT_KEY: &str = "mansionLayout";

/// Dump every scene block under [`LAYOUT_KEY`]. Returns the record count.
pub fn save_layout<S: Storage + ?Sized>(
    storage: &mut S,
    layout: &Layout,
) -> Result<usize, StoreError> {
    let records = layout.records();
    write_records(storage, &records)?;
    tracing::info!(blocks = records.len(), "layout saved");
    Ok(records.len())
}

/// Read the saved scene. `Ok(None)` when nothing was ever saved.
pub fn load_layout<S: Storage + ?Sized>(storage: &S) -> Result<Option<Layout>, StoreError> {
    let Some(records) = read_records::<BlockRecord, S>(storage)? else {
        return Ok(None);
    };
    let layout = Layout::from_records(&records)?;
    tracing::info!(blocks = layout.len(), "layout loaded");
    Ok(Some(layout))
}

/// Dump every grid cell under [`LAYOUT_KEY`]. Returns the record count.
pub fn save_grid<S: Storage + ?Sized>(
    storage: &mut S,
    grid: &GridLayout,
) -> Result<usize, StoreError> {
    let records = grid.records();
    write_records(storage, &records)?;
    tracing::info!(cells = records.len(), "grid saved");
    Ok(records.len())
}

/// Read the saved grid. `Ok(None)` when nothing was ever saved.
pub fn load_grid<S: Storage + ?Sized>(storage: &S) -> Result<Option<GridLayout>, StoreError> {
    let Some(records) = read_records::<CellRecord, S>(storage)? else {
        return Ok(None);
    };
    let mut grid = GridLayout::new();
    grid.restore(&records)?;
    tracing::info!(cells = records.len(), "grid loaded");
    Ok(Some(grid))
}

fn write_records<T: Serialize, S: Storage + ?Sized>(
    storage: &mut S,
    records: &[T],
) -> Result<(), StoreError> {
    let json = serde_json::to_string(records)?;
    storage.set_item(LAYOUT_KEY, &json)
}

fn read_records<T: DeserializeOwned, S: Storage + ?Sized>(
    storage: &S,
) -> Result<Option<Vec<T>>, StoreError> {
    let Some(json) = storage.get_item(LAYOUT_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&json)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DirStorage, MemoryStorage};
    use mansion_common::{BlockKind, CellCoord, GridPos, Rotation};
    use mansion_kernel::LayoutError;

    fn decorated_layout() -> Layout {
        let mut layout = Layout::new();
        for (i, kind) in [BlockKind::Kitchen, BlockKind::Vault, BlockKind::Pool]
            .into_iter()
            .enumerate()
        {
            layout
                .place(BlockRecord::new(
                    GridPos::new(i as i32, 1, 0),
                    kind,
                    Rotation::Deg180,
                ))
                .unwrap();
        }
        layout
    }

    #[test]
    fn load_without_save_is_none() {
        let store = MemoryStorage::new();
        assert!(load_layout(&store).unwrap().is_none());
        assert!(load_grid(&store).unwrap().is_none());
    }

    #[test]
    fn layout_save_then_load_is_identity() {
        let mut store = MemoryStorage::new();
        let layout = decorated_layout();
        assert_eq!(save_layout(&mut store, &layout).unwrap(), 103);
        let loaded = load_layout(&store).unwrap().unwrap();
        assert_eq!(loaded, layout);
        assert_eq!(loaded.records(), layout.records());
    }

    #[test]
    fn grid_save_then_load_is_identity() {
        let mut store = MemoryStorage::new();
        let mut grid = GridLayout::new();
        grid.paint(CellCoord::new(4, 5), BlockKind::Cinema, Rotation::Deg90)
            .unwrap();
        assert_eq!(save_grid(&mut store, &grid).unwrap(), 80);
        assert_eq!(load_grid(&store).unwrap().unwrap(), grid);
    }

    #[test]
    fn saved_value_is_a_plain_json_array() {
        let mut store = MemoryStorage::new();
        let mut layout = Layout::empty();
        layout
            .place(BlockRecord::new(
                GridPos::new(0, 1, 0),
                BlockKind::Kitchen,
                Rotation::Deg90,
            ))
            .unwrap();
        save_layout(&mut store, &layout).unwrap();
        assert_eq!(
            store.get_item(LAYOUT_KEY).unwrap().unwrap(),
            r#"[{"x":0,"y":1,"z":0,"type":"kitchen","rotation":90}]"#
        );
    }

    #[test]
    fn browser_style_dump_loads() {
        let mut store = MemoryStorage::new();
        store
            .set_item(
                LAYOUT_KEY,
                r#"[{"x":0,"y":0,"z":0,"type":"lounge","rotation":0},
                    {"x":0,"y":1,"z":0,"type":"wine","rotation":270}]"#,
            )
            .unwrap();
        let layout = load_layout(&store).unwrap().unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(
            layout.get(GridPos::new(0, 1, 0)).unwrap().rotation,
            Rotation::Deg270
        );
    }

    #[test]
    fn unknown_type_or_rotation_fails_to_load() {
        let mut store = MemoryStorage::new();
        store
            .set_item(LAYOUT_KEY, r#"[{"x":0,"y":1,"z":0,"type":"attic","rotation":0}]"#)
            .unwrap();
        assert!(matches!(load_layout(&store), Err(StoreError::Json(_))));

        store
            .set_item(LAYOUT_KEY, r#"[{"x":0,"y":1,"z":0,"type":"bed","rotation":45}]"#)
            .unwrap();
        assert!(matches!(load_layout(&store), Err(StoreError::Json(_))));
    }

    #[test]
    fn duplicate_positions_fail_to_load() {
        let mut store = MemoryStorage::new();
        store
            .set_item(
                LAYOUT_KEY,
                r#"[{"x":1,"y":1,"z":1,"type":"bed","rotation":0},
                    {"x":1,"y":1,"z":1,"type":"sofa","rotation":0}]"#,
            )
            .unwrap();
        assert!(matches!(
            load_layout(&store),
            Err(StoreError::Layout(LayoutError::DuplicatePosition(_)))
        ));
    }

    #[test]
    fn out_of_range_cell_fails_to_load() {
        let mut store = MemoryStorage::new();
        store
            .set_item(LAYOUT_KEY, r#"[{"col":12,"row":0,"type":"bed","rotation":0}]"#)
            .unwrap();
        assert!(matches!(
            load_grid(&store),
            Err(StoreError::Layout(LayoutError::OutOfBounds(_)))
        ));
    }

    #[test]
    fn dir_storage_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scene");
        let layout = decorated_layout();
        {
            let mut store = DirStorage::open(&path).unwrap();
            save_layout(&mut store, &layout).unwrap();
        }
        let store = DirStorage::open(&path).unwrap();
        assert_eq!(load_layout(&store).unwrap().unwrap(), layout);
    }
}
