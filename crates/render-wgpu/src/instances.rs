use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use mansion_common::{Rgb, Theme};
use mansion_kernel::Layout;

/// Edge length of the player marker cube.
pub const MARKER_SCALE: f32 = 0.3;
const MARKER_COLOR: Rgb = Rgb(0xff0000);

/// Per-instance vertex data for one cube.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
    /// 1.0 for lit blocks, 0.0 for flat-colored geometry like the marker.
    pub lit: f32,
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 4], lit: bool) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
            lit: if lit { 1.0 } else { 0.0 },
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&[self.model_0, self.model_1, self.model_2, self.model_3])
    }
}

/// One instance per block, in layout order, then the player marker when
/// there is one.
pub fn build_instances(layout: &Layout, marker: Option<Vec3>) -> Vec<InstanceData> {
    let mut instances: Vec<InstanceData> = layout
        .iter()
        .map(|(pos, block)| {
            let model = Mat4::from_rotation_translation(
                Quat::from_rotation_y(block.rotation.radians()),
                pos.center(),
            );
            InstanceData::new(model, block.kind.color().to_linear_rgba(), true)
        })
        .collect();
    if let Some(position) = marker {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(MARKER_SCALE),
            Quat::IDENTITY,
            position,
        );
        instances.push(InstanceData::new(
            model,
            MARKER_COLOR.to_linear_rgba(),
            false,
        ));
    }
    instances
}

/// Background color for a theme, in the linear space the surface expects.
pub fn clear_color(theme: Theme) -> wgpu::Color {
    let [r, g, b, a] = theme.background().to_linear_rgba();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mansion_common::{BlockKind, GridPos, Rotation};
    use mansion_kernel::BlockRecord;

    #[test]
    fn one_instance_per_block_plus_marker() {
        let layout = Layout::new();
        assert_eq!(build_instances(&layout, None).len(), 100);
        let with_marker = build_instances(&layout, Some(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(with_marker.len(), 101);

        let marker = with_marker.last().unwrap();
        assert_eq!(marker.lit, 0.0);
        assert_eq!(marker.color, [1.0, 0.0, 0.0, 1.0]);
        let (scale, _, translation) = marker.model().to_scale_rotation_translation();
        assert!((scale - Vec3::splat(MARKER_SCALE)).length() < 1e-5);
        assert_eq!(translation, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn block_instance_has_kind_color_and_rotation() {
        let mut layout = Layout::empty();
        layout
            .place(BlockRecord::new(
                GridPos::new(2, 1, -3),
                BlockKind::Pool,
                Rotation::Deg90,
            ))
            .unwrap();
        let instances = build_instances(&layout, None);
        let pool = instances[0];
        assert_eq!(pool.lit, 1.0);
        assert_eq!(pool.color, BlockKind::Pool.color().to_linear_rgba());

        let model = pool.model();
        assert_eq!(model.transform_point3(Vec3::ZERO), Vec3::new(2.0, 1.0, -3.0));
        // A quarter turn about Y takes +X to -Z.
        let turned = model.transform_vector3(Vec3::X);
        assert!((turned - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn instances_are_rebuilt_identically() {
        let layout = Layout::new();
        assert_eq!(build_instances(&layout, None), build_instances(&layout, None));
    }

    #[test]
    fn clear_color_follows_theme() {
        let dark = clear_color(Theme::Dark);
        let light = clear_color(Theme::Light);
        assert!(light.r > dark.r);
        assert_eq!(dark.a, 1.0);
    }
}
