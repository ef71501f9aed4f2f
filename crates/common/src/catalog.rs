use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors from catalog and value lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown block type {0:?}")]
    UnknownBlock(String),
    #[error("rotation must be 0, 90, 180 or 270 degrees, got {0}")]
    InvalidRotation(i32),
    #[error("rotation {0:?} is not a number of degrees")]
    UnparsableRotation(String),
    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
}

/// A packed 0xRRGGBB sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn to_rgb8(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Linear-space RGBA, for writing into an sRGB render target.
    pub fn to_linear_rgba(self) -> [f32; 4] {
        let [r, g, b] = self.to_rgb8();
        [
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
            1.0,
        ]
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// One of the twelve fixed room and furniture categories.
///
/// Serialized as its lowercase name, which is also the name shown in the
/// type selector.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Bedroom,
    Kitchen,
    Lounge,
    Bathroom,
    Sofa,
    Bed,
    Fridge,
    Desk,
    Vault,
    Pool,
    Cinema,
    Wine,
}

impl BlockKind {
    /// Every kind, in selector order.
    pub const ALL: [BlockKind; 12] = [
        BlockKind::Bedroom,
        BlockKind::Kitchen,
        BlockKind::Lounge,
        BlockKind::Bathroom,
        BlockKind::Sofa,
        BlockKind::Bed,
        BlockKind::Fridge,
        BlockKind::Desk,
        BlockKind::Vault,
        BlockKind::Pool,
        BlockKind::Cinema,
        BlockKind::Wine,
    ];

    /// The kind the ground layer is made of.
    pub const GROUND: BlockKind = BlockKind::Lounge;

    pub fn name(self) -> &'static str {
        match self {
            Self::Bedroom => "bedroom",
            Self::Kitchen => "kitchen",
            Self::Lounge => "lounge",
            Self::Bathroom => "bathroom",
            Self::Sofa => "sofa",
            Self::Bed => "bed",
            Self::Fridge => "fridge",
            Self::Desk => "desk",
            Self::Vault => "vault",
            Self::Pool => "pool",
            Self::Cinema => "cinema",
            Self::Wine => "wine",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::Bedroom => Rgb(0x7986cb),
            Self::Kitchen => Rgb(0xffb74d),
            Self::Lounge => Rgb(0x4db6ac),
            Self::Bathroom => Rgb(0x90caf9),
            Self::Sofa => Rgb(0x8d6e63),
            Self::Bed => Rgb(0xf06292),
            Self::Fridge => Rgb(0xb0bec5),
            Self::Desk => Rgb(0xa1887f),
            Self::Vault => Rgb(0x212121),
            Self::Pool => Rgb(0x00bcd4),
            Self::Cinema => Rgb(0x3e2723),
            Self::Wine => Rgb(0x6d4c41),
        }
    }

    /// Short label drawn on a grid cell: the capitalized first letter,
    /// except the vault which hides behind a detective.
    pub fn label(self) -> String {
        match self {
            Self::Vault => "🕵️".to_string(),
            other => other.name()[..1].to_uppercase(),
        }
    }

    /// Whether light text reads better than dark text on this kind's color.
    pub fn is_dark(self) -> bool {
        let [r, g, b] = self.color().to_rgb8();
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        luma < 110.0
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownBlock(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_twelve_distinct_names() {
        let mut names: Vec<&str> = BlockKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn parse_every_name() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.name().parse::<BlockKind>().unwrap(), kind);
        }
        assert_eq!("Kitchen".parse::<BlockKind>().unwrap(), BlockKind::Kitchen);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "ballroom".parse::<BlockKind>().unwrap_err();
        assert_eq!(err, CatalogError::UnknownBlock("ballroom".into()));
    }

    #[test]
    fn labels() {
        assert_eq!(BlockKind::Kitchen.label(), "K");
        assert_eq!(BlockKind::Wine.label(), "W");
        assert_eq!(BlockKind::Vault.label(), "🕵️");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&BlockKind::Cinema).unwrap();
        assert_eq!(json, "\"cinema\"");
        let back: BlockKind = serde_json::from_str("\"pool\"").unwrap();
        assert_eq!(back, BlockKind::Pool);
        assert!(serde_json::from_str::<BlockKind>("\"attic\"").is_err());
    }

    #[test]
    fn colors_unpack() {
        assert_eq!(BlockKind::Kitchen.color().to_rgb8(), [0xff, 0xb7, 0x4d]);
        let lin = BlockKind::Vault.color().to_linear_rgba();
        assert!(lin[0] < 0.02);
        assert_eq!(lin[3], 1.0);
    }

    #[test]
    fn dark_kinds() {
        assert!(BlockKind::Vault.is_dark());
        assert!(BlockKind::Cinema.is_dark());
        assert!(!BlockKind::Kitchen.is_dark());
    }
}
