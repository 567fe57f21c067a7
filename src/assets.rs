//! Image manifest and sprite handles
//!
//! The simulation only needs to know an image's size; decoding pixels is the
//! renderer's business. A manifest maps image names to sizes, and [`Sprites`]
//! resolves every image the game uses into a handle once, at startup.
//! A missing image is fatal.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ANIMATION_FRAMES, PLAYER_MAX_LEVEL};

/// Handle to a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(pub u16);

/// Errors raised while resolving game images
#[derive(Debug)]
pub enum AssetError {
    /// The manifest has no entry for this image
    MissingImage(String),
    /// Image with a zero or negative dimension
    InvalidSize { name: String, width: i32, height: i32 },
    /// Manifest could not be read
    Io(io::Error),
    /// Manifest is not valid JSON
    Parse(serde_json::Error),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::MissingImage(name) => write!(f, "missing image '{name}'"),
            AssetError::InvalidSize {
                name,
                width,
                height,
            } => write!(f, "image '{name}' has invalid size {width}x{height}"),
            AssetError::Io(e) => write!(f, "failed to read manifest: {e}"),
            AssetError::Parse(e) => write!(f, "failed to parse manifest: {e}"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(e) => Some(e),
            AssetError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(e: io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(e: serde_json::Error) -> Self {
        AssetError::Parse(e)
    }
}

/// Image name -> [width, height]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub images: BTreeMap<String, [i32; 2]>,
}

impl Manifest {
    /// Sizes of the stock artwork
    pub fn builtin() -> Self {
        let mut images = BTreeMap::new();
        let mut put = |name: &str, w: i32, h: i32| {
            images.insert(name.to_string(), [w, h]);
        };

        put("background", 1280, 720);
        put("opening", 1280, 720);
        put("gameover", 1280, 720);
        put("win", 1280, 720);
        for i in 1..=PLAYER_MAX_LEVEL as usize {
            put(&format!("player{i}"), 64 + 4 * i as i32, 40);
            put(&format!("laser{i}"), 30, 4 + 2 * i as i32);
        }
        put("enemy_1", 64, 48);
        put("enemy_2", 64, 52);
        put("enemy_3", 72, 56);
        for i in 1..=ANIMATION_FRAMES {
            put(&format!("energy_ball{i}"), 48, 48);
            put(&format!("generator{i}"), 96, 128);
        }
        put("mother_ship", 256, 256);
        put("shield", 320, 720);
        put("player_level", 20, 20);

        Self { images }
    }

    /// Load a manifest from a JSON file
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let data = std::fs::read_to_string(path)?;
        let manifest = serde_json::from_str(&data)?;
        log::info!("Loaded asset manifest from {}", path.display());
        Ok(manifest)
    }
}

/// Size of a registered image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    pub name: String,
    pub size: IVec2,
}

/// Every image the game draws, resolved to handles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprites {
    images: Vec<ImageInfo>,
    pub background: ImageId,
    pub opening: ImageId,
    pub game_over: ImageId,
    pub victory: ImageId,
    /// One image per player level
    pub player: Vec<ImageId>,
    /// One image per laser level
    pub laser: Vec<ImageId>,
    /// Level 1, 2 and 3 ships
    pub enemy: [ImageId; 3],
    pub energy_ball: Vec<ImageId>,
    pub generator: Vec<ImageId>,
    pub mother_ship: ImageId,
    pub shield: ImageId,
    pub level_icon: ImageId,
}

impl Sprites {
    /// Resolve every image from a manifest
    pub fn from_manifest(manifest: &Manifest) -> Result<Self, AssetError> {
        let mut images = Vec::new();
        let mut load = |name: &str| -> Result<ImageId, AssetError> {
            let [width, height] = *manifest
                .images
                .get(name)
                .ok_or_else(|| AssetError::MissingImage(name.to_string()))?;
            if width <= 0 || height <= 0 {
                return Err(AssetError::InvalidSize {
                    name: name.to_string(),
                    width,
                    height,
                });
            }
            let id = ImageId(images.len() as u16);
            images.push(ImageInfo {
                name: name.to_string(),
                size: IVec2::new(width, height),
            });
            Ok(id)
        };

        let background = load("background")?;
        let opening = load("opening")?;
        let game_over = load("gameover")?;
        let victory = load("win")?;
        let player = load_sequence(&mut load, "player", PLAYER_MAX_LEVEL as usize)?;
        let laser = load_sequence(&mut load, "laser", PLAYER_MAX_LEVEL as usize)?;
        let enemy = [load("enemy_1")?, load("enemy_2")?, load("enemy_3")?];
        let energy_ball = load_sequence(&mut load, "energy_ball", ANIMATION_FRAMES)?;
        let generator = load_sequence(&mut load, "generator", ANIMATION_FRAMES)?;
        let mother_ship = load("mother_ship")?;
        let shield = load("shield")?;
        let level_icon = load("player_level")?;

        log::debug!("Resolved {} images", images.len());

        Ok(Self {
            images,
            background,
            opening,
            game_over,
            victory,
            player,
            laser,
            enemy,
            energy_ball,
            generator,
            mother_ship,
            shield,
            level_icon,
        })
    }

    /// Sprites for the stock artwork
    pub fn builtin() -> Result<Self, AssetError> {
        Self::from_manifest(&Manifest::builtin())
    }

    /// Size of an image; unknown handles are empty
    pub fn size(&self, id: ImageId) -> IVec2 {
        self.images
            .get(id.0 as usize)
            .map(|info| info.size)
            .unwrap_or(IVec2::ZERO)
    }

    #[cfg(test)]
    pub fn name(&self, id: ImageId) -> &str {
        self.images
            .get(id.0 as usize)
            .map(|info| info.name.as_str())
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// `base1`, `base2`, ... `baseN`
fn load_sequence(
    load: &mut impl FnMut(&str) -> Result<ImageId, AssetError>,
    base: &str,
    count: usize,
) -> Result<Vec<ImageId>, AssetError> {
    (1..=count).map(|i| load(&format!("{base}{i}"))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_manifest_resolves() {
        let sprites = Sprites::builtin().unwrap();
        assert_eq!(sprites.player.len(), 4);
        assert_eq!(sprites.energy_ball.len(), 4);
        assert_eq!(sprites.size(sprites.shield), IVec2::new(320, 720));
        assert_eq!(sprites.name(sprites.generator[2]), "generator3");
    }

    #[test]
    fn missing_image_is_reported() {
        let mut manifest = Manifest::builtin();
        manifest.images.remove("energy_ball3");
        match Sprites::from_manifest(&manifest) {
            Err(AssetError::MissingImage(name)) => assert_eq!(name, "energy_ball3"),
            other => panic!("expected missing image, got {other:?}"),
        }
    }

    #[test]
    fn invalid_size_is_reported() {
        let mut manifest = Manifest::builtin();
        manifest.images.insert("shield".into(), [0, 720]);
        assert!(matches!(
            Sprites::from_manifest(&manifest),
            Err(AssetError::InvalidSize { .. })
        ));
    }

    #[test]
    fn manifest_round_trips_through_json() {
        let json = serde_json::to_string(&Manifest::builtin()).unwrap();
        let parsed: Manifest = serde_json::from_str(&json).unwrap();
        assert!(Sprites::from_manifest(&parsed).is_ok());
    }

    #[test]
    fn unknown_handle_has_no_size() {
        let sprites = Sprites::builtin().unwrap();
        assert_eq!(sprites.size(ImageId(9999)), IVec2::ZERO);
    }
}
