use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use log::{info, warn};
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use sky_raid_rendering::SpriteKey;

const MANIFEST_VERSION: u32 = 1;

/// Textures available for drawing, keyed by what they depict.
///
/// Every key is optional; callers fall back to procedural shapes for keys
/// the atlas does not contain.
#[derive(Debug, Default)]
pub struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Returns the default manifest path relative to the working directory.
    #[must_use]
    pub fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Loads every sprite the manifest at `path` provides.
    ///
    /// Unreadable manifests and images are logged and skipped.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let manifest_path = path.as_ref();
        if !manifest_path.exists() {
            info!(
                "no sprite manifest at {}; drawing procedural shapes",
                manifest_path.display()
            );
            return Self::default();
        }

        match read_manifest(manifest_path) {
            Ok(entries) => Self::from_entries(entries, &mut load_texture),
            Err(error) => {
                warn!("ignoring sprite manifest: {error:#}");
                Self::default()
            }
        }
    }

    /// Draws the requested sprite stretched over the provided rectangle.
    ///
    /// Returns `false` when the sprite is unavailable.
    pub fn draw(&self, key: SpriteKey, position: Vec2, size: Vec2) -> bool {
        let Some(texture) = self.texture(key) else {
            return false;
        };

        texture::draw_texture_ex(
            texture,
            position.x,
            position.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(MacroquadVec2::new(size.x, size.y)),
                ..DrawTextureParams::default()
            },
        );
        true
    }

    /// Reports whether a texture was loaded for `key`.
    #[must_use]
    pub fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Number of loaded textures.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Texture loaded for `key`, if any.
    #[must_use]
    pub fn texture(&self, key: SpriteKey) -> Option<Texture2D> {
        self.textures.get(&key).copied()
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Self {
        let mut textures = HashMap::new();
        for (key, path) in entries {
            match loader(key, &path) {
                Ok(texture) => {
                    let _ = textures.insert(key, texture);
                }
                Err(error) => warn!("sprite {key:?} unavailable, using procedural shape: {error:#}"),
            }
        }

        for key in SpriteKey::ALL {
            if !textures.contains_key(&key) {
                info!("sprite {key:?} not provided; using procedural shape");
            }
        }
        Self { textures }
    }
}

fn read_manifest(manifest_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let contents = fs::read_to_string(manifest_path).with_context(|| {
        format!(
            "failed to read sprite manifest at {}",
            manifest_path.display()
        )
    })?;
    let base = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    parse_manifest(&contents, &base)
}

fn load_texture(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("cannot read sprite image {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    sprites: HashMap<String, String>,
}

/// Parses the manifest into entries ordered like [`SpriteKey::ALL`].
///
/// Missing entries are allowed; unknown keys and versions are not.
fn parse_manifest(contents: &str, base_dir: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("sprite manifest is not valid TOML")?;
    if manifest.version != MANIFEST_VERSION {
        bail!(
            "sprite manifest version {} is not supported (expected {})",
            manifest.version,
            MANIFEST_VERSION
        );
    }

    let mut by_key = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)?;
        let _ = by_key.insert(key, base_dir.join(relative_path));
    }

    Ok(SpriteKey::ALL
        .into_iter()
        .filter_map(|key| by_key.remove(&key).map(|path| (key, path)))
        .collect())
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match name {
        "Player" => Ok(SpriteKey::Player),
        "Enemy" => Ok(SpriteKey::Enemy),
        "PlayerProjectile" => Ok(SpriteKey::PlayerProjectile),
        "EnemyProjectile" => Ok(SpriteKey::EnemyProjectile),
        "Background" => Ok(SpriteKey::Background),
        _ => bail!("unknown sprite key `{name}` in manifest"),
    }
}
