use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use snake_arcade_core::ItemKind;
use snake_arcade_rendering::Color;

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const ALL_SPRITE_KEYS: [SpriteKey; 8] = [
    SpriteKey::Head,
    SpriteKey::Body,
    SpriteKey::Apple,
    SpriteKey::Cookie,
    SpriteKey::Banana,
    SpriteKey::Star,
    SpriteKey::Bomb,
    SpriteKey::Rock,
];

/// Image slots every sprite manifest must fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SpriteKey {
    Head,
    Body,
    Apple,
    Cookie,
    Banana,
    Star,
    Bomb,
    Rock,
}

impl SpriteKey {
    pub(crate) const fn for_item(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Apple => Self::Apple,
            ItemKind::Cookie => Self::Cookie,
            ItemKind::Banana => Self::Banana,
            ItemKind::Star => Self::Star,
            ItemKind::Bomb => Self::Bomb,
        }
    }
}

/// Parameters describing how a sprite should be drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    /// Position in screen-space pixels where the sprite's top-left corner is placed.
    pub(crate) position: Vec2,
    /// Desired size in screen-space pixels.
    pub(crate) size: Vec2,
    /// Rotation applied around the sprite centre, in radians.
    pub(crate) rotation_radians: f32,
    /// Tint applied to the sprite.
    pub(crate) tint: Color,
}

impl DrawParams {
    pub(crate) fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            rotation_radians: 0.0,
            tint: Color::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    pub(crate) fn with_rotation(mut self, rotation_radians: f32) -> Self {
        self.rotation_radians = rotation_radians;
        self
    }
}

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
    background: Option<Texture2D>,
}

impl SpriteAtlas {
    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Returns the manifest path inside the given asset directory.
    pub(crate) fn manifest_path(assets_dir: &Path) -> PathBuf {
        assets_dir.join("manifest.toml")
    }

    /// Draws the requested sprite using the supplied parameters.
    pub(crate) fn draw(&self, key: SpriteKey, params: DrawParams) -> Result<()> {
        let texture = *self
            .textures
            .get(&key)
            .with_context(|| format!("sprite {key:?} missing from atlas"))?;
        draw_texture(texture, params);
        Ok(())
    }

    /// Stretches the optional background image over the given screen rectangle.
    /// Returns `false` when the manifest did not name one.
    pub(crate) fn draw_background(&self, origin: Vec2, size: Vec2) -> bool {
        let Some(texture) = self.background else {
            return false;
        };
        draw_texture(texture, DrawParams::new(origin, size));
        true
    }

    pub(crate) fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(&Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
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
        let manifest = parse_manifest(&contents, &base)?;
        let mut atlas = Self::from_entries(manifest.sprites, &mut loader)?;
        if let Some(path) = manifest.background {
            let texture = loader(&path).with_context(|| {
                format!("failed to load background from {}", path.display())
            })?;
            atlas.background = Some(texture);
        }
        Ok(atlas)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(&Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(&path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        Ok(Self {
            textures,
            background: None,
        })
    }
}

fn draw_texture(texture: Texture2D, params: DrawParams) {
    let dest_size = MacroquadVec2::new(params.size.x, params.size.y);
    let pivot = MacroquadVec2::new(
        params.position.x + dest_size.x * 0.5,
        params.position.y + dest_size.y * 0.5,
    );

    let draw_params = DrawTextureParams {
        dest_size: Some(dest_size),
        rotation: params.rotation_radians,
        pivot: Some(pivot),
        ..DrawTextureParams::default()
    };

    texture::draw_texture_ex(
        texture,
        params.position.x,
        params.position.y,
        to_macroquad_color(params.tint),
        draw_params,
    );
}

fn default_loader(path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    background: Option<String>,
    sprites: HashMap<String, String>,
}

#[derive(Debug, PartialEq)]
struct ResolvedManifest {
    sprites: Vec<(SpriteKey, PathBuf)>,
    background: Option<PathBuf>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<ResolvedManifest> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)
            .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
        let path = base_path.join(relative_path);
        if resolved.insert(key, path).is_some() {
            bail!("sprite manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(ALL_SPRITE_KEYS.len());
    for key in ALL_SPRITE_KEYS {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for {key:?}");
        };
        ordered.push((key, path));
    }

    Ok(ResolvedManifest {
        sprites: ordered,
        background: manifest.background.map(|path| base_path.join(path)),
    })
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match name {
        "head" => Ok(SpriteKey::Head),
        "body" => Ok(SpriteKey::Body),
        "apple" => Ok(SpriteKey::Apple),
        "cookie" => Ok(SpriteKey::Cookie),
        "banana" => Ok(SpriteKey::Banana),
        "star" => Ok(SpriteKey::Star),
        "bomb" => Ok(SpriteKey::Bomb),
        "rock" => Ok(SpriteKey::Rock),
        _ => bail!("unknown sprite key `{name}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, path::Path};

    const FULL_SPRITES: &str = r#"
        [sprites]
        rock = "rock.png"
        bomb = "bomb.png"
        star = "star.png"
        banana = "banana.png"
        cookie = "cookie.png"
        apple = "apple.png"
        body = "body.png"
        head = "head.png"
    "#;

    #[test]
    fn parse_manifest_requires_all_known_keys() {
        let manifest = r#"
            version = 1

            [sprites]
            head = "head.png"
            body = "body.png"
            apple = "apple.png"
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "manifest missing item sprites should fail");
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = format!("version = 1\n{FULL_SPRITES}\nmushroom = \"mushroom.png\"\n");

        let result = parse_manifest(&manifest, Path::new("assets"));
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let manifest = format!("version = 2\n{FULL_SPRITES}");
        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let manifest = format!("version = 1\nbackground = \"bg/sky.png\"\n{FULL_SPRITES}");

        let parsed = parse_manifest(&manifest, Path::new("root")).expect("manifest should parse");
        assert_eq!(parsed.sprites.len(), ALL_SPRITE_KEYS.len());
        assert_eq!(
            parsed.sprites[0],
            (SpriteKey::Head, PathBuf::from("root/head.png"))
        );
        assert_eq!(
            parsed.sprites[7],
            (SpriteKey::Rock, PathBuf::from("root/rock.png"))
        );
        assert_eq!(parsed.background, Some(PathBuf::from("root/bg/sky.png")));
    }

    #[test]
    fn background_is_optional() {
        let manifest = format!("version = 1\n{FULL_SPRITES}");
        let parsed = parse_manifest(&manifest, Path::new("assets")).expect("manifest should parse");
        assert_eq!(parsed.background, None);
    }

    #[test]
    fn atlas_loads_textures_using_deterministic_order() {
        let manifest = format!("version = 1\n{FULL_SPRITES}");
        let parsed = parse_manifest(&manifest, Path::new("assets"))
            .expect("manifest should parse into canonical order");
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(parsed.sprites, &mut |path| {
            load_order.borrow_mut().push(path.to_path_buf());
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        let expected: Vec<PathBuf> = [
            "head", "body", "apple", "cookie", "banana", "star", "bomb", "rock",
        ]
        .iter()
        .map(|name| PathBuf::from(format!("assets/{name}.png")))
        .collect();
        assert_eq!(load_order.into_inner(), expected);
        assert_eq!(atlas.texture_count(), ALL_SPRITE_KEYS.len());
    }

    #[test]
    fn failing_loader_aborts_the_whole_atlas() {
        let manifest = format!("version = 1\n{FULL_SPRITES}");
        let parsed = parse_manifest(&manifest, Path::new("assets")).expect("manifest should parse");
        let result = SpriteAtlas::from_entries(parsed.sprites, &mut |path| {
            if path.ends_with("star.png") {
                bail!("file not found");
            }
            Ok(Texture2D::empty())
        });
        assert!(result.is_err());
    }

    #[test]
    fn item_kinds_map_to_their_sprites() {
        assert_eq!(SpriteKey::for_item(ItemKind::Bomb), SpriteKey::Bomb);
        assert_eq!(SpriteKey::for_item(ItemKind::Banana), SpriteKey::Banana);
    }
}
