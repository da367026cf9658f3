//! Sprites and sprite atlases.
//!
//! Atlases are never built from nothing. A template atlas (sprite list and
//! texture) comes from the embedded table, then a replacement texture and an
//! optional `.tpsheet` sprite sheet are laid over it.

use super::texture::Texture;

/// Extension of sprite sheet files next to a loose atlas texture.
pub const SHEET_EXTENSION: &str = "tpsheet";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub rect: SpriteRect,
    /// Normalized pivot, `[0.5, 0.5]` is the center.
    pub pivot: [f32; 2],
    /// Own texture of a standalone sprite. Atlas sprites use the atlas texture.
    pub texture: Option<Texture>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAtlas {
    pub name: String,
    pub texture: Option<Texture>,
    pub sprites: Vec<Sprite>,
}

impl Sprite {
    /// A sprite covering the whole texture, pivoted at its center.
    pub fn from_texture(name: impl Into<String>, texture: Texture) -> Self {
        Self {
            name: name.into(),
            rect: SpriteRect {
                x: 0.0,
                y: 0.0,
                width: texture.width as f32,
                height: texture.height as f32,
            },
            pivot: [0.5, 0.5],
            texture: Some(texture),
        }
    }
}

impl SpriteAtlas {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture: None,
            sprites: Vec::new(),
        }
    }

    pub fn with_sprite(mut self, name: impl Into<String>, rect: SpriteRect) -> Self {
        self.sprites.push(Sprite {
            name: name.into(),
            rect,
            pivot: [0.5, 0.5],
            texture: None,
        });
        self
    }

    pub fn sprite(&self, name: &str) -> Option<&Sprite> {
        self.sprites.iter().find(|sprite| sprite.name == name)
    }

    /// Lay sprite sheet lines over the atlas: known sprites are moved,
    /// unknown ones are appended. Header and malformed lines are skipped.
    pub fn apply_sheet<S: AsRef<str>>(&mut self, lines: &[S]) {
        for line in lines {
            let Some(entry) = parse_sheet_line(line.as_ref()) else {
                continue;
            };

            match self.sprites.iter_mut().find(|sprite| sprite.name == entry.name) {
                Some(sprite) => {
                    sprite.rect = entry.rect;
                    if let Some(pivot) = entry.pivot {
                        sprite.pivot = pivot;
                    }
                }
                None => self.sprites.push(Sprite {
                    name: entry.name.to_string(),
                    rect: entry.rect,
                    pivot: entry.pivot.unwrap_or([0.5, 0.5]),
                    texture: None,
                }),
            }
        }
    }
}

struct SheetEntry<'a> {
    name: &'a str,
    rect: SpriteRect,
    pivot: Option<[f32; 2]>,
}

/// `name;x;y;width;height[;pivot_x;pivot_y]`
fn parse_sheet_line(line: &str) -> Option<SheetEntry<'_>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with(':') {
        return None;
    }

    let fields: Vec<&str> = line.split(';').map(str::trim).collect();
    if fields.len() < 5 || fields[0].is_empty() {
        return None;
    }

    let number = |index: usize| fields.get(index).and_then(|field| field.parse::<f32>().ok());
    let rect = SpriteRect {
        x: number(1)?,
        y: number(2)?,
        width: number(3)?,
        height: number(4)?,
    };
    let pivot = match (number(5), number(6)) {
        (Some(x), Some(y)) => Some([x, y]),
        _ => None,
    };

    Some(SheetEntry {
        name: fields[0],
        rect,
        pivot,
    })
}
