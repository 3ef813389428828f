/// Sprite resolution.
///
/// The core only needs a sprite's size, its pixel mask and a colour the
/// terminal renderer can paint it with.  Images are looked up under the
/// assets directory; anything missing or unreadable becomes a solid
/// placeholder rectangle so the game always starts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::entities::EnemyColor;
use crate::mask::PixelMask;

pub const DEFAULT_SHIP_SIZE: (u32, u32) = (40, 24);
pub const DEFAULT_BULLET_SIZE: (u32, u32) = (8, 16);

// ── Placeholder palette ───────────────────────────────────────────────────────

const C_PLAYER: (u8, u8, u8) = (0, 200, 255);
const C_PLAYER_BULLET: (u8, u8, u8) = (255, 255, 0);
const C_ENEMY_BLUE: (u8, u8, u8) = (80, 80, 255);
const C_ENEMY_GREEN: (u8, u8, u8) = (60, 200, 60);
const C_ENEMY_PURPLE: (u8, u8, u8) = (160, 80, 200);
const C_SHOT_BLUE: (u8, u8, u8) = (80, 160, 255);
const C_SHOT_GREEN: (u8, u8, u8) = (80, 255, 120);
const C_SHOT_PURPLE: (u8, u8, u8) = (200, 120, 255);

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub mask: PixelMask,
    /// Average colour of the opaque pixels.
    pub color: (u8, u8, u8),
}

impl Sprite {
    pub fn placeholder(size: (u32, u32), color: (u8, u8, u8)) -> Self {
        Self {
            width: size.0,
            height: size.1,
            mask: PixelMask::filled(size.0, size.1),
            color,
        }
    }

    pub fn from_mask(mask: PixelMask, color: (u8, u8, u8)) -> Self {
        Self {
            width: mask.width(),
            height: mask.height(),
            mask,
            color,
        }
    }

    /// Decode an image file.  `None` when it cannot be read or decoded.
    pub fn load(path: &Path) -> Option<Self> {
        let img = match image::open(path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                warn!("failed to decode sprite {}: {e}", path.display());
                return None;
            }
        };
        let (width, height) = img.dimensions();
        let mask = PixelMask::from_alpha(width, height, img.pixels().map(|p| p.0[3]));

        let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
        for p in img.pixels().filter(|p| p.0[3] > 127) {
            r += p.0[0] as u64;
            g += p.0[1] as u64;
            b += p.0[2] as u64;
            n += 1;
        }
        let color = if n == 0 {
            (255, 255, 255)
        } else {
            ((r / n) as u8, (g / n) as u8, (b / n) as u8)
        };

        debug!(
            "loaded sprite {} ({width}x{height}, {} opaque)",
            path.display(),
            mask.count()
        );
        Some(Self {
            width,
            height,
            mask,
            color,
        })
    }
}

/// Ship and shot sprite for one enemy colour.
#[derive(Clone, Debug)]
pub struct EnemySkin {
    pub ship: Arc<Sprite>,
    pub shot: Arc<Sprite>,
}

#[derive(Clone, Debug)]
pub struct SpriteSet {
    pub player: Arc<Sprite>,
    pub player_bullet: Arc<Sprite>,
    /// Indexed by `EnemyColor as usize`.
    pub enemies: [EnemySkin; 3],
}

impl SpriteSet {
    /// All-placeholder set; used by tests and when no assets exist.
    pub fn placeholders() -> Self {
        Self {
            player: Arc::new(Sprite::placeholder(DEFAULT_SHIP_SIZE, C_PLAYER)),
            player_bullet: Arc::new(Sprite::placeholder(DEFAULT_BULLET_SIZE, C_PLAYER_BULLET)),
            enemies: [
                placeholder_skin(C_ENEMY_BLUE, C_SHOT_BLUE),
                placeholder_skin(C_ENEMY_GREEN, C_SHOT_GREEN),
                placeholder_skin(C_ENEMY_PURPLE, C_SHOT_PURPLE),
            ],
        }
    }

    /// Resolve every sprite under `assets_dir`, falling back per sprite.
    pub fn load(assets_dir: &Path) -> Self {
        let fallback = Self::placeholders();
        let resolve = |names: &[&str], fallback: &Arc<Sprite>| -> Arc<Sprite> {
            first_existing(assets_dir, names)
                .and_then(|p| Sprite::load(&p))
                .map(Arc::new)
                .unwrap_or_else(|| {
                    warn!("no usable sprite for {:?}, using placeholder", names[0]);
                    Arc::clone(fallback)
                })
        };

        let enemy = |color: EnemyColor| -> EnemySkin {
            let name = color.name();
            let ship_names = [
                format!("enemy_{name}_image.png"),
                format!("enemy_{name}.png"),
            ];
            let shot_names = [format!("shot_{name}.png")];
            let base = &fallback.enemies[color as usize];
            EnemySkin {
                ship: resolve(&[ship_names[0].as_str(), ship_names[1].as_str()], &base.ship),
                shot: resolve(&[shot_names[0].as_str()], &base.shot),
            }
        };

        Self {
            player: resolve(&["player_image.png", "ship.png"], &fallback.player),
            player_bullet: resolve(&["bullet_image.png", "bullet.png"], &fallback.player_bullet),
            enemies: [
                enemy(EnemyColor::Blue),
                enemy(EnemyColor::Green),
                enemy(EnemyColor::Purple),
            ],
        }
    }

    pub fn enemy(&self, color: EnemyColor) -> &EnemySkin {
        &self.enemies[color as usize]
    }
}

fn placeholder_skin(ship: (u8, u8, u8), shot: (u8, u8, u8)) -> EnemySkin {
    EnemySkin {
        ship: Arc::new(Sprite::placeholder(DEFAULT_SHIP_SIZE, ship)),
        shot: Arc::new(Sprite::placeholder(DEFAULT_BULLET_SIZE, shot)),
    }
}

/// First candidate that exists, looking in `dir` and then `dir/images`.
fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    let roots = [dir.to_path_buf(), dir.join("images")];
    roots
        .iter()
        .flat_map(|root| names.iter().map(move |n| root.join(n)))
        .find(|p| p.is_file())
}
