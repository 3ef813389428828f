/// Geometry primitives for hit detection.
///
/// `Rect` is the integer bounding box every entity keeps in sync with its
/// float position.  `PixelMask` is the per-pixel opacity bitmap derived from
/// a sprite; two masks collide when at least one opaque pixel coincides.

// ── Bounding box ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Half-open intersection test; touching edges do not overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Pixel mask ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl PixelMask {
    /// A mask with every pixel opaque (rectangular placeholder sprites).
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask from row-major opacity values.  Missing trailing values
    /// are treated as transparent.
    pub fn from_bits(width: u32, height: u32, bits: &[bool]) -> Self {
        let len = (width * height) as usize;
        let mut owned: Vec<bool> = bits.iter().copied().take(len).collect();
        owned.resize(len, false);
        Self {
            width,
            height,
            bits: owned,
        }
    }

    /// Alpha above 127 counts as opaque.
    pub fn from_alpha(width: u32, height: u32, alpha: impl IntoIterator<Item = u8>) -> Self {
        let bits: Vec<bool> = alpha.into_iter().map(|a| a > 127).collect();
        Self::from_bits(width, height, &bits)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True iff some opaque pixel of `self` coincides with an opaque pixel of
    /// `other` when `other`'s top-left corner sits at `offset` in `self`'s
    /// coordinate space.
    pub fn overlaps(&self, other: &PixelMask, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i32).min(dx + other.width as i32);
        let y1 = (self.height as i32).min(dy + other.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return true;
                }
            }
        }
        false
    }
}

// ── Capability ────────────────────────────────────────────────────────────────

/// Anything that can take part in hit detection.
///
/// Entities without a pixel mask return `None` from `mask`; tests against
/// them fall back to bounding-box intersection.
pub trait Collidable {
    fn rect(&self) -> Rect;

    fn mask(&self) -> Option<&PixelMask> {
        None
    }
}

/// Pixel-accurate test between two collidables.  Boxes that do not
/// intersect are rejected before any pixel is inspected.
pub fn collides<A: Collidable + ?Sized, B: Collidable + ?Sized>(a: &A, b: &B) -> bool {
    let ra = a.rect();
    let rb = b.rect();
    if !ra.intersects(&rb) {
        return false;
    }
    match (a.mask(), b.mask()) {
        (Some(ma), Some(mb)) => ma.overlaps(mb, (rb.x - ra.x, rb.y - ra.y)),
        _ => true,
    }
}
