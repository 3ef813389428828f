use std::sync::Arc;

use wave_shooter::entities::Bullet;
use wave_shooter::mask::*;
use wave_shooter::sprites::Sprite;

/// Bounding box only, no pixel data.
struct Block(Rect);

impl Collidable for Block {
    fn rect(&self) -> Rect {
        self.0
    }
}

struct Masked(Rect, PixelMask);

impl Collidable for Masked {
    fn rect(&self) -> Rect {
        self.0
    }

    fn mask(&self) -> Option<&PixelMask> {
        Some(&self.1)
    }
}

/// 4x4 mask with only the top-left 2x2 quadrant opaque.
fn corner_mask() -> PixelMask {
    #[rustfmt::skip]
    let bits = [
        true,  true,  false, false,
        true,  true,  false, false,
        false, false, false, false,
        false, false, false, false,
    ];
    PixelMask::from_bits(4, 4, &bits)
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_edges() {
    let r = Rect::new(10, 20, 30, 40);
    assert_eq!(r.right(), 40);
    assert_eq!(r.bottom(), 60);
}

#[test]
fn rect_touching_edges_do_not_intersect() {
    let a = Rect::new(0, 0, 10, 10);
    assert!(a.intersects(&Rect::new(9, 9, 10, 10)));
    assert!(!a.intersects(&Rect::new(10, 0, 10, 10)));
    assert!(!a.intersects(&Rect::new(0, 10, 10, 10)));
    assert!(!a.intersects(&Rect::new(-10, 0, 10, 10)));
}

// ── PixelMask ─────────────────────────────────────────────────────────────────

#[test]
fn mask_constructors() {
    let full = PixelMask::filled(3, 2);
    assert_eq!(full.count(), 6);
    assert!(full.get(2, 1));
    assert!(!full.get(3, 1));
    assert!(!full.get(-1, 0));

    // Short input is padded with transparent pixels
    let short = PixelMask::from_bits(2, 2, &[true]);
    assert_eq!(short.count(), 1);
    assert!(short.get(0, 0));
    assert!(!short.get(1, 1));

    let alpha = PixelMask::from_alpha(2, 2, [0u8, 127, 128, 255]);
    assert_eq!(alpha.count(), 2);
    assert!(!alpha.get(1, 0));
    assert!(alpha.get(0, 1));
}

#[test]
fn mask_overlap_depends_on_offset() {
    let a = corner_mask();
    let b = corner_mask();
    assert!(a.overlaps(&b, (0, 0)));
    assert!(a.overlaps(&b, (1, 1)));
    // b's opaque quadrant lands on a's transparent area
    assert!(!a.overlaps(&b, (2, 0)));
    assert!(!a.overlaps(&b, (0, 2)));
    // b's opaque quadrant sits above-left of a; a's quadrant hits b's empty part
    assert!(!a.overlaps(&b, (-2, -2)));
    assert!(a.overlaps(&b, (-1, -1)));
    // Disjoint
    assert!(!a.overlaps(&b, (4, 0)));
}

// ── collides ──────────────────────────────────────────────────────────────────

#[test]
fn boxes_apart_never_collide() {
    let a = Masked(Rect::new(0, 0, 4, 4), PixelMask::filled(4, 4));
    let b = Masked(Rect::new(4, 0, 4, 4), PixelMask::filled(4, 4));
    assert!(!collides(&a, &b));
}

#[test]
fn overlapping_boxes_with_transparent_overlap_do_not_collide() {
    let a = Masked(Rect::new(0, 0, 4, 4), corner_mask());
    let b = Masked(Rect::new(2, 2, 4, 4), corner_mask());
    assert!(a.rect().intersects(&b.rect()));
    assert!(!collides(&a, &b));
    assert!(!collides(&b, &a));

    let c = Masked(Rect::new(1, 1, 4, 4), corner_mask());
    assert!(collides(&a, &c));
    assert!(collides(&c, &a));
}

#[test]
fn missing_mask_falls_back_to_boxes() {
    let a = Masked(Rect::new(0, 0, 4, 4), corner_mask());
    let b = Block(Rect::new(3, 3, 4, 4));
    assert!(collides(&a, &b));
    assert!(collides(&b, &a));
    assert!(!collides(&b, &Block(Rect::new(7, 7, 1, 1))));
}

#[test]
fn bullet_uses_its_sprite_mask() {
    // Hollow 4x4 bullet: only the border is opaque
    let hollow: Vec<bool> = (0..16)
        .map(|i| {
            let (x, y) = (i % 4, i / 4);
            x == 0 || x == 3 || y == 0 || y == 3
        })
        .collect();
    let sprite = Arc::new(Sprite::from_mask(
        PixelMask::from_bits(4, 4, &hollow),
        (255, 255, 0),
    ));
    assert_eq!((sprite.width, sprite.height), (4, 4));

    let bullet = Bullet::new(10.0, 10.0, sprite, -10.0);
    // A single pixel in the bullet's hollow centre
    let inside = Masked(Rect::new(11, 11, 1, 1), PixelMask::filled(1, 1));
    let on_edge = Masked(Rect::new(10, 12, 1, 1), PixelMask::filled(1, 1));
    assert!(!bullet.collision(&inside));
    assert!(bullet.collision(&on_edge));
}
