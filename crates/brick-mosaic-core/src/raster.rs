use image::{Rgb as ImgRgb, RgbImage, Rgba, RgbaImage};

use crate::error::{MosaicError, Result};
use crate::model::{MosaicResult, PlacedPiece, Rgb};

/// Row-major pixel buffer of an already decoded and resized image.
pub fn pixels_from_image(img: &RgbImage) -> Vec<Rgb> {
    img.pixels().map(|&ImgRgb(p)| Rgb::from(p)).collect()
}

/// Preview drawing options.
#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    /// Pixels per stud.
    pub scale: u32,
    /// Dark 1px border around every piece.
    pub outlines: bool,
    /// Lighter dot in the middle of each stud (only drawn when `scale >= 6`).
    pub studs: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            scale: 16,
            outlines: true,
            studs: true,
        }
    }
}

/// Draws every placed piece as a filled rectangle in its color.
///
/// The canvas is `width * scale` by `height * scale`; a scale whose canvas
/// does not fit in memory addressing is rejected as `InvalidConfig`.
pub fn render_preview(result: &MosaicResult, opts: &PreviewOptions) -> Result<RgbaImage> {
    if opts.scale == 0 {
        return Err(MosaicError::InvalidConfig("preview scale must be > 0".into()));
    }
    let s = opts.scale;
    let too_large = || {
        MosaicError::InvalidConfig(format!(
            "preview of {}x{} at scale {} is too large",
            result.width, result.height, s
        ))
    };
    let cw = result.width.checked_mul(s).ok_or_else(too_large)?;
    let ch = result.height.checked_mul(s).ok_or_else(too_large)?;
    // 4 bytes per RGBA pixel
    let bytes = (cw as u64)
        .checked_mul(ch as u64)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(too_large)?;
    if bytes > isize::MAX as u64 {
        return Err(too_large());
    }
    let mut canvas = RgbaImage::new(cw, ch);
    for piece in &result.placed_pieces {
        // out-of-grid pieces can only come from hand-built or deserialized results
        let right = piece.x as u64 + piece.width as u64;
        let bottom = piece.y as u64 + piece.height as u64;
        if right > result.width as u64 || bottom > result.height as u64 {
            continue;
        }
        draw_piece(&mut canvas, piece, opts);
    }
    Ok(canvas)
}

/// `piece` must lie inside the grid the canvas was sized for.
fn draw_piece(canvas: &mut RgbaImage, piece: &PlacedPiece, opts: &PreviewOptions) {
    let (cw, ch) = canvas.dimensions();
    let s = opts.scale;
    let base = Rgb::from_hex(&piece.color_hex).unwrap_or_default();
    let fill = Rgba([base.r, base.g, base.b, 255]);
    let dx = piece.x * s;
    let dy = piece.y * s;
    let rw = piece.width * s;
    let rh = piece.height * s;

    for yy in 0..rh {
        for xx in 0..rw {
            if dx + xx < cw && dy + yy < ch {
                canvas.put_pixel(dx + xx, dy + yy, fill);
            }
        }
    }

    if opts.studs && s >= 6 {
        let stud = shade(base, 1.18);
        let r = s as i64 * 3 / 10;
        for cy in 0..piece.height {
            for cx in 0..piece.width {
                let mx = (dx + cx * s + s / 2) as i64;
                let my = (dy + cy * s + s / 2) as i64;
                for oy in -r..=r {
                    for ox in -r..=r {
                        if ox * ox + oy * oy > r * r {
                            continue;
                        }
                        let (px, py) = (mx + ox, my + oy);
                        if px >= 0 && py >= 0 && (px as u32) < cw && (py as u32) < ch {
                            canvas.put_pixel(px as u32, py as u32, stud);
                        }
                    }
                }
            }
        }
    }

    if opts.outlines {
        let edge = shade(base, 0.6);
        for xx in 0..rw {
            if dx + xx < cw && dy < ch {
                canvas.put_pixel(dx + xx, dy, edge);
            }
            let by = dy + rh.saturating_sub(1);
            if dx + xx < cw && by < ch {
                canvas.put_pixel(dx + xx, by, edge);
            }
        }
        for yy in 0..rh {
            if dx < cw && dy + yy < ch {
                canvas.put_pixel(dx, dy + yy, edge);
            }
            let rx = dx + rw.saturating_sub(1);
            if rx < cw && dy + yy < ch {
                canvas.put_pixel(rx, dy + yy, edge);
            }
        }
    }
}

fn shade(c: Rgb, factor: f32) -> Rgba<u8> {
    let f = |v: u8| ((v as f32 * factor).round().clamp(0.0, 255.0)) as u8;
    // near-black pieces get a visible grey edge instead of pure black
    let lift = |v: u8| if factor < 1.0 { f(v).max(40) } else { f(v).max(30) };
    Rgba([lift(c.r), lift(c.g), lift(c.b), 255])
}
