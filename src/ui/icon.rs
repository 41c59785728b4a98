//! Tray icon image
//!
//! The icon is a plain red square, rendered with tiny-skia and converted to
//! the top-down BGRA layout `CreateIcon` takes for its colour plane, plus
//! an all-opaque AND mask.

use tiny_skia::{Color, Paint, Pixmap, Rect as SkiaRect, Transform};

/// Icon rendering errors
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("Failed to create {size}x{size} pixmap for the tray icon")]
    PixmapCreationFailed { size: u32 },

    #[error("Invalid icon size: {0}")]
    InvalidSize(u32),
}

/// Raw icon planes ready for the OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub width: u32,
    pub height: u32,
    /// 32bpp colour plane, BGRA, top row first
    pub bgra: Vec<u8>,
    /// 1bpp AND mask; zero bits keep the colour pixel
    pub and_mask: Vec<u8>,
}

/// Edge length of the tray icon in pixels
pub const TRAY_ICON_SIZE: u32 = 64;

/// Fill colour of the tray icon
pub const TRAY_ICON_COLOR: (u8, u8, u8) = (255, 0, 0);

/// Renders the tray icon into a square pixmap
pub fn render_tray_icon(size: u32) -> Result<Pixmap, IconError> {
    let mut pixmap = Pixmap::new(size, size).ok_or(IconError::PixmapCreationFailed { size })?;
    pixmap.fill(Color::TRANSPARENT);

    let rect = SkiaRect::from_xywh(0.0, 0.0, size as f32, size as f32)
        .ok_or(IconError::InvalidSize(size))?;

    let (r, g, b) = TRAY_ICON_COLOR;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = false;

    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    Ok(pixmap)
}

/// Converts a pixmap into icon planes
///
/// tiny-skia stores premultiplied RGBA; the icon wants straight BGRA, so
/// colour is divided back out for partially transparent pixels.
pub fn to_icon_image(pixmap: &Pixmap) -> IconImage {
    let width = pixmap.width();
    let height = pixmap.height();

    let mut bgra = Vec::with_capacity((width * height * 4) as usize);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        bgra.extend_from_slice(&[color.blue(), color.green(), color.red(), color.alpha()]);
    }

    // Mask rows are padded to 16-bit boundaries
    let stride = width.div_ceil(16) * 2;
    let and_mask = vec![0u8; (stride * height) as usize];

    IconImage {
        width,
        height,
        bgra,
        and_mask,
    }
}

/// Renders and converts the tray icon in one step
pub fn tray_icon_image() -> Result<IconImage, IconError> {
    Ok(to_icon_image(&render_tray_icon(TRAY_ICON_SIZE)?))
}
