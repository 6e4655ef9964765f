use std::path::Path;

use image::{imageops, RgbaImage};

use crate::error::AssetLoadError;

pub const GAP_TOP: u32 = 10;
pub const TEXT_BAND_HEIGHT: u32 = 25;
pub const GAP_BOTTOM: u32 = 10;

/// Placement of both halves inside the composite. Depends only on the two
/// trimmed sizes, never on pixel content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub top_x: u32,
    pub bottom_x: u32,
    pub bottom_y: u32,
    /// Label center relative to the composite center, in pixels (y down).
    pub text_offset_y: i32,
}

impl Layout {
    pub fn new(top: (u32, u32), bottom: (u32, u32)) -> Self {
        let (top_w, top_h) = top;
        let (bottom_w, bottom_h) = bottom;

        let width = top_w.max(bottom_w);
        let bottom_y = top_h + GAP_TOP + TEXT_BAND_HEIGHT + GAP_BOTTOM;
        let height = bottom_y + bottom_h;

        let text_offset_y = (-(height as i32)).div_euclid(2)
            + top_h as i32
            + GAP_TOP as i32
            + (TEXT_BAND_HEIGHT / 2) as i32;

        Self {
            width,
            height,
            top_x: (width - top_w) / 2,
            bottom_x: (width - bottom_w) / 2,
            bottom_y,
            text_offset_y,
        }
    }
}

pub struct Composite {
    pub image: RgbaImage,
    pub layout: Layout,
}

impl Composite {
    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    pub fn text_offset_y(&self) -> i32 {
        self.layout.text_offset_y
    }
}

/// Crops `image` to the bounding box of its non-transparent pixels. A fully
/// transparent image comes back unchanged.
pub fn trim_transparent(image: &RgbaImage) -> RgbaImage {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bbox = Some(match bbox {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    match bbox {
        Some((x0, y0, x1, y1)) => {
            imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
        }
        None => image.clone(),
    }
}

/// Pastes `src` at `(x, y)` using its own alpha as the mask. Every channel,
/// alpha included, is mixed as `src * a + dst * (255 - a)`, so a half
/// transparent edge pixel over a clear canvas comes out premultiplied.
fn paste_masked(dst: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, pixel) in src.enumerate_pixels() {
        let Some(target) = dst.get_pixel_mut_checked(x + sx, y + sy) else {
            continue;
        };
        let mask = u32::from(pixel[3]);
        for channel in 0..4 {
            let mixed =
                u32::from(pixel[channel]) * mask + u32::from(target[channel]) * (255 - mask);
            target[channel] = div255(mixed);
        }
    }
}

/// Rounded division by 255 for values up to `255 * 255`.
fn div255(value: u32) -> u8 {
    let t = value + 128;
    (((t >> 8) + t) >> 8) as u8
}

pub fn load_rgba(path: &Path) -> Result<RgbaImage, AssetLoadError> {
    if !path.is_file() {
        return Err(AssetLoadError::Missing {
            path: path.to_path_buf(),
        });
    }
    let image = image::open(path).map_err(|source| AssetLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Trims both halves and stacks them: top flush with y = 0, bottom flush with
/// the last row, each centered horizontally. The band between stays clear.
pub fn compose(top: &RgbaImage, bottom: &RgbaImage) -> Composite {
    let top = trim_transparent(top);
    let bottom = trim_transparent(bottom);
    let layout = Layout::new(top.dimensions(), bottom.dimensions());

    let mut image = RgbaImage::new(layout.width, layout.height);
    paste_masked(&mut image, &top, layout.top_x, 0);
    paste_masked(&mut image, &bottom, layout.bottom_x, layout.bottom_y);

    Composite { image, layout }
}

pub fn compose_from_paths(top_path: &Path, bottom_path: &Path) -> Result<Composite, AssetLoadError> {
    let top = load_rgba(top_path)?;
    let bottom = load_rgba(bottom_path)?;
    let composite = compose(&top, &bottom);
    log::info!(
        "Composite sprite {}x{} (label offset {})",
        composite.width(),
        composite.height(),
        composite.text_offset_y()
    );
    Ok(composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;
    use std::path::PathBuf;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn test_temp_path(hint: &str) -> PathBuf {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "bb_compositor_test_{}_{}_{}.png",
            hint,
            std::process::id(),
            nanos
        ))
    }

    /// `w`x`h` block of `color` inside `pad` pixels of transparent border.
    fn padded(w: u32, h: u32, pad: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_fn(w + pad * 2, h + pad * 2, |x, y| {
            let inside = x >= pad && x < pad + w && y >= pad && y < pad + h;
            if inside {
                color
            } else {
                CLEAR
            }
        })
    }

    #[test]
    fn layout_adds_fixed_band() {
        let layout = Layout::new((100, 40), (80, 30));
        assert_eq!(layout.width, 100);
        assert_eq!(layout.height, 40 + 10 + 25 + 10 + 30);
        assert_eq!(layout.top_x, 0);
        assert_eq!(layout.bottom_x, 10);
        assert_eq!(layout.bottom_y, 85);
        // floor(-115 / 2) + 40 + 10 + 12
        assert_eq!(layout.text_offset_y, 4);
    }

    #[test]
    fn layout_centers_narrower_top() {
        let layout = Layout::new((51, 20), (100, 20));
        assert_eq!(layout.width, 100);
        assert_eq!(layout.top_x, 24);
        assert_eq!(layout.bottom_x, 0);
        // height 85: floor(-42.5) = -43, + 20 + 10 + 12
        assert_eq!(layout.text_offset_y, -1);
    }

    #[test]
    fn layout_is_deterministic() {
        assert_eq!(Layout::new((64, 33), (70, 21)), Layout::new((64, 33), (70, 21)));
    }

    #[test]
    fn trim_crops_to_opaque_bbox() {
        let trimmed = trim_transparent(&padded(30, 12, 7, RED));
        assert_eq!(trimmed.dimensions(), (30, 12));
        assert!(trimmed.pixels().all(|p| *p == RED));
    }

    #[test]
    fn trim_keeps_faint_alpha() {
        let mut image = RgbaImage::from_pixel(8, 8, CLEAR);
        image.put_pixel(2, 3, Rgba([0, 0, 0, 1]));
        image.put_pixel(5, 6, Rgba([0, 0, 0, 1]));
        assert_eq!(trim_transparent(&image).dimensions(), (4, 4));
    }

    #[test]
    fn trim_leaves_fully_transparent_image() {
        let image = RgbaImage::from_pixel(9, 4, CLEAR);
        assert_eq!(trim_transparent(&image).dimensions(), (9, 4));
    }

    #[test]
    fn compose_places_halves_and_clears_band() {
        let composite = compose(&padded(100, 40, 5, RED), &padded(80, 30, 3, BLUE));
        assert_eq!((composite.width(), composite.height()), (100, 115));
        assert_eq!(composite.text_offset_y(), 4);

        let image = &composite.image;
        assert_eq!(*image.get_pixel(0, 0), RED);
        assert_eq!(*image.get_pixel(99, 39), RED);
        for y in 40..85 {
            assert_eq!(*image.get_pixel(50, y), CLEAR, "band row {y}");
        }
        assert_eq!(*image.get_pixel(9, 85), CLEAR);
        assert_eq!(*image.get_pixel(10, 85), BLUE);
        assert_eq!(*image.get_pixel(89, 114), BLUE);
        assert_eq!(*image.get_pixel(90, 114), CLEAR);
    }

    #[test]
    fn partial_alpha_is_mixed_with_the_clear_canvas() {
        let half = Rgba([200, 100, 50, 128]);
        let mut top = RgbaImage::from_pixel(2, 1, RED);
        top.put_pixel(1, 0, half);
        let composite = compose(&top, &RgbaImage::from_pixel(2, 1, BLUE));

        assert_eq!(*composite.image.get_pixel(0, 0), RED);
        assert_eq!(*composite.image.get_pixel(1, 0), Rgba([100, 50, 25, 64]));
    }

    #[test]
    fn div255_rounds_to_nearest() {
        assert_eq!(div255(0), 0);
        assert_eq!(div255(255 * 255), 255);
        assert_eq!(div255(255 * 128), 128);
        assert_eq!(div255(128 * 128), 64);
    }

    #[test]
    fn padding_does_not_change_layout() {
        let tight = compose(&padded(60, 20, 0, RED), &padded(64, 18, 0, BLUE));
        let loose = compose(&padded(60, 20, 11, RED), &padded(64, 18, 2, BLUE));
        assert_eq!(tight.layout, loose.layout);
    }

    #[test]
    fn missing_asset_is_reported() {
        let path = test_temp_path("missing");
        let _ = fs::remove_file(&path);
        match load_rgba(&path) {
            Err(AssetLoadError::Missing { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected Missing, got {:?}", other.map(|i| i.dimensions())),
        }
    }

    #[test]
    fn corrupt_asset_is_a_decode_error() {
        let path = test_temp_path("corrupt");
        fs::write(&path, b"definitely not a png").expect("write");
        let result = load_rgba(&path);
        assert!(matches!(result, Err(AssetLoadError::Decode { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn compose_from_paths_reads_png_files() {
        let top_path = test_temp_path("top");
        let bottom_path = test_temp_path("bottom");
        padded(40, 10, 4, RED).save(&top_path).expect("save top");
        padded(30, 12, 1, BLUE).save(&bottom_path).expect("save bottom");

        let composite = compose_from_paths(&top_path, &bottom_path).expect("compose");
        assert_eq!(composite.width(), 40);
        assert_eq!(composite.height(), 10 + 45 + 12);

        let _ = fs::remove_file(&top_path);
        let _ = fs::remove_file(&bottom_path);
    }

    #[test]
    fn compose_from_paths_fails_on_first_missing_half() {
        let bottom_path = test_temp_path("only_bottom");
        padded(8, 8, 0, BLUE).save(&bottom_path).expect("save bottom");
        let missing = test_temp_path("no_top");

        let err = compose_from_paths(&missing, &bottom_path)
            .err()
            .expect("missing top should fail");
        match &err {
            AssetLoadError::Missing { path } => assert_eq!(path, &missing),
            other => panic!("expected Missing, got {other}"),
        }
        assert!(err.to_string().contains("not found"));

        let _ = fs::remove_file(&bottom_path);
    }
}
