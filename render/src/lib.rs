use image::RgbaImage;
use pazurugen_core::{build_path, path_origin, piece_size, OutlinePath, PathSegment, PuzzleGrid, PuzzlePiece};
use rayon::prelude::*;
use tiny_skia::{
    FillRule, IntSize, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

/// Seam stroke drawn along each piece outline, clipped to the silhouette so
/// only the inner half of the stroke survives.
const SEAM_WIDTH: f32 = 7.0;
const SEAM_ALPHA: u8 = 128;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("invalid image dimensions")]
    Dimensions,
    #[error("piece rasterization failed: {0}")]
    Rasterization(String),
}

/// One cut-out piece, ready to encode. `row`/`col` locate it in the grid.
pub struct RenderedPiece {
    pub row: u32,
    pub col: u32,
    pub image: RgbaImage,
}

/// Every rendered piece of a puzzle plus the cropped source dimensions the
/// pieces were cut from.
pub struct PieceSet {
    pub pieces: Vec<RenderedPiece>,
    pub width: u32,
    pub height: u32,
}

pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    let image = image::load_from_memory(bytes).map_err(|err| RenderError::Decode(err.to_string()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::Dimensions);
    }
    Ok(rgba)
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let rem = a % b;
        a = b;
        b = rem;
    }
    a
}

/// Crops `image` to the largest top-left-anchored rectangle whose side ratio
/// is exactly `target_w : target_h`, so a cols x rows grid divides it into
/// square cells. Fails when the image cannot fit even one reduced ratio unit.
pub fn crop_to_aspect_ratio(
    image: &RgbaImage,
    target_w: u32,
    target_h: u32,
) -> Result<RgbaImage, RenderError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || target_w == 0 || target_h == 0 {
        return Err(RenderError::Dimensions);
    }
    if width as u64 * target_h as u64 == height as u64 * target_w as u64 {
        return Ok(image.clone());
    }

    let unit = gcd(target_w, target_h);
    let unit_w = target_w / unit;
    let unit_h = target_h / unit;
    let factor = (width / unit_w).min(height / unit_h);
    if factor == 0 {
        return Err(RenderError::Dimensions);
    }
    let crop_w = factor * unit_w;
    let crop_h = factor * unit_h;
    log::debug!("cropping {width}x{height} to {crop_w}x{crop_h} for ratio {target_w}:{target_h}");
    Ok(image::imageops::crop_imm(image, 0, 0, crop_w, crop_h).to_image())
}

/// tiny-skia works on premultiplied alpha; `image` keeps it straight.
pub fn pixmap_from_rgba(image: &RgbaImage) -> Result<Pixmap, RenderError> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height).ok_or(RenderError::Dimensions)?;
    let mut data = image.as_raw().clone();
    for pixel in data.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        if alpha < 255 {
            pixel[0] = ((pixel[0] as u16 * alpha + 127) / 255) as u8;
            pixel[1] = ((pixel[1] as u16 * alpha + 127) / 255) as u8;
            pixel[2] = ((pixel[2] as u16 * alpha + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, size).ok_or(RenderError::Dimensions)
}

pub fn rgba_from_pixmap(pixmap: Pixmap) -> Result<RgbaImage, RenderError> {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut data = pixmap.take();
    for pixel in data.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        if alpha == 0 {
            pixel[0] = 0;
            pixel[1] = 0;
            pixel[2] = 0;
        } else if alpha < 255 {
            pixel[0] = ((pixel[0] as u16 * 255 + alpha / 2) / alpha).min(255) as u8;
            pixel[1] = ((pixel[1] as u16 * 255 + alpha / 2) / alpha).min(255) as u8;
            pixel[2] = ((pixel[2] as u16 * 255 + alpha / 2) / alpha).min(255) as u8;
        }
    }
    RgbaImage::from_raw(width, height, data).ok_or(RenderError::Dimensions)
}

fn to_skia_path(outline: &OutlinePath) -> Result<Path, RenderError> {
    let mut builder = PathBuilder::new();
    for segment in outline.segments() {
        match *segment {
            PathSegment::MoveTo((x, y)) => builder.move_to(x, y),
            PathSegment::LineTo((x, y)) => builder.line_to(x, y),
            PathSegment::CurveTo {
                control1,
                control2,
                to,
            } => builder.cubic_to(control1.0, control1.1, control2.0, control2.1, to.0, to.1),
            PathSegment::Close => builder.close(),
        }
    }
    builder
        .finish()
        .ok_or_else(|| RenderError::Rasterization("outline produced an empty path".into()))
}

/// Cuts one piece out of `source`. `image_origin` is where the piece's base
/// square sits in source coordinates; the outline acts as a clip mask for the
/// composite and for the seam stroke.
pub fn render_piece(
    piece: &PuzzlePiece,
    source: &Pixmap,
    image_origin: (f32, f32),
    piece_width: f32,
) -> Result<RgbaImage, RenderError> {
    let size = piece_size(piece, piece_width);
    let buffer_w = size.0 as u32;
    let buffer_h = size.1 as u32;
    if buffer_w == 0 || buffer_h == 0 {
        return Err(RenderError::Dimensions);
    }

    let origin = path_origin(piece, piece_width);
    let outline = build_path(piece, origin, piece_width);
    let path = to_skia_path(&outline)?;

    let mut mask = Mask::new(buffer_w, buffer_h).ok_or(RenderError::Dimensions)?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());

    let mut pixmap = Pixmap::new(buffer_w, buffer_h).ok_or(RenderError::Dimensions)?;
    pixmap.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &PixmapPaint::default(),
        Transform::from_translate(origin.0 - image_origin.0, origin.1 - image_origin.1),
        Some(&mask),
    );

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, SEAM_ALPHA);
    paint.anti_alias = true;
    let stroke = Stroke {
        width: SEAM_WIDTH,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), Some(&mask));

    rgba_from_pixmap(pixmap)
}

/// Crops `source` to the grid's aspect ratio, then renders every piece in
/// parallel. A piece that fails to rasterize is skipped with a warning; the
/// whole render fails only when nothing could be produced.
pub fn create_images(grid: &PuzzleGrid, source: &RgbaImage) -> Result<PieceSet, RenderError> {
    let cropped = crop_to_aspect_ratio(source, grid.cols(), grid.rows())?;
    let (width, height) = cropped.dimensions();
    let piece_width = width as f32 / grid.cols() as f32;
    let piece_height = height as f32 / grid.rows() as f32;
    let source_pixmap = pixmap_from_rgba(&cropped)?;

    let step_x = piece_width.floor();
    let step_y = piece_height.floor();
    let pieces: Vec<RenderedPiece> = grid
        .pieces()
        .par_iter()
        .filter_map(|piece| {
            let image_origin = (step_x * piece.col as f32, step_y * piece.row as f32);
            match render_piece(piece, &source_pixmap, image_origin, piece_width) {
                Ok(image) => Some(RenderedPiece {
                    row: piece.row,
                    col: piece.col,
                    image,
                }),
                Err(err) => {
                    log::warn!("skipping piece row{} col{}: {err}", piece.row, piece.col);
                    None
                }
            }
        })
        .collect();

    if pieces.is_empty() {
        return Err(RenderError::Rasterization(
            "no piece could be rendered".into(),
        ));
    }

    Ok(PieceSet {
        pieces,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pazurugen_core::{NubState, DEFAULT_SHAPE_SEED};

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 64, 255]))
    }

    fn piece_with(top: NubState, right: NubState, bottom: NubState, left: NubState) -> PuzzlePiece {
        PuzzlePiece {
            row: 0,
            col: 0,
            top,
            right,
            bottom,
            left,
        }
    }

    #[test]
    fn crop_keeps_matching_ratio_untouched() {
        let image = gradient(300, 200);
        let cropped = crop_to_aspect_ratio(&image, 3, 2).unwrap();
        assert_eq!(cropped.dimensions(), (300, 200));
        assert_eq!(cropped.as_raw(), image.as_raw());
    }

    #[test]
    fn crop_takes_largest_exact_fit_from_top_left() {
        let image = gradient(1000, 500);
        let cropped = crop_to_aspect_ratio(&image, 1, 1).unwrap();
        assert_eq!(cropped.dimensions(), (500, 500));
        assert_eq!(cropped.get_pixel(0, 0), image.get_pixel(0, 0));
        assert_eq!(cropped.get_pixel(499, 499), image.get_pixel(499, 499));
    }

    #[test]
    fn crop_ratio_is_exact() {
        let image = gradient(357, 211);
        let cropped = crop_to_aspect_ratio(&image, 3, 2).unwrap();
        let (w, h) = cropped.dimensions();
        assert_eq!(w as u64 * 2, h as u64 * 3);
        assert!(w <= 357 && h <= 211);
    }

    #[test]
    fn crop_rejects_degenerate_inputs() {
        let image = gradient(2, 2);
        assert!(matches!(
            crop_to_aspect_ratio(&image, 5, 1),
            Err(RenderError::Dimensions)
        ));
        assert!(matches!(
            crop_to_aspect_ratio(&image, 0, 3),
            Err(RenderError::Dimensions)
        ));
    }

    #[test]
    fn opaque_pixels_round_trip_through_pixmap() {
        let image = gradient(16, 16);
        let pixmap = pixmap_from_rgba(&image).unwrap();
        let back = rgba_from_pixmap(pixmap).unwrap();
        assert_eq!(back.as_raw(), image.as_raw());
    }

    #[test]
    fn plain_piece_copies_the_source_interior() {
        let source = pixmap_from_rgba(&gradient(64, 64)).unwrap();
        let piece = piece_with(
            NubState::Straight,
            NubState::Straight,
            NubState::Straight,
            NubState::Straight,
        );
        let rendered = render_piece(&piece, &source, (0.0, 0.0), 64.0).unwrap();
        assert_eq!(rendered.dimensions(), (64, 64));
        // Center is clear of both the seam stroke and any nub geometry.
        assert_eq!(rendered.get_pixel(32, 32), &Rgba([32, 32, 64, 255]));
    }

    #[test]
    fn tab_nub_pulls_pixels_from_past_the_cell() {
        let source = pixmap_from_rgba(&gradient(128, 64)).unwrap();
        let piece = piece_with(
            NubState::Straight,
            NubState::TabOut,
            NubState::Straight,
            NubState::Straight,
        );
        let rendered = render_piece(&piece, &source, (0.0, 0.0), 64.0).unwrap();
        // 64 + one nub length (12.8), truncated.
        assert_eq!(rendered.dimensions(), (76, 64));
        // Inside the nub: source content from beyond x = 64.
        assert_eq!(rendered.get_pixel(69, 32), &Rgba([69, 32, 64, 255]));
        // Outside the silhouette the buffer stays transparent.
        assert_eq!(rendered.get_pixel(75, 0).0[3], 0);
        assert_eq!(rendered.get_pixel(75, 63).0[3], 0);
    }

    #[test]
    fn socket_recess_is_transparent() {
        let source = pixmap_from_rgba(&gradient(64, 64)).unwrap();
        let piece = piece_with(
            NubState::SocketIn,
            NubState::Straight,
            NubState::Straight,
            NubState::Straight,
        );
        let rendered = render_piece(&piece, &source, (0.0, 0.0), 64.0).unwrap();
        assert_eq!(rendered.dimensions(), (64, 64));
        // Middle of the recessed band, well inside the socket.
        assert_eq!(rendered.get_pixel(32, 5).0[3], 0);
        // The flat of the top edge outside the socket band is still opaque.
        assert_eq!(rendered.get_pixel(10, 32).0[3], 255);
    }

    #[test]
    fn grid_render_produces_every_piece() {
        let grid = PuzzleGrid::new(2, 2, DEFAULT_SHAPE_SEED).unwrap();
        let source = gradient(128, 128);
        let set = create_images(&grid, &source).unwrap();
        assert_eq!(set.pieces.len(), 4);
        assert_eq!((set.width, set.height), (128, 128));

        for rendered in &set.pieces {
            let piece = grid.piece(rendered.row, rendered.col).unwrap();
            let expected = piece_size(piece, 64.0);
            assert_eq!(
                rendered.image.dimensions(),
                (expected.0 as u32, expected.1 as u32)
            );
        }

        // Top-left piece has straight top/left edges, so its buffer origin
        // coincides with the source origin.
        let top_left = set
            .pieces
            .iter()
            .find(|rendered| rendered.row == 0 && rendered.col == 0)
            .unwrap();
        assert_eq!(top_left.image.get_pixel(20, 20), &Rgba([20, 20, 64, 255]));
    }

    #[test]
    fn grid_render_crops_oversized_sources() {
        let grid = PuzzleGrid::new(2, 2, DEFAULT_SHAPE_SEED).unwrap();
        let source = gradient(100, 60);
        let set = create_images(&grid, &source).unwrap();
        assert_eq!((set.width, set.height), (60, 60));
        assert_eq!(set.pieces.len(), 4);
    }
}
