use std::sync::Arc;

use kurbo::Rect;

use crate::foundation::core::{Affine, BezPath, CanvasSize, Point, RasterImage};
use crate::foundation::error::{WidgetError, WidgetResult};
use crate::foundation::math::{
    mul_div255_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use crate::render::shape::MaskShape;

/// Integer destination rect of the source image on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Left edge in canvas pixels.
    pub left: i32,
    /// Top edge in canvas pixels.
    pub top: i32,
    /// Scaled width in pixels.
    pub width: u32,
    /// Scaled height in pixels.
    pub height: u32,
}

impl Placement {
    /// Scale the longer side of `src_w x src_h` to the canvas and center it.
    pub fn fit(src_w: u32, src_h: u32, canvas: CanvasSize) -> Self {
        let center = canvas.half();
        let side = u64::from(canvas.get());
        let longest = u64::from(src_w.max(src_h).max(1));
        // Exact `trunc(len * side / longest)`.
        let width = (u64::from(src_w) * side / longest) as u32;
        let height = (u64::from(src_h) * side / longest) as u32;
        let left = (center - f64::from(width) / 2.0) as i32;
        let top = (center - f64::from(height) / 2.0) as i32;
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Transform mapping source pixel space onto the destination rect.
    pub fn transform(self, src_w: u32, src_h: u32) -> Affine {
        let sx = f64::from(self.width) / f64::from(src_w.max(1));
        let sy = f64::from(self.height) / f64::from(src_h.max(1));
        Affine::translate((f64::from(self.left), f64::from(self.top)))
            * Affine::scale_non_uniform(sx, sy)
    }

    fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Backdrop painted inside the mask before the image is drawn.
pub const DEFAULT_BACKDROP_RGBA: [u8; 4] = [0, 0, 0, 255];

/// CPU mask compositor backed by `vello_cpu`.
///
/// Holds a render context that is reused while the canvas size stays the same.
pub struct CpuCompositor {
    ctx: Option<vello_cpu::RenderContext>,
    backdrop_rgba: [u8; 4],
}

impl Default for CpuCompositor {
    fn default() -> Self {
        Self {
            ctx: None,
            backdrop_rgba: DEFAULT_BACKDROP_RGBA,
        }
    }
}

impl CpuCompositor {
    /// Create a compositor with no cached render context and an opaque black backdrop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a compositor that fills the mask with straight RGBA `rgba` under the image.
    pub fn with_backdrop_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.backdrop_rgba = rgba;
        self
    }

    /// Composite `image` onto a `canvas x canvas` surface clipped to `shape`.
    ///
    /// [`MaskShape::None`] returns the input unchanged.
    #[tracing::instrument(skip(self, image), fields(src_w = image.width, src_h = image.height))]
    pub fn composite(
        &mut self,
        image: &RasterImage,
        canvas: CanvasSize,
        shape: MaskShape,
    ) -> WidgetResult<RasterImage> {
        let c = canvas.half();
        match shape.path(Point::new(c, c), c) {
            Some(path) => self.composite_with_path(image, canvas, &path),
            None => Ok(image.clone()),
        }
    }

    /// Fill `path` with the backdrop, then scale and center `image` over it, clipped to
    /// `path`. Pixels outside `path` are transparent.
    pub fn composite_with_path(
        &mut self,
        image: &RasterImage,
        canvas: CanvasSize,
        path: &BezPath,
    ) -> WidgetResult<RasterImage> {
        let side: u16 = canvas
            .get()
            .try_into()
            .map_err(|_| WidgetError::validation("canvas size exceeds u16"))?;
        let placement = Placement::fit(image.width, image.height, canvas);
        let paint = if image.width == 0 || image.height == 0 || placement.is_empty() {
            None
        } else {
            let mut premul = image.data.clone();
            premultiply_rgba8_in_place(&mut premul);
            Some(rgba_premul_to_image(&premul, image.width, image.height)?)
        };

        let [r, g, b, a] = self.backdrop_rgba;
        let mut content = vello_cpu::Pixmap::new(side, side);
        clear_pixmap_to_transparent(&mut content);
        let (w, h) = (f64::from(image.width), f64::from(image.height));
        let tr = placement.transform(image.width, image.height);
        self.with_ctx_mut(side, side, |ctx| {
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(Affine::IDENTITY);
            ctx.set_transform(Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_path(path);
            if let Some(paint) = paint {
                ctx.set_transform(tr);
                ctx.set_paint(paint);
                ctx.fill_rect(&Rect::new(0.0, 0.0, w, h));
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut content);
            Ok(())
        })?;

        let mut mask = vello_cpu::Pixmap::new(side, side);
        clear_pixmap_to_transparent(&mut mask);
        self.with_ctx_mut(side, side, |ctx| {
            ctx.set_transform(Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(path);
            ctx.flush();
            ctx.render_to_pixmap(&mut mask);
            Ok(())
        })?;

        let src = content.data_as_u8_slice();
        let mask = mask.data_as_u8_slice();
        let mut out = vec![0u8; src.len()];
        if mask.len() != src.len() {
            return Err(WidgetError::render("mask surface size mismatch"));
        }
        mask_apply_alpha(src, mask, &mut out);
        unpremultiply_rgba8_in_place(&mut out);

        tracing::debug!(
            canvas = canvas.get(),
            left = placement.left,
            top = placement.top,
            width = placement.width,
            height = placement.height,
            "composited thumbnail"
        );
        RasterImage::from_rgba8(canvas.get(), canvas.get(), out)
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> WidgetResult<R>,
    ) -> WidgetResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

/// Composite with a one-off [`CpuCompositor`].
pub fn composite(
    image: &RasterImage,
    canvas: CanvasSize,
    shape: MaskShape,
) -> WidgetResult<RasterImage> {
    CpuCompositor::new().composite(image, canvas, shape)
}

fn mask_apply_alpha(src: &[u8], mask: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), mask.len());
    debug_assert_eq!(src.len(), dst.len());

    for ((s, m), d) in src
        .chunks_exact(4)
        .zip(mask.chunks_exact(4))
        .zip(dst.chunks_exact_mut(4))
    {
        let w16 = u16::from(m[3]);
        d[0] = mul_div255_u8(u16::from(s[0]), w16);
        d[1] = mul_div255_u8(u16::from(s[1]), w16);
        d[2] = mul_div255_u8(u16::from(s[2]), w16);
        d[3] = mul_div255_u8(u16::from(s[3]), w16);
    }
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> WidgetResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| WidgetError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| WidgetError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(WidgetError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> WidgetResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
