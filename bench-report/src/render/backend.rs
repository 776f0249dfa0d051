//! Drawing backend wrapper that keeps text rendering independent of fonts
//!
//! The bitmap backend needs a system font stack to rasterize text. When that
//! is unavailable (no `ttf` feature, or the font lookup fails at runtime) the
//! wrapper draws text with the built-in glyphs instead, so chart rendering
//! never fails on a machine without fonts and stays deterministic.

use super::glyphs::{self, GLYPH_ADVANCE, GLYPH_WIDTH};
use plotters_backend::{
    text_anchor, BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend,
    DrawingErrorKind,
};
use std::panic;

pub struct FontSafeBackend<DB> {
    inner: DB,
    native_text: bool,
}

impl<DB> FontSafeBackend<DB> {
    /// Wrap a backend, using system fonts only when the `ttf` feature is enabled
    pub fn new(inner: DB) -> Self {
        Self::with_native_text(inner, cfg!(feature = "ttf"))
    }

    pub fn with_native_text(inner: DB, native_text: bool) -> Self {
        Self { inner, native_text }
    }

    fn disable_native_text(&mut self) {
        if self.native_text {
            log::warn!("System font rendering failed, using built-in glyphs");
            self.native_text = false;
        }
    }
}

impl<DB: DrawingBackend> DrawingBackend for FontSafeBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        if self.native_text {
            let inner = &mut self.inner;
            match panic::catch_unwind(panic::AssertUnwindSafe(|| {
                inner.draw_text(text, style, pos)
            })) {
                Ok(Err(DrawingErrorKind::FontError(_))) | Err(_) => self.disable_native_text(),
                Ok(result) => return result,
            }
        }
        self.draw_text_fallback(text, style, pos)
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        if self.native_text {
            if let Ok(size) = self.inner.estimate_text_size(text, style) {
                return Ok(size);
            }
        }
        Ok(glyphs::text_size(text, glyphs::scale_for(style.size())))
    }
}

impl<DB: DrawingBackend> FontSafeBackend<DB> {
    fn draw_text_fallback<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let scale = glyphs::scale_for(style.size());
        let (width, height) = glyphs::text_size(text, scale);
        let (width, height) = (width as i32, height as i32);

        // Offsets of the text box's upper-left corner relative to the anchor
        let dx = match style.anchor().h_pos {
            text_anchor::HPos::Left => 0,
            text_anchor::HPos::Center => -width / 2,
            text_anchor::HPos::Right => -width,
        };
        let dy = match style.anchor().v_pos {
            text_anchor::VPos::Top => 0,
            text_anchor::VPos::Center => -height / 2,
            text_anchor::VPos::Bottom => -height,
        };

        let transform = style.transform();
        let mut cursor_x = dx;
        for ch in text.chars() {
            if let Some(rows) = glyphs::glyph(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..GLYPH_WIDTH {
                        if i32::from(*bits) & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                            continue;
                        }
                        let x = cursor_x + col * scale;
                        let y = dy + row as i32 * scale;
                        for sx in 0..scale {
                            for sy in 0..scale {
                                let (tx, ty) = transform.transform(x + sx, y + sy);
                                self.inner.draw_pixel((pos.0 + tx, pos.1 + ty), color.clone())?;
                            }
                        }
                    }
                }
            }
            cursor_x += GLYPH_ADVANCE * scale;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::style::{FontTransform, IntoFont, TextStyle};
    use std::collections::HashSet;

    /// Records every pixel it is asked to draw
    #[derive(Default)]
    struct PixelRecorder {
        pixels: HashSet<BackendCoord>,
    }

    #[derive(Debug)]
    struct NeverFails;

    impl std::fmt::Display for NeverFails {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("never fails")
        }
    }

    impl std::error::Error for NeverFails {}

    impl DrawingBackend for PixelRecorder {
        type ErrorType = NeverFails;

        fn get_size(&self) -> (u32, u32) {
            (400, 400)
        }

        fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<NeverFails>> {
            Ok(())
        }

        fn present(&mut self) -> Result<(), DrawingErrorKind<NeverFails>> {
            Ok(())
        }

        fn draw_pixel(
            &mut self,
            point: BackendCoord,
            _color: BackendColor,
        ) -> Result<(), DrawingErrorKind<NeverFails>> {
            self.pixels.insert(point);
            Ok(())
        }
    }

    fn font(size: f64) -> TextStyle<'static> {
        ("sans-serif", size).into_font().into()
    }

    fn bounds(pixels: &HashSet<BackendCoord>) -> (BackendCoord, BackendCoord) {
        let min_x = pixels.iter().map(|p| p.0).min().unwrap();
        let max_x = pixels.iter().map(|p| p.0).max().unwrap();
        let min_y = pixels.iter().map(|p| p.1).min().unwrap();
        let max_y = pixels.iter().map(|p| p.1).max().unwrap();
        ((min_x, min_y), (max_x, max_y))
    }

    #[test]
    fn test_fallback_draws_glyphs() {
        let mut backend = FontSafeBackend::with_native_text(PixelRecorder::default(), false);
        backend.draw_text("Tempo (ms)", &font(10.0), (100, 100)).unwrap();

        let ((min_x, min_y), (max_x, max_y)) = bounds(&backend.inner.pixels);
        assert!(min_x >= 100 && min_y >= 100);
        assert!(max_x < 100 + 10 * GLYPH_ADVANCE);
        assert!(max_y < 100 + 7);
    }

    #[test]
    fn test_blank_text_draws_nothing() {
        let mut backend = FontSafeBackend::with_native_text(PixelRecorder::default(), false);
        backend.draw_text("   ", &font(20.0), (10, 10)).unwrap();

        assert!(backend.inner.pixels.is_empty());
    }

    #[test]
    fn test_centered_anchor() {
        let style = font(10.0).pos(text_anchor::Pos::new(
            text_anchor::HPos::Center,
            text_anchor::VPos::Center,
        ));
        let mut backend = FontSafeBackend::with_native_text(PixelRecorder::default(), false);
        backend.draw_text("HH", &style, (200, 200)).unwrap();

        let ((min_x, min_y), (max_x, max_y)) = bounds(&backend.inner.pixels);
        assert!(min_x < 200 && max_x > 200);
        assert!(min_y < 200 && max_y > 200);
    }

    #[test]
    fn test_rotated_text_runs_vertically() {
        let style: TextStyle = ("sans-serif", 10.0)
            .into_font()
            .transform(FontTransform::Rotate270)
            .into();
        let mut backend = FontSafeBackend::with_native_text(PixelRecorder::default(), false);
        backend.draw_text("HHHH", &style, (50, 300)).unwrap();

        let ((min_x, min_y), (max_x, max_y)) = bounds(&backend.inner.pixels);
        assert!(max_y - min_y > max_x - min_x);
    }

    #[test]
    fn test_fallback_keeps_letter_case_and_accents() {
        let draw = |text: &str| {
            let mut backend = FontSafeBackend::with_native_text(PixelRecorder::default(), false);
            backend.draw_text(text, &font(10.0), (0, 0)).unwrap();
            backend.inner.pixels
        };

        assert_ne!(draw("Redução de ~52.4ms"), draw("REDUÇÃO DE ~52.4MS"));
        assert_ne!(draw("Redução"), draw("Reducao"));
        assert_ne!(draw("ms"), draw("MS"));
        assert_ne!(draw("n²"), draw("n2"));
    }

    #[test]
    fn test_estimate_matches_glyph_metrics() {
        let backend = FontSafeBackend::with_native_text(PixelRecorder::default(), false);
        let size = backend.estimate_text_size("abc", &font(20.0)).unwrap();

        assert_eq!(size, glyphs::text_size("abc", 2));
    }
}
