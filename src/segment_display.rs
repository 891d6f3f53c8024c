//! Segment-style glyph renderer for the face label
//!
//! Draws watch-style glyphs from seven hexagonal segments (pointed ends,
//! 90 degrees) into a frame buffer, then blits the whole row to the display
//! in one transfer.

use embedded_graphics::{
    draw_target::DrawTarget,
    pixelcolor::PixelColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use embedded_graphics_framebuf::FrameBuf;

/// Seven segment bit set.
///
/// ```text
///    AAAAA
///   F     B
///   F     B
///    GGGGG
///   E     C
///   E     C
///    DDDDD
/// ```
#[derive(Clone, Copy)]
pub struct Segments(pub u8);

impl Segments {
    /// Segment A (top horizontal)
    pub const A: u8 = 0b0100_0000;
    /// Segment B (top right vertical)
    pub const B: u8 = 0b0010_0000;
    /// Segment C (bottom right vertical)
    pub const C: u8 = 0b0001_0000;
    /// Segment D (bottom horizontal)
    pub const D: u8 = 0b0000_1000;
    /// Segment E (bottom left vertical)
    pub const E: u8 = 0b0000_0100;
    /// Segment F (top left vertical)
    pub const F: u8 = 0b0000_0010;
    /// Segment G (middle horizontal)
    pub const G: u8 = 0b0000_0001;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Glyph for an ASCII character, if seven segments can fake it.
    /// Letters use the usual segment-display shapes (some render as
    /// lowercase).
    pub fn from_char(c: char) -> Option<Self> {
        let bits = match c {
            '0' | 'O' => Self::A | Self::B | Self::C | Self::D | Self::E | Self::F,
            '1' => Self::B | Self::C,
            '2' => Self::A | Self::B | Self::D | Self::E | Self::G,
            '3' => Self::A | Self::B | Self::C | Self::D | Self::G,
            '4' => Self::B | Self::C | Self::F | Self::G,
            '5' | 'S' => Self::A | Self::C | Self::D | Self::F | Self::G,
            '6' => Self::A | Self::C | Self::D | Self::E | Self::F | Self::G,
            '7' => Self::A | Self::B | Self::C,
            '8' => Self::A | Self::B | Self::C | Self::D | Self::E | Self::F | Self::G,
            '9' => Self::A | Self::B | Self::C | Self::D | Self::F | Self::G,
            ' ' => 0,
            '-' => Self::G,
            'A' => Self::A | Self::B | Self::C | Self::E | Self::F | Self::G,
            'B' => Self::C | Self::D | Self::E | Self::F | Self::G,
            'C' => Self::A | Self::D | Self::E | Self::F,
            'D' => Self::B | Self::C | Self::D | Self::E | Self::G,
            'E' => Self::A | Self::D | Self::E | Self::F | Self::G,
            'F' => Self::A | Self::E | Self::F | Self::G,
            'G' => Self::A | Self::C | Self::D | Self::E | Self::F,
            'H' => Self::B | Self::C | Self::E | Self::F | Self::G,
            'L' => Self::D | Self::E | Self::F,
            'N' => Self::C | Self::E | Self::G,
            'P' => Self::A | Self::B | Self::E | Self::F | Self::G,
            'R' => Self::E | Self::G,
            'T' => Self::D | Self::E | Self::F | Self::G,
            'U' => Self::B | Self::C | Self::D | Self::E | Self::F,
            _ => return None,
        };
        Some(Self(bits))
    }

    pub fn contains(&self, segment: u8) -> bool {
        (self.0 & segment) != 0
    }
}

impl core::ops::BitOr for Segments {
    type Output = Segments;
    fn bitor(self, rhs: Segments) -> Self::Output {
        Segments(self.0 | rhs.0)
    }
}

/// Renderer geometry.
#[derive(Debug, Clone, Copy)]
pub struct SegmentConfig {
    /// Size of one glyph
    pub glyph_size: Size,
    /// Spacing between glyphs
    pub glyph_spacing: u32,
    /// Segment width (thickness)
    pub segment_width: u32,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        // 8 glyphs of 24 px plus 7 gaps of 6 px fill 234 px of a 240 px row.
        Self {
            glyph_size: Size::new(24, 48),
            glyph_spacing: 6,
            segment_width: 4,
        }
    }
}

/// Draws segment glyphs into a frame buffer and blits them to a display.
pub struct SegmentDisplay {
    config: SegmentConfig,
}

impl SegmentDisplay {
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }

    /// Full-size rectangles for segments A..G of one glyph at `position`.
    ///
    /// Horizontal and vertical segments share corner coordinates; overlap is
    /// avoided by shrinking each rectangle before drawing.
    fn segment_rects(&self, position: Point) -> [(u8, Rectangle); 7] {
        let sw = self.config.segment_width;
        let w = self.config.glyph_size.width;
        let h = self.config.glyph_size.height;
        [
            (Segments::A, Rectangle::new(position, Size::new(w, sw))),
            (
                Segments::B,
                Rectangle::new(position + Size::new(w - sw, 0), Size::new(sw, h / 2)),
            ),
            (
                Segments::C,
                Rectangle::new(position + Size::new(w - sw, h / 2), Size::new(sw, h / 2)),
            ),
            (
                Segments::D,
                Rectangle::new(position + Size::new(0, h - sw), Size::new(w, sw)),
            ),
            (
                Segments::E,
                Rectangle::new(position + Size::new(0, h / 2), Size::new(sw, h / 2)),
            ),
            (Segments::F, Rectangle::new(position, Size::new(sw, h / 2))),
            (
                Segments::G,
                Rectangle::new(position + Size::new(0, h / 2 - sw / 2), Size::new(w, sw)),
            ),
        ]
    }

    /// Shrink a segment rectangle along its long axis so neighbouring
    /// segments never overlap.
    fn reduced_rect(mut rect: Rectangle) -> Rectangle {
        if rect.is_zero_sized() {
            return rect;
        }

        if rect.size.width > rect.size.height {
            let offset = rect.size.height / 2 + 1;
            rect.top_left.x += offset as i32;
            rect.size.width = rect.size.width.saturating_sub(2 * offset);
        } else {
            let offset = rect.size.width / 2 + 1;
            rect.top_left.y += offset as i32;
            rect.size.height = rect.size.height.saturating_sub(2 * offset);
        }

        rect
    }

    /// Draw one segment as a hexagon with pointed ends: scan along the long
    /// axis, the strip shrinks with distance from the center line.
    fn draw_segment<C, const N: usize>(
        &self,
        fbuf: &mut FrameBuf<C, &mut [C; N]>,
        rect: Rectangle,
        color: C,
    ) where
        C: PixelColor + Default,
    {
        if rect.is_zero_sized() {
            return;
        }

        let center_2x = rect.top_left * 2 + (rect.size - Size::new(1, 1));

        if rect.size.width > rect.size.height {
            for y in rect.rows() {
                let offset = (y * 2 - center_2x.y).abs() / 2;
                let scanline = Rectangle::new(
                    Point::new(rect.top_left.x + offset, y),
                    Size::new(rect.size.width - offset as u32 * 2, 1),
                );
                let _ = scanline
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(fbuf);
            }
        } else {
            for x in rect.columns() {
                let offset = (x * 2 - center_2x.x).abs() / 2;
                let scanline = Rectangle::new(
                    Point::new(x, rect.top_left.y + offset),
                    Size::new(1, rect.size.height - offset as u32 * 2),
                );
                let _ = scanline
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(fbuf);
            }
        }
    }

    /// Draw one glyph to the frame buffer.
    ///
    /// `inactive_color`: color for unlit segments (dim effect), `None` to
    /// hide them completely.
    pub fn draw_glyph_to_fbuf<C, const N: usize>(
        &self,
        fbuf: &mut FrameBuf<C, &mut [C; N]>,
        segments: &Segments,
        position: Point,
        color: C,
        inactive_color: Option<C>,
    ) where
        C: PixelColor + Default,
    {
        for (bit, rect) in self.segment_rects(position) {
            let rect = Self::reduced_rect(rect);
            if segments.contains(bit) {
                self.draw_segment(fbuf, rect, color);
            } else if let Some(inactive) = inactive_color {
                self.draw_segment(fbuf, rect, inactive);
            }
        }
    }

    /// Render a label centered in the frame buffer and blit it to the
    /// display in one `fill_contiguous`, avoiding flicker. Characters with
    /// no segment glyph render blank.
    pub fn draw_label<T, C, const N: usize>(
        &self,
        display: &mut T,
        fbuf: &mut FrameBuf<C, &mut [C; N]>,
        label: &str,
        color: C,
        inactive_color: Option<C>,
    ) -> Result<(), T::Error>
    where
        T: DrawTarget<Color = C>,
        C: PixelColor + Default,
    {
        let cfg = &self.config;

        // Clear frame buffer
        for pixel in fbuf.data.iter_mut() {
            *pixel = C::default();
        }

        let glyphs = label.chars().count() as u32;
        let fbuf_size = fbuf.size();
        let mut position = Point::new(
            (fbuf_size.width.saturating_sub(self.label_width(glyphs))) as i32 / 2,
            (fbuf_size.height.saturating_sub(cfg.glyph_size.height)) as i32 / 2,
        );

        for c in label.chars() {
            let segments = Segments::from_char(c).unwrap_or(Segments::empty());
            self.draw_glyph_to_fbuf(fbuf, &segments, position, color, inactive_color);
            position.x += (cfg.glyph_size.width + cfg.glyph_spacing) as i32;
        }

        // Blit centered on the display.
        let center = display.bounding_box().center();
        let target = Point::new(
            center.x - fbuf_size.width as i32 / 2,
            center.y - fbuf_size.height as i32 / 2,
        );
        let area = Rectangle::new(target, fbuf_size);
        display.fill_contiguous(&area, fbuf.data.iter().copied())
    }

    /// Total width of a label of `glyphs` characters.
    pub fn label_width(&self, glyphs: u32) -> u32 {
        if glyphs == 0 {
            return 0;
        }
        glyphs * self.config.glyph_size.width + (glyphs - 1) * self.config.glyph_spacing
    }

    /// Small square in the lower-right corner, blinked by the host as the
    /// 1 Hz tick indicator.
    pub fn draw_indicator<T, C>(&self, display: &mut T, on: bool, color: C, off_color: C) -> Result<(), T::Error>
    where
        T: DrawTarget<Color = C>,
        C: PixelColor,
    {
        let size = Size::new(6, 6);
        let bb = display.bounding_box();
        let corner = bb.top_left + bb.size - size - Size::new(4, 4);
        Rectangle::new(corner, size)
            .into_styled(PrimitiveStyle::with_fill(if on { color } else { off_color }))
            .draw(display)
    }
}
