//! Gauge and slider widgets for the 128x64 monochrome panel.
//!
//! Both widgets own the whole screen: `draw` blanks the frame and redraws
//! every element, so they can be redrawn each iteration without leftovers.

use core::f32::consts::PI;
use core::fmt::Write;

use embedded_graphics::geometry::Angle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_8X13};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};
use heapless::String;
use micromath::F32Ext;

/// Labels and number format for a meter.
#[derive(Clone, Copy, Debug)]
pub struct MeterStyle {
    pub title: &'static str,
    pub unit: &'static str,
    pub decimals: usize,
}

pub const POWER_STYLE: MeterStyle = MeterStyle {
    title: "POWER",
    unit: "A",
    decimals: 2,
};

pub const TEMPERATURE_STYLE: MeterStyle = MeterStyle {
    title: "TEMP",
    unit: "C",
    decimals: 1,
};

// Gauge geometry
const GAUGE_CENTER: Point = Point::new(64, 62);
const GAUGE_DIAMETER: u32 = 96;
const NEEDLE_LENGTH: f32 = 42.0;

// Slider geometry
const TRACK_TOP_LEFT: Point = Point::new(4, 28);
const TRACK_SIZE: Size = Size::new(120, 16);
const TRACK_INSET: i32 = 2;

const HEADER_BASELINE: i32 = 9;
const FOOTER_BASELINE: i32 = 62;

/// A value held inside `[min, max]`.
#[derive(Clone, Copy, Debug)]
struct Bounded {
    min: f32,
    max: f32,
    value: f32,
}

impl Bounded {
    const fn new(min: f32, max: f32) -> Self {
        Self { min, max, value: min }
    }

    fn set(&mut self, value: f32) {
        self.value = if value.is_nan() { self.min } else { value.clamp(self.min, self.max) };
    }

    /// Position of the value within the range, 0.0 to 1.0.
    fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        (self.value - self.min) / span
    }
}

/// Semicircular gauge with a needle. Used for diode current.
#[derive(Clone, Copy, Debug)]
pub struct Gauge {
    range: Bounded,
    style: MeterStyle,
}

impl Gauge {
    pub const fn new(min: f32, max: f32, style: MeterStyle) -> Self {
        Self {
            range: Bounded::new(min, max),
            style,
        }
    }

    pub fn set_value(&mut self, value: f32) {
        self.range.set(value);
    }

    #[cfg(test)]
    pub const fn value(&self) -> f32 {
        self.range.value
    }

    /// Needle tip: full left at `min`, straight up mid-range, full right at `max`.
    pub fn needle_end(&self) -> Point {
        let theta = PI * (1.0 - self.range.fraction());
        let dx = NEEDLE_LENGTH * theta.cos();
        let dy = NEEDLE_LENGTH * theta.sin();
        GAUGE_CENTER + Point::new(dx.round() as i32, -(dy.round() as i32))
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off)?;
        draw_header(target, &self.style, self.range.value)?;

        let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
        Arc::with_center(GAUGE_CENTER, GAUGE_DIAMETER, Angle::from_degrees(180.0), Angle::from_degrees(180.0))
            .into_styled(stroke)
            .draw(target)?;
        Line::new(GAUGE_CENTER, self.needle_end()).into_styled(stroke).draw(target)?;

        draw_bounds(target, &self.style, self.range.min, self.range.max)
    }
}

/// Horizontal bar filled from the left. Used for temperature.
#[derive(Clone, Copy, Debug)]
pub struct Slider {
    range: Bounded,
    style: MeterStyle,
}

impl Slider {
    pub const fn new(min: f32, max: f32, style: MeterStyle) -> Self {
        Self {
            range: Bounded::new(min, max),
            style,
        }
    }

    pub fn set_value(&mut self, value: f32) {
        self.range.set(value);
    }

    #[cfg(test)]
    pub const fn value(&self) -> f32 {
        self.range.value
    }

    /// Width of the filled part of the track in pixels.
    pub fn fill_width(&self) -> u32 {
        let inner = TRACK_SIZE.width as i32 - 2 * TRACK_INSET;
        ((inner as f32 * self.range.fraction()).round() as i32).clamp(0, inner) as u32
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off)?;
        draw_header(target, &self.style, self.range.value)?;

        Rectangle::new(TRACK_TOP_LEFT, TRACK_SIZE)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(target)?;
        let fill = self.fill_width();
        if fill > 0 {
            let height = TRACK_SIZE.height - 2 * TRACK_INSET as u32;
            Rectangle::new(TRACK_TOP_LEFT + Point::new(TRACK_INSET, TRACK_INSET), Size::new(fill, height))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(target)?;
        }

        draw_bounds(target, &self.style, self.range.min, self.range.max)
    }
}

/// Title on the left, current reading on the right.
fn draw_header<D>(target: &mut D, style: &MeterStyle, value: f32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::new(style.title, Point::new(0, HEADER_BASELINE), MonoTextStyle::new(&FONT_6X10, BinaryColor::On))
        .draw(target)?;

    let mut text: String<16> = String::new();
    let _ = write!(text, "{:.*} {}", style.decimals, value, style.unit);
    Text::with_alignment(
        &text,
        Point::new(127, HEADER_BASELINE + 2),
        MonoTextStyle::new(&FONT_8X13, BinaryColor::On),
        Alignment::Right,
    )
    .draw(target)?;
    Ok(())
}

/// Scale limits in the bottom corners.
fn draw_bounds<D>(target: &mut D, style: &MeterStyle, min: f32, max: f32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let font = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let mut text: String<12> = String::new();

    let _ = write!(text, "{:.*}", style.decimals.min(1), min);
    Text::with_alignment(&text, Point::new(0, FOOTER_BASELINE), font, Alignment::Left).draw(target)?;

    text.clear();
    let _ = write!(text, "{:.*}", style.decimals.min(1), max);
    Text::with_alignment(&text, Point::new(127, FOOTER_BASELINE), font, Alignment::Right).draw(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics_framebuf::FrameBuf;

    const PIXELS: usize = 128 * 64;

    fn lit(frame: &FrameBuf<BinaryColor, &mut [BinaryColor; PIXELS]>, x: i32, y: i32) -> bool {
        frame.get_color_at(Point::new(x, y)) == BinaryColor::On
    }

    #[test]
    fn test_set_value_clamps() {
        let mut gauge = Gauge::new(0.0, 2.5, POWER_STYLE);
        gauge.set_value(3.7);
        assert_eq!(gauge.value(), 2.5);
        gauge.set_value(-1.0);
        assert_eq!(gauge.value(), 0.0);

        let mut slider = Slider::new(1.0, 99.0, TEMPERATURE_STYLE);
        slider.set_value(150.0);
        assert_eq!(slider.value(), 99.0);
        slider.set_value(f32::NAN);
        assert_eq!(slider.value(), 1.0);
    }

    #[test]
    fn test_needle_positions() {
        let mut gauge = Gauge::new(0.0, 2.5, POWER_STYLE);
        assert_eq!(gauge.needle_end(), Point::new(22, 62));
        gauge.set_value(1.25);
        assert_eq!(gauge.needle_end(), Point::new(64, 20));
        gauge.set_value(2.5);
        assert_eq!(gauge.needle_end(), Point::new(106, 62));
    }

    #[test]
    fn test_gauge_draws_needle() {
        let mut data = [BinaryColor::Off; PIXELS];
        let mut frame = FrameBuf::new(&mut data, 128, 64);

        let mut gauge = Gauge::new(0.0, 2.5, POWER_STYLE);
        gauge.draw(&mut frame).unwrap();
        assert!(lit(&frame, 43, 62));
        assert!(!lit(&frame, 85, 62));

        // Redraw at full scale must erase the old needle
        gauge.set_value(2.5);
        gauge.draw(&mut frame).unwrap();
        assert!(!lit(&frame, 43, 62));
        assert!(lit(&frame, 85, 62));
    }

    #[test]
    fn test_slider_fill_width() {
        let mut slider = Slider::new(1.0, 99.0, TEMPERATURE_STYLE);
        assert_eq!(slider.fill_width(), 0);
        slider.set_value(50.0);
        assert_eq!(slider.fill_width(), 58);
        slider.set_value(99.0);
        assert_eq!(slider.fill_width(), 116);
    }

    #[test]
    fn test_slider_fill_rounds_to_nearest_pixel() {
        // 116 px over a 0..116 range: one unit per pixel
        let mut slider = Slider::new(0.0, 116.0, TEMPERATURE_STYLE);
        slider.set_value(0.4);
        assert_eq!(slider.fill_width(), 0);
        slider.set_value(0.6);
        assert_eq!(slider.fill_width(), 1);
        slider.set_value(57.49);
        assert_eq!(slider.fill_width(), 57);
    }

    #[test]
    fn test_slider_draws_fill() {
        let mut data = [BinaryColor::Off; PIXELS];
        let mut frame = FrameBuf::new(&mut data, 128, 64);

        let mut slider = Slider::new(1.0, 99.0, TEMPERATURE_STYLE);
        slider.set_value(50.0);
        slider.draw(&mut frame).unwrap();
        assert!(lit(&frame, 30, 36));
        assert!(!lit(&frame, 100, 36));
        // Track outline
        assert!(lit(&frame, 4, 36));
        assert!(lit(&frame, 123, 36));
    }

    #[test]
    fn test_header_text_is_drawn() {
        let mut data = [BinaryColor::Off; PIXELS];
        let mut frame = FrameBuf::new(&mut data, 128, 64);

        Slider::new(1.0, 99.0, TEMPERATURE_STYLE).draw(&mut frame).unwrap();
        let header_pixels = (0..128)
            .flat_map(|x| (0..12).map(move |y| (x, y)))
            .filter(|&(x, y)| lit(&frame, x, y))
            .count();
        assert!(header_pixels > 0);
    }
}
