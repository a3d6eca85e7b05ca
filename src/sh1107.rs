//! SH1107 OLED driver (128x64, 1 bit per pixel).
//!
//! Drawing goes into an in-memory frame; nothing reaches the panel until
//! [`Sh1107::show`] is awaited.

use display_interface::{AsyncWriteOnlyDataCommand, DataFormat, DisplayError};
use embedded_graphics::mono_font::{ascii::FONT_8X13, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::Text;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

pub const WIDTH: u8 = 128;
pub const HEIGHT: u8 = 64;
const ROW_BYTES: usize = WIDTH as usize / 8;
const BUFFER_SIZE: usize = (WIDTH as usize * HEIGHT as usize) / 8;

pub struct Sh1107<DI, RESET> {
    interface: DI,
    rst: RESET,
    buffer: [u8; BUFFER_SIZE],
}

impl<DI, RESET> Sh1107<DI, RESET>
where
    DI: AsyncWriteOnlyDataCommand,
    RESET: OutputPin,
{
    pub fn new(interface: DI, rst: RESET) -> Self {
        Self {
            interface,
            rst,
            buffer: [0; BUFFER_SIZE],
        }
    }

    pub async fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.reset(delay).await?;
        self.off().await?;
        self.send_commands(&[0x00]).await?; // Set lower column address
        self.send_commands(&[0x10]).await?; // Set higher column address
        self.send_commands(&[0xB0]).await?; // Set page address
        self.send_commands(&[0xDC, 0x00]).await?; // Set display start line
        self.send_commands(&[0x81, 0x6F]).await?; // Set contrast control
        self.send_commands(&[0x21]).await?; // Set memory addressing mode (0x20 = Horizontal / 0x21 = Vertical)
        self.send_commands(&[0xA0]).await?; // Set segment remap (0xA0 / 0xA1)
        self.send_commands(&[0xC0]).await?; // Set common output scan direction (0xC0 / 0xC8)
        self.send_commands(&[0xA4]).await?; // Set entire display on (0xA4 = false / 0xA5 = true)
        self.send_commands(&[0xA6]).await?; // Set normal or reverse display on (0xA6 = Normal / 0xA7 = Reverse)
        self.send_commands(&[0xA8, 0x3F]).await?; // Set multiplex ratio (Display height - 1)
        self.send_commands(&[0xD3, 0x60]).await?; // Set display offset
        self.send_commands(&[0xD5, 0x50]).await?; // Clock divide ratio / oscillator frequency mode
        self.send_commands(&[0xD9, 0x22]).await?; // Set discharge / precharge period
        self.send_commands(&[0xDB, 0x35]).await?; // Set VCOM deselect level
        self.send_commands(&[0xAD, 0x81]).await?; // Set DC-DC control mode (0x81 = On / 0x80 = Off)
        self.on().await?;
        delay.delay_ms(10).await;
        Ok(())
    }

    async fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(1).await;
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(10).await;
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        Ok(())
    }

    pub async fn off(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[0xAE]).await // Display OFF
    }

    pub async fn on(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[0xAF]).await // Display ON
    }

    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_commands(DataFormat::U8(commands)).await
    }

    async fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_data(DataFormat::U8(data)).await
    }

    /// Push the whole frame to the panel.
    pub async fn show(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[0xB0]).await?; // Set page address
        // Vertical addressing: each frame row is one panel column, written bottom-up
        for row in 0..HEIGHT {
            let column = (HEIGHT - 1) - row;
            self.send_commands(&[column & 0x0F, 0x10 | (column >> 4)]).await?;
            let start = row as usize * ROW_BYTES;
            let mut line = [0u8; ROW_BYTES];
            line.copy_from_slice(&self.buffer[start..start + ROW_BYTES]);
            self.send_data(&line).await?;
        }
        Ok(())
    }

    pub fn draw_rectangle(&mut self, top_left: Point, size: Size, colour: BinaryColor, fill: bool) -> Result<(), DisplayError> {
        let style = if fill {
            PrimitiveStyleBuilder::new().stroke_color(colour).stroke_width(1).fill_color(colour).build()
        } else {
            PrimitiveStyleBuilder::new().stroke_color(colour).stroke_width(1).build()
        };
        Rectangle::new(top_left, size).into_styled(style).draw(self)
    }

    pub fn draw_text(&mut self, text: &str, position: Point, colour: BinaryColor) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(&FONT_8X13, colour);
        Text::new(text, position, style).draw(self)?;
        Ok(())
    }
}

impl<DI, RESET> DrawTarget for Sh1107<DI, RESET> {
    type Color = BinaryColor;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, colour) in pixels {
            let (x, y) = (coord.x, coord.y);
            if x >= 0 && x < WIDTH as i32 && y >= 0 && y < HEIGHT as i32 {
                let index = (y as usize * WIDTH as usize + x as usize) / 8;
                if colour == BinaryColor::On {
                    self.buffer[index] |= 1 << (x % 8);
                } else {
                    self.buffer[index] &= !(1 << (x % 8));
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, colour: Self::Color) -> Result<(), Self::Error> {
        self.buffer.fill(if colour.is_on() { 0xFF } else { 0x00 });
        Ok(())
    }
}

impl<DI, RESET> OriginDimensions for Sh1107<DI, RESET> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}
