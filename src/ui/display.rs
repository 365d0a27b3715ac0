//! SSD1306 OLED display wrapper.
//!
//! Layout (128×64, 6×10 font, baselines at y = 12 / 28 / 44):
//!
//! ```text
//! Mail                 2/5
//! Alice
//! Lunch at noon?
//! ```

use defmt::error;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::error::Error;
use crate::render::{position_label, NotificationDisplay, NullDisplay, EMPTY_LINE_1, EMPTY_LINE_2};

const WIDTH: i32 = 128;
const CHAR_WIDTH: i32 = 6;
const LEFT: i32 = 2;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<OledDisplay<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(OledDisplay { display })
}

fn text_style() -> embedded_graphics::mono_font::MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Initialised panel.
pub struct OledDisplay<I2C> {
    display: Display<I2C>,
}

impl<I2C> OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn draw_line(&mut self, text: &str, x: i32, y: i32) {
        let _ = Text::new(text, Point::new(x, y), text_style()).draw(&mut self.display);
    }

    fn flush(&mut self) {
        if self.display.flush().is_err() {
            error!("Display flush failed");
        }
    }
}

impl<I2C> NotificationDisplay for OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn show_empty(&mut self) {
        self.show_status(EMPTY_LINE_1, EMPTY_LINE_2);
    }

    fn show_notification(
        &mut self,
        app: &str,
        contact: &str,
        message: &str,
        position: usize,
        total: usize,
    ) {
        self.display.clear_buffer();

        self.draw_line(app, LEFT, 12);
        if total > 0 {
            let label = position_label(position, total);
            let x = WIDTH - label.len() as i32 * CHAR_WIDTH;
            self.draw_line(label.as_str(), x, 12);
        }
        self.draw_line(contact, LEFT, 28);
        if !message.is_empty() {
            self.draw_line(message, LEFT, 44);
        }

        self.flush();
    }

    fn show_status(&mut self, line1: &str, line2: &str) {
        self.display.clear_buffer();
        self.draw_line(line1, LEFT, 12);
        self.draw_line(line2, LEFT, 28);
        self.flush();
    }
}

/// The panel as installed at startup: the real OLED, or nothing if it
/// failed to initialise.
pub enum Panel<I2C> {
    Oled(OledDisplay<I2C>),
    Missing(NullDisplay),
}

impl<I2C> Panel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Bring up the OLED, falling back to [`Panel::Missing`] on failure.
    pub fn probe(i2c: I2C) -> Self {
        match init(i2c) {
            Ok(oled) => Panel::Oled(oled),
            Err(e) => {
                error!("Display init failed: {}, continuing without display", e);
                Panel::Missing(NullDisplay)
            }
        }
    }
}

impl<I2C> NotificationDisplay for Panel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn show_empty(&mut self) {
        match self {
            Panel::Oled(d) => d.show_empty(),
            Panel::Missing(d) => d.show_empty(),
        }
    }

    fn show_notification(
        &mut self,
        app: &str,
        contact: &str,
        message: &str,
        position: usize,
        total: usize,
    ) {
        match self {
            Panel::Oled(d) => d.show_notification(app, contact, message, position, total),
            Panel::Missing(d) => d.show_notification(app, contact, message, position, total),
        }
    }

    fn show_status(&mut self, line1: &str, line2: &str) {
        match self {
            Panel::Oled(d) => d.show_status(line1, line2),
            Panel::Missing(d) => d.show_status(line1, line2),
        }
    }
}
