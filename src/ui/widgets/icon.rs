use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::path::Path;

/// A small raster image drawn with half-block cells: each terminal cell shows
/// two vertically stacked pixels (`▀` with the top as fg, the bottom as bg).
#[derive(Debug, Clone)]
pub struct HelpIcon {
    pixels: Vec<Vec<Option<PixelColor>>>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelColor {
    r: u8,
    g: u8,
    b: u8,
}

impl PixelColor {
    fn to_ratatui_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl HelpIcon {
    pub fn load(path: &Path, target_size: u32) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, target_size)
    }

    pub fn from_bytes(bytes: &[u8], target_size: u32) -> anyhow::Result<Self> {
        let img = image::load_from_memory(bytes)?;

        let (original_width, original_height) = (img.width(), img.height());
        if original_width == 0 || original_height == 0 {
            anyhow::bail!("image has no pixels");
        }

        // Keep aspect ratio, longest edge becomes target_size
        let (width, height) = if original_width > original_height {
            let ratio = original_height as f64 / original_width as f64;
            (target_size, ((target_size as f64 * ratio) as u32).max(1))
        } else {
            let ratio = original_width as f64 / original_height as f64;
            (((target_size as f64 * ratio) as u32).max(1), target_size)
        };

        let resized = img.resize_exact(width, height, image::imageops::FilterType::Lanczos3);
        let rgba = resized.to_rgba8();

        let pixels = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let pixel = rgba.get_pixel(x, y);
                        // Mostly transparent pixels fall back to the terminal background
                        (pixel[3] >= 128).then_some(PixelColor {
                            r: pixel[0],
                            g: pixel[1],
                            b: pixel[2],
                        })
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Width in terminal cells.
    pub fn cell_width(&self) -> u16 {
        self.width as u16
    }

    /// Height in terminal cells.
    pub fn cell_height(&self) -> u16 {
        self.height.div_ceil(2) as u16
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        self.pixels
            .chunks(2)
            .map(|rows| {
                let top = &rows[0];
                let bottom = rows.get(1);
                let spans: Vec<Span> = top
                    .iter()
                    .enumerate()
                    .map(|(x, upper)| {
                        let lower = bottom.and_then(|row| row[x]);
                        half_block(*upper, lower)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn half_block(upper: Option<PixelColor>, lower: Option<PixelColor>) -> Span<'static> {
    match (upper, lower) {
        (Some(upper), Some(lower)) => Span::styled(
            "▀",
            Style::default()
                .fg(upper.to_ratatui_color())
                .bg(lower.to_ratatui_color()),
        ),
        (Some(upper), None) => Span::styled("▀", Style::default().fg(upper.to_ratatui_color())),
        (None, Some(lower)) => Span::styled("▄", Style::default().fg(lower.to_ratatui_color())),
        (None, None) => Span::raw(" "),
    }
}
