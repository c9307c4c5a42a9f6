//! Track artwork drawn with half-block characters

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
    Frame,
};

use crate::model::ArtPixels;

pub const ART_COLS: u16 = 24;
pub const ART_ROWS: u16 = 12;

/// Decode image bytes into a `cols` x `rows * 2` pixel grid
pub fn decode_art(bytes: &[u8], cols: u16, rows: u16) -> Option<ArtPixels> {
    let img = image::load_from_memory(bytes).ok()?;
    let px_w = cols as u32;
    let px_h = (rows as u32) * 2; // half-block = 2 pixels per row
    let rgb = img
        .resize_exact(px_w, px_h, image::imageops::FilterType::Triangle)
        .to_rgb8();

    Some(
        (0..px_h)
            .map(|y| {
                (0..px_w)
                    .map(|x| {
                        let p = rgb.get_pixel(x, y);
                        (p[0], p[1], p[2])
                    })
                    .collect()
            })
            .collect(),
    )
}

/// Shown while no artwork is available: a dim diagonal gradient
pub fn placeholder_art(cols: u16, rows: u16) -> ArtPixels {
    let px_h = rows as u32 * 2;
    let px_w = cols as u32;
    (0..px_h)
        .map(|y| {
            (0..px_w)
                .map(|x| {
                    let t = (x + y) * 60 / (px_w + px_h).max(1);
                    (20 + t as u8 / 2, 30 + t as u8, 25 + t as u8 / 2)
                })
                .collect()
        })
        .collect()
}

struct HalfBlockArt<'a> {
    pixels: &'a [Vec<(u8, u8, u8)>],
}

impl Widget for HalfBlockArt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let art_rows = self.pixels.len() / 2;
        let art_cols = self.pixels.first().map(|r| r.len()).unwrap_or(0);
        let rows = (area.height as usize).min(art_rows);
        let cols = (area.width as usize).min(art_cols);

        // Center inside the area
        let x0 = area.x + (area.width - cols as u16) / 2;
        let y0 = area.y + (area.height - rows as u16) / 2;

        for cy in 0..rows {
            let top_row = &self.pixels[cy * 2];
            let bottom_row = self.pixels.get(cy * 2 + 1).unwrap_or(top_row);
            for cx in 0..cols {
                let (tr, tg, tb) = top_row[cx];
                let (br, bg, bb) = bottom_row.get(cx).copied().unwrap_or(top_row[cx]);
                buf[(x0 + cx as u16, y0 + cy as u16)]
                    .set_char('▀')
                    .set_fg(Color::Rgb(tr, tg, tb))
                    .set_bg(Color::Rgb(br, bg, bb));
            }
        }
    }
}

pub fn render_artwork(frame: &mut Frame, area: Rect, artwork: Option<&ArtPixels>, has_track: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Now Playing ")
        .border_style(Style::default().fg(if has_track { Color::Cyan } else { Color::DarkGray }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let placeholder;
    let pixels = match artwork {
        Some(pixels) => pixels,
        None => {
            placeholder = placeholder_art(ART_COLS, ART_ROWS);
            &placeholder
        }
    };
    frame.render_widget(HalfBlockArt { pixels }, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 { image::Rgb([255, 0, 0]) } else { image::Rgb([0, 0, 255]) }
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decoded_art_has_two_pixel_rows_per_cell() {
        let pixels = decode_art(&png_bytes(64, 64), 8, 4).unwrap();
        assert_eq!(pixels.len(), 8);
        assert!(pixels.iter().all(|row| row.len() == 8));
        // Left half stays red, right half blue
        assert!(pixels[0][0].0 > 200 && pixels[0][0].2 < 50);
        assert!(pixels[0][7].2 > 200 && pixels[0][7].0 < 50);
    }

    #[test]
    fn garbage_bytes_do_not_decode() {
        assert!(decode_art(b"definitely not an image", 8, 4).is_none());
    }

    #[test]
    fn placeholder_matches_requested_size() {
        let pixels = placeholder_art(ART_COLS, ART_ROWS);
        assert_eq!(pixels.len(), ART_ROWS as usize * 2);
        assert_eq!(pixels[0].len(), ART_COLS as usize);
    }

    #[test]
    fn widget_fits_small_areas() {
        let pixels = placeholder_art(ART_COLS, ART_ROWS);
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        HalfBlockArt { pixels: &pixels }.render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "▀");
    }
}
