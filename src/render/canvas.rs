use std::path::Path;

use image::RgbImage;

use crate::config::settings::RenderSettings;
use crate::core::hierarchy::HierarchyGraph;
use crate::error::{Error, Result};

use super::colors::size_to_color;
use super::layout::{spring_layout, Point};

/// Lay out and draw the hierarchy: uniform dots colored by size ratio,
/// connected by low-contrast edges on a dark background.
pub fn render_hierarchy(graph: &HierarchyGraph, settings: &RenderSettings) -> Result<RgbImage> {
    let ratios = graph.ratios().ok_or(Error::EmptyGraph)?;

    tracing::info!("Calculating layout for {} nodes", graph.len());
    let positions = spring_layout(graph, settings.layout_iterations);

    let mut canvas = Canvas::new(settings);
    for (parent, child) in graph.edges() {
        let from = canvas.to_pixel(positions[parent]);
        let to = canvas.to_pixel(positions[child]);
        canvas.line(from, to, settings.edge_color);
    }
    for (pos, ratio) in positions.iter().zip(&ratios) {
        let center = canvas.to_pixel(*pos);
        canvas.dot(center, settings.node_radius, size_to_color(*ratio).to_rgb8());
    }

    Ok(canvas.into_image())
}

pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

struct Canvas {
    image: RgbImage,
    margin: f64,
    alpha: f64,
}

impl Canvas {
    fn new(settings: &RenderSettings) -> Self {
        let width = settings.width.max(1);
        let height = settings.height.max(1);
        let margin = settings.margin.min(width / 2).min(height / 2);
        Self {
            image: RgbImage::from_pixel(width, height, image::Rgb(settings.background)),
            margin: margin as f64,
            alpha: settings.alpha.clamp(0.0, 1.0) as f64,
        }
    }

    /// Map a layout point in `[-1, 1]²` to pixel coordinates.
    fn to_pixel(&self, p: Point) -> (i64, i64) {
        let usable_w = (self.image.width() as f64 - 2.0 * self.margin - 1.0).max(0.0);
        let usable_h = (self.image.height() as f64 - 2.0 * self.margin - 1.0).max(0.0);
        let x = self.margin + (p.x + 1.0) / 2.0 * usable_w;
        // Image rows grow downwards.
        let y = self.margin + (1.0 - p.y) / 2.0 * usable_h;
        (x.round() as i64, y.round() as i64)
    }

    fn blend(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        for (dst, src) in pixel.0.iter_mut().zip(color) {
            let mixed = src as f64 * self.alpha + *dst as f64 * (1.0 - self.alpha);
            *dst = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    /// Bresenham line.
    fn line(&mut self, from: (i64, i64), to: (i64, i64), color: [u8; 3]) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn dot(&mut self, center: (i64, i64), radius: u32, color: [u8; 3]) {
        let r = radius as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.blend(center.0 + dx, center.1 + dy, color);
                }
            }
        }
    }

    fn into_image(self) -> RgbImage {
        self.image
    }
}
