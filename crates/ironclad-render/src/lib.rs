//! CPU rasterizer for arena frames.
//!
//! [`Canvas`] is a plain RGB8 pixel buffer with flood clear, filled
//! polygon/circle primitives, and PNG export. [`draw_frame`] paints one
//! complete frame from the engine's render surface: per-entity shape
//! and color lists scaled by the arena's pixel density.

use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use log::debug;

use ironclad_core::color::Color;
use ironclad_sim::engine::{Engine, ShapeGeometry};
use ironclad_sim::ColliderHandle;

/// Errors from rasterization and image output.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Polygon fill needs at least 3 vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),

    /// The output path must end in `.png`.
    #[error("output file must have a .png extension: {0}")]
    NotPng(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// An RGB8 frame buffer addressed in pixels.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    /// Flood the whole buffer with one color.
    pub fn clear(&mut self, color: Color) {
        let px = Rgb(color.rgb());
        for pixel in self.image.pixels_mut() {
            *pixel = px;
        }
    }

    /// Fill a polygon by even-odd scanline. Vertices are pixel
    /// coordinates; fewer than 3 is an error.
    pub fn fill_polygon(&mut self, vertices: &[Vec2], color: Color) -> Result<()> {
        if vertices.len() < 3 {
            return Err(RenderError::DegeneratePolygon(vertices.len()));
        }
        let px = Rgb(color.rgb());
        let (width, height) = self.image.dimensions();

        let min_y = vertices.iter().map(|v| v.y).fold(f32::INFINITY, f32::min);
        let max_y = vertices
            .iter()
            .map(|v| v.y)
            .fold(f32::NEG_INFINITY, f32::max);
        let y_start = min_y.floor().max(0.0) as u32;
        let y_end = (max_y.ceil().min(height as f32 - 1.0)).max(0.0) as u32;

        for y in y_start..=y_end {
            let scan = y as f32 + 0.5;
            // Edge crossings with the scanline, even-odd rule.
            let mut crossings = Vec::new();
            for i in 0..vertices.len() {
                let a = vertices[i];
                let b = vertices[(i + 1) % vertices.len()];
                if (a.y <= scan && b.y > scan) || (b.y <= scan && a.y > scan) {
                    let t = (scan - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(|p, q| p.total_cmp(q));

            for pair in crossings.chunks_exact(2) {
                let x_start = pair[0].max(0.0).round() as u32;
                let x_end = pair[1].min(width as f32 - 1.0).round() as i64;
                for x in x_start as i64..=x_end {
                    if x >= 0 && (x as u32) < width {
                        self.image.put_pixel(x as u32, y, px);
                    }
                }
            }
        }
        Ok(())
    }

    /// Fill a circle given a pixel-space center and radius.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let px = Rgb(color.rgb());
        let (width, height) = self.image.dimensions();
        let r2 = radius * radius;

        let y_start = (center.y - radius).floor().max(0.0) as u32;
        let y_end = (center.y + radius).ceil().min(height as f32 - 1.0) as u32;
        let x_start = (center.x - radius).floor().max(0.0) as u32;
        let x_end = (center.x + radius).ceil().min(width as f32 - 1.0) as u32;

        for y in y_start..=y_end {
            for x in x_start..=x_end {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.image.put_pixel(x, y, px);
                }
            }
        }
    }

    /// Write the current buffer to a `.png` file.
    pub fn write_png(&self, path: &Path) -> Result<()> {
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            return Err(RenderError::NotPng(path.display().to_string()));
        }
        self.image.save(path)?;
        debug!("frame written to {}", path.display());
        Ok(())
    }

    /// Copy of the raw interleaved RGB bytes, row-major.
    pub fn buffer(&self) -> Vec<u8> {
        self.image.as_raw().clone()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// RGB, always 3.
    pub fn channels(&self) -> u32 {
        3
    }
}

/// Paint one frame of the arena.
///
/// World y points up while image rows grow downward, so world
/// coordinates are flipped vertically before scaling by the pixel
/// density. Draw order: background, obstacles, tanks, projectiles,
/// lidar overlays.
pub fn draw_frame(engine: &Engine, canvas: &mut Canvas) -> Result<()> {
    let density = engine.pixel_density();
    let (_, height) = canvas.dimensions();
    let to_px = |p: Vec2| Vec2::new(p.x * density, height as f32 - p.y * density);

    canvas.clear(engine.config().clear_color);

    let mut shapes: Vec<(_, Color)> = Vec::new();
    for id in engine.obstacle_ids() {
        shapes.extend(shape_list(engine.obstacle_shapes(id)));
    }
    for id in engine.tank_ids() {
        shapes.extend(shape_list(engine.tank_shapes(id)));
    }
    shapes.extend(engine.projectile_shapes());

    for (handle, color) in shapes {
        match engine.shape_geometry(handle) {
            Some(ShapeGeometry::Polygon(vertices)) => {
                let pixels: Vec<Vec2> = vertices.into_iter().map(to_px).collect();
                canvas.fill_polygon(&pixels, color)?;
            }
            Some(ShapeGeometry::Circle { center, radius }) => {
                canvas.fill_circle(to_px(center), radius * density, color);
            }
            None => {}
        }
    }

    for id in engine.tank_ids() {
        if let Ok((points, color, radius)) = engine.lidar_overlay(id) {
            for point in points {
                canvas.fill_circle(to_px(point), radius, color);
            }
        }
    }
    Ok(())
}

fn shape_list(
    result: ironclad_core::error::Result<Vec<(ColliderHandle, Color)>>,
) -> Vec<(ColliderHandle, Color)> {
    result.unwrap_or_default()
}
