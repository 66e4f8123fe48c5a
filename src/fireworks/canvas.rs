//! Premultiplied RGBA drawing surface for the fireworks layer.
//!
//! Positions passed in are logical units; `scale` logical units map onto one
//! pixel. Pixels are half a terminal cell tall, so a terminal of `cols x rows`
//! gives a canvas of `cols x rows * 2`.

use crate::Rgb;

/// Logical height every canvas is scaled to. A rocket launched at the
/// slowest speed climbs 275 units before drag stalls it, and the lowest
/// target sits 0.9 of the height above the launch point.
pub const LOGICAL_HEIGHT: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    SourceOver,
    /// Source alpha removes coverage from what is already there.
    DestinationOut,
    /// Source is added on top, saturating at full intensity.
    Lighter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

pub struct Canvas {
    width: usize,
    height: usize,
    scale: f32,
    blend: BlendMode,
    pixels: Vec<[f32; 4]>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let scale = if height > 0 {
            LOGICAL_HEIGHT / height as f32
        } else {
            1.0
        };
        Self {
            width,
            height,
            scale,
            blend: BlendMode::SourceOver,
            pixels: vec![[0.0; 4]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width as f32 * self.scale,
            height: self.height as f32 * self.scale,
        }
    }

    pub fn set_blend(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p[3] <= 0.0)
    }

    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            [0.0; 4]
        }
    }

    pub fn fill(&mut self, color: Rgb, alpha: f32) {
        let src = premultiply(color, alpha);
        let blend = self.blend;
        for px in self.pixels.iter_mut() {
            blend_pixel(px, src, blend);
        }
    }

    /// Filled disc centred on a logical position. Discs smaller than a pixel
    /// light the single pixel they fall in.
    pub fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        if alpha <= 0.0 || !x.is_finite() || !y.is_finite() {
            return;
        }
        let src = premultiply(color, alpha);
        let cx = x / self.scale;
        let cy = y / self.scale;
        let r = radius / self.scale;

        if r < 0.5 {
            if cx >= 0.0 && cy >= 0.0 {
                self.blend_at(cx as usize, cy as usize, src);
            }
            return;
        }

        let min_x = (cx - r).floor().max(0.0) as usize;
        let min_y = (cy - r).floor().max(0.0) as usize;
        let max_x = (cx + r).ceil().max(0.0) as usize;
        let max_y = (cy + r).ceil().max(0.0) as usize;
        let r2 = r * r;

        for py in min_y..=max_y.min(self.height.saturating_sub(1)) {
            for px in min_x..=max_x.min(self.width.saturating_sub(1)) {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_at(px, py, src);
                }
            }
        }
    }

    pub fn composite_over(&self, x: usize, y: usize, bg: Rgb) -> Rgb {
        let [r, g, b, a] = self.pixel(x, y);
        let keep = 1.0 - a.clamp(0.0, 1.0);
        let channel = |light: f32, base: u8| {
            (light * 255.0 + base as f32 * keep).round().clamp(0.0, 255.0) as u8
        };
        (channel(r, bg.0), channel(g, bg.1), channel(b, bg.2))
    }

    fn blend_at(&mut self, x: usize, y: usize, src: [f32; 4]) {
        if x < self.width && y < self.height {
            let blend = self.blend;
            blend_pixel(&mut self.pixels[y * self.width + x], src, blend);
        }
    }
}

fn premultiply(color: Rgb, alpha: f32) -> [f32; 4] {
    let a = alpha.clamp(0.0, 1.0);
    [
        color.0 as f32 / 255.0 * a,
        color.1 as f32 / 255.0 * a,
        color.2 as f32 / 255.0 * a,
        a,
    ]
}

fn blend_pixel(dst: &mut [f32; 4], src: [f32; 4], blend: BlendMode) {
    match blend {
        BlendMode::SourceOver => {
            let keep = 1.0 - src[3];
            for i in 0..4 {
                dst[i] = src[i] + dst[i] * keep;
            }
        }
        BlendMode::DestinationOut => {
            let keep = 1.0 - src[3];
            for channel in dst.iter_mut() {
                *channel *= keep;
            }
        }
        BlendMode::Lighter => {
            for i in 0..4 {
                dst[i] = (dst[i] + src[i]).min(1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_scales_to_logical_height() {
        let canvas = Canvas::new(80, 48);
        let viewport = canvas.viewport();
        assert!((viewport.height - LOGICAL_HEIGHT).abs() < 1e-3);
        assert!((viewport.width - 80.0 * LOGICAL_HEIGHT / 48.0).abs() < 1e-2);
    }

    #[test]
    fn test_tall_canvas_keeps_logical_height() {
        let canvas = Canvas::new(400, 600);
        assert!((canvas.viewport().height - LOGICAL_HEIGHT).abs() < 1e-3);
    }

    #[test]
    fn test_lighter_adds_and_saturates() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set_blend(BlendMode::Lighter);
        let viewport = canvas.viewport();
        let (x, y) = (viewport.width / 8.0, viewport.height / 8.0);

        canvas.fill_circle(x, y, 1.0, (255, 0, 0), 0.6);
        canvas.fill_circle(x, y, 1.0, (255, 0, 0), 0.6);

        let px = canvas.pixel(0, 0);
        assert!((px[0] - 1.0).abs() < 1e-6);
        assert!((px[3] - 1.0).abs() < 1e-6);
        assert_eq!(px[1], 0.0);
    }

    #[test]
    fn test_destination_out_fades_existing_pixels() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set_blend(BlendMode::Lighter);
        canvas.fill((255, 255, 255), 1.0);

        canvas.set_blend(BlendMode::DestinationOut);
        canvas.fill((0, 0, 0), 0.15);
        let px = canvas.pixel(1, 1);
        assert!((px[3] - 0.85).abs() < 1e-6);
        assert!((px[0] - 0.85).abs() < 1e-6);

        for _ in 0..200 {
            canvas.fill((0, 0, 0), 0.15);
        }
        assert!(canvas.pixel(1, 1)[3] < 1e-6);
    }

    #[test]
    fn test_large_circle_covers_neighbours() {
        let mut canvas = Canvas::new(20, 20);
        canvas.set_blend(BlendMode::Lighter);
        let scale = canvas.viewport().height / 20.0;
        canvas.fill_circle(10.5 * scale, 10.5 * scale, 2.0 * scale, (0, 255, 0), 1.0);

        assert!(canvas.pixel(10, 10)[1] > 0.0);
        assert!(canvas.pixel(11, 10)[1] > 0.0);
        assert!(canvas.pixel(10, 12)[1] > 0.0);
        assert_eq!(canvas.pixel(0, 0)[1], 0.0);
    }

    #[test]
    fn test_offscreen_drawing_is_ignored() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set_blend(BlendMode::Lighter);
        canvas.fill_circle(-50.0, -50.0, 1.0, (255, 255, 255), 1.0);
        canvas.fill_circle(1.0e6, 1.0e6, 1.0, (255, 255, 255), 1.0);
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_composite_over_background() {
        let mut canvas = Canvas::new(1, 1);
        assert_eq!(canvas.composite_over(0, 0, (10, 20, 30)), (10, 20, 30));

        canvas.set_blend(BlendMode::Lighter);
        canvas.fill((255, 255, 255), 1.0);
        assert_eq!(canvas.composite_over(0, 0, (10, 20, 30)), (255, 255, 255));
    }
}
