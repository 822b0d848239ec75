use crate::{Color, Picture, Rect, Vec2, VideoOutput};

/// Software [`VideoOutput`] over a borrowed RGBA8 buffer.
///
/// Shapes are sampled at pixel centers. Every write is clipped, so geometry
/// partly or entirely off the frame is safe to submit.
pub struct Frame<'a> {
    rgba: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(rgba: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            rgba,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        let color = color.to_rgba();
        for chunk in self.rgba.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let bytes = self.rgba.get(offset..offset + 4)?;
        Some(Color::from_rgba([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn write_pixel_clipped(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let x = x as usize;
        let y = y as usize;
        let Some(pixel_offset) = y
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x))
        else {
            return;
        };
        let Some(byte_offset) = pixel_offset.checked_mul(4) else {
            return;
        };
        let Some(end) = byte_offset.checked_add(4) else {
            return;
        };
        if end > self.rgba.len() {
            return;
        }
        self.rgba[byte_offset..end].copy_from_slice(&color);
    }

    fn fill_pixel_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32, color: [u8; 4]) {
        let left = left.max(0);
        let top = top.max(0);
        let right = right.min(self.width as i32);
        let bottom = bottom.min(self.height as i32);
        for y in top..bottom {
            for x in left..right {
                self.write_pixel_clipped(x, y, color);
            }
        }
    }

    fn fill_rect_area(&mut self, rect: Rect, color: [u8; 4]) {
        let r = rect.normalized();
        let Some((left, right)) = pixel_span(r.x, r.x + r.w, self.width) else {
            return;
        };
        let Some((top, bottom)) = pixel_span(r.y, r.y + r.h, self.height) else {
            return;
        };
        self.fill_pixel_rect(left, top, right, bottom, color);
    }

    /// Square brush edge in pixels, never wider than the frame itself.
    fn brush_size(&self, thickness: f32) -> i32 {
        if !(thickness.is_finite() && thickness > 1.0) {
            return 1;
        }
        let cap = i32::try_from(self.width.max(self.height))
            .unwrap_or(i32::MAX)
            .saturating_add(1);
        (thickness.round() as i32).min(cap)
    }

    fn stamp_brush(&mut self, point: Vec2, brush: i32, color: [u8; 4]) {
        let left = (point.x.floor() as i32).saturating_sub((brush - 1) / 2);
        let top = (point.y.floor() as i32).saturating_sub((brush - 1) / 2);
        self.fill_pixel_rect(
            left,
            top,
            left.saturating_add(brush),
            top.saturating_add(brush),
            color,
        );
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: [u8; 4]) {
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        for p in points {
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let Some((row_start, row_end)) = pixel_span(min_y, max_y, self.height) else {
            return;
        };

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for row in row_start..row_end {
            let sample_y = row as f32 + 0.5;
            crossings.clear();
            let mut previous = points[points.len() - 1];
            for &current in points {
                if (current.y > sample_y) != (previous.y > sample_y) {
                    let t = (sample_y - current.y) / (previous.y - current.y);
                    crossings.push(current.x + t * (previous.x - current.x));
                }
                previous = current;
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                if let Some((left, right)) = pixel_span(pair[0], pair[1], self.width) {
                    self.fill_pixel_rect(left, row, right, row + 1, color);
                }
            }
        }
    }
}

impl VideoOutput for Frame<'_> {
    fn output_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    fn draw_point(&mut self, point: Vec2, color: Color) {
        if !point.is_finite() {
            return;
        }
        self.write_pixel_clipped(point.x.floor() as i32, point.y.floor() as i32, color.to_rgba());
    }

    fn draw_line(&mut self, a: Vec2, b: Vec2, thickness: f32, color: Color) {
        let brush = self.brush_size(thickness);
        let margin = brush as f32;
        let bounds = Rect::new(
            -margin,
            -margin,
            self.width as f32 + 2.0 * margin,
            self.height as f32 + 2.0 * margin,
        );
        let Some((a, b)) = clip_segment(a, b, bounds) else {
            return;
        };
        let delta = b - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as i32;
        let color = color.to_rgba();
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            self.stamp_brush(a + delta * t, brush, color);
        }
    }

    fn draw_polygon(&mut self, points: &[Vec2], thickness: f32, color: Color) {
        if points.iter().any(|p| !p.is_finite()) {
            return;
        }
        match points {
            [] => {}
            [point] => self.draw_point(*point, color),
            [a, b] => self.draw_line(*a, *b, thickness.max(1.0), color),
            _ if thickness <= 0.0 => self.fill_polygon(points, color.to_rgba()),
            _ => {
                let mut previous = points[points.len() - 1];
                for &current in points {
                    self.draw_line(previous, current, thickness, color);
                    previous = current;
                }
            }
        }
    }

    fn draw_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        if !rect.is_finite() {
            return;
        }
        let r = rect.normalized();
        let color = color.to_rgba();
        if thickness <= 0.0 {
            self.fill_rect_area(r, color);
            return;
        }
        let t = thickness.min(r.w * 0.5).min(r.h * 0.5);
        self.fill_rect_area(Rect::new(r.x, r.y, r.w, t), color);
        self.fill_rect_area(Rect::new(r.x, r.y + r.h - t, r.w, t), color);
        self.fill_rect_area(Rect::new(r.x, r.y + t, t, r.h - 2.0 * t), color);
        self.fill_rect_area(Rect::new(r.x + r.w - t, r.y + t, t, r.h - 2.0 * t), color);
    }

    fn draw_picture(&mut self, rect: Rect, picture: &Picture) {
        if picture.is_empty() || !rect.is_finite() {
            return;
        }
        let r = rect.normalized();
        if r.w <= 0.0 || r.h <= 0.0 {
            return;
        }
        let Some((left, right)) = pixel_span(r.x, r.x + r.w, self.width) else {
            return;
        };
        let Some((top, bottom)) = pixel_span(r.y, r.y + r.h, self.height) else {
            return;
        };
        let (flip_x, flip_y) = (rect.w < 0.0, rect.h < 0.0);
        let (src_w, src_h) = (picture.width(), picture.height());

        for out_y in top..bottom {
            let v = (out_y as f32 + 0.5 - r.y) / r.h;
            let src_y = sample_index(v, src_h, flip_y);
            for out_x in left..right {
                let u = (out_x as f32 + 0.5 - r.x) / r.w;
                let src_x = sample_index(u, src_w, flip_x);
                let Some(texel) = picture.pixel(src_x, src_y) else {
                    continue;
                };
                if texel.a == 0 {
                    continue;
                }
                self.write_pixel_clipped(out_x, out_y, texel.to_rgba());
            }
        }
    }
}

/// First and one-past-last pixel whose center lies in `[start, end)`,
/// clamped to `0..limit`.
fn pixel_span(start: f32, end: f32, limit: u32) -> Option<(i32, i32)> {
    let first = (start - 0.5).ceil().max(0.0);
    let last = (end - 0.5).ceil().min(limit as f32);
    if !(first < last) {
        return None;
    }
    Some((first as i32, last as i32))
}

fn sample_index(t: f32, size: u32, flip: bool) -> u32 {
    let index = ((t * size as f32).floor().max(0.0) as u32).min(size - 1);
    if flip {
        size - 1 - index
    } else {
        index
    }
}

/// Liang-Barsky clip of segment `a..b` against `bounds`.
fn clip_segment(a: Vec2, b: Vec2, bounds: Rect) -> Option<(Vec2, Vec2)> {
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    let delta = b - a;
    let min = bounds.min();
    let max = bounds.max();
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;
    for (p, q) in [
        (-delta.x, a.x - min.x),
        (delta.x, max.x - a.x),
        (-delta.y, a.y - min.y),
        (delta.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + delta * t0, a + delta * t1))
}
