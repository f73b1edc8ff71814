//! Software rasterization of the retained scene into an RGBA8 frame.
//!
//! Strokes are rendered as capsules per polyline segment with per-stroke
//! coverage accumulation, which yields round joins for free; coverage falls
//! off linearly over one pixel for cheap anti-aliasing. Gradient brushes are
//! sampled per pixel against the item's fixed horizontal span.

use stroke_graphics::{Color, LineCap, Point};

use crate::scene::{RectItem, Scene, StrokeItem};

pub fn draw_scene(frame: &mut [u8], width: u32, height: u32, scene: &Scene) {
    let expected = width as usize * height as usize * 4;
    if frame.len() < expected {
        // Mismatched buffer during a resize; skip the frame.
        return;
    }
    fill(frame, width, height, scene.background());
    for item in scene.rects() {
        draw_rect(frame, width, height, item);
    }
    for item in scene.strokes() {
        draw_stroke(frame, width, height, item);
    }
}

fn fill(frame: &mut [u8], width: u32, height: u32, color: Color) {
    let rgba = color.to_rgba8();
    for pixel in frame[..width as usize * height as usize * 4].chunks_exact_mut(4) {
        pixel.copy_from_slice(&rgba);
    }
}

fn blend_pixel(frame: &mut [u8], index: usize, color: Color, alpha: f32) {
    let alpha = (alpha * color.a()).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let src = [color.r(), color.g(), color.b()];
    for channel in 0..3 {
        let dst = frame[index + channel] as f32 / 255.0;
        let out = src[channel] * alpha + dst * (1.0 - alpha);
        frame[index + channel] = (out * 255.0).round() as u8;
    }
    frame[index + 3] = 255;
}

fn draw_rect(frame: &mut [u8], width: u32, height: u32, item: &RectItem) {
    let x0 = item.rect.x.floor().max(0.0) as usize;
    let y0 = item.rect.y.floor().max(0.0) as usize;
    let x1 = (item.rect.right().ceil().max(0.0) as usize).min(width as usize);
    let y1 = (item.rect.bottom().ceil().max(0.0) as usize).min(height as usize);
    for py in y0..y1 {
        for px in x0..x1 {
            let index = (py * width as usize + px) * 4;
            blend_pixel(frame, index, item.color, 1.0);
        }
    }
}

fn draw_stroke(frame: &mut [u8], width: u32, height: u32, item: &StrokeItem) {
    let half = item.style.width * 0.5;
    let pad = half + 1.0;

    let mut points = item.contours.iter().flatten();
    let Some(first) = points.next() else {
        return;
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    let x0 = ((min_x - pad).floor().max(0.0)) as usize;
    let y0 = ((min_y - pad).floor().max(0.0)) as usize;
    let x1 = (((max_x + pad).ceil().max(0.0)) as usize).min(width as usize);
    let y1 = (((max_y + pad).ceil().max(0.0)) as usize).min(height as usize);
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    let box_width = x1 - x0;
    let box_height = y1 - y0;
    let mut coverage = vec![0.0f32; box_width * box_height];

    for contour in &item.contours {
        for pair in contour.windows(2) {
            accumulate_segment(
                &mut coverage,
                (x0, y0, box_width, box_height),
                pair[0],
                pair[1],
                half,
                item.style.cap,
            );
        }
    }

    let (span_start, span_end) = item.gradient_span;
    let span = (span_end - span_start).max(f32::EPSILON);
    for by in 0..box_height {
        for bx in 0..box_width {
            let alpha = coverage[by * box_width + bx];
            if alpha <= 0.0 {
                continue;
            }
            let px = x0 + bx;
            let py = y0 + by;
            let sample_x = px as f32 + 0.5;
            let color = item.brush.sample((sample_x - span_start) / span);
            let index = (py * width as usize + px) * 4;
            blend_pixel(frame, index, color, alpha);
        }
    }
}

fn accumulate_segment(
    coverage: &mut [f32],
    (box_x, box_y, box_width, box_height): (usize, usize, usize, usize),
    a: Point,
    b: Point,
    half_width: f32,
    cap: LineCap,
) {
    let pad = half_width + 1.0;
    let seg_x0 = ((a.x.min(b.x) - pad).floor().max(box_x as f32)) as usize;
    let seg_y0 = ((a.y.min(b.y) - pad).floor().max(box_y as f32)) as usize;
    let seg_x1 = (((a.x.max(b.x) + pad).ceil()) as usize).min(box_x + box_width);
    let seg_y1 = (((a.y.max(b.y) + pad).ceil()) as usize).min(box_y + box_height);

    for py in seg_y0..seg_y1 {
        for px in seg_x0..seg_x1 {
            let sample_x = px as f32 + 0.5;
            let sample_y = py as f32 + 0.5;
            let distance = segment_distance(sample_x, sample_y, a, b, cap);
            let alpha = (half_width + 0.5 - distance).clamp(0.0, 1.0);
            if alpha <= 0.0 {
                continue;
            }
            let index = (py - box_y) * box_width + (px - box_x);
            if alpha > coverage[index] {
                coverage[index] = alpha;
            }
        }
    }
}

fn segment_distance(px: f32, py: f32, a: Point, b: Point, cap: LineCap) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 <= f32::EPSILON {
        return Point::new(px, py).distance_to(a);
    }
    let t = ((px - a.x) * dx + (py - a.y) * dy) / len2;
    let t = match cap {
        LineCap::Round => t.clamp(0.0, 1.0),
        LineCap::Butt => {
            if !(0.0..=1.0).contains(&t) {
                return f32::INFINITY;
            }
            t
        }
    };
    Point::new(px, py).distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}
