// Software canvas
// Draw commands produced by the face renderer and the RGB frame they rasterize into

use crate::color::Rgb;

/// Pixel position on the canvas, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Angular range of an ellipse in degrees.
/// 0 points right and angles sweep clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub start: f64,
    pub end: f64,
}

impl ArcSpan {
    pub const FULL: ArcSpan = ArcSpan { start: 0.0, end: 360.0 };

    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Ordered span with `start` in [0, 360) where possible and a width of at most 360
    pub fn normalized(&self) -> (f64, f64) {
        let (mut start, mut end) = if self.start > self.end {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };

        while start < 0.0 {
            start += 360.0;
            end += 360.0;
        }
        while end > 360.0 {
            start -= 360.0;
            end -= 360.0;
        }
        if end - start > 360.0 {
            start = 0.0;
            end = 360.0;
        }

        (start, end)
    }

    pub fn is_full(&self) -> bool {
        let (start, end) = self.normalized();
        end - start >= 360.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Fill,
    Width(i32),
}

/// One drawing operation, in paint order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    /// `axes` are half-axes. A filled partial arc is a pie sector.
    Ellipse {
        center: Point,
        axes: (i32, i32),
        span: ArcSpan,
        color: Rgb,
        stroke: Stroke,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        width: i32,
    },
    /// Filled polygon
    Polygon {
        points: Vec<Point>,
        color: Rgb,
    },
    /// Filled circle
    Circle {
        center: Point,
        radius: i32,
        color: Rgb,
    },
}

/// RGB framebuffer
#[derive(Clone)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>, // RGB data
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        for pixel in self.data.chunks_exact_mut(3) {
            pixel[0] = color.red;
            pixel[1] = color.green;
            pixel[2] = color.blue;
        }
    }

    /// Set one pixel; positions outside the frame are ignored
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }

        let idx = (y as usize * self.width + x as usize) * 3;
        self.data[idx] = color.red;
        self.data[idx + 1] = color.green;
        self.data[idx + 2] = color.blue;
    }

    /// Get RGB color at pixel position
    pub fn get_pixel(&self, x: usize, y: usize) -> Rgb {
        if x >= self.width || y >= self.height {
            return Rgb::BLACK;
        }

        let idx = (y * self.width + x) * 3;
        Rgb::new(self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    pub fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear(color) => self.clear(*color),
            DrawCommand::Ellipse { center, axes, span, color, stroke } => {
                self.ellipse(*center, *axes, *span, *color, *stroke)
            }
            DrawCommand::Line { from, to, color, width } => {
                let from = (from.x as f64, from.y as f64);
                let to = (to.x as f64, to.y as f64);
                self.thick_segment(from, to, *width, *color);
            }
            DrawCommand::Polygon { points, color } => {
                let points: Vec<(f64, f64)> = points.iter()
                    .map(|p| (p.x as f64, p.y as f64))
                    .collect();
                self.fill_polygon(&points, *color);
            }
            DrawCommand::Circle { center, radius, color } => {
                self.fill_ellipse(*center, (*radius, *radius), *color);
            }
        }
    }

    pub fn draw_all<'a>(&mut self, commands: impl IntoIterator<Item = &'a DrawCommand>) {
        for command in commands {
            self.draw(command);
        }
    }

    fn ellipse(&mut self, center: Point, axes: (i32, i32), span: ArcSpan,
               color: Rgb, stroke: Stroke) {
        match stroke {
            Stroke::Fill if span.is_full() => self.fill_ellipse(center, axes, color),
            Stroke::Fill => {
                let mut points = arc_points(center, axes, span);
                points.push((center.x as f64, center.y as f64));
                self.fill_polygon(&points, color);
            }
            Stroke::Width(width) => {
                let points = arc_points(center, axes, span);
                for pair in points.windows(2) {
                    self.thick_segment(pair[0], pair[1], width, color);
                }
            }
        }
    }

    fn fill_ellipse(&mut self, center: Point, (a, b): (i32, i32), color: Rgb) {
        if a <= 0 || b <= 0 {
            self.set(center.x, center.y, color);
            return;
        }

        let (a_f, b_f) = (a as f64, b as f64);
        for dy in -b..=b {
            for dx in -a..=a {
                let nx = dx as f64 / a_f;
                let ny = dy as f64 / b_f;
                if nx * nx + ny * ny <= 1.0 {
                    self.set(center.x + dx, center.y + dy, color);
                }
            }
        }
    }

    /// Scanline fill, even-odd rule, pixel centres on integer coordinates
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgb) {
        if points.len() < 3 {
            return;
        }

        let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).ceil() as i32;
        let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max).floor() as i32;
        let mut crossings = Vec::with_capacity(8);

        for y in min_y..=max_y {
            let yf = y as f64;
            crossings.clear();

            for i in 0..points.len() {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % points.len()];
                if (y0 <= yf && yf < y1) || (y1 <= yf && yf < y0) {
                    crossings.push(x0 + (yf - y0) * (x1 - x0) / (y1 - y0));
                }
            }

            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks_exact(2) {
                for x in pair[0].ceil() as i32..=pair[1].floor() as i32 {
                    self.set(x, y, color);
                }
            }
        }

        // Horizontal top/bottom edges are skipped by the half-open crossing test
        for i in 0..points.len() {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            if y0 == y1 && y0.fract() == 0.0 {
                let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
                for x in lo.ceil() as i32..=hi.floor() as i32 {
                    self.set(x, y0 as i32, color);
                }
            }
        }
    }

    /// Segment with round caps
    fn thick_segment(&mut self, from: (f64, f64), to: (f64, f64), width: i32, color: Rgb) {
        let half = (width.max(1) as f64) / 2.0;
        let min_x = (from.0.min(to.0) - half).floor() as i32;
        let max_x = (from.0.max(to.0) + half).ceil() as i32;
        let min_y = (from.1.min(to.1) - half).floor() as i32;
        let max_y = (from.1.max(to.1) + half).ceil() as i32;

        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len_sq = dx * dx + dy * dy;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (px, py) = (x as f64 - from.0, y as f64 - from.1);
                let t = if len_sq == 0.0 {
                    0.0
                } else {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                };
                let (ex, ey) = (px - t * dx, py - t * dy);
                if ex * ex + ey * ey <= half * half {
                    self.set(x, y, color);
                }
            }
        }
    }
}

/// Points along an elliptic arc, one per degree
fn arc_points(center: Point, (a, b): (i32, i32), span: ArcSpan) -> Vec<(f64, f64)> {
    let (start, end) = span.normalized();
    let steps = ((end - start).ceil() as usize).max(1);

    (0..=steps)
        .map(|i| {
            let angle = (start + (end - start) * i as f64 / steps as f64).to_radians();
            (
                center.x as f64 + a as f64 * angle.cos(),
                center.y as f64 + b as f64 * angle.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn lit(frame: &Frame, x: usize, y: usize) -> bool {
        frame.get_pixel(x, y) == RED
    }

    #[test]
    fn test_span_normalization() {
        assert_eq!(ArcSpan::new(-190.0, -420.0).normalized(), (-60.0, 170.0));
        assert_eq!(ArcSpan::new(10.0, 240.0).normalized(), (10.0, 240.0));
        assert_eq!(ArcSpan::new(180.0, 360.0).normalized(), (180.0, 360.0));
        assert!(ArcSpan::FULL.is_full());
        assert!(ArcSpan::new(-100.0, 500.0).is_full());
        assert!(!ArcSpan::new(10.0, 240.0).is_full());
    }

    #[test]
    fn test_set_ignores_out_of_bounds() {
        let mut frame = Frame::new(4, 4);
        frame.set(-1, 0, RED);
        frame.set(0, 4, RED);
        frame.set(4, 0, RED);
        assert!(frame.data.iter().all(|&b| b == 0));
        assert_eq!(frame.get_pixel(10, 10), Rgb::BLACK);
    }

    #[test]
    fn test_clear_fills_every_pixel() {
        let mut frame = Frame::new(3, 2);
        frame.draw(&DrawCommand::Clear(RED));
        for y in 0..2 {
            for x in 0..3 {
                assert!(lit(&frame, x, y));
            }
        }
    }

    #[test]
    fn test_filled_ellipse_bounds() {
        let mut frame = Frame::new(100, 100);
        frame.draw(&DrawCommand::Ellipse {
            center: Point::new(50, 50),
            axes: (20, 10),
            span: ArcSpan::FULL,
            color: RED,
            stroke: Stroke::Fill,
        });

        assert!(lit(&frame, 50, 50));
        assert!(lit(&frame, 70, 50));
        assert!(lit(&frame, 50, 60));
        assert!(!lit(&frame, 71, 50));
        assert!(!lit(&frame, 50, 61));
        assert!(!lit(&frame, 68, 58));
    }

    #[test]
    fn test_upper_half_arc_outline() {
        let mut frame = Frame::new(100, 100);
        frame.draw(&DrawCommand::Ellipse {
            center: Point::new(50, 50),
            axes: (30, 30),
            span: ArcSpan::new(180.0, 360.0),
            color: RED,
            stroke: Stroke::Width(5),
        });

        // Top of the arc is drawn, centre and bottom are not
        assert!(lit(&frame, 50, 20));
        assert!(!lit(&frame, 50, 50));
        assert!(!lit(&frame, 50, 80));
    }

    #[test]
    fn test_sector_leaves_wedge_empty() {
        let mut frame = Frame::new(200, 200);
        frame.draw(&DrawCommand::Ellipse {
            center: Point::new(100, 100),
            axes: (50, 50),
            span: ArcSpan::new(10.0, 240.0),
            color: RED,
            stroke: Stroke::Fill,
        });

        // Bottom (90 deg) and left (180 deg) are inside the sector
        assert!(lit(&frame, 100, 130));
        assert!(lit(&frame, 70, 100));
        // Upper right (about 300 deg) is the missing wedge
        assert!(!lit(&frame, 115, 75));
    }

    #[test]
    fn test_thick_horizontal_line() {
        let mut frame = Frame::new(50, 50);
        frame.draw(&DrawCommand::Line {
            from: Point::new(10, 25),
            to: Point::new(40, 25),
            color: RED,
            width: 5,
        });

        for x in 10..=40 {
            for y in 23..=27 {
                assert!(lit(&frame, x, y));
            }
        }
        assert!(!lit(&frame, 25, 22));
        assert!(!lit(&frame, 25, 28));
    }

    #[test]
    fn test_polygon_and_circle() {
        let mut frame = Frame::new(50, 50);
        frame.draw(&DrawCommand::Polygon {
            points: vec![Point::new(20, 5), Point::new(10, 30), Point::new(30, 30)],
            color: RED,
        });
        assert!(lit(&frame, 20, 20));
        assert!(lit(&frame, 12, 30));
        assert!(!lit(&frame, 12, 10));

        let mut frame = Frame::new(50, 50);
        frame.draw(&DrawCommand::Circle { center: Point::new(25, 25), radius: 10, color: RED });
        assert!(lit(&frame, 35, 25));
        assert!(!lit(&frame, 33, 33));
    }
}
