//! 2D anti-aliased shape tessellation
//!
//! Shapes are built from [`Vertex2Alpha`] vertices: the opaque core of a
//! shape has alpha 1 and a thin band around it fades to alpha 0, which gives
//! smooth edges without multisampling.

use crate::foundation::math::{constants, utils, Vec2};
use crate::geometry::Draw2D;
use crate::render::vertex::Vertex2Alpha;

/// Narrowest fading band kept between a line's core and its outer edge
const MIN_EDGE_BAND: f32 = 0.25;

/// Outer (edge) and inner (core) half-widths of an AA line
///
/// Thin lines get a small opaque core, thick ones keep a one unit fade.
fn line_core_radii(width: f32) -> (f32, f32) {
    let (edge, core) = match width as i32 {
        i32::MIN..=1 => ((width + 0.5) * 0.5, 0.25),
        2 => (width * 0.5, 0.75),
        3 => (width * 0.5, 1.5),
        _ => (width * 0.5, width * 0.5 - 1.0),
    };
    (edge, core.min(edge - MIN_EDGE_BAND).max(0.0))
}

fn vertex(p: Vec2, a: f32) -> Vertex2Alpha {
    Vertex2Alpha::new(p.x, p.y, a)
}

impl Draw2D {
    /// Opaque line quad, 4 vertices and 2 triangles
    pub fn line(&mut self, p1: Vec2, p2: Vec2, width: f32) {
        //  0---3
        //  | + |
        //  1---2
        let offset = utils::normalize_or_zero2(utils::left(p2 - p1)) * (width * 0.5);
        let n = self.base_index();
        self.vertices.extend_from_slice(&[
            vertex(p1 - offset, 1.0),
            vertex(p2 - offset, 1.0),
            vertex(p2 + offset, 1.0),
            vertex(p1 + offset, 1.0),
        ]);
        self.push_quad(n, 0, 1, 2, 3);
    }

    /// Anti-aliased line, 8 vertices and 6 triangles
    ///
    /// Vertices run across the line: outer edge, core, core, outer edge, each
    /// as a start/end pair. Both ends are extended by the core radius so
    /// consecutive lines of a polyline overlap into a continuous edge.
    pub fn line_aa(&mut self, p1: Vec2, p2: Vec2, width: f32) {
        // 0\``2\``4\``6
        // | \ | \ | \ |
        // 1__\3__\5__\7
        let (edge_radius, core_radius) = line_core_radii(width);

        let dir = utils::normalize_or_zero2(p2 - p1);
        let right = utils::left(dir);
        let start = p1 - dir * core_radius;
        let end = p2 + dir * core_radius;

        let edge = right * edge_radius;
        let core = right * core_radius;

        let n = self.base_index();
        self.vertices.extend_from_slice(&[
            vertex(start - edge, 0.0),
            vertex(end - edge, 0.0),
            vertex(start - core, 1.0),
            vertex(end - core, 1.0),
            vertex(start + core, 1.0),
            vertex(end + core, 1.0),
            vertex(start + edge, 0.0),
            vertex(end + edge, 0.0),
        ]);
        self.push_triangle(n, 0, 1, 3);
        self.push_triangle(n, 0, 3, 2);
        self.push_triangle(n, 2, 3, 5);
        self.push_triangle(n, 2, 5, 4);
        self.push_triangle(n, 4, 5, 7);
        self.push_triangle(n, 4, 7, 6);
    }

    /// Anti-aliased rectangle outline from its origin corner and size
    pub fn rect_aa(&mut self, origin: Vec2, size: Vec2, width: f32) {
        let p0 = origin;
        let p1 = Vec2::new(origin.x, origin.y + size.y);
        let p2 = origin + size;
        let p3 = Vec2::new(origin.x + size.x, origin.y);
        self.line_aa(p0, p1, width);
        self.line_aa(p1, p2, width);
        self.line_aa(p2, p3, width);
        self.line_aa(p3, p0, width);
    }

    /// Anti-aliased circle outline
    ///
    /// Uses `12 + floor(radius / 6)` segments starting at the top of the
    /// circle and walking clockwise.
    pub fn circle_aa(&mut self, center: Vec2, radius: f32, width: f32) {
        let segments = 12 + (radius as i32) / 6;
        let arc = constants::TAU / segments as f32;

        let mut a = Vec2::new(center.x, center.y + radius);
        for i in 1..=segments {
            let alpha = arc * i as f32;
            let b = Vec2::new(center.x + alpha.sin() * radius, center.y + alpha.cos() * radius);
            self.line_aa(a, b, width);
            a = b;
        }
    }

    /// Opaque filled rectangle, 4 vertices and 2 triangles
    pub fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        let (x1, y1) = (origin.x, origin.y);
        let (x2, y2) = (origin.x + size.x, origin.y + size.y);
        let n = self.base_index();
        self.vertices.extend_from_slice(&[
            Vertex2Alpha::new(x1, y2, 1.0),
            Vertex2Alpha::new(x1, y1, 1.0),
            Vertex2Alpha::new(x2, y1, 1.0),
            Vertex2Alpha::new(x2, y2, 1.0),
        ]);
        self.push_quad(n, 0, 1, 2, 3);
    }

    /// Averaged left normal of the two edges `p1 -> p2` and `p2 -> p3`
    pub fn normal(p1: Vec2, p2: Vec2, p3: Vec2) -> Vec2 {
        let a = utils::left(p1 - p2);
        let b = utils::left(p2 - p3);
        utils::normalize_or_zero2(a + b)
    }

    /// Normal at the first point of a closed shape
    ///
    /// # Panics
    /// If `points` has fewer than 3 points.
    pub fn start_normal(points: &[Vec2]) -> Vec2 {
        assert!(points.len() >= 3, "Normal calculation requires at least 3 points");
        Self::normal(points[points.len() - 1], points[0], points[1])
    }

    /// Normal at the last point of a closed shape
    ///
    /// # Panics
    /// If `points` has fewer than 3 points.
    pub fn end_normal(points: &[Vec2]) -> Vec2 {
        assert!(points.len() >= 3, "Normal calculation requires at least 3 points");
        let n = points.len();
        Self::normal(points[n - 2], points[n - 1], points[0])
    }

    /// Companion of `points[center]` pushed `offset` units along its corner normal
    ///
    /// Right-angle corners are pushed `sqrt(2)` times further so both
    /// adjoining edges stay `offset` away.
    ///
    /// # Panics
    /// If `points` has fewer than 3 points.
    pub fn left_normal_point(center: usize, offset: f32, points: &[Vec2]) -> Vec2 {
        let count = points.len();
        assert!(count >= 3, "Normal calculation requires at least 3 points");

        let prev = if center > 0 { center - 1 } else { count - 1 };
        let next = if center < count - 1 { center + 1 } else { 0 };

        let c = points[center];
        let normal_a = utils::left(points[prev] - c);
        let normal_b = utils::left(c - points[next]);

        let perpendicular =
            normal_a.dot(&normal_b).abs() <= f32::EPSILON * normal_a.norm() * normal_b.norm();
        let corner = if perpendicular { constants::SQRT_2 } else { 1.0 };

        c + utils::normalize_or_zero2(normal_a + normal_b) * (corner * offset)
    }

    /// Filled symmetric polygon with an anti-aliased border
    ///
    /// `points` must be clockwise and pair up into mirror-opposite points.
    /// Produces `2N` vertices (each point followed by its alpha 0 companion),
    /// `6N` border indices and `6(N/2 - 1)` interior indices.
    ///
    /// # Panics
    /// If the point count is odd, or non-zero and below 3.
    pub fn fill_symmetric_shape_aa(&mut self, points: &[Vec2], edge_width: f32) {
        let count = points.len();
        assert!(count % 2 == 0, "Shape count({}) is not symmetric!", count);
        if count == 0 {
            return;
        }

        let quads = count / 2 - 1;
        self.reserve(count * 2, count * 2 + quads * 2);

        //  1-------3
        //  |\     /
        //  | 0---2-
        //  | |   |
        let n = self.base_index();
        for (i, &p) in points.iter().enumerate() {
            let companion = Self::left_normal_point(i, edge_width, points);
            self.vertices.push(vertex(p, 1.0));
            self.vertices.push(vertex(companion, 0.0));
        }

        // border strip, the last quad wraps back to the first point
        let total = 2 * count as u32;
        for k in 0..count as u32 {
            let ib = 2 * k;
            let ib2 = (ib + 2) % total;
            let ib3 = (ib + 3) % total;
            self.push_triangle(n, ib + 1, ib, ib2);
            self.push_triangle(n, ib2, ib3, ib + 1);
        }

        // interior, each point connects to its mirror opposite
        //  | 0---2 |
        //  | | + | |
        //  | 6---4 |
        for q in 0..quads as u32 {
            let ib = 2 * q;
            let ie = total - 2 - ib;
            self.push_triangle(n, ib, ie, ie - 2);
            self.push_triangle(n, ib, ie - 2, ib + 2);
        }
    }

    /// Anti-aliased polyline, closed when it has more than two points
    pub fn line_shape_aa(&mut self, points: &[Vec2], width: f32) {
        self.vertices.reserve(points.len() * 8);
        for pair in points.windows(2) {
            self.line_aa(pair[0], pair[1], width);
        }
        if let [first, .., last] = points {
            if points.len() > 2 {
                self.line_aa(*last, *first, width);
            }
        }
    }

    /// Opaque polyline, closed when it has more than two points
    pub fn line_shape(&mut self, points: &[Vec2], width: f32) {
        self.vertices.reserve(points.len() * 4);
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width);
        }
        if let [first, .., last] = points {
            if points.len() > 2 {
                self.line(*last, *first, width);
            }
        }
    }
}
