//! 3D debug shape tessellation
//!
//! Every shape is emitted as [`Vertex3Color`] triangles. Lines have no
//! native width in the target pipeline, so a 3D line is drawn as a thin
//! triangular prism around the segment.

use crate::foundation::color::Color;
use crate::foundation::math::{constants, utils, Vec3};
use crate::geometry::Draw3D;
use crate::render::api::RenderBackend;
use crate::render::vertex::{Vertex3Color, VertexBuffer};
use crate::render::RenderResult;

const VERTICES_PER_LINE: usize = 6;
const TRIANGLES_PER_LINE: usize = 8;

/// Deterministic orthonormal basis around a direction
///
/// Returns `(x, y, z)` with `z` the normalized direction. The helper axis
/// `z + (1, 1, 1)` is parallel to `z` along the `(1, 1, 1)` diagonal, where
/// the X axis is used instead. A zero `dir` yields zero vectors.
fn local_basis(dir: Vec3) -> (Vec3, Vec3, Vec3) {
    let z = utils::normalize_or_zero3(dir);
    let helper = utils::normalize_or_zero3(z + Vec3::new(1.0, 1.0, 1.0));
    let x = z
        .cross(&helper)
        .try_normalize(1e-6)
        .unwrap_or_else(|| utils::normalize_or_zero3(z.cross(&Vec3::x())));
    let y = z.cross(&x);
    (x, y, z)
}

/// Point on a UV sphere at ring `r` and sector `s`
fn sphere_point(center: Vec3, radius: f32, r: usize, s: usize, ring_step: f32, sector_step: f32) -> Vec3 {
    let polar = constants::PI * r as f32 * ring_step;
    let azimuth = constants::TAU * s as f32 * sector_step;
    center
        + radius
            * Vec3::new(
                azimuth.cos() * polar.sin(),
                (polar - constants::HALF_PI).sin(),
                azimuth.sin() * polar.sin(),
            )
}

impl Draw3D {
    /// Reserve room for `lines` more 3D lines
    pub fn reserve_lines(&mut self, lines: usize) {
        self.reserve(lines * VERTICES_PER_LINE, lines * TRIANGLES_PER_LINE);
    }

    /// Single-color 3D line of the given width
    pub fn line(&mut self, a: Vec3, b: Vec3, width: f32, color: Color) {
        self.line_with_colors(a, b, width, color, color);
    }

    /// 3D line as a triangular prism, colored `color_a` at `a` fading to `color_b` at `b`
    pub fn line_with_colors(&mut self, a: Vec3, b: Vec3, width: f32, color_a: Color, color_b: Color) {
        //     2
        //    /|\
        //   0---1
        //   | | |
        //   | 5 |
        //   |/ \|
        //   3---4
        let ab = b - a;
        let (x, y, _) = local_basis(ab);

        let r = width * 0.5;
        let p0 = a - r * (x + y);
        let p1 = a + r * (x - y);
        let p2 = a + r * y;

        let n = self.base_index();
        self.vertices.extend_from_slice(&[
            Vertex3Color::new(p0, color_a),
            Vertex3Color::new(p1, color_a),
            Vertex3Color::new(p2, color_a),
            Vertex3Color::new(p0 + ab, color_b),
            Vertex3Color::new(p1 + ab, color_b),
            Vertex3Color::new(p2 + ab, color_b),
        ]);
        self.push_triangle(n, 0, 1, 2); // start cap
        self.push_triangle(n, 0, 3, 4);
        self.push_triangle(n, 0, 4, 1);
        self.push_triangle(n, 1, 4, 5);
        self.push_triangle(n, 1, 5, 2);
        self.push_triangle(n, 2, 5, 3);
        self.push_triangle(n, 2, 3, 0);
        self.push_triangle(n, 3, 5, 4); // end cap
    }

    /// Solid axis-aligned box
    pub fn solid_box(&mut self, min: Vec3, max: Vec3, color: Color) {
        //       4------7
        //      /|     /|
        // max 0------3 |
        //     | 5----|-6 min
        //     |/     |/
        //     1------2
        let n = self.base_index();
        self.vertices.extend(
            box_corners(min, max)
                .iter()
                .map(|&p| Vertex3Color::new(p, color)),
        );
        self.push_quad(n, 0, 1, 2, 3);
        self.push_quad(n, 3, 2, 6, 7);
        self.push_quad(n, 0, 3, 7, 4);
        self.push_quad(n, 4, 5, 1, 0);
        self.push_quad(n, 7, 6, 5, 4);
        self.push_quad(n, 1, 5, 6, 2);
    }

    /// Solid cube of half-size `radius`
    pub fn cube(&mut self, center: Vec3, radius: f32, color: Color) {
        let offset = Vec3::repeat(radius);
        self.solid_box(center - offset, center + offset, color);
    }

    /// Wireframe box, the 12 edges drawn as 3D lines
    pub fn hollow_box(&mut self, min: Vec3, max: Vec3, width: f32, color: Color) {
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (0, 3), (0, 4),
            (2, 1), (2, 3), (2, 6),
            (5, 1), (5, 4), (5, 6),
            (7, 3), (7, 4), (7, 6),
        ];
        self.reserve_lines(EDGES.len());

        let p = box_corners(min, max);
        for (a, b) in EDGES {
            self.line(p[a], p[b], width, color);
        }
    }

    /// Wireframe cube of half-size `radius`
    pub fn hollow_cube(&mut self, center: Vec3, radius: f32, width: f32, color: Color) {
        let offset = Vec3::repeat(radius);
        self.hollow_box(center - offset, center + offset, width, color);
    }

    /// Octahedral marker: a square base on the XZ plane with apexes above and below
    pub fn prism(&mut self, center: Vec3, radius: f32, color: Color) {
        //        0
        //      .` \`.
        //    .` 4  \  `.3
        //   1_______2.`.
        //    `.    / .
        //      `. /.
        //        5
        let length = radius * 2.0;
        let up = Vec3::y();
        let corner = center + radius * Vec3::new(-1.0, 0.0, -1.0);

        let n = self.base_index();
        self.vertices.extend_from_slice(&[
            Vertex3Color::new(center + up * radius, color),
            Vertex3Color::new(corner, color),
            Vertex3Color::new(corner + length * Vec3::x(), color),
            Vertex3Color::new(corner + length * Vec3::new(1.0, 0.0, 1.0), color),
            Vertex3Color::new(corner + length * Vec3::z(), color),
            Vertex3Color::new(center - up * radius, color),
        ]);
        self.push_triangle(n, 0, 1, 2);
        self.push_triangle(n, 0, 2, 3);
        self.push_triangle(n, 0, 3, 4);
        self.push_triangle(n, 0, 4, 1);
        self.push_triangle(n, 5, 2, 1);
        self.push_triangle(n, 5, 3, 2);
        self.push_triangle(n, 5, 4, 3);
        self.push_triangle(n, 5, 1, 4);
    }

    /// Point marker, drawn as a [`prism`](Self::prism)
    pub fn point(&mut self, p: Vec3, radius: f32, color: Color) {
        self.prism(p, radius, color);
    }

    /// One point marker per position
    pub fn points(&mut self, points: &[Vec3], radius: f32, color: Color) {
        self.reserve(points.len() * 6, points.len() * 4);
        for &p in points {
            self.point(p, radius, color);
        }
    }

    /// Build and upload a point cloud in one call
    pub fn create_points(
        backend: &mut dyn RenderBackend,
        points: &[Vec3],
        radius: f32,
        color: Color,
    ) -> RenderResult<Option<VertexBuffer>> {
        let mut draw = Self::new();
        draw.points(points, radius, color);
        draw.create_buffer(backend)
    }

    /// Solid UV sphere
    ///
    /// Uses `6 + floor(radius / 6)` rings and as many sectors, producing
    /// `rings * sectors` vertices and `(rings - 1) * sectors * 6` indices.
    pub fn sphere(&mut self, center: Vec3, radius: f32, color: Color) {
        let segments = 6 + (radius as usize) / 6;
        let (rings, sectors) = (segments, segments);
        let ring_step = 1.0 / (rings - 1) as f32;
        let sector_step = 1.0 / (sectors - 1) as f32;

        self.reserve(rings * sectors, (rings - 1) * sectors);
        let n = self.base_index();

        for r in 0..rings {
            for s in 0..sectors {
                let pos = sphere_point(center, radius, r, s, ring_step, sector_step);
                self.vertices.push(Vertex3Color::new(pos, color));
            }
        }

        let sectors_u = sectors as u32;
        for r in 0..(rings - 1) as u32 {
            let current = r * sectors_u;
            let next = (r + 1) * sectors_u;
            for s in 0..sectors_u {
                let next_s = (s + 1) % sectors_u;
                self.push_triangle(n, current + s, next + s, next + next_s);
                self.push_triangle(n, current + s, next + next_s, current + next_s);
            }
        }
    }

    /// Wireframe sphere drawn as one continuous ring-by-ring path of lines
    ///
    /// Uses `8 + floor(radius / 6)` rings and sectors. The path walks each
    /// ring in turn and steps directly to the next one, so meridians are
    /// not drawn.
    pub fn hollow_sphere(&mut self, center: Vec3, radius: f32, color: Color, width: f32) {
        let segments = 8 + (radius as usize) / 6;
        let (rings, sectors) = (segments, segments);
        let ring_step = 1.0 / (rings - 1) as f32;
        let sector_step = 1.0 / (sectors - 1) as f32;

        self.reserve_lines(rings * sectors);

        let mut a = sphere_point(center, radius, 0, 0, ring_step, sector_step);
        for r in 0..rings {
            for s in 0..sectors {
                let b = sphere_point(center, radius, r, s, ring_step, sector_step);
                self.line(a, b, width, color);
                a = b;
            }
        }
    }

    /// Solid capped cylinder from `a` to `b`
    ///
    /// Uses `12 + floor(radius / 6)` segments: one quad per segment around the
    /// side and a triangle fan on each cap.
    pub fn cylinder(&mut self, a: Vec3, b: Vec3, radius: f32, color: Color) {
        let segments = 12 + (radius as usize) / 6;
        let arc = constants::TAU / segments as f32;
        let ab = b - a;
        let (x, y, _) = local_basis(ab);

        self.reserve(segments * 2 + 2, segments * 4);
        let n = self.base_index();

        // bottom ring, top ring, then the two cap centers
        let ring: Vec<Vec3> = (0..segments)
            .map(|k| {
                let alpha = arc * k as f32;
                a + x * (alpha.sin() * radius) + y * (alpha.cos() * radius)
            })
            .collect();
        self.vertices.extend(ring.iter().map(|&p| Vertex3Color::new(p, color)));
        self.vertices.extend(ring.iter().map(|&p| Vertex3Color::new(p + ab, color)));
        self.vertices.push(Vertex3Color::new(a, color));
        self.vertices.push(Vertex3Color::new(b, color));

        let segs = segments as u32;
        let (bottom_center, top_center) = (2 * segs, 2 * segs + 1);
        for k in 0..segs {
            let k1 = (k + 1) % segs;
            self.push_quad(n, k, k1, segs + k1, segs + k);
            self.push_triangle(n, bottom_center, k1, k);
            self.push_triangle(n, top_center, segs + k, segs + k1);
        }
    }

    /// Wireframe cylinder with `12 + floor(radius / 6)` segments
    pub fn hollow_cylinder(&mut self, a: Vec3, b: Vec3, radius: f32, width: f32, color: Color) {
        let segments = 12 + (radius as usize) / 6;
        self.hollow_cylinder_with_segments(a, b, radius, width, segments, color);
    }

    /// Wireframe cylinder: per segment a bottom arc, a side line and a top arc
    pub fn hollow_cylinder_with_segments(
        &mut self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        width: f32,
        segments: usize,
        color: Color,
    ) {
        if segments == 0 {
            return;
        }
        let arc = constants::TAU / segments as f32;
        self.reserve_lines(segments * 3);

        let ab = b - a;
        let (x, y, _) = local_basis(ab);

        let mut from = a + y * radius;
        for k in 1..=segments {
            let alpha = arc * k as f32;
            let to = a + x * (alpha.sin() * radius) + y * (alpha.cos() * radius);
            self.line(from, to, width, color);
            self.line(from, from + ab, width, color);
            self.line(from + ab, to + ab, width, color);
            from = to;
        }
    }
}

/// Box corners, `max` first and `min` at index 6
fn box_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        max,
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        min,
        Vec3::new(min.x, max.y, min.z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessBackend;
    use approx::assert_relative_eq;

    fn assert_indices_in_range(draw: &Draw3D) {
        let total = draw.vertices.len() as u32;
        assert!(draw.indices.iter().all(|&i| i < total));
        assert_eq!(draw.indices.len() % 3, 0);
    }

    #[test]
    fn test_line_is_prism() {
        let mut draw = Draw3D::new();
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, -2.0, 3.0);
        draw.line_with_colors(a, b, 0.5, Color::RED, Color::BLUE);

        assert_eq!(draw.vertices.len(), 6);
        assert_eq!(draw.indices.len(), 24);
        for i in 0..3 {
            assert_eq!(draw.vertices[i].color(), Color::RED);
            assert_eq!(draw.vertices[i + 3].color(), Color::BLUE);
            assert_relative_eq!(
                draw.vertices[i + 3].position() - draw.vertices[i].position(),
                b - a,
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn test_line_cross_section_is_perpendicular() {
        let directions = [
            Vec3::x(),
            Vec3::y(),
            -Vec3::z(),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-3.0, 0.5, 2.0),
        ];
        for dir in directions {
            let mut draw = Draw3D::new();
            draw.line(Vec3::zeros(), dir * 10.0, 2.0, Color::WHITE);
            let z = dir.normalize();
            for v in &draw.vertices[..3] {
                assert_relative_eq!(v.position().dot(&z), 0.0, epsilon = 1e-4);
            }
            // apex sits exactly one radius off the axis
            assert_relative_eq!(draw.vertices[2].position().norm(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_box_layout() {
        let mut draw = Draw3D::new();
        let min = Vec3::new(-1.0, -2.0, -3.0);
        let max = Vec3::new(1.0, 2.0, 3.0);
        draw.solid_box(min, max, Color::GREEN);

        assert_eq!(draw.vertices.len(), 8);
        assert_eq!(draw.indices.len(), 36);
        assert_eq!(draw.vertices[0].position(), max);
        assert_eq!(draw.vertices[6].position(), min);
        assert_eq!(&draw.indices[..6], &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_cube_extends_radius_each_way() {
        let mut draw = Draw3D::new();
        draw.cube(Vec3::new(5.0, 0.0, 0.0), 2.0, Color::WHITE);
        assert_eq!(draw.vertices[0].position(), Vec3::new(7.0, 2.0, 2.0));
        assert_eq!(draw.vertices[6].position(), Vec3::new(3.0, -2.0, -2.0));
    }

    #[test]
    fn test_hollow_box_is_twelve_lines() {
        let mut draw = Draw3D::new();
        draw.hollow_cube(Vec3::zeros(), 1.0, 0.1, Color::WHITE);
        assert_eq!(draw.vertices.len(), 12 * 6);
        assert_eq!(draw.indices.len(), 12 * 24);
        assert_indices_in_range(&draw);
    }

    #[test]
    fn test_prism_apexes() {
        let mut draw = Draw3D::new();
        let center = Vec3::new(0.0, 1.0, 0.0);
        draw.prism(center, 0.5, Color::WHITE);

        assert_eq!(draw.vertices.len(), 6);
        assert_eq!(draw.indices.len(), 24);
        assert_eq!(draw.vertices[0].position(), Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(draw.vertices[5].position(), Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(draw.vertices[4].position(), Vec3::new(-0.5, 1.0, 0.5));
    }

    #[test]
    fn test_points() {
        let mut draw = Draw3D::new();
        draw.points(&[Vec3::zeros(), Vec3::x(), Vec3::y()], 0.1, Color::RED);
        assert_eq!(draw.vertices.len(), 18);
        assert_eq!(draw.indices.len(), 72);
        assert_indices_in_range(&draw);
    }

    #[test]
    fn test_create_points_uploads() {
        let mut backend = HeadlessBackend::new(16, 16);
        let buffer = Draw3D::create_points(&mut backend, &[Vec3::zeros()], 0.1, Color::RED)
            .unwrap()
            .unwrap();
        assert_eq!(buffer.vertex_count(), 6);
        assert!(Draw3D::create_points(&mut backend, &[], 0.1, Color::RED).unwrap().is_none());
    }

    #[test]
    fn test_sphere_counts() {
        for radius in [0.5, 1.0, 6.0, 12.5, 30.0] {
            let segments = 6 + (radius as usize) / 6;
            let mut draw = Draw3D::new();
            draw.sphere(Vec3::zeros(), radius, Color::WHITE);
            assert_eq!(draw.vertices.len(), segments * segments);
            assert_eq!(draw.indices.len(), (segments - 1) * segments * 6);
        }
    }

    #[test]
    fn test_sphere_vertices_lie_on_surface() {
        let center = Vec3::new(1.0, -1.0, 2.0);
        let mut draw = Draw3D::new();
        draw.sphere(center, 3.0, Color::WHITE);
        for v in &draw.vertices {
            assert_relative_eq!((v.position() - center).norm(), 3.0, epsilon = 1e-4);
        }
        // first ring is the south pole, last ring the north pole
        assert_relative_eq!(draw.vertices[0].position().y, center.y - 3.0, epsilon = 1e-4);
        let last = draw.vertices.last().unwrap();
        assert_relative_eq!(last.position().y, center.y + 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_after_other_geometry_is_rebased() {
        let mut draw = Draw3D::new();
        draw.cube(Vec3::zeros(), 1.0, Color::WHITE);
        draw.sphere(Vec3::zeros(), 2.0, Color::WHITE);
        assert!(draw.indices[36..].iter().all(|&i| i >= 8));
        assert_indices_in_range(&draw);
    }

    #[test]
    fn test_hollow_sphere_is_continuous_path() {
        let mut draw = Draw3D::new();
        draw.hollow_sphere(Vec3::zeros(), 1.0, Color::WHITE, 0.05);
        let lines = 8 * 8;
        assert_eq!(draw.vertices.len(), lines * 6);

        // the segment endpoint is recoverable from each cross-section
        let endpoint = |v: &[Vertex3Color]| {
            (v[0].position() + v[1].position() + 2.0 * v[2].position()) * 0.25
        };
        // each line starts where the previous one ended
        for line in 1..lines {
            let prev_end = endpoint(&draw.vertices[(line - 1) * 6 + 3..line * 6]);
            let start = endpoint(&draw.vertices[line * 6..line * 6 + 3]);
            assert_relative_eq!(prev_end, start, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_cylinder_counts() {
        let mut draw = Draw3D::new();
        draw.cylinder(Vec3::zeros(), Vec3::new(0.0, 5.0, 0.0), 1.0, Color::WHITE);
        assert_eq!(draw.vertices.len(), 12 * 2 + 2);
        assert_eq!(draw.indices.len(), 12 * 12);
        assert_indices_in_range(&draw);

        // ring vertices are one radius from the axis
        for v in &draw.vertices[..24] {
            let p = v.position();
            assert_relative_eq!(Vec3::new(p.x, 0.0, p.z).norm(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_hollow_cylinder_lines() {
        let mut draw = Draw3D::new();
        draw.hollow_cylinder(Vec3::zeros(), Vec3::z(), 1.0, 0.05, Color::WHITE);
        assert_eq!(draw.vertices.len(), 12 * 3 * 6);

        draw.clear();
        draw.hollow_cylinder_with_segments(Vec3::zeros(), Vec3::z(), 1.0, 0.05, 4, Color::WHITE);
        assert_eq!(draw.vertices.len(), 4 * 3 * 6);
        assert_indices_in_range(&draw);
    }
}
