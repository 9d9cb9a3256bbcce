use cv_core::nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use cv_geom::OrientedBoundingBox;
use cv_pointclouds::{color_to_rgb8, PlyGeometry};

/// Geometry handed to a renderer. Everything is in the world frame.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualGeometry {
    /// Points drawn in a single color.
    PointCloud {
        points: Vec<Point3<f64>>,
        color: Vector3<f64>,
    },
    /// Axes of length `size` along world x, y and z, drawn red, green and blue.
    CoordinateFrame { origin: Point3<f64>, size: f64 },
    OrientedBox(OrientedBoundingBox),
}

/// The display color of an object: `(0.1 id, 0.3 id, 0.7 id)`, each wrapped into `[0, 1)`.
pub fn object_color(object_id: i32) -> Vector3<f64> {
    let id = f64::from(object_id);
    Vector3::new(id * 0.1, id * 0.3, id * 0.7).map(|c| c.rem_euclid(1.0))
}

/// Builds the box drawn for an object: centered at its world position with its world orientation.
pub(crate) fn world_box(
    position: Point3<f64>,
    orientation: &Matrix3<f64>,
    extent: Vector3<f64>,
) -> OrientedBoundingBox {
    OrientedBoundingBox::new(
        position,
        Rotation3::from_matrix_unchecked(*orientation),
        extent,
    )
}

// Outward facing triangles over the corner numbering of `OrientedBoundingBox::corners`.
const BOX_TRIANGLES: [[usize; 3]; 12] = [
    [0, 6, 2],
    [0, 4, 6],
    [1, 7, 5],
    [1, 3, 7],
    [0, 5, 4],
    [0, 1, 5],
    [2, 7, 3],
    [2, 6, 7],
    [0, 3, 1],
    [0, 2, 3],
    [4, 7, 6],
    [4, 5, 7],
];

const BOX_COLOR: [u8; 3] = [255, 255, 0];

/// Flattens the geometry into PLY vertices, faces and edges.
pub fn to_ply_geometry(geometries: &[VisualGeometry]) -> PlyGeometry {
    let mut ply = PlyGeometry::new();
    for geometry in geometries {
        match geometry {
            VisualGeometry::PointCloud { points, color } => {
                let color = color_to_rgb8(*color);
                for &point in points {
                    ply.add_vertex(point, color);
                }
            }
            VisualGeometry::CoordinateFrame { origin, size } => {
                let center = ply.add_vertex(*origin, [255, 255, 255]);
                for axis in 0..3 {
                    let mut color = [0; 3];
                    color[axis] = 255;
                    let tip = ply.add_vertex(*origin + Vector3::ith(axis, *size), color);
                    ply.add_edge(center, tip);
                }
            }
            VisualGeometry::OrientedBox(obb) => {
                let corners = obb.corners().map(|corner| ply.add_vertex(corner, BOX_COLOR));
                for [a, b, c] in BOX_TRIANGLES {
                    ply.add_triangle(corners[a], corners[b], corners[c]);
                }
            }
        }
    }
    ply
}
