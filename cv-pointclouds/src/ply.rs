use crate::{CloudError, PointCloud};
use cv_core::nalgebra::{Point3, Vector3};
use ply_rs::{
    ply::{
        Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
        ScalarType,
    },
    writer::Writer,
};
use std::io::Write;

/// Plain geometry (colored vertices, triangles and line segments) that can be written as ASCII PLY.
#[derive(Debug, Clone, Default)]
pub struct PlyGeometry {
    vertices: Vec<(Point3<f64>, [u8; 3])>,
    faces: Vec<[usize; 3]>,
    edges: Vec<[usize; 2]>,
}

impl PlyGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[(Point3<f64>, [u8; 3])] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, point: Point3<f64>, color: [u8; 3]) -> usize {
        let pos = self.vertices.len();
        self.vertices.push((point, color));
        pos
    }

    pub fn add_triangle(&mut self, a: usize, b: usize, c: usize) -> usize {
        let pos = self.faces.len();
        self.faces.push([a, b, c]);
        pos
    }

    pub fn add_edge(&mut self, a: usize, b: usize) -> usize {
        let pos = self.edges.len();
        self.edges.push([a, b]);
        pos
    }

    /// Adds every point of the cloud as a vertex. Uncolored clouds use `fallback_color`.
    pub fn add_cloud(&mut self, cloud: &PointCloud, fallback_color: [u8; 3]) {
        match cloud.colors() {
            Some(colors) => {
                for (&p, &c) in cloud.points().iter().zip(colors) {
                    self.add_vertex(p, color_to_rgb8(c));
                }
            }
            None => {
                for &p in cloud.points() {
                    self.add_vertex(p, fallback_color);
                }
            }
        }
    }

    /// Writes the geometry as ASCII PLY.
    ///
    /// The `face` and `edge` elements are only declared when there is at least one of them.
    pub fn write(&self, mut writer: impl Write) -> Result<(), CloudError> {
        let mut ply = Ply::<DefaultElement>::new();
        ply.header.encoding = Encoding::Ascii;
        ply.header
            .comments
            .push("Exported from rust-cv/cv-pointclouds".to_string());

        let mut point_element = ElementDef::new("vertex".to_string());
        for axis in ["x", "y", "z"] {
            let p = PropertyDef::new(axis.to_string(), PropertyType::Scalar(ScalarType::Double));
            point_element.properties.add(p);
        }
        for channel in ["red", "green", "blue"] {
            let p = PropertyDef::new(channel.to_string(), PropertyType::Scalar(ScalarType::UChar));
            point_element.properties.add(p);
        }
        ply.header.elements.add(point_element);

        if !self.faces.is_empty() {
            let mut face_element = ElementDef::new("face".to_string());
            let vertex_list = PropertyDef::new(
                "vertex_index".to_string(),
                PropertyType::List(ScalarType::UChar, ScalarType::Int),
            );
            face_element.properties.add(vertex_list);
            ply.header.elements.add(face_element);
        }

        if !self.edges.is_empty() {
            let mut edge_element = ElementDef::new("edge".to_string());
            for end in ["vertex1", "vertex2"] {
                let p = PropertyDef::new(end.to_string(), PropertyType::Scalar(ScalarType::Int));
                edge_element.properties.add(p);
            }
            ply.header.elements.add(edge_element);
        }

        let vertices = self
            .vertices
            .iter()
            .map(|&(p, [r, g, b])| {
                let mut point = DefaultElement::new();
                point.insert("x".to_string(), Property::Double(p.x));
                point.insert("y".to_string(), Property::Double(p.y));
                point.insert("z".to_string(), Property::Double(p.z));
                point.insert("red".to_string(), Property::UChar(r));
                point.insert("green".to_string(), Property::UChar(g));
                point.insert("blue".to_string(), Property::UChar(b));
                point
            })
            .collect();
        ply.payload.insert("vertex".to_string(), vertices);

        if !self.faces.is_empty() {
            let faces = self
                .faces
                .iter()
                .map(|&[a, b, c]| {
                    let mut face = DefaultElement::new();
                    face.insert(
                        "vertex_index".to_string(),
                        Property::ListInt(vec![a as i32, b as i32, c as i32]),
                    );
                    face
                })
                .collect();
            ply.payload.insert("face".to_string(), faces);
        }

        if !self.edges.is_empty() {
            let edges = self
                .edges
                .iter()
                .map(|&[a, b]| {
                    let mut edge = DefaultElement::new();
                    edge.insert("vertex1".to_string(), Property::Int(a as i32));
                    edge.insert("vertex2".to_string(), Property::Int(b as i32));
                    edge
                })
                .collect();
            ply.payload.insert("edge".to_string(), edges);
        }

        Writer::new().write_ply(&mut writer, &mut ply)?;
        Ok(())
    }
}

/// Converts a `[0, 1]` color into 8-bit channels, clamping out-of-range values.
pub fn color_to_rgb8(color: Vector3<f64>) -> [u8; 3] {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}
