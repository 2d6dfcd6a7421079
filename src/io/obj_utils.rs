use std::fs;
use std::path::Path;

use wavefront_obj::{obj, ParseError};
use std::fmt;

use crate::math::constants::{ Float, Vector3f };

#[derive(Debug)]
pub enum ObjLoadError {
    Io(std::io::Error),
    Parse(ParseError),
    BadIndex { object: String, index: usize },
}

impl From<std::io::Error> for ObjLoadError {
    fn from(err: std::io::Error) -> Self {
        ObjLoadError::Io(err)
    }
}

impl From<ParseError> for ObjLoadError {
    fn from(err: ParseError) -> Self {
        ObjLoadError::Parse(err)
    }
}

impl fmt::Display for ObjLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjLoadError::Io(err) => write!(f, "io error: {}", err),
            ObjLoadError::Parse(err) => write!(f, "parse error: {}", err),
            ObjLoadError::BadIndex { object, index } => {
                write!(f, "object {} references missing vertex {}", object, index)
            }
        }
    }
}

impl std::error::Error for ObjLoadError {}

/// Reads every triangle of an OBJ file, in file order, in object space.
pub fn read_obj_triangles<P: AsRef<Path>>(path: P) -> Result<Vec<[Vector3f; 3]>, ObjLoadError> {
    let data = fs::read_to_string(path)?;
    parse_obj_triangles(&data)
}

pub fn parse_obj_triangles(input: &str) -> Result<Vec<[Vector3f; 3]>, ObjLoadError> {
    let obj_set = obj::parse(fan_polygons(input))?;
    let mut triangles = Vec::new();

    for object in &obj_set.objects {
        let vertex = |index: usize| -> Result<Vector3f, ObjLoadError> {
            object.vertices.get(index)
                .map(|v| Vector3f::new(v.x as Float, v.y as Float, v.z as Float))
                .ok_or_else(|| ObjLoadError::BadIndex { object: object.name.clone(), index })
        };

        for geom in &object.geometry {
            for shape in &geom.shapes {
                if let obj::Primitive::Triangle(a, b, c) = &shape.primitive {
                    triangles.push([vertex(a.0)?, vertex(b.0)?, vertex(c.0)?]);
                }
            }
        }
    }

    Ok(triangles)
}

// The OBJ parser only accepts triangles, so polygons are rewritten as fans
// around their first corner before parsing.
fn fan_polygons(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for line in input.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some("f") {
            let corners: Vec<&str> = tokens.collect();
            if corners.len() > 3 {
                for pair in corners[1..].windows(2) {
                    out.push_str(&format!("f {} {} {}\n", corners[0], pair[0], pair[1]));
                }
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_triangle() {
        let input = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        let tris = parse_obj_triangles(input).expect("failed to parse obj");
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0][1], Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(tris[0][2], Vector3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_quads_become_fans() {
        let input = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3 4
";
        let tris = parse_obj_triangles(input).expect("failed to parse obj");
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[1], [
            Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(1.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
        ]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_obj_triangles("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, ObjLoadError::Io(_)));
    }
}
