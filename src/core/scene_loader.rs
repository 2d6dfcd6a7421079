// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::scene::{SceneNode, WhichChild};
use crate::math::constants::{Float, Vector3f};
use crate::math::transform::Transform;
use crate::math::units::Units;
use crate::shapes::cube::Cube;
use crate::shapes::indexed_face_set::IndexedFaceSet;
use crate::shapes::triangle_mesh::TriangleMesh;

#[derive(Debug)]
pub enum SceneLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
}

impl From<std::io::Error> for SceneLoadError {
    fn from(err: std::io::Error) -> Self {
        SceneLoadError::Io(err)
    }
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(err) => write!(f, "io error: {}", err),
            SceneLoadError::Parse(msg) => write!(f, "parse error: {}", msg),
            SceneLoadError::MissingField(field) => write!(f, "missing field: {}", field),
        }
    }
}

impl std::error::Error for SceneLoadError {}

#[derive(Debug, Copy, Clone, PartialEq)]
enum GroupKind {
    Separator,
    Group,
    TransformSeparator,
    Switch(WhichChild),
}

struct Frame {
    element: String,
    kind: GroupKind,
    children: Vec<SceneNode>,
}

impl Frame {
    fn finish(self) -> SceneNode {
        match self.kind {
            GroupKind::Separator => SceneNode::Separator(self.children),
            GroupKind::Group => SceneNode::Group(self.children),
            GroupKind::TransformSeparator => SceneNode::TransformSeparator(self.children),
            GroupKind::Switch(which_child) => SceneNode::Switch { which_child, children: self.children },
        }
    }
}

type Attributes = HashMap<String, String>;

/// Reads an XML scene file into a scene graph rooted at a separator.
/// `obj` filenames are resolved against the scene file's directory.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneNode, SceneLoadError> {
    let path = path.as_ref();
    log::info!("Loading scene from: {}.", path.display());

    let bytes = fs::read(path)?;
    let xml = String::from_utf8(bytes)
        .map_err(|e| SceneLoadError::Parse(format!("scene file is not utf-8: {}", e)))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let root = parse_scene(&xml, base_dir)?;

    log::info!("Loaded scene: {} nodes, {} shapes.", root.node_count(), root.shape_count());
    log::debug!("Scene graph: {:?}", root);
    Ok(root)
}

pub fn parse_scene(xml: &str, base_dir: &Path) -> Result<SceneNode, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut defaults: HashMap<String, String> = HashMap::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut open_leaf: Option<String> = None;
    let mut root: Option<SceneNode> = None;

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)
            .map_err(|e| SceneLoadError::Parse(format!("xml error at byte {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Eof => break,
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if let Some(leaf) = &open_leaf {
                    return Err(SceneLoadError::Parse(format!("<{}> cannot contain <{}>", leaf, name)));
                }
                if root.is_some() {
                    return Err(SceneLoadError::Parse(format!("unexpected <{}> after </scene>", name)));
                }

                let attrs = read_attributes(e, &defaults)?;

                if stack.is_empty() && name != "scene" {
                    return Err(SceneLoadError::Parse(format!("expected <scene> root, found <{}>", name)));
                }

                if let Some(kind) = group_kind(&name, &attrs)? {
                    let frame = Frame { element: name, kind, children: Vec::new() };
                    if is_empty {
                        attach(&mut stack, &mut root, frame.finish());
                    } else {
                        stack.push(frame);
                    }
                    continue;
                }

                if name == "default" {
                    if let (Some(k), Some(v)) = (attrs.get("name"), attrs.get("value")) {
                        defaults.insert(k.clone(), v.clone());
                    }
                } else {
                    let node = leaf_node(&name, &attrs, base_dir)?;
                    attach(&mut stack, &mut root, node);
                }

                if !is_empty {
                    open_leaf = Some(name);
                }
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if open_leaf.as_deref() == Some(name.as_str()) {
                    open_leaf = None;
                    continue;
                }

                let frame = stack.pop()
                    .ok_or_else(|| SceneLoadError::Parse(format!("unmatched </{}>", name)))?;
                if frame.element != name {
                    return Err(SceneLoadError::Parse(format!("expected </{}>, found </{}>", frame.element, name)));
                }
                attach(&mut stack, &mut root, frame.finish());
            }
            Event::Text(_) => {
                return Err(SceneLoadError::Parse(String::from("unexpected text content")));
            }
            _ => {}
        }
    }

    if let Some(frame) = stack.last() {
        return Err(SceneLoadError::Parse(format!("unclosed <{}>", frame.element)));
    }
    root.ok_or(SceneLoadError::MissingField("scene"))
}

fn attach(stack: &mut Vec<Frame>, root: &mut Option<SceneNode>, node: SceneNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn group_kind(name: &str, attrs: &Attributes) -> Result<Option<GroupKind>, SceneLoadError> {
    let kind = match name {
        "scene" | "separator" => GroupKind::Separator,
        "group" => GroupKind::Group,
        "transform_separator" => GroupKind::TransformSeparator,
        "switch" => {
            let which_child = match attrs.get("which_child") {
                Some(v) => parse_int(v)?,
                None => -1,
            };
            GroupKind::Switch(WhichChild::from_inventor(which_child))
        }
        _ => return Ok(None),
    };
    Ok(Some(kind))
}

fn leaf_node(name: &str, attrs: &Attributes, base_dir: &Path) -> Result<SceneNode, SceneLoadError> {
    let node = match name {
        "transform" => {
            let translation = vec3_or(attrs, "translation", Vector3f::zeros())?;
            let rotation = axis_angle_or_identity(attrs, "rotation")?;
            let scale_factor = vec3_or(attrs, "scale_factor", Vector3f::new(1.0, 1.0, 1.0))?;
            let scale_orientation = axis_angle_or_identity(attrs, "scale_orientation")?;
            let center = vec3_or(attrs, "center", Vector3f::zeros())?;
            SceneNode::Transform(Transform::from_components(
                translation, rotation, scale_factor, scale_orientation, center))
        }
        "translation" => {
            SceneNode::Transform(Transform::from_translation(vec3_or(attrs, "value", Vector3f::zeros())?))
        }
        "rotation" => {
            let axis = vec3_or(attrs, "axis", Vector3f::new(0.0, 0.0, 1.0))?;
            let angle = match attrs.get("angle") {
                Some(v) => parse_float(v)?,
                None => 0.0,
            };
            SceneNode::Transform(Transform::from_axis_angle(axis, angle))
        }
        "scale" => {
            let value = attrs.get("value").ok_or(SceneLoadError::MissingField("scale.value"))?;
            let values = parse_floats(value)?;
            let s = match values.as_slice() {
                [u] => Vector3f::new(*u, *u, *u),
                [x, y, z] => Vector3f::new(*x, *y, *z),
                _ => return Err(SceneLoadError::Parse(format!("invalid scale: {}", value))),
            };
            SceneNode::Transform(Transform::from_scale(s))
        }
        "matrix_transform" => {
            let value = attrs.get("matrix").ok_or(SceneLoadError::MissingField("matrix_transform.matrix"))?;
            let values = parse_floats(value)?;
            let t = Transform::from_column_slice(&values)
                .ok_or_else(|| SceneLoadError::Parse(format!("matrix needs 16 values, got {}", values.len())))?;
            SceneNode::Transform(t)
        }
        "units" => {
            let value = attrs.get("value").ok_or(SceneLoadError::MissingField("units.value"))?;
            let units = Units::from_name(value);
            if units == Units::Unknown {
                log::warn!("Unrecognised units '{}', treating as meters.", value);
            }
            SceneNode::Units(units)
        }
        "coordinate3" => {
            let value = attrs.get("point").ok_or(SceneLoadError::MissingField("coordinate3.point"))?;
            let values = parse_floats(value)?;
            if values.len() % 3 != 0 {
                return Err(SceneLoadError::Parse(format!("coordinate3 needs xyz triples, got {} values", values.len())));
            }
            let points = values.chunks(3).map(|c| Vector3f::new(c[0], c[1], c[2])).collect();
            SceneNode::coordinates(points)
        }
        "indexed_face_set" => {
            let value = attrs.get("coord_index").ok_or(SceneLoadError::MissingField("indexed_face_set.coord_index"))?;
            let coord_index = split_list(value).map(parse_index).collect::<Result<Vec<_>, _>>()?;
            SceneNode::shape(IndexedFaceSet::with_id(coord_index, attrs.get("id").cloned()))
        }
        "cube" => {
            let width = float_or(attrs, "width", 2.0)?;
            let height = float_or(attrs, "height", 2.0)?;
            let depth = float_or(attrs, "depth", 2.0)?;
            SceneNode::shape(Cube::new(width, height, depth, attrs.get("id").cloned()))
        }
        "obj" => {
            let filename = attrs.get("filename").ok_or(SceneLoadError::MissingField("obj.filename"))?;
            let filename = if Path::new(filename).is_absolute() {
                Path::new(filename).to_path_buf()
            } else {
                base_dir.join(filename)
            };
            let mesh = TriangleMesh::from_obj(&filename, attrs.get("id").cloned())
                .map_err(|e| SceneLoadError::Parse(format!("obj load failed for {}: {}", filename.display(), e)))?;
            SceneNode::shape(mesh)
        }
        _ => return Err(SceneLoadError::Parse(format!("unsupported element: <{}>", name))),
    };
    Ok(node)
}

fn read_attributes(e: &BytesStart, defaults: &HashMap<String, String>) -> Result<Attributes, SceneLoadError> {
    let mut attrs = Attributes::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| SceneLoadError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value().map_err(|e| SceneLoadError::Parse(e.to_string()))?;
        attrs.insert(key, resolve_value(&value, defaults));
    }
    Ok(attrs)
}

// Each `$identifier` token is looked up whole; unknown names stay verbatim.
fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let len = after.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(after.len());
        match defaults.get(&after[..len]) {
            Some(v) if len > 0 => out.push_str(v),
            _ => {
                out.push('$');
                out.push_str(&after[..len]);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty())
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_int(value: &str) -> Result<i64, SceneLoadError> {
    value.trim().parse::<i64>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_index(value: &str) -> Result<i32, SceneLoadError> {
    value.trim().parse::<i32>().map_err(|_| SceneLoadError::Parse(format!("invalid coordinate index: {}", value)))
}

fn parse_floats(value: &str) -> Result<Vec<Float>, SceneLoadError> {
    split_list(value).map(parse_float).collect()
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    match parse_floats(value)?.as_slice() {
        [x, y, z] => Ok(Vector3f::new(*x, *y, *z)),
        _ => Err(SceneLoadError::Parse(format!("invalid vec3: {}", value))),
    }
}

fn vec3_or(attrs: &Attributes, key: &str, default: Vector3f) -> Result<Vector3f, SceneLoadError> {
    attrs.get(key).map(|v| parse_vec3(v)).unwrap_or(Ok(default))
}

fn float_or(attrs: &Attributes, key: &str, default: Float) -> Result<Float, SceneLoadError> {
    attrs.get(key).map(|v| parse_float(v)).unwrap_or(Ok(default))
}

// "x,y,z,angle" with the angle in radians.
fn axis_angle_or_identity(attrs: &Attributes, key: &str) -> Result<(Vector3f, Float), SceneLoadError> {
    let value = match attrs.get(key) {
        Some(v) => v,
        None => return Ok((Vector3f::new(0.0, 0.0, 1.0), 0.0)),
    };
    match parse_floats(value)?.as_slice() {
        [x, y, z, angle] => Ok((Vector3f::new(*x, *y, *z), *angle)),
        _ => Err(SceneLoadError::Parse(format!("invalid rotation: {}", value))),
    }
}
