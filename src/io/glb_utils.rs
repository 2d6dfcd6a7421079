/* Copyright 2020 @TwoCookingMice */

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use gltf::json;
use json::validation::Checked::Valid;
use json::validation::USize64;

use crate::core::flatten::FlattenedMesh;

const BASE_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
const GLB_HEADER_BYTES: usize = 12;
const GLB_CHUNK_HEADER_BYTES: usize = 8;

static NEXT_TEMP_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub enum ExportError {
    /// No positions or no indices; nothing is written.
    EmptyMesh,
    Encode(String),
    Io(std::io::Error),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EmptyMesh => write!(f, "no triangles extracted from scene graph"),
            ExportError::Encode(msg) => write!(f, "glb encoding failed: {}", msg),
            ExportError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for ExportError {}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Written to `asset.generator`.
    pub generator: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { generator: format!("ivglb {}", env!("CARGO_PKG_VERSION")) }
    }
}

/// Positions (f32 xyz) followed directly by indices (u32), little endian.
fn pack_blob(mesh: &FlattenedMesh) -> Vec<u8> {
    let mut blob = Vec::with_capacity(mesh.vertex_count() * 12 + mesh.indices().len() * 4);
    for p in mesh.positions() {
        blob.extend_from_slice(&p.x.to_le_bytes());
        blob.extend_from_slice(&p.y.to_le_bytes());
        blob.extend_from_slice(&p.z.to_le_bytes());
    }
    for idx in mesh.indices() {
        blob.extend_from_slice(&idx.to_le_bytes());
    }
    blob
}

fn build_root(mesh: &FlattenedMesh, blob_len: usize, options: &ExportOptions) -> Result<json::Root, ExportError> {
    let bounds = mesh.bounds().ok_or(ExportError::EmptyMesh)?;
    let positions_len = mesh.vertex_count() * 12;
    let indices_len = mesh.indices().len() * 4;

    let mut root = json::Root::default();
    root.asset.generator = Some(options.generator.clone());

    let buffer = root.push(json::Buffer {
        byte_length: USize64::from(blob_len),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri: None,
    });

    let positions_view = root.push(json::buffer::View {
        buffer,
        byte_length: USize64::from(positions_len),
        byte_offset: Some(USize64(0)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(json::buffer::Target::ArrayBuffer)),
    });

    let indices_view = root.push(json::buffer::View {
        buffer,
        byte_length: USize64::from(indices_len),
        byte_offset: Some(USize64::from(positions_len)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(json::buffer::Target::ElementArrayBuffer)),
    });

    let positions = root.push(json::Accessor {
        buffer_view: Some(positions_view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(mesh.vertex_count()),
        component_type: Valid(json::accessor::GenericComponentType(json::accessor::ComponentType::F32)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Vec3),
        min: Some(json::Value::from(Vec::from(bounds.min_array()))),
        max: Some(json::Value::from(Vec::from(bounds.max_array()))),
        name: None,
        normalized: false,
        sparse: None,
    });

    let indices = root.push(json::Accessor {
        buffer_view: Some(indices_view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(mesh.indices().len()),
        component_type: Valid(json::accessor::GenericComponentType(json::accessor::ComponentType::U32)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Scalar),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    });

    let material = root.push(json::Material {
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_factor: json::material::PbrBaseColorFactor(BASE_COLOR),
            metallic_factor: json::material::StrengthFactor(0.0),
            roughness_factor: json::material::StrengthFactor(1.0),
            ..Default::default()
        },
        ..Default::default()
    });

    let primitive = json::mesh::Primitive {
        attributes: {
            let mut map = BTreeMap::new();
            map.insert(Valid(json::mesh::Semantic::Positions), positions);
            map
        },
        extensions: Default::default(),
        extras: Default::default(),
        indices: Some(indices),
        material: Some(material),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    };

    let gltf_mesh = root.push(json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        primitives: vec![primitive],
        weights: None,
    });

    let node = root.push(json::Node {
        mesh: Some(gltf_mesh),
        ..Default::default()
    });

    let scene = root.push(json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        nodes: vec![node],
    });
    root.scene = Some(scene);

    Ok(root)
}

fn align_to_four(len: usize) -> usize {
    (len + 3) & !3
}

/// Encodes `mesh` as a complete GLB held in memory.
pub fn encode_glb(mesh: &FlattenedMesh, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh);
    }
    if mesh.overflowed() {
        return Err(ExportError::Encode(String::from("mesh has more vertices than u32 indices can address")));
    }

    let blob = pack_blob(mesh);
    let root = build_root(mesh, blob.len(), options)?;
    let json_bytes = json::serialize::to_vec(&root)
        .map_err(|e| ExportError::Encode(e.to_string()))?;

    let length = GLB_HEADER_BYTES
        + GLB_CHUNK_HEADER_BYTES + align_to_four(json_bytes.len())
        + GLB_CHUNK_HEADER_BYTES + align_to_four(blob.len());
    let length = u32::try_from(length)
        .map_err(|_| ExportError::Encode(format!("glb of {} bytes exceeds the 4 GiB limit", length)))?;

    let glb = gltf::binary::Glb {
        header: gltf::binary::Header { magic: *b"glTF", version: 2, length },
        json: Cow::Owned(json_bytes),
        bin: Some(Cow::Owned(blob)),
    };
    let mut bytes = Vec::with_capacity(length as usize);
    glb.to_writer(&mut bytes).map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Writes `mesh` to `path` as a single GLB and returns the triangle count.
///
/// The whole file is encoded in memory, written to a sibling temporary file
/// and renamed over `path`, so a failed export never leaves a truncated file
/// and never disturbs an existing one.
pub fn write_glb_to_file<P: AsRef<Path>>(mesh: &FlattenedMesh,
                                         path: P,
                                         options: &ExportOptions) -> Result<usize, ExportError> {
    let path = path.as_ref();
    log::info!("Starting writing glb: {}.", path.display());

    let bytes = encode_glb(mesh, options)?;
    write_atomically(path, &bytes)?;

    log::info!("GLB written to: {} ({} bytes).", path.display(), bytes.len());
    Ok(mesh.triangle_count())
}

fn temp_sibling(path: &Path) -> std::io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput,
                            format!("output path {} has no file name", path.display()))
    })?;
    let seq = NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{}.{}.{}.tmp", file_name.to_string_lossy(), std::process::id(), seq);
    Ok(path.with_file_name(tmp_name))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = temp_sibling(path)?;
    let result = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
