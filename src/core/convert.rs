// Copyright @yucwang 2026

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::flatten::flatten_scene;
use crate::core::scene_loader::{load_scene, SceneLoadError};
use crate::io::glb_utils::{write_glb_to_file, ExportError, ExportOptions};
use crate::math::aabb::AABB;

/// Every way a single conversion can fail. All of them are terminal.
#[derive(Debug)]
pub enum ConvertError {
    InputOpen(PathBuf, std::io::Error),
    InputParse(String),
    EmptyMesh,
    Write(String),
}

impl ConvertError {
    /// Process exit status for this failure. 2 is reserved for usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::InputOpen(..) => 3,
            ConvertError::InputParse(_) => 4,
            ConvertError::EmptyMesh | ConvertError::Write(_) => 5,
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InputOpen(path, err) => {
                write!(f, "failed to open input file {}: {}", path.display(), err)
            }
            ConvertError::InputParse(msg) => write!(f, "failed to read scene graph: {}", msg),
            ConvertError::EmptyMesh => write!(f, "GLB export failed: no triangles extracted from scene graph"),
            ConvertError::Write(msg) => write!(f, "GLB export failed: {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<ExportError> for ConvertError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::EmptyMesh => ConvertError::EmptyMesh,
            other => ConvertError::Write(other.to_string()),
        }
    }
}

fn scene_error(path: &Path, err: SceneLoadError) -> ConvertError {
    match err {
        SceneLoadError::Io(io) => ConvertError::InputOpen(path.to_path_buf(), io),
        other => ConvertError::InputParse(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub output: PathBuf,
    pub triangles: usize,
    pub vertices: usize,
    pub bounds: AABB,
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OK: wrote {} ({} triangles)", self.output.display(), self.triangles)
    }
}

/// Loads the scene at `input`, flattens it and writes it to `output` as GLB.
pub fn convert<P, Q>(input: P, output: Q, options: &ExportOptions) -> Result<ConversionSummary, ConvertError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    let output = output.as_ref();

    let root = load_scene(input).map_err(|e| scene_error(input, e))?;
    let mesh = flatten_scene(&root);
    let triangles = write_glb_to_file(&mesh, output, options)?;
    let bounds = mesh.bounds().copied().ok_or(ConvertError::EmptyMesh)?;

    Ok(ConversionSummary {
        output: output.to_path_buf(),
        triangles,
        vertices: mesh.vertex_count(),
        bounds,
    })
}
