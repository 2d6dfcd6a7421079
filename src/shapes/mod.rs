// Copyright @yucwang 2023

pub mod cube;
pub mod indexed_face_set;
pub mod triangle_mesh;
