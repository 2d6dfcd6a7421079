// Copyright @yucwang 2021

pub mod computation_node;
pub mod convert;
pub mod flatten;
pub mod scene;
pub mod scene_loader;
pub mod shape;
pub mod traversal;
