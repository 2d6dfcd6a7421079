/* Copyright 2020 @Yuchen Wong */

use nalgebra::{ Matrix4, Vector3 };

pub type Float = f32;

pub type Vector3f = Vector3<Float>;
pub type Matrix4f = Matrix4<Float>;

pub const EPSILON: Float = 1e-4;
