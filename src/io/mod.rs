// Copyright @yucwang 2021

pub mod glb_utils;
pub mod obj_utils;
