// Copyright 2020 @TwoCookingMice

pub mod aabb;
pub mod constants;
pub mod transform;
pub mod units;
