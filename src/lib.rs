// Copyright @yucwang 2021

pub mod core;
pub mod io;
pub mod math;
pub mod shapes;

pub use self::core::convert::{convert, ConversionSummary, ConvertError};
pub use self::io::glb_utils::ExportOptions;
