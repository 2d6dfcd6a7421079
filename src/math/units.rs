// Copyright @yucwang 2026

use std::fmt;

/// Length unit declared by a scene graph `Units` node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Units {
    Millimeters,
    Centimeters,
    Meters,
    Kilometers,
    Inches,
    Feet,
    Yards,
    Miles,
    /// Declared but not one of the units above. Treated as meters.
    Unknown,
}

impl Default for Units {
    fn default() -> Self {
        Units::Meters
    }
}

impl Units {
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            Units::Millimeters => 0.001,
            Units::Centimeters => 0.01,
            Units::Meters => 1.0,
            Units::Kilometers => 1000.0,
            Units::Inches => 0.0254,
            Units::Feet => 0.3048,
            Units::Yards => 0.9144,
            Units::Miles => 1609.344,
            Units::Unknown => 1.0,
        }
    }

    /// Accepts Inventor enum names (`MILLIMETERS`) as well as lower-case
    /// singular and plural forms. Never fails: anything else is `Unknown`.
    pub fn from_name(name: &str) -> Units {
        match name.trim().to_ascii_lowercase().as_str() {
            "millimeter" | "millimeters" | "mm" => Units::Millimeters,
            "centimeter" | "centimeters" | "cm" => Units::Centimeters,
            "meter" | "meters" | "m" => Units::Meters,
            "kilometer" | "kilometers" | "km" => Units::Kilometers,
            "inch" | "inches" | "in" => Units::Inches,
            "foot" | "feet" | "ft" => Units::Feet,
            "yard" | "yards" | "yd" => Units::Yards,
            "mile" | "miles" | "mi" => Units::Miles,
            _ => Units::Unknown,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Units::Millimeters => "millimeters",
            Units::Centimeters => "centimeters",
            Units::Meters => "meters",
            Units::Kilometers => "kilometers",
            Units::Inches => "inches",
            Units::Feet => "feet",
            Units::Yards => "yards",
            Units::Miles => "miles",
            Units::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}
