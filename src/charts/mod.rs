//! Charts module - tidy tables, chart specifications and rendering

pub mod plotter;
pub mod renderer;
pub mod spec;
pub mod tidy;

pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use spec::{gender_title, ChartSpecs};
pub use tidy::{DepartmentMapRow, GenderShareRow, TidyTables, TopNameRow};

pub const BOYS_RGB: (u8, u8, u8) = (52, 152, 219);
pub const GIRLS_RGB: (u8, u8, u8) = (231, 76, 60);
pub const NO_DATA_RGB: (u8, u8, u8) = (220, 220, 220);

/// Sequential light-yellow to dark-blue scale; `t` is clamped to [0, 1].
pub fn heat_rgb(t: f64) -> (u8, u8, u8) {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    (lerp(255, 8), lerp(247, 48), lerp(188, 107))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_scale_ends() {
        assert_eq!(heat_rgb(0.0), (255, 247, 188));
        assert_eq!(heat_rgb(1.0), (8, 48, 107));
        assert_eq!(heat_rgb(7.0), heat_rgb(1.0));
        assert_eq!(heat_rgb(f64::NAN), heat_rgb(0.0));
    }
}
