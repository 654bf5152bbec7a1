//! Conversions from canvas units and points to OOXML integer units.

/// English Metric Units per canvas unit (one inch).
pub const EMU_PER_UNIT: f64 = 914_400.0;

/// English Metric Units per typographic point.
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Smallest and largest slide edge PowerPoint accepts, in EMU.
pub const MIN_SLIDE_EMU: i64 = 914_400;
pub const MAX_SLIDE_EMU: i64 = 51_206_400;

/// Canvas units to EMU.
pub fn emu(units: f64) -> i64 {
    (units * EMU_PER_UNIT).round() as i64
}

/// Points to EMU.
pub fn pt_emu(points: f64) -> i64 {
    (points * EMU_PER_POINT).round() as i64
}

/// Font size in hundredths of a point, within the range DrawingML allows.
pub fn font_hundredths(points: f64) -> u32 {
    (points * 100.0).round().clamp(100.0, 400_000.0) as u32
}

/// Transparency percentage to a DrawingML alpha value (thousandths of a
/// percent of opacity).
pub fn alpha(transparency: f64) -> u32 {
    ((100.0 - transparency.clamp(0.0, 100.0)) * 1000.0).round() as u32
}

/// Degrees to DrawingML angle units (60000ths of a degree), normalized.
pub fn angle(degrees: f64) -> u32 {
    (degrees.rem_euclid(360.0) * 60_000.0).round() as u32 % 21_600_000
}

/// `roundRect` adjust value for a corner radius on a box of the given size.
pub fn round_rect_adjust(radius: f64, width: f64, height: f64) -> u32 {
    let short = width.min(height);
    if short <= 0.0 {
        return 0;
    }
    ((radius / short) * 100_000.0).round().clamp(0.0, 50_000.0) as u32
}
