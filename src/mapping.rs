/// Map `value` from `[min, max]` onto `[new_min, new_max]`.
///
/// An inverted source or target range yields `0.0`. A value outside
/// `[min, max]` is mapped as if it were `min`, on both sides. Callers that
/// need the usual saturating behaviour clamp before mapping.
pub fn map_linear(value: f64, min: f64, max: f64, new_min: f64, new_max: f64) -> f64 {
    if min > max || new_min > new_max {
        return 0.0;
    }
    let value = if value < min || value > max { min } else { value };
    new_min + (value - min) / (max - min) * (new_max - new_min)
}
