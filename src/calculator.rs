pub const MIN_DURATION_MINUTES: f64 = 5.0;
pub const MAX_DURATION_MINUTES: f64 = 1440.0;
pub const MIN_RETURN_PERIOD_YEARS: f64 = 2.0;
pub const MAX_RETURN_PERIOD_YEARS: f64 = 100.0;

/// Sherman-type IDF intensity in mm/h
///
/// `i = K * TR^a / (t + b)^c` with the return period `TR` in years and the
/// storm duration `t` in minutes. Input ranges are checked by the caller.
pub fn intensity_mm_per_hour(
    k: f64,
    a: f64,
    b: f64,
    c: f64,
    duration_minutes: f64,
    return_period_years: f64,
) -> f64 {
    k * return_period_years.powf(a) / (duration_minutes + b).powf(c)
}
