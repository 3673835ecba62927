//! Kubernetes quantity strings (`"10Gi"`, `"500M"`, `"1073741824"`) as GiB.

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

// Two-letter suffixes first so `Gi` never matches as `G`.
const SUFFIXES: [(&str, f64); 11] = [
    ("Ki", 1024.0),
    ("Mi", 1024.0 * 1024.0),
    ("Gi", GIB),
    ("Ti", GIB * 1024.0),
    ("Pi", GIB * 1024.0 * 1024.0),
    ("k", 1e3),
    ("K", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("P", 1e15),
];

/// Size in GiB, or `0.0` when the quantity cannot be parsed.
pub fn parse_gib(quantity: &str) -> f64 {
    let quantity = quantity.trim();
    if quantity.is_empty() {
        return 0.0;
    }

    let (number, bytes_per_unit) = SUFFIXES
        .iter()
        .find_map(|(suffix, factor)| quantity.strip_suffix(suffix).map(|n| (n, *factor)))
        .unwrap_or((quantity, 1.0));

    match number.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value * bytes_per_unit / GIB,
        _ => 0.0,
    }
}
