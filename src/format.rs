//! Human-readable formatting helpers.

/// Formats whole seconds as `"1d 2h 3m 4s"`, skipping zero units.
pub fn format_seconds(seconds: f64) -> String {
    // `as` saturates: NaN becomes 0, huge values become u64::MAX.
    let total = seconds.max(0.0).floor() as u64;
    let units = [
        (total / 86_400, "d"),
        ((total % 86_400) / 3_600, "h"),
        ((total % 3_600) / 60, "m"),
        (total % 60, "s"),
    ];

    let parts: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, suffix)| format!("{}{}", value, suffix))
        .collect();

    if parts.is_empty() {
        "0s".into()
    } else {
        parts.join(" ")
    }
}

/// Formats a byte count with binary units, e.g. `"12.50MB"`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut index = 0;
    while value >= 1024.0 && index < UNITS.len() - 1 {
        value /= 1024.0;
        index += 1;
    }
    format!("{:.2}{}", value, UNITS[index])
}
