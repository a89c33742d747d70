//! Human-readable formatting of byte counters and link rates.

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
const BYTE_BASE: u64 = 1024;

const RATE_UNITS: [&str; 4] = ["bps", "Kbps", "Mbps", "Gbps"];
const RATE_BASE: f64 = 1000.0;

const BYTES_PER_MEBIBYTE: f64 = 1024.0 * 1024.0;
const BITS_PER_MEGABIT: u64 = 1_000_000;

/// Splits a byte count into base-1024 components, largest unit first.
///
/// Zero-valued components are omitted; the last unit (GB) absorbs anything
/// larger. Returns an empty vector for zero.
pub fn byte_components(bytes: u64) -> Vec<(u64, &'static str)> {
    let mut parts = Vec::new();
    let mut remaining = bytes;

    for (i, unit) in BYTE_UNITS.iter().enumerate().rev() {
        let size = BYTE_BASE.pow(i as u32);
        if remaining >= size {
            parts.push((remaining / size, *unit));
            remaining %= size;
        }
    }

    parts
}

/// Formats a byte count as `"1KB 476B"`; zero is `"0 B"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    byte_components(bytes)
        .iter()
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a rate in bits per second with one decimal, e.g. `"1.5Mbps"`.
pub fn format_speed(bps: f64) -> String {
    if bps == 0.0 {
        return "0bps".to_string();
    }
    let mut value = bps;
    let mut unit = 0;
    while value >= RATE_BASE && unit < RATE_UNITS.len() - 1 {
        value /= RATE_BASE;
        unit += 1;
    }
    format!("{:.1}{}", value, RATE_UNITS[unit])
}

/// Nominal link speed in whole megabits, e.g. `"100 Mbps"`.
pub fn format_megabits(bps: u64) -> String {
    format!("{} Mbps", bps / BITS_PER_MEGABIT)
}

/// Byte counter in mebibytes with two decimals, e.g. `"12.34 MB"`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MEBIBYTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1), "1B");
        assert_eq!(format_bytes(1500), "1KB 476B");
        assert_eq!(format_bytes(1536), "1KB 512B");
        assert_eq!(format_bytes(1024 * 1024), "1MB");
        assert_eq!(format_bytes(1_073_741_824), "1GB");
        assert_eq!(format_bytes(1_073_741_824 + 5), "1GB 5B");
    }

    #[test]
    fn test_format_bytes_large_values_stay_in_gb() {
        assert_eq!(format_bytes(2048 * 1_073_741_824), "2048GB");
    }

    #[test]
    fn test_byte_components_skip_zero_units() {
        assert_eq!(
            byte_components(1_073_741_824 + 2048),
            vec![(1, "GB"), (2, "KB")]
        );
        assert!(byte_components(0).is_empty());
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(0.0), "0bps");
        assert_eq!(format_speed(999.0), "999.0bps");
        assert_eq!(format_speed(1000.0), "1.0Kbps");
        assert_eq!(format_speed(1_500_000.0), "1.5Mbps");
        assert_eq!(format_speed(1_000_000_000.0), "1.0Gbps");
        assert_eq!(format_speed(2_500_000_000_000.0), "2500.0Gbps");
    }

    #[test]
    fn test_detail_units() {
        assert_eq!(format_megabits(1_000_000_000), "1000 Mbps");
        assert_eq!(format_megabits(999_999), "0 Mbps");
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(1_572_864), "1.50 MB");
    }
}
