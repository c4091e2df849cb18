//! Human-readable formatting for sizes and durations in logs and CLI output

/// Formats a byte count to a human-readable string with appropriate units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{:.0}{}", size, UNITS[unit_index])
    } else if size >= 10.0 {
        format!("{:.1}{}", size, UNITS[unit_index])
    } else {
        format!("{:.2}{}", size, UNITS[unit_index])
    }
}

/// Formats a duration in seconds to a human-readable string
pub fn format_seconds(seconds: f64) -> String {
    if seconds < 0.001 {
        return "0ms".to_string();
    }

    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        if seconds >= 10.0 {
            format!("{seconds:.1}s")
        } else {
            format!("{seconds:.2}s")
        }
    } else {
        let total = seconds.round() as u64;
        let minutes = total / 60;
        let secs = total % 60;
        if secs == 0 {
            format!("{minutes}m")
        } else {
            format!("{minutes}m{secs}s")
        }
    }
}
