//! Human-readable sizes, transfer rates and remaining times.

const UNIT_STEP: f64 = 1024.0;

/// Render `value` with at most `decimals` fraction digits, dropping
/// trailing zeros (`1.50` becomes `1.5`, `2.00` becomes `2`).
fn trim_fixed(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Pick the largest 1024-based unit that keeps `value` at or above one.
fn scale(value: f64, units: usize) -> (f64, usize) {
    let index = (value.ln() / UNIT_STEP.ln()).floor();
    let index = if index.is_finite() {
        index.clamp(0.0, (units - 1) as f64) as usize
    } else {
        0
    };
    (value / UNIT_STEP.powi(index as i32), index)
}

/// Format a byte count, e.g. `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let (value, index) = scale(bytes as f64, UNITS.len());
    format!("{} {}", trim_fixed(value, 2), UNITS[index])
}

/// Format a transfer rate in bytes per second, e.g. `2.5 MB/s`.
pub fn format_speed(bytes_per_second: f64) -> String {
    const UNITS: [&str; 4] = ["B/s", "KB/s", "MB/s", "GB/s"];
    if bytes_per_second <= 0.0 || !bytes_per_second.is_finite() {
        return "0 B/s".to_string();
    }
    let (value, index) = scale(bytes_per_second, UNITS.len());
    format!("{} {}", trim_fixed(value, 1), UNITS[index])
}

/// Format an estimated remaining time.
///
/// Unknown or non-positive estimates render as `--`, anything under ten
/// seconds as `almost done`. Minute estimates drop the seconds when fewer
/// than thirty remain, hour estimates drop zero minutes.
pub fn format_eta(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "--".to_string();
    }
    if seconds < 10.0 {
        return "almost done".to_string();
    }
    if seconds < 60.0 {
        return format!("{}s", seconds.ceil() as u64);
    }

    let whole = seconds.floor() as u64;
    if seconds < 3600.0 {
        let minutes = whole / 60;
        let rest = whole % 60;
        if rest < 30 {
            format!("{minutes} min")
        } else {
            format!("{minutes} min {rest}s")
        }
    } else {
        let hours = whole / 3600;
        let minutes = (whole % 3600) / 60;
        if minutes == 0 {
            format!("{hours} h")
        } else {
            format!("{hours} h {minutes} min")
        }
    }
}
