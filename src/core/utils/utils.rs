use std::time::{SystemTime, UNIX_EPOCH};

#[path = "utils_test.rs"]
mod utils_test;

/// Wall-clock seconds since the epoch.
pub fn realtime() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// User plus system CPU seconds consumed by this process.
pub fn cputime() -> f64 {
    let rusage = unsafe {
        let mut rusage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
        if libc::getrusage(libc::RUSAGE_SELF, rusage.as_mut_ptr()) != 0 {
            return 0.0;
        }
        rusage.assume_init()
    };
    let user_time = rusage.ru_utime;
    let sys_time = rusage.ru_stime;
    (user_time.tv_sec as f64 + user_time.tv_usec as f64 * 1e-6)
        + (sys_time.tv_sec as f64 + sys_time.tv_usec as f64 * 1e-6)
}

/// Split a C-style integer literal into (radix, digits): `0x`/`0X` is hex,
/// a leading `0` is octal, anything else is decimal.
fn radix_and_digits(s: &str) -> (u32, &str) {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (16, hex)
    } else if s.len() > 1 && s.starts_with('0') {
        (8, &s[1..])
    } else {
        (10, s)
    }
}

fn parse_magnitude(s: &str, original: &str) -> Result<u64, String> {
    let (radix, digits) = radix_and_digits(s);
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(format!("Invalid number: {}", original));
    }
    u64::from_str_radix(digits, radix).map_err(|_| format!("Number out of range: {}", original))
}

/// Parse an unsigned integer the way `strtoul(s, _, 0)` reads it, requiring
/// the whole string to be consumed.
pub fn parse_c_ulong(s: &str) -> Result<u64, String> {
    let body = s.strip_prefix('+').unwrap_or(s);
    parse_magnitude(body, s)
}

/// Signed counterpart of [`parse_c_ulong`].
pub fn parse_c_long(s: &str) -> Result<i64, String> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = parse_magnitude(body, s)?;
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return Err(format!("Number out of range: {}", s));
        }
        Ok((magnitude as i128).wrapping_neg() as i64)
    } else {
        i64::try_from(magnitude).map_err(|_| format!("Number out of range: {}", s))
    }
}
