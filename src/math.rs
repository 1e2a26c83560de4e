//! Pure numeric helpers shared by the spacing strategies and the step loop.
//!
//! None of these functions touch simulation state; they are kept separate
//! so the scheduling logic that uses them stays readable.

use chrono::{DateTime, TimeDelta, Utc};

/// Earth-Centered-Inertial position, in kilometers.
pub type EciPosn = (f64, f64, f64);

/// Treated as a pure function per the simulator's collaborator contract:
/// altitude above a spherical Earth of radius 6371 km.
pub fn altitude_km(eci_posn: EciPosn) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let (x, y, z) = eci_posn;
    (x * x + y * y + z * z).sqrt() - EARTH_RADIUS_KM
}

/// Euclidean distance between two ECI positions, in kilometers.
pub fn distance_km(a: EciPosn, b: EciPosn) -> f64 {
    let (ax, ay, az) = a;
    let (bx, by, bz) = b;
    let (dx, dy, dz) = (ax - bx, ay - by, az - bz);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Splits a fractional-second delta into whole seconds (`floor`) and
/// nanoseconds (`round((dt - floor) * 1e9)`), then advances `t` by it.
pub fn advance_by_seconds(t: DateTime<Utc>, dt: f64) -> DateTime<Utc> {
    let whole_secs = dt.floor();
    let frac_nanos = ((dt - whole_secs) * 1e9).round();
    let delta = TimeDelta::seconds(whole_secs as i64) + TimeDelta::nanoseconds(frac_nanos as i64);
    t + delta
}
