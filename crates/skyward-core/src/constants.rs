//! Simulation constants and tuning parameters.

/// Default simulation tick rate (Hz).
pub const DEFAULT_TICK_RATE: u32 = 10;

// --- Flight envelope ---

/// Maximum true airspeed (m/s).
pub const V_MAX: f64 = 30.0;

/// Maximum vertical speed magnitude (m/s).
pub const V_VERTICAL_MAX: f64 = 10.0;

/// Airspeed change rate toward a pending delta (m/s per second).
pub const AIRSPEED_ACCEL: f64 = 2.0;

/// Vertical speed change rate toward a pending delta (m/s per second).
pub const VERTICAL_ACCEL: f64 = 2.0;

/// Heading turn rate toward a pending delta (degrees per second).
/// One degree per tick at the default tick rate.
pub const HEADING_RATE: f64 = 10.0;

// --- Wind interpolation ---

/// Altitude half-width of the layer blend zone (meters).
/// Within this distance of a layer boundary, adjacent layers are blended.
pub const ALTITUDE_BLEND_HALF_WIDTH: f64 = 10.0;

/// Time half-width of the layer blend zone (seconds).
pub const TIME_BLEND_HALF_WIDTH: f64 = 5.0;

// --- Gusts ---

/// Maximum calm interval before the next gust is scheduled (seconds).
pub const MAX_CALM_TIME: f64 = 90.0;

/// Ramp duration at the start and end of a gust (seconds).
pub const GUST_RISE_TIME: f64 = 2.0;

/// Minimum gust duration, ramps included (seconds).
pub const GUST_MIN_DURATION: f64 = 6.0;

/// Maximum gust duration, ramps included (seconds).
pub const GUST_MAX_DURATION: f64 = 20.0;
