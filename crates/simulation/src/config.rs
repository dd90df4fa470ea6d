//! Tuning constants for the terrain stream, flight model, and scoring.

/// World-space width of one terrain cell.
pub const CELL_WIDTH: f32 = 500.0;
/// World-space depth of one terrain cell.
pub const CELL_HEIGHT: f32 = 500.0;

/// Cells along a chunk's X axis. A chunk holds `(CHUNK_CELLS_X + 1) *
/// (CHUNK_CELLS_Y + 1)` vertices.
pub const CHUNK_CELLS_X: usize = 20;
/// Cells along a chunk's Y axis.
pub const CHUNK_CELLS_Y: usize = 20;

/// World-space extent of one chunk along X.
pub const CHUNK_WIDTH: f32 = CELL_WIDTH * CHUNK_CELLS_X as f32;
/// World-space extent of one chunk along Y.
pub const CHUNK_HEIGHT: f32 = CELL_HEIGHT * CHUNK_CELLS_Y as f32;

/// Chunks within this Chebyshev radius of the aircraft's chunk are always
/// loaded. Radius 2 keeps a 5x5 block resident.
pub const KEEP_RADIUS: i32 = 2;
/// Chunks beyond this Chebyshev radius are evicted. Must be >= KEEP_RADIUS;
/// the gap is hysteresis so border crossings don't thrash chunks.
pub const EVICT_RADIUS: i32 = 3;

/// Base frequency fed to the noise sampler. Smaller values stretch features
/// over more world units.
pub const TERRAIN_FREQUENCY: f32 = 0.00012;
pub const TERRAIN_OCTAVES: i32 = 5;
pub const TERRAIN_GAIN: f32 = 0.5;
pub const TERRAIN_LACUNARITY: f32 = 2.0;

/// Peak terrain height in world units. Noise [0,1] maps to [0, MAX_ELEVATION].
pub const MAX_ELEVATION: f32 = 3500.0;

/// Bottom of the band sky items spawn in. Sits at the terrain ceiling so
/// items are always reachable without diving into a hillside.
pub const SKY_FLOOR: f32 = MAX_ELEVATION;
/// Vertical thickness of the item spawn band.
pub const SKY_BAND: f32 = 1000.0;

/// Altitude the aircraft starts each run at.
pub const START_ALTITUDE: f32 = 5000.0;
/// Cruise speed in world units per second. The aircraft always moves.
pub const FLIGHT_SPEED: f32 = 9000.0;
/// Throttle multiplier while boost is held.
pub const BOOST_MULTIPLIER: f32 = 1.5;
/// Per-axis turn factor at full stick. Fed to the flight model's small-angle
/// quaternion step, which turns at roughly twice this in radians per second.
pub const TURN_RATE: f32 = 0.3;

/// Fuel the aircraft starts with; also the refuel cap.
pub const FUEL_MAX: f32 = 100.0;
/// Fuel burned per second at the start of a run.
pub const FUEL_BURN_BASE: f32 = 2.0;
/// Score at which the burn rate first steps up by 1/sec. Each step moves the
/// next threshold a decade out.
pub const BURN_STEP_SCORE: u64 = 1000;
