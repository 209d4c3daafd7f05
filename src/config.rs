/// Configuration constants for the worm colony simulation

// ============================================================================
// ECONOMY
// ============================================================================

/// Market cap divisor in the growth score
pub const GROWTH_MCAP_DIVISOR: f64 = 20_000.0;

/// Volume divisor in the growth score
pub const GROWTH_VOLUME_DIVISOR: f64 = 6_000.0;

/// Buyer count divisor in the growth score
pub const GROWTH_BUYERS_DIVISOR: f64 = 10.0;

/// Market cap step between colony splits (also the first split threshold)
pub const SPLIT_STEP: f64 = 50_000.0;

/// Market cap at which the boss worm emerges (once per session)
pub const BOSS_MCAP: f64 = 50_000.0;

/// Market cap at which the fire dragon emerges (once per session)
pub const FIRE_MCAP: f64 = 150_000.0;

/// Market cap at which the ice queen emerges (once per session)
pub const ICE_MCAP: f64 = 250_000.0;

// ============================================================================
// POPULATION
// ============================================================================

/// Maximum number of colonies
pub const MAX_COLONIES: usize = 8;

/// Lower bound of the worm population target
pub const MIN_WORMS: usize = 3;

/// Upper bound of the worm population target (hard cap across all colonies)
pub const MAX_WORMS: usize = 80;

/// Population target = SPAWN_TARGET_BASE + growth * SPAWN_TARGET_SCALE
pub const SPAWN_TARGET_BASE: f64 = 3.0;
pub const SPAWN_TARGET_SCALE: f64 = 2.2;

/// Seconds between spawns at zero growth, and the floor it shrinks to
pub const SPAWN_INTERVAL_MAX: f32 = 1.2;
pub const SPAWN_INTERVAL_MIN: f32 = 0.15;
pub const SPAWN_INTERVAL_PER_GROWTH: f32 = 0.04;

/// Chance that a hatched worm is big
pub const SPAWN_BIG_CHANCE: f64 = 0.18;

/// Seconds between mutation rolls at zero growth, and the floor
pub const MUTATION_INTERVAL_MAX: f32 = 2.2;
pub const MUTATION_INTERVAL_MIN: f32 = 0.4;
pub const MUTATION_INTERVAL_PER_GROWTH: f32 = 0.08;

/// Chance that an expired mutation timer actually mutates something
pub const MUTATION_CHANCE: f64 = 0.65;

/// Starter worms for a split colony: clamp(floor(2 + growth / 2), 2, 6)
pub const SPLIT_STARTERS_MIN: usize = 2;
pub const SPLIT_STARTERS_MAX: usize = 6;
pub const SPLIT_BIG_CHANCE: f64 = 0.25;

/// Distance range of a new colony from the genesis colony
pub const SPLIT_DISTANCE_MIN: f32 = 220.0;
pub const SPLIT_DISTANCE_MAX: f32 = 360.0;

// ============================================================================
// CAMERA
// ============================================================================

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.8;

/// Zoom the camera starts with before the first fit
pub const START_ZOOM: f32 = 0.78;

/// Wheel zoom factors per notch
pub const WHEEL_ZOOM_IN: f32 = 1.08;
pub const WHEEL_ZOOM_OUT: f32 = 0.92;

/// Zoom button factors
pub const BUTTON_ZOOM_IN: f32 = 1.12;
pub const BUTTON_ZOOM_OUT: f32 = 0.88;

/// World padding around each colony when fitting the view
pub const FIT_PADDING: f32 = 420.0;

/// Smallest box side considered when fitting the view
pub const FIT_MIN_BOX: f32 = 240.0;

/// Safety margin applied to the fitted zoom
pub const FIT_MARGIN: f32 = 0.92;

/// Per-frame blend factor of the smooth follow
pub const FOLLOW_BLEND: f32 = 0.18;

/// Parallax factor of the background starfield
pub const STAR_PARALLAX: f32 = 0.3;

/// Number of background stars
pub const STAR_COUNT: usize = 180;

// ============================================================================
// INTERACTION
// ============================================================================

/// Maximum world distance for selecting a colony
pub const SELECTION_RADIUS: f32 = 260.0;

/// A pointer release counts as a tap below this movement (pixels)...
pub const TAP_SLOP: f32 = 8.0;

/// ...and below this press duration (seconds)
pub const TAP_MAX_SECS: f32 = 0.3;

/// Two taps closer than this recenter on the selected colony
pub const DOUBLE_TAP_SECS: f32 = 0.28;

// ============================================================================
// COLONY
// ============================================================================

/// Random drift impulse per frame, scaled by DNA drift
pub const COLONY_DRIFT_IMPULSE: f32 = 0.02;

/// Per-frame velocity damping of colony drift
pub const COLONY_DRIFT_DAMPING: f32 = 0.985;

/// Initial velocity range of a colony
pub const COLONY_INITIAL_SPEED: f32 = 0.18;

/// Base radius of the colony silhouette
pub const SILHOUETTE_RADIUS: f32 = 130.0;

/// Seconds the ice queen freezes her colony
pub const FREEZE_SECS: f32 = 8.0;

/// Speed multiplier of worms in a frozen colony
pub const FREEZE_SPEED_FACTOR: f32 = 0.55;

// ============================================================================
// WORMS & LOCOMOTION
// ============================================================================

/// Frames per second the per-frame constants were tuned for
pub const REFERENCE_FPS: f32 = 60.0;

/// Largest simulation step in seconds
pub const MAX_STEP_SECS: f32 = 0.05;

/// Head displacement per reference frame per unit speed
pub const SPEED_SCALE: f32 = 2.2;

/// Speed boost of special worms
pub const SPECIAL_BOOST: f32 = 2.0;

/// Leash radius = LEASH_BASE + LEASH_AURA * aura (+ LEASH_SPECIAL_BONUS)
pub const LEASH_BASE: f32 = 180.0;
pub const LEASH_AURA: f32 = 55.0;
pub const LEASH_SPECIAL_BONUS: f32 = 40.0;

/// Head contraction toward the center when outside the leash
pub const LEASH_PULL: f32 = 0.92;

/// Heading blend toward the center when outside the leash
pub const LEASH_STEER: f32 = 0.35;

/// Weight of the target position when a segment follows its predecessor
pub const SEGMENT_FOLLOW: f32 = 0.8;

/// Largest head step per update, as a fraction of the worm's shortest rest length.
/// Segments lag about a quarter step behind their rest length.
pub const STRIDE_REST_FRACTION: f32 = 0.6;

/// Smallest distance used as a divisor
pub const MIN_DIVISOR_DIST: f32 = 1.0;

/// Turn rate multiplier converting the DNA-scaled turn trait into a per-second blend
pub const TURN_GAIN: f32 = 300.0;

/// Amplitude of the per-frame random heading jitter (radians)
pub const HEADING_JITTER: f32 = 0.02;

/// Largest wander offset from the current heading (radians)
pub const WANDER_LIMIT: f32 = 1.2;

/// Wander angular velocity range (radians per second)
pub const WANDER_SPIN: f32 = 0.9;

/// Seconds between wander re-targets
pub const WANDER_RETARGET_MIN: f32 = 1.0;
pub const WANDER_RETARGET_MAX: f32 = 2.5;

/// How far ahead on its ring an orbiting worm aims (radians)
pub const ORBIT_LEAD: f32 = 0.6;

/// Phase drift of orbit targets (radians per second)
pub const ORBIT_DRIFT: f32 = 0.25;

/// Preferred orbit radius as a fraction of the leash radius
pub const ORBIT_RADIUS_MIN: f32 = 0.3;
pub const ORBIT_RADIUS_MAX: f32 = 0.8;

/// Width clamp applied by mutations
pub const WIDTH_MIN: f32 = 3.5;
pub const WIDTH_MAX: f32 = 20.0;

/// Speed clamp applied by mutations
pub const SPEED_MIN: f32 = 0.25;
pub const SPEED_MAX: f32 = 3.0;

/// Turn trait clamp applied by mutations
pub const TURN_MIN: f32 = 0.004;
pub const TURN_MAX: f32 = 0.06;

// ============================================================================
// EFFECTS
// ============================================================================

/// Shockwaves fade out below this alpha
pub const SHOCK_ALPHA_FLOOR: f32 = 0.06;

/// Per-frame shockwave alpha decay
pub const SHOCK_DECAY: f32 = 0.96;

/// Seconds between fire breath bursts
pub const BREATH_INTERVAL_MIN: f32 = 8.0;
pub const BREATH_INTERVAL_MAX: f32 = 14.0;

/// Half-angle of the breath cone (radians)
pub const BREATH_CONE: f32 = 0.45;

/// Per-frame breath particle fade and shrink
pub const BREATH_FADE: f32 = 0.93;
pub const BREATH_SHRINK: f32 = 0.96;

/// Breath particles are dropped below this alpha
pub const BREATH_ALPHA_FLOOR: f32 = 0.05;

// ============================================================================
// EVENT LOG
// ============================================================================

/// Entries kept in the on-screen log
pub const LOG_CAPACITY: usize = 45;

/// Identical messages within this window are merged
pub const LOG_MERGE_SECS: f64 = 1.3;

/// Environment variable holding an optional RNG seed
pub const SEED_ENV: &str = "WORM_COLONY_SEED";

/// File name used by frame capture
pub const CAPTURE_FILE: &str = "worm_colony.png";
