/// Rows in the world; Main spans all of them.
pub const WORLD_HEIGHT: u8 = 7;
/// Rows in the PAB building.
pub const PAB_HEIGHT: u8 = 5;
/// World row the bridge runs along.
pub const BRIDGE_ROW: u8 = 3;
/// First world row occupied by PAB (PAB-local row 0).
pub const PAB_ROW_OFFSET: u8 = 2;

pub const DEFAULT_BRIDGE_LENGTH: u8 = 3;

pub const MIN_MAIN_WIDTH: u8 = 7;
pub const MAX_MAIN_WIDTH: u8 = 100;
pub const MIN_PAB_WIDTH: u8 = 4;
pub const MAX_PAB_WIDTH: u8 = 80;
pub const MIN_BRIDGE_LENGTH: u8 = 1;
pub const MAX_BRIDGE_LENGTH: u8 = 10;

/// Attempts the world generator makes before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

pub const DEFAULT_START_SCORE: i32 = 1000;
pub const DEFAULT_START_TIME: i32 = 300;

/// Score and time charged for every tile entered.
pub const STEP_COST: i32 = 1;
/// Extra score charged for entering an angry tile.
pub const ANGRY_PENALTY: i32 = 150;
