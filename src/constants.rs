//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// On-disk configuration locations
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "hud-overlay";

    /// Profile store file name
    pub const PROFILES_FILE: &str = "Profiles.json";

    /// Extension of per-section files
    pub const SECTION_EXT: &str = "json";
}

/// Profile store names
pub mod profiles {
    /// Export-only slot holding the compiled-in configuration
    pub const DEFAULTS: &str = "Defaults";

    /// First user profile created next to the defaults
    pub const DEFAULT_PLAYER: &str = "My profile";
}

/// Blob wire format
pub mod codec {
    /// Segment header is `HUD<version>:`
    pub const TAG_PREFIX: &str = "HUD";

    pub const TAG_TERMINATOR: char = ':';

    /// Joins independently decodable segments
    pub const SEGMENT_DELIMITER: char = '|';

    /// Bump when the payload layout changes incompatibly
    pub const VERSION: u32 = 1;
}

/// Config section keys
pub mod sections {
    pub const GENERAL: &str = "general";
    pub const PLAYER_UNIT_FRAME: &str = "player_unit_frame";
    pub const TARGET_UNIT_FRAME: &str = "target_unit_frame";
    pub const TARGET_OF_TARGET_UNIT_FRAME: &str = "target_of_target_unit_frame";
    pub const FOCUS_UNIT_FRAME: &str = "focus_unit_frame";
    pub const ENEMY_LIST: &str = "enemy_list";
    pub const PARTY_LIST: &str = "party_list";
    pub const JOB_GAUGE: &str = "job_gauge";
    pub const LIMIT_BREAK: &str = "limit_break";
}

/// HUD element geometry and behaviour
pub mod hud {
    /// Smallest size an element can be resized to, per axis
    pub const MIN_ELEMENT_SIZE: f32 = 1.0;

    /// Thickness of the resize grab area along the bottom/right edges
    pub const RESIZE_HANDLE: f32 = 6.0;

    /// Largest coordinate accepted for positions and sizes
    pub const MAX_COORDINATE: f32 = 8192.0;

    /// Rows in the enemy list
    pub const ENEMY_LIST_MAX: usize = 8;

    /// Rows in the party list
    pub const PARTY_LIST_MAX: usize = 8;

    /// Highest limit break level
    pub const LIMIT_BREAK_MAX_LEVEL: u32 = 3;
}

/// Edit mode overlay colours (RGBA8)
pub mod edit_mode {
    pub const REGION_FILL: [u8; 4] = [40, 120, 200, 60];
    pub const REGION_BORDER: [u8; 4] = [80, 160, 255, 200];
    pub const ACTIVE_BORDER: [u8; 4] = [255, 200, 40, 255];
    pub const LABEL: [u8; 4] = [255, 255, 255, 255];
}
