//! Content Errors
//!
//! Everything that can go wrong while loading tables, maps or spawning.
//! A running tick never produces one of these.

/// Invalid static content or a spawn request that cannot be honoured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// Monster key missing from the monster table.
    #[error("Unknown monster: {0}")]
    UnknownMonster(String),

    /// Weapon key missing from the weapon catalog.
    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),

    /// Magic key missing from the magic catalog.
    #[error("Unknown magic: {0}")]
    UnknownMagic(String),

    /// A catalog the player cycles through has no entries.
    #[error("Empty {0} catalog")]
    EmptyCatalog(&'static str),

    /// An animation sequence declared with zero frames.
    #[error("Animation '{key}' of {owner} has no frames")]
    EmptyAnimation {
        /// Table entry owning the animation.
        owner: String,
        /// Animation key.
        key: String,
    },

    /// Tile code not understood by the layer it appears in.
    #[error("Invalid {layer} tile code {code} at row {row}, column {col}")]
    InvalidTileCode {
        /// Map layer name.
        layer: &'static str,
        /// Offending code.
        code: i32,
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        col: usize,
    },

    /// CSV cell that is not an integer.
    #[error("Malformed {layer} cell '{cell}' at row {row}, column {col}")]
    MalformedCell {
        /// Map layer name.
        layer: &'static str,
        /// Raw cell text.
        cell: String,
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        col: usize,
    },

    /// Table document that does not parse.
    #[error("Malformed table: {0}")]
    MalformedTable(String),

    /// Map grid too large for the world coordinate range.
    #[error("Map of {rows}x{cols} tiles exceeds the world extent")]
    MapTooLarge {
        /// Rows in the tallest layer.
        rows: usize,
        /// Columns in the widest row of any layer.
        cols: usize,
    },

    /// Spawn whose rect reaches outside the world coordinate range.
    #[error("Spawn at ({x}, {y}) is outside the world")]
    SpawnOutOfBounds {
        /// Left edge in pixels.
        x: i32,
        /// Top edge in pixels.
        y: i32,
    },

    /// Tile edge that cannot be placed on the world grid.
    #[error("Invalid tile size {0}")]
    InvalidTileSize(i32),

    /// The level already owns a player.
    #[error("Player already spawned")]
    PlayerAlreadySpawned,
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::MalformedTable(err.to_string())
    }
}
