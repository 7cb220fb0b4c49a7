//! Counter Catalog for router telemetry records.
//!
//! Each Aries router has a 6 x 8 grid of tiles. Every tile contributes nine
//! performance counters: incoming flits on virtual channels 0 through 7 and
//! the row-bus stall count. Tiles are laid out row-major, so slot
//! `(x * TILE_COLS + y) * COUNTERS_PER_TILE + k` belongs to tile `x,y`.

/// Rows of tiles on a router.
pub const TILE_ROWS: usize = 6;
/// Columns of tiles on a router.
pub const TILE_COLS: usize = 8;
/// Counters recorded per tile.
pub const COUNTERS_PER_TILE: usize = 9;
/// Number of counter slots in a router telemetry record.
pub const COUNTER_COUNT: usize = TILE_ROWS * TILE_COLS * COUNTERS_PER_TILE;

macro_rules! tile_counters {
    ($($row:literal $col:literal),* $(,)?) => {
        [$(
            concat!("AR_RTR_", $row, "_", $col, "_INQ_PRF_INCOMING_FLIT_VC0"),
            concat!("AR_RTR_", $row, "_", $col, "_INQ_PRF_INCOMING_FLIT_VC1"),
            concat!("AR_RTR_", $row, "_", $col, "_INQ_PRF_INCOMING_FLIT_VC2"),
            concat!("AR_RTR_", $row, "_", $col, "_INQ_PRF_INCOMING_FLIT_VC3"),
            concat!("AR_RTR_", $row, "_", $col, "_INQ_PRF_INCOMING_FLIT_VC4"),
            concat!("AR_RTR_", $row, "_", $col, "_INQ_PRF_INCOMING_FLIT_VC5"),
            concat!("AR_RTR_", $row, "_", $col, "_INQ_PRF_INCOMING_FLIT_VC6"),
            concat!("AR_RTR_", $row, "_", $col, "_INQ_PRF_INCOMING_FLIT_VC7"),
            concat!("AR_RTR_", $row, "_", $col, "_INQ_PRF_ROWBUS_STALL_CNT"),
        )*]
    };
}

/// Counter names in slot order. The array length is the counter array
/// length of every router telemetry record.
pub const COUNTER_NAMES: [&str; COUNTER_COUNT] = tile_counters!(
    0 0, 0 1, 0 2, 0 3, 0 4, 0 5, 0 6, 0 7,
    1 0, 1 1, 1 2, 1 3, 1 4, 1 5, 1 6, 1 7,
    2 0, 2 1, 2 2, 2 3, 2 4, 2 5, 2 6, 2 7,
    3 0, 3 1, 3 2, 3 3, 3 4, 3 5, 3 6, 3 7,
    4 0, 4 1, 4 2, 4 3, 4 4, 4 5, 4 6, 4 7,
    5 0, 5 1, 5 2, 5 3, 5 4, 5 5, 5 6, 5 7,
);

/// Returns the name of the counter in `slot`.
pub fn counter_name(slot: usize) -> Option<&'static str> {
    COUNTER_NAMES.get(slot).copied()
}

/// Returns the slot holding the counter called `name`.
pub fn index_of(name: &str) -> Option<usize> {
    COUNTER_NAMES.iter().position(|n| *n == name)
}

/// Slot of counter `kind` (0..COUNTERS_PER_TILE) on tile `row,col`.
pub fn tile_slot(row: usize, col: usize, kind: usize) -> Option<usize> {
    if row >= TILE_ROWS || col >= TILE_COLS || kind >= COUNTERS_PER_TILE {
        return None;
    }
    Some((row * TILE_COLS + col) * COUNTERS_PER_TILE + kind)
}
