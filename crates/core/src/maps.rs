//! Built-in maps.

use crate::error::InvalidMapError;
use crate::map::GridMap;

/// 10x10 test maze: red (1) outer ring, green (2) and blue (3) pillar groups.
pub const TEST_MAP: [[u8; 10]; 10] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 2, 2, 0, 3, 3, 0, 0, 1],
    [1, 0, 2, 0, 0, 0, 3, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 2, 0, 0, 0, 3, 0, 0, 1],
    [1, 0, 2, 2, 0, 3, 3, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Start pose on [`TEST_MAP`]: map center, facing east.
pub const TEST_MAP_START: (f64, f64, f64) = (5.0, 5.0, 0.0);

pub fn test_map() -> Result<GridMap, InvalidMapError> {
    GridMap::from_rows(&TEST_MAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_is_valid_and_start_is_open() {
        let map = test_map().unwrap();
        assert_eq!(map.dimensions(), (10, 10));
        let (x, y, _) = TEST_MAP_START;
        assert!(!map.is_wall_at(x, y));
    }
}
