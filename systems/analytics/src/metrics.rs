use drone_courier_core::{CellCoord, Direction};

/// Manhattan distance between the first and last cell of `path`.
///
/// Paths shorter than two cells have no extent and report zero.
#[must_use]
pub fn straight_line_distance(path: &[CellCoord]) -> u32 {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) if path.len() >= 2 => first.manhattan_distance(*last),
        _ => 0,
    }
}

/// Number of direction changes along `path`.
///
/// Stationary dwell frames have no direction and are skipped, so a pause
/// between two moves in the same direction is not a turn.
#[must_use]
pub fn turn_count(path: &[CellCoord]) -> usize {
    let mut moves = path
        .windows(2)
        .filter_map(|pair| Direction::between(pair[0], pair[1]));

    let Some(mut previous) = moves.next() else {
        return 0;
    };

    let mut turns = 0;
    for direction in moves {
        if direction != previous {
            turns += 1;
        }
        previous = direction;
    }
    turns
}

/// Straight-line distance per path cell; zero for an empty path.
#[must_use]
pub fn efficiency_ratio(path: &[CellCoord]) -> f64 {
    if path.is_empty() {
        return 0.0;
    }
    f64::from(straight_line_distance(path)) / path.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(cells: &[(u32, u32)]) -> Vec<CellCoord> {
        cells
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect()
    }

    #[test]
    fn straight_corridor_has_no_turns() {
        let corridor = path(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(turn_count(&corridor), 0);
        assert_eq!(straight_line_distance(&corridor), 3);
        assert!((efficiency_ratio(&corridor) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn staircase_turns_at_every_step() {
        let stairs = path(&[(0, 0), (1, 0), (1, 1), (2, 1), (2, 2)]);
        assert_eq!(turn_count(&stairs), 3);
    }

    #[test]
    fn dwell_frames_do_not_count_as_turns() {
        let paused = path(&[(0, 0), (1, 0), (1, 0), (1, 0), (2, 0)]);
        assert_eq!(turn_count(&paused), 0);

        let reversal = path(&[(0, 0), (1, 0), (1, 0), (0, 0)]);
        assert_eq!(turn_count(&reversal), 1);
    }

    #[test]
    fn degenerate_paths_report_zero() {
        assert_eq!(straight_line_distance(&[]), 0);
        assert_eq!(straight_line_distance(&path(&[(2, 2)])), 0);
        assert_eq!(turn_count(&path(&[(2, 2)])), 0);
        assert!(efficiency_ratio(&[]).abs() < f64::EPSILON);
    }
}
