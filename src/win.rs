#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WinResult {
    NoWin,
    /// Cell indices of the first completed line, in order along the line.
    Line(Vec<usize>),
    FullHouse,
}

/// Every line that can win on an `n x n` card, in the order they are
/// checked: rows top to bottom, columns left to right, the main diagonal,
/// then the anti-diagonal.
pub fn candidate_lines(n: usize) -> Vec<Vec<usize>> {
    let mut lines = Vec::with_capacity(2 * n + 2);

    for row in 0..n {
        lines.push((0..n).map(|col| row * n + col).collect());
    }
    for col in 0..n {
        lines.push((0..n).map(|row| row * n + col).collect());
    }
    lines.push((0..n).map(|i| i * n + i).collect());
    lines.push((0..n).map(|i| i * n + (n - 1 - i)).collect());

    lines
}

/// A full card always wins over a line. When one selection completes
/// several lines at once only the first in check order is reported.
pub fn evaluate(grid: &[bool], n: usize) -> WinResult {
    debug_assert_eq!(grid.len(), n * n);

    if !grid.is_empty() && grid.iter().all(|&selected| selected) {
        return WinResult::FullHouse;
    }

    candidate_lines(n)
        .into_iter()
        .find(|line| line.iter().all(|&idx| grid.get(idx).copied().unwrap_or(false)))
        .map_or(WinResult::NoWin, WinResult::Line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(n: usize, selected: &[usize]) -> Vec<bool> {
        let mut grid = vec![false; n * n];
        for &idx in selected {
            grid[idx] = true;
        }
        grid
    }

    #[test]
    fn test_candidate_line_count_and_order() {
        let lines = candidate_lines(5);
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], vec![0, 1, 2, 3, 4]);
        assert_eq!(lines[4], vec![20, 21, 22, 23, 24]);
        assert_eq!(lines[5], vec![0, 5, 10, 15, 20]);
        assert_eq!(lines[9], vec![4, 9, 14, 19, 24]);
        assert_eq!(lines[10], vec![0, 6, 12, 18, 24]);
        assert_eq!(lines[11], vec![4, 8, 12, 16, 20]);
    }

    #[test]
    fn test_empty_and_partial_grids() {
        assert_eq!(evaluate(&grid_with(5, &[]), 5), WinResult::NoWin);
        assert_eq!(evaluate(&grid_with(5, &[12]), 5), WinResult::NoWin);
        assert_eq!(evaluate(&grid_with(5, &[0, 1, 2, 3, 12]), 5), WinResult::NoWin);
    }

    #[test]
    fn test_full_house_only_when_every_cell_selected() {
        let full = vec![true; 25];
        assert_eq!(evaluate(&full, 5), WinResult::FullHouse);

        for missing in 0..25 {
            let mut grid = full.clone();
            grid[missing] = false;
            assert!(matches!(evaluate(&grid, 5), WinResult::Line(_)));
        }
    }

    #[test]
    fn test_each_row_and_column_detected() {
        for row in 0..5 {
            let cells: Vec<usize> = (0..5).map(|c| row * 5 + c).collect();
            assert_eq!(evaluate(&grid_with(5, &cells), 5), WinResult::Line(cells));
        }
        for col in 0..5 {
            let cells: Vec<usize> = (0..5).map(|r| r * 5 + col).collect();
            assert_eq!(evaluate(&grid_with(5, &cells), 5), WinResult::Line(cells));
        }
    }

    #[test]
    fn test_diagonals_on_5x5() {
        let main = vec![0, 6, 12, 18, 24];
        assert_eq!(evaluate(&grid_with(5, &main), 5), WinResult::Line(main));

        let anti = vec![4, 8, 12, 16, 20];
        assert_eq!(evaluate(&grid_with(5, &anti), 5), WinResult::Line(anti));
    }

    #[test]
    fn test_first_match_wins() {
        // Row 2 and column 2 both complete: rows come first
        let mut cells: Vec<usize> = (10..15).collect();
        cells.extend([2, 7, 17, 22]);
        assert_eq!(
            evaluate(&grid_with(5, &cells), 5),
            WinResult::Line(vec![10, 11, 12, 13, 14])
        );

        // Column 0 and main diagonal: columns before diagonals
        let cells = [0, 5, 10, 15, 20, 6, 12, 18, 24];
        assert_eq!(
            evaluate(&grid_with(5, &cells), 5),
            WinResult::Line(vec![0, 5, 10, 15, 20])
        );

        // Both diagonals: main first
        let cells = [0, 6, 12, 18, 24, 4, 8, 16, 20];
        assert_eq!(
            evaluate(&grid_with(5, &cells), 5),
            WinResult::Line(vec![0, 6, 12, 18, 24])
        );
    }

    #[test]
    fn test_other_sizes() {
        assert_eq!(evaluate(&[true], 1), WinResult::FullHouse);
        assert_eq!(evaluate(&[false], 1), WinResult::NoWin);

        let anti = vec![2, 4, 6];
        assert_eq!(evaluate(&grid_with(3, &anti), 3), WinResult::Line(anti));

        assert_eq!(candidate_lines(4).len(), 10);
    }
}
