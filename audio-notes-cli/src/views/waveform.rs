//! Text rendering of the live input for the recording view.

const DOT: char = '•';
const AXIS: char = '─';

/// Draw a time-domain trace (`[-1, 1]` per column) into `height` text rows.
///
/// Row 0 is +1, the last row is -1; empty cells on the centre row show the axis.
pub fn render_trace(trace: &[f32], height: usize) -> Vec<String> {
    if height == 0 {
        return Vec::new();
    }
    let centre = (height - 1) / 2;
    let mut grid = vec![vec![' '; trace.len()]; height];

    for (column, &value) in trace.iter().enumerate() {
        let v = if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 };
        let row = ((1.0 - v) / 2.0 * (height - 1) as f32).round() as usize;
        grid[row.min(height - 1)][column] = DOT;
    }
    for cell in grid[centre].iter_mut() {
        if *cell == ' ' {
            *cell = AXIS;
        }
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

/// `MM:SS` elapsed time.
pub fn format_elapsed(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Horizontal level bar, `width` cells, for an RMS level in `[0, 1]`.
pub fn level_bar(level: f32, width: usize) -> String {
    let filled = ((level.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "·".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_is_a_flat_line() {
        let rows = render_trace(&[0.0; 5], 5);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[2], "•••••");
        assert_eq!(rows[0], "     ");
        assert_eq!(rows[4], "     ");
    }

    #[test]
    fn extremes_hit_top_and_bottom_rows() {
        let rows = render_trace(&[1.0, -1.0, 0.0, 5.0], 5);
        assert_eq!(rows[0], "•  •");
        assert_eq!(rows[4], " •  ");
        assert_eq!(rows[2], "──•─");
    }

    #[test]
    fn nan_is_drawn_as_silence() {
        let rows = render_trace(&[f32::NAN], 3);
        assert_eq!(rows[1], "•");
    }

    #[test]
    fn zero_height_draws_nothing() {
        assert!(render_trace(&[0.5], 0).is_empty());
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0.0), "00:00");
        assert_eq!(format_elapsed(65.9), "01:05");
        assert_eq!(format_elapsed(-3.0), "00:00");
    }

    #[test]
    fn level_bar_fills_proportionally() {
        assert_eq!(level_bar(0.5, 4), "██··");
        assert_eq!(level_bar(2.0, 3), "███");
        assert_eq!(level_bar(0.0, 2), "··");
    }
}
