// ── Chrome layout ─────────────────────────────────────────────────────────────
//
// Integer arithmetic shared by the WM_SIZE handler and the tests.
// No Win32 imports; pure Rust.

/// Padding below the bottom of the last toolbar button row.
pub(crate) const TOOLBAR_ROW_PADDING: i32 = 2;

/// Right edges of the three status-bar parts for client width `cx`.
///
/// The boundaries sit at 4/6 and 5/6 of the client width; the last part runs
/// to the right edge.
pub(crate) fn status_parts(cx: i32) -> [i32; 3] {
    [cx * 4 / 6, cx * 5 / 6, cx]
}

/// Toolbar height from the bottom of its last button row, or zero for a
/// toolbar with no buttons.
pub(crate) fn toolbar_height(last_row_bottom: Option<i32>) -> i32 {
    match last_row_bottom {
        Some(bottom) => bottom + TOOLBAR_ROW_PADDING,
        None => 0,
    }
}

/// Height left for the editor between the toolbar and the status bar.
/// Never negative, even when the window is shorter than its chrome.
pub(crate) fn editor_height(cy: i32, toolbar: i32, status: i32) -> i32 {
    (cy - toolbar - status).max(0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parts_divide_at_sixths() {
        assert_eq!(status_parts(600), [400, 500, 600]);
        assert_eq!(status_parts(0), [0, 0, 0]);
    }

    /// Boundaries floor; the last part always reaches the client edge.
    #[test]
    fn status_parts_floor_on_odd_widths() {
        assert_eq!(status_parts(601), [400, 500, 601]);
        assert_eq!(status_parts(7), [4, 5, 7]);
    }

    #[test]
    fn toolbar_height_adds_row_padding() {
        assert_eq!(toolbar_height(Some(26)), 26 + TOOLBAR_ROW_PADDING);
    }

    #[test]
    fn buttonless_toolbar_is_flat() {
        assert_eq!(toolbar_height(None), 0);
    }

    #[test]
    fn editor_fills_space_between_chrome() {
        assert_eq!(editor_height(480, 28, 22), 430);
    }

    #[test]
    fn editor_height_clamps_at_zero() {
        assert_eq!(editor_height(40, 28, 22), 0);
        assert_eq!(editor_height(0, 0, 0), 0);
    }
}
