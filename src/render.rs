//! Colorized terminal rendering of a grouping over its grid.
//!
//! Progress display only; the search core never depends on this module.

use crate::search::{GridGraph, Grouping};

const RED: &str = "\x1b[91m";
const BLUE: &str = "\x1b[94m";
const RESET: &str = "\x1b[0m";

/// Render the full grid with the grouping's member cells highlighted in
/// red and all other cells in blue. One line per grid row.
pub fn render_grouping(graph: &GridGraph, grouping: &Grouping) -> String {
    let mut out = String::with_capacity(graph.cell_count() * 10);
    for y in 0..graph.height() {
        for x in 0..graph.width() {
            // In-bounds by construction of the loop.
            let value = graph.get(x, y).map_or(0, |cell| cell.value);
            let color = if grouping.contains((x, y)) { RED } else { BLUE };
            out.push_str(color);
            out.push((b'0' + value) as char);
            out.push_str(RESET);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_one_line_per_row() {
        let graph = GridGraph::from_rows(&[vec![1, 2], vec![3, 4]], true);
        let grouping = Grouping::from_members(vec![graph.lookup(0, 0).unwrap()]);

        let rendered = render_grouping(&graph, &grouping);
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn test_members_highlighted() {
        let graph = GridGraph::from_rows(&[vec![7, 8]], true);
        let grouping = Grouping::from_members(vec![graph.lookup(1, 0).unwrap()]);

        let rendered = render_grouping(&graph, &grouping);
        assert!(rendered.contains(&format!("{RED}8{RESET}")));
        assert!(rendered.contains(&format!("{BLUE}7{RESET}")));
    }
}
