//! Text rendering of values and policies on a grid.
use crate::{
    env::{DOWN, LEFT, RIGHT, UP},
    layout::{Cell, Layout},
};
use itertools::Itertools;

const WIDTH: usize = 7;

/// Renders one value per cell, with `#` for obstacles.
///
/// ```text
///    0.64    0.74    0.85    0.00
///    0.57       #    0.57    0.00
///    0.49    0.43    0.48    0.28
/// ```
///
/// `values` holds one entry per cell of `layout`.
pub fn render_values(layout: &Layout, values: &[f64]) -> String {
    debug_assert_eq!(values.len(), layout.len(), "one value per cell");
    render(layout, |s, cell| match cell {
        Cell::Obstacle => "#".to_string(),
        _ => format!("{:.2}", values[s]),
    })
}

/// Renders the action of every free cell as an arrow, the reward of terminal
/// cells and `#` for obstacles.
///
/// `policy` holds one action per cell of `layout`.
pub fn render_policy(layout: &Layout, policy: &[usize]) -> String {
    debug_assert_eq!(policy.len(), layout.len(), "one action per cell");
    render(layout, |s, cell| match cell {
        Cell::Obstacle => "#".to_string(),
        Cell::Terminal(r) => format!("[{}]", r),
        Cell::Empty | Cell::Start => arrow(policy[s]).to_string(),
    })
}

fn arrow(act: usize) -> &'static str {
    match act {
        UP => "^",
        RIGHT => ">",
        DOWN => "v",
        LEFT => "<",
        _ => "?",
    }
}

fn render(layout: &Layout, f: impl Fn(usize, Cell) -> String) -> String {
    (0..layout.rows())
        .map(|row| {
            (0..layout.cols())
                .map(|col| {
                    let s = layout.state(row, col);
                    format!("{:>width$}", f(s, layout.cell(s)), width = WIDTH)
                })
                .join(" ")
        })
        .join("\n")
}
