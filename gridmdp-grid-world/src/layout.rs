//! Parsing of grid layouts.
use gridmdp_core::error::MdpError;
use itertools::Itertools;

/// A cell of a grid world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// A free cell, written `_`.
    Empty,

    /// A free cell where episodes may start, written `s`.
    Start,

    /// A cell that cannot be entered, written `o`.
    Obstacle,

    /// A terminal cell with the reward of entering it, written as a number.
    Terminal(f64),
}

impl Cell {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "_" => Some(Self::Empty),
            "s" => Some(Self::Start),
            "o" => Some(Self::Obstacle),
            t => t.parse::<f64>().ok().filter(|r| r.is_finite()).map(Self::Terminal),
        }
    }

    /// Returns `true` for cells an agent can stand on and move from.
    pub fn is_free(&self) -> bool {
        matches!(self, Self::Empty | Self::Start)
    }
}

/// Rectangular arrangement of cells, stored row-major.
///
/// The cell at `(row, col)` is state `row * cols + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Layout {
    /// Parses rows of whitespace-separated tokens.
    ///
    /// All rows must have the same, non-zero number of tokens.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, MdpError> {
        if rows.is_empty() {
            return Err(MdpError::InvalidLayout("no rows".to_string()));
        }

        let mut cells = Vec::new();
        let mut cols = None;
        for (r, row) in rows.iter().enumerate() {
            let tokens = row.as_ref().split_whitespace().collect_vec();
            match cols {
                None if tokens.is_empty() => {
                    return Err(MdpError::InvalidLayout("row 0 is empty".to_string()))
                }
                None => cols = Some(tokens.len()),
                Some(n) if n != tokens.len() => {
                    return Err(MdpError::InvalidLayout(format!(
                        "row {} has {} cells, expected {}",
                        r,
                        tokens.len(),
                        n
                    )))
                }
                _ => {}
            }
            for (c, token) in tokens.iter().enumerate() {
                let cell = Cell::parse(token).ok_or_else(|| {
                    MdpError::InvalidLayout(format!("unknown token {:?} at ({}, {})", token, r, c))
                })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols: cols.unwrap_or(0),
            cells,
        })
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The number of cells, i.e., states.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`, a parsed layout has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell of state `s`.
    pub fn cell(&self, s: usize) -> Cell {
        self.cells[s]
    }

    /// Returns an iterator over the cells in state order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The state at `(row, col)`.
    pub fn state(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// The position `(row, col)` of state `s`.
    pub fn position(&self, s: usize) -> (usize, usize) {
        (s / self.cols, s % self.cols)
    }

    /// States where an episode can start.
    ///
    /// These are the cells marked `s`, or all free cells if none is marked.
    pub fn start_states(&self) -> Vec<usize> {
        let marked = self.states_where(|c| matches!(c, Cell::Start));
        if marked.is_empty() {
            self.states_where(Cell::is_free)
        } else {
            marked
        }
    }

    fn states_where(&self, f: impl Fn(&Cell) -> bool) -> Vec<usize> {
        self.cells
            .iter()
            .positions(|c| f(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() -> Result<(), MdpError> {
        let layout = Layout::parse(&["_ _ _ 1", "_ o _ -1", "s _ _ _"])?;
        assert_eq!(layout.rows(), 3);
        assert_eq!(layout.cols(), 4);
        assert_eq!(layout.len(), 12);
        assert_eq!(layout.cell(3), Cell::Terminal(1.0));
        assert_eq!(layout.cell(5), Cell::Obstacle);
        assert_eq!(layout.cell(7), Cell::Terminal(-1.0));
        assert_eq!(layout.cell(8), Cell::Start);
        assert_eq!(layout.state(2, 0), 8);
        assert_eq!(layout.position(7), (1, 3));
        assert_eq!(layout.start_states(), vec![8]);
        Ok(())
    }

    #[test]
    fn test_start_states_default_to_free_cells() -> Result<(), MdpError> {
        let layout = Layout::parse(&["_ o", "_ 5"])?;
        assert_eq!(layout.start_states(), vec![0, 2]);
        Ok(())
    }

    #[test]
    fn test_invalid_layouts() {
        let empty: [&str; 0] = [];
        assert!(Layout::parse(&empty).is_err());
        assert!(Layout::parse(&[""]).is_err());
        assert!(Layout::parse(&["_ _", "_"]).is_err());
        assert!(Layout::parse(&["_ x"]).is_err());
        assert!(Layout::parse(&["_ inf"]).is_err());
    }
}
