//! Coordinate projection and caret decorations for hosts.
//!
//! [`Projection`] is the only view-layer query the engine makes, and only the
//! geometry Home/End strategy uses it. [`GridProjection`] is a monospace
//! reference layout for tests and the replay tool.

use serde::{Deserialize, Serialize};

use crate::model::{Document, Element, Node, Selection};
use crate::state::InteractionState;

/// Class a host puts on its synthetic caret widget.
pub const FAKE_CURSOR_CLASS: &str = "nodemark-fake-cursor";
/// Class a host puts on the editor root while the native caret is hidden.
pub const NO_CURSOR_CLASS: &str = "nodemark-no-cursor";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosAtCoords {
    pub pos: usize,
    /// Position before the innermost node the point falls in, or `None` when
    /// it falls in no node's content.
    pub inside: Option<usize>,
}

/// Coordinate <-> position mapping supplied by the rendering layer.
pub trait Projection {
    fn coords_at_pos(&self, pos: usize) -> Option<Rect>;
    fn pos_at_coords(&self, point: Point) -> Option<PosAtCoords>;
    /// Bounding box of the editor.
    fn bounds(&self) -> Rect;
}

/// A widget the host should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decoration {
    /// A synthetic caret at `pos`, drawn on the left side of the position.
    FakeCaret { pos: usize },
}

/// Decorations for the current state: a fake caret while `active`.
pub fn decorations(state: &InteractionState, selection: Selection) -> Vec<Decoration> {
    if state.active {
        vec![Decoration::FakeCaret {
            pos: selection.from(),
        }]
    } else {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    pos: usize,
    row: usize,
    col: usize,
    inside: Option<usize>,
}

/// Monospace layout: one cell per character, zero width for element tokens.
///
/// Each block starts a row, `br` breaks a row, and text wraps at `columns`.
/// Leaf blocks occupy a row of their own that is not inside any content.
#[derive(Debug, Clone)]
pub struct GridProjection {
    cells: Vec<Cell>,
    rows: usize,
    columns: usize,
    cell_width: f64,
    line_height: f64,
}

impl GridProjection {
    pub const CELL_WIDTH: f64 = 8.0;
    pub const LINE_HEIGHT: f64 = 16.0;

    pub fn new(doc: &Document, columns: usize) -> Self {
        let mut grid = Self {
            cells: Vec::new(),
            rows: 0,
            columns: columns.max(1),
            cell_width: Self::CELL_WIDTH,
            line_height: Self::LINE_HEIGHT,
        };
        grid.layout_blocks(doc.root(), 0);
        log::trace!(
            "grid layout: {} rows, {} cells",
            grid.rows,
            grid.cells.len()
        );
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Where a browser-like host's own Home lands on the row of `pos`: the
    /// last position sharing the row's first column.
    pub fn row_start(&self, pos: usize) -> Option<usize> {
        let row = self.row_of(pos)?;
        let first = self.row_cells(row).map(|cell| cell.col).min()?;
        self.row_cells(row)
            .filter(|cell| cell.col == first)
            .map(|cell| cell.pos)
            .max()
    }

    /// Where a host's own End lands: the first position sharing the row's
    /// last column.
    pub fn row_end(&self, pos: usize) -> Option<usize> {
        let row = self.row_of(pos)?;
        let last = self.row_cells(row).map(|cell| cell.col).max()?;
        self.row_cells(row)
            .filter(|cell| cell.col == last)
            .map(|cell| cell.pos)
            .min()
    }

    fn row_of(&self, pos: usize) -> Option<usize> {
        self.cells
            .iter()
            .find(|cell| cell.pos == pos)
            .map(|cell| cell.row)
    }

    fn row_cells(&self, row: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(move |cell| cell.row == row)
    }

    /// Lays out the block children of `el`, whose content starts at `start`.
    fn layout_blocks(&mut self, el: &Element, start: usize) {
        let mut pos = start;
        for child in &el.children {
            if let Node::Element(block) = child {
                if block.inline_content() {
                    let row = self.new_row();
                    let mut line = Line {
                        row,
                        col: 0,
                        pos: pos + 1,
                        inside: Some(pos),
                    };
                    self.push(&line);
                    self.layout_inline(block, &mut line);
                } else if block.is_leaf() {
                    let row = self.new_row();
                    self.cells.push(Cell {
                        pos,
                        row,
                        col: 0,
                        inside: None,
                    });
                } else {
                    self.layout_blocks(block, pos + 1);
                }
            }
            pos += child.node_size();
        }
    }

    fn layout_inline(&mut self, el: &Element, line: &mut Line) {
        for child in &el.children {
            match child {
                Node::Text(text) => {
                    for _ in text.chars() {
                        if line.col == self.columns {
                            line.row = self.new_row();
                            line.col = 0;
                            self.push(line);
                        }
                        line.col += 1;
                        line.pos += 1;
                        self.push(line);
                    }
                }
                Node::Element(inner) if inner.is_leaf() => {
                    line.pos += 1;
                    line.row = self.new_row();
                    line.col = 0;
                    self.push(line);
                }
                Node::Element(inner) => {
                    line.pos += 1;
                    self.push(line);
                    self.layout_inline(inner, line);
                    line.pos += 1;
                    self.push(line);
                }
            }
        }
    }

    fn new_row(&mut self) -> usize {
        self.rows += 1;
        self.rows - 1
    }

    fn push(&mut self, line: &Line) {
        self.cells.push(Cell {
            pos: line.pos,
            row: line.row,
            col: line.col,
            inside: line.inside,
        });
    }
}

struct Line {
    row: usize,
    col: usize,
    pos: usize,
    inside: Option<usize>,
}

impl Projection for GridProjection {
    fn coords_at_pos(&self, pos: usize) -> Option<Rect> {
        let cell = self.cells.iter().find(|cell| cell.pos == pos)?;
        let left = cell.col as f64 * self.cell_width;
        let top = cell.row as f64 * self.line_height;
        Some(Rect {
            left,
            top,
            right: left,
            bottom: top + self.line_height,
        })
    }

    fn pos_at_coords(&self, point: Point) -> Option<PosAtCoords> {
        if point.y < 0.0 {
            return None;
        }
        let row = (point.y / self.line_height) as usize;
        let col = (point.x.max(0.0) / self.cell_width).round() as usize;
        self.cells
            .iter()
            .filter(|cell| cell.row == row)
            .min_by_key(|cell| (cell.col.abs_diff(col), cell.pos))
            .map(|cell| PosAtCoords {
                pos: cell.pos,
                inside: cell.inside,
            })
    }

    fn bounds(&self) -> Rect {
        Rect {
            left: 0.0,
            top: 0.0,
            right: self.columns as f64 * self.cell_width,
            bottom: self.rows as f64 * self.line_height,
        }
    }
}
