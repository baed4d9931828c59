//! # Drop geometry
//!
//! Bounding boxes and the insertion-gap math. Coordinates are in the
//! shared canvas space the gesture layer reports pointer positions in;
//! index parity with the document's child order is what makes the gap
//! math line up with what the user sees.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn leading_edge(&self, axis: LayoutAxis) -> f64 {
        match axis {
            LayoutAxis::Horizontal => self.x,
            LayoutAxis::Vertical => self.y,
        }
    }

    pub fn trailing_edge(&self, axis: LayoutAxis) -> f64 {
        match axis {
            LayoutAxis::Horizontal => self.x + self.width,
            LayoutAxis::Vertical => self.y + self.height,
        }
    }
}

/// Axis children flow along inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutAxis {
    Horizontal,
    Vertical,
}

/// An insertion gap between siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertPosition {
    /// Before the child currently at this index
    At(usize),

    /// After every existing child
    Append,
}

impl InsertPosition {
    pub fn resolve(self, child_count: usize) -> usize {
        match self {
            InsertPosition::At(index) => index,
            InsertPosition::Append => child_count,
        }
    }
}

/// Geometrically nearest insertion gap for a pointer position.
///
/// For each adjacent pair of children the midpoint between their leading
/// edges marks a gap; the first gap whose midpoint is at or after the
/// pointer wins. Past the last child's trailing edge the position is
/// `Append`; an empty list always yields index 0.
pub fn insert_position(children: &[Bounds], axis: LayoutAxis, pointer: f64) -> InsertPosition {
    let Some(last) = children.last() else {
        return InsertPosition::At(0);
    };
    if pointer >= last.trailing_edge(axis) {
        return InsertPosition::Append;
    }
    for i in 0..children.len() - 1 {
        let midpoint =
            (children[i].leading_edge(axis) + children[i + 1].leading_edge(axis)) / 2.0;
        if midpoint >= pointer {
            return InsertPosition::At(i);
        }
    }
    InsertPosition::At(children.len() - 1)
}
