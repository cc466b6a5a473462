//! Grid geometry: slot count to equal-area cell rectangles

use crate::io::configuration::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};

/// Target canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl CanvasSize {
    /// Canvas of `width` x `height` pixels
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl CellRect {
    /// Rectangle at (`x`, `y`) of `width` x `height`
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in pixels
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Shrink by `margin` on every side; unchanged if that would leave nothing
    #[must_use]
    pub const fn inset(self, margin: u32) -> Self {
        let twice = margin.saturating_mul(2);
        if twice >= self.width || twice >= self.height {
            return self;
        }
        Self::new(
            self.x + margin,
            self.y + margin,
            self.width - twice,
            self.height - twice,
        )
    }

    /// Bottom strip of `height` pixels, clamped to the rectangle
    #[must_use]
    pub const fn bottom_strip(self, height: u32) -> Self {
        let height = if height < self.height {
            height
        } else {
            self.height
        };
        Self::new(self.x, self.y + self.height - height, self.width, height)
    }

    /// Whether the pixel (`px`, `py`) lies inside
    pub const fn contains(self, px: u32, py: u32) -> bool {
        px >= self.x && py >= self.y && px - self.x < self.width && py - self.y < self.height
    }
}

/// Columns and rows of a grid partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Number of columns
    pub columns: u32,
    /// Number of rows
    pub rows: u32,
}

impl GridShape {
    /// Grid used for `count` slots
    ///
    /// 1-3 slots sit in a single row, 4 in 2x2, 5-6 in 3x2, 7-9 in 3x3 and 10-12
    /// in 4x3. Larger counts use `ceil(sqrt(count))` columns.
    pub fn for_count(count: usize) -> Self {
        let (columns, rows) = match count {
            0 => (0, 0),
            1..=3 => (count, 1),
            4 => (2, 2),
            5 | 6 => (3, 2),
            7..=9 => (3, 3),
            10..=12 => (4, 3),
            _ => {
                let mut columns = 1;
                while columns * columns < count {
                    columns += 1;
                }
                (columns, count.div_ceil(columns))
            }
        };
        Self {
            columns: columns as u32,
            rows: rows as u32,
        }
    }

    /// Number of cells in the grid
    pub const fn capacity(self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Every cell of `shape` over `canvas`, row-major
///
/// Cell edges are placed at `k * size / n`, so cells tile the canvas exactly and
/// differ in size by at most one pixel.
pub fn grid_cells(shape: GridShape, canvas: CanvasSize) -> Vec<CellRect> {
    if shape.columns == 0 || shape.rows == 0 {
        return Vec::new();
    }
    let edge = |k: u32, size: u32, n: u32| (u64::from(k) * u64::from(size) / u64::from(n)) as u32;

    let mut cells = Vec::with_capacity(shape.capacity());
    for row in 0..shape.rows {
        let top = edge(row, canvas.height, shape.rows);
        let bottom = edge(row + 1, canvas.height, shape.rows);
        for column in 0..shape.columns {
            let left = edge(column, canvas.width, shape.columns);
            let right = edge(column + 1, canvas.width, shape.columns);
            cells.push(CellRect::new(left, top, right - left, bottom - top));
        }
    }
    cells
}

/// Cells for the first `count` slots, in slot order
pub fn layout(count: usize, canvas: CanvasSize) -> Vec<CellRect> {
    let mut cells = grid_cells(GridShape::for_count(count), canvas);
    cells.truncate(count);
    cells
}
