//! Inventory grid geometry
//!
//! This module expands an inventory grid specification into the ordered
//! list of screen points the action sequences click. The visiting order is
//! row-major and must stay stable: the game's panel state depends on slots
//! being visited in the same order every time.

use serde::Deserialize;

use crate::domain::core::Point;

/// Size of one inventory slot and the border drawn around it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    /// Interior size of a cell in pixels
    pub cell_size: i32,
    /// Border thickness on each side of a cell in pixels
    pub border: i32,
}

impl CellGeometry {
    /// Slot geometry of the game's inventory panels
    pub const INVENTORY: CellGeometry = CellGeometry { cell_size: 30, border: 1 };

    /// Distance between the same point of two adjacent cells
    pub const fn pitch(&self) -> i32 {
        self.cell_size + self.border * 2
    }

    /// Offset from the grid origin to the click point of cell (0, 0)
    pub const fn anchor(&self) -> i32 {
        self.border + self.cell_size
    }
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self::INVENTORY
    }
}

/// A rectangular block of inventory slots on screen
///
/// Deserialized straight from the `inventory_grid_*` configuration sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridSpec {
    /// Left edge of the grid in screen pixels
    #[serde(rename = "start_x")]
    pub origin_x: i32,
    /// Top edge of the grid in screen pixels
    #[serde(rename = "start_y")]
    pub origin_y: i32,
    #[serde(rename = "cols")]
    pub columns: u32,
    pub rows: u32,
}

impl GridSpec {
    /// Creates a new grid specification
    pub const fn new(origin_x: i32, origin_y: i32, columns: u32, rows: u32) -> Self {
        Self { origin_x, origin_y, columns, rows }
    }

    /// Number of slots in the grid
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Click point of the slot at (row, col) using the given geometry
    ///
    /// # Arguments
    /// * `row` - Zero-based row index
    /// * `col` - Zero-based column index
    /// * `geometry` - Cell size and border
    ///
    /// # Returns
    /// The screen point, or `None` if the indices are outside the grid or
    /// the point does not fit in `i32` screen coordinates
    pub fn cell_point(&self, row: u32, col: u32, geometry: CellGeometry) -> Option<Point> {
        if row >= self.rows || col >= self.columns {
            return None;
        }

        let x = axis_offset(self.origin_x, col, geometry)?;
        let y = axis_offset(self.origin_y, row, geometry)?;
        Some(Point::new(x, y))
    }

    /// Whether every slot of the grid has a representable click point
    ///
    /// Checking the first and last slot is enough: positions grow
    /// monotonically with the row and column index.
    pub fn is_addressable(&self, geometry: CellGeometry) -> bool {
        if self.rows == 0 || self.columns == 0 {
            return true;
        }
        self.cell_point(0, 0, geometry).is_some()
            && self.cell_point(self.rows - 1, self.columns - 1, geometry).is_some()
    }

    /// All click points of the grid in row-major order
    pub fn points_with(&self, geometry: CellGeometry) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.cell_count());
        for row in 0..self.rows {
            for col in 0..self.columns {
                if let Some(point) = self.cell_point(row, col, geometry) {
                    points.push(point);
                }
            }
        }
        points
    }
}

/// `origin + anchor + pitch * index` along one axis, `None` on overflow
fn axis_offset(origin: i32, index: u32, geometry: CellGeometry) -> Option<i32> {
    let index = i32::try_from(index).ok()?;
    geometry
        .pitch()
        .checked_mul(index)?
        .checked_add(geometry.anchor())?
        .checked_add(origin)
}

/// Expands a grid into its click points using the inventory geometry
///
/// Grids that fail [`GridSpec::is_addressable`] lose their unrepresentable
/// slots; configuration loading rejects such grids up front.
/// Row 0 left-to-right, then row 1, and so on.
pub fn generate(grid: &GridSpec) -> Vec<Point> {
    grid.points_with(CellGeometry::INVENTORY)
}

/// Click points of `first` to completion, followed by those of `second`
pub fn concat(first: &GridSpec, second: &GridSpec) -> Vec<Point> {
    let mut points = generate(first);
    points.extend(generate(second));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two_example() {
        let grid = GridSpec::new(100, 100, 2, 2);
        assert_eq!(
            generate(&grid),
            vec![
                Point::new(131, 131),
                Point::new(163, 131),
                Point::new(131, 163),
                Point::new(163, 163),
            ]
        );
    }

    #[test]
    fn count_matches_dimensions() {
        for (cols, rows) in [(1, 1), (3, 5), (12, 8), (8, 8), (7, 1)] {
            let grid = GridSpec::new(0, 0, cols, rows);
            assert_eq!(generate(&grid).len(), (cols * rows) as usize);
        }
    }

    #[test]
    fn empty_grid_has_no_points() {
        assert!(generate(&GridSpec::new(10, 10, 0, 4)).is_empty());
        assert!(generate(&GridSpec::new(10, 10, 4, 0)).is_empty());
    }

    #[test]
    fn row_major_order() {
        let grid = GridSpec::new(0, 0, 3, 2);
        let points = generate(&grid);
        let pitch = CellGeometry::INVENTORY.pitch();

        // Same row shares y and x grows by one pitch
        assert_eq!(points[0].y, points[1].y);
        assert_eq!(points[1].x - points[0].x, pitch);
        assert_eq!(points[2].x - points[1].x, pitch);

        // Next row starts back at the first column
        assert_eq!(points[3].x, points[0].x);
        assert_eq!(points[3].y - points[0].y, pitch);
    }

    #[test]
    fn each_point_matches_cell_formula() {
        let grid = GridSpec::new(-40, 250, 4, 3);
        let points = generate(&grid);
        for row in 0..3u32 {
            for col in 0..4u32 {
                let index = (row * 4 + col) as usize;
                assert_eq!(
                    points[index],
                    Point::new(-40 + 31 + 32 * col as i32, 250 + 31 + 32 * row as i32)
                );
            }
        }
    }

    #[test]
    fn overflowing_origin_is_not_addressable() {
        let grid = GridSpec::new(i32::MAX - 10, 0, 2, 1);
        assert!(!grid.is_addressable(CellGeometry::INVENTORY));
        assert!(grid.cell_point(0, 0, CellGeometry::INVENTORY).is_none());
        assert!(generate(&grid).is_empty());

        let low = GridSpec::new(i32::MIN, i32::MIN, 3, 3);
        assert!(low.is_addressable(CellGeometry::INVENTORY));
        assert_eq!(generate(&low).len(), 9);
    }

    #[test]
    fn huge_dimensions_are_not_addressable() {
        let grid = GridSpec::new(0, 0, u32::MAX, 1);
        assert!(!grid.is_addressable(CellGeometry::INVENTORY));
        assert!(GridSpec::new(5, 5, 0, 0).is_addressable(CellGeometry::INVENTORY));
    }

    #[test]
    fn cell_point_out_of_range() {
        let grid = GridSpec::new(0, 0, 2, 2);
        assert!(grid.cell_point(2, 0, CellGeometry::INVENTORY).is_none());
        assert!(grid.cell_point(0, 2, CellGeometry::INVENTORY).is_none());
    }

    #[test]
    fn custom_geometry() {
        let grid = GridSpec::new(0, 0, 2, 1);
        let geometry = CellGeometry { cell_size: 10, border: 0 };
        assert_eq!(
            grid.points_with(geometry),
            vec![Point::new(10, 10), Point::new(20, 10)]
        );
    }

    #[test]
    fn concat_visits_first_grid_first() {
        let main = GridSpec::new(0, 0, 3, 2);
        let secondary = GridSpec::new(500, 500, 2, 2);
        let combined = concat(&main, &secondary);

        assert_eq!(combined.len(), 3 * 2 + 2 * 2);
        assert_eq!(&combined[..6], generate(&main).as_slice());
        assert_eq!(&combined[6..], generate(&secondary).as_slice());
    }

    #[test]
    fn grid_spec_deserializes_from_config_keys() {
        let json = r#"{ "start_x": 12, "start_y": 34, "cols": 5, "rows": 6 }"#;
        let grid: GridSpec = serde_json::from_str(json).unwrap();
        assert_eq!(grid, GridSpec::new(12, 34, 5, 6));
    }
}
