//! Grid of mask segments covering the face during a test.

use herbivore_core::rng::GameRng;

/// Lifecycle of a single mask segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentState {
    /// Still covering the face.
    Intact,
    /// Shattered and flashing before it disappears.
    Flashing,
    /// Gone, the face shows through.
    Gone,
}

/// One cell of the mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskSegment {
    state: SegmentState,
}

impl MaskSegment {
    /// Creates an intact segment.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SegmentState::Intact,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SegmentState {
        self.state
    }

    /// Whether the segment has been shattered, flashing or not.
    #[must_use]
    pub fn is_shattered(&self) -> bool {
        self.state != SegmentState::Intact
    }

    /// Whether the segment is still drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state != SegmentState::Gone
    }

    /// Starts the flash. Returns `false` when the segment was already shattered.
    pub fn shatter(&mut self) -> bool {
        if self.is_shattered() {
            return false;
        }
        self.state = SegmentState::Flashing;
        true
    }

    /// Ends the flash so the segment disappears.
    pub fn settle(&mut self) {
        if self.state == SegmentState::Flashing {
            self.state = SegmentState::Gone;
        }
    }

    /// Makes the segment whole again.
    pub fn reset(&mut self) {
        self.state = SegmentState::Intact;
    }
}

impl Default for MaskSegment {
    fn default() -> Self {
        Self::new()
    }
}

/// Row-major grid of mask segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskGrid {
    columns: u32,
    rows: u32,
    segments: Vec<MaskSegment>,
}

impl MaskGrid {
    /// Creates an intact grid.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            segments: vec![MaskSegment::new(); columns as usize * rows as usize],
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Segments in row-major order.
    #[must_use]
    pub fn segments(&self) -> &[MaskSegment] {
        &self.segments
    }

    /// Whether the segment lies on the outer ring of the grid.
    #[must_use]
    pub fn is_edge(&self, index: usize) -> bool {
        let columns = self.columns as usize;
        let column = index % columns;
        let row = index / columns;
        column == 0 || column + 1 == columns || row == 0 || row + 1 == self.rows as usize
    }

    /// Indices a click may shatter: interior and still intact.
    #[must_use]
    pub fn eligible(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(index, segment)| !segment.is_shattered() && !self.is_edge(*index))
            .map(|(index, _)| index)
            .collect()
    }

    /// Shatters one random eligible segment and returns its index.
    pub fn shatter_random(&mut self, rng: &mut GameRng) -> Option<usize> {
        let eligible = self.eligible();
        let index = eligible[rng.index(eligible.len())?];
        let _ = self.segments[index].shatter();
        Some(index)
    }

    /// Shatters every segment still intact, edges included, returning their indices.
    pub fn shatter_all(&mut self) -> Vec<usize> {
        self.segments
            .iter_mut()
            .enumerate()
            .filter_map(|(index, segment)| segment.shatter().then_some(index))
            .collect()
    }

    /// Ends the flash of one segment.
    pub fn settle(&mut self, index: usize) {
        if let Some(segment) = self.segments.get_mut(index) {
            segment.settle();
        }
    }

    /// Makes every segment whole again.
    pub fn reset(&mut self) {
        self.segments.iter_mut().for_each(MaskSegment::reset);
    }

    /// Number of shattered segments.
    #[must_use]
    pub fn shattered_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| segment.is_shattered())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_lifecycle() {
        let mut segment = MaskSegment::new();
        assert!(segment.shatter());
        assert!(!segment.shatter(), "shattering twice is a no-op");
        assert!(segment.is_visible());

        segment.settle();
        assert!(!segment.is_visible());
        assert!(segment.is_shattered());

        segment.reset();
        assert_eq!(segment.state(), SegmentState::Intact);
    }

    #[test]
    fn border_is_never_eligible() {
        let grid = MaskGrid::new(8, 8);
        let eligible = grid.eligible();

        assert_eq!(eligible.len(), 36);
        assert!(eligible.iter().all(|index| !grid.is_edge(*index)));
        assert!(grid.is_edge(0));
        assert!(grid.is_edge(7));
        assert!(grid.is_edge(56));
        assert!(!grid.is_edge(9));
    }

    #[test]
    fn shattering_everything_includes_edges() {
        let mut grid = MaskGrid::new(4, 3);
        let mut rng = GameRng::seeded(1);
        let first = grid.shatter_random(&mut rng).expect("interior segment");

        let rest = grid.shatter_all();

        assert_eq!(rest.len(), 11);
        assert!(!rest.contains(&first));
        assert_eq!(grid.shattered_count(), 12);
    }

    #[test]
    fn small_grids_have_nothing_to_click() {
        let mut grid = MaskGrid::new(2, 2);
        let mut rng = GameRng::seeded(1);
        assert_eq!(grid.shatter_random(&mut rng), None);
    }
}
