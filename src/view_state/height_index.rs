//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Maps between row indices and vertical pixel offsets for the scrollable
//! row list.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum`, `offset_of`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n) amortized
//! - `total`: O(log n)
//! - `len`: O(1)

/// Cumulative row heights in pixels.
///
/// Raw heights are kept next to the tree so that the tree can be rebuilt
/// when the backing storage grows.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (1-indexed internally, 0-indexed API).
    tree: Vec<isize>,
    heights: Vec<usize>,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` rows.
    ///
    /// ```
    /// # use calgrid::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Builds an index over the given heights.
    ///
    /// ```
    /// # use calgrid::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.total(), 45);
    /// assert_eq!(index.offset_of(2), 30);
    /// ```
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let heights: Vec<usize> = heights.into_iter().collect();
        let mut index = Self {
            tree: vec![0; heights.len()],
            heights,
        };
        index.rebuild();
        index
    }

    fn rebuild(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0);
        for (i, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, i, height as isize);
        }
    }

    /// Sets the height of row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let delta = height as isize - self.heights[index] as isize;
        if delta != 0 {
            self.heights[index] = height;
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of row `index`, if it exists.
    pub fn height(&self, index: usize) -> Option<usize> {
        self.heights.get(index).copied()
    }

    /// Cumulative height up to and including row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// ```
    /// # use calgrid::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        fenwick::array::prefix_sum(&self.tree, index).max(0) as usize
    }

    /// Pixel offset of the top edge of row `index`.
    ///
    /// `offset_of(len())` is the total height; larger indices clamp to it.
    pub fn offset_of(&self, index: usize) -> usize {
        match index.min(self.len()) {
            0 => 0,
            i => self.prefix_sum(i - 1),
        }
    }

    /// First row whose bottom edge lies below `value`, i.e. the row
    /// containing pixel offset `value`.
    ///
    /// Returns `None` when the index is empty or `value >= total()`.
    ///
    /// ```
    /// # use calgrid::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(45), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        // Row i covers [prefix_sum(i-1), prefix_sum(i))
        let mut left = 0;
        let mut right = self.len();
        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all rows.
    pub fn total(&self) -> usize {
        self.offset_of(self.len())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Smallest row height, or 0 when empty.
    pub fn min_height(&self) -> usize {
        self.heights.iter().copied().min().unwrap_or(0)
    }

    /// Appends a row.
    ///
    /// Growing the backing storage rebuilds the tree, since the new upper
    /// nodes must also cover the existing rows.
    pub fn push(&mut self, height: usize) {
        let idx = self.heights.len();
        self.heights.push(height);
        if idx >= self.tree.len() {
            self.tree.resize(self.tree.len().max(1) * 2, 0);
            self.rebuild();
        } else {
            fenwick::array::update(&mut self.tree, idx, height as isize);
        }
    }

    /// Removes all rows, retaining capacity.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0);
        self.heights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_index() {
        let index = HeightIndex::new(10);
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
        assert!(index.is_empty());
        assert_eq!(index.offset_of(0), 0);
    }

    #[test]
    fn test_set_updates_height() {
        let mut index = HeightIndex::from_heights([3, 4, 5]);
        index.set(1, 10);

        assert_eq!(index.prefix_sum(0), 3);
        assert_eq!(index.prefix_sum(1), 13);
        assert_eq!(index.prefix_sum(2), 18);
        assert_eq!(index.height(1), Some(10));
    }

    #[test]
    fn test_offset_of() {
        let index = HeightIndex::from_heights([10, 20, 15]);
        assert_eq!(index.offset_of(0), 0);
        assert_eq!(index.offset_of(1), 10);
        assert_eq!(index.offset_of(3), 45);
        assert_eq!(index.offset_of(99), 45);
    }

    #[test]
    fn test_lower_bound_edge_cases() {
        let index = HeightIndex::from_heights([5, 5, 5]);
        assert_eq!(index.lower_bound(0), Some(0));
        assert_eq!(index.lower_bound(5), Some(1));
        assert_eq!(index.lower_bound(14), Some(2));
        assert_eq!(index.lower_bound(15), None);
        assert_eq!(HeightIndex::new(4).lower_bound(0), None);
    }

    #[test]
    fn test_push_past_capacity_keeps_sums() {
        let mut index = HeightIndex::new(1);
        for h in 1..=9 {
            index.push(h);
        }
        assert_eq!(index.total(), 45);
        assert_eq!(index.prefix_sum(3), 10);
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut index = HeightIndex::new(2);
        index.push(5);
        index.push(7);
        index.push(9);
        index.clear();

        index.push(10);
        assert_eq!(index.len(), 1);
        assert_eq!(index.total(), 10);
    }

    proptest! {
        #[test]
        fn prop_prefix_sum_is_cumulative(heights in prop::collection::vec(1usize..=100, 1..50)) {
            let mut index = HeightIndex::new(0);
            for &h in &heights {
                index.push(h);
            }

            let mut expected_sum = 0;
            for (i, &h) in heights.iter().enumerate() {
                expected_sum += h;
                prop_assert_eq!(index.prefix_sum(i), expected_sum);
            }
        }

        #[test]
        fn prop_lower_bound_finds_containing_row(
            heights in prop::collection::vec(1usize..=100, 1..50),
            probe in 0usize..5000,
        ) {
            let index = HeightIndex::from_heights(heights.iter().copied());
            match index.lower_bound(probe) {
                Some(row) => {
                    prop_assert!(index.offset_of(row) <= probe);
                    prop_assert!(probe < index.offset_of(row + 1));
                }
                None => prop_assert!(probe >= index.total()),
            }
        }

        #[test]
        fn prop_set_updates_height(
            heights in prop::collection::vec(1usize..=100, 1..50),
            update_index in 0usize..50,
            new_height in 1usize..=100
        ) {
            let mut index = HeightIndex::from_heights(heights.iter().copied());
            if update_index < index.len() {
                index.set(update_index, new_height);
                let actual = index.offset_of(update_index + 1) - index.offset_of(update_index);
                prop_assert_eq!(actual, new_height);
            }
        }
    }
}
