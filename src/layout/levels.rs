//! Lane packing of row segments.

use serde::Serialize;

use super::segments::Segment;

/// Segments packed into lanes, plus the ones that did not fit.
///
/// # Invariants
/// - No two segments in the same level share a slot.
/// - Each level is ordered by `left`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Levels {
    /// `levels[0]` is the top lane.
    pub levels: Vec<Vec<Segment>>,
    /// Segments beyond the lane limit, shown through "+N more".
    pub extra: Vec<Segment>,
}

/// Whether `segment` collides with any segment of `lane`.
pub fn segs_overlap(segment: &Segment, lane: &[Segment]) -> bool {
    lane.iter().any(|other| segment.overlaps(other))
}

/// Whether `segment` covers 1-based `slot`.
pub fn is_segment_in_slot(segment: &Segment, slot: usize) -> bool {
    segment.covers(slot)
}

/// Number of segments covering 1-based `slot`.
pub fn events_in_slot(segments: &[Segment], slot: usize) -> usize {
    segments.iter().filter(|s| s.covers(slot)).count()
}

/// Greedy first-fit lane assignment.
///
/// Segments are placed in input order, each into the lowest lane it does not
/// collide with, so earlier segments keep the upper lanes. A segment whose
/// lane would be `>= limit` overflows into `extra` instead. `None` means no
/// limit.
pub fn event_levels(segments: &[Segment], limit: Option<usize>) -> Levels {
    let mut levels: Vec<Vec<Segment>> = Vec::new();
    let mut extra = Vec::new();

    for segment in segments {
        let lane = levels
            .iter()
            .position(|lane| !segs_overlap(segment, lane))
            .unwrap_or(levels.len());

        if limit.is_some_and(|limit| lane >= limit) {
            extra.push(*segment);
        } else if lane == levels.len() {
            levels.push(vec![*segment]);
        } else {
            levels[lane].push(*segment);
        }
    }

    for lane in &mut levels {
        lane.sort_by_key(|s| s.left);
    }

    Levels { levels, extra }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(event: usize, left: usize, right: usize) -> Segment {
        Segment {
            event,
            left,
            right,
            span: right - left + 1,
        }
    }

    #[test]
    fn no_segments_no_levels() {
        assert_eq!(event_levels(&[], None), Levels::default());
    }

    #[test]
    fn disjoint_segments_share_a_level() {
        let levels = event_levels(&[seg(0, 1, 2), seg(1, 4, 5)], None);
        assert_eq!(levels.levels.len(), 1);
        assert_eq!(levels.levels[0].len(), 2);
        assert!(levels.extra.is_empty());
    }

    #[test]
    fn two_full_week_segments_use_two_levels() {
        let levels = event_levels(&[seg(0, 1, 7), seg(1, 1, 7)], None);
        assert_eq!(levels.levels, vec![vec![seg(0, 1, 7)], vec![seg(1, 1, 7)]]);
    }

    #[test]
    fn earlier_segment_keeps_upper_lane() {
        let levels = event_levels(&[seg(0, 2, 4), seg(1, 1, 2), seg(2, 5, 6)], None);
        assert_eq!(levels.levels[0], vec![seg(0, 2, 4), seg(2, 5, 6)]);
        assert_eq!(levels.levels[1], vec![seg(1, 1, 2)]);
    }

    #[test]
    fn identical_segments_overflow_past_limit() {
        let segments: Vec<_> = (0..5).map(|i| seg(i, 1, 7)).collect();
        let levels = event_levels(&segments, Some(2));
        assert_eq!(levels.levels.len(), 2);
        assert_eq!(levels.extra.iter().map(|s| s.event).collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn lanes_sorted_by_left() {
        let levels = event_levels(&[seg(0, 5, 6), seg(1, 1, 2)], None);
        assert_eq!(levels.levels[0], vec![seg(1, 1, 2), seg(0, 5, 6)]);
    }

    #[test]
    fn events_in_slot_counts_covering_segments() {
        let segments = [seg(0, 1, 3), seg(1, 3, 4), seg(2, 6, 7)];
        assert_eq!(events_in_slot(&segments, 3), 2);
        assert_eq!(events_in_slot(&segments, 5), 0);
        assert!(is_segment_in_slot(&segments[2], 7));
    }
}
