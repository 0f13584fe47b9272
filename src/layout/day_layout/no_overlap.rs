//! Non-overlapping day-column packing.
//!
//! Two events are friends when their vertical extents intersect. Each event
//! takes the lowest column index none of its already-placed friends uses; all
//! events reachable through friends share one column width. An event with no
//! friend to its right stretches to the column edge.

use std::cmp::Ordering;

use super::overlap::overlap_layout;
use super::{DayLayoutInput, StyledEvent};

/// Left padding between neighbouring columns.
const COLUMN_PADDING_PX: f64 = 3.0;

fn intersects(a: &StyledEvent, b: &StyledEvent) -> bool {
    let (y1, y2) = (a.top, a.top + a.height);
    let (y3, y4) = (b.top, b.top + b.height);
    (y3 >= y1 && y4 <= y2) || (y4 > y1 && y4 <= y2) || (y3 >= y1 && y3 < y2)
}

/// Highest column index in the friend component of `node`.
fn max_index_in_component(node: usize, friends: &[Vec<usize>], index: &[usize]) -> usize {
    let mut visited = vec![false; friends.len()];
    let mut stack = vec![node];
    let mut max_index = 0;
    while let Some(current) = stack.pop() {
        for &friend in &friends[current] {
            if visited[friend] {
                continue;
            }
            visited[friend] = true;
            max_index = max_index.max(index[friend]);
            stack.push(friend);
        }
    }
    max_index
}

fn component(node: usize, friends: &[Vec<usize>]) -> Vec<usize> {
    let mut visited = vec![false; friends.len()];
    let mut stack = vec![node];
    let mut members = Vec::new();
    while let Some(current) = stack.pop() {
        for &friend in &friends[current] {
            if !visited[friend] {
                visited[friend] = true;
                members.push(friend);
                stack.push(friend);
            }
        }
    }
    members
}

/// Non-overlapping layout; output is ordered by top, taller first on ties.
pub fn no_overlap_layout(input: &DayLayoutInput<'_>) -> Vec<StyledEvent> {
    let mut styled = overlap_layout(input);
    styled.sort_by(|a, b| {
        if a.top != b.top {
            a.top.total_cmp(&b.top)
        } else if a.height != b.height {
            (b.top + b.height).total_cmp(&(a.top + a.height))
        } else {
            Ordering::Equal
        }
    });

    let n = styled.len();
    let mut friends: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            if intersects(&styled[i], &styled[j]) {
                friends[i].push(j);
                friends[j].push(i);
            }
        }
    }

    let mut index: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        let taken: Vec<usize> = friends[i].iter().filter_map(|&f| index[f]).collect();
        index[i] = (0..).find(|candidate| !taken.contains(candidate));
    }
    let index: Vec<usize> = index.into_iter().map(|i| i.unwrap_or(0)).collect();

    let mut size: Vec<Option<f64>> = vec![None; n];
    for i in 0..n {
        if size[i].is_some() {
            continue;
        }
        let shared = 100.0 / (max_index_in_component(i, &friends, &index) + 1) as f64;
        size[i] = Some(shared);
        for member in component(i, &friends) {
            size[member] = Some(shared);
        }
    }

    for i in 0..n {
        let mut width = size[i].unwrap_or(100.0);
        let left = index[i] as f64 * width;
        let max_friend = friends[i].iter().map(|&f| index[f]).max().unwrap_or(0);
        if max_friend <= index[i] {
            width = 100.0 - left;
        }
        let padding_px = if index[i] == 0 { 0.0 } else { COLUMN_PADDING_PX };
        let event = &mut styled[i];
        event.x_offset = left;
        event.width = width;
        event.padding_px = padding_px;
    }

    styled
}
