//! Overlapping day-column packing.
//!
//! Events are grouped into containers (a run of events linked by time), each
//! container into rows (events starting within `minimum_start_difference` of
//! each other or inside the row's first event), and each row into leaves.
//! Width is split between a container's columns; every event except the last
//! in a row is stretched 1.7x so it overlaps its neighbour.

use super::{DayLayoutInput, StyledEvent};

const OVERLAP_STRETCH: f64 = 1.7;

#[derive(Debug, Clone)]
enum Role {
    Container { rows: Vec<usize> },
    Row { container: usize, leaves: Vec<usize> },
    Leaf { row: usize },
}

#[derive(Debug, Clone)]
struct Proxy {
    event: usize,
    /// Grid minutes.
    start: i64,
    end: i64,
    /// Clamped instants, for ordering.
    start_ts: i64,
    end_ts: i64,
    top: f64,
    height: f64,
    role: Role,
}

/// Order events so that each one is followed, where possible, by the first
/// event starting after it ends.
fn sort_by_render(mut by_time: Vec<usize>, proxies: &[Proxy]) -> Vec<usize> {
    by_time.sort_by(|&a, &b| {
        proxies[a]
            .start_ts
            .cmp(&proxies[b].start_ts)
            .then_with(|| proxies[b].end_ts.cmp(&proxies[a].end_ts))
    });

    let mut sorted = Vec::with_capacity(by_time.len());
    while !by_time.is_empty() {
        let event = by_time.remove(0);
        sorted.push(event);
        for i in 0..by_time.len() {
            let test = by_time[i];
            if proxies[event].end_ts > proxies[test].start_ts {
                continue;
            }
            if i > 0 {
                sorted.push(by_time.remove(i));
            }
            break;
        }
    }
    sorted
}

fn on_same_row(row: &Proxy, event: &Proxy, minimum_start_difference: i64) -> bool {
    (event.start - row.start).abs() < minimum_start_difference
        || (event.start > row.start && event.start < row.end)
}

struct Tree {
    proxies: Vec<Proxy>,
}

impl Tree {
    fn base_width(&self, i: usize) -> f64 {
        match &self.proxies[i].role {
            Role::Container { rows } => {
                let columns = rows
                    .iter()
                    .map(|&r| self.leaves(r).len() + 1)
                    .max()
                    .unwrap_or(0)
                    + 1;
                100.0 / columns as f64
            }
            Role::Row { container, leaves } => {
                (100.0 - self.base_width(*container)) / (leaves.len() + 1) as f64
            }
            Role::Leaf { row } => self.base_width(*row),
        }
    }

    fn leaves(&self, row: usize) -> &[usize] {
        match &self.proxies[row].role {
            Role::Row { leaves, .. } => leaves,
            _ => &[],
        }
    }

    fn width(&self, i: usize) -> f64 {
        let no_overlap = self.base_width(i);
        let overlap = (no_overlap * OVERLAP_STRETCH).min(100.0);
        match &self.proxies[i].role {
            Role::Container { .. } => overlap,
            Role::Row { leaves, .. } => {
                if leaves.is_empty() {
                    no_overlap
                } else {
                    overlap
                }
            }
            Role::Leaf { row } => {
                let leaves = self.leaves(*row);
                if leaves.last() == Some(&i) {
                    no_overlap
                } else {
                    overlap
                }
            }
        }
    }

    fn x_offset(&self, i: usize) -> f64 {
        match &self.proxies[i].role {
            Role::Container { .. } => 0.0,
            Role::Row { container, .. } => self.base_width(*container),
            Role::Leaf { row } => {
                let index = self.leaves(*row).iter().position(|&l| l == i).unwrap_or(0) + 1;
                self.x_offset(*row) + index as f64 * self.base_width(*row)
            }
        }
    }
}

/// Overlapping layout; output is in render order.
pub fn overlap_layout(input: &DayLayoutInput<'_>) -> Vec<StyledEvent> {
    let metrics = input.slot_metrics;
    let mut proxies: Vec<Proxy> = input
        .column
        .iter()
        .map(|&event| {
            let e = &input.events[event];
            let placement = metrics.placement(&e.start, &e.end, input.minimum_minutes);
            Proxy {
                event,
                start: placement.start_min,
                end: placement.end_min,
                start_ts: placement.start.timestamp(),
                end_ts: placement.end.timestamp(),
                top: placement.top,
                height: placement.height,
                role: Role::Container { rows: Vec::new() },
            }
        })
        .collect();

    let order = sort_by_render((0..proxies.len()).collect(), &proxies);

    let mut containers: Vec<usize> = Vec::new();
    for &i in &order {
        let container = containers.iter().copied().find(|&c| {
            proxies[c].end > proxies[i].start
                || (proxies[i].start - proxies[c].start).abs() < input.minimum_start_difference
        });

        let Some(container) = container else {
            proxies[i].role = Role::Container { rows: Vec::new() };
            containers.push(i);
            continue;
        };

        let rows = match &proxies[container].role {
            Role::Container { rows } => rows.clone(),
            _ => Vec::new(),
        };
        let row = rows
            .iter()
            .rev()
            .copied()
            .find(|&r| on_same_row(&proxies[r], &proxies[i], input.minimum_start_difference));

        match row {
            Some(row) => {
                if let Role::Row { leaves, .. } = &mut proxies[row].role {
                    leaves.push(i);
                }
                proxies[i].role = Role::Leaf { row };
            }
            None => {
                if let Role::Container { rows } = &mut proxies[container].role {
                    rows.push(i);
                }
                proxies[i].role = Role::Row {
                    container,
                    leaves: Vec::new(),
                };
            }
        }
    }

    let tree = Tree { proxies };
    order
        .into_iter()
        .map(|i| {
            let proxy = &tree.proxies[i];
            StyledEvent {
                event: proxy.event,
                top: proxy.top,
                height: proxy.height,
                width: tree.width(i),
                x_offset: tree.x_offset(i).max(0.0),
                padding_px: 0.0,
            }
        })
        .collect()
}
