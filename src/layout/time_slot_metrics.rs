//! Time-to-percentage geometry for a day column.
//!
//! A day column shows wall-clock time from `min` to `max`, divided into groups
//! of `timeslots` slots of `step` minutes each. Vertical positions are
//! percentages of the column's wall-clock span (`1 + minutes(min, max)`), so
//! they stay correct whatever pixel height the host gives the column. When
//! the span is not a whole number of groups the last group is cut short.
//!
//! # DST
//!
//! Positions are measured in wall-clock minutes: elapsed minutes plus the
//! UTC-offset change between the two instants. On a day where clocks spring
//! forward the column still spans 24 wall-clock hours and a 03:00 event sits
//! at 3/24 of the column. When `min` and `max` share an offset the correction
//! is zero.

use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::Serialize;

use super::types::{Bounds, Point};
use crate::dates::{localize, minutes_between, start_of_day, Timestamp};

/// Vertical placement of an event in a day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotPlacement {
    /// Offset from the column top, percent.
    pub top: f64,
    /// Height, percent.
    pub height: f64,
    /// Start position in minutes from the column top.
    pub start_min: i64,
    /// End position in minutes from the column top.
    pub end_min: i64,
    /// Start clamped into the column bounds.
    pub start: Timestamp,
    /// End clamped into the column bounds.
    pub end: Timestamp,
}

/// Slot geometry of one day column.
///
/// # Invariants
/// - `slots.len() == num_groups * timeslots + 1` (the extra slot closes the grid)
/// - `step >= 1`, `timeslots >= 1`, `num_groups >= 1`
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlotMetrics {
    tz: Tz,
    min: Timestamp,
    max: Timestamp,
    step: i64,
    timeslots: usize,
    total_min: i64,
    groups: Vec<Vec<Timestamp>>,
    slots: Vec<Timestamp>,
}

impl TimeSlotMetrics {
    /// Build metrics for a column showing `[min, max]`.
    ///
    /// `max < min` is treated as `max = min`.
    pub fn new(min: Timestamp, max: Timestamp, step: u32, timeslots: u32) -> Self {
        let tz = min.timezone();
        let max = if max < min { min } else { max };
        let step = i64::from(step.max(1));
        let timeslots = timeslots.max(1) as usize;

        let total_min = 1 + minutes_between(&min, &max);
        let group_min = step * timeslots as i64;
        let num_groups = (((total_min - 1) + group_min - 1) / group_min).max(1) as usize;

        let midnight = start_of_day(&min).and_time(NaiveTime::MIN);
        let from_midnight = (min.naive_local() - midnight).num_minutes();
        let slot_date = |index: usize| {
            localize(tz, midnight + Duration::minutes(from_midnight + index as i64 * step))
        };

        let groups: Vec<Vec<Timestamp>> = (0..num_groups)
            .map(|group| {
                (0..timeslots)
                    .map(|slot| slot_date(group * timeslots + slot))
                    .collect()
            })
            .collect();
        let mut slots: Vec<Timestamp> = groups.iter().flatten().copied().collect();
        slots.push(slot_date(slots.len()));

        Self {
            tz,
            min,
            max,
            step,
            timeslots,
            total_min,
            groups,
            slots,
        }
    }

    /// Column start.
    pub fn min(&self) -> &Timestamp {
        &self.min
    }

    /// Column end.
    pub fn max(&self) -> &Timestamp {
        &self.max
    }

    /// Slot length in minutes.
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Slots per group.
    pub fn timeslots(&self) -> usize {
        self.timeslots
    }

    /// Zone of `min`.
    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Slot start dates, grouped.
    pub fn groups(&self) -> &[Vec<Timestamp>] {
        &self.groups
    }

    /// Every slot start plus the closing boundary.
    pub fn slots(&self) -> &[Timestamp] {
        &self.slots
    }

    /// Slot count, excluding the closing boundary.
    pub fn num_slots(&self) -> usize {
        self.groups.len() * self.timeslots
    }

    /// Wall-clock minutes from `min` to `max`, inclusive of the last minute.
    pub fn total_minutes(&self) -> i64 {
        self.total_min
    }

    /// Minutes from `min` to `date`, capped at the column end.
    pub fn position_from_date(&self, date: &Timestamp) -> i64 {
        minutes_between(&self.min, date).min(self.total_min)
    }

    /// Placement of an event running from `start` to `end`.
    ///
    /// Both ends are clamped into the column; the height is at least
    /// `minimum_minutes` but never runs past the column bottom.
    pub fn placement(&self, start: &Timestamp, end: &Timestamp, minimum_minutes: i64) -> SlotPlacement {
        let start = (*start).clamp(self.min, self.max);
        let end = (*end).clamp(self.min, self.max);
        let total = self.total_min;

        let top_min = self.position_from_date(&start).clamp(0, total);
        let height_min = minutes_between(&start, &end)
            .max(minimum_minutes)
            .min(total - top_min)
            .max(0);

        SlotPlacement {
            top: top_min as f64 / total as f64 * 100.0,
            height: height_min as f64 / total as f64 * 100.0,
            start_min: top_min,
            end_min: self.position_from_date(&end),
            start,
            end,
        }
    }

    /// Whether `date` falls in group `group` (`[group start, next group start)`).
    pub fn date_is_in_group(&self, date: &Timestamp, group: usize) -> bool {
        let Some(first) = self.groups.get(group).and_then(|g| g.first()) else {
            return false;
        };
        let next = self
            .groups
            .get(group + 1)
            .and_then(|g| g.first())
            .unwrap_or(&self.max);
        date >= first && date < next
    }

    /// Slot boundary following `slot`.
    pub fn next_slot(&self, slot: &Timestamp) -> Timestamp {
        let next = self
            .slots
            .iter()
            .position(|s| s == slot)
            .map(|i| self.slots[(i + 1).min(self.slots.len() - 1)]);
        match next {
            Some(next) if next != *slot => next,
            _ => *slot + Duration::minutes(self.step),
        }
    }

    /// Slot at a fractional vertical position (0.0 = top, 1.0 = bottom).
    pub fn closest_slot_to_position(&self, fraction: f64) -> Timestamp {
        let raw = (fraction * self.num_slots() as f64).floor();
        let index = if raw.is_nan() { 0.0 } else { raw.max(0.0) } as usize;
        self.slots[index.min(self.slots.len() - 1)]
    }

    /// Slot under a pointer inside the column's measured `bounds`.
    pub fn closest_slot_from_point(&self, point: Point, bounds: Bounds) -> Timestamp {
        let height = bounds.height();
        if height <= 0.0 {
            return self.slots[0];
        }
        self.closest_slot_to_position((point.y - bounds.top) / height)
    }

    /// Slot containing `date`, shifted by `offset` slots.
    pub fn closest_slot_from_date(&self, date: &Timestamp, offset: usize) -> Timestamp {
        if *date < self.min {
            return self.slots[0];
        }
        if *date > self.max {
            return self.slots[self.slots.len() - 1];
        }
        let diff = minutes_between(&self.min, date).max(0);
        let index = (diff / self.step) as usize + offset;
        self.slots[index.min(self.slots.len() - 1)]
    }

    /// Whether `date` falls on a day before the column.
    pub fn starts_before_day(&self, date: &Timestamp) -> bool {
        start_of_day(date) < start_of_day(&self.min)
    }

    /// Whether `date` falls on a day after the column.
    pub fn starts_after_day(&self, date: &Timestamp) -> bool {
        start_of_day(date) > start_of_day(&self.max)
    }

    /// Top offset (percent) of a live "now" indicator, if `now` is in view.
    pub fn current_time_position(&self, now: &Timestamp) -> Option<f64> {
        if *now < self.min || *now > self.max {
            return None;
        }
        Some(self.position_from_date(now) as f64 / self.total_min as f64 * 100.0)
    }
}

#[cfg(test)]
#[path = "time_slot_metrics_tests.rs"]
mod tests;
