//! Interleaving fixed appointments with sequenced flexible jobs.
//!
//! Fixed appointments are walked in time order. Before each one, flexible
//! jobs are taken from the front of the queue while they can finish (plus a
//! travel buffer) before the appointment starts. The queue is only ever
//! peeked; a job that does not fit stays at the front for the next gap.
//! A job is only moved out of the way once it has been pushed back enough
//! times and no remaining gap could take it.

use std::collections::VecDeque;

/// A job with a caller-assigned start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSlot {
    pub job_index: usize,
    pub start_minute: u32,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexibleSlot {
    pub job_index: usize,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSettings {
    pub day_start_minute: u32,
    pub buffer_minutes: u32,
    /// Rejections a flexible job may take before it can be moved to the end of
    /// the day. Jobs that still fit a later gap are never moved.
    pub max_deferrals: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Job indices in visiting order.
    pub order: Vec<usize>,
    /// Flexible jobs that hit the deferral cap with no gap left to fit them,
    /// with how often they were pushed back.
    pub set_aside: Vec<(usize, u32)>,
}

/// Merge fixed and flexible jobs into one visiting order.
///
/// `fixed` may arrive in any order; equal start times keep their input order.
/// `flexible` must already be in visiting order. Every job index passed in
/// appears exactly once in the result.
pub fn merge_fixed_and_flexible(
    mut fixed: Vec<FixedSlot>,
    flexible: Vec<FlexibleSlot>,
    settings: &MergeSettings,
) -> MergeOutcome {
    fixed.sort_by_key(|slot| slot.start_minute);

    let mut queue: VecDeque<(FlexibleSlot, u32)> =
        flexible.into_iter().map(|slot| (slot, 0)).collect();
    let mut order = Vec::with_capacity(fixed.len() + queue.len());
    let mut set_aside = Vec::new();
    let mut cursor = settings.day_start_minute;

    for (position, appointment) in fixed.iter().enumerate() {
        loop {
            while let Some((job, _)) = queue.front() {
                let candidate_end = cursor
                    .saturating_add(job.duration_minutes)
                    .saturating_add(settings.buffer_minutes);
                if candidate_end > appointment.start_minute {
                    break;
                }
                tracing::debug!(
                    job = job.job_index,
                    before = appointment.job_index,
                    end = candidate_end,
                    "flexible job fits before appointment"
                );
                order.push(job.job_index);
                cursor = candidate_end;
                queue.pop_front();
            }

            let Some((job, deferrals)) = queue.front_mut() else {
                break;
            };
            *deferrals += 1;
            if *deferrals < settings.max_deferrals
                || fits_before_any(cursor, job.duration_minutes, &fixed[position..], settings.buffer_minutes)
            {
                break;
            }

            tracing::warn!(
                job = job.job_index,
                deferrals = *deferrals,
                "flexible job keeps missing gaps between appointments; moving to end of day"
            );
            set_aside.push((job.job_index, *deferrals));
            queue.pop_front();
        }

        // An earlier appointment that runs over delays this one.
        order.push(appointment.job_index);
        cursor = advance_past(cursor, appointment);
    }

    order.extend(queue.into_iter().map(|(job, _)| job.job_index));
    order.extend(set_aside.iter().map(|(job_index, _)| *job_index));

    MergeOutcome { order, set_aside }
}

fn advance_past(cursor: u32, appointment: &FixedSlot) -> u32 {
    cursor
        .max(appointment.start_minute)
        .saturating_add(appointment.duration_minutes)
}

/// Whether a job of `duration_minutes` could still finish before one of
/// `appointments` if nothing else were slotted in ahead of it.
fn fits_before_any(mut cursor: u32, duration_minutes: u32, appointments: &[FixedSlot], buffer_minutes: u32) -> bool {
    appointments.iter().any(|appointment| {
        let fits = cursor
            .saturating_add(duration_minutes)
            .saturating_add(buffer_minutes)
            <= appointment.start_minute;
        cursor = advance_past(cursor, appointment);
        fits
    })
}
