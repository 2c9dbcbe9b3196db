//! Day plan assembly.
//!
//! `plan_day` is the public entry point: geocode every job in one batch,
//! order the flexible jobs by nearest neighbour, slot them around the fixed
//! appointments, then walk the result assigning travel and clock times.
//! Planning never fails; anything that degrades the plan is reported as a
//! warning string on the plan itself.

use crate::clock::{format_duration, ClockTime};
use crate::config::PlannerConfig;
use crate::drive_time::{round_1dp, DriveTimeEstimator};
use crate::model::{DayPlan, GeoLocation, JobRequest, PlannedStop, TravelSegment};
use crate::route_url::build_route_url;
use crate::scheduler::{merge_fixed_and_flexible, FixedSlot, FlexibleSlot, MergeSettings};
use crate::sequencer::{sequence_nearest_neighbor, SequenceItem};
use crate::traits::Geocoder;

/// Plan one working day for `jobs`.
///
/// Issues a single batched geocoding request (chunked only when the job count
/// exceeds the service's batch limit). Every job appears exactly once in the
/// returned route, whether or not its postcode resolved.
pub fn plan_day<G>(jobs: &[JobRequest], geocoder: &G, config: &PlannerConfig) -> DayPlan
where
    G: Geocoder + ?Sized,
{
    if jobs.is_empty() {
        return empty_plan(config);
    }

    let postcodes: Vec<String> = jobs.iter().map(|job| job.postcode.clone()).collect();
    let mut locations = geocoder.geocode_many(&postcodes);
    if locations.len() != jobs.len() {
        tracing::warn!(
            expected = jobs.len(),
            got = locations.len(),
            "geocoder returned wrong number of results"
        );
        locations.resize(jobs.len(), None);
    }

    assemble_plan(jobs, &locations, config)
}

/// Build a plan from jobs and their already-resolved locations.
///
/// `locations` is parallel to `jobs`; missing trailing entries count as unresolved.
pub fn assemble_plan(
    jobs: &[JobRequest],
    locations: &[Option<GeoLocation>],
    config: &PlannerConfig,
) -> DayPlan {
    if jobs.is_empty() {
        return empty_plan(config);
    }

    let location_of = |index: usize| locations.get(index).and_then(Option::as_ref);
    let durations = &config.service_durations;

    let mut fixed = Vec::new();
    let mut flexible = Vec::new();
    for (job_index, job) in jobs.iter().enumerate() {
        let duration_minutes = durations.minutes_for(&job.service);
        match job.fixed_clock() {
            Some(time) => fixed.push(FixedSlot {
                job_index,
                start_minute: time.minutes(),
                duration_minutes,
            }),
            None => flexible.push(SequenceItem {
                job_index,
                location: location_of(job_index).map(GeoLocation::coordinates),
            }),
        }
    }

    let sequenced = sequence_nearest_neighbor(config.home_base, &flexible)
        .into_iter()
        .map(|job_index| FlexibleSlot {
            job_index,
            duration_minutes: durations.minutes_for(&jobs[job_index].service),
        })
        .collect();

    let settings = MergeSettings {
        day_start_minute: config.day_start_minute(),
        buffer_minutes: config.fixed_travel_buffer_minutes,
        max_deferrals: config.max_deferrals,
    };
    let outcome = merge_fixed_and_flexible(fixed, sequenced, &settings);

    let estimator = DriveTimeEstimator::from_config(config);
    let mut position = config.home_base;
    let mut cursor = config.day_start_minute();
    let mut total_drive_minutes: u32 = 0;
    let mut total_drive_miles = 0.0;
    let mut total_work_hours = 0.0;
    let mut late_arrivals = Vec::new();
    let mut route = Vec::with_capacity(outcome.order.len());

    for &job_index in &outcome.order {
        let job = &jobs[job_index];
        let location = location_of(job_index).cloned();

        let travel = location.as_ref().map(|location| {
            let segment = estimator.between(position, location.coordinates());
            position = location.coordinates();
            segment
        });
        if let Some(segment) = &travel {
            total_drive_minutes = total_drive_minutes.saturating_add(segment.drive_minutes);
            total_drive_miles += segment.driving_miles;
        }

        let arrival = cursor.saturating_add(travel.map_or(0, |segment| segment.drive_minutes));
        let start = match job.fixed_clock() {
            Some(appointment) => {
                if arrival > appointment.minutes() {
                    late_arrivals.push(format!(
                        "Late for fixed appointment: {} at {} (arrives {})",
                        job.name,
                        appointment,
                        ClockTime::from_minutes(arrival)
                    ));
                }
                arrival.max(appointment.minutes())
            }
            None => arrival,
        };
        let end = start.saturating_add(durations.minutes_for(&job.service));
        cursor = end;

        let duration_hours = durations.hours_for(&job.service);
        total_work_hours += duration_hours;

        route.push(PlannedStop {
            job: job.clone(),
            location,
            travel,
            duration_hours,
            planned_start: ClockTime::from_minutes(start),
            planned_end: ClockTime::from_minutes(end),
        });
    }

    let return_leg = estimator.between(position, config.home_base);
    total_drive_minutes = total_drive_minutes.saturating_add(return_leg.drive_minutes);
    total_drive_miles += return_leg.driving_miles;
    let end_minute = cursor.saturating_add(return_leg.drive_minutes);

    let mut warnings = Vec::new();
    if end_minute > config.day_end_minute() {
        warnings.push(format!(
            "Day overruns by {}: finishes at {}, working day ends {}",
            format_duration(end_minute - config.day_end_minute()),
            ClockTime::from_minutes(end_minute),
            ClockTime::from_minutes(config.day_end_minute())
        ));
    }
    if route.len() > config.max_jobs_per_day {
        warnings.push(format!(
            "Overbooked: {} jobs booked, maximum is {} per day",
            route.len(),
            config.max_jobs_per_day
        ));
    }

    let unlocated: Vec<String> = jobs
        .iter()
        .enumerate()
        .filter(|(index, _)| location_of(*index).is_none())
        .map(|(_, job)| match job.postcode.trim() {
            "" => format!("{} (no postcode)", job.name),
            postcode => format!("{} ({})", job.name, postcode),
        })
        .collect();
    if !unlocated.is_empty() {
        warnings.push(format!(
            "Could not locate {} job{} (no travel times): {}",
            unlocated.len(),
            if unlocated.len() == 1 { "" } else { "s" },
            unlocated.join(", ")
        ));
    }

    warnings.extend(late_arrivals);
    warnings.extend(outcome.set_aside.iter().map(|(job_index, deferrals)| {
        format!(
            "Could not fit {} between fixed appointments (pushed back {} times); moved to end of day",
            jobs[*job_index].name, deferrals
        )
    }));

    let postcodes: Vec<String> = route
        .iter()
        .filter_map(|stop| match &stop.location {
            Some(location) => Some(location.postcode.clone()),
            None => Some(stop.job.postcode.trim().to_string()).filter(|postcode| !postcode.is_empty()),
        })
        .collect();
    let route_url = build_route_url(config.home_base, config.home_postcode.as_deref(), &postcodes);

    let start_minute = config.day_start_minute();
    let plan = DayPlan {
        route,
        total_drive_minutes,
        total_drive_miles: round_1dp(total_drive_miles),
        total_work_hours: round_2dp(total_work_hours),
        total_day_hours: round_2dp(f64::from(end_minute - start_minute) / 60.0),
        start_time: ClockTime::from_minutes(start_minute),
        end_time: ClockTime::from_minutes(end_minute),
        route_url,
        warnings,
    };

    tracing::info!(
        stops = plan.route.len(),
        drive_minutes = plan.total_drive_minutes,
        end = %plan.end_time,
        warnings = plan.warnings.len(),
        "day planned"
    );

    plan
}

/// Travel estimate from home base to a single postcode.
pub fn distance_from_base<G>(geocoder: &G, postcode: &str, config: &PlannerConfig) -> Option<TravelSegment>
where
    G: Geocoder + ?Sized,
{
    let location = geocoder.geocode(postcode)?;
    Some(DriveTimeEstimator::from_config(config).between(config.home_base, location.coordinates()))
}

fn empty_plan(config: &PlannerConfig) -> DayPlan {
    let start = ClockTime::from_minutes(config.day_start_minute());
    DayPlan {
        route: Vec::new(),
        total_drive_minutes: 0,
        total_drive_miles: 0.0,
        total_work_hours: 0.0,
        total_day_hours: 0.0,
        start_time: start,
        end_time: start,
        route_url: build_route_url(config.home_base, config.home_postcode.as_deref(), &[]),
        warnings: Vec::new(),
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
