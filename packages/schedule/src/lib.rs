#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Daily schedule templates.
//!
//! Every person follows the template of their [`LifeStage`]: a fixed,
//! ordered list of [`ActivityTemplate`]s with base times and jitter
//! bounds. [`realize`] turns a template list into concrete, contiguous
//! activity windows that together cover exactly one day.

use pop_map_population_models::{ActivityKind, MINUTES_PER_DAY, TimeOfDay};
use pop_map_random::RandomSource;
use strum_macros::{AsRefStr, Display};

/// Shortest window any realized activity may have.
pub const MIN_ACTIVITY_MINUTES: i32 = 15;

/// One slot in a daily template.
///
/// Times are minutes relative to the start of the day and may fall
/// outside `[0, 1439]`; they are normalized when realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityTemplate {
    pub kind: ActivityKind,
    pub base_start: i32,
    pub base_end: i32,
    /// Bound of the signed uniform offset applied to the slot's
    /// boundary times.
    pub jitter_minutes: u16,
}

const fn slot(kind: ActivityKind, base_start: i32, base_end: i32, jitter_minutes: u16) -> ActivityTemplate {
    ActivityTemplate {
        kind,
        base_start,
        base_end,
        jitter_minutes,
    }
}

use ActivityKind::{Home, Leisure, School, Work};

const INFANT: &[ActivityTemplate] = &[
    slot(Home, 0, 540, 30),
    slot(Leisure, 540, 660, 30),
    slot(Home, 660, 1440, 0),
];

const PRESCHOOL: &[ActivityTemplate] = &[
    slot(Home, 0, 480, 20),
    slot(School, 480, 990, 20),
    slot(Leisure, 990, 1080, 30),
    slot(Home, 1080, 1440, 0),
];

const SCHOOL_AGE: &[ActivityTemplate] = &[
    slot(Home, 0, 450, 20),
    slot(School, 450, 1020, 30),
    slot(Leisure, 1020, 1200, 45),
    slot(Home, 1200, 1440, 0),
];

const EMPLOYED: &[ActivityTemplate] = &[
    slot(Home, 0, 450, 30),
    slot(Work, 450, 1050, 45),
    slot(Leisure, 1050, 1230, 60),
    slot(Home, 1230, 1440, 0),
];

const UNEMPLOYED: &[ActivityTemplate] = &[
    slot(Home, 0, 600, 60),
    slot(Leisure, 600, 720, 60),
    slot(Home, 720, 900, 60),
    slot(Leisure, 900, 1290, 90),
    slot(Home, 1290, 1440, 0),
];

const RETIRED: &[ActivityTemplate] = &[
    slot(Home, 0, 540, 45),
    slot(Leisure, 540, 690, 45),
    slot(Home, 690, 840, 45),
    slot(Leisure, 840, 1020, 60),
    slot(Home, 1020, 1440, 0),
];

/// Age-derived schedule family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum LifeStage {
    /// Under 3
    Infant,
    /// 3 to 5
    Preschool,
    /// 6 to 18
    SchoolAge,
    /// 19 to 65, in work
    Employed,
    /// 19 to 65, not in work
    Unemployed,
    /// Over 65
    Retired,
}

impl LifeStage {
    /// Resolves the stage for `age`.
    ///
    /// Working-age people draw once against `employment_probability`;
    /// every other age consumes no randomness.
    pub fn for_age<R: RandomSource + ?Sized>(
        age: u8,
        employment_probability: f64,
        rng: &mut R,
    ) -> Self {
        match age {
            0..=2 => Self::Infant,
            3..=5 => Self::Preschool,
            6..=18 => Self::SchoolAge,
            19..=65 => {
                if rng.chance(employment_probability) {
                    Self::Employed
                } else {
                    Self::Unemployed
                }
            }
            _ => Self::Retired,
        }
    }

    /// The ordered template list for this stage.
    #[must_use]
    pub const fn templates(self) -> &'static [ActivityTemplate] {
        match self {
            Self::Infant => INFANT,
            Self::Preschool => PRESCHOOL,
            Self::SchoolAge => SCHOOL_AGE,
            Self::Employed => EMPLOYED,
            Self::Unemployed => UNEMPLOYED,
            Self::Retired => RETIRED,
        }
    }
}

/// Returns the daily template for a person aged `age`.
pub fn template_for<R: RandomSource + ?Sized>(
    age: u8,
    employment_probability: f64,
    rng: &mut R,
) -> &'static [ActivityTemplate] {
    LifeStage::for_age(age, employment_probability, rng).templates()
}

/// A concrete activity window produced from a template slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledActivity {
    pub kind: ActivityKind,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Realizes a template list into contiguous windows covering one day.
///
/// The first slot's start is jittered; every later slot starts where the
/// previous one ended. Each end is jittered and then clamped so that
/// every window lasts at least [`MIN_ACTIVITY_MINUTES`]. The final slot
/// ends one minute before the day's first start, closing the cycle.
/// Windows are normalized into `[0, 1439]`, so any of them may wrap past
/// midnight.
pub fn realize<R: RandomSource + ?Sized>(
    templates: &[ActivityTemplate],
    rng: &mut R,
) -> Vec<ScheduledActivity> {
    let Some(first) = templates.first() else {
        return Vec::new();
    };

    let day_start = first.base_start + rng.jitter(first.jitter_minutes);
    let day_end = day_start + i32::from(MINUTES_PER_DAY) - 1;

    let mut cursor = day_start;
    let mut realized = Vec::with_capacity(templates.len());

    for (idx, template) in templates.iter().enumerate() {
        let remaining = i32::try_from(templates.len() - idx - 1).unwrap_or(i32::MAX);
        let start = cursor;
        let end = if remaining == 0 {
            day_end
        } else {
            let latest = day_end - MIN_ACTIVITY_MINUTES * remaining;
            (template.base_end + rng.jitter(template.jitter_minutes))
                .max(start + MIN_ACTIVITY_MINUTES)
                .min(latest)
        };

        realized.push(ScheduledActivity {
            kind: template.kind,
            start: TimeOfDay::from_minutes(start),
            end: TimeOfDay::from_minutes(end),
        });
        cursor = end;
    }

    realized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pop_map_random::{SeededSource, SequenceSource};

    const ALL_STAGES: &[LifeStage] = &[
        LifeStage::Infant,
        LifeStage::Preschool,
        LifeStage::SchoolAge,
        LifeStage::Employed,
        LifeStage::Unemployed,
        LifeStage::Retired,
    ];

    #[test]
    fn stages_follow_age_buckets() {
        let mut rng = SequenceSource::constant(0.0);
        assert_eq!(LifeStage::for_age(0, 0.7, &mut rng), LifeStage::Infant);
        assert_eq!(LifeStage::for_age(2, 0.7, &mut rng), LifeStage::Infant);
        assert_eq!(LifeStage::for_age(3, 0.7, &mut rng), LifeStage::Preschool);
        assert_eq!(LifeStage::for_age(5, 0.7, &mut rng), LifeStage::Preschool);
        assert_eq!(LifeStage::for_age(6, 0.7, &mut rng), LifeStage::SchoolAge);
        assert_eq!(LifeStage::for_age(18, 0.7, &mut rng), LifeStage::SchoolAge);
        assert_eq!(LifeStage::for_age(66, 0.7, &mut rng), LifeStage::Retired);
    }

    #[test]
    fn working_age_splits_on_employment_draw() {
        let mut rng = SequenceSource::new([0.69, 0.71]);
        assert_eq!(LifeStage::for_age(30, 0.7, &mut rng), LifeStage::Employed);
        assert_eq!(LifeStage::for_age(65, 0.7, &mut rng), LifeStage::Unemployed);
    }

    #[test]
    fn templates_start_and_end_at_home() {
        for stage in ALL_STAGES {
            let templates = stage.templates();
            assert!(templates.len() >= 3, "{stage} template too short");
            assert_eq!(templates.first().map(|t| t.kind), Some(ActivityKind::Home));
            assert_eq!(templates.last().map(|t| t.kind), Some(ActivityKind::Home));
        }
    }

    #[test]
    fn only_working_stages_include_work() {
        for stage in ALL_STAGES {
            let has_work = stage.templates().iter().any(|t| t.kind == ActivityKind::Work);
            assert_eq!(has_work, *stage == LifeStage::Employed, "{stage}");
        }
    }

    #[test]
    fn zero_jitter_draws_reproduce_base_times() {
        // 0.5 maps to a zero offset for every jitter bound.
        let mut rng = SequenceSource::constant(0.5);
        let realized = realize(EMPLOYED, &mut rng);
        let windows: Vec<(ActivityKind, String, String)> = realized
            .iter()
            .map(|a| (a.kind, a.start.to_string(), a.end.to_string()))
            .collect();
        assert_eq!(
            windows,
            vec![
                (Home, "00:00".to_string(), "07:30".to_string()),
                (Work, "07:30".to_string(), "17:30".to_string()),
                (Leisure, "17:30".to_string(), "20:30".to_string()),
                (Home, "20:30".to_string(), "23:59".to_string()),
            ]
        );
    }

    #[test]
    fn negative_first_start_wraps_before_midnight() {
        // First draw pulls the day start 30 minutes early.
        let mut rng = SequenceSource::new([0.0, 0.5]);
        let realized = realize(EMPLOYED, &mut rng);
        assert_eq!(realized[0].start.to_string(), "23:30");
        assert!(realized[0].end < realized[0].start, "first home should span midnight");
        assert_eq!(realized[3].end.to_string(), "23:29");
    }

    #[test]
    fn realized_days_are_contiguous_and_closed() {
        let mut rng = SeededSource::from_seed_u64(11);
        for stage in ALL_STAGES {
            for _ in 0..200 {
                let realized = realize(stage.templates(), &mut rng);
                assert_eq!(realized.len(), stage.templates().len());

                for pair in realized.windows(2) {
                    assert_eq!(pair[1].start, pair[0].end, "{stage}: gap in {realized:?}");
                }

                let first = realized[0].start.minutes();
                let last = realized[realized.len() - 1].end.minutes();
                assert_eq!(
                    (last + 1) % MINUTES_PER_DAY,
                    first,
                    "{stage}: day not closed in {realized:?}"
                );

                let total: u32 = realized
                    .iter()
                    .map(|a| {
                        u32::from(
                            (a.end.minutes() + MINUTES_PER_DAY - a.start.minutes())
                                % MINUTES_PER_DAY,
                        )
                    })
                    .sum();
                assert_eq!(total, 1439, "{stage}: windows overlap in {realized:?}");
            }
        }
    }

    #[test]
    fn extreme_jitter_keeps_minimum_duration() {
        let templates = [
            slot(Home, 0, 30, 0),
            slot(Work, 30, 20, 0),
            slot(Home, 20, 1440, 0),
        ];
        let mut rng = SequenceSource::constant(0.5);
        let realized = realize(&templates, &mut rng);
        assert_eq!(realized[1].start.minutes(), 30);
        assert_eq!(realized[1].end.minutes(), 45);
    }

    #[test]
    fn empty_template_realizes_to_nothing() {
        let mut rng = SequenceSource::constant(0.5);
        assert!(realize(&[], &mut rng).is_empty());
    }
}
