//! FSRS review scheduler.
//!
//! Implements the difficulty/stability/retrievability memory model: the
//! power-law forgetting curve, the per-rating difficulty and stability
//! updates, interval selection with optional fuzz, and the due/priority
//! queries used for card selection.
//!
//! The scheduler holds no per-item state. Every transition takes the current
//! [`ItemState`] and returns a fresh [`MemoryState`].

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::model::{ItemState, MemoryState, Rating};

/// Number of weights in the model vector.
pub const PARAM_COUNT: usize = 21;

/// Default model weights.
pub const DEFAULT_PARAMS: [f64; PARAM_COUNT] = [
    0.212, 1.2931, 2.3065, 8.2956, 6.4133, 0.8334, 3.0194, 0.001, 1.8722, 0.1666, 0.796, 1.4835,
    0.0614, 0.2629, 1.6483, 0.6014, 1.8729, 0.5425, 0.0912, 0.0658, 0.1542,
];

/// Smallest stability a transition may produce.
pub const MIN_STABILITY: f64 = 0.01;

const MIN_DIFFICULTY: f64 = 1.0;
const MAX_DIFFICULTY: f64 = 10.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// The 21-element model vector.
    #[serde(default = "default_params")]
    pub params: Vec<f64>,
    /// Target probability of recall at the scheduled review.
    #[serde(default = "default_request_retention")]
    pub request_retention: f64,
    /// Upper bound on any interval, in days.
    #[serde(default = "default_maximum_interval")]
    pub maximum_interval: u32,
    /// Spread intervals randomly to avoid review pile-ups.
    #[serde(default = "default_true")]
    pub enable_fuzz: bool,
}

fn default_params() -> Vec<f64> {
    DEFAULT_PARAMS.to_vec()
}

fn default_request_retention() -> f64 {
    0.9
}

fn default_maximum_interval() -> u32 {
    36500
}

fn default_true() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            params: default_params(),
            request_retention: default_request_retention(),
            maximum_interval: default_maximum_interval(),
            enable_fuzz: true,
        }
    }
}

/// The FSRS scheduler.
#[derive(Debug, Clone)]
pub struct Scheduler {
    params: [f64; PARAM_COUNT],
    request_retention: f64,
    maximum_interval: u32,
    enable_fuzz: bool,
    decay: f64,
    factor: f64,
}

impl Scheduler {
    /// Validate the configuration and derive the curve constants.
    pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let params: [f64; PARAM_COUNT] = config.params.as_slice().try_into().map_err(|_| {
            SchedulerError::InvalidParams(format!(
                "expected {PARAM_COUNT} values, got {}",
                config.params.len()
            ))
        })?;
        if let Some(i) = params.iter().position(|p| !p.is_finite()) {
            return Err(SchedulerError::InvalidParams(format!(
                "params[{i}] is not a finite number"
            )));
        }
        if params[20] <= 0.0 {
            return Err(SchedulerError::InvalidParams(format!(
                "params[20] must be positive, got {}",
                params[20]
            )));
        }
        if !(config.request_retention > 0.0 && config.request_retention < 1.0) {
            return Err(SchedulerError::InvalidRetention(config.request_retention));
        }
        if config.maximum_interval == 0 {
            return Err(SchedulerError::InvalidMaximumInterval(0));
        }

        let decay = -params[20];
        let factor = 0.9f64.powf(1.0 / decay) - 1.0;

        Ok(Self {
            params,
            request_retention: config.request_retention,
            maximum_interval: config.maximum_interval,
            enable_fuzz: config.enable_fuzz,
            decay,
            factor,
        })
    }

    pub fn params(&self) -> &[f64; PARAM_COUNT] {
        &self.params
    }

    pub fn request_retention(&self) -> f64 {
        self.request_retention
    }

    pub fn maximum_interval(&self) -> u32 {
        self.maximum_interval
    }

    pub fn fuzz_enabled(&self) -> bool {
        self.enable_fuzz
    }

    /// The curve exponent, `-params[20]`.
    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Scale chosen so that `forgetting_curve(s, s) == 0.9`.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    // -----------------------------------------------------------------------
    // Forgetting curve and intervals
    // -----------------------------------------------------------------------

    /// Probability of recall after `elapsed_days` at the given stability.
    pub fn forgetting_curve(&self, elapsed_days: f64, stability: f64) -> f64 {
        (1.0 + self.factor * elapsed_days / stability).powf(self.decay)
    }

    /// Whole-day interval that brings recall down to the target retention.
    pub fn next_interval<R: Rng + ?Sized>(&self, stability: f64, rng: &mut R) -> u32 {
        let raw = stability / self.factor
            * (self.request_retention.powf(1.0 / self.decay) - 1.0);
        let fuzzed = self.apply_fuzz(raw, rng);
        fuzzed.round().clamp(1.0, self.maximum_interval as f64) as u32
    }

    /// Spread an interval over a small window around its rounded value.
    ///
    /// Intervals under 2.5 days, and every interval when fuzz is disabled,
    /// pass through unchanged.
    pub fn apply_fuzz<R: Rng + ?Sized>(&self, interval: f64, rng: &mut R) -> f64 {
        if !self.enable_fuzz || interval < 2.5 {
            return interval;
        }
        let interval = interval.round();
        let min = (interval * 0.95 - 1.0).round().max(2.0);
        let max = (interval * 1.05 + 1.0).round();
        rng.gen_range(min as u64..=max as u64) as f64
    }

    // -----------------------------------------------------------------------
    // Difficulty
    // -----------------------------------------------------------------------

    /// Difficulty of a brand-new item after its first rating.
    pub fn init_difficulty(&self, rating: Rating) -> f64 {
        let w = &self.params;
        let raw = w[4] - (w[5] * (rating.value() as f64 - 1.0)).exp() + 1.0;
        constrain_difficulty(raw)
    }

    /// Difficulty after a review: damped step, then mean reversion toward
    /// the `easy` starting difficulty.
    pub fn next_difficulty(&self, difficulty: f64, rating: Rating) -> f64 {
        let w = &self.params;
        let delta = -w[6] * (rating.value() as f64 - 3.0);
        let damped = delta * (MAX_DIFFICULTY - difficulty) / 9.0;
        let next = difficulty + damped;
        let reverted = w[7] * self.init_difficulty(Rating::Easy) + (1.0 - w[7]) * next;
        constrain_difficulty(reverted)
    }

    // -----------------------------------------------------------------------
    // Stability
    // -----------------------------------------------------------------------

    /// Stability of a brand-new item after its first rating.
    pub fn init_stability(&self, rating: Rating) -> f64 {
        round2(self.params[rating.value() as usize - 1].max(0.1))
    }

    /// Stability after a successful recall.
    pub fn next_recall_stability(
        &self,
        difficulty: f64,
        stability: f64,
        retrievability: f64,
        rating: Rating,
    ) -> f64 {
        let w = &self.params;
        let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
        let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };
        let growth = w[8].exp()
            * (11.0 - difficulty)
            * stability.powf(-w[9])
            * (((1.0 - retrievability) * w[10]).exp() - 1.0)
            * hard_penalty
            * easy_bonus;
        floor_stability(round2(stability * (1.0 + growth)), stability)
    }

    /// Stability after a lapse. Never exceeds the short-term bound
    /// `stability / exp(params[17] * params[18])`.
    pub fn next_forget_stability(
        &self,
        difficulty: f64,
        stability: f64,
        retrievability: f64,
    ) -> f64 {
        let w = &self.params;
        let s_min = stability / (w[17] * w[18]).exp();
        let long_term = w[11]
            * difficulty.powf(-w[12])
            * ((stability + 1.0).powf(w[13]) - 1.0)
            * ((1.0 - retrievability) * w[14]).exp();
        floor_stability(round2(long_term.min(s_min)), stability)
    }

    /// Starting `(difficulty, stability)` for each rating.
    pub fn init_states(&self) -> [(Rating, f64, f64); 4] {
        Rating::ALL.map(|r| (r, self.init_difficulty(r), self.init_stability(r)))
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Apply one review to an item.
    ///
    /// An unseen item is seeded from the rating's initial difficulty and
    /// stability and advanced in the same call. `elapsed_days` overrides the
    /// time since the last review; without it the gap is measured from
    /// `last_review` to `now`. Counters are copied unchanged: the caller
    /// owns repetition and lapse bookkeeping.
    pub fn process_review<R: Rng + ?Sized>(
        &self,
        item: &ItemState,
        rating: Rating,
        now: DateTime<Utc>,
        elapsed_days: Option<f64>,
        rng: &mut R,
    ) -> MemoryState {
        let current = match item {
            ItemState::Reviewed(state) => state.clone(),
            ItemState::Unseen => {
                let (_, difficulty, stability) = self.init_states()[rating.value() as usize - 1];
                MemoryState {
                    difficulty,
                    stability,
                    retrievability: 1.0,
                    last_review: None,
                    next_review: None,
                    interval: 1,
                    repetitions: 0,
                    lapses: 0,
                }
            }
        };

        let elapsed = elapsed_days
            .map(|d| d.max(0.0))
            .unwrap_or_else(|| elapsed_days_between(current.last_review, now));
        let retrievability = self.forgetting_curve(elapsed, current.stability);

        let difficulty = self.next_difficulty(current.difficulty, rating);
        let stability = if rating.is_recall() {
            self.next_recall_stability(
                current.difficulty,
                current.stability,
                retrievability,
                rating,
            )
        } else {
            self.next_forget_stability(current.difficulty, current.stability, retrievability)
        };

        let interval = self.next_interval(stability, rng);
        // Very long ceilings can run past the last representable instant.
        let next_review = now
            .checked_add_signed(Duration::days(interval as i64))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        tracing::debug!(
            %rating,
            elapsed,
            retrievability,
            difficulty,
            stability,
            interval,
            "processed review"
        );

        MemoryState {
            difficulty,
            stability,
            retrievability,
            last_review: Some(now),
            next_review: Some(next_review),
            interval,
            repetitions: current.repetitions,
            lapses: current.lapses,
        }
    }

    /// The state each rating would produce, without committing to any.
    pub fn preview<R: Rng + ?Sized>(
        &self,
        item: &ItemState,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> [(Rating, MemoryState); 4] {
        Rating::ALL.map(|r| (r, self.process_review(item, r, now, None, rng)))
    }

    // -----------------------------------------------------------------------
    // Selection queries
    // -----------------------------------------------------------------------

    /// An item is due when it has no scheduled review or the time has come.
    pub fn is_due(&self, state: &MemoryState, now: DateTime<Utc>) -> bool {
        match state.next_review {
            None => true,
            Some(next) => now >= next,
        }
    }

    /// Sort key for due items; larger means more overdue. Never below 1.
    pub fn review_priority(&self, state: &MemoryState, now: DateTime<Utc>) -> f64 {
        match state.next_review {
            None => 1.0,
            Some(next) => (elapsed_days_between(Some(next), now) + 1.0).max(1.0),
        }
    }

    /// Predicted recall probability right now.
    pub fn current_retrievability(&self, state: &MemoryState, now: DateTime<Utc>) -> f64 {
        let elapsed = elapsed_days_between(state.last_review, now);
        self.forgetting_curve(elapsed, state.stability)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        let decay = -DEFAULT_PARAMS[20];
        Self {
            params: DEFAULT_PARAMS,
            request_retention: default_request_retention(),
            maximum_interval: default_maximum_interval(),
            enable_fuzz: true,
            decay,
            factor: 0.9f64.powf(1.0 / decay) - 1.0,
        }
    }
}

/// Fractional days from `since` to `now`, floored at zero.
pub fn elapsed_days_between(since: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match since {
        None => 0.0,
        Some(since) => ((now - since).num_milliseconds() as f64 / MS_PER_DAY).max(0.0),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn constrain_difficulty(d: f64) -> f64 {
    round2(d).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

// Rounding can collapse tiny stabilities to zero; keep them positive without
// ever raising a value above the pre-review stability.
fn floor_stability(s: f64, previous: f64) -> f64 {
    s.max(MIN_STABILITY.min(previous))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::model::MemoryRecord;

    fn no_fuzz() -> Scheduler {
        Scheduler::new(SchedulerConfig {
            enable_fuzz: false,
            ..Default::default()
        })
        .unwrap()
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn reviewed(difficulty: f64, stability: f64, last_review_days_ago: i64) -> MemoryState {
        MemoryRecord {
            difficulty,
            stability,
            last_review: Some(now() - Duration::days(last_review_days_ago)),
            next_review: Some(now()),
            interval: 3,
            repetitions: 2,
            ..Default::default()
        }
        .try_into()
        .unwrap()
    }

    #[test]
    fn derived_constants() {
        let s = Scheduler::default();
        assert!((s.decay() + 0.1542).abs() < 1e-12);
        assert!(s.factor() > 0.0);
        // FACTOR is defined so that recall hits 90% after `stability` days
        assert!((s.forgetting_curve(10.0, 10.0) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn default_matches_default_config() {
        let built = Scheduler::new(SchedulerConfig::default()).unwrap();
        let default = Scheduler::default();
        assert_eq!(built.params(), default.params());
        assert_eq!(built.factor(), default.factor());
        assert!(built.fuzz_enabled());
        assert_eq!(built.maximum_interval(), 36500);
    }

    #[test]
    fn config_validation() {
        let short = SchedulerConfig {
            params: vec![1.0; 20],
            ..Default::default()
        };
        assert!(matches!(
            Scheduler::new(short),
            Err(SchedulerError::InvalidParams(_))
        ));

        let mut params = DEFAULT_PARAMS.to_vec();
        params[20] = 0.0;
        assert!(Scheduler::new(SchedulerConfig {
            params,
            ..Default::default()
        })
        .is_err());

        let mut params = DEFAULT_PARAMS.to_vec();
        params[3] = f64::NAN;
        assert!(Scheduler::new(SchedulerConfig {
            params,
            ..Default::default()
        })
        .is_err());

        for retention in [0.0, 1.0, -0.3, 1.7] {
            assert_eq!(
                Scheduler::new(SchedulerConfig {
                    request_retention: retention,
                    ..Default::default()
                })
                .unwrap_err(),
                SchedulerError::InvalidRetention(retention)
            );
        }

        assert_eq!(
            Scheduler::new(SchedulerConfig {
                maximum_interval: 0,
                ..Default::default()
            })
            .unwrap_err(),
            SchedulerError::InvalidMaximumInterval(0)
        );
    }

    #[test]
    fn forgetting_curve_is_one_at_zero_elapsed() {
        let s = Scheduler::default();
        for stability in [0.01, 0.5, 1.0, 37.2, 5000.0] {
            assert_eq!(s.forgetting_curve(0.0, stability), 1.0);
        }
    }

    #[test]
    fn forgetting_curve_decreases_with_time_and_rises_with_stability() {
        let s = Scheduler::default();
        let mut previous = 1.0;
        for day in 1..=60 {
            let r = s.forgetting_curve(day as f64, 4.0);
            assert!(r < previous);
            previous = r;
        }
        assert!(s.forgetting_curve(10.0, 20.0) > s.forgetting_curve(10.0, 5.0));
    }

    #[test]
    fn interval_equals_stability_at_default_retention() {
        let s = no_fuzz();
        assert_eq!(s.next_interval(10.0, &mut rng()), 10);
        assert_eq!(s.next_interval(2.31, &mut rng()), 2);
        assert_eq!(s.next_interval(0.2, &mut rng()), 1);
    }

    #[test]
    fn higher_retention_shortens_intervals() {
        let strict = Scheduler::new(SchedulerConfig {
            request_retention: 0.95,
            enable_fuzz: false,
            ..Default::default()
        })
        .unwrap();
        assert!(strict.next_interval(20.0, &mut rng()) < no_fuzz().next_interval(20.0, &mut rng()));
    }

    #[test]
    fn interval_is_capped() {
        let s = Scheduler::new(SchedulerConfig {
            maximum_interval: 100,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(s.next_interval(10_000.0, &mut rng()), 100);
    }

    #[test]
    fn fuzz_disabled_is_identity() {
        let s = no_fuzz();
        for x in [0.3, 2.5, 7.0, 19.6, 365.25] {
            assert_eq!(s.apply_fuzz(x, &mut rng()), x);
        }
    }

    #[test]
    fn fuzz_skips_short_intervals() {
        let s = Scheduler::default();
        assert_eq!(s.apply_fuzz(2.4, &mut rng()), 2.4);
    }

    #[test]
    fn fuzz_stays_within_window() {
        let s = Scheduler::default();
        let mut rng = rng();
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..500 {
            let v = s.apply_fuzz(100.0, &mut rng);
            // window is [round(94), round(106)]
            assert!((94.0..=106.0).contains(&v), "out of window: {v}");
            assert_eq!(v.fract(), 0.0);
            seen.insert(v as u32);
        }
        assert!(seen.len() > 5, "fuzz should spread values, saw {seen:?}");
    }

    #[test]
    fn fuzz_is_reproducible_with_a_seed() {
        let s = Scheduler::default();
        let a: Vec<f64> = {
            let mut r = rng();
            (0..10).map(|_| s.apply_fuzz(40.0, &mut r)).collect()
        };
        let b: Vec<f64> = {
            let mut r = rng();
            (0..10).map(|_| s.apply_fuzz(40.0, &mut r)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn fuzz_lower_bound_is_two() {
        let s = Scheduler::default();
        let mut rng = rng();
        for _ in 0..200 {
            let v = s.apply_fuzz(3.0, &mut rng);
            assert!((2.0..=4.0).contains(&v));
        }
    }

    #[test]
    fn init_difficulty_values() {
        let s = Scheduler::default();
        // 6.4133 - e^0 + 1
        assert_eq!(s.init_difficulty(Rating::Again), 6.41);
        assert_eq!(s.init_difficulty(Rating::Hard), 5.11);
        assert_eq!(s.init_difficulty(Rating::Good), 2.12);
        // negative before clamping
        assert_eq!(s.init_difficulty(Rating::Easy), 1.0);
    }

    #[test]
    fn init_stability_uses_first_four_params() {
        let s = Scheduler::default();
        assert_eq!(s.init_stability(Rating::Again), 0.21);
        assert_eq!(s.init_stability(Rating::Hard), 1.29);
        assert_eq!(s.init_stability(Rating::Good), 2.31);
        assert_eq!(s.init_stability(Rating::Easy), 8.3);

        let mut params = DEFAULT_PARAMS.to_vec();
        params[0] = 0.01;
        let s = Scheduler::new(SchedulerConfig {
            params,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(s.init_stability(Rating::Again), 0.1);
    }

    #[test]
    fn init_states_cover_all_ratings() {
        let s = Scheduler::default();
        let states = s.init_states();
        assert_eq!(states[2], (Rating::Good, 2.12, 2.31));
        assert_eq!(states.map(|(r, _, _)| r), Rating::ALL);
    }

    #[test]
    fn next_difficulty_direction() {
        let s = Scheduler::default();
        let d = 5.0;
        assert!(s.next_difficulty(d, Rating::Again) > d);
        assert!(s.next_difficulty(d, Rating::Hard) > d);
        assert!(s.next_difficulty(d, Rating::Easy) < d);
        // good only feels the (tiny) mean reversion
        assert!((s.next_difficulty(d, Rating::Good) - d).abs() < 0.01);
    }

    #[test]
    fn next_difficulty_is_clamped() {
        let s = Scheduler::default();
        assert!(s.next_difficulty(10.0, Rating::Again) <= 10.0);
        assert_eq!(s.next_difficulty(1.0, Rating::Easy), 1.0);
        let d = s.next_difficulty(7.777, Rating::Hard);
        assert_eq!(d, round2(d));
    }

    #[test]
    fn recall_stability_unchanged_at_full_retrievability() {
        let s = Scheduler::default();
        assert_eq!(s.next_recall_stability(5.0, 3.0, 1.0, Rating::Good), 3.0);
    }

    #[test]
    fn recall_stability_grows_and_respects_modifiers() {
        let s = Scheduler::default();
        let good = s.next_recall_stability(5.0, 3.0, 0.8, Rating::Good);
        let hard = s.next_recall_stability(5.0, 3.0, 0.8, Rating::Hard);
        let easy = s.next_recall_stability(5.0, 3.0, 0.8, Rating::Easy);
        assert!(good > 3.0);
        assert!(hard < good);
        assert!(easy > good);
        // harder items grow more slowly
        assert!(s.next_recall_stability(9.0, 3.0, 0.8, Rating::Good) < good);
    }

    #[test]
    fn forget_stability_never_grows() {
        let s = Scheduler::default();
        for stability in [0.01, 0.21, 1.0, 4.5, 30.0, 400.0] {
            for r in [0.0, 0.4, 0.9, 1.0] {
                let next = s.next_forget_stability(6.0, stability, r);
                assert!(next <= stability, "{next} > {stability}");
                assert!(next > 0.0);
            }
        }
    }

    #[test]
    fn forget_stability_stays_positive_after_repeated_lapses() {
        let s = Scheduler::default();
        let mut stability = 0.21;
        for _ in 0..20 {
            stability = s.next_forget_stability(10.0, stability, 1.0);
            assert!(stability > 0.0);
        }
        assert_eq!(stability, MIN_STABILITY);
    }

    #[test]
    fn far_future_review_date_saturates() {
        let s = Scheduler::new(SchedulerConfig {
            maximum_interval: 200_000_000,
            enable_fuzz: false,
            ..Default::default()
        })
        .unwrap();
        let state: MemoryState = MemoryRecord {
            difficulty: 5.0,
            stability: 150_000_000.0,
            repetitions: 3,
            interval: 30,
            ..Default::default()
        }
        .try_into()
        .unwrap();

        let next = s.process_review(
            &ItemState::Reviewed(state),
            Rating::Good,
            now(),
            None,
            &mut rng(),
        );
        assert!(next.interval() > 100_000_000);
        assert_eq!(next.next_review(), Some(DateTime::<Utc>::MAX_UTC));
        assert!(!s.is_due(&next, now()));
    }

    #[test]
    fn unseen_good_review() {
        let s = no_fuzz();
        let next = s.process_review(&ItemState::Unseen, Rating::Good, now(), None, &mut rng());

        let d0 = s.init_difficulty(Rating::Good);
        let s0 = s.init_stability(Rating::Good);
        assert_eq!(next.difficulty(), s.next_difficulty(d0, Rating::Good));
        assert_eq!(next.stability(), s.next_recall_stability(d0, s0, 1.0, Rating::Good));
        assert_eq!(next.stability(), s0);
        assert_eq!(next.retrievability(), 1.0);
        assert_eq!(next.interval(), 2);
        assert_eq!(next.last_review(), Some(now()));
        assert_eq!(next.next_review(), Some(now() + Duration::days(2)));
        assert_eq!(next.repetitions(), 0);
    }

    #[test]
    fn unseen_again_review_uses_forget_path() {
        let s = no_fuzz();
        let next = s.process_review(&ItemState::Unseen, Rating::Again, now(), None, &mut rng());
        assert!(next.stability() <= s.init_stability(Rating::Again));
        assert!(next.difficulty() >= s.init_difficulty(Rating::Again));
        assert_eq!(next.interval(), 1);
    }

    #[test]
    fn elapsed_time_is_measured_from_last_review() {
        let s = no_fuzz();
        let state = reviewed(5.0, 4.0, 6);
        let next = s.process_review(
            &ItemState::Reviewed(state.clone()),
            Rating::Good,
            now(),
            None,
            &mut rng(),
        );
        assert!((next.retrievability() - s.forgetting_curve(6.0, 4.0)).abs() < 1e-12);
        assert!(next.stability() > state.stability());
    }

    #[test]
    fn explicit_zero_elapsed_override_is_honoured() {
        let s = no_fuzz();
        let state = reviewed(5.0, 4.0, 6);
        let next = s.process_review(
            &ItemState::Reviewed(state),
            Rating::Good,
            now(),
            Some(0.0),
            &mut rng(),
        );
        assert_eq!(next.retrievability(), 1.0);
        assert_eq!(next.stability(), 4.0);
    }

    #[test]
    fn negative_elapsed_override_is_floored() {
        let s = no_fuzz();
        let state = reviewed(5.0, 4.0, 6);
        let next = s.process_review(
            &ItemState::Reviewed(state),
            Rating::Good,
            now(),
            Some(-3.0),
            &mut rng(),
        );
        assert_eq!(next.retrievability(), 1.0);
    }

    #[test]
    fn review_keeps_counters() {
        let s = no_fuzz();
        let state = reviewed(5.0, 4.0, 2);
        let next = s.process_review(
            &ItemState::Reviewed(state),
            Rating::Again,
            now(),
            None,
            &mut rng(),
        );
        assert_eq!(next.repetitions(), 2);
        assert_eq!(next.lapses(), 0);
    }

    #[test]
    fn preview_orders_intervals_by_rating() {
        let s = no_fuzz();
        let state = reviewed(5.0, 10.0, 10);
        let preview = s.preview(&ItemState::Reviewed(state), now(), &mut rng());
        let intervals: Vec<u32> = preview.iter().map(|(_, st)| st.interval()).collect();
        assert!(intervals.windows(2).all(|w| w[0] <= w[1]), "{intervals:?}");
        assert_eq!(preview[0].0, Rating::Again);
    }

    #[test]
    fn due_queries() {
        let s = Scheduler::default();
        let fresh = MemoryState::new(5.0, 1.0).unwrap();
        assert!(s.is_due(&fresh, now()));
        assert_eq!(s.review_priority(&fresh, now()), 1.0);

        let future: MemoryState = MemoryRecord {
            next_review: Some(now() + Duration::hours(1)),
            repetitions: 1,
            ..Default::default()
        }
        .try_into()
        .unwrap();
        assert!(!s.is_due(&future, now()));
        assert_eq!(s.review_priority(&future, now()), 1.0);

        let exactly_now: MemoryState = MemoryRecord {
            next_review: Some(now()),
            repetitions: 1,
            ..Default::default()
        }
        .try_into()
        .unwrap();
        assert!(s.is_due(&exactly_now, now()));
    }

    #[test]
    fn priority_grows_with_lateness() {
        let s = Scheduler::default();
        let overdue = |days: i64| -> MemoryState {
            MemoryRecord {
                next_review: Some(now() - Duration::days(days)),
                repetitions: 1,
                ..Default::default()
            }
            .try_into()
            .unwrap()
        };
        let three = s.review_priority(&overdue(3), now());
        let one = s.review_priority(&overdue(1), now());
        assert!(three > 1.0);
        assert!(three > one);
        assert!((three - 4.0).abs() < 1e-9);
    }

    #[test]
    fn current_retrievability_decays() {
        let s = Scheduler::default();
        let state = reviewed(5.0, 4.0, 4);
        let r = s.current_retrievability(&state, now());
        assert!((r - 0.9).abs() < 1e-9);
    }

    #[test]
    fn elapsed_days_between_is_fractional_and_floored() {
        let later = now() + Duration::hours(36);
        assert!((elapsed_days_between(Some(now()), later) - 1.5).abs() < 1e-12);
        assert_eq!(elapsed_days_between(Some(later), now()), 0.0);
        assert_eq!(elapsed_days_between(None, now()), 0.0);
    }

    #[test]
    fn config_parses_from_toml_with_defaults() {
        let config: SchedulerConfig = toml::from_str("enable_fuzz = false").unwrap();
        assert!(!config.enable_fuzz);
        assert_eq!(config.params.len(), PARAM_COUNT);
        assert_eq!(config.request_retention, 0.9);
        assert_eq!(config.maximum_interval, 36500);
    }
}
