//! The time keeper: one state machine per folded world.
//!
//! A keeper stretches or compresses daylight and darkness by holding the
//! world clock at fixed points and letting it run in measured stretches:
//!
//! - While a phase still has whole repetitions left, the clock is pinned to
//!   the phase start and allowed to run one full phase length.
//! - A fractional remainder pins the clock part way into the phase so that
//!   exactly the remaining fraction plays out before the boundary.
//! - Once a phase is exhausted, sunset (or sunrise) plays out naturally and
//!   the opposite phase begins with its configured repetition count, re-read
//!   from the configuration at that moment.
//!
//! Every scheduled callback lands on one of two clock values: the start of
//! the held phase or its natural end. Anything else means another authority
//! moved the clock, and the keeper resynchronizes from the live value. The
//! check is a heuristic: an external write that happens to produce one of
//! the two expected values goes unnoticed. A callback delivered late lands
//! past both values too, so the host's jitter causes a resync just like an
//! external write does.
//!
//! All methods take the clock and scheduler by `&mut`, so the
//! read-modify-reschedule sequence is one critical section per call. A
//! multithreaded host must keep that property by locking per world.

use timefold_types::{
    CYCLE_LENGTH, DAY_DURATION, DAY_START, DayTime, HeldPhase, NIGHT_DURATION, NIGHT_START,
    SUNRISE_START, SUNSET_START, WorldId, WorldInfo, WorldTime,
};
use tracing::{debug, info, warn};

use crate::clock::CycleClock;
use crate::config::FoldConfig;
use crate::scheduler::{Scheduler, TaskHandle};

/// Clock geometry of one held phase.
#[derive(Debug, Clone, Copy)]
struct PhaseSpan {
    /// Value the clock is pinned to while holding.
    start: u32,
    /// Natural end of the phase.
    end: u32,
    /// Ticks from `start` to `end`.
    duration: u32,
    /// Ticks from `end` to the start of the opposite phase.
    transition: u32,
}

impl PhaseSpan {
    const fn of(phase: HeldPhase) -> Self {
        match phase {
            HeldPhase::Day => Self {
                start: DAY_START,
                end: SUNSET_START,
                duration: DAY_DURATION,
                transition: NIGHT_START - SUNSET_START,
            },
            HeldPhase::Night => Self {
                start: NIGHT_START,
                end: SUNRISE_START,
                duration: NIGHT_DURATION,
                transition: (CYCLE_LENGTH - SUNRISE_START) + DAY_START,
            },
        }
    }

    /// Whether `time` is a value a scheduled callback may legitimately see.
    const fn expects(self, time: WorldTime) -> bool {
        time.ticks() == self.start || time.ticks() == self.end
    }
}

/// Ticks covered by a fraction of a phase, truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn partial_ticks(duration: u32, fraction: f64) -> u32 {
    // `fraction` is in (0, 1), so the product fits and is non-negative.
    (f64::from(duration) * fraction) as u32
}

/// Day/night folding state for one world.
#[derive(Debug)]
pub struct TimeKeeper {
    /// The world being folded.
    world: WorldInfo,
    /// The coarse phase currently being held.
    phase: HeldPhase,
    /// Whole and fractional phase lengths still to hold before switching.
    remaining: f64,
    /// The one outstanding callback, if any.
    pending: Option<TaskHandle>,
}

impl TimeKeeper {
    /// Create a keeper and synchronize it to the world's current clock.
    ///
    /// The first transition is scheduled to land on the next phase boundary
    /// so the world eases into the fold instead of jumping.
    pub fn start(
        world: WorldInfo,
        config: &FoldConfig,
        clock: &mut dyn CycleClock,
        scheduler: &mut dyn Scheduler,
    ) -> Self {
        let mut keeper = Self {
            world,
            phase: HeldPhase::Day,
            remaining: 0.0,
            pending: None,
        };
        keeper.synchronize(config, clock, scheduler);
        keeper
    }

    /// Run a scheduled callback.
    ///
    /// Handles other than the keeper's own pending task are ignored, so a
    /// callback that raced a cancellation can never run twice.
    pub fn fire(
        &mut self,
        handle: TaskHandle,
        config: &FoldConfig,
        clock: &mut dyn CycleClock,
        scheduler: &mut dyn Scheduler,
    ) {
        if self.pending != Some(handle) {
            debug!(world = self.world.name, ?handle, "Ignoring stale time keeper callback");
            return;
        }
        self.pending = None;

        let Some(now) = clock.time(self.world.id) else {
            warn!(world = self.world.name, "World clock unavailable, time keeper idle");
            return;
        };

        if !PhaseSpan::of(self.phase).expects(now) {
            info!(
                world = self.world.name,
                phase = ?self.phase,
                time = %now,
                "Detected a time change by a third party, restarting the time keeper"
            );
            self.synchronize(config, clock, scheduler);
            return;
        }

        self.hold(config, clock, scheduler);
    }

    /// Cancel the pending callback, if any. The clock stays where it was last
    /// pinned. Calling this more than once has no further effect.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
            debug!(world = self.world.name, "Time keeper stopped");
        }
    }

    /// The world this keeper folds.
    pub const fn world(&self) -> &WorldInfo {
        &self.world
    }

    /// Identity of the folded world.
    pub const fn world_id(&self) -> WorldId {
        self.world.id
    }

    /// The coarse phase currently held.
    pub const fn phase(&self) -> HeldPhase {
        self.phase
    }

    /// Phase lengths still to hold in the current phase.
    pub const fn remaining_repetitions(&self) -> f64 {
        self.remaining
    }

    /// The outstanding callback handle, if any.
    pub const fn pending_task(&self) -> Option<TaskHandle> {
        self.pending
    }

    /// Whether a callback is outstanding.
    pub const fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Four-way time of day from the live clock.
    pub fn day_time(&self, clock: &dyn CycleClock) -> Option<DayTime> {
        clock.time(self.world.id).map(WorldTime::day_time)
    }

    /// Whether the live clock shows a lit sky.
    pub fn is_day(&self, clock: &dyn CycleClock) -> Option<bool> {
        clock.time(self.world.id).map(WorldTime::is_day)
    }

    /// Pick the phase matching the live clock and aim the first callback at
    /// the next boundary, or hold right away when already inside a phase.
    fn synchronize(
        &mut self,
        config: &FoldConfig,
        clock: &mut dyn CycleClock,
        scheduler: &mut dyn Scheduler,
    ) {
        self.pending = None;
        let ratio = config.ratio(&self.world.name);

        if ratio.is_permanent_night() {
            self.phase = HeldPhase::Night;
            self.remaining = 0.0;
            self.hold(config, clock, scheduler);
            return;
        }
        if ratio.is_permanent_day() {
            self.phase = HeldPhase::Day;
            self.remaining = 0.0;
            self.hold(config, clock, scheduler);
            return;
        }

        let Some(now) = clock.time(self.world.id) else {
            warn!(world = self.world.name, "World clock unavailable, time keeper idle");
            return;
        };

        let (phase, wait_for) = match now.day_time() {
            DayTime::Sunrise => (HeldPhase::Day, Some(DAY_START)),
            DayTime::Day => (HeldPhase::Day, None),
            DayTime::Sunset => (HeldPhase::Night, Some(NIGHT_START)),
            DayTime::Night => (HeldPhase::Night, None),
        };
        self.phase = phase;
        self.remaining = ratio.repetitions(phase);

        debug!(
            world = self.world.name,
            time = %now,
            ?phase,
            remaining = self.remaining,
            "Time keeper synchronized"
        );

        match wait_for {
            Some(boundary) => self.reschedule(now.ticks_until(boundary), scheduler),
            None => self.hold(config, clock, scheduler),
        }
    }

    /// One hold/advance step for the current phase.
    fn hold(
        &mut self,
        config: &FoldConfig,
        clock: &mut dyn CycleClock,
        scheduler: &mut dyn Scheduler,
    ) {
        let span = PhaseSpan::of(self.phase);

        if self.remaining >= 1.0 {
            self.pin(span.start, clock);
            self.remaining -= 1.0;
            self.reschedule(u64::from(span.duration), scheduler);
        } else if self.remaining > 0.0 {
            let set_back = partial_ticks(span.duration, self.remaining);
            self.pin(span.end.saturating_sub(set_back), clock);
            self.remaining = 0.0;
            self.reschedule(u64::from(set_back), scheduler);
        } else {
            let next = self.phase.opposite();
            let repetitions = config.ratio(&self.world.name).repetitions(next);
            if repetitions <= 0.0 {
                // The opposite phase never comes: keep holding this one.
                self.pin(span.start, clock);
                self.remaining = 0.0;
                self.reschedule(u64::from(span.duration), scheduler);
            } else {
                self.phase = next;
                self.remaining = repetitions;
                debug!(world = self.world.name, phase = ?next, repetitions, "Phase switched");
                self.reschedule(u64::from(span.transition), scheduler);
            }
        }
    }

    fn pin(&self, ticks: u32, clock: &mut dyn CycleClock) {
        debug!(world = self.world.name, time = ticks, "Pinning clock");
        clock.set_time(self.world.id, WorldTime::from(ticks));
    }

    fn reschedule(&mut self, delay: u64, scheduler: &mut dyn Scheduler) {
        if let Some(stale) = self.pending.take() {
            scheduler.cancel(stale);
        }
        self.pending = Some(scheduler.schedule_after(delay, self.world.id));
    }
}
