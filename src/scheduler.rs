//! Real-time lookahead scheduler.
//!
//! The scheduler samples the compiled program at a fixed subdivision grid
//! across a lookahead window ahead of the transport clock, queries it for
//! `event(Kind, Note, Vel, T)` solutions with `T` already bound to the
//! sample instant, and dispatches each solution's `Kind` to the matching
//! [`AudioCallbacks`] method, passing the sampled (swing-adjusted) time
//! along so a host can schedule the note at the right lookahead instant
//! rather than play it immediately. Program updates are published by
//! swapping an `Arc` under a lock a live-coding session can write to from a
//! different thread than the one driving ticks; reads never block a writer
//! for long since they only hold the lock long enough to clone the `Arc`.

use crate::clause::Clause;
use crate::env::Env;
use crate::error::ParseResult;
use crate::parser::parse_program;
use crate::resolve::{solve_query, Context, Program};
use crate::term::TermArena;
use crate::unify::subst;
use std::sync::{Arc, RwLock};

const DEFAULT_NOTE: f64 = 48.0;
const DEFAULT_VEL: f64 = 0.7;

/// Sample-triggered instrument callbacks. Every method defaults to a no-op
/// so a host only needs to override the instruments it actually renders.
/// `time` is the swing-adjusted grid instant the scheduler sampled, so a
/// host can schedule the sound at that instant rather than play it
/// immediately.
pub trait AudioCallbacks {
    fn kick(&mut self, _time: f64, _vel: f64) {}
    fn snare(&mut self, _time: f64, _vel: f64) {}
    fn hat(&mut self, _time: f64, _vel: f64) {}
    fn clap(&mut self, _time: f64, _vel: f64) {}
    fn noise(&mut self, _time: f64, _vel: f64) {}
    fn sine(&mut self, _time: f64, _note: f64, _vel: f64) {}
    fn square(&mut self, _time: f64, _note: f64, _vel: f64) {}
    fn triangle(&mut self, _time: f64, _note: f64, _vel: f64) {}
}

/// A no-op implementation used in tests and as a default host.
#[derive(Default)]
pub struct NullCallbacks;
impl AudioCallbacks for NullCallbacks {}

/// Beat-boundary notification, fired with the new integer beat number.
type BeatCallback = Box<dyn FnMut(u64)>;

/// A compiled program: the clauses parsed from a live-coding session's
/// source, borrowing the arena that owns their terms from the caller. The
/// caller is responsible for keeping the arena alive at least as long as
/// every `CompiledProgram` built from it.
pub struct CompiledProgram<'a> {
    arena: &'a TermArena,
    clauses: Vec<Clause<'a>>,
}

impl<'a> CompiledProgram<'a> {
    pub fn compile(arena: &'a TermArena, src: &str) -> ParseResult<Self> {
        let parsed = parse_program(arena, src)?;
        Ok(CompiledProgram { arena, clauses: parsed.clauses })
    }

    pub fn as_program(&self) -> Program<'_, 'a> {
        Program { clauses: &self.clauses, arena: self.arena }
    }
}

pub struct Scheduler<'a> {
    arena: &'a TermArena,
    program: RwLock<Arc<CompiledProgram<'a>>>,
    ctx: Context,
    lookahead_secs: f64,
    subdivision_secs: f64,
    swing: f64,
    running: bool,
    next_sample_index: Option<u64>,
    current_beat: u64,
    beat_callbacks: Vec<(u64, BeatCallback)>,
    next_handle: u64,
}

impl<'a> Scheduler<'a> {
    /// `arena` must outlive the scheduler; every compiled program it holds
    /// borrows terms out of it. `subdivision_secs` is the grid resolution
    /// the scheduler samples the program at; `swing` in `[0, 1)` delays
    /// every second subdivision by that fraction of a subdivision's
    /// duration.
    pub fn new(arena: &'a TermArena, bpm: f64, lookahead_secs: f64, subdivision_secs: f64, swing: f64) -> Self {
        let empty = CompiledProgram::compile(arena, "").expect("empty program always parses");
        Scheduler {
            arena,
            program: RwLock::new(Arc::new(empty)),
            ctx: Context::new(bpm),
            lookahead_secs,
            subdivision_secs,
            swing,
            running: false,
            next_sample_index: None,
            current_beat: 0,
            beat_callbacks: Vec::new(),
            next_handle: 0,
        }
    }

    pub fn with_seed(
        arena: &'a TermArena,
        bpm: f64,
        lookahead_secs: f64,
        subdivision_secs: f64,
        swing: f64,
        seed: u64,
    ) -> Self {
        let mut s = Self::new(arena, bpm, lookahead_secs, subdivision_secs, swing);
        s.ctx = Context::with_seed(bpm, seed);
        s
    }

    /// Compiles `src` against this scheduler's arena and publishes it
    /// atomically; in-flight ticks keep using whichever `Arc` they already
    /// cloned.
    pub fn set_program(&self, src: &str) -> ParseResult<()> {
        let compiled = Arc::new(CompiledProgram::compile(self.arena, src)?);
        *self.program.write().unwrap() = compiled;
        Ok(())
    }

    /// Overrides `bpm`/`swing`/`lookahead_secs`/`subdivision_secs` in place.
    /// Any argument that is not strictly positive leaves the corresponding
    /// parameter unchanged, so a caller can update a single field by
    /// passing `0.0` (or negative) for the rest.
    pub fn configure(&mut self, bpm: f64, swing: f64, lookahead_secs: f64, subdivision_secs: f64) {
        if bpm > 0.0 {
            self.ctx.bpm = bpm;
        }
        if swing > 0.0 {
            self.swing = swing;
        }
        if lookahead_secs > 0.0 {
            self.lookahead_secs = lookahead_secs;
        }
        if subdivision_secs > 0.0 {
            self.subdivision_secs = subdivision_secs;
        }
    }

    /// Starts the transport: resets the beat counter to 0, notifies every
    /// registered beat callback once with beat 0 (the init signal), and
    /// forgets the sample grid position so the next tick re-anchors to
    /// `floor(now / subdivision_secs)` instead of resuming mid-sequence.
    pub fn start(&mut self) {
        self.running = true;
        self.current_beat = 0;
        self.next_sample_index = None;
        self.notify_beat_callbacks(0);
    }

    /// Stops the transport: clears the beat counter and notifies every
    /// registered beat callback once with beat 0.
    pub fn stop(&mut self) {
        self.running = false;
        self.current_beat = 0;
        self.notify_beat_callbacks(0);
    }

    pub fn now(&self) -> f64 {
        self.ctx.now
    }

    /// Registers a callback fired whenever the integer beat number (derived
    /// from the transport clock and current BPM) changes, returning a
    /// handle usable with [`Scheduler::cancel_beat_callback`].
    pub fn register_beat_callback(&mut self, cb: BeatCallback) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.beat_callbacks.push((handle, cb));
        handle
    }

    pub fn cancel_beat_callback(&mut self, handle: u64) {
        self.beat_callbacks.retain(|(h, _)| *h != handle);
    }

    fn notify_beat_callbacks(&mut self, beat: u64) {
        for (_, cb) in self.beat_callbacks.iter_mut() {
            cb(beat);
        }
    }

    fn sample_time(&self, index: u64) -> f64 {
        let base = index as f64 * self.subdivision_secs;
        if index % 2 == 1 {
            base + self.swing * self.subdivision_secs
        } else {
            base
        }
    }

    /// Advances the transport by `dt` seconds and dispatches every event
    /// the lookahead window newly covers.
    pub fn tick(&mut self, dt: f64, callbacks: &mut dyn AudioCallbacks) {
        self.tick_at(self.ctx.now + dt, callbacks);
    }

    /// Advances the transport to `now` directly (useful for tests and for
    /// hosts driving the clock from their own audio callback, including one
    /// whose origin isn't 0).
    pub fn tick_at(&mut self, now: f64, callbacks: &mut dyn AudioCallbacks) {
        if !self.running {
            self.ctx.now = now;
            return;
        }

        let new_beat = (now * self.ctx.bpm / 60.0).floor().max(0.0) as u64;
        if new_beat != self.current_beat {
            self.current_beat = new_beat;
            self.notify_beat_callbacks(new_beat);
        }

        let program_arc = self.program.read().unwrap().clone();
        let program = program_arc.as_program();
        let horizon = now + self.lookahead_secs;

        // Anchor the grid to `floor(now / subdivision_secs)` rather than
        // always resuming from wherever `next_sample_index` last left off:
        // a clock whose origin isn't 0, or a long gap between ticks, would
        // otherwise replay every past grid instant in one unbounded loop.
        let floor_idx = (now / self.subdivision_secs).floor().max(0.0) as u64;
        let mut idx = self.next_sample_index.map_or(floor_idx, |i| i.max(floor_idx));

        loop {
            let t = self.sample_time(idx);
            if t >= horizon {
                break;
            }
            self.query_and_schedule(&program, t, callbacks);
            idx += 1;
        }
        self.next_sample_index = Some(idx);
        self.ctx.now = now;
    }

    fn query_and_schedule(&self, program: &Program, t: f64, callbacks: &mut dyn AudioCallbacks) {
        let arena = program.arena;
        let kind = arena.var("Kind$sched");
        let note = arena.var("Note$sched");
        let vel = arena.var("Vel$sched");
        let time = arena.num(t);
        let goal_term = arena.compound("event", &[kind, note, vel, time]);
        let goal = crate::clause::Goal::Pos(goal_term);

        for env in solve_query(&[goal], program, &self.ctx) {
            self.dispatch(arena, &env, t, kind, note, vel, callbacks);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch(
        &self,
        arena: &TermArena,
        env: &Env,
        t: f64,
        kind: &crate::term::Term,
        note: &crate::term::Term,
        vel: &crate::term::Term,
        callbacks: &mut dyn AudioCallbacks,
    ) {
        let Some(name) = subst(kind, env, arena).as_atom() else { return };
        let vel_val = subst(vel, env, arena).as_num().unwrap_or(DEFAULT_VEL).clamp(0.0, 1.0);
        let note_val = subst(note, env, arena).as_num().unwrap_or(DEFAULT_NOTE);
        match name {
            "kick" => callbacks.kick(t, vel_val),
            "snare" => callbacks.snare(t, vel_val),
            "hat" => callbacks.hat(t, vel_val),
            "clap" => callbacks.clap(t, vel_val),
            "noise" => callbacks.noise(t, vel_val),
            "sine" => callbacks.sine(t, note_val, vel_val),
            "square" => callbacks.square(t, note_val, vel_val),
            "triangle" => callbacks.triangle(t, note_val, vel_val),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counting {
        kicks: usize,
        last_time: f64,
    }
    impl AudioCallbacks for Counting {
        fn kick(&mut self, time: f64, _vel: f64) {
            self.kicks += 1;
            self.last_time = time;
        }
    }

    #[test]
    fn stopped_scheduler_dispatches_nothing() {
        let arena = TermArena::new();
        let mut sched = Scheduler::with_seed(&arena, 120.0, 0.5, 0.1, 0.0, 1);
        sched.set_program("event(kick,36,0.9,T) :- every(T,1).").unwrap();
        let mut cb = Counting::default();
        sched.tick_at(1.0, &mut cb);
        assert_eq!(cb.kicks, 0);
    }

    #[test]
    fn running_scheduler_dispatches_matching_events() {
        let arena = TermArena::new();
        let mut sched = Scheduler::with_seed(&arena, 120.0, 0.2, 0.05, 0.0, 1);
        sched.set_program("event(kick,36,0.9,T) :- every(T,1).").unwrap();
        sched.start();
        let mut cb = Counting::default();
        sched.tick_at(0.05, &mut cb);
        assert!(cb.kicks >= 1);
    }

    #[test]
    fn dispatched_event_carries_the_sampled_time() {
        let arena = TermArena::new();
        let mut sched = Scheduler::with_seed(&arena, 120.0, 0.2, 0.05, 0.0, 1);
        sched.set_program("event(kick,36,0.9,T) :- every(T,1).").unwrap();
        sched.start();
        let mut cb = Counting::default();
        sched.tick_at(2.0, &mut cb);
        assert!(cb.kicks >= 1);
        assert!((cb.last_time - 2.0).abs() < 1e-6);
    }

    #[test]
    fn missing_pitch_and_velocity_fall_back_to_defaults_and_clamp() {
        let arena = TermArena::new();
        let mut sched = Scheduler::with_seed(&arena, 120.0, 0.1, 0.05, 0.0, 1);
        sched.set_program("event(sine,N,V,T) :- every(T,1), N = 60, V = 2.0.").unwrap();
        sched.start();

        struct Capturing {
            notes: Vec<(f64, f64)>,
        }
        impl AudioCallbacks for Capturing {
            fn sine(&mut self, _time: f64, note: f64, vel: f64) {
                self.notes.push((note, vel));
            }
        }
        let mut cb = Capturing { notes: Vec::new() };
        sched.tick_at(0.05, &mut cb);
        assert!(cb.notes.iter().any(|&(_, v)| (v - 1.0).abs() < 1e-9));
    }

    #[test]
    fn a_nonzero_clock_origin_does_not_flood_with_past_events() {
        let arena = TermArena::new();
        let mut sched = Scheduler::with_seed(&arena, 120.0, 0.2, 0.05, 0.0, 1);
        sched.set_program("event(kick,36,0.9,T) :- every(T,1).").unwrap();
        sched.start();
        let mut cb = Counting::default();
        // The very first tick arrives at a large, non-zero `now`; this must
        // not replay every grid instant between 0 and `now`.
        sched.tick_at(1_000.0, &mut cb);
        assert!(cb.kicks <= 8);
    }

    #[test]
    fn beat_callback_fires_on_beat_change_not_per_subdivision() {
        let arena = TermArena::new();
        let mut sched = Scheduler::with_seed(&arena, 60.0, 0.3, 0.1, 0.0, 1); // 1 beat/sec, 10 subdivisions/beat
        sched.set_program("").unwrap();
        sched.start();
        let count = Rc::new(RefCell::new(0));
        let count2 = count.clone();
        sched.register_beat_callback(Box::new(move |_beat| {
            *count2.borrow_mut() += 1;
        }));
        *count.borrow_mut() = 0; // discard the init notification from start()
        let mut cb = NullCallbacks;
        sched.tick_at(0.3, &mut cb); // still within beat 0
        assert_eq!(*count.borrow(), 0);
        sched.tick_at(1.2, &mut cb); // crosses into beat 1
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn cancel_beat_callback_stops_future_firings() {
        let arena = TermArena::new();
        let mut sched = Scheduler::with_seed(&arena, 60.0, 1.0, 0.25, 0.0, 1);
        sched.set_program("").unwrap();
        sched.start();
        let count = Rc::new(RefCell::new(0));
        let count2 = count.clone();
        let handle = sched.register_beat_callback(Box::new(move |_beat| {
            *count2.borrow_mut() += 1;
        }));
        *count.borrow_mut() = 0;
        let mut cb = NullCallbacks;
        sched.tick_at(1.0, &mut cb);
        let after_first = *count.borrow();
        assert!(after_first >= 1);
        sched.cancel_beat_callback(handle);
        sched.tick_at(3.0, &mut cb);
        assert_eq!(*count.borrow(), after_first);
    }

    #[test]
    fn start_resets_beat_and_stop_notifies_with_zero() {
        let arena = TermArena::new();
        let mut sched = Scheduler::with_seed(&arena, 60.0, 0.5, 0.1, 0.0, 1);
        sched.set_program("").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = seen.clone();
        sched.register_beat_callback(Box::new(move |beat| seen2.borrow_mut().push(beat)));
        sched.start();
        let mut cb = NullCallbacks;
        sched.tick_at(2.0, &mut cb);
        sched.stop();
        assert_eq!(*seen.borrow().first().unwrap(), 0);
        assert_eq!(*seen.borrow().last().unwrap(), 0);
    }

    #[test]
    fn configure_ignores_non_positive_overrides() {
        let arena = TermArena::new();
        let mut sched = Scheduler::with_seed(&arena, 120.0, 0.5, 0.1, 0.0, 1);
        sched.configure(0.0, -1.0, 0.0, 0.2);
        assert_eq!(sched.subdivision_secs, 0.2);
        assert_eq!(sched.ctx.bpm, 120.0);
        assert_eq!(sched.swing, 0.0);
    }
}
