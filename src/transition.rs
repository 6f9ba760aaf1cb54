//! Bar-quantized program transitions: swapping in a newly live-coded
//! program only at the next bar boundary, rather than mid-bar, so a change
//! never splits a bar across two versions of the pattern.

use crate::scheduler::Scheduler;

struct Pending {
    handle: u64,
    fire_at_beat: f64,
    source: String,
}

pub struct TransitionManager {
    bar_length_beats: f64,
    pending: Vec<Pending>,
    next_handle: u64,
}

impl TransitionManager {
    pub fn new(bar_length_beats: f64) -> Self {
        TransitionManager { bar_length_beats, pending: Vec::new(), next_handle: 0 }
    }

    /// Queues `source` to become the live program at the next bar boundary
    /// at or after `now_beat`, returning a handle usable with
    /// [`TransitionManager::cancel`].
    pub fn schedule(&mut self, source: String, now_beat: f64) -> u64 {
        let fire_at_beat = (now_beat / self.bar_length_beats).ceil() * self.bar_length_beats;
        let handle = self.next_handle;
        self.next_handle += 1;
        self.pending.push(Pending { handle, fire_at_beat, source });
        handle
    }

    pub fn cancel(&mut self, handle: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Applies every pending transition whose boundary has arrived,
    /// swapping each in turn (in scheduling order) so the last one due at
    /// the same boundary wins. Returns the handles that fired.
    pub fn process(&mut self, current_beat: f64, scheduler: &Scheduler<'_>) -> Vec<u64> {
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].fire_at_beat <= current_beat {
                let p = self.pending.remove(i);
                let _ = scheduler.set_program(&p.source);
                fired.push(p.handle);
            } else {
                i += 1;
            }
        }
        fired
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
