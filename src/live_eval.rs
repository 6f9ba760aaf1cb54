//! REPL-facing live evaluation: per-slot source text, `:mute`/`:unmute`/
//! `:solo` bookkeeping, and assembling the active slots into one program
//! source ready for [`crate::scheduler::Scheduler::set_program`].

use crate::error::ParseResult;
use crate::parser::parse_program_repl;
use crate::term::TermArena;
use std::collections::{HashMap, HashSet};

/// Named buffers of Bog source, each independently muted or soloed. A
/// live-coding session edits one slot at a time; the assembled program is
/// the concatenation of every currently-audible slot.
#[derive(Default)]
pub struct SlotTable {
    slots: HashMap<String, String>,
    muted: HashSet<String>,
    solo: Option<String>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, source: String) {
        self.slots.insert(name.to_string(), source);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    pub fn mute(&mut self, name: &str) {
        self.muted.insert(name.to_string());
    }

    pub fn unmute(&mut self, name: &str) {
        self.muted.remove(name);
    }

    pub fn solo(&mut self, name: &str) {
        self.solo = Some(name.to_string());
    }

    pub fn unsolo(&mut self) {
        self.solo = None;
    }

    /// Concatenates every audible slot's source, in slot-name order for a
    /// deterministic result. If a slot is soloed, only it is audible,
    /// regardless of any other slot's mute state.
    pub fn assemble(&self) -> String {
        let mut names: Vec<&String> = self.slots.keys().collect();
        names.sort();
        let mut out = String::new();
        for name in names {
            let audible = match &self.solo {
                Some(solo_name) => name == solo_name,
                None => !self.muted.contains(name),
            };
            if audible {
                out.push_str(&self.slots[name]);
                out.push('\n');
            }
        }
        out
    }
}

/// Fired with the freshly reassembled program source after any operation
/// that changes which slots are audible.
type EvalCallback = Box<dyn FnMut(&str)>;

/// Drives one REPL-style evaluation loop: validates incoming source before
/// it is allowed into a slot, keeps the slot table, and exposes the last
/// successfully-assembled program text for the transport to pick up.
pub struct LiveEvaluator {
    slots: SlotTable,
    last_assembled: String,
    eval_callbacks: Vec<(u64, EvalCallback)>,
    next_handle: u64,
}

impl LiveEvaluator {
    pub fn new() -> Self {
        LiveEvaluator {
            slots: SlotTable::new(),
            last_assembled: String::new(),
            eval_callbacks: Vec::new(),
            next_handle: 0,
        }
    }

    /// Registers a callback fired with the newly assembled program source
    /// every time `evaluate`/`mute`/`unmute`/`solo`/`unsolo` changes it,
    /// returning a handle usable with [`LiveEvaluator::cancel_eval_callback`].
    pub fn register_eval_callback(&mut self, cb: EvalCallback) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.eval_callbacks.push((handle, cb));
        handle
    }

    pub fn cancel_eval_callback(&mut self, handle: u64) {
        self.eval_callbacks.retain(|(h, _)| *h != handle);
    }

    fn reassemble(&mut self) -> String {
        self.last_assembled = self.slots.assemble();
        for (_, cb) in self.eval_callbacks.iter_mut() {
            cb(&self.last_assembled);
        }
        self.last_assembled.clone()
    }

    /// Parses `text` (purely to validate it — the arena is discarded
    /// afterwards) under the REPL's whitespace/missing-dot conventions,
    /// stores it into `slot` on success, and returns the newly assembled
    /// program source spanning all audible slots.
    pub fn evaluate(&mut self, slot: &str, text: &str) -> ParseResult<String> {
        let arena = TermArena::new();
        parse_program_repl(&arena, text)?;
        self.slots.set(slot, text.to_string());
        Ok(self.reassemble())
    }

    pub fn last_code(&self) -> &str {
        &self.last_assembled
    }

    pub fn mute(&mut self, slot: &str) -> String {
        self.slots.mute(slot);
        self.reassemble()
    }

    pub fn unmute(&mut self, slot: &str) -> String {
        self.slots.unmute(slot);
        self.reassemble()
    }

    pub fn solo(&mut self, slot: &str) -> String {
        self.slots.solo(slot);
        self.reassemble()
    }

    pub fn unsolo(&mut self) -> String {
        self.slots.unsolo();
        self.reassemble()
    }
}

impl Default for LiveEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
