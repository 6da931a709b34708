//! Gesture arena: lets several recognizers compete for one pointer.
//!
//! Resolution is queued as [`ArenaVerdict`]s instead of calling back into the
//! members, so a recognizer never re-enters itself while it is resolving. The
//! driver drains the verdicts and forwards them to `accept_gesture` /
//! `reject_gesture`.

use crate::events::PointerId;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::{debug, trace};

/// Identity of a recognizer inside the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "member {}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureDisposition {
    Accepted,
    Rejected,
}

/// Outcome for one member on one pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaVerdict {
    pub pointer: PointerId,
    pub member: MemberId,
    pub disposition: GestureDisposition,
}

/// What a recognizer may ask of the arena.
pub trait GestureArena {
    /// Enter `member` into the arena for `pointer`, opening it if needed.
    fn add(&mut self, pointer: PointerId, member: MemberId);

    /// Declare `member` the winner or withdraw it.
    fn resolve(&mut self, pointer: PointerId, member: MemberId, disposition: GestureDisposition);
}

#[derive(Debug, Default)]
struct Arena {
    members: Vec<MemberId>,
    is_open: bool,
    is_held: bool,
    has_pending_sweep: bool,
    eager_winner: Option<MemberId>,
}

/// Arena bookkeeping for every live pointer.
#[derive(Debug, Default)]
pub struct GestureArenaManager {
    arenas: HashMap<PointerId, Arena>,
    verdicts: VecDeque<ArenaVerdict>,
}

impl GestureArenaManager {
    /// # Returns
    /// A manager with no open arenas and no queued verdicts.
    pub fn new() -> Self {
        Self::default()
    }

    /// # Returns
    /// `true` while `pointer` still has an undecided arena.
    pub fn is_pending(&self, pointer: PointerId) -> bool {
        self.arenas.contains_key(&pointer)
    }

    /// Stop admitting members; resolves at once if the outcome is already known.
    ///
    /// A lone member, or one that accepted while the arena was open, wins here.
    ///
    /// # Arguments
    /// - `pointer`: Pointer whose arena closes, usually right after its down.
    pub fn close(&mut self, pointer: PointerId) {
        let Some(arena) = self.arenas.get_mut(&pointer) else {
            return;
        };
        arena.is_open = false;
        trace!(%pointer, members = arena.members.len(), "arena closed");
        self.try_resolve(pointer);
    }

    /// Force a decision, typically on pointer-up: the first member wins.
    ///
    /// # Arguments
    /// - `pointer`: Pointer whose arena is swept; deferred while held.
    pub fn sweep(&mut self, pointer: PointerId) {
        let Some(arena) = self.arenas.get_mut(&pointer) else {
            return;
        };
        if arena.is_held {
            arena.has_pending_sweep = true;
            trace!(%pointer, "sweep deferred by hold");
            return;
        }
        let Some(arena) = self.arenas.remove(&pointer) else {
            return;
        };
        let mut members = arena.members.into_iter();
        if let Some(winner) = members.next() {
            debug!(%pointer, %winner, "arena swept");
            self.push(pointer, winner, GestureDisposition::Accepted);
            for loser in members {
                self.push(pointer, loser, GestureDisposition::Rejected);
            }
        }
    }

    /// Keep the arena alive past its sweep.
    pub fn hold(&mut self, pointer: PointerId) {
        if let Some(arena) = self.arenas.get_mut(&pointer) {
            arena.is_held = true;
        }
    }

    /// Undo [`Self::hold`], running a sweep that was deferred meanwhile.
    pub fn release(&mut self, pointer: PointerId) {
        let Some(arena) = self.arenas.get_mut(&pointer) else {
            return;
        };
        arena.is_held = false;
        if arena.has_pending_sweep {
            self.sweep(pointer);
        }
    }

    /// Take every verdict produced so far.
    ///
    /// # Returns
    /// Verdicts oldest first, ready for
    /// [`crate::TapAndDragGestureRecognizer::handle_verdict`].
    pub fn drain_verdicts(&mut self) -> Vec<ArenaVerdict> {
        self.verdicts.drain(..).collect()
    }

    fn push(&mut self, pointer: PointerId, member: MemberId, disposition: GestureDisposition) {
        self.verdicts.push_back(ArenaVerdict {
            pointer,
            member,
            disposition,
        });
    }

    fn try_resolve(&mut self, pointer: PointerId) {
        let Some(arena) = self.arenas.get(&pointer) else {
            return;
        };
        if arena.is_open {
            return;
        }
        if arena.members.is_empty() {
            self.arenas.remove(&pointer);
            return;
        }
        let winner = match arena.members.as_slice() {
            [only] => Some(*only),
            _ => arena.eager_winner,
        };
        if let Some(winner) = winner {
            self.resolve_in_favor_of(pointer, winner);
        }
    }

    fn resolve_in_favor_of(&mut self, pointer: PointerId, winner: MemberId) {
        let Some(arena) = self.arenas.remove(&pointer) else {
            return;
        };
        debug!(%pointer, %winner, "arena resolved");
        for member in arena.members {
            if member != winner {
                self.push(pointer, member, GestureDisposition::Rejected);
            }
        }
        self.push(pointer, winner, GestureDisposition::Accepted);
    }
}

impl GestureArena for GestureArenaManager {
    fn add(&mut self, pointer: PointerId, member: MemberId) {
        let arena = self.arenas.entry(pointer).or_insert_with(|| Arena {
            is_open: true,
            ..Arena::default()
        });
        if arena.is_open {
            arena.members.push(member);
        } else {
            // Late joiners lose immediately.
            self.push(pointer, member, GestureDisposition::Rejected);
        }
    }

    fn resolve(&mut self, pointer: PointerId, member: MemberId, disposition: GestureDisposition) {
        let Some(arena) = self.arenas.get_mut(&pointer) else {
            return;
        };
        if !arena.members.contains(&member) {
            return;
        }
        match disposition {
            GestureDisposition::Rejected => {
                arena.members.retain(|candidate| *candidate != member);
                if arena.eager_winner == Some(member) {
                    arena.eager_winner = None;
                }
                self.push(pointer, member, GestureDisposition::Rejected);
                self.try_resolve(pointer);
            }
            GestureDisposition::Accepted => {
                if arena.is_open {
                    arena.eager_winner.get_or_insert(member);
                } else {
                    self.resolve_in_favor_of(pointer, member);
                }
            }
        }
    }
}
