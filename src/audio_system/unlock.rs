/// Audio autoplay gate
///
/// Platforms refuse to start music before the player has interacted with the
/// game. The gate starts locked, opens on the first interaction and never
/// closes again. Clones share the same flag.
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Kinds of user interaction that unlock audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    Touch,
    Key,
    Pointer,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionKind::Click => write!(f, "click"),
            InteractionKind::Touch => write!(f, "touch"),
            InteractionKind::Key => write!(f, "key"),
            InteractionKind::Pointer => write!(f, "pointer"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AudioUnlockGate {
    unlocked: Arc<AtomicBool>,
}

impl AudioUnlockGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gate that starts open, for hosts without autoplay restrictions
    pub fn unlocked() -> Self {
        Self {
            unlocked: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::Acquire)
    }

    /// Open the gate; returns true only for the call that actually opened it
    pub fn unlock(&self) -> bool {
        let opened = !self.unlocked.swap(true, Ordering::AcqRel);
        if opened {
            tracing::info!("Audio unlocked");
        }
        opened
    }

    /// Record a user interaction; the first one opens the gate
    pub fn observe_interaction(&self, kind: InteractionKind) -> bool {
        if self.is_unlocked() {
            return false;
        }
        tracing::debug!("User interaction ({}) detected, unlocking audio", kind);
        self.unlock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_locked() {
        let gate = AudioUnlockGate::new();
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn test_first_interaction_unlocks_once() {
        let gate = AudioUnlockGate::new();
        assert!(gate.observe_interaction(InteractionKind::Click));
        assert!(gate.is_unlocked());
        assert!(!gate.observe_interaction(InteractionKind::Key));
        assert!(!gate.unlock());
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = AudioUnlockGate::new();
        let other = gate.clone();
        other.unlock();
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_pre_unlocked_gate() {
        assert!(AudioUnlockGate::unlocked().is_unlocked());
    }
}
