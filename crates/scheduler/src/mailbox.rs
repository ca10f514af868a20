//! Last-write-wins hand-off from input collaborators to the frame loop.
//!
//! Pointer tracking, audio analysis and the mood service each publish on
//! their own cadence, possibly from other threads. The scheduler takes one
//! [`MailboxSnapshot`] at the start of every frame; nothing is queued, so
//! intermediate writes between two frames are simply overwritten.

use morphfield_core::{AudioEnergy, PointerPosition, VisualParams};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Slots {
    pointer: Option<PointerPosition>,
    audio: Option<AudioEnergy>,
    params: Option<VisualParams>,
}

/// Cloneable handle to the shared input slots.
#[derive(Debug, Clone, Default)]
pub struct InputMailbox {
    slots: Arc<Mutex<Slots>>,
}

/// What the frame loop read at the start of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MailboxSnapshot {
    /// Latest pointer reading, if any was ever published.
    pub pointer: Option<PointerPosition>,
    /// Latest audio energy, if any was ever published.
    pub audio: Option<AudioEnergy>,
    /// Parameters published since the previous snapshot.
    pub params: Option<VisualParams>,
}

impl InputMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pointer(&self, pointer: PointerPosition) {
        self.lock().pointer = Some(pointer);
    }

    /// Marks the pointer as lost.
    pub fn clear_pointer(&self) {
        self.lock().pointer = Some(PointerPosition::undetected());
    }

    pub fn set_audio(&self, audio: AudioEnergy) {
        self.lock().audio = Some(audio);
    }

    /// Publishes a new parameter bundle, replacing any not yet picked up.
    pub fn set_params(&self, params: VisualParams) {
        self.lock().params = Some(params);
    }

    /// Reads every slot once.
    ///
    /// Pointer and audio are levels and stay until overwritten; parameters
    /// are an event and are consumed.
    pub fn snapshot(&self) -> MailboxSnapshot {
        let mut slots = self.lock();
        MailboxSnapshot {
            pointer: slots.pointer,
            audio: slots.audio,
            params: slots.params.take(),
        }
    }

    // A writer that panicked mid-update leaves plain data behind; keep serving it.
    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
