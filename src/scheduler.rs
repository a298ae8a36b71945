//! Last-writer-wins delivery of layout results.
//!
//! Every relayout request takes a fresh [`Generation`]. Only the result of the
//! newest generation is kept; anything older that arrives later is dropped.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use log::{trace, warn};

use crate::placement::{layout, LayoutOutcome};
use crate::profile::LayoutProfile;
use crate::ranker::WordItem;
use crate::{seeded_rng, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Holds the latest accepted result of type `T`.
#[derive(Debug)]
pub struct LayoutSlot<T> {
    issued: u64,
    current: Option<T>,
}

impl<T> Default for LayoutSlot<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            current: None,
        }
    }
}

impl<T> LayoutSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run that supersedes every earlier one. The current result
    /// stays visible until the new one is published.
    pub fn begin(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// Starts a run for new content; the previous result is discarded now.
    pub fn begin_fresh(&mut self) -> Generation {
        self.current = None;
        self.begin()
    }

    /// Stores `value` if `generation` is still the newest. Returns whether it was kept.
    pub fn publish(&mut self, generation: Generation, value: T) -> bool {
        if generation.0 != self.issued {
            trace!(
                "discarding stale layout {} (latest {})",
                generation.0,
                self.issued
            );
            return false;
        }
        self.current = Some(value);
        true
    }

    pub fn latest(&self) -> Generation {
        Generation(self.issued)
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

type Delivery = (Generation, Result<LayoutOutcome>);

/// Runs layout passes on worker threads, keeping only the newest result.
pub struct BackgroundLayout {
    slot: LayoutSlot<LayoutOutcome>,
    sender: Sender<Delivery>,
    receiver: Receiver<Delivery>,
}

impl Default for BackgroundLayout {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            slot: LayoutSlot::new(),
            sender,
            receiver,
        }
    }
}

impl BackgroundLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a layout pass. With `fresh`, the current result is cleared first.
    pub fn request(
        &mut self,
        items: Arc<[WordItem]>,
        profile: LayoutProfile,
        seed: Option<u64>,
        fresh: bool,
    ) -> Generation {
        let generation = if fresh {
            self.slot.begin_fresh()
        } else {
            self.slot.begin()
        };

        let sender = self.sender.clone();
        thread::spawn(move || {
            let mut rng = seeded_rng(seed);
            let result = layout(&items, &profile, &mut rng);
            // receiver gone means the owner was dropped; nothing to deliver
            let _ = sender.send((generation, result));
        });

        generation
    }

    /// Drains finished passes without blocking. Returns whether the current
    /// result changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(delivery) = self.receiver.try_recv() {
            changed |= self.accept(delivery);
        }
        changed
    }

    /// Blocks until the newest requested pass has been delivered.
    pub fn wait(&mut self) -> Option<&LayoutOutcome> {
        let latest = self.slot.latest();
        if latest == Generation(0) {
            return None;
        }
        while let Ok(delivery) = self.receiver.recv() {
            let generation = delivery.0;
            self.accept(delivery);
            if generation == latest {
                break;
            }
        }
        self.slot.current()
    }

    pub fn current(&self) -> Option<&LayoutOutcome> {
        self.slot.current()
    }

    fn accept(&mut self, (generation, result): Delivery) -> bool {
        match result {
            Ok(outcome) => self.slot.publish(generation, outcome),
            Err(e) => {
                warn!("background layout failed: {}", e);
                false
            }
        }
    }
}
