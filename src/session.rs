//! Live word-cloud session: items, viewport and the current layout together.

use rand_chacha::ChaCha8Rng;

use crate::placement::{layout, LayoutOutcome, PlacedWord};
use crate::ranker::WordItem;
use crate::scheduler::{Generation, LayoutSlot};
use crate::viewport::{GestureEvent, Relayout, ViewportController, ViewportTransform};
use crate::{seeded_rng, Result};

pub struct InteractiveCloud {
    controller: ViewportController,
    items: Vec<WordItem>,
    slot: LayoutSlot<LayoutOutcome>,
    rng: ChaCha8Rng,
}

impl InteractiveCloud {
    pub fn new(window: (f32, f32), container: (f32, f32), seed: Option<u64>) -> Self {
        Self {
            controller: ViewportController::new(window, container),
            items: Vec::new(),
            slot: LayoutSlot::new(),
            rng: seeded_rng(seed),
        }
    }

    /// Replaces the item set. The old placement is gone before the new one is computed.
    pub fn set_items(&mut self, items: Vec<WordItem>) -> Result<()> {
        self.items = items;
        let generation = self.slot.begin_fresh();
        self.run(generation)
    }

    /// Returns whether the resize caused a new layout.
    pub fn resize(&mut self, window: (f32, f32), container: (f32, f32)) -> Result<bool> {
        match self.controller.resize(window, container) {
            Relayout::Required => {
                let generation = self.slot.begin();
                self.run(generation)?;
                Ok(true)
            }
            Relayout::NotRequired => Ok(false),
        }
    }

    pub fn handle_gesture(&mut self, event: &GestureEvent) {
        self.controller.handle(event);
    }

    pub fn placed(&self) -> &[PlacedWord] {
        self.slot
            .current()
            .map(|outcome| outcome.placed.as_slice())
            .unwrap_or_default()
    }

    pub fn outcome(&self) -> Option<&LayoutOutcome> {
        self.slot.current()
    }

    pub fn items(&self) -> &[WordItem] {
        &self.items
    }

    pub fn transform(&self) -> ViewportTransform {
        self.controller.transform()
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    /// A failed pass still replaces the previous layout, which was computed
    /// for a different box.
    fn run(&mut self, generation: Generation) -> Result<()> {
        match layout(&self.items, &self.controller.profile(), &mut self.rng) {
            Ok(outcome) => {
                self.slot.publish(generation, outcome);
                Ok(())
            }
            Err(e) => {
                self.slot.publish(generation, LayoutOutcome::empty());
                Err(e)
            }
        }
    }
}
