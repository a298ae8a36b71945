//! Pan/zoom state for the live word cloud.
//!
//! Gestures are folded into [`GestureState`] by the pure [`reduce`] function;
//! [`ViewportController`] wraps it with device classification, layout sizing
//! and the decision of when a resize needs a fresh layout.

use log::debug;

use crate::profile::LayoutProfile;

/// Widest viewport still treated as a phone.
pub const MOBILE_BREAKPOINT: f32 = 768.0;
pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile(Orientation),
}

impl DeviceClass {
    pub fn classify(width: f32, height: f32) -> Self {
        if width <= MOBILE_BREAKPOINT {
            let orientation = if width > height {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            };
            Self::Mobile(orientation)
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, Self::Mobile(_))
    }

    /// Size of the box the layout is computed for.
    ///
    /// Phones lay out onto a wider virtual canvas that is explored by
    /// horizontal scrolling instead of squeezing the cloud to fit.
    pub fn layout_size(&self, window_width: f32, container: (f32, f32)) -> (f32, f32) {
        match self {
            Self::Desktop => container,
            Self::Mobile(Orientation::Landscape) => (600.0, container.1),
            Self::Mobile(Orientation::Portrait) => ((1.5 * window_width).max(800.0), container.1),
        }
    }
}

/// Translation and zoom applied to the rendered cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &TouchPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Raw touch input, carrying every contact currently on the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    TouchStart(Vec<TouchPoint>),
    TouchMove(Vec<TouchPoint>),
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    /// Offset of the finger from the translate at touch-down.
    Panning { offset_x: f32, offset_y: f32 },
    /// Finger distance the next pinch step is measured against.
    Pinching { reference_distance: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    pub transform: ViewportTransform,
    pub phase: GesturePhase,
}

/// Applies one gesture event. Inconsistent sequences fall back to idle.
pub fn reduce(state: GestureState, event: &GestureEvent, device: DeviceClass) -> GestureState {
    let transform = state.transform;

    match event {
        GestureEvent::TouchStart(touches) => match touches.as_slice() {
            [touch] => GestureState {
                transform,
                phase: GesturePhase::Panning {
                    offset_x: touch.x - transform.translate_x,
                    offset_y: touch.y - transform.translate_y,
                },
            },
            [a, b] if !device.is_mobile() => GestureState {
                transform,
                phase: GesturePhase::Pinching {
                    reference_distance: a.distance(b),
                },
            },
            _ => state,
        },

        GestureEvent::TouchMove(touches) => match (touches.as_slice(), state.phase) {
            ([touch], GesturePhase::Panning { offset_x, offset_y }) => {
                let translate_y = if device.is_mobile() {
                    transform.translate_y
                } else {
                    touch.y - offset_y
                };
                GestureState {
                    transform: ViewportTransform {
                        translate_x: touch.x - offset_x,
                        translate_y,
                        ..transform
                    },
                    phase: state.phase,
                }
            }
            ([a, b], phase) if !device.is_mobile() => {
                let distance = a.distance(b);
                let scale = match phase {
                    GesturePhase::Pinching { reference_distance } if reference_distance > f32::EPSILON => {
                        (transform.scale * (distance / reference_distance)).clamp(MIN_SCALE, MAX_SCALE)
                    }
                    // second finger arrived mid-gesture: this move only sets the reference
                    _ => transform.scale,
                };
                GestureState {
                    transform: ViewportTransform { scale, ..transform },
                    phase: GesturePhase::Pinching {
                        reference_distance: distance,
                    },
                }
            }
            _ => state,
        },

        GestureEvent::TouchEnd => GestureState {
            transform,
            phase: GesturePhase::Idle,
        },
    }
}

/// Whether a change requires the cloud to be laid out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relayout {
    Required,
    NotRequired,
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    device: DeviceClass,
    window: (f32, f32),
    container: (f32, f32),
    gestures: GestureState,
}

impl ViewportController {
    pub fn new(window: (f32, f32), container: (f32, f32)) -> Self {
        Self {
            device: DeviceClass::classify(window.0, window.1),
            window,
            container,
            gestures: GestureState::default(),
        }
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn transform(&self) -> ViewportTransform {
        self.gestures.transform
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures
    }

    pub fn handle(&mut self, event: &GestureEvent) {
        self.gestures = reduce(self.gestures, event, self.device);
    }

    /// Records a window/container resize.
    ///
    /// Desktop resizes always re-layout. Phones only re-layout when the
    /// device class itself changes, as their layout box is virtual.
    pub fn resize(&mut self, window: (f32, f32), container: (f32, f32)) -> Relayout {
        let device = DeviceClass::classify(window.0, window.1);
        let changed = device != self.device;

        self.window = window;
        self.container = container;
        self.device = device;

        if changed {
            debug!("device class changed to {:?}", device);
            if device.is_mobile() {
                self.gestures.transform.scale = 1.0;
            }
            self.gestures.phase = GesturePhase::Idle;
            return Relayout::Required;
        }

        if device.is_mobile() {
            Relayout::NotRequired
        } else {
            Relayout::Required
        }
    }

    pub fn layout_size(&self) -> (f32, f32) {
        self.device.layout_size(self.window.0, self.container)
    }

    pub fn profile(&self) -> LayoutProfile {
        let (width, height) = self.layout_size();
        LayoutProfile::interactive(width, height)
    }
}
