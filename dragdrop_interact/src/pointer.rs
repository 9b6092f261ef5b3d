// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer source: one canonical start/move/end stream over mouse or touch input.
//!
//! The input scheme is resolved once, when the [`PointerConfig`] is built, and never
//! re-examined on the event path.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::Cell;
use core::str::FromStr;

use dragdrop_relay::{HandlerId, Relay};
use dragdrop_surface::NodeId;
use kurbo::Point;

/// Which family of raw events the host delivers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputScheme {
    /// `mousedown` / `mousemove` / `mouseup`.
    #[default]
    Mouse,
    /// `touchstart` / `touchmove` / `touchend`.
    Touch,
}

/// Raw event names for one [`InputScheme`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EventNames {
    /// Press.
    pub start: &'static str,
    /// Motion.
    pub motion: &'static str,
    /// Release.
    pub end: &'static str,
}

impl InputScheme {
    /// Raw event names delivered under this scheme.
    pub const fn event_names(self) -> EventNames {
        match self {
            Self::Mouse => EventNames {
                start: "mousedown",
                motion: "mousemove",
                end: "mouseup",
            },
            Self::Touch => EventNames {
                start: "touchstart",
                motion: "touchmove",
                end: "touchend",
            },
        }
    }
}

/// Error returned when an input scheme name is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown input scheme `{0}` (expected `mouse` or `touch`)")]
pub struct InputSchemeError(String);

impl FromStr for InputScheme {
    type Err = InputSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mouse" => Ok(Self::Mouse),
            "touch" => Ok(Self::Touch),
            other => Err(InputSchemeError(other.to_string())),
        }
    }
}

/// Pointer configuration, resolved once at startup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PointerConfig {
    /// Raw event family.
    pub scheme: InputScheme,
}

impl PointerConfig {
    /// Pick the scheme from a touch capability probe.
    pub fn detect(touch_capable: bool) -> Self {
        Self {
            scheme: if touch_capable {
                InputScheme::Touch
            } else {
                InputScheme::Mouse
            },
        }
    }

    /// Shorthand for `self.scheme.event_names()`.
    pub fn event_names(&self) -> EventNames {
        self.scheme.event_names()
    }
}

/// Canonical pointer phases.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Press.
    Start,
    /// Motion.
    Move,
    /// Release.
    End,
}

/// Pointer button.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Button {
    /// Main button (left mouse button, any touch).
    #[default]
    Primary,
    /// Wheel / middle button.
    Auxiliary,
    /// Context button.
    Secondary,
    /// Any other button index.
    Other(u16),
}

impl Button {
    /// Map a DOM-style button index (`0` primary, `1` auxiliary, `2` secondary).
    pub fn from_index(index: u16) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }
}

/// A normalized pointer event.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    /// Phase.
    pub phase: PointerPhase,
    /// Element the event was delivered to, if known.
    pub target: Option<NodeId>,
    /// Client-space position.
    pub client: Point,
    /// Button (always [`Button::Primary`] for touch).
    pub button: Button,
    prevented: Cell<bool>,
}

impl PointerEvent {
    /// A primary-button event with no target.
    pub fn new(phase: PointerPhase, client: Point) -> Self {
        Self {
            phase,
            target: None,
            client,
            button: Button::Primary,
            prevented: Cell::new(false),
        }
    }

    /// Builder: set the target element.
    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    /// Builder: set the button.
    pub fn with_button(mut self, button: Button) -> Self {
        self.button = button;
        self
    }

    /// Suppress the host's default handling and further propagation.
    pub fn prevent_default(&self) {
        self.prevented.set(true);
    }

    /// Whether a handler called [`PointerEvent::prevent_default`].
    pub fn is_default_prevented(&self) -> bool {
        self.prevented.get()
    }
}

/// Document-level pointer stream.
///
/// Cloning yields another handle to the same stream.
#[derive(Clone, Debug)]
pub struct PointerSource {
    inner: Rc<SourceInner>,
}

#[derive(Debug)]
struct SourceInner {
    config: PointerConfig,
    relay: Relay<PointerPhase, PointerEvent>,
}

impl PointerSource {
    /// Create a stream for the given configuration.
    pub fn new(config: PointerConfig) -> Self {
        Self {
            inner: Rc::new(SourceInner {
                config,
                relay: Relay::new(),
            }),
        }
    }

    /// The configuration this stream was built with.
    pub fn config(&self) -> PointerConfig {
        self.inner.config
    }

    /// Subscribe to a phase.
    pub fn bind(&self, phase: PointerPhase, handler: impl Fn(&PointerEvent) + 'static) -> HandlerId {
        self.inner.relay.bind(phase, handler)
    }

    /// Unsubscribe from a phase.
    pub fn unbind(&self, phase: PointerPhase, id: HandlerId) -> bool {
        self.inner.relay.unbind(phase, id)
    }

    /// Number of listeners for a phase.
    pub fn listener_count(&self, phase: PointerPhase) -> usize {
        self.inner.relay.handler_count(phase)
    }

    /// Map a raw host event onto a canonical [`PointerEvent`].
    ///
    /// Returns `None` for names outside the configured scheme.
    /// `button` is the DOM-style button index and is ignored for touch input.
    pub fn normalize(
        &self,
        name: &str,
        target: Option<NodeId>,
        client: Point,
        button: Option<u16>,
    ) -> Option<PointerEvent> {
        let names = self.inner.config.event_names();
        let phase = if name == names.start {
            PointerPhase::Start
        } else if name == names.motion {
            PointerPhase::Move
        } else if name == names.end {
            PointerPhase::End
        } else {
            return None;
        };
        let button = match self.inner.config.scheme {
            InputScheme::Touch => Button::Primary,
            InputScheme::Mouse => button.map(Button::from_index).unwrap_or_default(),
        };
        Some(PointerEvent {
            phase,
            target,
            client,
            button,
            prevented: Cell::new(false),
        })
    }

    /// Deliver an event to every listener of its phase.
    ///
    /// Returns true if a listener suppressed the default.
    pub fn dispatch(&self, event: &PointerEvent) -> bool {
        self.inner.relay.trigger(event.phase, event);
        event.is_default_prevented()
    }

    /// Normalize and deliver a raw host event. Unknown names are dropped.
    pub fn dispatch_raw(
        &self,
        name: &str,
        target: Option<NodeId>,
        client: Point,
        button: Option<u16>,
    ) -> bool {
        match self.normalize(name, target, client, button) {
            Some(event) => self.dispatch(&event),
            None => false,
        }
    }

    /// Primary-button press on `target`.
    pub fn press(&self, target: NodeId, client: Point) -> bool {
        self.press_with(target, client, Button::Primary)
    }

    /// Press on `target` with an explicit button.
    pub fn press_with(&self, target: NodeId, client: Point, button: Button) -> bool {
        let event = PointerEvent::new(PointerPhase::Start, client)
            .with_target(target)
            .with_button(button);
        self.dispatch(&event)
    }

    /// Motion to `client`.
    pub fn move_to(&self, client: Point) -> bool {
        self.dispatch(&PointerEvent::new(PointerPhase::Move, client))
    }

    /// Release at `client`.
    pub fn release(&self, client: Point) -> bool {
        self.dispatch(&PointerEvent::new(PointerPhase::End, client))
    }
}
