//! Pointer activation: a press only becomes a drag once the pointer has
//! travelled far enough, so clicks on cards stay clicks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// What a pointer move means for the current press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// No press in progress
    Idle,
    /// Pressed but below the activation distance
    Pending,
    /// Crossed the activation distance on this move; the drag should start now
    Started,
    /// Already activated by an earlier move
    Active,
}

#[derive(Debug, Clone)]
pub struct ActivationSensor {
    distance: f64,
    origin: Option<Point>,
    current: Point,
    activated: bool,
}

impl ActivationSensor {
    pub fn new(distance: f64) -> Self {
        Self {
            distance: distance.max(0.0),
            origin: None,
            current: Point::default(),
            activated: false,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn press(&mut self, at: Point) {
        self.origin = Some(at);
        self.current = at;
        self.activated = false;
    }

    pub fn move_to(&mut self, to: Point) -> Activation {
        let Some(origin) = self.origin else {
            return Activation::Idle;
        };
        self.current = to;

        if self.activated {
            return Activation::Active;
        }
        if origin.distance(&to) >= self.distance {
            self.activated = true;
            Activation::Started
        } else {
            Activation::Pending
        }
    }

    /// End the press. Returns whether it had become a drag.
    pub fn release(&mut self) -> bool {
        let was_drag = self.activated;
        self.origin = None;
        self.activated = false;
        was_drag
    }

    pub fn is_pressed(&self) -> bool {
        self.origin.is_some()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Offset from the press origin, if pressed
    pub fn total_offset(&self) -> Option<Point> {
        self.origin
            .map(|origin| Point::new(self.current.x - origin.x, self.current.y - origin.y))
    }
}
