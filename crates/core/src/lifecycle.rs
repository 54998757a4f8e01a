//! Per-frame capability traits shared by every sprite and container.
//!
//! A sprite is anything that can be stepped and drawn; a cleanable sprite can
//! additionally flag itself for removal. Containers implement the same traits
//! by forwarding to their elements, so composites nest without any
//! inheritance chain.

use crate::surface::Surface;

/// Advances state by one frame.
pub trait Steppable {
    fn step(&mut self);
}

/// Renders onto a drawing surface.
///
/// Drawing never mutates the element; all state changes happen in
/// [`Steppable::step`] or [`Cleanable::clean`].
pub trait Drawable {
    fn draw(&self, surface: &mut dyn Surface);
}

/// Participates in the compaction pass of a
/// [`CleanableContainer`](crate::cleanable::CleanableContainer).
pub trait Cleanable {
    /// Re-evaluates the removal flag. Called once per compaction pass,
    /// immediately before [`Cleanable::is_to_be_removed`] is read.
    fn clean(&mut self) {}

    /// Whether the owning container should drop this element.
    fn is_to_be_removed(&self) -> bool;
}

/// Capability set: steppable and drawable.
pub trait Sprite: Steppable + Drawable {}

impl<T: Steppable + Drawable + ?Sized> Sprite for T {}

/// Capability set: a sprite that can also be cleaned away.
pub trait CleanableSprite: Sprite + Cleanable {}

impl<T: Sprite + Cleanable + ?Sized> CleanableSprite for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    struct Dot {
        steps: u32,
        dead: bool,
    }

    impl Steppable for Dot {
        fn step(&mut self) {
            self.steps += 1;
        }
    }

    impl Drawable for Dot {
        fn draw(&self, surface: &mut dyn Surface) {
            surface.stroke_weight(self.steps as f64);
        }
    }

    impl Cleanable for Dot {
        fn is_to_be_removed(&self) -> bool {
            self.dead
        }
    }

    fn as_cleanable_sprite(dot: &mut dyn CleanableSprite) -> &mut dyn CleanableSprite {
        dot
    }

    #[test]
    fn blanket_capability_sets_apply() {
        let mut dot = Dot {
            steps: 0,
            dead: false,
        };
        let sprite = as_cleanable_sprite(&mut dot);
        sprite.step();
        sprite.clean();
        assert!(!sprite.is_to_be_removed());

        let mut surface = RecordingSurface::new();
        sprite.draw(&mut surface);
        assert_eq!(surface.commands(), &[DrawCommand::StrokeWeight(1.0)]);
    }

    #[test]
    fn default_clean_leaves_flag_untouched() {
        let mut dot = Dot {
            steps: 0,
            dead: true,
        };
        dot.clean();
        assert!(dot.is_to_be_removed());
    }
}
