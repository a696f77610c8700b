//! The component side of a replay: models and their deferred effects.

use crate::event::KeyEvent;
use std::fmt;

/// A stateful view driven by discrete messages
///
/// `update` is a pure transition: it consumes the current value and returns
/// the next one together with any follow-up work. `view` must be free of side
/// effects; the harness may call it more often than it snapshots.
pub trait Model: Sized {
    /// Messages the model understands; key input arrives through `From`
    type Msg: From<KeyEvent>;

    /// Work to run once before the first snapshot
    fn init(&self) -> Effect<Self::Msg>;

    /// Apply one message
    fn update(self, msg: Self::Msg) -> (Self, Effect<Self::Msg>);

    /// Render the current state
    fn view(&self) -> String;
}

/// Deferred work that yields at most one follow-up message when forced
pub struct Effect<M> {
    thunk: Option<Box<dyn FnOnce() -> Option<M>>>,
}

impl<M> Effect<M> {
    /// No follow-up work
    #[must_use]
    pub fn none() -> Self {
        Self { thunk: None }
    }

    /// Run `f` when the effect is forced
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Option<M> + 'static,
    {
        Self {
            thunk: Some(Box::new(f)),
        }
    }

    /// Whether there is no work scheduled at all
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.thunk.is_none()
    }

    /// Run the work, returning the follow-up message if any
    pub fn force(self) -> Option<M> {
        self.thunk.and_then(|thunk| thunk())
    }
}

impl<M: 'static> Effect<M> {
    /// Follow up with `msg` as soon as the effect is forced
    #[must_use]
    pub fn emit(msg: M) -> Self {
        Self::new(move || Some(msg))
    }

    /// Transform the message produced by this effect
    #[must_use]
    pub fn map<N, F>(self, f: F) -> Effect<N>
    where
        N: 'static,
        F: FnOnce(M) -> N + 'static,
    {
        match self.thunk {
            None => Effect::none(),
            Some(thunk) => Effect::new(move || thunk().map(f)),
        }
    }
}

impl<M> Default for Effect<M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<M> fmt::Debug for Effect<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Effect::none")
        } else {
            write!(f, "Effect::deferred")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_effect_none() {
        let effect: Effect<u8> = Effect::none();
        assert!(effect.is_none());
        assert_eq!(effect.force(), None);
        assert!(Effect::<u8>::default().is_none());
    }

    #[test]
    fn test_effect_emit() {
        let effect = Effect::emit(7u8);
        assert!(!effect.is_none());
        assert_eq!(effect.force(), Some(7));
    }

    #[test]
    fn test_effect_is_lazy() {
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let effect = Effect::new(move || {
            flag.set(true);
            None::<u8>
        });
        assert!(!ran.get());
        assert_eq!(effect.force(), None);
        assert!(ran.get());
    }

    #[test]
    fn test_effect_map() {
        assert_eq!(Effect::emit(2u8).map(|n| n * 10).force(), Some(20));
        assert!(Effect::<u8>::none().map(|n| n + 1).is_none());
    }

    #[test]
    fn test_effect_debug() {
        assert_eq!(format!("{:?}", Effect::<u8>::none()), "Effect::none");
        assert_eq!(format!("{:?}", Effect::emit(1u8)), "Effect::deferred");
    }
}
