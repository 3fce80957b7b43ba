//! Brain domain: tag-keyed state dispatcher with Enter/Update/Exit lifecycle.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use bevy::prelude::*;

/// A state the dispatcher can drive. `C` is the context every hook mutates.
pub trait State<K, C>: Send + Sync {
    fn tag(&self) -> K;

    fn enter(&mut self, ctx: &mut C);

    /// Per-frame tick. Returning a tag requests a transition.
    fn update(&mut self, ctx: &mut C) -> Option<K>;

    fn exit(&mut self, _ctx: &mut C) {}

    /// Whether a transition into this state while already in it restarts it
    fn supports_reentry(&self) -> bool {
        false
    }

    fn re_enter(&mut self, _ctx: &mut C) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError<K> {
    UnregisteredState(K),
    NotInitialized,
}

impl<K: Debug> std::fmt::Display for DispatchError<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::UnregisteredState(tag) => {
                write!(f, "no state registered for {:?}", tag)
            }
            DispatchError::NotInitialized => write!(f, "state dispatcher was never initialized"),
        }
    }
}

impl<K: Debug> std::error::Error for DispatchError<K> {}

pub struct StateDispatcher<K, C> {
    states: HashMap<K, Box<dyn State<K, C>>>,
    current: Option<K>,
    previous: Option<K>,
}

impl<K, C> Default for StateDispatcher<K, C> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            previous: None,
        }
    }
}

impl<K, C> StateDispatcher<K, C>
where
    K: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `state` under its own tag, replacing any earlier registration.
    pub fn register(&mut self, state: Box<dyn State<K, C>>) {
        self.states.insert(state.tag(), state);
    }

    pub fn with_state(mut self, state: Box<dyn State<K, C>>) -> Self {
        self.register(state);
        self
    }

    pub fn is_registered(&self, tag: K) -> bool {
        self.states.contains_key(&tag)
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn previous(&self) -> Option<K> {
        self.previous
    }

    pub fn is_in(&self, tag: K) -> bool {
        self.current == Some(tag)
    }

    /// Make `tag` current and enter it.
    pub fn initialize(&mut self, tag: K, ctx: &mut C) -> Result<(), DispatchError<K>> {
        if !self.states.contains_key(&tag) {
            error!("Cannot initialize state machine: {:?} is not registered", tag);
            return Err(DispatchError::UnregisteredState(tag));
        }
        if let Some(old) = self.current.take() {
            if let Some(state) = self.states.get_mut(&old) {
                state.exit(ctx);
            }
        }
        self.swap_in(tag, ctx);
        Ok(())
    }

    /// Tick the current state and follow any transition it requests.
    pub fn update(&mut self, ctx: &mut C) -> Result<(), DispatchError<K>> {
        let Some(tag) = self.current else {
            return Err(DispatchError::NotInitialized);
        };
        let next = match self.states.get_mut(&tag) {
            Some(state) => state.update(ctx),
            None => None,
        };
        match next {
            Some(next) => self.change_state(next, ctx),
            None => Ok(()),
        }
    }

    /// Exit the current state and enter `tag`.
    ///
    /// Transitioning into the current state re-enters it when supported and
    /// is otherwise a no-op. An unregistered tag is logged and leaves the
    /// current state active.
    pub fn change_state(&mut self, tag: K, ctx: &mut C) -> Result<(), DispatchError<K>> {
        if !self.states.contains_key(&tag) {
            error!(
                "State change to {:?} rejected: state is not registered (staying in {:?})",
                tag, self.current
            );
            return Err(DispatchError::UnregisteredState(tag));
        }

        if self.current == Some(tag) {
            if let Some(state) = self.states.get_mut(&tag) {
                if state.supports_reentry() {
                    state.re_enter(ctx);
                }
            }
            return Ok(());
        }

        if let Some(old) = self.current {
            if let Some(state) = self.states.get_mut(&old) {
                state.exit(ctx);
            }
        }
        self.swap_in(tag, ctx);
        Ok(())
    }

    fn swap_in(&mut self, tag: K, ctx: &mut C) {
        self.previous = self.current;
        self.current = Some(tag);
        debug!("State {:?} -> {:?}", self.previous, tag);
        if let Some(state) = self.states.get_mut(&tag) {
            state.enter(ctx);
        }
    }
}
