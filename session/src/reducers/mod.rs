//! Session reducers.
//!
//! Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
//! Gateway calls and navigation leave the reducer only as effects.

pub mod session;

pub use session::SessionReducer;
