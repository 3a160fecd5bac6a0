//! Navigation layer - fragment tokens, template matching and the view state machine

pub mod controller;
pub mod matcher;
pub mod token;

pub use controller::{NavState, NavigationController, NavigationOutcome};
pub use matcher::{resolve, resolve_fragment, resolve_key, ResolvedEndpoint};
pub use token::{anchor_for, NavigationToken};
