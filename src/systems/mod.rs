//! The Entity-Component-System (ECS) module.
//!
//! This module contains the simulation's components, resources and systems.

pub mod collision;
pub mod components;
pub mod ghost;
pub mod item;
pub mod lifecycle;
pub mod movement;
pub mod phase;

pub use self::collision::*;
pub use self::components::*;
pub use self::ghost::*;
pub use self::item::*;
pub use self::lifecycle::*;
pub use self::movement::*;
pub use self::phase::*;
