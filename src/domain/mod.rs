//! Domain layer - pure business logic.
//!
//! No I/O and no provider knowledge lives here. Application services feed
//! these types with data obtained through ports.

pub mod analysis;
pub mod dialectic;
pub mod export;
pub mod foundation;
pub mod intent;
pub mod patterns;
pub mod persona;
pub mod settlement;
pub mod training;
