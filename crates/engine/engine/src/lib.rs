//! The narrow set of capabilities that the conversion core needs from a world-data engine.
//!
//! Reading and writing chunk data, translating blocks between versions, and every other
//! part of the binary world formats belong to the engine. This crate only describes how
//! the engine is driven: open a world, create a target container at some version, save
//! one into the other, and close both.

mod container;
mod engine;
mod source;


pub use self::container::TargetContainer;
pub use self::engine::{ContainerFormat, WorldEngine};
pub use self::source::{BulkSave, SaveCapability, SaveProgress, SourceWorld, StreamingSave};

pub use mcconvert_datatypes::{Platform, VersionNumber};
