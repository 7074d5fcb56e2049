//! Orchestrates converting Minecraft worlds between the Java and Bedrock storage formats.
//!
//! The actual translation of world data is left to a [`WorldEngine`]. This crate decides
//! whether a conversion is needed at all, picks the version to write, drives the engine,
//! makes sure every world and container it opens is closed again, and reports the outcome
//! as a [`ConversionResult`] instead of an error.

mod batch;
mod converter;
mod copy;
mod dispatch;
mod error;
mod factory;
mod log_sink;
mod paths;
mod pipeline;
mod request;
mod resolver;
mod result;
mod settings;
mod versions;

#[cfg(test)]
mod test_engine;


pub use self::batch::{BatchItem, BatchItemOutcome, BatchReport};
pub use self::converter::Converter;
pub use self::dispatch::{ConversionJob, ConversionTask, TaskEvent};
pub use self::error::{BatchFailure, ConversionError, UnresolvableVersionError, ValidationError};
pub use self::factory::{TargetHandle, open_target};
pub use self::log_sink::LogSink;
pub use self::request::{BatchRequest, ConversionRequest};
pub use self::resolver::{resolve_for_container, resolve_version};
pub use self::result::ConversionResult;
pub use self::settings::{ConverterSettings, SettingsError};

pub use mcconvert_datatypes::{
    Direction, Platform, RequestedVersion, UnsupportedPlatformError, VersionNumber,
};
pub use mcconvert_engine::WorldEngine;
