//! Plain data shared by the world conversion crates: which platform a world is
//! encoded for, which way a conversion goes, and which version to target.

mod platform;
mod version;


pub use self::platform::{Direction, Platform, UnknownDirectionError, UnsupportedPlatformError};
pub use self::version::{RequestedVersion, VersionNumber};
