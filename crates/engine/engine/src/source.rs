use std::fmt::{self, Debug, Formatter};

use crate::TargetContainer;


/// A world opened by the engine, which can be saved into a [`TargetContainer`].
pub trait SourceWorld {
    /// The platform tag of the loaded world, if the engine knows it.
    fn platform(&self) -> Option<String>;

    /// The platform tag reported by the format wrapper underneath the world, if any.
    /// When present, it takes precedence over [`SourceWorld::platform`].
    fn wrapper_platform(&self) -> Option<String> {
        None
    }

    /// Which way, if any, this world can be saved into another container.
    fn save_capability(&mut self) -> SaveCapability<'_>;

    /// Release the world. Closing twice should be harmless.
    fn close(&mut self) -> anyhow::Result<()>;
}

/// The save operations an opened world supports.
///
/// Engines differ in whether they can report progress while saving;
/// a world exposes at most one of the two strategies.
pub enum SaveCapability<'a> {
    /// Saving reports progress as it goes. Preferred when available.
    Streaming(&'a mut dyn StreamingSave),
    /// Saving happens in a single call without progress.
    Bulk(&'a mut dyn BulkSave),
    Unsupported,
}

impl SaveCapability<'_> {
    /// Used to display which save strategy is being used.
    #[inline]
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::Streaming(_) => "save_iter",
            Self::Bulk(_)      => "save",
            Self::Unsupported  => "none",
        }
    }
}

impl Debug for SaveCapability<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SaveCapability({})", self.strategy_name())
    }
}

/// Progress of a streaming save, in engine-defined units (usually chunks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveProgress {
    pub done:  u64,
    pub total: u64,
}

impl SaveProgress {
    #[inline]
    pub fn new(done: u64, total: u64) -> Self {
        Self { done, total }
    }

    /// The whole percentage complete, rounded down, or `None` if `total` is zero.
    #[inline]
    pub fn percent(self) -> Option<u64> {
        if self.total == 0 {
            return None;
        }
        let percent = u128::from(self.done) * 100 / u128::from(self.total);
        Some(u64::try_from(percent).unwrap_or(u64::MAX))
    }
}

impl From<(u64, u64)> for SaveProgress {
    #[inline]
    fn from((done, total): (u64, u64)) -> Self {
        Self { done, total }
    }
}

pub trait StreamingSave {
    /// Save this world into `target`, yielding progress after each unit of work.
    ///
    /// An `Err` item means the save failed; the iterator need not be polled further.
    fn save_iter<'a>(
        &'a mut self,
        target: &'a mut dyn TargetContainer,
    ) -> Box<dyn Iterator<Item = anyhow::Result<SaveProgress>> + 'a>;
}

pub trait BulkSave {
    /// Save this world into `target` in one go.
    fn save(&mut self, target: &mut dyn TargetContainer) -> anyhow::Result<()>;
}
