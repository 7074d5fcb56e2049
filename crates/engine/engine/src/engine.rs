use std::fmt::{self, Display, Formatter};
use std::path::Path;

use mcconvert_datatypes::Platform;

use crate::{SourceWorld, TargetContainer};


/// Entry point into a world-data engine.
///
/// The engine may be shared between threads, but nothing here assumes that two
/// conversions can write through the engine at once.
pub trait WorldEngine: Send + Sync {
    /// Open the world whose folder is at `path`.
    ///
    /// Fails if `path` does not hold a world the engine recognizes.
    fn load_level(&self, path: &Path) -> anyhow::Result<Box<dyn SourceWorld>>;

    /// Construct a container of the given format rooted at `path`.
    ///
    /// Nothing should be written to `path` until
    /// [`TargetContainer::create_and_open`] is called.
    fn new_container(
        &self,
        format: ContainerFormat,
        path:   &Path,
    ) -> anyhow::Result<Box<dyn TargetContainer>>;
}

/// The on-disk layout a target container writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// Region files of chunk NBT, used by Java worlds.
    Anvil,
    /// A LevelDB database with a `level.dat` beside it, used by Bedrock worlds.
    LevelDb,
}

impl ContainerFormat {
    #[inline]
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Java    => Self::Anvil,
            Platform::Bedrock => Self::LevelDb,
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Self::Anvil   => "anvil",
            Self::LevelDb => "leveldb",
        }
    }
}

impl Display for ContainerFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
