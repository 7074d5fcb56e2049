//! An in-memory stand-in for a world-data engine, which can be told to fail at any stage
//! and counts how often worlds and containers are opened and closed.

use std::fs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::bail;
use walkdir::WalkDir;

use mcconvert_datatypes::{Platform, VersionNumber};
use mcconvert_engine::{
    BulkSave, ContainerFormat, SaveCapability, SaveProgress,
    SourceWorld, StreamingSave, TargetContainer, WorldEngine,
};


pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Where a scripted failure happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Load,
    Construct,
    ListVersions,
    Create,
    /// Fails on the second progress step of a streaming save, or immediately for a bulk save.
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SaveMode {
    Streaming(Vec<(u64, u64)>),
    Bulk,
    Unsupported,
}

#[derive(Debug, Clone)]
struct Script {
    save_mode:         SaveMode,
    failure:           Option<Stage>,
    panic_during_save: bool,
    panic_listing:     bool,
    close_fails:       bool,
    via_wrapper:       bool,
    versions:          Vec<VersionNumber>,
    max_world_version: Option<VersionNumber>,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    loads:         AtomicUsize,
    source_closes: AtomicUsize,
    constructions: AtomicUsize,
    closes:        AtomicUsize,
    saves:         AtomicUsize,
    creations:     Mutex<Vec<(Platform, VersionNumber, bool)>>,
}

impl Counters {
    pub(crate) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub(crate) fn source_closes(&self) -> usize {
        self.source_closes.load(Ordering::SeqCst)
    }

    pub(crate) fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    pub(crate) fn container_closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub(crate) fn creations(&self) -> Vec<(Platform, VersionNumber, bool)> {
        self.creations.lock().unwrap().clone()
    }
}

/// Recognizes a folder as a world if it has a `level.dat`; a `db/` folder makes it a
/// Bedrock world and a `region/` folder a Java world.
#[derive(Debug)]
pub(crate) struct FakeEngine {
    script:              Script,
    pub(crate) counters: Arc<Counters>,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self {
            script: Script {
                save_mode:         SaveMode::Streaming(vec![(0, 4), (1, 4), (1, 4), (2, 4), (4, 4)]),
                failure:           None,
                panic_during_save: false,
                panic_listing:     false,
                close_fails:       false,
                via_wrapper:       false,
                versions:          (16..=21).map(|minor| VersionNumber::from([1, minor, 0])).collect(),
                max_world_version: Some(VersionNumber::Scalar(3955)),
            },
            counters: Arc::default(),
        }
    }

    pub(crate) fn failing_at(mut self, stage: Stage) -> Self {
        self.script.failure = Some(stage);
        self
    }

    pub(crate) fn with_save_mode(mut self, save_mode: SaveMode) -> Self {
        self.script.save_mode = save_mode;
        self
    }

    pub(crate) fn with_versions(mut self, versions: Vec<VersionNumber>) -> Self {
        self.script.versions = versions;
        self
    }

    pub(crate) fn without_max_world_version(mut self) -> Self {
        self.script.max_world_version = None;
        self
    }

    pub(crate) fn panicking_during_save(mut self) -> Self {
        self.script.panic_during_save = true;
        self
    }

    pub(crate) fn panicking_while_listing_versions(mut self) -> Self {
        self.script.panic_listing = true;
        self
    }

    pub(crate) fn failing_to_close(mut self) -> Self {
        self.script.close_fails = true;
        self
    }

    /// Report the platform through the world's format wrapper instead of the world itself.
    pub(crate) fn reporting_via_wrapper(mut self) -> Self {
        self.script.via_wrapper = true;
        self
    }
}

impl WorldEngine for FakeEngine {
    fn load_level(&self, path: &Path) -> anyhow::Result<Box<dyn SourceWorld>> {
        self.counters.loads.fetch_add(1, Ordering::SeqCst);

        if self.script.failure == Some(Stage::Load) {
            bail!("the engine could not load {}", path.display());
        }
        if !path.join("level.dat").is_file() {
            bail!("{} is not a recognizable world", path.display());
        }

        let platform = if path.join("db").is_dir() {
            Some(Platform::Bedrock)
        } else if path.join("region").is_dir() {
            Some(Platform::Java)
        } else {
            None
        };

        Ok(Box::new(FakeWorld {
            platform,
            script:   self.script.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }

    fn new_container(
        &self,
        format: ContainerFormat,
        path:   &Path,
    ) -> anyhow::Result<Box<dyn TargetContainer>> {
        if self.script.failure == Some(Stage::Construct) {
            bail!("no {format} support in this engine");
        }
        self.counters.constructions.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakeContainer {
            format,
            path:     path.to_owned(),
            script:   self.script.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct FakeWorld {
    platform: Option<Platform>,
    script:   Script,
    counters: Arc<Counters>,
}

impl SourceWorld for FakeWorld {
    fn platform(&self) -> Option<String> {
        if self.script.via_wrapper {
            None
        } else {
            self.platform.map(|platform| platform.tag().to_owned())
        }
    }

    fn wrapper_platform(&self) -> Option<String> {
        if self.script.via_wrapper {
            self.platform.map(|platform| platform.tag().to_uppercase())
        } else {
            None
        }
    }

    fn save_capability(&mut self) -> SaveCapability<'_> {
        let streaming = matches!(self.script.save_mode, SaveMode::Streaming(_));
        let bulk = self.script.save_mode == SaveMode::Bulk;

        if streaming {
            SaveCapability::Streaming(self)
        } else if bulk {
            SaveCapability::Bulk(self)
        } else {
            SaveCapability::Unsupported
        }
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.counters.source_closes.fetch_add(1, Ordering::SeqCst);
        if self.script.close_fails {
            bail!("the world's lock file could not be released");
        }
        Ok(())
    }
}

impl StreamingSave for FakeWorld {
    fn save_iter<'a>(
        &'a mut self,
        target: &'a mut dyn TargetContainer,
    ) -> Box<dyn Iterator<Item = anyhow::Result<SaveProgress>> + 'a> {
        let steps = match &self.script.save_mode {
            SaveMode::Streaming(steps) => steps.clone(),
            SaveMode::Bulk | SaveMode::Unsupported => Vec::new(),
        };
        let fails = self.script.failure == Some(Stage::Save);
        let panics = self.script.panic_during_save;
        let last_step = steps.len().saturating_sub(1);
        let counters = Arc::clone(&self.counters);

        Box::new(steps.into_iter().enumerate().map(move |(index, (done, total))| {
            if fails && index == 1 {
                bail!("could not translate chunk {done} into {}", target.format_name());
            }
            if panics {
                panic!("chunk {done} has an impossible palette");
            }
            if index == last_step {
                counters.saves.fetch_add(1, Ordering::SeqCst);
            }
            Ok(SaveProgress::new(done, total))
        }))
    }
}

impl BulkSave for FakeWorld {
    fn save(&mut self, target: &mut dyn TargetContainer) -> anyhow::Result<()> {
        if self.script.failure == Some(Stage::Save) {
            bail!("could not save into {}", target.format_name());
        }
        if self.script.panic_during_save {
            panic!("bulk save hit an impossible palette");
        }
        self.counters.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeContainer {
    format:   ContainerFormat,
    path:     PathBuf,
    script:   Script,
    counters: Arc<Counters>,
}

impl FakeContainer {
    fn platform(&self) -> Platform {
        match self.format {
            ContainerFormat::Anvil   => Platform::Java,
            ContainerFormat::LevelDb => Platform::Bedrock,
        }
    }
}

impl TargetContainer for FakeContainer {
    fn format_name(&self) -> &str {
        match self.format {
            ContainerFormat::Anvil   => "FakeAnvilFormat",
            ContainerFormat::LevelDb => "FakeLevelDbFormat",
        }
    }

    fn version_numbers(&self, _platform: Platform) -> anyhow::Result<Vec<VersionNumber>> {
        if self.script.panic_listing {
            panic!("translation tables corrupt");
        }
        if self.script.failure == Some(Stage::ListVersions) {
            bail!("the translation manager has no version data");
        }
        Ok(self.script.versions.clone())
    }

    fn max_world_version(&self) -> Option<(String, VersionNumber)> {
        let platform = self.platform().tag().to_owned();
        self.script
            .max_world_version
            .clone()
            .map(|version| (platform, version))
    }

    fn create_and_open(
        &mut self,
        platform:  Platform,
        version:   &VersionNumber,
        overwrite: bool,
    ) -> anyhow::Result<()> {
        self.counters
            .creations
            .lock()
            .unwrap()
            .push((platform, version.clone(), overwrite));

        if self.script.failure == Some(Stage::Create) {
            bail!("{} is locked by another process", self.path.display());
        }

        fs::create_dir_all(&self.path)?;
        fs::write(self.path.join("fake_container.txt"), format!("{platform} {version}"))?;
        Ok(())
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        if self.script.close_fails {
            bail!("flushing {} failed", self.path.display());
        }
        Ok(())
    }
}

/// Lay out a small world folder that [`FakeEngine`] recognizes as `platform`.
pub(crate) fn make_world(path: &Path, platform: Option<Platform>) {
    fs::create_dir_all(path).unwrap();
    fs::write(path.join("level.dat"), b"\x0a\x00\x00level data").unwrap();
    fs::write(path.join("levelname.txt"), "Test World").unwrap();

    match platform {
        Some(Platform::Java) => {
            fs::create_dir_all(path.join("region")).unwrap();
            fs::create_dir_all(path.join("DIM-1").join("region")).unwrap();
            fs::write(path.join("region").join("r.0.0.mca"), [7_u8; 4096]).unwrap();
            fs::write(path.join("DIM-1").join("region").join("r.-1.0.mca"), [3_u8; 512]).unwrap();
        }
        Some(Platform::Bedrock) => {
            fs::create_dir_all(path.join("db")).unwrap();
            fs::write(path.join("db").join("CURRENT"), "MANIFEST-000002\n").unwrap();
            fs::write(path.join("db").join("000005.ldb"), [9_u8; 2048]).unwrap();
        }
        None => {}
    }
}

/// Every path under `root` (relative to it), with file contents. Folders map to `None`.
pub(crate) fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let relative = entry.path().strip_prefix(root).unwrap().to_owned();
            let contents = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (relative, contents)
        })
        .collect()
}
