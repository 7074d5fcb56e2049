use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use web_time::Instant;

use mcconvert_datatypes::{Platform, RequestedVersion};
use mcconvert_engine::{SaveCapability, SaveProgress, SourceWorld, WorldEngine};

use crate::{ConversionError, ConversionRequest, ConversionResult, ConverterSettings};
use crate::{LogSink, TargetHandle, ValidationError};
use crate::copy::copy_world_tree;
use crate::log_sink::ConversionLog;
use crate::paths::{check_not_nested, check_source, normalize, prepare_destination};
use crate::resolver::resolve_for_container;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Copied,
    Converted,
}

/// Convert one world. Every failure, including a panic inside the engine,
/// is reported through the returned result.
pub(crate) fn convert_world(
    engine:   &dyn WorldEngine,
    settings: &ConverterSettings,
    request:  &ConversionRequest,
    sink:     &mut dyn LogSink,
) -> ConversionResult {
    let started = Instant::now();
    let mut log = ConversionLog::new(sink);

    let outcome = validate(settings, request, &mut log).and_then(|(source, destination)| {
        catch_engine_panic(|| run(engine, request, &source, &destination, &mut log))
    });

    log::debug!(
        "conversion of {} finished after {:?}",
        request.source().display(),
        started.elapsed(),
    );

    match outcome {
        Ok(Outcome::Copied)    => ConversionResult::succeeded("copy completed"),
        Ok(Outcome::Converted) => ConversionResult::succeeded("conversion completed"),
        Err(err) => {
            log::warn!("conversion of {} failed: {err}", request.source().display());
            err.into()
        }
    }
}

/// Everything that can be checked before the engine is involved.
/// The destination is created here if it does not exist yet.
fn validate(
    settings: &ConverterSettings,
    request:  &ConversionRequest,
    log:      &mut ConversionLog<'_>,
) -> Result<(PathBuf, PathBuf), ConversionError> {
    let source = normalize(request.source())?;
    let destination = normalize(request.destination())?;

    log.emit(format_args!("input path: {}", source.display()));
    log.emit(format_args!("output path: {}", destination.display()));

    check_source(&source)?;
    check_not_nested(&source, &destination)?;

    if settings.strict_versions {
        if let RequestedVersion::Unparsed(input) = request.requested_version() {
            return Err(ValidationError::UnparsableVersion(input.clone()).into());
        }
    }

    prepare_destination(&destination)?;

    Ok((source, destination))
}

fn run(
    engine:      &dyn WorldEngine,
    request:     &ConversionRequest,
    source_path: &Path,
    destination: &Path,
    log:         &mut ConversionLog<'_>,
) -> Result<Outcome, ConversionError> {
    let target_platform = request.target_platform();
    log.emit(format_args!("target platform: {target_platform}"));

    let mut source = SourceHandle::open(engine, source_path)?;

    let detected = source.detected_platform();
    if let Some(tag) = &detected {
        log.emit(format_args!("detected source platform: {tag}"));
    }
    let same_platform = detected.as_deref().and_then(Platform::from_tag) == Some(target_platform);

    let outcome = if same_platform
        && !request.force_repair()
        && !request.requested_version().is_explicit()
    {
        log.emit("source and target platform match, copying the world");
        let files = copy_world_tree(source_path, destination)?;
        log.emit(format_args!("copied {files} files"));
        Outcome::Copied
    } else {
        log.emit("starting conversion");
        transcode(
            engine,
            &mut source,
            target_platform,
            request.requested_version(),
            destination,
            log,
        )?;
        Outcome::Converted
    };

    source.release_quietly();
    Ok(outcome)
}

fn transcode(
    engine:      &dyn WorldEngine,
    source:      &mut SourceHandle,
    platform:    Platform,
    requested:   &RequestedVersion,
    destination: &Path,
    log:         &mut ConversionLog<'_>,
) -> Result<(), ConversionError> {
    let mut target = TargetHandle::construct(engine, platform, destination)?;

    let version = resolve_for_container(platform, requested, target.container())?;
    log.emit(format_args!("target version: {version}"));

    target.create_and_open(platform, &version)?;
    log.emit(format_args!("created target container: {}", target.label()));

    let saved = save_into(source, &mut target, log);
    target.release_quietly();
    saved
}

fn save_into(
    source: &mut SourceHandle,
    target: &mut TargetHandle,
    log:    &mut ConversionLog<'_>,
) -> Result<(), ConversionError> {
    let capability = source.save_capability();
    log::debug!("saving with the {} strategy", capability.strategy_name());

    match capability {
        SaveCapability::Streaming(world) => {
            log.emit("saving with save_iter...");

            let mut reporter = ProgressReporter::default();
            for step in world.save_iter(target.container_mut()) {
                let progress = step.map_err(ConversionError::Transcode)?;
                if let Some(percent) = reporter.advance(progress) {
                    log.emit(format_args!(
                        "progress: {percent}% ({}/{})",
                        progress.done,
                        progress.total,
                    ));
                }
            }
            Ok(())
        }
        SaveCapability::Bulk(world) => {
            log.emit("saving with save...");
            world
                .save(target.container_mut())
                .map_err(ConversionError::Transcode)
        }
        SaveCapability::Unsupported => Err(ConversionError::SaveUnsupported),
    }
}

/// Turns progress steps into percentages, skipping a percentage equal to the last one.
#[derive(Debug, Default)]
struct ProgressReporter {
    last_percent: Option<u64>,
}

impl ProgressReporter {
    fn advance(&mut self, progress: SaveProgress) -> Option<u64> {
        let percent = progress.percent()?;
        if self.last_percent == Some(percent) {
            None
        } else {
            self.last_percent = Some(percent);
            Some(percent)
        }
    }
}

/// Run `f`, turning a panic inside it into [`ConversionError::EnginePanic`].
pub(crate) fn catch_engine_panic<T, F>(f: F) -> Result<T, ConversionError>
where
    F: FnOnce() -> Result<T, ConversionError>,
{
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(ConversionError::EnginePanic(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

/// Exclusive ownership of an opened source world, closed exactly once.
struct SourceHandle {
    world:  Box<dyn SourceWorld>,
    closed: bool,
}

impl SourceHandle {
    fn open(engine: &dyn WorldEngine, path: &Path) -> Result<Self, ConversionError> {
        let world = engine.load_level(path).map_err(ConversionError::EngineOpen)?;
        Ok(Self {
            world,
            closed: false,
        })
    }

    /// The format wrapper's platform tag takes precedence over the world's own.
    fn detected_platform(&self) -> Option<String> {
        self.world
            .wrapper_platform()
            .filter(|tag| !tag.is_empty())
            .or_else(|| self.world.platform())
            .filter(|tag| !tag.is_empty())
    }

    #[inline]
    fn save_capability(&mut self) -> SaveCapability<'_> {
        self.world.save_capability()
    }

    fn release_quietly(mut self) {
        self.close_quietly();
    }

    fn close_quietly(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(err) = self.world.close() {
                log::warn!("ignoring error while closing the input world: {err:?}");
            }
        }
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.close_quietly();
    }
}

impl Debug for SourceHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceHandle")
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
