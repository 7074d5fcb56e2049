use std::io;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use mcconvert_engine::WorldEngine;

use crate::{BatchReport, BatchRequest, ConversionError, ConversionRequest, ConversionResult};
use crate::{ConversionJob, ConversionTask, ConverterSettings, LogSink};
use crate::{batch, dispatch, pipeline, versions};


/// Converts worlds with a shared [`WorldEngine`].
///
/// Cloning a `Converter` is cheap, and clones share the same engine.
#[derive(Clone)]
pub struct Converter {
    engine:   Arc<dyn WorldEngine>,
    settings: ConverterSettings,
}

impl Converter {
    #[inline]
    pub fn new(engine: Arc<dyn WorldEngine>) -> Self {
        Self::with_settings(engine, ConverterSettings::default())
    }

    #[inline]
    pub fn with_settings(engine: Arc<dyn WorldEngine>, settings: ConverterSettings) -> Self {
        Self { engine, settings }
    }

    #[inline]
    pub fn settings(&self) -> &ConverterSettings {
        &self.settings
    }

    #[inline]
    pub fn engine(&self) -> &dyn WorldEngine {
        self.engine.as_ref()
    }

    /// Convert (or, if no conversion is needed, copy) one world.
    ///
    /// Progress is written to `sink` line by line. Failures never escape as errors or
    /// panics; they are reported by the returned result.
    pub fn convert_world(
        &self,
        request: &ConversionRequest,
        sink:    &mut dyn LogSink,
    ) -> ConversionResult {
        pipeline::convert_world(self.engine.as_ref(), &self.settings, request, sink)
    }

    /// Convert every world of `request`, continuing past worlds that fail.
    ///
    /// The result fails if any world failed, and its details list each failed input
    /// with its message.
    pub fn convert_batch(
        &self,
        request: &BatchRequest,
        sink:    &mut dyn LogSink,
    ) -> ConversionResult {
        self.run_batch(request, sink)
            .map_or_else(ConversionResult::from, BatchReport::into_result)
    }

    /// Like [`Converter::convert_batch`], but keeps the result of each world.
    pub fn run_batch(
        &self,
        request: &BatchRequest,
        sink:    &mut dyn LogSink,
    ) -> Result<BatchReport, ConversionError> {
        batch::run_batch(request, sink, |item, sink| self.convert_world(item, sink))
    }

    /// List the versions the engine can write for `platform`, oldest first.
    ///
    /// Only the newest `limit` versions are returned; `None` uses
    /// [`ConverterSettings::version_list_limit`], and `Some(0)` lists every version.
    pub fn list_target_versions(
        &self,
        platform: &str,
        limit:    Option<usize>,
    ) -> Result<Vec<String>, ConversionError> {
        let limit = limit.or(self.settings.version_list_limit);
        versions::list_target_versions(self.engine.as_ref(), platform, limit)
    }

    /// Run `job` on a worker thread. Its log lines and result arrive through the
    /// returned task.
    pub fn spawn(&self, job: ConversionJob) -> io::Result<ConversionTask> {
        dispatch::spawn(self.clone(), job)
    }
}

impl Debug for Converter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
