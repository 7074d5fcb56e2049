use std::fs;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::{BatchFailure, BatchRequest, ConversionError, ConversionRequest, ConversionResult};
use crate::{LogSink, ValidationError};
use crate::log_sink::ConversionLog;
use crate::paths::normalize;


/// One world of a batch, paired with the folder it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub source:      PathBuf,
    pub destination: PathBuf,
}

impl BatchItem {
    /// Pair `source` with the folder of `output_root` that has the same name as `source`.
    ///
    /// Returns `None` if `source` does not end in a folder name, such as `/` or `..`.
    pub fn derive(source: &Path, output_root: &Path) -> Option<Self> {
        let name = source.file_name()?;
        Some(Self {
            source:      source.to_owned(),
            destination: output_root.join(name),
        })
    }
}

/// The result of one world of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItemOutcome {
    /// The input path, as it was given.
    pub input:  PathBuf,
    pub result: ConversionResult,
}

/// The individual results of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    items: Vec<BatchItemOutcome>,
}

impl BatchReport {
    #[inline]
    pub fn items(&self) -> &[BatchItemOutcome] {
        &self.items
    }

    pub fn failures(&self) -> Vec<BatchFailure> {
        self.items
            .iter()
            .filter(|item| !item.result.is_success())
            .map(|item| BatchFailure {
                input:   item.input.clone(),
                message: item.result.message().to_owned(),
            })
            .collect()
    }

    /// Fold the batch into a single result, which fails if any world failed.
    pub fn into_result(self) -> ConversionResult {
        let failures = self.failures();

        if failures.is_empty() {
            ConversionResult::succeeded("batch conversion completed")
        } else {
            ConversionError::PartialBatchFailure {
                failures,
                total: self.items.len(),
            }
            .into()
        }
    }
}

/// Convert each world of `request` in order with `convert`, continuing past failures.
///
/// Only a failure to create the output root stops the batch, since nothing could be
/// written without it.
pub(crate) fn run_batch<F>(
    request: &BatchRequest,
    sink:    &mut dyn LogSink,
    mut convert: F,
) -> Result<BatchReport, ConversionError>
where
    F: FnMut(&ConversionRequest, &mut dyn LogSink) -> ConversionResult,
{
    let output_root = normalize(request.output_root())?;
    fs::create_dir_all(&output_root).map_err(|err| {
        ValidationError::Io(Cow::Borrowed("creating the batch output folder"), err)
    })?;

    let total = request.sources().len();
    let mut report = BatchReport::default();

    for (index, input) in request.sources().iter().enumerate() {
        {
            let mut log = ConversionLog::new(&mut *sink);
            log.emit("");
            log.emit(format_args!("=== batch item {} of {total} ===", index + 1));
        }

        let result = match BatchItem::derive(input, &output_root) {
            Some(item) => {
                let item_request = request.item_request(item.source, item.destination);
                convert(&item_request, &mut *sink)
            }
            None => ConversionError::from(ValidationError::InputWithoutName(input.clone())).into(),
        };

        if !result.is_success() {
            log::warn!("batch item {} ({}) failed: {}", index + 1, input.display(), result.message());
        }

        report.items.push(BatchItemOutcome {
            input: input.clone(),
            result,
        });
    }

    Ok(report)
}
