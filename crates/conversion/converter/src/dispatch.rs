use std::{io, thread};
use std::thread::JoinHandle;

use crossbeam::channel::{self, Receiver, Sender};

use crate::{BatchRequest, ConversionRequest, ConversionResult, Converter, LogSink};


/// Work that a [`Converter`] can run on a worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionJob {
    Single(ConversionRequest),
    Batch(BatchRequest),
}

impl From<ConversionRequest> for ConversionJob {
    #[inline]
    fn from(request: ConversionRequest) -> Self {
        Self::Single(request)
    }
}

impl From<BatchRequest> for ConversionJob {
    #[inline]
    fn from(request: BatchRequest) -> Self {
        Self::Batch(request)
    }
}

/// Sent by a worker thread, in the order things happen. `Finished` is always last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Log(String),
    Finished(ConversionResult),
}

/// A job running on a worker thread.
#[derive(Debug)]
pub struct ConversionTask {
    events: Receiver<TaskEvent>,
    worker: JoinHandle<()>,
}

impl ConversionTask {
    /// The next event, if one has already arrived.
    #[inline]
    pub fn try_next(&self) -> Option<TaskEvent> {
        self.events.try_recv().ok()
    }

    /// Block until the next event arrives. Returns `None` once every event has been received.
    #[inline]
    pub fn next_event(&self) -> Option<TaskEvent> {
        self.events.recv().ok()
    }

    /// Whether the worker thread has exited. Events may still be waiting to be received.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Pass the remaining log lines to `sink` and wait for the job's result.
    pub fn wait(self, sink: &mut dyn LogSink) -> ConversionResult {
        let mut result = None;

        while let Ok(event) = self.events.recv() {
            match event {
                TaskEvent::Log(line)          => sink.log(&line),
                TaskEvent::Finished(finished) => result = Some(finished),
            }
        }

        if self.worker.join().is_err() {
            log::error!("a conversion worker panicked");
        }

        result.unwrap_or_else(|| ConversionResult::failed("conversion worker stopped unexpectedly"))
    }
}

pub(crate) fn spawn(converter: Converter, job: ConversionJob) -> io::Result<ConversionTask> {
    let (sender, events) = channel::unbounded();

    let worker = thread::Builder::new()
        .name("mcconvert-worker".to_owned())
        .spawn(move || run_job(&converter, &job, &sender))?;

    Ok(ConversionTask { events, worker })
}

fn run_job(converter: &Converter, job: &ConversionJob, sender: &Sender<TaskEvent>) {
    // Sends only fail once the task was dropped, and then nobody is listening.
    let mut forward = |line: &str| {
        let _ = sender.send(TaskEvent::Log(line.to_owned()));
    };

    let result = match job {
        ConversionJob::Single(request) => converter.convert_world(request, &mut forward),
        ConversionJob::Batch(request)  => converter.convert_batch(request, &mut forward),
    };

    let _ = sender.send(TaskEvent::Finished(result));
}
