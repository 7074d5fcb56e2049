use std::fmt::{self, Debug, Display, Formatter};


/// Receives the human-readable lines a conversion produces, in order.
///
/// Implemented for every `FnMut(&str)`, so a closure that pushes to a `Vec`,
/// prints, or forwards into a channel can be used directly.
pub trait LogSink {
    fn log(&mut self, line: &str);
}

impl<F: FnMut(&str)> LogSink for F {
    #[inline]
    fn log(&mut self, line: &str) {
        self(line);
    }
}

/// Sends each line both to the caller's sink and to the `log` facade.
pub(crate) struct ConversionLog<'a> {
    sink: &'a mut dyn LogSink,
}

impl<'a> ConversionLog<'a> {
    #[inline]
    pub(crate) fn new(sink: &'a mut dyn LogSink) -> Self {
        Self { sink }
    }

    pub(crate) fn emit<D: Display>(&mut self, line: D) {
        let line = line.to_string();
        log::info!(target: "mcconvert", "{line}");
        self.sink.log(&line);
    }
}

impl Debug for ConversionLog<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionLog").finish_non_exhaustive()
    }
}
