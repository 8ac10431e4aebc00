//
// Copyright (c) 2016 KAMADA Ken'ichi.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions
// are met:
// 1. Redistributions of source code must retain the above copyright
//    notice, this list of conditions and the following disclaimer.
// 2. Redistributions in binary form must reproduce the above copyright
//    notice, this list of conditions and the following disclaimer in the
//    documentation and/or other materials provided with the distribution.
//
// THIS SOFTWARE IS PROVIDED BY THE AUTHOR AND CONTRIBUTORS ``AS IS'' AND
// ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED.  IN NO EVENT SHALL THE AUTHOR OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS
// OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION)
// HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT
// LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY
// OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF
// SUCH DAMAGE.
//

//! Diagnostics reported while loading, saving, and fixing Exif data.
//!
//! Malformed input never makes an operation fail.  Instead, the
//! offending unit is skipped and a diagnostic is handed to the sink
//! passed to the operation.

use std::fmt;

/// The class of a diagnostic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LogCode {
    /// Informational, e.g., an empty entry was skipped.
    Debug,
    /// Memory for a unit could not be allocated and the unit was dropped.
    NoMemory,
    /// Structurally invalid offsets, sizes, or signatures.
    CorruptData,
}

impl LogCode {
    pub fn title(self) -> &'static str {
        match self {
            LogCode::Debug => "Debugging information",
            LogCode::NoMemory => "Not enough memory",
            LogCode::CorruptData => "Corrupt data",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            LogCode::Debug => "Debugging information is available.",
            LogCode::NoMemory => "The system could not provide enough memory.",
            LogCode::CorruptData =>
                "The data provided does not follow the specification.",
        }
    }
}

impl fmt::Display for LogCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A sink for diagnostics.
///
/// `domain` names the component that emitted the diagnostic,
/// such as `"ExifData"` or `"ExifMnoteCanon"`.
pub trait Log {
    fn log(&mut self, code: LogCode, domain: &'static str,
           args: fmt::Arguments);
}

/// A sink that forwards diagnostics to the `log` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl Log for LogSink {
    fn log(&mut self, code: LogCode, domain: &'static str,
           args: fmt::Arguments) {
        forward(code, domain, &args);
    }
}

fn forward(code: LogCode, domain: &'static str, args: &fmt::Arguments) {
    match code {
        LogCode::Debug => log::debug!(target: "exifdata", "{}: {}", domain, args),
        _ => log::warn!(target: "exifdata", "{}: {}: {}", domain, code, args),
    }
}

/// A diagnostic record kept by [`Diagnostics`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub code: LogCode,
    pub domain: &'static str,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({}): {}", self.domain, self.code, self.message)
    }
}

/// A sink that records diagnostics and also forwards them
/// to the `log` crate.
///
/// # Examples
/// ```
/// use exifdata::{Diagnostics, ExifData, LogCode};
/// let mut diag = Diagnostics::new();
/// let mut data = ExifData::new();
/// data.load_with(b"II\x2a\x00\x08\x00\x00\x00\x05\x00", &mut diag);
/// assert!(diag.contains(LogCode::Debug));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    /// Returns the recorded diagnostics in the order of emission.
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Returns true if a diagnostic of `code` has been recorded.
    pub fn contains(&self, code: LogCode) -> bool {
        self.records.iter().any(|d| d.code == code)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn into_records(self) -> Vec<Diagnostic> {
        self.records
    }
}

impl Log for Diagnostics {
    fn log(&mut self, code: LogCode, domain: &'static str,
           args: fmt::Arguments) {
        forward(code, domain, &args);
        self.records.push(Diagnostic {
            code: code,
            domain: domain,
            message: args.to_string(),
        });
    }
}

// Shorthand for emitting a diagnostic.
macro_rules! diag {
    ($log:expr, $code:ident, $domain:expr, $($arg:tt)+) => (
        $log.log($crate::diag::LogCode::$code, $domain, format_args!($($arg)+))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect() {
        let mut diag = Diagnostics::new();
        {
            let log: &mut dyn Log = &mut diag;
            diag!(log, CorruptData, "ExifData", "bad offset {}", 12);
            diag!(log, Debug, "ExifData", "skipped");
        }
        assert_eq!(diag.records().len(), 2);
        assert_eq!(diag.records()[0].message, "bad offset 12");
        assert_eq!(diag.records()[0].domain, "ExifData");
        assert!(diag.contains(LogCode::CorruptData));
        assert!(!diag.contains(LogCode::NoMemory));
        assert_eq!(diag.records()[1].to_string(),
                   "ExifData (Debugging information): skipped");
    }
}
