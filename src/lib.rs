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

//! This is a pure-Rust library to load, edit, and save Exif data.
//!
//! An Exif block is parsed into an [`ExifData`] container, which
//! holds five IFDs (0th, 1st, Exif, GPS, and Interoperability), the
//! thumbnail image, and the parsed MakerNote if its dialect is
//! supported.  The container can be modified, normalized to conform
//! to the Exif standard, and encoded back into an Exif block.
//!
//! Malformed input is handled on a best-effort basis: the parts that
//! cannot be read are skipped and reported to a diagnostic sink
//! ([`Log`]), and everything else is kept.
//!
//! # Examples
//!
//! ```
//! use exifdata::{ByteOrder, Diagnostics, Entry, ExifData, Ifd, Tag};
//!
//! let jpeg = b"\xff\xd8\xff\xe1\x00\x22Exif\0\0\
//!              MM\x00\x2a\x00\x00\x00\x08\x00\x01\
//!              \x01\x12\x00\x03\x00\x00\x00\x01\x00\x06\x00\x00\
//!              \x00\x00\x00\x00\xff\xd9";
//! let block = exifdata::get_exif_block(&mut &jpeg[..]).unwrap();
//! let mut diag = Diagnostics::new();
//! let mut data = ExifData::new();
//! data.load_with(&block, &mut diag);
//! let orientation = data.entry(Tag::Orientation).unwrap();
//! assert_eq!(orientation.format_value(data.byte_order()), "6");
//!
//! // Add an entry and change the byte order.
//! let order = data.byte_order();
//! data.ifd_mut(Ifd::Zero).add(Entry::initialize(Tag::XResolution, order));
//! data.set_byte_order(ByteOrder::Intel);
//! let saved = data.save_with(&mut diag);
//! assert!(saved.starts_with(b"Exif\0\0II"));
//! ```
//!
//! # Diagnostics
//!
//! Operations with the `_with` suffix take a [`Log`] sink.
//! [`Diagnostics`] records diagnostics for later inspection and
//! [`LogSink`] forwards them to the `log` crate, which is also what
//! the operations without the suffix do.
//!
//! # MakerNotes
//!
//! The Canon, Fuji, Olympus (with Sanyo, Epson, and Nikon), and Pentax
//! (with Casio) dialects are supported.  See the [`mnote`] module.

pub use diag::{Diagnostic, Diagnostics, Log, LogCode, LogSink};
pub use endian::ByteOrder;
pub use entry::Entry;
pub use error::Error;
pub use exifimpl::{ExifData, Options};
pub use fix::{fix_content, fix_data, fix_entry};
pub use ifd::Directory;
pub use jpeg::{get_exif_block, get_exif_block_from_buf};
pub use mnote::{MakerNote, MnoteEntry, Vendor, identify};
pub use tag::{DataType, Ifd, Support, Tag, mandatory_tags, support_level};
pub use tiff::EXIF_HEADER;
pub use value::{Format, Rational, SRational, Value, format_value};

#[macro_use]
mod diag;
#[cfg(test)]
#[macro_use]
mod tmacro;

mod endian;
mod entry;
mod error;
mod exifimpl;
mod fix;
mod ifd;
mod jpeg;
pub mod mnote;
mod tag;
mod tiff;
mod util;
mod value;
mod writer;
