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

//! MakerNote codecs.
//!
//! A MakerNote is a vendor-specific blob stored in the MakerNote tag.
//! Most vendors lay it out as an IFD of their own, but each has its
//! own header, byte order rule, and base for value offsets.
//! [`identify`] picks the dialect, and [`MakerNote`] parses and
//! re-serializes it.

use crate::diag::Log;
use crate::endian::ByteOrder;
use crate::error::Error;
use crate::util::{self, span};
use crate::value::{self, Format, Value};

pub use self::olympus::OlympusVariant;
pub use self::pentax::PentaxVariant;

mod canon;
mod fuji;
mod olympus;
mod pentax;

/// A MakerNote dialect.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Vendor {
    Canon,
    Fuji,
    /// Olympus, Sanyo, Epson, and Nikon.
    Olympus(OlympusVariant),
    /// Pentax and Casio.
    Pentax(PentaxVariant),
}

/// Identifies the MakerNote dialect from the camera make (the value
/// of the Make tag without the trailing null) and the MakerNote bytes.
///
/// # Examples
/// ```
/// use exifdata::mnote::{identify, Vendor};
/// assert_eq!(identify(Some(&b"Canon"[..]), b""), Some(Vendor::Canon));
/// assert_eq!(identify(Some(&b"Canon"[..]), b"FUJIFILM\x0c\0\0\0"),
///            Some(Vendor::Fuji));
/// assert_eq!(identify(None, b"\0\x01"), None);
/// ```
pub fn identify(make: Option<&[u8]>, data: &[u8]) -> Option<Vendor> {
    // The 00 1b fallback of Pentax is the least specific signature
    // and must be tried last.
    if let Some(v) = olympus::identify(make, data) {
        return Some(Vendor::Olympus(v));
    }
    if fuji::identify(data) {
        return Some(Vendor::Fuji);
    }
    if canon::identify(make) {
        return Some(Vendor::Canon);
    }
    pentax::identify(data).map(Vendor::Pentax)
}

/// An entry in a MakerNote.
///
/// The tag is in the unified numbering of this library, i.e.,
/// dialects with a tag base (Nikon v1, Pentax v2/v3, Casio v2) have
/// the base added.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MnoteEntry {
    tag: u16,
    format: Format,
    components: u32,
    data: Vec<u8>,
}

impl MnoteEntry {
    /// Creates an entry from raw bytes.
    ///
    /// # Errors
    ///
    /// `Error::InvalidFormat` is returned if the length of `data` does
    /// not match the format and the number of components.
    pub fn new(tag: u16, format: Format, components: u32, data: Vec<u8>)
               -> Result<MnoteEntry, Error> {
        match format.size().checked_mul(components as usize) {
            Some(size) if size == data.len() => Ok(MnoteEntry {
                tag: tag, format: format, components: components, data: data,
            }),
            _ => Err(Error::InvalidFormat("Size mismatch")),
        }
    }

    pub fn tag(&self) -> u16 {
        self.tag
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn components(&self) -> u32 {
        self.components
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn value(&self, order: ByteOrder) -> Value {
        Value::decode(self.format, &self.data, order)
    }
}

// Name, title, and description of a vendor tag.
pub(crate) struct TagDesc {
    pub tag: u16,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

fn find_desc(table: &'static [TagDesc], tag: u16) -> Option<&'static TagDesc> {
    table.iter().find(|d| d.tag == tag)
}

// State shared by every dialect.
#[derive(Clone, Debug, Default)]
pub(crate) struct Common {
    entries: Vec<MnoteEntry>,
    order: ByteOrder,
    // Position of the MakerNote value relative to the TIFF header.
    offset: u32,
}

impl Common {
    fn new(order: ByteOrder) -> Common {
        Common { entries: Vec::new(), order: order, offset: 0 }
    }

    fn set_byte_order(&mut self, order: ByteOrder) {
        for e in &mut self.entries {
            value::convert_byte_order(e.format, &mut e.data,
                                      self.order, order);
        }
        self.order = order;
    }
}

// Operations implemented by each dialect.
trait Codec {
    const TAGS: &'static [TagDesc];

    fn common(&self) -> &Common;
    fn common_mut(&mut self) -> &mut Common;

    // `buf` starts at the TIFF header and `offset` is the position of
    // the MakerNote value in it.
    fn load(&mut self, buf: &[u8], offset: usize, log: &mut dyn Log);
    fn save(&self, log: &mut dyn Log) -> Vec<u8>;

    fn set_byte_order(&mut self, order: ByteOrder) {
        self.common_mut().set_byte_order(order);
    }
}

/// A parsed MakerNote of one of the supported dialects.
#[derive(Clone, Debug)]
pub enum MakerNote {
    Canon(canon::Canon),
    Fuji(fuji::Fuji),
    Olympus(olympus::Olympus),
    Pentax(pentax::Pentax),
}

macro_rules! each {
    ($self:expr, $n:ident => $body:expr) => (
        match $self {
            MakerNote::Canon($n) => $body,
            MakerNote::Fuji($n) => $body,
            MakerNote::Olympus($n) => $body,
            MakerNote::Pentax($n) => $body,
        }
    )
}

impl MakerNote {
    /// Creates an empty MakerNote of the dialect.  `order` is the byte
    /// order inherited from the Exif block; dialects that carry their
    /// own byte order override it when loading.
    pub fn new(vendor: Vendor, order: ByteOrder) -> MakerNote {
        match vendor {
            Vendor::Canon => MakerNote::Canon(canon::Canon::new(order)),
            Vendor::Fuji => MakerNote::Fuji(fuji::Fuji::new()),
            Vendor::Olympus(v) =>
                MakerNote::Olympus(olympus::Olympus::new(v, order)),
            Vendor::Pentax(v) =>
                MakerNote::Pentax(pentax::Pentax::new(v, order)),
        }
    }

    pub fn vendor(&self) -> Vendor {
        match self {
            MakerNote::Canon(_) => Vendor::Canon,
            MakerNote::Fuji(_) => Vendor::Fuji,
            MakerNote::Olympus(n) => Vendor::Olympus(n.variant()),
            MakerNote::Pentax(n) => Vendor::Pentax(n.variant()),
        }
    }

    /// Parses the MakerNote.  `buf` starts at the TIFF header and
    /// `offset` is the position of the MakerNote value in it.
    ///
    /// Entries that cannot be read are skipped and reported to `log`.
    /// Entries already read are kept.
    pub fn load(&mut self, buf: &[u8], offset: usize, log: &mut dyn Log) {
        if let Ok(ofs) = u32::try_from(offset) {
            self.set_offset(ofs);
        }
        each!(self, n => n.load(buf, offset, log))
    }

    /// Serializes the MakerNote for the position set by `set_offset`.
    pub fn save(&self, log: &mut dyn Log) -> Vec<u8> {
        each!(self, n => n.save(log))
    }

    /// Re-encodes the entries in `order`.
    pub fn set_byte_order(&mut self, order: ByteOrder) {
        each!(self, n => Codec::set_byte_order(n, order))
    }

    pub fn byte_order(&self) -> ByteOrder {
        each!(self, n => n.common().order)
    }

    /// Sets the position of the MakerNote value relative to the TIFF
    /// header, which some dialects use as the base of value offsets.
    pub fn set_offset(&mut self, offset: u32) {
        each!(self, n => n.common_mut().offset = offset)
    }

    pub fn offset(&self) -> u32 {
        each!(self, n => n.common().offset)
    }

    /// Returns the number of entries.
    pub fn count(&self) -> usize {
        self.entries().len()
    }

    pub fn entries(&self) -> &[MnoteEntry] {
        each!(self, n => &n.common().entries)
    }

    /// Returns the (unified) tag number of the `index`-th entry.
    pub fn tag(&self, index: usize) -> Option<u16> {
        self.entries().get(index).map(|e| e.tag)
    }

    pub fn name(&self, index: usize) -> Option<&'static str> {
        self.desc(index).map(|d| d.name)
    }

    pub fn title(&self, index: usize) -> Option<&'static str> {
        self.desc(index).map(|d| d.title)
    }

    pub fn description(&self, index: usize) -> Option<&'static str> {
        self.desc(index).map(|d| d.description)
    }

    /// Formats the value of the `index`-th entry.
    pub fn value(&self, index: usize) -> Option<String> {
        let e = self.entries().get(index)?;
        Some(value::format_value(e.format, &e.data, self.byte_order()))
    }

    fn desc(&self, index: usize) -> Option<&'static TagDesc> {
        let tag = self.tag(index)?;
        each!(self, n => find_desc(tag_table(n), tag))
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: MnoteEntry) {
        each!(self, n => n.common_mut().entries.push(entry))
    }
}

fn tag_table<C>(_: &C) -> &'static [TagDesc] where C: Codec {
    C::TAGS
}

// Reads `count` 12-byte records starting at `at`.  `tag_base` is added
// to each tag and `value_base` to each value offset.  Records whose
// value does not fit in `buf` are skipped.
fn read_entries(buf: &[u8], at: usize, count: usize, order: ByteOrder,
                tag_base: u16, value_base: usize,
                domain: &'static str, log: &mut dyn Log)
                -> Vec<MnoteEntry> {
    read_entries_with(buf, at, count, order, tag_base, value_base, None,
                      domain, log)
}

// Same as `read_entries`, but an offset that runs past the end of `buf`
// is retried once, `rewind` bytes earlier.
fn read_entries_with(buf: &[u8], at: usize, count: usize, order: ByteOrder,
                     tag_base: u16, value_base: usize, rewind: Option<usize>,
                     domain: &'static str, log: &mut dyn Log)
                     -> Vec<MnoteEntry> {
    let mut entries = Vec::new();
    for i in 0..count {
        let o = match at.checked_add(i * 12)
            .and_then(|o| span(o, 12, buf.len())) {
            Some(r) => r.start,
            None => {
                diag!(log, CorruptData, domain, "Short MakerNote");
                break;
            },
        };
        let tag = order.get_u16(buf, o).wrapping_add(tag_base);
        let code = order.get_u16(buf, o + 2);
        let components = order.get_u32(buf, o + 4);
        diag!(log, Debug, domain, "Loading entry {:#x}...", tag);
        let format = match Format::from_u16(code) {
            Some(f) => f,
            None => {
                diag!(log, CorruptData, domain,
                      "Unknown format {} of tag {:#x}", code, tag);
                continue;
            },
        };
        let size = match format.size().checked_mul(components as usize) {
            Some(s) => s,
            None => {
                diag!(log, CorruptData, domain,
                      "Tag data size overflow ({} x {})",
                      format.size(), components);
                continue;
            },
        };
        let mut dataofs = match size {
            0..=4 => Some(o + 8),
            _ => (order.get_u32(buf, o + 8) as usize).checked_add(value_base),
        };
        if let (Some(d), Some(r)) = (dataofs, rewind) {
            if size > 4 && span(d, size, buf.len()).is_none() {
                diag!(log, Debug, domain,
                      "Inconsistent tag offset; attempting to recover");
                dataofs = d.checked_sub(r);
            }
        }
        let range = match dataofs.and_then(|d| span(d, size, buf.len())) {
            Some(r) => r,
            None => {
                diag!(log, CorruptData, domain,
                      "Tag data past end of buffer ({:?} + {} > {})",
                      dataofs, size, buf.len());
                continue;
            },
        };
        let data = match util::try_copy(&buf[range]) {
            Some(data) => data,
            None => {
                diag!(log, NoMemory, domain,
                      "Could not allocate {} byte(s)", size);
                continue;
            },
        };
        entries.push(MnoteEntry {
            tag: tag, format: format, components: components, data: data,
        });
    }
    entries
}

// Writes 12-byte records for `entries` at `at` in `buf`, which must
// already have room for them.  Values longer than 4 bytes are appended
// to `buf` at even positions, and `value_base` plus the position is
// stored as the offset.
fn write_entries(buf: &mut Vec<u8>, at: usize, entries: &[&MnoteEntry],
                 order: ByteOrder, tag_base: u16, value_base: i64) {
    for (i, e) in entries.iter().enumerate() {
        let o = at + i * 12;
        order.set_u16(buf, o, e.tag.wrapping_sub(tag_base));
        order.set_u16(buf, o + 2, e.format.code());
        order.set_u32(buf, o + 4, e.components);
        if e.data.len() <= 4 {
            buf[o + 8 .. o + 8 + e.data.len()].copy_from_slice(&e.data);
        } else {
            util::pad_even(buf);
            let doff = buf.len();
            buf.extend_from_slice(&e.data);
            order.set_u32(buf, o + 8, (value_base + doff as i64) as u32);
        }
    }
}

// Values this large cannot be part of a JPEG segment.
const MAX_VALUE_SIZE: usize = 65536;

fn savable<'a>(entries: &'a [MnoteEntry], domain: &'static str,
               log: &mut dyn Log) -> Vec<&'a MnoteEntry> {
    entries.iter().filter(|e| {
        if e.data.len() > MAX_VALUE_SIZE {
            diag!(log, CorruptData, domain,
                  "Dropping tag {:#x} of {} bytes", e.tag, e.data.len());
            return false;
        }
        true
    }).collect()
}
