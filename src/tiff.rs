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

use std::collections::HashSet;

use crate::diag::Log;
use crate::endian::ByteOrder;
use crate::entry::Entry;
use crate::ifd::Directory;
use crate::mnote::{self, MakerNote};
use crate::tag::{Ifd, Tag};
use crate::util::{self, span};
use crate::value::Format;

/// The signature that precedes the TIFF header in an Exif block.
pub const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

// TIFF header magic numbers [EXIF23 4.5.2].
const TIFF_FORTY_TWO: u16 = 0x002a;

// The JPEG APP1 segment limits an Exif block, including its header,
// to this size.  Offsets beyond it are not trusted.
pub const MAX_BLOCK_SIZE: usize = 0xfffe;

const MAX_DEPTH: u32 = 30;

// Directory records read per load, relative to what the TIFF area can
// hold.  Overlapping directories may be read more than once, but not
// beyond this.
const RECORD_BUDGET_FACTOR: usize = 2;

const DOMAIN: &str = "ExifData";

/// The result of parsing an Exif block.
#[derive(Debug, Default)]
pub(crate) struct Parsed {
    pub ifds: [Directory; 5],
    pub order: ByteOrder,
    pub thumbnail: Option<Vec<u8>>,
    pub maker_note: Option<MakerNote>,
}

/// Parses the Exif attributes in the TIFF format.
///
/// `data` may start with "Exif\0\0" or directly with the TIFF header.
/// None is returned if the header is unusable.  Anything past the
/// header is read on a best-effort basis.
pub(crate) fn parse_exif(data: &[u8], ignore_unknown_tags: bool,
                         log: &mut dyn Log) -> Option<Parsed> {
    let full = if data.starts_with(EXIF_HEADER) {
        diag!(log, Debug, DOMAIN, "Found EXIF header.");
        &data[EXIF_HEADER.len()..]
    } else {
        data
    };
    let tiff = &full[..full.len().min(MAX_BLOCK_SIZE - EXIF_HEADER.len())];
    if tiff.len() < 8 {
        diag!(log, CorruptData, DOMAIN,
              "Size of data too small to allow for EXIF data.");
        return None;
    }
    let order = match ByteOrder::from_marker(&tiff[0..2]) {
        Some(order) => order,
        None => {
            diag!(log, CorruptData, DOMAIN, "Unknown encoding.");
            return None;
        },
    };
    if order.get_u16(tiff, 2) != TIFF_FORTY_TWO {
        diag!(log, CorruptData, DOMAIN, "Invalid forty two.");
        return None;
    }

    let mut parser = Parser {
        tiff: tiff,
        order: order,
        ignore_unknown_tags: ignore_unknown_tags,
        ifds: Default::default(),
        thumbnail: None,
        mnote_offset: None,
        loaded: HashSet::new(),
        budget: RECORD_BUDGET_FACTOR * (tiff.len() / 12 + 1),
        log: log,
    };
    let offset = order.get_u32(tiff, 4) as usize;
    diag!(parser.log, Debug, DOMAIN, "IFD 0 at {}.", offset);
    if span(offset, 2, tiff.len()).is_some() {
        parser.parse_ifd(Ifd::Zero, offset, 0);
        parser.parse_next_ifd(offset);
    } else {
        diag!(parser.log, CorruptData, DOMAIN, "Bogus offset of IFD0.");
    }
    let maker_note = parser.interpret_maker_note(full);

    Some(Parsed {
        ifds: parser.ifds,
        order: order,
        thumbnail: parser.thumbnail,
        maker_note: maker_note,
    })
}

struct Parser<'a, 'l> {
    tiff: &'a [u8],
    order: ByteOrder,
    ignore_unknown_tags: bool,
    ifds: [Directory; 5],
    thumbnail: Option<Vec<u8>>,
    // Position of the MakerNote value in the TIFF data.
    mnote_offset: Option<usize>,
    // Directories already read, by role and position.
    loaded: HashSet<(Ifd, usize)>,
    // Remaining number of records that may be read.
    budget: usize,
    log: &'l mut dyn Log,
}

impl<'a, 'l> Parser<'a, 'l> {
    // Parse IFD [EXIF23 4.6.2].
    fn parse_ifd(&mut self, ifd: Ifd, offset: usize, depth: u32) {
        if depth > MAX_DEPTH {
            diag!(self.log, CorruptData, DOMAIN, "Deep recursion detected!");
            return;
        }
        if !self.loaded.insert((ifd, offset)) {
            diag!(self.log, CorruptData, DOMAIN,
                  "IFD '{}' at {} loaded already. Skipping...",
                  ifd.name(), offset);
            return;
        }
        let tiff = self.tiff;
        let order = self.order;
        if span(offset, 2, tiff.len()).is_none() {
            diag!(self.log, CorruptData, DOMAIN,
                  "Tag data past end of buffer ({} > {})",
                  offset as u64 + 2, tiff.len());
            return;
        }
        let mut count = order.get_u16(tiff, offset) as usize;
        diag!(self.log, Debug, DOMAIN, "Loading {} entries...", count);
        let base = offset + 2;
        // (count * 12) never overflows.
        if tiff.len() - base < count * 12 {
            count = (tiff.len() - base) / 12;
            diag!(self.log, Debug, DOMAIN,
                  "Short data; only loading {} entries...", count);
        }
        if count > self.budget {
            count = self.budget;
            diag!(self.log, CorruptData, DOMAIN,
                  "Too many directory entries; only loading {} more.",
                  count);
        }
        self.budget -= count;

        let mut thumbnail_offset = 0;
        let mut thumbnail_length = 0;
        for i in 0..count {
            let rec = base + i * 12;
            let tag = Tag(order.get_u16(tiff, rec));
            if tag.is_pointer() {
                let o = order.get_u32(tiff, rec + 8);
                diag!(self.log, Debug, DOMAIN,
                      "Sub-IFD entry {:#x} ('{}') at {}.",
                      tag.number(), tag, o);
                match tag {
                    Tag::ExifIFDPointer =>
                        self.parse_child_ifd(ifd, Ifd::Exif, o, depth),
                    Tag::GPSInfoIFDPointer =>
                        self.parse_child_ifd(ifd, Ifd::Gps, o, depth),
                    Tag::InteropIFDPointer =>
                        self.parse_child_ifd(ifd, Ifd::Interoperability,
                                             o, depth),
                    Tag::JPEGInterchangeFormat => thumbnail_offset = o,
                    _ => thumbnail_length = o,
                }
                if matches!(tag, Tag::JPEGInterchangeFormat |
                            Tag::JPEGInterchangeFormatLength) &&
                    thumbnail_offset != 0 && thumbnail_length != 0 {
                    self.load_thumbnail(thumbnail_offset as usize,
                                        thumbnail_length as usize);
                }
                continue;
            }

            // Unknown tags are not an error, because newer versions of
            // the standard may define them.  Note that 0 is a valid tag
            // in the GPS IFD.
            if tag.name_in(ifd).is_none() {
                // Tag and format 0 is against the standard, but some
                // writers emit it.
                if tiff[rec..rec + 4] == [0u8; 4] {
                    diag!(self.log, Debug, DOMAIN,
                          "Skipping empty entry at position {} in '{}'.",
                          i, ifd.name());
                    continue;
                }
                diag!(self.log, Debug, DOMAIN,
                      "Unknown tag {:#06x} (entry {} in '{}').",
                      tag.number(), i, ifd.name());
                if self.ignore_unknown_tags {
                    continue;
                }
            }
            if let Some(entry) = self.load_entry(tag, rec) {
                self.ifds[ifd.index()].add_logged(entry, &mut *self.log);
            }
        }
    }

    fn parse_child_ifd(&mut self, parent: Ifd, child: Ifd, offset: u32,
                       depth: u32) {
        if child == parent {
            diag!(self.log, Debug, DOMAIN,
                  "Recursive entry in IFD '{}' detected. Skipping...",
                  child.name());
        } else if !self.ifds[child.index()].is_empty() {
            diag!(self.log, Debug, DOMAIN,
                  "Attempt to load IFD '{}' multiple times detected. \
                   Skipping...", child.name());
        } else {
            self.parse_ifd(child, offset as usize, depth + 1);
        }
    }

    // Follows the next-IFD pointer of IFD0 to IFD1.
    fn parse_next_ifd(&mut self, ifd0: usize) {
        let tiff = self.tiff;
        let count = self.order.get_u16(tiff, ifd0) as usize;
        let at = match span(ifd0 + 2 + count * 12, 4, tiff.len()) {
            Some(r) => r.start,
            None => return,
        };
        let next = self.order.get_u32(tiff, at) as usize;
        if next == 0 {
            return;
        }
        diag!(self.log, Debug, DOMAIN, "IFD 1 at {}.", next);
        if span(next, 2, tiff.len()).is_none() {
            diag!(self.log, CorruptData, DOMAIN, "Bogus offset of IFD1.");
        } else if !self.ifds[Ifd::One.index()].is_empty() {
            diag!(self.log, Debug, DOMAIN,
                  "Attempt to load IFD '{}' multiple times detected. \
                   Skipping...", Ifd::One.name());
        } else {
            self.parse_ifd(Ifd::One, next, 0);
        }
    }

    // Reads the 12-byte record at `rec`.
    fn load_entry(&mut self, tag: Tag, rec: usize) -> Option<Entry> {
        let tiff = self.tiff;
        let order = self.order;
        let code = order.get_u16(tiff, rec + 2);
        let components = order.get_u32(tiff, rec + 4);
        diag!(self.log, Debug, DOMAIN, "Loading entry {:#x} ('{}')...",
              tag.number(), tag);

        // {0,1,2,4,8} x {0x00000000 .. 0xffffffff} fits in a 64-bit
        // usize, but not always in a 32-bit one.
        let (format, size) = match Format::from_u16(code).and_then(
            |f| f.size().checked_mul(components as usize).map(|s| (f, s))) {
            Some((f, s)) if s > 0 => (f, s),
            _ => {
                diag!(self.log, Debug, DOMAIN,
                      "Skipping entry {:#x} with format {} and {} \
                       component(s).", tag.number(), code, components);
                return None;
            },
        };
        let doff = if size > 4 {
            order.get_u32(tiff, rec + 8) as usize
        } else {
            rec + 8
        };
        let range = match span(doff, size, tiff.len()) {
            Some(r) => r,
            None => {
                diag!(self.log, CorruptData, DOMAIN,
                      "Tag data past end of buffer ({} > {})",
                      doff as u64 + size as u64, tiff.len());
                return None;
            },
        };
        let data = match util::try_copy(&tiff[range]) {
            Some(data) => data,
            None => {
                diag!(self.log, NoMemory, DOMAIN,
                      "Could not allocate {} byte(s).", size);
                return None;
            },
        };
        if tag == Tag::MakerNote {
            if data.len() > 6 {
                diag!(self.log, Debug, DOMAIN,
                      "MakerNote found ({:02x?}...).", &data[..7]);
            }
            self.mnote_offset = Some(doff);
        }
        Entry::new(tag, format, components, data).ok()
    }

    fn load_thumbnail(&mut self, offset: usize, len: usize) {
        let range = match span(offset, len, self.tiff.len()) {
            Some(r) => r,
            None => {
                diag!(self.log, CorruptData, DOMAIN,
                      "Bogus thumbnail offset ({}) or size ({}).",
                      offset, len);
                return;
            },
        };
        match util::try_copy(&self.tiff[range]) {
            Some(thumb) => self.thumbnail = Some(thumb),
            None => diag!(self.log, NoMemory, DOMAIN,
                          "Could not allocate {} byte(s).", len),
        }
    }

    // Some MakerNotes point to the space between IFDs, so the codec
    // gets the uncapped data.
    fn interpret_maker_note(&mut self, full: &[u8]) -> Option<MakerNote> {
        let offset = self.mnote_offset?;
        let payload = self.ifds.iter()
            .find_map(|d| d.get(Tag::MakerNote))?.data();
        let make = self.ifds.iter().find_map(|d| d.get(Tag::Make))
            .map(|e| {
                let d = e.data();
                &d[..d.iter().position(|&c| c == 0).unwrap_or(d.len())]
            });
        let vendor = mnote::identify(make, payload)?;
        diag!(self.log, Debug, DOMAIN, "{:?} MakerNote found.", vendor);
        let mut mn = MakerNote::new(vendor, self.order);
        mn.load(full, offset, &mut *self.log);
        Some(mn)
    }
}

pub fn is_tiff(buf: &[u8]) -> bool {
    buf.len() >= 4 &&
        (buf.starts_with(b"MM\0\x2a") || buf.starts_with(b"II\x2a\0"))
}

#[cfg(test)]
mod tests {
    use crate::diag::{Diagnostics, LogCode};
    use super::*;

    const ORIENTATION: &[u8] =
        b"II\x2a\0\x08\0\0\0\
          \x01\0\x12\x01\x03\0\x01\0\0\0\x03\0\0\0\0\0\0\0";

    fn parse(data: &[u8]) -> (Parsed, Diagnostics) {
        let mut diag = Diagnostics::new();
        let p = parse_exif(data, false, &mut diag).unwrap();
        (p, diag)
    }

    #[test]
    fn single_entry() {
        let (p, _) = parse(ORIENTATION);
        assert_eq!(p.order, ByteOrder::Intel);
        assert_eq!(p.ifds[0].len(), 1);
        let e = p.ifds[0].get(Tag::Orientation).unwrap();
        assert_eq!(e.value(p.order).get_uint(0), Some(3));
        assert!(p.thumbnail.is_none());
        assert!(p.ifds[1..].iter().all(|d| d.is_empty()));
    }

    #[test]
    fn exif_header() {
        let mut data = EXIF_HEADER.to_vec();
        data.extend_from_slice(ORIENTATION);
        let (p, _) = parse(&data);
        assert_eq!(p.ifds[0].len(), 1);
    }

    #[test]
    fn bad_header() {
        let mut diag = Diagnostics::new();
        assert!(parse_exif(b"II\x2a\0\x08\0\0", false, &mut diag).is_none());
        assert!(parse_exif(b"XX\x2a\0\x08\0\0\0", false, &mut diag)
                .is_none());
        assert!(parse_exif(b"MM\0\x2b\0\0\0\x08", false, &mut diag)
                .is_none());
        assert!(diag.contains(LogCode::CorruptData));
    }

    #[test]
    fn short_count() {
        let (p, diag) = parse(b"II\x2a\0\x08\0\0\0\x05\0");
        assert!(p.ifds[0].is_empty());
        assert!(diag.contains(LogCode::Debug));
    }

    // The next-IFD pointer of IFD0 points to IFD0 itself.  It is
    // parsed once more as IFD1 and then the parser stops.
    #[test]
    fn loop_by_next() {
        let (p, _) = parse(b"MM\0\x2a\0\0\0\x08\
                             \0\x01\x01\x12\0\x03\0\0\0\x01\0\x01\0\0\
                             \0\0\0\x08");
        assert_eq!(p.ifds[Ifd::Zero.index()].len(), 1);
        assert_eq!(p.ifds[Ifd::One.index()].len(), 1);
    }

    #[test]
    fn unknown_and_empty() {
        let data = b"II\x2a\0\x08\0\0\0\x02\0\
                     \xef\xbe\x01\0\x01\0\0\0\x05\0\0\0\
                     \0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0";
        let (p, _) = parse(data);
        assert_eq!(p.ifds[0].len(), 1);
        assert_eq!(p.ifds[0].get(Tag(0xbeef)).unwrap().data(), b"\x05");
        let p = parse_exif(data, true, &mut Diagnostics::new()).unwrap();
        assert!(p.ifds[0].is_empty());
    }

    #[test]
    fn value_out_of_range() {
        let (p, diag) = parse(b"II\x2a\0\x08\0\0\0\x02\0\
                                \x0f\x01\x02\0\x0a\0\0\0\0\x10\0\0\
                                \x12\x01\x03\0\x01\0\0\0\x03\0\0\0\0\0\0\0");
        assert!(p.ifds[0].get(Tag::Make).is_none());
        assert!(p.ifds[0].get(Tag::Orientation).is_some());
        assert!(diag.contains(LogCode::CorruptData));
    }

    #[test]
    fn huge_count() {
        let (p, diag) = parse(b"II\x2a\0\x08\0\0\0\x01\0\
                                \x0f\x01\x04\0\xff\xff\xff\xff\xff\xff\xff\xff\
                                \0\0\0\0");
        assert!(p.ifds[0].is_empty());
        assert!(diag.contains(LogCode::CorruptData) ||
                diag.contains(LogCode::Debug));
    }

    #[test]
    fn exif_ifd_and_self_pointer() {
        let (p, diag) = parse(b"II\x2a\0\x08\0\0\0\
                                \x01\0\x69\x87\x04\0\x01\0\0\0\x1a\0\0\0\
                                \0\0\0\0\
                                \x02\0\0\x90\x07\0\x04\0\0\0\x30\x32\x33\x30\
                                \x69\x87\x04\0\x01\0\0\0\x1a\0\0\0\0\0\0\0");
        assert!(p.ifds[Ifd::Zero.index()].is_empty());
        let exif = &p.ifds[Ifd::Exif.index()];
        assert_eq!(exif.len(), 1);
        assert_eq!(exif.get(Tag::ExifVersion).unwrap().data(), b"0230");
        assert!(diag.records().iter()
                .any(|d| d.message.starts_with("Recursive entry")));
    }

    // Builds an Intel directory of single-component records.
    fn dir(records: &[(u16, u16, u32)]) -> Vec<u8> {
        let mut v = (records.len() as u16).to_le_bytes().to_vec();
        for &(tag, format, value) in records {
            v.extend_from_slice(&tag.to_le_bytes());
            v.extend_from_slice(&format.to_le_bytes());
            let count: u32 = if format == 7 { 4 } else { 1 };
            v.extend_from_slice(&count.to_le_bytes());
            v.extend_from_slice(&value.to_le_bytes());
        }
        v.extend_from_slice(&[0; 4]);
        v
    }

    fn messages(diag: &Diagnostics, text: &str) -> usize {
        diag.records().iter().filter(|d| d.message.contains(text)).count()
    }

    // Exif, GPS and Interoperability IFDs that hold only pointers to
    // each other.
    #[test]
    fn pointer_cycle() {
        let mut data = b"II\x2a\0\x08\0\0\0".to_vec();
        data.extend(dir(&[(0x8769, 4, 26)]));
        data.extend(dir(&[(0x8825, 4, 56), (0xa005, 4, 86)]));
        data.extend(dir(&[(0x8769, 4, 26), (0xa005, 4, 86)]));
        data.extend(dir(&[(0x8769, 4, 26), (0x8825, 4, 56)]));
        assert_eq!(data.len(), 116);
        let (p, diag) = parse(&data);
        assert!(p.ifds.iter().all(|d| d.is_empty()));
        assert_eq!(messages(&diag, "loaded already"), 4);
        assert!(diag.records().len() < 50);
    }

    #[test]
    fn deep_chain() {
        let mut data = b"II\x2a\0\x08\0\0\0".to_vec();
        data.extend(dir(&[(0x8769, 4, 26)]));
        for k in 1..=40u32 {
            let tag = if k % 2 == 1 { 0x8825 } else { 0x8769 };
            data.extend(dir(&[(tag, 4, 8 + 18 * (k + 1))]));
        }
        let (p, diag) = parse(&data);
        assert!(p.ifds.iter().all(|d| d.is_empty()));
        assert_eq!(messages(&diag, "Deep recursion detected!"), 1);
        assert!(diag.records().len() < 200);
    }

    #[test]
    fn reentry() {
        let mut data = b"II\x2a\0\x08\0\0\0".to_vec();
        data.extend(dir(&[(0x8769, 4, 26)]));
        data.extend(dir(&[(0x9000, 7, u32::from_le_bytes(*b"0230")),
                          (0x8825, 4, 56)]));
        data.extend(dir(&[(0x8769, 4, 8)]));
        let (p, diag) = parse(&data);
        assert_eq!(p.ifds[Ifd::Exif.index()].len(), 1);
        assert!(p.ifds[Ifd::Gps.index()].is_empty());
        assert_eq!(messages(&diag, "multiple times"), 1);
    }

    // One table read as IFD0, Exif, GPS, Interoperability and IFD1.
    #[test]
    fn record_budget() {
        let mut data = b"II\x2a\0\x08\0\0\0".to_vec();
        let mut records = vec![(0x8769, 4, 8), (0x8825, 4, 8), (0xa005, 4, 8)];
        records.resize(20, (0, 0, 0));
        data.extend(dir(&records));
        let len = data.len();
        data[len - 4] = 8;
        let (p, diag) = parse(&data);
        assert!(p.ifds.iter().all(|d| d.is_empty()));
        assert_eq!(messages(&diag, "Too many directory entries"), 3);
    }

    #[test]
    fn thumbnail() {
        let (p, _) = parse(b"MM\0\x2a\0\0\0\x08\
                             \0\x01\x01\x12\0\x03\0\0\0\x01\0\x01\0\0\
                             \0\0\0\x1a\
                             \0\x02\x02\x01\0\x04\0\0\0\x01\0\0\0\x38\
                             \x02\x02\0\x04\0\0\0\x01\0\0\0\x04\0\0\0\0\
                             \xff\xd8\xff\xd9");
        assert_eq!(p.thumbnail.as_deref(), Some(&b"\xff\xd8\xff\xd9"[..]));
        assert!(p.ifds[Ifd::One.index()].is_empty());
        assert_eq!(p.ifds[Ifd::Zero.index()].len(), 1);
    }

    #[test]
    fn bogus_thumbnail() {
        let (p, diag) = parse(b"MM\0\x2a\0\0\0\x08\
                                \0\x02\x02\x01\0\x04\0\0\0\x01\0\0\0\x20\
                                \x02\x02\0\x04\0\0\0\x01\xff\xff\xff\xff\
                                \0\0\0\0");
        assert!(p.thumbnail.is_none());
        assert!(diag.contains(LogCode::CorruptData));
    }

    #[test]
    fn tiff_signature() {
        assert!(is_tiff(b"MM\0\x2a\0\0\0\x08"));
        assert!(is_tiff(b"II\x2a\0"));
        assert!(!is_tiff(b"II\0\x2a"));
    }
}
