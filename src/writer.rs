//
// Copyright (c) 2017 KAMADA Ken'ichi.
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

use crate::diag::Log;
use crate::endian::ByteOrder;
use crate::entry::Entry;
use crate::ifd::Directory;
use crate::mnote::MakerNote;
use crate::tag::{Ifd, Tag};
use crate::tiff::{EXIF_HEADER, MAX_BLOCK_SIZE};
use crate::util;
use crate::value::Format;

const DOMAIN: &str = "ExifData";

/// Encodes the directories into an Exif block, starting with
/// "Exif\0\0".
///
/// Pointer tags are synthesized from the directory contents and the
/// thumbnail; entries with those tags are ignored.  If `maker_note`
/// is given, it is re-serialized for its new position and the bytes
/// replace the value of the MakerNote entry.
pub(crate) fn encode(ifds: &mut [Directory; 5], order: ByteOrder,
                     thumbnail: Option<&[u8]>,
                     maker_note: Option<&mut MakerNote>,
                     log: &mut dyn Log) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(EXIF_HEADER);
    buf.extend_from_slice(&order.marker());
    order.push_u16(&mut buf, 0x2a);
    order.push_u32(&mut buf, 8);

    let mut enc = Encoder {
        buf: buf,
        order: order,
        ifds: ifds,
        thumbnail: thumbnail,
        maker_note: maker_note,
        log: log,
    };
    enc.save_ifd(Ifd::Zero);
    if enc.buf.len() > MAX_BLOCK_SIZE {
        diag!(enc.log, Debug, DOMAIN,
              "Encoded size ({}) exceeds what a JPEG segment can hold.",
              enc.buf.len());
    }
    enc.buf
}

struct Encoder<'a, 'l> {
    buf: Vec<u8>,
    order: ByteOrder,
    ifds: &'a mut [Directory; 5],
    thumbnail: Option<&'a [u8]>,
    maker_note: Option<&'a mut MakerNote>,
    log: &'l mut dyn Log,
}

impl<'a, 'l> Encoder<'a, 'l> {
    // The offset of the end of the buffer from the TIFF header.
    fn offset(&self) -> u32 {
        (self.buf.len() - EXIF_HEADER.len()) as u32
    }

    fn has(&self, ifd: Ifd) -> bool {
        !self.ifds[ifd.index()].is_empty()
    }

    // Writes an IFD, its values, and its child IFDs, and returns the
    // offset of the IFD.
    fn save_ifd(&mut self, ifd: Ifd) -> u32 {
        let idx = ifd.index();
        let count = self.ifds[idx].iter()
            .filter(|e| !e.tag().is_pointer()).count();
        let n_ptr = match ifd {
            Ifd::Zero =>
                (self.has(Ifd::Exif) || self.has(Ifd::Interoperability))
                as usize + self.has(Ifd::Gps) as usize,
            Ifd::Exif => self.has(Ifd::Interoperability) as usize,
            Ifd::One if self.thumbnail.is_some() => 2,
            _ => 0,
        };
        let n = count + n_ptr;
        diag!(self.log, Debug, DOMAIN,
              "Saving {} entries (IFD '{}', offset: {})...",
              n, ifd.name(), self.offset());

        // The number of entries (2) + array of entries (12 * n) +
        // the next IFD pointer (4).
        util::pad_even(&mut self.buf);
        let ifd_offset = self.offset();
        let ifd_pos = self.buf.len();
        self.buf.resize(ifd_pos + 2 + 12 * n + 4, 0);
        self.order.set_u16(&mut self.buf, ifd_pos, n as u16);

        let mut records = Vec::with_capacity(n);
        for i in 0..self.ifds[idx].len() {
            let e = self.ifds[idx].entry_at_mut(i);
            if e.tag().is_pointer() {
                continue;
            }
            if e.tag() == Tag::MakerNote {
                if let Some(md) = self.maker_note.as_deref_mut() {
                    util::pad_even(&mut self.buf);
                    md.set_offset(
                        (self.buf.len() - EXIF_HEADER.len()) as u32);
                    e.set_bytes(Format::Undefined, md.save(&mut *self.log));
                }
            }
            records.push(write_entry(&mut self.buf, self.order, e));
        }

        match ifd {
            Ifd::Zero => {
                if self.has(Ifd::Exif) || self.has(Ifd::Interoperability) {
                    let ofs = self.save_ifd(Ifd::Exif);
                    records.push(pointer(self.order, Tag::ExifIFDPointer, ofs));
                }
                if self.has(Ifd::Gps) {
                    let ofs = self.save_ifd(Ifd::Gps);
                    records.push(
                        pointer(self.order, Tag::GPSInfoIFDPointer, ofs));
                }
            },
            Ifd::Exif => {
                if self.has(Ifd::Interoperability) {
                    let ofs = self.save_ifd(Ifd::Interoperability);
                    records.push(
                        pointer(self.order, Tag::InteropIFDPointer, ofs));
                }
            },
            Ifd::One => {
                if let Some(thumb) = self.thumbnail {
                    util::pad_even(&mut self.buf);
                    let ofs = self.offset();
                    self.buf.extend_from_slice(thumb);
                    records.push(
                        pointer(self.order, Tag::JPEGInterchangeFormat, ofs));
                    records.push(
                        pointer(self.order, Tag::JPEGInterchangeFormatLength,
                                thumb.len() as u32));
                }
            },
            _ => {},
        }

        // Records are sorted in ascending order of tags [EXIF23 4.6.2].
        let order = self.order;
        records.sort_by_key(|r| order.get_u16(r, 0));
        for (i, r) in records.iter().enumerate().take(n) {
            let at = ifd_pos + 2 + 12 * i;
            self.buf[at..at + 12].copy_from_slice(r);
        }

        if ifd == Ifd::Zero &&
            (self.has(Ifd::One) || self.thumbnail.is_some()) {
            let ofs = self.save_ifd(Ifd::One);
            self.order.set_u32(&mut self.buf, ifd_pos + 2 + 12 * n, ofs);
        }
        ifd_offset
    }
}

// Encodes the record of an entry.  A value that does not fit in the
// record is appended to `buf` at an even position.
fn write_entry(buf: &mut Vec<u8>, order: ByteOrder, e: &Entry) -> [u8; 12] {
    let mut rec = [0; 12];
    order.set_u16(&mut rec, 0, e.tag().number());
    order.set_u16(&mut rec, 2, e.format().code());
    order.set_u32(&mut rec, 4, e.components());
    if e.size() <= 4 {
        rec[8..8 + e.size()].copy_from_slice(e.data());
    } else {
        util::pad_even(buf);
        let ofs = (buf.len() - EXIF_HEADER.len()) as u32;
        buf.extend_from_slice(e.data());
        order.set_u32(&mut rec, 8, ofs);
    }
    rec
}

fn pointer(order: ByteOrder, tag: Tag, value: u32) -> [u8; 12] {
    let mut rec = [0; 12];
    order.set_u16(&mut rec, 0, tag.number());
    order.set_u16(&mut rec, 2, Format::Long.code());
    order.set_u32(&mut rec, 4, 1);
    order.set_u32(&mut rec, 8, value);
    rec
}
