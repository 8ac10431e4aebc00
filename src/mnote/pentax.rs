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

//! Pentax and Casio MakerNotes.
//!
//! Version 1 is a bare IFD.  Versions 2 and 3 start with `AOC\0` and
//! Casio version 2 with `QVC\0`, followed by two bytes that hold the
//! byte order marker for version 3 and zeros otherwise.  Tags of the
//! prefixed versions are numbered from 0x4000.

use crate::diag::Log;
use crate::endian::ByteOrder;
use crate::util::span;
use super::{Codec, Common, TagDesc, read_entries, savable, write_entries};

const DOMAIN: &str = "ExifMnoteDataPentax";
const TAG_BASE: u16 = 0x4000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PentaxVariant {
    Pentax1,
    Pentax2,
    Pentax3,
    Casio2,
}

pub(super) fn identify(data: &[u8]) -> Option<PentaxVariant> {
    if data.len() >= 8 && data.starts_with(b"AOC\0") {
        match &data[4..6] {
            b"II" | b"MM" => Some(PentaxVariant::Pentax3),
            _ => Some(PentaxVariant::Pentax2),
        }
    } else if data.len() >= 8 && data.starts_with(b"QVC\0") {
        Some(PentaxVariant::Casio2)
    } else if data.len() >= 2 && data.starts_with(b"\x00\x1b") {
        Some(PentaxVariant::Pentax1)
    } else {
        None
    }
}

#[derive(Clone, Debug)]
pub struct Pentax {
    common: Common,
    variant: PentaxVariant,
}

impl Pentax {
    pub(super) fn new(variant: PentaxVariant, order: ByteOrder) -> Pentax {
        Pentax { common: Common::new(order), variant: variant }
    }

    pub(super) fn variant(&self) -> PentaxVariant {
        self.variant
    }
}

impl Codec for Pentax {
    const TAGS: &'static [TagDesc] = TAGS;

    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn load(&mut self, buf: &[u8], offset: usize, log: &mut dyn Log) {
        if span(offset, 8, buf.len()).is_none() {
            diag!(log, CorruptData, DOMAIN, "Short MakerNote");
            return;
        }
        let mut datao = offset;
        let mut base = 0;
        let head = &buf[offset..offset + 8];
        if head.starts_with(b"AOC\0") {
            match ByteOrder::from_marker(&head[4..6]) {
                Some(order) => {
                    self.variant = PentaxVariant::Pentax3;
                    self.common.order = order;
                },
                None => self.variant = PentaxVariant::Pentax2,
            }
            datao += 6;
            base = TAG_BASE;
        } else if head.starts_with(b"QVC\0") {
            self.variant = PentaxVariant::Casio2;
            datao += 6;
            base = TAG_BASE;
        } else {
            self.variant = PentaxVariant::Pentax1;
        }
        let order = self.common.order;
        let count = order.get_u16(buf, datao) as usize;
        self.common.entries = read_entries(
            buf, datao + 2, count, order, base, 0, DOMAIN, log);
    }

    fn save(&self, log: &mut dyn Log) -> Vec<u8> {
        let order = self.common.order;
        let entries = savable(&self.common.entries, DOMAIN, log);
        let n = entries.len();
        let (header, base): (&[u8], u16) = match self.variant {
            PentaxVariant::Pentax1 => (&b""[..], 0),
            PentaxVariant::Pentax2 => (&b"AOC\0\0\0"[..], TAG_BASE),
            PentaxVariant::Pentax3 => (&b"AOC\0"[..], TAG_BASE),
            PentaxVariant::Casio2 => (&b"QVC\0\0\0"[..], TAG_BASE),
        };
        let mut buf = Vec::with_capacity(8 + 12 * n + 4);
        buf.extend_from_slice(header);
        if self.variant == PentaxVariant::Pentax3 {
            buf.extend_from_slice(&order.marker());
        }
        let at = buf.len() + 2;
        order.push_u16(&mut buf, n as u16);
        buf.resize(at + 12 * n + 4, 0);
        write_entries(&mut buf, at, &entries, order, base,
                      self.common.offset as i64);
        buf
    }
}

static TAGS: &[TagDesc] = &[
    // Version 1
    TagDesc { tag: 0x0001, name: "Mode", title: "Capture Mode",
              description: "" },
    TagDesc { tag: 0x0002, name: "QualityLevel", title: "Quality Level",
              description: "" },
    TagDesc { tag: 0x0003, name: "FocusMode", title: "Focus Mode",
              description: "" },
    TagDesc { tag: 0x0004, name: "FlashMode", title: "Flash Mode",
              description: "" },
    TagDesc { tag: 0x0007, name: "WhiteBalance", title: "White Balance",
              description: "" },
    TagDesc { tag: 0x000a, name: "Zoom", title: "Zoom", description: "" },
    TagDesc { tag: 0x000b, name: "Sharpness", title: "Sharpness",
              description: "" },
    TagDesc { tag: 0x000c, name: "Contrast", title: "Contrast",
              description: "" },
    TagDesc { tag: 0x000d, name: "Saturation", title: "Saturation",
              description: "" },
    TagDesc { tag: 0x0014, name: "ISOSpeed", title: "ISO Speed",
              description: "" },
    TagDesc { tag: 0x0017, name: "Color", title: "Colors", description: "" },
    TagDesc { tag: 0x1000, name: "TimeZone", title: "Time Zone",
              description: "" },
    TagDesc { tag: 0x1001, name: "DaylightSavings", title: "Daylight Savings",
              description: "" },
    // Versions 2 and 3
    TagDesc { tag: 0x4001, name: "Mode", title: "Capture Mode",
              description: "" },
    TagDesc { tag: 0x4002, name: "PreviewResolution",
              title: "Preview Resolution", description: "" },
    TagDesc { tag: 0x4003, name: "PreviewLength",
              title: "Preview Length", description: "" },
    TagDesc { tag: 0x4004, name: "PreviewStart", title: "Preview Start",
              description: "" },
    TagDesc { tag: 0x4008, name: "Quality", title: "Quality Level",
              description: "" },
    TagDesc { tag: 0x4009, name: "ImageSize", title: "Image Size",
              description: "" },
    TagDesc { tag: 0x4019, name: "WhiteBalance", title: "White Balance",
              description: "" },
];
