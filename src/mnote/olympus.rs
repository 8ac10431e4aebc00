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

//! Olympus-style MakerNotes, which are shared by Sanyo, Epson, and
//! Nikon cameras.
//!
//! | Variant  | Header                          | Value offsets from |
//! |----------|---------------------------------|--------------------|
//! | Olympus1 | `OLYMP\0` + 2 bytes             | TIFF header        |
//! | Sanyo    | `SANYO\0` + 2 bytes             | TIFF header        |
//! | Epson    | `EPSON\0` + 2 bytes             | TIFF header        |
//! | Olympus2 | `OLYMPUS\0` + `II`/`MM` + 2     | MakerNote start    |
//! | Nikon1   | `Nikon\0\x01\0`                 | TIFF header        |
//! | Nikon2   | `Nikon\0\x02` + 3 + TIFF header | embedded header    |
//! | Nikon0   | none (starts with `00 1b`)      | TIFF header        |

use crate::diag::Log;
use crate::endian::ByteOrder;
use crate::util::span;
use super::{Codec, Common, TagDesc, read_entries_with, savable,
            write_entries};

const DOMAIN: &str = "ExifMnoteOlympus";

// Some Sanyo cameras (VPC-C5, C40) store the thumbnail offset as a
// position in the JPEG file, where the TIFF header starts at 12.
const SANYO_FILE_OFFSET: usize = 12;

// Nikon v1 tags are numbered from 0x8000 to keep them apart from
// the v2 ones.
const NIKON1_TAG_BASE: u16 = 0x8000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OlympusVariant {
    Olympus1,
    Olympus2,
    Sanyo,
    Epson,
    /// Nikon without a header.
    Nikon0,
    Nikon1,
    Nikon2,
}

fn variant_of(data: &[u8]) -> Option<OlympusVariant> {
    if data.len() >= 8 {
        if data.starts_with(b"OLYMPUS\0") {
            return Some(OlympusVariant::Olympus2);
        } else if data.starts_with(b"OLYMP\0") {
            return Some(OlympusVariant::Olympus1);
        } else if data.starts_with(b"SANYO\0") {
            return Some(OlympusVariant::Sanyo);
        } else if data.starts_with(b"EPSON\0") {
            return Some(OlympusVariant::Epson);
        } else if data.starts_with(b"Nikon\0") {
            match data[6] {
                1 => return Some(OlympusVariant::Nikon1),
                2 => return Some(OlympusVariant::Nikon2),
                _ => return None,
            }
        }
    }
    if data.starts_with(b"\x00\x1b") {
        return Some(OlympusVariant::Nikon0);
    }
    None
}

pub(super) fn identify(make: Option<&[u8]>, data: &[u8])
                       -> Option<OlympusVariant> {
    match variant_of(data)? {
        // Pentax v1 begins with the same two bytes.
        OlympusVariant::Nikon0 => match make {
            Some(m) if m.starts_with(b"Nikon") || m.starts_with(b"NIKON") =>
                Some(OlympusVariant::Nikon0),
            _ => None,
        },
        v => Some(v),
    }
}

#[derive(Clone, Debug)]
pub struct Olympus {
    common: Common,
    variant: OlympusVariant,
}

impl Olympus {
    pub(super) fn new(variant: OlympusVariant, order: ByteOrder) -> Olympus {
        Olympus { common: Common::new(order), variant: variant }
    }

    pub(super) fn variant(&self) -> OlympusVariant {
        self.variant
    }
}

// Some cameras claim one byte order and write the other.  A count
// with a zero low byte that is implausibly large gives it away.
fn check_order(buf: &[u8], at: usize, order: ByteOrder) -> ByteOrder {
    let c = order.get_u16(buf, at);
    if c & 0xff == 0 && c > 0x500 { order.flip() } else { order }
}

impl Codec for Olympus {
    const TAGS: &'static [TagDesc] = TAGS;

    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn load(&mut self, buf: &[u8], offset: usize, log: &mut dyn Log) {
        let mut o2 = offset;
        if span(o2, 10, buf.len()).is_none() {
            diag!(log, CorruptData, DOMAIN, "Short MakerNote");
            return;
        }
        let variant = match variant_of(&buf[o2..]) {
            Some(v) => v,
            None => {
                diag!(log, Debug, DOMAIN, "Unknown MakerNote signature");
                return;
            },
        };
        self.variant = variant;
        let mut order = self.common.order;
        let mut datao = 0;
        let mut base = 0;
        match variant {
            OlympusVariant::Olympus1 | OlympusVariant::Sanyo |
            OlympusVariant::Epson => {
                if buf[o2 + 6] == 1 {
                    order = ByteOrder::Intel;
                } else if buf[o2 + 7] == 1 {
                    order = ByteOrder::Motorola;
                }
                o2 += 8;
                if span(o2, 2, buf.len()).is_none() {
                    diag!(log, CorruptData, DOMAIN, "Short MakerNote");
                    return;
                }
                order = check_order(buf, o2, order);
            },
            OlympusVariant::Olympus2 => {
                datao = o2;
                o2 += 8;
                if let Some(o) = ByteOrder::from_marker(&buf[o2..o2 + 2]) {
                    order = o;
                }
                o2 += 4;
            },
            OlympusVariant::Nikon1 => {
                o2 += 8;
                base = NIKON1_TAG_BASE;
                order = check_order(buf, o2, order);
            },
            OlympusVariant::Nikon2 => {
                o2 += 10;
                datao = o2;
                order = match span(o2, 8, buf.len())
                    .and_then(|_| ByteOrder::from_marker(&buf[o2..o2 + 2])) {
                    Some(o) => o,
                    None => {
                        diag!(log, Debug, DOMAIN,
                              "Unknown byte order in Nikon MakerNote");
                        return;
                    },
                };
                o2 = match datao.checked_add(order.get_u32(buf, o2 + 4)
                                             as usize) {
                    Some(o) => o,
                    None => {
                        diag!(log, CorruptData, DOMAIN, "Short MakerNote");
                        return;
                    },
                };
            },
            OlympusVariant::Nikon0 => {
                order = ByteOrder::Motorola;
            },
        }
        if span(o2, 2, buf.len()).is_none() {
            diag!(log, CorruptData, DOMAIN, "Short MakerNote");
            return;
        }
        let count = order.get_u16(buf, o2) as usize;
        self.common.order = order;
        let rewind = match variant {
            OlympusVariant::Sanyo => Some(SANYO_FILE_OFFSET),
            _ => None,
        };
        self.common.entries = read_entries_with(
            buf, o2 + 2, count, order, base, datao, rewind, DOMAIN, log);
    }

    fn save(&self, log: &mut dyn Log) -> Vec<u8> {
        let order = self.common.order;
        let entries = savable(&self.common.entries, DOMAIN, log);
        let n = entries.len();
        let offset = self.common.offset as i64;
        let mut buf;
        match self.variant {
            OlympusVariant::Olympus1 | OlympusVariant::Sanyo |
            OlympusVariant::Epson => {
                buf = vec![0; 10 + 12 * n];
                buf[..6].copy_from_slice(match self.variant {
                    OlympusVariant::Sanyo => b"SANYO\0",
                    OlympusVariant::Epson => b"EPSON\0",
                    _ => b"OLYMP\0",
                });
                order.set_u16(&mut buf, 6, 1);
                order.set_u16(&mut buf, 8, n as u16);
                write_entries(&mut buf, 10, &entries, order, 0, offset);
            },
            OlympusVariant::Olympus2 => {
                buf = vec![0; 14 + 12 * n + 4];
                buf[..8].copy_from_slice(b"OLYMPUS\0");
                buf[8..10].copy_from_slice(&order.marker());
                order.set_u16(&mut buf, 10, 3);
                order.set_u16(&mut buf, 12, n as u16);
                write_entries(&mut buf, 14, &entries, order, 0, 0);
            },
            OlympusVariant::Nikon1 => {
                buf = vec![0; 10 + 12 * n + 4];
                buf[..8].copy_from_slice(b"Nikon\0\x01\0");
                order.set_u16(&mut buf, 8, n as u16);
                write_entries(&mut buf, 10, &entries, order,
                              NIKON1_TAG_BASE, offset);
            },
            OlympusVariant::Nikon2 | OlympusVariant::Nikon0 => {
                buf = vec![0; 20 + 12 * n + 4];
                buf[..8].copy_from_slice(b"Nikon\0\x02\0");
                buf[10..12].copy_from_slice(&order.marker());
                order.set_u16(&mut buf, 12, 0x2a);
                order.set_u32(&mut buf, 14, 8);
                order.set_u16(&mut buf, 18, n as u16);
                write_entries(&mut buf, 20, &entries, order, 0, -10);
            },
        }
        buf
    }
}

static TAGS: &[TagDesc] = &[
    // Nikon v2
    TagDesc { tag: 0x0001, name: "Version", title: "Firmware Version",
              description: "" },
    TagDesc { tag: 0x0002, name: "ISO", title: "ISO Setting",
              description: "" },
    TagDesc { tag: 0x0003, name: "ColorMode", title: "Color Mode",
              description: "" },
    TagDesc { tag: 0x0004, name: "Quality", title: "Quality", description: "" },
    TagDesc { tag: 0x0005, name: "WhiteBalance", title: "White Balance",
              description: "" },
    TagDesc { tag: 0x0006, name: "Sharpening", title: "Image Sharpening",
              description: "" },
    TagDesc { tag: 0x0007, name: "FocusMode", title: "Focus Mode",
              description: "" },
    TagDesc { tag: 0x0008, name: "FlashSetting", title: "Flash Setting",
              description: "" },
    // Olympus
    TagDesc { tag: 0x0200, name: "SpecialMode", title: "Special Mode",
              description: "" },
    TagDesc { tag: 0x0201, name: "Quality", title: "Quality", description: "" },
    TagDesc { tag: 0x0202, name: "Macro", title: "Macro", description: "" },
    TagDesc { tag: 0x0204, name: "DigitalZoom", title: "Digital Zoom",
              description: "" },
    TagDesc { tag: 0x0207, name: "SoftwareRelease", title: "Software Release",
              description: "" },
    TagDesc { tag: 0x0208, name: "PictInfo", title: "Picture Info",
              description: "" },
    TagDesc { tag: 0x0209, name: "CameraID", title: "Camera ID",
              description: "" },
    TagDesc { tag: 0x0f00, name: "DataDump", title: "Data Dump",
              description: "" },
    // Nikon v1
    TagDesc { tag: 0x8002, name: "Unknown", title: "Unknown", description: "" },
    TagDesc { tag: 0x8003, name: "Quality", title: "Quality", description: "" },
    TagDesc { tag: 0x8004, name: "ColorMode", title: "Color Mode",
              description: "" },
    TagDesc { tag: 0x8005, name: "ImageAdjustment", title: "Image Adjustment",
              description: "" },
    TagDesc { tag: 0x8006, name: "CCDSensitivity", title: "CCD Sensitivity",
              description: "" },
    TagDesc { tag: 0x8007, name: "WhiteBalance", title: "White Balance",
              description: "" },
    TagDesc { tag: 0x8008, name: "Focus", title: "Focus", description: "" },
    TagDesc { tag: 0x800a, name: "DigitalZoom", title: "Digital Zoom",
              description: "" },
    TagDesc { tag: 0x800b, name: "Converter", title: "Converter",
              description: "" },
];
