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

//! Fujifilm MakerNote.
//!
//! The layout is always little endian regardless of the enclosing
//! block:
//!
//! ```text
//! "FUJIFILM" | IFD offset (u32) | IFD ...
//! ```
//!
//! Both the IFD offset and the value offsets are relative to the start
//! of the MakerNote.

use crate::diag::Log;
use crate::endian::ByteOrder;
use crate::util::span;
use super::{Codec, Common, TagDesc, read_entries, savable, write_entries};

const DOMAIN: &str = "ExifMnoteFuji";
const SIGNATURE: &[u8] = b"FUJIFILM";

pub(super) fn identify(data: &[u8]) -> bool {
    data.starts_with(SIGNATURE)
}

#[derive(Clone, Debug)]
pub struct Fuji {
    common: Common,
}

impl Fuji {
    pub(super) fn new() -> Fuji {
        Fuji { common: Common::new(ByteOrder::Intel) }
    }
}

impl Codec for Fuji {
    const TAGS: &'static [TagDesc] = TAGS;

    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn load(&mut self, buf: &[u8], offset: usize, log: &mut dyn Log) {
        let order = ByteOrder::Intel;
        if span(offset, 12, buf.len()).is_none() {
            diag!(log, CorruptData, DOMAIN, "Short MakerNote");
            return;
        }
        let datao = match offset.checked_add(order.get_u32(buf, offset + 8)
                                             as usize) {
            Some(o) if span(o, 2, buf.len()).is_some() => o,
            _ => {
                diag!(log, CorruptData, DOMAIN, "Short MakerNote");
                return;
            },
        };
        let count = order.get_u16(buf, datao) as usize;
        self.common.order = order;
        self.common.entries = read_entries(
            buf, datao + 2, count, order, 0, offset, DOMAIN, log);
    }

    fn save(&self, log: &mut dyn Log) -> Vec<u8> {
        let order = ByteOrder::Intel;
        let entries = savable(&self.common.entries, DOMAIN, log);
        let mut buf = vec![0; 8 + 4 + 2 + 12 * entries.len() + 4];
        buf[..8].copy_from_slice(SIGNATURE);
        order.set_u32(&mut buf, 8, 12);
        order.set_u16(&mut buf, 12, entries.len() as u16);
        write_entries(&mut buf, 14, &entries, order, 0, 0);
        buf
    }

    // The layout is fixed to little endian.
    fn set_byte_order(&mut self, _order: ByteOrder) {}
}

static TAGS: &[TagDesc] = &[
    TagDesc { tag: 0x0000, name: "Version", title: "Maker Note Version",
              description: "This number is unique and based on the \
                            version of the maker note." },
    TagDesc { tag: 0x1000, name: "Quality", title: "Quality", description: "" },
    TagDesc { tag: 0x1001, name: "Sharpness", title: "Sharpness",
              description: "" },
    TagDesc { tag: 0x1002, name: "WhiteBalance", title: "White Balance",
              description: "" },
    TagDesc { tag: 0x1003, name: "ChromaticitySaturation",
              title: "Chromaticity Saturation", description: "" },
    TagDesc { tag: 0x1004, name: "Contrast", title: "Contrast",
              description: "" },
    TagDesc { tag: 0x1010, name: "FlashMode", title: "Flash Mode",
              description: "" },
    TagDesc { tag: 0x1011, name: "FlashStrength",
              title: "Flash Firing Strength Compensation", description: "" },
    TagDesc { tag: 0x1020, name: "MacroMode", title: "Macro Mode",
              description: "" },
    TagDesc { tag: 0x1021, name: "FocusingMode", title: "Focusing Mode",
              description: "" },
    TagDesc { tag: 0x1030, name: "SlowSynchro", title: "Slow Synchro Mode",
              description: "" },
    TagDesc { tag: 0x1031, name: "PictureMode", title: "Picture Mode",
              description: "" },
    TagDesc { tag: 0x1100, name: "ContinuousTaking",
              title: "Continuous Taking", description: "" },
    TagDesc { tag: 0x1300, name: "BlurStatus", title: "Blur Status",
              description: "" },
    TagDesc { tag: 0x1301, name: "FocusingStatus", title: "Focusing Status",
              description: "" },
    TagDesc { tag: 0x1302, name: "AutoExposureStatus",
              title: "Auto Exposure Status", description: "" },
];
