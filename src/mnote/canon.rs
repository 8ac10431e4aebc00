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

//! Canon MakerNote: a bare IFD in the byte order of the enclosing
//! block, with value offsets relative to the TIFF header.

use crate::diag::Log;
use crate::endian::ByteOrder;
use crate::util::span;
use super::{Codec, Common, TagDesc, read_entries, savable, write_entries};

const DOMAIN: &str = "ExifMnoteCanon";

pub(super) fn identify(make: Option<&[u8]>) -> bool {
    make == Some(&b"Canon"[..])
}

#[derive(Clone, Debug)]
pub struct Canon {
    common: Common,
}

impl Canon {
    pub(super) fn new(order: ByteOrder) -> Canon {
        Canon { common: Common::new(order) }
    }
}

impl Codec for Canon {
    const TAGS: &'static [TagDesc] = TAGS;

    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn load(&mut self, buf: &[u8], offset: usize, log: &mut dyn Log) {
        if span(offset, 2, buf.len()).is_none() {
            diag!(log, CorruptData, DOMAIN, "Short MakerNote");
            return;
        }
        let order = self.common.order;
        let count = order.get_u16(buf, offset) as usize;
        let mut entries = read_entries(
            buf, offset + 2, count, order, 0, 0, DOMAIN, log);
        // Canon notes never carry empty values.
        entries.retain(|e| {
            if e.data().is_empty() {
                diag!(log, CorruptData, DOMAIN,
                      "Invalid zero-length tag size");
                return false;
            }
            true
        });
        self.common.entries = entries;
    }

    fn save(&self, log: &mut dyn Log) -> Vec<u8> {
        let order = self.common.order;
        let entries = savable(&self.common.entries, DOMAIN, log);
        let mut buf = vec![0; 2 + 12 * entries.len() + 4];
        order.set_u16(&mut buf, 0, entries.len() as u16);
        write_entries(&mut buf, 2, &entries, order, 0,
                      self.common.offset as i64);
        buf
    }
}

static TAGS: &[TagDesc] = &[
    TagDesc { tag: 0x0001, name: "Settings1", title: "Settings (first part)",
              description: "" },
    TagDesc { tag: 0x0002, name: "FocalLength", title: "Focal Length",
              description: "" },
    TagDesc { tag: 0x0004, name: "Settings2", title: "Settings (second part)",
              description: "" },
    TagDesc { tag: 0x0006, name: "ImageType", title: "Image Type",
              description: "" },
    TagDesc { tag: 0x0007, name: "FirmwareVersion", title: "Firmware Version",
              description: "" },
    TagDesc { tag: 0x0008, name: "ImageNumber", title: "Image Number",
              description: "" },
    TagDesc { tag: 0x0009, name: "OwnerName", title: "Owner Name",
              description: "" },
    TagDesc { tag: 0x000c, name: "SerialNumber", title: "Serial Number",
              description: "" },
    TagDesc { tag: 0x000f, name: "CustomFunctions", title: "Custom Functions",
              description: "" },
];
