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

//! Normalization of entries to what the Exif standard requires.
//!
//! Fixing converts misencoded values of well-known tags, removes
//! entries that may not be recorded in their IFD, and adds mandatory
//! entries with their default values.  Fixing twice is the same as
//! fixing once.

use crate::diag::Log;
use crate::endian::ByteOrder;
use crate::entry::Entry;
use crate::ifd::Directory;
use crate::tag::{self, DataType, Ifd, Support, Tag};
use crate::value::Format;

const ENTRY: &str = "ExifEntry";
const CONTENT: &str = "ExifContent";
const DATA: &str = "ExifData";

const ASCII_MARKER: &[u8; 8] = b"ASCII\0\0\0";
const COMMENT_MARKERS: [&[u8; 8]; 4] = [
    ASCII_MARKER, b"UNICODE\0", b"JIS\0\0\0\0\0", b"\0\0\0\0\0\0\0\0",
];

// Tags whose value must be SHORT.
fn wants_short(tag: Tag) -> bool {
    matches!(tag,
             Tag::YCbCrSubSampling | Tag::SubjectArea | Tag::ColorSpace |
             Tag::PlanarConfiguration | Tag::SensingMethod |
             Tag::Orientation | Tag::YCbCrPositioning |
             Tag::PhotometricInterpretation | Tag::CustomRendered |
             Tag::ExposureMode | Tag::WhiteBalance |
             Tag::SceneCaptureType | Tag::GainControl | Tag::Saturation |
             Tag::Contrast | Tag::Sharpness | Tag::ISOSpeedRatings)
}

/// Fixes the value of an entry whose tag is known to need a specific
/// format.
pub fn fix_entry(entry: &mut Entry, order: ByteOrder, log: &mut dyn Log) {
    let tag = entry.tag();
    if wants_short(tag) {
        to_short(entry, order, log);
    } else if matches!(tag, Tag::FNumber | Tag::ApertureValue |
                       Tag::ExposureTime | Tag::FocalLength) {
        if entry.format() == Format::SRational {
            reformat(entry, Format::Rational, log);
        }
    } else if matches!(tag, Tag::ExposureBiasValue | Tag::BrightnessValue |
                       Tag::ShutterSpeedValue) {
        if entry.format() == Format::Rational {
            reformat(entry, Format::SRational, log);
        }
    } else if tag == Tag::UserComment {
        fix_user_comment(entry, log);
    }
}

fn to_short(entry: &mut Entry, order: ByteOrder, log: &mut dyn Log) {
    let from = entry.format();
    let data = entry.data();
    // Out-of-range values are truncated.
    let shorts = match from {
        Format::Short => return,
        Format::Byte =>
            data.iter().map(|&x| x as u16).collect::<Vec<_>>(),
        Format::SByte =>
            data.iter().map(|&x| x as i8 as u16).collect(),
        Format::SShort =>
            data.chunks_exact(2).map(|c| order.get_u16(c, 0)).collect(),
        Format::Long =>
            data.chunks_exact(4).map(|c| order.get_u32(c, 0) as u16)
            .collect(),
        Format::SLong =>
            data.chunks_exact(4).map(|c| order.get_i32(c, 0) as u16)
            .collect(),
        _ => {
            diag!(log, CorruptData, ENTRY,
                  "Tag '{}' is of format '{}' (which is against \
                   specification) but cannot be changed to format 'Short'.",
                  entry.tag(), from);
            return;
        },
    };
    let mut buf = Vec::with_capacity(shorts.len() * 2);
    for x in &shorts {
        order.push_u16(&mut buf, *x);
    }
    entry.set_raw(Format::Short, shorts.len() as u32, buf);
    diag!(log, Debug, ENTRY,
          "Tag '{}' was of format '{}' (which is against specification) \
           and has been changed to format 'Short'.", entry.tag(), from);
}

// RATIONAL and SRATIONAL share the layout, so only the format changes.
fn reformat(entry: &mut Entry, to: Format, log: &mut dyn Log) {
    let from = entry.format();
    let data = entry.data().to_vec();
    entry.set_raw(to, entry.components(), data);
    diag!(log, Debug, ENTRY,
          "Tag '{}' was of format '{}' (which is against specification) \
           and has been changed to format '{}'.", entry.tag(), from, to);
}

// The first 8 bytes of a UserComment name its character code.
fn fix_user_comment(entry: &mut Entry, log: &mut dyn Log) {
    let mut data = entry.data().to_vec();
    let orig_format = entry.format();
    let orig = data.clone();

    if data.len() >= 8 && data[0] == 0 {
        data[..8].fill(0);
    }
    if data.len() < 8 {
        data = prefixed(&data);
    } else {
        let mut i = data.iter().position(|&b| b != 0)
            .unwrap_or(data.len());
        if i == 0 {
            i = data.iter().position(|&b| b != b' ').unwrap_or(data.len());
        }
        if 8 <= i && i < data.len() {
            data[..8].copy_from_slice(ASCII_MARKER);
        } else if !COMMENT_MARKERS.iter().any(|m| data.starts_with(*m)) {
            data = prefixed(&data);
        }
    }

    if orig_format != Format::Undefined {
        diag!(log, Debug, ENTRY,
              "Tag 'UserComment' had invalid format '{}'. Format has been \
               set to 'undefined'.", orig_format);
    }
    if data != orig {
        diag!(log, Debug, ENTRY,
              "Tag 'UserComment' has been given a character code marker.");
    }
    entry.set_bytes(Format::Undefined, data);
}

fn prefixed(text: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(ASCII_MARKER.len() + text.len());
    v.extend_from_slice(ASCII_MARKER);
    v.extend_from_slice(text);
    v
}

/// Fixes the entries of one IFD.
pub fn fix_content(dir: &mut Directory, ifd: Ifd,
                   data_type: Option<DataType>, order: ByteOrder,
                   log: &mut dyn Log) {
    for entry in dir.iter_mut() {
        fix_entry(entry, order, log);
    }

    dir.retain(|e| {
        if tag::support_level(e.tag(), ifd, data_type) ==
            Support::NotRecorded {
            diag!(log, Debug, CONTENT,
                  "Tag '{}' is not recorded in IFD '{}' and has therefore \
                   been removed.", e.tag(), ifd.name());
            false
        } else {
            true
        }
    });

    // Pointers are written by the encoder and never kept as entries.
    for t in tag::mandatory_tags(ifd, data_type) {
        if t.is_pointer() || dir.get(t).is_some() {
            continue;
        }
        dir.add(Entry::initialize(t, order));
        diag!(log, Debug, CONTENT,
              "Tag '{}' is mandatory in IFD '{}' and has therefore been \
               added.", t, ifd.name());
    }
}

/// Fixes every IFD.  IFD1 describes the thumbnail, so it is emptied
/// instead if there is no thumbnail.
pub fn fix_data(dirs: &mut [Directory; 5], has_thumbnail: bool,
                data_type: Option<DataType>, order: ByteOrder,
                log: &mut dyn Log) {
    for ifd in Ifd::ALL {
        let dir = &mut dirs[ifd.index()];
        if ifd == Ifd::One && !has_thumbnail {
            if !dir.is_empty() {
                diag!(log, Debug, DATA,
                      "No thumbnail but entries in IFD1. Those entries \
                       have been removed.");
                dir.clear();
            }
            continue;
        }
        fix_content(dir, ifd, data_type, order, log);
    }
}

#[cfg(test)]
mod tests {
    use crate::diag::{Diagnostics, LogCode};
    use super::*;

    fn comment(data: &[u8]) -> Vec<u8> {
        let mut e = Entry::new(Tag::UserComment, Format::Undefined,
                               data.len() as u32, data.to_vec()).unwrap();
        fix_entry(&mut e, ByteOrder::Motorola, &mut Diagnostics::new());
        assert_eq!(e.components() as usize, e.size());
        let once = e.data().to_vec();
        fix_entry(&mut e, ByteOrder::Motorola, &mut Diagnostics::new());
        assert_eq!(e.data(), &once[..]);
        once
    }

    #[test]
    fn user_comment() {
        assert_eq!(comment(b"hi"), b"ASCII\0\0\0hi");
        assert_eq!(comment(b""), b"ASCII\0\0\0");
        assert_eq!(comment(b"hello world"), b"ASCII\0\0\0hello world");
        assert_eq!(comment(b"        spaced"), b"ASCII\0\0\0spaced");
        assert_eq!(comment(b"\0\0\0\0\0\0\0\0text"), b"ASCII\0\0\0text");
        assert_eq!(comment(b"\0abc\0\0\0\0text"), b"ASCII\0\0\0text");
        assert_eq!(comment(b"\0\0\0\0\0\0\0\0\0\0"), b"\0\0\0\0\0\0\0\0\0\0");
        assert_eq!(comment(b"UNICODE\0\0h\0i"), b"UNICODE\0\0h\0i");
        assert_eq!(comment(b"JIS\0\0\0\0\0xx"), b"JIS\0\0\0\0\0xx");
    }

    #[test]
    fn user_comment_format() {
        let mut e = Entry::new(Tag::UserComment, Format::Ascii, 6,
                               b"ASCII\0".to_vec()).unwrap();
        let mut diag = Diagnostics::new();
        fix_entry(&mut e, ByteOrder::Intel, &mut diag);
        assert_eq!(e.format(), Format::Undefined);
        assert_eq!(e.data(), b"ASCII\0\0\0ASCII\0");
        assert_eq!(e.components(), 14);
        assert!(diag.contains(LogCode::Debug));
    }

    #[test]
    fn long_to_short() {
        let mo = ByteOrder::Motorola;
        let mut e = Entry::new(Tag::Orientation, Format::Long, 1,
                               vec![0, 1, 0, 6]).unwrap();
        fix_entry(&mut e, mo, &mut Diagnostics::new());
        assert_eq!(e.format(), Format::Short);
        assert_eq!(e.data(), b"\x00\x06");
        let mut e = Entry::new(Tag::ISOSpeedRatings, Format::Byte, 2,
                               vec![100, 200]).unwrap();
        fix_entry(&mut e, ByteOrder::Intel, &mut Diagnostics::new());
        assert_eq!(e.format(), Format::Short);
        assert_eq!(e.data(), b"\x64\x00\xc8\x00");
    }

    #[test]
    fn short_untouchable() {
        let mut e = Entry::new(Tag::Contrast, Format::Ascii, 2,
                               b"1\0".to_vec()).unwrap();
        let mut diag = Diagnostics::new();
        fix_entry(&mut e, ByteOrder::Intel, &mut diag);
        assert_eq!(e.format(), Format::Ascii);
        assert!(diag.contains(LogCode::CorruptData));
    }

    #[test]
    fn rational_sign() {
        let mut e = Entry::new(Tag::FNumber, Format::SRational, 1,
                               vec![0, 0, 0, 28, 0, 0, 0, 10]).unwrap();
        fix_entry(&mut e, ByteOrder::Motorola, &mut Diagnostics::new());
        assert_eq!(e.format(), Format::Rational);
        assert_eq!(e.format_value(ByteOrder::Motorola), "2.8");
        let mut e = Entry::new(Tag::ExposureBiasValue, Format::Rational, 1,
                               vec![0, 0, 0, 0, 0, 0, 0, 1]).unwrap();
        fix_entry(&mut e, ByteOrder::Motorola, &mut Diagnostics::new());
        assert_eq!(e.format(), Format::SRational);
    }

    #[test]
    fn content() {
        let mo = ByteOrder::Motorola;
        let mut dir = Directory::new();
        dir.add(Entry::initialize(Tag::Orientation, mo));
        dir.add(Entry::initialize(Tag::ExposureTime, mo));
        dir.add(Entry::new(Tag(0xbeef), Format::Byte, 1, vec![1]).unwrap());
        let mut diag = Diagnostics::new();
        fix_content(&mut dir, Ifd::Zero, None, mo, &mut diag);
        assert!(dir.get(Tag::Orientation).is_some());
        assert!(dir.get(Tag::ExposureTime).is_none());
        assert!(dir.get(Tag(0xbeef)).is_some());
        for t in &[Tag::XResolution, Tag::YResolution, Tag::ResolutionUnit] {
            assert!(dir.get(*t).is_some());
        }
        assert_eq!(dir.len(), 5);

        let snapshot = dir.clone();
        fix_content(&mut dir, Ifd::Zero, None, mo, &mut Diagnostics::new());
        assert_eq!(dir, snapshot);
    }

    #[test]
    fn no_pointers_injected() {
        let mo = ByteOrder::Intel;
        let mut dir = Directory::new();
        fix_content(&mut dir, Ifd::One, Some(DataType::Compressed), mo,
                    &mut Diagnostics::new());
        assert!(dir.get(Tag::JPEGInterchangeFormat).is_none());
        assert!(dir.get(Tag::Compression).is_some());
    }

    #[test]
    fn thumbnail_ifd() {
        let mo = ByteOrder::Intel;
        let mut dirs: [Directory; 5] = Default::default();
        dirs[Ifd::One.index()].add(Entry::initialize(Tag::Compression, mo));
        let mut diag = Diagnostics::new();
        fix_data(&mut dirs, false, None, mo, &mut diag);
        assert!(dirs[Ifd::One.index()].is_empty());
        assert!(dirs[Ifd::Exif.index()].get(Tag::ExifVersion).is_some());
        assert!(diag.records().iter().any(|d| d.domain == "ExifData"));
    }
}
