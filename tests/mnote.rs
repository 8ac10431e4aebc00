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

//! MakerNotes of each dialect are saved into an Exif block, loaded
//! back, and compared.

use exifdata::mnote::{OlympusVariant, PentaxVariant};
use exifdata::{ByteOrder, Diagnostics, Entry, ExifData, Format, Ifd,
               LogCode, MakerNote, MnoteEntry, Tag, Vendor, identify};

fn ascii(tag: Tag, s: &[u8]) -> Entry {
    Entry::new(tag, Format::Ascii, s.len() as u32, s.to_vec()).unwrap()
}

fn short(order: ByteOrder, tag: u16, v: u16) -> MnoteEntry {
    let mut buf = vec![0; 2];
    order.set_u16(&mut buf, 0, v);
    MnoteEntry::new(tag, Format::Short, 1, buf).unwrap()
}

fn text(tag: u16, s: &[u8]) -> MnoteEntry {
    MnoteEntry::new(tag, Format::Ascii, s.len() as u32, s.to_vec()).unwrap()
}

// Builds Exif data with a MakerNote.  The IFD0 holds a value with an
// odd length so that the MakerNote lands on a padded position.
fn build(order: ByteOrder, make: &[u8], vendor: Vendor,
         entries: Vec<MnoteEntry>) -> ExifData {
    let mut data = ExifData::new();
    data.set_byte_order(order);
    data.ifd_mut(Ifd::Zero).add(ascii(Tag::Make, make));
    data.ifd_mut(Ifd::Zero).add(ascii(Tag::Software, b"odd\0\0"));
    data.ifd_mut(Ifd::Exif).add(
        Entry::new(Tag::MakerNote, Format::Undefined, 0, Vec::new())
        .unwrap());
    let mut mn = MakerNote::new(vendor, order);
    for e in entries {
        mn.push(e);
    }
    data.set_maker_note(Some(mn));
    data
}

// Saves and re-loads the data and returns the re-loaded one.
fn reload(data: &mut ExifData) -> ExifData {
    let mut diag = Diagnostics::new();
    let buf = data.save_with(&mut diag);
    let mut data2 = ExifData::new();
    data2.load_with(&buf, &mut diag);
    assert!(!diag.contains(LogCode::CorruptData), "{:?}", diag.records());
    let (mn1, mn2) = (data.maker_note().unwrap(),
                      data2.maker_note().unwrap());
    assert_eq!(mn2.vendor(), mn1.vendor());
    assert_eq!(mn2.byte_order(), mn1.byte_order());
    assert_eq!(mn2.entries(), mn1.entries());
    assert_eq!(data2.entry(Tag::MakerNote).unwrap().data(),
               data.entry(Tag::MakerNote).unwrap().data());
    data2
}

#[test]
fn canon() {
    for &order in &[ByteOrder::Motorola, ByteOrder::Intel] {
        let mut data = build(order, b"Canon\0", Vendor::Canon, vec![
            text(0x0006, b"Canon EOS 5D\0"),
            short(order, 0x0010, 0x0213),
            text(0x0007, b"Firmware Version 1.1.1\0"),
        ]);
        let data2 = reload(&mut data);
        let mn = data2.maker_note().unwrap();
        assert_eq!(mn.count(), 3);
        assert_eq!(mn.value(0).unwrap(), "Canon EOS 5D");
        assert_eq!(mn.value(1).unwrap(), "531");
    }
}

#[test]
fn canon_follows_byte_order() {
    let mo = ByteOrder::Motorola;
    let mut data = build(mo, b"Canon\0", Vendor::Canon, vec![
        short(mo, 0x0010, 0x0213),
        text(0x0006, b"Canon EOS 5D\0"),
    ]);
    data.set_byte_order(ByteOrder::Intel);
    assert_eq!(data.maker_note().unwrap().byte_order(), ByteOrder::Intel);
    let data2 = reload(&mut data);
    assert_eq!(data2.maker_note().unwrap().value(0).unwrap(), "531");
}

#[test]
fn fuji() {
    let ii = ByteOrder::Intel;
    let mut data = build(ByteOrder::Motorola, b"FUJIFILM\0", Vendor::Fuji,
                         vec![text(0x0000, b"0130"),
                              short(ii, 0x1001, 3),
                              text(0x1000, b"NORMAL \0")]);
    assert_eq!(data.maker_note().unwrap().byte_order(), ii);
    let data2 = reload(&mut data);
    let mn = data2.maker_note().unwrap();
    assert_eq!(mn.value(1).unwrap(), "3");
    assert_eq!(mn.name(1), Some("Sharpness"));

    // The Fuji MakerNote is always little endian.
    data.set_byte_order(ByteOrder::Intel);
    data.set_byte_order(ByteOrder::Motorola);
    assert_eq!(data.maker_note().unwrap().byte_order(), ii);
    reload(&mut data);
}

#[test]
fn olympus_family() {
    let variants = [
        OlympusVariant::Olympus1, OlympusVariant::Olympus2,
        OlympusVariant::Sanyo, OlympusVariant::Epson,
        OlympusVariant::Nikon2,
    ];
    for &v in &variants {
        for &order in &[ByteOrder::Motorola, ByteOrder::Intel] {
            let mut data = build(order, b"Some Camera\0", Vendor::Olympus(v),
                                 vec![short(order, 0x0201, 2),
                                      text(0x0207, b"SX751\0")]);
            let data2 = reload(&mut data);
            let mn = data2.maker_note().unwrap();
            assert_eq!(mn.vendor(), Vendor::Olympus(v));
            assert_eq!(mn.value(1).unwrap(), "SX751");
        }
    }
}

#[test]
fn nikon1() {
    let mo = ByteOrder::Motorola;
    let mut data = build(mo, b"NIKON\0", Vendor::Olympus(OlympusVariant::Nikon1),
                         vec![text(0x8003, b"FINE  \0"),
                              text(0x8004, b"COLOR\0")]);
    let data2 = reload(&mut data);
    let mn = data2.maker_note().unwrap();
    assert_eq!(mn.tag(0), Some(0x8003));
    assert_eq!(mn.title(1), Some("Color Mode"));
}

#[test]
fn pentax_family() {
    let variants = [
        PentaxVariant::Pentax2, PentaxVariant::Pentax3, PentaxVariant::Casio2,
    ];
    for &v in &variants {
        for &order in &[ByteOrder::Motorola, ByteOrder::Intel] {
            let mut data = build(order, b"PENTAX Corporation\0",
                                 Vendor::Pentax(v),
                                 vec![short(order, 0x4001, 1),
                                      text(0x4019, b"Daylight\0")]);
            let data2 = reload(&mut data);
            let mn = data2.maker_note().unwrap();
            assert_eq!(mn.vendor(), Vendor::Pentax(v));
            assert_eq!(mn.name(0), Some("Mode"));
        }
    }
}

#[test]
fn pentax1() {
    let mo = ByteOrder::Motorola;
    // Version 1 is told by the count 0x1b at the start.
    let mut entries = (0..0x1b).map(|t| short(mo, t, t)).collect::<Vec<_>>();
    entries[2] = text(0x0002, b"Quality\0");
    let mut data = build(mo, b"Asahi Optical Co.,Ltd\0",
                         Vendor::Pentax(PentaxVariant::Pentax1), entries);
    let data2 = reload(&mut data);
    let mn = data2.maker_note().unwrap();
    assert_eq!(mn.count(), 0x1b);
    assert_eq!(mn.value(2).unwrap(), "Quality");
}

#[test]
fn dispatch() {
    let canon: &[u8] = b"Canon";
    let nikon: &[u8] = b"NIKON CORPORATION";
    assert_eq!(identify(Some(canon), b""), Some(Vendor::Canon));
    assert_eq!(identify(Some(canon), b"FUJIFILM\x0c\0\0\0"),
               Some(Vendor::Fuji));
    assert_eq!(identify(None, b"FUJIFILM\x0c\0\0\0"), Some(Vendor::Fuji));
    assert_eq!(identify(Some(&b"Canon Inc."[..]), b""), None);
    assert_eq!(identify(Some(nikon), b"\x00\x1b\x00\x00"),
               Some(Vendor::Olympus(OlympusVariant::Nikon0)));
    assert_eq!(identify(None, b"\x00\x1b\x00\x00"),
               Some(Vendor::Pentax(PentaxVariant::Pentax1)));
    assert_eq!(identify(None, b"AOC\0MM\0\0"),
               Some(Vendor::Pentax(PentaxVariant::Pentax3)));
    assert_eq!(identify(None, b"AOC\0\0\0\0\0"),
               Some(Vendor::Pentax(PentaxVariant::Pentax2)));
    assert_eq!(identify(None, b"QVC\0\0\0\0\0"),
               Some(Vendor::Pentax(PentaxVariant::Casio2)));
    assert_eq!(identify(None, b"Nikon\0\x02\x10\0\0"),
               Some(Vendor::Olympus(OlympusVariant::Nikon2)));
}

// The MakerNote value points out of the buffer.  The MakerNote is
// dropped but everything else is kept.
#[test]
fn broken_maker_note() {
    let mo = ByteOrder::Motorola;
    let mut data = build(mo, b"Canon\0", Vendor::Canon,
                         vec![text(0x0006, b"Canon EOS 5D\0")]);
    let buf = data.save();
    let mut buf = buf[..buf.len() - 4].to_vec();
    let mut diag = Diagnostics::new();
    let mut data2 = ExifData::new();
    data2.load_with(&buf, &mut diag);
    assert!(data2.entry(Tag::Make).is_some());
    assert!(diag.contains(LogCode::CorruptData));
    if let Some(mn) = data2.maker_note() {
        assert_eq!(mn.count(), 0);
    }

    // Now the count of the Canon MakerNote is too large.
    buf = data.save();
    let ofs = data.maker_note().unwrap().offset() as usize;
    mo.set_u16(&mut buf, 6 + ofs, 0xfff0);
    let mut diag = Diagnostics::new();
    data2.load_with(&buf, &mut diag);
    let mn = data2.maker_note().unwrap();
    assert_eq!(mn.count(), 1);
    assert_eq!(mn.value(0).unwrap(), "Canon EOS 5D");
    assert!(diag.contains(LogCode::CorruptData));
}
