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

use std::ptr;

use crate::diag::{Log, LogSink};
use crate::endian::ByteOrder;
use crate::entry::Entry;
use crate::fix;
use crate::ifd::Directory;
use crate::mnote::MakerNote;
use crate::tag::{DataType, Ifd, Tag};
use crate::tiff;
use crate::writer;

/// Options that change how Exif data is loaded and saved.
///
/// All options are off by default.
///
/// # Examples
/// ```
/// use exifdata::{ExifData, Options};
/// let mut data = ExifData::new();
/// data.set_options(*Options::new().ignore_unknown_tags(true)
///                                 .follow_specification(true));
/// assert!(data.options().follow_specification);
/// assert!(!data.options().keep_maker_note);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Options {
    /// Drop entries with tags that are not known in their IFD.
    pub ignore_unknown_tags: bool,
    /// Run the fixup engine after loading and before saving.
    pub follow_specification: bool,
    /// Save the MakerNote bytes as they are instead of re-serializing
    /// the parsed MakerNote.
    pub keep_maker_note: bool,
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn ignore_unknown_tags(&mut self, yes: bool) -> &mut Self {
        self.ignore_unknown_tags = yes;
        self
    }

    pub fn follow_specification(&mut self, yes: bool) -> &mut Self {
        self.follow_specification = yes;
        self
    }

    pub fn keep_maker_note(&mut self, yes: bool) -> &mut Self {
        self.keep_maker_note = yes;
        self
    }
}

/// A container of Exif attributes: five IFDs, an optional thumbnail,
/// and an optional parsed MakerNote.
///
/// Pointer tags (Exif, GPS, and Interoperability IFD pointers and
/// the thumbnail location) are not kept as entries.  They are derived
/// from the contents when the data is saved.
///
/// # Examples
/// ```
/// use exifdata::{ByteOrder, ExifData, Ifd, Tag};
/// let mut data = ExifData::new();
/// data.load(b"II\x2a\x00\x08\x00\x00\x00\x01\x00\
///             \x12\x01\x03\x00\x01\x00\x00\x00\x03\x00\x00\x00\
///             \x00\x00\x00\x00");
/// assert_eq!(data.byte_order(), ByteOrder::Intel);
/// assert_eq!(data.ifd(Ifd::Zero).len(), 1);
/// let e = data.entry(Tag::Orientation).unwrap();
/// assert_eq!(e.value(data.byte_order()).get_uint(0), Some(3));
///
/// let buf = data.save();
/// assert!(buf.starts_with(b"Exif\0\0II"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExifData {
    ifds: [Directory; 5],
    order: ByteOrder,
    data_type: Option<DataType>,
    options: Options,
    thumbnail: Option<Vec<u8>>,
    maker_note: Option<MakerNote>,
}

impl ExifData {
    /// Creates empty Exif data in the Motorola byte order.
    pub fn new() -> ExifData {
        ExifData::default()
    }

    /// Loads an Exif block, reporting problems to the `log` crate.
    /// See [`load_with`](Self::load_with).
    pub fn load(&mut self, data: &[u8]) {
        self.load_with(data, &mut LogSink);
    }

    /// Loads an Exif block, which starts with "Exif\0\0" or directly
    /// with the TIFF header.
    ///
    /// Previous entries, the thumbnail, and the MakerNote are
    /// discarded.  If the header is unusable, the container is left
    /// empty.  Malformed parts are skipped and reported to `log`.
    pub fn load_with(&mut self, data: &[u8], log: &mut dyn Log) {
        for dir in &mut self.ifds {
            dir.clear();
        }
        self.thumbnail = None;
        self.maker_note = None;

        let parsed = match tiff::parse_exif(
            data, self.options.ignore_unknown_tags, log) {
            Some(parsed) => parsed,
            None => return,
        };
        self.ifds = parsed.ifds;
        self.order = parsed.order;
        self.thumbnail = parsed.thumbnail;
        self.maker_note = parsed.maker_note;

        if self.options.follow_specification {
            self.fix_with(log);
        }
    }

    /// Encodes the data into an Exif block that starts with
    /// "Exif\0\0", reporting problems to the `log` crate.
    pub fn save(&mut self) -> Vec<u8> {
        self.save_with(&mut LogSink)
    }

    /// Encodes the data into an Exif block that starts with
    /// "Exif\0\0".
    ///
    /// Saving takes `&mut self`.  The fixup engine may run first (see
    /// [`Options::follow_specification`]).  Also, the MakerNote entry
    /// is updated with the re-serialized MakerNote unless
    /// [`Options::keep_maker_note`] is set.
    pub fn save_with(&mut self, log: &mut dyn Log) -> Vec<u8> {
        if self.options.follow_specification {
            self.fix_with(log);
        }
        let maker_note = match self.options.keep_maker_note {
            true => None,
            false => self.maker_note.as_mut(),
        };
        writer::encode(&mut self.ifds, self.order, self.thumbnail.as_deref(),
                       maker_note, log)
    }

    /// Makes the data conform to the Exif standard, reporting changes
    /// to the `log` crate.  See [`fix_with`](Self::fix_with).
    pub fn fix(&mut self) {
        self.fix_with(&mut LogSink);
    }

    /// Makes the data conform to the Exif standard.  Entry formats are
    /// normalized, tags not recorded for the data type are removed,
    /// missing mandatory tags are added with their default values, and
    /// IFD1 is emptied if there is no thumbnail.
    pub fn fix_with(&mut self, log: &mut dyn Log) {
        fix::fix_data(&mut self.ifds, self.thumbnail.is_some(),
                      self.data_type, self.order, log);
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Changes the byte order, re-encoding the values of all entries
    /// and of the MakerNote.
    pub fn set_byte_order(&mut self, order: ByteOrder) {
        if order == self.order {
            return;
        }
        for dir in &mut self.ifds {
            for e in dir.iter_mut() {
                e.convert_byte_order(self.order, order);
            }
        }
        if let Some(mn) = self.maker_note.as_mut() {
            mn.set_byte_order(order);
        }
        self.order = order;
    }

    /// Returns the entry with `tag`, searching IFD0, IFD1, Exif, GPS,
    /// and Interoperability IFDs in this order.
    pub fn entry(&self, tag: Tag) -> Option<&Entry> {
        self.ifds.iter().find_map(|d| d.get(tag))
    }

    pub fn entry_mut(&mut self, tag: Tag) -> Option<&mut Entry> {
        self.ifds.iter_mut().find_map(|d| d.get_mut(tag))
    }

    #[inline]
    pub fn ifd(&self, ifd: Ifd) -> &Directory {
        &self.ifds[ifd.index()]
    }

    #[inline]
    pub fn ifd_mut(&mut self, ifd: Ifd) -> &mut Directory {
        &mut self.ifds[ifd.index()]
    }

    /// Returns the role of `dir` if it is one of the IFDs of this
    /// container.
    ///
    /// # Examples
    /// ```
    /// use exifdata::{Directory, ExifData, Ifd};
    /// let data = ExifData::new();
    /// assert_eq!(data.ifd_of(data.ifd(Ifd::Gps)), Some(Ifd::Gps));
    /// assert_eq!(data.ifd_of(&Directory::new()), None);
    /// ```
    pub fn ifd_of(&self, dir: &Directory) -> Option<Ifd> {
        Ifd::ALL.iter().copied()
            .find(|ifd| ptr::eq(&self.ifds[ifd.index()], dir))
    }

    /// Returns the thumbnail image, usually a JPEG stream.
    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    pub fn set_thumbnail(&mut self, thumbnail: Vec<u8>) {
        self.thumbnail = Some(thumbnail);
    }

    pub fn remove_thumbnail(&mut self) -> Option<Vec<u8>> {
        self.thumbnail.take()
    }

    pub fn maker_note(&self) -> Option<&MakerNote> {
        self.maker_note.as_ref()
    }

    pub fn maker_note_mut(&mut self) -> Option<&mut MakerNote> {
        self.maker_note.as_mut()
    }

    /// Replaces the parsed MakerNote.  It is serialized into the
    /// MakerNote entry of the Exif IFD when the data is saved.
    pub fn set_maker_note(&mut self, maker_note: Option<MakerNote>) {
        self.maker_note = maker_note;
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    #[inline]
    pub fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    /// Sets the kind of image data, which decides the mandatory and
    /// not-recorded tags for the fixup engine.
    pub fn set_data_type(&mut self, data_type: Option<DataType>) {
        self.data_type = data_type;
    }
}

#[cfg(test)]
mod tests {
    use crate::diag::{Diagnostics, LogCode};
    use crate::mnote::{MnoteEntry, Vendor};
    use crate::value::Format;
    use super::*;

    const ORIENTATION: &[u8] =
        b"II\x2a\0\x08\0\0\0\
          \x01\0\x12\x01\x03\0\x01\0\0\0\x03\0\0\0\0\0\0\0";

    #[test]
    fn load_and_save_single_entry() {
        let mut data = ExifData::new();
        data.load(ORIENTATION);
        assert_eq!(data.ifd(Ifd::Zero).len(), 1);
        assert_eq!(data.entry(Tag::Orientation).unwrap()
                   .value(data.byte_order()).get_uint(0), Some(3));
        let buf = data.save();
        let tiff = &buf[6..];
        assert_eq!(tiff, ORIENTATION);
        assert_eq!(ByteOrder::Intel.get_u16(tiff, 8), 1);
        assert_eq!(ByteOrder::Intel.get_u32(tiff, 22), 0);
    }

    #[test]
    fn bad_header_leaves_empty() {
        let mut data = ExifData::new();
        data.load(ORIENTATION);
        let mut diag = Diagnostics::new();
        data.load_with(b"MM\0", &mut diag);
        assert!(Ifd::ALL.iter().all(|&i| data.ifd(i).is_empty()));
        assert!(diag.contains(LogCode::CorruptData));
    }

    #[test]
    fn ifd_of() {
        let mut data = ExifData::new();
        data.load(ORIENTATION);
        for &ifd in &Ifd::ALL {
            assert_eq!(data.ifd_of(data.ifd(ifd)), Some(ifd));
        }
        let copy = data.ifd(Ifd::Zero).clone();
        assert_eq!(&copy, data.ifd(Ifd::Zero));
        assert_eq!(data.ifd_of(&copy), None);
    }

    #[test]
    fn byte_order_is_self_inverse() {
        let mut data = ExifData::new();
        data.load(ORIENTATION);
        let before = data.ifd(Ifd::Zero).clone();
        data.set_byte_order(ByteOrder::Motorola);
        assert_eq!(data.entry(Tag::Orientation).unwrap().data(), b"\x00\x03");
        data.set_byte_order(ByteOrder::Intel);
        data.set_byte_order(ByteOrder::Intel);
        assert_eq!(data.ifd(Ifd::Zero), &before);
    }

    #[test]
    fn follow_specification_on_load() {
        let mut data = ExifData::new();
        data.options_mut().follow_specification(true);
        let mut diag = Diagnostics::new();
        data.load_with(ORIENTATION, &mut diag);
        let ifd0 = data.ifd(Ifd::Zero);
        assert!(ifd0.get(Tag::XResolution).is_some());
        assert!(ifd0.get(Tag::ResolutionUnit).is_some());
        assert!(ifd0.get(Tag::Orientation).is_some());
        assert!(diag.records().iter()
                .any(|d| d.message.contains("mandatory")));
    }

    #[test]
    fn thumbnail_accessors() {
        let mut data = ExifData::new();
        assert_eq!(data.thumbnail(), None);
        data.set_thumbnail(b"\xff\xd8\xff\xd9".to_vec());
        let buf = data.save();
        let mut data2 = ExifData::new();
        data2.load(&buf);
        assert_eq!(data2.thumbnail(), Some(&b"\xff\xd8\xff\xd9"[..]));
        assert!(data2.ifd(Ifd::One).is_empty());
        assert_eq!(data2.remove_thumbnail().as_deref(),
                   Some(&b"\xff\xd8\xff\xd9"[..]));
        assert_eq!(data2.thumbnail(), None);
    }

    fn canon_data(options: Options) -> ExifData {
        let mo = ByteOrder::Motorola;
        let mut data = ExifData::new();
        data.set_options(options);
        data.ifd_mut(Ifd::Zero).add(
            Entry::new(Tag::Make, Format::Ascii, 6, b"Canon\0".to_vec())
            .unwrap());
        data.ifd_mut(Ifd::Exif).add(
            Entry::new(Tag::MakerNote, Format::Undefined, 2, vec![0, 0])
            .unwrap());
        let mut mn = MakerNote::new(Vendor::Canon, mo);
        mn.push(MnoteEntry::new(0x0006, Format::Ascii, 10,
                                b"EOS 5D II\0".to_vec()).unwrap());
        data.set_maker_note(Some(mn));
        data
    }

    #[test]
    fn maker_note_is_reserialized() {
        let mut data = canon_data(Options::new());
        let buf = data.save();
        let mut diag = Diagnostics::new();
        let mut data2 = ExifData::new();
        data2.load_with(&buf, &mut diag);
        assert!(!diag.contains(LogCode::CorruptData));
        let mn = data2.maker_note().unwrap();
        assert_eq!(mn.vendor(), Vendor::Canon);
        assert_eq!(mn.count(), 1);
        assert_eq!(mn.value(0).unwrap(), "EOS 5D II");
        assert_eq!(data.entry(Tag::MakerNote).unwrap().data(),
                   data2.entry(Tag::MakerNote).unwrap().data());
    }

    #[test]
    fn maker_note_kept_verbatim() {
        let mut data = canon_data(*Options::new().keep_maker_note(true));
        let buf = data.save();
        assert_eq!(data.entry(Tag::MakerNote).unwrap().data(), b"\0\0");
        let mut data2 = ExifData::new();
        data2.load(&buf);
        assert_eq!(data2.maker_note().unwrap().count(), 0);
    }
}
