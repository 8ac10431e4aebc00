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

use std::fmt;

use crate::endian::ByteOrder;
use crate::error::Error;
use crate::tag::Tag;
use crate::util;
use crate::value::{self, Format, Rational, SRational, Value};

/// An Exif entry: a tag and its raw value.
///
/// The value is kept as bytes in the byte order of the owning
/// `ExifData`.  The length of the bytes always equals
/// `format.size() * components`.
#[derive(Clone, Eq, PartialEq)]
pub struct Entry {
    tag: Tag,
    format: Format,
    components: u32,
    data: Vec<u8>,
}

impl Entry {
    /// Creates an entry from raw bytes.
    ///
    /// # Errors
    ///
    /// `Error::InvalidFormat` is returned if the length of `data` does
    /// not match the format and the number of components.
    pub fn new(tag: Tag, format: Format, components: u32, data: Vec<u8>)
               -> Result<Entry, Error> {
        match format.size().checked_mul(components as usize) {
            Some(size) if size == data.len() => Ok(Entry {
                tag: tag, format: format, components: components, data: data,
            }),
            _ => Err(Error::InvalidFormat("Size mismatch")),
        }
    }

    /// Creates an entry holding the default value for `tag`,
    /// encoded in `order`.
    ///
    /// Tags without a known default get an empty UNDEFINED value.
    ///
    /// # Examples
    /// ```
    /// use exifdata::{ByteOrder, Entry, Format, Tag};
    /// let e = Entry::initialize(Tag::XResolution, ByteOrder::Intel);
    /// assert_eq!(e.format(), Format::Rational);
    /// assert_eq!(e.format_value(ByteOrder::Intel), "72");
    /// ```
    pub fn initialize(tag: Tag, order: ByteOrder) -> Entry {
        let mut b = Builder { order: order, data: Vec::new() };
        let (format, components) = match tag {
            // LONG, 1 component, no default.
            Tag::PixelXDimension | Tag::PixelYDimension => {
                b.longs(&[0]);
                (Format::Long, 1)
            },
            // SHORT, 1 component, no default.
            Tag::SubjectLocation | Tag::SensingMethod |
            Tag::PhotometricInterpretation | Tag::Compression |
            Tag::ExposureMode | Tag::WhiteBalance |
            Tag::FocalLengthIn35mmFilm | Tag::GainControl |
            Tag::SubjectDistanceRange | Tag::Flash | Tag::ISOSpeedRatings |
            Tag::ImageWidth | Tag::ImageLength | Tag::ExposureProgram |
            Tag::LightSource | Tag::MeteringMode | Tag::CustomRendered |
            Tag::SceneCaptureType | Tag::Contrast | Tag::Saturation |
            Tag::Sharpness => {
                b.shorts(&[0]);
                (Format::Short, 1)
            },
            // SHORT, 1 component, default 1.
            Tag::Orientation | Tag::PlanarConfiguration |
            Tag::YCbCrPositioning => {
                b.shorts(&[1]);
                (Format::Short, 1)
            },
            // SHORT, 1 component, default 2 (inches).
            Tag::ResolutionUnit | Tag::FocalPlaneResolutionUnit => {
                b.shorts(&[2]);
                (Format::Short, 1)
            },
            Tag::SamplesPerPixel => {
                b.shorts(&[3]);
                (Format::Short, 1)
            },
            // Uncalibrated.
            Tag::ColorSpace => {
                b.shorts(&[0xffff]);
                (Format::Short, 1)
            },
            Tag::BitsPerSample => {
                b.shorts(&[8, 8, 8]);
                (Format::Short, 3)
            },
            Tag::YCbCrSubSampling => {
                b.shorts(&[2, 1]);
                (Format::Short, 2)
            },
            // SRATIONAL, 1 component, no default.
            Tag::ExposureBiasValue | Tag::BrightnessValue |
            Tag::ShutterSpeedValue => {
                b.srationals(&[SRational { num: 0, denom: 0 }]);
                (Format::SRational, 1)
            },
            // RATIONAL, 1 component, no default.
            Tag::ExposureTime | Tag::FocalPlaneXResolution |
            Tag::FocalPlaneYResolution | Tag::ExposureIndex |
            Tag::FlashEnergy | Tag::FNumber | Tag::FocalLength |
            Tag::SubjectDistance | Tag::MaxApertureValue |
            Tag::ApertureValue | Tag::CompressedBitsPerPixel |
            Tag::PrimaryChromaticities | Tag::DigitalZoomRatio => {
                b.rationals(&[Rational { num: 0, denom: 0 }]);
                (Format::Rational, 1)
            },
            // RATIONAL, 1 component, default 72/1.
            Tag::XResolution | Tag::YResolution => {
                b.rationals(&[Rational { num: 72, denom: 1 }]);
                (Format::Rational, 1)
            },
            Tag::WhitePoint => {
                b.rationals(&[Rational { num: 0, denom: 0 }; 2]);
                (Format::Rational, 2)
            },
            Tag::ReferenceBlackWhite => {
                let black = Rational { num: 0, denom: 1 };
                let white = Rational { num: 255, denom: 1 };
                b.rationals(&[black, white, black, white, black, white]);
                (Format::Rational, 6)
            },
            // ASCII, 20 components, the current time.
            Tag::DateTime | Tag::DateTimeOriginal |
            Tag::DateTimeDigitized => {
                b.bytes(&util::exif_datetime_now());
                b.bytes(b"\0");
                (Format::Ascii, 20)
            },
            // ASCII, any number of components.
            Tag::SubSecTime | Tag::SubSecTimeOriginal |
            Tag::SubSecTimeDigitized => (Format::Ascii, 0),
            Tag::ImageDescription | Tag::Make | Tag::Model |
            Tag::Software | Tag::Artist => {
                b.bytes(b"[None]\0");
                (Format::Ascii, 7)
            },
            // Photographer and editor copyright.
            Tag::Copyright => {
                b.bytes(b"[None]\0[None]\0");
                (Format::Ascii, 14)
            },
            // UNDEFINED with a fixed default.
            Tag::SceneType => {
                b.bytes(&[1]);
                (Format::Undefined, 1)
            },
            Tag::FileSource => {
                b.bytes(&[3]);
                (Format::Undefined, 1)
            },
            Tag::FlashpixVersion => {
                b.bytes(b"0100");
                (Format::Undefined, 4)
            },
            Tag::ExifVersion => {
                b.bytes(b"0210");
                (Format::Undefined, 4)
            },
            Tag::ComponentsConfiguration => {
                b.bytes(&[1, 2, 3, 0]);
                (Format::Undefined, 4)
            },
            _ => (Format::Undefined, 0),
        };
        Entry { tag: tag, format: format, components: components,
                data: b.data }
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    #[inline]
    pub fn components(&self) -> u32 {
        self.components
    }

    /// Returns the raw value bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the length of the raw value in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Replaces the value.
    ///
    /// # Errors
    ///
    /// `Error::InvalidFormat` is returned if the length of `data` does
    /// not match the format and the number of components.  The entry
    /// is left unchanged in that case.
    pub fn set_value(&mut self, format: Format, components: u32,
                     data: Vec<u8>) -> Result<(), Error> {
        *self = Entry::new(self.tag, format, components, data)?;
        Ok(())
    }

    // Replaces the value of an UNDEFINED (or byte-sized) entry.
    pub(crate) fn set_bytes(&mut self, format: Format, data: Vec<u8>) {
        debug_assert_eq!(format.size(), 1);
        self.format = format;
        self.components = data.len() as u32;
        self.data = data;
    }

    // Replaces the value without checking; the caller keeps the
    // length consistent with the format and the number of components.
    pub(crate) fn set_raw(&mut self, format: Format, components: u32,
                          data: Vec<u8>) {
        debug_assert_eq!(Some(data.len()),
                         format.size().checked_mul(components as usize));
        self.format = format;
        self.components = components;
        self.data = data;
    }

    /// Decodes the value.
    pub fn value(&self, order: ByteOrder) -> Value {
        Value::decode(self.format, &self.data, order)
    }

    /// Formats the value with the generic formatter.
    pub fn format_value(&self, order: ByteOrder) -> String {
        value::format_value(self.format, &self.data, order)
    }

    /// Re-encodes the value from one byte order to another.
    pub fn convert_byte_order(&mut self, from: ByteOrder, to: ByteOrder) {
        value::convert_byte_order(self.format, &mut self.data, from, to);
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Entry")
            .field("tag", &self.tag)
            .field("format", &self.format)
            .field("components", &self.components)
            .field("size", &self.data.len())
            .finish()
    }
}

struct Builder {
    order: ByteOrder,
    data: Vec<u8>,
}

impl Builder {
    fn bytes(&mut self, v: &[u8]) {
        self.data.extend_from_slice(v);
    }

    fn shorts(&mut self, v: &[u16]) {
        for &x in v {
            self.order.push_u16(&mut self.data, x);
        }
    }

    fn longs(&mut self, v: &[u32]) {
        for &x in v {
            self.order.push_u32(&mut self.data, x);
        }
    }

    fn rationals(&mut self, v: &[Rational]) {
        for r in v {
            self.order.push_u32(&mut self.data, r.num);
            self.order.push_u32(&mut self.data, r.denom);
        }
    }

    fn srationals(&mut self, v: &[SRational]) {
        for r in v {
            self.order.push_u32(&mut self.data, r.num as u32);
            self.order.push_u32(&mut self.data, r.denom as u32);
        }
    }
}
