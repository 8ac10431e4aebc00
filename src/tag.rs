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

// This is not an enum to keep safety and API stability, while
// supporting unknown tag values.
// Storing unknown values in a repr(u16) enum is unsafe.  The compiler
// assumes that there is no undefined discriminant even with a C-like
// enum, so the exhaustiveness check of a match expression will break.
// Storing unknown values in a special variant such as Unknown(u16)
// tends to break backward compatibility.  When Tag::VariantFoo is
// defined in a new version of the library, the old codes using
// Tag::Unknown(Foo's value) will break.
//
// GPS and Interoperability tags share numbers (e.g., 0x0001 is both
// GPSLatitudeRef and InteroperabilityIndex), so a tag is only
// meaningful together with the IFD it lives in.

/// A tag of an Exif entry.
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u16);

impl Tag {
    /// Returns the tag number.
    #[inline]
    pub fn number(self) -> u16 {
        self.0
    }

    /// Returns the name of the tag, looking at every IFD.
    pub fn name(self) -> Option<&'static str> {
        CATALOG.iter().find(|t| t.tag == self).map(|t| t.name)
    }

    /// Returns the name of the tag if it is recorded in `ifd` for
    /// at least one data type.
    pub fn name_in(self, ifd: Ifd) -> Option<&'static str> {
        CATALOG.iter()
            .filter(|t| t.tag == self)
            .find(|t| t.esl[ifd.index()].iter()
                  .any(|&s| s != Support::NotRecorded))
            .map(|t| t.name)
    }

    /// Returns true for the tags that only describe the layout of
    /// the Exif block.  They are synthesized when saving and never
    /// kept as entries.
    pub fn is_pointer(self) -> bool {
        matches!(self, Tag::ExifIFDPointer | Tag::GPSInfoIFDPointer |
                 Tag::InteropIFDPointer | Tag::JPEGInterchangeFormat |
                 Tag::JPEGInterchangeFormatLength)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Tag({}, {:#06x})", name, self.0),
            None => write!(f, "Tag({:#06x})", self.0),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Tag {:#06x}", self.0),
        }
    }
}

/// The role of an IFD in an Exif block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Ifd {
    /// IFD0, describing the primary image.
    Zero,
    /// IFD1, describing the thumbnail image.
    One,
    /// Exif private IFD.
    Exif,
    /// GPS IFD.
    Gps,
    /// Interoperability IFD.
    Interoperability,
}

impl Ifd {
    pub const ALL: [Ifd; 5] =
        [Ifd::Zero, Ifd::One, Ifd::Exif, Ifd::Gps, Ifd::Interoperability];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Ifd::Zero => "0",
            Ifd::One => "1",
            Ifd::Exif => "EXIF",
            Ifd::Gps => "GPS",
            Ifd::Interoperability => "Interoperability",
        }
    }
}

impl fmt::Display for Ifd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of image data the Exif block describes.  It decides
/// which tags are mandatory or not recorded [EXIF23 4.6.3-4.6.8].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataType {
    UncompressedChunky,
    UncompressedPlanar,
    UncompressedYcc,
    Compressed,
}

impl DataType {
    pub const ALL: [DataType; 4] = [
        DataType::UncompressedChunky, DataType::UncompressedPlanar,
        DataType::UncompressedYcc, DataType::Compressed,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Whether a tag is recorded in an IFD.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Support {
    NotRecorded,
    Mandatory,
    Optional,
    /// The level differs among data types, or the tag is not
    /// in the catalog.
    Unknown,
}

/// Returns the support level of `tag` in `ifd`.
///
/// If `data_type` is `None`, a level is returned only when it is
/// the same for every data type; otherwise `Support::Unknown`.
/// Tags missing from the catalog are `Support::Unknown`.
pub fn support_level(tag: Tag, ifd: Ifd, data_type: Option<DataType>)
                     -> Support {
    let mut known = false;
    for info in CATALOG.iter().filter(|t| t.tag == tag) {
        known = true;
        let levels = &info.esl[ifd.index()];
        let level = match data_type {
            Some(dt) => levels[dt.index()],
            None if levels.iter().all(|&s| s == levels[0]) => levels[0],
            None => Support::Unknown,
        };
        if level != Support::NotRecorded {
            return level;
        }
    }
    match known {
        true => Support::NotRecorded,
        false => Support::Unknown,
    }
}

/// Returns the tags that are mandatory in `ifd` for `data_type`.
pub fn mandatory_tags(ifd: Ifd, data_type: Option<DataType>)
                      -> impl Iterator<Item = Tag> {
    CATALOG.iter()
        .map(|t| t.tag)
        .filter(move |&t| support_level(t, ifd, data_type) ==
                Support::Mandatory)
}

pub(crate) struct TagInfo {
    tag: Tag,
    name: &'static str,
    // Indexed by Ifd and DataType.
    esl: [[Support; 4]; 5],
}

// Converts a four-letter code (one letter per DataType) into levels:
// M = mandatory, O = optional, N = not recorded.
const fn esl(code: &str) -> [Support; 4] {
    let b = code.as_bytes();
    let mut levels = [Support::Unknown; 4];
    let mut i = 0;
    while i < 4 {
        levels[i] = match b[i] {
            b'M' => Support::Mandatory,
            b'O' => Support::Optional,
            b'N' => Support::NotRecorded,
            _ => Support::Unknown,
        };
        i += 1;
    }
    levels
}

macro_rules! generate_well_known_tags {
    ( $( ($name:ident, $num:expr,
          $ifd0:expr, $ifd1:expr, $exif:expr, $gps:expr, $interop:expr) ),+
      , ) => (
        impl Tag {
            $( pub const $name: Tag = Tag($num); )+
        }

        static CATALOG: &[TagInfo] = &[
            $( TagInfo {
                tag: Tag($num),
                name: stringify!($name),
                esl: [esl($ifd0), esl($ifd1), esl($exif),
                      esl($gps), esl($interop)],
            }, )+
        ];
    )
}

generate_well_known_tags! {
    // Interoperability IFD [EXIF23 4.6.7].
    (InteroperabilityIndex, 0x0001, "NNNN", "NNNN", "NNNN", "NNNN", "OOOO"),
    (InteroperabilityVersion, 0x0002,
     "NNNN", "NNNN", "NNNN", "NNNN", "OOOO"),

    // GPS IFD [EXIF23 4.6.6].
    (GPSVersionID, 0x0000, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSLatitudeRef, 0x0001, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSLatitude, 0x0002, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSLongitudeRef, 0x0003, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSLongitude, 0x0004, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSAltitudeRef, 0x0005, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSAltitude, 0x0006, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSTimeStamp, 0x0007, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSSatellites, 0x0008, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSStatus, 0x0009, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSMeasureMode, 0x000a, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDOP, 0x000b, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSSpeedRef, 0x000c, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSSpeed, 0x000d, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSTrackRef, 0x000e, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSTrack, 0x000f, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSImgDirectionRef, 0x0010, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSImgDirection, 0x0011, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSMapDatum, 0x0012, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDestLatitudeRef, 0x0013, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDestLatitude, 0x0014, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDestLongitudeRef, 0x0015, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDestLongitude, 0x0016, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDestBearingRef, 0x0017, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDestBearing, 0x0018, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDestDistanceRef, 0x0019, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDestDistance, 0x001a, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSProcessingMethod, 0x001b, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSAreaInformation, 0x001c, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDateStamp, 0x001d, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),
    (GPSDifferential, 0x001e, "NNNN", "NNNN", "NNNN", "OOOO", "NNNN"),

    // IFD0 and IFD1 [EXIF23 4.6.4 and 4.6.8].
    (NewSubfileType, 0x00fe, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (ImageWidth, 0x0100, "MMMN", "MMMN", "NNNN", "NNNN", "NNNN"),
    (ImageLength, 0x0101, "MMMN", "MMMN", "NNNN", "NNNN", "NNNN"),
    (BitsPerSample, 0x0102, "MMMN", "MMMN", "NNNN", "NNNN", "NNNN"),
    (Compression, 0x0103, "MMMN", "MMMM", "NNNN", "NNNN", "NNNN"),
    (PhotometricInterpretation, 0x0106,
     "MMMN", "MMMN", "NNNN", "NNNN", "NNNN"),
    (ImageDescription, 0x010e, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (Make, 0x010f, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (Model, 0x0110, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (StripOffsets, 0x0111, "MMMN", "MMMN", "NNNN", "NNNN", "NNNN"),
    (Orientation, 0x0112, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (SamplesPerPixel, 0x0115, "MMMN", "MMMN", "NNNN", "NNNN", "NNNN"),
    (RowsPerStrip, 0x0116, "MMMN", "MMMN", "NNNN", "NNNN", "NNNN"),
    (StripByteCounts, 0x0117, "MMMN", "MMMN", "NNNN", "NNNN", "NNNN"),
    (XResolution, 0x011a, "MMMM", "MMMM", "NNNN", "NNNN", "NNNN"),
    (YResolution, 0x011b, "MMMM", "MMMM", "NNNN", "NNNN", "NNNN"),
    (PlanarConfiguration, 0x011c, "OMON", "OMON", "NNNN", "NNNN", "NNNN"),
    (ResolutionUnit, 0x0128, "MMMM", "MMMM", "NNNN", "NNNN", "NNNN"),
    (TransferFunction, 0x012d, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (Software, 0x0131, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (DateTime, 0x0132, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (Artist, 0x013b, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (WhitePoint, 0x013e, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (PrimaryChromaticities, 0x013f, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (JPEGInterchangeFormat, 0x0201, "NNNN", "NNNM", "NNNN", "NNNN", "NNNN"),
    (JPEGInterchangeFormatLength, 0x0202,
     "NNNN", "NNNM", "NNNN", "NNNN", "NNNN"),
    (YCbCrCoefficients, 0x0211, "NNOO", "NNOO", "NNNN", "NNNN", "NNNN"),
    (YCbCrSubSampling, 0x0212, "NNMN", "NNMN", "NNNN", "NNNN", "NNNN"),
    (YCbCrPositioning, 0x0213, "NNMM", "NNOO", "NNNN", "NNNN", "NNNN"),
    (ReferenceBlackWhite, 0x0214, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (Copyright, 0x8298, "OOOO", "NNNN", "NNNN", "NNNN", "NNNN"),
    (ExifIFDPointer, 0x8769, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),
    (GPSInfoIFDPointer, 0x8825, "OOOO", "OOOO", "NNNN", "NNNN", "NNNN"),

    // Exif IFD [EXIF23 4.6.5].
    (ExposureTime, 0x829a, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (FNumber, 0x829d, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (ExposureProgram, 0x8822, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SpectralSensitivity, 0x8824, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (ISOSpeedRatings, 0x8827, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (OECF, 0x8828, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (ExifVersion, 0x9000, "NNNN", "NNNN", "MMMM", "NNNN", "NNNN"),
    (DateTimeOriginal, 0x9003, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (DateTimeDigitized, 0x9004, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (ComponentsConfiguration, 0x9101,
     "NNNN", "NNNN", "NNNM", "NNNN", "NNNN"),
    (CompressedBitsPerPixel, 0x9102, "NNNN", "NNNN", "NNNO", "NNNN", "NNNN"),
    (ShutterSpeedValue, 0x9201, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (ApertureValue, 0x9202, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (BrightnessValue, 0x9203, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (ExposureBiasValue, 0x9204, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (MaxApertureValue, 0x9205, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SubjectDistance, 0x9206, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (MeteringMode, 0x9207, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (LightSource, 0x9208, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (Flash, 0x9209, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (FocalLength, 0x920a, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SubjectArea, 0x9214, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (MakerNote, 0x927c, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (UserComment, 0x9286, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SubSecTime, 0x9290, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SubSecTimeOriginal, 0x9291, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SubSecTimeDigitized, 0x9292, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (FlashpixVersion, 0xa000, "NNNN", "NNNN", "MMMM", "NNNN", "NNNN"),
    (ColorSpace, 0xa001, "NNNN", "NNNN", "MMMM", "NNNN", "NNNN"),
    (PixelXDimension, 0xa002, "NNNN", "NNNN", "NNNM", "NNNN", "NNNN"),
    (PixelYDimension, 0xa003, "NNNN", "NNNN", "NNNM", "NNNN", "NNNN"),
    (RelatedSoundFile, 0xa004, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (InteropIFDPointer, 0xa005, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (FlashEnergy, 0xa20b, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SpatialFrequencyResponse, 0xa20c,
     "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (FocalPlaneXResolution, 0xa20e, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (FocalPlaneYResolution, 0xa20f, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (FocalPlaneResolutionUnit, 0xa210,
     "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SubjectLocation, 0xa214, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (ExposureIndex, 0xa215, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SensingMethod, 0xa217, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (FileSource, 0xa300, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SceneType, 0xa301, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (CFAPattern, 0xa302, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (CustomRendered, 0xa401, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (ExposureMode, 0xa402, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (WhiteBalance, 0xa403, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (DigitalZoomRatio, 0xa404, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (FocalLengthIn35mmFilm, 0xa405, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SceneCaptureType, 0xa406, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (GainControl, 0xa407, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (Contrast, 0xa408, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (Saturation, 0xa409, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (Sharpness, 0xa40a, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (DeviceSettingDescription, 0xa40b,
     "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (SubjectDistanceRange, 0xa40c, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (ImageUniqueID, 0xa420, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (CameraOwnerName, 0xa430, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (BodySerialNumber, 0xa431, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (LensSpecification, 0xa432, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (LensMake, 0xa433, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (LensModel, 0xa434, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (LensSerialNumber, 0xa435, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
    (Gamma, 0xa500, "NNNN", "NNNN", "OOOO", "NNNN", "NNNN"),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_constant() {
        assert_eq!(Tag::ExifVersion.number(), 0x9000);
        assert_eq!(Tag::GPSLatitudeRef, Tag::InteroperabilityIndex);
        assert_eq!(Tag::Orientation.name(), Some("Orientation"));
        assert_eq!(Tag(0xbeef).name(), None);
        assert_eq!(Tag::Orientation.to_string(), "Orientation");
        assert_eq!(Tag(0xbeef).to_string(), "Tag 0xbeef");
    }

    #[test]
    fn shared_numbers() {
        assert_eq!(Tag(0x0001).name_in(Ifd::Gps), Some("GPSLatitudeRef"));
        assert_eq!(Tag(0x0001).name_in(Ifd::Interoperability),
                   Some("InteroperabilityIndex"));
        assert_eq!(Tag(0x0001).name_in(Ifd::Zero), None);
        assert_eq!(support_level(Tag(0x0001), Ifd::Gps, None),
                   Support::Optional);
        assert_eq!(support_level(Tag(0x0001), Ifd::Interoperability, None),
                   Support::Optional);
        assert_eq!(support_level(Tag(0x0001), Ifd::Exif, None),
                   Support::NotRecorded);
    }

    #[test]
    fn levels() {
        let compressed = Some(DataType::Compressed);
        assert_eq!(support_level(Tag::XResolution, Ifd::Zero, None),
                   Support::Mandatory);
        assert_eq!(support_level(Tag::ImageWidth, Ifd::Zero, None),
                   Support::Unknown);
        assert_eq!(support_level(Tag::ImageWidth, Ifd::Zero, compressed),
                   Support::NotRecorded);
        assert_eq!(support_level(Tag::YCbCrPositioning, Ifd::Zero,
                                 compressed),
                   Support::Mandatory);
        assert_eq!(support_level(Tag::ExposureTime, Ifd::Zero, None),
                   Support::NotRecorded);
        assert_eq!(support_level(Tag(0xbeef), Ifd::Zero, None),
                   Support::Unknown);
    }

    #[test]
    fn mandatory() {
        let tags = mandatory_tags(Ifd::Exif, None).collect::<Vec<_>>();
        assert_eq!(tags, [Tag::ExifVersion, Tag::FlashpixVersion,
                          Tag::ColorSpace]);
        let tags = mandatory_tags(Ifd::Zero, Some(DataType::Compressed))
            .collect::<Vec<_>>();
        assert_eq!(tags, [Tag::XResolution, Tag::YResolution,
                          Tag::ResolutionUnit, Tag::YCbCrPositioning]);
    }

    #[test]
    fn pointer() {
        assert!(Tag::ExifIFDPointer.is_pointer());
        assert!(Tag::JPEGInterchangeFormatLength.is_pointer());
        assert!(!Tag::MakerNote.is_pointer());
    }
}
