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

use std::io;
use std::io::Read;

use crate::endian::{BigEndian, Endian};
use crate::error::Error;
use crate::tiff::{self, EXIF_HEADER};
use crate::util::{read16, read8, span};

mod marker {
    // The first byte of a marker.
    pub const P:    u8 = 0xff;
    // Marker codes.
    pub const Z:    u8 = 0x00;		// Not a marker but a byte stuffing.
    pub const TEM:  u8 = 0x01;
    pub const RST0: u8 = 0xd0;
    pub const RST7: u8 = 0xd7;
    pub const SOI:  u8 = 0xd8;
    pub const EOI:  u8 = 0xd9;
    pub const APP1: u8 = 0xe1;
}

// SOI marker as the JPEG header.
const JPEG_SIG: [u8; 2] = [marker::P, marker::SOI];

// FUJIFILM RAF files embed a JPEG preview.  Its offset is stored
// big-endian at this position.
const RAF_SIG: &[u8] = b"FUJIFILM";
const RAF_JPEG_OFFSET: usize = 84;

/// Gets the Exif block from a JPEG stream.
///
/// The returned block starts with "Exif\0\0" and can be passed to
/// [`ExifData::load`](crate::ExifData::load).
///
/// # Examples
/// ```
/// let jpeg = b"\xff\xd8\xff\xe1\x00\x0aExif\0\0\xbe\xad\xff\xd9";
/// let block = exifdata::get_exif_block(&mut &jpeg[..]).unwrap();
/// assert_eq!(block, b"Exif\0\0\xbe\xad");
/// ```
pub fn get_exif_block<R>(reader: &mut R)
                         -> Result<Vec<u8>, Error> where R: io::BufRead {
    match get_exif_block_sub(reader) {
        Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof =>
            Err(Error::InvalidFormat("Broken JPEG file")),
        r => r,
    }
}

fn get_exif_block_sub<R>(reader: &mut R)
                         -> Result<Vec<u8>, Error> where R: io::BufRead {
    let mut soi = [0u8; 2];
    reader.read_exact(&mut soi)?;
    if soi != JPEG_SIG {
        return Err(Error::InvalidFormat("Not a JPEG file"));
    }
    loop {
        // Find a marker prefix.  Discard non-ff bytes, which appear if
        // we are in the scan data after SOS or we are out of sync.
        reader.read_until(marker::P, &mut Vec::new())?;
        // Get a marker code.
        let mut code;
        loop {
            code = read8(reader)?;
            if code != marker::P { break; }
        }
        // Continue or return early on stand-alone markers.
        match code {
            marker::Z | marker::TEM | marker::RST0..=marker::RST7 => continue,
            marker::SOI => return Err(Error::InvalidFormat("Unexpected SOI")),
            marker::EOI => return Err(Error::NotFound("No Exif data found")),
            _ => {},
        }
        // Read marker segments.
        let seglen = read16(reader)?;
        if seglen < 2 {
            return Err(Error::InvalidFormat("Invalid segment length"));
        }
        let mut seg = Vec::new();
        reader.by_ref().take(seglen as u64 - 2).read_to_end(&mut seg)?;
        if seg.len() != seglen as usize - 2 {
            return Err(Error::InvalidFormat("Broken JPEG file"));
        }
        if code == marker::APP1 && seg.starts_with(EXIF_HEADER) {
            return Ok(seg);
        }
    }
}

/// Gets the Exif block from a file image in memory.
///
/// JPEG streams, FUJIFILM RAF files (through their JPEG preview),
/// TIFF files, and bare Exif blocks are accepted.  The returned block
/// always starts with "Exif\0\0".
///
/// # Examples
/// ```
/// use exifdata::get_exif_block_from_buf;
/// let block = get_exif_block_from_buf(b"MM\0\x2a\0\0\0\x08").unwrap();
/// assert_eq!(block, b"Exif\0\0MM\0\x2a\0\0\0\x08");
/// assert!(get_exif_block_from_buf(b"GIF89a").is_err());
/// ```
pub fn get_exif_block_from_buf(buf: &[u8]) -> Result<Vec<u8>, Error> {
    if buf.starts_with(EXIF_HEADER) {
        Ok(buf.to_vec())
    } else if is_jpeg(buf) {
        get_exif_block(&mut &buf[..])
    } else if buf.starts_with(RAF_SIG) {
        let at = span(RAF_JPEG_OFFSET, 4, buf.len())
            .ok_or(Error::InvalidFormat("Truncated RAF header"))?;
        let ofs = BigEndian::loadu32(buf, at.start) as usize;
        if ofs > buf.len() {
            return Err(Error::InvalidFormat("Bogus JPEG offset in RAF"));
        }
        get_exif_block(&mut &buf[ofs..])
    } else if tiff::is_tiff(buf) {
        let mut block = Vec::with_capacity(EXIF_HEADER.len() + buf.len());
        block.extend_from_slice(EXIF_HEADER);
        block.extend_from_slice(buf);
        Ok(block)
    } else {
        Err(Error::InvalidFormat("Unknown image format"))
    }
}

pub fn is_jpeg(buf: &[u8]) -> bool {
    buf.starts_with(&JPEG_SIG)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use super::*;

    #[test]
    fn truncated() {
        let sets: &[&[u8]] = &[
            b"",
            b"\xff",
            b"\xff\xd8",
            b"\xff\xd8\x00",
            b"\xff\xd8\xff",
            b"\xff\xd8\xff\xe1\x00\x08\x03\x04",
        ];
        for &data in sets {
            assert_err_pat!(get_exif_block(&mut Cursor::new(data)),
                            Error::InvalidFormat("Broken JPEG file"));
        }
    }

    #[test]
    fn no_exif() {
        let data = b"\xff\xd8\xff\xd9";
        assert_err_pat!(get_exif_block(&mut Cursor::new(data)),
                        Error::NotFound(_));
        let data = b"\xff\xd8\xff\xe1\x00\x06XMP\0\xff\xd9";
        assert_err_pat!(get_exif_block(&mut Cursor::new(data)),
                        Error::NotFound(_));
    }

    #[test]
    fn out_of_sync() {
        let data = b"\xff\xd8\x01\x02\x03\xff\x00\xff\xd9";
        assert_err_pat!(get_exif_block(&mut Cursor::new(data)),
                        Error::NotFound(_));
    }

    #[test]
    fn exif_segment() {
        let data = b"\xff\xd8\xff\xe1\x00\x08Exif\0\0\xff\xd9";
        assert_ok!(get_exif_block(&mut Cursor::new(data)), b"Exif\0\0");
        let data = b"\xff\xd8\xff\xe0\x00\x04\0\0\
                     \xff\xe1\x00\x0aExif\0\0\xbe\xad\xff\xd9";
        assert_ok!(get_exif_block(&mut Cursor::new(data)),
                   b"Exif\0\0\xbe\xad");
    }

    #[test]
    fn raf() {
        let mut raf = b"FUJIFILMCCD-RAW 0201FF393101".to_vec();
        raf.resize(RAF_JPEG_OFFSET, 0);
        raf.extend_from_slice(&[0, 0, 0, 100]);
        raf.resize(100, 0);
        raf.extend_from_slice(b"\xff\xd8\xff\xe1\x00\x09Exif\0\0\x01\xff\xd9");
        assert_ok!(get_exif_block_from_buf(&raf), b"Exif\0\0\x01");
        raf[RAF_JPEG_OFFSET] = 0xff;
        assert_err_pat!(get_exif_block_from_buf(&raf),
                        Error::InvalidFormat(_));
        assert_err_pat!(get_exif_block_from_buf(&raf[..86]),
                        Error::InvalidFormat("Truncated RAF header"));
    }

    #[test]
    fn bare_block() {
        assert_ok!(get_exif_block_from_buf(b"Exif\0\0II"), b"Exif\0\0II");
        assert_err_pat!(get_exif_block_from_buf(b""),
                        Error::InvalidFormat(_));
    }
}
