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
use std::io;
use std::ops::Range;

use chrono::{DateTime, Local, TimeZone};

pub fn read8<R>(reader: &mut R) -> Result<u8, io::Error> where R: io::Read {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf).and(Ok(buf[0]))
}

pub fn read16<R>(reader: &mut R) -> Result<u16, io::Error> where R: io::Read {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

// Returns `offset..offset + len` if it lies within a buffer of `total`
// bytes.  Overflow of `offset + len` is treated as out of range.
pub fn span(offset: usize, len: usize, total: usize) -> Option<Range<usize>> {
    match offset.checked_add(len) {
        Some(end) if end <= total => Some(offset..end),
        _ => None,
    }
}

// Copies bytes into a new vector, or returns None if the memory
// could not be allocated.
pub fn try_copy(src: &[u8]) -> Option<Vec<u8>> {
    let mut v = Vec::new();
    v.try_reserve_exact(src.len()).ok()?;
    v.extend_from_slice(src);
    Some(v)
}

// Pads `buf` with a zero byte if its length is odd.
pub fn pad_even(buf: &mut Vec<u8>) {
    if buf.len() % 2 != 0 {
        buf.push(0);
    }
}

/// Returns the current local time as "YYYY:MM:DD HH:MM:SS".
pub fn exif_datetime_now() -> [u8; 19] {
    exif_datetime(&Local::now())
}

pub fn exif_datetime<Tz>(t: &DateTime<Tz>) -> [u8; 19]
    where Tz: TimeZone, Tz::Offset: fmt::Display {
    let s = t.format("%Y:%m:%d %H:%M:%S").to_string();
    let mut buf = [b' '; 19];
    let len = s.len().min(19);
    buf[..len].copy_from_slice(&s.as_bytes()[..len]);
    buf
}
