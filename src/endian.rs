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

use std::mem;

// Loads and stores of fixed-width integers.  The generic `Endian`
// trait is used where the byte order is known statically (signatures,
// the Fuji MakerNote); `ByteOrder` selects one of them at run time
// because the byte order of an Exif block can be changed in place.

pub trait Endian {
    fn loadu16(buf: &[u8], from: usize) -> u16;
    fn loadu32(buf: &[u8], from: usize) -> u32;
    fn loadu64(buf: &[u8], from: usize) -> u64;
    fn storeu16(buf: &mut [u8], at: usize, num: u16);
    fn storeu32(buf: &mut [u8], at: usize, num: u32);
    fn storeu64(buf: &mut [u8], at: usize, num: u64);
}

pub struct BigEndian;
pub struct LittleEndian;

macro_rules! generate_load {
    ($name:ident, $int_type:ident, $from_func:ident) => (
        fn $name(buf: &[u8], offset: usize) -> $int_type {
            let mut num = [0u8; mem::size_of::<$int_type>()];
            num.copy_from_slice(
                &buf[offset .. offset + mem::size_of::<$int_type>()]);
            $int_type::$from_func(num)
        }
    )
}

macro_rules! generate_store {
    ($name:ident, $int_type:ident, $to_func:ident) => (
        fn $name(buf: &mut [u8], offset: usize, num: $int_type) {
            buf[offset .. offset + mem::size_of::<$int_type>()]
                .copy_from_slice(&num.$to_func());
        }
    )
}

impl Endian for BigEndian {
    generate_load!(loadu16, u16, from_be_bytes);
    generate_load!(loadu32, u32, from_be_bytes);
    generate_load!(loadu64, u64, from_be_bytes);
    generate_store!(storeu16, u16, to_be_bytes);
    generate_store!(storeu32, u32, to_be_bytes);
    generate_store!(storeu64, u64, to_be_bytes);
}

impl Endian for LittleEndian {
    generate_load!(loadu16, u16, from_le_bytes);
    generate_load!(loadu32, u32, from_le_bytes);
    generate_load!(loadu64, u64, from_le_bytes);
    generate_store!(storeu16, u16, to_le_bytes);
    generate_store!(storeu32, u32, to_le_bytes);
    generate_store!(storeu64, u64, to_le_bytes);
}

/// The byte order of multi-byte scalars in an Exif block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first ("MM").
    #[default]
    Motorola,
    /// Least significant byte first ("II").
    Intel,
}

macro_rules! dispatch {
    ($self:ident, $func:ident ( $($arg:expr),* )) => (
        match $self {
            ByteOrder::Motorola => BigEndian::$func($($arg),*),
            ByteOrder::Intel => LittleEndian::$func($($arg),*),
        }
    )
}

impl ByteOrder {
    /// Returns the two-byte marker that starts a TIFF header
    /// in this byte order.
    pub fn marker(self) -> [u8; 2] {
        match self {
            ByteOrder::Motorola => *b"MM",
            ByteOrder::Intel => *b"II",
        }
    }

    /// Recognizes a TIFF byte order marker.
    pub fn from_marker(marker: &[u8]) -> Option<ByteOrder> {
        match marker {
            b"MM" => Some(ByteOrder::Motorola),
            b"II" => Some(ByteOrder::Intel),
            _ => None,
        }
    }

    /// Returns the other byte order.
    pub fn flip(self) -> ByteOrder {
        match self {
            ByteOrder::Motorola => ByteOrder::Intel,
            ByteOrder::Intel => ByteOrder::Motorola,
        }
    }

    // The callers must check the bounds before calling the accessors
    // below.  They panic on out-of-range access like slice indexing.

    pub fn get_u16(self, buf: &[u8], at: usize) -> u16 {
        dispatch!(self, loadu16(buf, at))
    }

    pub fn get_u32(self, buf: &[u8], at: usize) -> u32 {
        dispatch!(self, loadu32(buf, at))
    }

    pub fn get_u64(self, buf: &[u8], at: usize) -> u64 {
        dispatch!(self, loadu64(buf, at))
    }

    pub fn get_i16(self, buf: &[u8], at: usize) -> i16 {
        self.get_u16(buf, at) as i16
    }

    pub fn get_i32(self, buf: &[u8], at: usize) -> i32 {
        self.get_u32(buf, at) as i32
    }

    pub fn set_u16(self, buf: &mut [u8], at: usize, num: u16) {
        dispatch!(self, storeu16(buf, at, num))
    }

    pub fn set_u32(self, buf: &mut [u8], at: usize, num: u32) {
        dispatch!(self, storeu32(buf, at, num))
    }

    pub fn set_u64(self, buf: &mut [u8], at: usize, num: u64) {
        dispatch!(self, storeu64(buf, at, num))
    }

    pub fn set_i16(self, buf: &mut [u8], at: usize, num: i16) {
        self.set_u16(buf, at, num as u16)
    }

    pub fn set_i32(self, buf: &mut [u8], at: usize, num: i32) {
        self.set_u32(buf, at, num as u32)
    }

    /// Appends a 16-bit value.
    pub fn push_u16(self, buf: &mut Vec<u8>, num: u16) {
        let at = buf.len();
        buf.resize(at + 2, 0);
        self.set_u16(buf, at, num);
    }

    /// Appends a 32-bit value.
    pub fn push_u32(self, buf: &mut Vec<u8>, num: u32) {
        let at = buf.len();
        buf.resize(at + 4, 0);
        self.set_u32(buf, at, num);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loadu16() {
        assert_eq!(BigEndian::loadu16(&[0x01, 0x02], 0), 0x0102);
        assert_eq!(BigEndian::loadu16(&[0x01, 0x02, 0x03], 1), 0x0203);
        assert_eq!(LittleEndian::loadu16(&[0x01, 0x02], 0), 0x0201);
        assert_eq!(LittleEndian::loadu16(&[0x01, 0x02, 0x03], 1), 0x0302);
    }

    #[test]
    fn loadu32() {
        assert_eq!(BigEndian::loadu32(&[0x01, 0x02, 0x03, 0x04], 0),
                   0x01020304);
        assert_eq!(LittleEndian::loadu32(&[0x01, 0x02, 0x03, 0x04, 0x05], 1),
                   0x05040302);
    }

    #[test]
    fn store() {
        let mut buf = [0u8; 8];
        BigEndian::storeu16(&mut buf, 0, 0x0102);
        LittleEndian::storeu16(&mut buf, 2, 0x0304);
        BigEndian::storeu32(&mut buf, 4, 0x05060708);
        assert_eq!(&buf, b"\x01\x02\x04\x03\x05\x06\x07\x08");
        LittleEndian::storeu64(&mut buf, 0, 0x0102030405060708);
        assert_eq!(&buf, b"\x08\x07\x06\x05\x04\x03\x02\x01");
    }

    #[test]
    fn byte_order_dispatch() {
        let data = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(ByteOrder::Motorola.get_u16(&data, 0), 0x0102);
        assert_eq!(ByteOrder::Intel.get_u16(&data, 0), 0x0201);
        assert_eq!(ByteOrder::Motorola.get_u32(&data, 0), 0x01020304);
        assert_eq!(ByteOrder::Intel.get_u32(&data, 0), 0x04030201);
        assert_eq!(ByteOrder::Intel.get_i16(&[0xfe, 0xff], 0), -2);
    }

    #[test]
    fn push_and_set() {
        let mut buf = Vec::new();
        ByteOrder::Motorola.push_u16(&mut buf, 0x0102);
        ByteOrder::Intel.push_u32(&mut buf, 0x03040506);
        assert_eq!(buf, b"\x01\x02\x06\x05\x04\x03");
        ByteOrder::Intel.set_i32(&mut buf, 2, -1);
        assert_eq!(buf, b"\x01\x02\xff\xff\xff\xff");
    }

    #[test]
    fn marker() {
        assert_eq!(ByteOrder::from_marker(b"II"), Some(ByteOrder::Intel));
        assert_eq!(ByteOrder::from_marker(b"MM"), Some(ByteOrder::Motorola));
        assert_eq!(ByteOrder::from_marker(b"IM"), None);
        assert_eq!(ByteOrder::Intel.marker(), *b"II");
        assert_eq!(ByteOrder::Intel.flip(), ByteOrder::Motorola);
    }

    #[test]
    #[should_panic(expected = "index 3 out of range for slice of length 2")]
    fn out_of_range() {
        BigEndian::loadu16(&[0x01, 0x02], 1);
    }
}
