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

/// The scalar format of an entry [EXIF23 4.6.2].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Format {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
}

impl Format {
    /// Returns the format for a type code in an IFD record,
    /// or `None` if the code is unknown.
    pub fn from_u16(code: u16) -> Option<Format> {
        Some(match code {
            1 => Format::Byte,
            2 => Format::Ascii,
            3 => Format::Short,
            4 => Format::Long,
            5 => Format::Rational,
            6 => Format::SByte,
            7 => Format::Undefined,
            8 => Format::SShort,
            9 => Format::SLong,
            10 => Format::SRational,
            11 => Format::Float,
            12 => Format::Double,
            _ => return None,
        })
    }

    /// Returns the type code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Returns the size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            Format::Byte | Format::Ascii | Format::SByte |
            Format::Undefined => 1,
            Format::Short | Format::SShort => 2,
            Format::Long | Format::SLong | Format::Float => 4,
            Format::Rational | Format::SRational | Format::Double => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Byte => "Byte",
            Format::Ascii => "ASCII",
            Format::Short => "Short",
            Format::Long => "Long",
            Format::Rational => "Rational",
            Format::SByte => "SByte",
            Format::Undefined => "Undefined",
            Format::SShort => "SShort",
            Format::SLong => "SLong",
            Format::SRational => "SRational",
            Format::Float => "Float",
            Format::Double => "Double",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unsigned rational number, which is a pair of 32-bit unsigned integers.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Rational { pub num: u32, pub denom: u32 }

impl Rational {
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }

    pub(crate) fn load(order: ByteOrder, buf: &[u8], at: usize) -> Rational {
        Rational { num: order.get_u32(buf, at),
                   denom: order.get_u32(buf, at + 4) }
    }

    pub(crate) fn store(&self, order: ByteOrder, buf: &mut [u8], at: usize) {
        order.set_u32(buf, at, self.num);
        order.set_u32(buf, at + 4, self.denom);
    }
}

impl From<(u32, u32)> for Rational {
    fn from(t: (u32, u32)) -> Rational {
        Rational { num: t.0, denom: t.1 }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Rational({}/{})", self.num, self.denom)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_rational(f, self.num as f64, self.denom as f64,
                     self.denom == 0, self.num, self.denom)
    }
}

/// A signed rational number, which is a pair of 32-bit signed integers.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct SRational { pub num: i32, pub denom: i32 }

impl SRational {
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }

    pub(crate) fn load(order: ByteOrder, buf: &[u8], at: usize) -> SRational {
        SRational { num: order.get_i32(buf, at),
                    denom: order.get_i32(buf, at + 4) }
    }

    pub(crate) fn store(&self, order: ByteOrder, buf: &mut [u8], at: usize) {
        order.set_i32(buf, at, self.num);
        order.set_i32(buf, at + 4, self.denom);
    }
}

impl From<(i32, i32)> for SRational {
    fn from(t: (i32, i32)) -> SRational {
        SRational { num: t.0, denom: t.1 }
    }
}

impl fmt::Debug for SRational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SRational({}/{})", self.num, self.denom)
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_rational(f, self.num as f64, self.denom as f64,
                     self.denom == 0, self.num, self.denom)
    }
}

// The number of decimals follows the magnitude of the denominator,
// so 72/1 prints as "72" and 10/100 as "0.10".
fn fmt_rational<T>(f: &mut fmt::Formatter, num: f64, denom: f64,
                   zero: bool, rnum: T, rdenom: T)
                   -> fmt::Result where T: fmt::Display {
    if zero {
        return write!(f, "{}/{}", rnum, rdenom);
    }
    let decimals = (denom.abs().log10() - 0.08 + 1.0).max(0.0) as usize;
    write!(f, "{:.*}", decimals, num / denom)
}

/// A decoded entry value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Vector of 8-bit unsigned integers.
    Byte(Vec<u8>),
    /// 8-bit bytes containing 7-bit ASCII characters, up to (and
    /// excluding) the first null character.
    Ascii(Vec<u8>),
    /// Vector of 16-bit unsigned integers.
    Short(Vec<u16>),
    /// Vector of 32-bit unsigned integers.
    Long(Vec<u32>),
    /// Vector of unsigned rationals.
    Rational(Vec<Rational>),
    /// Vector of 8-bit signed integers.
    SByte(Vec<i8>),
    /// Vector of 8-bit bytes.
    Undefined(Vec<u8>),
    /// Vector of 16-bit signed integers.
    SShort(Vec<i16>),
    /// Vector of 32-bit signed integers.
    SLong(Vec<i32>),
    /// Vector of signed rationals.
    SRational(Vec<SRational>),
    /// Vector of 32-bit (single precision) floating-point numbers.
    Float(Vec<f32>),
    /// Vector of 64-bit (double precision) floating-point numbers.
    Double(Vec<f64>),
}

impl Value {
    /// Decodes `data` as an array of `format`.  Trailing bytes that do
    /// not fill a whole component are ignored.
    pub fn decode(format: Format, data: &[u8], order: ByteOrder) -> Value {
        let unit = format.size();
        let n = data.len() / unit;
        let at = |i: usize| i * unit;
        match format {
            Format::Byte => Value::Byte(data.to_vec()),
            Format::Ascii => {
                let end = data.iter().position(|&b| b == 0)
                    .unwrap_or(data.len());
                Value::Ascii(data[..end].to_vec())
            },
            Format::Short => Value::Short(
                (0..n).map(|i| order.get_u16(data, at(i))).collect()),
            Format::Long => Value::Long(
                (0..n).map(|i| order.get_u32(data, at(i))).collect()),
            Format::Rational => Value::Rational(
                (0..n).map(|i| Rational::load(order, data, at(i))).collect()),
            Format::SByte => Value::SByte(
                data.iter().map(|&b| b as i8).collect()),
            Format::Undefined => Value::Undefined(data.to_vec()),
            Format::SShort => Value::SShort(
                (0..n).map(|i| order.get_i16(data, at(i))).collect()),
            Format::SLong => Value::SLong(
                (0..n).map(|i| order.get_i32(data, at(i))).collect()),
            Format::SRational => Value::SRational(
                (0..n).map(|i| SRational::load(order, data, at(i))).collect()),
            Format::Float => Value::Float(
                (0..n).map(|i| f32::from_bits(order.get_u32(data, at(i))))
                    .collect()),
            Format::Double => Value::Double(
                (0..n).map(|i| f64::from_bits(order.get_u64(data, at(i))))
                    .collect()),
        }
    }

    /// Returns the unsigned integer at the given position.
    /// For BYTE, SHORT, and LONG, `Some` is returned if the index
    /// is in range.  Otherwise, `None` is returned.
    pub fn get_uint(&self, index: usize) -> Option<u32> {
        match *self {
            Value::Byte(ref v) => v.get(index).map(|&x| x as u32),
            Value::Short(ref v) => v.get(index).map(|&x| x as u32),
            Value::Long(ref v) => v.get(index).copied(),
            _ => None,
        }
    }

    /// Returns an iterator over the unsigned integers (BYTE, SHORT,
    /// or LONG).  The iterator yields `u32` regardless of the
    /// underlying integer size.
    pub fn iter_uint(&self) -> Option<UIntIter<'_>> {
        match *self {
            Value::Byte(ref v) =>
                Some(UIntIter { value: self, index: 0, len: v.len() }),
            Value::Short(ref v) =>
                Some(UIntIter { value: self, index: 0, len: v.len() }),
            Value::Long(ref v) =>
                Some(UIntIter { value: self, index: 0, len: v.len() }),
            _ => None,
        }
    }
}

/// An iterator over unsigned integers of a `Value`.
#[derive(Debug)]
pub struct UIntIter<'a> {
    value: &'a Value,
    index: usize,
    len: usize,
}

impl<'a> Iterator for UIntIter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.index >= self.len {
            return None;
        }
        self.index += 1;
        self.value.get_uint(self.index - 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len - self.index, Some(self.len - self.index))
    }
}

impl<'a> ExactSizeIterator for UIntIter<'a> {}

/// Formats a raw value without knowledge of its tag.
pub fn format_value(format: Format, data: &[u8], order: ByteOrder) -> String {
    fn join<T, I>(iter: I) -> String
        where T: fmt::Display, I: Iterator<Item = T> {
        iter.map(|x| x.to_string()).collect::<Vec<_>>().join(", ")
    }
    match Value::decode(format, data, order) {
        Value::Undefined(v) => format!("{} bytes undefined data", v.len()),
        Value::Byte(v) => join(v.iter().map(|x| format!("0x{:02x}", x))),
        Value::SByte(v) => join(v.iter().map(|&x| format!("0x{:02x}", x as u8))),
        Value::Ascii(v) => String::from_utf8_lossy(&v).into_owned(),
        Value::Short(v) => join(v.iter()),
        Value::SShort(v) => join(v.iter()),
        Value::Long(v) => join(v.iter()),
        Value::SLong(v) => join(v.iter()),
        Value::Rational(v) => join(v.iter()),
        Value::SRational(v) => join(v.iter()),
        Value::Float(_) | Value::Double(_) =>
            format!("{} bytes unsupported data type", data.len()),
    }
}

/// Re-encodes a packed array of `format` from one byte order to
/// another in place.  Bytes past the last whole component are left
/// as they are.
pub fn convert_byte_order(format: Format, data: &mut [u8],
                          from: ByteOrder, to: ByteOrder) {
    if from == to {
        return;
    }
    // Rationals are pairs of 32-bit words, so they are swapped
    // per word rather than per component.
    let word = match format {
        Format::Short | Format::SShort => 2,
        Format::Long | Format::SLong | Format::Float |
        Format::Rational | Format::SRational => 4,
        Format::Double => 8,
        Format::Byte | Format::Ascii | Format::SByte |
        Format::Undefined => return,
    };
    for chunk in data.chunks_exact_mut(word) {
        chunk.reverse();
    }
}
