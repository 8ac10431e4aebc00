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

use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use exifdata::{ExifData, Format, Ifd};

fn main() {
    for path in env::args_os().skip(1).map(PathBuf::from) {
        if let Err(e) = dump_file(&path) {
            println!("{}: {}", path.display(), e);
        }
    }
}

fn dump_file(path: &Path) -> Result<(), exifdata::Error> {
    let buf = fs::read(path)?;
    let block = exifdata::get_exif_block_from_buf(&buf)?;
    let mut data = ExifData::new();
    data.load(&block);
    let order = data.byte_order();

    println!("{} ({:?})", path.display(), order);
    for &ifd in &Ifd::ALL {
        for e in data.ifd(ifd) {
            println!("  {}/{}: {}", ifd, e.tag(), e.format_value(order));
            if e.format() == Format::Ascii {
                println!("      Ascii({:?})", escape(e.data()));
            }
        }
    }
    if let Some(thumb) = data.thumbnail() {
        println!("  Thumbnail: {} bytes", thumb.len());
    }
    if let Some(mn) = data.maker_note() {
        println!("  MakerNote: {:?}", mn.vendor());
        for i in 0..mn.count() {
            println!("    {:#06x} {}: {}",
                     mn.tag(i).unwrap_or(0), mn.title(i).unwrap_or("?"),
                     mn.value(i).unwrap_or_default());
        }
    }
    Ok(())
}

fn escape(bytes: &[u8]) -> String {
    let mut buf = String::new();
    for &c in bytes {
        match c {
            b'\\' | b'"' => write!(buf, "\\{}", c as char).unwrap(),
            0x20..=0x7e => buf.write_char(c as char).unwrap(),
            _ => write!(buf, "\\x{:02x}", c).unwrap(),
        }
    }
    buf
}
