#![no_main]

use libfuzzer_sys::fuzz_target;

use exifdata::{Diagnostics, ExifData, Options};

fuzz_target!(|data: &[u8]| {
    let mut diag = Diagnostics::new();
    let mut exif = ExifData::new();
    exif.load_with(data, &mut diag);
    let saved = exif.save_with(&mut diag);

    let mut exif = ExifData::new();
    exif.set_options(*Options::new().follow_specification(true));
    exif.load_with(&saved, &mut diag);
    let _ = exif.save_with(&mut diag);
});
