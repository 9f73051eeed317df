#![no_main]

use libfuzzer_sys::fuzz_target;
use limbnum::{Integer, ParseMode, PowerCache};

fuzz_target!(|data: &[u8]| {
    // Keep conversions bounded; libFuzzer will still mutate below this.
    if data.len() > 16 * 1024 {
        return;
    }
    let Some((&radix_byte, digits)) = data.split_first() else {
        return;
    };
    let radix = 2 + (radix_byte as u32) % 35;
    let text = String::from_utf8_lossy(digits);
    let cache = PowerCache::new();
    let Ok(value) = Integer::parse(&text, radix, ParseMode::Lenient, &cache) else {
        return;
    };
    let rendered = value.format(radix, &cache).expect("format");
    let back = Integer::parse(&rendered, radix, ParseMode::Strict, &cache).expect("reparse");
    assert_eq!(back, value);
});
