#![no_main]

use libfuzzer_sys::fuzz_target;
use limbnum::{ByteOrder, Integer, PackLayout, Sign, WordOrder};

fuzz_target!(|data: &[u8]| {
    if data.len() > 4 * 1024 || data.len() < 4 {
        return;
    }
    let word_size = 1 + (data[0] as usize) % 8;
    let nail_bits = (data[1] as usize) % (8 * word_size);
    let layout = PackLayout {
        word_order: if data[2] & 1 == 0 {
            WordOrder::MostSignificantFirst
        } else {
            WordOrder::LeastSignificantFirst
        },
        byte_order: match data[2] >> 1 & 3 {
            0 => ByteOrder::MostSignificantFirst,
            1 => ByteOrder::LeastSignificantFirst,
            _ => ByteOrder::Native,
        },
        word_size,
        nail_bits,
        twos_complement: data[2] & 8 != 0,
        force_generic: data[2] & 16 != 0,
    };
    let negative = data[3] & 1 != 0;

    let limbs: Vec<u32> = data[4..]
        .chunks(4)
        .map(|c| {
            let mut bytes = [0u8; 4];
            bytes[..c.len()].copy_from_slice(c);
            u32::from_le_bytes(bytes)
        })
        .collect();
    let sign = if negative { Sign::Negative } else { Sign::Positive };
    let value = Integer::from_magnitude(sign, &limbs);

    // Size the buffer generously so the value always fits.
    let words = (value.bit_length() + 1) / (8 * word_size - nail_bits) + 1;
    let mut buf = vec![0u8; words * word_size];
    let status = value.pack_into(&mut buf, &layout).expect("pack");
    assert_eq!(status.unsigned_abs(), u8::from(!value.is_zero()));
    let back = Integer::unpack(&buf, &layout, !value.is_zero() && negative).expect("unpack");
    assert_eq!(back, value);
});
