#![no_main]

use libfuzzer_sys::fuzz_target;
use limbnum::{Integer, LimbnumError, Sign};

fn limbs_of(data: &[u8]) -> Vec<u32> {
    data.chunks(4)
        .map(|c| {
            let mut bytes = [0u8; 4];
            bytes[..c.len()].copy_from_slice(c);
            u32::from_le_bytes(bytes)
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 8 * 1024 || data.is_empty() {
        return;
    }
    let cut = (data[0] as usize + 1).min(data.len());
    let x = Integer::from_magnitude(Sign::Positive, &limbs_of(&data[1..cut]));
    let y = Integer::from_magnitude(Sign::Positive, &limbs_of(&data[cut..]));
    match x.divmod(&y) {
        Ok((q, r)) => {
            assert!(r.abs() < y.abs());
            assert_eq!(&q * &y + r, x);
        }
        Err(LimbnumError::DivisionByZero) => assert!(y.is_zero()),
        Err(other) => panic!("unexpected error {other}"),
    }
});
