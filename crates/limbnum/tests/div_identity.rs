use limbnum::{Integer, LimbnumError, Sign};
use num_bigint::BigInt;

fn pseudo_limbs(len: usize, seed: u64) -> Vec<u32> {
    let mut state = seed | 1;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        out.push(state as u32);
    }
    if let Some(last) = out.last_mut() {
        *last |= 1;
    }
    out
}

fn to_big(v: &Integer) -> BigInt {
    let sign = match v.sign() {
        Sign::Negative => num_bigint::Sign::Minus,
        Sign::Zero => num_bigint::Sign::NoSign,
        Sign::Positive => num_bigint::Sign::Plus,
    };
    BigInt::new(sign, v.magnitude().to_vec())
}

#[test]
fn power_of_ten_divided_by_seven_satisfies_the_identity() {
    let x = Integer::from_str_radix("1000000000000000000000", 10).expect("parse");
    let y = Integer::from_str_radix("7", 10).expect("parse");
    let (q, r) = x.divmod(&y).expect("divmod");
    assert_eq!(q.to_string(), "142857142857142857142");
    assert_eq!(r.to_i64(), Some(6));
    assert_eq!(&q * &y + r, x);
}

#[test]
fn identity_holds_for_random_magnitudes() {
    for seed in 1u64..=8 {
        let x = Integer::from_magnitude(Sign::Positive, &pseudo_limbs(60, seed * 7));
        let y = Integer::from_magnitude(Sign::Positive, &pseudo_limbs(9, seed * 13));
        let (q, r) = x.divmod(&y).expect("divmod");
        assert_eq!(&q * &y + r.clone(), x);
        assert!(r.abs() < y.abs());
        let (bq, br) = (to_big(&x) / to_big(&y), to_big(&x) % to_big(&y));
        assert_eq!(to_big(&q), bq);
        assert_eq!(to_big(&r), br);
    }
}

#[test]
fn division_by_zero_for_every_dividend() {
    let zero = Integer::zero();
    for text in ["0", "1", "-1", "123456789123456789123456789"] {
        let x = Integer::from_str_radix(text, 10).expect("parse");
        assert_eq!(x.divmod(&zero), Err(LimbnumError::DivisionByZero), "{text}");
    }
}

#[test]
fn truncating_sign_table() {
    for (a, b, q, r) in [
        (7i64, 3i64, 2i64, 1i64),
        (-7, 3, -2, -1),
        (7, -3, -2, 1),
        (-7, -3, 2, -1),
    ] {
        let (got_q, got_r) = Integer::from_i64(a)
            .divmod(&Integer::from_i64(b))
            .expect("divmod");
        assert_eq!(got_q.to_i64(), Some(q), "{a} / {b}");
        assert_eq!(got_r.to_i64(), Some(r), "{a} % {b}");
    }
}

#[test]
fn remainder_smaller_than_single_limb_divisor() {
    let x = Integer::from_magnitude(Sign::Positive, &pseudo_limbs(33, 0x77));
    let y = Integer::from_i64(0xFFFF_FFFF);
    let (q, r) = x.divmod(&y).expect("divmod");
    assert!(r < y);
    assert_eq!(&q * &y + r, x);
}

#[test]
fn dividend_smaller_than_divisor() {
    let x = Integer::from_i64(42);
    let y = Integer::from_magnitude(Sign::Positive, &pseudo_limbs(4, 0x99));
    let (q, r) = x.divmod(&y).expect("divmod");
    assert!(q.is_zero());
    assert_eq!(r, x);
}

#[test]
fn oracle_agreement_on_mixed_signs() {
    for seed in 1u64..=4 {
        for (sx, sy) in [
            (Sign::Positive, Sign::Positive),
            (Sign::Positive, Sign::Negative),
            (Sign::Negative, Sign::Positive),
            (Sign::Negative, Sign::Negative),
        ] {
            let x = Integer::from_magnitude(sx, &pseudo_limbs(22, seed * 3 + 1));
            let y = Integer::from_magnitude(sy, &pseudo_limbs(6, seed * 5 + 2));
            let (q, r) = x.divmod(&y).expect("divmod");
            // num-bigint's / and % truncate as well.
            assert_eq!(to_big(&q), to_big(&x) / to_big(&y));
            assert_eq!(to_big(&r), to_big(&x) % to_big(&y));
        }
    }
}
