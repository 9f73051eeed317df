use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};
use std::str::FromStr;

use num_traits::{Num, One, Zero};

use crate::limbs;
use crate::pack::PackLayout;
use crate::radix::{ParseMode, PowerCache};
use crate::{div, mul, pack, radix, CancelToken, Limb, LimbnumError, Sign, LIMB_BITS};

/// Signed arbitrary-precision integer: a sign and a normalized magnitude.
/// The magnitude never carries high zero limbs and is empty exactly when the
/// sign is `Zero`, so there is no negative zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    sign: Sign,
    limbs: Vec<Limb>,
}

impl Integer {
    fn from_parts(sign: Sign, mut limbs: Vec<Limb>) -> Integer {
        limbs.truncate(crate::limbs::normal_len(&limbs));
        if sign.is_zero() {
            limbs.clear();
        }
        let sign = if limbs.is_empty() { Sign::Zero } else { sign };
        Integer { sign, limbs }
    }

    pub fn zero() -> Integer {
        Integer {
            sign: Sign::Zero,
            limbs: Vec::new(),
        }
    }

    pub fn one() -> Integer {
        Integer {
            sign: Sign::Positive,
            limbs: vec![1],
        }
    }

    pub fn from_magnitude(sign: Sign, mag: &[Limb]) -> Integer {
        Integer::from_parts(sign, mag.to_vec())
    }

    pub fn from_i64(v: i64) -> Integer {
        let sign = match v.cmp(&0) {
            Ordering::Less => Sign::Negative,
            Ordering::Equal => Sign::Zero,
            Ordering::Greater => Sign::Positive,
        };
        let mag = v.unsigned_abs();
        Integer::from_parts(sign, vec![mag as Limb, (mag >> LIMB_BITS) as Limb])
    }

    pub fn from_u64(v: u64) -> Integer {
        Integer::from_parts(Sign::Positive, vec![v as Limb, (v >> LIMB_BITS) as Limb])
    }

    /// Truncates toward zero; `None` for NaN and infinities.
    pub fn from_f64(d: f64) -> Option<Integer> {
        if !d.is_finite() {
            return None;
        }
        let radix = (1u64 << LIMB_BITS) as f64;
        let mut u = d.abs().trunc();
        let mut len = 0;
        while u >= 1.0 {
            u /= radix;
            len += 1;
        }
        let mut mag = vec![0 as Limb; len];
        for i in (0..len).rev() {
            u *= radix;
            let c = u.trunc();
            mag[i] = c as Limb;
            u -= c;
        }
        let sign = if d < 0.0 { Sign::Negative } else { Sign::Positive };
        Some(Integer::from_parts(sign, mag))
    }

    pub fn to_i64(&self) -> Option<i64> {
        if self.limbs.len() > 2 {
            return None;
        }
        let mag = self.magnitude_u64();
        match self.sign {
            Sign::Zero => Some(0),
            Sign::Positive => (mag <= i64::MAX as u64).then(|| mag as i64),
            Sign::Negative => {
                if mag < 1 << 63 {
                    Some(-(mag as i64))
                } else if mag == 1 << 63 {
                    Some(i64::MIN)
                } else {
                    None
                }
            }
        }
    }

    pub fn to_u64(&self) -> Option<u64> {
        match self.sign {
            Sign::Zero => Some(0),
            Sign::Positive if self.limbs.len() <= 2 => Some(self.magnitude_u64()),
            _ => None,
        }
    }

    fn magnitude_u64(&self) -> u64 {
        let lo = self.limbs.first().copied().unwrap_or(0) as u64;
        let hi = self.limbs.get(1).copied().unwrap_or(0) as u64;
        lo | hi << LIMB_BITS
    }

    /// Saturates to infinity when the magnitude exceeds the float range.
    pub fn to_f64(&self) -> f64 {
        let radix = (1u64 << LIMB_BITS) as f64;
        let mut d = 0.0f64;
        for &limb in self.limbs.iter().rev() {
            d = d * radix + limb as f64;
        }
        if self.sign.is_negative() {
            -d
        } else {
            d
        }
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn magnitude(&self) -> &[Limb] {
        &self.limbs
    }

    pub fn bit_length(&self) -> usize {
        limbs::bit_length(&self.limbs)
    }

    pub fn is_zero(&self) -> bool {
        self.sign.is_zero()
    }

    pub fn abs(&self) -> Integer {
        match self.sign {
            Sign::Negative => Integer {
                sign: Sign::Positive,
                limbs: self.limbs.clone(),
            },
            _ => self.clone(),
        }
    }

    pub fn negated(&self) -> Integer {
        Integer {
            sign: self.sign.flip(),
            limbs: self.limbs.clone(),
        }
    }

    fn add_signed(&self, other: &Integer, other_sign: Sign) -> Integer {
        if other_sign.is_zero() {
            return self.clone();
        }
        if self.sign.is_zero() {
            return Integer::from_parts(other_sign, other.limbs.clone());
        }
        if self.sign == other_sign {
            let mut mag = vec![0 as Limb; self.limbs.len().max(other.limbs.len()) + 1];
            limbs::add(&mut mag, &self.limbs, &other.limbs);
            return Integer::from_parts(self.sign, mag);
        }
        match limbs::cmp(&self.limbs, &other.limbs) {
            Ordering::Equal => Integer::zero(),
            Ordering::Greater => {
                let mut mag = vec![0 as Limb; self.limbs.len()];
                let borrow = limbs::sub(&mut mag, &self.limbs, &other.limbs);
                debug_assert!(!borrow);
                Integer::from_parts(self.sign, mag)
            }
            Ordering::Less => {
                let mut mag = vec![0 as Limb; other.limbs.len()];
                let borrow = limbs::sub(&mut mag, &other.limbs, &self.limbs);
                debug_assert!(!borrow);
                Integer::from_parts(other_sign, mag)
            }
        }
    }

    pub fn checked_mul(&self, other: &Integer) -> Integer {
        if self.sign.is_zero() || other.sign.is_zero() {
            return Integer::zero();
        }
        let mut mag = vec![0 as Limb; self.limbs.len() + other.limbs.len()];
        mul::mul(&mut mag, &self.limbs, &other.limbs);
        let sign = if self.sign == other.sign {
            Sign::Positive
        } else {
            Sign::Negative
        };
        Integer::from_parts(sign, mag)
    }

    /// Truncating division: the quotient rounds toward zero and the
    /// remainder takes the dividend's sign.
    pub fn divmod(&self, other: &Integer) -> Result<(Integer, Integer), LimbnumError> {
        self.divmod_with_cancel(other, None)
    }

    pub fn divmod_with_cancel(
        &self,
        other: &Integer,
        cancel: Option<&CancelToken>,
    ) -> Result<(Integer, Integer), LimbnumError> {
        if other.sign.is_zero() {
            return Err(LimbnumError::DivisionByZero);
        }
        let xn = self.limbs.len();
        let yn = other.limbs.len();
        let mut q = vec![0 as Limb; xn.saturating_sub(yn) + 1];
        let mut r = vec![0 as Limb; yn];
        div::divmod(&mut q, &mut r, &self.limbs, &other.limbs, cancel)?;
        let q_sign = if self.sign == other.sign {
            Sign::Positive
        } else {
            Sign::Negative
        };
        Ok((
            Integer::from_parts(q_sign, q),
            Integer::from_parts(self.sign, r),
        ))
    }

    pub fn pow(&self, mut exp: u64) -> Integer {
        if exp == 0 {
            return Integer::one();
        }
        let mut base = self.clone();
        let mut acc = Integer::one();
        while exp > 1 {
            if exp & 1 == 1 {
                acc = acc.checked_mul(&base);
            }
            base = base.checked_mul(&base);
            exp >>= 1;
        }
        acc.checked_mul(&base)
    }

    // Two's-complement view padded to `len` limbs; sign extension falls out
    // of complementing the padding.
    fn tc_limbs(&self, len: usize) -> Vec<Limb> {
        debug_assert!(len >= self.limbs.len());
        let mut v = self.limbs.clone();
        v.resize(len, 0);
        if self.sign.is_negative() {
            limbs::two_complement_in_place(&mut v);
        }
        v
    }

    fn bitwise(&self, other: &Integer, op: impl Fn(Limb, Limb) -> Limb, negative: bool) -> Integer {
        let len = self.limbs.len().max(other.limbs.len()) + 1;
        let a = self.tc_limbs(len);
        let b = other.tc_limbs(len);
        let mut z: Vec<Limb> = a.iter().zip(b.iter()).map(|(&x, &y)| op(x, y)).collect();
        if negative {
            let escaped = limbs::two_complement_in_place(&mut z);
            debug_assert!(!escaped);
        }
        let sign = if negative { Sign::Negative } else { Sign::Positive };
        Integer::from_parts(sign, z)
    }

    pub fn bit_and(&self, other: &Integer) -> Integer {
        let negative = self.sign.is_negative() && other.sign.is_negative();
        self.bitwise(other, |a, b| a & b, negative)
    }

    pub fn bit_or(&self, other: &Integer) -> Integer {
        let negative = self.sign.is_negative() || other.sign.is_negative();
        self.bitwise(other, |a, b| a | b, negative)
    }

    pub fn bit_xor(&self, other: &Integer) -> Integer {
        let negative = self.sign.is_negative() != other.sign.is_negative();
        self.bitwise(other, |a, b| a ^ b, negative)
    }

    pub fn bit_not(&self) -> Integer {
        self.add_signed(&Integer::one(), Sign::Positive).negated()
    }

    pub fn shifted_left(&self, bits: usize) -> Integer {
        if self.sign.is_zero() || bits == 0 {
            return self.clone();
        }
        let s1 = bits / LIMB_BITS;
        let s2 = (bits % LIMB_BITS) as u32;
        let n = self.limbs.len();
        let mut mag = vec![0 as Limb; n + s1 + 1];
        let carry = limbs::shl_small(&mut mag[s1..s1 + n], &self.limbs, s2);
        mag[s1 + n] = carry;
        Integer::from_parts(self.sign, mag)
    }

    /// Arithmetic right shift: negative values round toward negative
    /// infinity, so shifting a negative value past its top bit gives -1.
    pub fn shifted_right(&self, bits: usize) -> Integer {
        if self.sign.is_zero() || bits == 0 {
            return self.clone();
        }
        let s1 = bits / LIMB_BITS;
        let s2 = bits % LIMB_BITS;
        let n = self.limbs.len();
        if s1 >= n {
            return match self.sign {
                Sign::Negative => Integer::from_i64(-1),
                _ => Integer::zero(),
            };
        }
        let mut mag = vec![0 as Limb; n - s1];
        limbs::shr_small(&mut mag, &self.limbs[s1..], s2 as u32, false);
        if self.sign.is_negative() {
            let mut dropped = self.limbs[..s1].iter().any(|&l| l != 0);
            if !dropped && s2 > 0 {
                dropped = self.limbs[s1] & ((1 << s2) - 1) != 0;
            }
            if dropped {
                increment(&mut mag);
            }
            if limbs::is_zero(&mag) {
                return Integer::from_i64(-1);
            }
        }
        Integer::from_parts(self.sign, mag)
    }

    /// Reads bit `n` of the two's-complement view; every bit above the top
    /// of a negative value reads as one.
    pub fn bit(&self, n: usize) -> bool {
        match self.sign {
            Sign::Zero => false,
            Sign::Positive => {
                n < self.bit_length() && self.limbs[n / LIMB_BITS] >> (n % LIMB_BITS) & 1 == 1
            }
            Sign::Negative => {
                let len = self.limbs.len();
                if n >= len * LIMB_BITS {
                    return true;
                }
                let tc = self.tc_limbs(len);
                tc[n / LIMB_BITS] >> (n % LIMB_BITS) & 1 == 1
            }
        }
    }

    pub fn parse(
        text: &str,
        radix_value: u32,
        mode: ParseMode,
        cache: &PowerCache,
    ) -> Result<Integer, LimbnumError> {
        let (sign_negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let mag = radix::parse_digits(digits, radix_value, mode, cache)?;
        let sign = if sign_negative {
            Sign::Negative
        } else {
            Sign::Positive
        };
        Ok(Integer::from_parts(sign, mag))
    }

    pub fn from_str_radix(text: &str, radix_value: u32) -> Result<Integer, LimbnumError> {
        Integer::parse(text, radix_value, ParseMode::Strict, &PowerCache::new())
    }

    pub fn format(&self, radix_value: u32, cache: &PowerCache) -> Result<String, LimbnumError> {
        let digits = radix::format_magnitude(&self.limbs, radix_value, cache)?;
        if self.sign.is_negative() {
            Ok(format!("-{digits}"))
        } else {
            Ok(digits)
        }
    }

    pub fn to_string_radix(&self, radix_value: u32) -> Result<String, LimbnumError> {
        self.format(radix_value, &PowerCache::new())
    }

    pub fn pack_into(&self, words: &mut [u8], layout: &PackLayout) -> Result<i8, LimbnumError> {
        pack::pack(self.sign, &self.limbs, words, layout)
    }

    pub fn unpack(
        words: &[u8],
        layout: &PackLayout,
        negative: bool,
    ) -> Result<Integer, LimbnumError> {
        let (sign, mag) = pack::unpack(words, layout, negative)?;
        Ok(Integer::from_parts(sign, mag))
    }
}

fn increment(mag: &mut Vec<Limb>) {
    for limb in mag.iter_mut() {
        let (v, overflow) = limb.overflowing_add(1);
        *limb = v;
        if !overflow {
            return;
        }
    }
    mag.push(1);
}

impl Default for Integer {
    fn default() -> Self {
        Integer::zero()
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Integer) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Integer) -> Ordering {
        fn rank(sign: Sign) -> i8 {
            match sign {
                Sign::Negative => -1,
                Sign::Zero => 0,
                Sign::Positive => 1,
            }
        }
        match rank(self.sign).cmp(&rank(other.sign)) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        let mags = limbs::cmp(&self.limbs, &other.limbs);
        if self.sign.is_negative() {
            mags.reverse()
        } else {
            mags
        }
    }
}

impl From<i64> for Integer {
    fn from(v: i64) -> Integer {
        Integer::from_i64(v)
    }
}

impl From<u64> for Integer {
    fn from(v: u64) -> Integer {
        Integer::from_u64(v)
    }
}

impl From<i32> for Integer {
    fn from(v: i32) -> Integer {
        Integer::from_i64(v as i64)
    }
}

impl From<u32> for Integer {
    fn from(v: u32) -> Integer {
        Integer::from_u64(v as u64)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .to_string_radix(10)
            .expect("radix 10 formatting cannot fail");
        f.write_str(&text)
    }
}

impl FromStr for Integer {
    type Err = LimbnumError;

    fn from_str(text: &str) -> Result<Integer, LimbnumError> {
        Integer::from_str_radix(text, 10)
    }
}

impl Add for Integer {
    type Output = Integer;
    fn add(self, other: Integer) -> Integer {
        (&self).add(&other)
    }
}

impl Add for &Integer {
    type Output = Integer;
    fn add(self, other: &Integer) -> Integer {
        self.add_signed(other, other.sign)
    }
}

impl Sub for Integer {
    type Output = Integer;
    fn sub(self, other: Integer) -> Integer {
        (&self).sub(&other)
    }
}

impl Sub for &Integer {
    type Output = Integer;
    fn sub(self, other: &Integer) -> Integer {
        self.add_signed(other, other.sign.flip())
    }
}

impl Mul for Integer {
    type Output = Integer;
    fn mul(self, other: Integer) -> Integer {
        self.checked_mul(&other)
    }
}

impl Mul for &Integer {
    type Output = Integer;
    fn mul(self, other: &Integer) -> Integer {
        self.checked_mul(other)
    }
}

impl Div for Integer {
    type Output = Integer;
    fn div(self, other: Integer) -> Integer {
        let (q, _) = self.divmod(&other).expect("divided by 0");
        q
    }
}

impl Rem for Integer {
    type Output = Integer;
    fn rem(self, other: Integer) -> Integer {
        let (_, r) = self.divmod(&other).expect("divided by 0");
        r
    }
}

impl Neg for Integer {
    type Output = Integer;
    fn neg(self) -> Integer {
        self.negated()
    }
}

impl Not for Integer {
    type Output = Integer;
    fn not(self) -> Integer {
        self.bit_not()
    }
}

impl BitAnd for Integer {
    type Output = Integer;
    fn bitand(self, other: Integer) -> Integer {
        self.bit_and(&other)
    }
}

impl BitOr for Integer {
    type Output = Integer;
    fn bitor(self, other: Integer) -> Integer {
        self.bit_or(&other)
    }
}

impl BitXor for Integer {
    type Output = Integer;
    fn bitxor(self, other: Integer) -> Integer {
        self.bit_xor(&other)
    }
}

impl Shl<usize> for Integer {
    type Output = Integer;
    fn shl(self, bits: usize) -> Integer {
        self.shifted_left(bits)
    }
}

impl Shr<usize> for Integer {
    type Output = Integer;
    fn shr(self, bits: usize) -> Integer {
        self.shifted_right(bits)
    }
}

impl Zero for Integer {
    fn zero() -> Integer {
        Integer::zero()
    }

    fn is_zero(&self) -> bool {
        Integer::is_zero(self)
    }
}

impl One for Integer {
    fn one() -> Integer {
        Integer::one()
    }
}

impl Num for Integer {
    type FromStrRadixErr = LimbnumError;

    fn from_str_radix(text: &str, radix_value: u32) -> Result<Integer, LimbnumError> {
        Integer::from_str_radix(text, radix_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Integer {
        Integer::from_i64(v)
    }

    const SAMPLES: [i64; 13] = [
        0, 1, -1, 2, -2, 7, -7, 255, -256, 4096, -65535, 123_456_789, -987_654_321,
    ];

    #[test]
    fn i64_round_trip() {
        for v in [0i64, 1, -1, i64::MAX, i64::MIN, 42, -42, 1 << 40] {
            assert_eq!(int(v).to_i64(), Some(v), "{v}");
        }
        assert_eq!(Integer::from_u64(u64::MAX).to_u64(), Some(u64::MAX));
        assert_eq!(Integer::from_u64(u64::MAX).to_i64(), None);
    }

    #[test]
    fn no_negative_zero() {
        let z = int(5) - int(5);
        assert_eq!(z.sign(), Sign::Zero);
        assert_eq!(z, int(0).negated());
        assert_eq!(int(0).negated().sign(), Sign::Zero);
    }

    #[test]
    fn add_sub_match_i64() {
        for &a in &SAMPLES {
            for &b in &SAMPLES {
                assert_eq!((int(a) + int(b)).to_i64(), Some(a + b), "{a} + {b}");
                assert_eq!((int(a) - int(b)).to_i64(), Some(a - b), "{a} - {b}");
            }
        }
    }

    #[test]
    fn mul_matches_i64() {
        for &a in &SAMPLES {
            for &b in &SAMPLES {
                let expect = a as i128 * b as i128;
                let got = int(a) * int(b);
                assert_eq!(got.to_i64().map(i128::from), Some(expect), "{a} * {b}");
            }
        }
    }

    #[test]
    fn divmod_truncates_toward_zero() {
        for &a in &SAMPLES {
            for &b in &SAMPLES {
                if b == 0 {
                    assert_eq!(
                        int(a).divmod(&int(b)),
                        Err(LimbnumError::DivisionByZero),
                        "{a} / 0"
                    );
                    continue;
                }
                let (q, r) = int(a).divmod(&int(b)).expect("divmod");
                assert_eq!(q.to_i64(), Some(a / b), "{a} / {b}");
                assert_eq!(r.to_i64(), Some(a % b), "{a} % {b}");
            }
        }
    }

    #[test]
    fn bitwise_matches_i64() {
        for &a in &SAMPLES {
            for &b in &SAMPLES {
                assert_eq!((int(a) & int(b)).to_i64(), Some(a & b), "{a} & {b}");
                assert_eq!((int(a) | int(b)).to_i64(), Some(a | b), "{a} | {b}");
                assert_eq!((int(a) ^ int(b)).to_i64(), Some(a ^ b), "{a} ^ {b}");
            }
            assert_eq!((!int(a)).to_i64(), Some(!a), "!{a}");
        }
    }

    fn to_i128(v: &Integer) -> i128 {
        assert!(v.magnitude().len() <= 3);
        let mag = v
            .magnitude()
            .iter()
            .enumerate()
            .fold(0i128, |acc, (i, &l)| acc | (l as i128) << (32 * i));
        if v.sign() == Sign::Negative {
            -mag
        } else {
            mag
        }
    }

    #[test]
    fn shifts_match_i64() {
        for &a in &SAMPLES {
            for bits in [0usize, 1, 5, 31, 32, 40, 63] {
                let left = int(a) << bits;
                assert_eq!(to_i128(&left), (a as i128) << bits, "{a} << {bits}");
                let right = int(a) >> bits;
                assert_eq!(right.to_i64(), Some(a >> bits.min(63)), "{a} >> {bits}");
            }
        }
    }

    #[test]
    fn right_shift_past_the_top_is_minus_one_for_negatives() {
        assert_eq!((int(-5) >> 100).to_i64(), Some(-1));
        assert_eq!((int(5) >> 100).to_i64(), Some(0));
    }

    #[test]
    fn bit_reads_twos_complement_view() {
        let x = int(0b1011_0010);
        assert!(!x.bit(0));
        assert!(x.bit(1));
        assert!(x.bit(7));
        assert!(!x.bit(64));
        let y = int(-2);
        assert!(!y.bit(0));
        for n in [1usize, 5, 31, 32, 100] {
            assert!(y.bit(n), "bit {n} of -2");
        }
    }

    #[test]
    fn ordering_spans_signs() {
        let mut values: Vec<Integer> = SAMPLES.iter().map(|&v| int(v)).collect();
        values.sort();
        let mut raw: Vec<i64> = SAMPLES.to_vec();
        raw.sort();
        let sorted: Vec<i64> = values.iter().map(|v| v.to_i64().unwrap()).collect();
        assert_eq!(sorted, raw);
    }

    #[test]
    fn pow_by_squaring() {
        assert_eq!(int(3).pow(0).to_i64(), Some(1));
        assert_eq!(int(3).pow(5).to_i64(), Some(243));
        assert_eq!(int(-2).pow(3).to_i64(), Some(-8));
        assert_eq!(int(-2).pow(8).to_i64(), Some(256));
        assert_eq!(int(0).pow(9).to_i64(), Some(0));
        let big = int(10).pow(30);
        assert_eq!(
            big.to_string(),
            "1000000000000000000000000000000"
        );
    }

    #[test]
    fn display_and_from_str_round_trip() {
        for text in ["0", "-1", "123456789012345678901234567890", "-42"] {
            let value: Integer = text.parse().expect("parse");
            assert_eq!(value.to_string(), text);
        }
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("".parse::<Integer>().is_err());
        assert!("-".parse::<Integer>().is_err());
        assert!("12 34".parse::<Integer>().is_err());
        assert!("0x10".parse::<Integer>().is_err());
    }

    #[test]
    fn negative_zero_text_normalizes_to_zero() {
        let value: Integer = "-0".parse().expect("parse");
        assert_eq!(value.sign(), Sign::Zero);
        assert_eq!(value.to_string(), "0");
    }

    #[test]
    fn binary_round_trip_with_sign() {
        let value = Integer::from_str_radix("-1000", 2).expect("parse");
        assert_eq!(value.to_i64(), Some(-8));
        assert_eq!(value.to_string_radix(2).expect("format"), "-1000");
    }

    #[test]
    fn from_f64_truncates_toward_zero() {
        assert_eq!(Integer::from_f64(3.9).unwrap().to_i64(), Some(3));
        assert_eq!(Integer::from_f64(-3.9).unwrap().to_i64(), Some(-3));
        assert_eq!(Integer::from_f64(0.5).unwrap().to_i64(), Some(0));
        assert!(Integer::from_f64(f64::NAN).is_none());
        assert!(Integer::from_f64(f64::INFINITY).is_none());
        let big = Integer::from_f64(2f64.powi(100)).unwrap();
        assert_eq!(big, int(2).pow(100));
    }

    #[test]
    fn to_f64_matches_small_values_and_saturates() {
        for &v in &SAMPLES {
            assert_eq!(int(v).to_f64(), v as f64);
        }
        let huge = int(2).pow(2000);
        assert!(huge.to_f64().is_infinite());
        assert!(huge.negated().to_f64().is_infinite());
        assert!(huge.negated().to_f64() < 0.0);
    }

    #[test]
    fn num_traits_integration() {
        use num_traits::{Num, One, Zero};
        assert!(<Integer as Zero>::zero().is_zero());
        assert_eq!(<Integer as One>::one().to_i64(), Some(1));
        let parsed = <Integer as Num>::from_str_radix("ff", 16).expect("parse");
        assert_eq!(parsed.to_i64(), Some(255));
    }

    #[test]
    fn cancelled_divmod_propagates() {
        let token = CancelToken::root();
        token.cancel();
        let x = Integer::from_str_radix("123456789012345678901234567890", 10).unwrap();
        let y = Integer::from_str_radix("12345678901234567", 10).unwrap();
        assert_eq!(
            x.divmod_with_cancel(&y, Some(&token)),
            Err(LimbnumError::Cancelled)
        );
    }
}
