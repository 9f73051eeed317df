use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use crate::limbs;
use crate::{div, DoubleLimb, Limb, LIMB_BITS};

/// Below this many limbs (shorter operand) multiplication stays schoolbook.
pub const KARATSUBA_MUL_DIGITS: usize = 70;
/// Below this many limbs (longer operand) Karatsuba is used, Toom-3 above.
pub const TOOM3_MUL_DIGITS: usize = 150;

/// z = x * y. Requires `z.len() >= x.len() + y.len()`; the whole output
/// buffer is written, high limbs zero filled. The algorithm is chosen by
/// operand size; every path produces bit-identical results.
pub fn mul(z: &mut [Limb], x: &[Limb], y: &[Limb]) {
    assert!(
        z.len() >= x.len() + y.len(),
        "output buffer too small for product"
    );
    z.fill(0);
    dispatch(z, x, y);
}

/// Forced schoolbook path.
pub fn mul_schoolbook(z: &mut [Limb], x: &[Limb], y: &[Limb]) {
    assert!(z.len() >= x.len() + y.len());
    z.fill(0);
    let x = trimmed(x);
    let y = trimmed(y);
    if x.is_empty() || y.is_empty() {
        return;
    }
    basic(z, x, y);
}

/// Forced squaring path.
pub fn square(z: &mut [Limb], x: &[Limb]) {
    assert!(z.len() >= 2 * x.len());
    z.fill(0);
    let x = trimmed(x);
    if x.is_empty() {
        return;
    }
    square_basic(z, x);
}

/// Forced Karatsuba path. Falls back for operands too small or too lopsided
/// to split.
pub fn mul_karatsuba(z: &mut [Limb], x: &[Limb], y: &[Limb]) {
    assert!(z.len() >= x.len() + y.len());
    z.fill(0);
    let (x, y) = ordered(trimmed(x), trimmed(y));
    if x.is_empty() {
        return;
    }
    if x.len() < 2 || 2 * x.len() <= y.len() {
        basic(z, x, y);
        return;
    }
    karatsuba(z, x, y);
}

/// Forced Toom-3 path. Falls back for operands too small to split three ways.
pub fn mul_toom3(z: &mut [Limb], x: &[Limb], y: &[Limb]) {
    assert!(z.len() >= x.len() + y.len());
    z.fill(0);
    let (x, y) = ordered(trimmed(x), trimmed(y));
    if x.is_empty() {
        return;
    }
    if x.len() < 3 || 3 * x.len() <= 2 * (y.len() + 2) {
        basic(z, x, y);
        return;
    }
    toom3(z, x, y);
}

/// Forced balanced multiplication: the longer operand is sliced into chunks
/// no longer than the shorter one.
pub fn mul_balance(z: &mut [Limb], x: &[Limb], y: &[Limb]) {
    assert!(z.len() >= x.len() + y.len());
    z.fill(0);
    let (x, y) = ordered(trimmed(x), trimmed(y));
    if x.is_empty() {
        return;
    }
    balance(z, x, y);
}

fn trimmed(x: &[Limb]) -> &[Limb] {
    &x[..limbs::normal_len(x)]
}

fn ordered<'a>(x: &'a [Limb], y: &'a [Limb]) -> (&'a [Limb], &'a [Limb]) {
    if x.len() <= y.len() {
        (x, y)
    } else {
        (y, x)
    }
}

// Dispatch over a zero-filled output window. Inputs need not be trimmed.
fn dispatch(z: &mut [Limb], x: &[Limb], y: &[Limb]) {
    let xt = trimmed(x);
    let yt = trimmed(y);
    let squaring = std::ptr::eq(xt.as_ptr(), yt.as_ptr()) && xt.len() == yt.len();
    let (x, y) = ordered(xt, yt);
    if x.is_empty() {
        return;
    }
    if x.len() == 1 {
        let m = x[0];
        if m == 1 {
            z[..y.len()].copy_from_slice(y);
        } else if m.is_power_of_two() {
            let carry = limbs::shl_small(&mut z[..y.len()], y, m.trailing_zeros());
            z[y.len()] = carry;
        } else {
            mul_limb(z, y, m);
        }
        return;
    }
    // Sampling is a performance heuristic: schoolbook degrades gracefully on
    // a mostly-zero operand while the split algorithms do not.
    if is_sparse(x) {
        basic(z, x, y);
        return;
    }
    if is_sparse(y) {
        basic(z, y, x);
        return;
    }
    if x.len() < KARATSUBA_MUL_DIGITS {
        if squaring {
            square_basic(z, x);
        } else {
            basic(z, x, y);
        }
        return;
    }
    if y.len() < TOOM3_MUL_DIGITS {
        if 2 * x.len() <= y.len() {
            balance(z, x, y);
        } else {
            karatsuba(z, x, y);
        }
    } else if 3 * x.len() <= 2 * (y.len() + 2) {
        balance(z, x, y);
    } else {
        toom3(z, x, y);
    }
}

/// z = x * m for a single limb m, writing x.len() + 1 limbs.
pub fn mul_limb(z: &mut [Limb], x: &[Limb], m: Limb) {
    debug_assert!(z.len() > x.len());
    let mut carry: DoubleLimb = 0;
    for i in 0..x.len() {
        let t = x[i] as DoubleLimb * m as DoubleLimb + carry;
        z[i] = t as Limb;
        carry = t >> LIMB_BITS;
    }
    z[x.len()] = carry as Limb;
}

// Schoolbook with the outer loop over `outer`, skipping zero limbs.
fn basic(z: &mut [Limb], outer: &[Limb], inner: &[Limb]) {
    for (i, &dd) in outer.iter().enumerate() {
        if dd == 0 {
            continue;
        }
        let mut carry: DoubleLimb = 0;
        for (j, &e) in inner.iter().enumerate() {
            let t = dd as DoubleLimb * e as DoubleLimb + z[i + j] as DoubleLimb + carry;
            z[i + j] = t as Limb;
            carry = t >> LIMB_BITS;
        }
        let mut k = i + inner.len();
        while carry != 0 {
            let t = z[k] as DoubleLimb + carry;
            z[k] = t as Limb;
            carry = t >> LIMB_BITS;
            k += 1;
        }
    }
}

// Squaring via the symmetric shortcut: accumulate the off-diagonal products
// once, double the whole window, then add the diagonal squares.
fn square_basic(z: &mut [Limb], x: &[Limb]) {
    let n = x.len();
    for i in 0..n {
        let xi = x[i] as DoubleLimb;
        if xi == 0 {
            continue;
        }
        let mut carry: DoubleLimb = 0;
        for j in i + 1..n {
            let t = xi * x[j] as DoubleLimb + z[i + j] as DoubleLimb + carry;
            z[i + j] = t as Limb;
            carry = t >> LIMB_BITS;
        }
        z[i + n] = carry as Limb;
    }
    let carry = limbs::shl_small_in_place(&mut z[..2 * n], 1);
    debug_assert_eq!(carry, 0);
    let mut carry: DoubleLimb = 0;
    for i in 0..n {
        let t = x[i] as DoubleLimb * x[i] as DoubleLimb + z[2 * i] as DoubleLimb + carry;
        z[2 * i] = t as Limb;
        let t2 = z[2 * i + 1] as DoubleLimb + (t >> LIMB_BITS);
        z[2 * i + 1] = t2 as Limb;
        carry = t2 >> LIMB_BITS;
    }
    debug_assert_eq!(carry, 0);
}

fn is_sparse(x: &[Limb]) -> bool {
    let n = x.len();
    let span = n / 2;
    if span == 0 {
        return false;
    }
    let mut nonzero = 0;
    for _ in 0..3 {
        let idx = n / 4 + (sampler_next() % span as u64) as usize;
        if x[idx] != 0 {
            nonzero += 1;
            if nonzero > 1 {
                return false;
            }
        }
    }
    true
}

fn sampler_state() -> &'static AtomicU64 {
    static STATE: OnceLock<AtomicU64> = OnceLock::new();
    STATE.get_or_init(|| {
        let mut seed = [0u8; 8];
        let _ = getrandom::getrandom(&mut seed);
        let mut v = u64::from_le_bytes(seed);
        if v == 0 {
            v = 0x9E37_79B9_7F4A_7C15;
        }
        AtomicU64::new(v)
    })
}

fn sampler_next() -> u64 {
    let state = sampler_state();
    let mut cur = state.load(Ordering::Relaxed);
    loop {
        let mut next = cur;
        next ^= next << 13;
        next ^= next >> 7;
        next ^= next << 17;
        match state.compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.wrapping_mul(0x2545_F491_4F6C_DD1D),
            Err(seen) => cur = seen,
        }
    }
}

// Lopsided operands: slice the longer one into chunks no wider than the
// shorter and accumulate shifted partial products.
fn balance(z: &mut [Limb], x: &[Limb], y: &[Limb]) {
    let xn = x.len();
    let mut off = 0;
    while off < y.len() {
        let clen = xn.min(y.len() - off);
        let chunk = &y[off..off + clen];
        let mut t = vec![0 as Limb; xn + clen];
        dispatch(&mut t, x, chunk);
        let escaped = limbs::add_assign(&mut z[off..], &t);
        debug_assert!(!escaped);
        off += clen;
    }
}

fn vec_sub(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let mut z = vec![0 as Limb; a.len().max(b.len())];
    let borrow = limbs::sub(&mut z, a, b);
    debug_assert!(!borrow);
    z
}

// (|a - b|, a < b)
fn abs_diff(a: &[Limb], b: &[Limb]) -> (Vec<Limb>, bool) {
    match limbs::cmp(a, b) {
        std::cmp::Ordering::Less => (vec_sub(b, a), true),
        _ => (vec_sub(a, b), false),
    }
}

// Requires x.len() <= y.len() < 2 * x.len(), both trimmed, z zeroed.
fn karatsuba(z: &mut [Limb], x: &[Limb], y: &[Limb]) {
    let xn = x.len();
    let yn = y.len();
    let b = yn / 2;
    debug_assert!(xn > b);
    let (xl, xh) = x.split_at(b);
    let (yl, yh) = y.split_at(b);

    // low*low and high*high land directly in the output.
    dispatch(&mut z[..2 * b], xl, yl);
    dispatch(&mut z[2 * b..xn + yn], xh, yh);

    let (dx, dx_neg) = abs_diff(xh, xl);
    let (dy, dy_neg) = abs_diff(yh, yl);
    let mut dprod = vec![0 as Limb; dx.len() + dy.len()];
    dispatch(&mut dprod, &dx, &dy);

    // mid = ll + hh -/+ dprod, always non-negative.
    let mut mid = vec![0 as Limb; yn + 2];
    let carry = limbs::add(&mut mid, &z[..2 * b], &z[2 * b..xn + yn]);
    debug_assert!(!carry);
    if dx_neg == dy_neg {
        let borrow = limbs::sub_assign(&mut mid, &dprod);
        debug_assert!(!borrow);
    } else {
        let carry = limbs::add_assign(&mut mid, &dprod);
        debug_assert!(!carry);
    }

    let mid_len = limbs::normal_len(&mid);
    let escaped = limbs::add_assign(&mut z[b..], &mid[..mid_len]);
    debug_assert!(!escaped);
}

// Signed magnitude for the interpolation bookkeeping; zero is never negative.
#[derive(Clone, Debug)]
struct SignedMag {
    negative: bool,
    mag: Vec<Limb>,
}

impl SignedMag {
    fn from_slice(x: &[Limb]) -> Self {
        let n = limbs::normal_len(x);
        SignedMag {
            negative: false,
            mag: x[..n].to_vec(),
        }
    }

    fn is_zero(&self) -> bool {
        self.mag.is_empty()
    }

    fn trim(mut self) -> Self {
        self.mag.truncate(limbs::normal_len(&self.mag));
        if self.mag.is_empty() {
            self.negative = false;
        }
        self
    }

    fn add(&self, other: &SignedMag) -> SignedMag {
        if self.negative == other.negative {
            let mut mag = vec![0 as Limb; self.mag.len().max(other.mag.len()) + 1];
            limbs::add(&mut mag, &self.mag, &other.mag);
            SignedMag {
                negative: self.negative,
                mag,
            }
            .trim()
        } else {
            let (mag, flipped) = abs_diff(&self.mag, &other.mag);
            SignedMag {
                negative: self.negative != flipped,
                mag,
            }
            .trim()
        }
    }

    fn sub(&self, other: &SignedMag) -> SignedMag {
        let negated = SignedMag {
            negative: !other.negative,
            mag: other.mag.clone(),
        };
        self.add(&negated)
    }

    fn mul(&self, other: &SignedMag) -> SignedMag {
        if self.is_zero() || other.is_zero() {
            return SignedMag {
                negative: false,
                mag: Vec::new(),
            };
        }
        let mut mag = vec![0 as Limb; self.mag.len() + other.mag.len()];
        dispatch(&mut mag, &self.mag, &other.mag);
        SignedMag {
            negative: self.negative != other.negative,
            mag,
        }
        .trim()
    }

    fn mul_small(&self, m: Limb) -> SignedMag {
        if self.is_zero() || m == 0 {
            return SignedMag {
                negative: false,
                mag: Vec::new(),
            };
        }
        let mut mag = vec![0 as Limb; self.mag.len() + 1];
        mul_limb(&mut mag, &self.mag, m);
        SignedMag {
            negative: self.negative,
            mag,
        }
        .trim()
    }

    // Exact halving; the low bit must be clear.
    fn half(&self) -> SignedMag {
        debug_assert!(self.mag.is_empty() || self.mag[0] & 1 == 0);
        let mut mag = self.mag.clone();
        limbs::shr_small_in_place(&mut mag, 1, false);
        SignedMag {
            negative: self.negative,
            mag,
        }
        .trim()
    }

    // Exact division by 3.
    fn div3(&self) -> SignedMag {
        if self.is_zero() {
            return self.clone();
        }
        let mut q = vec![0 as Limb; self.mag.len()];
        let rem = div::divmod_by_limb(&mut q, &self.mag, 3);
        debug_assert_eq!(rem, 0);
        SignedMag {
            negative: self.negative,
            mag: q,
        }
        .trim()
    }
}

fn toom_part(x: &[Limb], lo: usize, hi: usize) -> SignedMag {
    let lo = lo.min(x.len());
    let hi = hi.min(x.len());
    SignedMag::from_slice(&x[lo..hi])
}

// Toom-3: split each operand in three, evaluate at 0, 1, -1, -2 and infinity,
// multiply pointwise, interpolate with one exact division by 3. Requires
// x.len() <= y.len(), 3 * x.len() > 2 * (y.len() + 2), both trimmed, z zeroed.
fn toom3(z: &mut [Limb], x: &[Limb], y: &[Limb]) {
    let xn = x.len();
    let yn = y.len();
    let n = (yn + 2) / 3;

    let u0 = toom_part(x, 0, n);
    let u1 = toom_part(x, n, 2 * n);
    let u2 = toom_part(x, 2 * n, xn);
    let v0 = toom_part(y, 0, n);
    let v1 = toom_part(y, n, 2 * n);
    let v2 = toom_part(y, 2 * n, yn);

    let ux1 = u0.add(&u1).add(&u2);
    let uxm1 = u0.add(&u2).sub(&u1);
    let uxm2 = u0.sub(&u1.mul_small(2)).add(&u2.mul_small(4));
    let vx1 = v0.add(&v1).add(&v2);
    let vxm1 = v0.add(&v2).sub(&v1);
    let vxm2 = v0.sub(&v1.mul_small(2)).add(&v2.mul_small(4));

    let w0 = u0.mul(&v0);
    let w1 = ux1.mul(&vx1);
    let w2 = uxm1.mul(&vxm1);
    let w3 = uxm2.mul(&vxm2);
    let w4 = u2.mul(&v2);

    let a = w1.sub(&w0).sub(&w4);
    let b = w2.sub(&w0).sub(&w4);
    let c2 = a.add(&b).half();
    let d = a.sub(&b).half();
    let half_c = w3.sub(&w0).half().sub(&w4.mul_small(8));
    let c3 = c2.mul_small(2).sub(&half_c).sub(&d).div3();
    let c1 = d.sub(&c3);

    for (k, coeff) in [&w0, &c1, &c2, &c3, &w4].into_iter().enumerate() {
        debug_assert!(!coeff.negative);
        if coeff.mag.is_empty() {
            continue;
        }
        let escaped = limbs::add_assign(&mut z[k * n..], &coeff.mag);
        debug_assert!(!escaped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pseudo_limbs(len: usize, seed: u64) -> Vec<Limb> {
        let mut state = seed | 1;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            out.push(state as Limb);
        }
        if let Some(last) = out.last_mut() {
            *last |= 1;
        }
        out
    }

    fn product(x: &[Limb], y: &[Limb]) -> Vec<Limb> {
        let mut z = vec![0 as Limb; x.len() + y.len()];
        mul(&mut z, x, y);
        z
    }

    #[test]
    fn single_limb_product_matches_u64() {
        let z = product(&[123_456_789], &[987_654_321]);
        let got = z[0] as u64 | (z[1] as u64) << 32;
        assert_eq!(got, 121_932_631_112_635_269);
    }

    #[test]
    fn multiply_by_one_copies_operand() {
        let y = pseudo_limbs(9, 7);
        let z = product(&[1], &y);
        assert_eq!(&z[..9], &y[..]);
        assert_eq!(z[9], 0);
    }

    #[test]
    fn multiply_by_power_of_two_is_a_shift() {
        let y = [0x8000_0001 as Limb, 5];
        let z = product(&[8], &y);
        let mut expect = vec![0 as Limb; 3];
        let carry = limbs::shl_small(&mut expect[..2], &y, 3);
        expect[2] = carry;
        assert_eq!(z, expect);
    }

    #[test]
    fn multiply_by_zero_is_zero() {
        let y = pseudo_limbs(5, 11);
        let z = product(&[], &y);
        assert!(limbs::is_zero(&z));
        let z = product(&[0, 0], &y);
        assert!(limbs::is_zero(&z));
    }

    #[test]
    fn schoolbook_matches_u128_for_two_limb_operands() {
        let x = [0xFFFF_FFFF as Limb, 0xFFFF_FFFF];
        let y = [0xFFFF_FFFF as Limb, 0xFFFF_FFFF];
        let z = product(&x, &y);
        let a = u64::MAX as u128;
        let expect = a * a;
        for (i, &limb) in z.iter().enumerate() {
            assert_eq!(limb as u128, (expect >> (32 * i)) & 0xFFFF_FFFF);
        }
    }

    #[test]
    fn karatsuba_agrees_with_schoolbook() {
        let x = pseudo_limbs(90, 3);
        let y = pseudo_limbs(100, 5);
        let mut basic = vec![0 as Limb; 190];
        mul_schoolbook(&mut basic, &x, &y);
        let mut kara = vec![0 as Limb; 190];
        mul_karatsuba(&mut kara, &x, &y);
        assert_eq!(basic, kara);
    }

    #[test]
    fn toom3_agrees_with_schoolbook() {
        let x = pseudo_limbs(155, 17);
        let y = pseudo_limbs(160, 23);
        let mut basic = vec![0 as Limb; 315];
        mul_schoolbook(&mut basic, &x, &y);
        let mut toom = vec![0 as Limb; 315];
        mul_toom3(&mut toom, &x, &y);
        assert_eq!(basic, toom);
    }

    #[test]
    fn balance_agrees_with_schoolbook_on_lopsided_operands() {
        let x = pseudo_limbs(80, 31);
        let y = pseudo_limbs(400, 37);
        let mut basic = vec![0 as Limb; 480];
        mul_schoolbook(&mut basic, &x, &y);
        let mut balanced = vec![0 as Limb; 480];
        mul_balance(&mut balanced, &x, &y);
        assert_eq!(basic, balanced);
    }

    #[test]
    fn square_agrees_with_general_multiplication() {
        let x = pseudo_limbs(60, 41);
        let mut by_mul = vec![0 as Limb; 120];
        mul_schoolbook(&mut by_mul, &x, &x);
        let mut by_square = vec![0 as Limb; 120];
        square(&mut by_square, &x);
        assert_eq!(by_mul, by_square);
    }

    #[test]
    fn sparse_operands_multiply_correctly() {
        let mut x = vec![0 as Limb; 120];
        x[0] = 3;
        x[119] = 7;
        let y = pseudo_limbs(120, 43);
        let mut basic = vec![0 as Limb; 240];
        mul_schoolbook(&mut basic, &x, &y);
        let z = product(&x, &y);
        assert_eq!(basic, z);
    }

    #[test]
    fn dispatch_zero_fills_oversized_output() {
        let mut z = vec![Limb::MAX; 8];
        mul(&mut z, &[2, 1], &[3]);
        assert_eq!(&z[3..], &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn karatsuba_handles_unbalanced_halves() {
        // Split-point edge: the high half of the shorter operand is a single
        // limb.
        let x = pseudo_limbs(76, 51);
        let y = pseudo_limbs(149, 53);
        let mut basic = vec![0 as Limb; 225];
        mul_schoolbook(&mut basic, &x, &y);
        let mut kara = vec![0 as Limb; 225];
        mul_karatsuba(&mut kara, &x, &y);
        assert_eq!(basic, kara);
    }
}
