use crate::limbs;
use crate::{DoubleLimb, Limb, LimbnumError, Sign, LIMB_BITS, LIMB_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOrder {
    MostSignificantFirst,
    LeastSignificantFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    MostSignificantFirst,
    LeastSignificantFirst,
    Native,
}

/// How a magnitude maps onto an external word buffer. `nail_bits` high bits
/// of every word are ignored; `force_generic` bypasses the bulk fast path
/// so both implementations can be checked against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackLayout {
    pub word_order: WordOrder,
    pub byte_order: ByteOrder,
    pub word_size: usize,
    pub nail_bits: usize,
    pub twos_complement: bool,
    pub force_generic: bool,
}

impl PackLayout {
    pub fn native() -> Self {
        PackLayout {
            word_order: WordOrder::LeastSignificantFirst,
            byte_order: ByteOrder::Native,
            word_size: LIMB_BYTES,
            nail_bits: 0,
            twos_complement: false,
            force_generic: false,
        }
    }

    fn validate(&self, buf_len: usize) -> Result<usize, LimbnumError> {
        if self.word_size == 0 || self.nail_bits >= 8 * self.word_size {
            return Err(LimbnumError::BufferOverflow);
        }
        if buf_len % self.word_size != 0 {
            return Err(LimbnumError::BufferOverflow);
        }
        Ok(buf_len / self.word_size)
    }

    fn usable_bits(&self) -> usize {
        8 * self.word_size - self.nail_bits
    }

    fn effective_byte_order(&self) -> ByteOrder {
        match self.byte_order {
            ByteOrder::Native => {
                if cfg!(target_endian = "big") {
                    ByteOrder::MostSignificantFirst
                } else {
                    ByteOrder::LeastSignificantFirst
                }
            }
            other => other,
        }
    }

    fn is_native_limb_layout(&self) -> bool {
        self.nail_bits == 0
            && self.word_size == LIMB_BYTES
            && self.word_order == WordOrder::LeastSignificantFirst
            && self.effective_byte_order() == ByteOrder::LeastSignificantFirst
    }

    fn byte_position(&self, word_count: usize, word: usize, byte: usize) -> usize {
        let pw = match self.word_order {
            WordOrder::LeastSignificantFirst => word,
            WordOrder::MostSignificantFirst => word_count - 1 - word,
        };
        let pb = match self.effective_byte_order() {
            ByteOrder::LeastSignificantFirst => byte,
            ByteOrder::MostSignificantFirst => self.word_size - 1 - byte,
            ByteOrder::Native => unreachable!(),
        };
        pw * self.word_size + pb
    }
}

// Serves the magnitude as least-significant-first bit groups, zeros past the
// top, optionally as the on-the-fly two's complement of the value.
struct BitStream<'a> {
    mag: &'a [Limb],
    bit_pos: usize,
    negate: bool,
    carry: u32,
}

impl<'a> BitStream<'a> {
    fn new(mag: &'a [Limb], negate: bool) -> Self {
        BitStream {
            mag,
            bit_pos: 0,
            negate,
            carry: 1,
        }
    }

    fn take(&mut self, width: usize) -> u8 {
        if width == 0 {
            return 0;
        }
        debug_assert!(width <= 8);
        let raw = read_bits(self.mag, self.bit_pos, width);
        self.bit_pos += width;
        let mask = (1u32 << width) - 1;
        if !self.negate {
            return (raw & mask) as u8;
        }
        let t = (!raw & mask) + self.carry;
        self.carry = t >> width;
        (t & mask) as u8
    }
}

fn read_bits(mag: &[Limb], pos: usize, width: usize) -> u32 {
    let limb_i = pos / LIMB_BITS;
    let bit_i = pos % LIMB_BITS;
    let mut v: DoubleLimb = 0;
    if limb_i < mag.len() {
        v = mag[limb_i] as DoubleLimb >> bit_i;
    }
    if limb_i + 1 < mag.len() && bit_i + width > LIMB_BITS {
        v |= (mag[limb_i + 1] as DoubleLimb) << (LIMB_BITS - bit_i);
    }
    (v as u32) & (((1u64 << width) - 1) as u32)
}

fn write_bits(mag: &mut [Limb], pos: usize, width: usize, value: u32) {
    let limb_i = pos / LIMB_BITS;
    let bit_i = pos % LIMB_BITS;
    if limb_i < mag.len() {
        mag[limb_i] |= value << bit_i;
    }
    if bit_i + width > LIMB_BITS && limb_i + 1 < mag.len() {
        mag[limb_i + 1] |= ((value as DoubleLimb) >> (LIMB_BITS - bit_i)) as Limb;
    }
}

fn single_bit_at(mag: &[Limb], pos: usize) -> bool {
    if limbs::bit_length(mag) != pos + 1 {
        return false;
    }
    let top = pos / LIMB_BITS;
    mag[..top].iter().all(|&l| l == 0) && mag[top].is_power_of_two()
}

/// Serialize a signed magnitude into `words`. Returns the status code:
/// `0` zero, `1`/`-1` fits (positive/negative), `2`/`-2` overflow with the
/// low-order bits stored. In two's-complement mode the negative range
/// extends one further: exactly `-2^(bits-1)` still fits and reports `-1`.
pub fn pack(
    sign: Sign,
    mag: &[Limb],
    words: &mut [u8],
    layout: &PackLayout,
) -> Result<i8, LimbnumError> {
    let word_count = layout.validate(words.len())?;
    let usable = layout.usable_bits();
    let total_bits = word_count
        .checked_mul(usable)
        .ok_or(LimbnumError::CapacityExceeded)?;

    let n = limbs::normal_len(mag);
    let mag = &mag[..n];
    if n == 0 || sign.is_zero() {
        words.fill(0);
        return Ok(0);
    }
    let negative = sign.is_negative();
    let bitlen = limbs::bit_length(mag);

    let fits = if layout.twos_complement && negative {
        bitlen < total_bits || (total_bits > 0 && single_bit_at(mag, total_bits - 1))
    } else {
        bitlen <= total_bits
    };
    let status: i8 = match (fits, negative) {
        (true, false) => 1,
        (true, true) => -1,
        (false, false) => 2,
        (false, true) => -2,
    };

    let negate = layout.twos_complement && negative;
    if !layout.force_generic && layout.is_native_limb_layout() {
        // Whole-limb copy, with the two's-complement transform applied
        // limb-wise while copying.
        let mut carry: DoubleLimb = 1;
        for w in 0..word_count {
            let raw = if w < mag.len() { mag[w] } else { 0 };
            let v = if negate {
                let t = (!raw) as DoubleLimb + carry;
                carry = t >> LIMB_BITS;
                t as Limb
            } else {
                raw
            };
            words[w * LIMB_BYTES..(w + 1) * LIMB_BYTES].copy_from_slice(&v.to_le_bytes());
        }
        return Ok(status);
    }

    let mut stream = BitStream::new(mag, negate);
    for w in 0..word_count {
        let mut remaining = usable;
        for b in 0..layout.word_size {
            let take = remaining.min(8);
            let v = stream.take(take);
            remaining -= take;
            words[layout.byte_position(word_count, w, b)] = v;
        }
    }
    Ok(status)
}

/// Deserialize `words` back into a signed magnitude. Without
/// two's-complement mode the buffer holds a plain magnitude and `negative`
/// only selects the sign. With it, the value is taken as non-negative
/// unless `negative` is set, in which case the result is sign extended:
/// `raw - 2^bits`, so an all-zero buffer means exactly `-2^bits`.
pub fn unpack(
    words: &[u8],
    layout: &PackLayout,
    negative: bool,
) -> Result<(Sign, Vec<Limb>), LimbnumError> {
    let word_count = layout.validate(words.len())?;
    let usable = layout.usable_bits();
    let total_bits = word_count
        .checked_mul(usable)
        .ok_or(LimbnumError::CapacityExceeded)?;
    let nlimbs = total_bits / LIMB_BITS + 1;
    let mut mag = vec![0 as Limb; nlimbs];

    if !layout.force_generic && layout.is_native_limb_layout() {
        for w in 0..word_count {
            let mut bytes = [0u8; LIMB_BYTES];
            bytes.copy_from_slice(&words[w * LIMB_BYTES..(w + 1) * LIMB_BYTES]);
            mag[w] = Limb::from_le_bytes(bytes);
        }
    } else {
        let mut bit_pos = 0;
        for w in 0..word_count {
            let mut remaining = usable;
            for b in 0..layout.word_size {
                let take = remaining.min(8);
                if take > 0 {
                    let byte = words[layout.byte_position(word_count, w, b)];
                    let v = byte as u32 & ((1u32 << take) - 1);
                    write_bits(&mut mag, bit_pos, take, v);
                    bit_pos += take;
                }
                remaining -= take;
            }
        }
    }

    if layout.twos_complement && negative {
        if limbs::is_zero(&mag) {
            // raw 0 sign extends to exactly -2^bits.
            let mut out = vec![0 as Limb; total_bits / LIMB_BITS + 1];
            out[total_bits / LIMB_BITS] = 1 << (total_bits % LIMB_BITS);
            return Ok((Sign::Negative, out));
        }
        let full = (total_bits + LIMB_BITS - 1) / LIMB_BITS;
        limbs::two_complement_in_place(&mut mag[..full]);
        if total_bits % LIMB_BITS != 0 {
            mag[full - 1] &= (1 << (total_bits % LIMB_BITS)) - 1;
        }
        for limb in mag.iter_mut().skip(full) {
            *limb = 0;
        }
        mag.truncate(limbs::normal_len(&mag));
        return Ok((Sign::Negative, mag));
    }

    mag.truncate(limbs::normal_len(&mag));
    let sign = if mag.is_empty() {
        Sign::Zero
    } else if negative {
        Sign::Negative
    } else {
        Sign::Positive
    };
    Ok((sign, mag))
}
