//! IBM System/360 single precision floats, the default SEG-Y sample format.
//!
//! Layout: sign bit, 7-bit excess-64 base-16 exponent, 24-bit fraction.
//! Value = `(-1)^sign * 0.fraction * 16^(exponent - 64)`.

/// Exponent bias plus the hidden bit, indexed by the low two bits of the
/// IEEE exponent.
const EXPONENT_OFFSET: [u32; 4] = [0x2120_0000, 0x2140_0000, 0x2180_0000, 0x2210_0000];

/// Mantissa multiplier that aligns the binary point on a hex digit.
const MANTISSA_SCALE: [u32; 4] = [2, 4, 8, 1];

/// Encode an IEEE-754 single into IBM float bits.
///
/// Low mantissa bits that do not fit the hex-aligned fraction are
/// truncated. Both zeros map to `0`.
pub fn ieee_to_ibm(value: f32) -> u32 {
    let ieee = value.to_bits();
    if ieee & 0x7fff_ffff == 0 {
        return 0;
    }
    let ix = ((ieee & 0x0180_0000) >> 23) as usize;
    let exponent = ((ieee & 0x7e00_0000) >> 1) + EXPONENT_OFFSET[ix];
    let fraction = (MANTISSA_SCALE[ix] * (ieee & 0x007f_ffff)) >> 3;
    (fraction + exponent) | (ieee & 0x8000_0000)
}

/// Decode IBM float bits into an IEEE-754 single.
///
/// Exact for every value produced by [`ieee_to_ibm`].
pub fn ibm_to_ieee(ibm: u32) -> f32 {
    let fraction = ibm & 0x00ff_ffff;
    if fraction == 0 {
        return 0.0;
    }
    let exponent = ((ibm >> 24) & 0x7f) as i32 - 64;
    // 24-bit fraction times a power of two is exact in f64.
    let magnitude = f64::from(fraction) * 2f64.powi(4 * exponent - 24);
    let value = magnitude as f32;
    if ibm & 0x8000_0000 != 0 {
        -value
    } else {
        value
    }
}

/// Decode a big-endian sample block into `out`.
pub(crate) fn decode_be_samples(bytes: &[u8], out: &mut [f32]) {
    for (chunk, sample) in bytes.chunks_exact(4).zip(out.iter_mut()) {
        let bits = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        *sample = ibm_to_ieee(bits);
    }
}

/// Encode samples as big-endian IBM floats, appending to `out`.
pub(crate) fn encode_be_samples(samples: &[f32], out: &mut Vec<u8>) {
    out.reserve(samples.len() * 4);
    for &s in samples {
        out.extend_from_slice(&ieee_to_ibm(s).to_be_bytes());
    }
}
