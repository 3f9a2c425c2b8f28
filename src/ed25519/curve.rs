//! Edwards curve group operations.
//!
//! Points are held in extended homogeneous coordinates (X, Y, Z, T) with
//! x = X/Z, y = Y/Z, xy = T/Z. Scalar multiplication is a 256-bit ladder
//! performing one constant-time conditional swap per bit, so the memory
//! access pattern is independent of the scalar.

use super::field::{self, Fe, FE_ONE, FE_ZERO};

/// -121665/121666, the curve constant d.
const D: Fe = [
    0x78a3, 0x1359, 0x4dca, 0x75eb, 0xd8ab, 0x4141, 0x0a4d, 0x0070,
    0xe898, 0x7779, 0x4079, 0x8cc7, 0xfe73, 0x2b6f, 0x6cee, 0x5203,
];

/// 2d.
const D2: Fe = [
    0xf159, 0x26b2, 0x9b94, 0xebd6, 0xb156, 0x8283, 0x149a, 0x00e0,
    0xd130, 0xeef3, 0x80f2, 0x198e, 0xfce7, 0x56df, 0xd9dc, 0x2406,
];

/// Base point x coordinate.
const BASE_X: Fe = [
    0xd51a, 0x8f25, 0x2d60, 0xc956, 0xa7b2, 0x9525, 0xc760, 0x692c,
    0xdc5c, 0xfdd6, 0xe231, 0xc0a4, 0x53fe, 0xcd6e, 0x36d3, 0x2169,
];

/// Base point y coordinate (4/5).
const BASE_Y: Fe = [
    0x6658, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666,
    0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666,
];

/// sqrt(-1) = 2^((p-1)/4).
const SQRT_M1: Fe = [
    0xa0b0, 0x4a0e, 0x1b27, 0xc4ee, 0xe478, 0xad2f, 0x1806, 0x2f43,
    0xd7a7, 0x3dfb, 0x0099, 0x2b4d, 0xdf0b, 0x4fc1, 0x2480, 0x2b83,
];

/// A group element in extended coordinates.
#[derive(Clone, Copy)]
pub struct Point {
    pub x: Fe,
    pub y: Fe,
    pub z: Fe,
    pub t: Fe,
}

impl Point {
    /// The neutral element (0, 1).
    pub fn neutral() -> Self {
        Point {
            x: FE_ZERO,
            y: FE_ONE,
            z: FE_ONE,
            t: FE_ZERO,
        }
    }

    /// The curve base point B.
    pub fn base() -> Self {
        let mut t = FE_ZERO;
        field::mul(&mut t, &BASE_X, &BASE_Y);
        Point {
            x: BASE_X,
            y: BASE_Y,
            z: FE_ONE,
            t,
        }
    }
}

/// p += q, unified addition (handles doubling and the neutral element).
pub fn add(p: &mut Point, q: &Point) {
    let mut a = FE_ZERO;
    let mut b = FE_ZERO;
    let mut c = FE_ZERO;
    let mut d = FE_ZERO;
    let mut e = FE_ZERO;
    let mut f = FE_ZERO;
    let mut g = FE_ZERO;
    let mut h = FE_ZERO;
    let mut t = FE_ZERO;

    field::sub(&mut a, &p.y, &p.x);
    field::sub(&mut t, &q.y, &q.x);
    let a_copy = a;
    field::mul(&mut a, &a_copy, &t);

    field::add(&mut b, &p.x, &p.y);
    field::add(&mut t, &q.x, &q.y);
    let b_copy = b;
    field::mul(&mut b, &b_copy, &t);

    field::mul(&mut c, &p.t, &q.t);
    let c_copy = c;
    field::mul(&mut c, &c_copy, &D2);

    field::mul(&mut d, &p.z, &q.z);
    let d_copy = d;
    field::add(&mut d, &d_copy, &d_copy);

    field::sub(&mut e, &b, &a);
    field::sub(&mut f, &d, &c);
    field::add(&mut g, &d, &c);
    field::add(&mut h, &b, &a);

    field::mul(&mut p.x, &e, &f);
    field::mul(&mut p.y, &h, &g);
    field::mul(&mut p.z, &g, &f);
    field::mul(&mut p.t, &e, &h);
}

/// Constant-time conditional swap of two points.
fn cswap(p: &mut Point, q: &mut Point, b: i64) {
    field::sel(&mut p.x, &mut q.x, b);
    field::sel(&mut p.y, &mut q.y, b);
    field::sel(&mut p.z, &mut q.z, b);
    field::sel(&mut p.t, &mut q.t, b);
}

/// r = s * q, 256-bit ladder, one conditional swap per bit.
pub fn scalarmult(q: &Point, s: &[u8; 32]) -> Point {
    let mut p = Point::neutral();
    let mut q = *q;
    for i in (0..=255u32).rev() {
        let b = ((s[(i / 8) as usize] >> (i & 7)) & 1) as i64;
        cswap(&mut p, &mut q, b);
        let p_snapshot = p;
        add(&mut q, &p_snapshot);
        let p_copy = p;
        add(&mut p, &p_copy);
        cswap(&mut p, &mut q, b);
    }
    p
}

/// r = s * B.
pub fn scalarmult_base(s: &[u8; 32]) -> Point {
    scalarmult(&Point::base(), s)
}

/// Compress a point: pack y, then put the parity of x in bit 255.
pub fn compress(p: &Point) -> [u8; 32] {
    let mut zi = FE_ZERO;
    let mut tx = FE_ZERO;
    let mut ty = FE_ZERO;
    field::invert(&mut zi, &p.z);
    field::mul(&mut tx, &p.x, &zi);
    field::mul(&mut ty, &p.y, &zi);
    let mut out = [0u8; 32];
    field::pack(&mut out, &ty);
    out[31] ^= field::par(&tx) << 7;
    out
}

/// Decompress an encoding into the point with NEGATED x coordinate, as
/// consumed by the verification equation. Returns `None` when the
/// encoding is not a curve point.
pub fn decompress_neg(bytes: &[u8; 32]) -> Option<Point> {
    let mut r = Point {
        x: FE_ZERO,
        y: field::unpack(bytes),
        z: FE_ONE,
        t: FE_ZERO,
    };

    // x^2 = (y^2 - 1) / (d y^2 + 1)
    let mut num = FE_ZERO;
    let mut den = FE_ZERO;
    field::square(&mut num, &r.y);
    field::mul(&mut den, &num, &D);
    let num_copy = num;
    field::sub(&mut num, &num_copy, &r.z);
    let den_copy = den;
    field::add(&mut den, &r.z, &den_copy);

    // Candidate root: num * den^3 * (num * den^7)^((p-5)/8).
    let mut den2 = FE_ZERO;
    let mut den4 = FE_ZERO;
    let mut den6 = FE_ZERO;
    field::square(&mut den2, &den);
    field::square(&mut den4, &den2);
    field::mul(&mut den6, &den4, &den2);

    let mut t = FE_ZERO;
    field::mul(&mut t, &den6, &num);
    let t_copy = t;
    field::mul(&mut t, &t_copy, &den);
    let t_copy = t;
    field::pow2523(&mut t, &t_copy);
    let t_copy = t;
    field::mul(&mut t, &t_copy, &num);
    let t_copy = t;
    field::mul(&mut t, &t_copy, &den);
    let t_copy = t;
    field::mul(&mut t, &t_copy, &den);
    field::mul(&mut r.x, &t, &den);

    let mut chk = FE_ZERO;
    field::square(&mut chk, &r.x);
    let chk_copy = chk;
    field::mul(&mut chk, &chk_copy, &den);
    if field::neq(&chk, &num) != 0 {
        let x_copy = r.x;
        field::mul(&mut r.x, &x_copy, &SQRT_M1);
    }

    field::square(&mut chk, &r.x);
    let chk_copy = chk;
    field::mul(&mut chk, &chk_copy, &den);
    if field::neq(&chk, &num) != 0 {
        return None;
    }

    // The sign bit selects the root; we keep the negated one.
    if field::par(&r.x) == bytes[31] >> 7 {
        let x_copy = r.x;
        field::sub(&mut r.x, &FE_ZERO, &x_copy);
    }

    let (x, y) = (r.x, r.y);
    field::mul(&mut r.t, &x, &y);
    Some(r)
}
