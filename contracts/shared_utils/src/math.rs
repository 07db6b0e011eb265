/// Basis-point denominator used for all rate math (10_000 bp = 100%).
pub const BPS_DENOMINATOR: i128 = 10_000;

pub struct SafeMath;

/// Checked integer math helpers.
///
/// Every helper returns `None` on overflow or division by zero so the calling
/// contract can surface its own `ArithmeticOverflow` error instead of
/// wrapping. All division floors.
impl SafeMath {
    pub fn checked_add(a: i128, b: i128) -> Option<i128> {
        a.checked_add(b)
    }

    pub fn checked_sub(a: i128, b: i128) -> Option<i128> {
        a.checked_sub(b)
    }

    /// floor(a * b / denom). The workhorse for share-price conversions.
    pub fn checked_mul_div_floor(a: i128, b: i128, denom: i128) -> Option<i128> {
        if denom == 0 {
            return None;
        }
        a.checked_mul(b)?.checked_div(denom)
    }

    /// floor(amount * bp / 10_000).
    pub fn bp_share(amount: i128, bp: u32) -> Option<i128> {
        Self::checked_mul_div_floor(amount, bp as i128, BPS_DENOMINATOR)
    }
}
