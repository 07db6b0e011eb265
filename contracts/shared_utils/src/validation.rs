pub struct Validation;

/// Pure validation predicates. Contracts translate a `false` into their own
/// error kind so callers always see a specific code, never a generic panic.
impl Validation {
    pub fn is_positive(amount: i128) -> bool {
        amount > 0
    }

    pub fn is_at_least(amount: i128, min: i128) -> bool {
        amount >= min
    }

    pub fn within_range(amount: i128, min: i128, max: i128) -> bool {
        amount >= min && amount <= max
    }

    pub fn valid_bp(bp: u32, max_bp: u32) -> bool {
        bp <= max_bp
    }
}
