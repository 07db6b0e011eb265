use soroban_sdk::Env;

pub const SECONDS_PER_DAY: u64 = 86_400;

pub struct TimeUtils;

impl TimeUtils {
    /// Current ledger timestamp in seconds.
    pub fn now(e: &Env) -> u64 {
        e.ledger().timestamp()
    }

    pub fn days_to_seconds(days: u32) -> Option<u64> {
        (days as u64).checked_mul(SECONDS_PER_DAY)
    }

    /// now + duration_days, `None` if the deadline would overflow u64.
    pub fn checked_deadline(e: &Env, duration_days: u32) -> Option<u64> {
        Self::now(e).checked_add(Self::days_to_seconds(duration_days)?)
    }
}
