use soroban_sdk::{symbol_short, Env, String};

/// Publish a standardized error event before panicking.
///
/// Indexers subscribe to the `error` topic to surface failed invocations with
/// their numeric code and the operation that raised them.
pub fn emit_error_event(e: &Env, code: u32, context: &str) {
    e.events()
        .publish((symbol_short!("error"), code), String::from_str(e, context));
}
