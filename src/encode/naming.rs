use std::time::{SystemTime, UNIX_EPOCH};

use crate::foundation::error::{AvatarError, AvatarResult};

const MAX_USER_ID_LEN: usize = 128;

fn system_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generates `avatar-{user}-{epochMillis}.jpg` keys.
///
/// The millisecond component is strictly increasing per generator: when the clock has
/// not advanced (or went backwards) the previous value is bumped by one.
#[derive(Debug)]
pub struct AvatarKeyGen {
    clock: fn() -> u64,
    last_millis: Option<u64>,
}

impl Default for AvatarKeyGen {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarKeyGen {
    /// Generator backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(system_millis)
    }

    /// Generator backed by a custom millisecond clock.
    pub fn with_clock(clock: fn() -> u64) -> Self {
        Self {
            clock,
            last_millis: None,
        }
    }

    /// Next unique file name for `user_id`.
    pub fn next_file_name(&mut self, user_id: &str) -> AvatarResult<String> {
        validate_user_id(user_id)?;
        let now = (self.clock)();
        let millis = match self.last_millis {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_millis = Some(millis);
        Ok(format!("avatar-{user_id}-{millis}.jpg"))
    }
}

/// User ids become part of a storage key, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_user_id(user_id: &str) -> AvatarResult<()> {
    if user_id.is_empty() || user_id.len() > MAX_USER_ID_LEN {
        return Err(AvatarError::validation(
            "user id must be between 1 and 128 characters",
        ));
    }
    if !user_id
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
    {
        return Err(AvatarError::validation(format!(
            "user id '{user_id}' contains characters not allowed in a storage key"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/naming.rs"]
mod tests;
