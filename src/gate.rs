//! Static password gate shown before the dashboard. A plain string
//! comparison remembered for the session; deliberately not a security
//! boundary and not hardened as one.

#[derive(Debug, Clone)]
pub struct PasswordGate {
    expected: String,
    unlocked: bool,
}

impl PasswordGate {
    pub fn new(expected: String) -> Self {
        Self {
            expected,
            unlocked: false,
        }
    }

    /// Check one attempt. A match unlocks the gate for the rest of the
    /// session; a mismatch leaves it locked (the caller clears the input and
    /// shows an inline message). No lockout, no attempt limit.
    pub fn submit(&mut self, input: &str) -> bool {
        if input == self.expected {
            self.unlocked = true;
        }
        self.unlocked
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_unlocks() {
        let mut gate = PasswordGate::new("muppet".into());
        assert!(!gate.is_unlocked());
        assert!(gate.submit("muppet"));
        assert!(gate.is_unlocked());
    }

    #[test]
    fn wrong_password_stays_locked() {
        let mut gate = PasswordGate::new("muppet".into());
        assert!(!gate.submit("Muppet"));
        assert!(!gate.submit(""));
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn unlock_persists_for_the_session() {
        let mut gate = PasswordGate::new("muppet".into());
        gate.submit("muppet");
        // Later wrong input does not re-lock.
        assert!(gate.submit("nope"));
        assert!(gate.is_unlocked());
    }
}
