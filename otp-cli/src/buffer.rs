//! The six-slot code entry.

/// Number of slots, one per code digit.
pub const SLOT_COUNT: usize = 6;

/// Six single-character slots plus the index of the focused slot.
///
/// Slots are never validated on entry; the controller checks them on submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBuffer {
    slots: [Option<char>; SLOT_COUNT],
    focus: usize,
}

impl CodeBuffer {
    /// An empty buffer focused on the first slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of slot `index` with `value`.
    ///
    /// Values longer than one character are rejected and leave the slot as it
    /// was. A non-empty value moves the focus to the next slot, unless `index`
    /// is the last one. Returns whether the value was accepted.
    pub fn enter(&mut self, index: usize, value: &str) -> bool {
        if index >= SLOT_COUNT {
            return false;
        }

        let mut chars = value.chars();
        let first = chars.next();
        if chars.next().is_some() {
            return false;
        }

        self.slots[index] = first;
        self.focus = match first {
            Some(_) if index < SLOT_COUNT - 1 => index + 1,
            _ => index,
        };

        true
    }

    /// Spread a pasted code over all slots.
    ///
    /// Only the first slot accepts pastes and only text of exactly six
    /// decimal digits is taken; anything else leaves the buffer untouched.
    pub fn paste(&mut self, index: usize, text: &str) -> bool {
        if index != 0 || text.len() != SLOT_COUNT || !text.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }

        for (slot, digit) in self.slots.iter_mut().zip(text.chars()) {
            *slot = Some(digit);
        }
        self.focus = SLOT_COUNT - 1;

        true
    }

    /// The slots concatenated in order. Empty slots contribute nothing.
    pub fn candidate(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    /// Whether every slot holds exactly one decimal digit.
    pub fn is_all_digits(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.map_or(false, |c| c.is_ascii_digit()))
    }

    /// Empty all slots and focus the first one.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The character in slot `index`, if any.
    pub fn slot(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    /// Index of the focused slot.
    pub fn focus(&self) -> usize {
        self.focus
    }
}

impl std::fmt::Display for CodeBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for slot in self.slots {
            write!(f, "[{}]", slot.unwrap_or(' '))?;
        }
        Ok(())
    }
}
