use crate::Sequence;

/// Returns whether or not a wrapping number is greater than another
/// sequence_greater_than(2,1) will return true
/// sequence_greater_than(1,2) will return false
/// sequence_greater_than(1,1) will return false
pub fn sequence_greater_than(s1: Sequence, s2: Sequence) -> bool {
    ((s1 > s2) && (s1 - s2 <= 32768)) || ((s1 < s2) && (s2 - s1 > 32768))
}

/// The sequence that follows `current`, wrapping at `u16::MAX`
pub fn next_sequence(current: Sequence) -> Sequence {
    current.wrapping_add(1)
}
