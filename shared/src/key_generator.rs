use std::marker::PhantomData;

/// A key that is a thin wrapper over a `u64`
pub trait KeyId: Copy {
    fn to_u64(&self) -> u64;
    fn from_u64(value: u64) -> Self;
}

/// Hands out monotonically increasing keys. Keys are never recycled within a
/// session, so a stale key held by a late message can never alias a newer
/// entity.
pub struct KeyGenerator<K: KeyId> {
    next: u64,
    phantom_k: PhantomData<K>,
}

impl<K: KeyId> KeyGenerator<K> {
    pub fn new() -> Self {
        Self {
            next: 0,
            phantom_k: PhantomData,
        }
    }

    pub fn generate(&mut self) -> K {
        let key = K::from_u64(self.next);
        self.next = self.next.wrapping_add(1);
        key
    }
}

impl<K: KeyId> Default for KeyGenerator<K> {
    fn default() -> Self {
        Self::new()
    }
}
