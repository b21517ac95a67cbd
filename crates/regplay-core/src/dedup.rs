/// Remembers the last value admitted for a run and rejects an identical
/// successor, so redundant emission paths never issue the same request twice
/// in a row.
#[derive(Debug, Default)]
pub struct RunGuard<K> {
    last: Option<K>,
}

impl<K: PartialEq + Clone> RunGuard<K> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// `true` (and remember `key`) when it differs from the last admitted key.
    pub fn admit(&mut self, key: &K) -> bool {
        if self.last.as_ref() == Some(key) {
            return false;
        }
        self.last = Some(key.clone());
        true
    }

    pub fn last(&self) -> Option<&K> {
        self.last.as_ref()
    }
}
