use smallvec::SmallVec;

/// Per-object state for [`JsonReader::select_name()`](crate::JsonReader::select_name).
///
/// Each open object owns one "expectation pointer": the candidate index the
/// next member name is expected to match. Responses almost always list
/// members in selection order, so checking that one candidate first makes
/// the common case O(1). On a miss, the candidates are scanned circularly
/// starting at the pointer. Either way the pointer moves to just past the
/// matched candidate.
#[derive(Debug, Default)]
pub(crate) struct NameSelector {
    expected: SmallVec<[usize; 32]>,
}
impl NameSelector {
    /// Looks `name` up among `candidates`. Must only be called while at least
    /// one object is open and with a non-empty candidate list.
    pub(crate) fn find<S: AsRef<str>>(&mut self, candidates: &[S], name: &str) -> Option<usize> {
        let len = candidates.len();
        let expected = self.expected.last_mut()?;
        let start = *expected % len;
        for offset in 0..len {
            let index = (start + offset) % len;
            if candidates[index].as_ref() == name {
                *expected = (index + 1) % len;
                return Some(index);
            }
        }
        None
    }

    pub(crate) fn pop_object(&mut self) {
        self.expected.pop();
    }

    pub(crate) fn push_object(&mut self) {
        self.expected.push(0);
    }
}
