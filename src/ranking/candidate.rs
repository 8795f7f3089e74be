use std::borrow::Cow;

/// A record that can be ranked against a free-text query.
///
/// The record itself is what the ranker returns, untouched.
pub trait Candidate: Send + Sync {
    fn candidate_id(&self) -> &str;

    /// Text fields in the fixed order they are concatenated.
    fn text_fields(&self) -> Vec<Cow<'_, str>>;

    /// Fields joined by a single space. This is the text that gets embedded.
    fn composite_text(&self) -> String {
        self.text_fields().join(" ")
    }
}
