use std::collections::BTreeMap;

/// Byte-offset ranges per tag name, position-ascending and maximally merged.
pub type TagRanges = BTreeMap<String, Vec<(usize, usize)>>;

/// The open script: full text plus named style-tag ranges over it.
///
/// Ranges are half-open `(start, end)` byte offsets. The invariant the rest
/// of the app leans on: among the tags the style registry knows, at most one
/// covers any given byte, because `apply_style` strips the others first.
/// Tags loaded from a script that this session's registry does not know are
/// kept untouched so they survive a re-export.
pub struct ScriptDocument {
    text: String,
    tags: TagRanges,
    dirty: bool,
}

impl ScriptDocument {
    /// A fresh document starts with the whole text tagged as body, clean.
    pub fn new(text: &str) -> Self {
        let mut doc = Self {
            text: text.to_string(),
            tags: BTreeMap::new(),
            dirty: false,
        };
        if !text.is_empty() {
            doc.add_range("body", 0, text.len());
        }
        doc
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Full-buffer replace. Existing tag ranges are meaningless against the
    /// new text, so tagging resets to all-body.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.tags.clear();
        if !self.text.is_empty() {
            let len = self.text.len();
            self.add_range("body", 0, len);
        }
        self.dirty = true;
    }

    /// Insert `s` at a byte offset, shifting tag ranges. Text inserted
    /// strictly inside a range grows it; text at either boundary does not
    /// join the range (the host text widget's tag behavior).
    pub fn insert(&mut self, offset: usize, s: &str) {
        if s.is_empty() {
            return;
        }
        let offset = offset.min(self.text.len());
        self.text.insert_str(offset, s);
        let n = s.len();
        for ranges in self.tags.values_mut() {
            for range in ranges.iter_mut() {
                if offset <= range.0 {
                    range.0 += n;
                    range.1 += n;
                } else if offset < range.1 {
                    range.1 += n;
                }
            }
        }
        self.dirty = true;
    }

    /// Delete `[from, to)`, shifting and clipping tag ranges. Ranges that
    /// collapse to nothing disappear.
    pub fn delete(&mut self, from: usize, to: usize) {
        let from = from.min(self.text.len());
        let to = to.min(self.text.len());
        if from >= to {
            return;
        }
        self.text.replace_range(from..to, "");
        let n = to - from;
        let shift = |p: usize| {
            if p <= from {
                p
            } else if p >= to {
                p - n
            } else {
                from
            }
        };
        for ranges in self.tags.values_mut() {
            ranges.retain_mut(|range| {
                range.0 = shift(range.0);
                range.1 = shift(range.1);
                range.0 < range.1
            });
        }
        self.tags.retain(|_, ranges| !ranges.is_empty());
        self.dirty = true;
    }

    /// Tag the selection `[start, end)` with `tag`, first removing every
    /// tag in `known_tags` from that span so exactly one known tag governs
    /// it afterward. Returns false (and changes nothing) when the selection
    /// is empty.
    pub fn apply_style(
        &mut self,
        start: usize,
        end: usize,
        tag: &str,
        known_tags: &[String],
    ) -> bool {
        let start = start.min(self.text.len());
        let end = end.min(self.text.len());
        if start >= end {
            return false;
        }
        for known in known_tags {
            self.remove_range(known, start, end);
        }
        self.add_range(tag, start, end);
        self.dirty = true;
        true
    }

    /// The known tag covering `offset`, if any. With the mutual-exclusion
    /// invariant held there is at most one.
    pub fn tag_at(&self, offset: usize) -> Option<&str> {
        self.tags.iter().find_map(|(tag, ranges)| {
            ranges
                .iter()
                .any(|&(s, e)| s <= offset && offset < e)
                .then_some(tag.as_str())
        })
    }

    /// Every tag with at least one non-empty range, ranges ascending.
    /// This is the serialization view of the document.
    pub fn tag_ranges(&self) -> TagRanges {
        self.tags.clone()
    }

    /// Replace the whole document from a decoded script: new text, exactly
    /// the given ranges (clipped to the text, empty ones dropped), clean
    /// dirty flag. The only operation besides a successful save that resets
    /// dirty to false.
    pub fn load_from(&mut self, text: &str, ranges: &TagRanges) {
        self.text = text.to_string();
        self.tags.clear();
        for (tag, tag_ranges) in ranges {
            for &(start, end) in tag_ranges {
                let start = start.min(self.text.len());
                let end = end.min(self.text.len());
                if start < end {
                    self.add_range(tag, start, end);
                }
            }
        }
        self.dirty = false;
    }

    /// Insert `[start, end)` into `tag`'s range list, merging overlapping
    /// and adjacent ranges into maximal contiguous ones.
    fn add_range(&mut self, tag: &str, start: usize, end: usize) {
        let ranges = self.tags.entry(tag.to_string()).or_default();
        let idx = ranges.partition_point(|&(s, _)| s < start);
        ranges.insert(idx, (start, end));

        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
        for &(s, e) in ranges.iter() {
            match merged.last_mut() {
                Some(last) if s <= last.1 => last.1 = last.1.max(e),
                _ => merged.push((s, e)),
            }
        }
        *ranges = merged;
    }

    /// Subtract `[start, end)` from `tag`'s ranges, splitting any range
    /// that straddles the cut.
    fn remove_range(&mut self, tag: &str, start: usize, end: usize) {
        let Some(ranges) = self.tags.get_mut(tag) else {
            return;
        };
        let mut next: Vec<(usize, usize)> = Vec::with_capacity(ranges.len() + 1);
        for &(s, e) in ranges.iter() {
            if e <= start || s >= end {
                next.push((s, e));
                continue;
            }
            if s < start {
                next.push((s, start));
            }
            if end < e {
                next.push((end, e));
            }
        }
        if next.is_empty() {
            self.tags.remove(tag);
        } else {
            *ranges = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        vec!["body".to_string(), "style2".to_string(), "style3".to_string()]
    }

    fn ranges_of(doc: &ScriptDocument, tag: &str) -> Vec<(usize, usize)> {
        doc.tag_ranges().get(tag).cloned().unwrap_or_default()
    }

    #[test]
    fn test_new_document_is_all_body_and_clean() {
        let doc = ScriptDocument::new("Hello World");
        assert_eq!(ranges_of(&doc, "body"), vec![(0, 11)]);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_apply_style_mutual_exclusion() {
        let mut doc = ScriptDocument::new("Hello World");
        assert!(doc.apply_style(0, 5, "style2", &known()));
        // style2 fully covers the span, body is split out of it
        assert_eq!(ranges_of(&doc, "style2"), vec![(0, 5)]);
        assert_eq!(ranges_of(&doc, "body"), vec![(5, 11)]);
        for off in 0..5 {
            assert_eq!(doc.tag_at(off), Some("style2"));
        }
        for off in 5..11 {
            assert_eq!(doc.tag_at(off), Some("body"));
        }
    }

    #[test]
    fn test_apply_style_last_applied_wins() {
        let mut doc = ScriptDocument::new("Hello World");
        doc.apply_style(0, 8, "style2", &known());
        doc.apply_style(3, 11, "style3", &known());
        assert_eq!(ranges_of(&doc, "style2"), vec![(0, 3)]);
        assert_eq!(ranges_of(&doc, "style3"), vec![(3, 11)]);
        // no overlap anywhere
        assert_eq!(doc.tag_at(3), Some("style3"));
        assert_eq!(doc.tag_at(2), Some("style2"));
    }

    #[test]
    fn test_apply_style_empty_selection_is_noop() {
        let mut doc = ScriptDocument::new("Hello World");
        let before = doc.tag_ranges();
        assert!(!doc.apply_style(4, 4, "style2", &known()));
        assert_eq!(doc.tag_ranges(), before);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_apply_style_sets_dirty() {
        let mut doc = ScriptDocument::new("Hello World");
        doc.apply_style(0, 5, "style2", &known());
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_apply_merges_adjacent_same_tag() {
        let mut doc = ScriptDocument::new("Hello World");
        doc.apply_style(0, 5, "style2", &known());
        doc.apply_style(5, 11, "style2", &known());
        assert_eq!(ranges_of(&doc, "style2"), vec![(0, 11)]);
        assert!(ranges_of(&doc, "body").is_empty());
    }

    #[test]
    fn test_reapply_body_restores_baseline() {
        let mut doc = ScriptDocument::new("Hello World");
        doc.apply_style(0, 11, "style3", &known());
        doc.apply_style(0, 11, "body", &known());
        assert_eq!(ranges_of(&doc, "body"), vec![(0, 11)]);
        assert!(ranges_of(&doc, "style3").is_empty());
    }

    #[test]
    fn test_unknown_tags_survive_apply() {
        let mut doc = ScriptDocument::new("Hello World");
        let mut ranges = TagRanges::new();
        ranges.insert("style9".to_string(), vec![(0, 11)]);
        doc.load_from("Hello World", &ranges);
        doc.apply_style(0, 5, "style2", &known());
        // style9 is not in the known set, so it is left alone
        assert_eq!(ranges_of(&doc, "style9"), vec![(0, 11)]);
        assert_eq!(ranges_of(&doc, "style2"), vec![(0, 5)]);
    }

    #[test]
    fn test_load_from_round_trip() {
        let mut ranges = TagRanges::new();
        ranges.insert("body".to_string(), vec![(6, 11)]);
        ranges.insert("style2".to_string(), vec![(0, 5)]);

        let mut doc = ScriptDocument::new("");
        doc.load_from("Hello World", &ranges);
        assert_eq!(doc.text(), "Hello World");
        assert_eq!(doc.tag_ranges(), ranges);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_load_from_merges_adjacent_input() {
        let mut ranges = TagRanges::new();
        ranges.insert("style2".to_string(), vec![(0, 3), (3, 5), (4, 8)]);
        let mut doc = ScriptDocument::new("");
        doc.load_from("Hello World", &ranges);
        assert_eq!(ranges_of(&doc, "style2"), vec![(0, 8)]);
    }

    #[test]
    fn test_load_from_clips_and_drops_invalid() {
        let mut ranges = TagRanges::new();
        ranges.insert("style2".to_string(), vec![(0, 99), (50, 60)]);
        let mut doc = ScriptDocument::new("");
        doc.load_from("short", &ranges);
        assert_eq!(ranges_of(&doc, "style2"), vec![(0, 5)]);
    }

    #[test]
    fn test_dirty_lifecycle() {
        let mut doc = ScriptDocument::new("");
        doc.load_from("Hello World", &TagRanges::new());
        assert!(!doc.is_dirty());
        doc.apply_style(0, 5, "style2", &known());
        assert!(doc.is_dirty());
        doc.mark_clean(); // a successful export does this
        assert!(!doc.is_dirty());
        doc.insert(0, "x");
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_insert_shifts_ranges() {
        let mut doc = ScriptDocument::new("Hello World");
        doc.apply_style(6, 11, "style2", &known());
        // before the range: whole range shifts
        doc.insert(0, "<<");
        assert_eq!(ranges_of(&doc, "style2"), vec![(8, 13)]);
        assert_eq!(doc.text(), "<<Hello World");
        // strictly inside: range grows
        doc.insert(9, "--");
        assert_eq!(ranges_of(&doc, "style2"), vec![(8, 15)]);
        // at the start boundary: range shifts, new text untagged by it
        doc.insert(8, "!");
        assert_eq!(ranges_of(&doc, "style2"), vec![(9, 16)]);
        // at the end boundary: unchanged
        doc.insert(16, "?");
        assert_eq!(ranges_of(&doc, "style2"), vec![(9, 16)]);
    }

    #[test]
    fn test_delete_shifts_and_clips() {
        let mut doc = ScriptDocument::new("Hello World");
        doc.apply_style(6, 11, "style2", &known());
        // delete before the range
        doc.delete(0, 2);
        assert_eq!(doc.text(), "llo World");
        assert_eq!(ranges_of(&doc, "style2"), vec![(4, 9)]);
        // delete straddling the start
        doc.delete(3, 6);
        assert_eq!(doc.text(), "llorld");
        assert_eq!(ranges_of(&doc, "style2"), vec![(3, 6)]);
        // delete the rest of the range
        doc.delete(3, 6);
        assert!(ranges_of(&doc, "style2").is_empty());
    }

    #[test]
    fn test_delete_interior_shrinks_range() {
        let mut doc = ScriptDocument::new("Hello World");
        doc.apply_style(0, 11, "style3", &known());
        doc.delete(2, 5);
        assert_eq!(doc.text(), "He World");
        assert_eq!(ranges_of(&doc, "style3"), vec![(0, 8)]);
    }

    #[test]
    fn test_set_text_resets_to_body() {
        let mut doc = ScriptDocument::new("Hello World");
        doc.apply_style(0, 5, "style2", &known());
        doc.set_text("New content");
        assert_eq!(ranges_of(&doc, "body"), vec![(0, 11)]);
        assert!(ranges_of(&doc, "style2").is_empty());
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_tag_ranges_skips_tags_without_ranges() {
        let mut doc = ScriptDocument::new("Hello World");
        doc.apply_style(0, 11, "style2", &known());
        // body was fully removed; it must not appear with an empty list
        assert!(!doc.tag_ranges().contains_key("body"));
    }
}
