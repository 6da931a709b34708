//! Sorted replacement store with an augmented implicit interval tree.

use super::gap::OffsetGap;
use super::tree;
use crate::constants::MIN_GAP_GROW;
use crate::editing::TextEdit;
use crate::error::SpanError;
use crate::text::TextRange;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

static NEXT_REPLACEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Replacement`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplacementId(u64);

impl ReplacementId {
    /// Allocate a fresh identity.
    pub fn next() -> Self {
        Self(NEXT_REPLACEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// # Returns
    /// The raw identity value, unique for the life of the process.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReplacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tracked span of text plus whatever the caller renders in its place.
///
/// Identity comes from [`Replacement::id`], not from the range or payload:
/// clones and [`Replacement::with_range`] keep it, so passing an updated copy
/// to [`ReplacementManager::set_span`] moves the existing span.
#[derive(Clone, Debug, PartialEq)]
pub struct Replacement<P> {
    id: ReplacementId,
    /// Range as supplied by the caller. The manager tracks the live range.
    pub range: TextRange,
    pub payload: P,
}

impl<P> Replacement<P> {
    /// Create a replacement with a fresh identity.
    ///
    /// # Arguments
    /// - `range`: Text the replacement covers; validated when it is stored.
    /// - `payload`: Whatever the caller renders in place of that text.
    pub fn new(range: TextRange, payload: P) -> Self {
        Self {
            id: ReplacementId::next(),
            range,
            payload,
        }
    }

    /// # Returns
    /// The identity shared by every copy of this replacement.
    pub fn id(&self) -> ReplacementId {
        self.id
    }

    /// Same identity, new range.
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }
}

/// Borrowed view of a stored replacement with its live range.
#[derive(Debug, PartialEq)]
pub struct SpanRef<'a, P> {
    pub id: ReplacementId,
    pub range: TextRange,
    pub payload: &'a P,
}

impl<P> Clone for SpanRef<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for SpanRef<'_, P> {}

/// What [`ReplacementManager::set_span`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanChange {
    Inserted { index: usize },
    Updated { from: usize, to: usize },
}

/// Keeps replacements sorted by start with a max-end interval tree on top.
///
/// Element `i` of the parallel arrays is node `i` of the implicit tree in
/// [`tree`]. `subtree_max_end[n]` caches the largest end below node `n`
/// (0 for subtrees holding no element). Offsets are stored in the internal
/// space of [`OffsetGap`] so text edits at one site stay cheap.
#[derive(Debug)]
pub struct ReplacementManager<P> {
    replacements: Vec<Replacement<P>>,
    starts: Vec<usize>,
    ends: Vec<usize>,
    insertion_order: Vec<u64>,
    subtree_max_end: Vec<usize>,
    index_of: HashMap<ReplacementId, usize>,
    /// Indices at or above this may be stale in `index_of`.
    dirty_floor: usize,
    gap: OffsetGap,
    next_order: u64,
}

impl<P> Default for ReplacementManager<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ReplacementManager<P> {
    /// # Returns
    /// An empty manager with no gap.
    pub fn new() -> Self {
        Self {
            replacements: Vec::new(),
            starts: Vec::new(),
            ends: Vec::new(),
            insertion_order: Vec::new(),
            subtree_max_end: Vec::new(),
            index_of: HashMap::new(),
            dirty_floor: 0,
            gap: OffsetGap::default(),
            next_order: 0,
        }
    }

    /// # Returns
    /// Number of tracked replacements.
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    /// # Returns
    /// `true` when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Current virtual gap (external start, internal width).
    pub fn gap(&self) -> OffsetGap {
        self.gap
    }

    /// Insert a replacement, or move it if its identity is already tracked.
    ///
    /// # Arguments
    /// - `replacement`: New or updated replacement; its range is in current
    ///   text offsets.
    ///
    /// # Returns
    /// Where the replacement landed in start order.
    ///
    /// # Errors
    /// Returns [`SpanError::InvalidRange`] when `start > end`; the manager is
    /// left untouched.
    pub fn set_span(&mut self, replacement: Replacement<P>) -> Result<SpanChange, SpanError> {
        let change = self.stage(replacement)?;
        self.restore_invariants();
        Ok(change)
    }

    /// Stage several replacements and restore the tree once.
    ///
    /// # Returns
    /// Number of replacements applied.
    ///
    /// # Errors
    /// Stops at the first invalid range. Replacements staged before it stay
    /// applied and the tree is consistent either way.
    pub fn set_spans<I>(&mut self, replacements: I) -> Result<usize, SpanError>
    where
        I: IntoIterator<Item = Replacement<P>>,
    {
        let mut applied = 0;
        for replacement in replacements {
            if let Err(err) = self.stage(replacement) {
                self.restore_invariants();
                return Err(err);
            }
            applied += 1;
        }
        self.restore_invariants();
        debug!(applied, total = self.len(), "batched span update");
        Ok(applied)
    }

    /// Stop tracking a replacement and hand it back with its live range.
    ///
    /// # Arguments
    /// - `id`: Identity of the replacement to drop.
    ///
    /// # Returns
    /// The replacement, its `range` updated to the live range.
    ///
    /// # Errors
    /// Returns [`SpanError::UnknownReplacement`] when `id` is not tracked.
    pub fn remove_span(&mut self, id: ReplacementId) -> Result<Replacement<P>, SpanError> {
        let index = self.locate(id).ok_or(SpanError::UnknownReplacement(id))?;
        let range = self.external_range(index);
        let mut removed = self.replacements.remove(index);
        self.starts.remove(index);
        self.ends.remove(index);
        self.insertion_order.remove(index);
        self.index_of.remove(&id);
        self.mark_dirty(index);
        self.restore_invariants();
        removed.range = range;
        debug!(%id, index, "removed span");
        Ok(removed)
    }

    /// Look up a tracked replacement.
    ///
    /// # Arguments
    /// - `id`: Identity to look up.
    ///
    /// # Returns
    /// The replacement with its live range, or `None` when untracked.
    pub fn get(&self, id: ReplacementId) -> Option<SpanRef<'_, P>> {
        self.locate(id).map(|index| self.span_ref(index))
    }

    /// # Returns
    /// The live range of `id` in current text offsets, or `None` when untracked.
    pub fn range_of(&self, id: ReplacementId) -> Option<TextRange> {
        self.locate(id).map(|index| self.external_range(index))
    }

    /// All spans in start order.
    pub fn iter(&self) -> impl Iterator<Item = SpanRef<'_, P>> + '_ {
        (0..self.len()).map(move |index| self.span_ref(index))
    }

    /// Spans whose range overlaps `query` (half-open), in start order.
    ///
    /// # Arguments
    /// - `query`: Range in current text offsets.
    ///
    /// # Returns
    /// Every span with `start < query.end` and `end > query.start`.
    pub fn overlapping(&self, query: TextRange) -> Vec<SpanRef<'_, P>> {
        let mut found = Vec::new();
        if let Some(root) = tree::root(self.len()) {
            self.collect_overlapping(root, query, &mut found);
        }
        found
    }

    /// Record `len` bytes inserted at external offset `at`.
    ///
    /// Spans starting or ending exactly at `at` shift past the new text.
    ///
    /// # Arguments
    /// - `at`: Offset in the text before the insertion.
    /// - `len`: Bytes inserted; 0 is a no-op.
    // TODO: let collapsed point spans choose upstream affinity so a caret
    // anchor at `at` can stay before typed text.
    pub fn insert_text(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        self.move_gap(at);
        if self.gap.len < len {
            self.grow_gap(len - self.gap.len);
        }
        self.gap.start += len;
        self.gap.len -= len;
        trace!(at, len, gap = ?self.gap, "insert");
    }

    /// Record the bytes in `range` as deleted.
    ///
    /// Offsets inside the range collapse onto `range.start`. Spans that fall
    /// entirely inside it survive as empty spans.
    ///
    /// # Arguments
    /// - `range`: Deleted bytes in the text before the deletion.
    pub fn delete_text(&mut self, range: TextRange) {
        if range.is_empty() {
            return;
        }
        self.move_gap(range.start);
        self.gap.len += range.len();
        let swallowed = self.gap.start..self.gap.end();
        let canonical = self.gap.end();
        for offset in self.starts.iter_mut().chain(self.ends.iter_mut()) {
            if swallowed.contains(&*offset) {
                *offset = canonical;
            }
        }
        // Collapsed starts may now tie out of insertion order.
        let first = self.starts.partition_point(|&start| start < canonical);
        let last = self.starts.partition_point(|&start| start <= canonical);
        for index in first..last {
            self.sift_left(index);
        }
        self.mark_dirty(first);
        self.restore_invariants();
        trace!(?range, gap = ?self.gap, "delete");
    }

    /// Apply a replace edit: delete `edit.range`, then insert at its start.
    pub fn apply_edit(&mut self, edit: &TextEdit) {
        self.delete_text(edit.range);
        self.insert_text(edit.range.start, edit.inserted_len);
    }

    /// Validate every structural invariant, naming the first one broken.
    ///
    /// # Errors
    /// Returns a description of the first broken invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        let count = self.len();
        if [self.starts.len(), self.ends.len(), self.insertion_order.len()]
            .iter()
            .any(|&len| len != count)
        {
            return Err("parallel arrays differ in length".to_string());
        }
        if self.subtree_max_end.len() != tree::capacity(count) {
            return Err(format!(
                "tree holds {} slots, expected {}",
                self.subtree_max_end.len(),
                tree::capacity(count)
            ));
        }
        for index in 1..count {
            if self.starts[index - 1] > self.starts[index] {
                return Err(format!("starts out of order at {}", index));
            }
        }
        for index in 0..count {
            if self.starts[index] > self.ends[index] {
                return Err(format!("span {} ends before it starts", index));
            }
            let id = self.replacements[index].id;
            if self.index_of.get(&id) != Some(&index) {
                return Err(format!("index for {} is stale", id));
            }
            let inside = self.gap.start..self.gap.end();
            if inside.contains(&self.starts[index]) || inside.contains(&self.ends[index]) {
                return Err(format!("span {} is stored inside the gap", index));
            }
        }
        if self.index_of.len() != count {
            return Err("index holds removed replacements".to_string());
        }
        if let Some(root) = tree::root(count) {
            self.check_subtree(root)?;
        }
        Ok(())
    }

    fn check_subtree(&self, node: usize) -> Result<usize, String> {
        let mut max = self.ends.get(node).copied().unwrap_or(0);
        for child in [tree::left_child(node), tree::right_child(node)]
            .into_iter()
            .flatten()
        {
            max = max.max(self.check_subtree(child)?);
        }
        if self.subtree_max_end[node] != max {
            return Err(format!(
                "node {} caches max end {}, expected {}",
                node, self.subtree_max_end[node], max
            ));
        }
        Ok(max)
    }

    fn stage(&mut self, replacement: Replacement<P>) -> Result<SpanChange, SpanError> {
        let TextRange { start, end } = replacement.range;
        if start > end {
            return Err(SpanError::InvalidRange { start, end });
        }
        let start = self.gap.to_internal(start);
        let end = self.gap.to_internal(end);
        let id = replacement.id;
        match self.locate(id) {
            Some(from) => {
                self.replacements[from] = replacement;
                self.starts[from] = start;
                self.ends[from] = end;
                let to = self.resort(from);
                self.mark_dirty(from.min(to));
                trace!(%id, from, to, "updated span");
                Ok(SpanChange::Updated { from, to })
            }
            None => {
                self.replacements.push(replacement);
                self.starts.push(start);
                self.ends.push(end);
                self.insertion_order.push(self.next_order);
                self.next_order += 1;
                let index = self.resort(self.len() - 1);
                self.mark_dirty(index);
                trace!(%id, index, "inserted span");
                Ok(SpanChange::Inserted { index })
            }
        }
    }

    /// Find the current index of `id`.
    ///
    /// Entries below `dirty_floor` are trusted; anything else is verified and
    /// falls back to scanning the dirty tail.
    fn locate(&self, id: ReplacementId) -> Option<usize> {
        if let Some(&index) = self.index_of.get(&id) {
            if index < self.dirty_floor {
                return Some(index);
            }
            if self.replacements.get(index).map(Replacement::id) == Some(id) {
                return Some(index);
            }
        }
        let floor = self.dirty_floor.min(self.len());
        self.replacements[floor..]
            .iter()
            .position(|replacement| replacement.id == id)
            .map(|offset| floor + offset)
    }

    fn mark_dirty(&mut self, index: usize) {
        self.dirty_floor = self.dirty_floor.min(index);
    }

    /// Refresh stale index entries and the subtree maxima. Every mutating
    /// method already ends with this; calling it again is a no-op.
    pub fn restore_invariants(&mut self) {
        for (index, replacement) in self.replacements.iter().enumerate().skip(self.dirty_floor) {
            self.index_of.insert(replacement.id, index);
        }
        self.dirty_floor = self.len();
        self.rebuild_maxima();
    }

    fn rebuild_maxima(&mut self) {
        let count = self.len();
        self.subtree_max_end.clear();
        self.subtree_max_end.resize(tree::capacity(count), 0);
        if let Some(root) = tree::root(count) {
            self.compute_max(root);
        }
    }

    fn compute_max(&mut self, node: usize) -> usize {
        let mut max = self.ends.get(node).copied().unwrap_or(0);
        if let Some(left) = tree::left_child(node) {
            max = max.max(self.compute_max(left));
        }
        if let Some(right) = tree::right_child(node) {
            max = max.max(self.compute_max(right));
        }
        self.subtree_max_end[node] = max;
        max
    }

    fn collect_overlapping<'a>(
        &'a self,
        node: usize,
        query: TextRange,
        found: &mut Vec<SpanRef<'a, P>>,
    ) {
        if self.gap.to_external(self.subtree_max_end[node]) <= query.start {
            return;
        }
        if let Some(left) = tree::left_child(node) {
            self.collect_overlapping(left, query, found);
        }
        if node < self.len() {
            let range = self.external_range(node);
            if range.start >= query.end {
                return;
            }
            if range.end > query.start {
                found.push(self.span_ref(node));
            }
        }
        if let Some(right) = tree::right_child(node) {
            self.collect_overlapping(right, query, found);
        }
    }

    fn key(&self, index: usize) -> (usize, u64) {
        (self.starts[index], self.insertion_order[index])
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.replacements.swap(a, b);
        self.starts.swap(a, b);
        self.ends.swap(a, b);
        self.insertion_order.swap(a, b);
    }

    fn sift_left(&mut self, mut index: usize) -> usize {
        while index > 0 && self.key(index - 1) > self.key(index) {
            self.swap(index - 1, index);
            index -= 1;
        }
        index
    }

    /// Move the entry at `index` to its sorted position and return it.
    fn resort(&mut self, index: usize) -> usize {
        let mut index = self.sift_left(index);
        while index + 1 < self.len() && self.key(index + 1) < self.key(index) {
            self.swap(index, index + 1);
            index += 1;
        }
        index
    }

    fn move_gap(&mut self, at: usize) {
        if at == self.gap.start {
            return;
        }
        let moved = self.gap.moved_to(at);
        let gap = self.gap;
        for offset in self.starts.iter_mut().chain(self.ends.iter_mut()) {
            *offset = gap.reencode(&moved, *offset);
        }
        self.gap = moved;
        self.rebuild_maxima();
        trace!(from = gap.start, to = at, "moved gap");
    }

    fn grow_gap(&mut self, needed: usize) {
        let grow = needed.max(MIN_GAP_GROW);
        let end = self.gap.end();
        for offset in self.starts.iter_mut().chain(self.ends.iter_mut()) {
            if *offset >= end {
                *offset += grow;
            }
        }
        self.gap.len += grow;
        self.rebuild_maxima();
        debug!(grow, gap = ?self.gap, "grew gap");
    }

    fn external_range(&self, index: usize) -> TextRange {
        TextRange {
            start: self.gap.to_external(self.starts[index]),
            end: self.gap.to_external(self.ends[index]),
        }
    }

    fn span_ref(&self, index: usize) -> SpanRef<'_, P> {
        let replacement = &self.replacements[index];
        SpanRef {
            id: replacement.id,
            range: self.external_range(index),
            payload: &replacement.payload,
        }
    }
}
