//! Stored pattern management and the pixel editor.

use heapless::Vec;

use crate::color::Rgb;
use crate::frame_scheduler::FrameScheduler;
use crate::pattern::{
    MAX_PATTERNS, PatternIdList, PatternName, StoredPattern, load_pattern, load_pattern_ids,
    save_pattern, save_pattern_ids, truncated_name,
};
use crate::store::{ConfigStore, StoreError, StoreKey};
use crate::strategy::{EditPreview, StrategySlot};

struct EditSession<const N: usize> {
    id: u16,
    pattern: StoredPattern<N>,
}

/// Patterns in the configuration store, plus at most one edit session.
///
/// While editing, every pixel change hands a fresh preview of the edited
/// pattern to the scheduler.
pub struct PatternLibrary<'a, const N: usize> {
    store: &'a dyn ConfigStore,
    scheduler: &'a FrameScheduler<'a, N>,
    editing: Option<EditSession<N>>,
}

impl<'a, const N: usize> PatternLibrary<'a, N> {
    pub fn new(store: &'a dyn ConfigStore, scheduler: &'a FrameScheduler<'a, N>) -> Self {
        Self {
            store,
            scheduler,
            editing: None,
        }
    }

    /// Ids of stored patterns, in creation order.
    pub fn pattern_ids(&self) -> PatternIdList {
        load_pattern_ids(self.store).unwrap_or_default()
    }

    /// Create an empty, black pattern and return its id.
    pub fn add_pattern(&mut self, name: &str) -> Option<u16> {
        let mut ids = self.pattern_ids();
        let id = match ids.iter().max() {
            Some(max) => max.checked_add(1)?,
            None => 0,
        };
        if ids.push(id).is_err() {
            log::debug!("patterns: library full ({MAX_PATTERNS})");
            return None;
        }

        let pattern = StoredPattern::<N>::blank(name);
        if let Err(err) = save_pattern(self.store, id, &pattern) {
            log::warn!("patterns: failed to store pattern {id}: {err}");
            return None;
        }
        if let Err(err) = save_pattern_ids(self.store, &ids) {
            log::warn!("patterns: failed to store pattern list: {err}");
            self.store.remove(StoreKey::Pattern(id));
            return None;
        }
        log::info!("patterns: added pattern {id}");
        Some(id)
    }

    pub fn get_pattern(&self, id: u16) -> Option<StoredPattern<N>> {
        load_pattern(self.store, id)
    }

    /// `(id, name)` of every stored pattern that can be read.
    pub fn list_patterns(&self) -> Vec<(u16, PatternName), MAX_PATTERNS> {
        self.pattern_ids()
            .into_iter()
            .filter_map(|id| self.get_pattern(id).map(|pattern| (id, pattern.name)))
            .collect()
    }

    pub fn delete_pattern(&mut self, id: u16) -> Result<bool, StoreError> {
        let mut ids = self.pattern_ids();
        let Some(index) = ids.iter().position(|stored| *stored == id) else {
            return Ok(false);
        };
        ids.remove(index);
        save_pattern_ids(self.store, &ids)?;
        self.store.remove(StoreKey::Pattern(id));
        if self.editing_id() == Some(id) {
            self.editing = None;
        }
        Ok(true)
    }

    pub fn editing_id(&self) -> Option<u16> {
        self.editing.as_ref().map(|session| session.id)
    }

    /// Start editing pattern `id` and preview it.
    pub fn begin_edit(&mut self, id: u16) -> bool {
        if self.editing_id() == Some(id) {
            return true;
        }
        let Some(pattern) = self.get_pattern(id) else {
            log::debug!("patterns: no pattern {id} to edit");
            return false;
        };
        self.editing = Some(EditSession { id, pattern });
        self.preview();
        true
    }

    pub fn set_pixel(&mut self, index: usize, color: Rgb) -> bool {
        let Some(session) = self.editing.as_mut() else {
            log::debug!("patterns: set_pixel outside an edit session");
            return false;
        };
        let Some(pixel) = session.pattern.pixels.get_mut(index) else {
            log::debug!("patterns: pixel {index} out of range");
            return false;
        };
        *pixel = color;
        self.preview();
        true
    }

    /// Finish the edit session on `id` and store the result.
    pub fn end_edit(
        &mut self,
        id: u16,
        name: &str,
        next_frame_id: i32,
        frame_time: i32,
        transition_time: i32,
    ) -> bool {
        if self.editing_id() != Some(id) {
            log::debug!("patterns: pattern {id} is not being edited");
            return false;
        }
        let Some(EditSession { mut pattern, .. }) = self.editing.take() else {
            return false;
        };
        pattern.name = truncated_name(name);
        pattern.next_pattern_id = next_frame_id;
        pattern.frame_time = frame_time;
        pattern.transition_time = transition_time;

        match save_pattern(self.store, id, &pattern) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("patterns: failed to store pattern {id}: {err}");
                false
            }
        }
    }

    fn preview(&self) {
        if let Some(session) = &self.editing {
            let preview = EditPreview::new(session.pattern.pixels);
            self.scheduler
                .request_strategy(StrategySlot::EditPreview(preview));
        }
    }
}
