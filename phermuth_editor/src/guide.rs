//! The guide under edit: an ordered list of quest steps plus its metadata.
//!
//! Step identity is positional. Indices shift on insert/remove, so callers
//! must not hold an index across a structural mutation.

use log::info;
use phermuth_data::{GuideDoc, GuideMeta, Step, ValidationError, validate_step};
use thiserror::Error;

/// Errors from guide mutations that fail loudly.
///
/// Out-of-range `remove_step`/`move_step` are soft no-ops instead (the prompt
/// layer pre-validates selections); only `update_step` reports a bad index.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuideError {
    #[error("required field '{field}' is empty")]
    EmptyField { field: &'static str },
    #[error("step index {index} out of range (guide has {len} steps)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Direction for a single-slot step move.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveDir {
    Up,
    Down,
}

impl MoveDir {
    fn offset(self) -> isize {
        match self {
            MoveDir::Up => -1,
            MoveDir::Down => 1,
        }
    }
}

/// A full guide: ordered quest steps plus zone/level/faction metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guide {
    meta: GuideMeta,
    steps: Vec<Step>,
}

impl Guide {
    /// Create a new, empty guide with default metadata.
    pub fn new() -> Self {
        let guide = Self::default();
        info!("new, empty guide created");
        guide
    }

    /// Append a step to the end of the guide.
    ///
    /// # Errors
    /// Rejects the step without mutating the guide when `action` or
    /// `quest_name` is empty.
    pub fn add_step(&mut self, step: Step) -> Result<(), GuideError> {
        Self::check_required(&step)?;
        self.steps.push(step);
        Ok(())
    }

    /// Replace the step at `index` in place, preserving its position.
    ///
    /// # Errors
    /// Fails when `index` is out of range or the replacement is missing a
    /// required field; the guide is unchanged on failure.
    pub fn update_step(&mut self, index: usize, step: Step) -> Result<(), GuideError> {
        if index >= self.steps.len() {
            return Err(GuideError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        Self::check_required(&step)?;
        self.steps[index] = step;
        Ok(())
    }

    /// Delete the step at `index`, shifting later steps down by one.
    /// Returns `false` (and changes nothing) when `index` is out of range.
    pub fn remove_step(&mut self, index: usize) -> bool {
        if index >= self.steps.len() {
            return false;
        }
        self.steps.remove(index);
        true
    }

    /// Swap the step at `index` with its neighbor in `dir`.
    ///
    /// Returns the step's new index, or `None` when the guide is empty or the
    /// swap would run off either end. Moving further than one slot takes
    /// repeated calls.
    pub fn move_step(&mut self, index: usize, dir: MoveDir) -> Option<usize> {
        if self.steps.is_empty() || index >= self.steps.len() {
            return None;
        }
        let target = index.checked_add_signed(dir.offset())?;
        if target >= self.steps.len() {
            return None;
        }
        self.steps.swap(index, target);
        Some(target)
    }

    /// The step at `index`, if any.
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// All steps in guide order. Read-only view; mutation goes through the
    /// methods above.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Drop every step. Metadata is left alone; `set_metadata` resets that.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn metadata(&self) -> &GuideMeta {
        &self.meta
    }

    pub fn set_metadata(&mut self, meta: GuideMeta) {
        self.meta = meta;
    }

    /// Display name of the guide ("Zone (range)" or "Custom Guide").
    pub fn guide_name(&self) -> String {
        self.meta.guide_name()
    }

    /// Label of the follow-up guide, or the literal "nil".
    pub fn next_zone_name(&self) -> String {
        self.meta.next_zone_label()
    }

    /// Snapshot the guide as a persistable document (without quest history).
    pub fn to_document(&self) -> GuideDoc {
        GuideDoc {
            metadata: self.meta.clone(),
            steps: self.steps.clone(),
            ..GuideDoc::default()
        }
    }

    /// Replace guide contents from a loaded document. The document's quest
    /// history and timestamp are the caller's concern.
    pub fn load_document(&mut self, doc: GuideDoc) {
        self.meta = doc.metadata;
        self.steps = doc.steps;
        info!("guide loaded: '{}' with {} steps", self.guide_name(), self.steps.len());
    }

    fn check_required(step: &Step) -> Result<(), GuideError> {
        match validate_step(step).into_iter().next() {
            Some(ValidationError::EmptyField { field }) => Err(GuideError::EmptyField { field }),
            None => Ok(()),
        }
    }
}
