use std::collections::VecDeque;

use log::{debug, warn};

use crate::error::{ExprError, WatchError};
use crate::eval::evaluate_expression;

/// Stable identifier of a watchpoint slot, assigned at pool construction
/// and kept across free/active cycles.
pub type WatchId = usize;

pub const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
struct Watch {
    expr: String,
    value: u32,
    changed: bool,
}

/// Fixed pool of watchpoint slots. Every id is either in the free queue
/// or on the active list at all times, never both.
#[derive(Debug, Clone)]
pub struct Watchpoints {
    slots: Vec<Option<Watch>>,
    free: VecDeque<WatchId>,
    /// Active ids in creation order.
    active: Vec<WatchId>,
}

/// One active entry, as enumerated by [`Watchpoints::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry<'a> {
    pub id: WatchId,
    pub expr: &'a str,
    pub value: u32,
    /// Whether the most recent check saw the value move.
    pub changed: bool,
}

/// A value change detected by a check pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchChange {
    pub id: WatchId,
    pub old: u32,
    pub new: u32,
}

/// Outcome of one pass over all active watchpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub changed: Vec<WatchChange>,
    pub failures: Vec<(WatchId, ExprError)>,
}

impl CheckReport {
    pub fn any_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}

impl Watchpoints {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            free: (0..capacity).collect(),
            active: Vec::new(),
        }
    }

    /// Takes the next free slot for `expr`, evaluating it once to seed the
    /// baseline value. A bad expression leaves the pool untouched.
    pub fn create(&mut self, expr: &str) -> Result<WatchId, WatchError> {
        if self.free.is_empty() {
            return Err(WatchError::PoolExhausted);
        }

        let value = evaluate_expression(expr)?;
        let id = self.free.pop_front().ok_or(WatchError::PoolExhausted)?;
        self.slots[id] = Some(Watch {
            expr: expr.to_string(),
            value,
            changed: false,
        });
        self.active.push(id);

        debug!("watchpoint {} set on \"{}\", value {}", id, expr, value);
        Ok(id)
    }

    /// Retires an active watchpoint and returns its slot to the back of
    /// the free queue.
    pub fn delete(&mut self, id: WatchId) -> Result<(), WatchError> {
        let Some(watch) = self.slots.get_mut(id).and_then(|slot| slot.take()) else {
            return Err(WatchError::NotFound { id });
        };

        self.active.retain(|&active| active != id);
        self.free.push_back(id);

        debug!("watchpoint {} on \"{}\" deleted", id, watch.expr);
        Ok(())
    }

    /// Re-evaluates every active watchpoint in creation order. A detected
    /// change advances the stored baseline, so later checks compare
    /// against the last observed value. Re-evaluation failures are
    /// reported separately and leave the baseline alone.
    pub fn check_all(&mut self) -> CheckReport {
        let mut report = CheckReport::default();

        for &id in &self.active {
            let Some(watch) = self.slots.get_mut(id).and_then(|slot| slot.as_mut()) else {
                continue;
            };
            match evaluate_expression(&watch.expr) {
                Ok(new) if new != watch.value => {
                    debug!("watchpoint {} changed: {} -> {}", id, watch.value, new);
                    report.changed.push(WatchChange {
                        id,
                        old: watch.value,
                        new,
                    });
                    watch.value = new;
                    watch.changed = true;
                }
                Ok(_) => watch.changed = false,
                Err(err) => {
                    warn!("watchpoint {} failed to re-evaluate: {}", id, err);
                    report.failures.push((id, err));
                }
            }
        }

        report
    }

    /// Active entries in creation order, unaffected by deletions of other
    /// entries.
    pub fn list(&self) -> Vec<WatchEntry<'_>> {
        self.active
            .iter()
            .filter_map(|&id| {
                let watch = self.slots.get(id)?.as_ref()?;
                Some(WatchEntry {
                    id,
                    expr: watch.expr.as_str(),
                    value: watch.value,
                    changed: watch.changed,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl Default for Watchpoints {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
impl Watchpoints {
    /// Swaps an active watchpoint's expression without touching its
    /// baseline, standing in for a machine-state change between checks.
    fn force_expr(&mut self, id: WatchId, expr: &str) {
        self.slots[id].as_mut().unwrap().expr = expr.to_string();
    }
}
