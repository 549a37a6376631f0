use std::collections::VecDeque;
use std::iter::FusedIterator;

use chrono::{DateTime, TimeZone, Utc};

use super::generator::BaseGenerator;
use super::options::ExpansionOptions;
use crate::rfc::rrule::core::{CivilDateTime, Rule, Termination};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Filling,
    Yielding,
    Done,
}

/// Lazy, strictly increasing stream of a rule's occurrences.
///
/// Created by [`Rule::next_entries`]. Candidates are produced batch by batch:
/// each refill runs one base batch through the rule's pipeline, then sorts,
/// deduplicates and drops anything before the start instant or not after the
/// last yielded occurrence. Without COUNT or UNTIL the stream never ends.
#[derive(Debug)]
pub struct Occurrences<'a, Tz: TimeZone> {
    rule: &'a Rule,
    start: DateTime<Tz>,
    generator: BaseGenerator<Tz>,
    buffer: VecDeque<DateTime<Tz>>,
    state: State,
    options: ExpansionOptions,
    produced: u32,
    empty_batches: u32,
    last: Option<DateTime<Tz>>,
}

impl<'a, Tz: TimeZone> Occurrences<'a, Tz> {
    pub(crate) fn new(rule: &'a Rule, start: DateTime<Tz>, options: ExpansionOptions) -> Self {
        let state = if rule.interval() == 0 {
            State::Done
        } else {
            State::Filling
        };
        Self {
            rule,
            generator: BaseGenerator::new(
                start.clone(),
                rule.frequency(),
                rule.interval(),
                options.batch_size,
            ),
            start,
            buffer: VecDeque::new(),
            state,
            options,
            produced: 0,
            empty_batches: 0,
            last: None,
        }
    }

    fn fill(&mut self) {
        let Some(batch) = self.generator.next_batch() else {
            self.state = State::Done;
            return;
        };

        if let (Some(until), Some(first)) = (self.rule.until(), batch.first()) {
            // Expansions never reach back more than two periods before
            // their base candidate.
            let earliest = first.step(self.rule.frequency(), -2);
            if earliest.is_some_and(|earliest| earliest.with_timezone(&Utc) > until) {
                self.state = State::Done;
                return;
            }
        }

        let generated = batch.len();
        let mut candidates = self.rule.pipeline().run(batch);
        candidates.sort();
        candidates.dedup();
        candidates.retain(|candidate| {
            *candidate >= self.start && self.last.as_ref().is_none_or(|last| candidate > last)
        });

        tracing::trace!(
            generated,
            kept = candidates.len(),
            empty_batches = self.empty_batches,
            "Expanded occurrence batch"
        );

        if candidates.is_empty() {
            self.empty_batches = self.empty_batches.saturating_add(1);
            if let Some(limit) = self.options.max_empty_batches
                && self.empty_batches >= limit
            {
                tracing::warn!(
                    rule = %self.rule,
                    empty_batches = self.empty_batches,
                    "No occurrences found in consecutive batches, ending expansion"
                );
                self.state = State::Done;
            }
            return;
        }

        self.empty_batches = 0;
        self.buffer.extend(candidates);
        self.state = State::Yielding;
    }

    fn is_exhausted_by(&self, candidate: &DateTime<Tz>) -> bool {
        match self.rule.termination() {
            Some(Termination::Count(count)) => self.produced >= count,
            Some(Termination::Until(until)) => candidate.with_timezone(&Utc) > until,
            None => false,
        }
    }
}

impl<Tz: TimeZone> Iterator for Occurrences<'_, Tz> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Done => return None,
                State::Filling => self.fill(),
                State::Yielding => {
                    let Some(candidate) = self.buffer.pop_front() else {
                        self.state = State::Filling;
                        continue;
                    };
                    if self.is_exhausted_by(&candidate) {
                        self.buffer.clear();
                        self.state = State::Done;
                        return None;
                    }
                    self.produced = self.produced.saturating_add(1);
                    if self.buffer.is_empty() {
                        self.state = State::Filling;
                    }
                    self.last = Some(candidate.clone());
                    return Some(candidate);
                }
            }
        }
    }
}

impl<Tz: TimeZone> FusedIterator for Occurrences<'_, Tz> {}
