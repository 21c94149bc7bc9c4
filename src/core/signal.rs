/// Typed signal bus — queued notifications from the sequencing core to
/// presentation collaborators.

use rustc_hash::FxHashMap;

use crate::core::timer::Urgency;
use crate::schema::clue::ClueId;
use crate::schema::speaker::Speaker;

/// A cross-cutting notification emitted by the sequencers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// A dialogue or debate presentation area became visible.
    AreaShown,
    /// The active presentation area was dismissed.
    AreaHidden,
    /// The player collected a clue during the session that just ended.
    /// Deferred so the pickup never interrupts mid-conversation flow.
    ClueFound(ClueId),
    /// An inspected object moved the chapter into its investigation
    /// phase.
    InvestigationStarted,
    /// A finished group dialogue asked for the other pending group
    /// dialogues in the area to be cancelled.
    GroupDialoguesCancelled,
    /// The line being presented switched to a different speaker.
    SpeakerChanged(Speaker),
    /// The answer timer crossed an urgency threshold.
    UrgencyChanged(Urgency),
    /// The answer timer ran out. Deciding what answer that implies is
    /// the integrating layer's job.
    TimedOut,
}

/// Field-less mirror of `Signal`, used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    AreaShown,
    AreaHidden,
    ClueFound,
    InvestigationStarted,
    GroupDialoguesCancelled,
    SpeakerChanged,
    UrgencyChanged,
    TimedOut,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::AreaShown => SignalKind::AreaShown,
            Self::AreaHidden => SignalKind::AreaHidden,
            Self::ClueFound(_) => SignalKind::ClueFound,
            Self::InvestigationStarted => SignalKind::InvestigationStarted,
            Self::GroupDialoguesCancelled => SignalKind::GroupDialoguesCancelled,
            Self::SpeakerChanged(_) => SignalKind::SpeakerChanged,
            Self::UrgencyChanged(_) => SignalKind::UrgencyChanged,
            Self::TimedOut => SignalKind::TimedOut,
        }
    }
}

type Handler = Box<dyn FnMut(&Signal)>;

/// Queued publish/subscribe bus.
///
/// Publishers `schedule` signals while they transition; the owning
/// state machine calls `flush` once it is stable for the tick, so
/// subscribers never observe a half-applied transition.
#[derive(Default)]
pub struct SignalBus {
    handlers: FxHashMap<SignalKind, Vec<Handler>>,
    queue: Vec<Signal>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one signal kind.
    pub fn subscribe<F>(&mut self, kind: SignalKind, handler: F)
    where
        F: FnMut(&Signal) + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Queue a signal for the next flush.
    pub fn schedule(&mut self, signal: Signal) {
        self.queue.push(signal);
    }

    /// Deliver every queued signal, in scheduling order, to the
    /// handlers registered for its kind.
    pub fn flush(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let pending: Vec<Signal> = self.queue.drain(..).collect();
        for signal in &pending {
            if let Some(handlers) = self.handlers.get_mut(&signal.kind()) {
                for handler in handlers.iter_mut() {
                    handler(signal);
                }
            }
        }
    }

    /// Signals queued but not yet delivered.
    pub fn pending(&self) -> &[Signal] {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn signals_map_to_their_kind() {
        assert_eq!(Signal::AreaShown.kind(), SignalKind::AreaShown);
        assert_eq!(Signal::ClueFound(ClueId(1)).kind(), SignalKind::ClueFound);
        assert_eq!(
            Signal::SpeakerChanged(Speaker::Player).kind(),
            SignalKind::SpeakerChanged
        );
        assert_eq!(Signal::TimedOut.kind(), SignalKind::TimedOut);
    }

    #[test]
    fn flush_delivers_in_scheduling_order() {
        let mut bus = SignalBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        bus.subscribe(SignalKind::ClueFound, move |signal| {
            sink.borrow_mut().push(*signal);
        });
        let sink = Rc::clone(&seen);
        bus.subscribe(SignalKind::AreaHidden, move |signal| {
            sink.borrow_mut().push(*signal);
        });

        bus.schedule(Signal::AreaHidden);
        bus.schedule(Signal::ClueFound(ClueId(7)));
        assert!(seen.borrow().is_empty());
        assert_eq!(bus.pending().len(), 2);

        bus.flush();
        assert_eq!(
            *seen.borrow(),
            vec![Signal::AreaHidden, Signal::ClueFound(ClueId(7))]
        );
        assert!(bus.pending().is_empty());
    }

    #[test]
    fn unsubscribed_kinds_are_dropped_silently() {
        let mut bus = SignalBus::new();
        bus.schedule(Signal::TimedOut);
        bus.flush();
        assert!(bus.pending().is_empty());
    }

    #[test]
    fn handlers_only_see_their_kind() {
        let mut bus = SignalBus::new();
        let count = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&count);
        bus.subscribe(SignalKind::TimedOut, move |_| {
            *sink.borrow_mut() += 1;
        });

        bus.schedule(Signal::AreaShown);
        bus.schedule(Signal::TimedOut);
        bus.schedule(Signal::AreaHidden);
        bus.flush();
        assert_eq!(*count.borrow(), 1);
    }
}
