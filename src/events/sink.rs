use super::Event;

/// Receiver of editor events.
///
/// Implemented for any `Fn(Event)` closure, and for `crossbeam::channel::Sender<Event>` when
/// the `channel` feature is enabled. The editor calls it synchronously from inside the frame.
pub trait EventSink {
    fn send(&self, event: Event);
}

impl<F> EventSink for F
where
    F: Fn(Event),
{
    fn send(&self, event: Event) {
        self(event);
    }
}

#[cfg(feature = "channel")]
impl EventSink for crossbeam::channel::Sender<Event> {
    fn send(&self, event: Event) {
        if let Err(err) = crossbeam::channel::Sender::send(self, event) {
            log::warn!("event receiver dropped: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::events::PayloadNodeSelect;

    #[test]
    fn test_closure_sink() {
        let got = RefCell::new(Vec::new());
        let sink = |e: Event| got.borrow_mut().push(e);

        let dyn_sink: &dyn EventSink = &sink;
        dyn_sink.send(Event::NodeSelect(PayloadNodeSelect { id: "a".into() }));

        assert_eq!(got.borrow().len(), 1);
    }

    #[cfg(feature = "channel")]
    #[test]
    fn test_channel_sink() {
        let (tx, rx) = crossbeam::channel::unbounded::<Event>();
        EventSink::send(&tx, Event::NodeSelect(PayloadNodeSelect { id: "a".into() }));
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::NodeSelect(PayloadNodeSelect { id: "a".into() })
        );
    }
}
