use super::LoadEvent;

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::LoadEvent;
    use std::sync::mpsc;

    #[derive(Clone)]
    pub struct LoadSender(mpsc::Sender<LoadEvent>);

    pub struct LoadQueue(mpsc::Receiver<LoadEvent>);

    pub fn channel() -> (LoadSender, LoadQueue) {
        let (tx, rx) = mpsc::channel();
        (LoadSender(tx), LoadQueue(rx))
    }

    impl LoadSender {
        pub fn send(&self, event: LoadEvent) {
            // The viewer may already be gone; nothing to report to.
            let _ = self.0.send(event);
        }
    }

    impl LoadQueue {
        pub fn drain(&mut self) -> Vec<LoadEvent> {
            self.0.try_iter().collect()
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::LoadEvent;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Clone)]
    pub struct LoadSender(Rc<RefCell<VecDeque<LoadEvent>>>);

    pub struct LoadQueue(Rc<RefCell<VecDeque<LoadEvent>>>);

    pub fn channel() -> (LoadSender, LoadQueue) {
        let events = Rc::new(RefCell::new(VecDeque::new()));
        (LoadSender(events.clone()), LoadQueue(events))
    }

    impl LoadSender {
        pub fn send(&self, event: LoadEvent) {
            self.0.borrow_mut().push_back(event);
        }
    }

    impl LoadQueue {
        pub fn drain(&mut self) -> Vec<LoadEvent> {
            self.0.borrow_mut().drain(..).collect()
        }
    }
}

pub use imp::{channel, LoadQueue, LoadSender};

impl LoadSender {
    pub fn progress(&self, loaded: u64, total: Option<u64>) {
        self.send(LoadEvent::Progress(super::LoadProgress { loaded, total }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{LoadError, LoadProgress};

    #[test]
    fn events_arrive_in_order() {
        let (tx, mut rx) = channel();
        tx.progress(1, Some(4));
        tx.progress(4, Some(4));
        tx.send(LoadEvent::Finished(Err(LoadError::EmptyScene)));

        let events = rx.drain();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            LoadEvent::Progress(LoadProgress { loaded: 1, total: Some(4) })
        ));
        assert!(matches!(events[2], LoadEvent::Finished(Err(LoadError::EmptyScene))));
        assert!(rx.drain().is_empty());
    }
}
