use crate::section::Section;

/// Reacts to the active section changing
///
/// Called synchronously, once per arrival, with the new section and the
/// one it replaced. Observers never see in-flight interpolation.
pub trait SectionObserver {
    fn on_section_changed(&mut self, new: &Section, previous: &Section);
}

impl<F> SectionObserver for F
where
    F: FnMut(&Section, &Section),
{
    fn on_section_changed(&mut self, new: &Section, previous: &Section) {
        self(new, previous)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registered observers, notified in subscription order
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(SubscriptionId, Box<dyn SectionObserver>)>,
    next_id: u64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn SectionObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer; false if the id was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify(&mut self, new: &Section, previous: &Section) {
        for (_, observer) in &mut self.observers {
            observer.on_section_changed(new, previous);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}
