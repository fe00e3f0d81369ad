/// Receives commands delivered through an `EventObserver` subscription.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
