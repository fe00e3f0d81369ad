// implemented by anything holding channel subscriptions or an armed countdown;
// the owner calls `destroy` when the session is torn down
pub trait Destroyable {
    fn destroy(&mut self);
}
