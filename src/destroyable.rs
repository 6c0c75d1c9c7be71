// implemented by components that hold subscriptions or scheduled work; destroy() drops both
pub trait Destroyable {
    fn destroy(&mut self);
}
