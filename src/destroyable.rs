// Rc<RefCell<_>> components that subscribe to channels or own timers form
// cycles; destroy() breaks them explicitly when the window closes.
pub trait Destroyable {
    fn destroy(&mut self);
}
