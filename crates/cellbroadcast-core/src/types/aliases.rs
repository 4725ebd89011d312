//! Type aliases for shared state.
//!
//! The core runs on a single logical thread: components that hand each other
//! mutable state (the settings controller and the inbound dispatcher both
//! drive the reconfiguration trigger) share it through `Rc<RefCell<T>>`.
//! The event bus is the exception, since its subscribers may live on other
//! threads.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::event_bus::EventBus;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// # Example
/// ```rust,ignore
/// let trigger: Shared<ReconfigurationTrigger> = shared(ReconfigurationTrigger::new(..));
/// trigger.borrow_mut().on_startup();
/// ```
pub type Shared<T> = Rc<RefCell<T>>;

/// A handle to the process event bus.
pub type SharedBus = Arc<EventBus>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
