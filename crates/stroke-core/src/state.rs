//! Observable single-threaded state cells.
//!
//! A [`MutableState`] holds a value on the runtime thread and requests a
//! frame whenever it changes, so the rendering layer picks the new value up
//! on the next pump. [`State`] is the read-only view handed to observers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::runtime::RuntimeHandle;

struct StateInner<T: Clone + 'static> {
    value: RefCell<T>,
    runtime: RuntimeHandle,
}

pub struct MutableState<T: Clone + 'static> {
    inner: Rc<StateInner<T>>,
}

pub struct State<T: Clone + 'static> {
    inner: Rc<StateInner<T>>,
}

impl<T: Clone + 'static> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> PartialEq for MutableState<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + 'static> Eq for MutableState<T> {}

impl<T: Clone + 'static> PartialEq for State<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + 'static> Eq for State<T> {}

impl<T: Clone + 'static> MutableState<T> {
    pub fn with_runtime(value: T, runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(StateInner {
                value: RefCell::new(value),
                runtime,
            }),
        }
    }

    pub fn as_state(&self) -> State<T> {
        State {
            inner: Rc::clone(&self.inner),
        }
    }

    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.inner.runtime.schedule();
    }

    pub fn set_value(&self, value: T) {
        self.set(value);
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.inner.value.borrow_mut());
        self.inner.runtime.schedule();
        result
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn value(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn get(&self) -> T {
        self.value()
    }
}

impl<T: Clone + 'static> State<T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn value(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn get(&self) -> T {
        self.value()
    }
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableState")
            .field("value", &self.value())
            .finish()
    }
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::TestRuntime;

    #[test]
    fn set_requests_a_frame() {
        let runtime = TestRuntime::new();
        let state = MutableState::with_runtime(0i32, runtime.handle());

        assert!(!runtime.runtime().needs_frame());
        state.set(5);

        assert_eq!(state.value(), 5);
        assert!(runtime.runtime().needs_frame());
    }

    #[test]
    fn state_view_tracks_the_source() {
        let runtime = TestRuntime::new();
        let state = MutableState::with_runtime(1.0f32, runtime.handle());
        let view = state.as_state();

        state.set(0.25);
        assert_eq!(view.value(), 0.25);
        assert_eq!(view.with(|v| *v * 2.0), 0.5);
    }

    #[test]
    fn update_returns_closure_result() {
        let runtime = TestRuntime::new();
        let state = MutableState::with_runtime(10u32, runtime.handle());

        let doubled = state.update(|v| {
            *v += 1;
            *v * 2
        });
        assert_eq!(doubled, 22);
        assert_eq!(state.value(), 11);
    }
}
