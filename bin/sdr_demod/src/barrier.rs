use std::sync::{Condvar, Mutex, RwLock};

/// Possible errors when using a barrier.
#[derive(Debug)]
pub enum BarrierError {
    /// Barrier is closed.
    Closed,
}

/// A light wrapper around a mutex and condition variable, used for
/// inter-thread handoff between the acquisition thread and the producer
/// thread below.
///
/// # Examples
/// ```ignore
/// use std::sync::Arc;
/// use sdr_demod::barrier::Barrier;
///
/// let barrier = Arc::new(Barrier::new(false));
///
/// let thread_0 = std::thread::spawn({
///     let barrier = barrier.clone();
///     move || {
///         barrier.wait(|state| *state).unwrap();
///         println!("[thread-0] passed barrier");
///         barrier.acquire().set(false).unwrap();
///         println!("[thread-0] updated barrier");
///     }
/// });
///
/// let thread_1 = std::thread::spawn({
///     let barrier = barrier.clone();
///     move || {
///         barrier.acquire().set(true).unwrap();
///         println!("[thread-1] updated barrier");
///         barrier.wait(|state| !*state).unwrap();
///         println!("[thread-1] passed barrier");
///     }
/// });
///
/// thread_0.join().unwrap();
/// thread_1.join().unwrap();
/// ```
pub struct Barrier<T> {
    data: Mutex<T>,
    is_closed: RwLock<bool>,
    on_change: Condvar,
}

#[allow(unused)]
impl<T> Barrier<T> {
    pub fn new(initial_data: T) -> Self {
        Self {
            data: Mutex::new(initial_data),
            is_closed: RwLock::new(false),
            on_change: Condvar::new(),
        }
    }

    /// Forcefully updates all threads waiting for an update.
    pub fn notify_all(&mut self) {
        self.on_change.notify_all();
    }

    /// Close the barrier. Threads waiting for or updating it get `Closed`.
    pub fn close(&mut self) -> Result<(), BarrierError> {
        let mut is_closed = self.is_closed.write().unwrap();
        if *is_closed {
            return Err(BarrierError::Closed);
        }
        *is_closed = true;
        self.on_change.notify_all();
        Ok(())
    }

    /// Gets a mutable reference through a shared one, so multiple owners
    /// sharing the barrier through `Arc` can still update it; safe because
    /// every mutable method takes its own lock internally.
    pub fn acquire(&self) -> &mut Self {
        unsafe { &mut *(self as *const Self as *mut Self) }
    }
}

#[allow(unused)]
impl<T> Barrier<T>
where
    T: PartialEq,
{
    /// Blocks the calling thread until the predicate is satisfied.
    pub fn wait(&self, predicate: impl Fn(&T) -> bool) -> Result<(), BarrierError> {
        let mut data = self.data.lock().unwrap();
        loop {
            if *self.is_closed.read().unwrap() {
                return Err(BarrierError::Closed);
            }
            if predicate(&data) {
                break;
            }
            data = self.on_change.wait(data).unwrap();
        }
        Ok(())
    }

    /// Updates the barrier and wakes every thread waiting on it.
    pub fn set(&mut self, new_data: T) -> Result<(), BarrierError> {
        if *self.is_closed.read().unwrap() {
            return Err(BarrierError::Closed);
        }
        let mut state = self.data.lock().unwrap();
        *state = new_data;
        self.on_change.notify_all();
        Ok(())
    }
}

impl<T: Clone> Barrier<T> {
    /// Snapshots the current value. Combined with `wait`/`set`, this lets a
    /// consumer thread pull data out of the barrier rather than just
    /// synchronising on a boolean.
    pub fn get_clone(&self) -> T {
        self.data.lock().unwrap().clone()
    }
}

impl<T> Drop for Barrier<T> {
    fn drop(&mut self) {
        self.close().unwrap_or(());
    }
}
