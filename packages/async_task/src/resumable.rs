//! Resumable jobs: explicit state machines driven one dispatch at a time

use crate::timeslice::{Timeslice, Unbounded};

/// Outcome of a single dispatch
#[derive(Debug)]
pub enum Resume<S, O> {
    /// The job gave control back; dispatch it again later with this state
    Yield(S),
    /// The job finished
    Complete(O),
}

impl<S, O> Resume<S, O> {
    /// Whether the job finished in this dispatch
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// A long computation split into dispatches.
///
/// The job owns all of its state. Between dispatches the caller holds it as an
/// ordinary value; discarding that value abandons the computation and runs the
/// job's `Drop` glue.
pub trait Resumable: Sized {
    /// Value produced when the job completes
    type Output;

    /// Run one dispatch, consulting `slice` about when to yield
    fn resume<T: Timeslice>(self, slice: &mut T) -> Resume<Self, Self::Output>;

    /// Drive the job on the current thread until it completes
    fn run_to_completion(self) -> Self::Output {
        let mut slice = Unbounded::new();
        let mut job = self;
        loop {
            match job.resume(&mut slice) {
                Resume::Yield(next) => job = next,
                Resume::Complete(output) => return output,
            }
        }
    }
}
