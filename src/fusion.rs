//! Fusion — the heart of the crate.
//!
//! [`pipe`] drives a right pipe until it needs input, then advances a left
//! pipe to supply it, threading finalizers, leftovers, and
//! upstream-termination results along the way. [`pipe_resume`] is the
//! non-terminal sibling that hands the left pipe back instead of
//! finalizing it, so a long-lived producer can be fused against one
//! consumer after another.
//!
//! The dispatch is deliberately right-biased: `right` is inspected first,
//! and `left` is only ever advanced once `right` is genuinely stuck waiting
//! for input. Pulling `left` eagerly could perform a host effect (read the
//! next file chunk, open a socket) that would then be thrown away — right-first
//! dispatch is what makes `pipe` perform exactly the effects the caller asked
//! for, no more.
//!
//! Two places need a value shared between two alternative, mutually
//! exclusive continuations (the two arms of a `NeedInput`) that isn't
//! `Clone`: the spec describes the pending left finalizer as "a
//! mutable-looking value", which is rendered here literally as a shared,
//! take-once cell.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::monad::Monad;
use crate::step::Pipe;
use crate::void::{absurd, Void};

type Shared<T> = Rc<RefCell<Option<T>>>;

fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(Some(value)))
}

fn take_shared<T>(cell: &Shared<T>) -> T {
    cell.borrow_mut()
        .take()
        .expect("fusion continuation invoked more than once")
}

/// Fuse two closed pipes (no leftovers on either side) into one.
///
/// `left` supplies the input `right` consumes; whichever of the two first
/// reaches a terminal state determines when fusion stops.
pub fn pipe<A, B, C, R0, R1, R2, M>(
    left: Pipe<Void, A, B, R0, M, R1>,
    right: Pipe<Void, B, C, R1, M, R2>,
) -> Pipe<Void, A, C, R0, M, R2>
where
    M: Monad,
    A: 'static,
    B: 'static,
    C: 'static,
    R0: 'static,
    R1: Clone + 'static,
    R2: 'static,
{
    pipe_go(M::pure(()), left, right)
}

fn pipe_go<A, B, C, R0, R1, R2, M>(
    final_: M::Wrap<()>,
    left: Pipe<Void, A, B, R0, M, R1>,
    right: Pipe<Void, B, C, R1, M, R2>,
) -> Pipe<Void, A, C, R0, M, R2>
where
    M: Monad,
    A: 'static,
    B: 'static,
    C: 'static,
    R0: 'static,
    R1: Clone + 'static,
    R2: 'static,
{
    match right {
        Pipe::Done(r2) => {
            trace!("fusion: right done, running pending left finalizer");
            Pipe::PipeM(M::map(final_, move |_| Box::new(Pipe::Done(r2))))
        }
        Pipe::HaveOutput(rp, rc, o) => {
            Pipe::HaveOutput(Box::new(pipe_go(final_, left, *rp)), rc, o)
        }
        Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |rp| Box::new(pipe_go(final_, left, *rp)))),
        Pipe::Leftover(_, void) => absurd(void),
        Pipe::NeedInput(rp, rc) => match left {
            Pipe::Done(r1) => {
                // The pending finalizer belonged to left's *previous* shape;
                // left has already finished normally, so it's dropped, not run.
                pipe_go(M::pure(()), Pipe::Done(r1.clone()), rc(r1))
            }
            Pipe::HaveOutput(lp, lc, o) => {
                trace!("fusion: left output accepted, finalizer handed off");
                pipe_go(lc, *lp, rp(o))
            }
            Pipe::PipeM(m) => {
                Pipe::PipeM(M::map(m, move |lp| pipe_go(final_, *lp, Pipe::NeedInput(rp, rc)).boxed()))
            }
            Pipe::NeedInput(lp, lc) => {
                let state = shared((final_, Pipe::NeedInput(rp, rc)));
                let state_done = state.clone();
                Pipe::NeedInput(
                    Box::new(move |a| {
                        let (final_, right) = take_shared(&state);
                        pipe_go(final_, lp(a), right)
                    }),
                    Box::new(move |r0| {
                        let (final_, right) = take_shared(&state_done);
                        pipe_go(final_, lc(r0), right)
                    }),
                )
            }
        },
    }
}

/// The left half of a suspended fusion: a pipe paused mid-stream, together
/// with the finalizer owed to its current shape.
pub struct ResumablePipe<A, B, R0, R1, M>
where
    M: Monad,
{
    pub left: Pipe<A, A, B, R0, M, R1>,
    pub left_final: M::Wrap<()>,
}

impl<A, B, R0, R1, M> ResumablePipe<A, B, R0, R1, M>
where
    M: Monad,
{
    /// Wrap a fresh pipe with a no-op finalizer.
    pub fn new(left: Pipe<A, A, B, R0, M, R1>) -> Self {
        ResumablePipe {
            left,
            left_final: M::pure(()),
        }
    }
}

/// Fuse a resumable left pipe against a terminating right pipe (typically a
/// sink), producing a pipe that, once driven to completion, yields both the
/// right pipe's result and an updated [`ResumablePipe`] ready for the next
/// round.
///
/// This returns a [`Pipe`] rather than a bare effectful value because the
/// left pipe may itself still need genuine external input (`A`) to make
/// progress; driving the returned pipe the ordinary way (via
/// [`crate::run_pipe`] when `A = Void`, or by feeding it input otherwise)
/// is how a caller "runs" a resumption.
pub fn pipe_resume<A, B, R0, R1, R2, M>(
    resumable: ResumablePipe<A, B, R0, R1, M>,
    right: Pipe<B, B, Void, R1, M, R2>,
) -> Pipe<Void, A, Void, R0, M, (ResumablePipe<A, B, R0, R1, M>, R2)>
where
    M: Monad,
    A: 'static,
    B: 'static,
    R0: 'static,
    R1: Clone + 'static,
    R2: 'static,
{
    pipe_resume_go(resumable.left_final, resumable.left, right)
}

fn pipe_resume_go<A, B, R0, R1, R2, M>(
    final_: M::Wrap<()>,
    left: Pipe<A, A, B, R0, M, R1>,
    right: Pipe<B, B, Void, R1, M, R2>,
) -> Pipe<Void, A, Void, R0, M, (ResumablePipe<A, B, R0, R1, M>, R2)>
where
    M: Monad,
    A: 'static,
    B: 'static,
    R0: 'static,
    R1: Clone + 'static,
    R2: 'static,
{
    match right {
        Pipe::Done(r2) => Pipe::Done((
            ResumablePipe {
                left,
                left_final: final_,
            },
            r2,
        )),
        Pipe::HaveOutput(_, _, o) => absurd(o),
        Pipe::PipeM(m) => {
            Pipe::PipeM(M::map(m, move |rp| pipe_resume_go(final_, left, *rp).boxed()))
        }
        Pipe::Leftover(p, i) => {
            trace!("fusion resume: right leftover re-synthesized as left output");
            let new_left = Pipe::HaveOutput(Box::new(left), final_, i);
            pipe_resume_go(M::pure(()), new_left, *p)
        }
        Pipe::NeedInput(rp, rc) => match left {
            Pipe::Done(r1) => {
                let drained = no_input(r1.clone(), rc(r1.clone()));
                pipe_resume_go(M::pure(()), Pipe::Done(r1), drained)
            }
            Pipe::HaveOutput(lp, lc, o) => pipe_resume_go(lc, *lp, rp(o)),
            Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |lp| {
                pipe_resume_go(final_, *lp, Pipe::NeedInput(rp, rc)).boxed()
            })),
            Pipe::Leftover(lp, l) => {
                let inner = pipe_resume_go(final_, *lp, Pipe::NeedInput(rp, rc));
                inner.map_result(move |(mut resumable, r2)| {
                    resumable.left = Pipe::Leftover(Box::new(resumable.left), l);
                    (resumable, r2)
                })
            }
            Pipe::NeedInput(lp, lc) => {
                let state = shared((final_, Pipe::NeedInput(rp, rc)));
                let state_done = state.clone();
                Pipe::NeedInput(
                    Box::new(move |a| {
                        let (final_, right) = take_shared(&state);
                        pipe_resume_go(final_, lp(a), right)
                    }),
                    Box::new(move |r0| {
                        let (final_, right) = take_shared(&state_done);
                        pipe_resume_go(final_, lc(r0), right)
                    }),
                )
            }
        },
    }
}

/// Transform a pipe so that every `NeedInput` behaves as if upstream had
/// already terminated with `u`.
///
/// Used to drain a consumer after its upstream is known to be finished
/// without re-invoking the upstream-done continuation by hand for every
/// subsequent `NeedInput` node. Per the design's open question, a `Leftover`
/// encountered along the way is dropped rather than preserved: there is no
/// upstream left to receive it.
pub fn no_input<L, I, O, U, M, R>(u: U, p: Pipe<L, I, O, U, M, R>) -> Pipe<L, I, O, U, M, R>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O: 'static,
    U: Clone + 'static,
    R: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::Done(r),
        Pipe::NeedInput(_, on_done) => no_input(u.clone(), on_done(u)),
        Pipe::HaveOutput(next, close, o) => Pipe::HaveOutput(Box::new(no_input(u, *next)), close, o),
        Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |next| Box::new(no_input(u, *next)))),
        Pipe::Leftover(next, _dropped) => no_input(u, *next),
    }
}

impl<A, B, C, R0, R1, R2, M> std::ops::Shr<Pipe<Void, B, C, R1, M, R2>> for Pipe<Void, A, B, R0, M, R1>
where
    M: Monad,
    A: 'static,
    B: 'static,
    C: 'static,
    R0: 'static,
    R1: Clone + 'static,
    R2: 'static,
{
    type Output = Pipe<Void, A, C, R0, M, R2>;

    /// `left >> right` fuses the two pipes, exactly like [`pipe`].
    fn shr(self, right: Pipe<Void, B, C, R1, M, R2>) -> Self::Output {
        pipe(self, right)
    }
}
