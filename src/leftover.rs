//! Leftover rewrites.
//!
//! These two functions change the *leftover type* of a pipe — not its
//! behavior — by either absorbing real leftovers into the input stream
//! ([`inject_leftovers`]) or proving there never were any
//! ([`any_leftovers`]).

use crate::monad::Monad;
use crate::step::Pipe;
use crate::void::{absurd, Void};

/// Absorb every `Leftover` into the input stream, feeding it back as if it
/// had arrived from upstream, and re-tag the now-leftover-free pipe to any
/// leftover type.
///
/// Only defined for pipes whose leftover type already coincides with their
/// input type (`L = I`) — only then does "feed the leftover back as input"
/// type-check.
pub fn inject_leftovers<I, O, U, M, R, L>(p: Pipe<I, I, O, U, M, R>) -> Pipe<L, I, O, U, M, R>
where
    M: Monad,
    I: 'static,
    O: 'static,
    U: 'static,
    R: 'static,
    L: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::Done(r),
        Pipe::NeedInput(on_input, on_done) => Pipe::NeedInput(
            Box::new(move |i| inject_leftovers(on_input(i))),
            Box::new(move |u| inject_leftovers(on_done(u))),
        ),
        Pipe::PipeM(m) => {
            Pipe::PipeM(M::map(m, move |next| Box::new(inject_leftovers(*next))))
        }
        Pipe::HaveOutput(next, close, o) => {
            Pipe::HaveOutput(Box::new(inject_leftovers(*next)), close, o)
        }
        Pipe::Leftover(next, l) => inject_leftovers(inject(l, *next)),
    }
}

/// Feed `l` into `p` as if it were the next input element.
///
/// Stays within `Pipe<I, I, O, U, M, R>` — it's [`inject_leftovers`] that
/// changes the leftover type, by calling this whenever it meets a
/// `Leftover` node.
fn inject<I, O, U, M, R>(l: I, p: Pipe<I, I, O, U, M, R>) -> Pipe<I, I, O, U, M, R>
where
    M: Monad,
    I: 'static,
    O: 'static,
    U: 'static,
    R: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::Done(r),
        // We do have input now, so the upstream-done continuation is
        // discarded: there's no upstream-done event to report.
        Pipe::NeedInput(on_input, _on_done) => on_input(l),
        Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |next| Box::new(inject(l, *next)))),
        Pipe::HaveOutput(next, close, o) => Pipe::HaveOutput(Box::new(inject(l, *next)), close, o),
        Pipe::Leftover(next, l2) => match inject(l2, *next) {
            // The existing leftover already absorbed one unit of virtual
            // input; `l` is dropped rather than stacking a second one.
            Pipe::Leftover(q, _) => *q,
            other => Pipe::Leftover(Box::new(other), l),
        },
    }
}

/// Re-tag a pipe whose leftover type is uninhabited to any leftover type.
///
/// The `Leftover` case can never actually occur (its payload would have to
/// be a [`Void`]), so it's eliminated with [`absurd`].
pub fn any_leftovers<I, O, U, M, R, L>(p: Pipe<Void, I, O, U, M, R>) -> Pipe<L, I, O, U, M, R>
where
    M: Monad,
    I: 'static,
    O: 'static,
    U: 'static,
    R: 'static,
    L: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::Done(r),
        Pipe::NeedInput(on_input, on_done) => Pipe::NeedInput(
            Box::new(move |i| any_leftovers(on_input(i))),
            Box::new(move |u| any_leftovers(on_done(u))),
        ),
        Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |next| Box::new(any_leftovers(*next)))),
        Pipe::HaveOutput(next, close, o) => {
            Pipe::HaveOutput(Box::new(any_leftovers(*next)), close, o)
        }
        Pipe::Leftover(_, l) => absurd(l),
    }
}
