//! Pipe-to-pipe rewrites that don't change what a pipe consumes or produces
//! structurally, only how it's typed or what side bookkeeping is attached.

use crate::monad::{Monad, Nat};
use crate::step::Pipe;
use crate::void::{absurd, Void};

/// Change the effect context a pipe runs under.
///
/// `nat` must be usable at every payload type the pipe embeds effects at
/// (`PipeM`'s own continuation and `HaveOutput`'s finalizer) — the
/// "higher-rank polymorphism" the design calls for. [`Nat::apply`]'s generic
/// method makes `Nat` itself object-unsafe, so this takes `nat` as a
/// monomorphized, `Clone` value rather than `&dyn Nat<M1, M2>`.
pub fn trans_pipe<L, I, O, U, R, M1, M2, N>(
    nat: N,
    p: Pipe<L, I, O, U, M1, R>,
) -> Pipe<L, I, O, U, M2, R>
where
    M1: Monad,
    M2: Monad,
    N: Nat<M1, M2> + Clone + 'static,
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
    R: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::Done(r),
        Pipe::HaveOutput(next, close, o) => {
            let close2 = nat.apply(close);
            Pipe::HaveOutput(Box::new(trans_pipe(nat, *next)), close2, o)
        }
        Pipe::NeedInput(fi, fu) => {
            let nat2 = nat.clone();
            Pipe::NeedInput(
                Box::new(move |i| trans_pipe(nat, fi(i))),
                Box::new(move |u| trans_pipe(nat2, fu(u))),
            )
        }
        Pipe::PipeM(m) => {
            let nat2 = nat.clone();
            let lifted = M1::map(m, move |next| Box::new(trans_pipe(nat, *next)));
            Pipe::PipeM(nat2.apply(lifted))
        }
        Pipe::Leftover(next, l) => Pipe::Leftover(Box::new(trans_pipe(nat, *next)), l),
    }
}

/// Map every emitted output value.
pub fn map_output<L, I, O1, O2, U, M, R>(
    f: impl Fn(O1) -> O2 + Clone + 'static,
    p: Pipe<L, I, O1, U, M, R>,
) -> Pipe<L, I, O2, U, M, R>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O1: 'static,
    O2: 'static,
    U: 'static,
    R: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::Done(r),
        Pipe::HaveOutput(next, close, o) => {
            Pipe::HaveOutput(Box::new(map_output(f.clone(), *next)), close, f(o))
        }
        Pipe::NeedInput(fi, fu) => {
            let f2 = f.clone();
            Pipe::NeedInput(
                Box::new(move |i| map_output(f.clone(), fi(i))),
                Box::new(move |u| map_output(f2, fu(u))),
            )
        }
        Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |next| Box::new(map_output(f, *next)))),
        Pipe::Leftover(next, l) => Pipe::Leftover(Box::new(map_output(f, *next)), l),
    }
}

/// Map every emitted output value, dropping outputs the mapping declines to
/// produce. A dropped output's early-close finalizer is dropped along with
/// it — it was never exposed to downstream, so there is nothing to early-close.
pub fn map_output_maybe<L, I, O1, O2, U, M, R>(
    f: impl Fn(O1) -> Option<O2> + Clone + 'static,
    p: Pipe<L, I, O1, U, M, R>,
) -> Pipe<L, I, O2, U, M, R>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O1: 'static,
    O2: 'static,
    U: 'static,
    R: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::Done(r),
        Pipe::HaveOutput(next, close, o) => match f(o) {
            Some(o2) => Pipe::HaveOutput(Box::new(map_output_maybe(f.clone(), *next)), close, o2),
            None => map_output_maybe(f, *next),
        },
        Pipe::NeedInput(fi, fu) => {
            let f2 = f.clone();
            Pipe::NeedInput(
                Box::new(move |i| map_output_maybe(f.clone(), fi(i))),
                Box::new(move |u| map_output_maybe(f2, fu(u))),
            )
        }
        Pipe::PipeM(m) => {
            Pipe::PipeM(M::map(m, move |next| Box::new(map_output_maybe(f, *next))))
        }
        Pipe::Leftover(next, l) => Pipe::Leftover(Box::new(map_output_maybe(f, *next)), l),
    }
}

/// Contravariant rewrite of the input and leftover types: `f` translates a
/// value of the new input type down to what the wrapped pipe expects, and
/// `g` translates one of the wrapped pipe's own leftovers up to the new
/// leftover type, dropping it if `g` declines.
pub fn map_input<Lo, Ln, Io, In, O, U, M, R>(
    f: impl Fn(In) -> Io + Clone + 'static,
    g: impl Fn(Lo) -> Option<Ln> + Clone + 'static,
    p: Pipe<Lo, Io, O, U, M, R>,
) -> Pipe<Ln, In, O, U, M, R>
where
    M: Monad,
    Lo: 'static,
    Ln: 'static,
    Io: 'static,
    In: 'static,
    O: 'static,
    U: 'static,
    R: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::Done(r),
        Pipe::HaveOutput(next, close, o) => {
            Pipe::HaveOutput(Box::new(map_input(f.clone(), g.clone(), *next)), close, o)
        }
        Pipe::NeedInput(fi, fu) => {
            let f2 = f.clone();
            let g2 = g.clone();
            Pipe::NeedInput(
                Box::new(move |i_new: In| {
                    let i_old = f(i_new);
                    map_input(f.clone(), g.clone(), fi(i_old))
                }),
                Box::new(move |u| map_input(f2, g2, fu(u))),
            )
        }
        Pipe::PipeM(m) => {
            Pipe::PipeM(M::map(m, move |next| Box::new(map_input(f, g, *next))))
        }
        Pipe::Leftover(next, l) => {
            let mapped = map_input(f, g.clone(), *next);
            match g(l) {
                Some(l_new) => Pipe::Leftover(Box::new(mapped), l_new),
                None => mapped,
            }
        }
    }
}

/// Register `cleanup` to run once: with `true` if `p` reaches `Done` on its
/// own, with `false` along whichever early-close path abandons it first.
pub fn add_cleanup<L, I, O, U, M, R>(
    cleanup: impl Fn(bool) -> M::Wrap<()> + Clone + 'static,
    p: Pipe<L, I, O, U, M, R>,
) -> Pipe<L, I, O, U, M, R>
where
    M: Monad,
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
    R: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::PipeM(M::map(cleanup(true), move |_| Box::new(Pipe::Done(r)))),
        Pipe::HaveOutput(next, close, o) => {
            let cleanup2 = cleanup.clone();
            let new_close = M::bind(cleanup(false), move |_| close);
            Pipe::HaveOutput(Box::new(add_cleanup(cleanup2, *next)), new_close, o)
        }
        Pipe::NeedInput(fi, fu) => {
            let cleanup2 = cleanup.clone();
            Pipe::NeedInput(
                Box::new(move |i| add_cleanup(cleanup, fi(i))),
                Box::new(move |u| add_cleanup(cleanup2, fu(u))),
            )
        }
        Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |next| Box::new(add_cleanup(cleanup, *next)))),
        Pipe::Leftover(next, l) => Pipe::Leftover(Box::new(add_cleanup(cleanup, *next)), l),
    }
}

/// Widen a sink (`O = Void`) so it can stand in for a pipe emitting any
/// output type. `HaveOutput` can never actually occur, since its payload
/// would have to be a [`Void`].
pub fn sink_to_pipe<I, U, M, R, O>(p: Pipe<I, I, Void, U, M, R>) -> Pipe<I, I, O, U, M, R>
where
    M: Monad,
    I: 'static,
    U: 'static,
    R: 'static,
    O: 'static,
{
    match p {
        Pipe::Done(r) => Pipe::Done(r),
        Pipe::NeedInput(fi, fu) => Pipe::NeedInput(
            Box::new(move |i| sink_to_pipe(fi(i))),
            Box::new(move |u| sink_to_pipe(fu(u))),
        ),
        Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |next| Box::new(sink_to_pipe(*next)))),
        Pipe::HaveOutput(_, _, o) => absurd(o),
        Pipe::Leftover(next, l) => Pipe::Leftover(Box::new(sink_to_pipe(*next)), l),
    }
}

/// Semantically prepend `i` to the input stream of a pipe whose leftover
/// type coincides with its input type.
///
/// If `p` is already waiting on input, `i` is delivered directly — unless
/// doing so immediately produces another `Leftover` at the head, in which
/// case the two pushes are flattened into one recursive call rather than
/// left nested.
pub fn pipe_push<I, O, U, M, R>(i: I, p: Pipe<I, I, O, U, M, R>) -> Pipe<I, I, O, U, M, R>
where
    M: Monad,
    I: 'static,
    O: 'static,
    U: 'static,
    R: 'static,
{
    match p {
        Pipe::NeedInput(fi, _fu) => match fi(i) {
            Pipe::Leftover(q, i2) => pipe_push(i2, *q),
            other => other,
        },
        Pipe::Done(r) => Pipe::Leftover(Box::new(Pipe::Done(r)), i),
        Pipe::Leftover(q, i2) => Pipe::Leftover(Box::new(pipe_push(i2, *q)), i),
        Pipe::HaveOutput(next, close, o) => {
            Pipe::HaveOutput(Box::new(pipe_push(i, *next)), close, o)
        }
        Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |next| Box::new(pipe_push(i, *next)))),
    }
}
