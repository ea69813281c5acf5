//! Driving a saturated pipe to completion.

use crate::monad::Monad;
use crate::step::Pipe;
use crate::void::{absurd, Void};

/// Interpret a pipe whose input, output, and leftover types have all been
/// eliminated (`Source >> ... >> Sink` fused all the way down), producing
/// its result in the host effect context.
///
/// `HaveOutput` and `Leftover` can never occur — their payloads would have
/// to be a [`Void`] — and are eliminated with [`absurd`]. A `NeedInput` is
/// fed `()` for its upstream-done branch, since `U = ()` is the only legal
/// instantiation once `I = Void` (there is no upstream to ever deliver a
/// genuine input).
pub fn run_pipe<M, R>(p: Pipe<Void, Void, Void, (), M, R>) -> M::Wrap<R>
where
    M: Monad,
    R: 'static,
{
    match p {
        Pipe::Done(r) => M::pure(r),
        Pipe::PipeM(m) => M::bind(m, |next| run_pipe(*next)),
        Pipe::NeedInput(_, on_done) => run_pipe(on_done(())),
        Pipe::HaveOutput(_, _, o) => absurd(o),
        Pipe::Leftover(_, l) => absurd(l),
    }
}
