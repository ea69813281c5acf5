//! Sequential composition ("bind").
//!
//! Given a pipe and a continuation from its eventual result, produce a new
//! pipe that runs the first to completion and then hands its result to the
//! continuation. This is the "do one thing, then another" glue that lets
//! users write pipes as ordinary straight-line code (`await_input().and_then(...)`)
//! instead of manipulating the five variants directly.

use crate::monad::Monad;
use crate::step::Pipe;

impl<L, I, O, U, M, R1> Pipe<L, I, O, U, M, R1>
where
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
    M: Monad,
    R1: 'static,
{
    /// Chain a continuation onto this pipe's eventual result.
    ///
    /// Preserves the order of `PipeM` effects and never swallows a
    /// `HaveOutput` or `Leftover` step: whichever of those this pipe would
    /// have produced on its own, it still produces, with the continuation
    /// spliced in only once a `Done` is reached.
    pub fn and_then<R2: 'static>(
        self,
        k: impl FnOnce(R1) -> Pipe<L, I, O, U, M, R2> + 'static,
    ) -> Pipe<L, I, O, U, M, R2> {
        match self {
            Pipe::Done(r) => k(r),
            Pipe::HaveOutput(next, close, o) => {
                Pipe::HaveOutput(next.and_then(k).boxed(), close, o)
            }
            Pipe::NeedInput(on_input, on_done) => Pipe::NeedInput(
                Box::new(move |i| on_input(i).and_then(k)),
                Box::new(move |u| on_done(u).and_then(k)),
            ),
            Pipe::PipeM(m) => Pipe::PipeM(M::map(m, move |next| next.and_then(k).boxed())),
            Pipe::Leftover(next, l) => Pipe::Leftover(next.and_then(k).boxed(), l),
        }
    }

    /// Apply a pure function to this pipe's eventual result.
    pub fn map_result<R2: 'static>(
        self,
        f: impl FnOnce(R1) -> R2 + 'static,
    ) -> Pipe<L, I, O, U, M, R2> {
        self.and_then(move |r| Pipe::Done(f(r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monad::Now;
    use crate::void::Void;

    type P<R> = Pipe<Void, (), Void, (), Now, R>;

    #[test]
    fn done_bind_runs_continuation_immediately() {
        let p: P<i32> = Pipe::Done(1).and_then(|r| Pipe::Done(r + 1));
        assert!(matches!(p, Pipe::Done(2)));
    }

    #[test]
    fn bind_preserves_have_output() {
        let p: Pipe<Void, (), i32, (), Now, i32> =
            Pipe::HaveOutput(Box::new(Pipe::Done(0)), (), 7).and_then(|r| Pipe::Done(r + 1));
        match p {
            Pipe::HaveOutput(next, _, o) => {
                assert_eq!(o, 7);
                assert!(matches!(*next, Pipe::Done(1)));
            }
            _ => panic!("expected HaveOutput"),
        }
    }

    #[test]
    fn bind_identity_law_on_done() {
        // bind(Done(r), Done) == Done(r)
        let p: P<i32> = Pipe::Done(5).and_then(Pipe::Done);
        assert!(matches!(p, Pipe::Done(5)));
    }
}
