//! The step type itself.
//!
//! A [`Pipe`] is a five-variant description of one step of a staged
//! computation that may consume input, emit output, perform an effect in
//! the host context, leave a leftover, or finish with a result. Every
//! combinator in this crate either builds one of these values or rewrites
//! one into another; none of them "run" anything beyond what [`crate::run_pipe`]
//! and [`crate::pipe`]/[`crate::pipe_resume`] do.
//!
//! Every recursive occurrence of `Pipe` in its own definition is boxed, since
//! the type is deeply self-referential and would otherwise have no finite
//! size.

use crate::monad::Monad;
use crate::void::Void;

/// One step of a pipe.
///
/// - `L` — the leftover type: values this pipe can push back upstream.
/// - `I` — the input type this pipe consumes from upstream.
/// - `O` — the output type this pipe emits downstream.
/// - `U` — the upstream result type, delivered once upstream is done.
/// - `M` — the host effect context (see [`crate::monad::Monad`]).
/// - `R` — the result type produced on successful termination.
pub enum Pipe<L, I, O, U, M, R>
where
    M: Monad,
{
    /// Emit `value` downstream. If the pipe is abandoned instead of resumed
    /// via `next`, the early-close action must run exactly once.
    HaveOutput(Box<Pipe<L, I, O, U, M, R>>, M::Wrap<()>, O),
    /// Request one input element. `onInput` is used for a genuine element;
    /// `onUpstreamDone` is used once upstream has terminated with a `U`.
    NeedInput(
        Box<dyn FnOnce(I) -> Pipe<L, I, O, U, M, R>>,
        Box<dyn FnOnce(U) -> Pipe<L, I, O, U, M, R>>,
    ),
    /// Terminal success.
    Done(R),
    /// Run an effect in the host context to obtain the next step.
    PipeM(M::Wrap<Box<Pipe<L, I, O, U, M, R>>>),
    /// Push `pushed` back onto the input stream; the next consumer of input
    /// must see it before any genuinely new element.
    Leftover(Box<Pipe<L, I, O, U, M, R>>, L),
}

impl<L, I, O, U, M, R> Pipe<L, I, O, U, M, R>
where
    M: Monad,
{
    /// Box this step, for use as the successor field of another variant.
    pub(crate) fn boxed(self) -> Box<Self> {
        Box::new(self)
    }
}

/// A pipe with no real input: `I = Void`, `L = Void`, `U = ()`, `R = ()`.
pub type Source<O, M> = Pipe<Void, Void, O, (), M, ()>;

/// A pipe that consumes input and produces only a final result: `L = I`,
/// `O = Void`, `U = ()`.
pub type Sink<I, R, M> = Pipe<I, I, Void, (), M, R>;

/// A pipe that transforms input into output: `L = I`, `U = ()`, `R = ()`.
pub type Conduit<I, O, M> = Pipe<I, I, O, (), M, ()>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monad::Now;

    #[test]
    fn source_alias_matches_its_expansion() {
        let p: Source<i32, Now> = Pipe::Done(());
        assert!(matches!(p, Pipe::Done(())));
    }
}
