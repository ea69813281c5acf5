//! The host effect context.
//!
//! The core algorithm (fusion, bind, `runPipe`, ...) never performs an
//! effect itself; it only ever sequences values that some host monad
//! produces. Rust has no higher-kinded types, so that "any monadic runtime"
//! capability is rendered as a trait with a generic associated type: the
//! `Wrap<T>` associated type stands in for `M<T>`, and [`Monad::bind`] is
//! the one sequencing primitive the rest of the crate is built on.
//!
//! Two concrete hosts ship here: [`Now`], which runs everything inline, and
//! [`Fallible`], which threads a `Result` so that a failing effect aborts
//! the pipe the way §7 of the design describes.

use std::marker::PhantomData;

/// A sequential effect context.
///
/// `Wrap<T>` plays the role of `M<T>`. Implementors must satisfy the usual
/// monad laws (`bind(pure(x), f) == f(x)`, `bind(m, pure) == m`,
/// associativity of `bind`); the core's own laws (§8 of the design) rely on
/// it.
pub trait Monad: Sized + 'static {
    /// The effectful wrapper around a value of type `T`.
    type Wrap<T: 'static>: 'static;

    /// Lift a pure value into the effect context.
    fn pure<T: 'static>(value: T) -> Self::Wrap<T>;

    /// Sequence an effectful value with a continuation that produces the
    /// next effectful value.
    fn bind<T: 'static, U: 'static>(
        m: Self::Wrap<T>,
        f: impl FnOnce(T) -> Self::Wrap<U> + 'static,
    ) -> Self::Wrap<U>;

    /// Apply a pure function inside the effect context.
    ///
    /// Derived from [`Monad::bind`] and [`Monad::pure`]; provided as a
    /// convenience since it is used at nearly every `PipeM` site in the
    /// fusion algorithm.
    fn map<T: 'static, U: 'static>(
        m: Self::Wrap<T>,
        f: impl FnOnce(T) -> U + 'static,
    ) -> Self::Wrap<U> {
        Self::bind(m, move |t| Self::pure(f(t)))
    }
}

/// The trivial host: effects run immediately, in place.
///
/// This is the Rust equivalent of instantiating the original algebra's
/// monad parameter with `Identity`. It's the right choice whenever the
/// "effects" are just ordinary synchronous Rust code (mutating a buffer,
/// reading the next element of an in-memory collection).
#[derive(Debug, Clone, Copy, Default)]
pub struct Now;

impl Monad for Now {
    type Wrap<T: 'static> = T;

    fn pure<T: 'static>(value: T) -> T {
        value
    }

    fn bind<T: 'static, U: 'static>(m: T, f: impl FnOnce(T) -> U + 'static) -> U {
        f(m)
    }
}

/// A host whose effects can fail.
///
/// `Wrap<T> = Result<T, E>`. Sequencing short-circuits on `Err`, which is
/// exactly how §7's "an effect inside `PipeM` fails, the pipe is considered
/// abandoned at that point" is realized in Rust: `bind` simply never calls
/// the continuation, so any `PipeM` still queued up downstream never runs,
/// while `addCleanup`/`bracketP` registrations keep working because they're
/// baked into the `Pipe` value's *structure*, not into unwinding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallible<E>(PhantomData<E>);

impl<E: std::fmt::Debug + 'static> Monad for Fallible<E> {
    type Wrap<T: 'static> = Result<T, E>;

    fn pure<T: 'static>(value: T) -> Result<T, E> {
        Ok(value)
    }

    fn bind<T: 'static, U: 'static>(
        m: Result<T, E>,
        f: impl FnOnce(T) -> Result<U, E> + 'static,
    ) -> Result<U, E> {
        m.and_then(f)
    }
}

/// A host whose effects are genuinely deferred until explicitly run.
///
/// Unlike [`Now`], constructing a `Wrap<T>` value here performs no work:
/// `Wrap<T> = Box<dyn FnOnce() -> T>`, and nothing happens until something
/// calls it. `Now`'s eager evaluation collapses "register a finalizer" and
/// "run a finalizer" into the same moment, which is harmless only when the
/// wrapped computation has no observable side effect; anything that tests
/// or depends on *when* a `HaveOutput` close action or an `addCleanup`
/// registration actually fires needs a host like this one instead.
pub struct Io;

impl Monad for Io {
    type Wrap<T: 'static> = Box<dyn FnOnce() -> T>;

    fn pure<T: 'static>(value: T) -> Self::Wrap<T> {
        Box::new(move || value)
    }

    fn bind<T: 'static, U: 'static>(
        m: Self::Wrap<T>,
        f: impl FnOnce(T) -> Self::Wrap<U> + 'static,
    ) -> Self::Wrap<U> {
        Box::new(move || f(m())())
    }
}

/// A natural transformation between two host effect contexts.
///
/// `transPipe`'s parameter must be usable at *every* instantiation of `T`
/// simultaneously (spec §9: "higher-rank polymorphism"). Rust renders that
/// as a trait object with one generic method, rather than a stored closure
/// monomorphized to a single `T`.
pub trait Nat<M1: Monad, M2: Monad> {
    /// Transform one effectful value, for any payload type `T`.
    fn apply<T: 'static>(&self, m: M1::Wrap<T>) -> M2::Wrap<T>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_runs_inline() {
        assert_eq!(Now::bind(Now::pure(2), |x| x + 1), 3);
    }

    #[test]
    fn fallible_short_circuits() {
        let r: Result<i32, &'static str> = Fallible::<&'static str>::bind(Err("boom"), |x| {
            Fallible::<&'static str>::pure(x + 1)
        });
        assert_eq!(r, Err("boom"));
    }

    #[test]
    fn fallible_threads_through_ok() {
        let r = Fallible::<&'static str>::bind(Ok(1), |x| Fallible::<&'static str>::pure(x + 1));
        assert_eq!(r, Ok(2));
    }

    #[test]
    fn io_defers_until_invoked() {
        use std::cell::Cell;
        use std::rc::Rc;
        let ran = Rc::new(Cell::new(false));
        let ran2 = ran.clone();
        let thunk = Io::bind(Io::pure(()), move |()| {
            ran2.set(true);
            Io::pure(3)
        });
        assert!(!ran.get(), "binding an Io action must not run it");
        assert_eq!(thunk(), 3);
        assert!(ran.get());
    }
}
