//! Prompt, exception-safe resource scope.

use tracing::{debug, trace};

use crate::monad::Monad;
use crate::step::Pipe;
use crate::transform::add_cleanup;

/// Allocate a resource, run `body` with it, and guarantee `free` runs
/// exactly once: when `body` completes normally, when it is abandoned, or
/// when the host context itself unwinds through an exception.
///
/// `alloc` produces both a `key` (handed to `free` on release) and a `seed`
/// (handed to `body`) — most resources use the same value for both, but
/// keeping them distinct lets a host hand `body` a cheaper or differently
/// shaped handle than the one `free` needs to tear down.
///
/// The core itself contributes no exception safety here: it relies entirely
/// on the host context's registered-finalizer facility (§6) to run `free`
/// even when unwound by a host-level exception. What this function
/// guarantees is that `free` is *registered* as that finalizer, via
/// [`add_cleanup`], at the earliest point a consumer could abandon `body`.
pub fn bracket_p<K, S, L, I, O, U, M, R>(
    alloc: M::Wrap<(K, S)>,
    free: impl Fn(K) -> M::Wrap<()> + Clone + 'static,
    body: impl FnOnce(S) -> Pipe<L, I, O, U, M, R> + 'static,
) -> Pipe<L, I, O, U, M, R>
where
    M: Monad,
    K: Clone + 'static,
    S: 'static,
    L: 'static,
    I: 'static,
    O: 'static,
    U: 'static,
    R: 'static,
{
    Pipe::PipeM(M::map(alloc, move |(key, seed)| {
        debug!("bracket: resource acquired");
        let cleanup = move |completed: bool| {
            trace!(completed, "bracket: releasing resource");
            free(key.clone())
        };
        Box::new(add_cleanup(cleanup, body(seed)))
    }))
}
