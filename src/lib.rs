//! A streaming composition core: producers, consumers, and stream
//! transformers modeled as values of one algebraic step type, fused
//! end-to-end by a single composition operator.
//!
//! Everything in this crate is built from [`Pipe`], a five-variant
//! description of one step of a staged computation: it may emit output
//! ([`Pipe::HaveOutput`]), ask for input ([`Pipe::NeedInput`]), finish
//! ([`Pipe::Done`]), run a host effect ([`Pipe::PipeM`]), or push an unused
//! input element back upstream ([`Pipe::Leftover`]). [`Pipe::and_then`] chains
//! pipes sequentially; [`pipe`] fuses a producer and a consumer into one.
//!
//! # Building a pipe
//!
//! The [primitives](primitives) are the small vocabulary pipes are built
//! from. A consumer that collects every input element into a `Vec` reads
//! straight-line, despite being built entirely out of `and_then`:
//!
//! ```
//! use pipewright::monad::Now;
//! use pipewright::primitives::await_input;
//! use pipewright::run::run_pipe;
//! use pipewright::{pipe, source_list, Pipe, Void};
//!
//! fn consume_all<I: 'static>() -> Pipe<Void, I, Void, (), Now, Vec<I>> {
//!     fn go<I: 'static>(mut acc: Vec<I>) -> Pipe<Void, I, Void, (), Now, Vec<I>> {
//!         await_input().and_then(move |opt| match opt {
//!             Some(i) => {
//!                 acc.push(i);
//!                 go(acc)
//!             }
//!             None => Pipe::Done(acc),
//!         })
//!     }
//!     go(Vec::new())
//! }
//!
//! let source: Pipe<Void, Void, i32, (), Now, ()> = source_list(vec![1, 2, 3]);
//! let fused = pipe(source, consume_all());
//! assert_eq!(run_pipe(fused), vec![1, 2, 3]);
//! ```
//!
//! # Fusing more than two pipes
//!
//! Fusion is right-biased and associative, so a transformer slots in the
//! same way a producer or consumer does. The [`Shr`](std::ops::Shr)
//! implementation on [`Pipe`] spells this out with `>>`, the way decorated
//! pipes chain together:
//!
//! ```
//! use pipewright::monad::Now;
//! use pipewright::{source_list, Pipe, Void};
//! # use pipewright::run::run_pipe;
//! # fn consume_all<I: 'static>() -> Pipe<Void, I, Void, (), Now, Vec<I>> {
//! #     fn go<I: 'static>(mut acc: Vec<I>) -> Pipe<Void, I, Void, (), Now, Vec<I>> {
//! #         pipewright::primitives::await_input().and_then(move |opt| match opt {
//! #             Some(i) => { acc.push(i); go(acc) }
//! #             None => Pipe::Done(acc),
//! #         })
//! #     }
//! #     go(Vec::new())
//! # }
//!
//! fn double_conduit() -> Pipe<Void, i32, i32, (), Now, ()> {
//!     Pipe::NeedInput(
//!         Box::new(|i: i32| Pipe::HaveOutput(Box::new(double_conduit()), (), i * 2)),
//!         Box::new(Pipe::Done),
//!     )
//! }
//!
//! let source: Pipe<Void, Void, i32, (), Now, ()> = source_list(vec![1, 2, 3]);
//! let fused = source >> double_conduit() >> consume_all();
//! assert_eq!(run_pipe(fused), vec![2, 4, 6]);
//! ```
//!
//! # Host effects
//!
//! [`monad::Monad`] stands in for the host execution context — there is no
//! single required effect system, only a sequencing capability. [`monad::Now`]
//! runs everything inline; [`monad::Fallible`] short-circuits on error;
//! [`monad::Io`] defers effects until explicitly invoked, which is what
//! finalizer-timing-sensitive code (see [`bracket::bracket_p`]) needs.
//!
//! # Module map
//!
//! | Module | Contents |
//! |---|---|
//! | [`void`] | The uninhabited type used to rule out impossible variants |
//! | [`monad`] | The host effect context abstraction and its instances |
//! | [`step`] | [`Pipe`] itself, and the `Source`/`Sink`/`Conduit` aliases |
//! | [`bind`] | Sequential composition (`and_then`) |
//! | [`primitives`] | `await_input`, `yield_value`, `leftover`, `source_list`, ... |
//! | [`leftover`] | `inject_leftovers`, `any_leftovers` |
//! | [`fusion`] | `pipe`, `pipe_resume`, `no_input` — the core algorithm |
//! | [`transform`] | `trans_pipe`, `map_output`, `map_input`, `add_cleanup`, ... |
//! | [`run`] | `run_pipe` |
//! | [`bracket`] | `bracket_p` |

pub mod bind;
pub mod bracket;
pub mod fusion;
pub mod leftover;
pub mod monad;
pub mod primitives;
pub mod run;
pub mod step;
pub mod transform;
pub mod void;

pub use bracket::bracket_p;
pub use fusion::{no_input, pipe, pipe_resume, ResumablePipe};
pub use leftover::{any_leftovers, inject_leftovers};
pub use primitives::{
    await_either, await_input, build, has_input, id_p, leftover, source_list, yield_or,
    yield_value,
};
pub use run::run_pipe;
pub use step::{Conduit, Pipe, Sink, Source};
pub use transform::{add_cleanup, map_input, map_output, map_output_maybe, pipe_push, sink_to_pipe, trans_pipe};
pub use void::{absurd, Void};
