//! BuildEngine port - runs one build
//!
//! The engine compiles sources into output files and reports which paths the
//! build depended on. Incremental engines return a context inside the result
//! and receive it back, together with the triggering changes, on the next call.

use std::marker::PhantomData;

use crate::domain::entities::{BuildResult, IncrementalState, RebuildState};
use crate::error::KilnResult;

/// A pluggable build engine
///
/// Returning `Err` means the engine itself could not run; compilation problems
/// belong in [`BuildResult::errors`] instead.
pub trait BuildEngine {
    /// Engine-defined incremental context
    type Context: IncrementalState;

    /// Run one build. `prior` is `None` for the initial build.
    fn build(
        &mut self,
        prior: Option<RebuildState<Self::Context>>,
    ) -> KilnResult<BuildResult<Self::Context>>;
}

/// Adapts a closure into a [`BuildEngine`]; see [`from_fn`]
pub struct FnEngine<F, C> {
    build: F,
    _context: PhantomData<fn() -> C>,
}

/// Use a closure taking the previous rebuild state as the build engine
pub fn from_fn<F, C>(build: F) -> FnEngine<F, C>
where
    F: FnMut(Option<RebuildState<C>>) -> KilnResult<BuildResult<C>>,
    C: IncrementalState,
{
    FnEngine {
        build,
        _context: PhantomData,
    }
}

impl<F, C> BuildEngine for FnEngine<F, C>
where
    F: FnMut(Option<RebuildState<C>>) -> KilnResult<BuildResult<C>>,
    C: IncrementalState,
{
    type Context = C;

    fn build(&mut self, prior: Option<RebuildState<C>>) -> KilnResult<BuildResult<C>> {
        (self.build)(prior)
    }
}
