//! Tracing support for graph operations.
//!
//! With the `tracing` feature enabled, mutations and traversals open
//! `info_span!`s and [`init_tracing`] installs a subscriber that writes closed
//! spans to the test writer and tallies them per thread.  With the feature
//! disabled, everything here is a no-op.

#[cfg(feature = "tracing")]
mod enabled {
    use std::{cell::RefCell, collections::BTreeMap, sync::Once};

    use tracing_subscriber::{
        Layer, Registry,
        fmt::{self, format::FmtSpan},
        layer::{Context, SubscriberExt},
        registry::LookupSpan,
        util::SubscriberInitExt,
    };

    thread_local! {
        static SPAN_COUNTS: RefCell<BTreeMap<&'static str, usize>> =
            const { RefCell::new(BTreeMap::new()) };
    }

    struct SpanCountLayer;

    impl<S> Layer<S> for SpanCountLayer
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_close(&self, id: tracing::Id, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(&id) {
                let name = span.metadata().name();
                SPAN_COUNTS.with(|counts| {
                    *counts.borrow_mut().entry(name).or_insert(0) += 1;
                });
            }
        }
    }

    /// Installs the global subscriber.  Safe to call more than once; only the
    /// first call has an effect, and an already-installed subscriber is left
    /// alone.
    pub fn init_tracing() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = Registry::default()
                .with(SpanCountLayer)
                .with(
                    fmt::layer()
                        .with_test_writer()
                        .with_span_events(FmtSpan::CLOSE),
                )
                .try_init();
        });
    }

    /// Number of spans named `name` closed on this thread since the last
    /// [`reset_span_counts`].
    #[doc(hidden)]
    pub fn span_count(name: &str) -> usize {
        SPAN_COUNTS.with(|counts| counts.borrow().get(name).copied().unwrap_or(0))
    }

    #[doc(hidden)]
    pub fn reset_span_counts() {
        init_tracing();
        SPAN_COUNTS.with(|counts| counts.borrow_mut().clear());
    }

    pub use tracing::info_span;
}

#[cfg(not(feature = "tracing"))]
mod disabled {
    pub fn init_tracing() {
        // No subscriber to install when tracing is disabled
    }

    // Nothing is recorded, so every span name reads as never closed.
    #[doc(hidden)]
    pub fn span_count(_name: &str) -> usize {
        0
    }

    #[doc(hidden)]
    pub fn reset_span_counts() {}

    // Stands in for `tracing::info_span!` so call sites in `graph.rs` compile
    // unchanged; field expressions are dropped without being evaluated.
    #[macro_export]
    macro_rules! info_span {
        ($name:expr) => {{ $crate::tracing_support::NoOpSpan }};
        ($name:expr, $($fields:tt)*) => {{ $crate::tracing_support::NoOpSpan }};
    }

    pub use info_span;

    /// Span returned by the no-op `info_span!`.
    pub struct NoOpSpan;

    impl NoOpSpan {
        pub fn entered(self) -> NoOpSpanGuard {
            NoOpSpanGuard
        }
    }

    /// Guard returned by [`NoOpSpan::entered`]; dropping it does nothing.
    pub struct NoOpSpanGuard;
}

#[cfg(feature = "tracing")]
pub use enabled::*;

#[cfg(not(feature = "tracing"))]
pub use disabled::*;
