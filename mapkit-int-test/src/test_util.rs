use mapkit::errors::MappingResult;
use mapkit::metadata::TypeRef;
use mapkit::path::PropertyPath;
use mapkit::MappingContext;
use std::time::Instant;

use crate::model::{Account, User};

/// Runs `test` against a freshly built context and panics with the error
/// (debug formatted, so the backtrace is included) if it fails.
pub fn run_test<T, B>(before: B, test: T)
where
    B: Fn() -> MappingResult<TestContext>,
    T: Fn(TestContext) -> MappingResult<()>,
{
    let start_time = Instant::now();
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    if let Err(e) = test(ctx.clone()) {
        panic!(
            "Test failed after {:?}: {:?}",
            start_time.elapsed(),
            e
        );
    }
    log::debug!(
        "Test finished in {:?} with {} cached resolutions",
        start_time.elapsed(),
        ctx.context().resolver().cache().len()
    );
}

#[derive(Clone)]
pub struct TestContext {
    context: MappingContext,
}

impl TestContext {
    pub fn new(context: MappingContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> MappingContext {
        self.context.clone()
    }

    /// Resolves against a registered type by name.
    pub fn resolve(&self, path: &str, root: &str) -> MappingResult<PropertyPath> {
        self.context.resolve_path(path, &TypeRef::named(root))
    }
}

/// Context with the whole test model registered.
pub fn create_test_context() -> MappingResult<TestContext> {
    let context = MappingContext::builder()
        .register::<User>()
        .register::<Account>()
        .build()?;
    Ok(TestContext::new(context))
}

/// Same model, resolution cache turned off.
pub fn create_uncached_test_context() -> MappingResult<TestContext> {
    let context = MappingContext::builder()
        .cache_enabled(false)
        .register::<User>()
        .register::<Account>()
        .build()?;
    Ok(TestContext::new(context))
}

/// Segment names of a chain, root to leaf.
pub fn segments(path: &PropertyPath) -> Vec<String> {
    path.iter().map(|p| p.segment().to_string()).collect()
}
